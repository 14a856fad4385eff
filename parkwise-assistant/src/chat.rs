use parkwise_shared::{ChatMessage, MessageSender};

pub const WELCOME_MESSAGE: &str =
    "Welcome to ParkWise AI! Find and book your parking spot with ease. How can I help?";

/// Append-only transcript. Ids increase by one per message.
#[derive(Debug, Clone)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
    next_id: u64,
}

impl ChatLog {
    pub fn new() -> Self {
        let mut log = Self {
            messages: Vec::new(),
            next_id: 1,
        };
        log.push(MessageSender::Assistant, WELCOME_MESSAGE);
        log
    }

    pub fn push(&mut self, sender: MessageSender, text: impl Into<String>) -> ChatMessage {
        let message = ChatMessage {
            id: self.next_id,
            text: text.into(),
            sender,
        };
        self.next_id += 1;
        self.messages.push(message.clone());
        message
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for ChatLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_with_welcome() {
        let log = ChatLog::new();
        assert_eq!(log.len(), 1);
        assert_eq!(log.messages()[0].text, WELCOME_MESSAGE);
        assert_eq!(log.messages()[0].sender, MessageSender::Assistant);
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut log = ChatLog::new();
        let a = log.push(MessageSender::User, "Is there space?");
        let b = log.push(MessageSender::Assistant, "Yes, 35 spots.");

        assert!(a.id < b.id);
        assert_eq!(log.messages().last(), Some(&b));
        assert_eq!(log.len(), 3);
    }
}
