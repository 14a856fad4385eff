use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Wraps a credential so it never shows up in Debug/Display output.
///
/// Config structs derive `Debug` and get logged at startup; the provider API key
/// lives inside one of them.
#[derive(Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Masked<T>(pub T);

impl<T> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("********")
    }
}

impl<T> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("********")
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str("********")
    }
}

impl<T> Masked<T> {
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_hides_value() {
        let key = Masked("sk-live-123".to_string());
        assert_eq!(format!("{:?}", key), "********");
        assert_eq!(key.to_string(), "********");
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"********\"");
        assert_eq!(key.expose(), "sk-live-123");
    }
}
