use chrono::Duration;

/// `HH:MM:SS` for the countdown panel. Negative values show as `00:00:00`;
/// hours are not wrapped at 24.
pub fn format_countdown(remaining: Duration) -> String {
    let total = remaining.num_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
