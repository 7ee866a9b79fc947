use std::time::Duration;

/// Formats a playback time as `m:ss`.
///
/// Minutes are not wrapped into hours, so a 75 minute position reads `75:03`.
pub fn format_time(time: Duration) -> String {
    let total_secs = time.as_secs();
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    format!("{minutes}:{seconds:02}")
}
