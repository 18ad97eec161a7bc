/// Format a number of seconds as `HH:MM:SS`.
///
/// Hours are not wrapped at 24; a counter past 99 hours simply grows the
/// hour component (`360000` formats as `100:00:00`).
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}
