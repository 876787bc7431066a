/// Formats a remaining time as `MM:SS`.
///
/// There is no hour field: whole hours are dropped, so 3661 seconds
/// reads `01:01`.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", (seconds / 60) % 60, seconds % 60)
}
