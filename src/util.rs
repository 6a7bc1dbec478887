/// Parse a typed answer. Anything that isn't a whole number is treated as no
/// answer.
pub fn parse_answer(input: &str) -> Option<i64> {
    input.trim().parse::<i64>().ok()
}

/// Countdown display, e.g. `2:05`
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Text progress bar of `width` cells
pub fn progress_bar(fraction: f64, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}
