/// Render seconds as a zero-padded `MM:SS` clock.
///
/// Minutes are not wrapped into hours, so 100 minutes renders as `100:00`.
pub fn format_clock(secs: u64) -> String {
    let (mins, secs) = (secs / 60, secs % 60);
    format!("{mins:02}:{secs:02}")
}

/// Text progress bar of `width` cells for a fraction in `0.0..=1.0`.
pub fn progress_bar(fraction: f64, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}
