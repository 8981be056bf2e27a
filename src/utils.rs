//! Utility helpers for SaavnPlay

/// Formats a playback clock value as `m:ss`.
/// Non-finite and non-positive values render as `0:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }
    let whole = seconds.floor() as u64;
    format!("{}:{:02}", whole / 60, whole % 60)
}

/// Fraction of `position` through `duration`, clamped to `[0, 1]`.
pub fn progress_fraction(position: f64, duration: f64) -> f64 {
    if !duration.is_finite() || duration <= 0.0 || !position.is_finite() {
        return 0.0;
    }
    (position / duration).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_time_handles_missing_duration() {
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(59.9), "0:59");
        assert_eq!(format_time(125.2), "2:05");
    }

    #[test]
    fn progress_fraction_is_clamped() {
        assert_eq!(progress_fraction(30.0, 0.0), 0.0);
        assert_eq!(progress_fraction(30.0, 60.0), 0.5);
        assert_eq!(progress_fraction(90.0, 60.0), 1.0);
    }
}
