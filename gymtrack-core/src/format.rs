//! Formatting helpers shared across report renderers.

/// Format minutes for display (e.g., "12h 5m" or "45m").
pub fn format_minutes(total_minutes: u64) -> String {
    let hours = total_minutes / 60;
    let mins = total_minutes % 60;
    if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}

/// "1 day", "3 days".
pub fn plural(count: impl Into<u64>, unit: &str) -> String {
    let count = count.into();
    if count == 1 {
        format!("{} {}", count, unit)
    } else {
        format!("{} {}s", count, unit)
    }
}

/// Format a 0-10 score with one decimal (e.g., "7.5/10").
pub fn format_score(score: f64) -> String {
    format!("{:.1}/10", score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(45), "45m");
        assert_eq!(format_minutes(725), "12h 5m");
        assert_eq!(format_minutes(0), "0m");
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1u32, "day"), "1 day");
        assert_eq!(plural(0u32, "day"), "0 days");
        assert_eq!(plural(5u32, "workout"), "5 workouts");
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(7.26), "7.3/10");
        assert_eq!(format_score(10.0), "10.0/10");
    }
}
