//! Rendering of durations in the server's timespan text form.

use std::time::Duration;

/// Nanoseconds per timespan tick.
const NANOS_PER_TICK: u32 = 100;

/// Renders `duration` as `[d.]hh:mm:ss[.fffffff]`.
///
/// The day component is only written when non-zero and the fractional part
/// (in 100ns ticks) only when the duration has a sub-second remainder.
pub fn duration_to_time_span(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;
    let ticks = duration.subsec_nanos() / NANOS_PER_TICK;

    let mut text = String::with_capacity(20);
    if days > 0 {
        text.push_str(&format!("{days}."));
    }
    text.push_str(&format!("{hours:02}:{minutes:02}:{seconds:02}"));
    if ticks > 0 {
        text.push_str(&format!(".{ticks:07}"));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero() {
        assert_eq!(duration_to_time_span(Duration::ZERO), "00:00:00");
    }

    #[test]
    fn test_seconds() {
        assert_eq!(duration_to_time_span(Duration::from_secs(5)), "00:00:05");
    }

    #[test]
    fn test_hours_minutes_seconds() {
        assert_eq!(duration_to_time_span(Duration::from_secs(3_725)), "01:02:05");
    }

    #[test]
    fn test_days() {
        assert_eq!(
            duration_to_time_span(Duration::from_secs(2 * 86_400 + 3_600)),
            "2.01:00:00"
        );
    }

    #[test]
    fn test_fraction_in_ticks() {
        assert_eq!(duration_to_time_span(Duration::from_millis(1_500)), "00:00:01.5000000");
        assert_eq!(duration_to_time_span(Duration::from_nanos(100)), "00:00:00.0000001");
    }

    #[test]
    fn test_sub_tick_remainder_is_dropped() {
        assert_eq!(duration_to_time_span(Duration::from_nanos(99)), "00:00:00");
    }
}
