use chrono::{DateTime, Utc};

use crate::market::Period;

/// Axis label for a candle timestamp, scaled to the selected period:
/// time-of-day for intraday, date plus time for a week, date only beyond.
pub fn axis_label(timestamp: DateTime<Utc>, period: Period) -> String {
    match period {
        Period::Intraday => timestamp.format("%H:%M").to_string(),
        Period::Week => timestamp.format("%m-%d %H:%M").to_string(),
        Period::Month | Period::Year => timestamp.format("%m-%d").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn label_granularity_follows_the_period() {
        // 2023-11-14 22:13:20 UTC
        let timestamp = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();

        assert_eq!(axis_label(timestamp, Period::Intraday), "22:13");
        assert_eq!(axis_label(timestamp, Period::Week), "11-14 22:13");
        assert_eq!(axis_label(timestamp, Period::Month), "11-14");
        assert_eq!(axis_label(timestamp, Period::Year), "11-14");
    }
}
