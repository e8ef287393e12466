// Derived metrics over the store

use chrono::{DateTime, NaiveTime, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Counts of activity since local midnight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    pub total_sessions_today: usize,
    pub total_appointments_today: usize,
    pub total_messages_today: usize,
    pub total_errors_today: usize,
}

/// Cheap introspection of the running store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    #[cfg_attr(feature = "openapi", schema(example = "ok"))]
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub log_count: usize,
    pub session_count: usize,
    pub version: String,
}

/// Start of the calendar day containing `now`, in `now`'s time zone.
///
/// If midnight does not exist locally (DST gap), the day start is computed
/// from `now`'s UTC offset instead.
pub fn start_of_day<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    let midnight = now.date_naive().and_time(NaiveTime::MIN);
    match now.timezone().from_local_datetime(&midnight).earliest() {
        Some(start) => start.with_timezone(&Utc),
        None => {
            let offset = now.offset().fix().local_minus_utc();
            Utc.from_utc_datetime(&(midnight - chrono::Duration::seconds(i64::from(offset))))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_start_of_day_utc() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 15, 30, 0).unwrap();
        let start = start_of_day(&now);
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 3, 10, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_start_of_day_fixed_offset() {
        // 01:00 in UTC-3 is 04:00 UTC; local midnight is 03:00 UTC
        let tz = FixedOffset::west_opt(3 * 3600).unwrap();
        let now = tz.with_ymd_and_hms(2026, 3, 10, 1, 0, 0).unwrap();
        let start = start_of_day(&now);
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 3, 10, 3, 0, 0).unwrap());
    }

    #[test]
    fn test_daily_stats_wire_format() {
        let stats = DailyStats {
            total_sessions_today: 2,
            total_appointments_today: 1,
            total_messages_today: 5,
            total_errors_today: 0,
        };
        let value = serde_json::to_value(stats).unwrap();
        assert_eq!(value["totalSessionsToday"], 2);
        assert_eq!(value["totalAppointmentsToday"], 1);
        assert_eq!(value["totalMessagesToday"], 5);
        assert_eq!(value["totalErrorsToday"], 0);
    }
}
