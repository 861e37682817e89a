//! Focused minutes per day of the current calendar week.
//!
//! Sessions are bucketed by the local calendar date of `created_at` in the
//! caller's time zone, not by a UTC timestamp range.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::session::FocusSession;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayMinutes {
    pub date: NaiveDate,
    /// Short weekday name, e.g. "Mon".
    pub name: String,
    /// `dd/MM`
    pub short_date: String,
    pub minutes: u32,
}

/// First day of the week containing `day`.
pub fn week_start(day: NaiveDate, starts_on: Weekday) -> NaiveDate {
    let back = (day.weekday().num_days_from_sunday() + 7 - starts_on.num_days_from_sunday()) % 7;
    day - Duration::days(i64::from(back))
}

/// The seven days of the week containing `today`, each with the summed
/// duration of sessions completed that local day. Days without sessions
/// report zero.
pub fn weekly_consistency<Tz: TimeZone>(
    sessions: &[FocusSession],
    today: NaiveDate,
    starts_on: Weekday,
    tz: &Tz,
) -> Vec<DayMinutes> {
    let start = week_start(today, starts_on);
    let mut days: Vec<DayMinutes> = (0..7)
        .map(|offset| {
            let date = start + Duration::days(offset);
            DayMinutes {
                date,
                name: date.format("%a").to_string(),
                short_date: date.format("%d/%m").to_string(),
                minutes: 0,
            }
        })
        .collect();

    for session in sessions {
        let local = session.created_at.with_timezone(tz).date_naive();
        let offset = (local - start).num_days();
        if (0..7).contains(&offset) {
            let day = &mut days[offset as usize];
            day.minutes = day.minutes.saturating_add(session.duration_minutes);
        }
    }

    days
}

/// UTC bounds `[start, end)` of the local calendar day `date` in `tz`.
pub fn local_day_bounds<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    let next = date.succ_opt().unwrap_or(date);
    (local_midnight(date, tz), local_midnight(next, tz))
}

/// Start of the local day. When midnight falls in a DST gap the day starts
/// at the first whole hour that exists.
fn local_midnight<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    (0..24)
        .filter_map(|hour| date.and_hms_opt(hour, 0, 0))
        .find_map(|naive| tz.from_local_datetime(&naive).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
}
