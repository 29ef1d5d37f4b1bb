use chrono::{NaiveDate, NaiveDateTime};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::models::schedule::wire_time::FORMAT;

pub fn parse_datetime(value: &str) -> AppResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, FORMAT).map_err(|err| {
        AppError::validation_with_details(
            "无效的时间格式",
            json!({"value": value, "error": err.to_string()}),
        )
    })
}

pub fn format_datetime(dt: NaiveDateTime) -> String {
    dt.format(FORMAT).to_string()
}

/// Strict interval overlap. Total over whatever the caller supplies; a
/// degenerate interval simply never overlaps anything.
pub fn overlaps(
    a_start: NaiveDateTime,
    a_end: NaiveDateTime,
    b_start: NaiveDateTime,
    b_end: NaiveDateTime,
) -> bool {
    a_start < b_end && b_start < a_end
}

pub fn duration_minutes(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    end.signed_duration_since(start).num_minutes()
}

pub fn ensure_window(start: NaiveDateTime, end: NaiveDateTime) -> AppResult<()> {
    if end <= start {
        Err(AppError::validation("结束时间必须晚于开始时间"))
    } else {
        Ok(())
    }
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let first = NaiveDate::from_ymd_opt(year, month, 1);
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    match (first, next) {
        (Some(first), Some(next)) => (next - first).num_days() as u32,
        _ => 31,
    }
}
