//! 时间工具函数 — 业务时区转换
//!
//! 所有时间在存储层都是 `i64` Unix millis；日期/时刻字符串只在这里
//! 按业务时区 (`BUSINESS_TIMEZONE`) 转换。

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    #[error("Invalid date format: {0} (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Invalid time format: {0} (expected HH:MM)")]
    InvalidTime(String),

    #[error("Date range is reversed: {start} > {end}")]
    ReversedRange { start: NaiveDate, end: NaiveDate },
}

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> Result<NaiveDate, TimeError> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| TimeError::InvalidDate(date.to_string()))
}

/// 解析时刻字符串 (HH:MM 或 HH:MM:SS)
pub fn parse_time(time: &str) -> Result<NaiveTime, TimeError> {
    let time = time.trim();
    NaiveTime::parse_from_str(time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
        .map_err(|_| TimeError::InvalidTime(time.to_string()))
}

/// 本地日期时间 → Unix millis (业务时区)
///
/// DST gap fallback: 本地时间不存在时按 UTC 解释；重复时刻取较晚的一个。
pub fn local_to_millis(naive: NaiveDateTime, tz: Tz) -> i64 {
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// 日期开始 (00:00:00) → Unix millis (业务时区)
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    local_to_millis(date.and_time(NaiveTime::MIN), tz)
}

/// 日期结束 → 次日 00:00:00 的 Unix millis (业务时区)
///
/// 返回次日零点时间戳，调用方使用 `< end` (不含) 语义。
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    match date.succ_opt() {
        Some(next) => day_start_millis(next, tz),
        None => local_to_millis(date.and_time(NaiveTime::MIN), tz) + 86_400_000,
    }
}

/// Unix millis → 业务时区的日期
pub fn millis_to_local_date(millis: i64, tz: Tz) -> NaiveDate {
    match Utc.timestamp_millis_opt(millis).single() {
        Some(dt) => dt.with_timezone(&tz).date_naive(),
        None => NaiveDate::MIN,
    }
}

/// Unix millis → 业务时区的本地日期时间
pub fn millis_to_local(millis: i64, tz: Tz) -> Option<NaiveDateTime> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.with_timezone(&tz).naive_local())
}

/// 业务时区的今天
pub fn today(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// 当前时间 (Unix millis)
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// 解析闭区间 [start, end] → `[start_millis, end_millis)`
pub fn parse_day_range(start: &str, end: &str, tz: Tz) -> Result<(NaiveDate, NaiveDate, i64, i64), TimeError> {
    let start_date = parse_date(start)?;
    let end_date = parse_date(end)?;
    if start_date > end_date {
        return Err(TimeError::ReversedRange {
            start: start_date,
            end: end_date,
        });
    }
    Ok((
        start_date,
        end_date,
        day_start_millis(start_date, tz),
        day_end_millis(end_date, tz),
    ))
}
