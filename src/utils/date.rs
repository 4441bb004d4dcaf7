use crate::errors::{AppError, AppResult};
use chrono::{Datelike, NaiveDate};

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// First and last day covered by `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
pub fn bounds_of_period(p: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let p = p.trim();
    let invalid = || AppError::InvalidDate(p.to_string());

    if let Some(d) = parse_date(p) {
        return Ok((d, d));
    }

    if p.len() == 7
        && let Some(first) = parse_date(&format!("{p}-01"))
    {
        let next = if first.month() == 12 {
            NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
        }
        .ok_or_else(invalid)?;
        let last = next.pred_opt().ok_or_else(invalid)?;
        return Ok((first, last));
    }

    if p.len() == 4
        && let Ok(year) = p.parse::<i32>()
    {
        let first = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(invalid)?;
        let last = NaiveDate::from_ymd_opt(year, 12, 31).ok_or_else(invalid)?;
        return Ok((first, last));
    }

    Err(invalid())
}

/// Resolve a `--period`/`--range` expression to an inclusive date interval.
///
/// Accepts a single period or `start:end`; `None` means the current month,
/// `"all"` means every stored date.
pub fn resolve_range(period: Option<&str>) -> AppResult<(NaiveDate, NaiveDate)> {
    match period {
        None => {
            let t = today();
            bounds_of_period(&format!("{:04}-{:02}", t.year(), t.month()))
        }
        Some("all") => Ok((NaiveDate::MIN, NaiveDate::MAX)),
        Some(p) => {
            if let Some((start, end)) = p.split_once(':') {
                let (from, _) = bounds_of_period(start)?;
                let (_, to) = bounds_of_period(end)?;
                if to < from {
                    return Err(AppError::InvalidDate(format!(
                        "range end {end} precedes start {start}"
                    )));
                }
                Ok((from, to))
            } else {
                bounds_of_period(p)
            }
        }
    }
}
