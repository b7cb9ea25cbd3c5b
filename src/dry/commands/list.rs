use crate::commands::{CmdMessage, CmdResult, ListArgs, Session};
use crate::error::{DryError, Result};
use crate::process::Runner;
use crate::tools;
use chrono::NaiveDate;

/// Lists one day's directory (today unless a filter says otherwise).
pub fn run<R: Runner>(
    runner: &mut R,
    session: &Session,
    args: &ListArgs,
    today: NaiveDate,
) -> Result<CmdResult> {
    let date = resolve_day(args.filter.as_deref(), today)?;
    let dir = session.paths.day_dir(date);

    if !dir.is_dir() {
        return Ok(CmdResult::default().with_message(CmdMessage::warning(format!(
            "No entries for {} in {}",
            date.format("%Y-%m-%d"),
            session.diary
        ))));
    }

    let mut result = CmdResult::default();
    let outcome = runner.run(&tools::list(&session.tools, &dir, false)?)?;
    if !outcome.is_success() {
        result.add_message(CmdMessage::warning(format!("Listing {}", outcome)));
    }
    Ok(result)
}

/// Accepts `today`, `yesterday`, `tomorrow`, `YYYY-MM-DD` or `YYYY/MM/DD`.
pub fn resolve_day(filter: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    let out_of_range = || DryError::Usage("date out of range".to_string());
    match filter.map(str::trim) {
        None | Some("today") => Ok(today),
        Some("yesterday") => today.pred_opt().ok_or_else(out_of_range),
        Some("tomorrow") => today.succ_opt().ok_or_else(out_of_range),
        Some(other) => NaiveDate::parse_from_str(other, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(other, "%Y/%m/%d"))
            .map_err(|_| {
                DryError::Usage(format!(
                    "invalid date '{}' (use today, yesterday, tomorrow or YYYY-MM-DD)",
                    other
                ))
            }),
    }
}
