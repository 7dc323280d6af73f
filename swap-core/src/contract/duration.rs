use chrono::NaiveDate;

const DAYS_PER_MONTH: i64 = 30;

/// Whole days between two dates, in either order.
pub fn days_between(
    start: NaiveDate,
    end: NaiveDate,
) -> i64 {
    (end - start).num_days().abs()
}

/// Human-readable swap length, counting a month as 30 days.
///
/// Under 30 days reads `"N days"`; otherwise months, with any remaining
/// days appended as `" and D days"`.
pub fn describe_duration(
    start: NaiveDate,
    end: NaiveDate,
) -> String {
    let days = days_between(start, end);
    if days < DAYS_PER_MONTH {
        return format!("{days} days");
    }
    let months = days / DAYS_PER_MONTH;
    let rest = days % DAYS_PER_MONTH;
    let unit = if months == 1 { "month" } else { "months" };
    if rest == 0 {
        format!("{months} {unit}")
    } else {
        format!("{months} {unit} and {rest} days")
    }
}
