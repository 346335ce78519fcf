use chrono::NaiveDate;

use crate::types::DATE_CELL_FORMAT;

/// month-first layouts, tried before any day-first layout
const MONTH_FIRST_FORMATS: &[&str] = &["%m/%d/%Y", "%m-%d-%Y", "%m.%d.%Y", "%B %d, %Y", "%b %d, %Y"];

const DAY_FIRST_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%d %B %Y", "%d %b %Y"];

const SHORT_YEAR_FORMATS: &[&str] = &[
    "%m/%d/%y", "%m-%d-%y", "%m.%d.%y", "%d/%m/%y", "%d-%m-%y", "%d.%m.%y",
];

const YEAR_FIRST_FORMATS: &[&str] = &[DATE_CELL_FORMAT, "%Y/%m/%d"];

/// lenient parse of a payment date cell
///
/// Year-first text is unambiguous and tried first. After that month-first
/// layouts win over day-first ones, so `04/05/2025` reads as 5 April while
/// `25/04/2025` can only read as 25 April. A two digit year is a year of
/// this century. A trailing time of day is ignored.
pub fn parse_payment_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    parse_date_only(text).or_else(|| {
        // "2025-04-05 00:00:00" or "2025-04-05T08:30:00"
        let date_part = text.split(|c: char| c == ' ' || c == 'T').next()?;
        if date_part.len() == text.len() {
            return None;
        }
        parse_date_only(date_part)
    })
}

fn parse_date_only(text: &str) -> Option<NaiveDate> {
    // chrono's %Y also takes one or two digits, so pick layouts by where the
    // four digit year sits
    let tokens: Vec<&str> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();
    let is_year = |token: &&str| token.len() == 4 && token.chars().all(|c| c.is_ascii_digit());

    let formats: Vec<&str> = if tokens.first().is_some_and(is_year) {
        YEAR_FIRST_FORMATS.to_vec()
    } else if tokens.last().is_some_and(is_year) {
        MONTH_FIRST_FORMATS.iter().chain(DAY_FIRST_FORMATS).copied().collect()
    } else {
        SHORT_YEAR_FORMATS.to_vec()
    };
    formats
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

/// whether a stored date cell names the given calendar day
pub fn same_calendar_day(cell: &str, date: NaiveDate) -> bool {
    parse_payment_date(cell) == Some(date)
}
