// Date word sub-parsers for the task grammar
//
// Literal ISO dates (YYYY-MM-DD), weekday and month names (short and
// long forms), and ordinal/cardinal month days (1-31, optional
// st/nd/rd/th suffix). All words are case-insensitive and must end at
// a word boundary so "mon" never swallows the front of "months".

use crate::grammar::shared::{no_match, Span};
use chrono::{Month, NaiveDate, Weekday};
use nom::{IResult, Input};

/// Match a case-insensitive word ending at a word boundary.
pub fn word<'a>(input: Span<'a>, w: &str) -> IResult<Span<'a>, Span<'a>> {
    let frag = input.fragment();
    // get() keeps multi-byte input from panicking at the slice boundary
    if let Some(prefix) = frag.get(..w.len()) {
        if prefix.eq_ignore_ascii_case(w) {
            let boundary = frag[w.len()..]
                .chars()
                .next()
                .is_none_or(|c| !c.is_ascii_alphanumeric());
            if boundary {
                return Ok((input.take_from(w.len()), input.take(w.len())));
            }
        }
    }
    Err(no_match(input))
}

fn digits(input: Span, min: usize, max: usize) -> IResult<Span, u32> {
    let count = input
        .fragment()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .count();
    if count < min || count > max {
        return Err(no_match(input));
    }
    let value: u32 = input.fragment()[..count]
        .parse()
        .map_err(|_| no_match(input))?;
    Ok((input.take_from(count), value))
}

/// Literal `YYYY-MM-DD`; the calendar validates the components, so
/// `2021-13-45` is no match.
pub fn year_month_day(input: Span) -> IResult<Span, NaiveDate> {
    let start = input;
    let (input, year) = digits(input, 4, 4)?;
    let input = match input.fragment().strip_prefix('-') {
        Some(_) => input.take_from(1),
        None => return Err(no_match(start)),
    };
    let (input, month) = digits(input, 2, 2)?;
    let input = match input.fragment().strip_prefix('-') {
        Some(_) => input.take_from(1),
        None => return Err(no_match(start)),
    };
    let (input, day) = digits(input, 2, 2)?;

    // Word boundary: "2021-01-012" is not a date
    if input
        .fragment()
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric())
    {
        return Err(no_match(start));
    }

    match NaiveDate::from_ymd_opt(year as i32, month, day) {
        Some(date) => Ok((input, date)),
        None => Err(no_match(start)),
    }
}

const WEEKDAYS: &[(&str, Weekday)] = &[
    ("monday", Weekday::Mon),
    ("mon", Weekday::Mon),
    ("tuesday", Weekday::Tue),
    ("tue", Weekday::Tue),
    ("wednesday", Weekday::Wed),
    ("wed", Weekday::Wed),
    ("thursday", Weekday::Thu),
    ("thu", Weekday::Thu),
    ("friday", Weekday::Fri),
    ("fri", Weekday::Fri),
    ("saturday", Weekday::Sat),
    ("sat", Weekday::Sat),
    ("sunday", Weekday::Sun),
    ("sun", Weekday::Sun),
];

/// Weekday name, long forms before abbreviations.
pub fn day_of_week(input: Span) -> IResult<Span, Weekday> {
    for (name, weekday) in WEEKDAYS {
        if let Ok((rest, _)) = word(input, name) {
            return Ok((rest, *weekday));
        }
    }
    Err(no_match(input))
}

const MONTHS: &[(&str, Month)] = &[
    ("january", Month::January),
    ("jan", Month::January),
    ("february", Month::February),
    ("feb", Month::February),
    ("march", Month::March),
    ("mar", Month::March),
    ("april", Month::April),
    ("apr", Month::April),
    ("may", Month::May),
    ("june", Month::June),
    ("jun", Month::June),
    ("july", Month::July),
    ("jul", Month::July),
    ("august", Month::August),
    ("aug", Month::August),
    ("september", Month::September),
    ("sep", Month::September),
    ("october", Month::October),
    ("oct", Month::October),
    ("november", Month::November),
    ("nov", Month::November),
    ("december", Month::December),
    ("dec", Month::December),
];

/// Month name, long forms before abbreviations.
pub fn month_of_year(input: Span) -> IResult<Span, Month> {
    for (name, month) in MONTHS {
        if let Ok((rest, _)) = word(input, name) {
            return Ok((rest, *month));
        }
    }
    Err(no_match(input))
}

/// Month day 1-31, with an optional ordinal suffix (`1st`, `22nd`).
pub fn month_day(input: Span) -> IResult<Span, u8> {
    let start = input;
    let (input, value) = digits(input, 1, 2)?;
    if value == 0 || value > 31 {
        return Err(no_match(start));
    }

    for suffix in ["st", "nd", "rd", "th"] {
        if let Ok((rest, _)) = word(input, suffix) {
            return Ok((rest, value as u8));
        }
    }

    // No suffix: still needs a word boundary
    if input
        .fragment()
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric())
    {
        return Err(no_match(start));
    }
    Ok((input, value as u8))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoke_test_year_month_day() {
        let (rest, date) = year_month_day(Span::new("2021-01-15 rest")).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2021, 1, 15).unwrap());
        assert_eq!(*rest.fragment(), " rest");
    }

    #[test]
    fn smoke_test_year_month_day_invalid_calendar() {
        assert!(year_month_day(Span::new("2021-13-45")).is_err());
        assert!(year_month_day(Span::new("2021-02-30")).is_err());
    }

    #[test]
    fn smoke_test_year_month_day_malformed() {
        assert!(year_month_day(Span::new("2021-1-15")).is_err());
        assert!(year_month_day(Span::new("21-01-15")).is_err());
        assert!(year_month_day(Span::new("2021-01-015")).is_err());
    }

    #[test]
    fn smoke_test_day_of_week_forms() {
        assert_eq!(day_of_week(Span::new("mon")).unwrap().1, Weekday::Mon);
        assert_eq!(day_of_week(Span::new("Monday")).unwrap().1, Weekday::Mon);
        assert_eq!(day_of_week(Span::new("sun x")).unwrap().1, Weekday::Sun);
        assert!(day_of_week(Span::new("months")).is_err());
    }

    #[test]
    fn smoke_test_month_of_year_forms() {
        assert_eq!(month_of_year(Span::new("jan")).unwrap().1, Month::January);
        assert_eq!(
            month_of_year(Span::new("December")).unwrap().1,
            Month::December
        );
        assert!(month_of_year(Span::new("janx")).is_err());
    }

    #[test]
    fn smoke_test_month_day_ordinals() {
        assert_eq!(month_day(Span::new("1")).unwrap().1, 1);
        assert_eq!(month_day(Span::new("1st")).unwrap().1, 1);
        assert_eq!(month_day(Span::new("22nd")).unwrap().1, 22);
        assert_eq!(month_day(Span::new("3rd")).unwrap().1, 3);
        assert_eq!(month_day(Span::new("15th")).unwrap().1, 15);
        assert!(month_day(Span::new("32")).is_err());
        assert!(month_day(Span::new("0")).is_err());
        assert!(month_day(Span::new("1x")).is_err());
    }
}
