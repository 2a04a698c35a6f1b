// Recurrence expression grammar for `every:` task fields
//
// Alternatives, matched greedily in this order:
//   1. a single unit word: day, week, month, year, weekday (Mon-Fri),
//      weekend (Saturday)
//   2. a comma-less sequence of weekday names -> WEEKLY on those days
//   3. <integer> <unit>                       -> frequency + interval
//   4. any mix of month days and month names  -> YEARLY with
//      bymonthday/bymonth; month day defaults to 1 when absent
//
// The parsed options feed the rrule builder anchored at the parse
// context's reference time; the literal expression text is preserved
// by the caller for round-trip.

use crate::grammar::shared::{no_match, Span};
use crate::grammar::task::dates::{day_of_week, month_day, month_of_year, word};
use chrono::{DateTime, Month, Weekday};
use nom::{IResult, Input};
use rrule::{Frequency, NWeekday, RRule, RRuleError, Tz, Validated};

/// The option set a recurrence expression denotes.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurrenceOptions {
    pub freq: Frequency,
    pub interval: u16,
    pub by_weekday: Vec<Weekday>,
    pub by_month: Vec<Month>,
    pub by_month_day: Vec<i8>,
}

impl RecurrenceOptions {
    fn plain(freq: Frequency) -> Self {
        Self {
            freq,
            interval: 1,
            by_weekday: Vec::new(),
            by_month: Vec::new(),
            by_month_day: Vec::new(),
        }
    }
}

// A run of 1+ spaces
fn space1(input: Span) -> IResult<Span, ()> {
    let count = input
        .fragment()
        .chars()
        .take_while(|&c| c == ' ')
        .count();
    if count == 0 {
        return Err(no_match(input));
    }
    Ok((input.take_from(count), ()))
}

// Alternative 1: single unit words
fn unit_word(input: Span) -> IResult<Span, RecurrenceOptions> {
    if let Ok((rest, _)) = word(input, "weekday") {
        let mut opts = RecurrenceOptions::plain(Frequency::Weekly);
        opts.by_weekday = vec![
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
        ];
        return Ok((rest, opts));
    }
    if let Ok((rest, _)) = word(input, "weekend") {
        let mut opts = RecurrenceOptions::plain(Frequency::Weekly);
        opts.by_weekday = vec![Weekday::Sat];
        return Ok((rest, opts));
    }
    for (name, freq) in [
        ("day", Frequency::Daily),
        ("week", Frequency::Weekly),
        ("month", Frequency::Monthly),
        ("year", Frequency::Yearly),
    ] {
        if let Ok((rest, _)) = word(input, name) {
            return Ok((rest, RecurrenceOptions::plain(freq)));
        }
    }
    Err(no_match(input))
}

// Alternative 2: a sequence of weekday names
fn weekday_sequence(input: Span) -> IResult<Span, RecurrenceOptions> {
    let (mut rest, first) = day_of_week(input)?;
    let mut days = vec![first];
    loop {
        let checkpoint = rest;
        let after_space = match space1(rest) {
            Ok((after, ())) => after,
            Err(_) => break,
        };
        match day_of_week(after_space) {
            Ok((after, day)) => {
                if !days.contains(&day) {
                    days.push(day);
                }
                rest = after;
            }
            Err(_) => {
                rest = checkpoint;
                break;
            }
        }
    }
    let mut opts = RecurrenceOptions::plain(Frequency::Weekly);
    opts.by_weekday = days;
    Ok((rest, opts))
}

// Alternative 3: <integer> <unit>
fn interval_unit(input: Span) -> IResult<Span, RecurrenceOptions> {
    let start = input;
    let count = input
        .fragment()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .count();
    if count == 0 {
        return Err(no_match(start));
    }
    let interval: u16 = input.fragment()[..count]
        .parse()
        .map_err(|_| no_match(start))?;
    if interval == 0 {
        return Err(no_match(start));
    }
    let input = input.take_from(count);
    let (input, ()) = space1(input).map_err(|_| no_match(start))?;

    for (name, freq) in [
        ("days", Frequency::Daily),
        ("day", Frequency::Daily),
        ("weeks", Frequency::Weekly),
        ("week", Frequency::Weekly),
        ("months", Frequency::Monthly),
        ("month", Frequency::Monthly),
        ("years", Frequency::Yearly),
        ("year", Frequency::Yearly),
    ] {
        if let Ok((rest, _)) = word(input, name) {
            let mut opts = RecurrenceOptions::plain(freq);
            opts.interval = interval;
            return Ok((rest, opts));
        }
    }
    Err(no_match(start))
}

// Alternative 4: month days and month names, any order
fn month_combination(input: Span) -> IResult<Span, RecurrenceOptions> {
    let mut days: Vec<i8> = Vec::new();
    let mut months: Vec<Month> = Vec::new();
    let mut rest = input;
    let mut matched = false;

    loop {
        let checkpoint = rest;
        let at = if matched {
            match space1(rest) {
                Ok((after, ())) => after,
                Err(_) => break,
            }
        } else {
            rest
        };
        if let Ok((after, day)) = month_day(at) {
            if !days.contains(&(day as i8)) {
                days.push(day as i8);
            }
            rest = after;
            matched = true;
            continue;
        }
        if let Ok((after, month)) = month_of_year(at) {
            if !months.contains(&month) {
                months.push(month);
            }
            rest = after;
            matched = true;
            continue;
        }
        rest = checkpoint;
        break;
    }

    if !matched {
        return Err(no_match(input));
    }
    if days.is_empty() {
        // No month day given: default to the 1st
        days.push(1);
    }
    let mut opts = RecurrenceOptions::plain(Frequency::Yearly);
    opts.by_month = months;
    opts.by_month_day = days;
    Ok((rest, opts))
}

/// Parse a recurrence expression, trying the alternatives in their
/// greedy priority order.
pub fn recurrence_expression(input: Span) -> IResult<Span, RecurrenceOptions> {
    if let Ok(parsed) = unit_word(input) {
        return Ok(parsed);
    }
    if let Ok(parsed) = weekday_sequence(input) {
        return Ok(parsed);
    }
    if let Ok(parsed) = interval_unit(input) {
        return Ok(parsed);
    }
    month_combination(input)
}

/// Build and validate the rule, anchored at `dtstart`.
pub fn build_rule(
    opts: &RecurrenceOptions,
    dtstart: DateTime<Tz>,
) -> Result<RRule<Validated>, RRuleError> {
    let mut rule = RRule::new(opts.freq).interval(opts.interval);
    if !opts.by_weekday.is_empty() {
        rule = rule.by_weekday(opts.by_weekday.iter().map(|w| NWeekday::Every(*w)).collect());
    }
    if !opts.by_month.is_empty() {
        rule = rule.by_month(&opts.by_month);
    }
    if !opts.by_month_day.is_empty() {
        rule = rule.by_month_day(opts.by_month_day.clone());
    }
    rule.validate(dtstart)
}
