// Task line grammar (notedown superset)
//
// A task is an unordered list item whose paragraph begins with a
// status bracket: `[` + status + `]` + space. The text runs until the
// line ends or a space introduces a recognized field key. Fields are
// order-independent, each at most once, and scanned tolerantly: a key
// whose value fails to parse is dropped rather than failing the task.
//
//   due:YYYY-MM-DD   (short form d:)
//   scheduled:...    (short form s:)
//   completed:...
//   priority:N       (short form p:)
//   every:EXPR       (short form e:)  recurrence, literal kept verbatim

pub mod dates;
pub mod recurrence;

use crate::ast::{Recurrence, Status};
use crate::grammar::shared::Span;
use chrono::{DateTime, NaiveDate};
use dates::year_month_day;
use recurrence::{build_rule, recurrence_expression};
use rrule::Tz;

/// Everything parsed out of one task line.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskParts {
    pub status: Status,
    pub status_char: char,
    pub text: String,
    pub due: Option<NaiveDate>,
    pub scheduled: Option<NaiveDate>,
    pub completed: Option<NaiveDate>,
    pub priority: Option<u32>,
    pub every: Option<Recurrence>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKey {
    Due,
    Scheduled,
    Completed,
    Priority,
    Every,
}

// Canonical keys before short forms so "s:" never shadows
// "scheduled:"
const FIELD_KEYS: &[(&str, FieldKey)] = &[
    ("scheduled:", FieldKey::Scheduled),
    ("completed:", FieldKey::Completed),
    ("priority:", FieldKey::Priority),
    ("every:", FieldKey::Every),
    ("due:", FieldKey::Due),
    ("d:", FieldKey::Due),
    ("s:", FieldKey::Scheduled),
    ("p:", FieldKey::Priority),
    ("e:", FieldKey::Every),
];

fn field_key_at(s: &str) -> Option<(FieldKey, usize)> {
    FIELD_KEYS
        .iter()
        .find(|(key, _)| s.starts_with(key))
        .map(|(key, field)| (*field, key.len()))
}

/// Parse the `[x] ` status bracket. Returns the status character, the
/// mapped status, and the rest of the line.
pub fn task_prefix(line: &str) -> Option<(char, Status, &str)> {
    let rest = line.strip_prefix('[')?;
    let status_char = rest.chars().next()?;
    if !status_char.is_ascii() {
        return None;
    }
    let status = Status::from_char(status_char)?;
    let rest = rest[1..].strip_prefix(']')?;
    let rest = rest.strip_prefix(' ')?;
    Some((status_char, status, rest))
}

// Skip a whitespace-delimited token; returns the position after it
fn skip_token(s: &str, pos: usize) -> usize {
    match s[pos..].find(' ') {
        Some(offset) => pos + offset,
        None => s.len(),
    }
}

/// Parse a complete task line (without the list marker). `dtstart`
/// anchors any recurrence rule. Returns None when the line carries no
/// status bracket.
pub fn parse_task_line(line: &str, dtstart: DateTime<Tz>) -> Option<TaskParts> {
    let (status_char, status, rest) = task_prefix(line)?;

    // The text ends at the first space introducing a recognized key
    let mut cut = rest.len();
    for (i, _) in rest.match_indices(' ') {
        if field_key_at(&rest[i + 1..]).is_some() {
            cut = i;
            break;
        }
    }
    let text = rest[..cut].to_string();

    let mut parts = TaskParts {
        status,
        status_char,
        text,
        due: None,
        scheduled: None,
        completed: None,
        priority: None,
        every: None,
    };

    let mut pos = cut;
    while pos < rest.len() {
        // Skip separating spaces
        pos += rest[pos..].chars().take_while(|&c| c == ' ').count();
        if pos >= rest.len() {
            break;
        }

        let (key, key_len) = match field_key_at(&rest[pos..]) {
            Some(found) => found,
            None => {
                // Not a field: the tolerant scan drops the token
                log::debug!("Dropping unrecognized task token");
                pos = skip_token(rest, pos);
                continue;
            }
        };
        let key_text = &rest[pos..pos + key_len];
        let value_start = pos + key_len;

        match key {
            FieldKey::Due | FieldKey::Scheduled | FieldKey::Completed => {
                match year_month_day(Span::new(&rest[value_start..])) {
                    Ok((rem, date)) => {
                        let slot = match key {
                            FieldKey::Due => &mut parts.due,
                            FieldKey::Scheduled => &mut parts.scheduled,
                            _ => &mut parts.completed,
                        };
                        if slot.is_none() {
                            *slot = Some(date);
                        }
                        pos = value_start + rem.location_offset();
                    }
                    Err(_) => {
                        log::debug!("Dropping task field with bad date: {}", key_text);
                        pos = skip_token(rest, value_start);
                    }
                }
            }
            FieldKey::Priority => {
                let digits = rest[value_start..]
                    .chars()
                    .take_while(|c| c.is_ascii_digit())
                    .count();
                let boundary_ok = rest[value_start + digits..]
                    .chars()
                    .next()
                    .is_none_or(|c| c == ' ');
                if digits > 0 && boundary_ok {
                    if let Ok(value) = rest[value_start..value_start + digits].parse::<u32>() {
                        if parts.priority.is_none() {
                            parts.priority = Some(value);
                        }
                        pos = value_start + digits;
                        continue;
                    }
                }
                log::debug!("Dropping task field with bad priority");
                pos = skip_token(rest, value_start);
            }
            FieldKey::Every => {
                match recurrence_expression(Span::new(&rest[value_start..])) {
                    Ok((rem, opts)) => {
                        let expr_len = rem.location_offset();
                        match build_rule(&opts, dtstart) {
                            Ok(rule) => {
                                if parts.every.is_none() {
                                    parts.every = Some(Recurrence {
                                        rule,
                                        text: format!(
                                            "{}{}",
                                            key_text,
                                            &rest[value_start..value_start + expr_len]
                                        ),
                                    });
                                }
                            }
                            Err(err) => {
                                // Builder failures degrade to a dropped
                                // field, never a parse error
                                log::debug!("Recurrence rule rejected: {}", err);
                            }
                        }
                        pos = value_start + expr_len;
                    }
                    Err(_) => {
                        log::debug!("Dropping task field with bad recurrence");
                        pos = skip_token(rest, value_start);
                    }
                }
            }
        }
    }

    Some(parts)
}
