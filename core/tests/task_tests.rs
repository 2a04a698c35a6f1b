// Task grammar end-to-end: statuses, fields, recurrence semantics.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use notedown_core::ast::{Block, Status};
use notedown_core::grammar::task::recurrence::recurrence_expression;
use notedown_core::grammar::Span;
use notedown_core::parse;
use pretty_assertions::assert_eq;

fn reference() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap()
}

fn single_task(input: &str) -> notedown_core::TaskListItem {
    let doc = parse(input, reference()).unwrap();
    let tasks = doc.tasks();
    assert_eq!(tasks.len(), 1, "expected one task in {:?}", input);
    tasks[0].clone()
}

#[test]
fn statuses_map_to_the_bracket_character() {
    let cases = [
        ("- [ ] t\n", Status::Todo, ' '),
        ("- [x] t\n", Status::Done, 'x'),
        ("- [X] t\n", Status::Done, 'X'),
        ("- [/] t\n", Status::Doing, '/'),
        ("- [b] t\n", Status::Blocked, 'b'),
        ("- [B] t\n", Status::Blocked, 'B'),
        ("- [a] t\n", Status::Abandoned, 'a'),
        ("- [A] t\n", Status::Abandoned, 'A'),
    ];
    for (input, status, status_char) in cases {
        let task = single_task(input);
        assert_eq!(task.status, status, "input {:?}", input);
        assert_eq!(task.status_char, status_char, "input {:?}", input);
    }
}

#[test]
fn unknown_status_is_not_a_task() {
    let doc = parse("- [q] not a task\n", reference()).unwrap();
    assert!(doc.tasks().is_empty());
    assert!(matches!(doc.children[0], Block::UnorderedList(_)));
}

#[test]
fn status_without_trailing_space_is_not_a_task() {
    let doc = parse("- [x]tight\n", reference()).unwrap();
    assert!(doc.tasks().is_empty());
}

#[test]
fn fields_are_order_independent() {
    let a = single_task("- [ ] t due:2021-03-01 priority:2\n");
    let b = single_task("- [ ] t priority:2 due:2021-03-01\n");
    assert_eq!(a.due, b.due);
    assert_eq!(a.priority, b.priority);
}

#[test]
fn each_field_appears_at_most_once() {
    let task = single_task("- [ ] t due:2021-01-02 due:2021-09-09 priority:1 priority:7\n");
    assert_eq!(task.due, NaiveDate::from_ymd_opt(2021, 1, 2));
    assert_eq!(task.priority, Some(1));
}

#[test]
fn bad_field_values_are_dropped() {
    let task = single_task("- [ ] t due:soon scheduled:2021-04-01\n");
    assert_eq!(task.due, None);
    assert_eq!(task.scheduled, NaiveDate::from_ymd_opt(2021, 4, 1));
}

#[test]
fn short_keys_parse_and_normalize() {
    let task = single_task("- [ ] t d:2021-02-03 p:4\n");
    assert_eq!(task.due, NaiveDate::from_ymd_opt(2021, 2, 3));
    assert_eq!(task.priority, Some(4));
    // Serialization is canonical
    assert_eq!(task.markdown(), "- [ ] t due:2021-02-03 priority:4");
}

#[test]
fn recurrence_expressions_build_expected_rules() {
    let cases = [
        ("every:day", "FREQ=DAILY"),
        ("every:week", "FREQ=WEEKLY"),
        ("every:month", "FREQ=MONTHLY"),
        ("every:year", "FREQ=YEARLY"),
        ("every:2 weeks", "INTERVAL=2"),
        ("every:weekday", "FREQ=WEEKLY"),
        ("every:weekend", "FREQ=WEEKLY"),
        ("every:mon wed fri", "FREQ=WEEKLY"),
        ("every:1st 15th jan", "FREQ=YEARLY"),
    ];
    for (field, needle) in cases {
        let input = format!("- [ ] t {}\n", field);
        let task = single_task(&input);
        let every = task.every.as_ref().unwrap_or_else(|| {
            panic!("no recurrence parsed for {:?}", field);
        });
        assert_eq!(every.text, field);
        assert!(
            every.rule.to_string().contains(needle),
            "rule {:?} missing {:?} for {:?}",
            every.rule.to_string(),
            needle,
            field
        );
    }
}

#[test]
fn recurrence_literal_reparses_to_the_same_rule() {
    let inputs = [
        "- [ ] t every:day\n",
        "- [ ] t every:2 months\n",
        "- [ ] t every:mon thu\n",
        "- [ ] t every:12th mar sep\n",
        "- [ ] t every:weekend\n",
    ];
    for input in inputs {
        let task = single_task(input);
        let every = task.every.as_ref().unwrap();

        // Re-parse the literal expression (sans key) and compare the
        // resulting option sets via their rule text
        let expr = every.text.split_once(':').unwrap().1;
        let (_, reparsed) = recurrence_expression(Span::new(expr)).unwrap();
        let rebuilt = notedown_core::grammar::task::recurrence::build_rule(
            &reparsed,
            reference().with_timezone(&rrule::Tz::UTC),
        )
        .unwrap();
        assert_eq!(rebuilt.to_string(), every.rule.to_string(), "{:?}", input);
    }
}

#[test]
fn task_text_stops_before_first_field_key() {
    let task = single_task("- [ ] pay rent before due:2021-06-01\n");
    assert_eq!(task.text, "pay rent before");
    assert_eq!(task.due, NaiveDate::from_ymd_opt(2021, 6, 1));
}

#[test]
fn key_like_words_without_values_stay_in_text() {
    let task = single_task("- [ ] discuss overdue:2021 items\n");
    assert_eq!(task.text, "discuss overdue:2021 items");
}

#[test]
fn nested_children_survive_promotion() {
    let input = "- [ ] parent\n  child paragraph\n";
    let task = single_task(input);
    assert_eq!(task.text, "parent");
    assert_eq!(task.children.len(), 1);
    match &task.children[0] {
        Block::Paragraph(p) => assert_eq!(p.text, "child paragraph"),
        other => panic!("expected paragraph, got {:?}", other),
    }
    let doc = parse(input, reference()).unwrap();
    assert_eq!(doc.markdown(), input);
}

#[test]
fn ordered_items_are_never_tasks() {
    let doc = parse("1. [ ] looks like a task\n", reference()).unwrap();
    assert!(doc.tasks().is_empty());
    assert!(matches!(doc.children[0], Block::OrderedList(_)));
}
