// Scenario tests for the pure repair pipeline (no filesystem involved).
use icsmend::model::adapter::extract_events;
use icsmend::model::{EventRecord, EventStamp};
use icsmend::repair::repair_text;
use icsmend::report::MemoryReporter;

fn concatenated_standup_export() -> String {
    r#"BEGIN:VCALENDAR
VERSION:2.0
PRODID:-//Broken Exporter//EN
BEGIN:VEVENT
UID:UID-A
SUMMARY:Standup
LOCATION:Room A
DTSTART:20240108T090000Z
DTEND:20240108T093000Z
RRULE:FREQ=WEEKLY;BYDAY=MO
END:VEVENT
END:VCALENDAR
BEGIN:VCALENDAR
VERSION:2.0
PRODID:-//Broken Exporter//EN
BEGIN:VEVENT
UID:UID-B
SUMMARY:Standup
LOCATION:Room A
DTSTART:20240115T090000Z
DTEND:20240115T093000Z
END:VEVENT
END:VCALENDAR
"#
    .to_string()
}

/// Parses repaired output back into records, via the same adapter the
/// pipeline uses, so assertions work on typed fields.
fn reparse(output: &str) -> Vec<EventRecord> {
    extract_events(output).expect("repaired output must parse").records
}

#[test]
fn test_concatenated_containers_unify_under_master_uid() {
    let mut reporter = MemoryReporter::new();
    let repaired = repair_text(&concatenated_standup_export(), &mut reporter)
        .unwrap()
        .to_string();

    let records = reparse(&repaired);
    assert_eq!(records.len(), 2, "both occurrences must survive: {}", repaired);
    assert!(records.iter().all(|r| r.uid == "UID-A"));
    assert!(!repaired.contains("UID-B"));

    // Distinct starts, so nothing was deduplicated.
    assert_ne!(records[0].start, records[1].start);
}

#[test]
fn test_date_only_and_datetime_midnight_both_survive() {
    let raw = r#"BEGIN:VCALENDAR
VERSION:2.0
BEGIN:VEVENT
UID:new-year
SUMMARY:New Year
DTSTART;VALUE=DATE:20240101
END:VEVENT
BEGIN:VEVENT
UID:new-year
SUMMARY:New Year
DTSTART:20240101T000000
END:VEVENT
END:VCALENDAR
"#;

    let mut reporter = MemoryReporter::new();
    let repaired = repair_text(raw, &mut reporter).unwrap().to_string();

    let records = reparse(&repaired);
    assert_eq!(
        records.len(),
        2,
        "date-only vs date-time midnight are distinct kinds: {}",
        repaired
    );
    assert!(records.iter().any(|r| matches!(r.start, Some(EventStamp::AllDay(_)))));
    assert!(records.iter().any(|r| matches!(r.start, Some(EventStamp::Timed { .. }))));
}

#[test]
fn test_non_recurring_lookalikes_keep_their_uids() {
    let raw = r#"BEGIN:VCALENDAR
VERSION:2.0
BEGIN:VEVENT
UID:one
SUMMARY:Lunch
DTSTART:20240101T120000Z
END:VEVENT
BEGIN:VEVENT
UID:two
SUMMARY:Lunch
DTSTART:20240102T120000Z
END:VEVENT
BEGIN:VEVENT
UID:three
SUMMARY:Lunch
DTSTART:20240103T120000Z
END:VEVENT
END:VCALENDAR
"#;

    let mut reporter = MemoryReporter::new();
    let repaired = repair_text(raw, &mut reporter).unwrap().to_string();

    let mut uids: Vec<String> = reparse(&repaired).into_iter().map(|r| r.uid).collect();
    uids.sort();
    assert_eq!(uids, vec!["one", "three", "two"]);
}

#[test]
fn test_exact_repeats_are_dropped_silently() {
    let raw = r#"BEGIN:VCALENDAR
VERSION:2.0
BEGIN:VEVENT
UID:dup
SUMMARY:Sync
DTSTART:20240101T100000Z
END:VEVENT
BEGIN:VEVENT
UID:dup
SUMMARY:Sync
DTSTART:20240101T100000Z
END:VEVENT
END:VCALENDAR
"#;

    let mut reporter = MemoryReporter::new();
    let repaired = repair_text(raw, &mut reporter).unwrap().to_string();

    assert_eq!(reparse(&repaired).len(), 1);
    // Duplicates are expected input, not an error condition.
    assert!(reporter.errors.is_empty());
}

#[test]
fn test_final_collection_never_repeats_a_signature() {
    let mut reporter = MemoryReporter::new();
    let raw = concatenated_standup_export().repeat(3);
    let repaired = repair_text(&raw, &mut reporter).unwrap().to_string();

    let records = reparse(&repaired);
    let signatures: std::collections::HashSet<(String, Option<EventStamp>)> = records
        .iter()
        .map(|r| (r.uid.clone(), r.dedup_stamp()))
        .collect();
    assert_eq!(signatures.len(), records.len(), "duplicate (uid, start) admitted");
}

#[test]
fn test_pipeline_is_idempotent() {
    let mut reporter = MemoryReporter::new();
    let first = repair_text(&concatenated_standup_export(), &mut reporter)
        .unwrap()
        .to_string();
    let second = repair_text(&first, &mut reporter).unwrap().to_string();

    let collection = |output: &str| -> Vec<(String, Option<EventStamp>, String)> {
        reparse(output)
            .into_iter()
            .map(|r| (r.uid.clone(), r.dedup_stamp(), r.summary.clone()))
            .collect()
    };
    assert_eq!(collection(&first), collection(&second));
}

#[test]
fn test_unparseable_block_is_skipped_not_fatal() {
    // First block never closes its VEVENT, second is fine.
    let raw = r#"BEGIN:VCALENDAR
VERSION:2.0
BEGIN:VEVENT
UID:lost
END:VCALENDAR
BEGIN:VCALENDAR
VERSION:2.0
BEGIN:VEVENT
UID:kept
SUMMARY:Survivor
DTSTART:20240101T100000Z
END:VEVENT
END:VCALENDAR
"#;

    let mut reporter = MemoryReporter::new();
    let repaired = repair_text(raw, &mut reporter).unwrap().to_string();

    let records = reparse(&repaired);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].uid, "kept");
    assert_eq!(reporter.warnings.len(), 1, "block skip must be reported");
}

#[test]
fn test_event_free_calendar_still_repairs() {
    let raw = "BEGIN:VCALENDAR\nVERSION:2.0\nPRODID:-//Empty//EN\nEND:VCALENDAR\n";
    let mut reporter = MemoryReporter::new();
    let repaired = repair_text(raw, &mut reporter).unwrap().to_string();
    assert!(reparse(&repaired).is_empty());
}

#[test]
fn test_calendar_name_survives_the_repair() {
    let raw = "BEGIN:VCALENDAR\nVERSION:2.0\nX-WR-CALNAME:Team Calendar\nBEGIN:VEVENT\nUID:a\nSUMMARY:Keep\nDTSTART:20240101T100000Z\nEND:VEVENT\nEND:VCALENDAR\n";
    let mut reporter = MemoryReporter::new();
    let repaired = repair_text(raw, &mut reporter).unwrap().to_string();
    assert!(repaired.contains("X-WR-CALNAME:Team Calendar"));
}
