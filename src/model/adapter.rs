// File: src/model/adapter.rs
use crate::error::RepairError;
use crate::model::event::{EventRecord, EventStamp};
use chrono::{NaiveDate, NaiveDateTime};
use icalendar::{Calendar, CalendarComponent, Component, Event, Property};

/// One parsed container block: the calendar itself (components cleared,
/// top-level properties intact) and its events flattened in document order.
#[derive(Debug)]
pub struct Extraction {
    pub shell: Calendar,
    pub records: Vec<EventRecord>,
}

/// Parses one container block via the grammar collaborator and flattens it.
///
/// Fails with `Parse` when the collaborator rejects the block; the caller
/// treats that as a per-block skip, not a fatal abort.
pub fn extract_events(block: &str) -> Result<Extraction, RepairError> {
    let calendar: Calendar = block
        .parse()
        .map_err(|e: String| RepairError::Parse(e.to_string()))?;

    let mut records = Vec::new();
    for component in &calendar.components {
        if let CalendarComponent::Event(ev) = component {
            records.push(EventRecord::from_event(&ev));
        }
    }

    let mut shell = calendar;
    shell.components.clear();
    Ok(Extraction { shell, records })
}

/// Pushes the repaired records back into the shell of the first parsed
/// block, so the output keeps that calendar's top-level properties.
pub fn rebuild_calendar(mut shell: Calendar, records: Vec<EventRecord>) -> Calendar {
    for record in records {
        shell.push(record.component);
    }
    shell
}

impl EventRecord {
    /// Reads the properties the repair logic cares about; everything else
    /// stays untouched on the cloned component. Total: absent or
    /// unparseable fields degrade to empty strings / `None` rather than
    /// failing the record.
    pub fn from_event(ev: &Event) -> Self {
        let uid = ev.get_uid().unwrap_or("").to_string();
        let summary = ev.get_summary().unwrap_or("").trim().to_string();
        let location = ev
            .properties()
            .get("LOCATION")
            .map(|p| p.value().trim().to_string())
            .unwrap_or_default();

        let start = ev.properties().get("DTSTART").and_then(stamp_from_prop);
        let end_prop = ev.properties().get("DTEND");
        let end_raw = end_prop.map(|p| p.value().to_string());
        let end = end_prop.and_then(stamp_from_prop);

        let rrule = ev.properties().get("RRULE").map(|p| p.value().to_string());
        let recurrence_id = ev
            .properties()
            .get("RECURRENCE-ID")
            .and_then(stamp_from_prop);

        Self {
            uid,
            summary,
            location,
            start,
            end,
            end_raw,
            rrule,
            recurrence_id,
            component: ev.clone(),
        }
    }
}

/// Parses a date/date-time property into a kind-preserving stamp.
///
/// Accepts the RFC 5545 basic forms: `YYYYMMDD` (or anything marked
/// VALUE=DATE) and `YYYYMMDDTHHMMSS` with optional trailing `Z` or TZID
/// parameter. Anything else yields `None`.
fn stamp_from_prop(prop: &Property) -> Option<EventStamp> {
    let val = prop.value().trim();

    let forced_date = prop
        .params()
        .get("VALUE")
        .is_some_and(|p| p.value().eq_ignore_ascii_case("DATE"));
    if forced_date || (val.len() == 8 && !val.contains('T')) {
        return NaiveDate::parse_from_str(val, "%Y%m%d")
            .ok()
            .map(EventStamp::AllDay);
    }

    if let Some(stripped) = val.strip_suffix('Z') {
        return NaiveDateTime::parse_from_str(stripped, "%Y%m%dT%H%M%S")
            .ok()
            .map(|time| EventStamp::Timed {
                time,
                zone: Some("UTC".to_string()),
            });
    }

    let zone = prop.params().get("TZID").map(|p| p.value().to_string());
    NaiveDateTime::parse_from_str(val, "%Y%m%dT%H%M%S")
        .ok()
        .map(|time| EventStamp::Timed { time, zone })
}
