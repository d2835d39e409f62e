// File: src/model/merge.rs
//! Builds the final collection: each (identifier, stamp) pair at most once.
use crate::model::event::{EventRecord, EventStamp};
use crate::model::series::SeriesCluster;
use crate::report::RunReporter;
use std::collections::HashSet;

/// Flattens the clusters back into one ordered sequence, admitting each
/// (identifier, stamp) pair only once. First seen wins; later exact
/// duplicates are dropped silently.
///
/// Stamp comparison respects the value kind: a date-only stamp and a
/// date-time stamp never count as the same occurrence, even on the same
/// calendar day. Records without a start cannot be keyed and are dropped
/// with a warning. Total over any input; never fails.
pub fn merge_deduplicated(
    clusters: Vec<SeriesCluster>,
    reporter: &mut dyn RunReporter,
) -> Vec<EventRecord> {
    let mut seen: HashSet<(String, EventStamp)> = HashSet::new();
    let mut admitted = Vec::new();

    for cluster in clusters {
        for record in cluster.members {
            let Some(stamp) = record.dedup_stamp() else {
                reporter.warn(&format!(
                    "skipping event '{}': no usable DTSTART",
                    record.summary
                ));
                continue;
            };

            if seen.insert((record.uid.clone(), stamp)) {
                admitted.push(record);
            }
        }
    }

    admitted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::event::{SeriesKey, SpanKey};
    use crate::model::series::group_into_series;
    use crate::report::MemoryReporter;
    use chrono::NaiveDate;
    use icalendar::Event;

    fn record(uid: &str, start: Option<EventStamp>) -> EventRecord {
        EventRecord {
            uid: uid.to_string(),
            summary: "Standup".to_string(),
            location: String::new(),
            start,
            end: None,
            end_raw: None,
            rrule: None,
            recurrence_id: None,
            component: Event::new(),
        }
    }

    fn cluster_of(records: Vec<EventRecord>) -> Vec<SeriesCluster> {
        group_into_series(records)
    }

    fn date(day: u32) -> EventStamp {
        EventStamp::AllDay(NaiveDate::from_ymd_opt(2024, 1, day).unwrap())
    }

    fn midnight(day: u32) -> EventStamp {
        EventStamp::Timed {
            time: NaiveDate::from_ymd_opt(2024, 1, day)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            zone: None,
        }
    }

    #[test]
    fn test_exact_repeats_are_dropped() {
        let mut reporter = MemoryReporter::new();
        let finals = merge_deduplicated(
            cluster_of(vec![
                record("uid", Some(date(1))),
                record("uid", Some(date(1))),
                record("uid", Some(date(2))),
            ]),
            &mut reporter,
        );
        assert_eq!(finals.len(), 2);
    }

    #[test]
    fn test_date_and_datetime_midnight_both_retained() {
        // Same UID, same calendar day, but distinct value kinds. This is
        // the boundary the repair must preserve, not silently coerce.
        let mut reporter = MemoryReporter::new();
        let finals = merge_deduplicated(
            cluster_of(vec![
                record("uid", Some(date(1))),
                record("uid", Some(midnight(1))),
            ]),
            &mut reporter,
        );
        assert_eq!(finals.len(), 2);
    }

    #[test]
    fn test_startless_records_dropped_with_warning() {
        let mut reporter = MemoryReporter::new();
        let finals = merge_deduplicated(
            cluster_of(vec![record("uid", None), record("uid", Some(date(1)))]),
            &mut reporter,
        );
        assert_eq!(finals.len(), 1);
        assert_eq!(reporter.warnings.len(), 1);
        assert!(reporter.warnings[0].contains("no usable DTSTART"));
    }

    #[test]
    fn test_recurrence_id_takes_the_dedup_slot() {
        let mut reporter = MemoryReporter::new();
        let mut moved = record("uid", Some(midnight(1)));
        moved.recurrence_id = Some(midnight(8));
        let regular = record("uid", Some(midnight(1)));

        // Same UID and DTSTART, but the moved instance keys on its
        // RECURRENCE-ID, so both survive.
        let finals = merge_deduplicated(cluster_of(vec![moved, regular]), &mut reporter);
        assert_eq!(finals.len(), 2);
    }

    #[test]
    fn test_first_seen_record_wins() {
        let mut reporter = MemoryReporter::new();
        let mut first = record("uid", Some(date(1)));
        first.location = "kept".to_string();
        let mut second = record("uid", Some(date(1)));
        second.location = "dropped".to_string();

        // Fingerprints differ (location), so these land in separate
        // clusters, but the dedup key is (uid, stamp) and the first
        // cluster flattens first.
        let finals = merge_deduplicated(
            vec![
                SeriesCluster {
                    key: SeriesKey {
                        summary: "Standup".to_string(),
                        location: "kept".to_string(),
                        span: SpanKey::Open,
                    },
                    members: vec![first],
                },
                SeriesCluster {
                    key: SeriesKey {
                        summary: "Standup".to_string(),
                        location: "dropped".to_string(),
                        span: SpanKey::Open,
                    },
                    members: vec![second],
                },
            ],
            &mut reporter,
        );
        assert_eq!(finals.len(), 1);
        assert_eq!(finals[0].location, "kept");
    }
}
