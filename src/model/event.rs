// File: src/model/event.rs
use chrono::{Duration, NaiveDate, NaiveDateTime};
use icalendar::{Component, Event};

// --- STAMP KINDS ---

/// A point in time as carried by DTSTART / DTEND / RECURRENCE-ID.
///
/// Date-only and date-time values are distinct kinds and never compare
/// equal, even when they name the same calendar day. Broken exporters mix
/// the two for what is conceptually the same occurrence; preserving the
/// distinction (instead of silently coercing) is deliberate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventStamp {
    AllDay(NaiveDate),
    Timed {
        time: NaiveDateTime,
        /// "UTC" for `...Z` values, the TZID parameter otherwise,
        /// `None` for floating times.
        zone: Option<String>,
    },
}

// --- SERIES FINGERPRINT ---

/// Third fingerprint element: the event's extent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SpanKey {
    /// End minus start, in seconds; defined only when both stamps share a
    /// kind.
    Length(i64),
    /// An end exists but the duration is undefined (kind mismatch, or no
    /// start to subtract from); fall back to comparing the raw value.
    RawEnd(String),
    /// No end at all.
    Open,
}

impl SpanKey {
    /// Short stable token used when deriving a fallback identifier.
    pub fn token(&self) -> String {
        match self {
            SpanKey::Length(secs) => format!("{}s", secs),
            SpanKey::RawEnd(raw) => raw.clone(),
            SpanKey::Open => "open".to_string(),
        }
    }
}

/// Structural key that clusters occurrences into a series without relying
/// on their (possibly inconsistent) UIDs. Grouping uses exact tuple
/// equality only, so fingerprint equality is an equivalence relation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesKey {
    pub summary: String,
    pub location: String,
    pub span: SpanKey,
}

// --- EVENT RECORD ---

/// One calendar occurrence, with typed access to the properties the repair
/// logic needs and the parsed component kept as an opaque pass-through bag
/// for everything else.
#[derive(Debug, Clone)]
pub struct EventRecord {
    pub uid: String,
    pub summary: String,
    pub location: String,
    pub start: Option<EventStamp>,
    pub end: Option<EventStamp>,
    /// Raw DTEND value, kept for the fingerprint fallback when the
    /// duration is undefined.
    pub end_raw: Option<String>,
    /// RRULE value; presence marks the record as an eligible master.
    pub rrule: Option<String>,
    pub recurrence_id: Option<EventStamp>,
    /// The unmodified parsed component. All properties not mirrored above
    /// ride along here and are written back as-is.
    pub component: Event,
}

impl EventRecord {
    pub fn has_rrule(&self) -> bool {
        self.rrule.is_some()
    }

    /// Rewrites the identifier, both on the record and on the underlying
    /// component, so serialization picks it up.
    pub fn set_uid(&mut self, uid: &str) {
        self.uid = uid.to_string();
        self.component.uid(uid);
    }

    /// End minus start when both exist and share a kind; undefined
    /// otherwise. Timed stamps subtract as wall-clock values (timezone
    /// normalization is out of scope).
    pub fn duration(&self) -> Option<Duration> {
        match (self.start.as_ref()?, self.end.as_ref()?) {
            (EventStamp::AllDay(start), EventStamp::AllDay(end)) => Some(*end - *start),
            (EventStamp::Timed { time: start, .. }, EventStamp::Timed { time: end, .. }) => {
                Some(*end - *start)
            }
            _ => None,
        }
    }

    /// The series fingerprint: (summary, location, duration-or-end-marker).
    pub fn series_key(&self) -> SeriesKey {
        let span = match self.duration() {
            Some(d) => SpanKey::Length(d.num_seconds()),
            None => match &self.end_raw {
                Some(raw) => SpanKey::RawEnd(raw.clone()),
                None => SpanKey::Open,
            },
        };
        SeriesKey {
            summary: self.summary.clone(),
            location: self.location.clone(),
            span,
        }
    }

    /// Stamp used for final-collection uniqueness. Requires a start;
    /// RECURRENCE-ID takes precedence so a moved instance of a recurring
    /// series keeps its own slot.
    pub fn dedup_stamp(&self) -> Option<EventStamp> {
        self.start.as_ref()?;
        self.recurrence_id.clone().or_else(|| self.start.clone())
    }
}
