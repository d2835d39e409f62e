// File: src/model/series.rs
//! Clusters occurrences into series and unifies their identifiers.
use crate::model::event::{EventRecord, SeriesKey};
use std::collections::HashMap;

/// A nonempty set of occurrences sharing one fingerprint.
#[derive(Debug)]
pub struct SeriesCluster {
    pub key: SeriesKey,
    pub members: Vec<EventRecord>,
}

/// Partitions records into clusters keyed by fingerprint.
///
/// Cluster order is insertion order of the first-seen fingerprint and
/// member order is the original record order, so output is reproducible.
/// Total over any input: records with absent or unparseable descriptive
/// fields fingerprint on empty strings instead of failing.
pub fn group_into_series(records: Vec<EventRecord>) -> Vec<SeriesCluster> {
    let mut clusters: Vec<SeriesCluster> = Vec::new();
    let mut index: HashMap<SeriesKey, usize> = HashMap::new();

    for record in records {
        let key = record.series_key();
        match index.get(&key) {
            Some(&slot) => clusters[slot].members.push(record),
            None => {
                index.insert(key.clone(), clusters.len());
                clusters.push(SeriesCluster {
                    key,
                    members: vec![record],
                });
            }
        }
    }

    clusters
}

/// Rewrites every member of each cluster to the master's identifier, in
/// place. The master is the first member (original order) carrying a
/// recurrence rule.
///
/// Clusters without any rule-bearing member are left untouched: one-off
/// events with coincidentally equal fingerprints must not be merged under
/// one identifier.
pub fn unify_identifiers(clusters: &mut [SeriesCluster]) {
    for cluster in clusters.iter_mut() {
        let Some(master_idx) = cluster.members.iter().position(EventRecord::has_rrule) else {
            continue;
        };

        if cluster.members.iter().filter(|m| m.has_rrule()).count() > 1 {
            log::debug!(
                "series '{}' has multiple rule-bearing occurrences; keeping the first",
                cluster.key.summary
            );
        }

        let mut master_uid = cluster.members[master_idx].uid.clone();
        if master_uid.is_empty() {
            master_uid = fallback_uid(&cluster.key);
        }

        for member in &mut cluster.members {
            member.set_uid(&master_uid);
        }
    }
}

/// Deterministic identifier for a master occurrence that carries none.
/// Derived from the fingerprint so repeated runs agree on it.
fn fallback_uid(key: &SeriesKey) -> String {
    let base = format!("{}-{}-{}", key.summary, key.location, key.span.token())
        .replace(' ', "_")
        .to_lowercase();
    format!("{}@icsmend.local", base)
}
