//! Archive records and their per-request aggregate.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt::Display;

use super::channel::ChannelKind;
use super::slot::Slot;

/// Destination reported when a submission contains no URL.
pub const URL_NOT_FOUND: &str = "URL no found";

/// Outcome of archiving one URL in one slot.
///
/// `destination` holds the archived location, or a human-readable reason when
/// the slot could not archive `source`. It is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot: Option<Slot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<&'static str>,
    pub source: String,
    pub destination: String,
}

impl ArchiveRecord {
    /// Creates a record for a destination returned by a broker.
    ///
    /// A blank destination is replaced by an explanation so the record never
    /// reports success without a location.
    pub fn archived(slot: Slot, source: impl Into<String>, destination: impl Into<String>) -> Self {
        let destination = destination.into();
        if destination.trim().is_empty() {
            return Self::failed(slot, source, format!("{} returned an empty result", slot.name()));
        }

        Self {
            slot: Some(slot),
            extra: Some(slot.extra()),
            source: source.into(),
            destination,
        }
    }

    /// Creates a record explaining why `source` could not be archived.
    pub fn failed(slot: Slot, source: impl Into<String>, reason: impl Into<String>) -> Self {
        let mut reason = reason.into();
        if reason.trim().is_empty() {
            reason = format!("{} failed without a reason", slot.name());
        }

        Self {
            slot: Some(slot),
            extra: Some(slot.extra()),
            source: source.into(),
            destination: reason,
        }
    }

    /// Sentinel record for a submission with no extractable URL.
    pub fn url_not_found(text: impl Into<String>) -> Self {
        Self {
            slot: None,
            extra: None,
            source: text.into(),
            destination: URL_NOT_FOUND.to_string(),
        }
    }

    /// Display name of the slot, empty for the sentinel record.
    pub fn slot_name(&self) -> &'static str {
        self.slot.map(Slot::name).unwrap_or_default()
    }

    /// Whether `destination` looks like an archived location rather than an explanation.
    pub fn is_archived(&self) -> bool {
        self.slot.is_some()
            && (self.destination.starts_with("http://") || self.destination.starts_with("https://"))
    }
}

/// Converts one broker response into exactly one record per submitted URL.
///
/// Entries for URLs that were not submitted are ignored; submitted URLs the
/// broker left out get a failure record.
pub fn slot_records<E: Display>(
    slot: Slot,
    urls: &[String],
    outcome: Result<HashMap<String, String>, E>,
) -> Vec<ArchiveRecord> {
    match outcome {
        Ok(mut results) => urls
            .iter()
            .map(|url| match results.remove(url) {
                Some(destination) => ArchiveRecord::archived(slot, url, destination),
                None => {
                    ArchiveRecord::failed(slot, url, format!("{} returned no result", slot.name()))
                }
            })
            .collect(),
        Err(e) => {
            let reason = format!("{}: {}", slot.name(), e);
            urls.iter()
                .map(|url| ArchiveRecord::failed(slot, url, reason.clone()))
                .collect()
        }
    }
}

/// Ordered collection of archive records for one submission.
///
/// Ordered by slot, then by URL submission order within a slot. Holds at
/// most one record per (slot, source).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AggregateResult {
    records: Vec<ArchiveRecord>,
}

impl AggregateResult {
    /// Aggregate holding only the "URL not found" sentinel.
    pub fn url_not_found(text: impl Into<String>) -> Self {
        Self {
            records: vec![ArchiveRecord::url_not_found(text)],
        }
    }

    /// Merges the private per-slot slices produced by the dispatch workers.
    ///
    /// Input order does not matter; the result is sorted by slot and keeps
    /// the first record seen for a duplicated (slot, source) pair.
    pub fn merge<I>(parts: I) -> Self
    where
        I: IntoIterator<Item = (Slot, Vec<ArchiveRecord>)>,
    {
        let mut parts: Vec<_> = parts.into_iter().collect();
        parts.sort_by_key(|(slot, _)| *slot);

        let mut seen = HashSet::new();
        let records = parts
            .into_iter()
            .flat_map(|(_, records)| records)
            .filter(|record| seen.insert((record.slot, record.source.clone())))
            .collect();

        Self { records }
    }

    pub fn records(&self) -> &[ArchiveRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ArchiveRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether this aggregate is the "URL not found" short-circuit.
    pub fn is_url_not_found(&self) -> bool {
        matches!(self.records.as_slice(), [only] if only.slot.is_none())
    }

    /// Records that belong to `slot`.
    pub fn for_slot(&self, slot: Slot) -> impl Iterator<Item = &ArchiveRecord> {
        self.records.iter().filter(move |r| r.slot == Some(slot))
    }

    /// Distinct slots present, in order.
    pub fn slots(&self) -> Vec<Slot> {
        let mut slots: Vec<Slot> = self.records.iter().filter_map(|r| r.slot).collect();
        slots.dedup();
        slots
    }
}

impl<'a> IntoIterator for &'a AggregateResult {
    type Item = &'a ArchiveRecord;
    type IntoIter = std::slice::Iter<'a, ArchiveRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Delivery result of one channel for one publish job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishOutcome {
    pub channel: ChannelKind,
    pub delivered: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_slot_records_one_per_url() {
        let submitted = urls(&["https://a.example/", "https://b.example/"]);
        let mut results = HashMap::new();
        results.insert(
            "https://a.example/".to_string(),
            "https://web.archive.org/a".to_string(),
        );
        results.insert(
            "https://not-submitted.example/".to_string(),
            "https://web.archive.org/x".to_string(),
        );

        let records = slot_records::<String>(Slot::InternetArchive, &submitted, Ok(results));

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].source, "https://a.example/");
        assert_eq!(records[0].destination, "https://web.archive.org/a");
        assert!(records[0].is_archived());
        assert_eq!(records[1].source, "https://b.example/");
        assert_eq!(records[1].destination, "Internet Archive returned no result");
        assert!(!records[1].is_archived());
    }

    #[test]
    fn test_slot_records_error_covers_every_url() {
        let submitted = urls(&["https://a.example/", "https://b.example/"]);

        let records = slot_records(Slot::Ipfs, &submitted, Err("pin timed out"));

        assert_eq!(records.len(), 2);
        for record in &records {
            assert_eq!(record.slot, Some(Slot::Ipfs));
            assert_eq!(record.destination, "IPFS: pin timed out");
        }
    }

    #[test]
    fn test_empty_destination_is_explained() {
        let record = ArchiveRecord::archived(Slot::Telegraph, "https://a.example/", "  ");
        assert_eq!(record.destination, "Telegraph returned an empty result");

        let record = ArchiveRecord::failed(Slot::Telegraph, "https://a.example/", "");
        assert!(!record.destination.is_empty());
    }

    #[test]
    fn test_merge_orders_by_slot_regardless_of_completion_order() {
        let a = vec![ArchiveRecord::archived(Slot::Ipfs, "https://a.example/", "https://ipfs.io/a")];
        let b = vec![ArchiveRecord::archived(
            Slot::InternetArchive,
            "https://a.example/",
            "https://web.archive.org/a",
        )];

        let forward = AggregateResult::merge(vec![
            (Slot::InternetArchive, b.clone()),
            (Slot::Ipfs, a.clone()),
        ]);
        let reversed = AggregateResult::merge(vec![(Slot::Ipfs, a), (Slot::InternetArchive, b)]);

        assert_eq!(forward, reversed);
        assert_eq!(forward.slots(), vec![Slot::InternetArchive, Slot::Ipfs]);
    }

    #[test]
    fn test_merge_drops_duplicate_pairs() {
        let first = ArchiveRecord::archived(Slot::InternetArchive, "https://a.example/", "https://x/1");
        let second = ArchiveRecord::archived(Slot::InternetArchive, "https://a.example/", "https://x/2");

        let merged = AggregateResult::merge(vec![
            (Slot::InternetArchive, vec![first.clone()]),
            (Slot::InternetArchive, vec![second]),
        ]);

        assert_eq!(merged.records(), &[first]);
    }

    #[test]
    fn test_url_not_found_sentinel() {
        let aggregate = AggregateResult::url_not_found("no url here");

        assert!(aggregate.is_url_not_found());
        assert_eq!(aggregate.len(), 1);
        assert_eq!(aggregate.records()[0].destination, URL_NOT_FOUND);
        assert_eq!(aggregate.records()[0].source, "no url here");
        assert_eq!(aggregate.records()[0].slot_name(), "");
    }

    #[test]
    fn test_aggregate_serializes_as_array() {
        let aggregate = AggregateResult::merge(vec![(
            Slot::InternetArchive,
            vec![ArchiveRecord::archived(
                Slot::InternetArchive,
                "https://example.com/",
                "https://web.archive.org/web/1/https://example.com/",
            )],
        )]);

        let json = serde_json::to_value(&aggregate).unwrap();
        assert_eq!(json[0]["slot"], "ia");
        assert_eq!(json[0]["extra"], "https://web.archive.org/");
        assert_eq!(json[0]["source"], "https://example.com/");

        let sentinel = serde_json::to_value(AggregateResult::url_not_found("x")).unwrap();
        assert!(sentinel[0].get("slot").is_none());
        assert_eq!(sentinel[0]["destination"], URL_NOT_FOUND);
    }
}
