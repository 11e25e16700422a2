//! Label index built from RXNCONSO.RRF.
//!
//! Maps an RXCUI to its display string, either the primary one or the first
//! one recorded under a preferred term type.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Serialize;

use super::{ConceptRow, RrfReader, RrfResult};
use crate::models::ResolvedConcept;

/// Row counters from building a label index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LabelIndexStats {
    pub rows_read: u64,
    pub rows_short: u64,
    pub rows_filtered: u64,
    pub rows_indexed: u64,
}

#[derive(Debug, Clone)]
struct PrimaryLabel {
    tty: String,
    name: String,
}

/// RXCUI → label lookups. Built once, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct LabelIndex {
    /// One label per RXCUI
    primary: HashMap<String, PrimaryLabel>,
    /// RXCUI → TTY → display strings in scan order
    by_tty: HashMap<String, HashMap<String, Vec<String>>>,
    stats: LabelIndexStats,
}

impl LabelIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from an RXNCONSO.RRF file.
    pub fn load<P: AsRef<Path>>(path: P) -> RrfResult<Self> {
        let mut reader = RrfReader::open(path)?;
        Self::build(&mut reader)
    }

    /// Build the index from in-memory or streamed RXNCONSO content.
    pub fn from_reader<R: Read>(reader: R) -> RrfResult<Self> {
        let mut reader = RrfReader::from_reader(reader, "RXNCONSO");
        Self::build(&mut reader)
    }

    /// Build the index from an open RRF reader.
    pub fn build<R: Read>(reader: &mut RrfReader<R>) -> RrfResult<Self> {
        let mut index = Self::new();
        let rows_read = reader.for_each_record(|record| {
            match ConceptRow::from_record(record) {
                None => index.stats.rows_short += 1,
                Some(row) if !row.is_eligible() => index.stats.rows_filtered += 1,
                Some(row) => index.insert(&row),
            }
        })?;
        index.stats.rows_read = rows_read;

        log::info!(
            "Indexed {} labels for {} RXCUIs from {}",
            index.stats.rows_indexed,
            index.len(),
            reader.source()
        );
        log::debug!("Label index row counters: {:?}", index.stats);
        Ok(index)
    }

    /// Record one eligible concept row.
    ///
    /// The first row for an RXCUI sets its primary label; a preferred row
    /// always replaces it, so among several preferred rows the last wins.
    pub fn insert(&mut self, row: &ConceptRow<'_>) {
        self.by_tty
            .entry(row.rxcui.to_string())
            .or_default()
            .entry(row.tty.to_string())
            .or_default()
            .push(row.name.to_string());

        if row.preferred || !self.primary.contains_key(row.rxcui) {
            self.primary.insert(
                row.rxcui.to_string(),
                PrimaryLabel {
                    tty: row.tty.to_string(),
                    name: row.name.to_string(),
                },
            );
        }
        self.stats.rows_indexed += 1;
    }

    /// Resolve an RXCUI, trying each TTY in `prefer` before the primary label.
    ///
    /// A missing or empty RXCUI resolves to an all-empty concept; an RXCUI the
    /// index has never seen keeps its identifier only.
    pub fn resolve(&self, rxcui: Option<&str>, prefer: &[&str]) -> ResolvedConcept {
        let Some(rxcui) = rxcui.filter(|r| !r.is_empty()) else {
            return ResolvedConcept::default();
        };

        if let Some(ttys) = self.by_tty.get(rxcui) {
            for tty in prefer {
                if let Some(name) = ttys.get(*tty).and_then(|names| names.first()) {
                    return ResolvedConcept {
                        rxcui: Some(rxcui.to_string()),
                        tty: Some(tty.to_string()),
                        name: Some(name.clone()),
                    };
                }
            }
        }

        match self.primary.get(rxcui) {
            Some(label) => ResolvedConcept {
                rxcui: Some(rxcui.to_string()),
                tty: Some(label.tty.clone()),
                name: Some(label.name.clone()),
            },
            None => ResolvedConcept::unknown(rxcui),
        }
    }

    /// Whether `rxcui` has at least one record under `tty`.
    pub fn has_tty(&self, rxcui: &str, tty: &str) -> bool {
        !self.names(rxcui, tty).is_empty()
    }

    /// Display strings recorded for `rxcui` under `tty`, in scan order.
    pub fn names(&self, rxcui: &str, tty: &str) -> &[String] {
        self.by_tty
            .get(rxcui)
            .and_then(|ttys| ttys.get(tty))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The primary `(tty, name)` label of `rxcui`.
    pub fn primary(&self, rxcui: &str) -> Option<(&str, &str)> {
        self.primary
            .get(rxcui)
            .map(|label| (label.tty.as_str(), label.name.as_str()))
    }

    /// Number of distinct RXCUIs indexed.
    pub fn len(&self) -> usize {
        self.primary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_empty()
    }

    pub fn stats(&self) -> LabelIndexStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rrf::fixtures::{conso, conso_with};

    fn index(lines: &[String]) -> LabelIndex {
        LabelIndex::from_reader(lines.concat().as_bytes()).unwrap()
    }

    #[test]
    fn test_first_seen_wins_without_preference() {
        let idx = index(&[
            conso("161", "IN", "acetaminophen", false),
            conso("161", "SY", "APAP", false),
        ]);

        assert_eq!(idx.primary("161"), Some(("IN", "acetaminophen")));
        assert_eq!(idx.len(), 1);
    }

    #[test]
    fn test_preferred_row_overrides() {
        let idx = index(&[
            conso("161", "SY", "APAP", false),
            conso("161", "IN", "acetaminophen", true),
            conso("161", "TMSY", "paracetamol", false),
        ]);

        assert_eq!(idx.primary("161"), Some(("IN", "acetaminophen")));
    }

    #[test]
    fn test_last_preferred_row_wins() {
        let idx = index(&[
            conso("161", "IN", "acetaminophen", true),
            conso("161", "PT", "Acetaminophen", true),
        ]);

        assert_eq!(idx.primary("161"), Some(("PT", "Acetaminophen")));
    }

    #[test]
    fn test_by_tty_keeps_scan_order() {
        let idx = index(&[
            conso("5", "SY", "first", false),
            conso("5", "SY", "second", false),
        ]);

        assert_eq!(idx.names("5", "SY"), ["first".to_string(), "second".to_string()]);
        assert!(idx.has_tty("5", "SY"));
        assert!(!idx.has_tty("5", "IN"));
        assert!(!idx.has_tty("6", "SY"));
    }

    #[test]
    fn test_resolve_prefers_tty_order() {
        let idx = index(&[
            conso("99", "SCD", "primary name", true),
            conso("99", "SBDC", "branded component", false),
            conso("99", "SCDC", "clinical component", false),
        ]);

        let r = idx.resolve(Some("99"), &["SCDC", "SBDC"]);
        assert_eq!(r.tty.as_deref(), Some("SCDC"));
        assert_eq!(r.name.as_deref(), Some("clinical component"));

        let r = idx.resolve(Some("99"), &["IN", "PIN"]);
        assert_eq!(r.tty.as_deref(), Some("SCD"));
        assert_eq!(r.name.as_deref(), Some("primary name"));
    }

    #[test]
    fn test_resolve_unknown_and_missing() {
        let idx = index(&[conso("1", "IN", "one", false)]);

        assert_eq!(idx.resolve(Some("404"), &[]), ResolvedConcept::unknown("404"));
        assert_eq!(idx.resolve(None, &["IN"]), ResolvedConcept::default());
        assert_eq!(idx.resolve(Some(""), &[]), ResolvedConcept::default());
    }

    #[test]
    fn test_filtered_rows_are_counted_not_indexed() {
        let idx = index(&[
            conso_with("1", "IN", "uno", false, "SPA", "RXNORM", "N"),
            conso_with("2", "IN", "two", false, "ENG", "RXNORM", "Y"),
            "short|row|\n".to_string(),
            conso("3", "IN", "three", false),
        ]);

        let stats = idx.stats();
        assert_eq!(stats.rows_read, 4);
        assert_eq!(stats.rows_short, 1);
        assert_eq!(stats.rows_filtered, 2);
        assert_eq!(stats.rows_indexed, 1);
        assert_eq!(idx.resolve(Some("1"), &[]), ResolvedConcept::unknown("1"));
    }
}
