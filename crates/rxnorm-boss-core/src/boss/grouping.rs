//! Parent × SCDC grouping over RXNSAT.RRF.

use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};
use std::io::Read;

use csv::StringRecord;
use serde::Serialize;

use super::atv::{parse_boss_from_atv, parse_component_atv};
use super::explanation::explain;
use crate::models::{
    BossAttribute, BossFrom, BossGroup, IngredientEntry, RawAtv, ResolvedConcept,
};
use crate::rrf::{AttributeRow, LabelIndex, RrfReader, RrfResult};

/// Term types preferred when labelling the SCDC of a group.
pub const SCDC_TTYS: &[&str] = &["SCDC", "SBDC"];
/// Term types preferred when labelling AI/AM entries.
pub const INGREDIENT_TTYS: &[&str] = &["IN", "PIN"];

/// Row counters from one grouping pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GroupingStats {
    pub rows_read: u64,
    pub rows_short: u64,
    pub rows_filtered: u64,
    /// Eligible rows whose ATN is not a BoSS attribute
    pub rows_other_atn: u64,
    /// BoSS rows whose ATV has no braced SCDC
    pub rows_without_scdc: u64,
    pub rows_grouped: u64,
}

/// A group still accumulating rows.
#[derive(Debug)]
struct PendingGroup {
    parent: ResolvedConcept,
    scdc: ResolvedConcept,
    ai: Vec<IngredientEntry>,
    am: Vec<IngredientEntry>,
    boss_from: BTreeSet<BossFrom>,
    raw_atv: RawAtv,
}

impl PendingGroup {
    fn finalize(self) -> BossGroup {
        let mut group = BossGroup {
            parent: self.parent,
            scdc: self.scdc,
            ai: self.ai,
            am: self.am,
            boss_from: self.boss_from,
            raw_atv: self.raw_atv,
            explanation: String::new(),
        };
        group.explanation = explain(&group);
        group
    }
}

/// Accumulates RXNSAT rows into Parent × SCDC groups.
///
/// Groups keep first-seen order. Labels are resolved when a group or entry is
/// created, so the index must be complete before the first row is ingested.
pub struct GroupBuilder<'a> {
    labels: &'a LabelIndex,
    slots: HashMap<(String, String), usize>,
    pending: Vec<PendingGroup>,
    stats: GroupingStats,
}

impl<'a> GroupBuilder<'a> {
    /// Create a builder resolving names through `labels`.
    pub fn new(labels: &'a LabelIndex) -> Self {
        Self {
            labels,
            slots: HashMap::new(),
            pending: Vec::new(),
            stats: GroupingStats::default(),
        }
    }

    /// Ingest one raw RXNSAT record, dropping anything that does not qualify.
    pub fn ingest_record(&mut self, record: &StringRecord) {
        self.stats.rows_read += 1;
        match AttributeRow::from_record(record) {
            None => self.stats.rows_short += 1,
            Some(row) if !row.is_eligible() => self.stats.rows_filtered += 1,
            Some(row) => self.ingest(&row),
        }
    }

    /// Ingest one eligible attribute row.
    pub fn ingest(&mut self, row: &AttributeRow<'_>) {
        let Some(attribute) = row.attribute() else {
            self.stats.rows_other_atn += 1;
            return;
        };

        match attribute {
            BossAttribute::ActiveIngredient | BossAttribute::ActiveMoiety => {
                let parsed = parse_component_atv(row.atv);
                let Some(scdc) = parsed.scdc else {
                    self.stats.rows_without_scdc += 1;
                    return;
                };
                let entry = parsed.ingredient.map(|rxcui| {
                    IngredientEntry::from_concept(
                        self.labels.resolve(Some(rxcui.as_str()), INGREDIENT_TTYS),
                    )
                });

                let group = self.group_mut(row.parent, &scdc);
                if let Some(entry) = entry {
                    match attribute {
                        BossAttribute::ActiveIngredient => group.ai.push(entry),
                        _ => group.am.push(entry),
                    }
                }
                group.raw_atv.push(attribute, row.atv);
            }
            BossAttribute::BossFrom => {
                let parsed = parse_boss_from_atv(row.atv);
                let Some(scdc) = parsed.scdc else {
                    self.stats.rows_without_scdc += 1;
                    return;
                };

                let group = self.group_mut(row.parent, &scdc);
                if let Some(token) = parsed.from {
                    group.boss_from.insert(token);
                }
                group.raw_atv.push(attribute, row.atv);
            }
        }
        self.stats.rows_grouped += 1;
    }

    /// Fetch or create the group for `(parent, scdc)`.
    fn group_mut(&mut self, parent: &str, scdc: &str) -> &mut PendingGroup {
        let idx = match self.slots.entry((parent.to_string(), scdc.to_string())) {
            Entry::Occupied(slot) => *slot.get(),
            Entry::Vacant(slot) => {
                let idx = self.pending.len();
                self.pending.push(PendingGroup {
                    parent: self.labels.resolve(Some(parent), &[]),
                    scdc: self.labels.resolve(Some(scdc), SCDC_TTYS),
                    ai: Vec::new(),
                    am: Vec::new(),
                    boss_from: BTreeSet::new(),
                    raw_atv: RawAtv::default(),
                });
                slot.insert(idx);
                idx
            }
        };
        &mut self.pending[idx]
    }

    /// Number of groups created so far.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn stats(&self) -> GroupingStats {
        self.stats
    }

    /// Finalize every group exactly once, in first-seen order.
    pub fn finish(self) -> Vec<BossGroup> {
        log::debug!("Grouping row counters: {:?}", self.stats);
        self.pending.into_iter().map(PendingGroup::finalize).collect()
    }
}

/// Group every record of an RXNSAT reader.
pub fn build_groups<R: Read>(
    reader: &mut RrfReader<R>,
    labels: &LabelIndex,
) -> RrfResult<Vec<BossGroup>> {
    let mut builder = GroupBuilder::new(labels);
    reader.for_each_record(|record| builder.ingest_record(record))?;

    log::info!(
        "Grouped {} BoSS rows into {} Parent×SCDC groups from {}",
        builder.stats().rows_grouped,
        builder.len(),
        reader.source()
    );
    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IngredientKind;
    use crate::rrf::fixtures::{conso, sat, sat_with};

    fn labels() -> LabelIndex {
        let data = [
            conso("A", "SCD", "parent drug", true),
            conso("100", "SCDC", "component 100", false),
            conso("100", "SCD", "should not win", true),
            conso("200", "PIN", "precise 200", false),
            conso("300", "IN", "ingredient 300", false),
            conso("400", "BN", "brand 400", false),
        ]
        .concat();
        LabelIndex::from_reader(data.as_bytes()).unwrap()
    }

    fn group(labels: &LabelIndex, rows: &[String]) -> (Vec<BossGroup>, GroupingStats) {
        let data = rows.concat();
        let mut reader = RrfReader::from_reader(data.as_bytes(), "RXNSAT");
        let mut builder = GroupBuilder::new(labels);
        reader
            .for_each_record(|record| builder.ingest_record(record))
            .unwrap();
        let stats = builder.stats();
        (builder.finish(), stats)
    }

    #[test]
    fn test_three_attributes_merge_into_one_group() {
        let labels = labels();
        let (groups, stats) = group(
            &labels,
            &[
                sat("A", "RXN_AI", "{100} 200"),
                sat("A", "RXN_AM", "{100} 300"),
                sat("A", "RXN_BOSS_FROM", "{100} AM"),
            ],
        );

        assert_eq!(groups.len(), 1);
        assert_eq!(stats.rows_grouped, 3);
        let g = &groups[0];
        assert_eq!(g.parent.name.as_deref(), Some("parent drug"));
        assert_eq!(g.scdc.tty.as_deref(), Some("SCDC"));
        assert_eq!(g.scdc.name.as_deref(), Some("component 100"));
        assert_eq!(g.ai.len(), 1);
        assert_eq!(g.ai[0].concept.rxcui.as_deref(), Some("200"));
        assert_eq!(g.ai[0].kind, Some(IngredientKind::PreciseIngredient));
        assert_eq!(g.am[0].concept.rxcui.as_deref(), Some("300"));
        assert_eq!(g.am[0].kind, Some(IngredientKind::Ingredient));
        assert_eq!(g.boss_from, BTreeSet::from([BossFrom::ActiveMoiety]));
        assert_eq!(g.raw_atv.len(), 3);
        assert!(g.explanation.contains("RXN_AM → [ingredient 300]"));
    }

    #[test]
    fn test_entry_kind_absent_for_other_ttys() {
        let labels = labels();
        let (groups, _) = group(&labels, &[sat("A", "RXN_AI", "{100} 400")]);

        let entry = &groups[0].ai[0];
        assert_eq!(entry.concept.tty.as_deref(), Some("BN"));
        assert_eq!(entry.kind, None);
    }

    #[test]
    fn test_row_without_braced_scdc_is_dropped() {
        let labels = labels();
        let (groups, stats) = group(
            &labels,
            &[
                sat("A", "RXN_AI", "100 200"),
                sat("A", "RXN_BOSS_FROM", "AI"),
            ],
        );

        assert!(groups.is_empty());
        assert_eq!(stats.rows_without_scdc, 2);
        assert_eq!(stats.rows_grouped, 0);
    }

    #[test]
    fn test_scdc_only_value_creates_group_without_entry() {
        let labels = labels();
        let (groups, _) = group(&labels, &[sat("A", "RXN_AM", "{100}")]);

        assert_eq!(groups.len(), 1);
        assert!(groups[0].am.is_empty());
        assert_eq!(groups[0].raw_atv.am, vec!["{100}".to_string()]);
    }

    #[test]
    fn test_distinct_keys_keep_first_seen_order() {
        let labels = labels();
        let (groups, _) = group(
            &labels,
            &[
                sat("B", "RXN_AI", "{900} 1"),
                sat("A", "RXN_AI", "{100} 200"),
                sat("B", "RXN_AM", "{900} 2"),
                sat("A", "RXN_AI", "{101} 200"),
            ],
        );

        let keys: Vec<(&str, &str)> = groups
            .iter()
            .map(|g| {
                (
                    g.parent.rxcui.as_deref().unwrap(),
                    g.scdc.rxcui.as_deref().unwrap(),
                )
            })
            .collect();
        assert_eq!(keys, vec![("B", "900"), ("A", "100"), ("A", "101")]);
        assert_eq!(groups[0].ai.len(), 1);
        assert_eq!(groups[0].am.len(), 1);
    }

    #[test]
    fn test_boss_from_tokens_collapse() {
        let labels = labels();
        let (groups, _) = group(
            &labels,
            &[
                sat("A", "RXN_BOSS_FROM", "{100} AI"),
                sat("A", "RXN_BOSS_FROM", "{100} AI"),
                sat("A", "RXN_BOSS_FROM", "{100} unknown"),
            ],
        );

        assert_eq!(groups[0].boss_from.len(), 1);
        assert_eq!(groups[0].raw_atv.boss_from.len(), 3);
    }

    #[test]
    fn test_filtered_and_foreign_rows() {
        let labels = labels();
        let (groups, stats) = group(
            &labels,
            &[
                sat_with("A", "RXN_AI", "{100} 200", "MTHSPL", "N"),
                sat_with("A", "RXN_AI", "{100} 200", "RXNORM", "Y"),
                sat("A", "RXN_STRENGTH", "{100} 5 MG"),
                "too|short|\n".to_string(),
            ],
        );

        assert!(groups.is_empty());
        assert_eq!(stats.rows_read, 4);
        assert_eq!(stats.rows_filtered, 2);
        assert_eq!(stats.rows_other_atn, 1);
        assert_eq!(stats.rows_short, 1);
    }

    #[test]
    fn test_unknown_rxcuis_degrade() {
        let labels = LabelIndex::new();
        let (groups, _) = group(&labels, &[sat("X", "RXN_AI", "{7} 8")]);

        let g = &groups[0];
        assert_eq!(g.parent, ResolvedConcept::unknown("X"));
        assert_eq!(g.scdc, ResolvedConcept::unknown("7"));
        assert_eq!(g.ai[0].concept, ResolvedConcept::unknown("8"));
        assert_eq!(g.ai[0].kind, None);
    }
}
