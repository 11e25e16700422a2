//! One-sentence summaries of finished groups.

use crate::models::{BossGroup, IngredientEntry, ResolvedConcept};

const MISSING: &str = "?";
const EMPTY_LIST: &str = "—";

/// Describe a finished group in one sentence.
pub fn explain(group: &BossGroup) -> String {
    let tokens = if group.boss_from.is_empty() {
        EMPTY_LIST.to_string()
    } else {
        group
            .boss_from
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join("/")
    };

    format!(
        "Parent {} has BoSS component SCDC {} with RXN_AI → [{}] and RXN_AM → [{}]. \
         RXN_BOSS_FROM indicates strength measured from: {}.",
        describe(&group.parent),
        describe(&group.scdc),
        names(&group.ai),
        names(&group.am),
        tokens,
    )
}

fn describe(concept: &ResolvedConcept) -> String {
    format!(
        "{} ({}, {})",
        concept.rxcui.as_deref().unwrap_or(MISSING),
        concept.tty.as_deref().unwrap_or(MISSING),
        concept.name.as_deref().unwrap_or(MISSING),
    )
}

fn names(entries: &[IngredientEntry]) -> String {
    if entries.is_empty() {
        return EMPTY_LIST.to_string();
    }
    entries
        .iter()
        .map(|e| e.concept.display_name())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BossFrom, RawAtv};
    use std::collections::BTreeSet;

    fn concept(rxcui: &str, tty: &str, name: &str) -> ResolvedConcept {
        ResolvedConcept {
            rxcui: Some(rxcui.into()),
            tty: Some(tty.into()),
            name: Some(name.into()),
        }
    }

    #[test]
    fn test_full_sentence() {
        let group = BossGroup {
            parent: concept("1049221", "SCD", "oxycodone HCl 5 MG Oral Tablet"),
            scdc: concept("1049214", "SCDC", "oxycodone HCl 5 MG"),
            ai: vec![IngredientEntry::from_concept(concept(
                "82063",
                "PIN",
                "oxycodone hydrochloride",
            ))],
            am: vec![IngredientEntry::from_concept(concept("7804", "IN", "oxycodone"))],
            boss_from: BTreeSet::from([BossFrom::ActiveIngredient]),
            raw_atv: RawAtv::default(),
            explanation: String::new(),
        };

        assert_eq!(
            explain(&group),
            "Parent 1049221 (SCD, oxycodone HCl 5 MG Oral Tablet) has BoSS component SCDC \
             1049214 (SCDC, oxycodone HCl 5 MG) with RXN_AI → [oxycodone hydrochloride] and \
             RXN_AM → [oxycodone]. RXN_BOSS_FROM indicates strength measured from: AI."
        );
    }

    #[test]
    fn test_missing_fields_fall_back() {
        let group = BossGroup {
            parent: ResolvedConcept::default(),
            scdc: ResolvedConcept::unknown("100"),
            ai: vec![
                IngredientEntry::from_concept(ResolvedConcept::unknown("200")),
                IngredientEntry::from_concept(concept("201", "IN", "named")),
            ],
            am: vec![],
            boss_from: BTreeSet::from([BossFrom::ActiveMoiety, BossFrom::ActiveIngredient]),
            raw_atv: RawAtv::default(),
            explanation: String::new(),
        };

        let text = explain(&group);
        assert!(text.starts_with("Parent ? (?, ?) has BoSS component SCDC 100 (?, ?)"));
        assert!(text.contains("RXN_AI → [200, named]"));
        assert!(text.contains("RXN_AM → [—]"));
        assert!(text.ends_with("measured from: AI/AM."));
    }
}
