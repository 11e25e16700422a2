//! Parent × SCDC group models.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{IngredientEntry, ResolvedConcept};

/// The RXNSAT attribute names that take part in grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BossAttribute {
    /// RXN_AI: active ingredient of the SCDC
    ActiveIngredient,
    /// RXN_AM: active moiety of the SCDC
    ActiveMoiety,
    /// RXN_BOSS_FROM: which of AI/AM the strength is measured from
    BossFrom,
}

impl BossAttribute {
    /// Parse an ATN column value; other attribute names are not ours.
    pub fn from_atn(atn: &str) -> Option<Self> {
        match atn {
            "RXN_AI" => Some(Self::ActiveIngredient),
            "RXN_AM" => Some(Self::ActiveMoiety),
            "RXN_BOSS_FROM" => Some(Self::BossFrom),
            _ => None,
        }
    }

    pub fn atn(&self) -> &'static str {
        match self {
            Self::ActiveIngredient => "RXN_AI",
            Self::ActiveMoiety => "RXN_AM",
            Self::BossFrom => "RXN_BOSS_FROM",
        }
    }
}

/// Basis of strength token carried by RXN_BOSS_FROM.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BossFrom {
    /// Strength measured from the active ingredient
    #[serde(rename = "AI")]
    ActiveIngredient,
    /// Strength measured from the active moiety
    #[serde(rename = "AM")]
    ActiveMoiety,
}

impl BossFrom {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ActiveIngredient => "AI",
            Self::ActiveMoiety => "AM",
        }
    }
}

/// Unparsed ATV strings, bucketed by attribute name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawAtv {
    #[serde(rename = "RXN_AI")]
    pub ai: Vec<String>,
    #[serde(rename = "RXN_AM")]
    pub am: Vec<String>,
    #[serde(rename = "RXN_BOSS_FROM")]
    pub boss_from: Vec<String>,
}

impl RawAtv {
    pub fn push(&mut self, attribute: BossAttribute, atv: &str) {
        let bucket = match attribute {
            BossAttribute::ActiveIngredient => &mut self.ai,
            BossAttribute::ActiveMoiety => &mut self.am,
            BossAttribute::BossFrom => &mut self.boss_from,
        };
        bucket.push(atv.to_string());
    }

    pub fn len(&self) -> usize {
        self.ai.len() + self.am.len() + self.boss_from.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One Parent × SCDC group with everything RXNSAT says about it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BossGroup {
    /// The SCD/SBD the attributes are attached to
    pub parent: ResolvedConcept,
    /// The component whose strength is described
    pub scdc: ResolvedConcept,
    /// RXN_AI entries in scan order
    pub ai: Vec<IngredientEntry>,
    /// RXN_AM entries in scan order
    pub am: Vec<IngredientEntry>,
    /// RXN_BOSS_FROM tokens (serialized sorted)
    pub boss_from: BTreeSet<BossFrom>,
    /// Original ATV strings for audit
    pub raw_atv: RawAtv,
    /// Human-readable summary, computed once the scan is complete
    pub explanation: String,
}

impl BossGroup {
    pub fn has_ai(&self) -> bool {
        !self.ai.is_empty()
    }

    pub fn has_am(&self) -> bool {
        !self.am.is_empty()
    }

    pub fn boss_from_is(&self, token: BossFrom) -> bool {
        self.boss_from.contains(&token)
    }

    /// Distinct RXCUIs referenced by the AI list.
    pub fn ai_rxcuis(&self) -> BTreeSet<&str> {
        rxcui_set(&self.ai)
    }

    /// Distinct RXCUIs referenced by the AM list.
    pub fn am_rxcuis(&self) -> BTreeSet<&str> {
        rxcui_set(&self.am)
    }

    /// Both lists are populated but point at different RXCUI sets.
    pub fn is_divergent(&self) -> bool {
        let ai = self.ai_rxcuis();
        let am = self.am_rxcuis();
        !ai.is_empty() && !am.is_empty() && ai != am
    }
}

fn rxcui_set(entries: &[IngredientEntry]) -> BTreeSet<&str> {
    entries
        .iter()
        .filter_map(|e| e.concept.rxcui.as_deref())
        .collect()
}
