//! Summary statistics over a finished group list.

use serde::{Deserialize, Serialize};

/// A count and its percentage of some denominator.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Metric {
    pub count: usize,
    pub pct: f64,
}

impl Metric {
    /// Build a metric; the percentage is 0.0 when `denominator` is zero.
    pub fn of(count: usize, denominator: usize) -> Self {
        let pct = if denominator == 0 {
            0.0
        } else {
            100.0 * count as f64 / denominator as f64
        };
        Self { count, pct }
    }
}

/// A parent whose BoSS attributes span more than one SCDC.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MultiScdcParent {
    pub rxcui: String,
    pub tty: Option<String>,
    #[serde(rename = "str")]
    pub name: Option<String>,
    /// Number of distinct SCDCs grouped under this parent
    pub scdc_count: usize,
}

/// Statistics over Parent × SCDC groups.
///
/// Percentages are of `total_groups` unless the field says otherwise.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BossStats {
    pub total_groups: usize,
    pub has_ai: Metric,
    pub has_am: Metric,
    pub has_both_ai_am: Metric,
    pub ai_only: Metric,
    pub am_only: Metric,
    pub neither_ai_nor_am: Metric,
    #[serde(rename = "boss_from_AI")]
    pub boss_from_ai: Metric,
    #[serde(rename = "boss_from_AM")]
    pub boss_from_am: Metric,
    pub boss_from_missing: Metric,
    #[serde(rename = "boss_AI_and_AI_present")]
    pub boss_ai_and_ai_present: Metric,
    #[serde(rename = "boss_AM_and_AM_present")]
    pub boss_am_and_am_present: Metric,
    /// Groups whose AI and AM RXCUI sets are both non-empty and differ
    pub ai_am_different: Metric,
    /// Percentage of `ai_am_different.count`
    #[serde(rename = "boss_from_AI_when_ai_am_different")]
    pub boss_from_ai_when_ai_am_different: Metric,
    /// Percentage of `ai_am_different.count`
    #[serde(rename = "boss_from_AM_when_ai_am_different")]
    pub boss_from_am_when_ai_am_different: Metric,
    /// Distinct parent RXCUIs across all groups
    pub distinct_parents: usize,
    /// Percentage of `distinct_parents`
    pub multi_scdc_parents: Metric,
    /// Sorted by RXCUI
    pub multi_scdc_parent_list: Vec<MultiScdcParent>,
}
