//! ATV (attribute value) grammars for the BoSS attributes.
//!
//! Handles:
//! - RXN_AI / RXN_AM: `{SCDC_RXCUI}` followed by the IN/PIN RXCUI
//! - RXN_BOSS_FROM: `{SCDC_RXCUI}` followed by an `AI` or `AM` token
//!
//! Both grammars key on the braced RXCUI and tolerate extra numeric noise.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::BossFrom;

static BRACED_RXCUI: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(\d+)\}").expect("braced RXCUI pattern"));
static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d+)\b").expect("digit run pattern"));
static TOKEN_AI: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bAI\b").expect("AI token pattern"));
static TOKEN_AM: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bAM\b").expect("AM token pattern"));

/// Parsed RXN_AI / RXN_AM value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentAtv {
    /// The braced SCDC RXCUI
    pub scdc: Option<String>,
    /// First other standalone number: the IN/PIN RXCUI
    pub ingredient: Option<String>,
}

/// Parsed RXN_BOSS_FROM value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BossFromAtv {
    /// The braced SCDC RXCUI
    pub scdc: Option<String>,
    pub from: Option<BossFrom>,
}

fn braced_rxcui(atv: &str) -> Option<&str> {
    BRACED_RXCUI
        .captures(atv)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Parse an RXN_AI / RXN_AM value.
///
/// Without a braced RXCUI nothing is extracted. The ingredient RXCUI may be
/// absent when the value holds no number other than the SCDC.
pub fn parse_component_atv(atv: &str) -> ComponentAtv {
    let Some(scdc) = braced_rxcui(atv) else {
        return ComponentAtv::default();
    };

    let ingredient = DIGITS
        .captures_iter(atv)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .find(|digits| *digits != scdc)
        .map(str::to_string);

    ComponentAtv {
        scdc: Some(scdc.to_string()),
        ingredient,
    }
}

/// Parse an RXN_BOSS_FROM value.
///
/// `AI` is checked before `AM`, so a value carrying both reads as `AI`.
/// Tokens only match as whole words.
pub fn parse_boss_from_atv(atv: &str) -> BossFromAtv {
    let Some(scdc) = braced_rxcui(atv) else {
        return BossFromAtv::default();
    };

    let from = if TOKEN_AI.is_match(atv) {
        Some(BossFrom::ActiveIngredient)
    } else if TOKEN_AM.is_match(atv) {
        Some(BossFrom::ActiveMoiety)
    } else {
        None
    };

    BossFromAtv {
        scdc: Some(scdc.to_string()),
        from,
    }
}
