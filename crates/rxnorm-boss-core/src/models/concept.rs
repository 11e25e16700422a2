//! Resolved concept references.

use serde::{Deserialize, Serialize};

/// A concept resolved through the label index.
///
/// Unknown RXCUIs keep their identifier with no TTY or display string.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedConcept {
    /// RxNorm concept unique identifier
    pub rxcui: Option<String>,
    /// Term type (e.g., "SCD", "SCDC", "IN")
    pub tty: Option<String>,
    /// Display string
    #[serde(rename = "str")]
    pub name: Option<String>,
}

impl ResolvedConcept {
    /// A concept the label index has no record for.
    pub fn unknown(rxcui: &str) -> Self {
        Self {
            rxcui: Some(rxcui.to_string()),
            tty: None,
            name: None,
        }
    }

    /// Whether the label index supplied a display string.
    pub fn is_resolved(&self) -> bool {
        self.name.is_some()
    }

    /// Best label for display: name, else RXCUI, else "?".
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.rxcui.as_deref())
            .unwrap_or("?")
    }
}

/// Ingredient sub-type of an AI/AM list entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum IngredientKind {
    /// Ingredient (TTY "IN")
    #[serde(rename = "IN")]
    Ingredient,
    /// Precise Ingredient (TTY "PIN")
    #[serde(rename = "PIN")]
    PreciseIngredient,
}

impl IngredientKind {
    /// Map a term type to a kind; any other TTY has no kind.
    pub fn from_tty(tty: &str) -> Option<Self> {
        match tty {
            "IN" => Some(Self::Ingredient),
            "PIN" => Some(Self::PreciseIngredient),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ingredient => "IN",
            Self::PreciseIngredient => "PIN",
        }
    }
}

/// One entry of a group's AI or AM list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngredientEntry {
    #[serde(flatten)]
    pub concept: ResolvedConcept,
    /// IN or PIN when the resolved TTY is one of them
    pub kind: Option<IngredientKind>,
}

impl IngredientEntry {
    /// Build an entry from a resolved concept, deriving its kind from the TTY.
    pub fn from_concept(concept: ResolvedConcept) -> Self {
        let kind = concept.tty.as_deref().and_then(IngredientKind::from_tty);
        Self { concept, kind }
    }
}
