//! Filtering and pagination over finished groups.
//!
//! Shared by the read API; the HTML report applies the same rules client-side.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{BossGroup, IngredientEntry, ResolvedConcept};

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const MAX_PAGE_SIZE: usize = 200;

/// Query parameter errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum QueryError {
    #[error("page must be at least 1, got {0}")]
    InvalidPage(usize),

    #[error("page_size must be between 1 and {MAX_PAGE_SIZE}, got {0}")]
    InvalidPageSize(usize),
}

pub type QueryResult<T> = Result<T, QueryError>;

/// A page request with an optional free-text filter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupQuery {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Case-insensitive substring filter; empty means no filter
    #[serde(default)]
    pub q: Option<String>,
}

fn default_page() -> usize {
    DEFAULT_PAGE
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for GroupQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            q: None,
        }
    }
}

/// One page of matching groups.
#[derive(Debug, Clone, Serialize)]
pub struct GroupPage<'a> {
    pub page: usize,
    pub page_size: usize,
    /// Number of groups matching the filter, across all pages
    pub total: usize,
    pub results: Vec<&'a BossGroup>,
}

impl GroupQuery {
    pub fn validate(&self) -> QueryResult<()> {
        if self.page < 1 {
            return Err(QueryError::InvalidPage(self.page));
        }
        if self.page_size < 1 || self.page_size > MAX_PAGE_SIZE {
            return Err(QueryError::InvalidPageSize(self.page_size));
        }
        Ok(())
    }

    /// Filter `groups` and cut out the requested page.
    ///
    /// A page past the end is empty, not an error.
    pub fn apply<'a>(&self, groups: &'a [BossGroup]) -> QueryResult<GroupPage<'a>> {
        self.validate()?;

        let needle = self
            .q
            .as_deref()
            .map(str::to_lowercase)
            .filter(|q| !q.is_empty());
        let matching: Vec<&BossGroup> = match needle.as_deref() {
            Some(needle) => groups.iter().filter(|g| matches(g, needle)).collect(),
            None => groups.iter().collect(),
        };

        let start = (self.page - 1).saturating_mul(self.page_size);
        let results = matching
            .iter()
            .skip(start)
            .take(self.page_size)
            .copied()
            .collect();

        Ok(GroupPage {
            page: self.page,
            page_size: self.page_size,
            total: matching.len(),
            results,
        })
    }
}

/// Whether `needle` (already lowercased) occurs in any searchable field of `group`.
///
/// Searched: parent and SCDC RXCUI, name and TTY; every AI/AM entry's RXCUI,
/// name and kind; every BoSS token.
pub fn matches(group: &BossGroup, needle: &str) -> bool {
    let hit = |value: Option<&str>| value.is_some_and(|v| v.to_lowercase().contains(needle));
    let concept_hit = |c: &ResolvedConcept| {
        hit(c.rxcui.as_deref()) || hit(c.name.as_deref()) || hit(c.tty.as_deref())
    };
    let entry_hit = |e: &IngredientEntry| {
        hit(e.concept.rxcui.as_deref())
            || hit(e.concept.name.as_deref())
            || hit(e.kind.map(|k| k.as_str()))
    };

    concept_hit(&group.parent)
        || concept_hit(&group.scdc)
        || group.ai.iter().any(entry_hit)
        || group.am.iter().any(entry_hit)
        || group.boss_from.iter().any(|t| hit(Some(t.as_str())))
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

    fn group(parent: &str, name: &str) -> BossGroup {
        BossGroup {
            parent: concept(parent, "SCD", name),
            scdc: concept(&format!("{parent}0"), "SCDC", "component"),
            ai: vec![IngredientEntry::from_concept(concept("7052", "PIN", "Morphine Sulfate"))],
            am: vec![],
            boss_from: BTreeSet::from([BossFrom::ActiveIngredient]),
            raw_atv: RawAtv::default(),
            explanation: "not searched".into(),
        }
    }

    fn groups(n: usize) -> Vec<BossGroup> {
        (1..=n).map(|i| group(&i.to_string(), &format!("drug {i}"))).collect()
    }

    #[test]
    fn test_defaults() {
        let q: GroupQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q, GroupQuery::default());
        assert_eq!(q.page_size, 50);
    }

    #[test]
    fn test_validation() {
        let bad_page = GroupQuery { page: 0, ..Default::default() };
        assert_eq!(bad_page.validate(), Err(QueryError::InvalidPage(0)));

        let too_big = GroupQuery { page_size: 201, ..Default::default() };
        assert_eq!(too_big.validate(), Err(QueryError::InvalidPageSize(201)));

        let zero = GroupQuery { page_size: 0, ..Default::default() };
        assert!(zero.validate().is_err());

        let max = GroupQuery { page_size: 200, ..Default::default() };
        assert!(max.validate().is_ok());
    }

    #[test]
    fn test_pagination() {
        let all = groups(7);
        let q = GroupQuery { page: 2, page_size: 3, q: None };
        let page = q.apply(&all).unwrap();

        assert_eq!(page.total, 7);
        let ids: Vec<_> = page.results.iter().map(|g| g.parent.rxcui.as_deref().unwrap()).collect();
        assert_eq!(ids, vec!["4", "5", "6"]);

        let last = GroupQuery { page: 3, page_size: 3, q: None }.apply(&all).unwrap();
        assert_eq!(last.results.len(), 1);

        let past = GroupQuery { page: 9, page_size: 3, q: None }.apply(&all).unwrap();
        assert!(past.results.is_empty());
        assert_eq!(past.total, 7);
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let mut all = groups(3);
        all[1].parent.name = Some("Oxycodone Tablet".into());

        let page = GroupQuery { q: Some("OXYCO".into()), ..Default::default() }
            .apply(&all)
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.results[0].parent.rxcui.as_deref(), Some("2"));
    }

    #[test]
    fn test_filter_fields() {
        let g = group("1049221", "oxycodone");

        assert!(matches(&g, "10492"));
        assert!(matches(&g, "scdc"));
        assert!(matches(&g, "component"));
        assert!(matches(&g, "morphine"));
        assert!(matches(&g, "pin"));
        assert!(matches(&g, "ai"));
        assert!(!matches(&g, "not searched"));
        assert!(!matches(&g, "am"));
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let all = groups(4);
        let page = GroupQuery { q: Some(String::new()), ..Default::default() }
            .apply(&all)
            .unwrap();
        assert_eq!(page.total, 4);
    }

    #[test]
    fn test_page_json_shape() {
        let all = groups(2);
        let page = GroupQuery::default().apply(&all).unwrap();
        let json = serde_json::to_value(&page).unwrap();

        assert_eq!(json["page"], 1);
        assert_eq!(json["page_size"], 50);
        assert_eq!(json["total"], 2);
        assert_eq!(json["results"].as_array().unwrap().len(), 2);
        assert!(json["results"][0]["scdc"]["rxcui"].is_string());
    }
}
