//! Statistics over finished Parent × SCDC groups.

use std::collections::{BTreeMap, BTreeSet};

use crate::models::{BossFrom, BossGroup, BossStats, Metric, MultiScdcParent, ResolvedConcept};

/// Compute every summary metric over `groups`.
///
/// Pure: the same groups always yield the same statistics, and the parent
/// list is sorted by RXCUI so serialization is stable across runs.
pub fn compute_stats(groups: &[BossGroup]) -> BossStats {
    let n = groups.len();
    let count = |pred: &dyn Fn(&BossGroup) -> bool| groups.iter().filter(|&g| pred(g)).count();

    let has_ai = count(&|g| g.has_ai());
    let has_am = count(&|g| g.has_am());
    let both = count(&|g| g.has_ai() && g.has_am());
    let ai_only = count(&|g| g.has_ai() && !g.has_am());
    let am_only = count(&|g| g.has_am() && !g.has_ai());
    let neither = count(&|g| !g.has_ai() && !g.has_am());

    let boss_ai = count(&|g| g.boss_from_is(BossFrom::ActiveIngredient));
    let boss_am = count(&|g| g.boss_from_is(BossFrom::ActiveMoiety));
    let boss_missing = count(&|g| g.boss_from.is_empty());
    let boss_ai_with_ai = count(&|g| g.boss_from_is(BossFrom::ActiveIngredient) && g.has_ai());
    let boss_am_with_am = count(&|g| g.boss_from_is(BossFrom::ActiveMoiety) && g.has_am());

    let divergent: Vec<&BossGroup> = groups.iter().filter(|g| g.is_divergent()).collect();
    let diff = divergent.len();
    let diff_ai = divergent
        .iter()
        .filter(|g| g.boss_from_is(BossFrom::ActiveIngredient))
        .count();
    let diff_am = divergent
        .iter()
        .filter(|g| g.boss_from_is(BossFrom::ActiveMoiety))
        .count();

    let (distinct_parents, multi_scdc_parent_list) = multi_scdc_parents(groups);

    BossStats {
        total_groups: n,
        has_ai: Metric::of(has_ai, n),
        has_am: Metric::of(has_am, n),
        has_both_ai_am: Metric::of(both, n),
        ai_only: Metric::of(ai_only, n),
        am_only: Metric::of(am_only, n),
        neither_ai_nor_am: Metric::of(neither, n),
        boss_from_ai: Metric::of(boss_ai, n),
        boss_from_am: Metric::of(boss_am, n),
        boss_from_missing: Metric::of(boss_missing, n),
        boss_ai_and_ai_present: Metric::of(boss_ai_with_ai, n),
        boss_am_and_am_present: Metric::of(boss_am_with_am, n),
        ai_am_different: Metric::of(diff, n),
        boss_from_ai_when_ai_am_different: Metric::of(diff_ai, diff),
        boss_from_am_when_ai_am_different: Metric::of(diff_am, diff),
        distinct_parents,
        multi_scdc_parents: Metric::of(multi_scdc_parent_list.len(), distinct_parents),
        multi_scdc_parent_list,
    }
}

/// Count distinct SCDCs per parent RXCUI and list the parents with more than one.
///
/// Groups whose parent has no RXCUI are left out.
fn multi_scdc_parents(groups: &[BossGroup]) -> (usize, Vec<MultiScdcParent>) {
    let mut by_parent: BTreeMap<&str, (&ResolvedConcept, BTreeSet<&str>)> = BTreeMap::new();
    for group in groups {
        let Some(parent) = group.parent.rxcui.as_deref() else {
            continue;
        };
        let (_, scdcs) = by_parent
            .entry(parent)
            .or_insert_with(|| (&group.parent, BTreeSet::new()));
        if let Some(scdc) = group.scdc.rxcui.as_deref() {
            scdcs.insert(scdc);
        }
    }

    let distinct = by_parent.len();
    let multi = by_parent
        .into_iter()
        .filter(|(_, (_, scdcs))| scdcs.len() > 1)
        .map(|(rxcui, (concept, scdcs))| MultiScdcParent {
            rxcui: rxcui.to_string(),
            tty: concept.tty.clone(),
            name: concept.name.clone(),
            scdc_count: scdcs.len(),
        })
        .collect();
    (distinct, multi)
}
