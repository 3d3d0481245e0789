use std::collections::HashMap;
use std::sync::Arc;

use regex::Regex;

use logsift_types::{FilterGroup, FilterId, FilterKind};

use crate::pattern::PatternCache;

/// An include rule ready for evaluation
#[derive(Clone, Debug)]
pub struct IncludeRule {
    pub matcher: Arc<Regex>,
    pub context_radius: u32,
    pub filter_id: FilterId,
}

/// Compiled form of one enabled filter group
#[derive(Clone, Debug, Default)]
pub struct CompiledGroup {
    pub includes: Vec<IncludeRule>,
    pub excludes: Vec<Arc<Regex>>,
}

/// Per-line filtering decision
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchDecision {
    pub kept: bool,
    /// Neighboring lines owed around this line; 0 unless an include matched
    pub context_radius: u32,
}

impl MatchDecision {
    const DROP: Self = Self {
        kept: false,
        context_radius: 0,
    };
}

/// Evaluation-ready snapshot of the enabled filter groups
///
/// Built fresh per run; configuration edits never mutate a compiled set.
#[derive(Clone, Debug, Default)]
pub struct CompiledRuleSet {
    groups: Vec<CompiledGroup>,
}

impl CompiledRuleSet {
    /// Compile enabled groups (and, within them, enabled filters) into
    /// matcher lists, preserving group and filter order.
    pub fn compile(groups: &[FilterGroup], cache: &mut PatternCache) -> Self {
        let groups = groups
            .iter()
            .filter(|g| g.enabled)
            .map(|group| {
                let mut compiled = CompiledGroup::default();
                for filter in group.filters.iter().filter(|f| f.enabled) {
                    let matcher =
                        cache.compile(&filter.keyword, filter.is_regex, filter.case_sensitive);
                    match filter.kind {
                        FilterKind::Include => compiled.includes.push(IncludeRule {
                            matcher,
                            context_radius: filter.context_radius,
                            filter_id: filter.id,
                        }),
                        // Exclude rules carry no radius: excluding a line
                        // never pulls in its neighbors
                        FilterKind::Exclude => compiled.excludes.push(matcher),
                    }
                }
                compiled
            })
            .collect();
        Self { groups }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Decide whether a line is kept and how much context it demands
    pub fn evaluate(&self, line: &str) -> MatchDecision {
        let mut hits = HashMap::new();
        self.evaluate_counting(line, &mut hits)
    }

    /// Like [`evaluate`](Self::evaluate), but also tallies which include
    /// rules matched kept lines into `hits`.
    ///
    /// Decision rules:
    /// - no groups at all: nothing is kept
    /// - an exclude match in any group vetoes the line outright
    /// - includes are OR'd across all groups; the radius is the maximum
    ///   among the includes that matched
    /// - if no group defines any include, every non-excluded line is kept
    pub fn evaluate_counting(
        &self,
        line: &str,
        hits: &mut HashMap<FilterId, u64>,
    ) -> MatchDecision {
        if self.groups.is_empty() {
            return MatchDecision::DROP;
        }

        let mut max_context = 0u32;
        let mut any_include_defined = false;
        let mut match_found = false;
        let mut matched_ids: Vec<FilterId> = Vec::new();

        for group in &self.groups {
            for exclude in &group.excludes {
                if exclude.is_match(line) {
                    return MatchDecision::DROP;
                }
            }

            if !group.includes.is_empty() {
                any_include_defined = true;
                for include in &group.includes {
                    if include.matcher.is_match(line) {
                        match_found = true;
                        max_context = max_context.max(include.context_radius);
                        matched_ids.push(include.filter_id);
                    }
                }
            }
        }

        let kept = !any_include_defined || match_found;
        if kept {
            for id in matched_ids {
                *hits.entry(id).or_insert(0) += 1;
            }
        }

        MatchDecision {
            kept,
            context_radius: max_context,
        }
    }
}
