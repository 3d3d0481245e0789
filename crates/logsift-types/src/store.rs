use std::collections::{HashMap, HashSet};

use crate::{
    default_color_presets, ColorPreset, FilterGroup, FilterId, FilterItem, FilterKind,
    HighlightMode, CONTEXT_LEVELS,
};

/// Placement relative to a sibling when reordering filters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MovePosition {
    Before,
    After,
}

/// Owns the user's filter configuration
///
/// The engine never reads this directly: it receives an `enabled_groups`
/// snapshot at the start of a run, so edits made while a run is in flight
/// only take effect on the next run.
#[derive(Debug)]
pub struct FilterStore {
    groups: Vec<FilterGroup>,
    color_presets: Vec<ColorPreset>,
    next_id: FilterId,
}

impl Default for FilterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterStore {
    pub fn new() -> Self {
        Self {
            groups: Vec::new(),
            color_presets: default_color_presets(),
            next_id: 1,
        }
    }

    /// Create a store seeded with the starter preset group (disabled)
    pub fn with_presets() -> Self {
        let mut store = Self::new();
        if let Some(group_id) = store.add_group("Presets", true) {
            store.add_filter(
                group_id,
                r"^\d{2}-\d{2}\s\d{2}:\d{2}:\d{2}\.\d{3}",
                FilterKind::Include,
                true,
                Some("Timestamp header"),
            );
            store.add_filter(
                group_id,
                r"^\s*\d+\s+\d+\s+[a-zA-Z_]\S*\s+\S+\s+-?\d+",
                FilterKind::Include,
                true,
                Some("Process info"),
            );
        }
        store
    }

    fn alloc_id(&mut self) -> FilterId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn groups(&self) -> &[FilterGroup] {
        &self.groups
    }

    pub fn color_presets(&self) -> &[ColorPreset] {
        &self.color_presets
    }

    /// Snapshot of enabled groups, handed to the engine for one run
    pub fn enabled_groups(&self) -> Vec<FilterGroup> {
        self.groups.iter().filter(|g| g.enabled).cloned().collect()
    }

    /// Add a group; duplicate name+mode combinations are rejected.
    /// New groups start disabled.
    pub fn add_group(&mut self, name: &str, is_regex: bool) -> Option<FilterId> {
        let exists = self
            .groups
            .iter()
            .any(|g| g.name.eq_ignore_ascii_case(name) && g.is_regex == is_regex);
        if exists {
            return None;
        }

        let id = self.alloc_id();
        self.groups.push(FilterGroup::new(id, name, is_regex));
        tracing::debug!(name, is_regex, "filter group added");
        Some(id)
    }

    /// Add a filter to a group; duplicates are rejected.
    ///
    /// Keyword filters compare case-insensitively against existing keywords
    /// of the same kind; regex filters compare pattern plus nickname. New
    /// keyword include filters get the first unused highlight color in the
    /// group.
    pub fn add_filter(
        &mut self,
        group_id: FilterId,
        keyword: &str,
        kind: FilterKind,
        is_regex: bool,
        nickname: Option<&str>,
    ) -> Option<FilterId> {
        let group_index = self.groups.iter().position(|g| g.id == group_id)?;

        let duplicate = self.groups[group_index].filters.iter().any(|f| {
            if is_regex {
                f.keyword == keyword && f.nickname.as_deref() == nickname
            } else {
                f.keyword.eq_ignore_ascii_case(keyword) && f.kind == kind
            }
        });
        if duplicate {
            return None;
        }

        let color = (!is_regex && kind == FilterKind::Include)
            .then(|| pick_color(&self.color_presets, &self.groups[group_index]));

        let id = self.alloc_id();
        let group = &mut self.groups[group_index];
        let mut item = FilterItem::new(id, keyword, kind);
        item.is_regex = is_regex;
        item.nickname = nickname.map(str::to_string);
        item.color = color;
        group.filters.push(item);
        tracing::debug!(group = %group.name, keyword, ?kind, is_regex, "filter added");
        Some(id)
    }

    fn group_mut(&mut self, group_id: FilterId) -> Option<&mut FilterGroup> {
        self.groups.iter_mut().find(|g| g.id == group_id)
    }

    fn filter_mut(&mut self, group_id: FilterId, filter_id: FilterId) -> Option<&mut FilterItem> {
        self.group_mut(group_id)?
            .filters
            .iter_mut()
            .find(|f| f.id == filter_id)
    }

    pub fn toggle_group(&mut self, group_id: FilterId) -> bool {
        let Some(group) = self.group_mut(group_id) else {
            return false;
        };
        group.enabled = !group.enabled;
        tracing::debug!(group = %group.name, enabled = group.enabled, "filter group toggled");
        true
    }

    pub fn toggle_filter(&mut self, group_id: FilterId, filter_id: FilterId) -> bool {
        let Some(filter) = self.filter_mut(group_id, filter_id) else {
            return false;
        };
        filter.enabled = !filter.enabled;
        tracing::debug!(keyword = %filter.keyword, enabled = filter.enabled, "filter toggled");
        true
    }

    pub fn toggle_case_sensitivity(&mut self, group_id: FilterId, filter_id: FilterId) -> bool {
        let Some(filter) = self.filter_mut(group_id, filter_id) else {
            return false;
        };
        filter.case_sensitive = !filter.case_sensitive;
        true
    }

    /// Advance a filter's context radius through the configured levels
    pub fn cycle_context_radius(&mut self, group_id: FilterId, filter_id: FilterId) -> Option<u32> {
        let filter = self.filter_mut(group_id, filter_id)?;
        filter.cycle_context_radius();
        Some(filter.context_radius)
    }

    /// Set a filter's context radius to one of the configured levels
    pub fn set_context_radius(
        &mut self,
        group_id: FilterId,
        filter_id: FilterId,
        radius: u32,
    ) -> bool {
        if !CONTEXT_LEVELS.contains(&radius) {
            return false;
        }
        let Some(filter) = self.filter_mut(group_id, filter_id) else {
            return false;
        };
        filter.context_radius = radius;
        true
    }

    pub fn cycle_highlight_mode(
        &mut self,
        group_id: FilterId,
        filter_id: FilterId,
    ) -> Option<HighlightMode> {
        let filter = self.filter_mut(group_id, filter_id)?;
        filter.highlight_mode = filter.highlight_mode.next();
        Some(filter.highlight_mode)
    }

    pub fn set_filter_color(&mut self, group_id: FilterId, filter_id: FilterId, color: &str) -> bool {
        let Some(filter) = self.filter_mut(group_id, filter_id) else {
            return false;
        };
        filter.color = Some(color.to_string());
        true
    }

    pub fn remove_filter(&mut self, group_id: FilterId, filter_id: FilterId) -> bool {
        let Some(group) = self.group_mut(group_id) else {
            return false;
        };
        let before = group.filters.len();
        group.filters.retain(|f| f.id != filter_id);
        let removed = group.filters.len() != before;
        if removed {
            tracing::debug!(group = %group.name, filter_id, "filter removed");
        }
        removed
    }

    pub fn remove_group(&mut self, group_id: FilterId) -> bool {
        let before = self.groups.len();
        self.groups.retain(|g| g.id != group_id);
        self.groups.len() != before
    }

    /// Move a filter next to a sibling within the same group
    pub fn move_filter(
        &mut self,
        group_id: FilterId,
        active_id: FilterId,
        target_id: FilterId,
        position: MovePosition,
    ) -> bool {
        let Some(group) = self.group_mut(group_id) else {
            return false;
        };
        let Some(from) = group.filters.iter().position(|f| f.id == active_id) else {
            return false;
        };
        if active_id == target_id || !group.filters.iter().any(|f| f.id == target_id) {
            return false;
        }

        let item = group.filters.remove(from);
        // Target index is recomputed after the removal shifted the list
        let Some(mut to) = group.filters.iter().position(|f| f.id == target_id) else {
            group.filters.insert(from, item);
            return false;
        };
        if position == MovePosition::After {
            to += 1;
        }
        group.filters.insert(to, item);
        true
    }

    /// Apply per-rule hit counts from a finished run; group counts are the
    /// sum over their filters.
    pub fn update_result_counts(&mut self, rule_hits: &HashMap<FilterId, u64>) {
        for group in &mut self.groups {
            let mut total = 0u64;
            let mut any = false;
            for filter in &mut group.filters {
                if let Some(count) = rule_hits.get(&filter.id) {
                    filter.result_count = Some(*count);
                    total += *count;
                    any = true;
                }
            }
            if any {
                group.result_count = Some(total);
            }
        }
    }

    /// Take ownership of externally built groups (e.g. from a config file),
    /// reassigning ids so they stay unique within the store.
    pub fn adopt_groups(&mut self, groups: Vec<FilterGroup>) {
        for mut group in groups {
            group.id = self.alloc_id();
            for filter in &mut group.filters {
                filter.id = self.alloc_id();
            }
            self.groups.push(group);
        }
    }
}

fn pick_color(presets: &[ColorPreset], group: &FilterGroup) -> String {
    let used: HashSet<&str> = group
        .filters
        .iter()
        .filter_map(|f| f.color.as_deref())
        .collect();

    if let Some(preset) = presets.iter().find(|p| !used.contains(p.id.as_str())) {
        return preset.id.clone();
    }
    // All presets taken; wrap around
    presets[group.filters.len() % presets.len()].id.clone()
}
