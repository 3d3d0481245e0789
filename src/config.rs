//! Filter configuration file loading

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use logsift_types::{FilterGroup, CONTEXT_LEVELS};

/// Top-level shape of a filter config file
#[derive(Debug, Deserialize)]
struct FilterConfig {
    #[serde(default, rename = "group")]
    groups: Vec<FilterGroup>,
}

/// Load filter groups from a TOML file.
///
/// Groups default to enabled and filters to enabled/keyword mode unless
/// the file says otherwise; context radii outside the supported levels are
/// rejected up front rather than surprising the user mid-run.
pub fn load_filters(path: &Path) -> Result<Vec<FilterGroup>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read filter config {}", path.display()))?;
    let config: FilterConfig = toml::from_str(&text)
        .with_context(|| format!("failed to parse filter config {}", path.display()))?;

    for group in &config.groups {
        for filter in &group.filters {
            if !CONTEXT_LEVELS.contains(&filter.context_radius) {
                anyhow::bail!(
                    "filter '{}' in group '{}' has unsupported context radius {} (expected one of 0, 3, 5, 9)",
                    filter.label(),
                    group.name,
                    filter.context_radius
                );
            }
        }
    }

    Ok(config.groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use logsift_types::FilterKind;

    fn write_config(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filters.toml");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_groups_with_defaults() {
        let (_dir, path) = write_config(
            r#"
[[group]]
name = "Errors"

[[group.filter]]
keyword = "ERROR"
kind = "include"
context_radius = 3

[[group.filter]]
keyword = "heartbeat"
kind = "exclude"
"#,
        );

        let groups = load_filters(&path).unwrap();
        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        assert!(group.enabled);
        assert!(!group.is_regex);
        assert_eq!(group.filters.len(), 2);

        let error = &group.filters[0];
        assert_eq!(error.kind, FilterKind::Include);
        assert!(error.enabled);
        assert!(!error.case_sensitive);
        assert_eq!(error.context_radius, 3);

        assert_eq!(group.filters[1].kind, FilterKind::Exclude);
    }

    #[test]
    fn test_regex_group_round_trip() {
        let (_dir, path) = write_config(
            r#"
[[group]]
name = "Patterns"
is_regex = true
enabled = false

[[group.filter]]
keyword = '^\d{4}-\d{2}-\d{2}'
kind = "include"
is_regex = true
nickname = "Dated lines"
"#,
        );

        let groups = load_filters(&path).unwrap();
        assert!(!groups[0].enabled);
        assert!(groups[0].is_regex);
        assert_eq!(groups[0].filters[0].label(), "Dated lines");
    }

    #[test]
    fn test_unsupported_radius_is_rejected() {
        let (_dir, path) = write_config(
            r#"
[[group]]
name = "Errors"

[[group.filter]]
keyword = "ERROR"
kind = "include"
context_radius = 4
"#,
        );

        let err = load_filters(&path).unwrap_err();
        assert!(err.to_string().contains("context radius"));
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = load_filters(Path::new("/nonexistent/filters.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read filter config"));
    }
}
