use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use logsift_engine::LineIndexMap;

/// How long a pending navigation stays consumable
const PENDING_WINDOW: Duration = Duration::from_secs(10);

/// A resolved position in an original source log
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceLocation {
    pub path: PathBuf,
    /// 0-based line number
    pub line: u64,
}

struct SourceMapping {
    source: PathBuf,
    line_map: Arc<LineIndexMap>,
}

struct PendingNavigation {
    path: PathBuf,
    line: u64,
    marked_at: Instant,
}

/// Registry of filtered-output to source mappings
///
/// Owned explicitly and shared by reference with whatever needs
/// resolution. Lookups take a read lock and are safe from any number of
/// concurrent readers; mappings live from `register` until `unregister`.
#[derive(Default)]
pub struct SourceMapRegistry {
    mappings: RwLock<HashMap<PathBuf, SourceMapping>>,
    pending: RwLock<Option<PendingNavigation>>,
}

impl SourceMapRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate a filtered output file with its source and line map
    pub fn register(&self, filtered: &Path, source: &Path, line_map: Arc<LineIndexMap>) {
        self.mappings.write().insert(
            filtered.to_path_buf(),
            SourceMapping {
                source: source.to_path_buf(),
                line_map,
            },
        );
    }

    /// Drop the mapping when the filtered file is closed
    pub fn unregister(&self, filtered: &Path) {
        self.mappings.write().remove(filtered);
    }

    pub fn contains(&self, filtered: &Path) -> bool {
        self.mappings.read().contains_key(filtered)
    }

    /// Resolve a 0-based position in a filtered file back to its source
    pub fn resolve(&self, filtered: &Path, output_line: usize) -> Option<SourceLocation> {
        let mappings = self.mappings.read();
        let mapping = mappings.get(filtered)?;
        let line = mapping.line_map.get(output_line)?;
        Some(SourceLocation {
            path: mapping.source.clone(),
            line,
        })
    }

    /// Remember a jump target so the destination can play a one-shot cue
    pub fn mark_pending(&self, path: &Path, line: u64) {
        *self.pending.write() = Some(PendingNavigation {
            path: path.to_path_buf(),
            line,
            marked_at: Instant::now(),
        });
    }

    /// True when `path`:`line` is the pending jump target and the token is
    /// still fresh. Consumes the token on success; a stale or mismatched
    /// token is left in place to expire naturally.
    pub fn consume_if_pending(&self, path: &Path, line: u64) -> bool {
        let mut pending = self.pending.write();
        let hit = matches!(
            pending.as_ref(),
            Some(p) if p.path == path && p.line == line && p.marked_at.elapsed() < PENDING_WINDOW
        );
        if hit {
            *pending = None;
        }
        hit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: Vec<u64>) -> Arc<LineIndexMap> {
        Arc::new(LineIndexMap::from(entries))
    }

    #[test]
    fn test_register_resolve_unregister() {
        let registry = SourceMapRegistry::new();
        let filtered = Path::new("/tmp/filtered.log");
        let source = Path::new("/var/log/app.log");
        registry.register(filtered, source, map(vec![1, 4, 9]));

        assert!(registry.contains(filtered));
        let location = registry.resolve(filtered, 1).unwrap();
        assert_eq!(location.path, source);
        assert_eq!(location.line, 4);

        registry.unregister(filtered);
        assert!(!registry.contains(filtered));
        assert!(registry.resolve(filtered, 1).is_none());
    }

    #[test]
    fn test_resolve_out_of_range_line() {
        let registry = SourceMapRegistry::new();
        let filtered = Path::new("/tmp/filtered.log");
        registry.register(filtered, Path::new("/var/log/app.log"), map(vec![0, 2]));

        assert!(registry.resolve(filtered, 2).is_none());
    }

    #[test]
    fn test_round_trip_is_strictly_increasing() {
        let registry = SourceMapRegistry::new();
        let filtered = Path::new("/tmp/filtered.log");
        let entries = vec![1, 2, 3, 4, 5, 6, 7];
        registry.register(filtered, Path::new("/var/log/app.log"), map(entries.clone()));

        let resolved: Vec<u64> = (0..entries.len())
            .map(|i| registry.resolve(filtered, i).unwrap().line)
            .collect();
        assert_eq!(resolved, entries);
        assert!(resolved.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_pending_navigation_consumed_once() {
        let registry = SourceMapRegistry::new();
        let target = Path::new("/var/log/app.log");
        registry.mark_pending(target, 41);

        assert!(!registry.consume_if_pending(target, 40));
        assert!(!registry.consume_if_pending(Path::new("/var/log/other.log"), 41));
        assert!(registry.consume_if_pending(target, 41));
        // Consumed: the same query no longer matches
        assert!(!registry.consume_if_pending(target, 41));
    }

    #[test]
    fn test_pending_navigation_replaced_by_new_mark() {
        let registry = SourceMapRegistry::new();
        let target = Path::new("/var/log/app.log");
        registry.mark_pending(target, 1);
        registry.mark_pending(target, 2);

        assert!(!registry.consume_if_pending(target, 1));
        assert!(registry.consume_if_pending(target, 2));
    }
}
