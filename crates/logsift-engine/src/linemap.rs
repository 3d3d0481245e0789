use serde::Serialize;

/// Maps filtered output positions back to source line numbers
///
/// `get(i)` answers "which source line produced output line `i`", both
/// 0-based. Entries are strictly increasing: a source line never appears
/// twice and order is preserved. Built once per run, read-only afterward.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct LineIndexMap {
    entries: Vec<u64>,
}

impl LineIndexMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, source_line: u64) {
        debug_assert!(
            self.entries.last().is_none_or(|last| *last < source_line),
            "source lines must be recorded in strictly increasing order"
        );
        self.entries.push(source_line);
    }

    /// Source line (0-based) for the given output line, if it exists
    pub fn get(&self, output_line: usize) -> Option<u64> {
        self.entries.get(output_line).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.entries.iter().copied()
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.entries
    }
}

impl From<Vec<u64>> for LineIndexMap {
    fn from(entries: Vec<u64>) -> Self {
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let mut map = LineIndexMap::new();
        map.push(1);
        map.push(4);
        map.push(9);

        assert_eq!(map.len(), 3);
        assert_eq!(map.get(0), Some(1));
        assert_eq!(map.get(2), Some(9));
        assert_eq!(map.get(3), None);
    }

    #[test]
    fn test_empty_map() {
        let map = LineIndexMap::new();
        assert!(map.is_empty());
        assert_eq!(map.get(0), None);
    }

    #[test]
    fn test_from_vec() {
        let map = LineIndexMap::from(vec![0, 2, 5]);
        assert_eq!(map.as_slice(), &[0, 2, 5]);
    }
}
