//! Deduplication of indexing requests.
//!
//! Asking the platform to rescan a volume is expensive, so each root is
//! requested at most once for the lifetime of an [`IndexedRoots`] set.
//! Entries are never evicted: files added after the first scan are not
//! picked up until the set is recreated (normally at process restart).

use std::collections::BTreeSet;

use dashmap::DashSet;

/// Roots that have already been sent for indexing
#[derive(Debug, Default)]
pub struct IndexedRoots {
    seen: DashSet<String>,
}

impl IndexedRoots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `roots` as seen and return the ones never admitted before.
    ///
    /// Blank roots are dropped. The check and insert happen atomically per
    /// root, so concurrent callers never both receive the same root.
    pub fn admit<I, S>(&self, roots: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        roots
            .into_iter()
            .filter(|root| !root.as_ref().trim().is_empty())
            .filter_map(|root| {
                let root = root.as_ref().to_string();
                self.seen.insert(root.clone()).then_some(root)
            })
            .collect()
    }

    pub fn contains(&self, root: &str) -> bool {
        self.seen.contains(root)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admit_is_idempotent() {
        let roots = IndexedRoots::new();
        let input = ["/storage/emulated/0", "/storage/1A2B-3C4D"];

        let first = roots.admit(input);
        assert_eq!(first.len(), 2);

        assert!(roots.admit(input).is_empty());
        assert!(roots.admit(input).is_empty());
        assert_eq!(roots.len(), 2);
    }

    #[test]
    fn test_empty_input_is_noop() {
        let roots = IndexedRoots::new();
        assert!(roots.admit(Vec::<String>::new()).is_empty());
        assert!(roots.is_empty());
    }

    #[test]
    fn test_blank_roots_are_never_admitted() {
        let roots = IndexedRoots::new();
        let admitted = roots.admit(["", "   ", "/sdcard"]);

        assert_eq!(admitted, BTreeSet::from(["/sdcard".to_string()]));
        assert!(!roots.contains(""));
        assert_eq!(roots.len(), 1);
    }

    #[test]
    fn test_overlapping_sets_only_return_new_roots() {
        let roots = IndexedRoots::new();
        roots.admit(["/a", "/b"]);

        let admitted = roots.admit(["/b", "/c"]);
        assert_eq!(admitted, BTreeSet::from(["/c".to_string()]));
    }
}
