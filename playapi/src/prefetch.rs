//! Session-scoped store of server-supplied pre-fetch responses.

use std::collections::HashMap;

use crate::proto::PreFetch;

/// Raw responses the server pushed ahead of time, keyed by request path.
///
/// Keys match exactly. Entries are never removed or expired; a later entry
/// for the same path replaces the earlier one.
#[derive(Debug, Clone, Default)]
pub struct PreFetchCache {
    entries: HashMap<String, Vec<u8>>,
}

impl PreFetchCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw response bytes stored for `path`.
    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.entries.get(path).map(Vec::as_slice)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn insert(&mut self, path: impl Into<String>, response: Vec<u8>) {
        self.entries.insert(path.into(), response);
    }

    /// Stores every entry of a response's `preFetch` list.
    ///
    /// Returns the number of entries stored. Entries without a URL are
    /// skipped; entries without a body are stored as empty responses.
    pub fn harvest(&mut self, pre_fetch: &[PreFetch]) -> usize {
        let mut stored = 0;
        for entry in pre_fetch {
            if let Some(url) = &entry.url {
                self.insert(url.clone(), entry.response.clone().unwrap_or_default());
                stored += 1;
            }
        }
        stored
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(url: &str, body: &[u8]) -> PreFetch {
        PreFetch {
            url: Some(url.to_string()),
            response: Some(body.to_vec()),
            ..Default::default()
        }
    }

    #[test]
    fn test_harvest_stores_all_entries() {
        let mut cache = PreFetchCache::new();
        let stored = cache.harvest(&[entry("a", b"1"), entry("b", b"2")]);

        assert_eq!(stored, 2);
        assert_eq!(cache.get("a"), Some(&b"1"[..]));
        assert_eq!(cache.get("b"), Some(&b"2"[..]));
    }

    #[test]
    fn test_harvest_overwrites_duplicates() {
        let mut cache = PreFetchCache::new();
        cache.insert("a", b"old".to_vec());
        cache.harvest(&[entry("a", b"new")]);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("a"), Some(&b"new"[..]));
    }

    #[test]
    fn test_harvest_skips_entries_without_url() {
        let mut cache = PreFetchCache::new();
        let stored = cache.harvest(&[PreFetch {
            response: Some(b"orphan".to_vec()),
            ..Default::default()
        }]);

        assert_eq!(stored, 0);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_lookup_is_exact_match() {
        let mut cache = PreFetchCache::new();
        cache.insert("details?doc=a", Vec::new());

        assert!(cache.contains("details?doc=a"));
        assert!(!cache.contains("details?doc=a&x=1"));
        assert!(!cache.contains("/details?doc=a"));
    }
}
