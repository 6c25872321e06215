//! Run-scoped memo of object metadata and the absolute paths derived from it.
//!
//! Entries are only ever added or filled in. Nothing is evicted, so a path
//! memoized once stays valid for the rest of the command even if the remote
//! tree changes underneath it.

use std::collections::HashMap;

use crate::store::{ObjectMetadata, ROOT_ALIAS};

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub metadata: ObjectMetadata,
    pub absolute_path: Option<String>,
}

#[derive(Debug, Default)]
pub struct PathCache {
    entries: HashMap<String, CacheEntry>,
    /// absolute path -> id, first memoization wins
    by_path: HashMap<String, String>,
    /// (first parent id, name) -> ids in insertion order
    by_child: HashMap<(String, String), Vec<String>>,
    /// Real id of the root folder once it has been seen.
    root_id: Option<String>,
}

impl PathCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, id: &str) -> Option<&ObjectMetadata> {
        self.entries.get(self.canonical_id(id)).map(|e| &e.metadata)
    }

    pub fn absolute_path(&self, id: &str) -> Option<&str> {
        self.entries
            .get(self.canonical_id(id))
            .and_then(|e| e.absolute_path.as_deref())
    }

    /// Insert or overwrite the metadata for `metadata.id`. An already
    /// memoized path is never replaced.
    pub fn put(&mut self, metadata: ObjectMetadata, absolute_path: Option<String>) {
        let absolute_path = absolute_path.filter(|p| !p.is_empty());
        let id = metadata.id.clone();

        if metadata.is_root() && self.root_id.is_none() {
            self.root_id = Some(id.clone());
        }

        let previous_key = self.entries.get(&id).and_then(|e| child_key(&e.metadata));
        let key = child_key(&metadata);
        if previous_key != key {
            if let Some(old) = previous_key {
                if let Some(ids) = self.by_child.get_mut(&old) {
                    ids.retain(|x| x != &id);
                }
            }
            if let Some(new) = key {
                self.by_child.entry(new).or_default().push(id.clone());
            }
        }

        match self.entries.get_mut(&id) {
            Some(entry) => {
                entry.metadata = metadata;
                if entry.absolute_path.is_none() {
                    entry.absolute_path = absolute_path.clone();
                } else {
                    return;
                }
            }
            None => {
                self.entries.insert(
                    id.clone(),
                    CacheEntry {
                        metadata,
                        absolute_path: absolute_path.clone(),
                    },
                );
            }
        }

        if let Some(path) = absolute_path {
            self.by_path.entry(path).or_insert(id);
        }
    }

    /// Records the real id behind the root alias without fetching the root.
    pub fn note_root_id(&mut self, id: &str) {
        if self.root_id.is_none() {
            self.root_id = Some(id.to_string());
        }
    }

    pub fn find_by_absolute_path(&self, path: &str) -> Option<&str> {
        if path == "/" {
            if let Some(root) = &self.root_id {
                return Some(root.as_str());
            }
        }
        self.by_path.get(path).map(String::as_str)
    }

    pub fn find_child_by_name(&self, name: &str, parent_id: &str) -> Option<&ObjectMetadata> {
        self.find_children_by_name(name, parent_id).into_iter().next()
    }

    pub fn find_children_by_name(&self, name: &str, parent_id: &str) -> Vec<&ObjectMetadata> {
        let key = (self.canonical_id(parent_id).to_string(), name.to_string());
        self.by_child
            .get(&key)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.entries.get(id))
                    .map(|e| &e.metadata)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn canonical_id<'a>(&'a self, id: &'a str) -> &'a str {
        match (&self.root_id, id) {
            (Some(root), ROOT_ALIAS) => root.as_str(),
            _ => id,
        }
    }
}

fn child_key(metadata: &ObjectMetadata) -> Option<(String, String)> {
    metadata
        .first_parent()
        .map(|p| (p.to_string(), metadata.name.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FOLDER_MIME_TYPE;

    fn obj(id: &str, name: &str, parents: &[&str]) -> ObjectMetadata {
        ObjectMetadata {
            id: id.into(),
            name: name.into(),
            parent_ids: parents.iter().map(|p| p.to_string()).collect(),
            mime_type: FOLDER_MIME_TYPE.into(),
            size: None,
            checksum: None,
            created_time: String::new(),
        }
    }

    #[test]
    fn get_is_offline_and_absent_on_miss() {
        let cache = PathCache::new();
        assert!(cache.get("nope").is_none());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn put_overwrites_metadata_but_keeps_memoized_path() {
        let mut cache = PathCache::new();
        cache.put(obj("a", "A", &["r"]), Some("/A".into()));
        cache.put(obj("a", "A2", &["r"]), Some("/A2".into()));
        assert_eq!(cache.get("a").unwrap().name, "A2");
        assert_eq!(cache.absolute_path("a"), Some("/A"));
        assert_eq!(cache.find_by_absolute_path("/A"), Some("a"));
        assert_eq!(cache.find_by_absolute_path("/A2"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn empty_path_is_not_memoized() {
        let mut cache = PathCache::new();
        cache.put(obj("a", "A", &["r"]), Some(String::new()));
        assert_eq!(cache.absolute_path("a"), None);
        cache.put(obj("a", "A", &["r"]), Some("/A".into()));
        assert_eq!(cache.absolute_path("a"), Some("/A"));
    }

    #[test]
    fn child_lookup_matches_first_parent_only() {
        let mut cache = PathCache::new();
        cache.put(obj("b", "B", &["p1", "p2"]), None);
        assert_eq!(cache.find_child_by_name("B", "p1").unwrap().id, "b");
        assert!(cache.find_child_by_name("B", "p2").is_none());
        assert!(cache.find_child_by_name("b", "p1").is_none());
    }

    #[test]
    fn child_index_follows_renames() {
        let mut cache = PathCache::new();
        cache.put(obj("b", "B", &["p"]), None);
        cache.put(obj("b", "C", &["p"]), None);
        assert!(cache.find_child_by_name("B", "p").is_none());
        assert_eq!(cache.find_child_by_name("C", "p").unwrap().id, "b");
    }

    #[test]
    fn duplicate_names_keep_insertion_order() {
        let mut cache = PathCache::new();
        cache.put(obj("d1", "dup", &["p"]), None);
        cache.put(obj("d2", "dup", &["p"]), None);
        cache.put(obj("d1", "dup", &["p"]), None);
        let ids: Vec<&str> = cache
            .find_children_by_name("dup", "p")
            .into_iter()
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(ids, vec!["d1", "d2"]);
        assert_eq!(cache.find_child_by_name("dup", "p").unwrap().id, "d1");
    }

    #[test]
    fn root_alias_resolves_after_root_is_seen() {
        let mut cache = PathCache::new();
        assert!(cache.get(ROOT_ALIAS).is_none());
        cache.put(obj("r0", "My Drive", &[]), None);
        cache.put(obj("a", "A", &["r0"]), None);
        assert_eq!(cache.get(ROOT_ALIAS).unwrap().id, "r0");
        assert_eq!(cache.find_child_by_name("A", ROOT_ALIAS).unwrap().id, "a");
        assert_eq!(cache.find_by_absolute_path("/"), Some("r0"));
    }

    #[test]
    fn noted_root_id_serves_alias_lookups() {
        let mut cache = PathCache::new();
        cache.put(obj("a", "A", &["r0"]), None);
        assert!(cache.find_child_by_name("A", ROOT_ALIAS).is_none());
        cache.note_root_id("r0");
        cache.note_root_id("other");
        assert_eq!(cache.find_child_by_name("A", ROOT_ALIAS).unwrap().id, "a");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn len_never_decreases() {
        let mut cache = PathCache::new();
        let mut last = 0;
        for (id, name) in [("a", "A"), ("b", "B"), ("a", "Z"), ("c", "C"), ("b", "B")] {
            cache.put(obj(id, name, &["r"]), None);
            assert!(cache.len() >= last);
            last = cache.len();
        }
        assert_eq!(last, 3);
    }
}
