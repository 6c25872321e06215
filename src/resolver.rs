use serde::Deserialize;
use tracing::{debug, warn};

use crate::cache::PathCache;
use crate::error::{DriveError, Result};
use crate::store::{MetadataStore, ObjectMetadata, PATH_SEP, ROOT_ALIAS};

/// What to do when a path segment names more than one child of its parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AmbiguityPolicy {
    /// Take the first match in the order the store returns them.
    #[default]
    FirstMatch,
    /// Fail with `AmbiguousName`.
    Refuse,
}

/// How to turn the parent graph into a tree when computing paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParentPolicy {
    /// Follow `parent_ids[0]`; an object with several parents gets the path
    /// through its first one.
    #[default]
    FirstOnly,
    /// Fail with `MultipleParents` instead of picking.
    RefuseMultiple,
}

/// Translates between absolute paths and object ids for one command run.
pub struct PathResolver<'s, S: MetadataStore + ?Sized> {
    store: &'s S,
    cache: PathCache,
    ambiguity: AmbiguityPolicy,
    parents: ParentPolicy,
}

impl<'s, S: MetadataStore + ?Sized> PathResolver<'s, S> {
    pub fn new(store: &'s S, cache: PathCache) -> Self {
        Self {
            store,
            cache,
            ambiguity: AmbiguityPolicy::default(),
            parents: ParentPolicy::default(),
        }
    }

    pub fn with_policies(mut self, ambiguity: AmbiguityPolicy, parents: ParentPolicy) -> Self {
        self.ambiguity = ambiguity;
        self.parents = parents;
        self
    }

    pub fn store(&self) -> &'s S {
        self.store
    }

    pub fn cache(&self) -> &PathCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut PathCache {
        &mut self.cache
    }

    /// Metadata for `id`, from the cache when possible.
    pub fn get_object(&mut self, id: &str) -> Result<ObjectMetadata> {
        if let Some(meta) = self.cache.get(id) {
            debug!(id, "cache hit");
            return Ok(meta.clone());
        }
        debug!(id, "cache miss, fetching object");
        let meta = self.store.get_object(id)?;
        self.cache.put(meta.clone(), None);
        Ok(meta)
    }

    fn parent_of<'m>(&self, meta: &'m ObjectMetadata) -> Result<Option<&'m str>> {
        if self.parents == ParentPolicy::RefuseMultiple && meta.parent_ids.len() > 1 {
            warn!(id = %meta.id, count = meta.parent_ids.len(), "refusing multi-parent object");
            return Err(DriveError::MultipleParents {
                id: meta.id.clone(),
                count: meta.parent_ids.len(),
            });
        }
        Ok(meta.first_parent())
    }

    /// Absolute path of `object`, walking parent pointers up to the root.
    /// The root's own name is never part of the path.
    pub fn resolve_absolute_path(&mut self, object: &ObjectMetadata) -> Result<String> {
        let Some(first) = self.parent_of(object)? else {
            return Ok(PATH_SEP.to_string());
        };
        if let Some(path) = self.cache.absolute_path(&object.id) {
            return Ok(path.to_string());
        }

        let mut parent_id = first.to_string();
        let mut walked = vec![object.clone()];
        let prefix = loop {
            if let Some(path) = self.cache.absolute_path(&parent_id) {
                break path.to_string();
            }
            let parent = self.get_object(&parent_id)?;
            match self.parent_of(&parent)?.map(str::to_string) {
                None => break String::new(),
                Some(next) => {
                    parent_id = next;
                    walked.push(parent);
                }
            }
        };

        // Memoize every ancestor on the way back down.
        let mut path = prefix;
        for meta in walked.into_iter().rev() {
            path.push(PATH_SEP);
            path.push_str(&meta.name);
            self.cache.put(meta, Some(path.clone()));
        }
        debug!(id = %object.id, path = %path, "resolved absolute path");
        Ok(path)
    }

    /// Id of the object at absolute `path`. The empty string and `/` both
    /// resolve to the root alias.
    pub fn resolve_id(&mut self, path: &str) -> Result<String> {
        if !path.is_empty() && !path.starts_with(PATH_SEP) {
            return Err(DriveError::InvalidPath(path.to_string()));
        }
        let segments: Vec<&str> = path.split(PATH_SEP).filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            return Ok(ROOT_ALIAS.to_string());
        }

        let normalized = format!("{PATH_SEP}{}", segments.join("/"));
        if let Some(id) = self.cache.find_by_absolute_path(&normalized) {
            debug!(path = %normalized, id, "path cache hit");
            return Ok(id.to_string());
        }

        let mut current: Option<ObjectMetadata> = None;
        for segment in &segments {
            let parent = current.as_ref().map_or(ROOT_ALIAS, |m| m.id.as_str());
            let child = self.lookup_child(segment, parent, &normalized)?;
            current = Some(child);
        }

        let found = current.ok_or_else(|| DriveError::InvalidPath(path.to_string()))?;
        let id = found.id.clone();
        self.cache.put(found, Some(normalized));
        Ok(id)
    }

    fn lookup_child(&mut self, name: &str, parent_id: &str, path: &str) -> Result<ObjectMetadata> {
        // Refuse must see every sibling, which only the store can promise.
        if self.ambiguity == AmbiguityPolicy::FirstMatch {
            if let Some(meta) = self.cache.find_child_by_name(name, parent_id) {
                debug!(name, parent_id, "child cache hit");
                return Ok(meta.clone());
            }
        }

        debug!(name, parent_id, "querying child by name");
        let matches = self.store.query_by_name(name, parent_id)?;
        let Some(first) = matches.first().cloned() else {
            return Err(DriveError::PathNotFound {
                path: path.to_string(),
                segment: name.to_string(),
            });
        };
        if matches.len() > 1 && self.ambiguity == AmbiguityPolicy::Refuse {
            warn!(path, name, count = matches.len(), "ambiguous path segment");
            return Err(DriveError::AmbiguousName {
                path: path.to_string(),
                segment: name.to_string(),
                count: matches.len(),
            });
        }

        for meta in matches {
            // A lone parent of a child of the root alias can only be the root.
            if parent_id == ROOT_ALIAS && meta.parent_ids.len() == 1 {
                self.cache.note_root_id(&meta.parent_ids[0]);
            }
            self.cache.put(meta, None);
        }
        Ok(first)
    }

    /// Accepts either an absolute path or a literal id and returns an id.
    /// Anything that fails to resolve as a path is passed through untouched.
    pub fn secure_id(&mut self, expr: &str) -> String {
        if expr.contains(PATH_SEP) {
            match self.resolve_id(expr) {
                Ok(id) => return id,
                Err(e) => debug!(expr, error = %e, "not a resolvable path, treating as id"),
            }
        }
        expr.to_string()
    }
}
