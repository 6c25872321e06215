//! In-memory store used by the unit tests. Counts every call so tests can
//! assert on cache effectiveness.

use std::cell::Cell;
use std::collections::HashMap;

use anyhow::anyhow;

use crate::error::{DriveError, Result};
use crate::store::{FOLDER_MIME_TYPE, MetadataStore, ObjectMetadata, ROOT_ALIAS, SortOrder};

pub const ROOT_ID: &str = "r0";

#[derive(Default)]
pub struct FakeStore {
    objects: HashMap<String, ObjectMetadata>,
    order: Vec<String>,
    pub gets: Cell<usize>,
    pub queries: Cell<usize>,
    pub lists: Cell<usize>,
    pub unavailable: Cell<bool>,
    /// Number of `list_children` calls that succeed before the store goes away.
    pub lists_before_failure: Cell<Option<usize>>,
}

impl FakeStore {
    pub fn new() -> Self {
        let mut store = Self::default();
        store.add(object(ROOT_ID, "My Drive", &[], FOLDER_MIME_TYPE, None));
        store
    }

    pub fn add(&mut self, metadata: ObjectMetadata) -> &mut Self {
        if !self.objects.contains_key(&metadata.id) {
            self.order.push(metadata.id.clone());
        }
        self.objects.insert(metadata.id.clone(), metadata);
        self
    }

    pub fn dir(&mut self, id: &str, name: &str, parents: &[&str]) -> &mut Self {
        self.add(object(id, name, parents, FOLDER_MIME_TYPE, None))
    }

    pub fn file(&mut self, id: &str, name: &str, parents: &[&str]) -> &mut Self {
        self.add(object(id, name, parents, "text/plain", Some(12)))
    }

    pub fn doc(&mut self, id: &str, name: &str, parents: &[&str]) -> &mut Self {
        self.add(object(
            id,
            name,
            parents,
            "application/vnd.google-apps.document",
            None,
        ))
    }

    pub fn calls(&self) -> usize {
        self.gets.get() + self.queries.get() + self.lists.get()
    }

    fn canonical<'a>(&self, id: &'a str) -> &'a str {
        if id == ROOT_ALIAS { ROOT_ID } else { id }
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.get() {
            return Err(DriveError::StoreUnavailable(anyhow!("connection refused")));
        }
        Ok(())
    }

    fn children<'a>(&'a self, parent_id: &'a str) -> impl Iterator<Item = &'a ObjectMetadata> + 'a {
        let parent_id = self.canonical(parent_id);
        self.order
            .iter()
            .filter_map(|id| self.objects.get(id))
            .filter(move |m| m.parent_ids.iter().any(|p| p == parent_id))
    }
}

pub fn object(
    id: &str,
    name: &str,
    parents: &[&str],
    mime: &str,
    size: Option<u64>,
) -> ObjectMetadata {
    ObjectMetadata {
        id: id.into(),
        name: name.into(),
        parent_ids: parents.iter().map(|p| p.to_string()).collect(),
        mime_type: mime.into(),
        size,
        checksum: size.map(|_| "d41d8cd98f00b204e9800998ecf8427e".to_string()),
        created_time: "2026-01-15T12:30:45.000Z".into(),
    }
}

impl MetadataStore for FakeStore {
    fn get_object(&self, id: &str) -> Result<ObjectMetadata> {
        self.gets.set(self.gets.get() + 1);
        self.check_available()?;
        self.objects
            .get(self.canonical(id))
            .cloned()
            .ok_or_else(|| DriveError::NotFound(id.to_string()))
    }

    fn query_by_name(&self, name: &str, parent_id: &str) -> Result<Vec<ObjectMetadata>> {
        self.queries.set(self.queries.get() + 1);
        self.check_available()?;
        Ok(self
            .children(parent_id)
            .filter(|m| m.name == name)
            .cloned()
            .collect())
    }

    fn list_children(&self, parent_id: &str, order: SortOrder) -> Result<Vec<ObjectMetadata>> {
        self.lists.set(self.lists.get() + 1);
        if self.lists_before_failure.get().is_some_and(|n| self.lists.get() > n) {
            self.unavailable.set(true);
        }
        self.check_available()?;
        let mut out: Vec<ObjectMetadata> = self.children(parent_id).cloned().collect();
        if order != SortOrder::None {
            out.sort_by(|a, b| {
                let folders = b.is_directory().cmp(&a.is_directory());
                let key = match order {
                    SortOrder::Size => b.size.cmp(&a.size),
                    SortOrder::Created => b.created_time.cmp(&a.created_time),
                    _ => std::cmp::Ordering::Equal,
                };
                folders.then(key).then_with(|| a.name.cmp(&b.name))
            });
        }
        Ok(out)
    }
}
