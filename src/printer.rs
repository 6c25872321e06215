use std::io::Write;

use tracing::debug;

use crate::error::{DriveError, Result};
use crate::resolver::PathResolver;
use crate::store::{MetadataStore, ObjectMetadata, PATH_SEP, SortOrder};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub recursive: bool,
    /// Include native documents that have no binary content.
    pub show_docs: bool,
    pub order: SortOrder,
    /// Prefix every entry with id, size and creation date.
    pub long: bool,
}

/// Writes a directory listing line by line as the store answers.
///
/// Output for each directory is a `+ <path>:` header, one line per child
/// (directories end in `/`), then a blank line.
pub struct DirectoryPrinter<'r, 's, S: MetadataStore + ?Sized, W: Write> {
    resolver: &'r mut PathResolver<'s, S>,
    out: W,
    options: ListOptions,
}

impl<'r, 's, S: MetadataStore + ?Sized, W: Write> DirectoryPrinter<'r, 's, S, W> {
    pub fn new(resolver: &'r mut PathResolver<'s, S>, out: W, options: ListOptions) -> Self {
        Self {
            resolver,
            out,
            options,
        }
    }

    /// List directory `id`. `path` is used as the header verbatim when given,
    /// otherwise it is resolved from the parent chain.
    ///
    /// Paths under a supplied header are printed but never memoized.
    pub fn print_directory(&mut self, id: &str, path: Option<&str>) -> Result<()> {
        let dir = self.resolver.get_object(id)?;
        if !dir.is_directory() {
            return Err(DriveError::NotADirectory(id.to_string()));
        }
        let (path, canonical) = match path {
            Some(p) => (p.to_string(), false),
            None => (self.resolver.resolve_absolute_path(&dir)?, true),
        };

        // Depth-first with an explicit stack; children are pushed in reverse
        // so they come off in listing order.
        let mut pending = vec![(dir, path)];
        while let Some((dir, path)) = pending.pop() {
            let subdirs = self.print_level(&dir, &path, canonical)?;
            if self.options.recursive {
                pending.extend(subdirs.into_iter().rev());
            }
        }
        self.out.flush()?;
        Ok(())
    }

    fn print_level(
        &mut self,
        dir: &ObjectMetadata,
        path: &str,
        canonical: bool,
    ) -> Result<Vec<(ObjectMetadata, String)>> {
        writeln!(self.out, "+ {path}:")?;

        let children = self
            .resolver
            .store()
            .list_children(&dir.id, self.options.order)?;
        debug!(id = %dir.id, path, count = children.len(), "listed directory");

        let mut subdirs = Vec::new();
        for child in children {
            if child.is_document() && !self.options.show_docs {
                continue;
            }
            let child_path = join_path(path, &child.name);
            let suffix = if child.is_directory() { "/" } else { "" };
            if self.options.long {
                writeln!(self.out, "{}{child_path}{suffix}", long_entry_prefix(&child))?;
            } else {
                writeln!(self.out, "{child_path}{suffix}")?;
            }

            // Only a canonical header listed through the first parent yields
            // the canonical path.
            let memo = (canonical && child.first_parent() == Some(dir.id.as_str()))
                .then(|| child_path.clone());
            self.resolver.cache_mut().put(child.clone(), memo);

            if child.is_directory() {
                subdirs.push((child, child_path));
            }
        }
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(subdirs)
    }
}

pub fn join_path(parent: &str, name: &str) -> String {
    if parent.ends_with(PATH_SEP) {
        format!("{parent}{name}")
    } else {
        format!("{parent}{PATH_SEP}{name}")
    }
}

/// `id  size  date  ` prefix used by long listings.
pub fn long_entry_prefix(e: &ObjectMetadata) -> String {
    let size_str = match e.size {
        Some(size) if !e.is_directory() => format!("{:>9}", format_size(size)),
        _ => format!("{:>9}", "-"),
    };
    let date = format_date(&e.created_time);
    format!("{}  {}  {:16}  ", e.id, size_str, date)
}

pub fn format_date(iso: &str) -> String {
    // "2026-01-15T12:30:45.000Z" -> "2026-01-15 12:30"
    if iso.is_empty() {
        return "-".to_string();
    }
    let s = iso.replace('T', " ");
    match s.get(..16) {
        Some(head) => head.to_string(),
        None => s,
    }
}

pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;
    const GB: u64 = 1024 * MB;
    const TB: u64 = 1024 * GB;

    if bytes >= TB {
        format!("{:.1} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
