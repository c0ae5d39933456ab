//! Catalog index: the read-only show collection and its flattened
//! navigation sequence (section headers interleaved with show rows).
//!
//! Built once at startup and shared by every session without locking.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::show::ShowRecord;

/// A named archive section and its membership rule.
#[derive(Clone, Copy)]
pub struct Section {
    pub label: &'static str,
    pub matches: fn(&ShowRecord) -> bool,
}

/// Archive sections, in display order.  Shows matching none of them are not
/// listed in the archive.
pub const SECTIONS: &[Section] = &[
    Section {
        label: "KLOOM ORIGINALS",
        matches: |s| matches!(s.series.as_str(), "Kloom Lo Kadosh" | "Radio Art 106"),
    },
    Section {
        label: "NOTHING IS HOLY",
        matches: |s| s.series == "Nothing Is Holy",
    },
    Section {
        label: "KOL HAZUTI",
        matches: |s| s.series == "Kol Hazuti",
    },
];

/// One row of the flattened navigation sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    Header(&'static str),
    /// Index into [`Catalog::shows`].
    Show(usize),
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("cannot read catalog {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate show id {0:?}")]
    DuplicateId(String),
    #[error("show {id:?} has an empty {field}")]
    EmptyField { id: String, field: &'static str },
}

#[derive(Debug, Clone)]
pub struct Catalog {
    shows: Vec<ShowRecord>,
    entries: Vec<Entry>,
    /// Navigable show index → position in `entries`.
    show_positions: Vec<usize>,
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self, CatalogError> {
        let shows: Vec<ShowRecord> = serde_json::from_str(content)?;
        Self::from_shows(shows)
    }

    pub fn from_shows(shows: Vec<ShowRecord>) -> Result<Self, CatalogError> {
        Self::with_sections(shows, SECTIONS)
    }

    /// Validate `shows`, order them newest first, and group them under
    /// `sections`.  Empty sections are skipped.
    pub fn with_sections(
        mut shows: Vec<ShowRecord>,
        sections: &[Section],
    ) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for show in &mut shows {
            show.normalize();
            if show.id.trim().is_empty() {
                return Err(CatalogError::EmptyField {
                    id: show.title.clone(),
                    field: "id",
                });
            }
            if show.title.trim().is_empty() {
                return Err(CatalogError::EmptyField {
                    id: show.id.clone(),
                    field: "title",
                });
            }
            if !seen.insert(show.id.clone()) {
                return Err(CatalogError::DuplicateId(show.id.clone()));
            }
        }

        // Stable: shows sharing a date keep their file order.
        shows.sort_by(|a, b| b.date.cmp(&a.date));

        let mut entries = Vec::new();
        for section in sections {
            let members: Vec<usize> = shows
                .iter()
                .enumerate()
                .filter(|(_, s)| (section.matches)(s))
                .map(|(i, _)| i)
                .collect();
            if members.is_empty() {
                continue;
            }
            entries.push(Entry::Header(section.label));
            entries.extend(members.into_iter().map(Entry::Show));
        }

        let show_positions = entries
            .iter()
            .enumerate()
            .filter(|(_, e)| matches!(e, Entry::Show(_)))
            .map(|(pos, _)| pos)
            .collect();

        Ok(Self {
            shows,
            entries,
            show_positions,
        })
    }

    pub fn shows(&self) -> &[ShowRecord] {
        &self.shows
    }

    pub fn show(&self, idx: usize) -> Option<&ShowRecord> {
        self.shows.get(idx)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Number of show rows in the navigation sequence (headers excluded).
    pub fn navigable_count(&self) -> usize {
        self.show_positions.len()
    }

    /// Position of the `nav`-th show row within [`Catalog::entries`].
    pub fn entry_position(&self, nav: usize) -> Option<usize> {
        self.show_positions.get(nav).copied()
    }

    /// Show index behind the `nav`-th show row.
    pub fn navigable_show(&self, nav: usize) -> Option<usize> {
        match self.entries.get(self.entry_position(nav)?) {
            Some(Entry::Show(idx)) => Some(*idx),
            _ => None,
        }
    }

    pub fn find(&self, id: &str) -> Option<usize> {
        self.shows.iter().position(|s| s.id == id)
    }
}
