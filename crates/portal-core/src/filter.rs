//! Free-text filter engine.
//!
//! Filtering is a stable boolean keep/drop over borrowed records: a record
//! survives when any of its searchable fields contains the normalised term as
//! a case-insensitive substring. Nothing is re-sorted, scored, or copied, and
//! the input collection is never modified.
//!
//! # Example
//!
//! ```
//! use portal_core::{filter_records, seed_switches};
//!
//! let switches = seed_switches();
//! let hits = filter_records(&switches, "  PISO 2 ");
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].name, "Switch Piso 2");
//! ```

use serde::Serialize;
use tracing::trace;

use crate::models::{Bookmark, BookmarkSection, Switch, Task};

/// Records that expose textual fields to the free-text filter.
pub trait Searchable {
    /// Fields searched, in order. Absent optional fields are simply omitted.
    fn search_fields(&self) -> Vec<&str>;
}

impl Searchable for Bookmark {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.label.as_str(), self.url.as_str()];
        fields.extend(self.description.as_deref());
        if let Some(tags) = &self.tags {
            fields.extend(tags.iter().map(String::as_str));
        }
        fields
    }
}

impl Searchable for Switch {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.ip.as_str()];
        fields.extend(self.location.as_deref());
        fields.extend(self.notes.as_deref());
        fields
    }
}

impl Searchable for Task {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str()]
    }
}

/// Trim and lower-case a raw term. `None` means "no filtering".
pub fn normalize_term(term: &str) -> Option<String> {
    let trimmed = term.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Whether any field contains `needle`, which must already be normalised.
pub fn matches<'a>(fields: impl IntoIterator<Item = &'a str>, needle: &str) -> bool {
    fields
        .into_iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Filter with a caller-chosen field selector instead of the entity default.
pub fn filter_by<'a, T, F>(records: &'a [T], term: &str, selector: F) -> Vec<&'a T>
where
    F: Fn(&'a T) -> Vec<&'a str>,
{
    match normalize_term(term) {
        None => records.iter().collect(),
        Some(needle) => records
            .iter()
            .filter(|record| matches(selector(*record), &needle))
            .collect(),
    }
}

/// Filter flat records (switches, tasks) on their default fields.
pub fn filter_records<'a, T: Searchable>(records: &'a [T], term: &str) -> Vec<&'a T> {
    filter_by(records, term, |record| record.search_fields())
}

/// A section re-grouped after filtering, borrowing from the source data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionView<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub links: Vec<&'a Bookmark>,
}

impl<'a> SectionView<'a> {
    /// Owned copy, for callers that must outlive the source collection.
    pub fn to_section(&self) -> BookmarkSection {
        BookmarkSection {
            id: self.id.to_string(),
            title: self.title.to_string(),
            links: self.links.iter().map(|link| (*link).clone()).collect(),
        }
    }
}

impl<'a> From<&'a BookmarkSection> for SectionView<'a> {
    fn from(section: &'a BookmarkSection) -> Self {
        Self {
            id: &section.id,
            title: &section.title,
            links: section.links.iter().collect(),
        }
    }
}

/// Filter bookmarks and re-group them by section.
///
/// An empty term returns every section as-is, empty ones included. Otherwise
/// sections left without links are dropped.
pub fn filter_sections<'a>(sections: &'a [BookmarkSection], term: &str) -> Vec<SectionView<'a>> {
    let Some(needle) = normalize_term(term) else {
        return sections.iter().map(SectionView::from).collect();
    };

    let views: Vec<SectionView<'a>> = sections
        .iter()
        .map(|section| SectionView {
            id: &section.id,
            title: &section.title,
            links: section
                .links
                .iter()
                .filter(|link| matches(link.search_fields(), &needle))
                .collect(),
        })
        .filter(|view| !view.links.is_empty())
        .collect();

    trace!(
        term = %needle,
        sections_in = sections.len(),
        sections_out = views.len(),
        "Filtered bookmark sections"
    );
    views
}
