//! Page-wide contact harvesting.
//!
//! Contact data is scattered across tables, links, obfuscated attributes,
//! JSON-LD and free text. Each source is a [`probes::Probe`]; their rows are
//! folded through one [`ContactRows`] accumulator so a fact found twice is
//! reported once. The result is merged into the section list by
//! [`merge_into_sections`].

pub mod obfuscation;
pub mod probes;

use std::collections::HashSet;

use scraper::Html;
use tracing::{debug, info};

use crate::types::{Section, Table, TableRow};

/// Title of the section created when no existing one looks like contact data.
pub const CONTACT_SECTION_TITLE: &str = "Contact Information";

/// Section titles that already hold contact data.
const CONTACT_SECTION_KEYWORDS: &[&str] = &[
    "contact",
    "contact information",
    "kontakt",
    "address",
    "adresse",
    "email",
    "e-mail",
    "telefon",
    "tel",
    "phone",
    "room",
    "raum",
    "office",
    "büro",
];

/// Ordered, deduplicated contact rows for one page.
#[derive(Debug, Default)]
pub struct ContactRows {
    rows: Vec<TableRow>,
    seen: HashSet<(String, String)>,
}

impl ContactRows {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a row unless its value is empty or an equal row was already added.
    /// An empty label becomes `Contact`.
    pub fn add(&mut self, row: TableRow) -> bool {
        let value = row.value.trim();
        if value.is_empty() {
            return false;
        }
        let label = match row.label.trim() {
            "" => "Contact",
            label => label,
        };
        let row = TableRow::new(label, value);
        if !self.seen.insert(row.dedup_key()) {
            return false;
        }
        debug!(label = %row.label, value = %row.value, "contact row");
        self.rows.push(row);
        true
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<TableRow> {
        self.rows
    }
}

/// Run every probe over `document` and return the deduplicated rows.
pub fn harvest(document: &Html) -> Vec<TableRow> {
    let mut acc = ContactRows::new();
    for (name, probe) in probes::PROBES {
        let added = probe(document)
            .into_iter()
            .filter(|row| acc.add(row.clone()))
            .count();
        debug!(probe = *name, added, "contact probe finished");
    }
    info!(rows = acc.len(), "contact harvest complete");
    acc.into_rows()
}

/// Merge harvested rows into `sections`.
///
/// Rows go into the first table of the first section whose title looks like
/// contact data, skipping rows already present there. Without such a
/// section a new "Contact Information" section is inserted first.
pub fn merge_into_sections(sections: &mut Vec<Section>, rows: Vec<TableRow>) {
    if rows.is_empty() {
        return;
    }

    let Some(index) = sections
        .iter()
        .position(|s| is_contact_title(s.title.as_deref()))
    else {
        info!(rows = rows.len(), "creating contact section");
        let mut section = Section::titled(CONTACT_SECTION_TITLE);
        section.tables.push(Table { rows });
        sections.insert(0, section);
        return;
    };

    let target = &mut sections[index];
    info!(title = ?target.title, "merging contact rows into existing section");
    let mut seen: HashSet<_> = target
        .tables
        .iter()
        .flat_map(|t| t.rows.iter().map(TableRow::dedup_key))
        .collect();

    for row in rows {
        if !seen.insert(row.dedup_key()) {
            continue;
        }
        match target.tables.first_mut() {
            Some(table) => table.rows.push(row),
            None => target.tables.push(Table { rows: vec![row] }),
        }
    }
}

fn is_contact_title(title: Option<&str>) -> bool {
    let Some(title) = title else {
        return false;
    };
    let lower = title.trim().to_lowercase();
    CONTACT_SECTION_KEYWORDS.iter().any(|k| lower.contains(k))
}
