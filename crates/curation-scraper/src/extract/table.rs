use scraper::ElementRef;

use super::dom::{
    child_elements, descendants_named, element_text, is_tag, normalize_ws, subtree_named,
};
use crate::contact::obfuscation::{deobfuscate, link_target};
use crate::types::{Table, TableRow};

/// Label/value rows from `<table>` and `<dl>` elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableExtractor;

impl TableExtractor {
    /// All non-empty tables under `root`: `<table>`s first, then `<dl>`s.
    pub fn extract(&self, root: ElementRef<'_>) -> Vec<Table> {
        let tables = subtree_named(root, &["table"]).filter_map(|t| self.table(t));
        let dls = subtree_named(root, &["dl"]).filter_map(|dl| self.definition_list(dl));
        tables.chain(dls).collect()
    }

    /// Rows with at least two non-empty cells. The label is the first
    /// cell, the value is the second cell's text pieces joined by ` | `.
    pub fn table(&self, table: ElementRef<'_>) -> Option<Table> {
        let rows = descendants_named(table, &["tr"])
            .filter_map(|tr| {
                let cells = non_empty_cells(tr);
                let [label, value, ..] = cells.as_slice() else {
                    return None;
                };
                row(element_text(label), joined_text(value, " | "))
            })
            .collect();
        non_empty(rows)
    }

    /// `<dt>`/`<dd>` pairs matched by index.
    pub fn definition_list(&self, dl: ElementRef<'_>) -> Option<Table> {
        let dts: Vec<_> = descendants_named(dl, &["dt"]).collect();
        let dds: Vec<_> = descendants_named(dl, &["dd"]).collect();
        let rows = dts
            .iter()
            .zip(dds.iter())
            .filter_map(|(dt, dd)| row(element_text(dt), joined_text(dd, " | ")))
            .collect();
        non_empty(rows)
    }
}

/// Table reader used by the contact harvester.
///
/// Keeps line breaks in values (postal addresses), prefers the target of a
/// `mailto:`/`tel:` link over the visible text, and undoes `AT`/`DOT`
/// obfuscation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContactTableExtractor;

impl ContactTableExtractor {
    pub fn table(&self, table: ElementRef<'_>) -> Option<Table> {
        let rows = descendants_named(table, &["tr"])
            .filter_map(|tr| {
                let cells = non_empty_cells(tr);
                let [label, value, ..] = cells.as_slice() else {
                    return None;
                };
                row(element_text(label), contact_value(value))
            })
            .collect();
        non_empty(rows)
    }

    /// Only direct `<dt>`/`<dd>` children are paired.
    pub fn definition_list(&self, dl: ElementRef<'_>) -> Option<Table> {
        let dts: Vec<_> = child_elements(dl).filter(|e| is_tag(e, "dt")).collect();
        let dds: Vec<_> = child_elements(dl).filter(|e| is_tag(e, "dd")).collect();
        let rows = dts
            .iter()
            .zip(dds.iter())
            .filter_map(|(dt, dd)| row(element_text(dt), contact_value(dd)))
            .collect();
        non_empty(rows)
    }
}

fn non_empty_cells(tr: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    descendants_named(tr, &["td", "th"])
        .filter(|cell| cell.text().any(|t| !t.trim().is_empty()))
        .collect()
}

fn joined_text(el: &ElementRef<'_>, sep: &str) -> String {
    let pieces: Vec<&str> = el
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();
    normalize_ws(&pieces.join(sep))
}

fn contact_value(cell: &ElementRef<'_>) -> String {
    let linked = descendants_named(*cell, &["a"])
        .filter_map(|a| a.value().attr("href").and_then(link_target))
        .next();
    let value = match linked {
        Some(target) => target.into_value(),
        None => cell
            .text()
            .flat_map(str::lines)
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
    };
    deobfuscate(&value)
}

fn row(label: String, value: String) -> Option<TableRow> {
    (!label.is_empty() && !value.is_empty()).then(|| TableRow::new(label, value))
}

fn non_empty(rows: Vec<TableRow>) -> Option<Table> {
    (!rows.is_empty()).then_some(Table { rows })
}
