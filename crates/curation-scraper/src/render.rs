//! Flatten [`StructuredContent`] into readable plain text.
//!
//! Counts on [`PageContent`](crate::types::PageContent) are computed from
//! this text, never from raw HTML, so navigation and scripts do not inflate
//! them.

use crate::types::StructuredContent;

/// Headers, then each section's title, paragraphs, `• ` list items and
/// `label: value` rows. Blocks are separated by one blank line.
pub fn render_text(content: &StructuredContent) -> String {
    let mut lines: Vec<String> = Vec::new();

    for header in &content.header {
        push_block(&mut lines, header.text.clone());
    }

    for section in &content.main_sections {
        if let Some(title) = section.title.as_deref().filter(|t| !t.is_empty()) {
            push_block(&mut lines, title.to_string());
        }
        for paragraph in &section.paragraphs {
            push_block(&mut lines, paragraph.clone());
        }
        for list in &section.lists {
            lines.extend(list.iter().map(|item| format!("• {item}")));
            lines.push(String::new());
        }
        for table in &section.tables {
            lines.extend(
                table
                    .rows
                    .iter()
                    .filter(|row| !row.label.is_empty() && !row.value.is_empty())
                    .map(|row| format!("{}: {}", row.label, row.value)),
            );
            lines.push(String::new());
        }
    }

    collapse_blank_lines(&lines.join("\n")).trim().to_string()
}

fn push_block(lines: &mut Vec<String>, text: String) {
    lines.push(text);
    lines.push(String::new());
}

/// Collapse any run of three or more newlines to exactly two.
fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut newlines = 0;
    for c in text.chars() {
        if c == '\n' {
            newlines += 1;
            if newlines > 2 {
                continue;
            }
        } else {
            newlines = 0;
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{HeaderItem, Section, Table, TableRow};

    #[test]
    fn test_render_order_and_format() {
        let mut section = Section::titled("Research");
        section.paragraphs.push("Medieval law.".into());
        section.lists.push(vec!["Codices".into(), "Charters".into()]);
        section.tables.push(Table {
            rows: vec![TableRow::new("Email", "a@b.ch")],
        });
        let content = StructuredContent {
            header: vec![HeaderItem {
                level: 1,
                text: "Jane Doe".into(),
            }],
            main_sections: vec![section],
            ..Default::default()
        };

        assert_eq!(
            render_text(&content),
            "Jane Doe\n\nResearch\n\nMedieval law.\n\n• Codices\n• Charters\n\nEmail: a@b.ch"
        );
    }

    #[test]
    fn test_empty_tables_do_not_leave_gaps() {
        let mut section = Section::titled("Content");
        section.tables.push(Table::default());
        section.tables.push(Table::default());
        section.paragraphs.push("Text".into());
        let content = StructuredContent {
            main_sections: vec![section],
            ..Default::default()
        };
        assert_eq!(render_text(&content), "Content\n\nText");
    }

    #[test]
    fn test_collapse_blank_lines() {
        assert_eq!(collapse_blank_lines("a\n\n\n\nb\nc"), "a\n\nb\nc");
    }

    #[test]
    fn test_empty_content_renders_empty() {
        assert_eq!(render_text(&StructuredContent::default()), "");
    }
}
