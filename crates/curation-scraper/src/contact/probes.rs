//! Independent contact probes. Each reads the whole document and returns
//! candidate rows; deduplication happens in the caller.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;

use super::obfuscation::{decode_cfemail, deobfuscate, link_target, LinkTarget};
use crate::extract::dom::{has_ancestor, normalize_ws};
use crate::extract::ContactTableExtractor;
use crate::types::TableRow;

/// A probe: one independent source of contact rows.
pub type Probe = fn(&Html) -> Vec<TableRow>;

/// Row labels that mark a table row as contact data.
const CONTACT_LABEL_KEYWORDS: &[&str] = &[
    "email", "e-mail", "phone", "tel", "address", "adresse", "room", "office", "kontakt",
    "website", "homepage", "orcid", "linkedin", "profiles",
];

const USER_ATTR_PATTERNS: &[&str] = &[
    "data-user",
    "data-mail-user",
    "data-local",
    "data-name",
    "data-account",
];
const DOMAIN_ATTR_PATTERNS: &[&str] = &["data-domain", "data-mail-domain", "data-host"];

const ADDRESS_KEYS: &[&str] = &[
    "streetAddress",
    "postalCode",
    "addressLocality",
    "addressRegion",
    "addressCountry",
];

/// `<address>` texts this short are labels, not addresses.
const MIN_ADDRESS_CHARS: usize = 6;

/// Cloudflare rewrites protected `mailto:` links to this path.
const CF_PROTECTION_PATH: &str = "/cdn-cgi/l/email-protection#";

#[allow(clippy::expect_used)]
static TABLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("table selector is valid"));
#[allow(clippy::expect_used)]
static DL_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("dl").expect("dl selector is valid"));
#[allow(clippy::expect_used)]
static LINK_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("link selector is valid"));
#[allow(clippy::expect_used)]
static CFEMAIL_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[data-cfemail]").expect("cfemail selector is valid"));
#[allow(clippy::expect_used)]
static ADDRESS_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("address").expect("address selector is valid"));
#[allow(clippy::expect_used)]
static JSONLD_SEL: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"script[type*="ld+json"]"#).expect("JSON-LD selector is valid")
});

#[allow(clippy::expect_used)]
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("email regex is valid")
});

#[allow(clippy::expect_used)]
static OBFUSCATED_EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Za-z0-9._%+-]+)\s+(?:AT|at)\s+([A-Za-z0-9.-]+\.[A-Za-z]{2,})\b")
        .expect("obfuscated email regex is valid")
});

// Swiss numbers first, then ten-digit national, then generic international.
#[allow(clippy::expect_used)]
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\+41\s?\d{2}\s?\d{3}\s?\d{2}\s?\d{2}|\d{3}\s?\d{3}\s?\d{2}\s?\d{2}|\+\d{1,3}\s?\d{1,4}\s?\d{1,4}\s?\d{1,4}",
    )
    .expect("phone regex is valid")
});

/// Probes in the order their rows should appear.
pub const PROBES: &[(&str, Probe)] = &[
    ("tables", contact_tables),
    ("links", contact_links),
    ("cfemail", cloudflare_elements),
    ("data-attributes", data_attributes),
    ("address", address_tags),
    ("json-ld", json_ld),
    ("visible-text", visible_text),
];

// ── Tables and definition lists ─────────────────────────────────────────────

/// Contact-labelled rows of every table and `<dl>` outside page chrome.
pub fn contact_tables(document: &Html) -> Vec<TableRow> {
    let reader = ContactTableExtractor;
    let outside_chrome = |el: &ElementRef<'_>| !has_ancestor(el, &["nav", "footer", "aside"]);

    let tables = document
        .select(&TABLE_SEL)
        .filter(outside_chrome)
        .filter_map(|t| reader.table(t));
    let dls = document
        .select(&DL_SEL)
        .filter(outside_chrome)
        .filter_map(|dl| reader.definition_list(dl));

    tables
        .chain(dls)
        .flat_map(|t| t.rows)
        .filter(|row| is_contact_label(&row.label))
        .collect()
}

fn is_contact_label(label: &str) -> bool {
    let lower = label.to_lowercase();
    CONTACT_LABEL_KEYWORDS.iter().any(|k| lower.contains(k))
}

// ── Links ───────────────────────────────────────────────────────────────────

/// `mailto:`/`tel:` anchors, plus Cloudflare-protected anchors.
pub fn contact_links(document: &Html) -> Vec<TableRow> {
    let mut rows = Vec::new();
    for a in document.select(&LINK_SEL) {
        let href = a.value().attr("href").unwrap_or_default();
        let cf = a.value().attr("data-cfemail").and_then(decode_cfemail);

        match link_target(href) {
            Some(LinkTarget::Email(address)) => {
                let address = cf.unwrap_or(address);
                rows.push(TableRow::new("Email", deobfuscate(&address)));
            }
            Some(phone @ LinkTarget::Phone(_)) => {
                rows.push(TableRow::new(phone.label(), phone.value()));
            }
            None => {
                let protected = href
                    .split_once(CF_PROTECTION_PATH)
                    .and_then(|(_, fragment)| decode_cfemail(fragment));
                if let Some(address) = protected {
                    rows.push(TableRow::new("Email", address));
                }
            }
        }
    }
    rows
}

// ── Attributes ──────────────────────────────────────────────────────────────

/// Every element carrying `data-cfemail`, anchors included.
pub fn cloudflare_elements(document: &Html) -> Vec<TableRow> {
    document
        .select(&CFEMAIL_SEL)
        .filter_map(|el| el.value().attr("data-cfemail").and_then(decode_cfemail))
        .map(|email| TableRow::new("Email", email))
        .collect()
}

/// Plain `data-email` attributes and split user/domain attribute pairs.
pub fn data_attributes(document: &Html) -> Vec<TableRow> {
    let mut rows = Vec::new();
    for el in document.root_element().descendants().filter_map(ElementRef::wrap) {
        let mut user = None;
        let mut domain = None;
        for (name, value) in el.value().attrs() {
            let name = name.to_ascii_lowercase();
            if name == "data-email" {
                rows.push(TableRow::new("Email", value));
            }
            if user.is_none() && USER_ATTR_PATTERNS.iter().any(|p| name.contains(p)) {
                user = Some(value);
            }
            if domain.is_none() && DOMAIN_ATTR_PATTERNS.iter().any(|p| name.contains(p)) {
                domain = Some(value);
            }
        }
        if let (Some(user), Some(domain)) = (user, domain) {
            rows.push(TableRow::new("Email", format!("{user}@{domain}")));
        }
    }
    rows
}

// ── <address> ───────────────────────────────────────────────────────────────

pub fn address_tags(document: &Html) -> Vec<TableRow> {
    document
        .select(&ADDRESS_SEL)
        .map(|el| normalize_ws(&el.text().collect::<Vec<_>>().join(" ")))
        .filter(|text| text.chars().count() >= MIN_ADDRESS_CHARS)
        .map(|text| TableRow::new("Address", text))
        .collect()
}

// ── JSON-LD ─────────────────────────────────────────────────────────────────

/// schema.org `Person`, `Organization` and `PostalAddress` objects.
pub fn json_ld(document: &Html) -> Vec<TableRow> {
    let mut rows = Vec::new();
    for script in document.select(&JSONLD_SEL) {
        let raw = script.inner_html();
        let Ok(value) = serde_json::from_str::<Value>(raw.trim()) else {
            continue;
        };
        walk_json_ld(&value, &mut rows);
    }
    rows
}

fn walk_json_ld(value: &Value, rows: &mut Vec<TableRow>) {
    match value {
        Value::Array(items) => items.iter().for_each(|item| walk_json_ld(item, rows)),
        Value::Object(obj) => {
            if let Some(graph) = obj.get("@graph").and_then(Value::as_array) {
                graph.iter().for_each(|item| walk_json_ld(item, rows));
            }
            json_ld_object(value, rows);
        }
        _ => {}
    }
}

fn json_ld_object(obj: &Value, rows: &mut Vec<TableRow>) {
    if has_ld_type(obj, &["person", "organization"]) {
        if let Some(email) = obj.get("email").and_then(Value::as_str) {
            let email = email.trim();
            let email = email.strip_prefix("mailto:").unwrap_or(email);
            rows.push(TableRow::new("Email", email.trim()));
        }
        if let Some(tel) = obj.get("telephone").and_then(Value::as_str) {
            rows.push(TableRow::new("Phone", tel));
        }
        if let Some(address) = obj.get("address") {
            let text = match address {
                Value::String(s) => normalize_ws(s),
                other => postal_address(other),
            };
            rows.push(TableRow::new("Address", text));
        }
    } else if has_ld_type(obj, &["postaladdress"]) {
        rows.push(TableRow::new("Address", postal_address(obj)));
    }
}

/// `@type` is a string or an array of strings; compared case-insensitively.
fn has_ld_type(obj: &Value, wanted: &[&str]) -> bool {
    let matches = |t: &str| wanted.iter().any(|w| t.eq_ignore_ascii_case(w));
    match obj.get("@type") {
        Some(Value::String(t)) => matches(t),
        Some(Value::Array(types)) => types.iter().filter_map(Value::as_str).any(matches),
        _ => false,
    }
}

fn postal_address(obj: &Value) -> String {
    ADDRESS_KEYS
        .iter()
        .filter_map(|key| match obj.get(*key)? {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Object(country) => country
                .get("name")
                .and_then(Value::as_str)
                .map(|s| s.trim().to_string()),
            _ => None,
        })
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

// ── Visible text ────────────────────────────────────────────────────────────

/// Regex scan of the page's visible text for e-mails and phone numbers.
pub fn visible_text(document: &Html) -> Vec<TableRow> {
    let text = page_text(document);
    let mut rows: Vec<TableRow> = EMAIL_RE
        .find_iter(&text)
        .map(|m| TableRow::new("Email", m.as_str()))
        .collect();
    rows.extend(
        OBFUSCATED_EMAIL_RE
            .captures_iter(&text)
            .map(|c| TableRow::new("Email", format!("{}@{}", &c[1], &c[2]))),
    );
    rows.extend(
        PHONE_RE
            .find_iter(&text)
            .map(|m| TableRow::new("Phone", m.as_str())),
    );
    rows
}

/// Text nodes outside `<script>`/`<style>`, joined by single spaces.
fn page_text(document: &Html) -> String {
    document
        .root_element()
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let parent = node.parent().and_then(ElementRef::wrap)?;
            let hidden = matches!(parent.value().name(), "script" | "style" | "noscript");
            (!hidden).then(|| text.trim())
        })
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
