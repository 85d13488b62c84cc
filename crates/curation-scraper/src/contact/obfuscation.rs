//! Undo the common ways pages hide e-mail addresses from scrapers.

use std::sync::LazyLock;

use regex::Regex;

#[allow(clippy::expect_used)]
static AT_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*[\(\[]at[\)\]]\s*| at ").expect("at-marker regex is valid")
});

#[allow(clippy::expect_used)]
static DOT_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*[\(\[]dot[\)\]]\s*| dot ").expect("dot-marker regex is valid")
});

/// Decode a Cloudflare `data-cfemail` value.
///
/// The first hex byte is the XOR key for every following byte. Returns
/// `None` for malformed hex or non-UTF-8 output.
pub fn decode_cfemail(encoded: &str) -> Option<String> {
    let bytes = hex::decode(encoded.trim()).ok()?;
    let (&key, rest) = bytes.split_first()?;
    let decoded: Vec<u8> = rest.iter().map(|b| b ^ key).collect();
    String::from_utf8(decoded).ok().filter(|s| !s.is_empty())
}

/// Encode an address the way Cloudflare's e-mail protection does.
pub fn encode_cfemail(email: &str, key: u8) -> String {
    let mut bytes = Vec::with_capacity(email.len() + 1);
    bytes.push(key);
    bytes.extend(email.bytes().map(|b| b ^ key));
    hex::encode(bytes)
}

/// Replace `(at)`, `[at]`, ` at ` and ` AT ` with `@`, and the `dot`
/// equivalents with `.`.
pub fn deobfuscate(text: &str) -> String {
    let text = AT_MARKER.replace_all(text, "@");
    DOT_MARKER.replace_all(&text, ".").into_owned()
}

/// Address or number behind a `mailto:`/`tel:` href.
///
/// Query parameters of a `mailto:` link are dropped.
pub fn link_target(href: &str) -> Option<LinkTarget> {
    let href = href.trim();
    let (scheme, rest) = href.split_once(':')?;
    match scheme.to_ascii_lowercase().as_str() {
        "mailto" => {
            let address = rest.split('?').next().unwrap_or_default().trim();
            (!address.is_empty()).then(|| LinkTarget::Email(address.to_string()))
        }
        "tel" => {
            let number = rest.trim();
            (!number.is_empty()).then(|| LinkTarget::Phone(number.to_string()))
        }
        _ => None,
    }
}

/// What a contact link points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    Email(String),
    Phone(String),
}

impl LinkTarget {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Email(_) => "Email",
            Self::Phone(_) => "Phone",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::Email(v) | Self::Phone(v) => v,
        }
    }

    pub fn into_value(self) -> String {
        match self {
            Self::Email(v) | Self::Phone(v) => v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cfemail_round_trip() {
        let encoded = encode_cfemail("jane.doe@uzh.ch", 0x42);
        assert!(encoded.starts_with("42"));
        assert_eq!(decode_cfemail(&encoded).as_deref(), Some("jane.doe@uzh.ch"));
    }

    #[test]
    fn test_cfemail_known_vector() {
        // key 0x01: 'a' (0x61) ^ 0x01 = 0x60, '@' (0x40) ^ 0x01 = 0x41, 'b' ^ 0x01 = 0x63
        assert_eq!(decode_cfemail("01604163").as_deref(), Some("a@b"));
    }

    #[test]
    fn test_cfemail_rejects_garbage() {
        assert_eq!(decode_cfemail("zz"), None);
        assert_eq!(decode_cfemail(""), None);
        assert_eq!(decode_cfemail("7f"), None);
    }

    #[test]
    fn test_deobfuscate_variants() {
        assert_eq!(deobfuscate("jane.doe AT uzh DOT ch"), "jane.doe@uzh.ch");
        assert_eq!(deobfuscate("jane(at)uzh[dot]ch"), "jane@uzh.ch");
        assert_eq!(deobfuscate("jane [at] uzh (dot) ch"), "jane@uzh.ch");
        assert_eq!(deobfuscate("plain@example.com"), "plain@example.com");
    }

    #[test]
    fn test_link_target() {
        assert_eq!(
            link_target("mailto:a@b.ch?subject=Hi"),
            Some(LinkTarget::Email("a@b.ch".into()))
        );
        assert_eq!(
            link_target(" TEL:+41 44 634 11 11"),
            Some(LinkTarget::Phone("+41 44 634 11 11".into()))
        );
        assert_eq!(link_target("https://example.com"), None);
        assert_eq!(link_target("mailto:"), None);
    }
}
