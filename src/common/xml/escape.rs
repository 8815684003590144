use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;

// Static initialization: automata are built only once, thread-safe
static TEXT_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">"])
        .expect("Failed to build XML text escaper")
});

static ATTRIBUTE_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", "\"", "\n", "\r", "\t"])
        .expect("Failed to build XML attribute escaper")
});

/// Escape character data for use between tags.
///
/// Quotes are left alone so that expressions such as `{{ "a" }}` survive
/// serialization untouched.
///
/// # Examples
///
/// ```
/// use sheet_stencil::common::xml::escape_text;
/// assert_eq!(escape_text("a & b"), "a &amp; b");
/// assert_eq!(escape_text("<x>\"y\"</x>"), "&lt;x&gt;\"y\"&lt;/x&gt;");
/// ```
#[inline]
pub fn escape_text(s: &str) -> String {
    TEXT_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;"])
}

/// Escape an attribute value for use inside double quotes.
///
/// Whitespace control characters are written as character references so the
/// value survives attribute-value normalization on re-parse.
///
/// # Examples
///
/// ```
/// use sheet_stencil::common::xml::escape_attribute;
/// assert_eq!(escape_attribute("of:=A1&\"x\""), "of:=A1&amp;&quot;x&quot;");
/// assert_eq!(escape_attribute("a\nb"), "a&#10;b");
/// ```
#[inline]
pub fn escape_attribute(s: &str) -> String {
    ATTRIBUTE_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&quot;", "&#10;", "&#13;", "&#9;"])
}

/// Unescape XML entity and character references.
///
/// Handles the five predefined entities and decimal/hexadecimal character
/// references. Unknown or malformed references are left unchanged.
///
/// # Examples
///
/// ```
/// use sheet_stencil::common::xml::unescape_xml;
/// assert_eq!(unescape_xml("&lt;a &amp; b&gt;"), "<a & b>");
/// assert_eq!(unescape_xml("&quot;hello&apos;"), "\"hello'");
/// assert_eq!(unescape_xml("&amp;lt;"), "&lt;");
/// assert_eq!(unescape_xml("&#65;&#x42;"), "AB");
/// assert_eq!(unescape_xml("a & b"), "a & b");
/// assert_eq!(unescape_xml("&invalid;"), "&invalid;");
/// assert_eq!(unescape_xml("&amp"), "&amp");
/// ```
pub fn unescape_xml(s: &str) -> String {
    let bytes = s.as_bytes();
    let Some(first) = memchr::memchr(b'&', bytes) else {
        return s.to_string();
    };

    let mut out = String::with_capacity(s.len());
    out.push_str(&s[..first]);
    let mut pos = first;

    while pos < s.len() {
        let rest = &s[pos..];
        if !rest.starts_with('&') {
            let next = memchr::memchr(b'&', rest.as_bytes()).unwrap_or(rest.len());
            out.push_str(&rest[..next]);
            pos += next;
            continue;
        }

        // References are short; anything without a nearby ';' is literal text
        let end = rest.as_bytes()[1..]
            .iter()
            .take(12)
            .position(|&b| b == b';')
            .map(|i| i + 1);
        let decoded = end.and_then(|end| decode_reference(&rest[1..end]).map(|c| (c, end)));

        match decoded {
            Some((c, end)) => {
                out.push(c);
                pos += end + 1;
            },
            None => {
                out.push('&');
                pos += 1;
            },
        }
    }

    out
}

/// Decode the body of a reference (the text between `&` and `;`).
pub(crate) fn decode_reference(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        },
    }
}
