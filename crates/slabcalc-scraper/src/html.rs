//! Regex-based HTML scanning helpers.
//!
//! Pages are treated as text: no DOM is built. The helpers here are enough to
//! find an element by id, walk table rows and cells, and pull the first link
//! out of a fragment. Tag names are matched case-insensitively.

use std::sync::LazyLock;

use regex::Regex;

static DIV_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(/?)div\b[^>]*>").expect("valid div tag regex"));

static TR_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<tr\b[^>]*>").expect("valid table row regex"));

// `</tr>` is optional, so a row also ends where the next one or its container does.
static TR_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<tr\b|</tr\s*>|</t(?:body|head|foot)\s*>|</table\s*>")
        .expect("valid table row end regex")
});

static TD_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<td\b[^>]*>").expect("valid table cell regex"));

static CELL_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<t[dh]\b|</t[dhr]\s*>").expect("valid table cell end regex")
});

static ANCHOR_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\b[^>]*?\shref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("valid anchor href regex")
});

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid tag regex"));

static NUMERIC_ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&#(?:[xX]([0-9a-fA-F]+)|([0-9]+));").expect("valid numeric entity regex")
});

/// Returns the inner HTML of the `<div>` whose `id` attribute equals `id`.
///
/// Nested `<div>`s are balanced so the whole element is returned. An element
/// that is never closed extends to the end of the document.
#[must_use]
pub fn div_by_id<'a>(html: &'a str, id: &str) -> Option<&'a str> {
    let id_attr = Regex::new(&format!(
        r#"(?i)\sid\s*=\s*(?:"{0}"|'{0}'|{0}(?:[\s>/]|$))"#,
        regex::escape(id)
    ))
    .ok()?;

    let mut tags = DIV_TAG.captures_iter(html);
    let open = tags.by_ref().find(|cap| {
        cap.get(1).is_some_and(|m| m.as_str().is_empty())
            && cap.get(0).is_some_and(|m| id_attr.is_match(m.as_str()))
    })?;
    let inner_start = open.get(0)?.end();

    let mut depth = 1usize;
    for cap in tags {
        let whole = cap.get(0)?;
        if cap.get(1).is_some_and(|m| !m.as_str().is_empty()) {
            depth -= 1;
            if depth == 0 {
                return Some(&html[inner_start..whole.start()]);
            }
        } else if !whole.as_str().ends_with("/>") {
            depth += 1;
        }
    }
    Some(&html[inner_start..])
}

/// Inner HTML of every `<tr>` in `html`, in document order.
///
/// A row without a closing tag ends at the next row or at the end of its
/// table section.
pub fn table_rows(html: &str) -> impl Iterator<Item = &str> {
    blocks(html, &TR_START, &TR_END)
}

/// Text of every `<td>` in a row fragment, in document order.
#[must_use]
pub fn row_cells(row: &str) -> Vec<String> {
    blocks(row, &TD_START, &CELL_END)
        .map(text_content)
        .collect()
}

/// Content following each `start` match up to the first `end` match after it,
/// or to the end of `html`.
fn blocks<'a>(
    html: &'a str,
    start: &'static Regex,
    end: &'static Regex,
) -> impl Iterator<Item = &'a str> + 'a {
    start.find_iter(html).map(move |open| {
        let from = open.end();
        let to = end.find_at(html, from).map_or(html.len(), |m| m.start());
        &html[from..to]
    })
}

/// Target of the first `<a>` carrying an `href` attribute, entity-decoded
/// and trimmed.
#[must_use]
pub fn first_href(fragment: &str) -> Option<String> {
    let cap = ANCHOR_HREF.captures(fragment)?;
    let raw = cap
        .get(1)
        .or_else(|| cap.get(2))
        .or_else(|| cap.get(3))?
        .as_str();
    Some(decode_entities(raw).trim().to_string())
}

/// Strips tags, decodes entities, and collapses whitespace.
#[must_use]
pub fn text_content(fragment: &str) -> String {
    let stripped = TAG.replace_all(fragment, "");
    decode_entities(&stripped)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decodes the named entities that appear in price tables plus numeric
/// character references. Unknown entities are left as-is.
#[must_use]
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    let numeric = NUMERIC_ENTITY.replace_all(s, |cap: &regex::Captures<'_>| {
        let code = match (cap.get(1), cap.get(2)) {
            (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
            (None, Some(dec)) => dec.as_str().parse::<u32>().ok(),
            (None, None) => None,
        };
        code.and_then(char::from_u32)
            .map_or_else(|| cap[0].to_string(), |c| c.to_string())
    });
    numeric
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&dollar;", "$")
        .replace("&amp;", "&")
}
