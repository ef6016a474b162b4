//! Lightweight scanner for the static guide HTML.
//!
//! The exporter only needs the block-level text content (headings,
//! paragraphs, list items) plus enough attribute context to apply the print
//! style: element classes for visibility overrides and anchor ids for page
//! breaks. A full DOM is not required for that, so the scanner works with
//! regular expressions over the raw markup.

use regex::Regex;

/// Tags that produce printable blocks, in rendering order of interest.
const BLOCK_TAGS: &[&str] = &["h1", "h2", "h3", "p", "li"];

/// Tags that can act as containers for visibility overrides.
const CONTAINER_TAGS: &str = "div|nav|section|ul|aside|header|footer";

#[derive(Debug, Clone, PartialEq)]
pub struct HtmlBlock {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub text: String,
    /// Byte offset of the opening tag in the source document.
    pub offset: usize,
}

/// Cheap well-formedness probe: the input must at least look like an HTML
/// document before we attempt to compose it.
pub fn looks_like_html(html: &str) -> bool {
    let lowered = html.trim_start().to_lowercase();
    lowered.starts_with("<!doctype html") || lowered.contains("<html")
}

/// Extracts the `<title>` text, if present.
pub fn document_title(html: &str) -> Option<String> {
    let re = Regex::new(r"(?is)<title[^>]*>(.*?)</title\s*>").unwrap();
    re.captures(html)
        .map(|cap| strip_tags(&cap[1]))
        .filter(|title| !title.is_empty())
}

/// Scans the document for printable blocks, returned in source order.
pub fn parse_blocks(html: &str) -> Vec<HtmlBlock> {
    let mut blocks = Vec::new();

    for tag in BLOCK_TAGS {
        let re = Regex::new(&format!(r"(?is)<{t}\b([^>]*)>(.*?)</{t}\s*>", t = tag)).unwrap();
        for cap in re.captures_iter(html) {
            let attrs = cap.get(1).map(|m| m.as_str()).unwrap_or("");
            let text = strip_tags(&cap[2]);
            if text.is_empty() {
                continue;
            }
            blocks.push(HtmlBlock {
                tag: tag.to_string(),
                id: attr_value(attrs, "id"),
                classes: attr_value(attrs, "class")
                    .map(|value| value.split_whitespace().map(str::to_string).collect())
                    .unwrap_or_default(),
                text,
                offset: cap.get(0).unwrap().start(),
            });
        }
    }

    blocks.sort_by_key(|block| block.offset);
    blocks
}

/// Byte ranges covered by container elements carrying one of the given
/// classes. Nested same-tag elements are tracked so a `</div>` belonging to
/// an inner element does not close the range early.
pub fn container_ranges(html: &str, classes: &[String]) -> Vec<(usize, usize)> {
    if classes.is_empty() {
        return Vec::new();
    }

    let open_re = Regex::new(&format!(r"(?is)<({})\b([^>]*)>", CONTAINER_TAGS)).unwrap();
    let mut ranges = Vec::new();

    for cap in open_re.captures_iter(html) {
        let attrs = cap.get(2).map(|m| m.as_str()).unwrap_or("");
        let marked = attr_value(attrs, "class")
            .map(|value| {
                value
                    .split_whitespace()
                    .any(|c| classes.iter().any(|hidden| hidden == c))
            })
            .unwrap_or(false);
        if !marked {
            continue;
        }

        let tag = cap[1].to_lowercase();
        let opening = cap.get(0).unwrap();
        let end = find_matching_close(html, opening.end(), &tag).unwrap_or(html.len());
        ranges.push((opening.start(), end));
    }

    ranges
}

/// Byte offset of the element carrying `id`, if any.
pub fn anchor_offset(html: &str, id: &str) -> Option<usize> {
    let re = Regex::new(&format!(
        r#"(?is)<[a-z][a-z0-9]*\b[^>]*\bid\s*=\s*["']{}["'][^>]*>"#,
        regex::escape(id)
    ))
    .unwrap();
    re.find(html).map(|m| m.start())
}

fn find_matching_close(html: &str, from: usize, tag: &str) -> Option<usize> {
    let token_re = Regex::new(&format!(r"(?i)</?{}\b", regex::escape(tag))).unwrap();
    let mut depth = 1usize;
    for token in token_re.find_iter(&html[from..]) {
        if token.as_str().starts_with("</") {
            depth -= 1;
            if depth == 0 {
                return Some(from + token.end());
            }
        } else {
            depth += 1;
        }
    }
    None
}

fn attr_value(attrs: &str, name: &str) -> Option<String> {
    let re = Regex::new(&format!(
        r#"(?is)\b{}\s*=\s*(?:"([^"]*)"|'([^']*)')"#,
        regex::escape(name)
    ))
    .unwrap();
    re.captures(attrs).map(|cap| {
        cap.get(1)
            .or_else(|| cap.get(2))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    })
}

/// Removes inline markup, decodes entities and collapses whitespace.
pub fn strip_tags(fragment: &str) -> String {
    let tag_re = Regex::new(r"(?s)<[^>]*>").unwrap();
    let without_tags = tag_re.replace_all(fragment, " ");
    let decoded = decode_entities(&without_tags);
    let space_re = Regex::new(r"\s+").unwrap();
    space_re.replace_all(decoded.trim(), " ").to_string()
}

fn decode_entities(text: &str) -> String {
    let mut decoded = text
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&euro;", "€");

    let numeric_re = Regex::new(r"&#(x?[0-9a-fA-F]+);").unwrap();
    if numeric_re.is_match(&decoded) {
        decoded = numeric_re
            .replace_all(&decoded, |cap: &regex::Captures| {
                let body = &cap[1];
                let code = if let Some(hex) = body.strip_prefix('x') {
                    u32::from_str_radix(hex, 16).ok()
                } else {
                    body.parse::<u32>().ok()
                };
                code.and_then(char::from_u32)
                    .map(String::from)
                    .unwrap_or_else(|| cap[0].to_string())
            })
            .to_string();
    }

    decoded
}
