//! Definition text pipeline.
//!
//! Raw registry definitions are HTML. Tooltips show plain text cut to a word
//! budget, and anything after the first table or list is dropped because it
//! does not survive being flattened into a sentence.

use scraper::{ElementRef, Html};

/// Openings of markup that ends the summarisable part of a definition.
const STRUCTURED_MARKERS: [&str; 3] = ["<table", "<ul", "<ol"];

const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main",
    "nav", "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "template"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordLimits {
    pub short: usize,
    pub long: usize,
}

impl Default for WordLimits {
    fn default() -> Self {
        Self {
            short: 50,
            long: 75,
        }
    }
}

/// Markup to plain text, cut at structured content and limited to `word_limit` words.
pub fn normalize(raw_html: &str, word_limit: usize) -> String {
    let summarisable = cut_at_structured_markup(raw_html);
    let text = strip_html(summarisable);
    truncate_words(&text, word_limit)
}

/// Everything before the earliest table, unordered list or ordered list.
pub fn cut_at_structured_markup(html: &str) -> &str {
    let lowered = html.to_ascii_lowercase();
    let cut = STRUCTURED_MARKERS
        .iter()
        .filter_map(|marker| find_tag_open(&lowered, marker))
        .min();

    match cut {
        Some(idx) => &html[..idx],
        None => html,
    }
}

fn find_tag_open(lowered: &str, marker: &str) -> Option<usize> {
    lowered.match_indices(marker).map(|(idx, _)| idx).find(|&idx| {
        lowered[idx + marker.len()..]
            .chars()
            .next()
            .is_some_and(|c| c == '>' || c == '/' || c.is_ascii_whitespace())
    })
}

/// Text content of an HTML fragment with entities decoded and whitespace collapsed.
pub fn strip_html(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut out = String::with_capacity(html.len());
    collect_text(fragment.root_element(), &mut out);
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_element) = ElementRef::wrap(child) {
            let name = child_element.value().name();
            if SKIPPED_ELEMENTS.contains(&name) {
                continue;
            }
            let block = BLOCK_ELEMENTS.contains(&name);
            if block {
                out.push(' ');
            }
            collect_text(child_element, out);
            if block {
                out.push(' ');
            }
        }
    }
}

/// First `word_limit` whitespace-separated words, single-spaced. No ellipsis.
pub fn truncate_words(text: &str, word_limit: usize) -> String {
    text.split_whitespace()
        .take(word_limit)
        .collect::<Vec<_>>()
        .join(" ")
}
