//! Turns raw HTML into a title plus whitespace-normalized document text.

use scraper::{Html, Selector};

use crate::error::FetchError;
use crate::types::FetchedPage;

/// Title used when the document has no `<title>` or it is blank.
pub const NO_TITLE: &str = "No Title";

/// Elements whose text never counts as page content.
const NON_CONTENT_SELECTOR: &str = "script, style, nav, footer, header";

/// Parses `html` and builds a [`FetchedPage`] for `url`.
///
/// The title is read before non-content elements are removed. The remaining
/// text nodes of the whole document (title included) are concatenated as-is,
/// so inline markup never splits a word, then whitespace runs collapse to
/// single spaces and the result is cut to `max_chars` characters.
/// `raw_length` records the character count before the cut.
///
/// # Errors
///
/// Returns [`FetchError::Parse`] if one of the fixed selectors fails to parse.
pub fn extract_page(url: &str, html: &str, max_chars: usize) -> Result<FetchedPage, FetchError> {
    let mut document = Html::parse_document(html);

    let title = extract_title(url, &document)?;
    strip_non_content(url, &mut document)?;

    let raw_text: String = document.root_element().text().collect();
    let cleaned = collapse_whitespace(&raw_text);
    let raw_length = cleaned.chars().count();
    let content = truncate_chars(&cleaned, max_chars);

    Ok(FetchedPage {
        url: url.to_owned(),
        title,
        content,
        raw_length,
    })
}

fn extract_title(url: &str, document: &Html) -> Result<String, FetchError> {
    let title_selector = selector(url, "title")?;
    let title = document
        .select(&title_selector)
        .next()
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .unwrap_or_default();

    if title.is_empty() {
        Ok(NO_TITLE.to_owned())
    } else {
        Ok(title)
    }
}

fn strip_non_content(url: &str, document: &mut Html) -> Result<(), FetchError> {
    let non_content = selector(url, NON_CONTENT_SELECTOR)?;
    let ids: Vec<_> = document.select(&non_content).map(|el| el.id()).collect();
    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
    Ok(())
}

pub(crate) fn selector(url: &str, css: &str) -> Result<Selector, FetchError> {
    Selector::parse(css).map_err(|e| FetchError::parse(url, format!("selector {css:?}: {e}")))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_owned(),
        None => text.to_owned(),
    }
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
