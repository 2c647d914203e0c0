use scraper::ElementRef;
use scraper::Selector;

/// Get the slug of a link.
///
/// This is the last non-empty path segment, with whitespace removed.
/// A missing or empty href gives an empty slug.
pub fn extract_slug(href: &str) -> String {
    href.split('/')
        .rev()
        .map(|segment| segment.trim())
        .find(|segment| !segment.is_empty())
        .map(|segment| segment.chars().filter(|c| !c.is_whitespace()).collect())
        .unwrap_or_default()
}

/// Normalize a user-supplied slug before putting it in a url.
///
/// Percent-decodes the input, then strips all whitespace and any trailing slashes.
/// Input that does not decode to utf8 is used as-is.
pub fn clean_slug(slug: &str) -> String {
    let decoded = urlencoding::decode(slug)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| slug.to_string());

    let mut cleaned: String = decoded.chars().filter(|c| !c.is_whitespace()).collect();
    let trimmed_len = cleaned.trim_end_matches('/').len();
    cleaned.truncate(trimmed_len);
    cleaned
}

/// Get the trimmed text of an element.
pub(crate) fn element_text(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Get the trimmed text of the first match, or an empty string.
pub(crate) fn select_text(el: ElementRef, selector: &Selector) -> String {
    el.select(selector)
        .next()
        .map(element_text)
        .unwrap_or_default()
}

/// Get an attribute of the first match, or an empty string.
pub(crate) fn select_attr(el: ElementRef, selector: &Selector, attr: &str) -> String {
    el.select(selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}

/// Get the slug of the first match's `href`, or an empty string.
pub(crate) fn select_slug(el: ElementRef, selector: &Selector) -> String {
    extract_slug(&select_attr(el, selector, "href"))
}
