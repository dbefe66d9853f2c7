//! Tolerant scanning helpers shared by the site parsers.
//!
//! These work on raw markup with regexes and local tag counting. They are
//! not an HTML parser: they only need to find a few well-known blocks and
//! give up quietly when a site changes its layout.

use regex::Regex;
use std::sync::LazyLock;

static OPEN_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<([a-z][a-z0-9]*)\b[^>]*>").expect("open tag regex"));

static OPEN_OR_CLOSE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(/?)([a-z][a-z0-9]*)\b[^>]*>").expect("open or close tag regex"));

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)\s([^\s=/>"']+)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#).expect("attribute regex")
});

static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag regex"));

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex"));

const VOID_TAGS: [&str; 8] = ["area", "br", "hr", "img", "input", "link", "meta", "source"];

/// An opening tag as seen by element predicates. The element body is only
/// located for tags a predicate accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OpenTag<'a> {
    pub tag: &'a str,
    pub open: &'a str,
}

impl<'a> OpenTag<'a> {
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        attr(self.open, name)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class").is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }
}

/// One element found in a page: its opening tag and the markup inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Element<'a> {
    pub tag: &'a str,
    pub open: &'a str,
    pub inner: &'a str,
}

impl<'a> Element<'a> {
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        attr(self.open, name)
    }

    pub fn has_class(&self, class: &str) -> bool {
        OpenTag { tag: self.tag, open: self.open }.has_class(class)
    }

    pub fn text(&self) -> String {
        text(self.inner)
    }

    /// First descendant matching `pred`.
    pub fn find(&self, pred: impl Fn(&OpenTag<'_>) -> bool) -> Option<Element<'a>> {
        find(self.inner, pred)
    }
}

/// Elements in `html` whose opening tag matches `pred`, in document order.
fn elements<'a, P>(html: &'a str, pred: P) -> impl Iterator<Item = Element<'a>>
where
    P: Fn(&OpenTag<'_>) -> bool,
{
    OPEN_TAG.captures_iter(html).filter_map(move |caps| {
        let whole = caps.get(0)?;
        let open = OpenTag { tag: caps.get(1)?.as_str(), open: whole.as_str() };
        if !pred(&open) {
            return None;
        }
        let inner = inner_markup(html, whole.end(), open.tag, open.open);
        Some(Element { tag: open.tag, open: open.open, inner })
    })
}

/// Every element in `html` matching `pred`, in document order, including
/// elements nested inside other matches.
pub(crate) fn find_all<'a>(html: &'a str, pred: impl Fn(&OpenTag<'_>) -> bool) -> Vec<Element<'a>> {
    elements(html, pred).collect()
}

pub(crate) fn find<'a>(html: &'a str, pred: impl Fn(&OpenTag<'_>) -> bool) -> Option<Element<'a>> {
    elements(html, pred).next()
}

/// Markup between the opening tag ending at `start` and its matching close
/// tag. Unclosed elements extend to the end of the input.
fn inner_markup<'a>(html: &'a str, start: usize, tag: &str, open: &str) -> &'a str {
    if open.ends_with("/>") || VOID_TAGS.iter().any(|void| void.eq_ignore_ascii_case(tag)) {
        return "";
    }

    let rest = &html[start..];
    let mut depth = 1usize;
    for caps in OPEN_OR_CLOSE_TAG.captures_iter(rest) {
        if !caps[2].eq_ignore_ascii_case(tag) {
            continue;
        }
        if !caps[1].is_empty() {
            depth -= 1;
            if depth == 0 {
                let end = caps.get(0).map_or(rest.len(), |m| m.start());
                return &rest[..end];
            }
        } else if !caps[0].ends_with("/>") {
            depth += 1;
        }
    }

    rest
}

/// Value of attribute `name` in an opening tag.
pub(crate) fn attr<'a>(open: &'a str, name: &str) -> Option<&'a str> {
    ATTRIBUTE
        .captures_iter(open)
        .find(|caps| caps[1].eq_ignore_ascii_case(name))
        .and_then(|caps| caps.get(2).or_else(|| caps.get(3)).or_else(|| caps.get(4)))
        .map(|m| m.as_str())
}

/// Visible text of a fragment with tags removed, common entities decoded
/// and whitespace collapsed.
pub(crate) fn text(fragment: &str) -> String {
    let stripped = ANY_TAG.replace_all(fragment, " ");
    let decoded = decode_entities(&stripped);
    WHITESPACE.replace_all(decoded.trim(), " ").into_owned()
}

fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&deg;", "°")
        .replace("&reg;", "®")
        .replace("&#176;", "°")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&minus;", "-")
        .replace("&amp;", "&")
}

/// `(text, href)` of every anchor in `html` that has both.
pub(crate) fn links(html: &str) -> Vec<(String, String)> {
    find_all(html, |el| el.tag.eq_ignore_ascii_case("a"))
        .into_iter()
        .filter_map(|a| {
            let href = a.attr("href")?.trim();
            let label = a.text();
            (!href.is_empty() && !label.is_empty()).then(|| (label, href.to_string()))
        })
        .collect()
}

/// Predicate: element has every class in `classes`.
pub(crate) fn with_classes<'c>(classes: &'c [&'c str]) -> impl Fn(&OpenTag<'_>) -> bool + 'c {
    move |el| classes.iter().all(|class| el.has_class(class))
}

pub(crate) fn with_id(id: &str) -> impl Fn(&OpenTag<'_>) -> bool + '_ {
    move |el| el.attr("id") == Some(id)
}

pub(crate) fn tag_with_class<'c>(tag: &'c str, class: &'c str) -> impl Fn(&OpenTag<'_>) -> bool + 'c {
    move |el| el.tag.eq_ignore_ascii_case(tag) && el.has_class(class)
}

/// Non-empty text of the first element under `el` matching `pred`.
pub(crate) fn text_in(el: &Element<'_>, pred: impl Fn(&OpenTag<'_>) -> bool) -> Option<String> {
    el.find(pred).map(|found| found.text()).and_then(non_empty)
}

pub(crate) fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}
