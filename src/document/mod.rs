//! Page document model
//!
//! Host applications hand over loosely shaped JSON page data. Everything in
//! this module turns that data into the canonical model and back; nothing in
//! it fails on malformed input.

mod block;
pub(crate) mod coerce;
mod day;
mod pages;
mod section;

pub use block::{BlockKind, ListItem, ListStyle, PolicyBlock};
pub use day::{DayPage, DetailLists, Meal, MealSelections, OrderedSection};
pub use pages::{
    CoverPage, PolicyPage, ThankYouField, ThankYouPage, DEFAULT_EMAIL_ADDRESS,
    DEFAULT_PHONE_NUMBER, DEFAULT_POLICY_TITLE, DEFAULT_WEBSITE,
};
pub use section::{
    DetailEntry, DynamicSection, IconTag, SectionBody, SectionId, SectionKey, SectionMap,
    SectionRef, MAIN_PREFIX,
};

pub(crate) use day::rows_to_entries;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tracing::warn;

/// Stable page identifier, stored by hosts either as a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageId {
    Numeric(u64),
    Named(String),
}

impl PageId {
    /// Parse an id received as text; all-digit strings are numeric ids.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        Some(match raw.parse::<u64>() {
            Ok(n) => PageId::Numeric(n),
            Err(_) => PageId::Named(raw.to_string()),
        })
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_u64().map(PageId::Numeric),
            Value::String(s) => PageId::parse(s),
            _ => None,
        }
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageId::Numeric(n) => write!(f, "{}", n),
            PageId::Named(s) => f.write_str(s),
        }
    }
}

/// Hands out page ids above every id seen so far; ids are never reused.
#[derive(Debug, Clone, Default)]
pub struct PageIdAllocator {
    next: u64,
}

impl PageIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, id: &PageId) {
        if let PageId::Numeric(n) = id {
            self.next = self.next.max(n.saturating_add(1));
        }
    }

    pub fn allocate(&mut self) -> PageId {
        self.next = self.next.max(1);
        let id = PageId::Numeric(self.next);
        self.next += 1;
        id
    }
}

/// The closed set of page types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    Cover,
    Day,
    Policy,
    #[serde(rename = "thankyou")]
    ThankYou,
}

impl PageKind {
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "cover" => Some(PageKind::Cover),
            "day" => Some(PageKind::Day),
            "policy" => Some(PageKind::Policy),
            "thankyou" => Some(PageKind::ThankYou),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PageKind::Cover => "cover",
            PageKind::Day => "day",
            PageKind::Policy => "policy",
            PageKind::ThankYou => "thankyou",
        }
    }

    /// Navigator title of a page of this kind.
    pub fn title(self) -> &'static str {
        match self {
            PageKind::Cover => "FRONT PAGE",
            PageKind::Day => "DAY PAGE",
            PageKind::Policy => "TERMS & CONDITIONS",
            PageKind::ThankYou => "THANK YOU PAGE",
        }
    }

    fn known_keys(self) -> &'static [&'static str] {
        match self {
            PageKind::Cover => pages::COVER_KEYS,
            PageKind::Day => day::KNOWN_KEYS,
            PageKind::Policy => pages::POLICY_KEYS,
            PageKind::ThankYou => pages::THANK_YOU_KEYS,
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type-specific page content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum PageContent {
    #[serde(rename = "cover")]
    Cover(CoverPage),
    #[serde(rename = "day")]
    Day(DayPage),
    #[serde(rename = "policy")]
    Policy(PolicyPage),
    #[serde(rename = "thankyou")]
    ThankYou(ThankYouPage),
}

impl PageContent {
    /// Fresh content for a newly created page.
    pub fn empty(kind: PageKind) -> Self {
        match kind {
            PageKind::Cover => PageContent::Cover(CoverPage::default()),
            PageKind::Day => PageContent::Day(DayPage::default()),
            PageKind::Policy => PageContent::Policy(PolicyPage::default()),
            PageKind::ThankYou => PageContent::ThankYou(ThankYouPage::default()),
        }
    }

    pub fn kind(&self) -> PageKind {
        match self {
            PageContent::Cover(_) => PageKind::Cover,
            PageContent::Day(_) => PageKind::Day,
            PageContent::Policy(_) => PageKind::Policy,
            PageContent::ThankYou(_) => PageKind::ThankYou,
        }
    }

    fn from_object(kind: PageKind, raw: &Map<String, Value>) -> Self {
        match kind {
            PageKind::Cover => PageContent::Cover(CoverPage::from_object(raw)),
            PageKind::Day => PageContent::Day(DayPage::from_object(raw)),
            PageKind::Policy => PageContent::Policy(PolicyPage::from_object(raw)),
            PageKind::ThankYou => PageContent::ThankYou(ThankYouPage::from_object(raw)),
        }
    }
}

/// One page of the itinerary document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    pub id: PageId,
    #[serde(flatten)]
    pub content: PageContent,
    /// Host fields this model does not interpret, carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Page {
    pub fn new(id: PageId, kind: PageKind) -> Self {
        Self {
            id,
            content: PageContent::empty(kind),
            extra: Map::new(),
        }
    }

    pub fn kind(&self) -> PageKind {
        self.content.kind()
    }

    pub fn as_day(&self) -> Option<&DayPage> {
        match &self.content {
            PageContent::Day(day) => Some(day),
            _ => None,
        }
    }

    /// Normalize raw page data.
    ///
    /// Returns `None` when the value is not an object or its `type` is not one
    /// of the known page kinds. A missing id is taken from `ids`.
    pub fn normalize(raw: &Value, ids: &mut PageIdAllocator) -> Option<Self> {
        let Some(obj) = raw.as_object() else {
            warn!("skipping page data that is not an object");
            return None;
        };
        let tag = obj.get("type").and_then(Value::as_str);
        let Some(kind) = tag.and_then(PageKind::parse) else {
            warn!(page_type = ?tag, "skipping page of unknown type");
            return None;
        };

        let id = match obj.get("id").and_then(PageId::from_value) {
            Some(id) => {
                ids.observe(&id);
                id
            }
            None => ids.allocate(),
        };

        Some(Self::from_parts(id, kind, obj))
    }

    /// Rebuild this page from fresh raw data, keeping its id and kind.
    ///
    /// A `type` in the data that disagrees with the page's kind is ignored.
    pub fn renormalize(&self, raw: &Value) -> Self {
        match raw.as_object() {
            Some(obj) => Self::from_parts(self.id.clone(), self.kind(), obj),
            None => {
                warn!(page = %self.id, "ignoring page update that is not an object");
                self.clone()
            }
        }
    }

    fn from_parts(id: PageId, kind: PageKind, obj: &Map<String, Value>) -> Self {
        let known = kind.known_keys();
        let extra = obj
            .iter()
            .filter(|(key, _)| key.as_str() != "id" && key.as_str() != "type")
            .filter(|(key, _)| !known.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Self {
            id,
            content: PageContent::from_object(kind, obj),
            extra,
        }
    }

    pub fn to_value(&self) -> Value {
        // Every field serializes infallibly: strings, bools, numbers and JSON values.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Normalize a host page collection. Pages that cannot be read are dropped;
/// duplicate page ids are replaced with fresh ones.
pub fn normalize_pages(raw: &Value, ids: &mut PageIdAllocator) -> Vec<Page> {
    let items = coerce::list(Some(raw));

    // Reserve every stored id first so generated ones cannot clash with later pages.
    for item in &items {
        if let Some(id) = item.get("id").and_then(PageId::from_value) {
            ids.observe(&id);
        }
    }

    let mut pages: Vec<Page> = Vec::with_capacity(items.len());
    for item in items {
        let Some(mut page) = Page::normalize(item, ids) else {
            continue;
        };
        if pages.iter().any(|p| p.id == page.id) {
            let fresh = ids.allocate();
            warn!(duplicate = %page.id, assigned = %fresh, "duplicate page id");
            page.id = fresh;
        }
        pages.push(page);
    }
    pages
}

/// Serialize a page collection into the host's JSON shape.
pub fn pages_to_value(pages: &[Page]) -> Value {
    Value::Array(pages.iter().map(Page::to_value).collect())
}

/// 1-based day number of the page at `index`: day pages count up in
/// collection order, other pages have none.
pub fn day_number(pages: &[Page], index: usize) -> Option<usize> {
    let page = pages.get(index)?;
    if page.kind() != PageKind::Day {
        return None;
    }
    Some(pages[..index].iter().filter(|p| p.kind() == PageKind::Day).count() + 1)
}
