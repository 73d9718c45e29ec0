//! Section vocabulary for day pages: fixed keys, icons, order references and
//! user-added dynamic sections.

use serde::de::{self, Deserializer};
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Prefix marking a fixed section inside the unified order.
pub const MAIN_PREFIX: &str = "main_";

/// One of the four built-in day-page categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKey {
    Arrival,
    #[serde(alias = "transfer")]
    Transport,
    Activity,
    Drop,
}

impl SectionKey {
    /// Keys in their default display order.
    pub const ALL: [SectionKey; 4] = [
        SectionKey::Arrival,
        SectionKey::Transport,
        SectionKey::Activity,
        SectionKey::Drop,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SectionKey::Arrival => "arrival",
            SectionKey::Transport => "transport",
            SectionKey::Activity => "activity",
            SectionKey::Drop => "drop",
        }
    }

    /// Parse a key name. `transfer` is the legacy spelling of `transport`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "arrival" => Some(SectionKey::Arrival),
            "transport" | "transfer" => Some(SectionKey::Transport),
            "activity" => Some(SectionKey::Activity),
            "drop" => Some(SectionKey::Drop),
            _ => None,
        }
    }

    /// Page-data field holding this section's detail rows.
    pub fn details_field(self) -> &'static str {
        match self {
            SectionKey::Arrival => "arrivalDetails",
            SectionKey::Transport => "transportDetails",
            SectionKey::Activity => "activityDetails",
            SectionKey::Drop => "dropDetails",
        }
    }

    /// Field name used by documents saved before the transfer → transport rename.
    pub fn legacy_details_field(self) -> Option<&'static str> {
        match self {
            SectionKey::Transport => Some("transferDetails"),
            _ => None,
        }
    }

    pub fn legacy_name(self) -> Option<&'static str> {
        match self {
            SectionKey::Transport => Some("transfer"),
            _ => None,
        }
    }

    pub fn default_heading(self) -> &'static str {
        match self {
            SectionKey::Arrival => "Arrival",
            SectionKey::Transport => "Transport",
            SectionKey::Activity => "Activities",
            SectionKey::Drop => "Drop",
        }
    }

    pub fn default_icon(self) -> IconTag {
        match self {
            SectionKey::Arrival => IconTag::PlaneLanding,
            SectionKey::Transport | SectionKey::Drop => IconTag::CarFront,
            SectionKey::Activity => IconTag::Landmark,
        }
    }

    /// Placeholder shown in an empty editing control.
    pub fn placeholder(self) -> &'static str {
        match self {
            SectionKey::Arrival => "Enter the arrival details",
            SectionKey::Transport => "Enter the transport details",
            SectionKey::Activity => "Enter the activity details",
            SectionKey::Drop => "Enter the drop details",
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value per fixed section key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionMap<T> {
    pub arrival: T,
    pub transport: T,
    pub activity: T,
    pub drop: T,
}

impl<T> SectionMap<T> {
    pub fn from_fn(mut f: impl FnMut(SectionKey) -> T) -> Self {
        Self {
            arrival: f(SectionKey::Arrival),
            transport: f(SectionKey::Transport),
            activity: f(SectionKey::Activity),
            drop: f(SectionKey::Drop),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (SectionKey, &T)> {
        SectionKey::ALL.into_iter().map(move |key| (key, &self[key]))
    }
}

impl<T> Index<SectionKey> for SectionMap<T> {
    type Output = T;

    fn index(&self, key: SectionKey) -> &T {
        match key {
            SectionKey::Arrival => &self.arrival,
            SectionKey::Transport => &self.transport,
            SectionKey::Activity => &self.activity,
            SectionKey::Drop => &self.drop,
        }
    }
}

impl<T> IndexMut<SectionKey> for SectionMap<T> {
    fn index_mut(&mut self, key: SectionKey) -> &mut T {
        match key {
            SectionKey::Arrival => &mut self.arrival,
            SectionKey::Transport => &mut self.transport,
            SectionKey::Activity => &mut self.activity,
            SectionKey::Drop => &mut self.drop,
        }
    }
}

/// Icon shown next to a section heading.
///
/// `Image` doubles as the type tag of picture-only dynamic sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IconTag {
    PlaneLanding,
    Landmark,
    CarFront,
    Hotel,
    Restaurant,
    Table,
    Custom,
    Image,
}

impl IconTag {
    /// Icons offered in the section picker, in menu order.
    pub const PICKER: [IconTag; 6] = [
        IconTag::PlaneLanding,
        IconTag::Landmark,
        IconTag::CarFront,
        IconTag::Restaurant,
        IconTag::Hotel,
        IconTag::Custom,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "PlaneLanding" => Some(IconTag::PlaneLanding),
            "Landmark" => Some(IconTag::Landmark),
            "CarFront" => Some(IconTag::CarFront),
            "Hotel" => Some(IconTag::Hotel),
            "Restaurant" => Some(IconTag::Restaurant),
            "Table" => Some(IconTag::Table),
            "Custom" => Some(IconTag::Custom),
            "Image" => Some(IconTag::Image),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IconTag::PlaneLanding => "PlaneLanding",
            IconTag::Landmark => "Landmark",
            IconTag::CarFront => "CarFront",
            IconTag::Hotel => "Hotel",
            IconTag::Restaurant => "Restaurant",
            IconTag::Table => "Table",
            IconTag::Custom => "Custom",
            IconTag::Image => "Image",
        }
    }

    /// Menu label in the picker.
    pub fn label(self) -> &'static str {
        match self {
            IconTag::PlaneLanding => "Flight",
            IconTag::Landmark => "Activity",
            IconTag::CarFront => "Car",
            IconTag::Hotel => "Hotel",
            IconTag::Restaurant => "Restaurant",
            IconTag::Table => "Table",
            IconTag::Custom => "Custom",
            IconTag::Image => "Image",
        }
    }

    /// Heading applied together with the icon when picked from the menu.
    pub fn heading(self) -> &'static str {
        match self {
            IconTag::PlaneLanding => "Arrival",
            IconTag::Landmark => "Activities",
            IconTag::CarFront => "Transfer",
            IconTag::Hotel => "Hotel",
            IconTag::Restaurant => "Dining",
            IconTag::Table => "Table",
            IconTag::Custom => "Custom",
            IconTag::Image => "Image",
        }
    }
}

impl fmt::Display for IconTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a dynamic section, unique within its page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(pub String);

impl SectionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An entry of the unified section order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SectionRef {
    Main(SectionKey),
    Dynamic(SectionId),
}

impl SectionRef {
    /// Parse an order entry. Strings carrying the fixed prefix with an unknown
    /// key do not name anything and yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }
        match raw.strip_prefix(MAIN_PREFIX) {
            Some(key) => SectionKey::parse(key).map(SectionRef::Main),
            None => Some(SectionRef::Dynamic(SectionId::new(raw))),
        }
    }

    pub fn main_key(&self) -> Option<SectionKey> {
        match self {
            SectionRef::Main(key) => Some(*key),
            SectionRef::Dynamic(_) => None,
        }
    }

    pub fn dynamic_id(&self) -> Option<&SectionId> {
        match self {
            SectionRef::Main(_) => None,
            SectionRef::Dynamic(id) => Some(id),
        }
    }
}

impl From<SectionKey> for SectionRef {
    fn from(key: SectionKey) -> Self {
        SectionRef::Main(key)
    }
}

impl From<SectionId> for SectionRef {
    fn from(id: SectionId) -> Self {
        SectionRef::Dynamic(id)
    }
}

impl fmt::Display for SectionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionRef::Main(key) => write!(f, "{}{}", MAIN_PREFIX, key),
            SectionRef::Dynamic(id) => f.write_str(id.as_str()),
        }
    }
}

impl Serialize for SectionRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SectionRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        SectionRef::parse(&raw)
            .ok_or_else(|| de::Error::custom(format!("not a section reference: {raw:?}")))
    }
}

/// One rich-text row of a dynamic section.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DetailEntry {
    pub value: String,
}

impl DetailEntry {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// Content carried by a dynamic section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionBody {
    Details(Vec<DetailEntry>),
    /// Picture sections hold a data-URI, or nothing until one is uploaded.
    Image(Option<String>),
}

impl SectionBody {
    pub fn empty_details() -> Self {
        SectionBody::Details(vec![DetailEntry::default()])
    }
}

/// A user-added section on a day page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicSection {
    pub id: SectionId,
    /// `Image` for picture sections, otherwise the icon family it was created from.
    pub kind: IconTag,
    pub icon: IconTag,
    pub heading: String,
    pub body: SectionBody,
}

impl DynamicSection {
    pub fn is_image(&self) -> bool {
        matches!(self.body, SectionBody::Image(_))
    }

    pub fn details(&self) -> Option<&[DetailEntry]> {
        match &self.body {
            SectionBody::Details(details) => Some(details),
            SectionBody::Image(_) => None,
        }
    }
}

impl Serialize for DynamicSection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("DynamicSection", 5)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("type", &self.kind)?;
        state.serialize_field("icon", &self.icon)?;
        state.serialize_field("heading", &self.heading)?;
        match &self.body {
            SectionBody::Details(details) => state.serialize_field("details", details)?,
            SectionBody::Image(image) => state.serialize_field("image", image)?,
        }
        state.end()
    }
}
