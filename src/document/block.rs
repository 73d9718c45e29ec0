//! Block-level content of policy (terms & conditions) pages

use super::coerce;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::warn;

/// Style of a list block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListStyle {
    #[default]
    Unordered,
    Ordered,
}

impl ListStyle {
    pub fn parse(name: &str) -> Self {
        match name {
            "ordered" => ListStyle::Ordered,
            _ => ListStyle::Unordered,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ListStyle::Unordered => "unordered",
            ListStyle::Ordered => "ordered",
        }
    }

    /// Get the display string for the marker of the `ordinal`-th item (1-based)
    pub fn marker(self, ordinal: usize) -> String {
        match self {
            ListStyle::Unordered => "•".to_string(),
            ListStyle::Ordered => format!("{}.", ordinal),
        }
    }
}

/// A list entry with optional nested entries
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ListItem {
    pub content: String,
    pub items: Vec<ListItem>,
}

impl ListItem {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            items: Vec::new(),
        }
    }

    fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(obj) => Self {
                content: coerce::text(obj.get("content")),
                items: coerce::list(obj.get("items"))
                    .into_iter()
                    .map(ListItem::from_value)
                    .collect(),
            },
            scalar => Self::new(coerce::text(Some(scalar))),
        }
    }
}

/// The kind of block element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    /// Section title with level (1-6)
    Header { level: u8 },
    /// Regular paragraph
    Paragraph,
    /// Bulleted or numbered list
    List { style: ListStyle, items: Vec<ListItem> },
    /// Table of rich-text cells
    Table {
        with_headings: bool,
        rows: Vec<Vec<String>>,
    },
}

impl BlockKind {
    /// Check if this is a header
    pub fn is_header(&self) -> bool {
        matches!(self, BlockKind::Header { .. })
    }

    /// Check if this is a list
    pub fn is_list(&self) -> bool {
        matches!(self, BlockKind::List { .. })
    }

    fn type_name(&self) -> &'static str {
        match self {
            BlockKind::Header { .. } => "header",
            BlockKind::Paragraph => "paragraph",
            BlockKind::List { .. } => "list",
            BlockKind::Table { .. } => "table",
        }
    }
}

/// One block produced by the policy page's block editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyBlock {
    /// Identifier assigned by the block editor, if any
    pub id: Option<String>,
    pub kind: BlockKind,
    /// Inline rich text for headers and paragraphs; empty for lists and tables
    pub text: String,
}

impl PolicyBlock {
    /// Create a new paragraph block
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self {
            id: None,
            kind: BlockKind::Paragraph,
            text: text.into(),
        }
    }

    /// Create a new header block
    pub fn header(level: u8, text: impl Into<String>) -> Self {
        Self {
            id: None,
            kind: BlockKind::Header {
                level: level.clamp(1, 6),
            },
            text: text.into(),
        }
    }

    /// Create a new list block
    pub fn list(style: ListStyle, items: Vec<ListItem>) -> Self {
        Self {
            id: None,
            kind: BlockKind::List { style, items },
            text: String::new(),
        }
    }

    /// Read a block in the block editor's `{id, type, data}` shape.
    ///
    /// Returns `None` for block types this model does not know.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let empty = Map::new();
        let data = coerce::object(obj.get("data")).unwrap_or(&empty);
        let id = coerce::identifier(obj.get("id"));

        let (kind, text) = match obj.get("type").and_then(Value::as_str) {
            Some("header") => (
                BlockKind::Header {
                    level: heading_level(data.get("level")),
                },
                coerce::text(data.get("text")),
            ),
            Some("paragraph") => (BlockKind::Paragraph, coerce::text(data.get("text"))),
            Some("list") => (
                BlockKind::List {
                    style: ListStyle::parse(data.get("style").and_then(Value::as_str).unwrap_or("")),
                    items: coerce::list(data.get("items"))
                        .into_iter()
                        .map(ListItem::from_value)
                        .collect(),
                },
                String::new(),
            ),
            Some("table") => (
                BlockKind::Table {
                    with_headings: coerce::flag(data.get("withHeadings"), true),
                    rows: table_rows(data.get("content")),
                },
                String::new(),
            ),
            other => {
                warn!(block_type = ?other, "skipping unknown policy block");
                return None;
            }
        };

        Some(Self { id, kind, text })
    }

    /// Read one entry of the flattened `fields` projection.
    pub fn from_field(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let content = obj.get("content");
        let block = match obj.get("type").and_then(Value::as_str) {
            Some("title") => PolicyBlock::header(heading_level(obj.get("level")), coerce::text(content)),
            Some("details") => PolicyBlock::paragraph(coerce::text(content)),
            Some("list") => PolicyBlock::list(
                ListStyle::parse(obj.get("style").and_then(Value::as_str).unwrap_or("")),
                coerce::list(content).into_iter().map(ListItem::from_value).collect(),
            ),
            Some("table") => PolicyBlock {
                id: None,
                kind: BlockKind::Table {
                    with_headings: coerce::flag(obj.get("hasHeaders"), true),
                    rows: table_rows(content),
                },
                text: String::new(),
            },
            _ => return None,
        };
        Some(block)
    }

    /// Project this block into the flattened `fields` shape with the given id.
    pub fn to_field(&self, field_id: usize) -> Value {
        match &self.kind {
            BlockKind::Header { level } => json!({
                "id": field_id,
                "type": "title",
                "content": self.text,
                "level": level,
            }),
            BlockKind::Paragraph => json!({
                "id": field_id,
                "type": "details",
                "content": self.text,
            }),
            BlockKind::List { style, items } => json!({
                "id": field_id,
                "type": "list",
                "content": items,
                "style": style.as_str(),
                "meta": {},
            }),
            BlockKind::Table {
                with_headings,
                rows,
            } => json!({
                "id": field_id,
                "type": "table",
                "content": rows,
                "hasHeaders": with_headings,
            }),
        }
    }

    /// Whether the block carries no visible content.
    pub fn is_empty(&self) -> bool {
        match &self.kind {
            BlockKind::Header { .. } | BlockKind::Paragraph => self.text.trim().is_empty(),
            BlockKind::List { items, .. } => items
                .iter()
                .all(|item| item.content.trim().is_empty() && item.items.is_empty()),
            BlockKind::Table { rows, .. } => rows.iter().flatten().all(|cell| cell.trim().is_empty()),
        }
    }
}

impl Serialize for PolicyBlock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let data = match &self.kind {
            BlockKind::Header { level } => json!({ "text": self.text, "level": level }),
            BlockKind::Paragraph => json!({ "text": self.text }),
            BlockKind::List { style, items } => json!({
                "style": style.as_str(),
                "meta": {},
                "items": items,
            }),
            BlockKind::Table {
                with_headings,
                rows,
            } => json!({ "withHeadings": with_headings, "content": rows }),
        };

        let mut map = serializer.serialize_map(None)?;
        if let Some(id) = &self.id {
            map.serialize_entry("id", id)?;
        }
        map.serialize_entry("type", self.kind.type_name())?;
        map.serialize_entry("data", &data)?;
        map.end()
    }
}

fn heading_level(value: Option<&Value>) -> u8 {
    value
        .and_then(Value::as_u64)
        .map(|level| level.clamp(1, 6) as u8)
        .unwrap_or(1)
}

fn table_rows(value: Option<&Value>) -> Vec<Vec<String>> {
    coerce::list(value)
        .into_iter()
        .map(|row| {
            coerce::list(Some(row))
                .into_iter()
                .map(|cell| coerce::text(Some(cell)))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_kind() {
        let para = BlockKind::Paragraph;
        assert!(!para.is_header());
        assert!(!para.is_list());

        let header = BlockKind::Header { level: 1 };
        assert!(header.is_header());

        let list = BlockKind::List {
            style: ListStyle::Unordered,
            items: vec![],
        };
        assert!(list.is_list());
    }

    #[test]
    fn test_list_marker_display() {
        assert_eq!(ListStyle::Unordered.marker(1), "•");
        assert_eq!(ListStyle::Ordered.marker(1), "1.");
        assert_eq!(ListStyle::Ordered.marker(10), "10.");
    }

    #[test]
    fn test_header_level_is_clamped() {
        let block = PolicyBlock::from_value(&json!({
            "type": "header",
            "data": {"text": "Refunds", "level": 9}
        }))
        .unwrap();
        assert_eq!(block.kind, BlockKind::Header { level: 6 });
        assert_eq!(PolicyBlock::header(0, "x").kind, BlockKind::Header { level: 1 });
    }

    #[test]
    fn test_nested_list_items() {
        let block = PolicyBlock::from_value(&json!({
            "id": "b1",
            "type": "list",
            "data": {"style": "ordered", "items": [
                "plain",
                {"content": "parent", "items": [{"content": "child", "items": []}]}
            ]}
        }))
        .unwrap();
        let BlockKind::List { style, items } = &block.kind else {
            panic!("expected list");
        };
        assert_eq!(*style, ListStyle::Ordered);
        assert_eq!(items[0], ListItem::new("plain"));
        assert_eq!(items[1].items[0].content, "child");
        assert_eq!(block.id.as_deref(), Some("b1"));
    }

    #[test]
    fn test_unknown_block_is_skipped() {
        assert!(PolicyBlock::from_value(&json!({"type": "embed", "data": {}})).is_none());
        assert!(PolicyBlock::from_value(&json!("text")).is_none());
    }

    #[test]
    fn test_field_projection_reads_back() {
        let block = PolicyBlock::header(1, "Cancellation");
        let field = block.to_field(1);
        assert_eq!(field["type"], "title");
        assert_eq!(PolicyBlock::from_field(&field), Some(block));
    }
}
