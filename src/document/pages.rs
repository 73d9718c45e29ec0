//! Cover, policy and thank-you page models

use super::block::PolicyBlock;
use super::coerce;
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

pub(crate) const COVER_KEYS: &[&str] = &["backgroundImage"];
pub(crate) const POLICY_KEYS: &[&str] = &["title", "blocks", "fields"];
pub(crate) const THANK_YOU_KEYS: &[&str] = &[
    "thankYouTitle",
    "thankYouMessage",
    "phoneNumber",
    "emailAddress",
    "websiteOrInstagram",
];

pub const DEFAULT_POLICY_TITLE: &str = "Terms & Conditions";
pub const DEFAULT_PHONE_NUMBER: &str = "(+91) 7305273554";
pub const DEFAULT_EMAIL_ADDRESS: &str = "sales@routeyourtravel.com";
pub const DEFAULT_WEBSITE: &str = "www.routeyourtravel.com";

/// Front page of the itinerary.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverPage {
    pub background_image: Option<String>,
}

impl CoverPage {
    pub fn from_object(raw: &Map<String, Value>) -> Self {
        Self {
            background_image: coerce::optional_text(raw.get("backgroundImage")),
        }
    }
}

/// Terms & conditions page, edited through an opaque block editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyPage {
    pub title: String,
    pub blocks: Vec<PolicyBlock>,
}

impl Default for PolicyPage {
    fn default() -> Self {
        Self {
            title: DEFAULT_POLICY_TITLE.to_string(),
            blocks: Vec::new(),
        }
    }
}

impl PolicyPage {
    /// Read a policy page. `blocks` wins over the flattened `fields`
    /// projection, which is only used for documents saved without blocks.
    pub fn from_object(raw: &Map<String, Value>) -> Self {
        let blocks = match raw.get("blocks") {
            Some(blocks) if !blocks.is_null() => coerce::list(Some(blocks))
                .into_iter()
                .filter_map(PolicyBlock::from_value)
                .collect(),
            _ => {
                let fields = coerce::list(raw.get("fields"));
                if !fields.is_empty() {
                    debug!(count = fields.len(), "rebuilding policy blocks from fields");
                }
                fields.into_iter().filter_map(PolicyBlock::from_field).collect()
            }
        };

        Self {
            title: coerce::text_or(raw.get("title"), DEFAULT_POLICY_TITLE),
            blocks,
        }
    }

    /// The flattened projection hosts read: one entry per block, ids from 1.
    pub fn fields(&self) -> Vec<Value> {
        self.blocks
            .iter()
            .enumerate()
            .map(|(i, block)| block.to_field(i + 1))
            .collect()
    }
}

impl Serialize for PolicyPage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("PolicyPage", 3)?;
        state.serialize_field("title", &self.title)?;
        state.serialize_field("blocks", &self.blocks)?;
        state.serialize_field("fields", &self.fields())?;
        state.end()
    }
}

/// Editable text fields of the thank-you page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ThankYouField {
    ThankYouTitle,
    ThankYouMessage,
    PhoneNumber,
    EmailAddress,
    WebsiteOrInstagram,
}

/// Closing page with contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThankYouPage {
    pub thank_you_title: String,
    pub thank_you_message: String,
    pub phone_number: String,
    pub email_address: String,
    pub website_or_instagram: String,
}

impl Default for ThankYouPage {
    fn default() -> Self {
        Self {
            thank_you_title: String::new(),
            thank_you_message: String::new(),
            phone_number: DEFAULT_PHONE_NUMBER.to_string(),
            email_address: DEFAULT_EMAIL_ADDRESS.to_string(),
            website_or_instagram: DEFAULT_WEBSITE.to_string(),
        }
    }
}

impl ThankYouPage {
    pub fn from_object(raw: &Map<String, Value>) -> Self {
        Self {
            thank_you_title: coerce::text(raw.get("thankYouTitle")),
            thank_you_message: coerce::text(raw.get("thankYouMessage")),
            phone_number: coerce::text_or(raw.get("phoneNumber"), DEFAULT_PHONE_NUMBER),
            email_address: coerce::text_or(raw.get("emailAddress"), DEFAULT_EMAIL_ADDRESS),
            website_or_instagram: coerce::text_or(raw.get("websiteOrInstagram"), DEFAULT_WEBSITE),
        }
    }

    pub fn field(&self, field: ThankYouField) -> &str {
        match field {
            ThankYouField::ThankYouTitle => &self.thank_you_title,
            ThankYouField::ThankYouMessage => &self.thank_you_message,
            ThankYouField::PhoneNumber => &self.phone_number,
            ThankYouField::EmailAddress => &self.email_address,
            ThankYouField::WebsiteOrInstagram => &self.website_or_instagram,
        }
    }

    pub fn field_mut(&mut self, field: ThankYouField) -> &mut String {
        match field {
            ThankYouField::ThankYouTitle => &mut self.thank_you_title,
            ThankYouField::ThankYouMessage => &mut self.thank_you_message,
            ThankYouField::PhoneNumber => &mut self.phone_number,
            ThankYouField::EmailAddress => &mut self.email_address,
            ThankYouField::WebsiteOrInstagram => &mut self.website_or_instagram,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::block::BlockKind;
    use serde_json::json;

    #[test]
    fn test_policy_falls_back_to_fields() {
        let raw = json!({
            "fields": [
                {"id": 1, "type": "title", "content": "Refunds", "level": 1},
                {"id": 2, "type": "details", "content": "No refunds."}
            ]
        });
        let page = PolicyPage::from_object(raw.as_object().unwrap());
        assert_eq!(page.title, DEFAULT_POLICY_TITLE);
        assert_eq!(page.blocks.len(), 2);
        assert!(page.blocks[0].kind.is_header());
        assert_eq!(page.blocks[1].kind, BlockKind::Paragraph);
    }

    #[test]
    fn test_policy_serializes_fields_projection() {
        let page = PolicyPage {
            title: "Terms".to_string(),
            blocks: vec![PolicyBlock::paragraph("Be on time.")],
        };
        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value["fields"][0]["id"], 1);
        assert_eq!(value["fields"][0]["content"], "Be on time.");
        assert_eq!(value["blocks"][0]["type"], "paragraph");
    }

    #[test]
    fn test_thank_you_contact_defaults() {
        let raw = json!({"thankYouTitle": "Bon voyage", "phoneNumber": ""});
        let page = ThankYouPage::from_object(raw.as_object().unwrap());
        assert_eq!(page.thank_you_title, "Bon voyage");
        assert_eq!(page.phone_number, DEFAULT_PHONE_NUMBER);
        assert_eq!(page.field(ThankYouField::EmailAddress), DEFAULT_EMAIL_ADDRESS);
    }
}
