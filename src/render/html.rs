//! HTML serialization of display pages and the print document

use crate::document::{BlockKind, ListItem, ListStyle, Page, PageId, PolicyBlock, ThankYouField};
use crate::render::{Control, DisplayItem, DisplayPage};
use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashMap;
use std::fmt::Write;
use tracing::warn;

static COMMENTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid comment regex"));
static ZOOM_STYLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"style="[^"]*transform:[^"]*scale[^"]*""#).expect("valid zoom regex")
});
static REACT_ROOT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\s?data-reactroot(="[^"]*")?"#).expect("valid reactroot regex")
});
static EDITOR_ONLY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<(?:button|p|div)\b[^>]*\bdata-editor-only\b[^>]*>.*?</(?:button|p|div)>")
        .expect("valid editor-only regex")
});
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

const PRINT_STYLES: &str = "\
* { margin: 0; padding: 0; box-sizing: border-box; font-family: 'Lato', sans-serif; \
-webkit-print-color-adjust: exact; print-color-adjust: exact; } \
body { line-height: 1.4; color: #0E1328; background: white; } \
.pdf-page { width: 1088px; page-break-after: always; page-break-inside: avoid; position: relative; } \
.pdf-page[data-page-type=\"policy\"] { page-break-inside: auto; } \
.pdf-page:last-child { page-break-after: avoid; } \
.pdf-page-missing { min-height: 1540px; display: flex; align-items: center; justify-content: center; } \
img { max-width: 100%; height: auto; display: block; }";

/// Serialize one display page. The root element carries `data-page-id` and
/// `data-page-type` so print tooling can locate it.
pub fn page_html(page: &DisplayPage) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        r#"<div class="page page-{kind}" data-page-id="{id}" data-page-type="{kind}" data-page-number="{number}">"#,
        kind = page.kind,
        id = escape(&page.page_id.to_string()),
        number = page.page_number,
    );
    for item in &page.items {
        write_item(&mut out, item);
    }
    out.push_str("</div>");
    out
}

/// Remove editor residue from a rendered fragment: comments, zoom
/// transforms, framework attributes, editor-only elements and whitespace runs.
pub fn sanitize_fragment(html: &str) -> String {
    let html = COMMENTS.replace_all(html, "");
    let html = ZOOM_STYLE.replace_all(&html, "");
    let html = REACT_ROOT.replace_all(&html, "");
    let html = EDITOR_ONLY.replace_all(&html, "");
    WHITESPACE.replace_all(&html, " ").trim().to_string()
}

/// Build the standalone HTML document sent to the PDF renderer.
///
/// Each page is wrapped in a `pdf-page` element. A page without a fragment
/// gets a placeholder naming its position and type.
pub fn export_document(pages: &[Page], fragments: &FxHashMap<PageId, String>) -> String {
    let mut body = String::new();
    for (index, page) in pages.iter().enumerate() {
        let id = escape(&page.id.to_string());
        match fragments.get(&page.id) {
            Some(fragment) => {
                let _ = write!(
                    body,
                    r#"<div class="pdf-page" data-page-id="{id}" data-page-type="{kind}">{html}</div>"#,
                    kind = page.kind(),
                    html = sanitize_fragment(fragment),
                );
            }
            None => {
                warn!(page = %page.id, "no rendered fragment for page");
                let _ = write!(
                    body,
                    r#"<div class="pdf-page pdf-page-missing" data-page-id="{id}" data-page-type="{kind}"><div>Page {number} - {kind}</div></div>"#,
                    kind = page.kind(),
                    number = index + 1,
                );
            }
        }
    }

    format!(
        concat!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n",
            "<meta charset=\"UTF-8\">\n",
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
            "<title>Itinerary PDF</title>\n",
            "<style>{styles}</style>\n",
            "</head>\n<body>\n{body}\n</body>\n</html>"
        ),
        styles = PRINT_STYLES,
        body = body,
    )
}

fn write_item(out: &mut String, item: &DisplayItem) {
    match item {
        DisplayItem::CoverBackground { image } => match image {
            Some(src) => {
                let _ = write!(
                    out,
                    r#"<div class="cover" style="background-image: url('{}')"></div>"#,
                    escape(src)
                );
            }
            None => out.push_str(
                r#"<div class="cover cover-empty"><button data-editor-only data-action="upload">Upload background</button></div>"#,
            ),
        },
        DisplayItem::DayHeader {
            day_number,
            destination,
        } => {
            let _ = write!(out, r#"<header class="day-header"><span class="day-number">DAY {}</span>"#, day_number);
            if !destination.trim().is_empty() {
                let _ = write!(out, r#"<h1 class="destination">{}</h1>"#, escape(destination));
            }
            out.push_str("</header>");
        }
        DisplayItem::Banner { image } => match image {
            Some(src) => {
                let _ = write!(out, r#"<img class="day-banner" src="{}" alt="">"#, escape(src));
            }
            None => out.push_str(r#"<button data-editor-only data-action="upload">Upload image</button>"#),
        },
        DisplayItem::Meals { meals } => {
            out.push_str(r#"<ul class="meals">"#);
            for (meal, selected) in meals {
                let _ = write!(
                    out,
                    r#"<li data-meal="{}" data-selected="{}">{}</li>"#,
                    meal.as_str(),
                    selected,
                    meal.label()
                );
            }
            out.push_str("</ul>");
        }
        DisplayItem::Section {
            section,
            icon,
            heading,
            rows,
            placeholder,
            controls,
        } => {
            let _ = write!(
                out,
                r#"<section class="itinerary-section" data-section-id="{}" data-icon="{}">"#,
                escape(&section.to_string()),
                icon
            );
            write_controls(out, controls);
            if !heading.trim().is_empty() {
                let _ = write!(out, r#"<h2 class="section-heading">{}</h2>"#, escape(heading));
            }
            for row in rows {
                match placeholder {
                    Some(hint) => {
                        let _ = write!(out, r#"<div class="ql-editor" data-placeholder="{}">{}</div>"#, escape(hint), row);
                    }
                    None => {
                        let _ = write!(out, r#"<div class="ql-editor">{}</div>"#, row);
                    }
                }
            }
            out.push_str("</section>");
        }
        DisplayItem::ImageSection {
            section,
            image,
            controls,
        } => {
            let _ = write!(
                out,
                r#"<figure class="image-section" data-section-id="{}">"#,
                escape(&section.to_string())
            );
            write_controls(out, controls);
            if let Some(src) = image {
                let _ = write!(out, r#"<img src="{}" alt="">"#, escape(src));
            }
            out.push_str("</figure>");
        }
        DisplayItem::AddSectionTray { options } => {
            for icon in options {
                let _ = write!(
                    out,
                    r#"<button class="section-tray" data-editor-only data-action="add-section" data-icon="{}">{}</button>"#,
                    icon,
                    icon.label()
                );
            }
        }
        DisplayItem::PolicyTitle { text } => {
            let _ = write!(out, r#"<h1 class="policy-title">{}</h1>"#, escape(text));
        }
        DisplayItem::PolicyBlock { block } => write_block(out, block),
        DisplayItem::PolicyPlaceholder => {
            out.push_str(r#"<p class="placeholder" data-editor-only>Start typing your terms and conditions</p>"#);
        }
        DisplayItem::ThankYouField { field, text } => {
            let (tag, class) = match field {
                ThankYouField::ThankYouTitle => ("h1", "thank-you-title"),
                ThankYouField::ThankYouMessage => ("p", "thank-you-message"),
                ThankYouField::PhoneNumber => ("p", "contact-phone"),
                ThankYouField::EmailAddress => ("p", "contact-email"),
                ThankYouField::WebsiteOrInstagram => ("p", "contact-website"),
            };
            let _ = write!(out, r#"<{tag} class="{class}">{}</{tag}>"#, escape(text));
        }
    }
}

fn write_controls(out: &mut String, controls: &[Control]) {
    for control in controls {
        let _ = write!(
            out,
            r#"<button data-editor-only data-action="{}"></button>"#,
            control.action()
        );
    }
}

/// Block text is editor HTML and goes out verbatim.
fn write_block(out: &mut String, block: &PolicyBlock) {
    match &block.kind {
        BlockKind::Header { level } => {
            let _ = write!(out, "<h{level}>{}</h{level}>", block.text);
        }
        BlockKind::Paragraph => {
            let _ = write!(out, "<p>{}</p>", block.text);
        }
        BlockKind::List { style, items } => write_list(out, *style, items),
        BlockKind::Table {
            with_headings,
            rows,
        } => {
            out.push_str("<table>");
            for (i, row) in rows.iter().enumerate() {
                let cell = if *with_headings && i == 0 { "th" } else { "td" };
                out.push_str("<tr>");
                for value in row {
                    let _ = write!(out, "<{cell}>{}</{cell}>", value);
                }
                out.push_str("</tr>");
            }
            out.push_str("</table>");
        }
    }
}

fn write_list(out: &mut String, style: ListStyle, items: &[ListItem]) {
    let tag = match style {
        ListStyle::Ordered => "ol",
        ListStyle::Unordered => "ul",
    };
    let _ = write!(out, "<{tag}>");
    for item in items {
        let _ = write!(out, "<li>{}", item.content);
        if !item.items.is_empty() {
            write_list(out, style, &item.items);
        }
        out.push_str("</li>");
    }
    let _ = write!(out, "</{tag}>");
}

/// Escape plain text for element content and attribute values.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{normalize_pages, PageIdAllocator};
    use crate::render::{DisplayList, RenderMode};
    use serde_json::json;

    fn pages() -> Vec<Page> {
        normalize_pages(
            &json!([
                {"id": 10, "type": "day", "destination": "Goa & Co",
                 "arrivalDetails": ["<p>Flight at <b>10am</b></p>"]},
                {"id": 11, "type": "policy",
                 "blocks": [{"type": "list", "data": {"style": "ordered", "items": ["One", "Two"]}}]}
            ]),
            &mut PageIdAllocator::new(),
        )
    }

    #[test]
    fn test_page_carries_id_and_verbatim_rich_text() {
        let list = DisplayList::build(&pages(), RenderMode::Preview, 1);
        let html = page_html(&list.pages[0]);
        assert!(html.starts_with(r#"<div class="page page-day" data-page-id="10" data-page-type="day""#));
        assert!(html.contains("<p>Flight at <b>10am</b></p>"));
        assert!(html.contains("Goa &amp; Co"));
        assert!(!html.contains("data-editor-only"));

        let policy = page_html(&list.pages[1]);
        assert!(policy.contains("<ol><li>One</li><li>Two</li></ol>"));
    }

    #[test]
    fn test_sanitize_strips_editor_residue() {
        let raw = r#"<div data-reactroot=""><!-- note --><div style="transform: scale(0.5)">  Hi
            <button data-editor-only data-action="remove">x</button></div></div>"#;
        assert_eq!(sanitize_fragment(raw), "<div><div > Hi </div></div>");
    }

    #[test]
    fn test_edit_mode_controls_are_stripped_for_print() {
        let list = DisplayList::build(&pages(), RenderMode::Edit, 1);
        let html = sanitize_fragment(&page_html(&list.pages[0]));
        assert!(!html.contains("data-editor-only"));
        assert!(html.contains("data-section-id=\"main_arrival\""));
    }

    #[test]
    fn test_export_document_wraps_pages() {
        let pages = pages();
        let mut fragments = FxHashMap::default();
        fragments.insert(PageId::Numeric(10), "<p>day</p>".to_string());
        let doc = export_document(&pages, &fragments);

        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains(r#"<div class="pdf-page" data-page-id="10" data-page-type="day"><p>day</p></div>"#));
        assert!(doc.contains("<div>Page 2 - policy</div>"));
    }
}
