//! Plain-text views of rich-text HTML

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Strip tags, decode the common entities and collapse whitespace.
pub fn plain_text(html: &str) -> String {
    let stripped = TAG.replace_all(html, " ");
    let decoded = decode_entities(&stripped);
    WHITESPACE.replace_all(&decoded, " ").trim().to_string()
}

/// Whether rich text would render as nothing visible.
pub fn is_blank(html: &str) -> bool {
    if html.contains("<img") {
        return false;
    }
    plain_text(html).is_empty()
}

/// First `max_graphemes` user-perceived characters of the plain text,
/// with an ellipsis when cut.
pub fn excerpt(html: &str, max_graphemes: usize) -> String {
    let text = plain_text(html);
    let mut graphemes = text.graphemes(true);
    let head: String = graphemes.by_ref().take(max_graphemes).collect();
    if graphemes.next().is_some() {
        format!("{}…", head.trim_end())
    } else {
        head
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text() {
        assert_eq!(plain_text("<p>Flight <b>AI 101</b></p><p>&nbsp;</p>"), "Flight AI 101");
        assert_eq!(plain_text("Tom &amp; Jerry"), "Tom & Jerry");
    }

    #[test]
    fn test_blank_detection() {
        assert!(is_blank(""));
        assert!(is_blank("<p><br></p>"));
        assert!(is_blank("<p>&nbsp;</p>"));
        assert!(!is_blank("<p>x</p>"));
        assert!(!is_blank(r#"<p><img src="a.png"></p>"#));
    }

    #[test]
    fn test_excerpt_counts_graphemes() {
        assert_eq!(excerpt("<p>Goa</p>", 10), "Goa");
        assert_eq!(excerpt("<p>Beach day in Goa</p>", 5), "Beach…");
        // Family emoji is one grapheme made of several code points.
        assert_eq!(excerpt("👨‍👩‍👧 trip", 1), "👨‍👩‍👧…");
    }
}
