//! Turning raw message bytes into a [`ParsedMessage`] via mailparse.
use mailparse::ParsedMail;
use tracing::{debug, warn};

use crate::errors::{AppResult, ExtractError};
use crate::types::{MessageSummary, ParsedMessage, PartBody, PartNode};

const FALLBACK_CONTENT_TYPE: &str = "text/plain";

/// Decode bytes as UTF-8, silently dropping sequences that are not valid.
pub fn decode_lossy(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}

pub fn parse_message(text: &str) -> AppResult<ParsedMessage> {
    let parsed =
        mailparse::parse_mail(text.as_bytes()).map_err(|e| ExtractError::Parse(e.to_string()))?;

    let summary = MessageSummary {
        subject: get_header_value(&parsed, "Subject"),
        from: get_header_value(&parsed, "From"),
        content_type: parsed.ctype.mimetype.to_lowercase(),
    };
    let root = build_tree(&parsed, false);
    debug!(content_type = %summary.content_type, parts = root.children().len(), "Parsed message");

    Ok(ParsedMessage { summary, root })
}

/// Like [`parse_message`], but a message mailparse rejects is kept as one
/// plain-text body holding the whole input.
pub fn parse_message_lossy(text: &str) -> ParsedMessage {
    parse_message(text).unwrap_or_else(|e| {
        warn!(error = %e, "Treating unparseable input as a single text/plain body");
        ParsedMessage {
            summary: MessageSummary {
                subject: None,
                from: None,
                content_type: FALLBACK_CONTENT_TYPE.to_string(),
            },
            root: PartNode::leaf(FALLBACK_CONTENT_TYPE, text),
        }
    })
}

/// `delimited` is set for parts that sit between multipart boundaries: the
/// line break before the next delimiter belongs to the delimiter, not the body.
fn build_tree(part: &ParsedMail, delimited: bool) -> PartNode {
    let content_type = part.ctype.mimetype.to_lowercase();
    if content_type.starts_with("multipart/") {
        let children = part.subparts.iter().map(|p| build_tree(p, true)).collect();
        return PartNode::multipart(content_type, children);
    }
    if content_type == "message/rfc822"
        && let Some(inner) = encapsulated(part, delimited)
    {
        return PartNode::multipart(content_type, vec![inner]);
    }
    PartNode::leaf(content_type, leaf_body(part, delimited))
}

fn encapsulated(part: &ParsedMail, delimited: bool) -> Option<PartNode> {
    let raw = part.get_body_raw().ok()?;
    let raw = if delimited {
        strip_delimiter_break(&raw)
    } else {
        &raw[..]
    };
    match mailparse::parse_mail(raw) {
        Ok(inner) => Some(build_tree(&inner, false)),
        Err(e) => {
            warn!(error = %e, "Keeping unparseable message/rfc822 part as a leaf");
            None
        }
    }
}

fn leaf_body(part: &ParsedMail, delimited: bool) -> String {
    let body = match part.get_body() {
        Ok(body) => body,
        Err(e) => {
            // Unknown charset or broken transfer encoding: keep what we can.
            warn!(content_type = %part.ctype.mimetype, error = %e, "Falling back to raw body bytes");
            decode_lossy(&part.get_body_raw().unwrap_or_default())
        }
    };
    // Base64 decoding already discards the line break.
    if delimited && !is_base64(part) {
        let kept = strip_delimiter_break(body.as_bytes()).len();
        return body[..kept].to_string();
    }
    body
}

fn is_base64(part: &ParsedMail) -> bool {
    get_header_value(part, "Content-Transfer-Encoding")
        .is_some_and(|cte| cte.trim().eq_ignore_ascii_case("base64"))
}

/// Drop exactly one trailing CRLF (or bare LF).
fn strip_delimiter_break(body: &[u8]) -> &[u8] {
    body.strip_suffix(b"\r\n")
        .or_else(|| body.strip_suffix(b"\n"))
        .unwrap_or(body)
}

fn get_header_value(parsed: &ParsedMail, header_name: &str) -> Option<String> {
    parsed
        .headers
        .iter()
        .find(|h| h.get_key().eq_ignore_ascii_case(header_name))
        .map(|h| h.get_value())
}

/// Indented listing of the part tree, one node per line.
pub fn outline(root: &PartNode) -> String {
    let mut out = String::new();
    push_outline(root, 0, &mut out);
    out
}

fn push_outline(node: &PartNode, depth: usize, out: &mut String) {
    out.push_str(&"  ".repeat(depth));
    out.push_str(&node.content_type);
    match &node.body {
        PartBody::Leaf(text) => out.push_str(&format!(" ({} bytes)\n", text.len())),
        PartBody::Multipart(children) => {
            let noun = if children.len() == 1 { "part" } else { "parts" };
            out.push_str(&format!(" ({} {noun})\n", children.len()));
            for child in children {
                push_outline(child, depth + 1, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_lossy_drops_invalid_bytes() {
        let bytes = b"caf\xc3\xa9 \xff\xfebar";
        assert_eq!(decode_lossy(bytes), "café bar");
    }

    #[test]
    fn headers_default_to_none() {
        let msg = parse_message("Content-Type: text/plain\r\n\r\nhi\r\n").unwrap();
        assert_eq!(msg.summary.subject, None);
        assert_eq!(msg.summary.subject_or_default(), "No subject");
        assert_eq!(msg.summary.from_or_default(), "Unknown");
    }

    #[test]
    fn missing_content_type_is_text_plain() {
        let msg = parse_message("Subject: bare\r\n\r\nbody\r\n").unwrap();
        assert_eq!(msg.summary.subject.as_deref(), Some("bare"));
        assert_eq!(msg.summary.content_type, "text/plain");
        assert!(!msg.root.is_multipart());
    }

    #[test]
    fn nested_multipart_builds_tree() {
        let raw = concat!(
            "Content-Type: multipart/mixed; boundary=\"outer\"\r\n",
            "\r\n",
            "--outer\r\n",
            "Content-Type: multipart/alternative; boundary=\"inner\"\r\n",
            "\r\n",
            "--inner\r\n",
            "Content-Type: text/plain\r\n",
            "\r\n",
            "plain\r\n",
            "--inner\r\n",
            "Content-Type: text/html\r\n",
            "\r\n",
            "<p>html</p>\r\n",
            "--inner--\r\n",
            "--outer\r\n",
            "Content-Type: image/png\r\n",
            "Content-Transfer-Encoding: base64\r\n",
            "\r\n",
            "iVBORw0KGgo=\r\n",
            "--outer--\r\n",
        );
        let msg = parse_message(raw).unwrap();
        assert_eq!(msg.summary.content_type, "multipart/mixed");
        let children = msg.root.children();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].content_type, "multipart/alternative");
        assert_eq!(children[0].children()[1].content_type, "text/html");
        assert_eq!(children[1].content_type, "image/png");

        let tree = outline(&msg.root);
        let lines: Vec<&str> = tree.lines().collect();
        assert_eq!(lines[0], "multipart/mixed (2 parts)");
        assert_eq!(lines[1], "  multipart/alternative (2 parts)");
        assert!(lines[2].starts_with("    text/plain ("));
        assert!(lines[4].starts_with("  image/png ("));
    }

    #[test]
    fn quoted_printable_body_is_decoded() {
        let raw = concat!(
            "Content-Type: text/plain; charset=utf-8\r\n",
            "Content-Transfer-Encoding: quoted-printable\r\n",
            "\r\n",
            "caf=C3=A9\r\n",
        );
        let msg = parse_message(raw).unwrap();
        assert_eq!(msg.root.text(), Some("café\r\n"));
    }

    #[test]
    fn delimiter_line_break_is_not_part_of_the_body() {
        let raw = concat!(
            "Content-Type: multipart/mixed; boundary=\"m\"\r\n",
            "\r\n",
            "--m\r\n",
            "Content-Type: text/plain\r\n",
            "\r\n",
            "plain body\r\n",
            "--m\r\n",
            "Content-Type: text/plain; charset=utf-8\r\n",
            "Content-Transfer-Encoding: quoted-printable\r\n",
            "\r\n",
            "two lines\r\n",
            "caf=C3=A9\r\n",
            "\r\n",
            "--m--",
        );
        let msg = parse_message(raw).unwrap();
        let children = msg.root.children();
        assert_eq!(children[0].text(), Some("plain body"));
        assert_eq!(children[1].text(), Some("two lines\r\ncafé\r\n"));
    }

    #[test]
    fn strip_delimiter_break_removes_one_line_break() {
        assert_eq!(strip_delimiter_break(b"a\r\n\r\n"), b"a\r\n");
        assert_eq!(strip_delimiter_break(b"a\n"), b"a");
        assert_eq!(strip_delimiter_break(b"a"), b"a");
    }

    #[test]
    fn encapsulated_message_is_descended_into() {
        let raw = concat!(
            "Subject: Fwd: report\r\n",
            "Content-Type: multipart/mixed; boundary=\"f\"\r\n",
            "\r\n",
            "--f\r\n",
            "Content-Type: text/plain\r\n",
            "\r\n",
            "see attached\r\n",
            "--f\r\n",
            "Content-Type: message/rfc822\r\n",
            "\r\n",
            "Subject: report\r\n",
            "Content-Type: text/html\r\n",
            "\r\n",
            "<p>inner</p>\r\n",
            "--f--\r\n",
        );
        let msg = parse_message(raw).unwrap();
        let forwarded = &msg.root.children()[1];
        assert_eq!(forwarded.content_type, "message/rfc822");
        assert_eq!(forwarded.children().len(), 1);
        assert_eq!(forwarded.children()[0].content_type, "text/html");
        assert_eq!(forwarded.children()[0].text(), Some("<p>inner</p>"));

        let tree = outline(&msg.root);
        assert!(tree.contains("  message/rfc822 (1 part)\n"), "{tree}");
    }
}
