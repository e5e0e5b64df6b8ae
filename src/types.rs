use std::path::PathBuf;

pub const NO_SUBJECT: &str = "No subject";
pub const UNKNOWN_SENDER: &str = "Unknown";

/// The content types the extractor acts on. Anything else is carried along
/// in the tree but never retained.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentKind {
    Html,
    Plain,
    Other,
}

impl ContentKind {
    pub fn of(mimetype: &str) -> Self {
        if mimetype.eq_ignore_ascii_case("text/html") {
            ContentKind::Html
        } else if mimetype.eq_ignore_ascii_case("text/plain") {
            ContentKind::Plain
        } else {
            ContentKind::Other
        }
    }
}

/// A leaf carries its decoded text; containers (multiparts and encapsulated
/// `message/rfc822` parts) carry their children in document order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PartBody {
    Leaf(String),
    Multipart(Vec<PartNode>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartNode {
    pub content_type: String,
    pub body: PartBody,
}

impl PartNode {
    pub fn leaf(content_type: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            body: PartBody::Leaf(body.into()),
        }
    }

    pub fn multipart(content_type: impl Into<String>, children: Vec<PartNode>) -> Self {
        Self {
            content_type: content_type.into(),
            body: PartBody::Multipart(children),
        }
    }

    pub fn kind(&self) -> ContentKind {
        ContentKind::of(&self.content_type)
    }

    pub fn is_multipart(&self) -> bool {
        matches!(self.body, PartBody::Multipart(_))
    }

    /// Decoded body of a leaf; `None` for containers.
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            PartBody::Leaf(text) => Some(text),
            PartBody::Multipart(_) => None,
        }
    }

    pub fn children(&self) -> &[PartNode] {
        match &self.body {
            PartBody::Leaf(_) => &[],
            PartBody::Multipart(children) => children,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageSummary {
    pub subject: Option<String>,
    pub from: Option<String>,
    pub content_type: String,
}

impl MessageSummary {
    pub fn subject_or_default(&self) -> &str {
        self.subject.as_deref().unwrap_or(NO_SUBJECT)
    }

    pub fn from_or_default(&self) -> &str {
        self.from.as_deref().unwrap_or(UNKNOWN_SENDER)
    }
}

#[derive(Clone, Debug)]
pub struct ParsedMessage {
    pub summary: MessageSummary,
    pub root: PartNode,
}

/// First HTML and first plain-text body found in a message.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Extraction {
    pub html: Option<String>,
    pub text: Option<String>,
}

/// A body written to disk.
#[derive(Clone, Debug)]
pub struct SavedPart {
    pub path: PathBuf,
    pub size_bytes: usize,
}
