use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::config::OutputTargets;
use crate::errors::{AppResult, ExtractError};
use crate::types::{ContentKind, Extraction, ParsedMessage, PartNode, SavedPart};

/// Depth-first, document-order walk over a part tree, starting with the root.
pub struct Walk<'a> {
    stack: Vec<&'a PartNode>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a PartNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

pub fn walk(root: &PartNode) -> Walk<'_> {
    Walk { stack: vec![root] }
}

pub fn extract(message: &ParsedMessage) -> Extraction {
    let root = &message.root;

    if !root.is_multipart() {
        let body = root.text().unwrap_or_default().to_string();
        return match root.kind() {
            ContentKind::Html => Extraction {
                html: Some(body),
                text: None,
            },
            // Single-part bodies of any other type are taken as text.
            ContentKind::Plain | ContentKind::Other => Extraction {
                html: None,
                text: Some(body),
            },
        };
    }

    let mut found = Extraction::default();
    for part in walk(root) {
        let slot = match part.kind() {
            ContentKind::Html => &mut found.html,
            ContentKind::Plain => &mut found.text,
            ContentKind::Other => continue,
        };
        if slot.is_none()
            && let Some(text) = part.text()
        {
            debug!(content_type = %part.content_type, bytes = text.len(), "Retained part");
            *slot = Some(text.to_string());
        }
        if found.html.is_some() && found.text.is_some() {
            break;
        }
    }
    found
}

/// Write whichever bodies were found. Empty bodies count as not found.
pub fn write_outputs(
    extraction: &Extraction,
    targets: &OutputTargets,
) -> AppResult<(Option<SavedPart>, Option<SavedPart>)> {
    let html = save(extraction.html.as_deref(), &targets.html_path())?;
    let text = save(extraction.text.as_deref(), &targets.text_path())?;
    Ok((html, text))
}

fn save(body: Option<&str>, path: &Path) -> AppResult<Option<SavedPart>> {
    let Some(body) = body.filter(|b| !b.is_empty()) else {
        return Ok(None);
    };

    fs::write(path, body).map_err(|source| ExtractError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), bytes = body.len(), "Wrote extracted part");

    Ok(Some(SavedPart {
        path: path.to_path_buf(),
        size_bytes: body.len(),
    }))
}
