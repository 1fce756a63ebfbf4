//! A signature-sniffing metadata extractor.
//!
//! Stands in for an external characterization tool. Formats are recognised
//! by their leading magic bytes; title and author are read from PDF info
//! entries (`/Title (..)`, `/Author (..)`) or from `Title:` / `Author:`
//! header lines in plain text. The output is a flat JSON object of terms.

use serde_json::{json, Map, Value};
use tracing::debug;

use fixity_contracts::error::{FixityError, FixityResult};
use fixity_core::traits::MetadataExtractor;

use crate::store::sha256_hex;

struct Format {
    mime_type: &'static str,
    label: &'static str,
}

const PDF: Format = Format { mime_type: "application/pdf", label: "Portable Document Format" };
const PNG: Format = Format { mime_type: "image/png", label: "Portable Network Graphics" };
const JPEG: Format = Format { mime_type: "image/jpeg", label: "JPEG File Interchange Format" };
const GIF: Format = Format { mime_type: "image/gif", label: "Graphics Interchange Format" };
const ZIP: Format = Format { mime_type: "application/zip", label: "ZIP Format" };
const TEXT: Format = Format { mime_type: "text/plain", label: "Plain text" };
const UNKNOWN: Format = Format { mime_type: "application/octet-stream", label: "Unknown Binary" };

fn sniff(content: &[u8]) -> &'static Format {
    if content.starts_with(b"%PDF-") {
        &PDF
    } else if content.starts_with(b"\x89PNG\r\n\x1a\n") {
        &PNG
    } else if content.starts_with(b"\xff\xd8\xff") {
        &JPEG
    } else if content.starts_with(b"GIF87a") || content.starts_with(b"GIF89a") {
        &GIF
    } else if content.starts_with(b"PK\x03\x04") {
        &ZIP
    } else if std::str::from_utf8(content).is_ok() {
        &TEXT
    } else {
        &UNKNOWN
    }
}

/// Structural completeness check for the formats that have a trailer.
fn well_formed(format: &Format, content: &[u8]) -> bool {
    let tail = &content[content.len().saturating_sub(1024)..];
    match format.mime_type {
        "application/pdf" => contains(tail, b"%%EOF"),
        "image/png" => contains(tail, b"IEND"),
        "image/jpeg" => content.ends_with(b"\xff\xd9"),
        "image/gif" => content.ends_with(b";"),
        _ => true,
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// Value of a PDF literal-string entry such as `/Title (Annual Report)`.
fn pdf_info(content: &[u8], key: &str) -> Option<String> {
    let text = String::from_utf8_lossy(content);
    let marker = format!("/{key} (");
    let start = text.find(&marker)? + marker.len();
    let end = text[start..].find(')')? + start;
    let value = text[start..end].trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Value of a `Key: value` line in the first lines of a text file.
fn text_header(content: &[u8], key: &str) -> Option<String> {
    let text = std::str::from_utf8(content).ok()?;
    text.lines().take(16).find_map(|line| {
        let (name, value) = line.split_once(':')?;
        let value = value.trim();
        (name.trim().eq_ignore_ascii_case(key) && !value.is_empty()).then(|| value.to_string())
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureExtractor;

impl MetadataExtractor for SignatureExtractor {
    fn extract_metadata(&self, file_name: &str, content: &[u8]) -> FixityResult<Value> {
        if content.is_empty() {
            return Err(FixityError::ExtractionFailed {
                object_id: file_name.to_string(),
                reason: "content is empty".to_string(),
            });
        }

        let format = sniff(content);
        let well_formed = well_formed(format, content);

        let mut terms = Map::new();
        terms.insert("mime_type".into(), json!(format.mime_type));
        terms.insert("format_label".into(), json!(format.label));
        terms.insert("file_size".into(), json!(content.len()));
        terms.insert("filename".into(), json!(file_name));
        terms.insert("original_checksum".into(), json!(sha256_hex(content)));
        terms.insert("well_formed".into(), json!(well_formed));
        terms.insert("valid".into(), json!(well_formed));

        let (title, author) = match format.mime_type {
            "application/pdf" => (pdf_info(content, "Title"), pdf_info(content, "Author")),
            "text/plain" => (text_header(content, "Title"), text_header(content, "Author")),
            _ => (None, None),
        };
        if let Some(title) = title {
            terms.insert("file_title".into(), json!(title));
        }
        if let Some(author) = author {
            terms.insert("file_author".into(), json!(author));
        }

        debug!(file_name, mime_type = format.mime_type, well_formed, "content characterized");
        Ok(Value::Object(terms))
    }
}
