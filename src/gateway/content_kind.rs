use crate::types::mime_types;
use mime::Mime;
use std::fmt;

/// Extraction strategy selected from a file's declared MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentKind {
    /// Google Docs document, exported as plain text.
    Document,
    /// Google Sheets spreadsheet, exported as CSV.
    Spreadsheet,
    /// Google Slides presentation, exported as plain text.
    Presentation,
    /// PDF, downloaded and run through text extraction.
    Pdf,
    /// Any `text/*` type, downloaded as-is.
    Text,
    /// Anything else; carries the declared type for the error message.
    Unsupported(String),
}

impl ContentKind {
    /// Classifies a Drive MIME type. Parameters such as `charset` are ignored.
    pub fn from_mime_type(mime_type: &str) -> Self {
        let parsed = match mime_type.parse::<Mime>() {
            Ok(parsed) => parsed,
            Err(_) => return ContentKind::Unsupported(mime_type.to_string()),
        };

        match parsed.essence_str() {
            mime_types::GOOGLE_DOCUMENT => ContentKind::Document,
            mime_types::GOOGLE_SPREADSHEET => ContentKind::Spreadsheet,
            mime_types::GOOGLE_PRESENTATION => ContentKind::Presentation,
            mime_types::PDF => ContentKind::Pdf,
            _ if parsed.type_() == mime::TEXT => ContentKind::Text,
            _ => ContentKind::Unsupported(mime_type.to_string()),
        }
    }

    /// Format the provider is asked to export native documents to.
    pub fn export_mime_type(&self) -> Option<&'static str> {
        match self {
            ContentKind::Document | ContentKind::Presentation => Some(mime_types::TEXT_PLAIN),
            ContentKind::Spreadsheet => Some(mime_types::TEXT_CSV),
            ContentKind::Pdf | ContentKind::Text | ContentKind::Unsupported(_) => None,
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentKind::Document => f.write_str("document"),
            ContentKind::Spreadsheet => f.write_str("spreadsheet"),
            ContentKind::Presentation => f.write_str("presentation"),
            ContentKind::Pdf => f.write_str("pdf"),
            ContentKind::Text => f.write_str("text"),
            ContentKind::Unsupported(mime_type) => write!(f, "unsupported ({})", mime_type),
        }
    }
}
