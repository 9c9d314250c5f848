//! Turning downloaded bytes into text.

use crate::errors::{ConnectorError, ConnectorResult, DriveError, DriveResult, NetworkError};
use crate::transport::ByteStream;
use futures::StreamExt;
use lopdf::Document;
use tracing::{debug, warn};

/// Drains a chunk stream into a single buffer.
///
/// The result is the same however the provider splits the content.
pub async fn collect_chunks(mut stream: ByteStream) -> DriveResult<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut chunks = 0usize;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk
            .map_err(|e| DriveError::Network(NetworkError::StreamInterrupted(e.to_string())))?;
        buffer.extend_from_slice(&chunk);
        chunks += 1;
    }

    debug!(chunks, bytes = buffer.len(), "Download complete");
    Ok(buffer)
}

/// Strict UTF-8 decoding.
pub fn decode_utf8(bytes: Vec<u8>) -> ConnectorResult<String> {
    Ok(String::from_utf8(bytes)?)
}

/// Extracts the text of every page, in page order, joined by newlines and trimmed.
///
/// Pages whose text cannot be extracted are skipped; a document where no
/// page yields text is an extraction error.
pub fn pdf_text(bytes: &[u8]) -> ConnectorResult<String> {
    let doc = Document::load_mem(bytes)
        .map_err(|e| ConnectorError::Extraction(format!("Invalid PDF: {}", e)))?;

    let pages = doc.get_pages();
    let mut texts = Vec::with_capacity(pages.len());
    let mut failures = Vec::new();

    for page_number in pages.keys() {
        match doc.extract_text(&[*page_number]) {
            Ok(text) => texts.push(text),
            Err(e) => {
                warn!(page = page_number, error = %e, "Failed to extract PDF page text");
                failures.push(format!("page {}: {}", page_number, e));
            }
        }
    }

    if texts.is_empty() && !failures.is_empty() {
        return Err(ConnectorError::Extraction(failures.join("; ")));
    }

    Ok(texts.join("\n").trim().to_string())
}
