//! Sequential document-number generator
//!
//! Derives the next business-facing serial for a transactional document
//! type. Pure: the caller persists the advanced counter.

use crate::models::DocumentType;

const DEFAULT_PAD_WIDTH: u32 = 8;

/// A generated serial plus the counter value the caller must persist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Serial {
    pub value: String,
    pub next_sequential: i64,
}

/// Compose the next serial: `code + "-" + zero-padded(sequential + 1)`
///
/// Missing `sequential` defaults to 0, missing `length` to 8. When the
/// counter outgrows the configured width no padding is added; the serial
/// simply grows past the width.
pub fn next_serial(code: &str, sequential: Option<i64>, length: Option<u32>) -> Serial {
    let next = sequential.unwrap_or(0) + 1;
    let width = length.unwrap_or(DEFAULT_PAD_WIDTH) as usize;
    let digits = next.to_string();

    let padding = width.saturating_sub(digits.len());
    let mut value = String::with_capacity(code.len() + 1 + width.max(digits.len()));
    value.push_str(code);
    value.push('-');
    for _ in 0..padding {
        value.push('0');
    }
    value.push_str(&digits);

    Serial {
        value,
        next_sequential: next,
    }
}

/// Convenience over a loaded [`DocumentType`] record
pub fn next_serial_for(document_type: &DocumentType) -> Serial {
    next_serial(
        &document_type.code,
        document_type.sequential,
        document_type.length,
    )
}
