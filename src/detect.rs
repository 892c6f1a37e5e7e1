//! PDF format detection and validation.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_MAGIC_LEN: usize = 5;
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Validate that a file starts with a PDF header.
///
/// Returns the PDF version string (e.g., "1.7") on success, or
/// `Error::UnknownFormat` if the file is not a PDF.
pub fn validate_pdf_header<P: AsRef<Path>>(path: P) -> Result<String> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut header = [0u8; 16];
    let n = reader.read(&mut header)?;
    validate_pdf_bytes(&header[..n])
}

/// Validate a PDF header from bytes.
pub fn validate_pdf_bytes(data: &[u8]) -> Result<String> {
    if data.len() < PDF_MAGIC_LEN + VERSION_LEN {
        return Err(Error::UnknownFormat);
    }

    if !data.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let version_bytes = &data[PDF_MAGIC_LEN..PDF_MAGIC_LEN + VERSION_LEN];
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(&version) {
        return Err(Error::UnknownFormat);
    }

    Ok(version)
}

/// Check whether bytes look like a PDF at all.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    validate_pdf_bytes(data).is_ok()
}

/// Version strings look like "1.0" through "2.0".
fn is_valid_version(version: &str) -> bool {
    let mut chars = version.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some('1' | '2'), Some('.'), Some(c)) if c.is_ascii_digit()
    )
}
