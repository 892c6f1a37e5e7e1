//! Text run collection from PDF content streams.
//!
//! Wraps lopdf: walks each page's content stream tracking the text matrix,
//! decodes strings with the page's font encodings, and emits [`TextRun`]s in
//! reading order (top-to-bottom, left-to-right) with a global order index.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use lopdf::{Document as LopdfDocument, Object, ObjectId};
use unicode_normalization::UnicodeNormalization;

use crate::detect::validate_pdf_header;
use crate::error::{Error, Result};
use crate::model::TextRun;

use super::options::{ErrorMode, ParseOptions};

/// Collects positioned text runs from a PDF document.
pub struct RunCollector {
    doc: LopdfDocument,
    options: ParseOptions,
}

impl RunCollector {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();

        validate_pdf_header(path)?;

        let doc = LopdfDocument::load(path).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;

        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }

        Ok(Self { doc, options })
    }

    /// Open a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Open a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;

        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }

        Ok(Self { doc, options })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Document title from the Info dictionary, if present and non-empty.
    pub fn metadata_title(&self) -> Option<String> {
        let info = self.doc.trailer.get(b"Info").ok()?;
        let info_ref = info.as_reference().ok()?;
        let info_dict = self.doc.get_dictionary(info_ref).ok()?;
        let title = match info_dict.get(b"Title").ok()? {
            Object::String(bytes, _) => decode_text_simple(bytes),
            _ => return None,
        };
        let title = clean_run_text(&title);
        if title.is_empty() {
            None
        } else {
            Some(title)
        }
    }

    /// Collect all text runs in document reading order.
    ///
    /// Returns `Error::EmptyDocument` when no page yields any text (e.g.,
    /// scanned image-only documents).
    pub fn collect(&self) -> Result<Vec<TextRun>> {
        let pages = self.doc.get_pages();
        let mut runs = Vec::new();
        let mut order: u32 = 0;

        for (page_num, page_id) in pages.iter() {
            match self.collect_page(*page_num, *page_id, &mut order) {
                Ok(mut page_runs) => runs.append(&mut page_runs),
                Err(e) => {
                    if self.options.error_mode == ErrorMode::Strict {
                        return Err(e);
                    }
                    log::warn!("skipping page {}: {}", page_num, e);
                }
            }
        }

        if runs.is_empty() {
            return Err(Error::EmptyDocument);
        }

        Ok(runs)
    }

    /// Collect the runs of one page, sorted into reading order.
    fn collect_page(&self, page_num: u32, page_id: ObjectId, order: &mut u32) -> Result<Vec<TextRun>> {
        let lopdf_fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::Parse(e.to_string()))?;

        let mut font_names = HashMap::new();
        for (name, font) in &lopdf_fonts {
            let base_font = font
                .get(b"BaseFont")
                .ok()
                .and_then(|o| o.as_name().ok())
                .map(|n| String::from_utf8_lossy(n).to_string())
                .unwrap_or_else(|| "Unknown".to_string());
            font_names.insert(name.clone(), base_font);
        }

        let content = self.page_content(page_id)?;
        let mut spans = self.parse_content_stream(&content, &font_names, &lopdf_fonts)?;

        // Reading order: top-to-bottom (PDF Y is bottom-up), then left-to-right
        spans.sort_by(|a, b| {
            let y_cmp = b.y.partial_cmp(&a.y).unwrap_or(std::cmp::Ordering::Equal);
            if y_cmp == std::cmp::Ordering::Equal {
                a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal)
            } else {
                y_cmp
            }
        });

        let runs = spans
            .into_iter()
            .filter_map(|span| {
                let text = clean_run_text(&span.text);
                if text.is_empty() {
                    return None;
                }
                let run = TextRun {
                    text,
                    font_size: span.font_size,
                    is_bold: span.is_bold,
                    page: page_num,
                    y: span.y,
                    order: *order,
                };
                *order += 1;
                Some(run)
            })
            .collect();

        Ok(runs)
    }

    /// Get a page's (possibly concatenated) content stream.
    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::Parse(e.to_string()))?;

        let contents = page_dict
            .get(b"Contents")
            .map_err(|e| Error::Parse(e.to_string()))?;

        match contents {
            Object::Reference(r) => {
                if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                    return s
                        .decompressed_content()
                        .map_err(|e| Error::Parse(e.to_string()));
                }
                Err(Error::Parse("Invalid content stream".to_string()))
            }
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Reference(r) = obj {
                        if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                            if let Ok(data) = s.decompressed_content() {
                                content.extend_from_slice(&data);
                                content.push(b' ');
                            }
                        }
                    }
                }
                Ok(content)
            }
            _ => Err(Error::Parse("Invalid content stream".to_string())),
        }
    }

    /// Walk a content stream and produce raw spans.
    fn parse_content_stream(
        &self,
        content: &[u8],
        font_names: &HashMap<Vec<u8>, String>,
        lopdf_fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
    ) -> Result<Vec<RawSpan>> {
        let content =
            lopdf::content::Content::decode(content).map_err(|e| Error::Parse(e.to_string()))?;

        let mut spans = Vec::new();
        let mut current_font = String::new();
        let mut current_font_name: Vec<u8> = Vec::new();
        let mut current_font_size: f32 = 12.0;
        let mut text_matrix = TextMatrix::default();
        let mut in_text_block = false;

        for op in content.operations {
            match op.operator.as_str() {
                "BT" => {
                    in_text_block = true;
                    text_matrix = TextMatrix::default();
                }
                "ET" => {
                    in_text_block = false;
                }
                "Tf" => {
                    if op.operands.len() >= 2 {
                        if let Object::Name(font_name) = &op.operands[0] {
                            current_font_name = font_name.clone();
                            current_font = font_names
                                .get(font_name.as_slice())
                                .cloned()
                                .unwrap_or_else(|| {
                                    String::from_utf8_lossy(font_name.as_slice()).to_string()
                                });
                        }
                        current_font_size = get_number(&op.operands[1]).unwrap_or(12.0);
                    }
                }
                "Td" | "TD" => {
                    if op.operands.len() >= 2 {
                        let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                        let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                        text_matrix.translate(tx, ty);
                    }
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        text_matrix.set(
                            get_number(&op.operands[0]).unwrap_or(1.0),
                            get_number(&op.operands[1]).unwrap_or(0.0),
                            get_number(&op.operands[2]).unwrap_or(0.0),
                            get_number(&op.operands[3]).unwrap_or(1.0),
                            get_number(&op.operands[4]).unwrap_or(0.0),
                            get_number(&op.operands[5]).unwrap_or(0.0),
                        );
                    }
                }
                "T*" => {
                    text_matrix.next_line();
                }
                "Tj" | "TJ" => {
                    if in_text_block {
                        let encoding = lopdf_fonts
                            .get(&current_font_name)
                            .and_then(|f| f.get_font_encoding(&self.doc).ok());
                        let decode = |bytes: &[u8]| match encoding {
                            Some(ref enc) => LopdfDocument::decode_text(enc, bytes)
                                .unwrap_or_else(|_| decode_text_simple(bytes)),
                            None => decode_text_simple(bytes),
                        };

                        let text = if op.operator == "TJ" {
                            decode_tj_array(op.operands.first(), &decode)
                        } else if let Some(Object::String(bytes, _)) = op.operands.first() {
                            decode(bytes)
                        } else {
                            String::new()
                        };

                        if !text.trim().is_empty() {
                            let (x, y) = text_matrix.position();
                            spans.push(RawSpan {
                                text,
                                x,
                                y,
                                font_size: current_font_size * text_matrix.scale(),
                                is_bold: font_looks_bold(&current_font),
                            });
                        }
                    }
                }
                "'" | "\"" => {
                    text_matrix.next_line();
                    if in_text_block {
                        let text_idx = if op.operator == "\"" { 2 } else { 0 };
                        if let Some(Object::String(bytes, _)) = op.operands.get(text_idx) {
                            let encoding = lopdf_fonts
                                .get(&current_font_name)
                                .and_then(|f| f.get_font_encoding(&self.doc).ok());

                            let text = match encoding {
                                Some(ref enc) => LopdfDocument::decode_text(enc, bytes)
                                    .unwrap_or_else(|_| decode_text_simple(bytes)),
                                None => decode_text_simple(bytes),
                            };
                            if !text.trim().is_empty() {
                                let (x, y) = text_matrix.position();
                                spans.push(RawSpan {
                                    text,
                                    x,
                                    y,
                                    font_size: current_font_size * text_matrix.scale(),
                                    is_bold: font_looks_bold(&current_font),
                                });
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(spans)
    }
}

/// A span as it comes off the content stream, before cleanup and ordering.
struct RawSpan {
    text: String,
    x: f32,
    y: f32,
    font_size: f32,
    is_bold: bool,
}

/// Bold detection from the base font name.
fn font_looks_bold(font_name: &str) -> bool {
    let lower = font_name.to_lowercase();
    lower.contains("bold") || lower.contains("black") || lower.contains("heavy")
}

/// Decode a TJ operand array, turning large kerning adjustments into spaces.
fn decode_tj_array(operand: Option<&Object>, decode: &dyn Fn(&[u8]) -> String) -> String {
    let Some(Object::Array(arr)) = operand else {
        return String::new();
    };

    let mut combined = String::new();
    // Adjustments are in 1/1000 text-space units; large negative values
    // typically stand in for word spaces.
    let space_threshold = 200.0;

    for item in arr {
        match item {
            Object::String(bytes, _) => {
                combined.push_str(&decode(bytes));
            }
            Object::Integer(n) => {
                push_kerning_space(&mut combined, -(*n as f32), space_threshold);
            }
            Object::Real(n) => {
                push_kerning_space(&mut combined, -n, space_threshold);
            }
            _ => {}
        }
    }

    combined
}

fn push_kerning_space(combined: &mut String, adjustment: f32, threshold: f32) {
    if adjustment > threshold
        && !combined.is_empty()
        && !combined.ends_with(' ')
        && !combined.ends_with('\u{00A0}')
    {
        if let Some(c) = combined.chars().last() {
            if !crate::model::is_spaceless_script_char(c) {
                combined.push(' ');
            }
        }
    }
}

/// Simple text decoding fallback when no encoding is available.
fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|c| {
                if c.len() == 2 {
                    Some(u16::from_be_bytes([c[0], c[1]]))
                } else {
                    None
                }
            })
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    if let Ok(s) = String::from_utf8(bytes.to_vec()) {
        return s;
    }

    // Latin-1 fallback
    bytes.iter().map(|&b| b as char).collect()
}

/// Ligature and typographic-character replacements common in PDF output.
const REPLACEMENTS: &[(&str, &str)] = &[
    ("\u{FB00}", "ff"),
    ("\u{FB01}", "fi"),
    ("\u{FB02}", "fl"),
    ("\u{FB03}", "ffi"),
    ("\u{FB04}", "ffl"),
    ("\u{2018}", "'"),
    ("\u{2019}", "'"),
    ("\u{201C}", "\""),
    ("\u{201D}", "\""),
    ("\u{2013}", "-"),
    ("\u{2014}", "-"),
    ("\u{2026}", "..."),
    ("\u{2022}", ""),
    ("\u{FFFD}", ""),
];

/// Normalize a decoded run: NFC, ligatures, quotes, collapsed whitespace.
pub(crate) fn clean_run_text(text: &str) -> String {
    let mut text: String = text.nfc().collect();
    for (from, to) in REPLACEMENTS {
        if text.contains(from) {
            text = text.replace(from, to);
        }
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Helper to extract a number from a PDF object.
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Text matrix for tracking position in a content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32, // X translation
    f: f32, // Y translation
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self) {
        // Default leading; a TL operator would refine this
        self.f -= 12.0 * self.d;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_run_text() {
        assert_eq!(clean_run_text("e\u{FB03}cient"), "efficient");
        assert_eq!(clean_run_text("\u{201C}quoted\u{201D}"), "\"quoted\"");
        assert_eq!(clean_run_text("  spaced\t\tout \n"), "spaced out");
        assert_eq!(clean_run_text("\u{2022} item"), "item");
    }

    #[test]
    fn test_decode_text_simple_utf16() {
        let bytes = [0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69];
        assert_eq!(decode_text_simple(&bytes), "Hi");
    }

    #[test]
    fn test_decode_text_simple_utf8() {
        assert_eq!(decode_text_simple(b"plain"), "plain");
    }

    #[test]
    fn test_font_looks_bold() {
        assert!(font_looks_bold("Helvetica-Bold"));
        assert!(font_looks_bold("Arial-Black"));
        assert!(!font_looks_bold("Times-Roman"));
    }

    #[test]
    fn test_text_matrix_translate() {
        let mut m = TextMatrix::default();
        m.translate(10.0, -5.0);
        assert_eq!(m.position(), (10.0, -5.0));
        m.next_line();
        assert!(m.position().1 < -5.0);
    }

    #[test]
    fn test_open_rejects_non_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not_a_pdf.pdf");
        std::fs::write(&path, b"hello world, definitely not a pdf").unwrap();
        assert!(matches!(
            RunCollector::open(&path),
            Err(Error::UnknownFormat)
        ));
    }
}
