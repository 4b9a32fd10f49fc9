//! Source documents
//!
//! A [`Document`] is an ordered list of [`Page`]s loaded from a PDF (one page
//! per PDF page) or from a plain-text file whose pages are separated by form
//! feeds.

use crate::error::{DocQaError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Page separator used by paginated plain-text exports
pub const PAGE_BREAK: char = '\u{000C}';

/// Leading bytes of every PDF file
const PDF_MAGIC: &[u8] = b"%PDF-";

/// A single page of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number
    pub number: u32,
    pub text: String,
}

/// A loaded source document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub source: PathBuf,
    pub pages: Vec<Page>,
}

impl Document {
    /// Build a document from in-memory page texts, numbering pages from 1
    pub fn from_pages<I, S>(source: impl Into<PathBuf>, pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pages = pages
            .into_iter()
            .enumerate()
            .map(|(i, text)| Page {
                number: i as u32 + 1,
                text: text.into(),
            })
            .collect();
        Self {
            source: source.into(),
            pages,
        }
    }

    /// Load a document from disk.
    ///
    /// PDFs are recognised by a `.pdf` extension or the `%PDF-` header; any
    /// other file must be UTF-8 text. Fails with [`DocQaError::SourceNotFound`]
    /// when the path does not point to a readable file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        ensure_readable(path)?;

        let bytes = fs::read(path).map_err(|e| {
            DocQaError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read {:?}: {}", path, e),
            ))
        })?;

        let document = if is_pdf(path, &bytes) {
            Self::parse_pdf(path, &bytes)?
        } else {
            Self::parse_text(path, bytes)?
        };

        if document.is_empty() {
            tracing::warn!(
                "{:?} contains no extractable text (may be image-based)",
                path
            );
        }
        tracing::debug!(
            "Loaded {:?}: {} pages, {} chars",
            path,
            document.pages.len(),
            document.char_count()
        );
        Ok(document)
    }

    fn parse_pdf(path: &Path, bytes: &[u8]) -> Result<Self> {
        let pages = pdf_extract::extract_text_from_mem_by_pages(bytes).map_err(|e| {
            DocQaError::Parse(format!("Failed to extract text from PDF {:?}: {}", path, e))
        })?;
        Ok(Self::from_pages(path, pages))
    }

    fn parse_text(path: &Path, bytes: Vec<u8>) -> Result<Self> {
        let content = String::from_utf8(bytes).map_err(|e| {
            DocQaError::Parse(format!("{:?} is neither a PDF nor UTF-8 text: {}", path, e))
        })?;
        let content = content.strip_suffix(PAGE_BREAK).unwrap_or(&content);
        Ok(Self::from_pages(path, content.split(PAGE_BREAK)))
    }

    /// Total characters across all pages
    pub fn char_count(&self) -> usize {
        self.pages.iter().map(|p| p.text.chars().count()).sum()
    }

    /// True when no page has any non-whitespace text
    pub fn is_empty(&self) -> bool {
        self.pages.iter().all(|p| p.text.trim().is_empty())
    }
}

fn is_pdf(path: &Path, bytes: &[u8]) -> bool {
    let by_extension = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);
    by_extension || bytes.starts_with(PDF_MAGIC)
}

/// Verify the source exists and can be opened for reading
pub fn ensure_readable(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(DocQaError::SourceNotFound(path.display().to_string()));
    }
    fs::File::open(path)
        .map(|_| ())
        .map_err(|e| DocQaError::SourceNotFound(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_pages_numbers_from_one() {
        let doc = Document::from_pages("mem", ["first", "second"]);
        assert_eq!(doc.pages.len(), 2);
        assert_eq!(doc.pages[0].number, 1);
        assert_eq!(doc.pages[1].number, 2);
        assert_eq!(doc.pages[1].text, "second");
    }

    #[test]
    fn test_load_missing_file() {
        let err = Document::load("/definitely/not/here.pdf").unwrap_err();
        assert!(matches!(err, DocQaError::SourceNotFound(_)));
    }

    #[test]
    fn test_load_directory_is_not_a_source() {
        let dir = TempDir::new().unwrap();
        let err = Document::load(dir.path()).unwrap_err();
        assert!(matches!(err, DocQaError::SourceNotFound(_)));
    }

    #[test]
    fn test_load_text_splits_on_form_feed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.txt");
        fs::write(&path, "Page one.\u{000C}Page two.\u{000C}").unwrap();

        let doc = Document::load(&path).unwrap();
        assert_eq!(doc.pages.len(), 2);
        assert_eq!(doc.pages[0].text, "Page one.");
        assert_eq!(doc.pages[1].text, "Page two.");
        assert_eq!(doc.char_count(), 18);
    }

    /// Minimal PDF with one Helvetica text line per page and a valid xref table
    fn sample_pdf(page_texts: &[&str]) -> Vec<u8> {
        let first_page = 4;
        let font = first_page + 2 * page_texts.len();
        let kids: Vec<String> = (0..page_texts.len())
            .map(|i| format!("{} 0 R", first_page + 2 * i))
            .collect();

        let mut objects = vec![
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kids.join(" "),
                page_texts.len()
            ),
            "<< /Producer (docqa tests) >>".to_string(),
        ];
        for (i, text) in page_texts.iter().enumerate() {
            let stream = format!("BT /F1 18 Tf 72 720 Td ({}) Tj ET", text);
            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
                 /Resources << /Font << /F1 {} 0 R >> >> /Contents {} 0 R >>",
                font,
                first_page + 2 * i + 1
            ));
            objects.push(format!(
                "<< /Length {} >>\nstream\n{}\nendstream",
                stream.len(),
                stream
            ));
        }
        objects.push(
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
        );

        let mut out = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::new();
        for (i, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).into_bytes());
        }
        let xref_at = out.len();
        out.extend(format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).into_bytes());
        for offset in offsets {
            out.extend(format!("{:010} 00000 n \n", offset).into_bytes());
        }
        out.extend(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R /Info 3 0 R >>\nstartxref\n{}\n%%EOF\n",
                objects.len() + 1,
                xref_at
            )
            .into_bytes(),
        );
        out
    }

    #[test]
    fn test_load_pdf_one_page_per_pdf_page() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.pdf");
        fs::write(&path, sample_pdf(&["Alpha", "Bravo"])).unwrap();

        let doc = Document::load(&path).unwrap();
        assert_eq!(doc.pages.len(), 2);
        assert_eq!(doc.pages[0].number, 1);
        assert_eq!(doc.pages[1].number, 2);
        assert!(doc.pages[0].text.contains("Alpha"));
        assert!(doc.pages[1].text.contains("Bravo"));
        assert!(!doc.pages[0].text.contains("Bravo"));
    }

    #[test]
    fn test_pdf_detected_without_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report");
        fs::write(&path, sample_pdf(&["Charlie"])).unwrap();

        let doc = Document::load(&path).unwrap();
        assert_eq!(doc.pages.len(), 1);
        assert!(doc.pages[0].text.contains("Charlie"));
    }

    #[test]
    fn test_corrupt_pdf_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.pdf");
        fs::write(&path, b"not a pdf at all").unwrap();

        let err = Document::load(&path).unwrap_err();
        assert!(matches!(err, DocQaError::Parse(_)));
    }

    #[test]
    fn test_binary_without_pdf_header_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blob.bin");
        fs::write(&path, [0xffu8, 0xfe, 0x00, 0x81]).unwrap();

        let err = Document::load(&path).unwrap_err();
        assert!(matches!(err, DocQaError::Parse(_)));
    }

    #[test]
    fn test_whitespace_only_document_is_empty() {
        assert!(Document::from_pages("mem", ["\n\n", "  "]).is_empty());
        assert!(!Document::from_pages("mem", ["\n", "text"]).is_empty());
    }
}
