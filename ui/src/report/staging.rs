//! The in-memory list of files chosen for analysis.

use api::PdfUpload;
use thiserror::Error;

pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Media type guessed from a file name's extension.
///
/// The file picker only reports names, so the extension is all there is.
pub fn media_type_for(name: &str) -> &'static str {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "pdf" => PDF_MEDIA_TYPE,
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "txt" => "text/plain",
        "csv" => "text/csv",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StagedFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl StagedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let media_type = media_type_for(&name).to_string();
        Self {
            name,
            media_type,
            bytes,
        }
    }

    pub fn is_pdf(&self) -> bool {
        self.media_type == PDF_MEDIA_TYPE
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }

    pub fn to_upload(&self) -> PdfUpload {
        PdfUpload {
            name: self.name.clone(),
            bytes: self.bytes.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no staged file at position {index} (list holds {len})")]
pub struct IndexError {
    pub index: usize,
    pub len: usize,
}

/// Ordered list of PDFs awaiting analysis. Only PDFs ever get in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StagedFiles {
    files: Vec<StagedFile>,
}

impl StagedFiles {
    /// Appends the PDF candidates in order and returns how many were kept.
    pub fn add(&mut self, candidates: impl IntoIterator<Item = StagedFile>) -> usize {
        let before = self.files.len();
        self.files
            .extend(candidates.into_iter().filter(StagedFile::is_pdf));
        self.files.len() - before
    }

    pub fn remove_at(&mut self, index: usize) -> Result<StagedFile, IndexError> {
        if index < self.files.len() {
            Ok(self.files.remove(index))
        } else {
            Err(IndexError {
                index,
                len: self.files.len(),
            })
        }
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn list(&self) -> &[StagedFile] {
        &self.files
    }

    /// The file sent to the analyze endpoint.
    pub fn first(&self) -> Option<&StagedFile> {
        self.files.first()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
