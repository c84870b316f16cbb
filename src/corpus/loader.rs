// file: src/corpus/loader.rs
// description: PDF corpus scanning and per-page text extraction
// reference: https://docs.rs/pdf-extract

use crate::error::{Result, StudyError};
use crate::models::PageDocument;
use std::path::PathBuf;
use tracing::{debug, info};
use walkdir::WalkDir;

pub struct PdfCorpusLoader {
    pdf_dir: PathBuf,
}

impl PdfCorpusLoader {
    pub fn new(pdf_dir: impl Into<PathBuf>) -> Self {
        Self {
            pdf_dir: pdf_dir.into(),
        }
    }

    /// Load every `*.pdf` in the corpus directory as page-tagged documents.
    ///
    /// Files are visited in filename order so repeated ingestion runs see
    /// the corpus in the same order. Pages with no extractable text are
    /// skipped.
    pub fn load(&self) -> Result<Vec<PageDocument>> {
        if !self.pdf_dir.is_dir() {
            return Err(StudyError::CorpusMissing(self.pdf_dir.clone()));
        }

        let mut pdf_files: Vec<PathBuf> = WalkDir::new(&self.pdf_dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
            })
            .collect();
        pdf_files.sort();

        if pdf_files.is_empty() {
            return Err(StudyError::CorpusEmpty(self.pdf_dir.clone()));
        }

        info!("Found {} PDF file(s) in {}", pdf_files.len(), self.pdf_dir.display());

        let mut documents = Vec::new();

        for path in &pdf_files {
            let source = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();

            let pages = pdf_extract::extract_text_by_pages(path).map_err(|e| {
                StudyError::PdfExtract {
                    file: source.clone(),
                    message: e.to_string(),
                }
            })?;

            let mut extracted = 0;
            for (i, text) in pages.into_iter().enumerate() {
                if text.trim().is_empty() {
                    debug!("Skipping empty page {} of {}", i + 1, source);
                    continue;
                }

                documents.push(PageDocument::new(text, source.clone(), (i + 1) as u32));
                extracted += 1;
            }

            info!("Extracted {} page(s) from {}", extracted, source);
        }

        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_directory_is_corpus_missing() {
        let loader = PdfCorpusLoader::new("/nonexistent/pdf/dir");
        let err = loader.load().unwrap_err();
        assert!(matches!(err, StudyError::CorpusMissing(_)));
    }

    #[test]
    fn test_empty_directory_is_corpus_empty() {
        let dir = tempdir().unwrap();
        let loader = PdfCorpusLoader::new(dir.path());
        let err = loader.load().unwrap_err();
        assert!(matches!(err, StudyError::CorpusEmpty(_)));
    }

    #[test]
    fn test_non_pdf_files_are_ignored() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a pdf").unwrap();

        let loader = PdfCorpusLoader::new(dir.path());
        let err = loader.load().unwrap_err();
        assert!(matches!(err, StudyError::CorpusEmpty(_)));
    }
}
