//! crates/petro_repo_core/src/submission.rs
//!
//! Local pre-flight validation for document uploads. Every entry point
//! (file picker, drag-and-drop, the strict legacy modal) funnels through
//! the one `validate` function here, parameterized by a per-call-site
//! constraints value, so no two screens can drift apart.

use bytes::Bytes;
use serde::Serialize;

use crate::preview::FileKind;

pub const MEBIBYTE: u64 = 1024 * 1024;

//=========================================================================================
// Submission Inputs
//=========================================================================================

/// Metadata accompanying an upload. Title and category are mandatory;
/// description is optional.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentDraft {
    pub title: String,
    pub category: String,
    pub description: Option<String>,
}

/// The binary half of a submission.
#[derive(Debug, Clone)]
pub struct FilePayload {
    pub file_name: String,
    pub content: Bytes,
}

impl FilePayload {
    pub fn new(file_name: impl Into<String>, content: Bytes) -> Self {
        Self {
            file_name: file_name.into(),
            content,
        }
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    pub fn kind(&self) -> Option<FileKind> {
        FileKind::from_file_name(&self.file_name)
    }
}

//=========================================================================================
// Constraints and Validation
//=========================================================================================

/// Per-call-site upload constraints: the type allow-list and the byte
/// ceiling. Call sites hold a value of this instead of burying literals in
/// their own validation code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionConstraints {
    pub allowed_types: &'static [FileKind],
    pub max_bytes: u64,
}

impl SubmissionConstraints {
    /// The general upload path: 50 MiB and the full document allow-list.
    pub fn general() -> Self {
        Self {
            allowed_types: &[
                FileKind::Pdf,
                FileKind::Doc,
                FileKind::Docx,
                FileKind::Csv,
                FileKind::Xlsx,
                FileKind::Json,
                FileKind::Txt,
                FileKind::Ppt,
                FileKind::Pptx,
            ],
            max_bytes: 50 * MEBIBYTE,
        }
    }

    /// The strict legacy path: 10 MiB, PDF/DOC/DOCX only.
    pub fn strict() -> Self {
        Self {
            allowed_types: &[FileKind::Pdf, FileKind::Doc, FileKind::Docx],
            max_bytes: 10 * MEBIBYTE,
        }
    }

    /// Runs every local check, in order, before any network traffic:
    /// file presence, type allow-list, size ceiling (a file of exactly
    /// `max_bytes` passes), then the mandatory metadata fields.
    pub fn validate(
        &self,
        draft: &DocumentDraft,
        file: Option<&FilePayload>,
    ) -> Result<(), SubmissionError> {
        let file = file.ok_or(SubmissionError::MissingFile)?;

        match file.kind() {
            Some(kind) if self.allowed_types.contains(&kind) => {}
            _ => {
                return Err(SubmissionError::UnsupportedType {
                    file_name: file.file_name.clone(),
                })
            }
        }

        if file.size() > self.max_bytes {
            return Err(SubmissionError::Oversize {
                size: file.size(),
                max_bytes: self.max_bytes,
            });
        }

        if draft.title.trim().is_empty() {
            return Err(SubmissionError::MissingTitle);
        }
        if draft.category.trim().is_empty() {
            return Err(SubmissionError::MissingCategory);
        }

        Ok(())
    }
}

/// Local validation failures, reported inline before a request exists.
/// Distinct from network and server errors so the UI can show the precise
/// reason.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("A file is required")]
    MissingFile,
    #[error("File type is not allowed: {file_name}")]
    UnsupportedType { file_name: String },
    #[error("File is {size} bytes; the limit is {max_bytes} bytes")]
    Oversize { size: u64, max_bytes: u64 },
    #[error("Title is required")]
    MissingTitle,
    #[error("Category is required")]
    MissingCategory,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn draft() -> DocumentDraft {
        DocumentDraft {
            title: "Reservoir Simulation Study".to_string(),
            category: "Exploration".to_string(),
            description: None,
        }
    }

    fn file_of_size(name: &str, size: usize) -> FilePayload {
        FilePayload::new(name, Bytes::from(vec![0u8; size]))
    }

    #[test]
    fn a_missing_file_is_its_own_error() {
        let err = SubmissionConstraints::general()
            .validate(&draft(), None)
            .unwrap_err();
        assert_eq!(err, SubmissionError::MissingFile);
    }

    #[rstest]
    #[case::at_the_strict_bound(10 * MEBIBYTE, true)]
    #[case::one_byte_over_strict(10 * MEBIBYTE + 1, false)]
    fn strict_size_ceiling_is_byte_exact(#[case] size: u64, #[case] accepted: bool) {
        let result = SubmissionConstraints::strict()
            .validate(&draft(), Some(&file_of_size("study.pdf", size as usize)));
        assert_eq!(result.is_ok(), accepted);
        if !accepted {
            assert!(matches!(
                result.unwrap_err(),
                SubmissionError::Oversize { max_bytes, .. } if max_bytes == 10 * MEBIBYTE
            ));
        }
    }

    #[rstest]
    #[case::at_the_general_bound(50 * MEBIBYTE, true)]
    #[case::one_byte_over_general(50 * MEBIBYTE + 1, false)]
    fn general_size_ceiling_is_byte_exact(#[case] size: u64, #[case] accepted: bool) {
        let result = SubmissionConstraints::general()
            .validate(&draft(), Some(&file_of_size("study.pdf", size as usize)));
        assert_eq!(result.is_ok(), accepted);
    }

    #[test]
    fn the_strict_path_rejects_types_the_general_path_allows() {
        let file = file_of_size("figures.csv", 1024);
        assert!(SubmissionConstraints::general()
            .validate(&draft(), Some(&file))
            .is_ok());
        assert!(matches!(
            SubmissionConstraints::strict()
                .validate(&draft(), Some(&file))
                .unwrap_err(),
            SubmissionError::UnsupportedType { .. }
        ));
    }

    #[test]
    fn extensions_are_matched_case_insensitively() {
        let file = file_of_size("REPORT.PDF", 1024);
        assert!(SubmissionConstraints::strict()
            .validate(&draft(), Some(&file))
            .is_ok());
    }

    #[test]
    fn unknown_extensions_are_rejected() {
        let file = file_of_size("archive.zip", 1024);
        assert!(matches!(
            SubmissionConstraints::general()
                .validate(&draft(), Some(&file))
                .unwrap_err(),
            SubmissionError::UnsupportedType { .. }
        ));
    }

    #[rstest]
    #[case("", "Exploration", SubmissionError::MissingTitle)]
    #[case("   ", "Exploration", SubmissionError::MissingTitle)]
    #[case("A title", "", SubmissionError::MissingCategory)]
    fn mandatory_fields_must_be_non_blank(
        #[case] title: &str,
        #[case] category: &str,
        #[case] expected: SubmissionError,
    ) {
        let draft = DocumentDraft {
            title: title.to_string(),
            category: category.to_string(),
            description: None,
        };
        let file = file_of_size("study.pdf", 1024);
        assert_eq!(
            SubmissionConstraints::general()
                .validate(&draft, Some(&file))
                .unwrap_err(),
            expected
        );
    }
}
