//! Documentation ingestion into the vector store.
//!
//! Walks a local directory, uploads every documentation file and attaches it
//! to the configured vector store. Not part of the request path.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::kernel::{AgentDeps, BaseDocumentStore};

/// Extensions uploaded when none are given.
pub const DEFAULT_EXTENSIONS: &[&str] = &["md", "mdx", "txt", "html", "pdf", "json"];

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("vector store id is not configured")]
    MissingVectorStore,

    #[error("documentation directory not found: {0}")]
    MissingDirectory(PathBuf),

    #[error("failed to read {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

#[derive(Debug, Clone)]
pub struct UploadOptions {
    /// Lower-case extensions without the dot
    pub extensions: Vec<String>,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl UploadOptions {
    pub fn with_extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().trim().trim_start_matches('.').to_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub path: PathBuf,
    pub file_id: String,
}

#[derive(Debug, Default)]
pub struct UploadReport {
    pub uploaded: Vec<UploadedFile>,
    /// Files that failed, with the reason
    pub failed: Vec<(PathBuf, String)>,
    /// Files ignored because of their extension
    pub skipped: usize,
}

/// Files under `dir` accepted by `options`, sorted, plus the skipped count.
pub fn discover_files(dir: &Path, options: &UploadOptions) -> Result<(Vec<PathBuf>, usize), UploadError> {
    if !dir.is_dir() {
        return Err(UploadError::MissingDirectory(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    let mut skipped = 0;

    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry.map_err(|source| UploadError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        if options.accepts(entry.path()) {
            files.push(entry.into_path());
        } else {
            skipped += 1;
        }
    }

    files.sort();
    Ok((files, skipped))
}

pub struct DocumentUploader {
    documents: Arc<dyn BaseDocumentStore>,
    vector_store_id: String,
}

impl DocumentUploader {
    pub fn new(deps: &AgentDeps) -> Self {
        Self {
            documents: deps.documents.clone(),
            vector_store_id: deps.config.vector_store_id.clone(),
        }
    }

    /// Upload every accepted file under `dir`.
    ///
    /// Per-file failures are recorded in the report; only a missing vector
    /// store or an unreadable directory aborts.
    pub async fn upload_dir(&self, dir: &Path, options: &UploadOptions) -> Result<UploadReport, UploadError> {
        if self.vector_store_id.trim().is_empty() {
            return Err(UploadError::MissingVectorStore);
        }

        let (files, skipped) = discover_files(dir, options)?;
        info!(
            dir = %dir.display(),
            files = files.len(),
            skipped,
            vector_store_id = %self.vector_store_id,
            "Uploading documentation"
        );

        let mut report = UploadReport {
            skipped,
            ..Default::default()
        };

        for path in files {
            match self.upload_one(&path).await {
                Ok(file_id) => {
                    info!(file = %path.display(), file_id = %file_id, "Uploaded");
                    report.uploaded.push(UploadedFile { path, file_id });
                }
                Err(e) => {
                    warn!(file = %path.display(), error = %format!("{:#}", e), "Upload failed");
                    report.failed.push((path, format!("{:#}", e)));
                }
            }
        }

        info!(
            uploaded = report.uploaded.len(),
            failed = report.failed.len(),
            "Documentation upload finished"
        );

        Ok(report)
    }

    async fn upload_one(&self, path: &Path) -> anyhow::Result<String> {
        let file = self.documents.upload(path).await?;
        self.documents.attach(&self.vector_store_id, &file.id).await?;
        Ok(file.id)
    }
}
