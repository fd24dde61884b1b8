//! Flat-file storage for uploads and `<name>_ocr.json` results.

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info};

use crate::error::StorageError;
use crate::models::config::StorageConfig;
use crate::models::report::OcrReport;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Upload and result directories plus the extension allow-list.
#[derive(Debug, Clone)]
pub struct ResultStore {
    upload_dir: PathBuf,
    results_dir: PathBuf,
    allowed_extensions: Vec<String>,
}

impl ResultStore {
    /// Create the store, creating both directories if needed.
    pub fn open(config: &StorageConfig) -> Result<Self> {
        fs::create_dir_all(&config.upload_dir)?;
        fs::create_dir_all(&config.results_dir)?;

        info!(
            "Storing uploads in {} and results in {}",
            config.upload_dir.display(),
            config.results_dir.display()
        );

        Ok(Self {
            upload_dir: config.upload_dir.clone(),
            results_dir: config.results_dir.clone(),
            allowed_extensions: config
                .allowed_extensions
                .iter()
                .map(|ext| ext.to_lowercase())
                .collect(),
        })
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    /// Whether the text after the last `.` is an allowed extension (any case).
    pub fn is_allowed(&self, filename: &str) -> bool {
        filename
            .rsplit_once('.')
            .map(|(_, ext)| self.allowed_extensions.contains(&ext.to_lowercase()))
            .unwrap_or(false)
    }

    /// `<name without last extension>_ocr.json` for an uploaded file name.
    pub fn result_file_name(filename: &str) -> String {
        let base = plain_name(filename).unwrap_or(filename);
        let stem = match base.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => base,
        };
        format!("{}_ocr.json", stem)
    }

    /// Store uploaded bytes under their original file name.
    ///
    /// Directory components are stripped from `filename`.
    pub fn save_upload(&self, filename: &str, data: &[u8]) -> Result<PathBuf> {
        let name = plain_name(filename).ok_or_else(|| StorageError::InvalidName(filename.to_string()))?;
        if !self.is_allowed(name) {
            return Err(StorageError::NotAllowed(name.to_string()));
        }

        let path = self.upload_dir.join(name);
        fs::write(&path, data)?;
        debug!("Saved upload {} ({} bytes)", path.display(), data.len());
        Ok(path)
    }

    /// Path of a stored upload.
    pub fn upload_path(&self, name: &str) -> Result<PathBuf> {
        let name = checked_name(name)?;
        let path = self.upload_dir.join(name);
        if path.is_file() {
            Ok(path)
        } else {
            Err(StorageError::NotFound(name.to_string()))
        }
    }

    /// Persist a report next to its upload; returns the result file name.
    pub fn save_result(&self, filename: &str, report: &OcrReport) -> Result<String> {
        let result_name = Self::result_file_name(filename);
        let path = self.results_dir.join(&result_name);

        let json = serde_json::to_string_pretty(report).map_err(|e| StorageError::Corrupt {
            name: result_name.clone(),
            reason: e.to_string(),
        })?;
        fs::write(&path, json)?;

        debug!("Saved result {}", path.display());
        Ok(result_name)
    }

    /// Load a previously saved report by result file name.
    pub fn load_result(&self, name: &str) -> Result<OcrReport> {
        let name = checked_name(name)?;
        let path = self.results_dir.join(name);

        let content = fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::NotFound(name.to_string()),
            _ => StorageError::Io(e),
        })?;

        serde_json::from_str(&content).map_err(|e| StorageError::Corrupt {
            name: name.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Final path component of `filename`, if it has one.
fn plain_name(filename: &str) -> Option<&str> {
    Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
}

/// Accept only names that are a single normal path component.
fn checked_name(name: &str) -> Result<&str> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(name),
        _ => Err(StorageError::NotFound(name.to_string())),
    }
}
