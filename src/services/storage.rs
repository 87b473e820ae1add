//! Filesystem storage for uploaded documents.
//!
//! Each category (diaries, certificates) owns a subdirectory under the
//! upload root. Stored names are derived from the roll, the upload time,
//! and a sanitized form of the original filename, so a stored name is
//! always a single safe path component.

use std::collections::HashSet;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::{AppError, AppResult};

/// Upload category, one per record table with a file reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Diaries,
    Certificates,
}

impl Category {
    /// Directory name under the upload root (also the URL path segment).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Diaries => "diaries",
            Self::Certificates => "certificates",
        }
    }

    /// Parse a URL path segment into a category.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "diaries" => Some(Self::Diaries),
            "certificates" => Some(Self::Certificates),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filesystem store for uploaded files.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    allowed_extensions: HashSet<String>,
}

impl FileStore {
    /// Create a store over the given upload root.
    pub fn new(root: PathBuf, allowed_extensions: HashSet<String>) -> Self {
        FileStore {
            root,
            allowed_extensions,
        }
    }

    /// Idempotently create both category directories. Safe to call on every
    /// startup.
    pub async fn ensure_dirs(&self) -> AppResult<()> {
        for category in [Category::Diaries, Category::Certificates] {
            tokio::fs::create_dir_all(self.category_dir(category))
                .await
                .map_err(|e| {
                    AppError::FileSystem(format!(
                        "Failed to create {} directory: {}",
                        category, e
                    ))
                })?;
        }
        Ok(())
    }

    /// Directory holding files for a category.
    pub fn category_dir(&self, category: Category) -> PathBuf {
        self.root.join(category.as_str())
    }

    /// Lowercase extension of a filename, if it has one.
    pub fn extension_of(filename: &str) -> Option<String> {
        let (stem, ext) = filename.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_lowercase())
    }

    /// Check the original filename against the allowed-extension set.
    pub fn check_extension(&self, filename: &str) -> AppResult<()> {
        match Self::extension_of(filename) {
            Some(ext) if self.allowed_extensions.contains(&ext) => Ok(()),
            Some(ext) => Err(AppError::InvalidFile(format!(
                "Extension '{}' is not allowed",
                ext
            ))),
            None => Err(AppError::InvalidFile(
                "Filename has no extension".to_string(),
            )),
        }
    }

    /// Reduce a filename to a single safe path component.
    ///
    /// Keeps only `[A-Za-z0-9._-]` from the last path segment, maps spaces
    /// to underscores, and strips leading dots, so the result can never
    /// name a parent directory or escape the category directory.
    pub fn sanitize_filename(name: &str) -> String {
        let base = name.rsplit(['/', '\\']).next().unwrap_or(name);

        let mut out = String::with_capacity(base.len());
        for c in base.chars() {
            match c {
                'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '_' | '-' => out.push(c),
                ' ' => out.push('_'),
                _ => {}
            }
        }

        out.trim_start_matches('.').to_string()
    }

    /// Derive the stored name for an upload: `<roll>_<unixtime>_<original>`,
    /// sanitized. Two uploads with the same roll, original name, and
    /// same-second timestamp produce the same name and silently overwrite.
    pub fn stored_name(roll: &str, original: &str, now: DateTime<Utc>) -> String {
        Self::sanitize_filename(&format!("{}_{}_{}", roll, now.timestamp(), original))
    }

    /// Persist uploaded bytes under a category, returning the stored name.
    ///
    /// Validates the original filename's extension first; the caller inserts
    /// the referencing record only after this returns.
    pub async fn save(
        &self,
        category: Category,
        roll: &str,
        original: &str,
        data: &[u8],
    ) -> AppResult<String> {
        self.check_extension(original)?;

        let stored = Self::stored_name(roll, original, Utc::now());
        let path = self.category_dir(category).join(&stored);

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::FileSystem(format!("Failed to write {}: {}", stored, e)))?;

        info!(
            "Stored {} upload: {} ({} bytes)",
            category,
            stored,
            data.len()
        );

        Ok(stored)
    }

    /// Resolve a stored name to its path for serving.
    ///
    /// Refuses any name that is empty, contains a path separator, or
    /// contains `..`, so a crafted filename cannot escape the category
    /// directory. Missing files are a not-found condition, never an error.
    pub fn resolve(&self, category: Category, name: &str) -> AppResult<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
            return Err(AppError::NotFound("File".to_string()));
        }

        let path = self.category_dir(category).join(name);
        if !path.is_file() {
            return Err(AppError::NotFound("File".to_string()));
        }

        Ok(path)
    }
}
