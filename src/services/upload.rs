//! Multipart form parsing for the upload routes.
//!
//! The upload forms carry a handful of small text fields and a single file
//! input. Fields are collected into memory with a per-file size cap; the
//! caller validates the result and hands the bytes to the file store.

use std::collections::HashMap;

use actix_multipart::Multipart;
use futures_util::StreamExt;

use crate::error::{AppError, AppResult};

/// Cap on any single text field. The forms only carry short values.
const MAX_TEXT_FIELD_SIZE: usize = 16 * 1024;

/// A file part collected from a multipart form.
#[derive(Debug)]
pub struct UploadedFile {
    /// Filename as sent by the browser, unsanitized.
    pub original_name: String,
    pub data: Vec<u8>,
}

/// Parsed multipart form: text fields plus an optional file part.
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

impl UploadForm {
    /// A text field's value, if present and non-blank after trimming.
    pub fn field(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// Read a multipart payload into an `UploadForm`.
///
/// File parts larger than `max_file_size` fail the whole request; a file
/// input submitted without a chosen file (empty filename) counts as absent.
pub async fn parse_upload_form(
    payload: &mut Multipart,
    max_file_size: usize,
) -> AppResult<UploadForm> {
    let mut form = UploadForm::default();

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::Validation(format!("Multipart error: {}", e)))?;

        let content_disposition = field
            .content_disposition()
            .ok_or_else(|| AppError::Validation("Missing content disposition".to_string()))?;

        let name = content_disposition
            .get_name()
            .unwrap_or_default()
            .to_string();
        let filename = content_disposition
            .get_filename()
            .map(str::to_string)
            .filter(|f| !f.is_empty());

        match filename {
            Some(original_name) => {
                let mut data = Vec::new();
                while let Some(chunk) = field.next().await {
                    let chunk = chunk
                        .map_err(|e| AppError::Validation(format!("Multipart error: {}", e)))?;
                    if data.len() + chunk.len() > max_file_size {
                        return Err(AppError::InvalidFile(format!(
                            "File exceeds the {} byte upload limit",
                            max_file_size
                        )));
                    }
                    data.extend_from_slice(&chunk);
                }

                form.file = Some(UploadedFile {
                    original_name,
                    data,
                });
            }
            None => {
                let mut data = Vec::new();
                while let Some(chunk) = field.next().await {
                    let chunk = chunk
                        .map_err(|e| AppError::Validation(format!("Multipart error: {}", e)))?;
                    if data.len() + chunk.len() > MAX_TEXT_FIELD_SIZE {
                        return Err(AppError::Validation(format!(
                            "Field '{}' is too large",
                            name
                        )));
                    }
                    data.extend_from_slice(&chunk);
                }

                form.fields
                    .insert(name, String::from_utf8_lossy(&data).into_owned());
            }
        }
    }

    Ok(form)
}
