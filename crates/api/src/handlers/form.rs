//! Buffered multipart forms for the upload endpoints.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::Multipart;

use crate::error::AppError;

/// An uploaded file part.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Bytes,
}

/// All parts of a multipart request: text fields by name and file parts
/// (parts that carry a file name) by name. Empty file inputs are dropped.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl MultipartForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = MultipartForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let file_name = field.file_name().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;

            match file_name {
                Some(file_name) if !file_name.is_empty() && !data.is_empty() => {
                    form.files.insert(
                        name,
                        UploadedFile {
                            file_name,
                            bytes: data,
                        },
                    );
                }
                Some(_) => {}
                None => {
                    let text = String::from_utf8(data.to_vec())
                        .map_err(|_| AppError::BadRequest(format!("Field '{name}' is not UTF-8")))?;
                    form.fields.insert(name, text);
                }
            }
        }

        Ok(form)
    }

    /// Trimmed, non-blank text field.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Checkbox-style flag: `true`, `on`, `1` and `yes` are set.
    pub fn flag(&self, name: &str) -> bool {
        self.text(name).is_some_and(|v| {
            matches!(v.to_ascii_lowercase().as_str(), "true" | "on" | "1" | "yes")
        })
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }
}
