//! Multipart upload parsing shared by both analysis endpoints.

use std::collections::HashMap;

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;

use crate::errors::AppError;
use crate::llm_client::ImageInput;

pub const IMAGE_FIELD: &str = "image";
const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// The image file plus every text field of a multipart form.
#[derive(Debug, Default)]
pub struct UploadForm {
    image: Option<ImageInput>,
    fields: HashMap<String, String>,
}

impl UploadForm {
    /// Reads the whole form. The first `image` part wins; later ones are ignored.
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == IMAGE_FIELD {
                let mime_type = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| DEFAULT_IMAGE_MIME.to_string());
                let bytes = field.bytes().await.map_err(multipart_error)?;
                if form.image.is_none() {
                    form.image = Some(ImageInput { mime_type, bytes });
                }
            } else {
                let value = field.text().await.map_err(multipart_error)?;
                form.fields.entry(name).or_insert(value);
            }
        }

        Ok(form)
    }

    pub fn take_image(&mut self) -> Result<ImageInput, AppError> {
        match self.image.take() {
            Some(image) if !image.bytes.is_empty() => Ok(image),
            Some(_) => Err(AppError::Validation(format!(
                "'{IMAGE_FIELD}' must not be empty"
            ))),
            None => Err(AppError::Validation(format!(
                "'{IMAGE_FIELD}' file is required"
            ))),
        }
    }

    /// A text field, `None` when absent or blank.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    pub fn require_text(&self, name: &str) -> Result<&str, AppError> {
        self.text(name)
            .ok_or_else(|| AppError::Validation(format!("'{name}' is required")))
    }
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::Validation(format!("Invalid multipart body: {}", e.body_text()))
    }
}
