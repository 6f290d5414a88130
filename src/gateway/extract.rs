//! Request body helpers shared by the handlers.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::Multipart;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::http::StatusCode;
use serde::de::DeserializeOwned;

use super::error::GatewayError;

pub const NO_DATA_MESSAGE: &str = "No data provided";
pub const NO_FILE_MESSAGE: &str = "No file uploaded";

/// Parses a JSON object body. An empty body, `null`, or `{}` yields `None`.
pub fn json_body<T: DeserializeOwned>(body: &Bytes) -> Result<Option<T>, GatewayError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| GatewayError::InvalidRequest(format!("Invalid JSON body: {}", e)))?;

    let is_empty = match &value {
        serde_json::Value::Null => true,
        serde_json::Value::Object(map) => map.is_empty(),
        _ => false,
    };
    if is_empty {
        return Ok(None);
    }

    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| GatewayError::InvalidRequest(format!("Invalid request body: {}", e)))
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Text fields plus at most one file from a multipart form.
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

impl UploadForm {
    /// Reads every part. The part named `file_field` becomes the upload; a part with
    /// neither a file name nor content (an empty file input) is ignored.
    pub async fn read(
        multipart: Result<Multipart, MultipartRejection>,
        file_field: &str,
    ) -> Result<Self, GatewayError> {
        let mut multipart = multipart.map_err(|e| {
            GatewayError::InvalidRequest(format!("Expected multipart form data: {}", e))
        })?;

        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == file_field {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                form.file = Some(UploadedFile { file_name, bytes });
            } else {
                let value = field.text().await.map_err(multipart_error)?;
                form.fields.insert(name, value);
            }
        }
        Ok(form)
    }

    /// A text field, trimmed; blank values count as absent.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn require_file(self) -> Result<UploadedFile, GatewayError> {
        self.file
            .ok_or_else(|| GatewayError::InvalidRequest(NO_FILE_MESSAGE.to_string()))
    }
}

fn multipart_error(err: MultipartError) -> GatewayError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return GatewayError::PayloadTooLarge(err.body_text());
    }
    GatewayError::InvalidRequest(format!("Invalid multipart body: {}", err.body_text()))
}
