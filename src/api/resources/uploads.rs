//! Presigned upload URLs (`/users/presigned-urls`).
//!
//! The backend answers with one `{file_name, key, url}` per requested file;
//! the caller then PUTs the bytes straight to `url` and stores `key`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::api::{
    envelope::ServiceResult,
    error::ApiFault,
    http::{ApiClient, RequestDescriptor},
    resources::{Validate, require_text},
};

const PRESIGNED_URLS_PATH: &str = "/users/presigned-urls";
const MAX_FILES_PER_REQUEST: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct UploadFile {
    #[schemars(description = "File name including extension, e.g. avatar.png")]
    pub file_name: String,
    #[schemars(description = "MIME type, e.g. image/png")]
    pub content_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PresignedUrlRequest {
    pub files: Vec<UploadFile>,
}

impl Validate for PresignedUrlRequest {
    fn validate(&self) -> Result<(), ApiFault> {
        if self.files.is_empty() {
            return Err(ApiFault::invalid("at least one file is required."));
        }
        if self.files.len() > MAX_FILES_PER_REQUEST {
            return Err(ApiFault::invalid(format!(
                "at most {MAX_FILES_PER_REQUEST} files can be requested at once."
            )));
        }
        for file in &self.files {
            require_text("file_name", &file.file_name)?;
            if file.file_name.contains(['/', '\\']) {
                return Err(ApiFault::invalid(format!(
                    "file_name {} cannot contain path separators.",
                    file.file_name
                )));
            }
            if !file.content_type.contains('/') {
                return Err(ApiFault::invalid(format!(
                    "content_type {} is not a MIME type.",
                    file.content_type
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresignedUpload {
    pub file_name: String,
    pub key: String,
    pub url: String,
}

/// # Errors
/// `InvalidParams` when the file list fails validation, `NoSession` when
/// signed out.
pub async fn create_presigned_urls(
    client: &ApiClient,
    request: &PresignedUrlRequest,
) -> Result<ServiceResult<Vec<PresignedUpload>>, ApiFault> {
    request.validate()?;
    client
        .call(RequestDescriptor::post(PRESIGNED_URLS_PATH).json(request)?)
        .await
}
