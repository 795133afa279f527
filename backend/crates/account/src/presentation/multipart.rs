//! Multipart Form Staging
//!
//! Reads a multipart body, keeping text fields in memory and staging file
//! fields to the upload directory. Staged files are removed when dropped, so
//! a request that fails half-way leaves nothing behind.

use std::collections::HashMap;
use std::path::Path;

use axum::extract::multipart::MultipartError;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::StatusCode;
use platform::media::{StagedFile, UploadField};

use crate::error::{AccountError, AccountResult};

/// Multipart body whose rejections render as the error envelope
pub struct AccountMultipart(pub Multipart);

impl<S> FromRequest<S> for AccountMultipart
where
    S: Send + Sync,
{
    type Rejection = AccountError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Multipart::from_request(req, state)
            .await
            .map(Self)
            .map_err(AccountError::from)
    }
}

/// Parsed multipart body
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadField>,
}

impl UploadForm {
    /// Read the whole body. Only fields named in `file_fields` are staged to
    /// disk; files under any other name are discarded.
    pub async fn read(
        multipart: &mut Multipart,
        temp_dir: &Path,
        file_fields: &[&str],
    ) -> AccountResult<Self> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(file_name) if file_fields.contains(&name.as_str()) => {
                    let data = field.bytes().await.map_err(multipart_error)?;

                    // Browsers send an empty part when no file was chosen
                    if data.is_empty() && file_name.is_empty() {
                        continue;
                    }

                    let staged = StagedFile::stage(temp_dir, Some(file_name), &data).await?;
                    tracing::debug!(
                        field = %name,
                        size = staged.size(),
                        "Staged uploaded file"
                    );

                    let entry = form.files.remove(&name).unwrap_or_default();
                    form.files.insert(name, entry.push(staged));
                }
                Some(_) => {
                    tracing::debug!(field = %name, "Ignoring unexpected file field");
                }
                None => {
                    let value = field.text().await.map_err(multipart_error)?;
                    form.fields.insert(name, value);
                }
            }
        }

        Ok(form)
    }

    /// Take a text field
    pub fn text(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }

    /// Take the single file sent under `name`
    ///
    /// More than one file under the same name is rejected and every copy is
    /// removed from disk.
    pub fn take_file(&mut self, name: &str) -> AccountResult<Option<StagedFile>> {
        match self.files.remove(name).unwrap_or_default() {
            UploadField::None => Ok(None),
            UploadField::Single(file) => Ok(Some(file)),
            UploadField::Multiple(files) => {
                tracing::debug!(field = %name, count = files.len(), "Rejecting duplicate file field");
                drop(files);
                Err(AccountError::InvalidUpload(format!(
                    "Only one {} file is allowed",
                    name
                )))
            }
        }
    }
}

fn multipart_error(err: MultipartError) -> AccountError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AccountError::UploadTooLarge
    } else {
        AccountError::InvalidUpload(err.body_text())
    }
}
