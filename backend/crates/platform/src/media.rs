//! Media Upload
//!
//! Uploaded files are first staged on local disk as temp paths, then pushed
//! to the remote media host. The local copy is removed exactly once whatever
//! the outcome of the upload.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::Deserialize;
use tempfile::TempPath;
use thiserror::Error;

use crate::crypto::sha1_hex;

/// Longest file extension carried over to the staged file name
const MAX_EXTENSION_LENGTH: usize = 10;

/// Upper bound on one upload request, body transfer included
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Upload request failed: {0}")]
    Request(String),

    #[error("Media host rejected upload ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected media host response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for MediaError {
    fn from(err: reqwest::Error) -> Self {
        MediaError::Request(err.to_string())
    }
}

/// Descriptor of a file stored on the media host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedMedia {
    pub url: String,
    pub public_id: Option<String>,
}

// ============================================================================
// Staged Files
// ============================================================================

/// A file written to the staging directory
///
/// Dropping it removes the file from disk.
pub struct StagedFile {
    path: TempPath,
    original_name: Option<String>,
    size: usize,
}

impl StagedFile {
    /// Write `data` to a fresh temp file inside `dir`
    pub async fn stage(
        dir: &Path,
        original_name: Option<String>,
        data: &[u8],
    ) -> Result<Self, MediaError> {
        tokio::fs::create_dir_all(dir).await?;

        let suffix = original_name
            .as_deref()
            .and_then(extension_suffix)
            .unwrap_or_default();

        let path = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(&suffix)
            .tempfile_in(dir)?
            .into_temp_path();

        tokio::fs::write(&path, data).await?;

        Ok(Self {
            path,
            original_name,
            size: data.len(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn original_name(&self) -> Option<&str> {
        self.original_name.as_deref()
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Remove the staged file now, reporting failures
    pub fn discard(self) -> Result<(), MediaError> {
        self.path.close()?;
        Ok(())
    }
}

impl fmt::Debug for StagedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StagedFile")
            .field("path", &self.path.to_path_buf())
            .field("original_name", &self.original_name)
            .field("size", &self.size)
            .finish()
    }
}

/// `.ext` from a client file name, when it is short and alphanumeric
fn extension_suffix(name: &str) -> Option<String> {
    let ext = Path::new(name).extension()?.to_str()?;
    let valid = !ext.is_empty()
        && ext.len() <= MAX_EXTENSION_LENGTH
        && ext.chars().all(|c| c.is_ascii_alphanumeric());

    valid.then(|| format!(".{}", ext.to_ascii_lowercase()))
}

/// Files received under one multipart field name
#[derive(Debug, Default)]
pub enum UploadField {
    #[default]
    None,
    Single(StagedFile),
    Multiple(Vec<StagedFile>),
}

impl UploadField {
    /// Add another file received under the same field name
    pub fn push(self, file: StagedFile) -> Self {
        match self {
            UploadField::None => UploadField::Single(file),
            UploadField::Single(first) => UploadField::Multiple(vec![first, file]),
            UploadField::Multiple(mut files) => {
                files.push(file);
                UploadField::Multiple(files)
            }
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, UploadField::None)
    }

    /// Staged paths currently held, for diagnostics
    pub fn paths(&self) -> Vec<PathBuf> {
        match self {
            UploadField::None => Vec::new(),
            UploadField::Single(file) => vec![file.path().to_path_buf()],
            UploadField::Multiple(files) => files.iter().map(|f| f.path().to_path_buf()).collect(),
        }
    }
}

// ============================================================================
// Uploader
// ============================================================================

/// Remote media host
#[trait_variant::make(MediaUploader: Send)]
pub trait LocalMediaUploader {
    /// Push the file at `path` to the host
    async fn upload_file(&self, path: &Path) -> Result<UploadedMedia, MediaError>;
}

/// Upload a staged file and remove the local copy
///
/// Returns `None` when there is no file or the upload failed. The staged
/// file is removed in every case.
pub async fn upload_staged<U>(uploader: &U, file: Option<StagedFile>) -> Option<UploadedMedia>
where
    U: MediaUploader + Sync,
{
    let file = file?;
    let result = uploader.upload_file(file.path()).await;

    let path = file.path().to_path_buf();
    if let Err(e) = file.discard() {
        tracing::warn!(path = %path.display(), error = %e, "Failed to remove staged upload");
    }

    match result {
        Ok(media) => {
            tracing::debug!(url = %media.url, "Media uploaded");
            Some(media)
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Media upload failed");
            None
        }
    }
}

// ============================================================================
// Cloudinary
// ============================================================================

#[derive(Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub base_url: String,
}

impl CloudinaryConfig {
    pub fn new(
        cloud_name: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            cloud_name: cloud_name.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            base_url: "https://api.cloudinary.com".to_string(),
        }
    }

    fn upload_url(&self) -> String {
        format!(
            "{}/v1_1/{}/auto/upload",
            self.base_url.trim_end_matches('/'),
            self.cloud_name
        )
    }

    /// Signature over the signed parameters (only `timestamp` here)
    fn sign(&self, timestamp: u64) -> String {
        sha1_hex(format!("timestamp={}{}", timestamp, self.api_secret).as_bytes())
    }
}

impl fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct CloudinaryUploadResponse {
    url: Option<String>,
    secure_url: Option<String>,
    public_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CloudinaryErrorResponse {
    error: CloudinaryErrorBody,
}

#[derive(Debug, Deserialize)]
struct CloudinaryErrorBody {
    message: String,
}

/// Signed uploads to Cloudinary with automatic resource type detection
#[derive(Debug, Clone)]
pub struct CloudinaryUploader {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryUploader {
    /// Fails only if the TLS backend cannot be initialised
    pub fn new(config: CloudinaryConfig) -> Result<Self, MediaError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(UPLOAD_TIMEOUT)
            .build()?;

        Ok(Self { client, config })
    }
}

impl MediaUploader for CloudinaryUploader {
    async fn upload_file(&self, path: &Path) -> Result<UploadedMedia, MediaError> {
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(data).file_name(file_name),
            )
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp.to_string())
            .text("signature", self.config.sign(timestamp));

        let response = self
            .client
            .post(self.config.upload_url())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<CloudinaryErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(MediaError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body: CloudinaryUploadResponse = response
            .json()
            .await
            .map_err(|e| MediaError::InvalidResponse(e.to_string()))?;

        let url = body
            .url
            .or(body.secure_url)
            .ok_or_else(|| MediaError::InvalidResponse("missing url".to_string()))?;

        Ok(UploadedMedia {
            url,
            public_id: body.public_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AcceptAll;

    impl MediaUploader for AcceptAll {
        async fn upload_file(&self, path: &Path) -> Result<UploadedMedia, MediaError> {
            assert!(path.exists(), "file must still exist during upload");
            Ok(UploadedMedia {
                url: "http://media.test/file.png".to_string(),
                public_id: Some("file".to_string()),
            })
        }
    }

    struct RejectAll;

    impl MediaUploader for RejectAll {
        async fn upload_file(&self, _path: &Path) -> Result<UploadedMedia, MediaError> {
            Err(MediaError::Rejected {
                status: 500,
                message: "boom".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_stage_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let staged = StagedFile::stage(dir.path(), Some("photo.PNG".to_string()), b"bytes")
            .await
            .unwrap();

        assert_eq!(std::fs::read(staged.path()).unwrap(), b"bytes");
        assert_eq!(staged.size(), 5);
        assert_eq!(staged.original_name(), Some("photo.PNG"));
        assert!(staged.path().to_string_lossy().ends_with(".png"));
    }

    #[tokio::test]
    async fn test_stage_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("public").join("temp");
        let staged = StagedFile::stage(&nested, None, b"x").await.unwrap();
        assert!(staged.path().starts_with(&nested));
    }

    #[tokio::test]
    async fn test_drop_removes_staged_file() {
        let dir = tempfile::tempdir().unwrap();
        let staged = StagedFile::stage(dir.path(), None, b"x").await.unwrap();
        let path = staged.path().to_path_buf();
        drop(staged);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_upload_success_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let staged = StagedFile::stage(dir.path(), None, b"x").await.unwrap();
        let path = staged.path().to_path_buf();

        let media = upload_staged(&AcceptAll, Some(staged)).await;
        assert_eq!(media.unwrap().url, "http://media.test/file.png");
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_upload_failure_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let staged = StagedFile::stage(dir.path(), None, b"x").await.unwrap();
        let path = staged.path().to_path_buf();

        assert!(upload_staged(&RejectAll, Some(staged)).await.is_none());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_upload_without_file() {
        assert!(upload_staged(&AcceptAll, None).await.is_none());
    }

    #[tokio::test]
    async fn test_upload_field_push() {
        let dir = tempfile::tempdir().unwrap();
        let a = StagedFile::stage(dir.path(), None, b"a").await.unwrap();
        let b = StagedFile::stage(dir.path(), None, b"b").await.unwrap();

        let field = UploadField::None.push(a);
        assert!(matches!(field, UploadField::Single(_)));

        let field = field.push(b);
        assert_eq!(field.paths().len(), 2);
        assert!(matches!(field, UploadField::Multiple(_)));
    }

    #[test]
    fn test_extension_suffix() {
        assert_eq!(extension_suffix("a.JPG"), Some(".jpg".to_string()));
        assert_eq!(extension_suffix("noext"), None);
        assert_eq!(extension_suffix("../evil.p/h"), None);
        assert_eq!(extension_suffix("a.verylongextension"), None);
    }

    #[test]
    fn test_cloudinary_signature_and_url() {
        let mut config = CloudinaryConfig::new("demo", "key", "secret");
        assert_eq!(
            config.upload_url(),
            "https://api.cloudinary.com/v1_1/demo/auto/upload"
        );
        assert_eq!(config.sign(1315060510), sha1_hex(b"timestamp=1315060510secret"));

        config.base_url = "http://localhost:9000/".to_string();
        assert_eq!(config.upload_url(), "http://localhost:9000/v1_1/demo/auto/upload");
    }

    #[test]
    fn test_cloudinary_uploader_builds_client() {
        let config = CloudinaryConfig::new("demo", "key", "secret");
        assert!(CloudinaryUploader::new(config).is_ok());
    }

    #[test]
    fn test_cloudinary_debug_hides_secret() {
        let config = CloudinaryConfig::new("demo", "key", "top-secret");
        assert!(!format!("{:?}", config).contains("top-secret"));
    }
}
