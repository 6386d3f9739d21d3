use std::sync::Arc;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use common::error::{self, AddCode};

/// What a successful upload hands back: a public URL for previews and the
/// token the media host accepts for later deletion. The two always travel
/// together onto the owning record.
#[derive(Debug, Clone, PartialEq)]
pub struct Uploaded {
    pub url: String,
    pub public_id: String,
}

/// Remote media host. `upload` failures must abort the owning submission;
/// `delete` is best-effort and never blocks record deletion.
#[async_trait]
pub trait AttachmentStore {
    async fn upload(&self, filename: &str, bytes: Vec<u8>) -> error::Result<Uploaded>;
    async fn delete(&self, public_id: &str) -> error::Result<()>;
}

pub type AttachmentObject = Arc<dyn AttachmentStore + Send + Sync>;

pub struct CloudinaryClient {
    client: reqwest::Client,
    cloud_name: String,
    upload_preset: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

impl CloudinaryClient {
    pub fn new(client: reqwest::Client, cloud_name: String, upload_preset: String) -> Self {
        Self {
            client,
            cloud_name,
            upload_preset,
        }
    }

    pub fn from_env(client: reqwest::Client) -> anyhow::Result<Self> {
        Ok(Self::new(
            client,
            std::env::var("CLOUDINARY_CLOUD_NAME")?,
            std::env::var("CLOUDINARY_UPLOAD_PRESET")?,
        ))
    }
}

#[async_trait]
impl AttachmentStore for CloudinaryClient {
    async fn upload(&self, filename: &str, bytes: Vec<u8>) -> error::Result<Uploaded> {
        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(filename.to_string()))
            .part("upload_preset", Part::text(self.upload_preset.clone()));

        let response = self
            .client
            .post(format!(
                "https://api.cloudinary.com/v1_1/{}/upload",
                self.cloud_name
            ))
            .multipart(form)
            .send()
            .await
            .map_err(|err| anyhow::anyhow!("Attachment upload failed: {}", err).code(502))?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Attachment upload rejected with status {}",
                response.status()
            )
            .code(502));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|err| anyhow::anyhow!("Malformed upload response: {}", err).code(502))?;

        Ok(Uploaded {
            url: body.secure_url,
            public_id: body.public_id,
        })
    }

    async fn delete(&self, public_id: &str) -> error::Result<()> {
        let response = self
            .client
            .post(format!(
                "https://api.cloudinary.com/v1_1/{}/delete_by_token",
                self.cloud_name
            ))
            .json(&serde_json::json!({ "public_id": public_id }))
            .send()
            .await
            .map_err(|err| anyhow::anyhow!("Attachment deletion failed: {}", err).code(502))?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Attachment deletion rejected with status {}",
                response.status()
            )
            .code(502));
        }

        Ok(())
    }
}

/// In-memory stand-in for the media host. Records every call so tests can
/// assert the upload/delete sequencing; the `fail_*` flags simulate a host
/// that refuses the request.
pub struct TestAttachmentStore {
    pub uploads: std::sync::Mutex<Vec<Uploaded>>,
    pub deleted: std::sync::Mutex<Vec<String>>,
    pub fail_upload: std::sync::atomic::AtomicBool,
    pub fail_delete: std::sync::atomic::AtomicBool,
    counter: std::sync::atomic::AtomicUsize,
}

impl TestAttachmentStore {
    pub fn new() -> Self {
        Self {
            uploads: std::sync::Mutex::new(Vec::new()),
            deleted: std::sync::Mutex::new(Vec::new()),
            fail_upload: std::sync::atomic::AtomicBool::new(false),
            fail_delete: std::sync::atomic::AtomicBool::new(false),
            counter: std::sync::atomic::AtomicUsize::new(0),
        }
    }
}

impl Default for TestAttachmentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AttachmentStore for TestAttachmentStore {
    async fn upload(&self, filename: &str, _bytes: Vec<u8>) -> error::Result<Uploaded> {
        if self.fail_upload.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(anyhow::anyhow!("Media host rejected the upload").code(502));
        }
        let n = self
            .counter
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let uploaded = Uploaded {
            url: format!("https://media.test/{}/{}", n, filename),
            public_id: format!("token-{}", n),
        };
        self.uploads.lock().unwrap().push(uploaded.clone());
        Ok(uploaded)
    }

    async fn delete(&self, public_id: &str) -> error::Result<()> {
        if self.fail_delete.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(anyhow::anyhow!("Media host rejected the deletion token").code(502));
        }
        self.deleted.lock().unwrap().push(public_id.to_string());
        Ok(())
    }
}
