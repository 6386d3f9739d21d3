use actix_multipart::Multipart;
use chrono::Utc;
use mongodb::bson::{self, oid::ObjectId};
use serde::{de::DeserializeOwned, Serialize};

use common::{
    context::GeneralContext,
    entities::letter::{IncomingLetter, OutgoingLetter},
    error::{self, AddCode},
    repository::Entity,
};

use super::{attachment::AttachmentObject, form::read_form};

/// The per-kind schema: which text fields a submission must carry. Everything
/// else about create/update/delete is identical across letter kinds and lives
/// in [`LetterService`].
pub trait LetterRecord:
    Entity + Clone + Serialize + DeserializeOwned + Unpin + Send + Sync + 'static
{
    const FIELDS: &'static [&'static str];

    fn file_public_id(&self) -> Option<&str>;
}

impl LetterRecord for IncomingLetter {
    const FIELDS: &'static [&'static str] = &[
        "nomor_surat",
        "tanggal_surat",
        "tanggal_terima",
        "asal_surat",
        "perihal",
    ];

    fn file_public_id(&self) -> Option<&str> {
        self.file_public_id.as_deref()
    }
}

impl LetterRecord for OutgoingLetter {
    const FIELDS: &'static [&'static str] =
        &["nomor_surat", "tanggal_surat", "tujuan_surat", "perihal"];

    fn file_public_id(&self) -> Option<&str> {
        self.file_public_id.as_deref()
    }
}

pub struct LetterService {
    context: GeneralContext,
}

impl LetterService {
    pub fn new(context: GeneralContext) -> Self {
        Self { context }
    }

    fn attachments(&self) -> error::Result<AttachmentObject> {
        self.context
            .get_manual::<AttachmentObject>()
            .ok_or(anyhow::anyhow!("No attachment store configured").code(500))
    }

    pub async fn list<T: LetterRecord>(&self) -> error::Result<Vec<T>> {
        self.context.auth()?;

        let letters = self.context.try_get_repository::<T>()?;
        letters.find_all().await
    }

    /// Upload first, write second: if the media host refuses the file no
    /// record is created and the client may retry the same submission.
    pub async fn create<T: LetterRecord>(&self, payload: Multipart) -> error::Result<T> {
        self.context.auth()?;

        let mut form = read_form(payload).await?;
        form.require(T::FIELDS)?;

        let Some(file) = form.file.take() else {
            return Err(anyhow::anyhow!("Field 'file' is required").code(400));
        };

        let uploaded = self
            .attachments()?
            .upload(&file.filename, file.bytes)
            .await?;

        let mut document = form.document(T::FIELDS);
        document.insert("id", ObjectId::new());
        document.insert("file_url", uploaded.url);
        document.insert("file_public_id", uploaded.public_id);
        document.insert("created_at", Utc::now().timestamp());

        let letter: T = bson::from_document(document)?;

        let letters = self.context.try_get_repository::<T>()?;
        letters.insert(&letter).await?;

        Ok(letter)
    }

    /// Merges the submitted fields into the stored document. The attachment
    /// is replaced only when a new file arrives; otherwise both attachment
    /// fields stay exactly as they were.
    pub async fn change<T: LetterRecord>(
        &self,
        id: ObjectId,
        payload: Multipart,
    ) -> error::Result<T> {
        self.context.auth()?;

        let form = read_form(payload).await?;
        form.require(T::FIELDS)?;

        let mut document = form.document(T::FIELDS);

        if let Some(file) = form.file {
            let uploaded = self
                .attachments()?
                .upload(&file.filename, file.bytes)
                .await?;
            document.insert("file_url", uploaded.url);
            document.insert("file_public_id", uploaded.public_id);
        }

        let letters = self.context.try_get_repository::<T>()?;

        let Some(letter) = letters.update(&id, document).await? else {
            return Err(anyhow::anyhow!("No letter found").code(404));
        };

        Ok(letter)
    }

    /// Attachment deletion is best-effort: a media host failure is logged
    /// and the record is removed regardless. Deleting an absent record is
    /// not an error.
    pub async fn delete<T: LetterRecord>(&self, id: ObjectId) -> error::Result<Option<T>> {
        self.context.auth()?;

        let letters = self.context.try_get_repository::<T>()?;

        let Some(letter) = letters.find(&id).await? else {
            return Ok(None);
        };

        if let Some(public_id) = letter.file_public_id() {
            if let Err(err) = self.attachments()?.delete(public_id).await {
                log::warn!("Failed to delete attachment {}: {}", public_id, err);
            }
        }

        letters.delete(&id).await
    }
}
