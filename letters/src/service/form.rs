use std::collections::HashMap;

use actix_multipart::Multipart;
use futures::StreamExt;
use mongodb::bson::Document;

use common::error::{self, AddCode};

pub struct UploadFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// A decoded `multipart/form-data` submission: text fields plus at most one
/// binary attachment under the `file` part. An empty file part counts as no
/// attachment.
pub struct LetterForm {
    pub fields: HashMap<String, String>,
    pub file: Option<UploadFile>,
}

pub async fn read_form(mut payload: Multipart) -> error::Result<LetterForm> {
    let mut fields = HashMap::new();
    let mut file = None;

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|err| anyhow::anyhow!("Malformed form payload: {}", err).code(400))?;

        let name = field.name().to_string();

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk =
                chunk.map_err(|err| anyhow::anyhow!("Malformed form payload: {}", err).code(400))?;
            data.extend_from_slice(&chunk);
        }

        if name == "file" {
            if !data.is_empty() {
                let filename = field
                    .content_disposition()
                    .get_filename()
                    .unwrap_or("attachment")
                    .to_string();
                file = Some(UploadFile {
                    filename,
                    bytes: data,
                });
            }
        } else {
            let value = String::from_utf8(data)
                .map_err(|_| anyhow::anyhow!("Field '{}' is not valid UTF-8", name).code(400))?;
            fields.insert(name, value);
        }
    }

    Ok(LetterForm { fields, file })
}

impl LetterForm {
    /// Required-field validation: every named field must be present and
    /// non-blank, or the whole submission is rejected before any side effect.
    pub fn require(&self, names: &[&str]) -> error::Result<()> {
        for name in names {
            match self.fields.get(*name) {
                Some(value) if !value.trim().is_empty() => {}
                _ => return Err(anyhow::anyhow!("Field '{}' is required", name).code(400)),
            }
        }
        Ok(())
    }

    pub fn document(&self, names: &[&str]) -> Document {
        let mut document = Document::new();
        for name in names {
            if let Some(value) = self.fields.get(*name) {
                document.insert(*name, value.clone());
            }
        }
        document
    }
}
