use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::repository::Entity;

/// A received letter. Field names follow the stored wire format.
///
/// `file_url` and `file_public_id` are set together after a successful
/// upload and are never cleared short of deleting the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomingLetter {
    pub id: ObjectId,
    pub nomor_surat: String,
    pub tanggal_surat: String,
    pub tanggal_terima: String,
    pub asal_surat: String,
    pub perihal: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_public_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
}

impl Entity for IncomingLetter {
    fn id(&self) -> ObjectId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutgoingLetter {
    pub id: ObjectId,
    pub nomor_surat: String,
    pub tanggal_surat: String,
    pub tujuan_surat: String,
    pub perihal: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_public_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
}

impl Entity for OutgoingLetter {
    fn id(&self) -> ObjectId {
        self.id
    }
}
