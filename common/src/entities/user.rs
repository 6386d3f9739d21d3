use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::repository::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Staff,
    Manager,
}

impl Default for Role {
    fn default() -> Self {
        Role::Staff
    }
}

/// Stored as-is, password included: the store holds plaintext credentials
/// and the account table renders them back to managers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: ObjectId,
    pub username: String,
    pub password: String,
    pub role: Role,
}

impl Entity for User {
    fn id(&self) -> ObjectId {
        self.id
    }
}
