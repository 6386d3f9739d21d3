pub mod mongo_repository;
pub mod test_repository;

use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};

use crate::error;

pub trait Entity {
    fn id(&self) -> ObjectId;
}

/// One store collection per record kind. `update` merges the given fields
/// only; `delete` is idempotent from the caller's perspective.
#[async_trait]
pub trait Repository<T> {
    async fn insert(&self, item: &T) -> error::Result<()>;
    async fn find(&self, id: &ObjectId) -> error::Result<Option<T>>;
    async fn find_by(&self, field: &str, value: &Bson) -> error::Result<Option<T>>;
    async fn find_all(&self) -> error::Result<Vec<T>>;
    async fn update(&self, id: &ObjectId, fields: Document) -> error::Result<Option<T>>;
    async fn delete(&self, id: &ObjectId) -> error::Result<Option<T>>;
}

pub type RepositoryObject<T> = Arc<dyn Repository<T> + Send + Sync>;
