use async_trait::async_trait;
use futures::StreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, Document},
    options::{FindOneAndUpdateOptions, ReturnDocument},
};
use serde::{de::DeserializeOwned, Serialize};

use crate::error;

use super::{Entity, Repository};

pub struct MongoRepository<T> {
    pub collection: mongodb::Collection<T>,
}

impl<T> MongoRepository<T> {
    pub async fn new(mongo_uri: &str, database: &str, collection: &str) -> mongodb::error::Result<Self> {
        let collection = mongodb::Client::with_uri_str(mongo_uri)
            .await?
            .database(database)
            .collection(collection);
        Ok(Self { collection })
    }
}

#[async_trait]
impl<T> Repository<T> for MongoRepository<T>
where
    T: Entity + Serialize + DeserializeOwned + Unpin + Clone + Send + Sync,
{
    async fn insert(&self, item: &T) -> error::Result<()> {
        self.collection.insert_one(item, None).await?;
        Ok(())
    }

    async fn find(&self, id: &ObjectId) -> error::Result<Option<T>> {
        let result = self.collection.find_one(doc! {"id": *id}, None).await?;
        Ok(result)
    }

    async fn find_by(&self, field: &str, value: &Bson) -> error::Result<Option<T>> {
        let result = self
            .collection
            .find_one(doc! {field: value.clone()}, None)
            .await?;
        Ok(result)
    }

    async fn find_all(&self) -> error::Result<Vec<T>> {
        let results: Vec<mongodb::error::Result<T>> = self
            .collection
            .find(None, None)
            .await?
            .collect()
            .await;

        Ok(results.into_iter().collect::<mongodb::error::Result<_>>()?)
    }

    async fn update(&self, id: &ObjectId, fields: Document) -> error::Result<Option<T>> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let result = self
            .collection
            .find_one_and_update(doc! {"id": *id}, doc! {"$set": fields}, options)
            .await?;

        Ok(result)
    }

    async fn delete(&self, id: &ObjectId) -> error::Result<Option<T>> {
        let result = self
            .collection
            .find_one_and_delete(doc! {"id": *id}, None)
            .await?;
        Ok(result)
    }
}
