use std::sync::Mutex;

use async_trait::async_trait;
use mongodb::bson::{self, oid::ObjectId, Bson, Document};
use serde::{de::DeserializeOwned, Serialize};

use crate::error;

use super::{Entity, Repository};

pub struct TestRepository<T> {
    _t: std::marker::PhantomData<T>,
    pub db: Mutex<Vec<Bson>>,
}

impl<T> TestRepository<T> {
    pub fn new() -> Self {
        Self {
            _t: std::marker::PhantomData,
            db: Mutex::new(Vec::new()),
        }
    }
}

impl<T> Default for TestRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T> Repository<T> for TestRepository<T>
where
    T: Entity + Clone + PartialEq + Send + Sync + Serialize + DeserializeOwned,
{
    async fn insert(&self, item: &T) -> error::Result<()> {
        let mut db = self.db.lock().unwrap();

        let contains = db
            .iter()
            .any(|x| x.as_document().unwrap().get_object_id("id").unwrap() == item.id());
        if !contains {
            db.push(bson::to_bson(&item).unwrap());
        }
        Ok(())
    }

    async fn find(&self, id: &ObjectId) -> error::Result<Option<T>> {
        let db = self.db.lock().unwrap();
        Ok(db
            .iter()
            .find(|x| x.as_document().unwrap().get_object_id("id").unwrap() == *id)
            .cloned()
            .map(|x| bson::from_bson(x).unwrap()))
    }

    async fn find_by(&self, field: &str, value: &Bson) -> error::Result<Option<T>> {
        let db = self.db.lock().unwrap();
        Ok(db
            .iter()
            .find(|x| x.as_document().unwrap().get(field) == Some(value))
            .cloned()
            .map(|x| bson::from_bson(x).unwrap()))
    }

    async fn find_all(&self) -> error::Result<Vec<T>> {
        let db = self.db.lock().unwrap();
        Ok(db
            .iter()
            .map(|x| bson::from_bson(x.clone()).unwrap())
            .collect())
    }

    async fn update(&self, id: &ObjectId, fields: Document) -> error::Result<Option<T>> {
        let mut db = self.db.lock().unwrap();

        let Some(pos) = db
            .iter()
            .position(|x| x.as_document().unwrap().get_object_id("id").unwrap() == *id)
        else {
            return Ok(None);
        };

        let mut document = db[pos].as_document().unwrap().clone();
        for (key, value) in fields {
            document.insert(key, value);
        }

        let updated = bson::from_document(document.clone()).unwrap();
        db[pos] = Bson::Document(document);

        Ok(Some(updated))
    }

    async fn delete(&self, id: &ObjectId) -> error::Result<Option<T>> {
        let mut db = self.db.lock().unwrap();

        let pos = db
            .iter()
            .position(|x| x.as_document().unwrap().get_object_id("id").unwrap() == *id);

        Ok(pos.map(|x| bson::from_bson(db.remove(x)).unwrap()))
    }
}
