use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;

use super::common::segment;
use super::error::ApiError;
use super::Client;

/// A REST collection: `path` lists and creates, `path/{key}` reads, patches
/// and deletes a single item.
pub struct Collection<'a, T> {
    client: &'a Client,
    path: String,
    _marker: PhantomData<fn() -> T>,
}

impl<'a, T> Collection<'a, T> {
    pub fn new(client: &'a Client, path: String) -> Self {
        Self {
            client,
            path,
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn item_path(&self, key: &str) -> String {
        format!("{}/{}", self.path, segment(key))
    }

    /// A collection nested below one item, e.g. `datatank/{dt}/table`
    pub fn child<U>(&self, key: &str, name: &str) -> Collection<'a, U> {
        Collection::new(self.client, format!("{}/{}", self.item_path(key), name))
    }
}

impl<'a, T: DeserializeOwned> Collection<'a, T> {
    /// GET {path}, following pagination
    pub async fn list(&self) -> Result<Vec<T>, ApiError> {
        self.client.list_all(&self.path).await
    }

    /// GET {path}/{key}
    pub async fn get(&self, key: &str) -> Result<T, ApiError> {
        self.client.get(&self.item_path(key)).await
    }

    /// POST {path}
    pub async fn create<B: Serialize + ?Sized>(&self, body: &B) -> Result<T, ApiError> {
        self.client.post(&self.path, body).await
    }

    /// PATCH {path}/{key}
    pub async fn update<B: Serialize + ?Sized>(
        &self,
        key: &str,
        body: &B,
        version: Option<i64>,
    ) -> Result<T, ApiError> {
        self.client.patch(&self.item_path(key), body, version).await
    }

    /// POST {path}/{action}, for collections that create through a sub-route
    pub async fn create_at<B: Serialize + ?Sized>(
        &self,
        action: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.client
            .post(&format!("{}/{}", self.path, action), body)
            .await
    }

    /// POST {path}/{key}/{action}
    pub async fn command<U: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        key: &str,
        action: &str,
        body: &B,
    ) -> Result<U, ApiError> {
        self.client
            .post(&format!("{}/{}", self.item_path(key), action), body)
            .await
    }

    /// DELETE {path}/{key}
    pub async fn delete(&self, key: &str) -> Result<(), ApiError> {
        self.client.delete(&self.item_path(key)).await
    }
}
