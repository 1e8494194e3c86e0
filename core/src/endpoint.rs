//! Collection endpoints such as `/alert/` or `/node/tag/`.
//!
//! Items live at `{collection}{id}`, matching the backend's routing.

use std::fmt::Display;

use serde_json::Value;

use crate::api::Api;
use crate::error::ApiError;
use crate::http::Transport;
use crate::query::QueryParams;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    collection: String,
}

impl Endpoint {
    pub fn new(collection: &str) -> Self {
        let mut collection = collection.trim_end_matches('/').to_string();
        if !collection.starts_with('/') {
            collection.insert(0, '/');
        }
        collection.push('/');
        Self { collection }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn item(&self, id: impl Display) -> String {
        format!("{}{id}", self.collection)
    }

    /// Create an item and return it as the backend stores it.
    pub async fn create<T: Transport>(&self, api: &Api<T>, body: &Value) -> Result<Value, ApiError> {
        api.create(&self.collection, Some(body), true).await
    }

    pub async fn read_all<T: Transport>(&self, api: &Api<T>, query: &QueryParams) -> Result<Value, ApiError> {
        api.read(&self.collection, query).await
    }

    pub async fn read<T: Transport>(&self, api: &Api<T>, id: impl Display) -> Result<Value, ApiError> {
        api.read(&self.item(id), &QueryParams::new()).await
    }

    pub async fn update<T: Transport>(
        &self,
        api: &Api<T>,
        id: impl Display,
        body: &Value,
    ) -> Result<Value, ApiError> {
        api.update(&self.item(id), Some(body)).await
    }

    pub async fn remove<T: Transport>(&self, api: &Api<T>, id: impl Display) -> Result<Value, ApiError> {
        api.remove(&self.item(id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_paths_are_normalized() {
        assert_eq!(Endpoint::new("/alert/").collection(), "/alert/");
        assert_eq!(Endpoint::new("node/tag").collection(), "/node/tag/");
        assert_eq!(Endpoint::new("/node/tag").item("abc"), "/node/tag/abc");
    }
}
