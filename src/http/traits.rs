use async_trait::async_trait;
use serde_json::Value;

use crate::{error::ApiError, http::form::MultipartForm};

#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ApiError>;

    async fn delete(&self, path: &str) -> Result<(), ApiError>;

    async fn post_form(&self, path: &str, form: MultipartForm) -> Result<Value, ApiError>;

    async fn put_form(&self, path: &str, form: MultipartForm) -> Result<Value, ApiError>;
}
