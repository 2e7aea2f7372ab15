use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    error::ApiError,
    http::{CatalogApi, MultipartForm},
};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub key: String,
    pub query: Vec<(String, String)>,
    pub form: Option<MultipartForm>,
}

#[derive(Default)]
pub struct FakeApi {
    responses: Mutex<HashMap<String, Result<Value, ApiError>>>,
    delays: Mutex<HashMap<String, Duration>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn respond(&self, key: &str, body: Value) {
        self.responses
            .lock()
            .unwrap()
            .insert(key.to_string(), Ok(body));
    }

    pub fn fail(&self, key: &str, error: ApiError) {
        self.responses
            .lock()
            .unwrap()
            .insert(key.to_string(), Err(error));
    }

    pub fn delay(&self, key: &str, delay: Duration) {
        self.delays.lock().unwrap().insert(key.to_string(), delay);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn count(&self, key: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.key == key)
            .count()
    }

    async fn answer(
        &self,
        method: &str,
        path: &str,
        query: &[(&str, String)],
        form: Option<MultipartForm>,
    ) -> Result<Value, ApiError> {
        let key = format!("{method} {path}");
        let query: Vec<(String, String)> = query
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        let full_key = if query.is_empty() {
            key.clone()
        } else {
            let qs: Vec<String> = query.iter().map(|(k, v)| format!("{k}={v}")).collect();
            format!("{key}?{}", qs.join("&"))
        };

        self.requests.lock().unwrap().push(RecordedRequest {
            key: key.clone(),
            query,
            form,
        });

        let delay = {
            let delays = self.delays.lock().unwrap();
            delays.get(&full_key).or_else(|| delays.get(&key)).copied()
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let responses = self.responses.lock().unwrap();
        responses
            .get(&full_key)
            .or_else(|| responses.get(&key))
            .cloned()
            .unwrap_or_else(|| {
                Err(ApiError::from_status(
                    404,
                    Some(format!("No route for {full_key}")),
                ))
            })
    }
}

#[async_trait]
impl CatalogApi for FakeApi {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ApiError> {
        self.answer("GET", path, query, None).await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.answer("DELETE", path, &[], None).await.map(|_| ())
    }

    async fn post_form(&self, path: &str, form: MultipartForm) -> Result<Value, ApiError> {
        self.answer("POST", path, &[], Some(form)).await
    }

    async fn put_form(&self, path: &str, form: MultipartForm) -> Result<Value, ApiError> {
        self.answer("PUT", path, &[], Some(form)).await
    }
}
