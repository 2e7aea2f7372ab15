pub mod form;
pub mod traits;

use async_trait::async_trait;
use reqwest::{
    Client, RequestBuilder, Response,
    header::{self, HeaderMap, HeaderValue},
    multipart,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    config::Config,
    error::{ApiError, ConfigError},
    model::CurrentUser,
};

pub use form::{ArtistForm, MultipartForm, SongForm, UploadFile};
pub use traits::CatalogApi;

const USER_AGENT: &str = concat!("moodify-admin/", env!("CARGO_PKG_VERSION"));

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

pub struct ApiService {
    client: Client,
    base_url: String,
}

impl ApiService {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
        if let Some(token) = &config.api_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| ConfigError::InvalidValue("MOODIFY_API_TOKEN", e.to_string()))?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn current_user(&self) -> Result<CurrentUser, ApiError> {
        let body = self.get("/users/me", &[]).await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn send(&self, request: RequestBuilder, method: &str, path: &str) -> Result<Response, ApiError> {
        debug!(method, path, "Sending catalog request");

        let response = request.send().await.map_err(|e| {
            warn!(kind = "network", method, path, "Catalog request failed: {}", e);
            ApiError::Network(e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message);
        let err = ApiError::from_status(status.as_u16(), message);
        warn!(
            kind = err.kind(),
            status = status.as_u16(),
            method,
            path,
            "Catalog request returned an error: {}",
            err
        );
        Err(err)
    }

    async fn read_json(response: Response) -> Result<Value, ApiError> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn build_form(form: MultipartForm) -> Result<multipart::Form, ApiError> {
        let mut body = multipart::Form::new();
        for (name, part) in form.into_parts() {
            body = match part {
                form::FormPart::Text(value) => body.text(name, value),
                form::FormPart::File(file) => {
                    let mut part = multipart::Part::bytes(file.bytes).file_name(file.file_name);
                    if let Some(mime) = file.mime {
                        part = part
                            .mime_str(&mime)
                            .map_err(|e| ApiError::Decode(e.to_string()))?;
                    }
                    body.part(name, part)
                }
            };
        }
        Ok(body)
    }
}

#[async_trait]
impl CatalogApi for ApiService {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ApiError> {
        let request = self.client.get(self.url(path)).query(query);
        let response = self.send(request, "GET", path).await?;
        Self::read_json(response).await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let request = self.client.delete(self.url(path));
        self.send(request, "DELETE", path).await?;
        Ok(())
    }

    async fn post_form(&self, path: &str, form: MultipartForm) -> Result<Value, ApiError> {
        let request = self.client.post(self.url(path)).multipart(Self::build_form(form)?);
        let response = self.send(request, "POST", path).await?;
        Self::read_json(response).await
    }

    async fn put_form(&self, path: &str, form: MultipartForm) -> Result<Value, ApiError> {
        let request = self.client.put(self.url(path)).multipart(Self::build_form(form)?);
        let response = self.send(request, "PUT", path).await?;
        Self::read_json(response).await
    }
}
