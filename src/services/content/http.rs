//! HTTP implementation of [`ContentStore`] against the managed content API.
//!
//! Endpoints:
//! - `GET  {base}/data/query/{dataset}?query=...&$name=<json>`
//! - `POST {base}/data/mutate/{dataset}` with `{ "mutations": [...] }`
//! - `POST {base}/assets/{files|images}/{dataset}?filename=...`
//!
//! Query parameters are JSON-encoded (a string parameter goes over the wire
//! quoted). Responses arrive in a `{ "result": ... }` / `{ "document": ... }`
//! envelope. All requests carry the dataset token as a bearer header and are
//! bounded by the configured timeout.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;

use crate::config::Config;
use crate::services::content::client::{
    AssetKind, AssetRef, ContentError, ContentResult, ContentStore, Mutation,
};

#[derive(Clone)]
pub struct HttpContentStore {
    client: reqwest::Client,
    base_url: String,
    dataset: String,
    token: SecretString,
}

impl std::fmt::Debug for HttpContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print the token
        f.debug_struct("HttpContentStore")
            .field("base_url", &self.base_url)
            .field("dataset", &self.dataset)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct QueryEnvelope {
    result: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct AssetEnvelope {
    document: AssetRef,
}

impl From<reqwest::Error> for ContentError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ContentError::Timeout
        } else if error.is_connect() {
            ContentError::Connection(error.to_string())
        } else if error.is_decode() {
            ContentError::Decode(error.to_string())
        } else {
            ContentError::Request(error.to_string())
        }
    }
}

impl HttpContentStore {
    pub fn new(config: &Config) -> ContentResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.content_api_timeout)
            .build()
            .map_err(|e| ContentError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config
                .content_api_base_url
                .as_str()
                .trim_end_matches('/')
                .to_string(),
            dataset: config.content_api_dataset.clone(),
            token: config.content_api_token.clone(),
        })
    }

    fn endpoint(&self, area: &str, segment: Option<&str>) -> String {
        match segment {
            Some(segment) => format!("{}/{}/{}/{}", self.base_url, area, segment, self.dataset),
            None => format!("{}/{}/{}", self.base_url, area, self.dataset),
        }
    }

    async fn check_status(response: reqwest::Response) -> ContentResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(ContentError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl ContentStore for HttpContentStore {
    fn backend_name(&self) -> &'static str {
        "content-api"
    }

    async fn fetch(&self, query: &str, params: &[(&str, Value)]) -> ContentResult<Value> {
        let mut pairs: Vec<(String, String)> = vec![("query".to_string(), query.to_string())];
        for (name, value) in params {
            // Parameters are JSON-encoded on the wire: $userId="abc"
            let encoded = serde_json::to_string(value)
                .map_err(|e| ContentError::Request(e.to_string()))?;
            pairs.push((format!("${name}"), encoded));
        }

        let response = self
            .client
            .get(self.endpoint("data/query", None))
            .bearer_auth(self.token.expose_secret())
            .query(&pairs)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let envelope: QueryEnvelope = response.json().await?;
        Ok(envelope.result.unwrap_or(Value::Null))
    }

    async fn mutate(&self, mutations: &[Mutation]) -> ContentResult<()> {
        let body = serde_json::json!({
            "mutations": mutations.iter().map(Mutation::to_wire).collect::<Vec<_>>(),
        });

        let response = self
            .client
            .post(self.endpoint("data/mutate", None))
            .bearer_auth(self.token.expose_secret())
            .json(&body)
            .send()
            .await?;
        Self::check_status(response).await?;

        Ok(())
    }

    async fn upload_asset(
        &self,
        kind: AssetKind,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> ContentResult<AssetRef> {
        let response = self
            .client
            .post(self.endpoint("assets", Some(kind.path_segment())))
            .bearer_auth(self.token.expose_secret())
            .query(&[("filename", filename)])
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let envelope: AssetEnvelope = response.json().await?;
        Ok(envelope.document)
    }
}
