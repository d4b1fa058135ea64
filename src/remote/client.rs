//! REST client for the static-content backend.
//!
//! # Responsibilities
//! - Build endpoint URLs from the configured base
//! - Attach the bearer token
//! - Bound every request with the configured timeout
//! - Map non-success statuses to `RemoteError::Status`

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::{Map, Value};
use tokio::time::timeout;
use url::Url;

use crate::config::BackendConfig;
use crate::remote::types::{
    AddStaticBody, RemoteError, RemoteResult, StaticResponse, UpdateStaticBody, UploadResponse,
};
use crate::remote::{MediaStore, StaticStore};
use crate::site::{ImageRef, PageKey};

/// Client for the remote store.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
    timeout_secs: u64,
}

impl RemoteClient {
    pub fn new(config: &BackendConfig) -> RemoteResult<Self> {
        let mut base = config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)
            .map_err(|e| RemoteError::InvalidUrl(format!("'{}': {}", config.base_url, e)))?;

        Ok(Self {
            client: Client::new(),
            base_url,
            token: config.token.clone().filter(|t| !t.is_empty()),
            timeout_secs: config.request_timeout_secs,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> RemoteResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| RemoteError::InvalidUrl(format!("'{path}': {e}")))
    }

    fn page_endpoint(&self, path: &str, page: PageKey) -> RemoteResult<Url> {
        let mut url = self.endpoint(path)?;
        url.query_pairs_mut().append_pair("title", page.as_str());
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }

    async fn bounded<T, F>(&self, fut: F) -> RemoteResult<T>
    where
        F: Future<Output = RemoteResult<T>>,
    {
        match timeout(Duration::from_secs(self.timeout_secs), fut).await {
            Ok(result) => result,
            Err(_) => Err(RemoteError::Timeout(self.timeout_secs)),
        }
    }

    async fn send(&self, request: RequestBuilder) -> RemoteResult<Response> {
        self.bounded(Self::dispatch(self.authorize(request))).await
    }

    /// Send, then reject non-success statuses with their body.
    async fn dispatch(request: RequestBuilder) -> RemoteResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(RemoteError::Status { status, body })
    }

    /// Send and read the body as JSON; one timeout covers both.
    async fn send_json<R>(&self, request: RequestBuilder) -> RemoteResult<R>
    where
        R: serde::de::DeserializeOwned,
    {
        let request = self.authorize(request);
        let text = self
            .bounded(async move {
                let response = Self::dispatch(request).await?;
                response.text().await.map_err(RemoteError::from)
            })
            .await?;
        serde_json::from_str(&text).map_err(|e| RemoteError::Decode(e.to_string()))
    }
}

#[async_trait]
impl StaticStore for RemoteClient {
    async fn fetch_page(&self, page: PageKey) -> RemoteResult<Value> {
        let url = self.page_endpoint("static", page)?;
        let response: StaticResponse = self.send_json(self.client.get(url)).await?;
        Ok(response.into_attributes())
    }

    async fn update_page(
        &self,
        page: PageKey,
        attributes: &Map<String, Value>,
    ) -> RemoteResult<()> {
        let url = self.page_endpoint("update-static", page)?;
        self.send(self.client.post(url).json(&UpdateStaticBody { attributes }))
            .await?;
        Ok(())
    }

    async fn create_page(
        &self,
        page: PageKey,
        attributes: &Map<String, Value>,
    ) -> RemoteResult<()> {
        let url = self.endpoint("add-static")?;
        let body = AddStaticBody {
            title: page.as_str(),
            attributes,
        };
        self.send(self.client.post(url).json(&body)).await?;
        Ok(())
    }
}

#[async_trait]
impl MediaStore for RemoteClient {
    async fn upload_image(&self, file_name: &str, bytes: Vec<u8>) -> RemoteResult<ImageRef> {
        let url = self.endpoint("image")?;
        let form = Form::new().part("image", Part::bytes(bytes).file_name(file_name.to_string()));
        let response: UploadResponse = self.send_json(self.client.post(url).multipart(form)).await?;
        Ok(response.into())
    }

    async fn delete_image(&self, id: u64) -> RemoteResult<()> {
        let url = self.endpoint(&format!("image/{id}"))?;
        self.send(self.client.delete(url)).await?;
        Ok(())
    }
}
