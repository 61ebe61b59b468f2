//! Store client for a Kubernetes-style custom resource API.
//!
//! Objects live under
//! `{base_url}/apis/{group}/{version}/namespaces/{namespace}/{plural}/{name}`.
//! Creates are `POST`s to the collection, updates are `PUT`s to the object and
//! carry `metadata.resourceVersion`, which the server checks atomically.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;

use super::Repository;
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::model::{Document, ResourceKey, ResourceKind};

pub struct HttpRepository {
    client: Client,
    base_url: String,
    api_group: String,
    api_version: String,
    token: Option<String>,
}

impl HttpRepository {
    pub fn new(config: &StoreConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_group: config.api_group.clone(),
            api_version: config.api_version.clone(),
            token: config.token.clone().filter(|t| !t.is_empty()),
        })
    }

    fn collection_url(&self, kind: ResourceKind, namespace: &str) -> String {
        format!(
            "{}/apis/{}/{}/namespaces/{}/{}",
            self.base_url,
            self.api_group,
            self.api_version,
            namespace,
            kind.plural()
        )
    }

    fn object_url(&self, key: &ResourceKey) -> String {
        format!("{}/{}", self.collection_url(key.kind, &key.namespace), key.name)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Serializes a document with the `apiVersion` and `kind` the server expects.
    fn body_for<D: Document>(
        &self,
        document: &D,
        namespace: &str,
        key: &ResourceKey,
    ) -> Result<Value, StoreError> {
        let mut document = document.clone();
        document.metadata_mut().namespace = namespace.to_string();
        let mut body = serde_json::to_value(&document).map_err(|e| StoreError::Codec {
            key: key.clone(),
            message: e.to_string(),
        })?;
        if let Value::Object(map) = &mut body {
            map.insert(
                "apiVersion".into(),
                Value::String(format!("{}/{}", self.api_group, self.api_version)),
            );
            map.insert("kind".into(), Value::String(D::KIND.kind().to_string()));
        }
        Ok(body)
    }

    async fn send(&self, request: RequestBuilder, key: &ResourceKey) -> Result<Response, StoreError> {
        self.authorize(request)
            .send()
            .await
            .map_err(|source| StoreError::Transport {
                key: key.clone(),
                source,
            })
    }
}

/// Maps a response to a document. `on_conflict` decides what a 409 means for
/// the request that produced it.
async fn read_document<D: Document>(
    response: Response,
    key: ResourceKey,
    on_conflict: fn(ResourceKey) -> StoreError,
) -> Result<D, StoreError> {
    let status = response.status();

    if status == StatusCode::NOT_FOUND {
        return Err(StoreError::NotFound { key });
    }
    if status == StatusCode::CONFLICT {
        return Err(on_conflict(key));
    }
    if !status.is_success() {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        return Err(StoreError::Api {
            key,
            status: status.as_u16(),
            message,
        });
    }

    let bytes = match response.bytes().await {
        Ok(bytes) => bytes,
        Err(source) => return Err(StoreError::Transport { key, source }),
    };
    serde_json::from_slice(&bytes).map_err(|e| StoreError::Codec {
        key,
        message: e.to_string(),
    })
}

impl Repository for HttpRepository {
    async fn get<D: Document>(&self, name: &str, namespace: &str) -> Result<D, StoreError> {
        let key = ResourceKey::new(D::KIND, name, namespace);
        let response = self.send(self.client.get(self.object_url(&key)), &key).await?;
        read_document(response, key, |key| StoreError::Conflict { key }).await
    }

    async fn create<D: Document>(&self, document: &D, namespace: &str) -> Result<D, StoreError> {
        let key = document.key_in(namespace);
        let body = self.body_for(document, namespace, &key)?;
        let request = self
            .client
            .post(self.collection_url(D::KIND, namespace))
            .json(&body);
        let response = self.send(request, &key).await?;
        read_document(response, key, |key| StoreError::AlreadyExists { key }).await
    }

    async fn update<D: Document>(&self, document: &D, namespace: &str) -> Result<D, StoreError> {
        let key = document.key_in(namespace);
        let body = self.body_for(document, namespace, &key)?;
        let request = self.client.put(self.object_url(&key)).json(&body);
        let response = self.send(request, &key).await?;
        read_document(response, key, |key| StoreError::Conflict { key }).await
    }
}
