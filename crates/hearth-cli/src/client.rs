//! Async HTTP client for the `/familyMembers` collection.

use std::time::Duration;

use hearth_core::{Record, RecordFields, RecordId, RecordStore};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url, header};
use thiserror::Error;

/// Collection segment appended to the base URL.
const COLLECTION: &str = "familyMembers";

/// The hosted mock API this client was written against.
pub const DEFAULT_BASE_URL: &str = "https://6404b7673bdc59fa8f3fe0dc.mockapi.io/api/v1";

/// Connection settings for the record API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  /// Address the collection hangs off, e.g. `http://localhost:3000/api/v1`.
  pub base_url: String,
  pub timeout:  Duration,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_BASE_URL.to_string(),
      timeout:  Duration::from_secs(30),
    }
  }
}

#[derive(Debug, Error)]
pub enum ClientError {
  #[error("invalid base URL {url:?}: {reason}")]
  InvalidBaseUrl { url: String, reason: String },

  #[error("failed to build HTTP client: {0}")]
  Build(#[source] reqwest::Error),

  #[error("{method} {url} failed: {source}")]
  Transport {
    method: Method,
    url:    Url,
    #[source]
    source: reqwest::Error,
  },

  #[error("{method} {url} → {status}")]
  Status {
    method: Method,
    url:    Url,
    status: StatusCode,
  },

  #[error("deserialising response from {url}: {source}")]
  Decode {
    url:    Url,
    #[source]
    source: serde_json::Error,
  },
}

/// Async HTTP client for the record collection.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct ApiClient {
  client: Client,
  base:   Url,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self, ClientError> {
    let base = Url::parse(&config.base_url).map_err(|e| ClientError::InvalidBaseUrl {
      url:    config.base_url.clone(),
      reason: e.to_string(),
    })?;
    if base.cannot_be_a_base() {
      return Err(ClientError::InvalidBaseUrl {
        url:    config.base_url,
        reason: "not a hierarchical URL".into(),
      });
    }
    let client = Client::builder()
      .timeout(config.timeout)
      .build()
      .map_err(ClientError::Build)?;
    Ok(Self { client, base })
  }

  pub fn base_url(&self) -> &Url { &self.base }

  /// `{base}/familyMembers[/{id}]`, with the id percent-encoded as a single
  /// path segment.
  fn url(&self, id: Option<&RecordId>) -> Url {
    let mut url = self.base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
      segments.pop_if_empty().push(COLLECTION);
      if let Some(id) = id {
        segments.push(id.as_str());
      }
    }
    url
  }

  fn request(&self, method: Method, url: Url) -> RequestBuilder {
    self
      .client
      .request(method, url)
      .header(header::CONTENT_TYPE, "application/json")
  }

  /// Send `req`, mapping transport failures and non-success statuses.
  async fn send(
    &self,
    method: Method,
    url: Url,
    req: RequestBuilder,
  ) -> Result<Response, ClientError> {
    tracing::debug!(%method, %url, "sending request");
    let resp = req.send().await.map_err(|source| ClientError::Transport {
      method: method.clone(),
      url: url.clone(),
      source,
    })?;
    let status = resp.status();
    if !status.is_success() {
      return Err(ClientError::Status { method, url, status });
    }
    Ok(resp)
  }

  /// Like [`Self::send`], but a 404 means "no such record".
  async fn send_optional(
    &self,
    method: Method,
    url: Url,
    req: RequestBuilder,
  ) -> Result<Option<Response>, ClientError> {
    match self.send(method, url, req).await {
      Ok(resp) => Ok(Some(resp)),
      Err(ClientError::Status { status, .. }) if status == StatusCode::NOT_FOUND => {
        Ok(None)
      }
      Err(e) => Err(e),
    }
  }

  /// Read the body as JSON; an empty body yields `None`.
  async fn body<T: serde::de::DeserializeOwned>(
    method: Method,
    url: Url,
    resp: Response,
  ) -> Result<Option<T>, ClientError> {
    let bytes = resp.bytes().await.map_err(|source| ClientError::Transport {
      method,
      url: url.clone(),
      source,
    })?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
      return Ok(None);
    }
    serde_json::from_slice(&bytes)
      .map(Some)
      .map_err(|source| ClientError::Decode { url, source })
  }

  /// Like [`Self::body`], but an empty body is a decode error.
  async fn required_body<T: serde::de::DeserializeOwned>(
    method: Method,
    url: Url,
    resp: Response,
  ) -> Result<T, ClientError> {
    match Self::body(method, url.clone(), resp).await? {
      Some(value) => Ok(value),
      None => Err(ClientError::Decode {
        url,
        source: <serde_json::Error as serde::de::Error>::custom("empty response body"),
      }),
    }
  }
}

impl RecordStore for ApiClient {
  type Error = ClientError;

  /// `GET /familyMembers`
  async fn list_all(&self) -> Result<Vec<Record>, ClientError> {
    let url = self.url(None);
    let req = self.request(Method::GET, url.clone());
    let resp = self.send(Method::GET, url.clone(), req).await?;
    Self::required_body(Method::GET, url, resp).await
  }

  /// `GET /familyMembers/{id}`
  async fn get(&self, id: RecordId) -> Result<Option<Record>, ClientError> {
    let url = self.url(Some(&id));
    let req = self.request(Method::GET, url.clone());
    match self.send_optional(Method::GET, url.clone(), req).await? {
      Some(resp) => Self::required_body(Method::GET, url, resp).await.map(Some),
      None => Ok(None),
    }
  }

  /// `POST /familyMembers`
  async fn create(&self, fields: RecordFields) -> Result<Record, ClientError> {
    let url = self.url(None);
    let req = self.request(Method::POST, url.clone()).json(&fields);
    let resp = self.send(Method::POST, url.clone(), req).await?;
    Self::required_body(Method::POST, url, resp).await
  }

  /// `PUT /familyMembers/{id}` with the full record, id included.
  async fn update(
    &self,
    id: RecordId,
    fields: RecordFields,
  ) -> Result<Option<Record>, ClientError> {
    let url = self.url(Some(&id));
    let record = fields.with_id(id);
    let req = self.request(Method::PUT, url.clone()).json(&record);
    match self.send_optional(Method::PUT, url.clone(), req).await? {
      Some(resp) => Self::required_body(Method::PUT, url, resp).await.map(Some),
      None => Ok(None),
    }
  }

  /// `DELETE /familyMembers/{id}`; the store may answer with an empty body.
  async fn delete(&self, id: RecordId) -> Result<Option<Record>, ClientError> {
    let url = self.url(Some(&id));
    let req = self.request(Method::DELETE, url.clone());
    match self.send_optional(Method::DELETE, url.clone(), req).await? {
      Some(resp) => Self::body(Method::DELETE, url, resp).await,
      None => Ok(None),
    }
  }
}
