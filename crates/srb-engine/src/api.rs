//! Client for the remote data API (`/api/regions`, `/api/srb-data`, ...).
//!
//! Any non-success status is the failure signal; error bodies are not read.
//! Session cookies belong to the surrounding application and are passed
//! through verbatim when configured.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use srb_common::wire::{DeleteRangePayload, DeleteRangeResponse, ObservationPayload, SuccessResponse};
use srb_common::{Country, Observation, Region, Result, SrbError, SubRegion};
use tracing::{debug, instrument};

pub const REGIONS_PATH: &str = "/api/regions";
pub const SUB_REGIONS_PATH: &str = "/api/subregions";
pub const COUNTRIES_PATH: &str = "/api/countries";
pub const SRB_DATA_PATH: &str = "/api/srb-data";

/// The operations of the remote data API the engines depend on.
#[async_trait]
pub trait DataApi: Send + Sync {
    async fn list_regions(&self) -> Result<Vec<Region>>;

    async fn list_sub_regions(&self) -> Result<Vec<SubRegion>>;

    async fn list_countries(&self) -> Result<Vec<Country>>;

    async fn list_observations(&self) -> Result<Vec<Observation>>;

    async fn add_observation(&self, payload: &ObservationPayload) -> Result<SuccessResponse>;

    /// Fails with `SrbError::NotFound` when the `(country_id, year)` row does not exist.
    async fn update_observation(&self, payload: &ObservationPayload) -> Result<SuccessResponse>;

    async fn delete_observation_range(&self, payload: &DeleteRangePayload) -> Result<DeleteRangeResponse>;
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Scheme, host and port of the data API, e.g. `http://127.0.0.1:3000`.
    pub base_url: String,
    /// Raw `Cookie` header value carrying the session of the logged-in user.
    pub session_cookie: Option<String>,
    /// No timeout unless set.
    pub timeout: Option<Duration>,
}

impl ApiSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), session_cookie: None, timeout: None }
    }
}

/// `DataApi` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpDataApi {
    client: Client,
    base_url: String,
}

impl HttpDataApi {
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        if let Some(cookie) = &settings.session_cookie {
            let value = header::HeaderValue::from_str(cookie)
                .map_err(|e| SrbError::Config(format!("Invalid session cookie: {}", e)))?;
            headers.insert(header::COOKIE, value);
        }

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| SrbError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let resp = self.client.get(self.url(path)).send().await?;
        let resp = check_status(resp, &Method::GET, path)?;
        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned + Default,
    {
        let resp = self
            .client
            .request(method.clone(), self.url(path))
            .json(body)
            .send()
            .await?;
        let resp = check_status(resp, &method, path)?;
        let body = resp.bytes().await?;
        if body.is_empty() {
            return Ok(T::default());
        }
        Ok(serde_json::from_slice(&body)?)
    }
}

fn check_status(resp: Response, method: &Method, path: &str) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    debug!(%method, path, status = status.as_u16(), "Data API returned non-success status");
    Err(SrbError::Status {
        method: method.to_string(),
        path: path.to_string(),
        status: status.as_u16(),
    })
}

#[async_trait]
impl DataApi for HttpDataApi {
    #[instrument(skip(self))]
    async fn list_regions(&self) -> Result<Vec<Region>> {
        self.get_json(REGIONS_PATH).await
    }

    #[instrument(skip(self))]
    async fn list_sub_regions(&self) -> Result<Vec<SubRegion>> {
        self.get_json(SUB_REGIONS_PATH).await
    }

    #[instrument(skip(self))]
    async fn list_countries(&self) -> Result<Vec<Country>> {
        self.get_json(COUNTRIES_PATH).await
    }

    #[instrument(skip(self))]
    async fn list_observations(&self) -> Result<Vec<Observation>> {
        self.get_json(SRB_DATA_PATH).await
    }

    #[instrument(skip(self))]
    async fn add_observation(&self, payload: &ObservationPayload) -> Result<SuccessResponse> {
        self.send_json(Method::POST, SRB_DATA_PATH, payload).await
    }

    #[instrument(skip(self))]
    async fn update_observation(&self, payload: &ObservationPayload) -> Result<SuccessResponse> {
        match self.send_json(Method::PUT, SRB_DATA_PATH, payload).await {
            Err(SrbError::Status { status: 404, .. }) => Err(SrbError::NotFound {
                country_id: payload.country_id,
                year: payload.year,
            }),
            other => other,
        }
    }

    #[instrument(skip(self))]
    async fn delete_observation_range(&self, payload: &DeleteRangePayload) -> Result<DeleteRangeResponse> {
        self.send_json(Method::DELETE, SRB_DATA_PATH, payload).await
    }
}
