use crate::api::error::{ApiError, Result};
use crate::api::models::{ModelStats, PredictRequest, Prediction};
use reqwest::Client as HttpClient;
use std::future::Future;
use url::Url;

/// The three calls the view makes against the classification service.
pub trait SpamApi: Send + Sync + 'static {
    /// `GET /health`; any 2xx means the service is up, the body is ignored.
    fn health(&self) -> impl Future<Output = Result<()>> + Send;
    fn stats(&self) -> impl Future<Output = Result<ModelStats>> + Send;
    /// `POST /predict` with `{"text": text}`, sent verbatim.
    fn predict(&self, text: &str) -> impl Future<Output = Result<Prediction>> + Send;
}

pub struct ApiClient {
    pub http: HttpClient,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        Ok(Self {
            http: HttpClient::new(),
            base_url,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let raw = format!("{}/{}", self.base_url, path);
        Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))
    }

    async fn get_ok(&self, path: &str) -> Result<reqwest::Response> {
        let url = self.endpoint(path)?;
        log::debug!("GET {url}");
        let resp = self.http.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(ApiError::Status { status: resp.status() });
        }
        Ok(resp)
    }
}

impl SpamApi for ApiClient {
    async fn health(&self) -> Result<()> {
        self.get_ok("health").await.map(|_| ())
    }

    async fn stats(&self) -> Result<ModelStats> {
        let resp = self.get_ok("stats").await?;
        let body = resp.bytes().await?;
        ModelStats::from_slice(&body)
    }

    async fn predict(&self, text: &str) -> Result<Prediction> {
        let url = self.endpoint("predict")?;
        log::debug!("POST {url} ({} chars)", text.chars().count());
        // .json() also sets `Content-Type: application/json`
        let resp = self.http.post(url).json(&PredictRequest { text }).send().await?;
        if !resp.status().is_success() {
            return Err(ApiError::Status { status: resp.status() });
        }
        let body = resp.bytes().await?;
        Prediction::from_slice(&body)
    }
}
