use crate::api::error::{ApiError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

pub const SPAM_LABEL: &str = "spam";

#[derive(Debug, Serialize)]
pub struct PredictRequest<'a> {
    pub text: &'a str,
}

#[derive(Debug, Deserialize)]
struct RawPrediction {
    prediction: String,
    confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Spam,
    Legitimate,
}

/// A validated `/predict` response.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub verdict: Verdict,
    /// Label exactly as the service sent it, e.g. `spam` or `ham`.
    pub label: String,
    /// Percentage in `[0, 100]`.
    pub confidence: f64,
}

impl Prediction {
    pub fn new(label: impl Into<String>, confidence: f64) -> Result<Self> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(ApiError::MalformedResponse("empty prediction label".into()));
        }
        if !confidence.is_finite() || !(0.0..=100.0).contains(&confidence) {
            return Err(ApiError::MalformedResponse(format!(
                "confidence {confidence} outside [0, 100]"
            )));
        }
        let verdict = if label == SPAM_LABEL { Verdict::Spam } else { Verdict::Legitimate };
        Ok(Self { verdict, label, confidence })
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let raw: RawPrediction = serde_json::from_slice(bytes)
            .map_err(|e| ApiError::MalformedResponse(e.to_string()))?;
        Self::new(raw.prediction, raw.confidence)
    }
}

/// `accuracy` may come back as `"97.8%"` or as a bare number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Accuracy {
    Number(f64),
    Text(String),
}

impl fmt::Display for Accuracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accuracy::Number(n) => write!(f, "{n}"),
            Accuracy::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelStats {
    pub accuracy: Accuracy,
    /// Any other fields the service reports, in the order it sent them.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ModelStats {
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| ApiError::MalformedResponse(e.to_string()))
    }

    /// Extra fields flattened to display strings; nested values are shown as JSON.
    pub fn extra_rows(&self) -> Vec<(String, String)> {
        self.extra
            .iter()
            .map(|(k, v)| {
                let shown = match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), shown)
            })
            .collect()
    }
}
