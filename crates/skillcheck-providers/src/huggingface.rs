//! Hugging Face Inference API backend.
//!
//! Embeddings come from a feature-extraction model, answer quality from a
//! binary text-classification model. Both are plain `POST /models/{id}`
//! calls with an `inputs` body.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use skillcheck_core::error::CapabilityError;
use skillcheck_core::traits::{Classification, SemanticCapability};

use crate::error::ProviderError;

pub const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_EMBEDDING_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";
pub const DEFAULT_CLASSIFIER_MODEL: &str = "distilbert-base-uncased-finetuned-sst-2-english";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for [`HuggingFaceCapability`].
#[derive(Clone)]
pub struct HuggingFaceOptions {
    pub api_key: Option<String>,
    pub base_url: String,
    pub embedding_model: String,
    pub classifier_model: String,
    pub timeout_secs: u64,
}

impl Default for HuggingFaceOptions {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            classifier_model: DEFAULT_CLASSIFIER_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl std::fmt::Debug for HuggingFaceOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HuggingFaceOptions")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("embedding_model", &self.embedding_model)
            .field("classifier_model", &self.classifier_model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Semantic capability backed by the Hugging Face Inference API.
#[derive(Debug)]
pub struct HuggingFaceCapability {
    options: HuggingFaceOptions,
    client: reqwest::Client,
}

impl HuggingFaceCapability {
    pub fn new(mut options: HuggingFaceOptions) -> Result<Self, ProviderError> {
        if options.base_url.is_empty() {
            options.base_url = DEFAULT_BASE_URL.to_string();
        }
        options.base_url = options.base_url.trim_end_matches('/').to_string();
        if options.api_key.as_deref().is_some_and(str::is_empty) {
            options.api_key = None;
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(options.timeout_secs))
            .build()
            .map_err(|e| ProviderError::NetworkError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { options, client })
    }

    pub fn options(&self) -> &HuggingFaceOptions {
        &self.options
    }

    /// Run one inference call and decode the JSON body.
    #[instrument(skip(self, text))]
    async fn infer<T: DeserializeOwned>(&self, model: &str, text: &str) -> Result<T, ProviderError> {
        let body = InferenceRequest {
            inputs: text,
            options: InferenceOptions {
                wait_for_model: false,
            },
        };

        let mut request = self
            .client
            .post(format!("{}/models/{}", self.options.base_url, model))
            .json(&body);
        if let Some(key) = &self.options.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(self.options.timeout_secs)
            } else {
                ProviderError::NetworkError(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        match status {
            401 | 403 => {
                return Err(ProviderError::AuthenticationFailed(
                    "invalid or missing Hugging Face token".into(),
                ))
            }
            404 => return Err(ProviderError::ModelNotFound(model.to_string())),
            503 => {
                let estimated_secs = response
                    .json::<ApiErrorBody>()
                    .await
                    .ok()
                    .and_then(|b| b.estimated_time)
                    .unwrap_or(0.0);
                return Err(ProviderError::ModelLoading {
                    model: model.to_string(),
                    estimated_secs,
                });
            }
            s if s >= 400 => {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiErrorBody>(&body)
                    .ok()
                    .and_then(|b| b.error)
                    .unwrap_or(body);
                return Err(ProviderError::ApiError { status, message });
            }
            _ => {}
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::UnexpectedResponse(format!("failed to parse response: {e}")))
    }
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    options: InferenceOptions,
}

#[derive(Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    estimated_time: Option<f64>,
}

/// Feature-extraction output: sentence-transformer models return one pooled
/// vector, raw encoders return one vector per token.
#[derive(Deserialize)]
#[serde(untagged)]
enum EmbeddingResponse {
    Vector(Vec<f32>),
    Tokens(Vec<Vec<f32>>),
    Batch(Vec<Vec<Vec<f32>>>),
}

impl EmbeddingResponse {
    fn into_vector(self) -> Result<Vec<f32>, ProviderError> {
        match self {
            EmbeddingResponse::Vector(v) if !v.is_empty() => Ok(v),
            EmbeddingResponse::Vector(_) => {
                Err(ProviderError::UnexpectedResponse("empty embedding".into()))
            }
            EmbeddingResponse::Tokens(rows) => mean_pool(&rows),
            EmbeddingResponse::Batch(mut batch) => match batch.len() {
                0 => Err(ProviderError::UnexpectedResponse("empty embedding batch".into())),
                _ => mean_pool(&batch.swap_remove(0)),
            },
        }
    }
}

fn mean_pool(rows: &[Vec<f32>]) -> Result<Vec<f32>, ProviderError> {
    let width = match rows.first() {
        Some(first) if !first.is_empty() => first.len(),
        _ => return Err(ProviderError::UnexpectedResponse("empty embedding".into())),
    };

    let mut pooled = vec![0.0f32; width];
    for row in rows {
        if row.len() != width {
            return Err(ProviderError::UnexpectedResponse(format!(
                "ragged token embeddings: {} vs {} dimensions",
                row.len(),
                width
            )));
        }
        for (acc, v) in pooled.iter_mut().zip(row) {
            *acc += v;
        }
    }

    let n = rows.len() as f32;
    pooled.iter_mut().for_each(|v| *v /= n);
    Ok(pooled)
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ClassificationResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl ClassificationResponse {
    fn into_best(self) -> Result<Classification, ProviderError> {
        let labels = match self {
            ClassificationResponse::Nested(outer) => outer.into_iter().flatten().collect(),
            ClassificationResponse::Flat(labels) => labels,
        };

        labels
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .map(|best| Classification {
                label: best.label,
                probability: best.score,
            })
            .ok_or_else(|| ProviderError::UnexpectedResponse("no classification labels".into()))
    }
}

#[async_trait]
impl SemanticCapability for HuggingFaceCapability {
    fn name(&self) -> &str {
        "huggingface"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, CapabilityError> {
        let response: EmbeddingResponse = self.infer(&self.options.embedding_model, text).await?;
        Ok(response.into_vector()?)
    }

    async fn classify(&self, text: &str) -> Result<Classification, CapabilityError> {
        let response: ClassificationResponse =
            self.infer(&self.options.classifier_model, text).await?;
        let best = response.into_best()?;
        tracing::debug!(label = %best.label, probability = best.probability, "classified");
        Ok(best)
    }
}
