//! Configuration loading and capability factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use skillcheck_core::evaluator::{EvaluatorConfig, ResponseEvaluator};
use skillcheck_core::semantic::DEFAULT_POSITIVE_LABEL;
use skillcheck_core::traits::SemanticCapability;

use crate::huggingface::{
    HuggingFaceCapability, HuggingFaceOptions, DEFAULT_CLASSIFIER_MODEL, DEFAULT_EMBEDDING_MODEL,
    DEFAULT_TIMEOUT_SECS,
};
use crate::mock::MockCapability;

/// Environment variable that overrides the Hugging Face token.
pub const HF_TOKEN_ENV: &str = "SKILLCHECK_HF_TOKEN";

/// Which semantic backend to use.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CapabilityConfig {
    HuggingFace {
        #[serde(default)]
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default = "default_embedding_model")]
        embedding_model: String,
        #[serde(default = "default_classifier_model")]
        classifier_model: String,
        #[serde(default = "default_http_timeout")]
        timeout_secs: u64,
    },
    Mock {
        #[serde(default = "default_positive_label")]
        label: String,
        #[serde(default = "default_mock_probability")]
        probability: f64,
        #[serde(default)]
        fail: bool,
    },
    /// Keyword-only scoring.
    Disabled,
}

impl std::fmt::Debug for CapabilityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CapabilityConfig::HuggingFace {
                api_key: _,
                base_url,
                embedding_model,
                classifier_model,
                timeout_secs,
            } => f
                .debug_struct("HuggingFace")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("embedding_model", embedding_model)
                .field("classifier_model", classifier_model)
                .field("timeout_secs", timeout_secs)
                .finish(),
            CapabilityConfig::Mock {
                label,
                probability,
                fail,
            } => f
                .debug_struct("Mock")
                .field("label", label)
                .field("probability", probability)
                .field("fail", fail)
                .finish(),
            CapabilityConfig::Disabled => f.write_str("Disabled"),
        }
    }
}

impl CapabilityConfig {
    /// A Hugging Face backend with default models.
    pub fn hugging_face(api_key: impl Into<String>) -> Self {
        CapabilityConfig::HuggingFace {
            api_key: api_key.into(),
            base_url: None,
            embedding_model: default_embedding_model(),
            classifier_model: default_classifier_model(),
            timeout_secs: default_http_timeout(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CapabilityConfig::HuggingFace { .. } => "huggingface",
            CapabilityConfig::Mock { .. } => "mock",
            CapabilityConfig::Disabled => "disabled",
        }
    }
}

fn default_embedding_model() -> String {
    DEFAULT_EMBEDDING_MODEL.to_string()
}
fn default_classifier_model() -> String {
    DEFAULT_CLASSIFIER_MODEL.to_string()
}
fn default_http_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_positive_label() -> String {
    DEFAULT_POSITIVE_LABEL.to_string()
}
fn default_mock_probability() -> f64 {
    0.9
}

/// Top-level skillcheck configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillcheckConfig {
    /// Semantic backend. `None` means keyword-only scoring.
    #[serde(default)]
    pub capability: Option<CapabilityConfig>,
    /// Upper bound on one semantic scoring call, in milliseconds.
    #[serde(default = "default_capability_timeout")]
    pub capability_timeout_ms: u64,
    /// Classifier label counted as the positive class.
    #[serde(default = "default_positive_label")]
    pub positive_label: String,
    /// Max concurrent evaluations.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Output directory for reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Catalog used when a command is given none.
    #[serde(default)]
    pub default_catalog: Option<PathBuf>,
}

fn default_capability_timeout() -> u64 {
    10_000
}
fn default_parallelism() -> usize {
    4
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./skillcheck-results")
}

impl Default for SkillcheckConfig {
    fn default() -> Self {
        Self {
            capability: None,
            capability_timeout_ms: default_capability_timeout(),
            positive_label: default_positive_label(),
            parallelism: default_parallelism(),
            output_dir: default_output_dir(),
            default_catalog: None,
        }
    }
}

impl SkillcheckConfig {
    pub fn evaluator_config(&self) -> EvaluatorConfig {
        EvaluatorConfig {
            capability_timeout: Duration::from_millis(self.capability_timeout_ms),
            positive_label: self.positive_label.clone(),
            parallelism: self.parallelism.max(1),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Single left-to-right pass: substituted values are copied verbatim and
/// never rescanned. An unterminated `${` is kept as-is.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_capability_config(config: &CapabilityConfig) -> CapabilityConfig {
    match config {
        CapabilityConfig::HuggingFace {
            api_key,
            base_url,
            embedding_model,
            classifier_model,
            timeout_secs,
        } => CapabilityConfig::HuggingFace {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
            embedding_model: resolve_env_vars(embedding_model),
            classifier_model: resolve_env_vars(classifier_model),
            timeout_secs: *timeout_secs,
        },
        other => other.clone(),
    }
}

/// Apply a token override. With no capability configured, a token alone
/// enables the Hugging Face backend.
fn apply_token_override(config: &mut SkillcheckConfig, token: String) {
    match config.capability {
        Some(CapabilityConfig::HuggingFace {
            ref mut api_key, ..
        }) => *api_key = token,
        Some(_) => {}
        None => config.capability = Some(CapabilityConfig::hugging_face(token)),
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `skillcheck.toml` in the current directory
/// 2. `~/.config/skillcheck/config.toml`
///
/// Environment variable override: `SKILLCHECK_HF_TOKEN`.
pub fn load_config() -> Result<SkillcheckConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<SkillcheckConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("skillcheck.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => SkillcheckConfig::default(),
    };

    if let Ok(token) = std::env::var(HF_TOKEN_ENV) {
        if !token.is_empty() {
            apply_token_override(&mut config, token);
        }
    }

    Ok(config)
}

/// Parse a config document and resolve `${VAR}` references in it.
pub fn parse_config(content: &str) -> Result<SkillcheckConfig> {
    let mut config: SkillcheckConfig = toml::from_str(content)?;
    config.capability = config.capability.as_ref().map(resolve_capability_config);
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("skillcheck"))
}

/// Create a capability instance from its configuration.
///
/// `Disabled` yields `None`: the evaluator then scores keywords only. So does
/// a Hugging Face section whose key resolved to an empty string.
pub fn create_capability(config: &CapabilityConfig) -> Result<Option<Arc<dyn SemanticCapability>>> {
    match config {
        CapabilityConfig::HuggingFace {
            api_key,
            base_url,
            embedding_model,
            classifier_model,
            timeout_secs,
        } => {
            if api_key.trim().is_empty() {
                tracing::warn!("no Hugging Face token set ({HF_TOKEN_ENV}); scoring keywords only");
                return Ok(None);
            }
            let options = HuggingFaceOptions {
                api_key: Some(api_key.clone()),
                base_url: base_url.clone().unwrap_or_default(),
                embedding_model: embedding_model.clone(),
                classifier_model: classifier_model.clone(),
                timeout_secs: *timeout_secs,
            };
            let capability: Arc<dyn SemanticCapability> =
                Arc::new(HuggingFaceCapability::new(options)?);
            Ok(Some(capability))
        }
        CapabilityConfig::Mock {
            label,
            probability,
            fail,
        } => {
            let mock = MockCapability::with_classification(label, *probability);
            mock.set_failing(*fail);
            let capability: Arc<dyn SemanticCapability> = Arc::new(mock);
            Ok(Some(capability))
        }
        CapabilityConfig::Disabled => Ok(None),
    }
}

/// Build a [`ResponseEvaluator`] wired to the configured capability.
pub fn build_evaluator(config: &SkillcheckConfig) -> Result<ResponseEvaluator> {
    let capability = match &config.capability {
        Some(c) => create_capability(c)?,
        None => None,
    };
    if capability.is_none() {
        tracing::info!("no semantic capability configured; scoring keywords only");
    }
    Ok(ResponseEvaluator::new(capability, config.evaluator_config()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_SKILLCHECK_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_SKILLCHECK_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_SKILLCHECK_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        std::env::remove_var("_SKILLCHECK_TEST_VAR");
    }

    #[test]
    fn resolve_env_vars_does_not_rescan_substituted_values() {
        std::env::set_var("_SKILLCHECK_SELF_REF", "${_SKILLCHECK_SELF_REF}");
        assert_eq!(
            resolve_env_vars("${_SKILLCHECK_SELF_REF}"),
            "${_SKILLCHECK_SELF_REF}"
        );
        std::env::set_var("_SKILLCHECK_BRACED", "a${b");
        assert_eq!(
            resolve_env_vars("x-${_SKILLCHECK_BRACED}-${_SKILLCHECK_UNSET_VAR}-y"),
            "x-a${b--y"
        );
        std::env::remove_var("_SKILLCHECK_SELF_REF");
        std::env::remove_var("_SKILLCHECK_BRACED");
    }

    #[test]
    fn resolve_env_vars_keeps_unterminated_reference() {
        assert_eq!(resolve_env_vars("plain"), "plain");
        assert_eq!(resolve_env_vars("key-${OPEN"), "key-${OPEN");
    }

    #[test]
    fn empty_hugging_face_key_disables_capability() {
        assert!(create_capability(&CapabilityConfig::hugging_face(""))
            .unwrap()
            .is_none());
        assert!(create_capability(&CapabilityConfig::hugging_face("hf_x"))
            .unwrap()
            .is_some());

        std::env::remove_var("_SKILLCHECK_MISSING_TOKEN");
        let config = parse_config(
            "[capability]\ntype = \"huggingface\"\napi_key = \"${_SKILLCHECK_MISSING_TOKEN}\"\n",
        )
        .unwrap();
        let evaluator = build_evaluator(&config).unwrap();
        assert!(!evaluator.has_capability());
    }

    #[test]
    fn default_config() {
        let config = SkillcheckConfig::default();
        assert!(config.capability.is_none());
        assert_eq!(config.parallelism, 4);
        assert_eq!(config.capability_timeout_ms, 10_000);
        assert_eq!(config.positive_label, "POSITIVE");
    }

    #[test]
    fn parse_huggingface_config() {
        let toml_str = r#"
capability_timeout_ms = 2500
parallelism = 8

[capability]
type = "huggingface"
api_key = "hf_test"
"#;
        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.parallelism, 8);
        match &config.capability {
            Some(CapabilityConfig::HuggingFace {
                api_key,
                embedding_model,
                ..
            }) => {
                assert_eq!(api_key, "hf_test");
                assert_eq!(embedding_model, DEFAULT_EMBEDDING_MODEL);
            }
            other => panic!("unexpected capability: {other:?}"),
        }

        let ec = config.evaluator_config();
        assert_eq!(ec.capability_timeout, Duration::from_millis(2500));
        assert_eq!(ec.parallelism, 8);
    }

    #[test]
    fn parse_mock_and_disabled() {
        let mock = parse_config("[capability]\ntype = \"mock\"\nfail = true\n").unwrap();
        assert!(matches!(
            mock.capability,
            Some(CapabilityConfig::Mock { fail: true, .. })
        ));

        let disabled = parse_config("[capability]\ntype = \"disabled\"\n").unwrap();
        assert!(matches!(disabled.capability, Some(CapabilityConfig::Disabled)));
        assert!(create_capability(&CapabilityConfig::Disabled)
            .unwrap()
            .is_none());
    }

    #[test]
    fn token_override() {
        let mut config = SkillcheckConfig::default();
        apply_token_override(&mut config, "hf_env".into());
        assert!(matches!(
            &config.capability,
            Some(CapabilityConfig::HuggingFace { api_key, .. }) if api_key == "hf_env"
        ));

        let mut disabled = SkillcheckConfig {
            capability: Some(CapabilityConfig::Disabled),
            ..Default::default()
        };
        apply_token_override(&mut disabled, "hf_env".into());
        assert!(matches!(disabled.capability, Some(CapabilityConfig::Disabled)));
    }

    #[test]
    fn debug_masks_api_key() {
        let rendered = format!("{:?}", CapabilityConfig::hugging_face("hf_secret"));
        assert!(!rendered.contains("hf_secret"));
    }

    #[test]
    fn load_explicit_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skillcheck.toml");
        std::fs::write(
            &path,
            "positive_label = \"LABEL_1\"\n[capability]\ntype = \"disabled\"\n",
        )
        .unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.positive_label, "LABEL_1");
        assert!(matches!(config.capability, Some(CapabilityConfig::Disabled)));
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let err = load_config_from(Some(Path::new("/nonexistent/skillcheck.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[tokio::test]
    async fn mock_evaluator_scores_in_full_mode() {
        let config = SkillcheckConfig {
            capability: Some(CapabilityConfig::Mock {
                label: "POSITIVE".into(),
                probability: 0.9,
                fail: false,
            }),
            ..Default::default()
        };
        let evaluator = build_evaluator(&config).unwrap();
        assert!(evaluator.has_capability());

        let question = skillcheck_core::model::Question {
            id: "pivot".into(),
            text: "What are pivot tables used for?".into(),
            difficulty: skillcheck_core::model::Difficulty::Intermediate,
            expected_keywords: vec!["summarize".into(), "filter".into()],
            follow_up: None,
        };
        let result = evaluator
            .evaluate(&question, "Pivot tables summarize and filter large data sets.")
            .await;
        assert_eq!(result.confidence, 0.8);
        assert!(result.score > 0.0 && result.score <= 100.0);
    }

    #[tokio::test]
    async fn failing_mock_degrades() {
        let config = SkillcheckConfig {
            capability: Some(CapabilityConfig::Mock {
                label: "POSITIVE".into(),
                probability: 0.9,
                fail: true,
            }),
            ..Default::default()
        };
        let evaluator = build_evaluator(&config).unwrap();
        let question = skillcheck_core::model::Question {
            id: "iferror".into(),
            text: "How does IFERROR work?".into(),
            difficulty: skillcheck_core::model::Difficulty::Intermediate,
            expected_keywords: vec!["error".into(), "value".into()],
            follow_up: None,
        };
        let result = evaluator
            .evaluate(&question, "It returns a fallback value on error.")
            .await;
        assert_eq!(result.confidence, 0.5);
        assert_eq!(result.score, 85.0);
    }
}
