//! Translation strategy chain.
//!
//! Strategies are tried in the configured order, each with its own timeout;
//! the chain is expected to end in [`DictionaryStrategy`], which cannot fail,
//! so [`Translator::translate`] is total. No global state: the chain is
//! passed in as configuration.

use std::time::Duration;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("translation service returned {status}")]
    Server { status: u16 },
    #[error("translation response missing translated text")]
    MalformedResponse,
    #[error("invalid dictionary pattern {pattern:?}: {source}")]
    BadPattern {
        pattern: String,
        source: regex::Error,
    },
}

/// One translation request: the packed text plus language pair.
#[derive(Debug, Clone, Serialize)]
pub struct TranslateRequest {
    pub text: String,
    pub source: String,
    pub target: String,
}

/// A completed translation and the name of the strategy that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub text: String,
    pub method: String,
}

/// One way of translating text. Implementations must not share mutable state.
#[async_trait::async_trait]
pub trait TranslateStrategy: Send + Sync {
    fn name(&self) -> &str;

    async fn translate(&self, request: &TranslateRequest) -> Result<String, TranslateError>;
}

/// A LibreTranslate-shaped HTTP endpoint: JSON POST of
/// `{q, source, target, format}`, answering `{"translatedText": ...}`.
pub struct HttpTranslateStrategy {
    name: String,
    url: String,
    timeout: Duration,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ServiceBody<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
}

impl HttpTranslateStrategy {
    pub fn new(name: impl Into<String>, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            timeout,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl TranslateStrategy for HttpTranslateStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    async fn translate(&self, request: &TranslateRequest) -> Result<String, TranslateError> {
        let body = ServiceBody {
            q: &request.text,
            source: &request.source,
            target: &request.target,
            format: "text",
        };
        let resp = self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TranslateError::Server {
                status: status.as_u16(),
            });
        }

        let json: serde_json::Value = resp.json().await?;
        json.get("translatedText")
            .and_then(serde_json::Value::as_str)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .ok_or(TranslateError::MalformedResponse)
    }
}

/// Built-in English→Urdu glossary used by the default dictionary strategy.
const LEGAL_GLOSSARY: &[(&str, &str)] = &[
    ("Summary", "خلاصہ"),
    ("Risk Analysis", "خطرے کا تجزیہ"),
    ("Analysis Complete", "تجزیہ مکمل"),
    ("Document Summary", "دستاویز کا خلاصہ"),
    ("Recommendation", "تجویز"),
    ("Critical", "انتہائی اہم"),
    ("High", "زیادہ"),
    ("Medium", "درمیانہ"),
    ("Low", "کم"),
    ("Unknown", "نامعلوم"),
    ("contract", "معاہدہ"),
    ("agreement", "رضامندی"),
    ("clause", "شق"),
    ("liability", "ذمہ داری"),
    ("terms", "شرائط"),
    ("conditions", "حالات"),
    ("breach", "خلاف ورزی"),
    ("penalty", "سزا"),
    ("damages", "نقصانات"),
    ("compensation", "معاوضہ"),
    ("legal", "قانونی"),
    ("document", "دستاویز"),
    ("review", "جائزہ"),
    ("analysis", "تجزیہ"),
];

/// Last-resort local substitution from a fixed glossary.
///
/// Whole words only, case-insensitive. Total: unmatched text passes through
/// untouched, so this strategy never fails.
pub struct DictionaryStrategy {
    replacements: Vec<(Regex, String)>,
}

impl DictionaryStrategy {
    /// Build from the built-in legal glossary.
    pub fn legal_glossary() -> Self {
        // Patterns are compile-time constants; building them cannot fail.
        Self::with_entries(LEGAL_GLOSSARY).expect("built-in glossary patterns are valid")
    }

    /// Build from caller-supplied `(term, replacement)` pairs. Longer terms
    /// are applied first so multi-word entries win over their parts.
    pub fn with_entries(entries: &[(&str, &str)]) -> Result<Self, TranslateError> {
        let mut sorted: Vec<_> = entries.to_vec();
        sorted.sort_by_key(|(term, _)| std::cmp::Reverse(term.len()));

        let mut replacements = Vec::with_capacity(sorted.len());
        for (term, replacement) in sorted {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(term));
            let regex = Regex::new(&pattern).map_err(|source| TranslateError::BadPattern {
                pattern,
                source,
            })?;
            replacements.push((regex, replacement.to_string()));
        }
        Ok(Self { replacements })
    }

    fn substitute(&self, text: &str) -> String {
        let mut out = text.to_string();
        for (regex, replacement) in &self.replacements {
            out = regex.replace_all(&out, replacement.as_str()).into_owned();
        }
        out
    }
}

#[async_trait::async_trait]
impl TranslateStrategy for DictionaryStrategy {
    fn name(&self) -> &str {
        "dictionary"
    }

    async fn translate(&self, request: &TranslateRequest) -> Result<String, TranslateError> {
        Ok(self.substitute(&request.text))
    }
}

/// An ordered chain of translation strategies.
pub struct Translator {
    strategies: Vec<Box<dyn TranslateStrategy>>,
}

impl Translator {
    pub fn new(strategies: Vec<Box<dyn TranslateStrategy>>) -> Self {
        Self { strategies }
    }

    /// The stock chain: two public services, then the local glossary.
    pub fn default_chain() -> Self {
        Self::new(vec![
            Box::new(HttpTranslateStrategy::new(
                "libretranslate",
                "https://libretranslate.com/translate",
                Duration::from_secs(10),
            )),
            Box::new(HttpTranslateStrategy::new(
                "argos",
                "https://translate.argosopentech.com/translate",
                Duration::from_secs(10),
            )),
            Box::new(DictionaryStrategy::legal_glossary()),
        ])
    }

    /// Try each strategy in order; the first success wins.
    ///
    /// Falls back to the original text (method `"identity"`) in the unusual
    /// case where every strategy fails.
    pub async fn translate(&self, request: &TranslateRequest) -> Translation {
        for strategy in &self.strategies {
            match strategy.translate(request).await {
                Ok(text) => {
                    debug!(method = strategy.name(), "translation succeeded");
                    return Translation {
                        text,
                        method: strategy.name().to_string(),
                    };
                }
                Err(err) => {
                    warn!(method = strategy.name(), error = %err, "translation strategy failed");
                }
            }
        }
        Translation {
            text: request.text.clone(),
            method: "identity".to_string(),
        }
    }
}
