//! Word-table sentiment oracle
//!
//! An approximate, dependency-free stand-in for a real sentiment service.
//! Polarity is the mean of the table values of the words found in the text;
//! a negator directly before a word scales it by `negation_factor`.
//!
//! Tables are TOML documents:
//!
//! ```toml
//! [lexicon]
//! name = "shop"
//! negators = ["not", "never"]
//!
//! [words]
//! great = 0.8
//! broken = -0.4
//! ```

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use crate::{OracleError, SentimentOracle};

static WORD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z]+(?:'[a-z]+)?").expect("Invalid word regex"));

const EMBEDDED_LEXICON: &str = include_str!("../lexicon/default.toml");

/// A lexicon table as stored on disk
#[derive(Debug, Clone, Deserialize)]
struct LexiconFile {
    lexicon: LexiconMetadata,
    #[serde(default)]
    words: HashMap<String, f64>,
}

#[derive(Debug, Clone, Deserialize)]
struct LexiconMetadata {
    name: String,
    #[serde(default)]
    negators: Vec<String>,
    #[serde(default = "default_negation_factor")]
    negation_factor: f64,
}

fn default_negation_factor() -> f64 {
    -0.5
}

/// Sentiment oracle backed by a word polarity table
#[derive(Debug, Clone)]
pub struct LexiconOracle {
    name: String,
    words: HashMap<String, f64>,
    negators: HashSet<String>,
    negation_factor: f64,
}

impl LexiconOracle {
    /// The built-in table
    pub fn embedded() -> Self {
        Self::from_toml_str(EMBEDDED_LEXICON).expect("embedded lexicon is valid")
    }

    pub fn from_toml_str(content: &str) -> Result<Self, OracleError> {
        let file: LexiconFile = toml::from_str(content)
            .map_err(|e| OracleError::InvalidLexicon(e.to_string()))?;

        if let Some((word, value)) = file
            .words
            .iter()
            .find(|(_, v)| !v.is_finite() || !(-1.0..=1.0).contains(*v))
        {
            return Err(OracleError::InvalidLexicon(format!(
                "word '{}' has polarity {} outside [-1, 1]",
                word, value
            )));
        }

        Ok(Self {
            name: file.lexicon.name,
            words: file
                .words
                .into_iter()
                .map(|(w, v)| (w.to_lowercase(), v))
                .collect(),
            negators: file
                .lexicon
                .negators
                .into_iter()
                .map(|w| w.to_lowercase())
                .collect(),
            negation_factor: file.lexicon.negation_factor,
        })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, OracleError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            OracleError::InvalidLexicon(format!("cannot read {}: {}", path.display(), e))
        })?;
        let oracle = Self::from_toml_str(&content)?;
        debug!("Loaded lexicon '{}' with {} words", oracle.name, oracle.len());
        Ok(oracle)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl SentimentOracle for LexiconOracle {
    fn polarity(&self, text: &str) -> Result<f64, OracleError> {
        let lower = text.to_lowercase();
        let tokens: Vec<&str> = WORD_REGEX.find_iter(&lower).map(|m| m.as_str()).collect();

        let mut total = 0.0;
        let mut matched = 0usize;

        for (i, token) in tokens.iter().enumerate() {
            let Some(&value) = self.words.get(*token) else {
                continue;
            };
            let negated = i > 0 && self.negators.contains(tokens[i - 1]);
            total += if negated { value * self.negation_factor } else { value };
            matched += 1;
        }

        if matched == 0 {
            return Ok(0.0);
        }
        Ok((total / matched as f64).clamp(-1.0, 1.0))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
