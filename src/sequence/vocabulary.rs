//! The pretrained `word -> index` table.
//!
//! The vocabulary is loaded, never built: it must be the exact table the model
//! was trained against. Three on-disk layouts are understood:
//!
//! - the document written by Keras' `Tokenizer.to_json()` (a `.json` file whose
//!   `config.word_index` holds a JSON-encoded object),
//! - a plain JSON object mapping words to indices (`.json`),
//! - a bincode-encoded [`VocabularyArtifact`] (any other extension).
//!
//! Lookup honors the two tokenizer settings that change the emitted ids:
//! `num_words` (indices at or above it are treated as unknown; zero or
//! absent means no limit) and
//! `oov_token` (when set, unknown words map to its index instead of being
//! dropped).

use std::path::Path;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::TokenId;
use super::padding::PADDING_VALUE;
use crate::error::{CritiqueError, Result};

const KERAS_CLASS_NAME: &str = "Tokenizer";

/// Serialized form of a [`Vocabulary`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VocabularyArtifact {
    /// Word to index table. Indices start at 1.
    pub word_index: AHashMap<String, TokenId>,
    /// Only indices strictly below this value are emitted. Zero means no limit.
    pub num_words: Option<usize>,
    /// Word whose index replaces unknown words.
    pub oov_token: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct KerasTokenizerDocument {
    class_name: String,
    config: KerasTokenizerConfig,
}

#[derive(Serialize, Deserialize)]
struct KerasTokenizerConfig {
    #[serde(default)]
    num_words: Option<usize>,
    #[serde(default)]
    oov_token: Option<String>,
    word_index: Value,
}

/// Immutable word to index mapping used to turn analyzed words into ids.
///
/// ```
/// use critique::sequence::Vocabulary;
///
/// let vocabulary = Vocabulary::from_json_str(r#"{"love": 1, "amaz": 2, "product": 3}"#).unwrap();
/// assert_eq!(vocabulary.texts_to_sequence(["product", "amaz", "zzz", "love"]), vec![3, 2, 1]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Vocabulary {
    word_index: AHashMap<String, TokenId>,
    num_words: Option<usize>,
    oov_token: Option<String>,
    oov_index: Option<TokenId>,
}

impl Vocabulary {
    /// Create a vocabulary from a word index table.
    ///
    /// Fails if any word claims the padding index `0`.
    pub fn new(word_index: AHashMap<String, TokenId>) -> Result<Self> {
        if let Some((word, _)) = word_index.iter().find(|(_, idx)| **idx == PADDING_VALUE) {
            return Err(CritiqueError::model_load(format!(
                "vocabulary word {word:?} uses index {PADDING_VALUE}, which is reserved for padding"
            )));
        }

        Ok(Vocabulary {
            word_index,
            num_words: None,
            oov_token: None,
            oov_index: None,
        })
    }

    /// Limit emitted ids to those strictly below `num_words`. Zero means no
    /// limit, as in Keras.
    pub fn with_num_words(mut self, num_words: Option<usize>) -> Self {
        self.num_words = num_words.filter(|&limit| limit > 0);
        self
    }

    /// Map unknown words to the index of `oov_token`.
    pub fn with_oov_token(mut self, oov_token: Option<String>) -> Self {
        self.oov_index = oov_token
            .as_ref()
            .and_then(|token| self.word_index.get(token).copied());
        if let (Some(token), None) = (&oov_token, self.oov_index) {
            log::warn!("OOV token {token:?} is not in the vocabulary; unknown words will be dropped");
        }
        self.oov_token = oov_token;
        self
    }

    /// Load a vocabulary file, choosing the format from its extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let vocabulary = if has_json_extension(path) {
            let content = std::fs::read_to_string(path).map_err(|e| {
                CritiqueError::model_load(format!(
                    "failed to read vocabulary {}: {e}",
                    path.display()
                ))
            })?;
            Self::from_json_str(&content)
        } else {
            let bytes = std::fs::read(path).map_err(|e| {
                CritiqueError::model_load(format!(
                    "failed to read vocabulary {}: {e}",
                    path.display()
                ))
            })?;
            Self::from_bincode(&bytes)
        }
        .map_err(|e| match e {
            CritiqueError::ModelLoad(msg) => {
                CritiqueError::model_load(format!("{}: {msg}", path.display()))
            }
            other => other,
        })?;

        log::info!(
            "Loaded vocabulary of {} words from {}",
            vocabulary.len(),
            path.display()
        );
        Ok(vocabulary)
    }

    /// Parse either a Keras tokenizer document or a plain `{word: index}` object.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| CritiqueError::model_load(format!("malformed vocabulary JSON: {e}")))?;

        if value.get("class_name").is_some() && value.get("config").is_some() {
            Self::from_keras_value(value)
        } else {
            Self::from_json_map(value)
        }
    }

    /// Parse the document produced by Keras' `Tokenizer.to_json()`.
    pub fn from_keras_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| CritiqueError::model_load(format!("malformed tokenizer JSON: {e}")))?;
        Self::from_keras_value(value)
    }

    fn from_keras_value(value: Value) -> Result<Self> {
        let document: KerasTokenizerDocument = serde_json::from_value(value)
            .map_err(|e| CritiqueError::model_load(format!("malformed tokenizer JSON: {e}")))?;

        if document.class_name != KERAS_CLASS_NAME {
            return Err(CritiqueError::model_load(format!(
                "expected a {KERAS_CLASS_NAME} document, found {:?}",
                document.class_name
            )));
        }

        // `word_index` is stored as a JSON string inside the document.
        let word_index = match document.config.word_index {
            Value::String(encoded) => serde_json::from_str(&encoded).map_err(|e| {
                CritiqueError::model_load(format!("malformed tokenizer word_index: {e}"))
            })?,
            other => Self::parse_word_index(other)?,
        };

        Ok(Self::new(word_index)?
            .with_num_words(document.config.num_words)
            .with_oov_token(document.config.oov_token))
    }

    /// Parse a plain JSON object mapping words to indices.
    pub fn from_json_map(value: Value) -> Result<Self> {
        Self::new(Self::parse_word_index(value)?)
    }

    fn parse_word_index(value: Value) -> Result<AHashMap<String, TokenId>> {
        serde_json::from_value(value).map_err(|e| {
            CritiqueError::model_load(format!("vocabulary must map words to indices: {e}"))
        })
    }

    /// Decode a bincode [`VocabularyArtifact`].
    pub fn from_bincode(bytes: &[u8]) -> Result<Self> {
        let artifact: VocabularyArtifact = bincode::deserialize(bytes)
            .map_err(|e| CritiqueError::model_load(format!("malformed vocabulary artifact: {e}")))?;
        Self::from_artifact(artifact)
    }

    /// Build a vocabulary from its serialized form.
    pub fn from_artifact(artifact: VocabularyArtifact) -> Result<Self> {
        Ok(Self::new(artifact.word_index)?
            .with_num_words(artifact.num_words)
            .with_oov_token(artifact.oov_token))
    }

    /// The serialized form of this vocabulary.
    pub fn to_artifact(&self) -> VocabularyArtifact {
        VocabularyArtifact {
            word_index: self.word_index.clone(),
            num_words: self.num_words,
            oov_token: self.oov_token.clone(),
        }
    }

    /// Render the vocabulary as a Keras tokenizer document.
    pub fn to_keras_json(&self) -> Result<String> {
        let document = KerasTokenizerDocument {
            class_name: KERAS_CLASS_NAME.to_string(),
            config: KerasTokenizerConfig {
                num_words: self.num_words,
                oov_token: self.oov_token.clone(),
                word_index: Value::String(serde_json::to_string(&self.word_index)?),
            },
        };
        Ok(serde_json::to_string(&document)?)
    }

    /// Save the vocabulary, choosing the format from the extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = if has_json_extension(path) {
            self.to_keras_json()?.into_bytes()
        } else {
            bincode::serialize(&self.to_artifact()).map_err(|e| {
                CritiqueError::other(format!("failed to encode vocabulary: {e}"))
            })?
        };
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// The raw index of `word`, ignoring `num_words` and `oov_token`.
    pub fn get(&self, word: &str) -> Option<TokenId> {
        self.word_index.get(word).copied()
    }

    /// The id emitted for `word`, or `None` when the word is dropped.
    pub fn lookup(&self, word: &str) -> Option<TokenId> {
        match self.word_index.get(word) {
            Some(&idx) if self.within_num_words(idx) => Some(idx),
            _ => self.oov_index,
        }
    }

    fn within_num_words(&self, idx: TokenId) -> bool {
        self.num_words.is_none_or(|limit| (idx as usize) < limit)
    }

    /// Map words to ids in order, dropping words without an id.
    pub fn texts_to_sequence<I, S>(&self, words: I) -> Vec<TokenId>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        words
            .into_iter()
            .filter_map(|word| self.lookup(word.as_ref()))
            .collect()
    }

    /// The largest id [`lookup`](Self::lookup) can emit, or `0` if it emits none.
    pub fn max_index(&self) -> TokenId {
        self.word_index
            .values()
            .copied()
            .filter(|&idx| self.within_num_words(idx))
            .chain(self.oov_index)
            .max()
            .unwrap_or(PADDING_VALUE)
    }

    /// Number of words in the table.
    pub fn len(&self) -> usize {
        self.word_index.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.word_index.is_empty()
    }

    pub fn num_words(&self) -> Option<usize> {
        self.num_words
    }

    pub fn oov_token(&self) -> Option<&str> {
        self.oov_token.as_deref()
    }
}

fn has_json_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
