//! Translation of machine codes (node and edge names) to human-readable names

use std::collections::HashMap;
use std::sync::RwLock;

/// Translates codes to display names. Unknown codes pass through unchanged.
pub trait Vocabulary: Send + Sync {
    fn name(&self, code: &str) -> String;
}

/// Adapts a closure to [`Vocabulary`]
pub struct VocabularyFn<F>(pub F);

impl<F> Vocabulary for VocabularyFn<F>
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn name(&self, code: &str) -> String {
        (self.0)(code)
    }
}

/// Register-based vocabulary
#[derive(Debug, Default)]
pub struct MapVocabulary {
    entries: RwLock<HashMap<String, String>>,
}

impl MapVocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single mapping
    pub fn register(&self, code: impl Into<String>, name: impl Into<String>) -> &Self {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(code.into(), name.into());
        }
        self
    }

    /// Add every mapping from `entries`
    pub fn register_all<I, K, V>(&self, entries: I) -> &Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        if let Ok(mut map) = self.entries.write() {
            for (code, name) in entries {
                map.insert(code.into(), name.into());
            }
        }
        self
    }
}

impl Vocabulary for MapVocabulary {
    fn name(&self, code: &str) -> String {
        self.entries
            .read()
            .ok()
            .and_then(|entries| entries.get(code).cloned())
            .unwrap_or_else(|| code.to_string())
    }
}

/// Tries vocabularies in order; the first translation differing from the code wins
#[derive(Default)]
pub struct ChainVocabulary {
    chain: Vec<Box<dyn Vocabulary>>,
}

impl ChainVocabulary {
    pub fn new(chain: Vec<Box<dyn Vocabulary>>) -> Self {
        Self { chain }
    }

    pub fn with(mut self, vocabulary: impl Vocabulary + 'static) -> Self {
        self.chain.push(Box::new(vocabulary));
        self
    }
}

impl Vocabulary for ChainVocabulary {
    fn name(&self, code: &str) -> String {
        self.chain
            .iter()
            .map(|v| v.name(code))
            .find(|name| name != code)
            .unwrap_or_else(|| code.to_string())
    }
}

/// `"Human Name (code)"`, or just the code when it has no translation
pub fn name_with_code(vocabulary: &dyn Vocabulary, code: &str) -> String {
    let name = vocabulary.name(code);
    if name == code {
        code.to_string()
    } else {
        format!("{} ({})", name, code)
    }
}
