use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Topic supplied by the caller before the run starts.
pub const TOPIC_KEY: &str = "topic";
/// Written by the searcher role.
pub const RESEARCH_RESULTS_KEY: &str = "research_results";
/// Written by the article generator on every refinement pass.
pub const CURRENT_ARTICLE_KEY: &str = "current_article";
/// Written by the tone checker on every refinement pass.
pub const TONE_CHECKED_KEY: &str = "current_article_tone_checked";
/// Written by the revisor on every refinement pass.
pub const REVISED_KEY: &str = "current_article_revised";
/// Written by the critic on every refinement pass and on the one-shot re-run.
pub const CRITIC_CHECK_KEY: &str = "current_article_critic_check";
/// Written by the formatter at the end of the pipeline.
pub const FORMATTED_ARTICLE_KEY: &str = "formatted_article";

/// Mutable key/value state shared by all roles within one workflow run.
///
/// Created fresh per run and owned by that run; keys are only ever inserted
/// or overwritten, never removed, so the final value of any key is the last
/// value written by the last role in pipeline order that writes it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionState {
    values: BTreeMap<String, Value>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_topic(topic: &str) -> Self {
        let mut state = Self::new();
        state.set(TOPIC_KEY, Value::String(topic.to_string()));
        state
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Returns the value under `key` as text, if it is a string.
    pub fn get_text(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(Value::String(text)) => Some(text),
            _ => None,
        }
    }

    /// The research gate treats absent, `null`, `""`, and `[]` as unusable.
    /// Objects and numbers count as usable findings.
    pub fn has_usable_value(&self, key: &str) -> bool {
        match self.values.get(key) {
            None | Some(Value::Null) => false,
            Some(Value::String(text)) => !text.is_empty(),
            Some(Value::Array(items)) => !items.is_empty(),
            Some(_) => true,
        }
    }
}
