//! Deterministic test doubles for the embedding and generation services

#![allow(dead_code)]

use async_trait::async_trait;
use docqa_core::{Embedder, Generator, Result, NO_INFO_ANSWER};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "did", "do", "does", "have", "how", "in", "is", "it", "of", "the",
    "this", "to", "we", "what", "you",
];

/// Lowercased content words of `text`
pub fn content_words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .filter(|w| !STOPWORDS.contains(&w.as_str()))
        .collect()
}

/// Bag-of-words embedder over a fixed vocabulary, one dimension per word
pub struct VocabularyEmbedder {
    vocabulary: Vec<&'static str>,
    pub calls: AtomicUsize,
}

impl VocabularyEmbedder {
    pub fn new(vocabulary: &[&'static str]) -> Self {
        Self {
            vocabulary: vocabulary.to_vec(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Vocabulary covering the colour fixtures
    pub fn colours() -> Self {
        Self::new(&[
            "sky", "blue", "grass", "green", "color", "capital", "france", "customers",
        ])
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for VocabularyEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let words = content_words(text);
        Ok(self
            .vocabulary
            .iter()
            .map(|v| words.iter().filter(|w| w == v).count() as f32)
            .collect())
    }

    fn dimensions(&self) -> usize {
        self.vocabulary.len()
    }

    fn model_name(&self) -> &str {
        "vocabulary"
    }
}

/// Returns the prompt it receives and records every call
#[derive(Default)]
pub struct EchoGenerator {
    pub prompts: Mutex<Vec<String>>,
}

impl EchoGenerator {
    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl Generator for EchoGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(prompt.to_string())
    }

    fn model_name(&self) -> &str {
        "echo"
    }
}

/// Answers with the first context sentence sharing a content word with the
/// question, and refuses otherwise
pub struct GroundedGenerator;

impl GroundedGenerator {
    fn section<'a>(prompt: &'a str, start: &str, end: &str) -> &'a str {
        prompt
            .split_once(start)
            .and_then(|(_, rest)| rest.split_once(end))
            .map(|(section, _)| section)
            .unwrap_or("")
    }
}

#[async_trait]
impl Generator for GroundedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let context = Self::section(prompt, "CONTEXT:\n", "\n\nRULES:");
        let question = Self::section(prompt, "USER QUESTION:\n", "\n\nANSWER THE");
        let wanted = content_words(question);

        let sentence = context
            .split(['.', '\n'])
            .map(str::trim)
            .find(|s| content_words(s).iter().any(|w| wanted.contains(w)));

        Ok(match sentence {
            Some(s) => format!("{}.", s),
            None => NO_INFO_ANSWER.to_string(),
        })
    }

    fn model_name(&self) -> &str {
        "grounded"
    }
}
