//! Module content models: module scalar fields, the per-section scalar blocks
//! and the row types of every ordered child collection.
//!
//! Every English text has an optional `_ru` sibling. String fields accept
//! `null` from the platform and read it as empty.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::record::ordered;
use crate::util::null_as_default;

/// Stable identity of a draft list item. Assigned when a draft is loaded or
/// an item is added; never sent to the platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub Uuid);

impl ItemId {
  pub fn new() -> Self { Self(Uuid::new_v4()) }
}

impl Default for ItemId {
  fn default() -> Self { Self::new() }
}

impl fmt::Display for ItemId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

// ---------------------------------------------------------------------------
// Module
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleFields {
  #[serde(default, deserialize_with = "null_as_default")] pub title: String,
  #[serde(default)] pub title_ru: Option<String>,
  #[serde(default, deserialize_with = "null_as_default")] pub subtitle: String,
  #[serde(default)] pub subtitle_ru: Option<String>,
  #[serde(default, deserialize_with = "null_as_default")] pub description: String,
  #[serde(default)] pub description_ru: Option<String>,
  #[serde(default, deserialize_with = "null_as_default")] pub level: String,
  #[serde(default, deserialize_with = "null_as_default")] pub duration: String,
  #[serde(default, deserialize_with = "null_as_default")] pub location: String,
  #[serde(default)] pub location_ru: Option<String>,
  #[serde(default, deserialize_with = "null_as_default")] pub region: String,
  #[serde(default)] pub region_ru: Option<String>,
  #[serde(default, alias = "videoUrl")] pub video_url: Option<String>,
  #[serde(default)] pub latitude: Option<f64>,
  #[serde(default)] pub longitude: Option<f64>,
}

// ---------------------------------------------------------------------------
// Story
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StoryFields {
  #[serde(default, deserialize_with = "null_as_default")] pub text: String,
  #[serde(default)] pub text_ru: Option<String>,
  #[serde(default, deserialize_with = "null_as_default")] pub mission: String,
  #[serde(default)] pub mission_ru: Option<String>,
  #[serde(default, deserialize_with = "null_as_default")] pub hint: String,
  #[serde(default)] pub hint_ru: Option<String>,
  #[serde(default, alias = "showTranslation", deserialize_with = "null_as_default")] pub show_translation: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Character {
  #[serde(default, deserialize_with = "null_as_default")] pub name: String,
  #[serde(default)] pub name_ru: Option<String>,
}

// ---------------------------------------------------------------------------
// Vocabulary
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VocabularyItem {
  #[serde(default, deserialize_with = "null_as_default")] pub word: String,
  #[serde(default, deserialize_with = "null_as_default")] pub translation: String,
  #[serde(default)] pub translation_ru: Option<String>,
  #[serde(default)] pub pronunciation: Option<String>,
  #[serde(default, deserialize_with = "null_as_default")] pub example: String,
  #[serde(default)] pub example_ru: Option<String>,
  #[serde(default)] pub audio_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Grammar
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GrammarFields {
  #[serde(default, deserialize_with = "null_as_default")] pub title: String,
  #[serde(default)] pub title_ru: Option<String>,
  #[serde(default, deserialize_with = "null_as_default")] pub explanation: String,
  #[serde(default)] pub explanation_ru: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GrammarRule {
  #[serde(default, deserialize_with = "null_as_default")] pub rule: String,
  #[serde(default)] pub rule_ru: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GrammarExample {
  #[serde(default, deserialize_with = "null_as_default")] pub sentence: String,
  #[serde(default, deserialize_with = "null_as_default")] pub translation: String,
  #[serde(default)] pub translation_ru: Option<String>,
}

/// Options are a plain string list stored on the exercise row itself.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GrammarExercise {
  #[serde(rename = "type", default, deserialize_with = "null_as_default")] pub kind: String,
  #[serde(default, deserialize_with = "null_as_default")] pub question: String,
  #[serde(default)] pub question_ru: Option<String>,
  #[serde(default, deserialize_with = "null_as_default")] pub answer: String,
  #[serde(default, deserialize_with = "null_as_default")] pub options: Vec<String>,
}

// ---------------------------------------------------------------------------
// Pronunciation
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PronunciationFields {
  #[serde(default, deserialize_with = "null_as_default")] pub focus: String,
  #[serde(default)] pub focus_ru: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MinimalPair {
  #[serde(default, deserialize_with = "null_as_default")] pub word_a: String,
  #[serde(default, deserialize_with = "null_as_default")] pub word_b: String,
  #[serde(default, deserialize_with = "null_as_default")] pub sound_a: String,
  #[serde(default, deserialize_with = "null_as_default")] pub sound_b: String,
  #[serde(default)] pub audio_url_a: Option<String>,
  #[serde(default)] pub audio_url_b: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PronunciationExercise {
  #[serde(default, deserialize_with = "null_as_default")] pub prompt: String,
  #[serde(default)] pub prompt_ru: Option<String>,
  #[serde(default, deserialize_with = "null_as_default")] pub answer: String,
  #[serde(default)] pub audio_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Listening / Reading
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ListeningFields {
  #[serde(default)] pub audio_url: Option<String>,
  #[serde(default, deserialize_with = "null_as_default")] pub transcript: String,
  #[serde(default)] pub transcript_ru: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadingFields {
  #[serde(default, deserialize_with = "null_as_default")] pub text: String,
  #[serde(default)] pub text_ru: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionOption {
  #[serde(default, deserialize_with = "null_as_default")] pub text: String,
  #[serde(default)] pub text_ru: Option<String>,
  #[serde(default, alias = "isCorrect", deserialize_with = "null_as_default")] pub is_correct: bool,
}

/// Listening and reading comprehension question. Options keep their own order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ComprehensionQuestion {
  #[serde(rename = "type", default, deserialize_with = "null_as_default")] pub kind: String,
  #[serde(default, deserialize_with = "null_as_default")] pub question: String,
  #[serde(default)] pub question_ru: Option<String>,
  #[serde(default, deserialize_with = "null_as_default")] pub answer: String,
  #[serde(default, deserialize_with = "ordered")] pub options: Vec<QuestionOption>,
}

// ---------------------------------------------------------------------------
// Speaking / Writing
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeakingFields {
  #[serde(default, deserialize_with = "null_as_default")] pub content: String,
  #[serde(default)] pub content_ru: Option<String>,
  #[serde(default, deserialize_with = "null_as_default")] pub hint: String,
  #[serde(default)] pub hint_ru: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeakingExercise {
  #[serde(default, deserialize_with = "null_as_default")] pub prompt: String,
  #[serde(default)] pub prompt_ru: Option<String>,
  #[serde(default, deserialize_with = "null_as_default")] pub expected_response: String,
  #[serde(default)] pub expected_response_ru: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WritingFields {
  #[serde(default, deserialize_with = "null_as_default")] pub content: String,
  #[serde(default)] pub content_ru: Option<String>,
  #[serde(default, deserialize_with = "null_as_default")] pub hint: String,
  #[serde(default)] pub hint_ru: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WritingExercise {
  #[serde(default, deserialize_with = "null_as_default")] pub prompt: String,
  #[serde(default)] pub prompt_ru: Option<String>,
  #[serde(default)] pub min_words: Option<u32>,
  #[serde(default)] pub max_words: Option<u32>,
}

// ---------------------------------------------------------------------------
// Cultural
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CulturalFields {
  #[serde(default, deserialize_with = "null_as_default")] pub title: String,
  #[serde(default)] pub title_ru: Option<String>,
  #[serde(default, deserialize_with = "null_as_default")] pub content: String,
  #[serde(default)] pub content_ru: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Souvenir {
  #[serde(default, deserialize_with = "null_as_default")] pub name: String,
  #[serde(default)] pub name_ru: Option<String>,
  #[serde(default, deserialize_with = "null_as_default")] pub description: String,
  #[serde(default)] pub description_ru: Option<String>,
  #[serde(default, alias = "downloadUrl")] pub download_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Quiz / Mission challenge
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
  #[serde(rename = "type", default, deserialize_with = "null_as_default")] pub kind: String,
  #[serde(default, deserialize_with = "null_as_default")] pub question: String,
  #[serde(default)] pub question_ru: Option<String>,
  #[serde(default, deserialize_with = "null_as_default")] pub answer: String,
  #[serde(default)] pub audio_url: Option<String>,
  #[serde(default, deserialize_with = "ordered")] pub options: Vec<QuestionOption>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MissionFields {
  #[serde(default, deserialize_with = "null_as_default")] pub title: String,
  #[serde(default)] pub title_ru: Option<String>,
  #[serde(default, deserialize_with = "null_as_default")] pub description: String,
  #[serde(default)] pub description_ru: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
  #[serde(default, deserialize_with = "null_as_default")] pub text: String,
  #[serde(default)] pub text_ru: Option<String>,
}
