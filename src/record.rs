//! Persistence-shaped module record as returned by `GET /api/modules/admin/:id`
//! and its flattening into an editable `ModuleDraft`.
//!
//! Child rows carry a stored `position`; rows are sorted by it on read (rows
//! without one keep their array order, after the positioned ones). Row ids and
//! foreign keys are ignored.

use serde::{Deserialize, Deserializer};

use crate::domain::*;
use crate::draft::*;

#[derive(Deserialize)]
struct Positioned<T> {
  #[serde(default)]
  position: Option<i64>,
  #[serde(flatten)]
  value: T,
}

/// Deserialize a list of positioned rows into values sorted by position.
/// `null` reads as an empty list.
pub fn ordered<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  let mut rows = Option::<Vec<Positioned<T>>>::deserialize(d)?.unwrap_or_default();
  rows.sort_by_key(|r| r.position.unwrap_or(i64::MAX));
  Ok(rows.into_iter().map(|r| r.value).collect())
}

#[derive(Debug, Deserialize)]
pub struct StoryRecord {
  #[serde(flatten)] pub fields: StoryFields,
  #[serde(default, deserialize_with = "ordered")] pub characters: Vec<Character>,
}

#[derive(Debug, Deserialize)]
pub struct GrammarRecord {
  #[serde(flatten)] pub fields: GrammarFields,
  #[serde(default, deserialize_with = "ordered")] pub rules: Vec<GrammarRule>,
  #[serde(default, deserialize_with = "ordered")] pub examples: Vec<GrammarExample>,
  #[serde(default, deserialize_with = "ordered")] pub exercises: Vec<GrammarExercise>,
}

#[derive(Debug, Deserialize)]
pub struct PronunciationRecord {
  #[serde(flatten)] pub fields: PronunciationFields,
  #[serde(default, alias = "minimalPairs", deserialize_with = "ordered")] pub minimal_pairs: Vec<MinimalPair>,
  #[serde(default, deserialize_with = "ordered")] pub exercises: Vec<PronunciationExercise>,
}

#[derive(Debug, Deserialize)]
pub struct ListeningRecord {
  #[serde(flatten)] pub fields: ListeningFields,
  #[serde(default, deserialize_with = "ordered")] pub questions: Vec<ComprehensionQuestion>,
}

#[derive(Debug, Deserialize)]
pub struct ReadingRecord {
  #[serde(flatten)] pub fields: ReadingFields,
  #[serde(default, deserialize_with = "ordered")] pub questions: Vec<ComprehensionQuestion>,
}

#[derive(Debug, Deserialize)]
pub struct SpeakingRecord {
  #[serde(flatten)] pub fields: SpeakingFields,
  #[serde(default, deserialize_with = "ordered")] pub exercises: Vec<SpeakingExercise>,
}

#[derive(Debug, Deserialize)]
pub struct WritingRecord {
  #[serde(flatten)] pub fields: WritingFields,
  #[serde(default, deserialize_with = "ordered")] pub exercises: Vec<WritingExercise>,
}

#[derive(Debug, Deserialize)]
pub struct CulturalRecord {
  #[serde(flatten)] pub fields: CulturalFields,
  #[serde(default)] pub souvenir: Option<Souvenir>,
}

#[derive(Debug, Deserialize)]
pub struct MissionChallengeRecord {
  #[serde(flatten)] pub fields: MissionFields,
  #[serde(default, deserialize_with = "ordered")] pub requirements: Vec<Requirement>,
}

/// Module with every relation included. Absent one-to-one blocks are `None`.
#[derive(Debug, Deserialize)]
pub struct ModuleRecord {
  #[serde(default)] pub id: Option<i64>,
  #[serde(flatten)] pub fields: ModuleFields,
  #[serde(default)] pub story: Option<StoryRecord>,
  #[serde(default, deserialize_with = "ordered")] pub vocabulary: Vec<VocabularyItem>,
  #[serde(default)] pub grammar: Option<GrammarRecord>,
  #[serde(default)] pub pronunciation: Option<PronunciationRecord>,
  #[serde(default)] pub listening: Option<ListeningRecord>,
  #[serde(default)] pub speaking: Option<SpeakingRecord>,
  #[serde(default)] pub reading: Option<ReadingRecord>,
  #[serde(default)] pub writing: Option<WritingRecord>,
  #[serde(default)] pub cultural: Option<CulturalRecord>,
  #[serde(default, deserialize_with = "ordered")] pub quiz: Vec<QuizQuestion>,
  #[serde(default, alias = "missionChallenge")] pub mission_challenge: Option<MissionChallengeRecord>,
}

impl From<ModuleRecord> for ModuleDraft {
  fn from(r: ModuleRecord) -> Self {
    let story = r.story.map(|s| Story {
      fields: s.fields,
      characters: ItemList::from_values(s.characters),
    });
    let grammar = r.grammar.map(|g| Grammar {
      fields: g.fields,
      rules: ItemList::from_values(g.rules),
      examples: ItemList::from_values(g.examples),
      exercises: ItemList::from_values(g.exercises),
    });
    let pronunciation = r.pronunciation.map(|p| Pronunciation {
      fields: p.fields,
      minimal_pairs: ItemList::from_values(p.minimal_pairs),
      exercises: ItemList::from_values(p.exercises),
    });
    let listening = r.listening.map(|l| Listening {
      fields: l.fields,
      questions: ItemList::from_values(l.questions),
    });
    let reading = r.reading.map(|l| Reading {
      fields: l.fields,
      questions: ItemList::from_values(l.questions),
    });
    let speaking = r.speaking.map(|s| Speaking {
      fields: s.fields,
      exercises: ItemList::from_values(s.exercises),
    });
    let writing = r.writing.map(|w| Writing {
      fields: w.fields,
      exercises: ItemList::from_values(w.exercises),
    });
    let cultural = r.cultural.map(|c| Cultural {
      fields: c.fields,
      souvenir: c.souvenir.unwrap_or_default(),
    });
    let mission_challenge = r.mission_challenge.map(|m| MissionChallenge {
      fields: m.fields,
      requirements: ItemList::from_values(m.requirements),
    });

    ModuleDraft {
      fields: r.fields,
      story: story.unwrap_or_default(),
      vocabulary: ItemList::from_values(r.vocabulary),
      grammar: grammar.unwrap_or_default(),
      pronunciation: pronunciation.unwrap_or_default(),
      listening: listening.unwrap_or_default(),
      speaking: speaking.unwrap_or_default(),
      reading: reading.unwrap_or_default(),
      writing: writing.unwrap_or_default(),
      cultural: cultural.unwrap_or_default(),
      quiz: ItemList::from_values(r.quiz),
      mission_challenge: mission_challenge.unwrap_or_default(),
    }
  }
}
