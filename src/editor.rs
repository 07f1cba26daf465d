//! Editor sessions and edit operations.
//!
//! A session owns one `ModuleDraft` plus the Russian-visibility toggle. Edits
//! arrive as a batch of `EditOp`s and are applied all-or-nothing: the batch
//! runs against a copy and only a fully successful copy replaces the draft.
//!
//! Field edits are shallow JSON merges: `{"title": "x"}` touches only `title`.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::config::RuFieldsPolicy;
use crate::domain::ItemId;
use crate::draft::{ItemList, ModuleDraft};
use crate::error::{AdminError, AdminResult};
use crate::payload::{build_create, build_update, PayloadOptions};

/// Scalar block of a section (lists are edited through `ListRef`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Story,
    Grammar,
    Pronunciation,
    Listening,
    Speaking,
    Reading,
    Writing,
    Cultural,
    Souvenir,
    MissionChallenge,
}

/// Every ordered list in a draft.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListRef {
    StoryCharacters,
    Vocabulary,
    GrammarRules,
    GrammarExamples,
    GrammarExercises,
    MinimalPairs,
    PronunciationExercises,
    ListeningQuestions,
    ReadingQuestions,
    SpeakingExercises,
    WritingExercises,
    Quiz,
    MissionRequirements,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditOp {
    SetModule { fields: Value },
    SetSection { section: Section, fields: Value },
    AddItem {
        list: ListRef,
        #[serde(default)]
        value: Value,
        #[serde(default)]
        after: Option<ItemId>,
    },
    UpdateItem { list: ListRef, id: ItemId, value: Value },
    RemoveItem { list: ListRef, id: ItemId },
    MoveItem { list: ListRef, id: ItemId, to: usize },
    SetShowRussian { show: bool },
}

enum ListOp {
    Add { value: Value, after: Option<ItemId> },
    Update { id: ItemId, value: Value },
    Remove { id: ItemId },
    Move { id: ItemId, to: usize },
}

/// Shallow-merge a JSON object into `target`. `null` merges as "not given".
fn merge_into<T: Serialize + DeserializeOwned>(target: &mut T, patch: Value) -> AdminResult<()> {
    let patch = match patch {
        Value::Null => return Ok(()),
        Value::Object(map) => map,
        other => return Err(AdminError::InvalidEdit(format!("expected an object of fields, got {other}"))),
    };
    let mut current = serde_json::to_value(&*target).map_err(|e| AdminError::InvalidEdit(e.to_string()))?;
    if let Value::Object(cur) = &mut current {
        cur.extend(patch);
    }
    *target = serde_json::from_value(current).map_err(|e| AdminError::InvalidEdit(e.to_string()))?;
    Ok(())
}

fn apply_list<T>(list: &mut ItemList<T>, op: ListOp) -> AdminResult<()>
where
    T: Serialize + DeserializeOwned + Default + Clone,
{
    match op {
        ListOp::Add { value, after } => {
            let mut item = T::default();
            merge_into(&mut item, value)?;
            list.add(item, after)?;
        }
        ListOp::Update { id, value } => {
            let mut item = list.get(id).cloned().ok_or(AdminError::ItemNotFound(id))?;
            merge_into(&mut item, value)?;
            list.update(id, item)?;
        }
        ListOp::Remove { id } => {
            list.remove(id)?;
        }
        ListOp::Move { id, to } => list.move_to(id, to)?,
    }
    Ok(())
}

macro_rules! on_list {
    ($draft:expr, $list:expr, $l:ident => $body:expr) => {
        match $list {
            ListRef::StoryCharacters => { let $l = &mut $draft.story.characters; $body }
            ListRef::Vocabulary => { let $l = &mut $draft.vocabulary; $body }
            ListRef::GrammarRules => { let $l = &mut $draft.grammar.rules; $body }
            ListRef::GrammarExamples => { let $l = &mut $draft.grammar.examples; $body }
            ListRef::GrammarExercises => { let $l = &mut $draft.grammar.exercises; $body }
            ListRef::MinimalPairs => { let $l = &mut $draft.pronunciation.minimal_pairs; $body }
            ListRef::PronunciationExercises => { let $l = &mut $draft.pronunciation.exercises; $body }
            ListRef::ListeningQuestions => { let $l = &mut $draft.listening.questions; $body }
            ListRef::ReadingQuestions => { let $l = &mut $draft.reading.questions; $body }
            ListRef::SpeakingExercises => { let $l = &mut $draft.speaking.exercises; $body }
            ListRef::WritingExercises => { let $l = &mut $draft.writing.exercises; $body }
            ListRef::Quiz => { let $l = &mut $draft.quiz; $body }
            ListRef::MissionRequirements => { let $l = &mut $draft.mission_challenge.requirements; $body }
        }
    };
}

fn set_section(draft: &mut ModuleDraft, section: Section, fields: Value) -> AdminResult<()> {
    match section {
        Section::Story => merge_into(&mut draft.story.fields, fields),
        Section::Grammar => merge_into(&mut draft.grammar.fields, fields),
        Section::Pronunciation => merge_into(&mut draft.pronunciation.fields, fields),
        Section::Listening => merge_into(&mut draft.listening.fields, fields),
        Section::Speaking => merge_into(&mut draft.speaking.fields, fields),
        Section::Reading => merge_into(&mut draft.reading.fields, fields),
        Section::Writing => merge_into(&mut draft.writing.fields, fields),
        Section::Cultural => merge_into(&mut draft.cultural.fields, fields),
        Section::Souvenir => merge_into(&mut draft.cultural.souvenir, fields),
        Section::MissionChallenge => merge_into(&mut draft.mission_challenge.fields, fields),
    }
}

/// What a save will send upstream.
#[derive(Clone, Debug, PartialEq)]
pub enum SaveRequest {
    Create(Value),
    Update { module_id: i64, body: Value },
}

impl SaveRequest {
    pub fn body(&self) -> &Value {
        match self {
            Self::Create(body) | Self::Update { body, .. } => body,
        }
    }
}

#[derive(Clone, Debug)]
pub struct EditorSession {
    pub id: Uuid,
    /// `None` until a create has been saved.
    pub module_id: Option<i64>,
    pub draft: ModuleDraft,
    pub show_russian: bool,
}

impl EditorSession {
    pub fn new(module_id: Option<i64>, draft: ModuleDraft, show_russian: bool) -> Self {
        Self { id: Uuid::new_v4(), module_id, draft, show_russian }
    }

    /// Apply a batch atomically. On error the session is unchanged.
    #[instrument(level = "debug", skip(self, ops), fields(session = %self.id, ops = ops.len()))]
    pub fn apply(&mut self, ops: Vec<EditOp>) -> AdminResult<()> {
        let mut draft = self.draft.clone();
        let mut show_russian = self.show_russian;

        for op in ops {
            match op {
                EditOp::SetModule { fields } => merge_into(&mut draft.fields, fields)?,
                EditOp::SetSection { section, fields } => set_section(&mut draft, section, fields)?,
                EditOp::AddItem { list, value, after } => {
                    on_list!(draft, list, l => apply_list(l, ListOp::Add { value, after })?)
                }
                EditOp::UpdateItem { list, id, value } => {
                    on_list!(draft, list, l => apply_list(l, ListOp::Update { id, value })?)
                }
                EditOp::RemoveItem { list, id } => {
                    on_list!(draft, list, l => apply_list(l, ListOp::Remove { id })?)
                }
                EditOp::MoveItem { list, id, to } => {
                    on_list!(draft, list, l => apply_list(l, ListOp::Move { id, to })?)
                }
                EditOp::SetShowRussian { show } => show_russian = show,
            }
        }

        self.draft = draft;
        self.show_russian = show_russian;
        debug!(target: "editor", session = %self.id, "Edit batch applied");
        Ok(())
    }

    pub fn payload_options(&self, policy: RuFieldsPolicy) -> PayloadOptions {
        PayloadOptions { show_russian: self.show_russian, policy }
    }

    /// PATCH body for a bound session, POST body (with title check) otherwise.
    pub fn save_request(&self, policy: RuFieldsPolicy) -> AdminResult<SaveRequest> {
        let opts = self.payload_options(policy);
        match self.module_id {
            Some(module_id) => Ok(SaveRequest::Update { module_id, body: build_update(&self.draft, &opts) }),
            None => Ok(SaveRequest::Create(build_create(&self.draft, &opts)?)),
        }
    }
}
