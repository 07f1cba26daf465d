//! Editable module draft.
//!
//! The draft is normalized: every list item carries a stable `ItemId`, and
//! edits address items by id rather than by array index, so removing an item
//! in the middle of a list never retargets a pending edit onto its neighbour.
//! Array order is the only ordering; positions are derived from it at save.

use serde::Serialize;

use crate::domain::*;
use crate::error::{AdminError, AdminResult};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Item<T> {
    pub id: ItemId,
    #[serde(flatten)]
    pub value: T,
}

/// Ordered list of draft items. Serialized as `[{"id": ..., ...fields}]`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ItemList<T> {
    items: Vec<Item<T>>,
}

impl<T> Default for ItemList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> ItemList<T> {
    /// Wrap already-ordered values, assigning fresh ids.
    pub fn from_values(values: impl IntoIterator<Item = T>) -> Self {
        Self {
            items: values
                .into_iter()
                .map(|value| Item { id: ItemId::new(), value })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Values in list order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.items.iter().map(|i| &i.value)
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|i| i.id).collect()
    }

    pub fn index_of(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|i| i.id == id)
    }

    pub fn get(&self, id: ItemId) -> Option<&T> {
        self.items.iter().find(|i| i.id == id).map(|i| &i.value)
    }

    /// Insert after `after`, or append when `after` is `None`. Returns the new id.
    pub fn add(&mut self, value: T, after: Option<ItemId>) -> AdminResult<ItemId> {
        let at = match after {
            None => self.items.len(),
            Some(anchor) => self.index_of(anchor).ok_or(AdminError::ItemNotFound(anchor))? + 1,
        };
        let id = ItemId::new();
        self.items.insert(at, Item { id, value });
        Ok(id)
    }

    pub fn update(&mut self, id: ItemId, value: T) -> AdminResult<()> {
        let idx = self.index_of(id).ok_or(AdminError::ItemNotFound(id))?;
        self.items[idx].value = value;
        Ok(())
    }

    pub fn remove(&mut self, id: ItemId) -> AdminResult<T> {
        let idx = self.index_of(id).ok_or(AdminError::ItemNotFound(id))?;
        Ok(self.items.remove(idx).value)
    }

    /// Move an item to `index` (clamped to the last slot).
    pub fn move_to(&mut self, id: ItemId, index: usize) -> AdminResult<()> {
        let from = self.index_of(id).ok_or(AdminError::ItemNotFound(id))?;
        let item = self.items.remove(from);
        let to = index.min(self.items.len());
        self.items.insert(to, item);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Story {
    #[serde(flatten)]
    pub fields: StoryFields,
    pub characters: ItemList<Character>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Grammar {
    #[serde(flatten)]
    pub fields: GrammarFields,
    pub rules: ItemList<GrammarRule>,
    pub examples: ItemList<GrammarExample>,
    pub exercises: ItemList<GrammarExercise>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Pronunciation {
    #[serde(flatten)]
    pub fields: PronunciationFields,
    pub minimal_pairs: ItemList<MinimalPair>,
    pub exercises: ItemList<PronunciationExercise>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Listening {
    #[serde(flatten)]
    pub fields: ListeningFields,
    pub questions: ItemList<ComprehensionQuestion>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Reading {
    #[serde(flatten)]
    pub fields: ReadingFields,
    pub questions: ItemList<ComprehensionQuestion>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Speaking {
    #[serde(flatten)]
    pub fields: SpeakingFields,
    pub exercises: ItemList<SpeakingExercise>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Writing {
    #[serde(flatten)]
    pub fields: WritingFields,
    pub exercises: ItemList<WritingExercise>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Cultural {
    #[serde(flatten)]
    pub fields: CulturalFields,
    pub souvenir: Souvenir,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MissionChallenge {
    #[serde(flatten)]
    pub fields: MissionFields,
    pub requirements: ItemList<Requirement>,
}

/// A whole module as the editor holds it.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ModuleDraft {
    #[serde(flatten)]
    pub fields: ModuleFields,
    pub story: Story,
    pub vocabulary: ItemList<VocabularyItem>,
    pub grammar: Grammar,
    pub pronunciation: Pronunciation,
    pub listening: Listening,
    pub speaking: Speaking,
    pub reading: Reading,
    pub writing: Writing,
    pub cultural: Cultural,
    pub quiz: ItemList<QuizQuestion>,
    pub mission_challenge: MissionChallenge,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(texts: &[&str]) -> ItemList<GrammarRule> {
        ItemList::from_values(texts.iter().map(|t| GrammarRule { rule: (*t).into(), rule_ru: None }))
    }

    fn texts(list: &ItemList<GrammarRule>) -> Vec<&str> {
        list.values().map(|r| r.rule.as_str()).collect()
    }

    #[test]
    fn add_appends_or_inserts_after_anchor() {
        let mut list = rules(&["a", "c"]);
        let first = list.ids()[0];
        list.add(GrammarRule { rule: "b".into(), rule_ru: None }, Some(first)).unwrap();
        list.add(GrammarRule { rule: "d".into(), rule_ru: None }, None).unwrap();
        assert_eq!(texts(&list), vec!["a", "b", "c", "d"]);
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn remove_in_the_middle_keeps_other_ids_stable() {
        let mut list = rules(&["a", "b", "c"]);
        let ids = list.ids();
        let removed = list.remove(ids[1]).unwrap();
        assert_eq!(removed.rule, "b");
        assert_eq!(list.ids(), vec![ids[0], ids[2]]);

        // An edit aimed at "c" still lands on "c" after the shift.
        list.update(ids[2], GrammarRule { rule: "c2".into(), rule_ru: None }).unwrap();
        assert_eq!(texts(&list), vec!["a", "c2"]);
    }

    #[test]
    fn update_preserves_length_and_order() {
        let mut list = rules(&["a", "b", "c"]);
        let ids = list.ids();
        list.update(ids[0], GrammarRule { rule: "A".into(), rule_ru: Some("А".into()) }).unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list.ids(), ids);
        assert_eq!(list.get(ids[0]).and_then(|r| r.rule_ru.as_deref()), Some("А"));
    }

    #[test]
    fn move_to_reorders_and_clamps() {
        let mut list = rules(&["a", "b", "c"]);
        let ids = list.ids();
        list.move_to(ids[0], 99).unwrap();
        assert_eq!(texts(&list), vec!["b", "c", "a"]);
        list.move_to(ids[0], 0).unwrap();
        assert_eq!(texts(&list), vec!["a", "b", "c"]);
        assert_eq!(list.ids(), ids);
    }

    #[test]
    fn unknown_ids_are_reported() {
        let mut list = rules(&["a"]);
        let ghost = ItemId::new();
        assert!(matches!(list.remove(ghost), Err(AdminError::ItemNotFound(id)) if id == ghost));
        assert!(list.add(GrammarRule::default(), Some(ghost)).is_err());
        assert!(list.move_to(ghost, 0).is_err());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn serializes_items_with_their_id() {
        let list = rules(&["a"]);
        let json = serde_json::to_value(&list).unwrap();
        let row = &json.as_array().unwrap()[0];
        assert_eq!(row["rule"], "a");
        assert_eq!(row["id"], serde_json::json!(list.ids()[0]));
    }
}
