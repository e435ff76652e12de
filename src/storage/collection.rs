//! An in-memory question collection.
//!
//! The [`Collection`] knows nothing about files or subscribers. It owns the
//! questions and enforces the invariants every store relies on: ids are
//! unique and creation timestamps only move forward.

use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use tracing::instrument;

use crate::{
    NewQuestion, Question, QuestionId, QuestionUpdate, User,
    storage::{Snapshot, StoreError, resolve_prefix},
};

/// The set of questions, in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
    /// The questions. Shared with any snapshot handed out, copied on write.
    questions: Snapshot,

    /// An index from id to position in `questions`.
    index: HashMap<QuestionId, usize>,
}

impl Collection {
    /// Builds a collection from previously stored questions.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateId`] if two questions share an id.
    pub fn from_questions(questions: Vec<Question>) -> Result<Self, StoreError> {
        let mut collection = Self::default();
        Arc::make_mut(&mut collection.questions).reserve(questions.len());
        for question in questions {
            collection.insert(question)?;
        }
        Ok(collection)
    }

    /// The current contents, shared rather than copied.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.questions)
    }

    /// The questions in creation order.
    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// The number of questions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Returns `true` if there are no questions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Retrieves a question by id.
    #[must_use]
    pub fn get(&self, id: QuestionId) -> Option<&Question> {
        self.index.get(&id).and_then(|&i| self.questions.get(i))
    }

    /// Resolves a full id or a unique id prefix.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NoMatch`] or [`StoreError::AmbiguousId`] if the
    /// prefix does not identify exactly one question.
    pub fn resolve(&self, prefix: &str) -> Result<QuestionId, StoreError> {
        resolve_prefix(&self.questions, prefix)
    }

    /// Inserts an existing question, keeping its id and timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateId`] if the id is already present.
    pub fn insert(&mut self, question: Question) -> Result<(), StoreError> {
        let id = question.id();
        if self.index.contains_key(&id) {
            return Err(StoreError::DuplicateId(id));
        }
        self.index.insert(id, self.questions.len());
        Arc::make_mut(&mut self.questions).push(question);
        Ok(())
    }

    /// Creates a question stamped with the current time.
    pub fn create(&mut self, question: NewQuestion) -> Question {
        self.create_at(question, Utc::now().timestamp_millis())
    }

    /// Creates a question stamped with `now` (milliseconds since the epoch).
    ///
    /// The timestamp is bumped past the newest existing question if needed,
    /// so that creation order and timestamp order always agree.
    #[instrument(level = "debug", skip(self, question))]
    pub fn create_at(&mut self, question: NewQuestion, now: i64) -> Question {
        let created_at = self
            .latest_created_at()
            .map_or(now, |latest| now.max(latest.saturating_add(1)));

        let mut id = QuestionId::random();
        while self.index.contains_key(&id) {
            id = QuestionId::random();
        }

        let question = Question::new(id, question, created_at);
        self.index.insert(id, self.questions.len());
        Arc::make_mut(&mut self.questions).push(question.clone());
        tracing::debug!(%id, created_at, "created question");
        question
    }

    /// Applies a partial update, returning the updated question.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no question has the id.
    pub fn update(
        &mut self,
        id: QuestionId,
        update: QuestionUpdate,
    ) -> Result<Question, StoreError> {
        let question = self.get_mut(id)?;
        question.apply(update);
        Ok(question.clone())
    }

    /// Flips the completion flag of `user`, returning the updated question.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no question has the id.
    pub fn toggle_completion(&mut self, id: QuestionId, user: User) -> Result<Question, StoreError> {
        let question = self.get_mut(id)?;
        let done = question.toggle_completion(user);
        tracing::debug!(%id, %user, done, "toggled completion");
        Ok(question.clone())
    }

    /// Removes a question, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no question has the id.
    pub fn delete(&mut self, id: QuestionId) -> Result<Question, StoreError> {
        let position = self.index.remove(&id).ok_or(StoreError::NotFound(id))?;
        let removed = Arc::make_mut(&mut self.questions).remove(position);

        // Everything after the removed question moved down by one.
        for i in self.index.values_mut() {
            if *i > position {
                *i -= 1;
            }
        }

        tracing::debug!(%id, "deleted question");
        Ok(removed)
    }

    fn get_mut(&mut self, id: QuestionId) -> Result<&mut Question, StoreError> {
        let &position = self.index.get(&id).ok_or(StoreError::NotFound(id))?;
        Arc::make_mut(&mut self.questions)
            .get_mut(position)
            .ok_or(StoreError::NotFound(id))
    }

    fn latest_created_at(&self) -> Option<i64> {
        self.questions.iter().map(Question::created_at).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Level;

    fn new_question(link: &str, topic: &str) -> NewQuestion {
        NewQuestion::parse(link, "Medium", topic).unwrap()
    }

    #[test]
    fn create_assigns_unique_ids_and_keeps_creation_order() {
        let mut collection = Collection::default();

        let first = collection.create_at(new_question("https://a.dev/1", "Arrays"), 100);
        let second = collection.create_at(new_question("https://a.dev/2", "Graphs"), 200);

        assert_ne!(first.id(), second.id());
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.questions()[0], first);
        assert_eq!(collection.questions()[1], second);
        assert_eq!(collection.get(second.id()), Some(&second));
    }

    #[test]
    fn timestamps_are_strictly_increasing_even_if_the_clock_is_not() {
        let mut collection = Collection::default();

        let first = collection.create_at(new_question("https://a.dev/1", "Arrays"), 500);
        let same_instant = collection.create_at(new_question("https://a.dev/2", "Arrays"), 500);
        let clock_went_back = collection.create_at(new_question("https://a.dev/3", "Arrays"), 10);

        assert_eq!(first.created_at(), 500);
        assert_eq!(same_instant.created_at(), 501);
        assert_eq!(clock_went_back.created_at(), 502);
    }

    #[test]
    fn create_uses_the_wall_clock() {
        let before = Utc::now().timestamp_millis();
        let mut collection = Collection::default();

        let question = collection.create(new_question("https://a.dev/1", "Arrays"));

        assert!(question.created_at() >= before);
        assert!(!question.is_completed_by(User::Puneet));
        assert!(!question.is_completed_by(User::Komal));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut collection = Collection::default();
        let question = collection.create_at(new_question("https://a.dev/1", "Arrays"), 1);

        let error = collection.insert(question.clone()).unwrap_err();

        assert!(matches!(error, StoreError::DuplicateId(id) if id == question.id()));
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn from_questions_rejects_duplicates() {
        let mut collection = Collection::default();
        let question = collection.create_at(new_question("https://a.dev/1", "Arrays"), 1);

        let result = Collection::from_questions(vec![question.clone(), question]);

        assert!(matches!(result, Err(StoreError::DuplicateId(_))));
    }

    #[test]
    fn update_changes_only_the_given_fields() {
        let mut collection = Collection::default();
        let question = collection.create_at(new_question("https://a.dev/1", "Arrays"), 1);

        let updated = collection
            .update(
                question.id(),
                QuestionUpdate {
                    level: Some(Level::Hard),
                    ..QuestionUpdate::default()
                },
            )
            .unwrap();

        assert_eq!(updated.level(), Level::Hard);
        assert_eq!(updated.topic(), question.topic());
        assert_eq!(updated.created_at(), question.created_at());
        assert_eq!(collection.get(question.id()), Some(&updated));
    }

    #[test]
    fn toggle_twice_restores_the_flag() {
        let mut collection = Collection::default();
        let question = collection.create_at(new_question("https://a.dev/1", "Arrays"), 1);

        let toggled = collection
            .toggle_completion(question.id(), User::Puneet)
            .unwrap();
        assert!(toggled.is_completed_by(User::Puneet));
        assert!(!toggled.is_completed_by(User::Komal));

        let restored = collection
            .toggle_completion(question.id(), User::Puneet)
            .unwrap();
        assert_eq!(restored, question);
    }

    #[test]
    fn delete_removes_and_reindexes() {
        let mut collection = Collection::default();
        let first = collection.create_at(new_question("https://a.dev/1", "Arrays"), 1);
        let second = collection.create_at(new_question("https://a.dev/2", "Graphs"), 2);
        let third = collection.create_at(new_question("https://a.dev/3", "Trees"), 3);

        let removed = collection.delete(second.id()).unwrap();

        assert_eq!(removed, second);
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.get(second.id()), None);
        assert_eq!(collection.get(first.id()), Some(&first));
        assert_eq!(collection.get(third.id()), Some(&third));
    }

    #[test]
    fn missing_ids_are_reported() {
        let mut collection = Collection::default();
        let id = QuestionId::random();

        assert!(matches!(
            collection.update(id, QuestionUpdate::default()),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            collection.toggle_completion(id, User::Komal),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(collection.delete(id), Err(StoreError::NotFound(_))));
        assert!(collection.is_empty());
    }

    #[test]
    fn snapshots_do_not_observe_later_mutations() {
        let mut collection = Collection::default();
        collection.create_at(new_question("https://a.dev/1", "Arrays"), 1);

        let before = collection.snapshot();
        collection.create_at(new_question("https://a.dev/2", "Graphs"), 2);

        assert_eq!(before.len(), 1);
        assert_eq!(collection.snapshot().len(), 2);
    }
}
