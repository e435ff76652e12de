use std::{io, sync::Arc};

use crate::{NewQuestion, Question, QuestionId, QuestionUpdate, User};

mod collection;
pub use collection::Collection;

/// Local, file-backed storage.
pub mod file;
pub use file::FileStore;

/// In-process storage with change notification.
pub mod live;
pub use live::{LiveStore, Subscription};

/// An immutable view of the question collection at one instant.
///
/// Snapshots are cheap to clone and never change once handed out; later
/// mutations produce new snapshots.
pub type Snapshot = Arc<Vec<Question>>;

/// The durable holder of the question collection.
///
/// The store is the only writer of questions. Readers take a [`Snapshot`]
/// and derive everything else from it.
pub trait QuestionStore {
    /// The current contents of the store.
    fn snapshot(&self) -> Snapshot;

    /// Adds a question, assigning its id and creation time.
    ///
    /// # Errors
    ///
    /// Returns an error if the change cannot be persisted.
    fn create(&mut self, question: NewQuestion) -> Result<Question, StoreError>;

    /// Changes the fields set in `update`, returning the updated question.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no question has the id, or an
    /// error if the change cannot be persisted.
    fn update(&mut self, id: QuestionId, update: QuestionUpdate) -> Result<Question, StoreError>;

    /// Removes a question, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no question has the id, or an
    /// error if the change cannot be persisted.
    fn delete(&mut self, id: QuestionId) -> Result<Question, StoreError>;

    /// Flips the completion flag of `user` on a question.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no question has the id, or an
    /// error if the change cannot be persisted.
    fn toggle_completion(&mut self, id: QuestionId, user: User) -> Result<Question, StoreError>;

    /// Looks up a question by id.
    fn find(&self, id: QuestionId) -> Option<Question> {
        self.snapshot()
            .iter()
            .find(|question| question.id() == id)
            .cloned()
    }

    /// Resolves a full id or a unique id prefix.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NoMatch`] if nothing matches and
    /// [`StoreError::AmbiguousId`] if more than one question matches.
    fn resolve(&self, prefix: &str) -> Result<QuestionId, StoreError> {
        resolve_prefix(&self.snapshot(), prefix)
    }
}

/// Finds the single question whose id starts with `prefix` (ignoring case).
pub(crate) fn resolve_prefix(questions: &[Question], prefix: &str) -> Result<QuestionId, StoreError> {
    let prefix = prefix.trim().to_ascii_lowercase();
    if prefix.is_empty() {
        return Err(StoreError::NoMatch(prefix));
    }

    let mut matches = questions
        .iter()
        .map(Question::id)
        .filter(|id| id.to_string().starts_with(&prefix));

    match (matches.next(), matches.count()) {
        (Some(id), 0) => Ok(id),
        (Some(_), others) => Err(StoreError::AmbiguousId {
            prefix,
            count: others + 1,
        }),
        (None, _) => Err(StoreError::NoMatch(prefix)),
    }
}

/// Errors raised by question stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No question has the given id.
    #[error("Question {0} not found")]
    NotFound(QuestionId),

    /// No question id starts with the given prefix.
    #[error("No question matches '{0}'")]
    NoMatch(String),

    /// More than one question id starts with the given prefix.
    #[error("'{prefix}' matches {count} questions; use a longer prefix")]
    AmbiguousId {
        /// The prefix that was looked up.
        prefix: String,
        /// How many questions it matched.
        count: usize,
    },

    /// Two questions share an id.
    #[error("Duplicate question id {0}")]
    DuplicateId(QuestionId),

    /// The backing file could not be read or written.
    #[error("failed to access the question store")]
    Io(#[from] io::Error),

    /// The backing file could not be parsed.
    #[error("failed to parse the question store")]
    Json(#[from] serde_json::Error),
}
