//! An in-process store that pushes every change to its subscribers.
//!
//! Subscribers always see a complete [`Snapshot`], never a partial
//! mutation. Updates are latest-value: a subscriber that falls behind skips
//! straight to the newest snapshot.

use tokio::sync::watch;

use crate::{
    NewQuestion, Question, QuestionId, QuestionUpdate, User,
    storage::{Collection, QuestionStore, Snapshot, StoreError},
};

/// A question store held in memory and observed through [`Subscription`]s.
#[derive(Debug)]
pub struct LiveStore {
    collection: Collection,
    tx: watch::Sender<Snapshot>,
}

impl Default for LiveStore {
    fn default() -> Self {
        Self::new(Collection::default())
    }
}

impl LiveStore {
    /// Starts a store with the given contents.
    #[must_use]
    pub fn new(collection: Collection) -> Self {
        let (tx, _) = watch::channel(collection.snapshot());
        Self { collection, tx }
    }

    /// Registers a new observer. It starts at the current snapshot.
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        Subscription {
            rx: self.tx.subscribe(),
        }
    }

    /// The number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Replaces the whole collection, as when a newer copy arrives from
    /// elsewhere. The last replacement wins.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateId`] if `questions` repeats an id, in
    /// which case nothing changes.
    pub fn replace(&mut self, questions: Vec<Question>) -> Result<(), StoreError> {
        self.collection = Collection::from_questions(questions)?;
        self.publish();
        Ok(())
    }

    fn publish(&self) {
        self.tx.send_replace(self.collection.snapshot());
        tracing::trace!(
            questions = self.collection.len(),
            subscribers = self.tx.receiver_count(),
            "published snapshot"
        );
    }

    fn mutate<T>(
        &mut self,
        change: impl FnOnce(&mut Collection) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let value = change(&mut self.collection)?;
        self.publish();
        Ok(value)
    }
}

impl QuestionStore for LiveStore {
    fn snapshot(&self) -> Snapshot {
        self.collection.snapshot()
    }

    fn create(&mut self, question: NewQuestion) -> Result<Question, StoreError> {
        self.mutate(|collection| Ok(collection.create(question)))
    }

    fn update(&mut self, id: QuestionId, update: QuestionUpdate) -> Result<Question, StoreError> {
        self.mutate(|collection| collection.update(id, update))
    }

    fn delete(&mut self, id: QuestionId) -> Result<Question, StoreError> {
        self.mutate(|collection| collection.delete(id))
    }

    fn toggle_completion(&mut self, id: QuestionId, user: User) -> Result<Question, StoreError> {
        self.mutate(|collection| collection.toggle_completion(id, user))
    }

    fn find(&self, id: QuestionId) -> Option<Question> {
        self.collection.get(id).cloned()
    }

    fn resolve(&self, prefix: &str) -> Result<QuestionId, StoreError> {
        self.collection.resolve(prefix)
    }
}

/// A handle that observes a [`LiveStore`].
///
/// Dropping the subscription unsubscribes.
#[derive(Debug, Clone)]
pub struct Subscription {
    rx: watch::Receiver<Snapshot>,
}

impl Subscription {
    /// The most recent snapshot, marking it as seen.
    pub fn latest(&mut self) -> Snapshot {
        self.rx.borrow_and_update().clone()
    }

    /// Returns `true` if a snapshot has been published since the last one
    /// this subscription saw.
    ///
    /// A closed store reports no further changes.
    #[must_use]
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Waits for the next change and returns the newest snapshot.
    ///
    /// Returns `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<Snapshot> {
        self.rx.changed().await.ok()?;
        Some(self.latest())
    }
}
