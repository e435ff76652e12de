//! Coding-practice tracker
//!
//! Questions are links to practice problems, tagged with a difficulty level
//! and a topic, and marked as completed per person. The [`query`] functions
//! derive the filtered/sorted list, the statistics and the topic vocabulary
//! from a snapshot of the collection.

pub mod domain;
pub use domain::{
    Config, Level, NewQuestion, PlatformLink, Question, QuestionId, QuestionUpdate, Topic, User,
    ValidationError,
};

/// Pure derivations over a snapshot of the question collection.
pub mod query;
pub use query::{
    FieldValue, FilterCriteria, LevelFilter, SortCriteria, SortDirection, SortField, Stats, View,
    compute_filtered_sorted, compute_stats, compute_topic_vocabulary, recompute,
};

/// Question stores: local file storage and live in-process storage.
pub mod storage;
pub use storage::{
    Collection, FileStore, LiveStore, QuestionStore, Snapshot, StoreError, Subscription,
};
