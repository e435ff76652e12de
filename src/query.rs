//! The query engine.
//!
//! Every function here is a pure derivation over a snapshot of the question
//! collection. Nothing is cached: callers recompute whenever the collection,
//! the filter criteria or the sort criteria change.

use std::collections::BTreeSet;

use crate::Question;

mod filter;
pub use filter::{FilterCriteria, LevelFilter};

mod sort;
pub use sort::{FieldValue, SortCriteria, SortDirection, SortField, compare_values};

mod stats;
pub use stats::Stats;

/// Filters `collection` by `filter`, then orders the survivors by `sort`.
///
/// Questions that compare equal under `sort` keep their order from
/// `collection`.
#[must_use]
pub fn compute_filtered_sorted<'a>(
    collection: &'a [Question],
    filter: &FilterCriteria,
    sort: &SortCriteria,
) -> Vec<&'a Question> {
    let mut questions = filter.apply(collection);
    sort.sort(&mut questions);
    questions
}

/// Aggregate counts over the whole collection, ignoring any filter.
#[must_use]
pub fn compute_stats(collection: &[Question]) -> Stats {
    Stats::from_questions(collection)
}

/// The distinct topics in `collection`, in ascending order.
///
/// Topics are compared exactly, so labels differing only in case are both
/// present.
#[must_use]
pub fn compute_topic_vocabulary(collection: &[Question]) -> BTreeSet<&str> {
    collection
        .iter()
        .map(|question| question.topic().as_str())
        .collect()
}

/// Everything the presentation layer renders for one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View<'a> {
    /// The filtered and sorted questions.
    pub questions: Vec<&'a Question>,
    /// Statistics over the full, unfiltered collection.
    pub stats: Stats,
    /// Distinct topics over the full, unfiltered collection.
    pub topics: BTreeSet<&'a str>,
}

/// Recomputes the list, the statistics and the topic vocabulary together.
///
/// The list depends on the criteria; the statistics and vocabulary depend
/// only on `collection`.
#[must_use]
pub fn recompute<'a>(
    collection: &'a [Question],
    filter: &FilterCriteria,
    sort: &SortCriteria,
) -> View<'a> {
    View {
        questions: compute_filtered_sorted(collection, filter, sort),
        stats: compute_stats(collection),
        topics: compute_topic_vocabulary(collection),
    }
}
