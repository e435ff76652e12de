use std::collections::BTreeMap;

use serde::Serialize;

use crate::{Level, Question, User};

/// Aggregate counts over a question collection.
///
/// Stats are always derived from the full collection and never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Number of questions.
    pub total: usize,
    /// Questions Puneet has completed.
    pub completed_by_puneet: usize,
    /// Questions Komal has completed.
    pub completed_by_komal: usize,
    /// Questions at [`Level::Easy`].
    pub easy: usize,
    /// Questions at [`Level::Medium`].
    pub medium: usize,
    /// Questions at [`Level::Hard`].
    pub hard: usize,
    /// Number of questions per topic. Only topics in use appear.
    pub topics: BTreeMap<String, usize>,
}

impl Stats {
    /// Counts `questions` in a single pass.
    #[must_use]
    pub fn from_questions<'a>(questions: impl IntoIterator<Item = &'a Question>) -> Self {
        questions
            .into_iter()
            .fold(Self::default(), |mut stats, question| {
                stats.total += 1;
                stats.completed_by_puneet += usize::from(question.is_completed_by(User::Puneet));
                stats.completed_by_komal += usize::from(question.is_completed_by(User::Komal));
                match question.level() {
                    Level::Easy => stats.easy += 1,
                    Level::Medium => stats.medium += 1,
                    Level::Hard => stats.hard += 1,
                }
                *stats
                    .topics
                    .entry(question.topic().to_string())
                    .or_insert(0) += 1;
                stats
            })
    }

    /// Number of questions `user` has completed.
    #[must_use]
    pub const fn completed(&self, user: User) -> usize {
        match user {
            User::Puneet => self.completed_by_puneet,
            User::Komal => self.completed_by_komal,
        }
    }

    /// Number of questions `user` has not completed yet.
    #[must_use]
    pub const fn remaining(&self, user: User) -> usize {
        self.total.saturating_sub(self.completed(user))
    }

    /// Number of questions at `level`.
    #[must_use]
    pub const fn count(&self, level: Level) -> usize {
        match level {
            Level::Easy => self.easy,
            Level::Medium => self.medium,
            Level::Hard => self.hard,
        }
    }

    /// The `n` most common topics, most common first.
    ///
    /// Topics with the same count are listed alphabetically.
    #[must_use]
    pub fn top_topics(&self, n: usize) -> Vec<(&str, usize)> {
        let mut topics: Vec<(&str, usize)> = self
            .topics
            .iter()
            .map(|(topic, count)| (topic.as_str(), *count))
            .collect();
        topics.sort_by(|a, b| b.1.cmp(&a.1));
        topics.truncate(n);
        topics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::fixtures::{collection, question};

    #[test]
    fn counts_every_dimension() {
        let stats = Stats::from_questions(&collection());

        assert_eq!(stats.total, 4);
        assert_eq!(stats.completed_by_puneet, 2);
        assert_eq!(stats.completed_by_komal, 2);
        assert_eq!(stats.easy, 1);
        assert_eq!(stats.medium, 2);
        assert_eq!(stats.hard, 1);
        assert_eq!(
            stats.topics,
            BTreeMap::from([
                ("Arrays".to_string(), 2),
                ("Dynamic Programming".to_string(), 1),
                ("Graphs".to_string(), 1),
            ])
        );
    }

    #[test]
    fn levels_add_up_to_total() {
        let collection = collection();
        let stats = Stats::from_questions(&collection);

        let by_level: usize = Level::ALL.into_iter().map(|level| stats.count(level)).sum();
        assert_eq!(by_level, stats.total);
    }

    #[test]
    fn topic_counts_add_up_to_total() {
        let stats = Stats::from_questions(&collection());
        assert_eq!(stats.topics.values().sum::<usize>(), stats.total);
    }

    #[test]
    fn empty_collection_has_no_topics() {
        let stats = Stats::from_questions(&Vec::<Question>::new());

        assert_eq!(stats, Stats::default());
        assert!(stats.topics.is_empty());
    }

    #[test]
    fn remaining_is_total_minus_completed() {
        let stats = Stats::from_questions(&collection());

        assert_eq!(stats.remaining(User::Puneet), 2);
        assert_eq!(stats.remaining(User::Komal), 2);
    }

    #[test]
    fn top_topics_orders_by_count_then_name() {
        let collection = vec![
            question("https://a.dev/1", Level::Easy, "Trees", 1),
            question("https://a.dev/2", Level::Easy, "Graphs", 2),
            question("https://a.dev/3", Level::Easy, "Trees", 3),
            question("https://a.dev/4", Level::Easy, "Arrays", 4),
            question("https://a.dev/5", Level::Easy, "Heaps", 5),
        ];
        let stats = Stats::from_questions(&collection);

        assert_eq!(
            stats.top_topics(3),
            vec![("Trees", 2), ("Arrays", 1), ("Graphs", 1)]
        );
        assert_eq!(stats.top_topics(10).len(), 4);
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let stats = Stats::from_questions(&collection());
        let value = serde_json::to_value(&stats).unwrap();

        assert_eq!(value["completedByPuneet"], 2);
        assert_eq!(value["topics"]["Arrays"], 2);
    }
}
