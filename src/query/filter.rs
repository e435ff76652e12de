use std::{fmt, str::FromStr};

use crate::{Level, Question, ValidationError};

/// Restricts the list to one level, or lets every level through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LevelFilter {
    /// No level restriction.
    #[default]
    All,
    /// Only questions of this level.
    Only(Level),
}

impl LevelFilter {
    /// Parses a level filter, treating anything unrecognised as
    /// [`LevelFilter::All`].
    #[must_use]
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }

    /// Returns `true` if a question of `level` passes this filter.
    #[must_use]
    pub fn matches(self, level: Level) -> bool {
        match self {
            Self::All => true,
            Self::Only(only) => only == level,
        }
    }
}

impl From<Level> for LevelFilter {
    fn from(level: Level) -> Self {
        Self::Only(level)
    }
}

impl From<Option<Level>> for LevelFilter {
    fn from(level: Option<Level>) -> Self {
        level.map_or(Self::All, Self::Only)
    }
}

impl FromStr for LevelFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

impl fmt::Display for LevelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Only(level) => write!(f, "{level}"),
        }
    }
}

/// The inclusion predicates applied to the collection before display.
///
/// Each field is inactive when it holds its default value. Active
/// predicates are combined with logical AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Exact, case-sensitive topic match. Empty means no topic filter.
    pub topic: String,
    /// Level restriction.
    pub level: LevelFilter,
    /// Case-insensitive substring of the topic or the link. Empty means no
    /// search filter.
    pub search: String,
}

impl FilterCriteria {
    /// Returns `true` if at least one predicate is active.
    #[must_use]
    pub fn any(&self) -> bool {
        self.level != LevelFilter::All || !self.topic.is_empty() || !self.search.is_empty()
    }

    /// Returns `true` if `question` satisfies every active predicate.
    #[must_use]
    pub fn matches(&self, question: &Question) -> bool {
        Predicates::new(self).matches(question)
    }

    /// The questions of `collection` that satisfy every active predicate,
    /// in their original order.
    #[must_use]
    pub fn apply<'a>(&self, collection: &'a [Question]) -> Vec<&'a Question> {
        let predicates = Predicates::new(self);
        collection
            .iter()
            .filter(|question| predicates.matches(question))
            .collect()
    }
}

/// Filter criteria prepared for matching against many questions.
struct Predicates<'c> {
    level: LevelFilter,
    topic: Option<&'c str>,
    search: Option<String>,
}

impl<'c> Predicates<'c> {
    fn new(criteria: &'c FilterCriteria) -> Self {
        Self {
            level: criteria.level,
            topic: Some(criteria.topic.as_str()).filter(|topic| !topic.is_empty()),
            search: Some(criteria.search.to_lowercase()).filter(|search| !search.is_empty()),
        }
    }

    fn matches(&self, question: &Question) -> bool {
        if !self.level.matches(question.level()) {
            return false;
        }

        if self
            .topic
            .is_some_and(|topic| question.topic().as_str() != topic)
        {
            return false;
        }

        if let Some(search) = &self.search {
            let in_topic = question.topic().to_lowercase().contains(search.as_str());
            if !in_topic && !question.platform_link().to_lowercase().contains(search.as_str()) {
                return false;
            }
        }

        true
    }
}
