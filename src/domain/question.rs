use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{PlatformLink, Topic, ValidationError};

/// Globally unique, perpetually stable identifier of a [`Question`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(Uuid);

impl QuestionId {
    /// Generates a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for QuestionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Difficulty classification of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    /// Easy
    Easy,
    /// Medium
    Medium,
    /// Hard
    Hard,
}

impl Level {
    /// Every level, in difficulty order.
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// The display name, which is also the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ValidationError;

    /// Parses a level name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::Level(s.to_string()))
    }
}

/// A person whose completion of each question is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum User {
    /// Puneet
    Puneet,
    /// Komal
    Komal,
}

impl User {
    /// Every tracked user.
    pub const ALL: [Self; 2] = [Self::Puneet, Self::Komal];

    /// The user's display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Puneet => "Puneet",
            Self::Komal => "Komal",
        }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for User {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|user| user.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::User(s.to_string()))
    }
}

/// A tracked coding-practice problem.
///
/// The identity (`id`) and the creation timestamp are assigned by the store
/// when the question is created and never change afterwards. Everything
/// else may be edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub(crate) id: QuestionId,
    pub(crate) platform_link: PlatformLink,
    pub(crate) level: Level,
    pub(crate) topic: Topic,
    pub(crate) completed_by_puneet: bool,
    pub(crate) completed_by_komal: bool,
    pub(crate) created_at: i64,
}

impl Question {
    pub(crate) fn new(id: QuestionId, new: NewQuestion, created_at: i64) -> Self {
        let NewQuestion {
            platform_link,
            level,
            topic,
            completed_by_puneet,
            completed_by_komal,
        } = new;

        Self {
            id,
            platform_link,
            level,
            topic,
            completed_by_puneet,
            completed_by_komal,
            created_at,
        }
    }

    /// The unique, stable identifier of this question.
    #[must_use]
    pub const fn id(&self) -> QuestionId {
        self.id
    }

    /// Link to the problem on its practice platform.
    #[must_use]
    pub const fn platform_link(&self) -> &PlatformLink {
        &self.platform_link
    }

    /// Difficulty level.
    #[must_use]
    pub const fn level(&self) -> Level {
        self.level
    }

    /// Topic label.
    #[must_use]
    pub const fn topic(&self) -> &Topic {
        &self.topic
    }

    /// Milliseconds since the Unix epoch at which the question was created.
    #[must_use]
    pub const fn created_at(&self) -> i64 {
        self.created_at
    }

    /// Whether the given user has completed this question.
    #[must_use]
    pub const fn is_completed_by(&self, user: User) -> bool {
        match user {
            User::Puneet => self.completed_by_puneet,
            User::Komal => self.completed_by_komal,
        }
    }

    /// Flips the completion flag of `user`, returning the new value.
    pub(crate) fn toggle_completion(&mut self, user: User) -> bool {
        let flag = match user {
            User::Puneet => &mut self.completed_by_puneet,
            User::Komal => &mut self.completed_by_komal,
        };
        *flag = !*flag;
        *flag
    }

    /// Applies a partial update. Identity and creation time are untouched.
    pub(crate) fn apply(&mut self, update: QuestionUpdate) {
        let QuestionUpdate {
            platform_link,
            level,
            topic,
            completed_by_puneet,
            completed_by_komal,
        } = update;

        if let Some(platform_link) = platform_link {
            self.platform_link = platform_link;
        }
        if let Some(level) = level {
            self.level = level;
        }
        if let Some(topic) = topic {
            self.topic = topic;
        }
        if let Some(done) = completed_by_puneet {
            self.completed_by_puneet = done;
        }
        if let Some(done) = completed_by_komal {
            self.completed_by_komal = done;
        }
    }
}

/// Input for creating a question; the store assigns `id` and `createdAt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    /// Link to the problem.
    pub platform_link: PlatformLink,
    /// Difficulty level.
    pub level: Level,
    /// Topic label.
    pub topic: Topic,
    /// Initial completion flag for Puneet.
    pub completed_by_puneet: bool,
    /// Initial completion flag for Komal.
    pub completed_by_komal: bool,
}

impl NewQuestion {
    /// A question that nobody has completed yet.
    #[must_use]
    pub const fn new(platform_link: PlatformLink, level: Level, topic: Topic) -> Self {
        Self {
            platform_link,
            level,
            topic,
            completed_by_puneet: false,
            completed_by_komal: false,
        }
    }

    /// Validates raw text input and builds a question.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the link is not an absolute URL, the
    /// level is unknown, or the topic is empty.
    pub fn parse(platform_link: &str, level: &str, topic: &str) -> Result<Self, ValidationError> {
        Ok(Self::new(
            platform_link.parse()?,
            level.parse()?,
            topic.parse()?,
        ))
    }
}

/// A partial update to a question.
///
/// Only the fields that are `Some` are changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionUpdate {
    /// New link.
    pub platform_link: Option<PlatformLink>,
    /// New level.
    pub level: Option<Level>,
    /// New topic.
    pub topic: Option<Topic>,
    /// New completion flag for Puneet.
    pub completed_by_puneet: Option<bool>,
    /// New completion flag for Komal.
    pub completed_by_komal: Option<bool>,
}

impl QuestionUpdate {
    /// Returns `true` if the update would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.platform_link.is_none()
            && self.level.is_none()
            && self.topic.is_none()
            && self.completed_by_puneet.is_none()
            && self.completed_by_komal.is_none()
    }
}
