use std::{fmt, ops::Deref, str::FromStr, sync::LazyLock};

use non_empty_string::NonEmptyString;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// `scheme://authority[/rest]`, no whitespace anywhere.
static ABSOLUTE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://[^\s/?#]+[^\s]*$").expect("static regex is valid")
});

/// A free-text topic label, such as `Arrays` or `Dynamic Programming`.
///
/// Topics are not drawn from a fixed vocabulary and are never normalised:
/// `Arrays` and `arrays` are different topics.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Topic(NonEmptyString);

impl Topic {
    /// Creates a new `Topic`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyTopic`] if the string is empty.
    pub fn new(s: String) -> Result<Self, ValidationError> {
        NonEmptyString::new(s)
            .map(Self)
            .map_err(|_| ValidationError::EmptyTopic)
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for Topic {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Topic {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl From<Topic> for String {
    fn from(topic: Topic) -> Self {
        topic.as_str().to_string()
    }
}

impl FromStr for Topic {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl AsRef<str> for Topic {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Deref for Topic {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The absolute URL of a problem on a practice platform.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlatformLink(String);

impl PlatformLink {
    /// Creates a new `PlatformLink`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Link`] unless the string is an absolute URL
    /// of the form `scheme://host...` without whitespace.
    pub fn new(s: String) -> Result<Self, ValidationError> {
        if ABSOLUTE_URL.is_match(&s) {
            Ok(Self(s))
        } else {
            Err(ValidationError::Link(s))
        }
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PlatformLink {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for PlatformLink {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl From<PlatformLink> for String {
    fn from(link: PlatformLink) -> Self {
        link.0
    }
}

impl FromStr for PlatformLink {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl AsRef<str> for PlatformLink {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for PlatformLink {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for PlatformLink {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors raised while validating question input.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The topic was empty.
    #[error("Topic name is required")]
    EmptyTopic,

    /// The platform link was not an absolute URL.
    #[error("Invalid platform link '{0}': expected an absolute URL")]
    Link(String),

    /// The level was not one of Easy, Medium, Hard.
    #[error("Invalid level '{0}': expected one of Easy, Medium, Hard")]
    Level(String),

    /// The user was not one of the tracked people.
    #[error("Invalid user '{0}': expected Puneet or Komal")]
    User(String),
}
