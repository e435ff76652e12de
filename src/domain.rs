//! Domain models for the practice tracker.
//!
//! This module contains the core domain types: questions, their validated
//! fields, and configuration.

/// Question domain model.
pub mod question;
pub use question::{Level, NewQuestion, Question, QuestionId, QuestionUpdate, User};

/// Validated question fields.
pub mod field;
pub use field::{PlatformLink, Topic, ValidationError};

mod config;
pub use config::Config;
