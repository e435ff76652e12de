//! A question store persisted as a single JSON document.
//!
//! The [`FileStore`] wraps the filesystem agnostic [`Collection`]. Every
//! mutation is written through to disk before it becomes visible, so a
//! failed write leaves both the file and the in-memory collection as they
//! were.

use std::{
    borrow::Cow,
    fs::{self, File},
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    NewQuestion, Question, QuestionId, QuestionUpdate, User,
    storage::{Collection, QuestionStore, Snapshot, StoreError},
};

/// The on-disk document, tagged with its format version.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Document<'a> {
    #[serde(rename = "1")]
    V1 { questions: Cow<'a, [Question]> },
}

impl Document<'_> {
    fn into_questions(self) -> Vec<Question> {
        match self {
            Self::V1 { questions } => questions.into_owned(),
        }
    }
}

/// A question store backed by a JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    collection: Collection,
}

impl FileStore {
    /// Opens the store at `path`.
    ///
    /// A missing file is treated as an empty collection; it is created on
    /// the first mutation.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if it contains duplicate ids.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let collection = match File::open(&path) {
            Ok(file) => {
                let document: Document<'static> = serde_json::from_reader(BufReader::new(file))?;
                Collection::from_questions(document.into_questions())?
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No question file at {}, starting empty", path.display());
                Collection::default()
            }
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(
            "Loaded {} questions from {}",
            collection.len(),
            path.display()
        );
        Ok(Self { path, collection })
    }

    /// Creates an empty store file at `path` if there is none yet, then
    /// opens it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created, read or parsed.
    pub fn init(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self::open(path)?;
        if !store.path.exists() {
            write_document(&store.path, store.collection.questions())?;
            tracing::info!("Created {}", store.path.display());
        }
        Ok(store)
    }

    /// The path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The in-memory collection.
    #[must_use]
    pub const fn collection(&self) -> &Collection {
        &self.collection
    }

    /// Applies `change` to a copy of the collection, persists the copy and
    /// only then makes it current.
    fn commit<T>(
        &mut self,
        change: impl FnOnce(&mut Collection) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut next = self.collection.clone();
        let value = change(&mut next)?;
        write_document(&self.path, next.questions())?;
        self.collection = next;
        Ok(value)
    }
}

impl QuestionStore for FileStore {
    fn snapshot(&self) -> Snapshot {
        self.collection.snapshot()
    }

    fn create(&mut self, question: NewQuestion) -> Result<Question, StoreError> {
        self.commit(|collection| Ok(collection.create(question)))
    }

    fn update(&mut self, id: QuestionId, update: QuestionUpdate) -> Result<Question, StoreError> {
        self.commit(|collection| collection.update(id, update))
    }

    fn delete(&mut self, id: QuestionId) -> Result<Question, StoreError> {
        self.commit(|collection| collection.delete(id))
    }

    fn toggle_completion(&mut self, id: QuestionId, user: User) -> Result<Question, StoreError> {
        self.commit(|collection| collection.toggle_completion(id, user))
    }

    fn find(&self, id: QuestionId) -> Option<Question> {
        self.collection.get(id).cloned()
    }

    fn resolve(&self, prefix: &str) -> Result<QuestionId, StoreError> {
        self.collection.resolve(prefix)
    }
}

/// Writes the document next to `path` and renames it into place, so readers
/// never observe a half-written file.
fn write_document(path: &Path, questions: &[Question]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    let staging = PathBuf::from(staging);

    let result = write_staging(&staging, questions)
        .and_then(|()| fs::rename(&staging, path).map_err(StoreError::from));
    if result.is_err() && staging.is_file() {
        if let Err(e) = fs::remove_file(&staging) {
            tracing::warn!("Failed to remove {}: {e}", staging.display());
        }
    }
    result?;

    tracing::debug!("Wrote {} questions to {}", questions.len(), path.display());
    Ok(())
}

/// Writes and syncs the staging file.
fn write_staging(staging: &Path, questions: &[Question]) -> Result<(), StoreError> {
    let document = Document::V1 {
        questions: Cow::Borrowed(questions),
    };
    let mut writer = BufWriter::new(File::create(staging)?);
    serde_json::to_writer_pretty(&mut writer, &document)?;
    writer.write_all(b"\n")?;
    let file = writer.into_inner().map_err(io::IntoInnerError::into_error)?;
    file.sync_all()?;
    Ok(())
}
