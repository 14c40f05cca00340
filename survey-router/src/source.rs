//! Document sources and survey loading.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use survey_router_types::{DocumentSource, SourceError, SurveyError};
use tracing::debug;

use crate::Survey;

/// Error type for [`load_survey`].
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("survey '{name}' is unusable: {source}")]
    Survey {
        name: String,
        #[source]
        source: SurveyError,
    },
}

/// Fetch the document `name` from `source` and decode it.
pub fn load_survey(source: &impl DocumentSource, name: &str) -> Result<Survey, LoadError> {
    let text = source.fetch(name)?;
    Survey::from_json_str(&text).map_err(|source| LoadError::Survey {
        name: name.to_string(),
        source,
    })
}

/// Reads `<root>/<name>.json`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.json"))
    }
}

impl DocumentSource for DirectorySource {
    fn fetch(&self, name: &str) -> Result<String, SourceError> {
        let path = self.path_of(name);
        debug!(path = %path.display(), "reading survey document");
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(text),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(SourceError::NotFound(name.to_string()))
            }
            Err(err) => Err(SourceError::backend(
                anyhow::Error::new(err).context(format!("reading {}", path.display())),
            )),
        }
    }
}

/// Serves documents from memory.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    documents: HashMap<String, String>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document under `name`.
    pub fn with_document(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.documents.insert(name.into(), text.into());
        self
    }
}

impl DocumentSource for StaticSource {
    fn fetch(&self, name: &str) -> Result<String, SourceError> {
        self.documents
            .get(name)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(name.to_string()))
    }
}
