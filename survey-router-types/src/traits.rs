use crate::SourceError;

/// Trait for collaborators that hand out raw survey documents.
///
/// Sources decide where documents live (a directory of bundled files, an
/// in-memory table, a remote study server). They only return text; decoding
/// is done by the caller, synchronously, once the text has arrived.
pub trait DocumentSource {
    /// Fetch the document registered under `name`.
    ///
    /// # Returns
    /// * `Ok(text)` with the raw JSON text
    /// * `Err(SourceError::NotFound)` if the source has no such document
    /// * `Err(SourceError::Backend)` on any other failure
    fn fetch(&self, name: &str) -> Result<String, SourceError>;
}

impl<T: DocumentSource + ?Sized> DocumentSource for &T {
    fn fetch(&self, name: &str) -> Result<String, SourceError> {
        (**self).fetch(name)
    }
}
