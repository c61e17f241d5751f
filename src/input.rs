//! # Sign Input
//!
//! The content accepted by [`crate::SigningFacade::sign`]. Callers classify
//! their data into a [`SignInput`] variant, either directly or through the
//! `From` conversions below, and the facade routes on the variant alone.

use std::path::PathBuf;

use base64ct::{Base64, Encoding as _};
use serde::Serialize;

use crate::error::{Error, escape};

/// Marks the start of base64 content in a data URL.
const DATA_URL_HEADER: &str = ";base64,";

/// Content to sign.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignInput {
    /// A text payload, base64-encoded before hand-off to the provider.
    Text(String),

    /// A single file.
    File(FileSource),

    /// A batch of files, e.g. the selection of a file-input control. Each
    /// file is signed independently.
    Files(Vec<FileSource>),
}

/// A file to be signed. The whole file is buffered: the provider needs the
/// complete payload rather than a stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileSource {
    /// A file on disk.
    Path(PathBuf),

    /// File content already in memory.
    Bytes {
        /// File name, used for diagnostics.
        name: String,

        /// Raw file content.
        data: Vec<u8>,
    },

    /// A `data:` URL with base64 content, as produced by a browser file
    /// reader.
    DataUrl(String),
}

/// How content passed to the facade is encoded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Encoding {
    /// Plain text. The facade base64-encodes it before hand-off.
    #[default]
    Text,

    /// Already base64-encoded.
    Base64,
}

/// Signing output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Signed {
    /// The signature for a text payload or single file.
    Single(String),

    /// Signatures for a batch of files, in input order.
    Batch(Vec<String>),
}

impl Signed {
    /// Flatten into a list of signatures.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::Single(signature) => vec![signature],
            Self::Batch(signatures) => signatures,
        }
    }
}

impl From<String> for SignInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for SignInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<FileSource> for SignInput {
    fn from(file: FileSource) -> Self {
        Self::File(file)
    }
}

impl From<PathBuf> for SignInput {
    fn from(path: PathBuf) -> Self {
        Self::File(FileSource::Path(path))
    }
}

impl From<Vec<FileSource>> for SignInput {
    fn from(files: Vec<FileSource>) -> Self {
        Self::Files(files)
    }
}

impl From<Vec<PathBuf>> for SignInput {
    fn from(paths: Vec<PathBuf>) -> Self {
        Self::Files(paths.into_iter().map(FileSource::Path).collect())
    }
}

impl FileSource {
    /// In-memory file content.
    pub fn bytes(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self::Bytes {
            name: name.into(),
            data: data.into(),
        }
    }

    /// A name for the file, used in diagnostics.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Bytes { name, .. } => name.clone(),
            Self::DataUrl(_) => "data-url".to_string(),
        }
    }

    /// Buffer the file and return its content as base64.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileReadFailed`] if the file cannot be read or the
    /// data URL does not carry base64 content.
    pub async fn read_base64(&self) -> Result<String, Error> {
        match self {
            Self::Path(path) => {
                let data = tokio::fs::read(path).await.map_err(|e| {
                    let detail = format!("cannot read {}: {e}", path.display());
                    Error::FileReadFailed(escape(detail))
                })?;
                Ok(Base64::encode_string(&data))
            }
            Self::Bytes { data, .. } => Ok(Base64::encode_string(data)),
            Self::DataUrl(url) => data_url_content(url).map(ToString::to_string),
        }
    }
}

/// Strip the data URL header, leaving the base64 content.
///
/// # Errors
///
/// Returns [`Error::FileReadFailed`] if `url` has no `;base64,` header.
pub fn data_url_content(url: &str) -> Result<&str, Error> {
    let Some(start) = url.find(DATA_URL_HEADER) else {
        return Err(Error::FileReadFailed("data URL is not base64-encoded".into()));
    };
    Ok(&url[start + DATA_URL_HEADER.len()..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify() {
        assert_eq!(SignInput::from("hello"), SignInput::Text("hello".into()));
        assert_eq!(
            SignInput::from(PathBuf::from("a.pdf")),
            SignInput::File(FileSource::Path("a.pdf".into()))
        );

        let batch = SignInput::from(vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")]);
        let SignInput::Files(files) = batch else {
            panic!("should be a batch");
        };
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn data_url() {
        let content = data_url_content("data:application/pdf;base64,JVBERi0=").unwrap();
        assert_eq!(content, "JVBERi0=");

        let err = data_url_content("data:text/plain,hello").unwrap_err();
        assert!(matches!(err, Error::FileReadFailed(_)));
    }

    #[tokio::test]
    async fn bytes_to_base64() {
        let file = FileSource::bytes("note.txt", b"hello".to_vec());
        assert_eq!(file.read_base64().await.unwrap(), "aGVsbG8=");
        assert_eq!(file.name(), "note.txt");
    }

    #[test]
    fn flatten() {
        assert_eq!(Signed::Single("a".into()).into_vec(), vec!["a".to_string()]);
        assert_eq!(Signed::Batch(vec!["a".into(), "b".into()]).into_vec().len(), 2);
    }
}
