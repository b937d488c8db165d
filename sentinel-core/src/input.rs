use encoding_rs::UTF_8;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub const MISSING_INPUT_MESSAGE: &str =
    "Please paste some log entries or upload a file to analyze.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("{}", MISSING_INPUT_MESSAGE)]
    Missing,
    #[error("Uploaded file '{filename}' is empty")]
    EmptyUpload { filename: String },
    #[error("Uploaded file '{filename}' is not valid UTF-8 text{}", detected_hint(.detected))]
    InvalidEncoding {
        filename: String,
        detected: Option<String>,
    },
}

fn detected_hint(detected: &Option<String>) -> String {
    match detected {
        Some(name) => format!(" (looks like {})", name),
        None => String::new(),
    }
}

/// A file received from the upload control, not yet decoded.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputSource {
    Upload { filename: String },
    Pasted,
}

impl InputSource {
    pub fn describe(&self) -> String {
        match self {
            InputSource::Upload { filename } => format!("upload:{}", filename),
            InputSource::Pasted => "pasted".to_string(),
        }
    }
}

/// The block of log text submitted for one analysis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogInput {
    text: String,
    source: InputSource,
}

impl LogInput {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> &InputSource {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.text.lines().filter(|l| !l.trim().is_empty()).count()
    }

    /// Builds input from pasted text, rejecting blank text.
    pub fn from_pasted(text: impl Into<String>) -> Result<Self, InputError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(InputError::Missing);
        }
        Ok(Self {
            text,
            source: InputSource::Pasted,
        })
    }

    /// Decodes an uploaded file as strict UTF-8. A leading BOM is dropped.
    pub fn from_upload(file: UploadedFile) -> Result<Self, InputError> {
        let UploadedFile { filename, bytes } = file;

        let body = match encoding_rs::Encoding::for_bom(&bytes) {
            Some((encoding, bom_len)) if encoding == UTF_8 => &bytes[bom_len..],
            Some((encoding, _)) => {
                warn!("Rejecting upload {} with {} byte order mark", filename, encoding.name());
                return Err(InputError::InvalidEncoding {
                    filename,
                    detected: Some(encoding.name().to_string()),
                });
            }
            None => &bytes[..],
        };

        let text = match UTF_8.decode_without_bom_handling_and_without_replacement(body) {
            Some(text) => text.into_owned(),
            None => {
                warn!("Rejecting upload {}: not valid UTF-8", filename);
                return Err(InputError::InvalidEncoding {
                    filename,
                    detected: None,
                });
            }
        };

        if text.trim().is_empty() {
            return Err(InputError::EmptyUpload { filename });
        }

        Ok(Self {
            text,
            source: InputSource::Upload { filename },
        })
    }
}

/// Picks the single active input source. An uploaded file always wins over
/// pasted text, even when the file turns out to be unusable.
pub fn resolve_input(
    upload: Option<UploadedFile>,
    pasted: Option<&str>,
) -> Result<LogInput, InputError> {
    if let Some(file) = upload {
        debug!(filename = %file.filename, bytes = file.bytes.len(), "Using uploaded file");
        return LogInput::from_upload(file);
    }

    match pasted {
        Some(text) if !text.trim().is_empty() => {
            debug!(bytes = text.len(), "Using pasted text");
            LogInput::from_pasted(text)
        }
        _ => Err(InputError::Missing),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_takes_precedence() {
        let file = UploadedFile::new("auth.log", "Jan 1 sshd[1]: Failed password for root");
        let input = resolve_input(Some(file), Some("pasted entry")).unwrap();
        assert_eq!(input.text(), "Jan 1 sshd[1]: Failed password for root");
        assert_eq!(
            input.source(),
            &InputSource::Upload {
                filename: "auth.log".to_string()
            }
        );
    }

    #[test]
    fn test_pasted_used_without_upload() {
        let input = resolve_input(None, Some("line one\nline two")).unwrap();
        assert_eq!(input.text(), "line one\nline two");
        assert_eq!(input.source(), &InputSource::Pasted);
        assert_eq!(input.line_count(), 2);
    }

    #[test]
    fn test_missing_input() {
        assert_eq!(resolve_input(None, None), Err(InputError::Missing));
        assert_eq!(resolve_input(None, Some("")), Err(InputError::Missing));
        assert_eq!(resolve_input(None, Some("  \n\t")), Err(InputError::Missing));
    }

    #[test]
    fn test_missing_message_matches_constant() {
        assert_eq!(InputError::Missing.to_string(), MISSING_INPUT_MESSAGE);
    }

    #[test]
    fn test_pasted_text_is_not_trimmed() {
        let input = resolve_input(None, Some("  indented entry\n")).unwrap();
        assert_eq!(input.text(), "  indented entry\n");
    }

    #[test]
    fn test_utf8_bom_is_stripped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"{\"eventName\":\"ConsoleLogin\"}");
        let input = LogInput::from_upload(UploadedFile::new("trail.json", bytes)).unwrap();
        assert_eq!(input.text(), "{\"eventName\":\"ConsoleLogin\"}");
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let file = UploadedFile::new("binary.log", vec![0x66, 0x6f, 0xff, 0xfe, 0x6f]);
        let err = resolve_input(Some(file), Some("fallback")).unwrap_err();
        assert_eq!(
            err,
            InputError::InvalidEncoding {
                filename: "binary.log".to_string(),
                detected: None
            }
        );
        assert!(err.to_string().contains("not valid UTF-8"));
    }

    #[test]
    fn test_utf16_upload_rejected_with_hint() {
        let file = UploadedFile::new("win.log", vec![0xFF, 0xFE, b'a', 0x00]);
        let err = LogInput::from_upload(file).unwrap_err();
        assert!(err.to_string().contains("UTF-16LE"));
    }

    #[test]
    fn test_empty_upload_does_not_fall_back() {
        let file = UploadedFile::new("empty.txt", Vec::new());
        let err = resolve_input(Some(file), Some("pasted")).unwrap_err();
        assert_eq!(
            err,
            InputError::EmptyUpload {
                filename: "empty.txt".to_string()
            }
        );
    }
}
