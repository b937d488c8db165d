use axum::http::StatusCode;
use thiserror::Error;

/// Maximum allowed filename length
const MAX_FILENAME_LENGTH: usize = 255;

/// Allowed file extensions for log uploads
pub const ALLOWED_EXTENSIONS: &[&str] = &["txt", "log", "json"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Filename cannot be empty")]
    FilenameEmpty,
    #[error("Filename too long: {0} characters (max {})", MAX_FILENAME_LENGTH)]
    FilenameTooLong(usize),
    #[error("Filename contains invalid characters: '{0}'")]
    FilenameInvalid(String),
    #[error("File type '{0}' not allowed. Allowed: {}", ALLOWED_EXTENSIONS.join(", "))]
    FileExtensionNotAllowed(String),
    #[error("File too large: {size} bytes (max {max})")]
    FileTooLarge { size: usize, max: usize },
}

impl ValidationError {
    pub fn to_status_code(&self) -> StatusCode {
        match self {
            ValidationError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE, // 413
            ValidationError::FilenameInvalid(_) => StatusCode::UNPROCESSABLE_ENTITY, // 422
            ValidationError::FileExtensionNotAllowed(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE, // 415
            _ => StatusCode::BAD_REQUEST, // 400
        }
    }

    pub fn to_message(&self) -> String {
        self.to_string()
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;

pub struct Validator;

impl Validator {
    /// Strips any client-side directory part (some browsers send full paths).
    pub fn base_name(filename: &str) -> &str {
        filename
            .rsplit(|c: char| c == '/' || c == '\\')
            .next()
            .unwrap_or(filename)
            .trim()
    }

    /// Validate filename and return its sanitized base name
    pub fn validate_filename(filename: &str) -> ValidationResult<String> {
        let name = Self::base_name(filename);

        if name.is_empty() {
            return Err(ValidationError::FilenameEmpty);
        }

        if name.len() > MAX_FILENAME_LENGTH {
            return Err(ValidationError::FilenameTooLong(name.len()));
        }

        if name == "." || name == ".." || name.chars().any(|c| c.is_control()) {
            return Err(ValidationError::FilenameInvalid(name.escape_debug().to_string()));
        }

        Ok(name.to_string())
    }

    /// Only plain-text log formats are accepted
    pub fn validate_extension(filename: &str) -> ValidationResult<()> {
        let extension = std::path::Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .unwrap_or_default();

        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            let shown = if extension.is_empty() {
                "(none)".to_string()
            } else {
                extension
            };
            return Err(ValidationError::FileExtensionNotAllowed(shown));
        }

        Ok(())
    }

    pub fn validate_file_size(size: usize, max_size: usize) -> ValidationResult<()> {
        if size > max_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: max_size,
            });
        }
        Ok(())
    }

    /// Validate file upload
    pub fn validate_file_upload(
        filename: &str,
        file_size: usize,
        max_size: usize,
    ) -> ValidationResult<String> {
        let sanitized_filename = Self::validate_filename(filename)?;
        Self::validate_extension(&sanitized_filename)?;
        Self::validate_file_size(file_size, max_size)?;
        Ok(sanitized_filename)
    }

    /// Value for the upload control's `accept` attribute
    pub fn accept_attribute() -> String {
        ALLOWED_EXTENSIONS
            .iter()
            .map(|ext| format!(".{}", ext))
            .collect::<Vec<_>>()
            .join(",")
    }
}
