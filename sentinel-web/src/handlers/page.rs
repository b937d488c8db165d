use askama::Template;
use axum::{
    extract::{Multipart, State},
    response::Html,
};
use sentinel_core::{TriageOutcome, UploadedFile};

use crate::{
    error_handling::{AppError, AppResult},
    render::markdown_to_html,
    validation::Validator,
    AppState,
};

pub const PROJECT_NAME: &str = "Log Sentinel";
pub const PROJECT_DESCRIPTION: &str = "This log analyzer uses a hosted language model as a \
    security analyst, triaging logs and identifying potential threats. It processes both text \
    and JSON-formatted logs.";

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub project_name: &'static str,
    pub description: &'static str,
    pub accept: String,
    pub pasted: String,
    pub provider: String,
    pub model: String,
    pub warning: Option<String>,
    pub error: Option<String>,
    pub report_html: Option<String>,
}

impl IndexTemplate {
    pub fn new(state: &AppState) -> Self {
        Self {
            project_name: PROJECT_NAME,
            description: PROJECT_DESCRIPTION,
            accept: Validator::accept_attribute(),
            pasted: String::new(),
            provider: state.analyzer.provider_name().to_string(),
            model: state.analyzer.model().to_string(),
            warning: None,
            error: None,
            report_html: None,
        }
    }

    pub fn with_pasted(mut self, pasted: String) -> Self {
        self.pasted = pasted;
        self
    }

    pub fn with_outcome(mut self, outcome: TriageOutcome) -> Self {
        match outcome {
            TriageOutcome::Report(report) => {
                self.report_html = Some(markdown_to_html(&report.markdown));
            }
            TriageOutcome::Warning(message) => self.warning = Some(message),
            TriageOutcome::Error(message) => self.error = Some(message),
        }
        self
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }

    fn into_html(self) -> AppResult<Html<String>> {
        self.render()
            .map(Html)
            .map_err(|e| AppError::internal(format!("Template rendering failed: {}", e)))
    }
}

/// Raw form contents before any validation.
#[derive(Debug, Default)]
struct AnalyzeForm {
    file: Option<(String, Vec<u8>)>,
    logs: String,
}

async fn read_form(multipart: &mut Multipart) -> AppResult<AnalyzeForm> {
    let mut form = AnalyzeForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(format!("Multipart error: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::bad_request(format!("Failed to read file: {}", e)))?;
                form.file = Some((filename, data.to_vec()));
            }
            "logs" => {
                form.logs = field
                    .text()
                    .await
                    .map_err(|e| AppError::bad_request(format!("Failed to read logs: {}", e)))?;
            }
            other => tracing::debug!("Ignoring unexpected form field '{}'", other),
        }
    }

    Ok(form)
}

/// Browsers send an empty, unnamed file part when nothing was chosen.
fn take_upload(
    file: Option<(String, Vec<u8>)>,
    max_upload_size: usize,
) -> AppResult<Option<UploadedFile>> {
    match file {
        None => Ok(None),
        Some((filename, bytes)) if filename.is_empty() && bytes.is_empty() => Ok(None),
        Some((filename, bytes)) => {
            let sanitized = Validator::validate_file_upload(&filename, bytes.len(), max_upload_size)?;
            tracing::info!("Processing uploaded file: '{}' ({} bytes)", sanitized, bytes.len());
            Ok(Some(UploadedFile::new(sanitized, bytes)))
        }
    }
}

pub async fn index(State(state): State<AppState>) -> AppResult<Html<String>> {
    IndexTemplate::new(&state).into_html()
}

pub async fn analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Html<String>> {
    let page = IndexTemplate::new(&state);

    let form = match read_form(&mut multipart).await {
        Ok(form) => form,
        Err(err) => return page.with_error(err.to_string()).into_html(),
    };
    let page = page.with_pasted(form.logs.clone());

    let upload = match take_upload(form.file, state.config.max_upload_size) {
        Ok(upload) => upload,
        Err(err) => return page.with_error(err.to_string()).into_html(),
    };

    let outcome = state.analyzer.run(upload, Some(&form.logs)).await;
    page.with_outcome(outcome).into_html()
}
