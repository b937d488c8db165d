use axum::{http::StatusCode, response::IntoResponse};
use sentinel_core::InputError;
use sentinel_web::error_handling::AppError;
use sentinel_web::validation::ValidationError;

#[test]
fn test_app_error_validation() {
    let error = AppError::validation("Invalid input");

    let response = error.into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn test_app_error_bad_request() {
    let error = AppError::bad_request("Bad request");

    let response = error.into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn test_app_error_internal() {
    let error = AppError::internal("Internal error");

    let response = error.into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_app_error_ai_provider() {
    let error = AppError::ai_provider("gemini", "quota exceeded");

    let response = error.into_response();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[test]
fn test_app_error_file_processing() {
    let error = AppError::file_processing("Failed to process file");

    let response = error.into_response();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[test]
fn test_upload_rejections_keep_their_status() {
    let cases = [
        (ValidationError::FilenameEmpty, StatusCode::BAD_REQUEST),
        (
            ValidationError::FileExtensionNotAllowed("exe".to_string()),
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
        ),
        (
            ValidationError::FileTooLarge { size: 20, max: 10 },
            StatusCode::PAYLOAD_TOO_LARGE,
        ),
    ];

    for (rejection, status) in cases {
        let app_error: AppError = rejection.into();
        assert_eq!(app_error.into_response().status(), status);
    }
}

#[test]
fn test_app_error_from_input_error() {
    let missing: AppError = InputError::Missing.into();
    assert_eq!(missing.into_response().status(), StatusCode::BAD_REQUEST);

    let empty: AppError = InputError::EmptyUpload {
        filename: "empty.log".to_string(),
    }
    .into();
    assert_eq!(empty.into_response().status(), StatusCode::BAD_REQUEST);

    let encoding: AppError = InputError::InvalidEncoding {
        filename: "utf16.log".to_string(),
        detected: Some("UTF-16LE".to_string()),
    }
    .into();
    assert_eq!(
        encoding.into_response().status(),
        StatusCode::UNPROCESSABLE_ENTITY
    );
}

#[test]
fn test_error_display_messages() {
    let error = AppError::validation("Please paste some log entries or upload a file to analyze.");
    assert_eq!(
        error.to_string(),
        "Validation error: Please paste some log entries or upload a file to analyze."
    );

    let error = AppError::ai_provider("openai", "Rate limited: quota exceeded");
    assert_eq!(
        error.to_string(),
        "AI provider error: openai - Rate limited: quota exceeded"
    );
}
