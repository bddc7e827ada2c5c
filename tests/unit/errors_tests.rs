/*!
 * Tests for error types and conversions
 */

use docpair::errors::{AppError, DocumentError, ProviderError, TranslationError};

#[test]
fn test_providerError_requestFailed_shouldDisplayCorrectly() {
    let error = ProviderError::RequestFailed("Connection reset".to_string());
    let display = format!("{}", error);
    assert!(display.contains("API request failed"));
    assert!(display.contains("Connection reset"));
}

#[test]
fn test_providerError_apiError_shouldDisplayStatusAndMessage() {
    let error = ProviderError::ApiError {
        status_code: 429,
        message: "Too many requests".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("429"));
    assert!(display.contains("Too many requests"));
}

#[test]
fn test_providerError_fromStatus_shouldClassifyAuthFailures() {
    assert!(matches!(
        ProviderError::from_status(401, "bad key".to_string()),
        ProviderError::AuthenticationError(_)
    ));
    assert!(matches!(
        ProviderError::from_status(403, "forbidden".to_string()),
        ProviderError::AuthenticationError(_)
    ));
    assert_eq!(
        ProviderError::from_status(500, "boom".to_string()),
        ProviderError::ApiError { status_code: 500, message: "boom".to_string() }
    );
}

#[test]
fn test_translationError_splitMismatch_shouldReportCounts() {
    let error = TranslationError::SplitMismatch { expected: 2, actual: 1 };
    assert_eq!(error.to_string(), "Response split into 1 parts, expected 2");
}

#[test]
fn test_translationError_fromProviderError_shouldWrap() {
    let error: TranslationError = ProviderError::EmptyResponse.into();
    assert!(matches!(error, TranslationError::Provider(ProviderError::EmptyResponse)));
    assert!(error.to_string().contains("API returned no content"));
}

#[test]
fn test_appError_conversions_shouldPickMatchingVariant() {
    let from_document: AppError = DocumentError::Parse("bad zip".to_string()).into();
    assert!(matches!(from_document, AppError::Document(_)));

    let from_translation: AppError = TranslationError::AllUnitsFailed { units: 3 }.into();
    assert!(from_translation.to_string().contains("All 3 translation units failed"));

    let from_io: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
    assert!(matches!(from_io, AppError::File(_)));

    let from_anyhow: AppError = anyhow::anyhow!("something odd").into();
    assert!(matches!(from_anyhow, AppError::Unknown(_)));
}
