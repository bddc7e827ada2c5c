/*!
 * Controller tests on real files in temporary directories
 */

use std::sync::Arc;

use docpair::app_config::Config;
use docpair::app_controller::{Controller, FileOutcome, FolderSummary};
use docpair::providers::mock::MockProvider;
use docpair::translation::{InstructionContext, TranslationService};

use crate::common;

fn controller(provider: &MockProvider) -> Controller {
    Controller::with_service(Config::default(), TranslationService::new(Arc::new(provider.clone())))
}

fn context() -> InstructionContext {
    InstructionContext::new("general", "Spanish", "English", "")
}

#[tokio::test]
async fn test_run_withDefaultOutput_shouldWriteTranslatedCopyNextToInput() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_docx(temp_dir.path(), "carta.docx", &["Hola", "Mundo"]).unwrap();
    let provider = MockProvider::working();

    let outcome = controller(&provider).run(input.clone(), None, &context(), false).await.unwrap();

    let expected_path = temp_dir.path().join("translated_carta.docx");
    match outcome {
        FileOutcome::Translated { output_path, report } => {
            assert_eq!(output_path, expected_path);
            assert_eq!(report.units_translated, 1);
            assert!(report.token_usage.total_tokens > 0);
            assert!(report.token_usage.summary().contains("Total tokens:"));
        }
        other => panic!("expected translation, got {:?}", other),
    }

    let output = std::fs::read(&expected_path).unwrap();
    assert_eq!(common::paragraph_texts(&output), vec!["[TRANSLATED] Hola", "[TRANSLATED] Mundo"]);
    // Input untouched
    assert_eq!(common::paragraph_texts(&std::fs::read(&input).unwrap()), vec!["Hola", "Mundo"]);
}

#[tokio::test]
async fn test_run_withExistingOutput_shouldSkipUnlessForced() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_docx(temp_dir.path(), "a.docx", &["Hola"]).unwrap();
    let output = temp_dir.path().join("custom").join("out.docx");
    let provider = MockProvider::working();
    let controller = controller(&provider);

    let first = controller.run(input.clone(), Some(output.clone()), &context(), false).await.unwrap();
    assert!(matches!(first, FileOutcome::Translated { .. }));
    assert!(output.exists());

    let second = controller.run(input.clone(), Some(output.clone()), &context(), false).await.unwrap();
    assert!(matches!(second, FileOutcome::Skipped { .. }));
    assert_eq!(provider.request_count(), 1);

    let third = controller.run(input, Some(output), &context(), true).await.unwrap();
    assert!(matches!(third, FileOutcome::Translated { .. }));
    assert_eq!(provider.request_count(), 2);
}

#[tokio::test]
async fn test_run_withTotalFailure_shouldFailAndWriteNothing() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_docx(temp_dir.path(), "a.docx", &["Hola", "Mundo"]).unwrap();

    let result = controller(&MockProvider::failing()).run(input, None, &context(), false).await;

    assert!(result.is_err());
    assert!(!temp_dir.path().join("translated_a.docx").exists());
}

#[tokio::test]
async fn test_run_withNonDocxInput_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = temp_dir.path().join("notes.txt");
    std::fs::write(&input, "Hola").unwrap();

    let result = controller(&MockProvider::working()).run(input, None, &context(), false).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_runFolder_withMixedFiles_shouldTranslateEachSourceOnce() {
    let temp_dir = common::create_temp_dir().unwrap();
    let root = temp_dir.path();
    common::create_test_docx(root, "one.docx", &["Uno"]).unwrap();
    common::create_test_docx(root, "nested/two.docx", &["Dos"]).unwrap();
    common::create_test_docx(root, "translated_old.docx", &["Viejo"]).unwrap();
    std::fs::write(root.join("broken.docx"), "not a zip").unwrap();
    let provider = MockProvider::working();

    let summary = controller(&provider).run_folder(root.to_path_buf(), &context(), false).await.unwrap();

    assert_eq!(summary, FolderSummary { translated: 2, skipped: 0, failed: 1 });
    assert!(root.join("translated_one.docx").exists());
    assert!(root.join("nested").join("translated_two.docx").exists());
    assert!(!root.join("translated_translated_old.docx").exists());

    // A second run finds every output in place
    let again = controller(&provider).run_folder(root.to_path_buf(), &context(), false).await.unwrap();
    assert_eq!(again, FolderSummary { translated: 0, skipped: 2, failed: 1 });
}

#[tokio::test]
async fn test_runFolder_withoutDocuments_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    let result = controller(&MockProvider::working())
        .run_folder(temp_dir.path().to_path_buf(), &context(), false)
        .await;
    assert!(result.is_err());
}

#[test]
fn test_checkConnection_withFailingProvider_shouldFail() {
    let result = tokio_test::block_on(async {
        let working = controller(&MockProvider::working()).check_connection().await;
        let failing = controller(&MockProvider::failing()).check_connection().await;
        (working.is_ok(), failing.is_err())
    });
    assert_eq!(result, (true, true));
}
