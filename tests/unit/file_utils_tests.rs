/*!
 * Tests for file utility functions
 */

use std::fs;
use std::path::PathBuf;

use docpair::file_utils::{FileManager, FileType};

use crate::common;

#[test]
fn test_ensure_dir_withNestedPath_shouldCreateDirectories() {
    let temp_dir = common::create_temp_dir().unwrap();
    let nested = temp_dir.path().join("a").join("b");

    FileManager::ensure_dir(&nested).unwrap();
    assert!(FileManager::dir_exists(&nested));
}

#[test]
fn test_find_files_withMixedContent_shouldReturnSortedMatches() {
    let temp_dir = common::create_temp_dir().unwrap();
    let root = temp_dir.path();
    common::create_test_docx(root, "b.docx", &["B"]).unwrap();
    common::create_test_docx(root, "sub/a.DOCX", &["A"]).unwrap();
    fs::write(root.join("notes.txt"), "not a document").unwrap();

    let files = FileManager::find_files(root, "docx").unwrap();
    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();

    assert_eq!(names, vec!["b.docx", "a.DOCX"]);
}

#[test]
fn test_generate_output_path_withInputFile_shouldUseTranslatedPrefix() {
    let output = FileManager::generate_output_path("in/contract.docx", "out");
    assert_eq!(output, PathBuf::from("out").join("translated_contract.docx"));
    assert!(FileManager::is_translated_output(&output));
}

#[test]
fn test_detect_file_type_withDocxAndImpostor_shouldCheckSignature() {
    let temp_dir = common::create_temp_dir().unwrap();
    let real = common::create_test_docx(temp_dir.path(), "real.docx", &["Hola"]).unwrap();
    let fake = temp_dir.path().join("fake.docx");
    fs::write(&fake, "plain text").unwrap();
    let other = temp_dir.path().join("real.zip");
    fs::copy(&real, &other).unwrap();

    assert_eq!(FileManager::detect_file_type(&real).unwrap(), FileType::Docx);
    assert_eq!(FileManager::detect_file_type(&fake).unwrap(), FileType::Unknown);
    assert_eq!(FileManager::detect_file_type(&other).unwrap(), FileType::Unknown);
    assert!(FileManager::detect_file_type(temp_dir.path().join("missing.docx")).is_err());
}

#[test]
fn test_write_bytes_withMissingParent_shouldCreateIt() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("out").join("file.bin");

    FileManager::write_bytes(&path, b"abc").unwrap();
    assert_eq!(FileManager::read_bytes(&path).unwrap(), b"abc");
}
