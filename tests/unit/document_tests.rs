/*!
 * Tests for .docx extraction and write-back
 */

use docpair::document::{self, docx::MAIN_PART};
use docpair::errors::DocumentError;

use crate::common;

#[test]
fn test_extract_withPlainParagraphs_shouldKeepOrderAndEmpties() {
    let bytes = common::build_docx(&["Hola", "", "  ", "Mundo"]);
    let docx = document::extract(&bytes).unwrap();
    let doc = docx.document();

    assert_eq!(doc.texts(), vec!["Hola", "", "  ", "Mundo"]);
    assert_eq!(doc.translatable_positions(), vec![0, 3]);
    assert_eq!(doc.modified_count(), 0);
}

#[test]
fn test_extract_withNonZipBytes_shouldFailWithParseError() {
    let result = document::extract(b"this is not a document");
    assert!(matches!(result, Err(DocumentError::Parse(_))));
}

#[test]
fn test_extract_withMalformedXml_shouldFailWithParseError() {
    let bytes = common::build_docx_from_body("<w:p><w:r><w:t>Broken</w:r></w:p>");
    assert!(matches!(document::extract(&bytes), Err(DocumentError::Parse(_))));
}

#[test]
fn test_extract_withoutMainPart_shouldFailWithMissingPart() {
    use std::io::{Cursor, Write};
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    zip.start_file("word/styles.xml", zip::write::SimpleFileOptions::default()).unwrap();
    zip.write_all(common::STYLES.as_bytes()).unwrap();
    let bytes = zip.finish().unwrap().into_inner();

    match document::extract(&bytes) {
        Err(DocumentError::MissingPart(part)) => assert_eq!(part, MAIN_PART),
        other => panic!("expected missing part, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_toBytes_withoutChanges_shouldKeepEveryPartIdentical() {
    let bytes = common::build_docx(&["Hola", "Mundo"]);
    let docx = document::extract(&bytes).unwrap();
    let output = docx.to_bytes().unwrap();

    assert_eq!(common::part_names(&output), common::part_names(&bytes));
    for name in common::part_names(&bytes) {
        assert_eq!(common::read_part(&output, &name), common::read_part(&bytes, &name), "part {}", name);
    }
}

#[test]
fn test_toBytes_withChangedParagraph_shouldRewriteOnlyThatParagraph() {
    let body = format!(
        "{}<w:p><w:pPr><w:pStyle w:val=\"Heading1\"/></w:pPr><w:r><w:rPr><w:i/></w:rPr><w:t>Adiós</w:t></w:r><w:r><w:t> amigo</w:t></w:r></w:p>{}",
        common::paragraph_xml("Hola"),
        "<w:tbl><w:tr><w:tc><w:p><w:r><w:t>Celda</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"
    );
    let bytes = common::build_docx_from_body(&body);
    let mut docx = document::extract(&bytes).unwrap();
    assert_eq!(docx.document().texts(), vec!["Hola", "Adiós amigo"]);

    docx.document_mut().element_mut(1).unwrap().set_text("Goodbye friend");
    let output = docx.to_bytes().unwrap();

    assert_eq!(common::paragraph_texts(&output), vec!["Hola", "Goodbye friend"]);

    let xml = String::from_utf8(common::read_part(&output, MAIN_PART)).unwrap();
    assert!(xml.contains(&common::paragraph_xml("Hola")));
    assert!(xml.contains("<w:pStyle w:val=\"Heading1\"/>"));
    assert!(xml.contains("<w:r><w:rPr><w:i/></w:rPr><w:t>Goodbye friend</w:t></w:r>"));
    assert!(xml.contains("Celda"));
    assert!(xml.contains("<w:sectPr>"));
    assert_eq!(common::read_part(&output, "word/styles.xml"), common::STYLES.as_bytes());
}

#[test]
fn test_toBytes_withSpecialCharacters_shouldEscapeText() {
    let bytes = common::build_docx(&["Uno"]);
    let mut docx = document::extract(&bytes).unwrap();
    docx.document_mut().element_mut(0).unwrap().set_text("A & B <c>\tD\nE");

    let output = docx.to_bytes().unwrap();
    assert_eq!(common::paragraph_texts(&output), vec!["A & B <c>\tD\nE"]);
}
