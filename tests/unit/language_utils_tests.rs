/*!
 * Tests for language code utilities
 */

use docpair::language_utils::{get_language_name, normalize_to_part2t, resolve_language_name};

#[test]
fn test_normalize_to_part2t_withVariousCodes_shouldReturnThreeLetterCode() {
    assert_eq!(normalize_to_part2t("en").unwrap(), "eng");
    assert_eq!(normalize_to_part2t("ES").unwrap(), "spa");
    assert_eq!(normalize_to_part2t("fre").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("deu").unwrap(), "deu");
    assert!(normalize_to_part2t("xx").is_err());
}

#[test]
fn test_get_language_name_withValidCode_shouldReturnEnglishName() {
    assert_eq!(get_language_name("en").unwrap(), "English");
    assert_eq!(get_language_name("ita").unwrap(), "Italian");
    assert!(get_language_name("Klingon").is_err());
}

#[test]
fn test_resolve_language_name_withCodesAndNames_shouldPreferNames() {
    assert_eq!(resolve_language_name("pt"), "Portuguese");
    assert_eq!(resolve_language_name("Portuguese"), "Portuguese");
    assert_eq!(resolve_language_name(" Latin American Spanish "), "Latin American Spanish");
}
