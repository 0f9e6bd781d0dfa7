//! Issue body language detection.

use std::ops::RangeInclusive;

use warden_core::Language;

/// CJK Unified Ideographs, U+4E00 through U+9FA5.
const CJK_IDEOGRAPHS: RangeInclusive<char> = '\u{4e00}'..='\u{9fa5}';

/// Detect the language of an issue body.
///
/// Any CJK ideograph makes the text Chinese; everything else, including
/// empty text, is English.
///
/// # Examples
///
/// ```
/// use warden_core::Language;
/// use warden_review::language::detect_language;
///
/// assert_eq!(detect_language("程序崩溃了"), Language::Zh);
/// assert_eq!(detect_language("Please add X"), Language::En);
/// assert_eq!(detect_language(""), Language::En);
/// ```
pub fn detect_language(text: &str) -> Language {
    if text.chars().any(|c| CJK_IDEOGRAPHS.contains(&c)) {
        Language::Zh
    } else {
        Language::En
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_is_english() {
        assert_eq!(detect_language("Steps to reproduce: run it"), Language::En);
    }

    #[test]
    fn single_ideograph_is_chinese() {
        assert_eq!(
            detect_language("Crash when loading config 配置"),
            Language::Zh
        );
    }

    #[test]
    fn range_bounds_are_inclusive() {
        assert_eq!(detect_language("\u{4e00}"), Language::Zh);
        assert_eq!(detect_language("\u{9fa5}"), Language::Zh);
    }

    #[test]
    fn outside_range_is_english() {
        assert_eq!(detect_language("\u{9fa6}"), Language::En);
        assert_eq!(detect_language("\u{4dff}"), Language::En);
        // Japanese kana and full-width punctuation are not ideographs.
        assert_eq!(detect_language("こんにちは！"), Language::En);
    }

    #[test]
    fn empty_is_english() {
        assert_eq!(detect_language(""), Language::En);
    }
}
