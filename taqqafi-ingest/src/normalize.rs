//! Text normalization for bilingual (Latin + Arabic) bank messages.
//!
//! Matching works on three views of the same message:
//! - `flat`: whitespace collapsed, otherwise untouched
//! - `normalized`: `flat` with tashkil stripped and letter variants unified
//! - `westernized`: `normalized` with Arabic-Indic digits and separators mapped to ASCII
//!
//! None of these is ever shown to the user; `raw_text` keeps the original.

/// Collapse line breaks and whitespace runs into single spaces and trim.
pub fn flatten(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_tashkil(c: char) -> bool {
    ('\u{064B}'..='\u{065F}').contains(&c)
}

/// Remove Arabic short-vowel and other diacritical marks.
pub fn strip_diacritics(text: &str) -> String {
    text.chars().filter(|c| !is_tashkil(*c)).collect()
}

/// Alef-with-madda/hamza → alef, alef maksura → yā, tā marbūta → hā.
pub fn canonicalize_letters(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{0622}' | '\u{0623}' | '\u{0625}' => '\u{0627}',
            '\u{0649}' => '\u{064A}',
            '\u{0629}' => '\u{0647}',
            other => other,
        })
        .collect()
}

/// Diacritic strip followed by letter canonicalization.
pub fn normalize_arabic(text: &str) -> String {
    canonicalize_letters(&strip_diacritics(text)).trim().to_string()
}

/// Map Arabic-Indic (٠-٩) and Extended Arabic-Indic (۰-۹) digits to ASCII,
/// plus the Arabic decimal (٫) and thousands (٬) separators.
pub fn westernize_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{0660}'..='\u{0669}' => char::from(b'0' + (c as u32 - 0x0660) as u8),
            '\u{06F0}'..='\u{06F9}' => char::from(b'0' + (c as u32 - 0x06F0) as u8),
            '\u{066B}' => '.',
            '\u{066C}' => ',',
            other => other,
        })
        .collect()
}

/// Regex alternation (no group) over `words` as they appear after
/// normalization. Longer words come first so `ريال سعودي` is tried before `ريال`.
pub(crate) fn alternation<'a>(words: impl IntoIterator<Item = &'a str>) -> String {
    let mut out: Vec<String> = words
        .into_iter()
        .map(|w| regex::escape(&canonicalize_letters(w)))
        .collect();
    out.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then_with(|| a.cmp(b)));
    out.dedup();
    out.join("|")
}

/// The three matching views of one message, computed once per parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    pub flat: String,
    pub normalized: String,
    pub westernized: String,
}

impl NormalizedText {
    pub fn new(raw: &str) -> Self {
        let flat = flatten(raw);
        // stripping marks can leave doubled spaces behind
        let normalized = flatten(&normalize_arabic(&flat));
        let westernized = westernize_digits(&normalized);
        Self {
            flat,
            normalized,
            westernized,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_collapses_newlines_and_runs() {
        assert_eq!(flatten("  SAR 10\r\n\n deducted \t now "), "SAR 10 deducted now");
    }

    #[test]
    fn test_strip_diacritics() {
        // مَبْلَغ -> مبلغ
        assert_eq!(strip_diacritics("مَبْلَغ"), "مبلغ");
    }

    #[test]
    fn test_canonicalize_letters() {
        assert_eq!(canonicalize_letters("إيداع"), "ايداع");
        assert_eq!(canonicalize_letters("أردني"), "اردني");
        assert_eq!(canonicalize_letters("آخر"), "اخر");
        assert_eq!(canonicalize_letters("لدى"), "لدي");
        assert_eq!(canonicalize_letters("بقيمة"), "بقيمه");
    }

    #[test]
    fn test_westernize_digits() {
        assert_eq!(westernize_digits("١٨٫٤٤"), "18.44");
        assert_eq!(westernize_digits("١٬٢٥٠"), "1,250");
        assert_eq!(westernize_digits("۱۲۳"), "123");
        assert_eq!(westernize_digits("SAR 5"), "SAR 5");
    }

    #[test]
    fn test_alternation_is_normalized_and_longest_first() {
        let alt = alternation(["ريال", "ريال سعودى", "د.إ", "د.أ"]);
        assert_eq!(alt, "ريال سعودي|د\\.ا|ريال");
    }

    #[test]
    fn test_normalized_views() {
        let t = NormalizedText::new("تم   إيداع\nمبلغ ١٠٠ ريال");
        assert_eq!(t.flat, "تم إيداع مبلغ ١٠٠ ريال");
        assert_eq!(t.normalized, "تم ايداع مبلغ ١٠٠ ريال");
        assert_eq!(t.westernized, "تم ايداع مبلغ 100 ريال");
    }
}
