use crate::StripError;
use regex::{Regex, RegexBuilder};
use stripper_rules::{StringFilter, StringMatchType};

/// Translates a wildcard pattern into a fully anchored regular expression.
///
/// Every character except `*` and `?` is escaped first, then `*` becomes
/// `.*` and `?` becomes `.`.
pub fn wildcard_to_regex(pattern: &str) -> String {
    let escaped = regex::escape(pattern)
        .replace(r"\*", ".*")
        .replace(r"\?", ".");
    format!("^{escaped}$")
}

/// A [`StringFilter`] prepared for repeated matching.
///
/// Regular expressions are compiled once here instead of per variant, and
/// the pattern is case-folded up front when the filter ignores case.
///
/// Plain comparisons ignore case ordinally: each character is compared by
/// its simple uppercase mapping, so `ß` never equals `ẞ` and the Kelvin sign
/// never equals `k`. `Wildcard` and `Regex` filters use the regex engine's
/// Unicode case folding instead.
#[derive(Debug, Clone)]
pub struct StringMatcher {
    match_type: StringMatchType,
    ignore_case: bool,
    /// Pattern as compared, folded with [`fold_case`] when `ignore_case` is set.
    pattern: String,
    regex: Option<Regex>,
}

impl StringMatcher {
    /// Prepares a filter for matching.
    ///
    /// # Errors
    ///
    /// Returns `StripError::InvalidPattern` if a `Regex` pattern does not compile.
    pub fn new(filter: &StringFilter) -> Result<Self, StripError> {
        let regex = match filter.match_type {
            StringMatchType::Wildcard => Some(compile(
                &wildcard_to_regex(&filter.pattern),
                &filter.pattern,
                filter.ignore_case,
            )?),
            StringMatchType::Regex => Some(compile(
                &filter.pattern,
                &filter.pattern,
                filter.ignore_case,
            )?),
            _ => None,
        };
        let pattern = if filter.ignore_case {
            fold_case(&filter.pattern)
        } else {
            filter.pattern.clone()
        };
        Ok(Self {
            match_type: filter.match_type,
            ignore_case: filter.ignore_case,
            pattern,
            regex,
        })
    }

    /// Tests `input` against the filter.
    pub fn is_match(&self, input: &str) -> bool {
        if let Some(regex) = &self.regex {
            return regex.is_match(input);
        }
        let folded;
        let input = if self.ignore_case {
            folded = fold_case(input);
            folded.as_str()
        } else {
            input
        };
        match self.match_type {
            StringMatchType::Equals => input == self.pattern,
            StringMatchType::Contains => input.contains(self.pattern.as_str()),
            StringMatchType::StartsWith => input.starts_with(self.pattern.as_str()),
            StringMatchType::EndsWith => input.ends_with(self.pattern.as_str()),
            // Pattern types are always backed by a compiled regex.
            StringMatchType::Wildcard | StringMatchType::Regex => false,
        }
    }
}

/// Maps every character to its simple uppercase form.
///
/// Characters whose uppercase form is more than one character (`ß` → `SS`)
/// are kept as they are, matching an ordinal case-insensitive comparison.
fn fold_case(text: &str) -> String {
    text.chars()
        .map(|c| {
            let mut upper = c.to_uppercase();
            match (upper.next(), upper.next()) {
                (Some(single), None) => single,
                _ => c,
            }
        })
        .collect()
}

fn compile(expression: &str, pattern: &str, ignore_case: bool) -> Result<Regex, StripError> {
    RegexBuilder::new(expression)
        .case_insensitive(ignore_case)
        .build()
        .map_err(|source| StripError::InvalidPattern {
            pattern: pattern.to_owned(),
            source,
        })
}

/// Prepares a list of filters, failing on the first malformed pattern.
pub fn compile_all(filters: &[StringFilter]) -> Result<Vec<StringMatcher>, StripError> {
    filters.iter().map(StringMatcher::new).collect()
}

/// One-shot match of `input` against a pattern.
///
/// A `None` input never matches, whatever the pattern; it is not compiled.
/// Prefer [`StringMatcher`] when the same
/// pattern is tested many times.
///
/// # Errors
///
/// Returns `StripError::InvalidPattern` for a malformed `Regex` pattern.
pub fn is_match(
    input: Option<&str>,
    match_type: StringMatchType,
    pattern: &str,
    ignore_case: bool,
) -> Result<bool, StripError> {
    let Some(input) = input else {
        return Ok(false);
    };
    let filter = StringFilter {
        match_type,
        pattern: pattern.to_owned(),
        ignore_case,
    };
    Ok(StringMatcher::new(&filter)?.is_match(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn matches(input: &str, match_type: StringMatchType, pattern: &str, ignore_case: bool) -> bool {
        is_match(Some(input), match_type, pattern, ignore_case).unwrap()
    }

    #[test]
    fn test_none_input_never_matches() {
        for match_type in [
            StringMatchType::Equals,
            StringMatchType::Contains,
            StringMatchType::Wildcard,
            StringMatchType::Regex,
        ] {
            assert!(!is_match(None, match_type, "*", true).unwrap());
        }
        // Not a valid regex, but the missing input decides first.
        assert!(matches!(
            is_match(None, StringMatchType::Regex, "*", false),
            Ok(false)
        ));
        assert!(is_match(Some("x"), StringMatchType::Regex, "*", false).is_err());
    }

    #[test]
    fn test_ignore_case_is_ordinal() {
        assert!(!matches("\u{1E9E}", StringMatchType::Equals, "ß", true));
        assert!(!matches("ß", StringMatchType::Equals, "\u{1E9E}", true));
        assert!(!matches("\u{212A}", StringMatchType::Equals, "k", true));
        assert!(!matches("\u{212A}elvin", StringMatchType::StartsWith, "K", true));
        assert!(matches("STRASSE", StringMatchType::Equals, "strasse", true));
        assert!(matches("Ärger/Öl", StringMatchType::Contains, "äRGER/ö", true));
        assert!(matches("ß", StringMatchType::Equals, "ß", true));
    }

    #[test]
    fn test_plain_comparisons() {
        assert!(matches("Standard", StringMatchType::Equals, "Standard", false));
        assert!(!matches("Standard", StringMatchType::Equals, "standard", false));
        assert!(matches("Standard", StringMatchType::Equals, "standard", true));
        assert!(matches("Legacy Shaders/Diffuse", StringMatchType::Contains, "shaders", true));
        assert!(!matches("Legacy Shaders/Diffuse", StringMatchType::Contains, "shaders", false));
        assert!(matches("Hidden/Blit", StringMatchType::StartsWith, "Hidden/", false));
        assert!(matches("Custom/Water", StringMatchType::EndsWith, "WATER", true));
        assert!(!matches("Custom/Water", StringMatchType::EndsWith, "WATER", false));
    }

    #[test]
    fn test_wildcard_prefix_case_sensitivity() {
        assert!(matches("Foobar", StringMatchType::Wildcard, "Foo*", false));
        assert!(!matches("foobar", StringMatchType::Wildcard, "Foo*", false));
        assert!(matches("foobar", StringMatchType::Wildcard, "Foo*", true));
    }

    #[test]
    fn test_wildcard_is_anchored_and_escaped() {
        assert!(matches("UI/Default", StringMatchType::Wildcard, "UI/?efault", false));
        assert!(!matches("My UI/Default", StringMatchType::Wildcard, "UI/*", false));
        // Regex metacharacters in a wildcard pattern are literals.
        assert!(matches("a+b (x)", StringMatchType::Wildcard, "a+b (?)", false));
        assert!(!matches("aab (x)", StringMatchType::Wildcard, "a+b (?)", false));
        assert_eq!(wildcard_to_regex("A.*"), r"^A\..*$");
    }

    #[test]
    fn test_regex_is_unanchored_search() {
        assert!(matches("Custom/Water_Ocean", StringMatchType::Regex, "Water_[A-Z]", false));
        assert!(matches("custom/water_ocean", StringMatchType::Regex, "WATER_[a-z]", true));
        assert!(!matches("Custom/Water", StringMatchType::Regex, "^Water", false));
    }

    #[test]
    fn test_malformed_regex_is_invalid_pattern() {
        let result = is_match(Some("abc"), StringMatchType::Regex, "(unclosed", false);
        match result {
            Err(StripError::InvalidPattern { pattern, .. }) => assert_eq!(pattern, "(unclosed"),
            other => panic!("Expected InvalidPattern, got {other:?}"),
        }
    }

    proptest! {
        #[test]
        fn prop_star_matches_everything(input in ".*", ignore_case in any::<bool>()) {
            prop_assert!(is_match(Some(&input), StringMatchType::Wildcard, "*", ignore_case).unwrap());
        }

        #[test]
        fn prop_equals_pattern_matches_itself_as_wildcard(input in "[A-Za-z0-9_/ .+()]{0,24}") {
            // With no `*` or `?` in the pattern, wildcard matching is exact equality.
            prop_assert!(is_match(Some(&input), StringMatchType::Wildcard, &input, false).unwrap());
        }
    }
}
