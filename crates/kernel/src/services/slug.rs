//! URL slug generation.
//!
//! Lowercases the input, drops everything that is not a word character,
//! whitespace, or a hyphen, then turns each run of whitespace into a single
//! hyphen. The output contains no whitespace and nothing the filter removes,
//! so `slugify(slugify(x)) == slugify(x)`.

use std::sync::LazyLock;

use regex::Regex;

#[allow(clippy::expect_used)]
static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("slug filter pattern is valid"));

#[allow(clippy::expect_used)]
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Convert text into a URL path segment.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = DISALLOWED.replace_all(&lowered, "");
    WHITESPACE.replace_all(&stripped, "-").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hello_world() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
    }

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(slugify("Our   new\t\nservices"), "our-new-services");
    }

    #[test]
    fn keeps_hyphens_and_underscores() {
        assert_eq!(slugify("pre-launch notes_v2"), "pre-launch-notes_v2");
    }

    #[test]
    fn strips_punctuation_between_words() {
        assert_eq!(slugify("Rock & Roll"), "rock-roll");
    }

    #[test]
    fn keeps_unicode_letters() {
        assert_eq!(slugify("Café Crème"), "café-crème");
    }

    #[test]
    fn empty_and_symbol_only_inputs() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn idempotent() {
        let inputs = [
            "Hello, World!",
            "  leading and trailing  ",
            "Rock & Roll",
            "ALL CAPS -- dashes",
            "tabs\tand\nnewlines",
            "Ünïcödé Tïtle",
            "emoji 🎉 party",
            "already-a-slug",
            "İstanbul",
            "ΑΣ!Β",
            "ΟΔΥΣΣΕΥΣ",
            "non\u{a0}\u{a0}breaking\u{2003}spaces",
            "Straße ǅ ß",
            "",
        ];
        for input in inputs {
            let once = slugify(input);
            assert_eq!(slugify(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn idempotent_across_code_point_ranges() {
        let chars: Vec<char> = (0u32..0x3100).filter_map(char::from_u32).collect();
        for window in chars.chunks(7) {
            let input: String = window
                .iter()
                .chain(['\u{a0}', ' ', '!', 'Σ'].iter())
                .collect();
            let once = slugify(&input);
            assert_eq!(slugify(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn non_breaking_space_runs_become_one_hyphen() {
        assert_eq!(slugify("a\u{a0}\u{a0} b"), "a-b");
    }
}
