//! Text sanitization for restored free-form bodies (spec §4.4).
//!
//! Grounded in `github_data_tools/github/sanitizers.py`: `@mentions` are
//! wrapped in backticks so GitHub doesn't autolink them or notify the
//! mentioned user, while URLs and e-mail addresses are left alone because
//! they require a non-whitespace character immediately before the `@`/start.

use std::sync::LazyLock;

use regex::Regex;

static MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)(^|\s)(@[A-Za-z0-9][A-Za-z0-9-]{0,37}[A-Za-z0-9]?)").unwrap());

/// Wraps every `@mention` in `text` in backticks. Idempotence is not
/// required: re-sanitizing an already-wrapped mention is harmless, it just
/// leaves the backticks where they are since the mention itself is
/// untouched.
pub fn sanitize_mentions(text: &str) -> String {
    MENTION.replace_all(text, "$1`$2`").into_owned()
}

/// Fields recorded about the original record when building a provenance
/// footer (spec §4.4 "Metadata footer").
pub struct FooterFields<'a> {
    pub original_author_login: &'a str,
    pub created_at: &'a str,
    pub updated_at: Option<&'a str>,
    pub original_url: &'a str,
}

/// Appends a provenance footer after `body`, separated by a horizontal
/// rule. When `body` is empty, the footer becomes the whole body rather
/// than being appended to nothing.
pub fn append_metadata_footer(body: &str, fields: &FooterFields<'_>) -> String {
    let author = sanitize_mentions(&format!("@{}", fields.original_author_login));
    let mut footer = format!(
        "\n\n---\n*Originally created by {author} on {}",
        fields.created_at
    );
    if let Some(updated) = fields.updated_at {
        footer.push_str(&format!(", last updated {updated}"));
    }
    footer.push_str(&format!(". [View original]({})*", fields.original_url));

    if body.is_empty() {
        footer.trim_start().to_string()
    } else {
        format!("{body}{footer}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_simple_mention() {
        assert_eq!(sanitize_mentions("Thanks @john"), "Thanks `@john`");
    }

    #[test]
    fn wraps_multiple_mentions() {
        assert_eq!(
            sanitize_mentions("cc @alice @bob-123"),
            "cc `@alice` `@bob-123`"
        );
    }

    #[test]
    fn leaves_emails_untouched() {
        assert_eq!(sanitize_mentions("test@example.com"), "test@example.com");
    }

    #[test]
    fn leaves_urls_untouched() {
        assert_eq!(
            sanitize_mentions("https://github.com/@user"),
            "https://github.com/@user"
        );
    }

    #[test]
    fn rejects_leading_hyphen_username() {
        assert_eq!(sanitize_mentions("@-user"), "@-user");
    }

    #[test]
    fn trailing_hyphen_is_not_part_of_mention() {
        assert_eq!(
            sanitize_mentions("@test- mentioned"),
            "`@test`- mentioned"
        );
    }

    #[test]
    fn no_unwrapped_mention_remains() {
        let invariant = Regex::new(r"(?:^|\s)@[A-Za-z0-9][A-Za-z0-9-]{0,37}[A-Za-z0-9]?").unwrap();
        for body in ["Thanks @john and @jane-doe!", "see test@example.com, cc @bob"] {
            let sanitized = sanitize_mentions(body);
            assert!(
                !invariant.is_match(&sanitized),
                "unwrapped mention survived sanitization in {sanitized:?}"
            );
        }
    }

    #[test]
    fn footer_replaces_empty_body() {
        let fields = FooterFields {
            original_author_login: "octocat",
            created_at: "2020-01-01T00:00:00Z",
            updated_at: None,
            original_url: "https://github.com/o/r/issues/1",
        };
        let out = append_metadata_footer("", &fields);
        assert!(out.starts_with("*Originally created by `@octocat`"));
    }

    #[test]
    fn footer_appends_after_body() {
        let fields = FooterFields {
            original_author_login: "octocat",
            created_at: "2020-01-01T00:00:00Z",
            updated_at: Some("2020-02-01T00:00:00Z"),
            original_url: "https://github.com/o/r/issues/1",
        };
        let out = append_metadata_footer("hello", &fields);
        assert!(out.starts_with("hello\n\n---\n"));
        assert!(out.contains("last updated 2020-02-01T00:00:00Z"));
    }
}
