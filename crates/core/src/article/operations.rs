use super::{Article, ArticleSummary};

/// Maximum title length, in characters.
pub const TITLE_MAX_CHARS: usize = 150;

/// Maximum description length, in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 300;

/// Row limit of a single-category listing.
pub const CATEGORY_LISTING_LIMIT: usize = 10;

/// Truncates `text` at the last word boundary that keeps it within
/// `max_chars` characters.
///
/// Text that already fits is returned unchanged, and so is text whose first
/// word alone is longer than `max_chars`.
///
/// # Examples
///
/// ```
/// use headlines_core::article::truncate_at_word;
///
/// assert_eq!(truncate_at_word("hello brave new world", 12), "hello brave");
/// assert_eq!(truncate_at_word("short", 12), "short");
/// ```
pub fn truncate_at_word(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    // Byte offset of the last whitespace within the first `max_chars + 1` chars.
    let cut = text
        .char_indices()
        .take(max_chars + 1)
        .filter(|(_, c)| c.is_whitespace())
        .map(|(i, _)| i)
        .last();

    match cut {
        Some(i) => {
            let truncated = text[..i].trim_end();
            if truncated.is_empty() {
                text.to_string()
            } else {
                truncated.to_string()
            }
        }
        None => text.to_string(),
    }
}

/// Projects a full article into its listing shape.
pub fn project(article: &Article) -> ArticleSummary {
    ArticleSummary {
        id: article.id,
        title: article.title.clone(),
        category: article.category,
        views: article.views,
    }
}

impl From<&Article> for ArticleSummary {
    fn from(article: &Article) -> Self {
        project(article)
    }
}

impl From<Article> for ArticleSummary {
    fn from(article: Article) -> Self {
        Self {
            id: article.id,
            title: article.title,
            category: article.category,
            views: article.views,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::{default_published_at, Category};

    fn article() -> Article {
        Article {
            id: 42,
            category: Category::Science,
            title: "Comet spotted".to_string(),
            description: Some("Bright one".to_string()),
            views: 3,
            published_at: default_published_at(),
            content: "Long body".to_string(),
        }
    }

    #[test]
    fn test_truncate_leaves_short_text_unchanged() {
        assert_eq!(truncate_at_word("a b c", 5), "a b c");
        assert_eq!(truncate_at_word("", 5), "");
    }

    #[test]
    fn test_truncate_cuts_at_word_boundary() {
        let title = "word ".repeat(40);
        assert_eq!(title.chars().count(), 200);

        let truncated = truncate_at_word(&title, TITLE_MAX_CHARS);

        assert!(truncated.chars().count() <= TITLE_MAX_CHARS);
        assert_eq!(truncated, "word ".repeat(30).trim_end());
    }

    #[test]
    fn test_truncate_keeps_word_ending_exactly_at_limit() {
        // The char right after the limit is a space, so the full prefix fits.
        assert_eq!(truncate_at_word("abcd efgh ijkl", 9), "abcd efgh");
    }

    #[test]
    fn test_truncate_without_spaces_is_unchanged() {
        let title = "x".repeat(200);
        assert_eq!(truncate_at_word(&title, TITLE_MAX_CHARS), title);
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        let text = "ééé ééé ééé";
        assert_eq!(truncate_at_word(text, 8), "ééé ééé");
    }

    #[test]
    fn test_project_drops_heavy_fields() {
        let summary = project(&article());
        assert_eq!(
            summary,
            ArticleSummary {
                id: 42,
                title: "Comet spotted".to_string(),
                category: Category::Science,
                views: 3,
            }
        );
        assert_eq!(ArticleSummary::from(article()), summary);
    }
}
