use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::dates::{default_published_at, parse_published_at};
use super::operations::{truncate_at_word, DESCRIPTION_MAX_CHARS, TITLE_MAX_CHARS};
use super::ArticleError;

/// The closed set of article categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Business,
    Entertainment,
    General,
    Health,
    Science,
    Sports,
    Technology,
}

impl Category {
    /// Every category, in the order upstream fan-out uses.
    pub const ALL: [Category; 7] = [
        Category::Business,
        Category::Entertainment,
        Category::General,
        Category::Health,
        Category::Science,
        Category::Sports,
        Category::Technology,
    ];

    /// Returns the lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Business => "business",
            Category::Entertainment => "entertainment",
            Category::General => "general",
            Category::Health => "health",
            Category::Science => "science",
            Category::Sports => "sports",
            Category::Technology => "technology",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ArticleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ArticleError::UnknownCategory(s.to_string()))
    }
}

/// A persisted article. The `id` is always assigned by the durable store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub category: Category,
    pub title: String,
    pub description: Option<String>,
    pub views: u64,
    pub published_at: NaiveDateTime,
    pub content: String,
}

/// An article that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
    pub category: Category,
    pub title: String,
    pub description: Option<String>,
    pub published_at: NaiveDateTime,
    pub content: String,
}

impl NewArticle {
    /// Creates a new article published at the default timestamp (the fetch day).
    pub fn new(category: Category, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            category,
            title: truncate_at_word(&title.into(), TITLE_MAX_CHARS),
            description: None,
            published_at: default_published_at(),
            content: content.into(),
        }
    }

    /// Builds a new article from an upstream item.
    ///
    /// `title` and `publishedAt` are required. A missing `content` becomes an
    /// empty string and a blank `description` becomes `None`.
    pub fn from_raw(category: Category, raw: &RawArticle) -> Result<Self, ArticleError> {
        let title = raw
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ArticleError::MissingField("title"))?;
        let published_at = raw
            .published_at
            .as_deref()
            .ok_or(ArticleError::MissingField("publishedAt"))
            .and_then(parse_published_at)?;
        let description = raw
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(|d| truncate_at_word(d, DESCRIPTION_MAX_CHARS));

        Ok(Self {
            category,
            title: truncate_at_word(title, TITLE_MAX_CHARS),
            description,
            published_at,
            content: raw.content.clone().unwrap_or_default(),
        })
    }

    /// Attaches the store-assigned id, producing a persisted article.
    pub fn into_article(self, id: i64) -> Article {
        Article {
            id,
            category: self.category,
            title: self.title,
            description: self.description,
            views: 0,
            published_at: self.published_at,
            content: self.content,
        }
    }
}

/// The listing projection of an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSummary {
    pub id: i64,
    pub title: String,
    pub category: Category,
    pub views: u64,
}

/// One item of an upstream content API response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArticle {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
}

impl RawArticle {
    /// Creates a raw item with the two required fields set.
    pub fn new(title: impl Into<String>, published_at: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            published_at: Some(published_at.into()),
            ..Self::default()
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the content.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_category_round_trips_through_str() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_category_rejects_unknown_value() {
        assert_eq!(
            "sports2".parse::<Category>(),
            Err(ArticleError::UnknownCategory("sports2".to_string()))
        );
        assert!("Technology".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_serde_uses_lowercase() {
        let json = serde_json::to_string(&Category::Technology).unwrap();
        assert_eq!(json, "\"technology\"");
        let parsed: Category = serde_json::from_str("\"health\"").unwrap();
        assert_eq!(parsed, Category::Health);
    }

    #[test]
    fn test_from_raw_parses_all_fields() {
        let raw = RawArticle::new("Rust 2.0 announced", "2024-06-15T08:30:00Z")
            .with_description("A summary")
            .with_content("Body");

        let article = NewArticle::from_raw(Category::Technology, &raw).unwrap();

        assert_eq!(article.category, Category::Technology);
        assert_eq!(article.title, "Rust 2.0 announced");
        assert_eq!(article.description.as_deref(), Some("A summary"));
        assert_eq!(article.content, "Body");
        assert_eq!(
            article.published_at,
            NaiveDate::from_ymd_opt(2024, 6, 15)
                .unwrap()
                .and_hms_opt(8, 30, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_from_raw_requires_title() {
        let raw = RawArticle {
            published_at: Some("2024-06-15T08:30:00Z".to_string()),
            ..RawArticle::default()
        };
        assert_eq!(
            NewArticle::from_raw(Category::Science, &raw),
            Err(ArticleError::MissingField("title"))
        );
    }

    #[test]
    fn test_from_raw_requires_published_at() {
        let raw = RawArticle {
            title: Some("Title".to_string()),
            ..RawArticle::default()
        };
        assert_eq!(
            NewArticle::from_raw(Category::Science, &raw),
            Err(ArticleError::MissingField("publishedAt"))
        );
    }

    #[test]
    fn test_from_raw_rejects_bad_timestamp() {
        let raw = RawArticle::new("Title", "2024-06-15 08:30");
        assert!(matches!(
            NewArticle::from_raw(Category::Science, &raw),
            Err(ArticleError::InvalidPublishedAt(_))
        ));
    }

    #[test]
    fn test_from_raw_defaults_content_and_drops_blank_description() {
        let raw = RawArticle::new("Title", "2024-06-15T08:30:00Z").with_description("   ");
        let article = NewArticle::from_raw(Category::Health, &raw).unwrap();
        assert_eq!(article.content, "");
        assert_eq!(article.description, None);
    }

    #[test]
    fn test_from_raw_truncates_long_title() {
        let title = "word ".repeat(40); // 200 chars
        let raw = RawArticle::new(title, "2024-06-15T08:30:00Z");
        let article = NewArticle::from_raw(Category::Sports, &raw).unwrap();
        assert!(article.title.chars().count() <= TITLE_MAX_CHARS);
        assert!(article.title.ends_with("word"));
    }

    #[test]
    fn test_new_article_defaults() {
        let article = NewArticle::new(Category::General, "Title", "Body");
        assert_eq!(article.published_at, default_published_at());
        assert_eq!(article.description, None);

        let persisted = article.into_article(7);
        assert_eq!(persisted.id, 7);
        assert_eq!(persisted.views, 0);
    }

    #[test]
    fn test_raw_article_deserializes_upstream_shape() {
        let json = r#"{
            "source": {"id": null, "name": "Example"},
            "author": "Someone",
            "title": "Headline",
            "description": null,
            "url": "https://example.com/a",
            "publishedAt": "2024-06-15T08:30:00Z",
            "content": "Text"
        }"#;
        let raw: RawArticle = serde_json::from_str(json).unwrap();
        assert_eq!(raw.title.as_deref(), Some("Headline"));
        assert_eq!(raw.description, None);
        assert_eq!(raw.published_at.as_deref(), Some("2024-06-15T08:30:00Z"));
    }
}
