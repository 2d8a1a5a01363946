//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O. `published_at` is stored as `YYYY-MM-DD HH:MM:SS` so
//! string comparison against a day bound selects by calendar date.

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS articles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    category VARCHAR(20),
    title VARCHAR(150) NOT NULL,
    description VARCHAR(300),
    views INTEGER NOT NULL DEFAULT 0,
    published_at TEXT NOT NULL,
    content TEXT NOT NULL DEFAULT ''
);

CREATE INDEX IF NOT EXISTS idx_articles_published_at ON articles(published_at);
"#;

pub const INSERT_ARTICLE: &str = r#"
INSERT INTO articles (category, title, description, views, published_at, content)
VALUES (?1, ?2, ?3, 0, ?4, ?5)
"#;

pub const SELECT_ARTICLE_BY_ID: &str = r#"
SELECT id, category, title, description, views, published_at, content
FROM articles
WHERE id = ?1
"#;

/// `?1` is the day, `?2` the following day.
pub const SELECT_ARTICLES_BY_DAY: &str = r#"
SELECT id, category, title, description, views, published_at, content
FROM articles
WHERE published_at >= ?1 AND published_at < ?2
ORDER BY id ASC
"#;

/// `?2` is the day, `?3` the following day, `?4` the row limit.
pub const SELECT_ARTICLES_BY_CATEGORY_AND_DAY: &str = r#"
SELECT id, category, title, description, views, published_at, content
FROM articles
WHERE category = ?1 AND published_at >= ?2 AND published_at < ?3
ORDER BY id ASC
LIMIT ?4
"#;

pub const INCREMENT_VIEWS: &str = r#"
UPDATE articles
SET views = views + 1
WHERE id = ?1
"#;

pub const PING: &str = "SELECT 1";
