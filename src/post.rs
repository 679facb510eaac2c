//! Blog posts as served by the content service.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::outline::{IdPolicy, Outline, extract_outline_with};

/// A post record. Field names follow the service's JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Post {
    #[serde(rename = "ID")]
    pub id: u64,
    pub title: String,
    /// Raw markdown
    pub content: String,
    /// ISO 8601 timestamp
    pub created_at: String,
    #[serde(default)]
    pub category: String,
    /// Comma separated
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub author: String,
}

impl Post {
    /// The markdown body with literal `\n` escapes turned into newlines.
    ///
    /// Some stored posts carry doubly-escaped line breaks.
    pub fn body(&self) -> Cow<'_, str> {
        if self.content.contains("\\n") {
            Cow::Owned(self.content.replace("\\n", "\n"))
        } else {
            Cow::Borrowed(&self.content)
        }
    }

    pub fn outline(&self, policy: IdPolicy) -> Outline {
        extract_outline_with(&self.body(), policy)
    }

    /// Date part of `created_at` (`YYYY-MM-DD`), or the whole value when it
    /// has no time component.
    pub fn published_date(&self) -> &str {
        self.created_at
            .split_once('T')
            .map_or(self.created_at.as_str(), |(date, _)| date)
    }

    /// Tags split on commas, trimmed, blanks dropped.
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// Posts whose title or content contains `query`, ignoring case.
pub fn filter_posts<'a>(posts: &'a [Post], query: &str) -> Vec<&'a Post> {
    let needle = query.to_lowercase();
    posts
        .iter()
        .filter(|post| {
            post.title.to_lowercase().contains(&needle)
                || post.content.to_lowercase().contains(&needle)
        })
        .collect()
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read posts from {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse posts in {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("post {0} not found")]
    NotFound(u64),
}

/// Where posts come from.
pub trait ContentSource {
    /// All posts, in service order.
    ///
    /// # Errors
    /// Returns an error when the source cannot be read or decoded.
    fn list_posts(&self) -> Result<Vec<Post>, SourceError>;

    /// One post by id.
    ///
    /// # Errors
    /// Returns [`SourceError::NotFound`] when no post has `id`, or the
    /// error from [`ContentSource::list_posts`].
    fn fetch_post(&self, id: u64) -> Result<Post, SourceError> {
        self.list_posts()?
            .into_iter()
            .find(|post| post.id == id)
            .ok_or(SourceError::NotFound(id))
    }
}

/// Posts stored as a JSON array in a file.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ContentSource for JsonFileSource {
    fn list_posts(&self) -> Result<Vec<Post>, SourceError> {
        let raw = std::fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        let posts: Vec<Post> = serde_json::from_str(&raw).map_err(|source| SourceError::Parse {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(count = posts.len(), path = %self.path.display(), "posts loaded");
        Ok(posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn post(id: u64, title: &str, content: &str) -> Post {
        Post {
            id,
            title: title.to_string(),
            content: content.to_string(),
            created_at: "2024-05-01T08:30:00Z".to_string(),
            ..Post::default()
        }
    }

    #[test]
    fn test_deserialize_service_json() {
        let json = r##"{
            "ID": 7,
            "Title": "Hello",
            "Content": "# Hi",
            "CreatedAt": "2024-05-01T08:30:00Z",
            "Category": "Tech",
            "Tags": "Rust, Markdown",
            "ViewCount": 100,
            "Author": "Liam"
        }"##;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.id, 7);
        assert_eq!(post.view_count, 100);
        assert_eq!(post.tag_list(), vec!["Rust", "Markdown"]);
        let back = serde_json::to_value(&post).unwrap();
        assert_eq!(back["ID"], 7);
        assert_eq!(back["CreatedAt"], "2024-05-01T08:30:00Z");
    }

    #[test]
    fn test_optional_fields_default() {
        let json = r#"{"ID":1,"Title":"t","Content":"c","CreatedAt":"2024-01-01"}"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.author, "");
        assert!(post.tag_list().is_empty());
        assert_eq!(post.published_date(), "2024-01-01");
    }

    #[test]
    fn test_body_unescapes_literal_newlines() {
        let p = post(1, "t", "# A\\n\\n## B");
        assert_eq!(p.body(), "# A\n\n## B");
        assert_eq!(p.outline(IdPolicy::Suffix).ids(), vec!["a", "b"]);
    }

    #[test]
    fn test_body_borrows_when_clean() {
        let p = post(1, "t", "# A\n");
        assert!(matches!(p.body(), Cow::Borrowed(_)));
    }

    #[test]
    fn test_published_date() {
        assert_eq!(post(1, "t", "").published_date(), "2024-05-01");
    }

    #[test]
    fn test_filter_posts_matches_title_or_content() {
        let posts = vec![
            post(1, "Rust tips", "borrowing"),
            post(2, "Cooking", "A RUST-colored sauce"),
            post(3, "Travel", "mountains"),
        ];
        let ids: Vec<u64> = filter_posts(&posts, "rust").iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(filter_posts(&posts, "").len(), 3);
        assert!(filter_posts(&posts, "nothing").is_empty());
    }

    #[test]
    fn test_json_file_source_fetch() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("posts.json");
        let posts = vec![post(1, "One", "# One"), post(2, "Two", "# Two")];
        std::fs::write(&path, serde_json::to_string(&posts).unwrap()).unwrap();

        let source = JsonFileSource::new(&path);
        assert_eq!(source.list_posts().unwrap().len(), 2);
        assert_eq!(source.fetch_post(2).unwrap().title, "Two");
        assert!(matches!(source.fetch_post(9), Err(SourceError::NotFound(9))));
    }

    #[test]
    fn test_json_file_source_errors() {
        let dir = tempdir().unwrap();
        let missing = JsonFileSource::new(dir.path().join("missing.json"));
        assert!(matches!(missing.list_posts(), Err(SourceError::Io { .. })));

        let path = dir.path().join("bad.json");
        std::fs::write(&path, "not json").unwrap();
        let bad = JsonFileSource::new(&path);
        assert!(matches!(bad.list_posts(), Err(SourceError::Parse { .. })));
    }
}
