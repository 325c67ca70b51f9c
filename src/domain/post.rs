//! Scraped Reddit post and comment records.
//!
//! Posts are immutable once scraped. The analysis pipeline only ever reads
//! them; corpus selection produces new vectors instead of mutating these.

use serde::{Deserialize, Serialize};

/// One scraped Reddit submission with its comment tree flattened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Reddit base36 id ("1abcd2")
    pub id: String,

    /// Submission title
    pub title: String,

    /// Selftext body (empty for link posts)
    pub body: String,

    /// Author username ("[deleted]" when removed)
    pub author: String,

    /// Subreddit display name, without the /r/ prefix
    pub subreddit: String,

    /// Net vote score, may be negative
    pub score: i64,

    /// UTC creation time formatted "%Y-%m-%d %H:%M:%S UTC"
    pub created_at: String,

    /// Comment count as reported by Reddit (may exceed comments.len())
    pub num_comments: u64,

    /// Flattened comments, in listing order
    pub comments: Vec<Comment>,
}

/// One comment under a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub body: String,
    pub author: String,
    pub score: i64,
    pub created_at: String,
}

impl Post {
    /// Return a copy of this post keeping only comments at or above the score threshold.
    pub fn with_comments_above(&self, min_score: i64) -> Post {
        let mut post = self.clone();
        post.comments.retain(|c| c.score >= min_score);
        post
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(score: i64) -> Comment {
        Comment {
            body: format!("comment scoring {}", score),
            author: "tester".to_string(),
            score,
            created_at: "2025-01-01 00:00:00 UTC".to_string(),
        }
    }

    fn post_with_comments(scores: &[i64]) -> Post {
        Post {
            id: "abc123".to_string(),
            title: "Test post".to_string(),
            body: "body".to_string(),
            author: "tester".to_string(),
            subreddit: "rust".to_string(),
            score: 10,
            created_at: "2025-01-01 00:00:00 UTC".to_string(),
            num_comments: scores.len() as u64,
            comments: scores.iter().copied().map(comment).collect(),
        }
    }

    #[test]
    fn test_with_comments_above_filters_strictly_below() {
        let post = post_with_comments(&[5, 1, 0, -3]);
        let filtered = post.with_comments_above(1);

        let scores: Vec<i64> = filtered.comments.iter().map(|c| c.score).collect();
        assert_eq!(scores, vec![5, 1]);
    }

    #[test]
    fn test_with_comments_above_does_not_mutate_original() {
        let post = post_with_comments(&[5, -3]);
        let _ = post.with_comments_above(0);
        assert_eq!(post.comments.len(), 2);
    }

    #[test]
    fn test_with_comments_above_idempotent() {
        let post = post_with_comments(&[5, 1, 0, -3]);
        let once = post.with_comments_above(1);
        let twice = once.with_comments_above(1);
        assert_eq!(once.comments.len(), twice.comments.len());
    }

    #[test]
    fn test_negative_threshold_keeps_negative_comments() {
        let post = post_with_comments(&[0, -2, -5]);
        let filtered = post.with_comments_above(-2);
        assert_eq!(filtered.comments.len(), 2);
    }

    #[test]
    fn test_post_serialization_roundtrip() {
        let post = post_with_comments(&[3]);
        let json = serde_json::to_string(&post).unwrap();
        let restored: Post = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.id, post.id);
        assert_eq!(restored.score, post.score);
        assert_eq!(restored.comments.len(), 1);
    }
}
