//! Corpus selection - pick the working subset of scraped posts.
//!
//! Every analysis task sees the same corpus: posts sorted by score descending,
//! truncated to the top N, with low-scoring comments stripped. Selection is
//! pure; the scraped input is never mutated.

use crate::domain::Post;

/// Build the working corpus for one analysis run.
///
/// Posts are stable-sorted by `score` descending (ties keep their original
/// relative order), the first `num_top_posts` are kept, and within each kept
/// post comments scoring strictly below `min_comment_score` are removed.
///
/// Asking for more posts than exist returns the full corpus; an empty input
/// returns an empty corpus.
pub fn select_top_posts(posts: &[Post], num_top_posts: usize, min_comment_score: i64) -> Vec<Post> {
    let mut sorted: Vec<&Post> = posts.iter().collect();
    sorted.sort_by(|a, b| b.score.cmp(&a.score));
    sorted
        .into_iter()
        .take(num_top_posts)
        .map(|p| p.with_comments_above(min_comment_score))
        .collect()
}
