//! Reddit public JSON API client.
//!
//! Reads the unauthenticated `.json` endpoints: search, subreddit listings,
//! and per-post comment trees. Reddit expects a descriptive User-Agent and
//! modest pacing; comment fetches sleep a randomized 1-3 seconds apart.

use std::time::Duration;

use rand::Rng;
use reqwest::Client;
use serde_json::Value;

use crate::domain::{Comment, Post};
use crate::error::{RedsiftError, Result};
use crate::scrape::listing::{Listing, TimeFilter};

const REDDIT_BASE_URL: &str = "https://www.reddit.com";

/// Client for Reddit's public JSON endpoints.
pub struct RedditClient {
    http: Client,
}

impl RedditClient {
    /// Create a client with the given User-Agent string.
    pub fn new(user_agent: &str) -> Result<Self> {
        let http = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| RedsiftError::Scrape(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { http })
    }

    /// Search all of Reddit for posts matching `query`.
    pub async fn search(
        &self,
        query: &str,
        time_filter: TimeFilter,
        limit: u32,
    ) -> Result<Vec<Post>> {
        log::info!("Searching for '{}' with time filter {}", query, time_filter);

        let url = format!("{}/search.json", REDDIT_BASE_URL);
        let limit = limit.to_string();
        let body = self
            .fetch_json(&url, &[
                ("q", query),
                ("sort", "relevance"),
                ("t", time_filter.as_str()),
                ("limit", limit.as_str()),
            ])
            .await?;

        let posts = parse_post_listing(&body);
        log::info!("Search returned {} posts", posts.len());
        Ok(posts)
    }

    /// Fetch a subreddit listing (hot, new, top, rising).
    pub async fn subreddit_posts(
        &self,
        subreddit: &str,
        listing: Listing,
        time_filter: TimeFilter,
        limit: u32,
    ) -> Result<Vec<Post>> {
        log::info!("Fetching /r/{}/{} listing", subreddit, listing);

        let url = format!("{}/r/{}/{}.json", REDDIT_BASE_URL, subreddit, listing);
        let limit = limit.to_string();
        let body = self
            .fetch_json(&url, &[
                ("t", time_filter.as_str()),
                ("limit", limit.as_str()),
            ])
            .await?;

        let posts = parse_post_listing(&body);
        log::info!("Listing returned {} posts", posts.len());
        Ok(posts)
    }

    /// Fetch and flatten the comment tree for one post.
    pub async fn fetch_comments(&self, post_id: &str) -> Result<Vec<Comment>> {
        let url = format!("{}/comments/{}.json", REDDIT_BASE_URL, post_id);
        let body = self.fetch_json(&url, &[("limit", "500")]).await?;

        // The endpoint returns [post listing, comment listing]
        let comment_listing = body
            .get(1)
            .ok_or_else(|| RedsiftError::Scrape(format!("No comment listing for {}", post_id)))?;

        Ok(parse_comment_tree(comment_listing))
    }

    /// Fill in the comment tree for each post, skipping posts whose fetch
    /// fails. Sleeps a randomized 1-3 seconds between fetches.
    pub async fn collect_comments(&self, posts: Vec<Post>) -> Vec<Post> {
        let total = posts.len();
        let mut collected = Vec::with_capacity(total);

        for (count, mut post) in posts.into_iter().enumerate() {
            log::info!("Processing post {}/{}: {}", count + 1, total, post.id);

            let pause = {
                let mut rng = rand::thread_rng();
                Duration::from_millis(rng.gen_range(1000..=3000))
            };
            tokio::time::sleep(pause).await;

            match self.fetch_comments(&post.id).await {
                Ok(comments) => {
                    post.comments = comments;
                    collected.push(post);
                }
                Err(e) => {
                    log::error!("Failed to fetch comments for {}: {}", post.id, e);
                }
            }
        }

        log::info!("Finished processing posts. Collected: {}", collected.len());
        collected
    }

    async fn fetch_json(&self, url: &str, params: &[(&str, &str)]) -> Result<Value> {
        let response = self
            .http
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| RedsiftError::Scrape(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RedsiftError::Scrape(format!(
                "HTTP {} from {}",
                status, url
            )));
        }

        response
            .json()
            .await
            .map_err(|e| RedsiftError::Scrape(format!("Invalid JSON from {}: {}", url, e)))
    }
}

/// Strip zero-width and invisible characters Reddit leaves in markdown.
fn clean_text(text: &str) -> String {
    let without_entities = text
        .replace("&#x200B;", "")
        .replace("&#x200C;", "")
        .replace("&#x200D;", "")
        .replace("&#xFEFF;", "");
    without_entities
        .chars()
        .filter(|c| !matches!(c, '\u{200B}'..='\u{200D}' | '\u{FEFF}'))
        .collect()
}

/// Format a Reddit `created_utc` epoch as "%Y-%m-%d %H:%M:%S UTC".
fn format_created_utc(epoch: f64) -> String {
    chrono::DateTime::from_timestamp(epoch as i64, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_default()
}

/// Parse a `{"kind": "Listing", ...}` envelope of t3 submissions into posts.
/// Comments are left empty; they come from the per-post endpoint.
fn parse_post_listing(body: &Value) -> Vec<Post> {
    let Some(children) = body["data"]["children"].as_array() else {
        return Vec::new();
    };

    children
        .iter()
        .filter(|child| child["kind"] == "t3")
        .filter_map(|child| {
            let data = child.get("data")?;
            Some(Post {
                id: data["id"].as_str()?.to_string(),
                title: clean_text(data["title"].as_str().unwrap_or_default()),
                body: clean_text(data["selftext"].as_str().unwrap_or_default()),
                author: data["author"].as_str().unwrap_or("[deleted]").to_string(),
                subreddit: data["subreddit"].as_str().unwrap_or_default().to_string(),
                score: data["score"].as_i64().unwrap_or(0),
                created_at: format_created_utc(data["created_utc"].as_f64().unwrap_or(0.0)),
                num_comments: data["num_comments"].as_u64().unwrap_or(0),
                comments: Vec::new(),
            })
        })
        .collect()
}

/// Flatten a comment listing, depth-first, skipping "more" stubs.
fn parse_comment_tree(listing: &Value) -> Vec<Comment> {
    let mut comments = Vec::new();
    flatten_comments(listing, &mut comments);
    comments
}

fn flatten_comments(listing: &Value, out: &mut Vec<Comment>) {
    let Some(children) = listing["data"]["children"].as_array() else {
        return;
    };

    for child in children {
        if child["kind"] != "t1" {
            continue;
        }
        let data = &child["data"];

        if let Some(body) = data["body"].as_str() {
            out.push(Comment {
                body: clean_text(body),
                author: data["author"].as_str().unwrap_or("[deleted]").to_string(),
                score: data["score"].as_i64().unwrap_or(0),
                created_at: format_created_utc(data["created_utc"].as_f64().unwrap_or(0.0)),
            });
        }

        // Replies nest another listing; an empty string means none
        let replies = &data["replies"];
        if replies.is_object() {
            flatten_comments(replies, out);
        }
    }
}
