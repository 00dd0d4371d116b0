//! # Bullion News
//!
//! Turns raw headlines into what the dashboard displays: a short digest, a
//! keyword-based sentiment tag and, on request, a schema.org JSON-LD document
//! describing the feed.

pub mod error;
pub mod sentiment;
pub mod structured_data;

pub use error::NewsError;
pub use sentiment::{Sentiment, classify};
pub use structured_data::structured_data;

use core_types::NewsItem;
use serde::Serialize;

/// A headline ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaggedNews {
    pub title: String,
    pub link: String,
    pub digest: String,
    pub sentiment: Sentiment,
}

/// The text shown under a headline: its summary, or the title when the feed
/// carries none, cut down to `max_words` words.
pub fn digest(item: &NewsItem, max_words: usize) -> String {
    let text = item
        .summary
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(&item.title);

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max_words {
        return words.join(" ");
    }
    format!("{}…", words[..max_words].join(" "))
}

/// Digests and classifies every valid headline, preserving feed order.
pub fn tag(items: &[NewsItem], max_words: usize) -> Vec<TaggedNews> {
    items
        .iter()
        .filter(|item| {
            let valid = item.is_valid();
            if !valid {
                tracing::warn!(link = %item.link, "Skipping headline with an empty title.");
            }
            valid
        })
        .map(|item| {
            let digest = digest(item, max_words);
            // The summary adds context the headline may lack.
            let sentiment = classify(&format!("{} {}", item.title, digest));
            TaggedNews {
                title: item.title.clone(),
                link: item.link.clone(),
                digest,
                sentiment,
            }
        })
        .collect()
}
