use crate::error::NewsError;
use chrono::{DateTime, SecondsFormat, Utc};
use core_types::NewsItem;
use serde::Serialize;

const PUBLISHER: &str = "Gold & Silver Dashboard";

#[derive(Debug, Serialize)]
struct ItemList<'a> {
    #[serde(rename = "@context")]
    context: &'a str,
    #[serde(rename = "@type")]
    kind: &'a str,
    #[serde(rename = "itemListElement")]
    item_list_element: Vec<NewsArticle<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewsArticle<'a> {
    #[serde(rename = "@type")]
    kind: &'a str,
    position: usize,
    headline: &'a str,
    url: &'a str,
    date_published: String,
    author: Organization<'a>,
    description: &'a str,
}

#[derive(Debug, Serialize)]
struct Organization<'a> {
    #[serde(rename = "@type")]
    kind: &'a str,
    name: &'a str,
}

/// Renders the feed as a schema.org `ItemList` of `NewsArticle`s, pretty-printed.
///
/// Positions start at 1. Every article carries `published` as its publication
/// date, since the feed itself does not provide one.
pub fn structured_data(items: &[NewsItem], published: DateTime<Utc>) -> Result<String, NewsError> {
    let date_published = published.to_rfc3339_opts(SecondsFormat::Millis, true);
    let item_list_element = items
        .iter()
        .filter(|item| item.is_valid())
        .enumerate()
        .map(|(idx, item)| NewsArticle {
            kind: "NewsArticle",
            position: idx + 1,
            headline: &item.title,
            url: &item.link,
            date_published: date_published.clone(),
            author: Organization {
                kind: "Organization",
                name: PUBLISHER,
            },
            description: item.summary.as_deref().unwrap_or(&item.title),
        })
        .collect();

    let document = ItemList {
        context: "https://schema.org",
        kind: "ItemList",
        item_list_element,
    };
    Ok(serde_json::to_string_pretty(&document)?)
}
