//! Web lookups: DuckDuckGo Instant Answers for `research`, Wikipedia page
//! summaries for `discuss`.

use crate::error::{SkillError, SkillResult};
use async_trait::async_trait;
use raki_core::services::{SearchHit, ServiceResult, WebSearch};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const DDG_ENDPOINT: &str = "https://api.duckduckgo.com/";
const MAX_HITS: usize = 5;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct InstantAnswer {
    heading: String,
    abstract_text: String,
    #[serde(rename = "AbstractURL")]
    abstract_url: String,
    related_topics: Vec<RelatedTopic>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RelatedTopic {
    Topic {
        #[serde(rename = "Text")]
        text: String,
        #[serde(rename = "FirstURL", default)]
        first_url: String,
    },
    Group {
        #[serde(rename = "Topics")]
        topics: Vec<RelatedTopic>,
    },
}

fn collect_topics<'a>(topics: &'a [RelatedTopic], out: &mut Vec<(&'a str, &'a str)>) {
    for topic in topics {
        match topic {
            RelatedTopic::Topic { text, first_url } => out.push((text.as_str(), first_url.as_str())),
            RelatedTopic::Group { topics } => collect_topics(topics, out),
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    Some(s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Abstract first (when present), then related topics, capped at `limit`.
fn hits_from(answer: &InstantAnswer, limit: usize) -> Vec<SearchHit> {
    let mut hits = Vec::new();
    if let Some(snippet) = non_empty(&answer.abstract_text) {
        hits.push(SearchHit {
            title: non_empty(&answer.heading).unwrap_or_else(|| snippet.clone()),
            snippet,
            url: non_empty(&answer.abstract_url),
        });
    }
    let mut related = Vec::new();
    collect_topics(&answer.related_topics, &mut related);
    for (text, url) in related {
        let Some(text) = non_empty(text) else { continue };
        let title = text.split(" - ").next().unwrap_or(&text).to_string();
        hits.push(SearchHit {
            title,
            snippet: text,
            url: non_empty(url),
        });
    }
    hits.truncate(limit);
    hits
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PageSummary {
    #[serde(rename = "type")]
    kind: String,
    extract: String,
}

fn summary_text(page: PageSummary) -> Option<String> {
    if page.kind == "disambiguation" {
        return None;
    }
    non_empty(&page.extract)
}

fn wikipedia_title(topic: &str) -> String {
    urlencoding::encode(&topic.trim().replace(' ', "_")).into_owned()
}

pub struct DuckDuckGoSearch {
    client: reqwest::Client,
    offline: bool,
}

impl DuckDuckGoSearch {
    pub fn new(offline: bool) -> SkillResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(concat!("raki/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, offline })
    }

    async fn instant_answer(&self, query: &str) -> SkillResult<Vec<SearchHit>> {
        if self.offline {
            return Err(SkillError::Offline);
        }
        let answer: InstantAnswer = self
            .client
            .get(DDG_ENDPOINT)
            .query(&[("q", query), ("format", "json"), ("no_html", "1"), ("skip_disambig", "1")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let hits = hits_from(&answer, MAX_HITS);
        debug!(target: "raki::search", query, hits = hits.len(), "instant answer");
        Ok(hits)
    }

    async fn page_summary(&self, topic: &str, lang: &str) -> SkillResult<Option<String>> {
        if self.offline {
            return Err(SkillError::Offline);
        }
        let url = format!(
            "https://{}.wikipedia.org/api/rest_v1/page/summary/{}",
            lang,
            wikipedia_title(topic)
        );
        let response = self.client.get(&url).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            debug!(target: "raki::search", topic, lang, "no encyclopedia page");
            return Ok(None);
        }
        let page: PageSummary = response.error_for_status()?.json().await?;
        Ok(summary_text(page))
    }
}

#[async_trait]
impl WebSearch for DuckDuckGoSearch {
    async fn search(&self, query: &str, _lang: &str) -> ServiceResult<Vec<SearchHit>> {
        self.instant_answer(query).await.map_err(|e| {
            warn!(target: "raki::search", error = %e, "web search failed");
            e.into()
        })
    }

    async fn summarize(&self, topic: &str, lang: &str) -> ServiceResult<Option<String>> {
        Ok(self.page_summary(topic, lang).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abstract_comes_first_and_groups_are_flattened() {
        let json = r#"{
            "Heading": "Rust (programming language)",
            "AbstractText": "Rust is a general-purpose programming language.",
            "AbstractURL": "https://en.wikipedia.org/wiki/Rust_(programming_language)",
            "RelatedTopics": [
                {"Text": "Cargo - Rust package manager", "FirstURL": "https://duckduckgo.com/Cargo"},
                {"Name": "See also", "Topics": [
                    {"Text": "Ferris - the Rust mascot", "FirstURL": "https://duckduckgo.com/Ferris"}
                ]}
            ]
        }"#;
        let answer: InstantAnswer = serde_json::from_str(json).unwrap();
        let hits = hits_from(&answer, 5);
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].title, "Rust (programming language)");
        assert_eq!(hits[1].title, "Cargo");
        assert_eq!(hits[2].snippet, "Ferris - the Rust mascot");
        assert_eq!(hits[2].url.as_deref(), Some("https://duckduckgo.com/Ferris"));
    }

    #[test]
    fn empty_answer_has_no_hits() {
        let answer: InstantAnswer = serde_json::from_str(r#"{"AbstractText": "", "RelatedTopics": []}"#).unwrap();
        assert!(hits_from(&answer, 5).is_empty());
    }

    #[test]
    fn disambiguation_pages_are_not_summaries() {
        let page: PageSummary =
            serde_json::from_str(r#"{"type": "disambiguation", "extract": "Mercury may refer to:"}"#).unwrap();
        assert_eq!(summary_text(page), None);
        let page: PageSummary =
            serde_json::from_str(r#"{"type": "standard", "extract": "Mercury is a planet."}"#).unwrap();
        assert_eq!(summary_text(page).as_deref(), Some("Mercury is a planet."));
    }

    #[test]
    fn titles_are_path_safe() {
        assert_eq!(wikipedia_title("black holes"), "black_holes");
        assert_eq!(wikipedia_title("c++/cli"), "c%2B%2B%2Fcli");
    }

    #[tokio::test]
    async fn offline_mode_refuses_lookups() {
        let search = DuckDuckGoSearch::new(true).unwrap();
        let err = search.search("rust", "en").await.unwrap_err();
        assert!(matches!(err, raki_core::services::ServiceError::Unavailable(_)));
    }
}
