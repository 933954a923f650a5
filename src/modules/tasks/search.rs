use crate::modules::analysis::CollaboratorError;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;

const DUCKDUCKGO_API: &str = "https://api.duckduckgo.com/";
const WIKIPEDIA_API: &str = "https://en.wikipedia.org/w/api.php";
const WIKIPEDIA_SUMMARY: &str = "https://en.wikipedia.org/api/rest_v1/page/summary/";
const MIN_ABSTRACT_LEN: usize = 15;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// A short answer for `topic`, or `None` when nothing useful was found.
    async fn search(&self, topic: &str) -> Result<Option<String>, CollaboratorError>;
}

#[derive(Debug, Default, Deserialize)]
struct DuckDuckGoIcon {
    #[serde(rename = "URL", default)]
    url: String,
}

#[derive(Debug, Default, Deserialize)]
struct DuckDuckGoTopic {
    #[serde(rename = "Text", default)]
    text: String,
    #[serde(rename = "Icon", default)]
    icon: Option<DuckDuckGoIcon>,
    #[serde(rename = "Topics", default)]
    topics: Vec<DuckDuckGoTopic>,
}

#[derive(Debug, Default, Deserialize)]
struct DuckDuckGoAnswer {
    #[serde(rename = "AbstractText", default)]
    abstract_text: String,
    #[serde(rename = "Image", default)]
    image: String,
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<DuckDuckGoTopic>,
}

#[derive(Debug, Default, Deserialize)]
struct WikipediaHit {
    title: String,
}

#[derive(Debug, Default, Deserialize)]
struct WikipediaQuery {
    #[serde(default)]
    search: Vec<WikipediaHit>,
}

#[derive(Debug, Default, Deserialize)]
struct WikipediaSearch {
    #[serde(default)]
    query: Option<WikipediaQuery>,
}

#[derive(Debug, Default, Deserialize)]
struct WikipediaThumbnail {
    source: String,
}

#[derive(Debug, Default, Deserialize)]
struct WikipediaSummary {
    #[serde(default)]
    extract: String,
    #[serde(default)]
    thumbnail: Option<WikipediaThumbnail>,
}

/// Instant answers from DuckDuckGo, falling back to Wikipedia summaries.
pub struct WebSearch {
    client: Client,
}

impl WebSearch {
    pub fn new() -> Result<Self, CollaboratorError> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self { client })
    }

    fn with_image(text: String, image: &str) -> String {
        let image = if image.starts_with("//") {
            format!("https:{}", image)
        } else if image.starts_with("/i/") {
            format!("https://duckduckgo.com{}", image)
        } else {
            image.to_string()
        };

        if image.is_empty() {
            text
        } else {
            format!("{}\n\n[Image preview]({})", text, image)
        }
    }

    fn duckduckgo_reply(answer: DuckDuckGoAnswer) -> Option<String> {
        let (text, image) = if !answer.abstract_text.is_empty() {
            (answer.abstract_text, answer.image)
        } else {
            let first = answer.related_topics.into_iter().next()?;
            let nested = first.topics.into_iter().next().unwrap_or_default();
            let text = if first.text.is_empty() { nested.text } else { first.text };
            let image = first
                .icon
                .map(|icon| icon.url)
                .filter(|url| !url.is_empty())
                .or_else(|| nested.icon.map(|icon| icon.url))
                .unwrap_or_default();
            (text, image)
        };

        if text.chars().count() > MIN_ABSTRACT_LEN {
            Some(Self::with_image(text, &image))
        } else {
            None
        }
    }

    async fn duckduckgo(&self, topic: &str) -> Result<Option<String>, CollaboratorError> {
        let answer: DuckDuckGoAnswer = self
            .client
            .get(DUCKDUCKGO_API)
            .query(&[("q", topic), ("format", "json"), ("no_redirect", "1"), ("skip_disambig", "1")])
            .send()
            .await?
            .json()
            .await?;

        Ok(Self::duckduckgo_reply(answer))
    }

    async fn wikipedia(&self, topic: &str) -> Result<Option<String>, CollaboratorError> {
        let search: WikipediaSearch = self
            .client
            .get(WIKIPEDIA_API)
            .query(&[("action", "query"), ("list", "search"), ("srsearch", topic), ("format", "json"), ("utf8", "1")])
            .send()
            .await?
            .json()
            .await?;

        let title = match search.query.and_then(|query| query.search.into_iter().next()) {
            Some(hit) => hit.title,
            None => return Ok(None),
        };

        let mut url = Url::parse(WIKIPEDIA_SUMMARY).map_err(|e| CollaboratorError::Search(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| CollaboratorError::Search("Invalid summary url".to_string()))?
            .pop_if_empty()
            .push(&title);

        let summary: WikipediaSummary = self.client.get(url).send().await?.json().await?;
        if summary.extract.is_empty() {
            return Ok(None);
        }

        let image = summary.thumbnail.map(|thumbnail| thumbnail.source).unwrap_or_default();
        Ok(Some(Self::with_image(summary.extract, &image)))
    }
}

#[async_trait]
impl SearchProvider for WebSearch {
    async fn search(&self, topic: &str) -> Result<Option<String>, CollaboratorError> {
        if let Some(answer) = self.duckduckgo(topic).await? {
            return Ok(Some(answer));
        }
        self.wikipedia(topic).await
    }
}
