//! Run documents: one execution of the persona pipeline over a feed

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::null_as_default;

/// A processed feed item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Item {
    pub id: String,
    pub title: String,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_content_summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance_to_criteria: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub is_relevant: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<FeedEntry>,
}

/// Raw feed entry as the pipeline received it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeedEntry {
    pub title: String,
    pub link: Link,
    pub id: String,
    pub published: String,
    pub content: String,
    #[serde(deserialize_with = "null_as_default")]
    pub comments: Vec<EntryComment>,
    #[serde(rename = "externalURLs", deserialize_with = "null_as_default")]
    pub external_urls: Vec<String>,
    #[serde(rename = "imageURLs", deserialize_with = "null_as_default")]
    pub image_urls: Vec<String>,
    pub media_thumbnail: MediaThumbnail,
    pub image_description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub web_content_summaries: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryComment {
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Link {
    pub href: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaThumbnail {
    pub url: String,
}

/// One feed item plus its processing results and timing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntrySummary {
    pub raw_input: String,
    pub results: Item,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<u64>,
}

/// Summarization viewpoint. Opaque to the dashboard apart from display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Persona {
    pub name: String,
    pub feed_url: String,
    pub topic: String,
    pub persona_identity: String,
    pub base_prompt_task: String,
    pub summary_prompt_task: String,
    pub focus_areas: Option<Vec<String>>,
    pub relevance_criteria: Option<Vec<String>>,
    pub summary_analysis: Option<Vec<String>>,
    pub exclusion_criteria: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageSummary {
    #[serde(rename = "imageURL")]
    pub image_url: String,
    pub image_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "entryID", skip_serializing_if = "Option::is_none")]
    pub entry_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebContentSummary {
    pub url: String,
    pub original_content: String,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "entryID", skip_serializing_if = "Option::is_none")]
    pub entry_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<u64>,
}

/// A key development and the item it references
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyDevelopment {
    pub text: String,
    #[serde(rename = "itemID")]
    pub item_id: String,
}

/// Overall summary across the relevant items of a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SummaryResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub key_developments: Vec<KeyDevelopment>,
}

/// A complete run as persisted by the service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunRecord {
    pub run_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub entry_summaries: Vec<EntrySummary>,
    #[serde(deserialize_with = "null_as_default")]
    pub image_summaries: Vec<ImageSummary>,
    #[serde(deserialize_with = "null_as_default")]
    pub web_content_summaries: Vec<WebContentSummary>,
    pub overall_summary: Option<SummaryResponse>,
    #[serde(deserialize_with = "null_as_default")]
    pub persona: Persona,
    pub run_date: Option<DateTime<Utc>>,
    pub overall_model_used: String,
    pub image_model_used: String,
    pub web_content_model_used: String,
    pub total_processing_time: Option<u64>,
    pub entry_total_processing_time: Option<u64>,
    pub image_total_processing_time: Option<u64>,
    pub web_content_total_processing_time: Option<u64>,
    pub success_rate: Option<f64>,
}

impl RunRecord {
    /// Key developments, empty when the run carries no overall summary
    pub fn key_developments(&self) -> &[KeyDevelopment] {
        self.overall_summary
            .as_ref()
            .map(|s| s.key_developments.as_slice())
            .unwrap_or(&[])
    }
}

/// Listing row for a stored run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunMetadata {
    pub id: String,
    pub persona_name: String,
    pub run_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_model_used: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_benchmark: Option<bool>,
}
