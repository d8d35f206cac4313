//! Summary payload types and the decoder that absorbs the backend's payload shapes.
//!
//! The backend has returned the topic list as `{summary_items, created_at}`, as a
//! bare array and as `{summary}` over time. [`SummaryPayload::decode`] tells them
//! apart once, at the boundary, and [`SummaryPayload::normalize`] collapses the
//! result into a single `(topics, created_at)` pair.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("malformed {shape} payload: {source}")]
    Malformed {
        shape: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Which side of a story a perspective speaks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PerspectiveKind {
    #[default]
    First,
    Second,
    /// Any tag the client does not know; rendered like `First`
    #[serde(other)]
    Other,
}

/// One side's viewpoint on a topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Perspective {
    #[serde(rename = "type", default)]
    pub kind: PerspectiveKind,
    pub title: String,
    /// Emoji shown in front of the title
    #[serde(default)]
    pub icon: String,
    /// Summary sentences
    #[serde(default)]
    pub perspectives: Vec<String>,
    #[serde(default)]
    pub links: Vec<String>,
}

/// One news story summarized from two perspectives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Topic {
    pub title: String,
    pub first_perspective: Perspective,
    pub second_perspective: Perspective,
    #[serde(default)]
    pub reference_url: Vec<String>,
}

#[derive(Deserialize)]
struct CurrentEnvelope {
    #[serde(deserialize_with = "topic_list")]
    summary_items: Vec<Topic>,
    #[serde(default)]
    created_at: Option<String>,
}

#[derive(Deserialize)]
struct LegacyEnvelope {
    #[serde(deserialize_with = "topic_list")]
    summary: Vec<Topic>,
}

/// A topic array, or an object without keys standing in for "no topics yet".
fn topic_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Topic>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Object(map) if map.is_empty() => Ok(Vec::new()),
        other => serde_json::from_value(other).map_err(serde::de::Error::custom),
    }
}

/// A summary response, discriminated by the shape it arrived in.
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryPayload {
    /// `{ "summary_items": [...], "created_at": "..." }`
    Current {
        topics: Vec<Topic>,
        created_at: Option<String>,
    },
    /// `[...]`
    Bare(Vec<Topic>),
    /// `{ "summary": [...] }`
    Legacy(Vec<Topic>),
    /// Anything else, passed through untouched
    Opaque(Value),
}

impl SummaryPayload {
    /// Decode a raw response body. The first matching shape wins.
    pub fn decode(value: Value) -> Result<Self, PayloadError> {
        if has_field(&value, "summary_items") {
            let envelope: CurrentEnvelope =
                serde_json::from_value(value).map_err(|source| PayloadError::Malformed {
                    shape: "summary_items",
                    source,
                })?;
            return Ok(Self::Current {
                topics: envelope.summary_items,
                created_at: envelope.created_at,
            });
        }

        if value.is_array() {
            let topics = serde_json::from_value(value).map_err(|source| {
                PayloadError::Malformed {
                    shape: "array",
                    source,
                }
            })?;
            return Ok(Self::Bare(topics));
        }

        if has_field(&value, "summary") {
            let envelope: LegacyEnvelope =
                serde_json::from_value(value).map_err(|source| PayloadError::Malformed {
                    shape: "summary",
                    source,
                })?;
            return Ok(Self::Legacy(envelope.summary));
        }

        Ok(Self::Opaque(value))
    }

    /// Short name of the shape, for logging
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Current { .. } => "summary_items",
            Self::Bare(_) => "array",
            Self::Legacy(_) => "summary",
            Self::Opaque(_) => "opaque",
        }
    }

    /// Collapse the payload into its topics and creation time.
    pub fn normalize(self) -> NormalizedSummary {
        match self {
            Self::Current { topics, created_at } => NormalizedSummary {
                topics: TopicSet::List(topics),
                created_at,
            },
            Self::Bare(topics) | Self::Legacy(topics) => NormalizedSummary {
                topics: TopicSet::List(topics),
                created_at: None,
            },
            Self::Opaque(value) => NormalizedSummary {
                topics: TopicSet::Opaque(value),
                created_at: None,
            },
        }
    }
}

/// A null property counts as absent.
fn has_field(value: &Value, key: &str) -> bool {
    value.get(key).is_some_and(|v| !v.is_null())
}

/// The canonical `(topics, created_at)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSummary {
    pub topics: TopicSet,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TopicSet {
    List(Vec<Topic>),
    Opaque(Value),
}

impl TopicSet {
    /// An empty sequence, or an object without keys.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::List(topics) => topics.is_empty(),
            Self::Opaque(Value::Array(items)) => items.is_empty(),
            Self::Opaque(Value::Object(map)) => map.is_empty(),
            Self::Opaque(_) => false,
        }
    }
}
