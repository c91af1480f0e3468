use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::{error::RequestError, video_ref::VideoId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoSummary {
    pub id: VideoId,
    pub title: String,
    pub description: String,
    pub canonical_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub query: String,
    pub items: Vec<VideoSummary>,
    /// Count reported by the service. May exceed `items.len()` when
    /// malformed rows were dropped.
    pub total_reported: usize,
    pub issued_at: SystemTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimestampMatch {
    pub offset_label: String,
    pub offset_seconds: u64,
    pub snippet: String,
    pub jump_url: String,
}

/// Matches for one in-video search, in the service's relevance order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MomentMatches {
    pub video_ref: String,
    pub prompt: String,
    pub matches: Vec<TimestampMatch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryText {
    pub video_ref: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    query: String,
    limit: u32,
    issued_at: SystemTime,
}

impl SearchRequest {
    pub const MAX_LIMIT: u32 = 50;
    pub const DEFAULT_LIMIT: u32 = 20;

    /// Trims the query and clamps `limit` into `1..=MAX_LIMIT`. The issue
    /// time is taken here and carried into the `SearchResult`.
    pub fn new(query: &str, limit: u32) -> Result<Self, RequestError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(RequestError::EmptyQuery);
        }
        Ok(Self {
            query: query.to_string(),
            limit: limit.clamp(1, Self::MAX_LIMIT),
            issued_at: SystemTime::now(),
        })
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn issued_at(&self) -> SystemTime {
        self.issued_at
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MomentSearchRequest {
    video_ref: String,
    prompt: String,
    top_k: u32,
}

impl MomentSearchRequest {
    pub const DEFAULT_TOP_K: u32 = 10;

    pub fn new(video_ref: &str, prompt: &str, top_k: u32) -> Result<Self, RequestError> {
        let video_ref = video_ref.trim();
        let prompt = prompt.trim();
        if video_ref.is_empty() {
            return Err(RequestError::EmptyVideoRef);
        }
        if prompt.is_empty() {
            return Err(RequestError::EmptyPrompt);
        }
        Ok(Self {
            video_ref: video_ref.to_string(),
            prompt: prompt.to_string(),
            top_k: top_k.max(1),
        })
    }

    pub fn video_ref(&self) -> &str {
        &self.video_ref
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn top_k(&self) -> u32 {
        self.top_k
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarizeRequest {
    video_ref: String,
}

impl SummarizeRequest {
    pub fn new(video_ref: &str) -> Result<Self, RequestError> {
        let video_ref = video_ref.trim();
        if video_ref.is_empty() {
            return Err(RequestError::EmptyVideoRef);
        }
        Ok(Self {
            video_ref: video_ref.to_string(),
        })
    }

    pub fn video_ref(&self) -> &str {
        &self.video_ref
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_request_rejects_blank_query() {
        assert_eq!(SearchRequest::new("", 20), Err(RequestError::EmptyQuery));
        assert_eq!(SearchRequest::new(" \t\n", 20), Err(RequestError::EmptyQuery));
    }

    #[test]
    fn test_search_request_clamps_limit() {
        assert_eq!(SearchRequest::new("rust", 0).unwrap().limit(), 1);
        assert_eq!(SearchRequest::new("rust", 500).unwrap().limit(), 50);
        assert_eq!(SearchRequest::new("  rust  ", 20).unwrap().query(), "rust");
    }

    #[test]
    fn test_moment_request_validation() {
        assert_eq!(
            MomentSearchRequest::new("dQw4w9WgXcQ", "  ", 5),
            Err(RequestError::EmptyPrompt)
        );
        assert_eq!(
            MomentSearchRequest::new("", "hope", 5),
            Err(RequestError::EmptyVideoRef)
        );
        let request = MomentSearchRequest::new("dQw4w9WgXcQ", " hope ", 0).unwrap();
        assert_eq!(request.prompt(), "hope");
        assert_eq!(request.top_k(), 1);
    }
}
