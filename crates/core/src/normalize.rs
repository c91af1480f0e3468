//! Mapping between canonical requests/results and the service's wire shapes.
//!
//! Inbound parsing follows a "drop malformed rows" policy: a row that lacks a
//! required field (a usable video identifier for search rows, a position for
//! in-video matches) is left out of the collection and logged, while missing
//! optional fields fall back to empty strings. Only a body that fails the
//! check as a whole (no result collection at all) is reported as an error.

use serde_json::{Map, Value};
use tracing::warn;

use crate::{
    contract::{ContractConfig, ContractVariant},
    error::{ApiError, Result},
    format::{format_timestamp, jump_link, parse_timestamp_label},
    types::{
        HealthStatus, MomentMatches, MomentSearchRequest, SearchRequest, SearchResult,
        SummarizeRequest, SummaryText, TimestampMatch, VideoSummary,
    },
    video_ref::{VideoId, extract_video_id, to_locator},
};

#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseNormalizer {
    variant: ContractVariant,
}

impl ResponseNormalizer {
    pub fn new(variant: ContractVariant) -> Self {
        Self { variant }
    }

    pub fn variant(&self) -> ContractVariant {
        self.variant
    }

    pub fn wire(&self) -> ContractConfig {
        self.variant.config()
    }

    pub fn search_params(&self, request: &SearchRequest) -> Vec<(&'static str, String)> {
        let wire = self.wire();
        vec![
            (wire.search_query_param, request.query().to_string()),
            (wire.search_limit_param, request.limit().to_string()),
        ]
    }

    pub fn in_video_body(&self, request: &MomentSearchRequest) -> Value {
        let mut body = self.video_ref_body(request.video_ref());
        body.insert("prompt".to_string(), Value::from(request.prompt()));
        body.insert("top_k".to_string(), Value::from(request.top_k()));
        Value::Object(body)
    }

    pub fn summarize_body(&self, request: &SummarizeRequest) -> Value {
        Value::Object(self.video_ref_body(request.video_ref()))
    }

    fn video_ref_body(&self, video_ref: &str) -> Map<String, Value> {
        let mut body = Map::new();
        body.insert(
            self.wire().video_ref_field.to_string(),
            Value::from(self.variant.wire_video_ref(video_ref)),
        );
        body
    }

    pub fn search_result(&self, request: &SearchRequest, body: &Value) -> Result<SearchResult> {
        let endpoint = self.wire().search_path;
        let Some(rows) = body.get("results").and_then(Value::as_array) else {
            return Err(missing(endpoint, body, "results"));
        };

        let items: Vec<VideoSummary> = rows
            .iter()
            .enumerate()
            .filter_map(|(index, row)| {
                let item = self.video_row(row);
                if item.is_none() {
                    warn!(index, "dropping search row without a usable video identifier");
                }
                item
            })
            .collect();

        let total_reported = body
            .get("total_results")
            .and_then(Value::as_u64)
            .map(|n| n as usize)
            .unwrap_or(rows.len());

        Ok(SearchResult {
            query: non_empty(body, "query").unwrap_or(request.query()).to_string(),
            items,
            total_reported,
            issued_at: request.issued_at(),
        })
    }

    fn video_row(&self, row: &Value) -> Option<VideoSummary> {
        let wire = self.wire();
        let raw_id = non_empty(row, wire.row_id_field).or_else(|| non_empty(row, wire.row_id_alias))?;
        let id = VideoId::from_bare(raw_id)?;

        // Keep the invariant that the id is recoverable from the locator.
        let canonical_url = match non_empty(row, "url") {
            Some(url) if extract_video_id(url) == id => url.to_string(),
            _ => id.short_locator()?,
        };

        Some(VideoSummary {
            id,
            title: text(row, "title"),
            description: text(row, "description"),
            canonical_url,
        })
    }

    pub fn moment_matches(
        &self,
        request: &MomentSearchRequest,
        body: &Value,
    ) -> Result<MomentMatches> {
        let endpoint = self.wire().in_video_path;
        let Some(rows) = body.get("matches").and_then(Value::as_array) else {
            return Err(missing(endpoint, body, "matches"));
        };

        let locator = to_locator(request.video_ref());
        let matches = rows
            .iter()
            .enumerate()
            .filter_map(|(index, row)| {
                let item = match_row(&locator, row);
                if item.is_none() {
                    warn!(index, "dropping in-video match without a position");
                }
                item
            })
            .collect();

        Ok(MomentMatches {
            video_ref: resolve_video_ref(request.video_ref(), body),
            prompt: non_empty(body, "prompt").unwrap_or(request.prompt()).to_string(),
            matches,
        })
    }

    pub fn summary(&self, request: &SummarizeRequest, body: &Value) -> Result<SummaryText> {
        let endpoint = self.wire().summarize_path;
        let Some(summary) = non_empty(body, "summary") else {
            return Err(missing(endpoint, body, "a non-empty summary"));
        };

        Ok(SummaryText {
            video_ref: resolve_video_ref(request.video_ref(), body),
            body: summary.to_string(),
        })
    }

    pub fn health(&self, body: &Value) -> Result<HealthStatus> {
        match non_empty(body, "status") {
            Some(status) => Ok(HealthStatus {
                status: status.to_string(),
            }),
            None => Err(missing(self.wire().health_path, body, "status")),
        }
    }
}

/// Message carried by the service's structured error payload, if any.
///
/// `detail` is either a plain string or a list of validation errors with a
/// `msg` each.
pub fn upstream_detail(body: &Value) -> Option<String> {
    match body.get("detail")? {
        Value::String(message) if !message.trim().is_empty() => Some(message.clone()),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        _ => None,
    }
}

fn missing(endpoint: &str, body: &Value, what: &str) -> ApiError {
    match upstream_detail(body) {
        Some(message) => ApiError::Upstream {
            status: 200,
            message,
        },
        None => ApiError::Contract {
            endpoint: endpoint.to_string(),
            reason: format!("response has no {what}"),
        },
    }
}

fn match_row(locator: &str, row: &Value) -> Option<TimestampMatch> {
    let label = non_empty(row, "time");
    let offset_seconds = row
        .get("seconds")
        .and_then(seconds_value)
        .or_else(|| label.and_then(parse_timestamp_label))?;

    Some(TimestampMatch {
        offset_label: label
            .map(str::to_string)
            .unwrap_or_else(|| format_timestamp(offset_seconds)),
        offset_seconds,
        snippet: text(row, "text"),
        jump_url: non_empty(row, "url")
            .map(str::to_string)
            .unwrap_or_else(|| jump_link(locator, offset_seconds)),
    })
}

// The service sends seconds as a string; accept numbers too.
fn seconds_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f as u64)
            })
        }
        _ => None,
    }
}

/// Keep the caller's reference unless the echo names a different video.
fn resolve_video_ref(requested: &str, body: &Value) -> String {
    let echoed = non_empty(body, "video_url").or_else(|| non_empty(body, "video_id"));
    match echoed {
        Some(echo) => {
            let echoed_id = extract_video_id(echo);
            if !echoed_id.is_unknown() && echoed_id != extract_video_id(requested) {
                echo.to_string()
            } else {
                requested.to_string()
            }
        }
        None => requested.to_string(),
    }
}

fn non_empty<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn text(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
