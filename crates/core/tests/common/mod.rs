#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::SystemTime,
};

use async_trait::async_trait;
use jumptube_core::{
    ApiError, AppOrchestrator, MomentMatches, MomentSearchRequest, SearchRequest, SearchResult,
    SummarizeRequest, SummaryText, TimestampMatch, VideoApi, VideoSummary, extract_video_id,
    format_timestamp,
};
use tokio::sync::oneshot;

pub type Reply<T> = oneshot::Sender<Result<T, ApiError>>;
type Gate<T> = oneshot::Receiver<Result<T, ApiError>>;

/// `VideoApi` whose calls block until the test releases them, so the test
/// decides the order in which results arrive.
#[derive(Default)]
pub struct ScriptedApi {
    searches: Mutex<HashMap<String, Gate<SearchResult>>>,
    moments: Mutex<HashMap<String, Gate<MomentMatches>>>,
    summaries: Mutex<HashMap<String, Gate<SummaryText>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Gate the search for `query`; the call waits until the reply is sent.
    pub fn gate_search(&self, query: &str) -> Reply<SearchResult> {
        gate(&self.searches, query)
    }

    pub fn gate_moments(&self, prompt: &str) -> Reply<MomentMatches> {
        gate(&self.moments, prompt)
    }

    pub fn gate_summary(&self, video_ref: &str) -> Reply<SummaryText> {
        gate(&self.summaries, video_ref)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn gate<T>(map: &Mutex<HashMap<String, Gate<T>>>, key: &str) -> Reply<T> {
    let (tx, rx) = oneshot::channel();
    map.lock().unwrap().insert(key.to_string(), rx);
    tx
}

async fn wait<T>(map: &Mutex<HashMap<String, Gate<T>>>, key: &str) -> Result<T, ApiError> {
    let gate = map.lock().unwrap().remove(key);
    let Some(gate) = gate else {
        return Err(ApiError::Transport {
            endpoint: "scripted".to_string(),
            reason: format!("no gate registered for {key:?}"),
        });
    };
    gate.await.unwrap_or_else(|_| {
        Err(ApiError::Transport {
            endpoint: "scripted".to_string(),
            reason: "reply dropped".to_string(),
        })
    })
}

#[async_trait]
impl VideoApi for ScriptedApi {
    async fn search(&self, request: SearchRequest) -> jumptube_core::Result<SearchResult> {
        self.record(format!("search:{}", request.query()));
        wait(&self.searches, request.query()).await
    }

    async fn search_within_video(
        &self,
        request: MomentSearchRequest,
    ) -> jumptube_core::Result<MomentMatches> {
        self.record(format!("moments:{}", request.prompt()));
        wait(&self.moments, request.prompt()).await
    }

    async fn summarize(&self, request: SummarizeRequest) -> jumptube_core::Result<SummaryText> {
        self.record(format!("summary:{}", request.video_ref()));
        wait(&self.summaries, request.video_ref()).await
    }
}

pub fn orchestrator(api: &Arc<ScriptedApi>) -> AppOrchestrator {
    AppOrchestrator::new(api.clone(), 10)
}

pub fn search_result(query: &str, ids: &[&str]) -> SearchResult {
    SearchResult {
        query: query.to_string(),
        items: ids
            .iter()
            .map(|id| VideoSummary {
                id: extract_video_id(id),
                title: format!("Video {id}"),
                description: String::new(),
                canonical_url: format!("https://youtu.be/{id}"),
            })
            .collect(),
        total_reported: ids.len(),
        issued_at: SystemTime::now(),
    }
}

pub fn summary(video_ref: &str, body: &str) -> SummaryText {
    SummaryText {
        video_ref: video_ref.to_string(),
        body: body.to_string(),
    }
}

pub fn moments(video_ref: &str, prompt: &str, offsets: &[u64]) -> MomentMatches {
    MomentMatches {
        video_ref: video_ref.to_string(),
        prompt: prompt.to_string(),
        matches: offsets
            .iter()
            .map(|&seconds| TimestampMatch {
                offset_label: format_timestamp(seconds),
                offset_seconds: seconds,
                snippet: format!("line at {seconds}"),
                jump_url: format!("{video_ref}?t={seconds}s"),
            })
            .collect(),
    }
}
