use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::{
    client::{ApiClient, VideoApi},
    config::ClientConfig,
    controllers::{OverlayController, OverlayView, SearchController},
    error::{ApiError, RequestError},
    events::{Completion, CompletionBus, CompletionReceiver, MetricsSnapshot, SlotKind},
    state::{OperationState, RequestToken},
    types::SearchResult,
};

/// Result of routing one completion to its controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    pub slot: SlotKind,
    pub token: RequestToken,
    /// `false` when the completion was stale and left the state untouched.
    pub applied: bool,
}

/// The surface the presentation layer binds to.
///
/// Intents are synchronous; completions are applied only by
/// [`AppOrchestrator::next_completion`], so every state has one writer.
pub struct AppOrchestrator {
    search: SearchController,
    overlay: OverlayController,
    completions: CompletionReceiver,
    bus: CompletionBus,
}

impl AppOrchestrator {
    pub fn new(api: Arc<dyn VideoApi>, default_top_k: u32) -> Self {
        let (bus, completions) = CompletionBus::new(Uuid::new_v4());
        Self {
            search: SearchController::new(Arc::clone(&api), bus.clone()),
            overlay: OverlayController::new(api, bus.clone(), default_top_k),
            completions,
            bus,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let api = ApiClient::from_config(config)?;
        Ok(Self::new(Arc::new(api), config.default_top_k))
    }

    pub fn session_id(&self) -> Uuid {
        self.bus.session_id()
    }

    pub fn search_state(&self) -> &OperationState<SearchResult> {
        self.search.current_state()
    }

    pub fn overlay_state(&self) -> OverlayView<'_> {
        self.overlay.view()
    }

    pub fn run_search(&mut self, query: &str, limit: u32) -> Result<RequestToken, RequestError> {
        self.search.issue_search(query, limit)
    }

    pub fn open_in_video_search(&mut self, video_ref: &str) -> Result<(), RequestError> {
        self.overlay.open_in_video_search(video_ref)
    }

    pub fn open_summary(&mut self, video_ref: &str) -> Result<RequestToken, RequestError> {
        self.overlay.open_summary(video_ref)
    }

    pub fn close_overlay(&mut self) {
        self.overlay.close();
    }

    pub fn submit_in_video_query(
        &mut self,
        prompt: &str,
        top_k: Option<u32>,
    ) -> Result<RequestToken, RequestError> {
        self.overlay.submit_prompt(prompt, top_k)
    }

    /// True while any visible state is waiting on a request.
    pub fn is_busy(&self) -> bool {
        self.search.current_state().is_loading() || self.overlay.is_loading()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.bus.metrics().snapshot()
    }

    /// Wait for the next completion and route it to its controller.
    ///
    /// Cancel safe, so it can sit in a `tokio::select!` next to user input.
    pub async fn next_completion(&mut self) -> Option<Delivery> {
        let enriched = self.completions.recv().await?;
        Some(self.route(enriched.completion))
    }

    /// Pump completions until nothing visible is loading.
    pub async fn settle(&mut self) {
        while self.is_busy() {
            if self.next_completion().await.is_none() {
                return;
            }
        }
    }

    fn route(&mut self, completion: Completion) -> Delivery {
        let slot = completion.kind();
        let token = completion.token();
        let applied = match completion {
            Completion::Search { token, outcome } => self.search.apply(token, outcome),
            Completion::InVideoSearch { token, outcome } => {
                self.overlay.apply_moments(token, outcome)
            }
            Completion::Summary { token, outcome } => self.overlay.apply_summary(token, outcome),
        };

        if !applied {
            self.bus.metrics().record_stale();
            debug!(session_id = %self.session_id(), slot = slot.name(), %token, "stale completion");
        }

        Delivery {
            slot,
            token,
            applied,
        }
    }
}
