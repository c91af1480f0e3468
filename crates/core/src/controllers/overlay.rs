use std::sync::Arc;

use tracing::{debug, info};

use super::spawn_request;
use crate::{
    client::VideoApi,
    error::{ErrorInfo, RequestError},
    events::{Completion, CompletionBus},
    state::{OperationSlot, OperationState, RequestToken},
    types::{MomentMatches, MomentSearchRequest, SummarizeRequest, SummaryText},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKind {
    InVideoSearch,
    Summary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct OpenOverlay {
    kind: OverlayKind,
    video_ref: String,
}

/// What the presentation layer should show on top of the results.
#[derive(Debug, PartialEq)]
pub enum OverlayView<'a> {
    Closed,
    InVideoSearch {
        video_ref: &'a str,
        state: &'a OperationState<MomentMatches>,
    },
    Summary {
        video_ref: &'a str,
        state: &'a OperationState<SummaryText>,
    },
}

impl OverlayView<'_> {
    pub fn kind(&self) -> Option<OverlayKind> {
        match self {
            OverlayView::Closed => None,
            OverlayView::InVideoSearch { .. } => Some(OverlayKind::InVideoSearch),
            OverlayView::Summary { .. } => Some(OverlayKind::Summary),
        }
    }

    pub fn is_loading(&self) -> bool {
        match self {
            OverlayView::Closed => false,
            OverlayView::InVideoSearch { state, .. } => state.is_loading(),
            OverlayView::Summary { state, .. } => state.is_loading(),
        }
    }
}

/// Owns the detail overlays. At most one is open; opening another, or
/// closing, leaves any in-flight request running but makes its result a
/// no-op when it arrives.
pub struct OverlayController {
    open: Option<OpenOverlay>,
    moments: OperationSlot<MomentMatches>,
    summary: OperationSlot<SummaryText>,
    default_top_k: u32,
    api: Arc<dyn VideoApi>,
    bus: CompletionBus,
}

impl OverlayController {
    pub fn new(api: Arc<dyn VideoApi>, bus: CompletionBus, default_top_k: u32) -> Self {
        Self {
            open: None,
            moments: OperationSlot::new(),
            summary: OperationSlot::new(),
            default_top_k,
            api,
            bus,
        }
    }

    /// Opens the summary overlay and immediately requests the summary.
    pub fn open_summary(&mut self, video_ref: &str) -> Result<RequestToken, RequestError> {
        let request = SummarizeRequest::new(video_ref)?;
        self.replace_open(OverlayKind::Summary, request.video_ref());

        let token = self.summary.begin();
        debug!(
            session_id = %self.bus.session_id(),
            %token,
            video_ref = request.video_ref(),
            "summary issued"
        );

        let api = Arc::clone(&self.api);
        spawn_request(
            &self.bus,
            async move { api.summarize(request).await },
            move |outcome| Completion::Summary { token, outcome },
        );

        Ok(token)
    }

    /// Opens the in-video search overlay. Nothing is requested until a
    /// prompt is submitted.
    pub fn open_in_video_search(&mut self, video_ref: &str) -> Result<(), RequestError> {
        let video_ref = video_ref.trim();
        if video_ref.is_empty() {
            return Err(RequestError::EmptyVideoRef);
        }
        self.replace_open(OverlayKind::InVideoSearch, video_ref);
        Ok(())
    }

    /// Search inside the video of the open in-video overlay. A new prompt
    /// while loading supersedes the earlier one.
    pub fn submit_prompt(
        &mut self,
        prompt: &str,
        top_k: Option<u32>,
    ) -> Result<RequestToken, RequestError> {
        let Some(open) = self
            .open
            .as_ref()
            .filter(|o| o.kind == OverlayKind::InVideoSearch)
        else {
            return Err(RequestError::NoInVideoOverlay);
        };

        let request = MomentSearchRequest::new(
            &open.video_ref,
            prompt,
            top_k.unwrap_or(self.default_top_k),
        )?;
        let token = self.moments.begin();
        debug!(
            session_id = %self.bus.session_id(),
            %token,
            video_ref = request.video_ref(),
            prompt = request.prompt(),
            "in-video search issued"
        );

        let api = Arc::clone(&self.api);
        spawn_request(
            &self.bus,
            async move { api.search_within_video(request).await },
            move |outcome| Completion::InVideoSearch { token, outcome },
        );

        Ok(token)
    }

    pub fn close(&mut self) {
        if let Some(open) = self.open.take() {
            debug!(session_id = %self.bus.session_id(), kind = ?open.kind, "overlay closed");
        }
        self.moments.reset();
        self.summary.reset();
    }

    pub fn view(&self) -> OverlayView<'_> {
        match &self.open {
            None => OverlayView::Closed,
            Some(open) => match open.kind {
                OverlayKind::InVideoSearch => OverlayView::InVideoSearch {
                    video_ref: &open.video_ref,
                    state: self.moments.state(),
                },
                OverlayKind::Summary => OverlayView::Summary {
                    video_ref: &open.video_ref,
                    state: self.summary.state(),
                },
            },
        }
    }

    pub fn is_loading(&self) -> bool {
        self.view().is_loading()
    }

    fn replace_open(&mut self, kind: OverlayKind, video_ref: &str) {
        self.close();
        self.open = Some(OpenOverlay {
            kind,
            video_ref: video_ref.to_string(),
        });
    }

    pub(crate) fn apply_moments(
        &mut self,
        token: RequestToken,
        outcome: Result<MomentMatches, ErrorInfo>,
    ) -> bool {
        let applied = self.moments.resolve(token, outcome);
        self.log_resolution("invideo_search", token, applied, self.moments.state().label());
        applied
    }

    pub(crate) fn apply_summary(
        &mut self,
        token: RequestToken,
        outcome: Result<SummaryText, ErrorInfo>,
    ) -> bool {
        let applied = self.summary.resolve(token, outcome);
        self.log_resolution("summary", token, applied, self.summary.state().label());
        applied
    }

    fn log_resolution(&self, slot: &'static str, token: RequestToken, applied: bool, state: &str) {
        if applied {
            info!(session_id = %self.bus.session_id(), slot, %token, state, "overlay resolved");
        } else {
            debug!(session_id = %self.bus.session_id(), slot, %token, "suppressed overlay result discarded");
        }
    }
}
