use std::sync::Arc;

use tracing::{debug, info};

use super::spawn_request;
use crate::{
    client::VideoApi,
    error::{ErrorInfo, RequestError},
    events::{Completion, CompletionBus},
    state::{OperationSlot, OperationState, RequestToken},
    types::{SearchRequest, SearchResult},
};

/// Owns the top-level search and its result set.
pub struct SearchController {
    slot: OperationSlot<SearchResult>,
    api: Arc<dyn VideoApi>,
    bus: CompletionBus,
}

impl SearchController {
    pub fn new(api: Arc<dyn VideoApi>, bus: CompletionBus) -> Self {
        Self {
            slot: OperationSlot::new(),
            api,
            bus,
        }
    }

    /// Start a search. A blank query is refused without touching the state;
    /// otherwise the state is `Loading` when this returns and the request
    /// runs on the tokio runtime. Issuing again while loading supersedes the
    /// earlier request.
    pub fn issue_search(&mut self, query: &str, limit: u32) -> Result<RequestToken, RequestError> {
        let request = SearchRequest::new(query, limit)?;
        let token = self.slot.begin();
        debug!(
            session_id = %self.bus.session_id(),
            %token,
            query = request.query(),
            limit = request.limit(),
            "search issued"
        );

        let api = Arc::clone(&self.api);
        spawn_request(
            &self.bus,
            async move { api.search(request).await },
            move |outcome| Completion::Search { token, outcome },
        );

        Ok(token)
    }

    pub fn current_state(&self) -> &OperationState<SearchResult> {
        self.slot.state()
    }

    pub(crate) fn apply(
        &mut self,
        token: RequestToken,
        outcome: Result<SearchResult, ErrorInfo>,
    ) -> bool {
        let applied = self.slot.resolve(token, outcome);
        if applied {
            info!(
                session_id = %self.bus.session_id(),
                %token,
                state = self.slot.state().label(),
                items = self.slot.state().value().map_or(0, |r| r.items.len()),
                "search resolved"
            );
        } else {
            debug!(session_id = %self.bus.session_id(), %token, "stale search result discarded");
        }
        applied
    }
}
