use tokio::time::Instant;

use crate::{
    error::ErrorInfo,
    state::RequestToken,
    types::{MomentMatches, SearchResult, SummaryText},
};

/// Which operation slot a completion belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    Search,
    InVideoSearch,
    Summary,
}

impl SlotKind {
    pub fn name(&self) -> &'static str {
        match self {
            SlotKind::Search => "search",
            SlotKind::InVideoSearch => "invideo_search",
            SlotKind::Summary => "summary",
        }
    }
}

/// Outcome of one ApiClient call, tagged with the token captured when the
/// call was issued.
#[derive(Debug)]
pub enum Completion {
    Search {
        token: RequestToken,
        outcome: Result<SearchResult, ErrorInfo>,
    },
    InVideoSearch {
        token: RequestToken,
        outcome: Result<MomentMatches, ErrorInfo>,
    },
    Summary {
        token: RequestToken,
        outcome: Result<SummaryText, ErrorInfo>,
    },
}

impl Completion {
    pub fn kind(&self) -> SlotKind {
        match self {
            Completion::Search { .. } => SlotKind::Search,
            Completion::InVideoSearch { .. } => SlotKind::InVideoSearch,
            Completion::Summary { .. } => SlotKind::Summary,
        }
    }

    pub fn token(&self) -> RequestToken {
        match self {
            Completion::Search { token, .. }
            | Completion::InVideoSearch { token, .. }
            | Completion::Summary { token, .. } => *token,
        }
    }
}

pub struct EnrichedCompletion {
    pub completion: Completion,
    pub ingest_seq: u64,
    pub received_at: Instant,
}
