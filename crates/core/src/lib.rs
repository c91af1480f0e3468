//! JumpTube Core Library
//!
//! Request orchestration for a video search client: top-level search,
//! in-video moment search and AI summaries against a remote service, with
//! every asynchronous operation tracked as an `OperationState`.

pub mod client;
pub mod config;
pub mod contract;
pub mod controllers;
pub mod error;
pub mod events;
pub mod format;
pub mod normalize;
pub mod orchestrator;
pub mod state;
pub mod types;
pub mod video_ref;

// Re-export commonly used items at crate root
pub use client::{ApiClient, VideoApi};
pub use config::ClientConfig;
pub use contract::ContractVariant;
pub use controllers::{OverlayKind, OverlayView};
pub use error::{ApiError, ConfigError, ErrorCause, ErrorInfo, RequestError, Result};
pub use format::format_timestamp;
pub use normalize::ResponseNormalizer;
pub use orchestrator::{AppOrchestrator, Delivery};
pub use state::{OperationState, RequestToken};
pub use types::{
    HealthStatus, MomentMatches, MomentSearchRequest, SearchRequest, SearchResult,
    SummarizeRequest, SummaryText, TimestampMatch, VideoSummary,
};
pub use video_ref::{VideoId, extract_video_id};
