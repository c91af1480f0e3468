pub mod overlay;
pub mod search;

pub use overlay::*;
pub use search::*;

use std::future::Future;

use tracing::error;

use crate::{
    error::{ErrorCause, ErrorInfo},
    events::{Completion, CompletionBus},
};

/// Run one API call on the runtime and publish exactly one completion for
/// it. A call that panics or is aborted resolves as a transport failure.
pub(crate) fn spawn_request<T, F, W>(bus: &CompletionBus, call: F, wrap: W)
where
    T: Send + 'static,
    F: Future<Output = crate::Result<T>> + Send + 'static,
    W: FnOnce(Result<T, ErrorInfo>) -> Completion + Send + 'static,
{
    let bus = bus.clone();
    tokio::spawn(async move {
        let outcome = match tokio::spawn(call).await {
            Ok(result) => result.map_err(ErrorInfo::from),
            Err(e) => {
                error!(session_id = %bus.session_id(), error = %e, "request task failed");
                Err(ErrorInfo::new(
                    ErrorCause::Transport,
                    format!("Request task failed: {e}"),
                ))
            }
        };
        bus.publish(wrap(outcome));
    });
}
