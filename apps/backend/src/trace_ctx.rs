//! Task-local trace id for the HTTP request being served.
//!
//! `TraceSpan` establishes the scope; anything running inside the request
//! future (handlers, error rendering) can read the id without threading it
//! through arguments. Outside a request the id is `"unknown"`.

use std::future::Future;

use tokio::task_local;

const UNKNOWN: &str = "unknown";

task_local! {
    static TRACE_ID: String;
}

pub fn trace_id() -> String {
    TRACE_ID
        .try_with(Clone::clone)
        .unwrap_or_else(|_| UNKNOWN.to_string())
}

pub async fn with_trace_id<F, R>(trace_id: String, future: F) -> R
where
    F: Future<Output = R>,
{
    TRACE_ID.scope(trace_id, future).await
}
