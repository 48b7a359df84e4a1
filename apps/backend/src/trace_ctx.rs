//! Task-local request id, readable from anywhere inside a request's future.
//!
//! `RequestTrace` opens the scope; error rendering and db error mapping read
//! it so their log lines and the `x-trace-id` header agree.

use std::future::Future;

use tokio::task_local;

task_local! {
    static TRACE_ID: String;
}

pub const UNKNOWN_TRACE_ID: &str = "unknown";

/// The current request's id, if running inside a request scope.
pub fn current() -> Option<String> {
    TRACE_ID.try_with(Clone::clone).ok()
}

/// The current request's id, or `"unknown"` outside a request scope.
pub fn trace_id() -> String {
    current().unwrap_or_else(|| UNKNOWN_TRACE_ID.to_string())
}

/// Run `future` with `trace_id` visible to [`trace_id`].
pub async fn with_trace_id<F>(trace_id: String, future: F) -> F::Output
where
    F: Future,
{
    TRACE_ID.scope(trace_id, future).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn outside_scope_is_unknown() {
        assert_eq!(current(), None);
        assert_eq!(trace_id(), UNKNOWN_TRACE_ID);
    }

    #[tokio::test]
    async fn scoped_and_restored() {
        let seen = with_trace_id("req-1".to_string(), async {
            let inner = with_trace_id("req-2".to_string(), async { trace_id() }).await;
            (trace_id(), inner)
        })
        .await;

        assert_eq!(seen, ("req-1".to_string(), "req-2".to_string()));
        assert_eq!(trace_id(), UNKNOWN_TRACE_ID);
    }

    #[tokio::test]
    async fn spawned_tasks_do_not_inherit_scope() {
        let spawned = with_trace_id("req-3".to_string(), async {
            tokio::spawn(async { trace_id() }).await.unwrap()
        })
        .await;

        assert_eq!(spawned, UNKNOWN_TRACE_ID);
    }
}
