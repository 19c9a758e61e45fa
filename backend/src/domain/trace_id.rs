//! Request correlation identifier.
//!
//! A [`TraceId`] is held in Tokio task-local storage while a request is being
//! served. Error constructors read it so every failure body names the request
//! that produced it. Work moved onto the blocking pool must go through
//! [`TraceId::spawn_blocking`] to keep the identifier visible.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task::JoinHandle;
use tokio::task_local;
use uuid::Uuid;

task_local! {
    static CURRENT: TraceId;
}

/// UUID naming one request across logs, headers and error payloads.
///
/// # Examples
/// ```
/// use cities_backend::TraceId;
///
/// let id: TraceId = "6f1f1d5e-8f64-4c7c-9d4e-0e6f5b2b7a10".parse().expect("uuid");
/// assert_eq!(id.to_string(), "6f1f1d5e-8f64-4c7c-9d4e-0e6f5b2b7a10");
/// assert!(TraceId::current().is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Accept a caller-supplied identifier when it is a well-formed UUID.
    pub fn from_header(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }

    /// Identifier of the request currently being served, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Run `fut` with `trace_id` as the current identifier.
    ///
    /// ```
    /// use cities_backend::TraceId;
    ///
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// let id: TraceId = "00000000-0000-0000-0000-000000000001".parse().expect("uuid");
    /// assert_eq!(TraceId::scope(id, async { TraceId::current() }).await, Some(id));
    /// # });
    /// ```
    pub async fn scope<Fut>(trace_id: TraceId, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        CURRENT.scope(trace_id, fut).await
    }

    /// `tokio::task::spawn_blocking` that carries the current identifier into
    /// the closure.
    pub fn spawn_blocking<F, T>(f: F) -> JoinHandle<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        match Self::current() {
            Some(id) => tokio::task::spawn_blocking(move || CURRENT.sync_scope(id, f)),
            None => tokio::task::spawn_blocking(f),
        }
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn current_is_visible_only_inside_scope() {
        let id = TraceId::generate();
        assert_eq!(TraceId::scope(id, async { TraceId::current() }).await, Some(id));
        assert!(TraceId::current().is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn blocking_work_sees_the_scoped_id() {
        let id = TraceId::generate();
        let seen = TraceId::scope(id, async {
            TraceId::spawn_blocking(TraceId::current)
                .await
                .expect("blocking task")
        })
        .await;
        assert_eq!(seen, Some(id));
    }

    #[rstest]
    #[tokio::test]
    async fn blocking_work_outside_a_request_has_no_id() {
        let seen = TraceId::spawn_blocking(TraceId::current)
            .await
            .expect("blocking task");
        assert!(seen.is_none());
    }

    #[rstest]
    #[case(" 00000000-0000-0000-0000-00000000abcd ", true)]
    #[case("not-a-uuid", false)]
    #[case("", false)]
    fn header_values_must_be_uuids(#[case] raw: &str, #[case] accepted: bool) {
        assert_eq!(TraceId::from_header(raw).is_some(), accepted);
    }
}
