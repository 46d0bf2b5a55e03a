//! Tagged result of a live fetch.

use crate::sources::SourceError;

/// What happened when the core went to an upstream source.
///
/// Only `Success` and `NotFound` are answered from live data; every other
/// arm resolves to the fallback dataset.
#[derive(Debug)]
pub enum FetchOutcome<T> {
    /// Usable live data.
    Success(T),
    /// The source answered but nothing usable came back.
    Empty,
    /// The source explicitly has no data for this query.
    NotFound,
    /// The rate limiter refused a permit; no request was sent.
    Denied,
    /// The request failed after retries.
    Failed(SourceError),
}

impl<T> FetchOutcome<T> {
    /// Chain a step that may itself produce a non-success outcome.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> FetchOutcome<U>) -> FetchOutcome<U> {
        match self {
            FetchOutcome::Success(value) => f(value),
            FetchOutcome::Empty => FetchOutcome::Empty,
            FetchOutcome::NotFound => FetchOutcome::NotFound,
            FetchOutcome::Denied => FetchOutcome::Denied,
            FetchOutcome::Failed(e) => FetchOutcome::Failed(e),
        }
    }

    /// `Success` unless the value is empty by `is_empty`.
    pub fn non_empty(value: T, is_empty: impl FnOnce(&T) -> bool) -> Self {
        if is_empty(&value) {
            FetchOutcome::Empty
        } else {
            FetchOutcome::Success(value)
        }
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            FetchOutcome::Success(_) => "success",
            FetchOutcome::Empty => "empty",
            FetchOutcome::NotFound => "not_found",
            FetchOutcome::Denied => "denied",
            FetchOutcome::Failed(_) => "failed",
        }
    }
}
