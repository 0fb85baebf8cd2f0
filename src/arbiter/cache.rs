use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct CachedValue<T> {
    pub value: T,
    pub captured_at: Instant,
}

/// Time-bounded memoization of one fallible source. A failed refresh keeps
/// serving the previous value with its original capture time.
#[derive(Debug)]
pub struct SourceCache<T> {
    name: &'static str,
    ttl: Duration,
    entry: Option<CachedValue<T>>,
}

impl<T> SourceCache<T> {
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self {
            name,
            ttl,
            entry: None,
        }
    }

    pub fn is_fresh(&self, now: Instant) -> bool {
        self.entry
            .as_ref()
            .is_some_and(|e| now.saturating_duration_since(e.captured_at) < self.ttl)
    }

    #[cfg(test)]
    pub fn peek(&self) -> Option<&CachedValue<T>> {
        self.entry.as_ref()
    }

    pub async fn get_or_fetch<F, Fut, E>(&mut self, now: Instant, fetch: F) -> Option<&T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        if !self.is_fresh(now) {
            match fetch().await {
                Ok(value) => {
                    log::debug!("{} refreshed", self.name);
                    self.entry = Some(CachedValue {
                        value,
                        captured_at: now,
                    });
                }
                Err(e) if self.entry.is_some() => {
                    log::warn!("{} fetch failed, serving stale value: {}", self.name, e);
                }
                Err(e) => {
                    log::warn!("{} fetch failed: {}", self.name, e);
                }
            }
        }
        self.entry.as_ref().map(|e| &e.value)
    }
}
