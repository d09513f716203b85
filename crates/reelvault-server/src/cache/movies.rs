//! Movie-specific cache layer: key construction, MessagePack payloads and
//! the single eviction tag shared by every movie entry.

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use reelvault_core::{ListOptions, SortField, SortOrder};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::backend::CacheBackend;
use crate::contracts::{MovieResponse, MoviesResponse};

/// Tag every movie read is registered under; evicted on any movie or
/// rating mutation.
pub const MOVIES_TAG: &str = "movies";

/// Cache of serialized movie responses.
///
/// Only anonymous responses are cached: authenticated reads carry
/// per-user rating fields that must never be served to someone else, so
/// callers skip the cache entirely when an identity is present.
#[derive(Clone)]
pub struct MovieCache {
    backend: CacheBackend,
    ttl: Duration,
    enabled: bool,
}

impl MovieCache {
    pub fn new(ttl: Duration, enabled: bool) -> Self {
        Self {
            backend: CacheBackend::new(),
            ttl,
            enabled,
        }
    }

    pub fn disabled() -> Self {
        Self::new(Duration::from_secs(0), false)
    }

    /// Cache key for a list request. Varies by filter, sort and paging;
    /// the requesting identity is deliberately excluded.
    pub fn list_key(options: &ListOptions) -> String {
        let mut key = String::from("movies:list");
        let _ = write!(key, ":t={}", options.title.as_deref().unwrap_or(""));
        let _ = write!(
            key,
            ":y={}",
            options
                .year_of_release
                .map(|y| y.to_string())
                .unwrap_or_default()
        );
        let sort = match options.sort_field {
            None => String::new(),
            Some(field) => {
                let name = match field {
                    SortField::Title => "title",
                    SortField::YearOfRelease => "yearofrelease",
                };
                let sign = match options.sort_order {
                    SortOrder::Ascending => '+',
                    SortOrder::Descending => '-',
                };
                format!("{sign}{name}")
            }
        };
        let _ = write!(key, ":s={sort}");
        let _ = write!(key, ":p={}:ps={}", options.page, options.page_size);
        key
    }

    /// Cache key for a single-movie request, keyed by the id or slug the
    /// client addressed it with.
    pub fn detail_key(id_or_slug: &str) -> String {
        format!("movies:detail:{id_or_slug}")
    }

    pub fn get_list(&self, key: &str) -> Option<MoviesResponse> {
        self.get_typed(key)
    }

    pub fn put_list(&self, key: &str, response: &MoviesResponse) {
        self.put_typed(key, response);
    }

    pub fn get_detail(&self, key: &str) -> Option<MovieResponse> {
        self.get_typed(key)
    }

    pub fn put_detail(&self, key: &str, response: &MovieResponse) {
        self.put_typed(key, response);
    }

    /// Drop every cached movie response. Called after any mutation.
    pub fn evict_all(&self) {
        self.backend.evict_by_tag(MOVIES_TAG);
    }

    fn get_typed<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if !self.enabled {
            return None;
        }
        let data = self.backend.get(key)?;
        match rmp_serde::from_slice(&data) {
            Ok(value) => Some(value),
            Err(e) => {
                // A payload that no longer decodes is stale garbage.
                tracing::warn!(key = %key, error = %e, "discarding undecodable cache entry");
                self.backend.invalidate(key);
                None
            }
        }
    }

    fn put_typed<T: Serialize>(&self, key: &str, value: &T) {
        if !self.enabled {
            return;
        }
        match rmp_serde::to_vec(value) {
            Ok(data) => self.backend.set(key, data, self.ttl, &[MOVIES_TAG]),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "failed to serialize cache entry");
            }
        }
    }
}
