//! Filter synchronization for server-driven tables.
//!
//! In manual mode the table does not filter or paginate by itself. Whenever
//! the committed filters or the page index change it builds a
//! [`FilterPayload`] and hands it, with the page index, to the caller's fetch
//! callback. The callback may return a command (typically an async fetch
//! that resolves to a message carrying new rows); the table returns it from
//! `update` untouched and never waits on it.

use super::types::{display_value, FiltersState};
use bubbletea_rs::Cmd;
use log::{debug, warn};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Separator of multi-value filter strings.
pub const MULTI_VALUE_DELIMITER: char = ',';

/// Payload key carrying the global filter query.
pub const GLOBAL_FILTER_KEY: &str = "global";

/// Requests a page of rows: `(page_index, payload)`.
pub type FetchRequest = Arc<dyn Fn(usize, &FilterPayload) -> Option<Cmd> + Send + Sync>;

/// Column id to filter value, as sent to the fetch callback.
///
/// Multi-value filters are sent as string arrays, everything else as stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterPayload(pub BTreeMap<String, Value>);

impl FilterPayload {
    /// Builds the payload for the committed filters and global query.
    pub fn build(filters: &FiltersState, global: Option<&str>) -> Self {
        let mut payload: BTreeMap<String, Value> = filters
            .iter()
            .map(|f| {
                let value = if f.kind.is_multi_value() {
                    Value::Array(
                        split_multi_value(&f.value)
                            .into_iter()
                            .map(Value::String)
                            .collect(),
                    )
                } else {
                    f.value.clone()
                };
                (f.id.clone(), value)
            })
            .collect();
        if let Some(query) = global {
            if payload.contains_key(GLOBAL_FILTER_KEY) {
                warn!("column filter `{GLOBAL_FILTER_KEY}` shadows the global query; not sent");
            } else {
                payload.insert(GLOBAL_FILTER_KEY.to_string(), Value::String(query.to_string()));
            }
        }
        Self(payload)
    }

    /// Value sent for `id`.
    pub fn get(&self, id: &str) -> Option<&Value> {
        self.0.get(id)
    }

    /// Whether no filter is sent.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Splits a multi-value filter into its options, dropping empty segments.
///
/// Strings are split on [`MULTI_VALUE_DELIMITER`] and segments are kept
/// verbatim, whitespace included; arrays are taken item by item.
pub fn split_multi_value(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => s
            .split(MULTI_VALUE_DELIMITER)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .filter(|s| !s.is_empty())
            .collect(),
        Value::Null => Vec::new(),
        other => vec![display_value(other)],
    }
}

/// Emits fetch requests when the page index or payload changes.
#[derive(Default)]
pub struct FilterSync {
    fetch: Option<FetchRequest>,
    last: Option<(usize, FilterPayload)>,
}

impl std::fmt::Debug for FilterSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterSync")
            .field("has_fetch", &self.fetch.is_some())
            .field("last", &self.last)
            .finish()
    }
}

impl FilterSync {
    /// A sync loop calling `fetch`, or doing nothing when `None`.
    pub fn new(fetch: Option<FetchRequest>) -> Self {
        Self { fetch, last: None }
    }

    /// Replaces the fetch callback.
    pub fn set_fetch(&mut self, fetch: Option<FetchRequest>) {
        self.fetch = fetch;
    }

    /// Calls the fetch callback if `(page_index, payload)` differs from the
    /// last call. Returns the callback's command.
    pub fn sync(&mut self, page_index: usize, payload: FilterPayload) -> Option<Cmd> {
        if self
            .last
            .as_ref()
            .is_some_and(|(page, last)| *page == page_index && *last == payload)
        {
            return None;
        }
        debug!("fetch request for page {page_index}: {:?}", payload.0);
        let cmd = self.fetch.as_ref().and_then(|fetch| fetch(page_index, &payload));
        self.last = Some((page_index, payload));
        cmd
    }

    /// The last `(page_index, payload)` sent.
    pub fn last_request(&self) -> Option<&(usize, FilterPayload)> {
        self.last.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatable::types::FilterType;
    use serde_json::json;
    use std::sync::Mutex;

    #[test]
    fn test_multi_value_decomposition() {
        assert_eq!(split_multi_value(&json!("a,b,,c")), vec!["a", "b", "c"]);
        assert!(split_multi_value(&json!("")).is_empty());
        assert_eq!(split_multi_value(&json!(["x", ""])), vec!["x"]);
        assert_eq!(split_multi_value(&json!("a, b")), vec!["a", " b"]);
    }

    #[test]
    fn test_payload_shapes() {
        let mut filters = FiltersState::new();
        filters.set("status", json!("a,b,,c"), FilterType::SelectMultiple);
        filters.set("owner", json!("5,6"), FilterType::SelectAsync);
        filters.set("name", json!("ada"), FilterType::Text);
        filters.set("score", json!([1, 5]), FilterType::Range);
        let payload = FilterPayload::build(&filters, None);
        assert_eq!(payload.get("status"), Some(&json!(["a", "b", "c"])));
        assert_eq!(payload.get("owner"), Some(&json!(["5", "6"])));
        assert_eq!(payload.get("name"), Some(&json!("ada")));
        assert_eq!(payload.get("score"), Some(&json!([1, 5])));
    }

    #[test]
    fn test_global_query_in_payload() {
        let payload = FilterPayload::build(&FiltersState::new(), Some("acme"));
        assert_eq!(payload.get(GLOBAL_FILTER_KEY), Some(&json!("acme")));
    }

    #[test]
    fn test_column_named_global_keeps_its_filter() {
        let mut filters = FiltersState::new();
        filters.set(GLOBAL_FILTER_KEY, json!("eu"), FilterType::Text);
        let payload = FilterPayload::build(&filters, Some("acme"));
        assert_eq!(payload.get(GLOBAL_FILTER_KEY), Some(&json!("eu")));
        assert_eq!(payload.0.len(), 1);
    }

    #[test]
    fn test_sync_deduplicates() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let c = Arc::clone(&calls);
        let fetch: FetchRequest = Arc::new(move |page: usize, payload: &FilterPayload| -> Option<Cmd> {
            c.lock().unwrap().push((page, payload.clone()));
            None
        });
        let mut sync = FilterSync::new(Some(fetch));
        let payload = FilterPayload::build(&FiltersState::new(), None);

        assert!(sync.sync(0, payload.clone()).is_none());
        sync.sync(0, payload.clone());
        sync.sync(1, payload.clone());
        assert_eq!(calls.lock().unwrap().len(), 2);
        assert_eq!(sync.last_request().unwrap().0, 1);
    }

    #[test]
    fn test_sync_without_fetch_is_noop() {
        let mut sync = FilterSync::new(None);
        assert!(sync.sync(3, FilterPayload::default()).is_none());
        assert_eq!(sync.last_request().unwrap().0, 3);
    }
}
