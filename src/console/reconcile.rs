//! View reconcilers: pure mappings from a fetched snapshot (plus current
//! view parameters such as the filter term) to render-ready view structs.
//!
//! Each reconciler consumes one snapshot wholesale, so the chart and table
//! derived from it always reflect the same fetch.

use time::{OffsetDateTime, UtcOffset, format_description::BorrowedFormatItem, macros::format_description};

use crate::client::types::{CacheItemDetail, CacheStatsSnapshot, KeyEntry, MissUrlEntry};

use super::filter;

const BYTES_PER_MIB: f64 = 1_048_576.0;

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

pub const EMPTY_KEYS_PLACEHOLDER: &str = "no cached keys";
pub const EMPTY_MISS_URLS_PLACEHOLDER: &str = "no missed urls";

/// Derived dashboard numbers plus the two chart projections.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub total_requests: u64,
    pub memory_hits: u64,
    pub redis_hits: u64,
    pub misses: u64,
    /// Percentage with two decimals, e.g. `"50.00"`.
    pub hit_ratio: String,
    pub memory_usage_mb: String,
    pub memory_capacity_mb: String,
    /// `None` when the Redis tier reported no memory figure; rendered "N/A".
    pub redis_used_memory_mb: Option<String>,
    pub hit_share: HitShareChart,
    pub usage_bars: UsageComparisonChart,
}

/// Three-way request share: memory hits, redis hits, misses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitShareChart {
    pub memory_hits: u64,
    pub redis_hits: u64,
    pub misses: u64,
}

/// Two-bar used-memory comparison, in MB.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsageComparisonChart {
    pub memory_mb: f64,
    pub redis_mb: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeysView {
    pub rows: Vec<KeyRow>,
    /// Explanatory row shown instead of an empty table body.
    pub placeholder: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRow {
    pub key: String,
    pub stored_at: String,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissUrlsView {
    pub rows: Vec<MissUrlRow>,
    pub placeholder: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissUrlRow {
    pub url: String,
    pub count: u64,
    pub first_seen: String,
    pub last_seen: String,
    pub visible: bool,
}

/// Pretty-printed detail for a single cached entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub key: String,
    pub metadata: String,
    pub value: String,
}

/// Derive the dashboard view from a stats snapshot.
pub fn dashboard_view(snapshot: &CacheStatsSnapshot) -> DashboardView {
    let hits = snapshot.memory_hit_count + snapshot.redis_hit_count;
    let total_requests = hits + snapshot.miss_count;

    DashboardView {
        total_requests,
        memory_hits: snapshot.memory_hit_count,
        redis_hits: snapshot.redis_hit_count,
        misses: snapshot.miss_count,
        hit_ratio: format_hit_ratio(hits, total_requests),
        memory_usage_mb: format_mib(snapshot.memory_usage),
        memory_capacity_mb: format_mib(snapshot.memory_capacity),
        redis_used_memory_mb: snapshot.redis_used_memory.map(format_mib),
        hit_share: HitShareChart {
            memory_hits: snapshot.memory_hit_count,
            redis_hits: snapshot.redis_hit_count,
            misses: snapshot.miss_count,
        },
        usage_bars: UsageComparisonChart {
            memory_mb: mib(snapshot.memory_usage),
            redis_mb: mib(snapshot.redis_used_memory.unwrap_or(0)),
        },
    }
}

/// Map key entries to rows, applying the current filter term.
///
/// Rows carry the key string itself rather than an index, so later filtering
/// or re-sorting cannot detach a row from its view/delete actions.
pub fn keys_view(entries: &[KeyEntry], filter_term: &str) -> KeysView {
    let mut view = KeysView {
        rows: entries
            .iter()
            .map(|entry| KeyRow {
                key: entry.key.clone(),
                stored_at: format_unix_seconds(entry.time),
                visible: true,
            })
            .collect(),
        placeholder: entries.is_empty().then_some(EMPTY_KEYS_PLACEHOLDER),
    };
    filter::apply_key_filter(&mut view, filter_term);
    view
}

/// Map missed-URL entries to rows, applying the current filter term.
pub fn miss_urls_view(entries: &[MissUrlEntry], filter_term: &str) -> MissUrlsView {
    let mut view = MissUrlsView {
        rows: entries
            .iter()
            .map(|entry| MissUrlRow {
                url: entry.url.clone(),
                count: entry.count,
                first_seen: format_unix_seconds(entry.first_time),
                last_seen: format_unix_seconds(entry.last_time),
                visible: true,
            })
            .collect(),
        placeholder: entries.is_empty().then_some(EMPTY_MISS_URLS_PLACEHOLDER),
    };
    filter::apply_miss_url_filter(&mut view, filter_term);
    view
}

/// Pretty-print a cached entry's metadata and value.
///
/// The value is not guaranteed to be JSON; when it parses, it is re-rendered
/// pretty-printed, otherwise the raw string is shown verbatim.
pub fn detail_view(key: &str, detail: &CacheItemDetail) -> DetailView {
    let metadata = serde_json::to_string_pretty(&detail.metadata)
        .unwrap_or_else(|_| detail.metadata.to_string());

    let value = match serde_json::from_str::<serde_json::Value>(&detail.value) {
        Ok(parsed) => {
            serde_json::to_string_pretty(&parsed).unwrap_or_else(|_| detail.value.clone())
        }
        Err(_) => detail.value.clone(),
    };

    DetailView {
        key: key.to_string(),
        metadata,
        value,
    }
}

fn mib(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MIB
}

fn format_mib(bytes: u64) -> String {
    format!("{:.2}", mib(bytes))
}

fn format_hit_ratio(hits: u64, total: u64) -> String {
    if total == 0 {
        "0.00".to_string()
    } else {
        format!("{:.2}", hits as f64 / total as f64 * 100.0)
    }
}

/// Render unix seconds as a local human-readable timestamp.
///
/// Falls back to the raw number when the value is out of range; falls back to
/// UTC when the local offset cannot be determined.
pub fn format_unix_seconds(seconds: i64) -> String {
    let Ok(timestamp) = OffsetDateTime::from_unix_timestamp(seconds) else {
        return seconds.to_string();
    };

    let localized = match UtcOffset::current_local_offset() {
        Ok(offset) => timestamp.to_offset(offset),
        Err(_) => timestamp,
    };

    localized
        .format(TIMESTAMP_FORMAT)
        .unwrap_or_else(|_| seconds.to_string())
}
