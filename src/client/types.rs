//! Wire types for the cache service REST API.

use serde::Deserialize;

/// One complete read of the stats resource.
///
/// A snapshot is immutable once fetched and is superseded wholesale by the
/// next fetch; nothing in the console merges fields across snapshots.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheStatsSnapshot {
    pub memory_hit_count: u64,
    pub redis_hit_count: u64,
    pub miss_count: u64,
    /// Bytes currently held by the in-process memory tier.
    pub memory_usage: u64,
    /// Byte capacity of the in-process memory tier.
    pub memory_capacity: u64,
    /// Bytes reported by the Redis tier; absent when Redis is unreachable.
    #[serde(default)]
    pub redis_used_memory: Option<u64>,
    #[serde(default)]
    pub recent_keys: Vec<KeyEntry>,
}

/// A cached entry's key and last-write time (unix seconds).
#[derive(Debug, Clone, Deserialize)]
pub struct KeyEntry {
    pub key: String,
    pub time: i64,
}

/// A URL that recently missed the cache, with first/last sighting times.
#[derive(Debug, Clone, Deserialize)]
pub struct MissUrlEntry {
    pub url: String,
    pub count: u64,
    pub first_time: i64,
    pub last_time: i64,
}

/// Metadata and stored value for a single cached entry.
///
/// The value is an opaque string; it may or may not itself be JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheItemDetail {
    pub metadata: serde_json::Value,
    pub value: String,
}

/// Connectivity report from the cache service, checked once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceStatus {
    #[serde(default)]
    pub redis_connected: bool,
}

/// Result of a successful flush.
#[derive(Debug, Clone, Copy)]
pub struct FlushOutcome {
    /// Number of entries removed by the service.
    pub count: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct KeyListBody {
    #[serde(default)]
    pub keys: Vec<KeyEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MissUrlListBody {
    #[serde(default)]
    pub urls: Vec<MissUrlEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MutationBody {
    pub success: bool,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_snapshot_decodes_with_absent_redis_memory() {
        let body = r#"{
            "memory_hit_count": 40,
            "redis_hit_count": 10,
            "miss_count": 50,
            "memory_usage": 1048576,
            "memory_capacity": 4194304,
            "recent_keys": [{"key": "user:1", "time": 1700000000}]
        }"#;

        let snapshot: CacheStatsSnapshot =
            serde_json::from_str(body).expect("snapshot should decode");
        assert_eq!(snapshot.redis_used_memory, None);
        assert_eq!(snapshot.recent_keys.len(), 1);
        assert_eq!(snapshot.recent_keys[0].key, "user:1");
    }

    #[test]
    fn mutation_body_defaults_count_and_error() {
        let body: MutationBody =
            serde_json::from_str(r#"{"success": true}"#).expect("body should decode");
        assert!(body.success);
        assert_eq!(body.count, 0);
        assert!(body.error.is_none());
    }
}
