//! Configuration for hierarchy indexing.

/// Configuration for the per-attribute LCA cache.
///
/// # Example
///
/// ```rust
/// use kanon_hierarchy::CacheConfig;
///
/// let cache = CacheConfig { max_entries: 1_024 };
/// assert_eq!(CacheConfig::default().max_entries, 4_096);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CacheConfig {
    /// Maximum number of memoized LCA results.
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { max_entries: 4_096 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_config_default() {
        assert_eq!(CacheConfig::default().max_entries, 4_096);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_cache_config_serde() {
        let json = serde_json::to_string(&CacheConfig { max_entries: 8 }).unwrap();
        assert_eq!(json, r#"{"max_entries":8}"#);
    }
}
