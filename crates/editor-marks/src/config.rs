//! Tuning knobs for [`MarkVector`](crate::MarkVector).
//!
//! None of these values affect the offsets reported by marks; they only decide how eagerly
//! the vector grows its index gap, compacts disposed marks and rebases its offset gap.

use serde::{Deserialize, Serialize};

/// Mark vector configuration.
///
/// Deserializes from a partial table; missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkVectorConfig {
    /// Capacity reserved for the backing array on creation.
    pub initial_capacity: usize,
    /// Minimum number of free slots added whenever the index gap is exhausted.
    pub min_gap_growth: usize,
    /// Disposed marks are never compacted while fewer than this many are pending.
    pub min_disposed_before_compaction: usize,
    /// Compaction starts once disposed marks exceed `mark_count / disposed_compaction_divisor`.
    pub disposed_compaction_divisor: usize,
    /// When an insertion would shrink the offset gap below this length, all raw offsets above
    /// the gap are rewritten against a fresh gap.
    pub offset_gap_floor: usize,
}

impl Default for MarkVectorConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 16,
            min_gap_growth: 8,
            min_disposed_before_compaction: 5,
            disposed_compaction_divisor: 10,
            offset_gap_floor: 1 << 20,
        }
    }
}

impl MarkVectorConfig {
    /// Number of pending disposed marks that triggers compaction for a vector holding
    /// `mark_count` marks.
    pub fn compaction_threshold(&self, mark_count: usize) -> usize {
        let divisor = self.disposed_compaction_divisor.max(1);
        self.min_disposed_before_compaction.max(mark_count / divisor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compaction_threshold() {
        let config = MarkVectorConfig::default();
        assert_eq!(config.compaction_threshold(0), 5);
        assert_eq!(config.compaction_threshold(49), 5);
        assert_eq!(config.compaction_threshold(200), 20);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: MarkVectorConfig =
            serde_json::from_str(r#"{ "min_gap_growth": 64 }"#).unwrap();
        assert_eq!(config.min_gap_growth, 64);
        assert_eq!(config.initial_capacity, 16);
        assert_eq!(config.disposed_compaction_divisor, 10);
    }

    #[test]
    fn test_zero_divisor_does_not_panic() {
        let config = MarkVectorConfig {
            disposed_compaction_divisor: 0,
            ..MarkVectorConfig::default()
        };
        assert_eq!(config.compaction_threshold(100), 100);
    }
}
