//! Per-directory aggregation record

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Aggregated statistics for a directory subtree.
///
/// `last_modified` is milliseconds since the Unix epoch, 0 when no file was
/// included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryStatistics {
    /// Number of included files in the subtree
    pub count: u64,
    /// Latest modification time among included files
    pub last_modified: u64,
    /// Marker requirement satisfied throughout the subtree
    pub doc_complete: bool,
}

impl DirectoryStatistics {
    /// Fresh statistics with the directory's baseline completeness.
    pub fn new(doc_complete: bool) -> Self {
        Self {
            count: 0,
            last_modified: 0,
            doc_complete,
        }
    }

    /// Record one included file.
    pub fn add_file(&mut self, modified: u64) {
        self.count += 1;
        self.last_modified = self.last_modified.max(modified);
    }

    /// Fold a child subtree's result into this one.
    pub fn merge(&mut self, child: &DirectoryStatistics) {
        self.count += child.count;
        self.last_modified = self.last_modified.max(child.last_modified);
        self.doc_complete &= child.doc_complete;
    }
}

impl Default for DirectoryStatistics {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Convert a modification time to epoch milliseconds.
///
/// Times before the epoch clamp to 0.
pub fn epoch_millis(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_add_file_tracks_max() {
        let mut stats = DirectoryStatistics::new(true);
        stats.add_file(500);
        stats.add_file(200);
        stats.add_file(900);

        assert_eq!(stats.count, 3);
        assert_eq!(stats.last_modified, 900);
    }

    #[test]
    fn test_merge() {
        let mut parent = DirectoryStatistics::new(true);
        parent.add_file(100);

        let mut child = DirectoryStatistics::new(false);
        child.add_file(300);
        child.add_file(50);

        parent.merge(&child);

        assert_eq!(parent.count, 3);
        assert_eq!(parent.last_modified, 300);
        assert!(!parent.doc_complete);
    }

    #[test]
    fn test_merge_never_restores_completeness() {
        let mut parent = DirectoryStatistics::new(false);
        parent.merge(&DirectoryStatistics::new(true));

        assert!(!parent.doc_complete);
    }

    #[test]
    fn test_empty_subtree_has_unset_time() {
        let mut parent = DirectoryStatistics::default();
        parent.merge(&DirectoryStatistics::default());

        assert_eq!(parent.count, 0);
        assert_eq!(parent.last_modified, 0);
        assert!(parent.doc_complete);
    }

    #[test]
    fn test_epoch_millis() {
        assert_eq!(epoch_millis(UNIX_EPOCH), 0);
        assert_eq!(
            epoch_millis(UNIX_EPOCH + Duration::from_millis(1_234_567)),
            1_234_567
        );
        assert_eq!(epoch_millis(UNIX_EPOCH - Duration::from_secs(10)), 0);
    }
}
