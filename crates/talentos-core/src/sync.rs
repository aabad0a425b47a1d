//! Direction of the local cache ↔ remote sheet synchronization.
//!
//! The side holding more profiles overwrites the other one. There is no
//! per-row merge or conflict resolution.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncDirection {
    /// Local cache overwrites the remote sheet.
    Push,
    /// Remote sheet overwrites the local cache.
    Pull,
    UpToDate,
}

impl SyncDirection {
    pub fn decide(local_rows: usize, remote_rows: usize) -> Self {
        let direction = match local_rows.cmp(&remote_rows) {
            std::cmp::Ordering::Greater => SyncDirection::Push,
            std::cmp::Ordering::Less => SyncDirection::Pull,
            std::cmp::Ordering::Equal => SyncDirection::UpToDate,
        };
        tracing::debug!(local_rows, remote_rows, %direction, "Sync direction decided");
        direction
    }
}

impl fmt::Display for SyncDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SyncDirection::Push => "push",
            SyncDirection::Pull => "pull",
            SyncDirection::UpToDate => "up to date",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn larger_side_wins() {
        assert_eq!(SyncDirection::decide(10, 8), SyncDirection::Push);
        assert_eq!(SyncDirection::decide(8, 10), SyncDirection::Pull);
        assert_eq!(SyncDirection::decide(0, 1), SyncDirection::Pull);
    }

    #[test]
    fn equal_counts_are_up_to_date() {
        assert_eq!(SyncDirection::decide(5, 5), SyncDirection::UpToDate);
        assert_eq!(SyncDirection::decide(0, 0), SyncDirection::UpToDate);
    }
}
