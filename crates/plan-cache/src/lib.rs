//! # Plan Cache
//!
//! 計劃結果的分配快照與增量刷新

pub mod dirty_tracking;
pub mod snapshot;

// Re-export 主要類型
pub use dirty_tracking::DirtyTracker;
pub use snapshot::AllocationSnapshot;
