//! # Plan Optimizer
//!
//! 計劃調整驗證（相容性、產能、交期、稼動率）

pub mod adjustment;
pub mod capacity;
pub mod constraint;

// Re-export 主要類型
pub use adjustment::{AdjustmentRequest, PlanAdjustmentValidator, ADJUSTMENT_OK};
pub use capacity::{CapacityResolver, MovingQuantity};
pub use constraint::AdjustmentRejection;
