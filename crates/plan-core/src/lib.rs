//! # Plan Core
//!
//! 生產計劃核心資料模型與類型定義

pub mod capacity;
pub mod config;
pub mod constraint;
pub mod demand;
pub mod due_date;
pub mod item_code;
pub mod line;
pub mod plan;
pub mod shift;

// Re-export 主要類型
pub use capacity::LineCapacityTable;
pub use config::{GroupingKey, PlanConfig, ScoringWeights};
pub use constraint::{BuildingConstraint, BuildingConstraints};
pub use demand::DemandItem;
pub use due_date::DueDateTable;
pub use item_code::ItemCode;
pub use line::{building_of, LineAvailability, ProjectBuildings, ProjectLines};
pub use plan::ResultRow;
pub use shift::{Shift, ShiftCalendar, UtilizationCeilings, SHIFT_COUNT};

/// 生產計劃錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("缺少資料: {0}")]
    MissingData(String),

    #[error("型別轉換失敗: {0}")]
    Conversion(String),

    #[error("違反約束: {0}")]
    ConstraintViolation(String),

    #[error("無可行分配: {0}")]
    Infeasible(String),

    #[error("無效的品目代碼 '{code}': {reason}")]
    InvalidItemCode { code: String, reason: String },

    #[error("無效的班次: {0}（必須為 1-14）")]
    InvalidShift(i64),

    #[error("無效的製造棟約束: {0}")]
    InvalidConstraint(String),

    #[error("配置錯誤: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PlanError>;
