//! # Plan Calculation Engine
//!
//! 製造棟分配比例驗證與替代分配搜尋

pub mod classifier;
pub mod scoring;
pub mod state;
pub mod strategy;
pub mod utilization;
pub mod validator;

// Re-export 主要類型
pub use classifier::{Classification, FixedProject, FlexibleProject, ProjectClassifier};
pub use state::{DistributionState, QUANTITY_SCALE};
pub use strategy::{AllocationStrategy, StrategyKind};
pub use utilization::{LineUtilization, UtilizationCalculator};
pub use validator::DistributionValidator;

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// 違反方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationType {
    /// 低於下限
    BelowLimit,
    /// 高於上限
    AboveLimit,
}

/// 單一製造棟的比例違反
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub building_id: String,
    pub violation_type: ViolationType,
    /// 目前比例
    pub ratio: Decimal,
    /// 違反的界限值
    pub limit: Decimal,
    /// 與界限的差距（恆為正）
    pub gap: Decimal,
}

/// 沒有任何可分配製造棟的需求
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnassignedDemand {
    pub item: String,
    pub project: String,
    pub quantity: Decimal,
}

/// 分配比例驗證結果
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// 目前分配（彈性專案平均分攤）
    pub current_distribution: DistributionState,

    /// 各製造棟比例
    pub building_ratios: BTreeMap<String, Decimal>,

    /// 違反項目（依製造棟）
    pub violations: BTreeMap<String, Violation>,

    /// 目前分配是否有效
    pub current_valid: bool,

    /// 是否找到滿足約束的替代分配
    pub alternative_possible: bool,

    /// 是否需要向使用者提示異常
    pub has_anomalies: bool,

    /// 找到替代分配的策略
    pub resolved_by: Option<StrategyKind>,

    /// 替代分配結果
    pub alternative_distribution: Option<DistributionState>,

    /// 無法分配的需求
    pub unassigned: Vec<UnassignedDemand>,
}

impl ValidationReport {
    /// 依目前分配創建報告，替代分配欄位稍後填入
    pub fn new(
        current_distribution: DistributionState,
        building_ratios: BTreeMap<String, Decimal>,
        violations: BTreeMap<String, Violation>,
        unassigned: Vec<UnassignedDemand>,
    ) -> Self {
        let current_valid = violations.is_empty();
        Self {
            current_distribution,
            building_ratios,
            violations,
            current_valid,
            alternative_possible: false,
            has_anomalies: !current_valid,
            resolved_by: None,
            alternative_distribution: None,
            unassigned,
        }
    }

    /// 空報告（輸入資料不足時使用）
    pub fn empty() -> Self {
        Self::new(DistributionState::new(), BTreeMap::new(), BTreeMap::new(), Vec::new())
    }

    /// 記錄替代分配
    pub fn resolve(&mut self, kind: StrategyKind, distribution: DistributionState) {
        self.alternative_possible = true;
        self.resolved_by = Some(kind);
        self.alternative_distribution = Some(distribution);
        self.has_anomalies = false;
    }

    /// 已分配的總量（不含無法分配的需求）
    pub fn allocated_total(&self) -> Decimal {
        self.current_distribution.total()
    }

    /// 無法分配的總量
    pub fn unassigned_total(&self) -> Decimal {
        self.unassigned.iter().map(|u| u.quantity).sum()
    }
}
