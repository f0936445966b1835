//! # ProdPlan
//!
//! 生產計劃驗證：製造棟分配比例驗證與計劃調整驗證
//!
//! [`PlanningContext`] 持有一次載入的所有輸入資料，UI 層透過它取得
//! 分配比例驗證報告，以及計劃調整驗證器。

use plan_calc::{DistributionValidator, LineUtilization, UtilizationCalculator, ValidationReport};
use plan_core::{
    BuildingConstraints, DemandItem, DueDateTable, LineAvailability, LineCapacityTable, PlanConfig,
    ProjectBuildings, ProjectLines, ResultRow,
};
use plan_optimizer::PlanAdjustmentValidator;

pub use plan_calc;
pub use plan_cache;
pub use plan_core;
pub use plan_optimizer;

/// 計劃應用上下文
#[derive(Debug, Clone, Default)]
pub struct PlanningContext {
    config: PlanConfig,
    demand_items: Vec<DemandItem>,
    project_buildings: ProjectBuildings,
    project_lines: ProjectLines,
    constraints: BuildingConstraints,
    capacity: LineCapacityTable,
    due_dates: DueDateTable,
    rows: Vec<ResultRow>,
}

impl PlanningContext {
    pub fn new(config: PlanConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// 建構器模式：設置需求
    pub fn with_demand(mut self, demand_items: Vec<DemandItem>) -> Self {
        self.demand_items = demand_items;
        self
    }

    /// 建構器模式：由產線可用矩陣推導可分配製造棟與相容產線
    pub fn with_line_availability(mut self, availability: &LineAvailability) -> Self {
        self.project_buildings = ProjectBuildings::from_availability(availability);
        self.project_lines = ProjectLines::from_availability(availability);
        self
    }

    /// 建構器模式：直接設置可分配製造棟
    pub fn with_project_buildings(mut self, project_buildings: ProjectBuildings) -> Self {
        self.project_buildings = project_buildings;
        self
    }

    /// 建構器模式：設置製造棟比例約束
    pub fn with_constraints(mut self, constraints: BuildingConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// 建構器模式：設置產線產能表
    pub fn with_capacity(mut self, capacity: LineCapacityTable) -> Self {
        self.capacity = capacity;
        self
    }

    /// 建構器模式：設置交期表
    pub fn with_due_dates(mut self, due_dates: DueDateTable) -> Self {
        self.due_dates = due_dates;
        self
    }

    /// 建構器模式：設置計劃結果
    pub fn with_result_rows(mut self, rows: Vec<ResultRow>) -> Self {
        self.rows = rows;
        self
    }

    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    pub fn result_rows(&self) -> &[ResultRow] {
        &self.rows
    }

    /// 替換計劃結果（已建立的調整驗證器需自行 refresh）
    pub fn set_result_rows(&mut self, rows: Vec<ResultRow>) {
        self.rows = rows;
    }

    /// 製造棟分配比例驗證
    ///
    /// 輸入資料不完整時不中斷：記錄警告並回傳空報告。
    pub fn validate_distribution_ratios(&self) -> ValidationReport {
        let validator = DistributionValidator::new(self.config.clone());

        match validator.validate(&self.demand_items, &self.project_buildings, &self.constraints) {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!("分配比例驗證無法執行：{}", e);
                ValidationReport::empty()
            }
        }
    }

    /// 以目前的計劃結果建立調整驗證器
    pub fn adjustment_validator(&self) -> PlanAdjustmentValidator {
        PlanAdjustmentValidator::new(&self.rows, self.capacity.clone())
            .with_compatibility(self.project_lines.clone())
            .with_due_dates(self.due_dates.clone())
            .with_ceilings(self.config.utilization_ceilings.clone())
    }

    /// 超過班次稼動率上限的產線/班次
    pub fn over_ceiling_cells(&self) -> Vec<LineUtilization> {
        UtilizationCalculator::over_ceiling(&self.rows, &self.capacity, &self.config.utilization_ceilings)
    }
}
