//! 彈性專案分配策略
//!
//! 每個策略都從固定專案的基準分配複製出私有狀態，將彈性專案逐一分配，
//! 最後只有在所有受約束製造棟比例都落在上下限內時才算成功。

pub mod greedy;
pub mod monte_carlo;
pub mod priority;
pub mod splitting;

pub use greedy::{GreedyOrder, GreedyStrategy};
pub use monte_carlo::{MonteCarloSplittingStrategy, MonteCarloStrategy};
pub use priority::PriorityStrategy;
pub use splitting::SplittingStrategy;

use plan_core::BuildingConstraints;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

use crate::classifier::FlexibleProject;
use crate::state::{DistributionState, QUANTITY_SCALE};

/// 策略種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// 比例分配
    ProportionalSplitting,
    /// 貪婪：數量由大到小
    GreedyQuantityDesc,
    /// 貪婪：數量由小到大
    GreedyQuantityAsc,
    /// 貪婪：可分配製造棟數由少到多
    GreedyBuildingCount,
    /// 優先權加權
    PriorityWeighted,
    /// Monte Carlo 隨機分配
    MonteCarlo,
    /// Monte Carlo 隨機比例分配
    MonteCarloSplitting,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StrategyKind::ProportionalSplitting => "proportional-splitting",
            StrategyKind::GreedyQuantityDesc => "greedy-quantity-desc",
            StrategyKind::GreedyQuantityAsc => "greedy-quantity-asc",
            StrategyKind::GreedyBuildingCount => "greedy-building-count",
            StrategyKind::PriorityWeighted => "priority-weighted",
            StrategyKind::MonteCarlo => "monte-carlo",
            StrategyKind::MonteCarloSplitting => "monte-carlo-splitting",
        };
        f.write_str(name)
    }
}

/// 分配策略
pub trait AllocationStrategy {
    fn kind(&self) -> StrategyKind;

    /// 將彈性專案分配到基準分配的副本上
    fn allocate(
        &mut self,
        baseline: &DistributionState,
        flexible: &[FlexibleProject],
        constraints: &BuildingConstraints,
    ) -> DistributionState;

    /// 執行策略；結果不滿足約束時整個嘗試作廢
    fn attempt(
        &mut self,
        baseline: &DistributionState,
        flexible: &[FlexibleProject],
        constraints: &BuildingConstraints,
    ) -> Option<DistributionState> {
        let state = self.allocate(baseline, flexible, constraints);
        if state.satisfies(constraints) {
            Some(state)
        } else {
            None
        }
    }
}

/// 依比例向量拆分數量，最後一個製造棟取餘數以保持總量不變
pub(crate) fn split_quantity(
    state: &mut DistributionState,
    buildings: &[String],
    shares: &[Decimal],
    quantity: Decimal,
) {
    let mut remaining = quantity;
    let last = buildings.len().saturating_sub(1);

    for (index, (building, share)) in buildings.iter().zip(shares).enumerate() {
        let portion = if index == last {
            remaining
        } else {
            (quantity * *share).round_dp(QUANTITY_SCALE)
        };
        state.add(building, portion);
        remaining -= portion;
    }
}

/// 正規化為總和 1；全部為 0 時平均分配
pub(crate) fn normalize(weights: &[Decimal]) -> Vec<Decimal> {
    let sum: Decimal = weights.iter().copied().sum();
    if sum <= Decimal::ZERO {
        let uniform = Decimal::ONE / Decimal::from(weights.len().max(1));
        return vec![uniform; weights.len()];
    }
    weights.iter().map(|w| *w / sum).collect()
}
