//! 貪婪分配：每個專案整批分配到目前分數最高的製造棟

use plan_core::{BuildingConstraints, ScoringWeights};

use super::{AllocationStrategy, StrategyKind};
use crate::classifier::FlexibleProject;
use crate::scoring::{best_building, ScoreProfile};
use crate::state::DistributionState;

/// 彈性專案處理順序
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GreedyOrder {
    /// 數量由大到小
    QuantityDesc,
    /// 數量由小到大
    QuantityAsc,
    /// 可分配製造棟數由少到多
    BuildingCount,
}

/// 貪婪分配策略
pub struct GreedyStrategy {
    order: GreedyOrder,
    profile: ScoreProfile,
}

impl GreedyStrategy {
    pub fn new(order: GreedyOrder, weights: &ScoringWeights) -> Self {
        Self {
            order,
            profile: ScoreProfile::greedy(weights),
        }
    }

    fn sorted<'a>(&self, flexible: &'a [FlexibleProject]) -> Vec<&'a FlexibleProject> {
        let mut projects: Vec<_> = flexible.iter().collect();
        match self.order {
            GreedyOrder::QuantityDesc => projects.sort_by(|a, b| b.quantity.cmp(&a.quantity)),
            GreedyOrder::QuantityAsc => projects.sort_by(|a, b| a.quantity.cmp(&b.quantity)),
            GreedyOrder::BuildingCount => projects.sort_by_key(|p| p.buildings.len()),
        }
        projects
    }
}

impl AllocationStrategy for GreedyStrategy {
    fn kind(&self) -> StrategyKind {
        match self.order {
            GreedyOrder::QuantityDesc => StrategyKind::GreedyQuantityDesc,
            GreedyOrder::QuantityAsc => StrategyKind::GreedyQuantityAsc,
            GreedyOrder::BuildingCount => StrategyKind::GreedyBuildingCount,
        }
    }

    fn allocate(
        &mut self,
        baseline: &DistributionState,
        flexible: &[FlexibleProject],
        constraints: &BuildingConstraints,
    ) -> DistributionState {
        let mut state = baseline.clone();

        for project in self.sorted(flexible) {
            if let Some((building, _)) =
                best_building(&self.profile, &state, &project.buildings, constraints)
            {
                state.add(building, project.quantity);
            }
        }

        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::test_support::{constraints, flexible, state};
    use rust_decimal::Decimal;

    #[test]
    fn test_greedy_fills_under_quota_building() {
        let limits = constraints(&[("I", 40, 60), ("D", 40, 60)]);
        let baseline = state(&[("I", 50)]);
        let projects = vec![flexible("PRJ2", 50, &["D", "I"])];

        let mut strategy = GreedyStrategy::new(GreedyOrder::QuantityDesc, &ScoringWeights::default());
        let result = strategy.attempt(&baseline, &projects, &limits).unwrap();

        assert_eq!(result.quantity("D"), Decimal::from(50));
        assert_eq!(result.quantity("I"), Decimal::from(50));
    }

    #[test]
    fn test_greedy_order_matters() {
        // 大專案先分配到 D，小專案再補 I
        let limits = constraints(&[("I", 40, 60), ("D", 40, 60)]);
        let baseline = state(&[("I", 40)]);
        let projects = vec![
            flexible("SMALL", 10, &["D", "I"]),
            flexible("LARGE", 50, &["D", "I"]),
        ];

        let mut desc = GreedyStrategy::new(GreedyOrder::QuantityDesc, &ScoringWeights::default());
        let result = desc.attempt(&baseline, &projects, &limits).unwrap();
        assert_eq!(result.quantity("D"), Decimal::from(50));
        assert_eq!(result.quantity("I"), Decimal::from(50));
        assert_eq!(desc.kind(), StrategyKind::GreedyQuantityDesc);
    }

    #[test]
    fn test_greedy_reports_infeasible() {
        // 彈性量不足以把 D 拉到 70%
        let limits = constraints(&[("I", 0, 30), ("D", 70, 100)]);
        let baseline = state(&[("I", 80), ("D", 20)]);
        let projects = vec![flexible("PRJ2", 10, &["D", "I"])];

        let mut strategy = GreedyStrategy::new(GreedyOrder::BuildingCount, &ScoringWeights::default());
        assert!(strategy.attempt(&baseline, &projects, &limits).is_none());
    }

    #[test]
    fn test_sort_orders() {
        let projects = vec![
            flexible("A", 30, &["D", "I", "K"]),
            flexible("B", 10, &["D", "I"]),
            flexible("C", 20, &["D", "I"]),
        ];
        let weights = ScoringWeights::default();

        let asc = GreedyStrategy::new(GreedyOrder::QuantityAsc, &weights);
        let names: Vec<_> = asc.sorted(&projects).into_iter().map(|p| p.project.as_str()).collect();
        assert_eq!(names, vec!["B", "C", "A"]);

        let by_count = GreedyStrategy::new(GreedyOrder::BuildingCount, &weights);
        let names: Vec<_> = by_count.sorted(&projects).into_iter().map(|p| p.project.as_str()).collect();
        assert_eq!(names, vec!["B", "C", "A"]);
    }
}
