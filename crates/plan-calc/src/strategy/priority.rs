//! 優先權加權分配

use plan_core::{BuildingConstraints, ScoringWeights};
use rust_decimal::Decimal;

use super::{AllocationStrategy, StrategyKind};
use crate::classifier::FlexibleProject;
use crate::scoring::{best_building, ScoreProfile};
use crate::state::DistributionState;

/// 優先權加權策略
///
/// 每一輪對所有未分配專案計算最佳製造棟分數，先分配分數最高的專案
/// （同分時數量大者優先），分配後重新評分，直到全部分配完畢。
pub struct PriorityStrategy {
    profile: ScoreProfile,
}

impl PriorityStrategy {
    pub fn new(weights: &ScoringWeights) -> Self {
        Self {
            profile: ScoreProfile::priority(weights),
        }
    }
}

impl AllocationStrategy for PriorityStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::PriorityWeighted
    }

    fn allocate(
        &mut self,
        baseline: &DistributionState,
        flexible: &[FlexibleProject],
        constraints: &BuildingConstraints,
    ) -> DistributionState {
        let mut state = baseline.clone();
        let mut remaining: Vec<&FlexibleProject> = flexible.iter().collect();

        while !remaining.is_empty() {
            let mut pick: Option<(usize, &str, Decimal)> = None;

            for (index, project) in remaining.iter().copied().enumerate() {
                let Some((building, score)) =
                    best_building(&self.profile, &state, &project.buildings, constraints)
                else {
                    continue;
                };

                let better = match pick {
                    None => true,
                    Some((best_index, _, best_score)) => {
                        score > best_score
                            || (score == best_score
                                && project.quantity > remaining[best_index].quantity)
                    }
                };

                if better {
                    pick = Some((index, building, score));
                }
            }

            let Some((index, building, _)) = pick else {
                break;
            };

            let project = remaining.remove(index);
            state.add(building, project.quantity);
        }

        state
    }
}
