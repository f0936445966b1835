//! 比例分配：將專案數量依連續比例向量拆分到各可分配製造棟

use plan_core::{BuildingConstraints, PlanConfig};
use rust_decimal::Decimal;

use super::{normalize, split_quantity, AllocationStrategy, StrategyKind};
use crate::classifier::FlexibleProject;
use crate::scoring::{positive_weights, ScoreProfile};
use crate::state::DistributionState;

/// 比例分配策略
///
/// 初始比例取自各製造棟的正數權重，之後進行數輪調整：預計超過上限的
/// 製造棟減少比例、低於下限的增加比例（朝上下限中點），每輪每個製造棟
/// 最多調整 `step`，調整後重新正規化。
pub struct SplittingStrategy {
    profile: ScoreProfile,
    floor: Decimal,
    rounds: u32,
    step: Decimal,
}

impl SplittingStrategy {
    pub fn new(config: &PlanConfig) -> Self {
        Self {
            profile: ScoreProfile::weighting(&config.scoring),
            floor: config.scoring.split_over_weight,
            rounds: config.splitting_rounds,
            step: config.splitting_step,
        }
    }

    /// 計算專案在各製造棟的分配比例
    pub fn shares(
        &self,
        state: &DistributionState,
        project: &FlexibleProject,
        constraints: &BuildingConstraints,
    ) -> Vec<Decimal> {
        let weights = positive_weights(
            &self.profile,
            state,
            &project.buildings,
            constraints,
            self.floor,
        );
        let mut shares = normalize(&weights);

        if project.quantity <= Decimal::ZERO {
            return shares;
        }

        let total_after = state.total() + project.quantity;
        // 比例差距換算為專案內比例的係數
        let scale = total_after / project.quantity;

        for _ in 0..self.rounds {
            for (share, building) in shares.iter_mut().zip(&project.buildings) {
                let Some(constraint) = constraints.get(building) else {
                    continue;
                };

                let projected = DistributionState::ratio_of(
                    state.quantity(building) + project.quantity * *share,
                    total_after,
                );

                let target = (constraint.lower_limit + constraint.upper_limit) / Decimal::TWO;

                if projected > constraint.upper_limit {
                    let cut = ((projected - target) * scale).min(self.step);
                    *share = (*share - cut).max(Decimal::ZERO);
                } else if projected < constraint.lower_limit {
                    let boost = ((target - projected) * scale).min(self.step);
                    *share += boost;
                }
            }

            shares = normalize(&shares);
        }

        shares
    }
}

impl AllocationStrategy for SplittingStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::ProportionalSplitting
    }

    fn allocate(
        &mut self,
        baseline: &DistributionState,
        flexible: &[FlexibleProject],
        constraints: &BuildingConstraints,
    ) -> DistributionState {
        let mut state = baseline.clone();

        for project in flexible {
            let shares = self.shares(&state, project, constraints);
            split_quantity(&mut state, &project.buildings, &shares, project.quantity);
        }

        state
    }
}
