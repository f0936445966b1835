//! Monte Carlo 隨機分配
//!
//! 亂數來源由呼叫端注入，固定種子即可重現結果。

use plan_core::{BuildingConstraints, ScoringWeights};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::{normalize, split_quantity, AllocationStrategy, StrategyKind};
use crate::classifier::FlexibleProject;
use crate::scoring::{positive_weights, ScoreProfile};
use crate::state::DistributionState;

fn to_f64_weights(weights: &[Decimal]) -> Vec<f64> {
    weights
        .iter()
        .map(|w| w.to_f64().unwrap_or(0.0).max(0.0))
        .collect()
}

/// 依權重隨機抽選索引；權重無效時均勻抽選
fn sample_index<R: Rng>(rng: &mut R, weights: &[Decimal]) -> usize {
    match WeightedIndex::new(to_f64_weights(weights)) {
        Ok(distribution) => distribution.sample(rng),
        Err(_) => rng.gen_range(0..weights.len()),
    }
}

/// Monte Carlo 策略：每個專案依權重隨機選一個製造棟整批分配
pub struct MonteCarloStrategy<R> {
    rng: R,
    profile: ScoreProfile,
    floor: Decimal,
}

impl<R: Rng> MonteCarloStrategy<R> {
    pub fn new(rng: R, weights: &ScoringWeights) -> Self {
        Self {
            rng,
            profile: ScoreProfile::weighting(weights),
            floor: weights.split_over_weight,
        }
    }
}

impl<R: Rng> AllocationStrategy for MonteCarloStrategy<R> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::MonteCarlo
    }

    fn allocate(
        &mut self,
        baseline: &DistributionState,
        flexible: &[FlexibleProject],
        constraints: &BuildingConstraints,
    ) -> DistributionState {
        let mut state = baseline.clone();

        for project in flexible {
            if project.buildings.is_empty() {
                continue;
            }

            let weights = positive_weights(
                &self.profile,
                &state,
                &project.buildings,
                constraints,
                self.floor,
            );
            let index = sample_index(&mut self.rng, &weights);
            state.add(&project.buildings[index], project.quantity);
        }

        state
    }
}

/// Monte Carlo 比例分配：每個專案的拆分比例 = 權重 × 隨機擾動，再正規化
pub struct MonteCarloSplittingStrategy<R> {
    rng: R,
    profile: ScoreProfile,
    floor: Decimal,
}

impl<R: Rng> MonteCarloSplittingStrategy<R> {
    pub fn new(rng: R, weights: &ScoringWeights) -> Self {
        Self {
            rng,
            profile: ScoreProfile::weighting(weights),
            floor: weights.split_over_weight,
        }
    }
}

impl<R: Rng> AllocationStrategy for MonteCarloSplittingStrategy<R> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::MonteCarloSplitting
    }

    fn allocate(
        &mut self,
        baseline: &DistributionState,
        flexible: &[FlexibleProject],
        constraints: &BuildingConstraints,
    ) -> DistributionState {
        let mut state = baseline.clone();

        for project in flexible {
            if project.buildings.is_empty() {
                continue;
            }

            let weights = positive_weights(
                &self.profile,
                &state,
                &project.buildings,
                constraints,
                self.floor,
            );

            let jittered: Vec<Decimal> = weights
                .iter()
                .map(|w| {
                    let noise: f64 = self.rng.gen_range(0.01..=1.0);
                    *w * Decimal::from_f64_retain(noise).unwrap_or(Decimal::ONE)
                })
                .collect();

            let shares = normalize(&jittered);
            split_quantity(&mut state, &project.buildings, &shares, project.quantity);
        }

        state
    }
}
