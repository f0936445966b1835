//! 製造棟評分
//!
//! 低於下限的製造棟給予與差距成正比的高分，高於上限的給予固定懲罰，
//! 區間內則隨比例接近上限線性遞減至 0。

use plan_core::{BuildingConstraint, BuildingConstraints, ScoringWeights};
use rust_decimal::Decimal;

use crate::state::DistributionState;

/// 評分參數組
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreProfile {
    /// 低於下限時，差距乘上的倍數
    pub under_weight: Decimal,
    /// 高於上限時的分數
    pub over_score: Decimal,
    /// 區間內的最高分
    pub in_band_scale: Decimal,
}

impl ScoreProfile {
    /// 貪婪策略
    pub fn greedy(weights: &ScoringWeights) -> Self {
        Self {
            under_weight: weights.under_weight,
            over_score: weights.over_penalty,
            in_band_scale: weights.in_band_scale,
        }
    }

    /// 優先權策略
    pub fn priority(weights: &ScoringWeights) -> Self {
        Self {
            under_weight: weights.priority_under_weight,
            over_score: weights.over_penalty,
            in_band_scale: weights.priority_in_band_scale,
        }
    }

    /// 比例分配與 Monte Carlo（分數作為權重，必須為正）
    pub fn weighting(weights: &ScoringWeights) -> Self {
        Self {
            under_weight: weights.under_weight,
            over_score: weights.split_over_weight,
            in_band_scale: weights.in_band_scale,
        }
    }

    /// 依目前比例評分
    pub fn score(&self, ratio: Decimal, constraint: &BuildingConstraint) -> Decimal {
        if ratio < constraint.lower_limit {
            return (constraint.lower_limit - ratio) * self.under_weight;
        }

        if ratio > constraint.upper_limit {
            return self.over_score;
        }

        let width = constraint.band_width();
        if width.is_zero() {
            return Decimal::ZERO;
        }

        self.in_band_scale * (Decimal::ONE - (ratio - constraint.lower_limit) / width)
    }
}

/// 依分配狀態評分單一製造棟；沒有約束的製造棟為 0 分
pub fn score_building(
    profile: &ScoreProfile,
    state: &DistributionState,
    building: &str,
    constraints: &BuildingConstraints,
) -> Decimal {
    match constraints.get(building) {
        Some(constraint) => profile.score(state.ratio(building), constraint),
        None => Decimal::ZERO,
    }
}

/// 取最高分製造棟；同分時取順序在前者
pub fn best_building<'a>(
    profile: &ScoreProfile,
    state: &DistributionState,
    buildings: &'a [String],
    constraints: &BuildingConstraints,
) -> Option<(&'a str, Decimal)> {
    let mut best: Option<(&str, Decimal)> = None;

    for building in buildings {
        let score = score_building(profile, state, building, constraints);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((building.as_str(), score)),
        }
    }

    best
}

/// 製造棟的正數權重（分數低於最小權重時取最小權重）
pub fn positive_weights(
    profile: &ScoreProfile,
    state: &DistributionState,
    buildings: &[String],
    constraints: &BuildingConstraints,
    floor: Decimal,
) -> Vec<Decimal> {
    buildings
        .iter()
        .map(|b| score_building(profile, state, b, constraints).max(floor))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn band(lower: u32, upper: u32) -> BuildingConstraint {
        BuildingConstraint::from_percent("I".to_string(), lower, upper).unwrap()
    }

    #[rstest]
    // 低於下限：差距 0.2 × 10
    #[case(20, Decimal::from(2))]
    // 等於下限：區間內最高分
    #[case(40, Decimal::from(5))]
    // 區間中點
    #[case(50, Decimal::new(25, 1))]
    // 等於上限
    #[case(60, Decimal::ZERO)]
    // 高於上限：固定懲罰
    #[case(80, Decimal::from(-10))]
    fn test_greedy_score(#[case] percent: u32, #[case] expected: Decimal) {
        let profile = ScoreProfile::greedy(&ScoringWeights::default());
        let ratio = Decimal::from(percent) / Decimal::ONE_HUNDRED;

        assert_eq!(profile.score(ratio, &band(40, 60)), expected);
    }

    #[test]
    fn test_priority_profile_rewards_more() {
        let weights = ScoringWeights::default();
        let greedy = ScoreProfile::greedy(&weights);
        let priority = ScoreProfile::priority(&weights);
        let ratio = Decimal::new(2, 1);

        assert!(priority.score(ratio, &band(40, 60)) > greedy.score(ratio, &band(40, 60)));
    }

    #[test]
    fn test_zero_width_band() {
        let profile = ScoreProfile::greedy(&ScoringWeights::default());
        assert_eq!(profile.score(Decimal::new(5, 1), &band(50, 50)), Decimal::ZERO);
    }

    #[test]
    fn test_best_building_tie_takes_first() {
        let constraints: BuildingConstraints = ["D", "I"]
            .iter()
            .map(|b| BuildingConstraint::from_percent(b.to_string(), 40, 60).unwrap())
            .collect();
        let state = DistributionState::new();
        let buildings = vec!["D".to_string(), "I".to_string()];
        let profile = ScoreProfile::greedy(&ScoringWeights::default());

        let (building, score) = best_building(&profile, &state, &buildings, &constraints).unwrap();
        assert_eq!(building, "D");
        assert_eq!(score, Decimal::from(4));
    }

    #[test]
    fn test_positive_weights_floor() {
        let constraints: BuildingConstraints = vec![
            BuildingConstraint::from_percent("I".to_string(), 0, 30).unwrap(),
            BuildingConstraint::from_percent("D".to_string(), 70, 100).unwrap(),
        ]
        .into_iter()
        .collect();
        let state: DistributionState = vec![("I".to_string(), Decimal::from(100))]
            .into_iter()
            .collect();
        let profile = ScoreProfile::weighting(&ScoringWeights::default());
        let buildings = vec!["D".to_string(), "I".to_string()];

        let weights = positive_weights(&profile, &state, &buildings, &constraints, Decimal::new(1, 1));
        assert_eq!(weights, vec![Decimal::from(7), Decimal::new(1, 1)]);
    }
}
