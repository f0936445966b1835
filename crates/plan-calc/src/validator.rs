//! 製造棟分配比例驗證器

use plan_core::{BuildingConstraints, DemandItem, PlanConfig, PlanError, ProjectBuildings};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

use crate::classifier::{Classification, ProjectClassifier};
use crate::state::{DistributionState, QUANTITY_SCALE};
use crate::strategy::{
    AllocationStrategy, GreedyOrder, GreedyStrategy, MonteCarloSplittingStrategy,
    MonteCarloStrategy, PriorityStrategy, SplittingStrategy,
};
use crate::{UnassignedDemand, ValidationReport};

/// 分配比例驗證器
pub struct DistributionValidator {
    config: PlanConfig,
}

impl DistributionValidator {
    /// 創建新的驗證器
    pub fn new(config: PlanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    /// 驗證分配比例（Monte Carlo 亂數依配置的種子建立）
    pub fn validate(
        &self,
        demand_items: &[DemandItem],
        project_buildings: &ProjectBuildings,
        constraints: &BuildingConstraints,
    ) -> plan_core::Result<ValidationReport> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.validate_with_rng(demand_items, project_buildings, constraints, &mut rng)
    }

    /// 驗證分配比例，使用指定的亂數來源
    ///
    /// 1. 計算目前分配（彈性專案平均分攤到各可分配製造棟）
    /// 2. 計算各製造棟比例並檢查上下限
    /// 3. 有違反時依序嘗試替代分配策略，第一個成功即停止
    pub fn validate_with_rng<R: Rng>(
        &self,
        demand_items: &[DemandItem],
        project_buildings: &ProjectBuildings,
        constraints: &BuildingConstraints,
        rng: &mut R,
    ) -> plan_core::Result<ValidationReport> {
        if demand_items.is_empty() {
            return Err(PlanError::MissingData("需求清單為空".to_string()));
        }

        tracing::info!(
            "開始分配比例驗證：需求 {} 筆，製造棟約束 {} 筆",
            demand_items.len(),
            constraints.len()
        );

        let (current, unassigned) = self.current_distribution(demand_items, project_buildings);
        if !unassigned.is_empty() {
            tracing::warn!("{} 筆需求沒有可分配製造棟", unassigned.len());
        }

        let ratios = current.ratios(constraints);
        let violations = current.violations(constraints);
        let mut report = ValidationReport::new(current, ratios, violations, unassigned);

        if report.current_valid {
            tracing::info!("目前分配符合所有製造棟比例約束");
            return Ok(report);
        }

        for violation in report.violations.values() {
            tracing::debug!(
                "製造棟 {} 比例 {} 違反 {:?}（界限 {}，差距 {}）",
                violation.building_id,
                violation.ratio.round_dp(4),
                violation.violation_type,
                violation.limit,
                violation.gap.round_dp(4)
            );
        }

        let classification = ProjectClassifier::classify(
            demand_items,
            project_buildings,
            self.config.grouping_key,
        );

        if classification.flexible.is_empty() {
            tracing::info!("沒有彈性專案可重新分配，無替代方案");
            return Ok(report);
        }

        if let Some((kind, state)) = self.search(&classification, constraints, rng) {
            tracing::info!("策略 {} 找到符合約束的替代分配", kind);
            report.resolve(kind, state);
        } else {
            tracing::info!("所有策略均無法滿足製造棟比例約束");
        }

        Ok(report)
    }

    /// 目前分配：每筆需求平均分攤到其可分配製造棟
    fn current_distribution(
        &self,
        demand_items: &[DemandItem],
        project_buildings: &ProjectBuildings,
    ) -> (DistributionState, Vec<UnassignedDemand>) {
        let mut state = DistributionState::new();
        let mut unassigned = Vec::new();

        for item in demand_items {
            let project = item.group_key(self.config.grouping_key);
            let buildings = project_buildings.eligible(project);

            if buildings.is_empty() {
                unassigned.push(UnassignedDemand {
                    item: item.item.to_string(),
                    project: project.to_string(),
                    quantity: item.mfg,
                });
                continue;
            }

            let share = (item.mfg / Decimal::from(buildings.len())).round_dp(QUANTITY_SCALE);
            let mut remaining = item.mfg;
            for (index, building) in buildings.iter().enumerate() {
                let portion = if index + 1 == buildings.len() {
                    remaining
                } else {
                    share
                };
                state.add(building, portion);
                remaining -= portion;
            }
        }

        (state, unassigned)
    }

    /// 依固定順序嘗試各策略
    fn search<R: Rng>(
        &self,
        classification: &Classification,
        constraints: &BuildingConstraints,
        rng: &mut R,
    ) -> Option<(crate::StrategyKind, DistributionState)> {
        let baseline = classification.baseline();
        let flexible = &classification.flexible;
        let weights = &self.config.scoring;

        let mut deterministic: Vec<Box<dyn AllocationStrategy>> = vec![
            Box::new(SplittingStrategy::new(&self.config)),
            Box::new(GreedyStrategy::new(GreedyOrder::QuantityDesc, weights)),
            Box::new(GreedyStrategy::new(GreedyOrder::QuantityAsc, weights)),
            Box::new(GreedyStrategy::new(GreedyOrder::BuildingCount, weights)),
            Box::new(PriorityStrategy::new(weights)),
        ];

        for strategy in deterministic.iter_mut() {
            tracing::debug!("嘗試策略 {}", strategy.kind());
            if let Some(state) = strategy.attempt(&baseline, flexible, constraints) {
                return Some((strategy.kind(), state));
            }
        }

        let attempts = self.config.monte_carlo_attempts;

        let mut monte_carlo = MonteCarloStrategy::new(&mut *rng, weights);
        for attempt in 1..=attempts {
            tracing::debug!("嘗試策略 {}（第 {}/{} 次）", monte_carlo.kind(), attempt, attempts);
            if let Some(state) = monte_carlo.attempt(&baseline, flexible, constraints) {
                return Some((monte_carlo.kind(), state));
            }
        }

        if self.config.monte_carlo_splitting {
            let mut splitting = MonteCarloSplittingStrategy::new(&mut *rng, weights);
            for attempt in 1..=attempts {
                tracing::debug!("嘗試策略 {}（第 {}/{} 次）", splitting.kind(), attempt, attempts);
                if let Some(state) = splitting.attempt(&baseline, flexible, constraints) {
                    return Some((splitting.kind(), state));
                }
            }
        }

        None
    }
}

impl Default for DistributionValidator {
    fn default() -> Self {
        Self::new(PlanConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{StrategyKind, ViolationType};
    use plan_core::BuildingConstraint;

    fn constraints(limits: &[(&str, u32, u32)]) -> BuildingConstraints {
        limits
            .iter()
            .map(|(b, l, u)| BuildingConstraint::from_percent(b.to_string(), *l, *u).unwrap())
            .collect()
    }

    fn demand(item: &str, qty: i64) -> DemandItem {
        DemandItem::parse(item, Decimal::from(qty)).unwrap()
    }

    fn seeded() -> DistributionValidator {
        DistributionValidator::new(PlanConfig::default().with_seed(42))
    }

    #[test]
    fn test_empty_demand_is_error() {
        let result = seeded().validate(&[], &ProjectBuildings::new(), &BuildingConstraints::new());
        assert!(matches!(result, Err(PlanError::MissingData(_))));
    }

    #[test]
    fn test_valid_distribution_skips_search() {
        let buildings = ProjectBuildings::new().with("PRJ1", &["I"]).with("PRJ2", &["D"]);
        let items = vec![demand("AAAPRJ1X0001", 50), demand("AAAPRJ2X0001", 50)];

        let report = seeded()
            .validate(&items, &buildings, &constraints(&[("I", 40, 60), ("D", 40, 60)]))
            .unwrap();

        assert!(report.current_valid);
        assert!(!report.alternative_possible);
        assert!(!report.has_anomalies);
        assert!(report.resolved_by.is_none());
    }

    #[test]
    fn test_split_diagnostic_conserves_quantity() {
        let buildings = ProjectBuildings::new().with("PRJ1", &["I", "D", "K"]);
        let items = vec![demand("AAAPRJ1X0001", 100)];

        let report = seeded()
            .validate(&items, &buildings, &constraints(&[("I", 0, 100)]))
            .unwrap();

        assert_eq!(report.current_distribution.total(), Decimal::from(100));
        assert_eq!(
            report.current_distribution.quantity("I"),
            (Decimal::from(100) / Decimal::from(3)).round_dp(QUANTITY_SCALE)
        );
    }

    #[test]
    fn test_duplicate_buildings_split_evenly() {
        let buildings = ProjectBuildings::new().with("PRJ1", &["K", "D", "K"]);
        let items = vec![demand("AAAPRJ1X0001", 90)];

        let report = seeded()
            .validate(&items, &buildings, &constraints(&[("D", 40, 60), ("K", 40, 60)]))
            .unwrap();

        assert!(report.current_valid);
        assert_eq!(report.current_distribution.quantity("D"), Decimal::from(45));
        assert_eq!(report.current_distribution.quantity("K"), Decimal::from(45));
    }

    #[test]
    fn test_alternative_found_when_diagnostic_split_violates() {
        // 診斷視圖中 PRJ2 平均分攤使 I 超過上限；整批分配到 D 即可滿足
        let buildings = ProjectBuildings::new()
            .with("PRJ1", &["I"])
            .with("PRJ2", &["I", "D"]);
        let items = vec![demand("AAAPRJ1X0001", 60), demand("AAAPRJ2X0001", 40)];
        let limits = constraints(&[("I", 50, 60), ("D", 40, 50)]);

        let report = seeded().validate(&items, &buildings, &limits).unwrap();

        assert!(!report.current_valid);
        assert_eq!(report.violations["I"].violation_type, ViolationType::AboveLimit);
        assert!(report.alternative_possible);
        assert!(!report.has_anomalies);

        let alternative = report.alternative_distribution.unwrap();
        assert!(alternative.satisfies(&limits));
        assert_eq!(alternative.total(), Decimal::from(100));
    }

    #[test]
    fn test_no_flexible_projects_reports_anomaly() {
        let buildings = ProjectBuildings::new().with("PRJ1", &["I"]).with("PRJ2", &["D"]);
        let items = vec![demand("AAAPRJ1X0001", 80), demand("AAAPRJ2X0001", 20)];

        let report = seeded()
            .validate(&items, &buildings, &constraints(&[("I", 0, 30), ("D", 70, 100)]))
            .unwrap();

        assert!(!report.current_valid);
        assert!(!report.alternative_possible);
        assert!(report.has_anomalies);
    }

    #[test]
    fn test_infeasible_after_all_strategies() {
        let buildings = ProjectBuildings::new()
            .with("PRJ1", &["I"])
            .with("PRJ2", &["I", "D"]);
        let items = vec![demand("AAAPRJ1X0001", 90), demand("AAAPRJ2X0001", 10)];

        let validator = DistributionValidator::new(
            PlanConfig::default().with_seed(1).with_monte_carlo_splitting(true),
        );
        let report = validator
            .validate(&items, &buildings, &constraints(&[("I", 0, 50), ("D", 50, 100)]))
            .unwrap();

        assert!(!report.alternative_possible);
        assert!(report.has_anomalies);
        assert!(report.alternative_distribution.is_none());
    }

    #[test]
    fn test_unassigned_items_are_reported() {
        let buildings = ProjectBuildings::new().with("PRJ1", &["I"]);
        let items = vec![demand("AAAPRJ1X0001", 70), demand("AAAPRJ9X0001", 30)];

        let report = seeded()
            .validate(&items, &buildings, &constraints(&[("I", 0, 100)]))
            .unwrap();

        assert_eq!(report.allocated_total(), Decimal::from(70));
        assert_eq!(report.unassigned_total(), Decimal::from(30));
        assert_eq!(report.unassigned[0].project, "PRJ9");
    }

    #[test]
    fn test_splitting_is_tried_first() {
        // 整批分配無法滿足 45-55%，只有比例分配可以
        let buildings = ProjectBuildings::new()
            .with("PRJ1", &["I"])
            .with("PRJ2", &["D"])
            .with("PRJ3", &["I", "D"]);
        let items = vec![
            demand("AAAPRJ1X0001", 40),
            demand("AAAPRJ2X0001", 20),
            demand("AAAPRJ3X0001", 40),
        ];
        let limits = constraints(&[("I", 45, 55), ("D", 45, 55)]);

        let report = seeded().validate(&items, &buildings, &limits).unwrap();

        assert!(!report.current_valid);
        assert_eq!(report.resolved_by, Some(StrategyKind::ProportionalSplitting));
    }
}
