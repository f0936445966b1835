//! 製造棟分配狀態

use plan_core::BuildingConstraints;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::{Violation, ViolationType};

/// 拆分數量時保留的小數位數（固定位數使拆分後的加總不會產生捨入誤差）
pub const QUANTITY_SCALE: u32 = 10;

/// 製造棟 → 累計分配量
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DistributionState {
    quantities: BTreeMap<String, Decimal>,
}

impl DistributionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 為製造棟累加分配量
    pub fn add(&mut self, building: &str, quantity: Decimal) {
        *self
            .quantities
            .entry(building.to_string())
            .or_insert(Decimal::ZERO) += quantity;
    }

    /// 製造棟的分配量
    pub fn quantity(&self, building: &str) -> Decimal {
        self.quantities
            .get(building)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// 總分配量
    pub fn total(&self) -> Decimal {
        self.quantities.values().copied().sum()
    }

    /// 製造棟比例；總量為 0 時為 0
    pub fn ratio(&self, building: &str) -> Decimal {
        Self::ratio_of(self.quantity(building), self.total())
    }

    /// 以指定總量計算比例
    pub fn ratio_of(quantity: Decimal, total: Decimal) -> Decimal {
        if total > Decimal::ZERO {
            quantity / total
        } else {
            Decimal::ZERO
        }
    }

    /// 所有已分配及受約束製造棟的比例
    pub fn ratios(&self, constraints: &BuildingConstraints) -> BTreeMap<String, Decimal> {
        let total = self.total();
        let mut ratios: BTreeMap<String, Decimal> = self
            .quantities
            .iter()
            .map(|(building, qty)| (building.clone(), Self::ratio_of(*qty, total)))
            .collect();

        for building in constraints.building_ids() {
            ratios
                .entry(building.to_string())
                .or_insert(Decimal::ZERO);
        }

        ratios
    }

    /// 檢查各受約束製造棟的比例
    pub fn violations(&self, constraints: &BuildingConstraints) -> BTreeMap<String, Violation> {
        let total = self.total();
        let mut violations = BTreeMap::new();

        for constraint in constraints.iter() {
            let ratio = Self::ratio_of(self.quantity(&constraint.building_id), total);

            let violation = if ratio < constraint.lower_limit {
                Some((ViolationType::BelowLimit, constraint.lower_limit, constraint.lower_limit - ratio))
            } else if ratio > constraint.upper_limit {
                Some((ViolationType::AboveLimit, constraint.upper_limit, ratio - constraint.upper_limit))
            } else {
                None
            };

            if let Some((violation_type, limit, gap)) = violation {
                violations.insert(
                    constraint.building_id.clone(),
                    Violation {
                        building_id: constraint.building_id.clone(),
                        violation_type,
                        ratio,
                        limit,
                        gap,
                    },
                );
            }
        }

        violations
    }

    /// 所有受約束製造棟的比例是否都在上下限內
    pub fn satisfies(&self, constraints: &BuildingConstraints) -> bool {
        let total = self.total();
        constraints
            .iter()
            .all(|c| c.contains(Self::ratio_of(self.quantity(&c.building_id), total)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.quantities.iter().map(|(b, q)| (b.as_str(), *q))
    }

    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }
}

impl FromIterator<(String, Decimal)> for DistributionState {
    fn from_iter<T: IntoIterator<Item = (String, Decimal)>>(iter: T) -> Self {
        let mut state = Self::new();
        for (building, qty) in iter {
            state.add(&building, qty);
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plan_core::BuildingConstraint;

    fn constraints(limits: &[(&str, u32, u32)]) -> BuildingConstraints {
        limits
            .iter()
            .map(|(b, l, u)| BuildingConstraint::from_percent(b.to_string(), *l, *u).unwrap())
            .collect()
    }

    #[test]
    fn test_accumulate() {
        let mut state = DistributionState::new();
        state.add("I", Decimal::from(30));
        state.add("D", Decimal::from(20));
        state.add("I", Decimal::from(10));

        assert_eq!(state.quantity("I"), Decimal::from(40));
        assert_eq!(state.quantity("K"), Decimal::ZERO);
        assert_eq!(state.total(), Decimal::from(60));
    }

    #[test]
    fn test_empty_ratio_is_zero() {
        let state = DistributionState::new();
        assert_eq!(state.ratio("I"), Decimal::ZERO);
    }

    #[test]
    fn test_ratios_include_constrained_buildings() {
        let state: DistributionState = vec![("I".to_string(), Decimal::from(100))]
            .into_iter()
            .collect();
        let ratios = state.ratios(&constraints(&[("I", 0, 100), ("D", 0, 100)]));

        assert_eq!(ratios.get("I"), Some(&Decimal::ONE));
        assert_eq!(ratios.get("D"), Some(&Decimal::ZERO));
    }

    #[test]
    fn test_violations() {
        let state: DistributionState = vec![
            ("I".to_string(), Decimal::from(80)),
            ("D".to_string(), Decimal::from(20)),
        ]
        .into_iter()
        .collect();
        let limits = constraints(&[("I", 0, 30), ("D", 70, 100)]);

        let violations = state.violations(&limits);
        assert_eq!(violations.len(), 2);

        let above = &violations["I"];
        assert_eq!(above.violation_type, ViolationType::AboveLimit);
        assert_eq!(above.gap, Decimal::new(5, 1));

        let below = &violations["D"];
        assert_eq!(below.violation_type, ViolationType::BelowLimit);
        assert_eq!(below.gap, Decimal::new(5, 1));

        assert!(!state.satisfies(&limits));
    }

    #[test]
    fn test_satisfies_on_boundary() {
        let state: DistributionState = vec![
            ("I".to_string(), Decimal::from(60)),
            ("D".to_string(), Decimal::from(40)),
        ]
        .into_iter()
        .collect();

        assert!(state.satisfies(&constraints(&[("I", 40, 60), ("D", 40, 60)])));
        assert!(state.violations(&constraints(&[("I", 40, 60), ("D", 40, 60)])).is_empty());
    }
}
