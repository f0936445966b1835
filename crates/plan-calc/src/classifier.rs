//! 專案分類（固定 / 彈性）

use plan_core::{DemandItem, GroupingKey, ProjectBuildings};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::state::DistributionState;
use crate::UnassignedDemand;

/// 只能在單一製造棟生產的專案
#[derive(Debug, Clone, PartialEq)]
pub struct FixedProject {
    pub project: String,
    pub building: String,
    pub quantity: Decimal,
}

/// 可在多個製造棟生產的專案
#[derive(Debug, Clone, PartialEq)]
pub struct FlexibleProject {
    pub project: String,
    pub quantity: Decimal,
    /// 可分配製造棟（字典序，無重複）
    pub buildings: Vec<String>,
}

/// 分類結果
#[derive(Debug, Clone, Default)]
pub struct Classification {
    pub fixed: Vec<FixedProject>,
    pub flexible: Vec<FlexibleProject>,
    pub unassigned: Vec<UnassignedDemand>,
}

impl Classification {
    /// 只含固定專案的基準分配
    pub fn baseline(&self) -> DistributionState {
        let mut state = DistributionState::new();
        for fixed in &self.fixed {
            state.add(&fixed.building, fixed.quantity);
        }
        state
    }

    /// 彈性專案總量
    pub fn flexible_total(&self) -> Decimal {
        self.flexible.iter().map(|p| p.quantity).sum()
    }
}

/// 專案分類器
pub struct ProjectClassifier;

impl ProjectClassifier {
    /// 依可分配製造棟數量將需求分為固定與彈性專案
    ///
    /// 同一專案的需求量會合併。沒有可分配製造棟的需求列入 `unassigned`。
    pub fn classify(
        demand_items: &[DemandItem],
        project_buildings: &ProjectBuildings,
        key: GroupingKey,
    ) -> Classification {
        let mut quantities: BTreeMap<&str, Decimal> = BTreeMap::new();
        let mut unassigned = Vec::new();

        for item in demand_items {
            let project = item.group_key(key);
            if project_buildings.eligible(project).is_empty() {
                unassigned.push(UnassignedDemand {
                    item: item.item.to_string(),
                    project: project.to_string(),
                    quantity: item.mfg,
                });
                continue;
            }

            *quantities.entry(project).or_insert(Decimal::ZERO) += item.mfg;
        }

        let mut classification = Classification {
            unassigned,
            ..Default::default()
        };

        for (project, quantity) in quantities {
            let mut buildings = project_buildings.eligible(project).to_vec();
            buildings.sort();
            buildings.dedup();

            if let [building] = buildings.as_slice() {
                classification.fixed.push(FixedProject {
                    project: project.to_string(),
                    building: building.clone(),
                    quantity,
                });
            } else {
                classification.flexible.push(FlexibleProject {
                    project: project.to_string(),
                    quantity,
                    buildings,
                });
            }
        }

        classification
    }
}
