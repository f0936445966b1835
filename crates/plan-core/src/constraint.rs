//! 製造棟分配比例約束

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{PlanError, Result};

/// 單一製造棟的分配比例上下限（佔總分配量的比例，0-1）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingConstraint {
    /// 製造棟ID（如 I、D、K、M）
    pub building_id: String,

    /// 比例下限
    pub lower_limit: Decimal,

    /// 比例上限
    pub upper_limit: Decimal,
}

impl BuildingConstraint {
    /// 創建約束，要求 `0 <= lower <= upper <= 1`
    pub fn new(building_id: String, lower_limit: Decimal, upper_limit: Decimal) -> Result<Self> {
        if lower_limit < Decimal::ZERO || upper_limit > Decimal::ONE {
            return Err(PlanError::InvalidConstraint(format!(
                "{building_id}: 上下限必須介於 0 與 1 之間（{lower_limit} - {upper_limit}）"
            )));
        }

        if lower_limit > upper_limit {
            return Err(PlanError::InvalidConstraint(format!(
                "{building_id}: 下限 {lower_limit} 大於上限 {upper_limit}"
            )));
        }

        Ok(Self {
            building_id,
            lower_limit,
            upper_limit,
        })
    }

    /// 由百分比創建（如 40, 60）
    pub fn from_percent(building_id: String, lower: u32, upper: u32) -> Result<Self> {
        Self::new(
            building_id,
            Decimal::from(lower) / Decimal::ONE_HUNDRED,
            Decimal::from(upper) / Decimal::ONE_HUNDRED,
        )
    }

    /// 比例是否落在上下限內（含邊界）
    pub fn contains(&self, ratio: Decimal) -> bool {
        ratio >= self.lower_limit && ratio <= self.upper_limit
    }

    /// 上下限區間寬度
    pub fn band_width(&self) -> Decimal {
        self.upper_limit - self.lower_limit
    }
}

/// 全部製造棟約束，以製造棟ID字典序排列
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildingConstraints {
    constraints: BTreeMap<String, BuildingConstraint>,
}

impl BuildingConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加約束（同一製造棟重複添加時覆蓋）
    pub fn insert(&mut self, constraint: BuildingConstraint) {
        self.constraints
            .insert(constraint.building_id.clone(), constraint);
    }

    /// 建構器模式：添加約束
    pub fn with(mut self, constraint: BuildingConstraint) -> Self {
        self.insert(constraint);
        self
    }

    pub fn get(&self, building_id: &str) -> Option<&BuildingConstraint> {
        self.constraints.get(building_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BuildingConstraint> {
        self.constraints.values()
    }

    pub fn building_ids(&self) -> impl Iterator<Item = &str> {
        self.constraints.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}

impl FromIterator<BuildingConstraint> for BuildingConstraints {
    fn from_iter<T: IntoIterator<Item = BuildingConstraint>>(iter: T) -> Self {
        let mut constraints = Self::new();
        for constraint in iter {
            constraints.insert(constraint);
        }
        constraints
    }
}
