//! 需求模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::GroupingKey;
use crate::item_code::ItemCode;

/// 需求品目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandItem {
    /// 需求ID
    pub id: Uuid,

    /// 品目代碼
    pub item: ItemCode,

    /// 專案代碼
    pub project: String,

    /// Basic2 代碼
    pub basic2: String,

    /// 生產需求數量（MFG）
    pub mfg: Decimal,

    /// 出貨目標數量（SOP）
    pub sop: Decimal,

    /// RMC 代碼
    pub rmc: String,

    /// 出貨地群組
    pub tosite_group: Option<String>,
}

impl DemandItem {
    /// 由品目代碼創建需求，衍生欄位依固定位置切出
    pub fn new(item: ItemCode, mfg: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            project: item.project().to_string(),
            basic2: item.basic2().to_string(),
            rmc: item.rmc().to_string(),
            tosite_group: item.site_group().map(str::to_string),
            item,
            mfg,
            sop: Decimal::ZERO,
        }
    }

    /// 解析品目代碼並創建需求
    pub fn parse(item: &str, mfg: Decimal) -> crate::Result<Self> {
        Ok(Self::new(ItemCode::parse(item)?, mfg))
    }

    /// 建構器模式：設置 SOP
    pub fn with_sop(mut self, sop: Decimal) -> Self {
        self.sop = sop;
        self
    }

    /// 建構器模式：覆寫專案代碼（來源表已提供 Project 欄位時）
    pub fn with_project(mut self, project: String) -> Self {
        self.project = project;
        self
    }

    /// 建構器模式：覆寫 Basic2 代碼
    pub fn with_basic2(mut self, basic2: String) -> Self {
        self.basic2 = basic2;
        self
    }

    /// 依分組鍵取得分配用的專案鍵
    pub fn group_key(&self, key: GroupingKey) -> &str {
        match key {
            GroupingKey::Project => &self.project,
            GroupingKey::Basic2 => &self.basic2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_demand_item() {
        let demand = DemandItem::parse("AAAPRJ1XB0001", Decimal::from(120)).unwrap();

        assert_eq!(demand.project, "PRJ1");
        assert_eq!(demand.basic2, "PRJ1X");
        assert_eq!(demand.rmc, "PRJ1XB0");
        assert_eq!(demand.tosite_group.as_deref(), Some("X"));
        assert_eq!(demand.mfg, Decimal::from(120));
        assert_eq!(demand.sop, Decimal::ZERO);
    }

    #[test]
    fn test_demand_builder() {
        let demand = DemandItem::parse("AAAPRJ1XB0001", Decimal::from(50))
            .unwrap()
            .with_sop(Decimal::from(40))
            .with_project("OVRD".to_string());

        assert_eq!(demand.sop, Decimal::from(40));
        assert_eq!(demand.group_key(GroupingKey::Project), "OVRD");
        assert_eq!(demand.group_key(GroupingKey::Basic2), "PRJ1X");
    }

    #[test]
    fn test_reject_short_item() {
        assert!(DemandItem::parse("AB", Decimal::ONE).is_err());
    }
}
