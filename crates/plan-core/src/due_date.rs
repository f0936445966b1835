//! 交期表（品目/專案 → 最後可生產班次）

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::item_code::ItemCode;
use crate::shift::{Shift, ShiftCalendar};
use crate::{PlanError, Result};

/// 交期表
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DueDateTable {
    by_item: HashMap<String, Shift>,
    by_project: HashMap<String, Shift>,
}

impl DueDateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 設置品目交期班次
    pub fn set_item(&mut self, item: &str, due: Shift) {
        self.by_item.insert(item.to_string(), due);
    }

    /// 設置專案交期班次
    pub fn set_project(&mut self, project: &str, due: Shift) {
        self.by_project.insert(project.to_string(), due);
    }

    /// 建構器模式：品目交期
    pub fn with_item(mut self, item: &str, due: Shift) -> Self {
        self.set_item(item, due);
        self
    }

    /// 建構器模式：專案交期
    pub fn with_project(mut self, project: &str, due: Shift) -> Self {
        self.set_project(project, due);
        self
    }

    /// 以日期設置品目交期，透過班次日曆換算為班次
    pub fn set_item_date(
        &mut self,
        item: &str,
        due_date: NaiveDate,
        calendar: &ShiftCalendar,
    ) -> Result<()> {
        let due = calendar.due_shift(due_date).ok_or_else(|| {
            PlanError::Conversion(format!(
                "品目 {item} 的交期 {due_date} 早於計劃起始日 {}",
                calendar.start_date
            ))
        })?;
        self.set_item(item, due);
        Ok(())
    }

    /// 查詢交期：先查品目，再查專案
    pub fn due_shift(&self, item: &ItemCode) -> Option<Shift> {
        self.by_item
            .get(item.as_str())
            .or_else(|| self.by_project.get(item.project()))
            .copied()
    }

    pub fn is_empty(&self) -> bool {
        self.by_item.is_empty() && self.by_project.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shift(n: u8) -> Shift {
        Shift::new(n).unwrap()
    }

    #[test]
    fn test_item_takes_precedence() {
        let table = DueDateTable::new()
            .with_project("PRJ1", shift(10))
            .with_item("AAAPRJ1X0001", shift(4));

        let item = ItemCode::parse("AAAPRJ1X0001").unwrap();
        let sibling = ItemCode::parse("AAAPRJ1X0002").unwrap();
        let other = ItemCode::parse("AAAPRJ2X0001").unwrap();

        assert_eq!(table.due_shift(&item), Some(shift(4)));
        assert_eq!(table.due_shift(&sibling), Some(shift(10)));
        assert_eq!(table.due_shift(&other), None);
    }

    #[test]
    fn test_set_item_date() {
        let calendar = ShiftCalendar::new(NaiveDate::from_ymd_opt(2025, 11, 3).unwrap());
        let mut table = DueDateTable::new();

        table
            .set_item_date(
                "AAAPRJ1X0001",
                NaiveDate::from_ymd_opt(2025, 11, 4).unwrap(),
                &calendar,
            )
            .unwrap();

        let item = ItemCode::parse("AAAPRJ1X0001").unwrap();
        assert_eq!(table.due_shift(&item), Some(shift(4)));

        let too_early = table.set_item_date(
            "AAAPRJ1X0002",
            NaiveDate::from_ymd_opt(2025, 11, 2).unwrap(),
            &calendar,
        );
        assert!(matches!(too_early, Err(PlanError::Conversion(_))));
    }
}
