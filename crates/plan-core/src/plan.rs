//! 生產計劃結果列（使用者可編輯的計劃）

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::item_code::ItemCode;
use crate::line::building_of;
use crate::shift::Shift;

/// 計劃結果列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    /// 列ID
    pub id: Uuid,

    /// 產線
    pub line: String,

    /// 班次
    pub time: Shift,

    /// 品目代碼
    pub item: String,

    /// 生產數量
    pub qty: Decimal,

    /// 交期班次（Due_LT）
    pub due_lt: Option<Shift>,
}

impl ResultRow {
    /// 創建新的計劃結果列
    pub fn new(line: String, time: Shift, item: String, qty: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            line,
            time,
            item,
            qty,
            due_lt: None,
        }
    }

    /// 建構器模式：設置交期班次
    pub fn with_due_lt(mut self, due_lt: Shift) -> Self {
        self.due_lt = Some(due_lt);
        self
    }

    /// 所屬製造棟
    pub fn building(&self) -> &str {
        building_of(&self.line)
    }

    /// 專案代碼；品目代碼格式不正確時回傳 None
    pub fn project(&self) -> Option<String> {
        ItemCode::parse(&self.item)
            .ok()
            .map(|code| code.project().to_string())
    }

    /// 是否位於指定產線與班次
    pub fn is_at(&self, line: &str, time: Shift) -> bool {
        self.line == line && self.time == time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_result_row() {
        let row = ResultRow::new(
            "I_01".to_string(),
            Shift::new(3).unwrap(),
            "AAAPRJ1X0001".to_string(),
            Decimal::from(40),
        )
        .with_due_lt(Shift::new(5).unwrap());

        assert_eq!(row.building(), "I");
        assert_eq!(row.project().as_deref(), Some("PRJ1"));
        assert!(row.is_at("I_01", Shift::new(3).unwrap()));
        assert!(!row.is_at("I_01", Shift::new(4).unwrap()));
        assert_eq!(row.due_lt, Some(Shift::new(5).unwrap()));
    }

    #[test]
    fn test_malformed_item_has_no_project() {
        let row = ResultRow::new(
            "D_01".to_string(),
            Shift::FIRST,
            "X1".to_string(),
            Decimal::ONE,
        );
        assert_eq!(row.project(), None);
    }
}
