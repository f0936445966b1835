//! 產線產能表
//!
//! 以產線代碼為列、班次 1-14 為欄。除一般產線外，另有兩種製造棟層級的
//! 限制列：
//! - `Max_line_{building}`：該班次製造棟內最多可同時運轉的產線數
//! - `Max_qty_{building}`：該班次製造棟內的總生產量上限

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::line::building_of;
use crate::shift::{Shift, SHIFT_COUNT};
use crate::{PlanError, Result};

const MAX_LINE_PREFIX: &str = "Max_line_";
const MAX_QTY_PREFIX: &str = "Max_qty_";

/// 單列的 14 個班次產能
pub type ShiftValues = [Option<Decimal>; SHIFT_COUNT];

/// 產線產能表
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineCapacityTable {
    /// 產線 → 各班次產能
    lines: BTreeMap<String, ShiftValues>,

    /// 製造棟 → 各班次最大運轉產線數
    max_lines: BTreeMap<String, ShiftValues>,

    /// 製造棟 → 各班次最大生產量
    max_qty: BTreeMap<String, ShiftValues>,
}

impl LineCapacityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加一列；`Max_line_*` / `Max_qty_*` 列會歸入製造棟限制
    pub fn insert_row(&mut self, label: &str, values: ShiftValues) {
        if let Some(building) = label.strip_prefix(MAX_LINE_PREFIX) {
            self.max_lines.insert(building.to_string(), values);
        } else if let Some(building) = label.strip_prefix(MAX_QTY_PREFIX) {
            self.max_qty.insert(building.to_string(), values);
        } else {
            self.lines.insert(label.to_string(), values);
        }
    }

    /// 建構器模式：添加所有班次相同數值的一列
    pub fn with_uniform_row(mut self, label: &str, value: Decimal) -> Self {
        self.insert_row(label, [Some(value); SHIFT_COUNT]);
        self
    }

    /// 建構器模式：添加一列（長度不足 14 的部分視為空值）
    pub fn with_row(mut self, label: &str, values: &[Option<Decimal>]) -> Result<Self> {
        if values.len() > SHIFT_COUNT {
            return Err(PlanError::MissingData(format!(
                "產能列 {label} 有 {} 個班次，最多 {SHIFT_COUNT}",
                values.len()
            )));
        }

        let mut row: ShiftValues = [None; SHIFT_COUNT];
        row[..values.len()].copy_from_slice(values);
        self.insert_row(label, row);
        Ok(self)
    }

    /// 設置單一產線單一班次的產能
    pub fn set(&mut self, line: &str, shift: Shift, capacity: Option<Decimal>) {
        let row = self
            .lines
            .entry(line.to_string())
            .or_insert([None; SHIFT_COUNT]);
        row[shift.index()] = capacity;
    }

    /// 產線在該班次的名目產能
    pub fn line_capacity(&self, line: &str, shift: Shift) -> Option<Decimal> {
        self.lines.get(line).and_then(|row| row[shift.index()])
    }

    /// 製造棟在該班次的最大運轉產線數
    pub fn max_lines(&self, building: &str, shift: Shift) -> Option<usize> {
        use rust_decimal::prelude::ToPrimitive;

        self.max_lines
            .get(building)
            .and_then(|row| row[shift.index()])
            .and_then(|value| value.floor().to_usize())
    }

    /// 製造棟在該班次的最大生產量
    pub fn max_qty(&self, building: &str, shift: Shift) -> Option<Decimal> {
        self.max_qty
            .get(building)
            .and_then(|row| row[shift.index()])
    }

    /// 製造棟內的所有產線（字典序）
    pub fn lines_in_building<'a>(&'a self, building: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.lines
            .keys()
            .map(String::as_str)
            .filter(move |line| building_of(line) == building)
    }

    /// 所有產線
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.max_lines.is_empty() && self.max_qty.is_empty()
    }
}
