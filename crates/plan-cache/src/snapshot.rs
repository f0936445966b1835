//! 計劃結果分配快照
//!
//! 建立時掃描一次計劃結果列，之後的查詢皆為 O(1)。快照不會自動跟隨
//! 計劃結果變動，提交變更後必須呼叫 [`AllocationSnapshot::refresh`] 或
//! [`AllocationSnapshot::refresh_cells`]。

use plan_core::{building_of, ResultRow, Shift};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};

/// 分配快照
#[derive(Debug, Clone, Default)]
pub struct AllocationSnapshot {
    /// (產線, 班次) → 已分配數量
    line_shift_allocation: HashMap<(String, Shift), Decimal>,

    /// 產線 → 曾排入的品目
    line_items: HashMap<String, HashSet<String>>,

    /// 產線 → 曾排入的專案
    line_projects: HashMap<String, HashSet<String>>,

    /// 品目 → 計劃結果列上的交期班次
    item_due: HashMap<String, Shift>,
}

impl AllocationSnapshot {
    /// 由計劃結果列建立快照
    pub fn build(rows: &[ResultRow]) -> Self {
        let mut snapshot = Self::default();
        for row in rows {
            snapshot.add_allocation(row);
            snapshot.add_placement(row);
            snapshot.add_due(row);
        }
        snapshot
    }

    /// 完整重建
    pub fn refresh(&mut self, rows: &[ResultRow]) {
        *self = Self::build(rows);
    }

    /// 只重算指定產線/班次格，以及這些產線的品目集合
    pub fn refresh_cells(&mut self, rows: &[ResultRow], cells: &[(String, Shift)]) {
        if cells.is_empty() {
            return;
        }

        let dirty_cells: HashSet<(&str, Shift)> =
            cells.iter().map(|(line, shift)| (line.as_str(), *shift)).collect();
        let dirty_lines: HashSet<&str> = cells.iter().map(|(line, _)| line.as_str()).collect();

        for (line, shift) in cells {
            self.line_shift_allocation.remove(&(line.clone(), *shift));
        }
        for line in &dirty_lines {
            self.line_items.remove(*line);
            self.line_projects.remove(*line);
        }
        self.item_due.clear();

        for row in rows {
            if dirty_cells.contains(&(row.line.as_str(), row.time)) {
                self.add_allocation(row);
            }
            if dirty_lines.contains(row.line.as_str()) {
                self.add_placement(row);
            }
            self.add_due(row);
        }
    }

    fn add_allocation(&mut self, row: &ResultRow) {
        *self
            .line_shift_allocation
            .entry((row.line.clone(), row.time))
            .or_insert(Decimal::ZERO) += row.qty;
    }

    fn add_placement(&mut self, row: &ResultRow) {
        self.line_items
            .entry(row.line.clone())
            .or_default()
            .insert(row.item.clone());

        if let Some(project) = row.project() {
            self.line_projects
                .entry(row.line.clone())
                .or_default()
                .insert(project);
        }
    }

    fn add_due(&mut self, row: &ResultRow) {
        if let Some(due) = row.due_lt {
            self.item_due.insert(row.item.clone(), due);
        }
    }

    /// 產線/班次的已分配數量
    pub fn allocation(&self, line: &str, shift: Shift) -> Decimal {
        self.line_shift_allocation
            .get(&(line.to_string(), shift))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// 製造棟在該班次的已分配數量（可排除一條產線）
    pub fn building_allocation(&self, building: &str, shift: Shift, exclude_line: Option<&str>) -> Decimal {
        self.line_shift_allocation
            .iter()
            .filter(|((line, s), _)| {
                *s == shift && building_of(line) == building && Some(line.as_str()) != exclude_line
            })
            .map(|(_, qty)| *qty)
            .sum()
    }

    /// 產線上曾排入的品目
    pub fn items_on_line(&self, line: &str) -> Option<&HashSet<String>> {
        self.line_items.get(line)
    }

    /// 品目是否曾排入該產線
    pub fn has_item_on_line(&self, line: &str, item: &str) -> bool {
        self.line_items
            .get(line)
            .map(|items| items.contains(item))
            .unwrap_or(false)
    }

    /// 專案是否曾排入該產線
    pub fn has_project_on_line(&self, line: &str, project: &str) -> bool {
        self.line_projects
            .get(line)
            .map(|projects| projects.contains(project))
            .unwrap_or(false)
    }

    /// 品目是否出現在任何產線
    pub fn knows_item(&self, item: &str) -> bool {
        self.line_items.values().any(|items| items.contains(item))
    }

    /// 專案是否出現在任何產線
    pub fn knows_project(&self, project: &str) -> bool {
        self.line_projects
            .values()
            .any(|projects| projects.contains(project))
    }

    /// 計劃結果列上記載的品目交期
    pub fn row_due_shift(&self, item: &str) -> Option<Shift> {
        self.item_due.get(item).copied()
    }
}
