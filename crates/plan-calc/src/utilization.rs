//! 產線稼動率計算

use plan_core::{LineCapacityTable, ResultRow, Shift, UtilizationCeilings};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// 單一產線單一班次的稼動情況
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineUtilization {
    pub line: String,
    pub shift: Shift,
    /// 已分配數量
    pub allocated: Decimal,
    /// 名目產能
    pub capacity: Option<Decimal>,
    /// 稼動率（百分比），產能未知或為 0 時為 None
    pub utilization_percent: Option<Decimal>,
}

impl LineUtilization {
    /// 是否超過班次稼動率上限
    pub fn exceeds(&self, ceilings: &UtilizationCeilings) -> bool {
        self.utilization_percent
            .map(|percent| percent > ceilings.ceiling(self.shift))
            .unwrap_or(false)
    }
}

/// 稼動率計算器
pub struct UtilizationCalculator;

impl UtilizationCalculator {
    /// 計算所有有分配的產線/班次稼動率（依產線、班次排序）
    pub fn calculate(rows: &[ResultRow], capacity: &LineCapacityTable) -> Vec<LineUtilization> {
        Self::allocation_by_cell(rows)
            .into_iter()
            .map(|((line, shift), allocated)| {
                let line_capacity = capacity.line_capacity(&line, shift);
                let utilization_percent = line_capacity
                    .filter(|cap| *cap > Decimal::ZERO)
                    .map(|cap| allocated / cap * Decimal::ONE_HUNDRED);

                LineUtilization {
                    line,
                    shift,
                    allocated,
                    capacity: line_capacity,
                    utilization_percent,
                }
            })
            .collect()
    }

    /// 超過班次稼動率上限的產線/班次
    pub fn over_ceiling(
        rows: &[ResultRow],
        capacity: &LineCapacityTable,
        ceilings: &UtilizationCeilings,
    ) -> Vec<LineUtilization> {
        Self::calculate(rows, capacity)
            .into_iter()
            .filter(|u| u.exceeds(ceilings))
            .collect()
    }

    /// 各製造棟總分配量
    pub fn building_allocation(rows: &[ResultRow]) -> BTreeMap<String, Decimal> {
        let mut totals = BTreeMap::new();
        for row in rows {
            *totals
                .entry(row.building().to_string())
                .or_insert(Decimal::ZERO) += row.qty;
        }
        totals
    }

    fn allocation_by_cell(rows: &[ResultRow]) -> BTreeMap<(String, Shift), Decimal> {
        let mut cells = BTreeMap::new();
        for row in rows {
            *cells
                .entry((row.line.clone(), row.time))
                .or_insert(Decimal::ZERO) += row.qty;
        }
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shift(n: u8) -> Shift {
        Shift::new(n).unwrap()
    }

    fn row(line: &str, time: u8, qty: i64) -> ResultRow {
        ResultRow::new(
            line.to_string(),
            shift(time),
            "AAAPRJ1X0001".to_string(),
            Decimal::from(qty),
        )
    }

    fn table() -> LineCapacityTable {
        LineCapacityTable::new()
            .with_uniform_row("I_01", Decimal::from(100))
            .with_uniform_row("D_01", Decimal::ZERO)
    }

    #[test]
    fn test_line_utilization() {
        let rows = vec![row("I_01", 7, 40), row("I_01", 7, 30), row("I_01", 1, 50)];
        let result = UtilizationCalculator::calculate(&rows, &table());

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].shift, shift(1));
        assert_eq!(result[0].utilization_percent, Some(Decimal::from(50)));
        assert_eq!(result[1].allocated, Decimal::from(70));
        assert_eq!(result[1].utilization_percent, Some(Decimal::from(70)));
    }

    #[test]
    fn test_over_ceiling_uses_shift_limit() {
        // 班次 7 上限 60%，班次 1 上限 110%
        let rows = vec![row("I_01", 7, 70), row("I_01", 1, 100)];
        let over = UtilizationCalculator::over_ceiling(&rows, &table(), &UtilizationCeilings::default());

        assert_eq!(over.len(), 1);
        assert_eq!(over[0].shift, shift(7));
    }

    #[test]
    fn test_unknown_capacity_has_no_percent() {
        let rows = vec![row("D_01", 2, 10), row("K_01", 2, 10)];
        let result = UtilizationCalculator::calculate(&rows, &table());

        assert!(result.iter().all(|u| u.utilization_percent.is_none()));
        assert_eq!(result[1].capacity, None);
    }

    #[test]
    fn test_building_allocation() {
        let rows = vec![row("I_01", 1, 10), row("I_02", 3, 15), row("D_01", 1, 5)];
        let totals = UtilizationCalculator::building_allocation(&rows);

        assert_eq!(totals["I"], Decimal::from(25));
        assert_eq!(totals["D"], Decimal::from(5));
    }
}
