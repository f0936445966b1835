//! 產線有效產能
//!
//! 依序套用三層規則：
//! 1. 名目產能（產能表上的產線/班次值）
//! 2. `Max_line`：製造棟在該班次只允許產能最高的前 N 條產線運轉，
//!    其他產線有效產能為 0
//! 3. `Max_qty`：製造棟在該班次的總量上限，扣除同棟其他產線已分配量後
//!    與名目產能取小者

use plan_cache::AllocationSnapshot;
use plan_core::{building_of, LineCapacityTable, Shift};
use rust_decimal::Decimal;

/// 正在移動的計劃列（來源格與數量）
#[derive(Debug, Clone, PartialEq)]
pub struct MovingQuantity {
    pub line: String,
    pub shift: Shift,
    pub qty: Decimal,
}

/// 有效產能解析器
pub struct CapacityResolver<'a> {
    table: &'a LineCapacityTable,
}

impl<'a> CapacityResolver<'a> {
    pub fn new(table: &'a LineCapacityTable) -> Self {
        Self { table }
    }

    /// 產線在該班次的有效產能；三層皆無資訊時回傳 None
    pub fn get_line_capacity(
        &self,
        line: &str,
        shift: Shift,
        snapshot: &AllocationSnapshot,
        moving: Option<&MovingQuantity>,
    ) -> Option<Decimal> {
        let nominal = self.table.line_capacity(line, shift);
        let building = building_of(line);

        if nominal.is_some() && !self.is_active_line(line, building, shift) {
            tracing::debug!("產線 {} 不在製造棟 {} 班次 {} 的運轉名單內", line, building, shift);
            return Some(Decimal::ZERO);
        }

        let Some(max_qty) = self.table.max_qty(building, shift) else {
            return nominal;
        };

        let mut others = snapshot.building_allocation(building, shift, Some(line));
        if let Some(moving) = moving {
            // 來源列若在同棟同班次的其他產線，移動後不再佔用該棟總量
            if moving.shift == shift && moving.line != line && building_of(&moving.line) == building {
                others -= moving.qty;
            }
        }

        let remaining = (max_qty - others).max(Decimal::ZERO);
        Some(nominal.map_or(remaining, |capacity| capacity.min(remaining)))
    }

    /// `Max_line` 規則：產能由高到低（同產能依產線名稱）取前 N 條
    fn is_active_line(&self, line: &str, building: &str, shift: Shift) -> bool {
        let Some(max_lines) = self.table.max_lines(building, shift) else {
            return true;
        };

        let mut ranked: Vec<(&str, Decimal)> = self
            .table
            .lines_in_building(building)
            .filter_map(|l| self.table.line_capacity(l, shift).map(|c| (l, c)))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        ranked.iter().take(max_lines).any(|(l, _)| *l == line)
    }
}
