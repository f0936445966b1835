//! 計劃調整驗證
//!
//! 使用者在計劃結果上新增、修改或移動一列之前，先以
//! [`PlanAdjustmentValidator`] 檢查：
//! 1. 產線-品目相容性
//! 2. 產線產能（含 `Max_line` / `Max_qty`）
//! 3. 交期
//! 4. 班次稼動率上限
//!
//! 依序檢查，第一個失敗即回報。驗證器持有建立時的分配快照，提交變更後
//! 需呼叫 [`PlanAdjustmentValidator::refresh`]，或以
//! [`PlanAdjustmentValidator::mark_committed`] 標記異動格後呼叫
//! [`PlanAdjustmentValidator::refresh_cells`]。

use plan_cache::{AllocationSnapshot, DirtyTracker};
use plan_core::{DueDateTable, ItemCode, LineCapacityTable, ProjectLines, ResultRow, Shift, UtilizationCeilings};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::capacity::{CapacityResolver, MovingQuantity};
use crate::constraint::{
    check_capacity, check_compatibility, check_due_date, check_utilization, AdjustmentRejection,
};

/// 驗證通過時的訊息
pub const ADJUSTMENT_OK: &str = "Adjustment is possible.";

/// 一次計劃調整請求
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustmentRequest {
    /// 目標產線
    pub line: String,

    /// 目標班次
    pub time: Shift,

    /// 品目代碼
    pub item: String,

    /// 調整後數量
    pub qty: Decimal,

    /// 移動來源（產線, 班次）；新增時為 None
    pub source: Option<(String, Shift)>,
}

impl AdjustmentRequest {
    pub fn new(line: &str, time: Shift, item: &str, qty: Decimal) -> Self {
        Self {
            line: line.to_string(),
            time,
            item: item.to_string(),
            qty,
            source: None,
        }
    }

    /// 建構器模式：設置移動來源
    pub fn moved_from(mut self, line: &str, time: Shift) -> Self {
        self.source = Some((line.to_string(), time));
        self
    }

    /// 由畫面輸入的字串解析
    ///
    /// 班次可為 `"3"` 或 `"3.0"`；來源產線與來源班次必須同時提供才視為移動。
    pub fn parse(
        line: &str,
        time: &str,
        item: &str,
        qty: &str,
        source_line: Option<&str>,
        source_time: Option<&str>,
    ) -> Result<Self, AdjustmentRejection> {
        let time = parse_shift("time", time)?;
        let qty = parse_decimal("quantity", qty)?;
        if qty.is_sign_negative() && !qty.is_zero() {
            return Err(AdjustmentRejection::Conversion {
                field: "quantity",
                value: qty.to_string(),
            });
        }

        let mut request = Self::new(line, time, item, qty);
        if let (Some(source_line), Some(source_time)) = (source_line, source_time) {
            request.source = Some((source_line.to_string(), parse_shift("source time", source_time)?));
        }

        Ok(request)
    }

    /// 是否為移動既有列
    pub fn is_move(&self) -> bool {
        self.source.is_some()
    }

    /// 來源格是否就是目標格
    fn moves_within_cell(&self) -> bool {
        self.source
            .as_ref()
            .map(|(line, time)| *line == self.line && *time == self.time)
            .unwrap_or(false)
    }
}

fn parse_decimal(field: &'static str, value: &str) -> Result<Decimal, AdjustmentRejection> {
    Decimal::from_str(value.trim()).map_err(|_| AdjustmentRejection::Conversion {
        field,
        value: value.to_string(),
    })
}

fn parse_shift(field: &'static str, value: &str) -> Result<Shift, AdjustmentRejection> {
    let conversion = || AdjustmentRejection::Conversion {
        field,
        value: value.to_string(),
    };

    let number = parse_decimal(field, value)?;
    if !number.fract().is_zero() {
        return Err(conversion());
    }

    number
        .to_i64()
        .ok_or_else(conversion)
        .and_then(|n| Shift::from_i64(n).map_err(|_| conversion()))
}

/// 計劃調整驗證器
#[derive(Debug, Clone)]
pub struct PlanAdjustmentValidator {
    rows: Vec<ResultRow>,
    snapshot: AllocationSnapshot,
    dirty: DirtyTracker,
    capacity: LineCapacityTable,
    due_dates: DueDateTable,
    compatibility: ProjectLines,
    ceilings: UtilizationCeilings,
}

impl PlanAdjustmentValidator {
    /// 以目前的計劃結果與產能表建立驗證器
    pub fn new(rows: &[ResultRow], capacity: LineCapacityTable) -> Self {
        Self {
            rows: rows.to_vec(),
            snapshot: AllocationSnapshot::build(rows),
            dirty: DirtyTracker::new(),
            capacity,
            due_dates: DueDateTable::new(),
            compatibility: ProjectLines::new(),
            ceilings: UtilizationCeilings::default(),
        }
    }

    /// 建構器模式：設置交期表
    pub fn with_due_dates(mut self, due_dates: DueDateTable) -> Self {
        self.due_dates = due_dates;
        self
    }

    /// 建構器模式：設置產線相容性主資料
    pub fn with_compatibility(mut self, compatibility: ProjectLines) -> Self {
        self.compatibility = compatibility;
        self
    }

    /// 建構器模式：設置班次稼動率上限
    pub fn with_ceilings(mut self, ceilings: UtilizationCeilings) -> Self {
        self.ceilings = ceilings;
        self
    }

    pub fn snapshot(&self) -> &AllocationSnapshot {
        &self.snapshot
    }

    /// 驗證畫面上的調整輸入，回傳 (是否可行, 訊息)
    pub fn validate_adjustment(
        &self,
        line: &str,
        time: &str,
        item: &str,
        new_qty: &str,
        source_line: Option<&str>,
        source_time: Option<&str>,
    ) -> (bool, String) {
        let outcome = AdjustmentRequest::parse(line, time, item, new_qty, source_line, source_time)
            .and_then(|request| self.check(&request));

        match outcome {
            Ok(()) => (true, ADJUSTMENT_OK.to_string()),
            Err(rejection) => {
                tracing::info!("調整被拒絕：{}", rejection);
                (false, rejection.to_string())
            }
        }
    }

    /// 依序執行四項檢查
    pub fn check(&self, request: &AdjustmentRequest) -> Result<(), AdjustmentRejection> {
        let code = ItemCode::parse(&request.item).map_err(|e| AdjustmentRejection::InvalidItem {
            item: request.item.clone(),
            reason: e.to_string(),
        })?;

        check_compatibility(&code, &request.line, &self.compatibility, &self.snapshot)?;

        let moving = self.moving_quantity(request, code.as_str());
        let resolver = CapacityResolver::new(&self.capacity);
        let capacity = resolver.get_line_capacity(&request.line, request.time, &self.snapshot, moving.as_ref());

        let allocated = self.snapshot.allocation(&request.line, request.time);
        let current = match &moving {
            Some(m) if request.moves_within_cell() => allocated - m.qty,
            _ => allocated,
        };
        check_capacity(&request.line, request.time, current, request.qty, capacity)?;

        let due = self
            .due_dates
            .due_shift(&code)
            .or_else(|| self.snapshot.row_due_shift(code.as_str()));
        check_due_date(code.as_str(), request.time, due)?;

        let base_capacity = self
            .capacity
            .line_capacity(&request.line, request.time)
            .filter(|c| *c > Decimal::ZERO)
            .or_else(|| resolver.get_line_capacity(&request.line, request.time, &self.snapshot, None));
        check_utilization(
            &request.line,
            request.time,
            allocated,
            request.qty,
            base_capacity,
            &self.ceilings,
        )?;

        tracing::debug!(
            "調整可行：{} → {} 班次 {} 數量 {}",
            request.item,
            request.line,
            request.time,
            request.qty
        );
        Ok(())
    }

    /// 查詢產線有效產能
    pub fn get_line_capacity(&self, line: &str, shift: Shift) -> Option<Decimal> {
        CapacityResolver::new(&self.capacity).get_line_capacity(line, shift, &self.snapshot, None)
    }

    /// 完整重建快照
    pub fn refresh(&mut self, rows: &[ResultRow]) {
        self.rows = rows.to_vec();
        self.snapshot.refresh(rows);
        self.dirty.clear();
        tracing::debug!("調整驗證快照已重建：{} 列", self.rows.len());
    }

    /// 標記已提交變更的產線/班次格
    pub fn mark_committed(&mut self, line: &str, shift: Shift) {
        self.dirty.mark_dirty(line, shift);
    }

    /// 只重算標記過的格子
    pub fn refresh_cells(&mut self, rows: &[ResultRow]) {
        let cells = self.dirty.take();
        self.rows = rows.to_vec();
        self.snapshot.refresh_cells(rows, &cells);
        tracing::debug!("調整驗證快照已局部更新：{} 格", cells.len());
    }

    /// 移動來源列（依 產線+班次+品目 線性搜尋）
    fn moving_quantity(&self, request: &AdjustmentRequest, item: &str) -> Option<MovingQuantity> {
        let (line, shift) = request.source.as_ref()?;
        self.rows
            .iter()
            .find(|row| row.is_at(line, *shift) && row.item == item)
            .map(|row| MovingQuantity {
                line: line.clone(),
                shift: *shift,
                qty: row.qty,
            })
    }
}
