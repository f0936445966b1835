//! 班次模型
//!
//! 一週 7 天，每天日/夜兩班，共 14 個班次（1-14）。

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{PlanError, Result};

/// 每週班次數
pub const SHIFT_COUNT: usize = 14;

/// 班次（1-14）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Shift(u8);

impl Shift {
    pub const FIRST: Shift = Shift(1);
    pub const LAST: Shift = Shift(SHIFT_COUNT as u8);

    /// 創建班次，超出 1-14 時回傳 [`PlanError::InvalidShift`]
    pub fn new(number: u8) -> Result<Self> {
        if (1..=SHIFT_COUNT as u8).contains(&number) {
            Ok(Self(number))
        } else {
            Err(PlanError::InvalidShift(i64::from(number)))
        }
    }

    /// 由任意整數創建班次
    pub fn from_i64(number: i64) -> Result<Self> {
        u8::try_from(number)
            .map_err(|_| PlanError::InvalidShift(number))
            .and_then(Self::new)
    }

    pub fn number(self) -> u8 {
        self.0
    }

    /// 陣列索引（0-13）
    pub fn index(self) -> usize {
        usize::from(self.0 - 1)
    }

    /// 第幾天（0-6）
    pub fn day(self) -> u32 {
        u32::from((self.0 - 1) / 2)
    }

    /// 是否為夜班
    pub fn is_night(self) -> bool {
        self.0 % 2 == 0
    }

    /// 所有班次
    pub fn all() -> impl Iterator<Item = Shift> {
        (1..=SHIFT_COUNT as u8).map(Shift)
    }
}

impl TryFrom<u8> for Shift {
    type Error = PlanError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Shift> for u8 {
    fn from(shift: Shift) -> Self {
        shift.0
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 各班次的稼動率上限（百分比）
///
/// 預設：班次 1-5、8-14 為 110%，班次 6 為 80%，班次 7 為 60%。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilizationCeilings {
    ceilings: [Decimal; SHIFT_COUNT],
}

impl UtilizationCeilings {
    /// 所有班次使用相同上限
    pub fn uniform(percent: Decimal) -> Self {
        Self {
            ceilings: [percent; SHIFT_COUNT],
        }
    }

    /// 建構器模式：設置單一班次上限
    pub fn with_ceiling(mut self, shift: Shift, percent: Decimal) -> Self {
        self.ceilings[shift.index()] = percent;
        self
    }

    /// 班次的稼動率上限（百分比）
    pub fn ceiling(&self, shift: Shift) -> Decimal {
        self.ceilings[shift.index()]
    }

    /// 檢查所有上限為正數
    pub fn validate(&self) -> Result<()> {
        match Shift::all().find(|s| self.ceiling(*s) <= Decimal::ZERO) {
            Some(shift) => Err(PlanError::Config(format!(
                "班次 {shift} 的稼動率上限必須為正數"
            ))),
            None => Ok(()),
        }
    }
}

impl Default for UtilizationCeilings {
    fn default() -> Self {
        Self::uniform(Decimal::from(110))
            .with_ceiling(Shift(6), Decimal::from(80))
            .with_ceiling(Shift(7), Decimal::from(60))
    }
}

/// 班次日曆：將 14 個班次對應到計劃起始日起的 7 天
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftCalendar {
    /// 計劃起始日（班次 1 所在日）
    pub start_date: NaiveDate,
}

impl ShiftCalendar {
    pub fn new(start_date: NaiveDate) -> Self {
        Self { start_date }
    }

    /// 班次所在日期
    pub fn date_of(&self, shift: Shift) -> NaiveDate {
        self.start_date + Duration::days(i64::from(shift.day()))
    }

    /// 交期日對應的最後可生產班次（當日夜班）
    ///
    /// 早於起始日回傳 None；超出計劃週的交期視為最後一個班次。
    pub fn due_shift(&self, due_date: NaiveDate) -> Option<Shift> {
        let days = (due_date - self.start_date).num_days();
        if days < 0 {
            return None;
        }

        let number = (days * 2 + 2).min(SHIFT_COUNT as i64);
        Shift::from_i64(number).ok()
    }
}
