//! 品目代碼解析
//!
//! 品目代碼為固定寬度編碼，各欄位由固定字元位置切出：
//!
//! | 欄位 | 位置 |
//! |---|---|
//! | prefix | `[0, 3)` |
//! | project | `[3, 7)` |
//! | basic2 | `[3, 8)` |
//! | site_group (Tosite_group) | `[7, 8)` |
//! | rmc | `[3, len - 3)` |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{PlanError, Result};

/// 品目代碼最短長度
pub const MIN_ITEM_CODE_LEN: usize = 7;

/// 已解析的品目代碼
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemCode {
    raw: String,
}

impl ItemCode {
    /// 解析品目代碼
    ///
    /// 代碼必須為 ASCII 且至少 7 個字元，否則回傳 [`PlanError::InvalidItemCode`]。
    pub fn parse(code: &str) -> Result<Self> {
        let code = code.trim();

        if !code.is_ascii() {
            return Err(PlanError::InvalidItemCode {
                code: code.to_string(),
                reason: "包含非 ASCII 字元".to_string(),
            });
        }

        if code.len() < MIN_ITEM_CODE_LEN {
            return Err(PlanError::InvalidItemCode {
                code: code.to_string(),
                reason: format!("長度 {} 小於 {}", code.len(), MIN_ITEM_CODE_LEN),
            });
        }

        Ok(Self {
            raw: code.to_string(),
        })
    }

    /// 原始代碼
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn prefix(&self) -> &str {
        &self.raw[..3]
    }

    /// 專案代碼（第 3-7 字元）
    pub fn project(&self) -> &str {
        &self.raw[3..7]
    }

    /// Basic2 代碼（第 3-8 字元，7 字元代碼時與專案代碼相同）
    pub fn basic2(&self) -> &str {
        &self.raw[3..self.raw.len().min(8)]
    }

    /// 出貨地群組（第 7 字元），7 字元代碼沒有此欄位
    pub fn site_group(&self) -> Option<&str> {
        self.raw.get(7..8)
    }

    /// RMC 代碼（去除前 3 與後 3 字元）
    pub fn rmc(&self) -> &str {
        &self.raw[3..self.raw.len() - 3]
    }
}

impl FromStr for ItemCode {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ItemCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_parse_full_code() {
        let code = ItemCode::parse("AAAPRJ1XB0001").unwrap();

        assert_eq!(code.prefix(), "AAA");
        assert_eq!(code.project(), "PRJ1");
        assert_eq!(code.basic2(), "PRJ1X");
        assert_eq!(code.site_group(), Some("X"));
        assert_eq!(code.rmc(), "PRJ1XB0");
    }

    #[test]
    fn test_seven_char_code() {
        let code = ItemCode::parse("ITEM001").unwrap();

        assert_eq!(code.project(), "M001");
        assert_eq!(code.basic2(), "M001");
        assert_eq!(code.site_group(), None);
        assert_eq!(code.rmc(), "M");
    }

    #[rstest]
    #[case("")]
    #[case("ABC")]
    #[case("ABCDEF")]
    #[case("ABC項目ABCD")]
    fn test_reject_malformed(#[case] raw: &str) {
        assert!(matches!(
            ItemCode::parse(raw),
            Err(PlanError::InvalidItemCode { .. })
        ));
    }

    #[test]
    fn test_trims_whitespace() {
        let code: ItemCode = "  ITEM001 ".parse().unwrap();
        assert_eq!(code.as_str(), "ITEM001");
        assert_eq!(code.to_string(), "ITEM001");
    }
}
