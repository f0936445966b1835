//! 生產計劃配置模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::shift::UtilizationCeilings;
use crate::{PlanError, Result};

/// 製造棟分配使用的專案分組鍵
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GroupingKey {
    /// 專案代碼（品目第 3-7 字元）
    #[default]
    Project,
    /// Basic2 代碼（品目第 3-8 字元）
    Basic2,
}

/// 分配策略的評分權重
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// 低於下限時的獎勵倍數（貪婪策略）
    pub under_weight: Decimal,

    /// 低於下限時的獎勵倍數（優先權策略）
    pub priority_under_weight: Decimal,

    /// 高於上限時的固定懲罰分數
    pub over_penalty: Decimal,

    /// 高於上限時的最小權重（比例分配、Monte Carlo）
    pub split_over_weight: Decimal,

    /// 區間內分數上限（貪婪策略）
    pub in_band_scale: Decimal,

    /// 區間內分數上限（優先權策略）
    pub priority_in_band_scale: Decimal,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            under_weight: Decimal::TEN,
            priority_under_weight: Decimal::from(15),
            over_penalty: Decimal::from(-10),
            split_over_weight: Decimal::new(1, 1),
            in_band_scale: Decimal::from(5),
            priority_in_band_scale: Decimal::TEN,
        }
    }
}

/// 生產計劃配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    /// 專案分組鍵
    pub grouping_key: GroupingKey,

    /// 評分權重
    pub scoring: ScoringWeights,

    /// 比例分配策略的調整輪數
    pub splitting_rounds: u32,

    /// 比例分配策略每輪最大調整幅度
    pub splitting_step: Decimal,

    /// Monte Carlo 嘗試次數
    pub monte_carlo_attempts: u32,

    /// 隨機種子（None 表示每次執行使用不同亂數）
    pub seed: Option<u64>,

    /// 全部策略失敗後是否再嘗試 Monte Carlo 比例分配
    pub monte_carlo_splitting: bool,

    /// 各班次稼動率上限
    pub utilization_ceilings: UtilizationCeilings,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            grouping_key: GroupingKey::Project,
            scoring: ScoringWeights::default(),
            splitting_rounds: 3,
            splitting_step: Decimal::new(1, 1),
            monte_carlo_attempts: 5,
            seed: None,
            monte_carlo_splitting: false,
            utilization_ceilings: UtilizationCeilings::default(),
        }
    }
}

impl PlanConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由 JSON 載入配置（缺少的欄位使用預設值）
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| PlanError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 輸出為 JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| PlanError::Config(e.to_string()))
    }

    /// 檢查配置
    pub fn validate(&self) -> Result<()> {
        if self.splitting_step <= Decimal::ZERO || self.splitting_step > Decimal::ONE {
            return Err(PlanError::Config(format!(
                "splitting_step 必須介於 0 與 1 之間，目前為 {}",
                self.splitting_step
            )));
        }

        if self.scoring.split_over_weight <= Decimal::ZERO {
            return Err(PlanError::Config(
                "split_over_weight 必須為正數".to_string(),
            ));
        }

        self.utilization_ceilings.validate()
    }

    /// 建構器模式：設置分組鍵
    pub fn with_grouping_key(mut self, key: GroupingKey) -> Self {
        self.grouping_key = key;
        self
    }

    /// 建構器模式：設置隨機種子
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// 建構器模式：設置 Monte Carlo 嘗試次數
    pub fn with_monte_carlo_attempts(mut self, attempts: u32) -> Self {
        self.monte_carlo_attempts = attempts;
        self
    }

    /// 建構器模式：啟用 Monte Carlo 比例分配
    pub fn with_monte_carlo_splitting(mut self, enabled: bool) -> Self {
        self.monte_carlo_splitting = enabled;
        self
    }

    /// 建構器模式：設置稼動率上限
    pub fn with_utilization_ceilings(mut self, ceilings: UtilizationCeilings) -> Self {
        self.utilization_ceilings = ceilings;
        self
    }
}
