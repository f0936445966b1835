//! 計劃調整約束檢查
//!
//! 四類檢查彼此獨立，皆為純函數：相容性、產能、交期、稼動率。

use plan_cache::AllocationSnapshot;
use plan_core::{ItemCode, ProjectLines, Shift, UtilizationCeilings};
use rust_decimal::Decimal;

/// 調整被拒絕的原因（Display 即為顯示給使用者的訊息）
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AdjustmentRejection {
    #[error("Cannot convert {field} '{value}' to a valid number")]
    Conversion { field: &'static str, value: String },

    #[error("Item code '{item}' is malformed: {reason}")]
    InvalidItem { item: String, reason: String },

    #[error("Item '{item}'(project {project}) cannot be produced on line '{line}'")]
    Incompatible {
        item: String,
        project: String,
        line: String,
    },

    #[error(
        "Line '{line}' shift {shift} capacity exceeded: current allocation {current} + \
         requested {requested} exceeds the {capacity}-unit limit (excess {excess})"
    )]
    CapacityExceeded {
        line: String,
        shift: Shift,
        current: Decimal,
        requested: Decimal,
        capacity: Decimal,
        excess: Decimal,
    },

    #[error("Item '{item}' is due by shift {due} and cannot be produced at shift {shift}")]
    DueDateExceeded { item: String, shift: Shift, due: Shift },

    #[error(
        "Line '{line}' utilization {utilization}% at shift {shift} exceeds the \
         {ceiling}% ceiling for shift {shift}"
    )]
    UtilizationExceeded {
        line: String,
        shift: Shift,
        utilization: Decimal,
        ceiling: Decimal,
    },
}

/// 產線-品目相容性
///
/// 主資料有該專案時以主資料為準；否則依計劃結果推斷：品目或同專案品目
/// 曾排入該產線即相容。兩者都沒有資訊時放行。
pub fn check_compatibility(
    item: &ItemCode,
    line: &str,
    compatibility: &ProjectLines,
    snapshot: &AllocationSnapshot,
) -> Result<(), AdjustmentRejection> {
    let project = item.project();
    let incompatible = || AdjustmentRejection::Incompatible {
        item: item.to_string(),
        project: project.to_string(),
        line: line.to_string(),
    };

    if let Some(lines) = compatibility.compatible_lines(project) {
        return if lines.iter().any(|l| l == line) {
            Ok(())
        } else {
            Err(incompatible())
        };
    }

    if snapshot.has_item_on_line(line, item.as_str()) || snapshot.has_project_on_line(line, project) {
        return Ok(());
    }

    if snapshot.knows_item(item.as_str()) || snapshot.knows_project(project) {
        return Err(incompatible());
    }

    tracing::warn!("品目 {} 沒有任何相容性資訊，允許排入 {}", item, line);
    Ok(())
}

/// 數量大到無法計算時視為無效輸入
fn out_of_range(requested: Decimal) -> AdjustmentRejection {
    AdjustmentRejection::Conversion {
        field: "quantity",
        value: requested.to_string(),
    }
}

/// 產能檢查：目前分配 + 調整量不得超過產能；產能未知時放行
pub fn check_capacity(
    line: &str,
    shift: Shift,
    current: Decimal,
    requested: Decimal,
    capacity: Option<Decimal>,
) -> Result<(), AdjustmentRejection> {
    let Some(capacity) = capacity else {
        tracing::debug!("產線 {} 班次 {} 產能未知，略過產能檢查", line, shift);
        return Ok(());
    };

    let total = current
        .checked_add(requested)
        .ok_or_else(|| out_of_range(requested))?;
    if total > capacity {
        return Err(AdjustmentRejection::CapacityExceeded {
            line: line.to_string(),
            shift,
            current,
            requested,
            capacity,
            excess: total.checked_sub(capacity).unwrap_or(Decimal::MAX),
        });
    }

    Ok(())
}

/// 交期檢查：班次晚於交期班次時拒絕
pub fn check_due_date(item: &str, shift: Shift, due: Option<Shift>) -> Result<(), AdjustmentRejection> {
    match due {
        Some(due) if shift > due => Err(AdjustmentRejection::DueDateExceeded {
            item: item.to_string(),
            shift,
            due,
        }),
        _ => Ok(()),
    }
}

/// 稼動率檢查：(目前分配 + 調整量) / 基準產能 不得超過班次上限
///
/// 基準產能未知或不為正數時放行。
pub fn check_utilization(
    line: &str,
    shift: Shift,
    current: Decimal,
    requested: Decimal,
    base_capacity: Option<Decimal>,
    ceilings: &UtilizationCeilings,
) -> Result<(), AdjustmentRejection> {
    let Some(base) = base_capacity.filter(|c| *c > Decimal::ZERO) else {
        tracing::warn!("產線 {} 班次 {} 沒有可用的基準產能，略過稼動率檢查", line, shift);
        return Ok(());
    };

    let utilization = current
        .checked_add(requested)
        .and_then(|total| total.checked_div(base))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(|| out_of_range(requested))?;
    let ceiling = ceilings.ceiling(shift);

    if utilization > ceiling {
        return Err(AdjustmentRejection::UtilizationExceeded {
            line: line.to_string(),
            shift,
            utilization: utilization.round_dp(2).normalize(),
            ceiling,
        });
    }

    Ok(())
}
