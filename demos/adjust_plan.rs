//! 範例：載入計劃資料、驗證製造棟比例，並模擬幾次計劃調整
//!
//! 執行：`cargo run --example adjust_plan`

use anyhow::{Context, Result};
use chrono::NaiveDate;
use prodplan::plan_core::*;
use prodplan::PlanningContext;
use rust_decimal::Decimal;

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    let availability = LineAvailability::new(vec![
        "I_01".to_string(),
        "I_02".to_string(),
        "D_01".to_string(),
    ])
    .with_row("PRJ1", &[1, 1, 0])
    .with_row("PRJ2", &[0, 0, 1])
    .with_row("PRJ3", &[1, 0, 1]);

    let demand = vec![
        DemandItem::parse("AAAPRJ1X0001", Decimal::from(40))?,
        DemandItem::parse("AAAPRJ2X0001", Decimal::from(20))?,
        DemandItem::parse("AAAPRJ3X0001", Decimal::from(40))?,
    ];

    let constraints = BuildingConstraints::new()
        .with(BuildingConstraint::from_percent("I".to_string(), 45, 55)?)
        .with(BuildingConstraint::from_percent("D".to_string(), 45, 55)?);

    let capacity = LineCapacityTable::new()
        .with_uniform_row("I_01", Decimal::from(100))
        .with_uniform_row("I_02", Decimal::from(80))
        .with_uniform_row("D_01", Decimal::from(120))
        .with_uniform_row("Max_qty_I", Decimal::from(150));

    let calendar = ShiftCalendar::new(NaiveDate::from_ymd_opt(2025, 11, 17).context("計劃起始日")?);
    let mut due_dates = DueDateTable::new().with_project("PRJ2", Shift::new(10)?);
    due_dates.set_item_date(
        "AAAPRJ1X0001",
        NaiveDate::from_ymd_opt(2025, 11, 20).context("交期")?,
        &calendar,
    )?;

    let rows = vec![
        ResultRow::new("I_01".to_string(), Shift::new(3)?, "AAAPRJ1X0001".to_string(), Decimal::from(60)),
        ResultRow::new("I_02".to_string(), Shift::new(3)?, "AAAPRJ1X0001".to_string(), Decimal::from(50)),
        ResultRow::new("D_01".to_string(), Shift::new(4)?, "AAAPRJ2X0001".to_string(), Decimal::from(20)),
    ];

    let config = PlanConfig::from_json(r#"{ "seed": 7, "monte_carlo_attempts": 10 }"#)?;
    let ctx = PlanningContext::new(config)
        .with_demand(demand)
        .with_line_availability(&availability)
        .with_constraints(constraints)
        .with_capacity(capacity)
        .with_due_dates(due_dates)
        .with_result_rows(rows);

    let report = ctx.validate_distribution_ratios();
    println!("目前分配有效: {}", report.current_valid);
    for (building, ratio) in &report.building_ratios {
        println!("  {building}: {}", ratio.round_dp(3));
    }
    if let (Some(kind), Some(alternative)) = (report.resolved_by, &report.alternative_distribution) {
        println!("替代分配（{kind}）:");
        for (building, qty) in alternative.iter() {
            println!("  {building}: {}", qty.round_dp(2));
        }
    }

    let validator = ctx.adjustment_validator();
    let proposals = [
        ("I_01", "3", "AAAPRJ1X0001", "30", None, None),
        ("I_01", "3", "AAAPRJ1X0001", "90", Some("I_01"), Some("3")),
        ("D_01", "3", "AAAPRJ1X0001", "10", None, None),
        ("I_01", "9", "AAAPRJ1X0001", "10", None, None),
        ("I_01", "7", "AAAPRJ1X0001", "65", None, None),
        ("I_01", "x", "AAAPRJ1X0001", "10", None, None),
    ];

    for (line, time, item, qty, source_line, source_time) in proposals {
        let (ok, message) = validator.validate_adjustment(line, time, item, qty, source_line, source_time);
        println!("{item} → {line} 班次 {time} 數量 {qty}: {} {message}", if ok { "✓" } else { "✗" });
    }

    Ok(())
}
