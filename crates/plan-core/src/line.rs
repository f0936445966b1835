//! 產線與專案可用性模型

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 由產線代碼取得製造棟（`I_01` → `I`）
///
/// 沒有 `_` 分隔時取第一個字元。
pub fn building_of(line: &str) -> &str {
    match line.split_once('_') {
        Some((building, _)) => building,
        None => line.get(..1).unwrap_or(line),
    }
}

/// 產線可用性矩陣（列 = 專案，欄 = 產線，值 = 是否可生產）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineAvailability {
    /// 欄位順序（產線代碼）
    lines: Vec<String>,

    /// 專案 → 各產線可用旗標（與 `lines` 對齊）
    rows: BTreeMap<String, Vec<bool>>,
}

impl LineAvailability {
    /// 以產線欄位創建空矩陣
    pub fn new(lines: Vec<String>) -> Self {
        Self {
            lines,
            rows: BTreeMap::new(),
        }
    }

    /// 添加專案列，長度不足的部分視為不可用
    pub fn insert_row(&mut self, project: String, mut flags: Vec<bool>) {
        flags.resize(self.lines.len(), false);
        self.rows.insert(project, flags);
    }

    /// 建構器模式：添加專案列
    pub fn with_row(mut self, project: &str, flags: &[u8]) -> Self {
        self.insert_row(project.to_string(), flags.iter().map(|f| *f != 0).collect());
        self
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 專案可生產的產線（依欄位順序）
    pub fn eligible_lines(&self, project: &str) -> Option<Vec<&str>> {
        self.rows.get(project).map(|flags| {
            self.lines
                .iter()
                .zip(flags)
                .filter(|(_, available)| **available)
                .map(|(line, _)| line.as_str())
                .collect()
        })
    }

    fn projects(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }
}

/// 專案 → 可分配製造棟
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectBuildings {
    buildings: BTreeMap<String, Vec<String>>,
}

impl ProjectBuildings {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由產線可用性矩陣取出各專案的製造棟（依首次出現順序，去重）
    pub fn from_availability(availability: &LineAvailability) -> Self {
        let mut result = Self::new();

        for project in availability.projects() {
            let mut buildings: Vec<String> = Vec::new();
            for line in availability.eligible_lines(project).unwrap_or_default() {
                let building = building_of(line);
                if !buildings.iter().any(|b| b == building) {
                    buildings.push(building.to_string());
                }
            }
            result.buildings.insert(project.to_string(), buildings);
        }

        result
    }

    /// 設置專案的可分配製造棟（重複的製造棟只保留首次出現者）
    pub fn insert(&mut self, project: String, buildings: Vec<String>) {
        let mut unique: Vec<String> = Vec::with_capacity(buildings.len());
        for building in buildings {
            if !unique.contains(&building) {
                unique.push(building);
            }
        }
        self.buildings.insert(project, unique);
    }

    /// 建構器模式：設置專案的可分配製造棟
    pub fn with(mut self, project: &str, buildings: &[&str]) -> Self {
        self.insert(
            project.to_string(),
            buildings.iter().map(|b| b.to_string()).collect(),
        );
        self
    }

    /// 專案的可分配製造棟；未知專案回傳空切片
    pub fn eligible(&self, project: &str) -> &[String] {
        self.buildings
            .get(project)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.buildings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty()
    }
}

/// 專案 → 相容產線（產線-品目相容性主資料）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectLines {
    lines: BTreeMap<String, Vec<String>>,
}

impl ProjectLines {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_availability(availability: &LineAvailability) -> Self {
        let lines = availability
            .projects()
            .map(|project| {
                let eligible = availability
                    .eligible_lines(project)
                    .unwrap_or_default()
                    .into_iter()
                    .map(str::to_string)
                    .collect();
                (project.to_string(), eligible)
            })
            .collect();

        Self { lines }
    }

    /// 專案的相容產線；主資料沒有此專案時回傳 None
    pub fn compatible_lines(&self, project: &str) -> Option<&[String]> {
        self.lines.get(project).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample_availability() -> LineAvailability {
        LineAvailability::new(vec![
            "I_01".to_string(),
            "I_02".to_string(),
            "D_01".to_string(),
            "K_01".to_string(),
        ])
        .with_row("PRJ1", &[1, 1, 0, 0])
        .with_row("PRJ2", &[0, 1, 1, 0])
        .with_row("PRJ3", &[0, 0, 0, 0])
    }

    #[rstest]
    #[case("I_01", "I")]
    #[case("DD_12", "DD")]
    #[case("K01", "K")]
    #[case("", "")]
    fn test_building_of(#[case] line: &str, #[case] building: &str) {
        assert_eq!(building_of(line), building);
    }

    #[test]
    fn test_project_buildings_from_availability() {
        let buildings = ProjectBuildings::from_availability(&sample_availability());

        assert_eq!(buildings.eligible("PRJ1"), ["I".to_string()]);
        assert_eq!(
            buildings.eligible("PRJ2"),
            ["I".to_string(), "D".to_string()]
        );
        assert!(buildings.eligible("PRJ3").is_empty());
        assert!(buildings.eligible("UNKNOWN").is_empty());
    }

    #[test]
    fn test_insert_drops_duplicate_buildings() {
        let buildings = ProjectBuildings::new().with("PRJ1", &["K", "D", "K"]);

        assert_eq!(buildings.eligible("PRJ1"), ["K".to_string(), "D".to_string()]);
    }

    #[test]
    fn test_project_lines_from_availability() {
        let lines = ProjectLines::from_availability(&sample_availability());

        assert_eq!(
            lines.compatible_lines("PRJ2"),
            Some(["I_02".to_string(), "D_01".to_string()].as_slice())
        );
        assert_eq!(lines.compatible_lines("NONE"), None);
    }

    #[test]
    fn test_short_row_is_padded() {
        let mut availability = LineAvailability::new(vec!["I_01".to_string(), "D_01".to_string()]);
        availability.insert_row("PRJ9".to_string(), vec![true]);

        assert_eq!(availability.eligible_lines("PRJ9"), Some(vec!["I_01"]));
    }
}
