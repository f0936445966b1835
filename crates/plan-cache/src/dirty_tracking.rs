//! 髒標記追蹤（已變更的產線/班次格）

use plan_core::Shift;
use std::collections::HashSet;

/// 髒標記追蹤器
#[derive(Debug, Clone, Default)]
pub struct DirtyTracker {
    dirty_cells: HashSet<(String, Shift)>,
}

impl DirtyTracker {
    /// 創建新的追蹤器
    pub fn new() -> Self {
        Self::default()
    }

    /// 標記產線/班次格為髒
    pub fn mark_dirty(&mut self, line: &str, shift: Shift) {
        self.dirty_cells.insert((line.to_string(), shift));
    }

    /// 檢查產線/班次格是否為髒
    pub fn is_dirty(&self, line: &str, shift: Shift) -> bool {
        self.dirty_cells.contains(&(line.to_string(), shift))
    }

    /// 是否有任何髒標記
    pub fn has_dirty(&self) -> bool {
        !self.dirty_cells.is_empty()
    }

    /// 清除所有髒標記
    pub fn clear(&mut self) {
        self.dirty_cells.clear();
    }

    /// 取出並清除所有髒格
    pub fn take(&mut self) -> Vec<(String, Shift)> {
        self.dirty_cells.drain().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_and_take() {
        let mut tracker = DirtyTracker::new();
        let shift = Shift::new(3).unwrap();

        tracker.mark_dirty("I_01", shift);
        tracker.mark_dirty("I_01", shift);
        tracker.mark_dirty("D_01", Shift::FIRST);

        assert!(tracker.is_dirty("I_01", shift));
        assert!(!tracker.is_dirty("I_01", Shift::LAST));

        let mut cells = tracker.take();
        cells.sort();
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0], ("D_01".to_string(), Shift::FIRST));
        assert!(!tracker.has_dirty());
    }
}
