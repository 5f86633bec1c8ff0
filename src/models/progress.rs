use serde::{Deserialize, Serialize};

/// 批量任务进度
///
/// 由调用方持有，在批处理的进度回调中更新，不做持久化。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchProgress {
    pub total: usize,
    pub completed: usize,
    /// `floor(completed / total * 100)`
    pub percentage: u8,
}

impl BatchProgress {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            completed: 0,
            percentage: 0,
        }
    }

    /// 向下取整的百分比，`total == 0` 时为 0
    pub fn percentage_of(completed: usize, total: usize) -> u8 {
        if total == 0 {
            return 0;
        }
        let completed = completed.min(total) as u128;
        (completed * 100 / total as u128) as u8
    }

    pub fn update(&mut self, completed: usize, total: usize) {
        self.total = total;
        self.completed = completed.min(total);
        self.percentage = Self::percentage_of(self.completed, total);
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_floors() {
        assert_eq!(BatchProgress::percentage_of(1, 3), 33);
        assert_eq!(BatchProgress::percentage_of(2, 3), 66);
        assert_eq!(BatchProgress::percentage_of(3, 3), 100);
        assert_eq!(BatchProgress::percentage_of(0, 7), 0);
        assert_eq!(BatchProgress::percentage_of(199, 200), 99);
    }

    #[test]
    fn test_percentage_of_empty_total() {
        assert_eq!(BatchProgress::percentage_of(0, 0), 0);
    }

    #[test]
    fn test_update() {
        let mut progress = BatchProgress::new(4);

        progress.update(1, 4);
        assert_eq!(
            progress,
            BatchProgress {
                total: 4,
                completed: 1,
                percentage: 25
            }
        );

        progress.update(4, 4);
        assert_eq!(progress.percentage, 100);

        // 超出总数时按总数计
        progress.update(5, 4);
        assert_eq!(progress.completed, 4);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(BatchProgress::new(2)).unwrap();
        assert_eq!(json, serde_json::json!({"total": 2, "completed": 0, "percentage": 0}));
    }
}
