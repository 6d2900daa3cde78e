// ==========================================
// Lecturna 教务系统 - 学期解析器
// ==========================================
// 职责: 从学期列表推导"当前学期"与"下一学期"
// 规则: 当前 = 包含 today 的学期;
//       下一 = start_date > today 的最早学期;
//       开班规划目标 = 下一学期,缺省回退到当前学期
// 红线: 无状态、无副作用、无 I/O 操作
// ==========================================

use chrono::NaiveDate;

use crate::domain::period::Period;
use crate::domain::types::PeriodRole;

/// 学期解析结果
#[derive(Debug, Clone)]
pub struct ResolvedPeriods {
    pub current: Option<Period>,
    pub next: Option<Period>,
}

// ==========================================
// PeriodResolver - 学期解析器
// ==========================================
pub struct PeriodResolver;

impl PeriodResolver {
    /// 解析当前/下一学期
    ///
    /// # 参数
    /// - periods: 全量学期 (顺序不限)
    /// - today: 基准日期
    pub fn resolve(periods: &[Period], today: NaiveDate) -> ResolvedPeriods {
        let current = periods.iter().find(|p| p.contains(today)).cloned();
        let next = periods
            .iter()
            .filter(|p| p.start_date > today)
            .min_by_key(|p| p.start_date)
            .cloned();
        ResolvedPeriods { current, next }
    }

    /// 开班规划的目标学期
    ///
    /// # 返回
    /// - Some((period, role)): 下一学期优先,否则当前学期
    /// - None: 无可用学期
    pub fn planning_target(periods: &[Period], today: NaiveDate) -> Option<(Period, PeriodRole)> {
        let resolved = Self::resolve(periods, today);
        if let Some(next) = resolved.next {
            return Some((next, PeriodRole::Next));
        }
        resolved.current.map(|p| (p, PeriodRole::Current))
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn period(id: &str, from: (i32, u32, u32), to: (i32, u32, u32)) -> Period {
        Period {
            period_id: id.to_string(),
            name: id.to_string(),
            start_date: NaiveDate::from_ymd_opt(from.0, from.1, from.2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(to.0, to.1, to.2).unwrap(),
            created_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn test_resolve_current_and_next() {
        let periods = vec![
            period("2026Q2", (2026, 4, 1), (2026, 6, 30)),
            period("2026Q3", (2026, 7, 1), (2026, 9, 30)),
            period("2026Q4", (2026, 10, 1), (2026, 12, 31)),
        ];
        let today = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        let resolved = PeriodResolver::resolve(&periods, today);
        assert_eq!(resolved.current.unwrap().period_id, "2026Q3");
        assert_eq!(resolved.next.unwrap().period_id, "2026Q4");
    }

    #[test]
    fn test_planning_target_prefers_next() {
        let periods = vec![
            period("2026Q3", (2026, 7, 1), (2026, 9, 30)),
            period("2026Q4", (2026, 10, 1), (2026, 12, 31)),
        ];
        let today = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        let (target, role) = PeriodResolver::planning_target(&periods, today).unwrap();
        assert_eq!(target.period_id, "2026Q4");
        assert_eq!(role, PeriodRole::Next);
    }

    #[test]
    fn test_planning_target_falls_back_to_current() {
        let periods = vec![period("2026Q3", (2026, 7, 1), (2026, 9, 30))];
        let today = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        let (target, role) = PeriodResolver::planning_target(&periods, today).unwrap();
        assert_eq!(target.period_id, "2026Q3");
        assert_eq!(role, PeriodRole::Current);
    }

    #[test]
    fn test_no_periods() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        assert!(PeriodResolver::planning_target(&[], today).is_none());
    }
}
