// ==========================================
// Lecturna 教务系统 - 课次日期推导
// ==========================================
// 职责: 由学期起始日 + 时段星期推导各课次的具体日期
// 规则: 起始日向前走到首个匹配星期 (起始日本身匹配则计入),
//       其后每课次 +7 天
// 红线: 无状态、无副作用、无 I/O 操作
// ==========================================

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

use crate::domain::types::{Shift, Weekday};

// ==========================================
// SessionDateResolver - 纯函数工具类
// ==========================================
pub struct SessionDateResolver;

impl SessionDateResolver {
    /// 推导课次日期序列
    ///
    /// # 参数
    /// - period_start: 学期起始日
    /// - day: 班级上课星期
    /// - session_count: 课次数 (<=0 时返回空)
    pub fn derive_session_dates(
        period_start: NaiveDate,
        day: Weekday,
        session_count: i32,
    ) -> Vec<NaiveDate> {
        if session_count <= 0 {
            return Vec::new();
        }

        let target = day.to_id() as i64;
        let start = period_start.weekday().number_from_monday() as i64;
        // 前进 0..=6 天到首个匹配星期
        let offset = (target - start).rem_euclid(7);
        let first = period_start + Duration::days(offset);

        (0..session_count)
            .map(|i| first + Duration::days(7 * i as i64))
            .collect()
    }

    /// 由上课日期与时段得到课次起止时间
    pub fn session_bounds(date: NaiveDate, shift: Shift) -> (NaiveDateTime, NaiveDateTime) {
        let (sh, sm) = shift.start_hm();
        let (eh, em) = shift.end_hm();
        // Shift 的墙钟时间为合法常量,and_hms_opt 不会失败
        let starts_at = date.and_hms_opt(sh, sm, 0).unwrap_or_default();
        let ends_at = date.and_hms_opt(eh, em, 0).unwrap_or_default();
        (starts_at, ends_at)
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_on_target_weekday_counts() {
        // 2026-08-03 是周一
        let start = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();
        let dates = SessionDateResolver::derive_session_dates(start, Weekday::Monday, 3);
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2026, 8, 3).unwrap(),
                NaiveDate::from_ymd_opt(2026, 8, 10).unwrap(),
                NaiveDate::from_ymd_opt(2026, 8, 17).unwrap(),
            ]
        );
    }

    #[test]
    fn test_walk_forward_to_first_match() {
        // 2026-08-03 周一起,找周三
        let start = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();
        let dates = SessionDateResolver::derive_session_dates(start, Weekday::Wednesday, 2);
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2026, 8, 5).unwrap(),
                NaiveDate::from_ymd_opt(2026, 8, 12).unwrap(),
            ]
        );
    }

    #[test]
    fn test_wraps_into_next_week() {
        // 2026-08-05 周三起,找周一 -> 下周一 08-10
        let start = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        let dates = SessionDateResolver::derive_session_dates(start, Weekday::Monday, 1);
        assert_eq!(dates, vec![NaiveDate::from_ymd_opt(2026, 8, 10).unwrap()]);
    }

    #[test]
    fn test_zero_sessions() {
        let start = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();
        assert!(SessionDateResolver::derive_session_dates(start, Weekday::Friday, 0).is_empty());
    }

    #[test]
    fn test_session_bounds_follow_shift() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 10).unwrap();
        let (starts_at, ends_at) = SessionDateResolver::session_bounds(date, Shift::S2);
        assert_eq!(starts_at, date.and_hms_opt(10, 30, 0).unwrap());
        assert_eq!(ends_at, date.and_hms_opt(12, 30, 0).unwrap());
    }
}
