// ==========================================
// Lecturna 教务系统 - 填报截止闸门
// ==========================================
// 职责: 以末次课结束时间为基准判定填报/修改是否仍在窗口内
// 红线: 无状态、无副作用、无 I/O,所有拒绝必须输出 reason
// ==========================================
// 窗口 (相对末次课结束,上界含端点):
// - 课次纪要 首报 <= 24h   / 修改 0h..=192h
// - 结课测评 首报 <= 336h  / 修改 <= 504h
// 首报不设下界 (允许提前填报);测评修改同样不设下界,
// 该不对称沿用线上行为,修改时需同步调整两处测试
// ==========================================

use chrono::NaiveDateTime;

use crate::domain::types::{ReportKind, SubmitMode};

// ==========================================
// DeadlineWindows - 窗口配置 (小时)
// ==========================================
// 可经 ConfigManager 覆写
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlineWindows {
    pub session_report_add_hours: i64,
    pub session_report_edit_hours: i64,
    pub assessment_add_hours: i64,
    pub assessment_edit_hours: i64,
}

impl Default for DeadlineWindows {
    fn default() -> Self {
        Self {
            session_report_add_hours: 24,
            session_report_edit_hours: 192,
            assessment_add_hours: 336,
            assessment_edit_hours: 504,
        }
    }
}

// ==========================================
// DeadlineVerdict - 判定结果
// ==========================================
#[derive(Debug, Clone)]
pub struct DeadlineVerdict {
    pub allowed: bool,
    pub elapsed_secs: i64,   // now - last_session_end (可为负)
    pub limit_hours: i64,    // 生效的上界
    pub reason: String,      // 拒绝时的可读原因;放行时为空串
}

// ==========================================
// DeadlineGate - 截止闸门
// ==========================================
pub struct DeadlineGate {
    windows: DeadlineWindows,
}

impl DeadlineGate {
    pub fn new(windows: DeadlineWindows) -> Self {
        Self { windows }
    }

    /// 判定能否填报,并给出原因
    ///
    /// # 参数
    /// - kind: 课次纪要 / 结课测评
    /// - mode: 首报 / 修改
    /// - last_session_end: 末次课结束时间
    /// - now: 当前时间
    pub fn check(
        &self,
        kind: ReportKind,
        mode: SubmitMode,
        last_session_end: NaiveDateTime,
        now: NaiveDateTime,
    ) -> DeadlineVerdict {
        let limit_hours = self.limit_hours(kind, mode);
        let elapsed = now.signed_duration_since(last_session_end);
        let elapsed_secs = elapsed.num_seconds();

        // 上界按精确时长比较,含端点: 刚好 +24h 放行, +24h+1s 拒绝
        if elapsed_secs > limit_hours * 3600 {
            return DeadlineVerdict {
                allowed: false,
                elapsed_secs,
                limit_hours,
                reason: format!(
                    "已超过{}的{}窗口: 距末次课结束 {}h, 上限 {}h",
                    kind, mode, elapsed_secs / 3600, limit_hours
                ),
            };
        }

        // 仅课次纪要的修改要求末次课已结束
        if kind == ReportKind::SessionReport && mode == SubmitMode::Edit && elapsed_secs < 0 {
            return DeadlineVerdict {
                allowed: false,
                elapsed_secs,
                limit_hours,
                reason: "课次纪要修改须在末次课结束之后".to_string(),
            };
        }

        DeadlineVerdict {
            allowed: true,
            elapsed_secs,
            limit_hours,
            reason: String::new(),
        }
    }

    /// 判定能否填报 (布尔简式)
    pub fn can_submit(
        &self,
        kind: ReportKind,
        mode: SubmitMode,
        last_session_end: NaiveDateTime,
        now: NaiveDateTime,
    ) -> bool {
        self.check(kind, mode, last_session_end, now).allowed
    }

    fn limit_hours(&self, kind: ReportKind, mode: SubmitMode) -> i64 {
        match (kind, mode) {
            (ReportKind::SessionReport, SubmitMode::Add) => self.windows.session_report_add_hours,
            (ReportKind::SessionReport, SubmitMode::Edit) => self.windows.session_report_edit_hours,
            (ReportKind::Assessment, SubmitMode::Add) => self.windows.assessment_add_hours,
            (ReportKind::Assessment, SubmitMode::Edit) => self.windows.assessment_edit_hours,
        }
    }
}

impl Default for DeadlineGate {
    fn default() -> Self {
        Self::new(DeadlineWindows::default())
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn session_end() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 3)
            .unwrap()
            .and_hms_opt(21, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_session_report_add_upper_bound_inclusive() {
        let gate = DeadlineGate::default();
        let end = session_end();
        assert!(gate.can_submit(
            ReportKind::SessionReport,
            SubmitMode::Add,
            end,
            end + Duration::hours(24)
        ));
        assert!(!gate.can_submit(
            ReportKind::SessionReport,
            SubmitMode::Add,
            end,
            end + Duration::hours(24) + Duration::seconds(1)
        ));
    }

    #[test]
    fn test_add_allows_early_submission() {
        let gate = DeadlineGate::default();
        let end = session_end();
        // 首报不设下界: 课前提交放行
        assert!(gate.can_submit(
            ReportKind::SessionReport,
            SubmitMode::Add,
            end,
            end - Duration::hours(2)
        ));
        assert!(gate.can_submit(
            ReportKind::Assessment,
            SubmitMode::Add,
            end,
            end - Duration::days(3)
        ));
    }

    #[test]
    fn test_session_report_edit_lower_bound() {
        let gate = DeadlineGate::default();
        let end = session_end();
        assert!(!gate.can_submit(
            ReportKind::SessionReport,
            SubmitMode::Edit,
            end,
            end - Duration::seconds(1)
        ));
        assert!(gate.can_submit(ReportKind::SessionReport, SubmitMode::Edit, end, end));
        assert!(gate.can_submit(
            ReportKind::SessionReport,
            SubmitMode::Edit,
            end,
            end + Duration::hours(192)
        ));
        assert!(!gate.can_submit(
            ReportKind::SessionReport,
            SubmitMode::Edit,
            end,
            end + Duration::hours(192) + Duration::seconds(1)
        ));
    }

    #[test]
    fn test_assessment_windows() {
        let gate = DeadlineGate::default();
        let end = session_end();
        assert!(gate.can_submit(
            ReportKind::Assessment,
            SubmitMode::Add,
            end,
            end + Duration::hours(336)
        ));
        assert!(!gate.can_submit(
            ReportKind::Assessment,
            SubmitMode::Add,
            end,
            end + Duration::hours(337)
        ));
        assert!(gate.can_submit(
            ReportKind::Assessment,
            SubmitMode::Edit,
            end,
            end + Duration::hours(504)
        ));
        assert!(!gate.can_submit(
            ReportKind::Assessment,
            SubmitMode::Edit,
            end,
            end + Duration::hours(505)
        ));
    }

    #[test]
    fn test_assessment_edit_has_no_lower_bound() {
        // 沿用线上行为: 测评修改允许早于末次课结束
        let gate = DeadlineGate::default();
        let end = session_end();
        assert!(gate.can_submit(
            ReportKind::Assessment,
            SubmitMode::Edit,
            end,
            end - Duration::hours(5)
        ));
    }

    #[test]
    fn test_denial_carries_reason() {
        let gate = DeadlineGate::default();
        let end = session_end();
        let verdict = gate.check(
            ReportKind::SessionReport,
            SubmitMode::Add,
            end,
            end + Duration::hours(30),
        );
        assert!(!verdict.allowed);
        assert!(!verdict.reason.is_empty());
        assert_eq!(verdict.limit_hours, 24);
    }
}
