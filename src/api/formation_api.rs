// ==========================================
// Lecturna 教务系统 - 开班规划API
// ==========================================
// 职责: 串联 学期解析 -> 池子快照 -> 撮合引擎 -> 评审暂存 -> 整批提交
// 约定: 时间由调用方供给 (now),引擎保持无时钟
// ==========================================

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::domain::class::{ClassRecord, ClassSession};
use crate::domain::period::Period;
use crate::domain::types::ClassStatus;
use crate::engine::class_code::ClassCodeGenerator;
use crate::engine::class_formation::{ClassFormationPlanner, FormationInput};
use crate::engine::period_resolver::PeriodResolver;
use crate::engine::session_dates::SessionDateResolver;
use crate::repository::{
    AvailabilityRepository, ClassRepository, CommitSummary, CourseRepository,
    EnrollmentRepository, PeriodRepository, PreparedClassCommit,
};
use crate::staging::FormationStaging;

// ==========================================
// PendingCounts - 待办计数 (提交后复查用)
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct PendingCounts {
    pub open_slots: usize,
    pub pending_demands: usize,
}

// ==========================================
// FormationApi - 开班规划API
// ==========================================
pub struct FormationApi {
    period_repo: Arc<PeriodRepository>,
    course_repo: Arc<CourseRepository>,
    availability_repo: Arc<AvailabilityRepository>,
    enrollment_repo: Arc<EnrollmentRepository>,
    class_repo: Arc<ClassRepository>,
    config: Arc<ConfigManager>,
    planner: ClassFormationPlanner,
}

impl FormationApi {
    pub fn new(
        period_repo: Arc<PeriodRepository>,
        course_repo: Arc<CourseRepository>,
        availability_repo: Arc<AvailabilityRepository>,
        enrollment_repo: Arc<EnrollmentRepository>,
        class_repo: Arc<ClassRepository>,
        config: Arc<ConfigManager>,
    ) -> Self {
        Self {
            period_repo,
            course_repo,
            availability_repo,
            enrollment_repo,
            class_repo,
            config,
            planner: ClassFormationPlanner::new(),
        }
    }

    /// 解析规划目标学期
    ///
    /// - period_id 显式给出时直接取该学期
    /// - 否则取下一学期,无下一学期时回退当前学期
    fn resolve_target_period(
        &self,
        period_id: Option<&str>,
        now: NaiveDateTime,
    ) -> ApiResult<Period> {
        if let Some(id) = period_id {
            return self
                .period_repo
                .find_by_id(id)?
                .ok_or_else(|| ApiError::NotFound(format!("period id={}", id)));
        }

        let periods = self.period_repo.list_all()?;
        PeriodResolver::planning_target(&periods, now.date())
            .map(|(p, _)| p)
            .ok_or_else(|| ApiError::BusinessRuleViolation("没有可用学期".to_string()))
    }

    /// 生成开班提案快照 (无副作用)
    ///
    /// # 参数
    /// - period_id: 目标学期;None 时自动解析
    /// - class_size: 班容量覆写;None 时取配置 (默认 5)
    /// - now: 当前时间 (由调用方供给)
    pub fn preview(
        &self,
        period_id: Option<&str>,
        class_size: Option<usize>,
        now: NaiveDateTime,
    ) -> ApiResult<FormationStaging> {
        let period = self.resolve_target_period(period_id, now)?;

        let class_size = match class_size {
            Some(n) => n,
            None => self
                .config
                .get_class_size()
                .map_err(|e| ApiError::Internal(anyhow::anyhow!(e.to_string())))?,
        };

        let availabilities = self.availability_repo.list_open_by_period(&period.period_id)?;
        let demands = self.enrollment_repo.list_demands_by_period(&period.period_id)?;
        let existing_count_by_course = self.class_repo.counts_by_course(&period.period_id)?;

        // 课程代码映射: 人工录入代码的规范化前缀
        let course_code: HashMap<String, String> = self
            .course_repo
            .list_all()?
            .into_iter()
            .map(|c| {
                (
                    c.course_id,
                    ClassCodeGenerator::normalize_course_code(&c.code),
                )
            })
            .collect();

        let input = FormationInput {
            availabilities,
            demands,
            existing_count_by_course,
            course_code,
            class_size,
        };
        let outcome = self.planner.plan(&input);

        tracing::info!(
            period = %period.period_id,
            proposals = outcome.proposals.len(),
            "开班提案快照生成"
        );

        Ok(FormationStaging::from_outcome(
            &period.period_id,
            class_size,
            outcome,
            now,
        ))
    }

    /// 提交评审通过的提案 (整批单事务)
    ///
    /// 课次日期在此物化: 学期起始日 -> 首个匹配星期,此后每课次 +7 天;
    /// 事务内复核时段/需求仍未被并发消费,任一失败整批回滚
    pub fn commit(&self, staging: &FormationStaging, now: NaiveDateTime) -> ApiResult<CommitSummary> {
        let period = self
            .period_repo
            .find_by_id(&staging.period_id)?
            .ok_or_else(|| ApiError::NotFound(format!("period id={}", staging.period_id)))?;

        let commit_set = staging.commit_set();
        if commit_set.is_empty() {
            return Err(ApiError::BusinessRuleViolation(
                "没有可提交的提案 (每个班至少 1 名学员)".to_string(),
            ));
        }

        let mut prepared = Vec::with_capacity(commit_set.len());
        for proposal in commit_set {
            let course = self
                .course_repo
                .find_by_id(&proposal.course_id)?
                .ok_or_else(|| ApiError::NotFound(format!("course id={}", proposal.course_id)))?;

            let class_id = Uuid::new_v4().to_string();
            let dates = SessionDateResolver::derive_session_dates(
                period.start_date,
                proposal.day,
                course.session_count,
            );
            let sessions: Vec<ClassSession> = dates
                .iter()
                .enumerate()
                .map(|(i, date)| {
                    let (starts_at, ends_at) =
                        SessionDateResolver::session_bounds(*date, proposal.shift);
                    ClassSession {
                        session_id: Uuid::new_v4().to_string(),
                        class_id: class_id.clone(),
                        seq_no: (i + 1) as i32,
                        session_date: *date,
                        starts_at,
                        ends_at,
                    }
                })
                .collect();

            prepared.push(PreparedClassCommit {
                class: ClassRecord {
                    class_id,
                    name: proposal.name.clone(),
                    course_id: proposal.course_id.clone(),
                    period_id: staging.period_id.clone(),
                    instructor_id: proposal.instructor_id.clone(),
                    slot_id: proposal.slot_id.clone(),
                    day: proposal.day,
                    shift: proposal.shift,
                    status: ClassStatus::Planned,
                    created_at: now,
                },
                sessions,
                demand_ids: proposal.demand_ids.clone(),
                student_ids: proposal.student_ids.clone(),
            });
        }

        let summary = self.class_repo.commit_proposals(&prepared)?;
        Ok(summary)
    }

    /// 提交后复查: 仍待分班/仍未占用的计数 (重新查库)
    pub fn pending_counts(&self, period_id: &str) -> ApiResult<PendingCounts> {
        let open_slots = self.availability_repo.list_open_by_period(period_id)?.len();
        let pending_demands = self.enrollment_repo.list_demands_by_period(period_id)?.len();
        Ok(PendingCounts {
            open_slots,
            pending_demands,
        })
    }
}
