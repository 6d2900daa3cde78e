// ==========================================
// Lecturna 教务系统 - 填报API
// ==========================================
// 职责: 课次纪要与结课测评的提交/修改,过截止闸门后写库
// 基准时间: 课次纪要取该课次 ends_at;结课测评取班级末次课 ends_at
// ==========================================

use std::sync::Arc;

use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::domain::assessment::{Assessment, SessionReport};
use crate::domain::types::{ReportKind, SubmitMode};
use crate::engine::deadline::DeadlineGate;
use crate::engine::scoring::ScoringEngine;
use crate::repository::{ClassRepository, ReportRepository};

// ==========================================
// ReportApi - 填报API
// ==========================================
pub struct ReportApi {
    class_repo: Arc<ClassRepository>,
    report_repo: Arc<ReportRepository>,
    config: Arc<ConfigManager>,
}

impl ReportApi {
    pub fn new(
        class_repo: Arc<ClassRepository>,
        report_repo: Arc<ReportRepository>,
        config: Arc<ConfigManager>,
    ) -> Self {
        Self {
            class_repo,
            report_repo,
            config,
        }
    }

    fn gate(&self) -> ApiResult<DeadlineGate> {
        let windows = self
            .config
            .get_deadline_windows()
            .map_err(|e| ApiError::Internal(anyhow::anyhow!(e.to_string())))?;
        Ok(DeadlineGate::new(windows))
    }

    // ==========================================
    // 课次纪要
    // ==========================================

    /// 提交课次纪要 (基准: 该课次 ends_at)
    pub fn submit_session_report(
        &self,
        session_id: &str,
        instructor_id: &str,
        summary: &str,
        now: NaiveDateTime,
    ) -> ApiResult<SessionReport> {
        let summary = summary.trim();
        if summary.is_empty() {
            return Err(ApiError::InvalidInput("纪要内容不能为空".to_string()));
        }
        let session = self
            .class_repo
            .find_session(session_id)?
            .ok_or_else(|| ApiError::NotFound(format!("session id={}", session_id)))?;

        let verdict = self.gate()?.check(
            ReportKind::SessionReport,
            SubmitMode::Add,
            session.ends_at,
            now,
        );
        if !verdict.allowed {
            return Err(ApiError::DeadlineExpired(verdict.reason));
        }

        let report = SessionReport {
            report_id: Uuid::new_v4().to_string(),
            session_id: session_id.to_string(),
            instructor_id: instructor_id.to_string(),
            summary: summary.to_string(),
            submitted_at: now,
            updated_at: now,
        };
        self.report_repo.insert_session_report(&report)?;
        Ok(report)
    }

    /// 修改课次纪要 (基准: 该课次 ends_at, 窗口 0..=192h)
    pub fn edit_session_report(
        &self,
        session_id: &str,
        summary: &str,
        now: NaiveDateTime,
    ) -> ApiResult<SessionReport> {
        let summary = summary.trim();
        if summary.is_empty() {
            return Err(ApiError::InvalidInput("纪要内容不能为空".to_string()));
        }
        let session = self
            .class_repo
            .find_session(session_id)?
            .ok_or_else(|| ApiError::NotFound(format!("session id={}", session_id)))?;
        let existing = self
            .report_repo
            .find_report_by_session(session_id)?
            .ok_or_else(|| ApiError::NotFound(format!("session_report session_id={}", session_id)))?;

        let verdict = self.gate()?.check(
            ReportKind::SessionReport,
            SubmitMode::Edit,
            session.ends_at,
            now,
        );
        if !verdict.allowed {
            return Err(ApiError::DeadlineExpired(verdict.reason));
        }

        self.report_repo
            .update_session_report(&existing.report_id, summary, now)?;
        Ok(SessionReport {
            summary: summary.to_string(),
            updated_at: now,
            ..existing
        })
    }

    // ==========================================
    // 结课测评
    // ==========================================

    /// 班级末次课结束时间 (无课次的班不可测评)
    fn last_session_end(&self, class_id: &str) -> ApiResult<NaiveDateTime> {
        self.class_repo
            .last_session_end(class_id)?
            .ok_or_else(|| {
                ApiError::BusinessRuleViolation(format!("班级没有任何课次: {}", class_id))
            })
    }

    fn build_assessment(
        &self,
        class_id: &str,
        student_id: &str,
        exercise: f64,
        project: f64,
        exam: f64,
        now: NaiveDateTime,
    ) -> ApiResult<Assessment> {
        ScoringEngine::validate_scores(exercise, project, exam)
            .map_err(ApiError::InvalidInput)?;
        let weights = self
            .config
            .get_score_weights()
            .map_err(|e| ApiError::Internal(anyhow::anyhow!(e.to_string())))?;
        ScoringEngine::validate_weights(&weights).map_err(ApiError::BusinessRuleViolation)?;

        Ok(Assessment {
            assessment_id: Uuid::new_v4().to_string(),
            class_id: class_id.to_string(),
            student_id: student_id.to_string(),
            exercise_score: exercise,
            project_score: project,
            exam_score: exam,
            weighted_total: ScoringEngine::weighted_total(exercise, project, exam, &weights),
            graded_at: now,
            updated_at: now,
        })
    }

    /// 提交结课测评 (基准: 班级末次课 ends_at, 窗口 <=336h)
    pub fn submit_assessment(
        &self,
        class_id: &str,
        student_id: &str,
        exercise: f64,
        project: f64,
        exam: f64,
        now: NaiveDateTime,
    ) -> ApiResult<Assessment> {
        let detail = self
            .class_repo
            .find_detail(class_id)?
            .ok_or_else(|| ApiError::NotFound(format!("class id={}", class_id)))?;
        if !detail.student_ids.iter().any(|s| s == student_id) {
            return Err(ApiError::BusinessRuleViolation(format!(
                "学员不在该班: class={} student={}",
                class_id, student_id
            )));
        }

        let base = self.last_session_end(class_id)?;
        let verdict = self
            .gate()?
            .check(ReportKind::Assessment, SubmitMode::Add, base, now);
        if !verdict.allowed {
            return Err(ApiError::DeadlineExpired(verdict.reason));
        }

        let assessment =
            self.build_assessment(class_id, student_id, exercise, project, exam, now)?;
        self.report_repo.insert_assessment(&assessment)?;
        Ok(assessment)
    }

    /// 修改结课测评 (基准: 班级末次课 ends_at, 窗口 <=504h, 无下界)
    pub fn edit_assessment(
        &self,
        class_id: &str,
        student_id: &str,
        exercise: f64,
        project: f64,
        exam: f64,
        now: NaiveDateTime,
    ) -> ApiResult<Assessment> {
        let existing = self
            .report_repo
            .find_assessment(class_id, student_id)?
            .ok_or_else(|| {
                ApiError::NotFound(format!(
                    "assessment class={} student={}",
                    class_id, student_id
                ))
            })?;

        let base = self.last_session_end(class_id)?;
        let verdict = self
            .gate()?
            .check(ReportKind::Assessment, SubmitMode::Edit, base, now);
        if !verdict.allowed {
            return Err(ApiError::DeadlineExpired(verdict.reason));
        }

        let mut updated =
            self.build_assessment(class_id, student_id, exercise, project, exam, now)?;
        updated.assessment_id = existing.assessment_id.clone();
        updated.graded_at = existing.graded_at;
        self.report_repo.update_assessment(&updated)?;
        Ok(updated)
    }

    /// 班级成绩单 (加权总分降序)
    pub fn class_scoreboard(&self, class_id: &str) -> ApiResult<Vec<Assessment>> {
        Ok(self.report_repo.list_assessments_by_class(class_id)?)
    }
}
