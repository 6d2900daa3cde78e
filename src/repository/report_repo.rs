// ==========================================
// Lecturna 教务系统 - 填报仓储
// ==========================================
// session_report 课次纪要 + assessment 结课测评
// 截止闸门由 api 层先行判定,仓储只负责读写
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::assessment::{Assessment, SessionReport};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// ReportRepository - 填报仓储
// ==========================================
pub struct ReportRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ReportRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let repo = Self { conn };
        repo.ensure_table()?;
        Ok(repo)
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn ensure_table(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS session_report (
              report_id TEXT PRIMARY KEY,
              session_id TEXT NOT NULL UNIQUE REFERENCES class_session(session_id),
              instructor_id TEXT NOT NULL REFERENCES instructor(instructor_id),
              summary TEXT NOT NULL,
              submitted_at TEXT NOT NULL,
              updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS assessment (
              assessment_id TEXT PRIMARY KEY,
              class_id TEXT NOT NULL REFERENCES class(class_id),
              student_id TEXT NOT NULL REFERENCES student(student_id),
              exercise_score REAL NOT NULL,
              project_score REAL NOT NULL,
              exam_score REAL NOT NULL,
              weighted_total REAL NOT NULL,
              graded_at TEXT NOT NULL,
              updated_at TEXT NOT NULL,
              UNIQUE (class_id, student_id)
            );

            CREATE INDEX IF NOT EXISTS idx_assessment_class ON assessment(class_id);
            "#,
        )?;
        Ok(())
    }

    fn map_report_row(row: &Row<'_>) -> rusqlite::Result<SessionReport> {
        Ok(SessionReport {
            report_id: row.get(0)?,
            session_id: row.get(1)?,
            instructor_id: row.get(2)?,
            summary: row.get(3)?,
            submitted_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }

    fn map_assessment_row(row: &Row<'_>) -> rusqlite::Result<Assessment> {
        Ok(Assessment {
            assessment_id: row.get(0)?,
            class_id: row.get(1)?,
            student_id: row.get(2)?,
            exercise_score: row.get(3)?,
            project_score: row.get(4)?,
            exam_score: row.get(5)?,
            weighted_total: row.get(6)?,
            graded_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }

    // ==========================================
    // 课次纪要
    // ==========================================

    /// 新增课次纪要 (同课次重复填报触发唯一约束)
    pub fn insert_session_report(&self, report: &SessionReport) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO session_report
              (report_id, session_id, instructor_id, summary, submitted_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                report.report_id,
                report.session_id,
                report.instructor_id,
                report.summary,
                report.submitted_at,
                report.updated_at,
            ],
        )?;
        Ok(())
    }

    /// 修改课次纪要内容
    pub fn update_session_report(
        &self,
        report_id: &str,
        summary: &str,
        updated_at: chrono::NaiveDateTime,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE session_report SET summary = ?1, updated_at = ?2 WHERE report_id = ?3",
            params![summary, updated_at, report_id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "session_report".to_string(),
                id: report_id.to_string(),
            });
        }
        Ok(())
    }

    /// 按课次查询纪要
    pub fn find_report_by_session(&self, session_id: &str) -> RepositoryResult<Option<SessionReport>> {
        let conn = self.get_conn()?;
        let report = conn
            .query_row(
                r#"
                SELECT report_id, session_id, instructor_id, summary, submitted_at, updated_at
                FROM session_report WHERE session_id = ?1
                "#,
                params![session_id],
                Self::map_report_row,
            )
            .optional()?;
        Ok(report)
    }

    // ==========================================
    // 结课测评
    // ==========================================

    /// 新增测评 (同班同学员重复评分触发唯一约束)
    pub fn insert_assessment(&self, assessment: &Assessment) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO assessment
              (assessment_id, class_id, student_id, exercise_score, project_score,
               exam_score, weighted_total, graded_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                assessment.assessment_id,
                assessment.class_id,
                assessment.student_id,
                assessment.exercise_score,
                assessment.project_score,
                assessment.exam_score,
                assessment.weighted_total,
                assessment.graded_at,
                assessment.updated_at,
            ],
        )?;
        Ok(())
    }

    /// 修改测评分项与加权总分
    pub fn update_assessment(&self, assessment: &Assessment) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE assessment
            SET exercise_score = ?1, project_score = ?2, exam_score = ?3,
                weighted_total = ?4, updated_at = ?5
            WHERE assessment_id = ?6
            "#,
            params![
                assessment.exercise_score,
                assessment.project_score,
                assessment.exam_score,
                assessment.weighted_total,
                assessment.updated_at,
                assessment.assessment_id,
            ],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "assessment".to_string(),
                id: assessment.assessment_id.clone(),
            });
        }
        Ok(())
    }

    /// 按班级与学员查询测评
    pub fn find_assessment(
        &self,
        class_id: &str,
        student_id: &str,
    ) -> RepositoryResult<Option<Assessment>> {
        let conn = self.get_conn()?;
        let assessment = conn
            .query_row(
                r#"
                SELECT assessment_id, class_id, student_id, exercise_score, project_score,
                       exam_score, weighted_total, graded_at, updated_at
                FROM assessment WHERE class_id = ?1 AND student_id = ?2
                "#,
                params![class_id, student_id],
                Self::map_assessment_row,
            )
            .optional()?;
        Ok(assessment)
    }

    /// 某班全部测评 (weighted_total 降序)
    pub fn list_assessments_by_class(&self, class_id: &str) -> RepositoryResult<Vec<Assessment>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT assessment_id, class_id, student_id, exercise_score, project_score,
                   exam_score, weighted_total, graded_at, updated_at
            FROM assessment WHERE class_id = ?1 ORDER BY weighted_total DESC, student_id
            "#,
        )?;
        let assessments = stmt
            .query_map(params![class_id], Self::map_assessment_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(assessments)
    }
}
