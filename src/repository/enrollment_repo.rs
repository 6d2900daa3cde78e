// ==========================================
// Lecturna 教务系统 - 报名仓储
// ==========================================
// 状态机: PENDING -> APPROVED -> PLACED / PENDING -> REJECTED
// 待分班需求 = APPROVED 行的投影 (approved_at 即 FIFO 基准)
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::schedule::StudentDemand;
use crate::domain::types::EnrollmentStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// EnrollmentEntity - 报名记录
// ==========================================
#[derive(Debug, Clone)]
pub struct EnrollmentEntity {
    pub enrollment_id: String,
    pub student_id: String,
    pub course_id: String,
    pub period_id: String,
    pub status: EnrollmentStatus,
    pub created_at: NaiveDateTime,
    pub approved_at: Option<NaiveDateTime>,
    pub updated_at: NaiveDateTime,
}

// ==========================================
// EnrollmentRepository - 报名仓储
// ==========================================
pub struct EnrollmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl EnrollmentRepository {
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
            CREATE TABLE IF NOT EXISTS enrollment (
              enrollment_id TEXT PRIMARY KEY,
              student_id TEXT NOT NULL REFERENCES student(student_id),
              course_id TEXT NOT NULL REFERENCES course(course_id),
              period_id TEXT NOT NULL REFERENCES period(period_id),
              status TEXT NOT NULL DEFAULT 'PENDING'
                CHECK (status IN ('PENDING','APPROVED','PLACED','REJECTED')),
              created_at TEXT NOT NULL,
              approved_at TEXT,
              updated_at TEXT NOT NULL,
              UNIQUE (student_id, course_id, period_id)
            );

            CREATE INDEX IF NOT EXISTS idx_enrollment_period_status
              ON enrollment(period_id, status);
            "#,
        )?;
        Ok(())
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<EnrollmentEntity> {
        let status_raw: String = row.get(4)?;
        Ok(EnrollmentEntity {
            enrollment_id: row.get(0)?,
            student_id: row.get(1)?,
            course_id: row.get(2)?,
            period_id: row.get(3)?,
            status: EnrollmentStatus::parse(&status_raw),
            created_at: row.get(5)?,
            approved_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }

    /// 新增报名 (PENDING)
    pub fn create(&self, entity: &EnrollmentEntity) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO enrollment
              (enrollment_id, student_id, course_id, period_id, status, created_at, approved_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                entity.enrollment_id,
                entity.student_id,
                entity.course_id,
                entity.period_id,
                entity.status.as_str(),
                entity.created_at,
                entity.approved_at,
                entity.updated_at,
            ],
        )?;
        Ok(())
    }

    /// 按ID查询
    pub fn find_by_id(&self, enrollment_id: &str) -> RepositoryResult<Option<EnrollmentEntity>> {
        let conn = self.get_conn()?;
        let entity = conn
            .query_row(
                r#"
                SELECT enrollment_id, student_id, course_id, period_id, status,
                       created_at, approved_at, updated_at
                FROM enrollment WHERE enrollment_id = ?1
                "#,
                params![enrollment_id],
                Self::map_row,
            )
            .optional()?;
        Ok(entity)
    }

    /// 审核通过: PENDING -> APPROVED
    pub fn approve(&self, enrollment_id: &str, approved_at: NaiveDateTime) -> RepositoryResult<()> {
        self.transition(enrollment_id, EnrollmentStatus::Pending, EnrollmentStatus::Approved, Some(approved_at))
    }

    /// 驳回: PENDING -> REJECTED
    pub fn reject(&self, enrollment_id: &str, rejected_at: NaiveDateTime) -> RepositoryResult<()> {
        self.transition(enrollment_id, EnrollmentStatus::Pending, EnrollmentStatus::Rejected, Some(rejected_at))
    }

    fn transition(
        &self,
        enrollment_id: &str,
        from: EnrollmentStatus,
        to: EnrollmentStatus,
        at: Option<NaiveDateTime>,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE enrollment
            SET status = ?1,
                approved_at = CASE WHEN ?1 = 'APPROVED' THEN ?2 ELSE approved_at END,
                updated_at = COALESCE(?2, updated_at)
            WHERE enrollment_id = ?3 AND status = ?4
            "#,
            params![to.as_str(), at, enrollment_id, from.as_str()],
        )?;
        if affected == 0 {
            // 当前状态不是 from,读出来用于报错 (先释放连接锁再查询)
            drop(conn);
            let current = self
                .find_by_id(enrollment_id)?
                .ok_or_else(|| RepositoryError::NotFound {
                    entity: "enrollment".to_string(),
                    id: enrollment_id.to_string(),
                })?;
            return Err(RepositoryError::InvalidStateTransition {
                from: current.status.to_string(),
                to: to.to_string(),
            });
        }
        Ok(())
    }

    /// 某学期的待分班需求 (approved_at 升序, enrollment_id 兜底)
    ///
    /// 顺序即撮合引擎的 FIFO 消费顺序
    pub fn list_demands_by_period(&self, period_id: &str) -> RepositoryResult<Vec<StudentDemand>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT enrollment_id, student_id, course_id, period_id, approved_at
            FROM enrollment
            WHERE period_id = ?1 AND status = 'APPROVED'
            ORDER BY approved_at, enrollment_id
            "#,
        )?;
        let demands = stmt
            .query_map(params![period_id], |row| {
                Ok(StudentDemand {
                    demand_id: row.get(0)?,
                    student_id: row.get(1)?,
                    course_id: row.get(2)?,
                    period_id: row.get(3)?,
                    created_at: row.get(4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(demands)
    }

    /// 将 APPROVED 报名翻转为 PLACED
    ///
    /// # 返回
    /// 受影响行数 (0 表示不存在或已被消费)
    pub fn mark_placed(&self, enrollment_id: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE enrollment SET status = 'PLACED' WHERE enrollment_id = ?1 AND status = 'APPROVED'",
            params![enrollment_id],
        )?;
        Ok(affected)
    }

    /// 某学期各状态计数 (驾驶舱/待办用)
    pub fn count_by_status(&self, period_id: &str, status: EnrollmentStatus) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM enrollment WHERE period_id = ?1 AND status = ?2",
            params![period_id, status.as_str()],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
