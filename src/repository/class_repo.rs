// ==========================================
// Lecturna 教务系统 - 班级仓储
// ==========================================
// class 主表 + class_student 成员表 + class_session 课次表
// commit_proposals: 整批提案单事务落库,任一失败全部回滚;
// 落库前在事务内复核时段/需求仍未被并发消费
// 红线: Repository 不含业务逻辑 (课次日期等由引擎预先算好)
// ==========================================

use std::collections::HashMap;

use crate::domain::class::{ClassDetail, ClassRecord, ClassSession};
use crate::domain::types::{ClassStatus, Shift, Weekday};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use std::sync::{Arc, Mutex};

// ==========================================
// PreparedClassCommit - 待落库班级
// ==========================================
// 由 api 层基于提案 + 引擎产物组装
#[derive(Debug, Clone)]
pub struct PreparedClassCommit {
    pub class: ClassRecord,
    pub sessions: Vec<ClassSession>,
    pub demand_ids: Vec<String>,
    pub student_ids: Vec<String>,
}

// ==========================================
// CommitSummary - 提交结果
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct CommitSummary {
    pub classes_created: usize,
    pub students_placed: usize,
    pub sessions_created: usize,
    pub class_ids: Vec<String>,
}

// ==========================================
// ClassRepository - 班级仓储
// ==========================================
pub struct ClassRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ClassRepository {
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
            CREATE TABLE IF NOT EXISTS class (
              class_id TEXT PRIMARY KEY,
              name TEXT NOT NULL,
              course_id TEXT NOT NULL REFERENCES course(course_id),
              period_id TEXT NOT NULL REFERENCES period(period_id),
              instructor_id TEXT NOT NULL REFERENCES instructor(instructor_id),
              slot_id TEXT NOT NULL REFERENCES instructor_slot(slot_id),
              day_id INTEGER NOT NULL CHECK (day_id BETWEEN 1 AND 7),
              shift TEXT NOT NULL CHECK (shift IN ('S1','S2','S3','S4')),
              status TEXT NOT NULL DEFAULT 'PLANNED'
                CHECK (status IN ('PLANNED','ACTIVE','COMPLETED')),
              created_at TEXT NOT NULL,
              UNIQUE (period_id, name)
            );

            CREATE TABLE IF NOT EXISTS class_student (
              class_id TEXT NOT NULL REFERENCES class(class_id) ON DELETE CASCADE,
              student_id TEXT NOT NULL REFERENCES student(student_id),
              enrollment_id TEXT NOT NULL REFERENCES enrollment(enrollment_id),
              ord INTEGER NOT NULL,
              PRIMARY KEY (class_id, student_id)
            );

            CREATE TABLE IF NOT EXISTS class_session (
              session_id TEXT PRIMARY KEY,
              class_id TEXT NOT NULL REFERENCES class(class_id) ON DELETE CASCADE,
              seq_no INTEGER NOT NULL,
              session_date TEXT NOT NULL,
              starts_at TEXT NOT NULL,
              ends_at TEXT NOT NULL,
              UNIQUE (class_id, seq_no)
            );

            CREATE INDEX IF NOT EXISTS idx_class_period_course ON class(period_id, course_id);
            CREATE INDEX IF NOT EXISTS idx_class_session_class ON class_session(class_id, seq_no);
            "#,
        )?;
        Ok(())
    }

    fn map_class_row(row: &Row<'_>) -> rusqlite::Result<ClassRecord> {
        let day_id: u8 = row.get(6)?;
        let shift_raw: String = row.get(7)?;
        let status_raw: String = row.get(8)?;
        Ok(ClassRecord {
            class_id: row.get(0)?,
            name: row.get(1)?,
            course_id: row.get(2)?,
            period_id: row.get(3)?,
            instructor_id: row.get(4)?,
            slot_id: row.get(5)?,
            day: Weekday::from_id(day_id).unwrap_or(Weekday::Monday),
            shift: Shift::parse(&shift_raw).unwrap_or(Shift::S1),
            status: ClassStatus::parse(&status_raw),
            created_at: row.get(9)?,
        })
    }

    fn map_session_row(row: &Row<'_>) -> rusqlite::Result<ClassSession> {
        Ok(ClassSession {
            session_id: row.get(0)?,
            class_id: row.get(1)?,
            seq_no: row.get(2)?,
            session_date: row.get(3)?,
            starts_at: row.get(4)?,
            ends_at: row.get(5)?,
        })
    }

    // ==========================================
    // 命名计数 (ClassNameCounter 的数据源)
    // ==========================================

    /// 某学期内各课程的既有班级数
    pub fn counts_by_course(&self, period_id: &str) -> RepositoryResult<HashMap<String, u32>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT course_id, COUNT(*) FROM class WHERE period_id = ?1 GROUP BY course_id",
        )?;
        let rows = stmt
            .query_map(params![period_id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u32))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows.into_iter().collect())
    }

    // ==========================================
    // 提案提交 (整批单事务)
    // ==========================================

    /// 将评审通过的提案整批落库
    ///
    /// 事务内逐提案执行:
    /// 1) 时段 OPEN -> ASSIGNED (0 行受影响 => 快照过期)
    /// 2) 各报名 APPROVED -> PLACED (同上)
    /// 3) 插入 class / class_student / class_session
    ///
    /// 任一步失败 => 整批回滚,库内无任何残留
    pub fn commit_proposals(
        &self,
        prepared: &[PreparedClassCommit],
    ) -> RepositoryResult<CommitSummary> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let mut summary = CommitSummary::default();
        for item in prepared {
            Self::commit_one(&tx, item)?;
            summary.classes_created += 1;
            summary.students_placed += item.student_ids.len();
            summary.sessions_created += item.sessions.len();
            summary.class_ids.push(item.class.class_id.clone());
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tracing::info!(
            classes = summary.classes_created,
            students = summary.students_placed,
            sessions = summary.sessions_created,
            "开班提案整批落库完成"
        );
        Ok(summary)
    }

    fn commit_one(tx: &Transaction<'_>, item: &PreparedClassCommit) -> RepositoryResult<()> {
        // 1) 占用时段;状态不再是 OPEN 即视为评审期间被并发消费
        let affected = tx.execute(
            "UPDATE instructor_slot SET status = 'ASSIGNED' WHERE slot_id = ?1 AND status = 'OPEN'",
            params![item.class.slot_id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::StaleSnapshot {
                entity: "instructor_slot".to_string(),
                id: item.class.slot_id.clone(),
            });
        }

        // 2) 消费报名
        for enrollment_id in &item.demand_ids {
            let affected = tx.execute(
                "UPDATE enrollment SET status = 'PLACED' WHERE enrollment_id = ?1 AND status = 'APPROVED'",
                params![enrollment_id],
            )?;
            if affected == 0 {
                return Err(RepositoryError::StaleSnapshot {
                    entity: "enrollment".to_string(),
                    id: enrollment_id.clone(),
                });
            }
        }

        // 3) 班级 + 成员 + 课次
        tx.execute(
            r#"
            INSERT INTO class
              (class_id, name, course_id, period_id, instructor_id, slot_id,
               day_id, shift, status, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                item.class.class_id,
                item.class.name,
                item.class.course_id,
                item.class.period_id,
                item.class.instructor_id,
                item.class.slot_id,
                item.class.day.to_id(),
                item.class.shift.as_str(),
                item.class.status.as_str(),
                item.class.created_at,
            ],
        )?;

        for (ord, (student_id, enrollment_id)) in item
            .student_ids
            .iter()
            .zip(item.demand_ids.iter())
            .enumerate()
        {
            tx.execute(
                r#"
                INSERT INTO class_student (class_id, student_id, enrollment_id, ord)
                VALUES (?1, ?2, ?3, ?4)
                "#,
                params![item.class.class_id, student_id, enrollment_id, ord as i64],
            )?;
        }

        for session in &item.sessions {
            tx.execute(
                r#"
                INSERT INTO class_session
                  (session_id, class_id, seq_no, session_date, starts_at, ends_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    session.session_id,
                    session.class_id,
                    session.seq_no,
                    session.session_date,
                    session.starts_at,
                    session.ends_at,
                ],
            )?;
        }

        Ok(())
    }

    // ==========================================
    // 查询
    // ==========================================

    /// 某学期的班级列表 (name 升序)
    pub fn list_by_period(&self, period_id: &str) -> RepositoryResult<Vec<ClassRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT class_id, name, course_id, period_id, instructor_id, slot_id,
                   day_id, shift, status, created_at
            FROM class WHERE period_id = ?1 ORDER BY name
            "#,
        )?;
        let classes = stmt
            .query_map(params![period_id], Self::map_class_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(classes)
    }

    /// 班级详情 (成员按入班顺序,课次按 seq_no)
    pub fn find_detail(&self, class_id: &str) -> RepositoryResult<Option<ClassDetail>> {
        let conn = self.get_conn()?;
        let class = conn
            .query_row(
                r#"
                SELECT class_id, name, course_id, period_id, instructor_id, slot_id,
                       day_id, shift, status, created_at
                FROM class WHERE class_id = ?1
                "#,
                params![class_id],
                Self::map_class_row,
            )
            .optional()?;

        let class = match class {
            Some(c) => c,
            None => return Ok(None),
        };

        let mut stmt = conn.prepare(
            "SELECT student_id FROM class_student WHERE class_id = ?1 ORDER BY ord",
        )?;
        let student_ids = stmt
            .query_map(params![class_id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT session_id, class_id, seq_no, session_date, starts_at, ends_at
            FROM class_session WHERE class_id = ?1 ORDER BY seq_no
            "#,
        )?;
        let sessions = stmt
            .query_map(params![class_id], Self::map_session_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some(ClassDetail {
            class,
            student_ids,
            sessions,
        }))
    }

    /// 按ID查询课次
    pub fn find_session(&self, session_id: &str) -> RepositoryResult<Option<ClassSession>> {
        let conn = self.get_conn()?;
        let session = conn
            .query_row(
                r#"
                SELECT session_id, class_id, seq_no, session_date, starts_at, ends_at
                FROM class_session WHERE session_id = ?1
                "#,
                params![session_id],
                Self::map_session_row,
            )
            .optional()?;
        Ok(session)
    }

    /// 班级末次课结束时间 (截止闸门基准)
    pub fn last_session_end(&self, class_id: &str) -> RepositoryResult<Option<chrono::NaiveDateTime>> {
        let conn = self.get_conn()?;
        let end = conn.query_row(
            "SELECT MAX(ends_at) FROM class_session WHERE class_id = ?1",
            params![class_id],
            |row| row.get(0),
        )?;
        Ok(end)
    }
}
