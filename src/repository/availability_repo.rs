// ==========================================
// Lecturna 教务系统 - 讲师时段仓储
// ==========================================
// instructor_slot 主表 + slot_course 资质子表 (ord 保序)
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::schedule::InstructorAvailability;
use crate::domain::types::{Shift, SlotStatus, Weekday};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// AvailabilityRepository - 讲师时段仓储
// ==========================================
pub struct AvailabilityRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AvailabilityRepository {
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
            CREATE TABLE IF NOT EXISTS instructor_slot (
              slot_id TEXT PRIMARY KEY,
              instructor_id TEXT NOT NULL REFERENCES instructor(instructor_id),
              period_id TEXT NOT NULL REFERENCES period(period_id),
              day_id INTEGER NOT NULL CHECK (day_id BETWEEN 1 AND 7),
              shift TEXT NOT NULL CHECK (shift IN ('S1','S2','S3','S4')),
              status TEXT NOT NULL DEFAULT 'OPEN' CHECK (status IN ('OPEN','ASSIGNED')),
              created_at TEXT NOT NULL,
              UNIQUE (instructor_id, period_id, day_id, shift)
            );

            CREATE TABLE IF NOT EXISTS slot_course (
              slot_id TEXT NOT NULL REFERENCES instructor_slot(slot_id) ON DELETE CASCADE,
              course_id TEXT NOT NULL REFERENCES course(course_id),
              ord INTEGER NOT NULL,
              PRIMARY KEY (slot_id, course_id)
            );

            CREATE INDEX IF NOT EXISTS idx_slot_period_status ON instructor_slot(period_id, status);
            CREATE INDEX IF NOT EXISTS idx_slot_course_ord ON slot_course(slot_id, ord);
            "#,
        )?;
        Ok(())
    }

    fn map_slot_row(row: &Row<'_>) -> rusqlite::Result<InstructorAvailability> {
        let day_id: u8 = row.get(3)?;
        let shift_raw: String = row.get(4)?;
        let status_raw: String = row.get(5)?;
        Ok(InstructorAvailability {
            slot_id: row.get(0)?,
            instructor_id: row.get(1)?,
            period_id: row.get(2)?,
            // DDL CHECK 约束保证 day/shift 合法,此处兜底取周一/S1
            day: Weekday::from_id(day_id).unwrap_or(Weekday::Monday),
            shift: Shift::parse(&shift_raw).unwrap_or(Shift::S1),
            course_ids: Vec::new(),
            status: SlotStatus::parse(&status_raw),
            created_at: row.get(6)?,
        })
    }

    /// 填充资质课程列表 (ord 升序)
    fn load_course_ids(
        conn: &Connection,
        slot: &mut InstructorAvailability,
    ) -> RepositoryResult<()> {
        let mut stmt = conn.prepare(
            "SELECT course_id FROM slot_course WHERE slot_id = ?1 ORDER BY ord",
        )?;
        slot.course_ids = stmt
            .query_map(params![slot.slot_id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(())
    }

    /// 新增时段及其资质课程
    pub fn create(&self, slot: &InstructorAvailability) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        tx.execute(
            r#"
            INSERT INTO instructor_slot
              (slot_id, instructor_id, period_id, day_id, shift, status, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                slot.slot_id,
                slot.instructor_id,
                slot.period_id,
                slot.day.to_id(),
                slot.shift.as_str(),
                slot.status.as_str(),
                slot.created_at,
            ],
        )?;
        for (ord, course_id) in slot.course_ids.iter().enumerate() {
            tx.execute(
                "INSERT INTO slot_course (slot_id, course_id, ord) VALUES (?1, ?2, ?3)",
                params![slot.slot_id, course_id, ord as i64],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// 按ID查询 (含资质课程)
    pub fn find_by_id(&self, slot_id: &str) -> RepositoryResult<Option<InstructorAvailability>> {
        let conn = self.get_conn()?;
        let slot = conn
            .query_row(
                r#"
                SELECT slot_id, instructor_id, period_id, day_id, shift, status, created_at
                FROM instructor_slot WHERE slot_id = ?1
                "#,
                params![slot_id],
                Self::map_slot_row,
            )
            .optional()?;

        match slot {
            Some(mut s) => {
                Self::load_course_ids(&conn, &mut s)?;
                Ok(Some(s))
            }
            None => Ok(None),
        }
    }

    /// 某学期的未分配时段 (created_at 升序, slot_id 兜底)
    ///
    /// 顺序即撮合引擎的消费顺序
    pub fn list_open_by_period(
        &self,
        period_id: &str,
    ) -> RepositoryResult<Vec<InstructorAvailability>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT slot_id, instructor_id, period_id, day_id, shift, status, created_at
            FROM instructor_slot
            WHERE period_id = ?1 AND status = 'OPEN'
            ORDER BY created_at, slot_id
            "#,
        )?;
        let mut slots = stmt
            .query_map(params![period_id], Self::map_slot_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        for slot in &mut slots {
            Self::load_course_ids(&conn, slot)?;
        }
        Ok(slots)
    }

    /// 将 OPEN 时段翻转为 ASSIGNED
    ///
    /// # 返回
    /// 受影响行数 (0 表示时段不存在或已被占用)
    pub fn mark_assigned(&self, slot_id: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE instructor_slot SET status = 'ASSIGNED' WHERE slot_id = ?1 AND status = 'OPEN'",
            params![slot_id],
        )?;
        Ok(affected)
    }
}
