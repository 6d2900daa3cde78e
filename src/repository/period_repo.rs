// ==========================================
// Lecturna 教务系统 - 学期仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::period::Period;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// PeriodRepository - 学期仓储
// ==========================================
pub struct PeriodRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PeriodRepository {
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
            CREATE TABLE IF NOT EXISTS period (
              period_id TEXT PRIMARY KEY,
              name TEXT NOT NULL UNIQUE,
              start_date TEXT NOT NULL,
              end_date TEXT NOT NULL,
              created_at TEXT NOT NULL,
              CHECK (start_date <= end_date)
            );

            CREATE INDEX IF NOT EXISTS idx_period_start_date ON period(start_date);
            "#,
        )?;
        Ok(())
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Period> {
        Ok(Period {
            period_id: row.get(0)?,
            name: row.get(1)?,
            start_date: row.get(2)?,
            end_date: row.get(3)?,
            created_at: row.get(4)?,
        })
    }

    /// 新增学期
    pub fn create(&self, period: &Period) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO period (period_id, name, start_date, end_date, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                period.period_id,
                period.name,
                period.start_date,
                period.end_date,
                period.created_at,
            ],
        )?;
        Ok(())
    }

    /// 按ID查询
    pub fn find_by_id(&self, period_id: &str) -> RepositoryResult<Option<Period>> {
        let conn = self.get_conn()?;
        let period = conn
            .query_row(
                r#"
                SELECT period_id, name, start_date, end_date, created_at
                FROM period WHERE period_id = ?1
                "#,
                params![period_id],
                Self::map_row,
            )
            .optional()?;
        Ok(period)
    }

    /// 全量学期 (start_date 升序)
    pub fn list_all(&self) -> RepositoryResult<Vec<Period>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT period_id, name, start_date, end_date, created_at
            FROM period ORDER BY start_date
            "#,
        )?;
        let periods = stmt
            .query_map([], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(periods)
    }
}
