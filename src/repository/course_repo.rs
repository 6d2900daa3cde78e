// ==========================================
// Lecturna 教务系统 - 课程仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

use crate::domain::course::Course;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// CourseRepository - 课程仓储
// ==========================================
pub struct CourseRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CourseRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let repo = Self { conn };
        repo.ensure_table()?;
        Ok(repo)
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn ensure_table(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS course (
              course_id TEXT PRIMARY KEY,
              code TEXT NOT NULL UNIQUE,
              name TEXT NOT NULL,
              level INTEGER NOT NULL DEFAULT 1,
              session_count INTEGER NOT NULL DEFAULT 12,
              created_at TEXT NOT NULL,
              updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_course_code ON course(code);
            "#,
        )?;
        Ok(())
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Course> {
        Ok(Course {
            course_id: row.get(0)?,
            code: row.get(1)?,
            name: row.get(2)?,
            level: row.get(3)?,
            session_count: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }

    /// 新增课程
    pub fn create(&self, course: &Course) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO course (course_id, code, name, level, session_count, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                course.course_id,
                course.code,
                course.name,
                course.level,
                course.session_count,
                course.created_at,
                course.updated_at,
            ],
        )?;
        Ok(())
    }

    /// 按ID查询
    pub fn find_by_id(&self, course_id: &str) -> RepositoryResult<Option<Course>> {
        let conn = self.get_conn()?;
        let course = conn
            .query_row(
                r#"
                SELECT course_id, code, name, level, session_count, created_at, updated_at
                FROM course WHERE course_id = ?1
                "#,
                params![course_id],
                Self::map_row,
            )
            .optional()?;
        Ok(course)
    }

    /// 按课程代码查询
    pub fn find_by_code(&self, code: &str) -> RepositoryResult<Option<Course>> {
        let conn = self.get_conn()?;
        let course = conn
            .query_row(
                r#"
                SELECT course_id, code, name, level, session_count, created_at, updated_at
                FROM course WHERE code = ?1
                "#,
                params![code],
                Self::map_row,
            )
            .optional()?;
        Ok(course)
    }

    /// 全量课程 (code 升序)
    pub fn list_all(&self) -> RepositoryResult<Vec<Course>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT course_id, code, name, level, session_count, created_at, updated_at
            FROM course ORDER BY code
            "#,
        )?;
        let courses = stmt
            .query_map([], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(courses)
    }
}
