// ==========================================
// Lecturna 教务系统 - 人员仓储
// ==========================================
// 讲师与学员各一张表,结构一致,仓储分开
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::people::{Instructor, Student};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// InstructorRepository - 讲师仓储
// ==========================================
pub struct InstructorRepository {
    conn: Arc<Mutex<Connection>>,
}

impl InstructorRepository {
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
            CREATE TABLE IF NOT EXISTS instructor (
              instructor_id TEXT PRIMARY KEY,
              name TEXT NOT NULL,
              email TEXT NOT NULL UNIQUE,
              active INTEGER NOT NULL DEFAULT 1,
              created_at TEXT NOT NULL,
              updated_at TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Instructor> {
        Ok(Instructor {
            instructor_id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            active: row.get::<_, i64>(3)? != 0,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }

    /// 新增讲师
    pub fn create(&self, instructor: &Instructor) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO instructor (instructor_id, name, email, active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                instructor.instructor_id,
                instructor.name,
                instructor.email,
                instructor.active as i64,
                instructor.created_at,
                instructor.updated_at,
            ],
        )?;
        Ok(())
    }

    /// 按ID查询
    pub fn find_by_id(&self, instructor_id: &str) -> RepositoryResult<Option<Instructor>> {
        let conn = self.get_conn()?;
        let instructor = conn
            .query_row(
                r#"
                SELECT instructor_id, name, email, active, created_at, updated_at
                FROM instructor WHERE instructor_id = ?1
                "#,
                params![instructor_id],
                Self::map_row,
            )
            .optional()?;
        Ok(instructor)
    }

    /// 在职讲师列表 (created_at 升序)
    pub fn list_active(&self) -> RepositoryResult<Vec<Instructor>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT instructor_id, name, email, active, created_at, updated_at
            FROM instructor WHERE active = 1 ORDER BY created_at, instructor_id
            "#,
        )?;
        let instructors = stmt
            .query_map([], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(instructors)
    }
}

// ==========================================
// StudentRepository - 学员仓储
// ==========================================
pub struct StudentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl StudentRepository {
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
            CREATE TABLE IF NOT EXISTS student (
              student_id TEXT PRIMARY KEY,
              name TEXT NOT NULL,
              email TEXT NOT NULL UNIQUE,
              active INTEGER NOT NULL DEFAULT 1,
              created_at TEXT NOT NULL,
              updated_at TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Student> {
        Ok(Student {
            student_id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            active: row.get::<_, i64>(3)? != 0,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }

    /// 新增学员
    pub fn create(&self, student: &Student) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO student (student_id, name, email, active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                student.student_id,
                student.name,
                student.email,
                student.active as i64,
                student.created_at,
                student.updated_at,
            ],
        )?;
        Ok(())
    }

    /// 按ID查询
    pub fn find_by_id(&self, student_id: &str) -> RepositoryResult<Option<Student>> {
        let conn = self.get_conn()?;
        let student = conn
            .query_row(
                r#"
                SELECT student_id, name, email, active, created_at, updated_at
                FROM student WHERE student_id = ?1
                "#,
                params![student_id],
                Self::map_row,
            )
            .optional()?;
        Ok(student)
    }

    /// 按邮箱查询 (名册导入去重用)
    pub fn find_by_email(&self, email: &str) -> RepositoryResult<Option<Student>> {
        let conn = self.get_conn()?;
        let student = conn
            .query_row(
                r#"
                SELECT student_id, name, email, active, created_at, updated_at
                FROM student WHERE email = ?1
                "#,
                params![email],
                Self::map_row,
            )
            .optional()?;
        Ok(student)
    }

    /// 在读学员列表 (created_at 升序)
    pub fn list_active(&self) -> RepositoryResult<Vec<Student>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT student_id, name, email, active, created_at, updated_at
            FROM student WHERE active = 1 ORDER BY created_at, student_id
            "#,
        )?;
        let students = stmt
            .query_map([], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(students)
    }
}
