// ==========================================
// Lecturna 教务系统 - 名册导入器
// ==========================================
// 职责: 批量入驻 - CSV 名册 -> 学员档案 + 已审核报名
// 列约定: name,email,course_code (带表头)
// 容错: 单行失败记入报告继续,整文件级错误才中断
// ==========================================

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::domain::people::Student;
use crate::domain::types::EnrollmentStatus;
use crate::importer::error::ImportError;
use crate::repository::{
    CourseRepository, EnrollmentEntity, EnrollmentRepository, StudentRepository,
};

// ==========================================
// ImportReport - 导入结果报告
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub rows_total: usize,
    pub enrollments_created: usize,
    pub students_created: usize,
    pub errors: Vec<RowError>,
}

/// 单行失败记录 (line 为含表头的物理行号)
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub reason: String,
}

// ==========================================
// RosterImporter - 名册导入器
// ==========================================
pub struct RosterImporter {
    student_repo: Arc<StudentRepository>,
    course_repo: Arc<CourseRepository>,
    enrollment_repo: Arc<EnrollmentRepository>,
}

impl RosterImporter {
    pub fn new(
        student_repo: Arc<StudentRepository>,
        course_repo: Arc<CourseRepository>,
        enrollment_repo: Arc<EnrollmentRepository>,
    ) -> Self {
        Self {
            student_repo,
            course_repo,
            enrollment_repo,
        }
    }

    /// 导入一份名册到指定学期
    ///
    /// 规则:
    /// - 学员按邮箱去重,缺失则建档
    /// - 报名直接以 APPROVED 入库 (名册视同已缴费审核)
    /// - 重复报名/未知课程等单行问题记入 errors,不中断
    pub fn import_roster(
        &self,
        csv_path: &Path,
        period_id: &str,
        now: NaiveDateTime,
    ) -> Result<ImportReport, ImportError> {
        if !csv_path.exists() {
            return Err(ImportError::FileUnreadable(
                csv_path.display().to_string(),
            ));
        }

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(csv_path)
            .map_err(ImportError::CsvError)?;

        // 表头校验
        let headers = reader.headers().map_err(ImportError::CsvError)?.clone();
        for required in ["name", "email", "course_code"] {
            if !headers.iter().any(|h| h == required) {
                return Err(ImportError::MissingColumn(required.to_string()));
            }
        }
        let idx_of = |name: &str| headers.iter().position(|h| h == name);
        let (name_idx, email_idx, code_idx) = match (
            idx_of("name"),
            idx_of("email"),
            idx_of("course_code"),
        ) {
            (Some(n), Some(e), Some(c)) => (n, e, c),
            // 上方已逐列校验,此分支不可达
            _ => return Err(ImportError::MissingColumn("course_code".to_string())),
        };

        let mut report = ImportReport::default();

        for (row_no, record) in reader.records().enumerate() {
            // 物理行号: 表头占第 1 行
            let line = row_no + 2;
            let record = match record {
                Ok(r) => r,
                Err(e) => {
                    report.errors.push(RowError {
                        line,
                        reason: format!("行解析失败: {}", e),
                    });
                    continue;
                }
            };
            report.rows_total += 1;

            match self.import_row(&record, name_idx, email_idx, code_idx, period_id, now) {
                Ok(created_student) => {
                    report.enrollments_created += 1;
                    if created_student {
                        report.students_created += 1;
                    }
                }
                Err(reason) => {
                    tracing::warn!(line, %reason, "名册行导入失败");
                    report.errors.push(RowError { line, reason });
                }
            }
        }

        tracing::info!(
            rows = report.rows_total,
            enrollments = report.enrollments_created,
            students = report.students_created,
            failed = report.errors.len(),
            "名册导入完成"
        );
        Ok(report)
    }

    /// 单行导入;返回是否新建了学员档案
    fn import_row(
        &self,
        record: &csv::StringRecord,
        name_idx: usize,
        email_idx: usize,
        code_idx: usize,
        period_id: &str,
        now: NaiveDateTime,
    ) -> Result<bool, String> {
        let name = record.get(name_idx).unwrap_or("").trim();
        let email = record.get(email_idx).unwrap_or("").trim();
        let course_code = record.get(code_idx).unwrap_or("").trim();

        if name.is_empty() || email.is_empty() {
            return Err("姓名或邮箱为空".to_string());
        }
        if course_code.is_empty() {
            return Err("课程代码为空".to_string());
        }

        let course = self
            .course_repo
            .find_by_code(course_code)
            .map_err(|e| e.to_string())?
            .ok_or_else(|| format!("课程代码不存在: {}", course_code))?;

        let (student, created) = match self
            .student_repo
            .find_by_email(email)
            .map_err(|e| e.to_string())?
        {
            Some(existing) => (existing, false),
            None => {
                let student = Student {
                    student_id: Uuid::new_v4().to_string(),
                    name: name.to_string(),
                    email: email.to_string(),
                    active: true,
                    created_at: now,
                    updated_at: now,
                };
                self.student_repo
                    .create(&student)
                    .map_err(|e| e.to_string())?;
                (student, true)
            }
        };

        let entity = EnrollmentEntity {
            enrollment_id: Uuid::new_v4().to_string(),
            student_id: student.student_id.clone(),
            course_id: course.course_id.clone(),
            period_id: period_id.to_string(),
            status: EnrollmentStatus::Approved,
            created_at: now,
            approved_at: Some(now),
            updated_at: now,
        };
        self.enrollment_repo
            .create(&entity)
            .map_err(|e| e.to_string())?;
        Ok(created)
    }
}
