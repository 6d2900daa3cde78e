// ==========================================
// Lecturna 教务系统 - 入驻与报名API
// ==========================================
// 职责: 讲师/学员档案、报名审批、讲师时段登记
// ==========================================

use std::sync::Arc;

use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::people::{Instructor, Student};
use crate::domain::schedule::InstructorAvailability;
use crate::domain::types::{EnrollmentStatus, Shift, SlotStatus, Weekday};
use crate::repository::{
    AvailabilityRepository, CourseRepository, EnrollmentEntity, EnrollmentRepository,
    InstructorRepository, PeriodRepository, StudentRepository,
};

// ==========================================
// EnrollmentApi - 入驻与报名API
// ==========================================
pub struct EnrollmentApi {
    student_repo: Arc<StudentRepository>,
    instructor_repo: Arc<InstructorRepository>,
    course_repo: Arc<CourseRepository>,
    period_repo: Arc<PeriodRepository>,
    enrollment_repo: Arc<EnrollmentRepository>,
    availability_repo: Arc<AvailabilityRepository>,
}

impl EnrollmentApi {
    pub fn new(
        student_repo: Arc<StudentRepository>,
        instructor_repo: Arc<InstructorRepository>,
        course_repo: Arc<CourseRepository>,
        period_repo: Arc<PeriodRepository>,
        enrollment_repo: Arc<EnrollmentRepository>,
        availability_repo: Arc<AvailabilityRepository>,
    ) -> Self {
        Self {
            student_repo,
            instructor_repo,
            course_repo,
            period_repo,
            enrollment_repo,
            availability_repo,
        }
    }

    // ==========================================
    // 档案登记
    // ==========================================

    /// 登记学员档案
    pub fn register_student(&self, name: &str, email: &str, now: NaiveDateTime) -> ApiResult<Student> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() || email.is_empty() {
            return Err(ApiError::InvalidInput("姓名与邮箱不能为空".to_string()));
        }
        let student = Student {
            student_id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            active: true,
            created_at: now,
            updated_at: now,
        };
        self.student_repo.create(&student)?;
        Ok(student)
    }

    /// 登记讲师档案
    pub fn register_instructor(
        &self,
        name: &str,
        email: &str,
        now: NaiveDateTime,
    ) -> ApiResult<Instructor> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() || email.is_empty() {
            return Err(ApiError::InvalidInput("姓名与邮箱不能为空".to_string()));
        }
        let instructor = Instructor {
            instructor_id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            active: true,
            created_at: now,
            updated_at: now,
        };
        self.instructor_repo.create(&instructor)?;
        Ok(instructor)
    }

    // ==========================================
    // 报名与审批
    // ==========================================

    /// 登记报名 (PENDING)
    pub fn register_enrollment(
        &self,
        student_id: &str,
        course_id: &str,
        period_id: &str,
        now: NaiveDateTime,
    ) -> ApiResult<EnrollmentEntity> {
        self.student_repo
            .find_by_id(student_id)?
            .ok_or_else(|| ApiError::NotFound(format!("student id={}", student_id)))?;
        self.course_repo
            .find_by_id(course_id)?
            .ok_or_else(|| ApiError::NotFound(format!("course id={}", course_id)))?;
        self.period_repo
            .find_by_id(period_id)?
            .ok_or_else(|| ApiError::NotFound(format!("period id={}", period_id)))?;

        let entity = EnrollmentEntity {
            enrollment_id: Uuid::new_v4().to_string(),
            student_id: student_id.to_string(),
            course_id: course_id.to_string(),
            period_id: period_id.to_string(),
            status: EnrollmentStatus::Pending,
            created_at: now,
            approved_at: None,
            updated_at: now,
        };
        self.enrollment_repo.create(&entity)?;
        Ok(entity)
    }

    /// 审核通过报名,进入待分班池
    pub fn approve_enrollment(&self, enrollment_id: &str, now: NaiveDateTime) -> ApiResult<()> {
        self.enrollment_repo.approve(enrollment_id, now)?;
        tracing::info!(enrollment_id = %enrollment_id, "报名审核通过");
        Ok(())
    }

    /// 驳回报名
    pub fn reject_enrollment(&self, enrollment_id: &str, now: NaiveDateTime) -> ApiResult<()> {
        self.enrollment_repo.reject(enrollment_id, now)?;
        Ok(())
    }

    // ==========================================
    // 讲师时段登记
    // ==========================================

    /// 登记讲师可授时段
    ///
    /// course_ids 为资质课程的有序列表,顺序即撮合遍历顺序
    pub fn register_availability(
        &self,
        instructor_id: &str,
        period_id: &str,
        day_id: u8,
        shift: &str,
        course_ids: &[String],
        now: NaiveDateTime,
    ) -> ApiResult<InstructorAvailability> {
        let instructor = self
            .instructor_repo
            .find_by_id(instructor_id)?
            .ok_or_else(|| ApiError::NotFound(format!("instructor id={}", instructor_id)))?;
        if !instructor.active {
            return Err(ApiError::BusinessRuleViolation(format!(
                "讲师已离职: {}",
                instructor_id
            )));
        }
        self.period_repo
            .find_by_id(period_id)?
            .ok_or_else(|| ApiError::NotFound(format!("period id={}", period_id)))?;

        let day = Weekday::from_id(day_id)
            .ok_or_else(|| ApiError::InvalidInput(format!("星期编号越界: {}", day_id)))?;
        let shift = Shift::parse(shift)
            .ok_or_else(|| ApiError::InvalidInput(format!("时段不存在: {}", shift)))?;

        if course_ids.is_empty() {
            return Err(ApiError::InvalidInput("资质课程列表不能为空".to_string()));
        }
        for course_id in course_ids {
            self.course_repo
                .find_by_id(course_id)?
                .ok_or_else(|| ApiError::NotFound(format!("course id={}", course_id)))?;
        }

        let slot = InstructorAvailability {
            slot_id: Uuid::new_v4().to_string(),
            instructor_id: instructor_id.to_string(),
            period_id: period_id.to_string(),
            day,
            shift,
            course_ids: course_ids.to_vec(),
            status: SlotStatus::Open,
            created_at: now,
        };
        self.availability_repo.create(&slot)?;
        Ok(slot)
    }
}
