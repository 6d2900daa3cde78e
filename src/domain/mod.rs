// ==========================================
// Lecturna 教务系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体与类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod assessment;
pub mod class;
pub mod course;
pub mod people;
pub mod period;
pub mod schedule;
pub mod types;

// 重导出核心类型
pub use assessment::{Assessment, ScoreWeights, SessionReport};
pub use class::{ClassDetail, ClassProposal, ClassRecord, ClassSession};
pub use course::Course;
pub use people::{Instructor, Student};
pub use period::Period;
pub use schedule::{InstructorAvailability, StudentDemand};
pub use types::{
    ClassStatus, EnrollmentStatus, PeriodRole, ReportKind, Shift, SlotStatus, SubmitMode, Weekday,
};
