// ==========================================
// Lecturna 教务系统 - 排班池领域模型
// ==========================================
// 开班撮合的两个输入池:
// - InstructorAvailability: 讲师可授时段 (未绑定班级)
// - StudentDemand: 已审核未分班的报名需求
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{Shift, SlotStatus, Weekday};

// ==========================================
// InstructorAvailability - 讲师可授时段
// ==========================================
// course_ids 为该讲师在此时段可授课程的有序列表,
// 顺序即撮合时的遍历顺序
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstructorAvailability {
    pub slot_id: String,           // 时段ID
    pub instructor_id: String,     // 讲师ID
    pub period_id: String,         // 目标学期
    pub day: Weekday,              // 星期
    pub shift: Shift,              // 时段
    pub course_ids: Vec<String>,   // 可授课程 (有序)
    pub status: SlotStatus,        // OPEN / ASSIGNED
    pub created_at: NaiveDateTime, // 创建时间
}

// ==========================================
// StudentDemand - 待分班需求
// ==========================================
// 同课程内的消费顺序为 FIFO (created_at 升序, demand_id 兜底)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentDemand {
    pub demand_id: String,         // 需求ID (即报名ID)
    pub student_id: String,        // 学员ID
    pub course_id: String,         // 课程ID
    pub period_id: String,         // 目标学期
    pub created_at: NaiveDateTime, // 审核通过时间
}
