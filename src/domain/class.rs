// ==========================================
// Lecturna 教务系统 - 班级领域模型
// ==========================================
// ClassProposal 为规划引擎的内存产物,未落库;
// ClassRecord / ClassSession 为确认提交后的持久化实体
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::{ClassStatus, Shift, Weekday};

// ==========================================
// ClassProposal - 开班提案
// ==========================================
// 不变式: 1 <= student_ids.len() <= class_size
// (零人撮合不产生提案)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassProposal {
    pub proposal_id: String,      // 提案ID (按产出顺序编号, 仅用于评审期间定位)
    pub name: String,             // 班级名称 (如 "COL001")
    pub course_id: String,        // 课程ID
    pub slot_id: String,          // 占用的讲师时段
    pub instructor_id: String,    // 讲师ID
    pub day: Weekday,             // 星期
    pub shift: Shift,             // 时段
    pub demand_ids: Vec<String>,  // 吸纳的需求 (有序, FIFO)
    pub student_ids: Vec<String>, // 对应学员 (与 demand_ids 等长同序)
}

// ==========================================
// ClassRecord - 班级
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassRecord {
    pub class_id: String,          // 班级ID
    pub name: String,              // 班级名称 (学期内唯一)
    pub course_id: String,         // 课程ID
    pub period_id: String,         // 学期ID
    pub instructor_id: String,     // 讲师ID
    pub slot_id: String,           // 来源时段
    pub day: Weekday,              // 星期
    pub shift: Shift,              // 时段
    pub status: ClassStatus,       // 状态
    pub created_at: NaiveDateTime, // 创建时间
}

// ==========================================
// ClassSession - 课次
// ==========================================
// seq_no 从 1 起;日期由学期起始日向前走到首个匹配星期,
// 之后每次 +7 天
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassSession {
    pub session_id: String,         // 课次ID
    pub class_id: String,           // 班级ID
    pub seq_no: i32,                // 课次序号 (1 起)
    pub session_date: NaiveDate,    // 上课日期
    pub starts_at: NaiveDateTime,   // 开始时间
    pub ends_at: NaiveDateTime,     // 结束时间
}

// ==========================================
// ClassDetail - 班级详情 (查询聚合)
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDetail {
    pub class: ClassRecord,
    pub student_ids: Vec<String>,   // 成员 (入班顺序)
    pub sessions: Vec<ClassSession>, // 课次 (seq_no 升序)
}
