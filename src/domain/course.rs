// ==========================================
// Lecturna 教务系统 - 课程领域模型
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// Course - 课程
// ==========================================
// code 为人工录入的课程代码,班级命名取其规范化前缀
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub course_id: String,         // 课程ID
    pub code: String,              // 课程代码 (人工录入, 如 "COL-101")
    pub name: String,              // 课程名称
    pub level: i32,                // 难度等级 (1 起)
    pub session_count: i32,        // 计划课次数
    pub created_at: NaiveDateTime, // 创建时间
    pub updated_at: NaiveDateTime, // 更新时间
}
