// ==========================================
// Lecturna 教务系统 - 人员领域模型
// ==========================================
// 讲师与学员;身份认证由外部系统负责,此处只存档案
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// Instructor - 讲师
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instructor {
    pub instructor_id: String,     // 讲师ID
    pub name: String,              // 姓名
    pub email: String,             // 邮箱 (唯一)
    pub active: bool,              // 是否在职
    pub created_at: NaiveDateTime, // 创建时间
    pub updated_at: NaiveDateTime, // 更新时间
}

// ==========================================
// Student - 学员
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub student_id: String,        // 学员ID
    pub name: String,              // 姓名
    pub email: String,             // 邮箱 (唯一, 名册导入按邮箱去重)
    pub active: bool,              // 是否在读
    pub created_at: NaiveDateTime, // 创建时间
    pub updated_at: NaiveDateTime, // 更新时间
}
