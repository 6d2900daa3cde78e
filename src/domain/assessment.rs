// ==========================================
// Lecturna 教务系统 - 填报与测评领域模型
// ==========================================
// 课次纪要由讲师按课次填报;结课测评按学员计分,
// 加权总分由 ScoringEngine 计算后落库
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// SessionReport - 课次纪要
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub report_id: String,          // 纪要ID
    pub session_id: String,         // 课次ID
    pub instructor_id: String,      // 填报讲师
    pub summary: String,            // 内容纪要
    pub submitted_at: NaiveDateTime, // 首次填报时间
    pub updated_at: NaiveDateTime,  // 最近修改时间
}

// ==========================================
// Assessment - 结课测评
// ==========================================
// 三项分项成绩均为 0..=100
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    pub assessment_id: String,      // 测评ID
    pub class_id: String,           // 班级ID
    pub student_id: String,         // 学员ID
    pub exercise_score: f64,        // 练习分
    pub project_score: f64,         // 项目分
    pub exam_score: f64,            // 考试分
    pub weighted_total: f64,        // 加权总分 (引擎计算, 两位小数)
    pub graded_at: NaiveDateTime,   // 首次评分时间
    pub updated_at: NaiveDateTime,  // 最近修改时间
}

// ==========================================
// ScoreWeights - 计分权重
// ==========================================
// 三项权重百分比之和必须为 100
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub exercise_pct: u32, // 练习权重
    pub project_pct: u32,  // 项目权重
    pub exam_pct: u32,     // 考试权重
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            exercise_pct: 30,
            project_pct: 30,
            exam_pct: 40,
        }
    }
}
