// ==========================================
// Lecturna 教务系统 - 学期领域模型
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// Period - 学期
// ==========================================
// 约束: 学期之间不重叠, start_date <= end_date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Period {
    pub period_id: String,         // 学期ID
    pub name: String,              // 学期名称 (如 "2026Q3")
    pub start_date: NaiveDate,     // 起始日期
    pub end_date: NaiveDate,       // 结束日期
    pub created_at: NaiveDateTime, // 创建时间
}

impl Period {
    /// 判断某日期是否落在本学期内 (闭区间)
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}
