// ==========================================
// Lecturna 教务系统 - 领域类型定义
// ==========================================
// 职责: 定义跨模块共享的枚举类型
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 星期 (Weekday)
// ==========================================
// ISO 编号: 1=周一 ... 7=周日
// 可用时段与课次日期推导共用
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// 从 ISO 编号构造 (1..=7)
    pub fn from_id(id: u8) -> Option<Weekday> {
        match id {
            1 => Some(Weekday::Monday),
            2 => Some(Weekday::Tuesday),
            3 => Some(Weekday::Wednesday),
            4 => Some(Weekday::Thursday),
            5 => Some(Weekday::Friday),
            6 => Some(Weekday::Saturday),
            7 => Some(Weekday::Sunday),
            _ => None,
        }
    }

    /// ISO 编号 (1..=7)
    pub fn to_id(self) -> u8 {
        match self {
            Weekday::Monday => 1,
            Weekday::Tuesday => 2,
            Weekday::Wednesday => 3,
            Weekday::Thursday => 4,
            Weekday::Friday => 5,
            Weekday::Saturday => 6,
            Weekday::Sunday => 7,
        }
    }

    /// 与 chrono 的 weekday 编号对齐 (number_from_monday)
    pub fn from_chrono(wd: chrono::Weekday) -> Weekday {
        // number_from_monday 保证 1..=7，此处不会失败
        Weekday::from_id(wd.number_from_monday() as u8).unwrap_or(Weekday::Monday)
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Weekday::Monday => write!(f, "MONDAY"),
            Weekday::Tuesday => write!(f, "TUESDAY"),
            Weekday::Wednesday => write!(f, "WEDNESDAY"),
            Weekday::Thursday => write!(f, "THURSDAY"),
            Weekday::Friday => write!(f, "FRIDAY"),
            Weekday::Saturday => write!(f, "SATURDAY"),
            Weekday::Sunday => write!(f, "SUNDAY"),
        }
    }
}

// ==========================================
// 授课时段 (Shift)
// ==========================================
// 固定四个时段,起止时间为墙钟时间
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Shift {
    S1, // 08:00-10:00
    S2, // 10:30-12:30
    S3, // 14:00-16:00
    S4, // 19:00-21:00
}

impl Shift {
    /// 时段起始时间 (时, 分)
    pub fn start_hm(self) -> (u32, u32) {
        match self {
            Shift::S1 => (8, 0),
            Shift::S2 => (10, 30),
            Shift::S3 => (14, 0),
            Shift::S4 => (19, 0),
        }
    }

    /// 时段结束时间 (时, 分)
    pub fn end_hm(self) -> (u32, u32) {
        match self {
            Shift::S1 => (10, 0),
            Shift::S2 => (12, 30),
            Shift::S3 => (16, 0),
            Shift::S4 => (21, 0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Shift::S1 => "S1",
            Shift::S2 => "S2",
            Shift::S3 => "S3",
            Shift::S4 => "S4",
        }
    }

    pub fn parse(s: &str) -> Option<Shift> {
        match s.trim().to_uppercase().as_str() {
            "S1" => Some(Shift::S1),
            "S2" => Some(Shift::S2),
            "S3" => Some(Shift::S3),
            "S4" => Some(Shift::S4),
            _ => None,
        }
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 报名状态 (Enrollment Status)
// ==========================================
// PENDING -> APPROVED -> PLACED
//         -> REJECTED
// 待分班需求 = APPROVED 且未 PLACED 的投影
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrollmentStatus {
    Pending,  // 待审核
    Approved, // 已审核,待分班
    Placed,   // 已分班
    Rejected, // 已驳回
}

impl EnrollmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollmentStatus::Pending => "PENDING",
            EnrollmentStatus::Approved => "APPROVED",
            EnrollmentStatus::Placed => "PLACED",
            EnrollmentStatus::Rejected => "REJECTED",
        }
    }

    pub fn parse(s: &str) -> EnrollmentStatus {
        match s.trim().to_uppercase().as_str() {
            "APPROVED" => EnrollmentStatus::Approved,
            "PLACED" => EnrollmentStatus::Placed,
            "REJECTED" => EnrollmentStatus::Rejected,
            _ => EnrollmentStatus::Pending,
        }
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 时段状态 (Slot Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotStatus {
    Open,     // 未分配
    Assigned, // 已绑定到班级
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotStatus::Open => "OPEN",
            SlotStatus::Assigned => "ASSIGNED",
        }
    }

    pub fn parse(s: &str) -> SlotStatus {
        match s.trim().to_uppercase().as_str() {
            "ASSIGNED" => SlotStatus::Assigned,
            _ => SlotStatus::Open,
        }
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 班级状态 (Class Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClassStatus {
    Planned,   // 已开班,未开课
    Active,    // 授课中
    Completed, // 已结课
}

impl ClassStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassStatus::Planned => "PLANNED",
            ClassStatus::Active => "ACTIVE",
            ClassStatus::Completed => "COMPLETED",
        }
    }

    pub fn parse(s: &str) -> ClassStatus {
        match s.trim().to_uppercase().as_str() {
            "ACTIVE" => ClassStatus::Active,
            "COMPLETED" => ClassStatus::Completed,
            _ => ClassStatus::Planned,
        }
    }
}

impl fmt::Display for ClassStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 学期角色 (Period Role)
// ==========================================
// 由 PeriodResolver 推导,不落库
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeriodRole {
    Current, // 进行中的学期
    Next,    // 下一个学期 (排班目标)
}

impl fmt::Display for PeriodRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodRole::Current => write!(f, "CURRENT"),
            PeriodRole::Next => write!(f, "NEXT"),
        }
    }
}

// ==========================================
// 填报类别 (Report Kind)
// ==========================================
// 课次纪要与结课测评共用同一套截止闸门
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportKind {
    SessionReport, // 课次纪要
    Assessment,    // 结课测评
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportKind::SessionReport => write!(f, "SESSION_REPORT"),
            ReportKind::Assessment => write!(f, "ASSESSMENT"),
        }
    }
}

// ==========================================
// 填报方式 (Submit Mode)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmitMode {
    Add,  // 首次填报
    Edit, // 修改已有填报
}

impl fmt::Display for SubmitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitMode::Add => write!(f, "ADD"),
            SubmitMode::Edit => write!(f, "EDIT"),
        }
    }
}
