// ==========================================
// Lecturna 编程学校教务系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 开班决策支持 (人工最终控制权)
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 评审暂存 - 撮合结果的人工评审状态
pub mod staging;

// 导入层 - 外部名册数据
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施(连接初始化/PRAGMA 统一)
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 装配与宿主集成
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    ClassStatus, EnrollmentStatus, PeriodRole, ReportKind, Shift, SlotStatus, SubmitMode, Weekday,
};

// 领域实体
pub use domain::{
    Assessment, ClassDetail, ClassProposal, ClassRecord, ClassSession, Course, Instructor, Period,
    ScoreWeights, SessionReport, Student, StudentDemand,
};
pub use domain::InstructorAvailability;

// 引擎
pub use engine::{
    ClassCodeGenerator, ClassFormationPlanner, DeadlineGate, DeadlineWindows, FormationInput,
    FormationOutcome, PeriodResolver, ScoringEngine, SessionDateResolver,
};

// 评审暂存
pub use staging::FormationStaging;

// API
pub use api::{ApiError, ApiResult, EnrollmentApi, FormationApi, ReportApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Lecturna 教务系统";

// ==========================================
// 预编译检查
// ==========================================
