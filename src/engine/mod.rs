// ==========================================
// Lecturna 教务系统 - 引擎层
// ==========================================
// 职责: 实现业务规则引擎,不拼 SQL
// 红线: Engine 不拼 SQL, 所有拒绝必须输出 reason
// ==========================================

pub mod class_code;
pub mod class_formation;
pub mod deadline;
pub mod period_resolver;
pub mod scoring;
pub mod session_dates;

// 重导出核心引擎
pub use class_code::ClassCodeGenerator;
pub use class_formation::{ClassFormationPlanner, FormationInput, FormationOutcome};
pub use deadline::{DeadlineGate, DeadlineVerdict, DeadlineWindows};
pub use period_resolver::{PeriodResolver, ResolvedPeriods};
pub use scoring::ScoringEngine;
pub use session_dates::SessionDateResolver;
