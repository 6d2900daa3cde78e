// ==========================================
// Lecturna 教务系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::api::{EnrollmentApi, FormationApi, ReportApi};
use crate::config::ConfigManager;
use crate::importer::RosterImporter;
use crate::repository::{
    AvailabilityRepository, ClassRepository, CourseRepository, EnrollmentRepository,
    InstructorRepository, PeriodRepository, ReportRepository, StudentRepository,
};

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 配置管理器
    pub config: Arc<ConfigManager>,

    /// 入驻与报名API
    pub enrollment_api: Arc<EnrollmentApi>,

    /// 开班规划API
    pub formation_api: Arc<FormationApi>,

    /// 填报API
    pub report_api: Arc<ReportApi>,

    /// 名册导入器
    pub roster_importer: Arc<RosterImporter>,

    /// 课程仓储 (课程建档用)
    pub course_repo: Arc<CourseRepository>,

    /// 学期仓储 (学期建档用)
    pub period_repo: Arc<PeriodRepository>,

    /// 讲师仓储
    pub instructor_repo: Arc<InstructorRepository>,

    /// 学员仓储
    pub student_repo: Arc<StudentRepository>,

    /// 讲师时段仓储
    pub availability_repo: Arc<AvailabilityRepository>,

    /// 报名仓储
    pub enrollment_repo: Arc<EnrollmentRepository>,

    /// 班级仓储 (班级查询用)
    pub class_repo: Arc<ClassRepository>,

    /// 填报仓储
    pub report_repo: Arc<ReportRepository>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// 该方法会:
    /// 1. 打开数据库连接并应用统一 PRAGMA
    /// 2. 按外键依赖顺序初始化所有Repository (自带建表引导)
    /// 3. 创建所有API实例
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState,数据库路径: {}", db_path);

        let conn: Connection = crate::db::open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        if let Err(e) = crate::db::stamp_schema_version(&conn) {
            tracing::warn!("schema_version 写入失败(将继续启动): {}", e);
        }
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层 (父表在前)
        // ==========================================
        let instructor_repo = Arc::new(
            InstructorRepository::from_connection(Arc::clone(&conn))
                .map_err(|e| format!("无法创建InstructorRepository: {}", e))?,
        );
        let student_repo = Arc::new(
            StudentRepository::from_connection(Arc::clone(&conn))
                .map_err(|e| format!("无法创建StudentRepository: {}", e))?,
        );
        let course_repo = Arc::new(
            CourseRepository::from_connection(Arc::clone(&conn))
                .map_err(|e| format!("无法创建CourseRepository: {}", e))?,
        );
        let period_repo = Arc::new(
            PeriodRepository::from_connection(Arc::clone(&conn))
                .map_err(|e| format!("无法创建PeriodRepository: {}", e))?,
        );
        let availability_repo = Arc::new(
            AvailabilityRepository::from_connection(Arc::clone(&conn))
                .map_err(|e| format!("无法创建AvailabilityRepository: {}", e))?,
        );
        let enrollment_repo = Arc::new(
            EnrollmentRepository::from_connection(Arc::clone(&conn))
                .map_err(|e| format!("无法创建EnrollmentRepository: {}", e))?,
        );
        let class_repo = Arc::new(
            ClassRepository::from_connection(Arc::clone(&conn))
                .map_err(|e| format!("无法创建ClassRepository: {}", e))?,
        );
        let report_repo = Arc::new(
            ReportRepository::from_connection(Arc::clone(&conn))
                .map_err(|e| format!("无法创建ReportRepository: {}", e))?,
        );

        // ==========================================
        // 配置层
        // ==========================================
        let config = Arc::new(
            ConfigManager::from_connection(Arc::clone(&conn))
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        // ==========================================
        // API层
        // ==========================================
        let enrollment_api = Arc::new(EnrollmentApi::new(
            Arc::clone(&student_repo),
            Arc::clone(&instructor_repo),
            Arc::clone(&course_repo),
            Arc::clone(&period_repo),
            Arc::clone(&enrollment_repo),
            Arc::clone(&availability_repo),
        ));
        let formation_api = Arc::new(FormationApi::new(
            Arc::clone(&period_repo),
            Arc::clone(&course_repo),
            Arc::clone(&availability_repo),
            Arc::clone(&enrollment_repo),
            Arc::clone(&class_repo),
            Arc::clone(&config),
        ));
        let report_api = Arc::new(ReportApi::new(
            Arc::clone(&class_repo),
            Arc::clone(&report_repo),
            Arc::clone(&config),
        ));
        let roster_importer = Arc::new(RosterImporter::new(
            Arc::clone(&student_repo),
            Arc::clone(&course_repo),
            Arc::clone(&enrollment_repo),
        ));

        tracing::info!("AppState初始化成功");

        Ok(Self {
            db_path,
            config,
            enrollment_api,
            formation_api,
            report_api,
            roster_importer,
            course_repo,
            period_repo,
            instructor_repo,
            student_repo,
            availability_repo,
            enrollment_repo,
            class_repo,
            report_repo,
        })
    }
}
