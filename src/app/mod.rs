// ==========================================
// Lecturna 教务系统 - 应用层
// ==========================================
// 职责: 应用装配与宿主集成
// ==========================================

pub mod state;

pub use state::AppState;

/// 默认数据库路径: <数据目录>/lecturna/lecturna.db
///
/// 数据目录不可用时回退到当前目录
pub fn get_default_db_path() -> String {
    let base = dirs::data_dir().unwrap_or_else(|| std::path::PathBuf::from("."));
    let dir = base.join("lecturna");
    if let Err(e) = std::fs::create_dir_all(&dir) {
        tracing::warn!("数据目录创建失败,回退到当前目录: {}", e);
        return "lecturna.db".to_string();
    }
    dir.join("lecturna.db").display().to_string()
}
