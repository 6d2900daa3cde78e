// ==========================================
// Lecturna 教务系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value, scope_id='global')
// ==========================================
// 配置键全集:
// - formation/class_size                默认 5
// - deadline/session_report_add_hours  默认 24
// - deadline/session_report_edit_hours 默认 192
// - deadline/assessment_add_hours      默认 336
// - deadline/assessment_edit_hours     默认 504
// - score/weights                      默认 {"exercise_pct":30,"project_pct":30,"exam_pct":40}
// ==========================================

use crate::domain::assessment::ScoreWeights;
use crate::engine::deadline::DeadlineWindows;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

/// 班容量默认值
pub const DEFAULT_CLASS_SIZE: usize = 5;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 从已有连接创建 ConfigManager
    ///
    /// 说明: 为保证连接行为一致,会对传入连接再次应用统一 PRAGMA(幂等)
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
            conn_guard.execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS config_kv (
                  scope_id TEXT NOT NULL DEFAULT 'global',
                  key TEXT NOT NULL,
                  value TEXT NOT NULL,
                  updated_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime')),
                  PRIMARY KEY (scope_id, key)
                );
                "#,
            )?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值 (scope_id='global')
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 从 config_kv 表读取配置值,带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    fn get_i64_or_default(&self, key: &str, default: i64) -> Result<i64, Box<dyn Error>> {
        let raw = self.get_config_or_default(key, &default.to_string())?;
        raw.trim()
            .parse::<i64>()
            .map_err(|e| format!("配置值解析失败 (key={}): {}", key, e).into())
    }

    /// 覆写配置值 (scope_id='global')
    pub fn update_config(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES ('global', ?1, ?2, datetime('now', 'localtime'))
            ON CONFLICT(scope_id, key) DO UPDATE
              SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    /// 全量配置 (key 升序)
    pub fn list_configs(&self) -> Result<HashMap<String, String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows.into_iter().collect())
    }

    /// 当前生效配置的 JSON 快照 (缺省键回落默认值)
    pub fn snapshot_json(&self) -> Result<String, Box<dyn Error>> {
        let weights = self.get_score_weights()?;
        let windows = self.get_deadline_windows()?;
        let snapshot = json!({
            "formation": { "class_size": self.get_class_size()? },
            "deadline": {
                "session_report_add_hours": windows.session_report_add_hours,
                "session_report_edit_hours": windows.session_report_edit_hours,
                "assessment_add_hours": windows.assessment_add_hours,
                "assessment_edit_hours": windows.assessment_edit_hours,
            },
            "score": { "weights": weights },
        });
        Ok(snapshot.to_string())
    }

    // ==========================================
    // 类型化取值
    // ==========================================

    /// 班容量 (默认 5)
    pub fn get_class_size(&self) -> Result<usize, Box<dyn Error>> {
        let v = self.get_i64_or_default("formation/class_size", DEFAULT_CLASS_SIZE as i64)?;
        if v < 0 {
            return Err(format!("班容量不可为负: {}", v).into());
        }
        Ok(v as usize)
    }

    /// 填报窗口 (默认 24/192/336/504 小时)
    pub fn get_deadline_windows(&self) -> Result<DeadlineWindows, Box<dyn Error>> {
        let defaults = DeadlineWindows::default();
        Ok(DeadlineWindows {
            session_report_add_hours: self.get_i64_or_default(
                "deadline/session_report_add_hours",
                defaults.session_report_add_hours,
            )?,
            session_report_edit_hours: self.get_i64_or_default(
                "deadline/session_report_edit_hours",
                defaults.session_report_edit_hours,
            )?,
            assessment_add_hours: self
                .get_i64_or_default("deadline/assessment_add_hours", defaults.assessment_add_hours)?,
            assessment_edit_hours: self.get_i64_or_default(
                "deadline/assessment_edit_hours",
                defaults.assessment_edit_hours,
            )?,
        })
    }

    /// 计分权重 (默认 30/30/40)
    pub fn get_score_weights(&self) -> Result<ScoreWeights, Box<dyn Error>> {
        match self.get_config_value("score/weights")? {
            Some(raw) => {
                let weights: ScoreWeights = serde_json::from_str(&raw)?;
                Ok(weights)
            }
            None => Ok(ScoreWeights::default()),
        }
    }
}
