// ==========================================
// Lecturna 教务系统 - 计分引擎
// ==========================================
// 职责: 结课测评加权总分计算与权重/分项校验
// 红线: 无状态、无副作用,拒绝必须输出 reason
// ==========================================

use crate::domain::assessment::ScoreWeights;

// ==========================================
// ScoringEngine - 纯函数工具类
// ==========================================
pub struct ScoringEngine;

impl ScoringEngine {
    /// 校验权重配置: 三项之和必须为 100
    pub fn validate_weights(weights: &ScoreWeights) -> Result<(), String> {
        let sum = weights.exercise_pct + weights.project_pct + weights.exam_pct;
        if sum != 100 {
            return Err(format!(
                "权重之和必须为 100, 实际 {} (exercise={}, project={}, exam={})",
                sum, weights.exercise_pct, weights.project_pct, weights.exam_pct
            ));
        }
        Ok(())
    }

    /// 校验分项成绩: 各项 0..=100
    pub fn validate_scores(exercise: f64, project: f64, exam: f64) -> Result<(), String> {
        for (label, score) in [("exercise", exercise), ("project", project), ("exam", exam)] {
            if !score.is_finite() || !(0.0..=100.0).contains(&score) {
                return Err(format!("分项成绩越界 (field={}): {}", label, score));
            }
        }
        Ok(())
    }

    /// 加权总分 = Σ(分项 × 权重%) / 100,保留两位小数
    pub fn weighted_total(exercise: f64, project: f64, exam: f64, weights: &ScoreWeights) -> f64 {
        let total = (exercise * weights.exercise_pct as f64
            + project * weights.project_pct as f64
            + exam * weights.exam_pct as f64)
            / 100.0;
        (total * 100.0).round() / 100.0
    }
}
