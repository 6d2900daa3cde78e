// ==========================================
// Lecturna 教务系统 - 开班评审暂存
// ==========================================
// 职责: 承载一次撮合结果供人工评审 (改名/删提案/移除学员)
// 形态: 可序列化的显式状态结构 + 纯转移函数,宿主负责保管;
//       不使用进程级单例
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::class::ClassProposal;
use crate::domain::schedule::{InstructorAvailability, StudentDemand};
use crate::engine::class_formation::FormationOutcome;

// ==========================================
// FormationStaging - 评审暂存状态
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormationStaging {
    pub period_id: String,                          // 目标学期
    pub class_size: usize,                          // 本次撮合使用的班容量
    pub proposals: Vec<ClassProposal>,              // 待评审提案
    pub leftover_demands: Vec<StudentDemand>,       // 未撮合需求 (规范顺序)
    pub leftover_slots: Vec<InstructorAvailability>, // 未撮合时段
    pub generated_at: NaiveDateTime,                // 快照生成时间
}

impl FormationStaging {
    /// 由撮合结果构建暂存状态
    pub fn from_outcome(
        period_id: &str,
        class_size: usize,
        outcome: FormationOutcome,
        generated_at: NaiveDateTime,
    ) -> Self {
        Self {
            period_id: period_id.to_string(),
            class_size,
            proposals: outcome.proposals,
            leftover_demands: outcome.leftover_demands,
            leftover_slots: outcome.leftover_slots,
            generated_at,
        }
    }

    /// 删除整个提案,其需求与时段退回剩余池
    pub fn remove_proposal(&mut self, proposal_id: &str) -> Result<(), String> {
        let pos = self
            .proposals
            .iter()
            .position(|p| p.proposal_id == proposal_id)
            .ok_or_else(|| format!("提案不存在: {}", proposal_id))?;
        let proposal = self.proposals.remove(pos);

        for (demand_id, student_id) in proposal
            .demand_ids
            .iter()
            .zip(proposal.student_ids.iter())
        {
            self.leftover_demands.push(StudentDemand {
                demand_id: demand_id.clone(),
                student_id: student_id.clone(),
                course_id: proposal.course_id.clone(),
                period_id: self.period_id.clone(),
                // 快照不回携原始审核时间,退回项以暂存生成时间近似;
                // 重新排序以 demand_id 兜底保持确定性
                created_at: self.generated_at,
            });
        }
        self.normalize_leftovers();

        self.leftover_slots.push(InstructorAvailability {
            slot_id: proposal.slot_id.clone(),
            instructor_id: proposal.instructor_id.clone(),
            period_id: self.period_id.clone(),
            day: proposal.day,
            shift: proposal.shift,
            course_ids: vec![proposal.course_id.clone()],
            status: crate::domain::types::SlotStatus::Open,
            created_at: self.generated_at,
        });
        Ok(())
    }

    /// 从提案中移除单个学员,其需求退回剩余池
    ///
    /// 提案可被清空;空提案在 commit_set 中被剔除
    pub fn remove_student(&mut self, proposal_id: &str, demand_id: &str) -> Result<(), String> {
        let proposal = self
            .proposals
            .iter_mut()
            .find(|p| p.proposal_id == proposal_id)
            .ok_or_else(|| format!("提案不存在: {}", proposal_id))?;
        let pos = proposal
            .demand_ids
            .iter()
            .position(|d| d == demand_id)
            .ok_or_else(|| format!("提案 {} 中无此需求: {}", proposal_id, demand_id))?;

        let student_id = proposal.student_ids.remove(pos);
        proposal.demand_ids.remove(pos);

        let course_id = proposal.course_id.clone();
        let period_id = self.period_id.clone();
        let generated_at = self.generated_at;
        self.leftover_demands.push(StudentDemand {
            demand_id: demand_id.to_string(),
            student_id,
            course_id,
            period_id,
            created_at: generated_at,
        });
        self.normalize_leftovers();
        Ok(())
    }

    /// 重命名提案
    pub fn rename_proposal(&mut self, proposal_id: &str, name: &str) -> Result<(), String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err("班级名称不能为空".to_string());
        }
        let proposal = self
            .proposals
            .iter_mut()
            .find(|p| p.proposal_id == proposal_id)
            .ok_or_else(|| format!("提案不存在: {}", proposal_id))?;
        proposal.name = trimmed.to_string();
        Ok(())
    }

    /// 可提交的提案集合: 至少 1 名学员,保持产出顺序
    pub fn commit_set(&self) -> Vec<&ClassProposal> {
        self.proposals
            .iter()
            .filter(|p| !p.demand_ids.is_empty())
            .collect()
    }

    /// 剩余池规范顺序: created_at 升序, demand_id 兜底
    fn normalize_leftovers(&mut self) {
        self.leftover_demands
            .sort_by(|a, b| (a.created_at, &a.demand_id).cmp(&(b.created_at, &b.demand_id)));
    }
}
