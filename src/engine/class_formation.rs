// ==========================================
// Lecturna 教务系统 - 自动开班撮合引擎
// ==========================================
// 职责: 讲师可授时段与待分班需求的贪心撮合
// 输入: 两个有序池 + 既有班级计数 + 课程代码映射 + 班容量
// 输出: 开班提案列表 + 扣除已消费项的剩余池
// 红线: 无状态、无副作用、无 I/O,结果由输入顺序唯一决定
// ==========================================

use std::collections::HashMap;
use std::collections::VecDeque;

use tracing::instrument;

use crate::domain::class::ClassProposal;
use crate::domain::schedule::{InstructorAvailability, StudentDemand};
use crate::engine::class_code::ClassCodeGenerator;

// ==========================================
// FormationInput - 撮合输入快照
// ==========================================
// 两个池的顺序即消费顺序,由调用方按 created_at 升序取出
#[derive(Debug, Clone)]
pub struct FormationInput {
    pub availabilities: Vec<InstructorAvailability>,
    pub demands: Vec<StudentDemand>,
    pub existing_count_by_course: HashMap<String, u32>,
    pub course_code: HashMap<String, String>,
    pub class_size: usize,
}

// ==========================================
// FormationOutcome - 撮合结果
// ==========================================
// leftover_* 为未被消费的池子项,保持输入相对顺序
#[derive(Debug, Clone)]
pub struct FormationOutcome {
    pub proposals: Vec<ClassProposal>,
    pub leftover_slots: Vec<InstructorAvailability>,
    pub leftover_demands: Vec<StudentDemand>,
}

// ==========================================
// ClassFormationPlanner - 开班撮合引擎
// ==========================================
pub struct ClassFormationPlanner {
    // 无状态引擎,不需要注入依赖
}

impl ClassFormationPlanner {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 单趟贪心撮合
    ///
    /// 规则:
    /// 1) 需求按课程分队,队内 FIFO (先审核先分班)
    /// 2) 按输入顺序遍历时段;对每个时段按资质列表顺序找
    ///    第一个队列非空的课程 (first-fit,非 best-fit)
    /// 3) 从队首取 min(class_size, 队长) 个需求,生成一个提案;
    ///    每个时段单趟至多开一个班
    /// 4) 班级名称 = 课程代码 + 既有计数+1 (3 位补零),
    ///    计数在本趟内随提案递增
    /// 5) 资质课程全部空队的时段被跳过,留在剩余池中
    ///
    /// # 参数
    /// - `input`: 输入快照 (两个池 + 计数 + 代码映射 + 班容量)
    ///
    /// # 返回
    /// 提案列表与扣除已消费项的剩余池
    #[instrument(skip(self, input), fields(
        slots = input.availabilities.len(),
        demands = input.demands.len(),
        class_size = input.class_size
    ))]
    pub fn plan(&self, input: &FormationInput) -> FormationOutcome {
        let mut proposals: Vec<ClassProposal> = Vec::new();
        let mut leftover_slots: Vec<InstructorAvailability> = Vec::new();

        // 需求按课程分队,队列持有 demands 下标以便最终按输入顺序回收剩余项
        let mut queue_by_course: HashMap<&str, VecDeque<usize>> = HashMap::new();
        for (idx, demand) in input.demands.iter().enumerate() {
            queue_by_course
                .entry(demand.course_id.as_str())
                .or_default()
                .push_back(idx);
        }
        let mut consumed = vec![false; input.demands.len()];

        // 本趟内的班级命名计数,起点为库内既有班级数
        let mut count_by_course: HashMap<String, u32> =
            input.existing_count_by_course.clone();

        if input.class_size == 0 {
            // 容量为 0 时不产生任何提案,池子原样返回
            return FormationOutcome {
                proposals,
                leftover_slots: input.availabilities.clone(),
                leftover_demands: input.demands.clone(),
            };
        }

        for slot in &input.availabilities {
            let mut matched = false;

            for course_id in &slot.course_ids {
                let queue = match queue_by_course.get_mut(course_id.as_str()) {
                    Some(q) if !q.is_empty() => q,
                    _ => continue,
                };

                let code = match input.course_code.get(course_id) {
                    Some(c) if !c.is_empty() => c,
                    _ => {
                        // 缺失课程代码的课程无法命名,视同无需求
                        tracing::warn!(course_id = %course_id, "课程代码缺失,撮合时跳过该课程");
                        continue;
                    }
                };

                let take = input.class_size.min(queue.len());
                let mut demand_ids = Vec::with_capacity(take);
                let mut student_ids = Vec::with_capacity(take);
                for _ in 0..take {
                    // take <= queue.len() 保证 pop 不会失败
                    if let Some(idx) = queue.pop_front() {
                        consumed[idx] = true;
                        demand_ids.push(input.demands[idx].demand_id.clone());
                        student_ids.push(input.demands[idx].student_id.clone());
                    }
                }

                let existing = count_by_course.get(course_id).copied().unwrap_or(0);
                let name = ClassCodeGenerator::next_class_name(code, existing);
                count_by_course.insert(course_id.clone(), existing + 1);

                proposals.push(ClassProposal {
                    // 提案ID 仅用于评审期间定位,按产出顺序编号保持结果可复现
                    proposal_id: format!("prop-{:03}", proposals.len() + 1),
                    name,
                    course_id: course_id.clone(),
                    slot_id: slot.slot_id.clone(),
                    instructor_id: slot.instructor_id.clone(),
                    day: slot.day,
                    shift: slot.shift,
                    demand_ids,
                    student_ids,
                });

                // 每个时段单趟至多绑定一个课程
                matched = true;
                break;
            }

            if !matched {
                leftover_slots.push(slot.clone());
            }
        }

        let leftover_demands: Vec<StudentDemand> = input
            .demands
            .iter()
            .enumerate()
            .filter(|(idx, _)| !consumed[*idx])
            .map(|(_, d)| d.clone())
            .collect();

        tracing::debug!(
            proposals = proposals.len(),
            leftover_slots = leftover_slots.len(),
            leftover_demands = leftover_demands.len(),
            "开班撮合完成"
        );

        FormationOutcome {
            proposals,
            leftover_slots,
            leftover_demands,
        }
    }
}

impl Default for ClassFormationPlanner {
    fn default() -> Self {
        Self::new()
    }
}
