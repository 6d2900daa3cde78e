// ==========================================
// ClassFormationPlanner 引擎集成测试
// ==========================================
// 测试目标: 验证贪心撮合逻辑
// 覆盖范围: 容量约束、FIFO、first-fit、命名、剩余池
// ==========================================

use chrono::{Duration, NaiveDate, NaiveDateTime};
use lecturna::domain::schedule::{InstructorAvailability, StudentDemand};
use lecturna::domain::types::{Shift, SlotStatus, Weekday};
use lecturna::engine::class_formation::{ClassFormationPlanner, FormationInput};

// ==========================================
// 测试辅助函数
// ==========================================

fn base_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 8, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

/// 创建测试用的讲师时段 (created_at 按序号递增保持输入顺序语义)
fn slot(id: &str, seq: i64, course_ids: &[&str]) -> InstructorAvailability {
    InstructorAvailability {
        slot_id: id.to_string(),
        instructor_id: format!("instructor-{}", id),
        period_id: "2026Q4".to_string(),
        day: Weekday::Monday,
        shift: Shift::S1,
        course_ids: course_ids.iter().map(|s| s.to_string()).collect(),
        status: SlotStatus::Open,
        created_at: base_time() + Duration::minutes(seq),
    }
}

/// 创建测试用的待分班需求
fn demand(id: &str, seq: i64, course_id: &str) -> StudentDemand {
    StudentDemand {
        demand_id: id.to_string(),
        student_id: format!("student-{}", id),
        course_id: course_id.to_string(),
        period_id: "2026Q4".to_string(),
        created_at: base_time() + Duration::minutes(seq),
    }
}

fn input(
    availabilities: Vec<InstructorAvailability>,
    demands: Vec<StudentDemand>,
    existing: &[(&str, u32)],
    codes: &[(&str, &str)],
    class_size: usize,
) -> FormationInput {
    FormationInput {
        availabilities,
        demands,
        existing_count_by_course: existing
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect(),
        course_code: codes
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        class_size,
    }
}

// ==========================================
// 典型场景
// ==========================================

#[test]
fn test_six_demands_two_slots_scenario() {
    // A1 只会 C1;A2 会 C1/C2;C1 六条需求,班容量 5
    // 预期: A1 -> COL001 (S1..S5), A2 -> COL002 (S6),C2 永远轮不到
    let planner = ClassFormationPlanner::new();
    let availabilities = vec![slot("A1", 0, &["C1"]), slot("A2", 1, &["C1", "C2"])];
    let demands = (1..=6).map(|i| demand(&format!("S{}", i), i, "C1")).collect();
    let outcome = planner.plan(&input(
        availabilities,
        demands,
        &[("C1", 0)],
        &[("C1", "COL"), ("C2", "PYB")],
        5,
    ));

    assert_eq!(outcome.proposals.len(), 2);

    let first = &outcome.proposals[0];
    assert_eq!(first.name, "COL001");
    assert_eq!(first.slot_id, "A1");
    assert_eq!(
        first.demand_ids,
        vec!["S1", "S2", "S3", "S4", "S5"]
    );

    let second = &outcome.proposals[1];
    assert_eq!(second.name, "COL002");
    assert_eq!(second.slot_id, "A2");
    assert_eq!(second.course_id, "C1");
    assert_eq!(second.demand_ids, vec!["S6"]);

    assert!(outcome.leftover_demands.is_empty());
    assert!(outcome.leftover_slots.is_empty());
}

#[test]
fn test_slot_with_no_matching_demand_stays_open() {
    let planner = ClassFormationPlanner::new();
    let availabilities = vec![slot("A1", 0, &["C9"])];
    let demands = vec![demand("S1", 1, "C1")];
    let outcome = planner.plan(&input(
        availabilities,
        demands,
        &[],
        &[("C1", "COL"), ("C9", "RBT")],
        5,
    ));

    assert!(outcome.proposals.is_empty());
    assert_eq!(outcome.leftover_slots.len(), 1);
    assert_eq!(outcome.leftover_slots[0].slot_id, "A1");
    assert_eq!(outcome.leftover_demands.len(), 1);
}

// ==========================================
// 不变式
// ==========================================

#[test]
fn test_capacity_bound_and_uniqueness() {
    let planner = ClassFormationPlanner::new();
    let availabilities = vec![
        slot("A1", 0, &["C1", "C2"]),
        slot("A2", 1, &["C2"]),
        slot("A3", 2, &["C1"]),
    ];
    let mut demands = Vec::new();
    for i in 0..7 {
        demands.push(demand(&format!("D1-{}", i), i, "C1"));
    }
    for i in 0..4 {
        demands.push(demand(&format!("D2-{}", i), 10 + i, "C2"));
    }
    let outcome = planner.plan(&input(
        availabilities,
        demands,
        &[],
        &[("C1", "COL"), ("C2", "PYB")],
        3,
    ));

    // 每班不超过容量
    for proposal in &outcome.proposals {
        assert!(proposal.demand_ids.len() <= 3);
        assert!(!proposal.demand_ids.is_empty());
    }

    // 每个时段至多出现一次
    let mut slot_ids: Vec<&str> = outcome.proposals.iter().map(|p| p.slot_id.as_str()).collect();
    slot_ids.sort_unstable();
    slot_ids.dedup();
    assert_eq!(slot_ids.len(), outcome.proposals.len());

    // 每条需求至多被消费一次,且与剩余池无交集
    let mut consumed: Vec<&str> = outcome
        .proposals
        .iter()
        .flat_map(|p| p.demand_ids.iter().map(String::as_str))
        .collect();
    let consumed_total = consumed.len();
    consumed.sort_unstable();
    consumed.dedup();
    assert_eq!(consumed.len(), consumed_total);
    for leftover in &outcome.leftover_demands {
        assert!(!consumed.contains(&leftover.demand_id.as_str()));
    }
    assert_eq!(consumed_total + outcome.leftover_demands.len(), 11);
}

#[test]
fn test_fifo_within_course_queue() {
    // 同课程需求按输入顺序消费: 先到的永远不会被后到的越过
    let planner = ClassFormationPlanner::new();
    let availabilities = vec![slot("A1", 0, &["C1"]), slot("A2", 1, &["C1"])];
    let demands = (1..=5).map(|i| demand(&format!("S{}", i), i, "C1")).collect();
    let outcome = planner.plan(&input(availabilities, demands, &[], &[("C1", "COL")], 3));

    assert_eq!(outcome.proposals.len(), 2);
    assert_eq!(outcome.proposals[0].demand_ids, vec!["S1", "S2", "S3"]);
    assert_eq!(outcome.proposals[1].demand_ids, vec!["S4", "S5"]);
}

#[test]
fn test_first_fit_course_order_on_slot() {
    // 资质列表顺序决定撮合: C2 在前且有需求时,C1 需求再多也轮不到
    let planner = ClassFormationPlanner::new();
    let availabilities = vec![slot("A1", 0, &["C2", "C1"])];
    let demands = vec![
        demand("S1", 1, "C1"),
        demand("S2", 2, "C1"),
        demand("S3", 3, "C2"),
    ];
    let outcome = planner.plan(&input(
        availabilities,
        demands,
        &[],
        &[("C1", "COL"), ("C2", "PYB")],
        5,
    ));

    assert_eq!(outcome.proposals.len(), 1);
    assert_eq!(outcome.proposals[0].course_id, "C2");
    assert_eq!(outcome.proposals[0].name, "PYB001");
    assert_eq!(outcome.leftover_demands.len(), 2);
}

// ==========================================
// 命名与边界
// ==========================================

#[test]
fn test_naming_continues_from_existing_count() {
    let planner = ClassFormationPlanner::new();
    let availabilities = vec![slot("A1", 0, &["C1"]), slot("A2", 1, &["C1"])];
    let demands = vec![
        demand("S1", 1, "C1"),
        demand("S2", 2, "C1"),
        demand("S3", 3, "C1"),
    ];
    let outcome = planner.plan(&input(
        availabilities,
        demands,
        &[("C1", 11)],
        &[("C1", "COL")],
        2,
    ));

    assert_eq!(outcome.proposals[0].name, "COL012");
    assert_eq!(outcome.proposals[1].name, "COL013");
}

#[test]
fn test_zero_class_size_produces_nothing() {
    let planner = ClassFormationPlanner::new();
    let availabilities = vec![slot("A1", 0, &["C1"])];
    let demands = vec![demand("S1", 1, "C1")];
    let outcome = planner.plan(&input(availabilities, demands, &[], &[("C1", "COL")], 0));

    assert!(outcome.proposals.is_empty());
    assert_eq!(outcome.leftover_slots.len(), 1);
    assert_eq!(outcome.leftover_demands.len(), 1);
}

#[test]
fn test_course_without_code_is_skipped() {
    // 课程代码缺失时该课程视同无需求,时段退回剩余池
    let planner = ClassFormationPlanner::new();
    let availabilities = vec![slot("A1", 0, &["C1"])];
    let demands = vec![demand("S1", 1, "C1")];
    let outcome = planner.plan(&input(availabilities, demands, &[], &[], 5));

    assert!(outcome.proposals.is_empty());
    assert_eq!(outcome.leftover_slots.len(), 1);
    assert_eq!(outcome.leftover_demands.len(), 1);
}

#[test]
fn test_deterministic_across_runs() {
    // 相同输入两次运行产出完全一致
    let planner = ClassFormationPlanner::new();
    let make = || {
        input(
            vec![slot("A1", 0, &["C1", "C2"]), slot("A2", 1, &["C2"])],
            vec![
                demand("S1", 1, "C2"),
                demand("S2", 2, "C1"),
                demand("S3", 3, "C2"),
            ],
            &[("C2", 1)],
            &[("C1", "COL"), ("C2", "PYB")],
            2,
        )
    };
    let first = planner.plan(&make());
    let second = planner.plan(&make());

    assert_eq!(first.proposals.len(), second.proposals.len());
    for (a, b) in first.proposals.iter().zip(second.proposals.iter()) {
        assert_eq!(a.proposal_id, b.proposal_id);
        assert_eq!(a.name, b.name);
        assert_eq!(a.demand_ids, b.demand_ids);
    }
}
