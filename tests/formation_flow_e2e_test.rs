// ==========================================
// 开班全流程端到端测试
// ==========================================
// 测试目标: 快照 -> 撮合 -> 评审暂存 -> 整批提交 -> 复查
// 覆盖范围: 课次日期物化、池子翻转、快照过期回滚
// ==========================================


use lecturna::api::ApiError;
use lecturna::domain::types::SlotStatus;
use test_helpers::*;

#[test]
fn test_full_formation_flow() {
    let (_db, state) = create_test_state();
    seed_default_period(&state);
    seed_course(&state, "C1", "COL-101", 2);

    // 周四 S1 时段,三条已审核需求
    let now = ts(2026, 8, 6, 10, 0);
    let (_instructor_id, slot_id) =
        seed_instructor_with_slot(&state, "t1@lecturna.dev", "2026Q4", 4, "S1", &["C1"], now);
    for i in 1..=3 {
        seed_approved_enrollment(
            &state,
            &format!("s{}@lecturna.dev", i),
            "C1",
            "2026Q4",
            ts(2026, 8, 6, 10, i),
        );
    }

    // 快照: 自动解析到下一学期 2026Q4
    let staging = state.formation_api.preview(None, None, now).unwrap();
    assert_eq!(staging.period_id, "2026Q4");
    assert_eq!(staging.class_size, 5);
    assert_eq!(staging.proposals.len(), 1);
    assert_eq!(staging.proposals[0].name, "COL001");
    assert_eq!(staging.proposals[0].student_ids.len(), 3);
    assert!(staging.leftover_demands.is_empty());

    // 提交
    let summary = state.formation_api.commit(&staging, now).unwrap();
    assert_eq!(summary.classes_created, 1);
    assert_eq!(summary.students_placed, 3);
    assert_eq!(summary.sessions_created, 2);

    // 班级与课次: 2026-10-01 恰为周四,首课即学期首日,次课 +7 天
    let classes = state.class_repo.list_by_period("2026Q4").unwrap();
    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0].name, "COL001");

    let detail = state
        .class_repo
        .find_detail(&summary.class_ids[0])
        .unwrap()
        .unwrap();
    assert_eq!(detail.student_ids.len(), 3);
    assert_eq!(detail.sessions.len(), 2);
    assert_eq!(detail.sessions[0].session_date, date(2026, 10, 1));
    assert_eq!(detail.sessions[1].session_date, date(2026, 10, 8));
    assert_eq!(
        detail.sessions[0].starts_at,
        date(2026, 10, 1).and_hms_opt(8, 0, 0).unwrap()
    );
    assert_eq!(
        detail.sessions[0].ends_at,
        date(2026, 10, 1).and_hms_opt(10, 0, 0).unwrap()
    );

    // 池子已翻转: 时段占用,需求清空
    let slot = state.availability_repo.find_by_id(&slot_id).unwrap().unwrap();
    assert_eq!(slot.status, SlotStatus::Assigned);
    let counts = state.formation_api.pending_counts("2026Q4").unwrap();
    assert_eq!(counts.open_slots, 0);
    assert_eq!(counts.pending_demands, 0);
}

#[test]
fn test_second_run_continues_naming() {
    let (_db, state) = create_test_state();
    seed_default_period(&state);
    seed_course(&state, "C1", "COL-101", 1);

    let now = ts(2026, 8, 6, 10, 0);
    seed_instructor_with_slot(&state, "t1@lecturna.dev", "2026Q4", 1, "S1", &["C1"], now);
    seed_approved_enrollment(&state, "s1@lecturna.dev", "C1", "2026Q4", now);

    let staging = state.formation_api.preview(None, None, now).unwrap();
    state.formation_api.commit(&staging, now).unwrap();

    // 第二批: 新时段 + 新需求,命名接续 COL002
    seed_instructor_with_slot(&state, "t2@lecturna.dev", "2026Q4", 2, "S2", &["C1"], now);
    seed_approved_enrollment(&state, "s2@lecturna.dev", "C1", "2026Q4", now);

    let staging = state.formation_api.preview(None, None, now).unwrap();
    assert_eq!(staging.proposals.len(), 1);
    assert_eq!(staging.proposals[0].name, "COL002");
}

#[test]
fn test_commit_rolls_back_on_stale_demand() {
    let (_db, state) = create_test_state();
    seed_default_period(&state);
    seed_course(&state, "C1", "COL-101", 2);

    let now = ts(2026, 8, 6, 10, 0);
    let (_instructor_id, slot_id) =
        seed_instructor_with_slot(&state, "t1@lecturna.dev", "2026Q4", 4, "S1", &["C1"], now);
    let (_s1, enrollment_1) =
        seed_approved_enrollment(&state, "s1@lecturna.dev", "C1", "2026Q4", now);
    seed_approved_enrollment(&state, "s2@lecturna.dev", "C1", "2026Q4", now);

    let staging = state.formation_api.preview(None, None, now).unwrap();
    assert_eq!(staging.proposals[0].student_ids.len(), 2);

    // 评审期间需求被并发消费
    state.enrollment_repo.mark_placed(&enrollment_1).unwrap();

    let err = state.formation_api.commit(&staging, now).unwrap_err();
    match err {
        ApiError::StaleSnapshot { entity, id } => {
            assert_eq!(entity, "enrollment");
            assert_eq!(id, enrollment_1);
        }
        other => panic!("预期 StaleSnapshot,实际 {:?}", other),
    }

    // 整批回滚: 无班级落库,时段仍为 OPEN
    assert!(state.class_repo.list_by_period("2026Q4").unwrap().is_empty());
    let slot = state.availability_repo.find_by_id(&slot_id).unwrap().unwrap();
    assert_eq!(slot.status, SlotStatus::Open);
}

#[test]
fn test_commit_rejects_empty_commit_set() {
    let (_db, state) = create_test_state();
    seed_default_period(&state);
    seed_course(&state, "C1", "COL-101", 2);

    let now = ts(2026, 8, 6, 10, 0);
    // 只有时段,没有需求 -> 无提案
    seed_instructor_with_slot(&state, "t1@lecturna.dev", "2026Q4", 4, "S1", &["C1"], now);
    let staging = state.formation_api.preview(None, None, now).unwrap();
    assert!(staging.proposals.is_empty());
    assert_eq!(staging.leftover_slots.len(), 1);

    let err = state.formation_api.commit(&staging, now).unwrap_err();
    assert!(matches!(err, ApiError::BusinessRuleViolation(_)));
}

#[test]
fn test_class_size_override_and_staging_edit() {
    let (_db, state) = create_test_state();
    seed_default_period(&state);
    seed_course(&state, "C1", "COL-101", 1);

    let now = ts(2026, 8, 6, 10, 0);
    seed_instructor_with_slot(&state, "t1@lecturna.dev", "2026Q4", 1, "S1", &["C1"], now);
    for i in 1..=4 {
        seed_approved_enrollment(
            &state,
            &format!("s{}@lecturna.dev", i),
            "C1",
            "2026Q4",
            ts(2026, 8, 6, 10, i),
        );
    }

    // 覆写班容量为 2: 只吸纳前两条需求
    let mut staging = state
        .formation_api
        .preview(Some("2026Q4"), Some(2), now)
        .unwrap();
    assert_eq!(staging.proposals[0].student_ids.len(), 2);
    assert_eq!(staging.leftover_demands.len(), 2);

    // 人工移除一名学员后提交,班里只剩 1 人
    let proposal_id = staging.proposals[0].proposal_id.clone();
    let drop_demand = staging.proposals[0].demand_ids[1].clone();
    staging.remove_student(&proposal_id, &drop_demand).unwrap();

    let summary = state.formation_api.commit(&staging, now).unwrap();
    assert_eq!(summary.students_placed, 1);

    // 被移除的需求仍在待分班池中
    let counts = state.formation_api.pending_counts("2026Q4").unwrap();
    assert_eq!(counts.pending_demands, 3);
}
