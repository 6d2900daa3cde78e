// ==========================================
// 填报流程集成测试
// ==========================================
// 测试目标: 课次纪要/结课测评的闸门判定与落库
// 覆盖范围: 窗口边界、重复填报、非本班学员、配置覆写
// ==========================================


use chrono::Duration;
use lecturna::api::ApiError;
use lecturna::domain::class::ClassDetail;
use lecturna::repository::RepositoryError;
use test_helpers::*;

/// 建一个两课次的班: 课次 1 于 2026-10-01 08:00-10:00, 课次 2 于 10-08
fn build_class(state: &lecturna::app::AppState) -> (String, ClassDetail, String) {
    seed_default_period(state);
    seed_course(state, "C1", "COL-101", 2);

    let now = ts(2026, 8, 6, 10, 0);
    let (instructor_id, _slot_id) =
        seed_instructor_with_slot(state, "t1@lecturna.dev", "2026Q4", 4, "S1", &["C1"], now);
    let (student_id, _enrollment_id) =
        seed_approved_enrollment(state, "s1@lecturna.dev", "C1", "2026Q4", now);

    let staging = state.formation_api.preview(None, None, now).unwrap();
    let summary = state.formation_api.commit(&staging, now).unwrap();
    let detail = state
        .class_repo
        .find_detail(&summary.class_ids[0])
        .unwrap()
        .unwrap();
    (instructor_id, detail, student_id)
}

// ==========================================
// 课次纪要
// ==========================================

#[test]
fn test_session_report_add_within_window() {
    let (_db, state) = create_test_state();
    let (instructor_id, detail, _student_id) = build_class(&state);
    let session = &detail.sessions[0];

    // 课次当晚填报
    let report = state
        .report_api
        .submit_session_report(
            &session.session_id,
            &instructor_id,
            "完成变量与类型一章",
            ts(2026, 10, 1, 20, 0),
        )
        .unwrap();
    assert_eq!(report.session_id, session.session_id);

    // 重复填报触发唯一约束
    let err = state
        .report_api
        .submit_session_report(
            &session.session_id,
            &instructor_id,
            "重复填报",
            ts(2026, 10, 1, 21, 0),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        ApiError::Repository(RepositoryError::UniqueConstraintViolation(_))
    ));
}

#[test]
fn test_session_report_add_24h_boundary() {
    let (_db, state) = create_test_state();
    let (instructor_id, detail, _student_id) = build_class(&state);
    let session = &detail.sessions[0];
    let end = session.ends_at;

    // 恰好 +24h: 放行 (含端点)
    state
        .report_api
        .submit_session_report(
            &session.session_id,
            &instructor_id,
            "压线填报",
            end + Duration::hours(24),
        )
        .unwrap();

    // 另一课次 +24h+1s: 拒绝
    let session2 = &detail.sessions[1];
    let err = state
        .report_api
        .submit_session_report(
            &session2.session_id,
            &instructor_id,
            "迟到一秒",
            session2.ends_at + Duration::hours(24) + Duration::seconds(1),
        )
        .unwrap_err();
    assert!(matches!(err, ApiError::DeadlineExpired(_)));
}

#[test]
fn test_session_report_edit_window() {
    let (_db, state) = create_test_state();
    let (instructor_id, detail, _student_id) = build_class(&state);
    let session = &detail.sessions[0];
    let end = session.ends_at;

    state
        .report_api
        .submit_session_report(&session.session_id, &instructor_id, "初版", end)
        .unwrap();

    // 修改窗口内 (8 天 = 192h)
    let updated = state
        .report_api
        .edit_session_report(&session.session_id, "修订版", end + Duration::hours(192))
        .unwrap();
    assert_eq!(updated.summary, "修订版");

    // 超窗修改拒绝
    let err = state
        .report_api
        .edit_session_report(
            &session.session_id,
            "太晚了",
            end + Duration::hours(192) + Duration::seconds(1),
        )
        .unwrap_err();
    assert!(matches!(err, ApiError::DeadlineExpired(_)));
}

#[test]
fn test_deadline_window_config_override() {
    let (_db, state) = create_test_state();
    let (instructor_id, detail, _student_id) = build_class(&state);
    let session = &detail.sessions[0];
    let end = session.ends_at;

    // 把首报窗口放宽到 48h
    state
        .config
        .update_config("deadline/session_report_add_hours", "48")
        .unwrap();

    state
        .report_api
        .submit_session_report(
            &session.session_id,
            &instructor_id,
            "放宽窗口后填报",
            end + Duration::hours(30),
        )
        .unwrap();
}

// ==========================================
// 结课测评
// ==========================================

#[test]
fn test_assessment_submit_and_weighted_total() {
    let (_db, state) = create_test_state();
    let (_instructor_id, detail, student_id) = build_class(&state);
    // 末次课结束: 2026-10-08 10:00;14 天内可首报
    let now = ts(2026, 10, 20, 9, 0);

    let assessment = state
        .report_api
        .submit_assessment(&detail.class.class_id, &student_id, 80.0, 90.0, 70.0, now)
        .unwrap();
    // 默认权重 30/30/40
    assert!((assessment.weighted_total - 79.0).abs() < 1e-9);

    let scoreboard = state
        .report_api
        .class_scoreboard(&detail.class.class_id)
        .unwrap();
    assert_eq!(scoreboard.len(), 1);
}

#[test]
fn test_assessment_rejects_non_member() {
    let (_db, state) = create_test_state();
    let (_instructor_id, detail, _student_id) = build_class(&state);
    let outsider = state
        .enrollment_api
        .register_student("旁听生", "outsider@lecturna.dev", ts(2026, 8, 6, 10, 0))
        .unwrap();

    let err = state
        .report_api
        .submit_assessment(
            &detail.class.class_id,
            &outsider.student_id,
            80.0,
            80.0,
            80.0,
            ts(2026, 10, 20, 9, 0),
        )
        .unwrap_err();
    assert!(matches!(err, ApiError::BusinessRuleViolation(_)));
}

#[test]
fn test_assessment_add_window_and_score_bounds() {
    let (_db, state) = create_test_state();
    let (_instructor_id, detail, student_id) = build_class(&state);
    let last_end = ts(2026, 10, 8, 10, 0);

    // 分项越界拒绝
    let err = state
        .report_api
        .submit_assessment(
            &detail.class.class_id,
            &student_id,
            101.0,
            80.0,
            80.0,
            ts(2026, 10, 20, 9, 0),
        )
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    // 超过 14 天 (336h) 拒绝
    let err = state
        .report_api
        .submit_assessment(
            &detail.class.class_id,
            &student_id,
            80.0,
            80.0,
            80.0,
            last_end + Duration::hours(336) + Duration::seconds(1),
        )
        .unwrap_err();
    assert!(matches!(err, ApiError::DeadlineExpired(_)));
}

#[test]
fn test_assessment_edit_allowed_before_course_end() {
    // 测评修改无下界 (沿用线上行为): 结课前提交并随即修改均放行
    let (_db, state) = create_test_state();
    let (_instructor_id, detail, student_id) = build_class(&state);

    let early = ts(2026, 9, 1, 9, 0);
    state
        .report_api
        .submit_assessment(&detail.class.class_id, &student_id, 70.0, 70.0, 70.0, early)
        .unwrap();

    let updated = state
        .report_api
        .edit_assessment(
            &detail.class.class_id,
            &student_id,
            75.0,
            75.0,
            75.0,
            ts(2026, 9, 2, 9, 0),
        )
        .unwrap();
    assert!((updated.weighted_total - 75.0).abs() < 1e-9);
}
