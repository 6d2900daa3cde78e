// ==========================================
// 配置管理器集成测试
// ==========================================
// 测试目标: 默认值、覆写、类型化取值、快照
// ==========================================


use lecturna::engine::DeadlineWindows;
use test_helpers::*;

#[test]
fn test_defaults_without_any_rows() {
    let (_db, state) = create_test_state();

    assert_eq!(state.config.get_class_size().unwrap(), 5);
    assert_eq!(
        state.config.get_deadline_windows().unwrap(),
        DeadlineWindows::default()
    );
    let weights = state.config.get_score_weights().unwrap();
    assert_eq!(weights.exercise_pct, 30);
    assert_eq!(weights.project_pct, 30);
    assert_eq!(weights.exam_pct, 40);
}

#[test]
fn test_update_and_typed_getters() {
    let (_db, state) = create_test_state();

    state.config.update_config("formation/class_size", "8").unwrap();
    assert_eq!(state.config.get_class_size().unwrap(), 8);

    state
        .config
        .update_config("deadline/assessment_edit_hours", "600")
        .unwrap();
    let windows = state.config.get_deadline_windows().unwrap();
    assert_eq!(windows.assessment_edit_hours, 600);
    // 其余键不受影响
    assert_eq!(windows.session_report_add_hours, 24);

    state
        .config
        .update_config(
            "score/weights",
            r#"{"exercise_pct":20,"project_pct":40,"exam_pct":40}"#,
        )
        .unwrap();
    let weights = state.config.get_score_weights().unwrap();
    assert_eq!(weights.project_pct, 40);

    // 覆写是 upsert: 再次更新同一键
    state.config.update_config("formation/class_size", "6").unwrap();
    assert_eq!(state.config.get_class_size().unwrap(), 6);
}

#[test]
fn test_invalid_values_are_errors() {
    let (_db, state) = create_test_state();

    state
        .config
        .update_config("formation/class_size", "abc")
        .unwrap();
    assert!(state.config.get_class_size().is_err());

    state
        .config
        .update_config("formation/class_size", "-1")
        .unwrap();
    assert!(state.config.get_class_size().is_err());

    state.config.update_config("score/weights", "{oops").unwrap();
    assert!(state.config.get_score_weights().is_err());
}

#[test]
fn test_snapshot_and_listing() {
    let (_db, state) = create_test_state();
    state.config.update_config("formation/class_size", "7").unwrap();

    let listed = state.config.list_configs().unwrap();
    assert_eq!(listed.get("formation/class_size").map(String::as_str), Some("7"));

    let snapshot = state.config.snapshot_json().unwrap();
    assert!(snapshot.contains("\"class_size\":7"));
    assert!(snapshot.contains("assessment_add_hours"));
}
