// ==========================================
// 名册导入器集成测试
// ==========================================
// 测试目标: CSV 批量入驻、邮箱去重、单行容错
// ==========================================


use std::io::Write;

use lecturna::importer::ImportError;
use test_helpers::*;

fn write_csv(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("创建临时CSV失败");
    file.write_all(content.as_bytes()).expect("写入CSV失败");
    file.flush().unwrap();
    file
}

#[test]
fn test_import_roster_happy_path_with_row_errors() {
    let (_db, state) = create_test_state();
    seed_default_period(&state);
    seed_course(&state, "C1", "COL-101", 12);
    seed_course(&state, "C2", "PY-201", 10);

    // 第 4 行: 同一邮箱再报一门课 (学员去重)
    // 第 5 行: 未知课程代码
    // 第 6 行: 邮箱为空
    let csv = write_csv(
        "name,email,course_code\n\
         张三,zhang@lecturna.dev,COL-101\n\
         李四,li@lecturna.dev,PY-201\n\
         张三,zhang@lecturna.dev,PY-201\n\
         王五,wang@lecturna.dev,NOPE-999\n\
         赵六,,COL-101\n",
    );

    let now = ts(2026, 8, 6, 10, 0);
    let report = state
        .roster_importer
        .import_roster(csv.path(), "2026Q4", now)
        .unwrap();

    assert_eq!(report.rows_total, 5);
    assert_eq!(report.enrollments_created, 3);
    assert_eq!(report.students_created, 2);
    assert_eq!(report.errors.len(), 2);
    // 行号含表头
    assert_eq!(report.errors[0].line, 5);
    assert_eq!(report.errors[1].line, 6);

    // 名册报名直接进入待分班池
    let demands = state
        .enrollment_repo
        .list_demands_by_period("2026Q4")
        .unwrap();
    assert_eq!(demands.len(), 3);

    // 去重后学员档案只有两份
    assert_eq!(state.student_repo.list_active().unwrap().len(), 2);
}

#[test]
fn test_import_duplicate_enrollment_is_row_error() {
    let (_db, state) = create_test_state();
    seed_default_period(&state);
    seed_course(&state, "C1", "COL-101", 12);

    let csv = write_csv(
        "name,email,course_code\n\
         张三,zhang@lecturna.dev,COL-101\n\
         张三,zhang@lecturna.dev,COL-101\n",
    );

    let report = state
        .roster_importer
        .import_roster(csv.path(), "2026Q4", ts(2026, 8, 6, 10, 0))
        .unwrap();

    assert_eq!(report.enrollments_created, 1);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].line, 3);
}

#[test]
fn test_import_missing_column_fails_whole_file() {
    let (_db, state) = create_test_state();
    seed_default_period(&state);

    let csv = write_csv("name,email\n张三,zhang@lecturna.dev\n");
    let err = state
        .roster_importer
        .import_roster(csv.path(), "2026Q4", ts(2026, 8, 6, 10, 0))
        .unwrap_err();
    assert!(matches!(err, ImportError::MissingColumn(col) if col == "course_code"));
}

#[test]
fn test_import_unreadable_file() {
    let (_db, state) = create_test_state();
    let err = state
        .roster_importer
        .import_roster(
            std::path::Path::new("/nonexistent/roster.csv"),
            "2026Q4",
            ts(2026, 8, 6, 10, 0),
        )
        .unwrap_err();
    assert!(matches!(err, ImportError::FileUnreadable(_)));
}
