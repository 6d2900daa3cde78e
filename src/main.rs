// ==========================================
// Lecturna 教务系统 - CLI 主入口
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 开班决策支持
// ==========================================

use chrono::Local;

use lecturna::app::{get_default_db_path, AppState};
use lecturna::i18n::{t, t_with_args};

fn main() {
    // 初始化日志系统
    lecturna::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", lecturna::APP_NAME);
    tracing::info!("系统版本: {}", lecturna::VERSION);
    tracing::info!("==================================================");

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or("");

    // 数据库路径: 环境变量优先
    let db_path = std::env::var("LECTURNA_DB").unwrap_or_else(|_| get_default_db_path());
    tracing::info!("使用数据库: {}", db_path);

    let state = match AppState::new(db_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}: {}", t("common.failure"), e);
            std::process::exit(1);
        }
    };

    let now = Local::now().naive_local();
    let result = match command {
        "init" => cmd_init(),
        "plan" => cmd_plan(&state, args.get(2).map(String::as_str), now),
        "commit" => cmd_commit(&state, args.get(2).map(String::as_str), now),
        "import" => cmd_import(&state, &args[2..], now),
        "pending" => cmd_pending(&state, args.get(2).map(String::as_str)),
        _ => {
            eprintln!("{}", t("cli.usage"));
            std::process::exit(2);
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", t("common.failure"), e);
        std::process::exit(1);
    }
}

/// init: AppState 构造时各仓储已完成建表引导
fn cmd_init() -> Result<(), String> {
    println!("{}", t("cli.db_ready"));
    Ok(())
}

fn print_pending(state: &AppState, period_id: &str) -> Result<(), String> {
    let counts = state
        .formation_api
        .pending_counts(period_id)
        .map_err(|e| e.to_string())?;
    let demands = counts.pending_demands.to_string();
    let slots = counts.open_slots.to_string();
    println!(
        "{}",
        t_with_args(
            "cli.pending",
            &[
                ("period", period_id),
                ("demands", demands.as_str()),
                ("slots", slots.as_str()),
            ],
        )
    );
    Ok(())
}

/// plan: 生成提案预览,不落库
fn cmd_plan(
    state: &AppState,
    period_id: Option<&str>,
    now: chrono::NaiveDateTime,
) -> Result<(), String> {
    let staging = state
        .formation_api
        .preview(period_id, None, now)
        .map_err(|e| e.to_string())?;

    if staging.proposals.is_empty() {
        println!("{}", t("cli.no_proposals"));
    } else {
        let size = staging.class_size.to_string();
        println!(
            "{}",
            t_with_args(
                "cli.plan_header",
                &[("period", staging.period_id.as_str()), ("size", size.as_str())],
            )
        );
        for proposal in &staging.proposals {
            println!(
                "  {}  {} {}  讲师 {}  学员 {} 名",
                proposal.name,
                proposal.day,
                proposal.shift,
                proposal.instructor_id,
                proposal.student_ids.len()
            );
        }
    }

    let demands = staging.leftover_demands.len().to_string();
    let slots = staging.leftover_slots.len().to_string();
    println!(
        "{}",
        t_with_args(
            "cli.leftover",
            &[("demands", demands.as_str()), ("slots", slots.as_str())],
        )
    );
    Ok(())
}

/// commit: 预览后立即整批提交 (CLI 模式下无人工逐项评审)
fn cmd_commit(
    state: &AppState,
    period_id: Option<&str>,
    now: chrono::NaiveDateTime,
) -> Result<(), String> {
    let staging = state
        .formation_api
        .preview(period_id, None, now)
        .map_err(|e| e.to_string())?;
    if staging.commit_set().is_empty() {
        println!("{}", t("cli.no_proposals"));
        return Ok(());
    }

    let summary = state
        .formation_api
        .commit(&staging, now)
        .map_err(|e| e.to_string())?;
    let classes = summary.classes_created.to_string();
    let students = summary.students_placed.to_string();
    let sessions = summary.sessions_created.to_string();
    println!(
        "{}",
        t_with_args(
            "cli.committed",
            &[
                ("classes", classes.as_str()),
                ("students", students.as_str()),
                ("sessions", sessions.as_str()),
            ],
        )
    );

    print_pending(state, &staging.period_id)
}

/// import <csv> <period_id>: 名册批量入驻
fn cmd_import(
    state: &AppState,
    args: &[String],
    now: chrono::NaiveDateTime,
) -> Result<(), String> {
    let (csv_path, period_id) = match (args.first(), args.get(1)) {
        (Some(p), Some(id)) => (std::path::Path::new(p), id.as_str()),
        _ => return Err(t("cli.usage")),
    };

    let report = state
        .roster_importer
        .import_roster(csv_path, period_id, now)
        .map_err(|e| e.to_string())?;

    for row_error in &report.errors {
        let line = row_error.line.to_string();
        eprintln!(
            "{}",
            t_with_args(
                "import.row_failed",
                &[("line", line.as_str()), ("reason", row_error.reason.as_str())],
            )
        );
    }
    let ok = report.enrollments_created.to_string();
    let failed = report.errors.len().to_string();
    let students = report.students_created.to_string();
    println!(
        "{}",
        t_with_args(
            "import.done",
            &[
                ("ok", ok.as_str()),
                ("failed", failed.as_str()),
                ("students", students.as_str()),
            ],
        )
    );
    Ok(())
}

/// pending <period_id>: 待办计数
fn cmd_pending(state: &AppState, period_id: Option<&str>) -> Result<(), String> {
    let period_id = period_id.ok_or_else(|| t("cli.usage"))?;
    print_pending(state, period_id)
}
