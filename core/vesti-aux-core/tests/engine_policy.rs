use std::env;
use std::sync::Mutex;

use proptest::prelude::*;

use vesti_aux_core::engine::EngineType;
use vesti_aux_core::postprocess::{run_postprocess, PostProcessOutcome, PostProcessPlan};
use vesti_aux_core::process::RecordingRunner;

static CWD_LOCK: Mutex<()> = Mutex::new(());

#[test]
fn tect_tag_never_reaches_the_runner() {
    let engine: EngineType = "tect".parse().expect("parse");
    let mut runner = RecordingRunner::new();

    let outcome = run_postprocess(
        engine,
        "/nonexistent/.vesti-dummy".as_ref(),
        &PostProcessPlan::default(),
        &mut runner,
        false,
    )
    .expect("skip");

    assert!(matches!(outcome, PostProcessOutcome::Skipped { .. }));
    assert!(runner.invocations.is_empty());
}

#[test]
fn outcome_serializes_with_status_tag() {
    let skipped = PostProcessOutcome::Skipped {
        engine: EngineType::Tectonic,
    };
    let json = serde_json::to_value(&skipped).expect("json");
    assert_eq!(json["status"], "skipped");
    assert_eq!(json["engine"], "tect");
}

proptest! {
    #[test]
    fn unknown_tags_are_rejected(raw in "[a-z]{1,8}") {
        let known = ["latex", "pdf", "xe", "lua", "tect"];
        prop_assume!(!known.contains(&raw.as_str()));
        prop_assert!(raw.parse::<EngineType>().is_err());
    }

    #[test]
    fn non_native_engines_issue_exactly_three_calls(idx in 0usize..4) {
        let _lock = CWD_LOCK.lock().unwrap_or_else(|p| p.into_inner());
        let engine = [EngineType::Latex, EngineType::Pdf, EngineType::Xe, EngineType::Lua][idx];
        let tmp = tempfile::tempdir().expect("tempdir");
        let before = env::current_dir().expect("cwd");
        let mut runner = RecordingRunner::new();

        run_postprocess(engine, tmp.path(), &PostProcessPlan::default(), &mut runner, false)
            .expect("run");

        let programs: Vec<&str> = runner.invocations.iter().map(|i| i.program.as_str()).collect();
        prop_assert_eq!(programs, vec!["bibtex", "makeindex", "makeindex"]);
        prop_assert_eq!(env::current_dir().expect("cwd"), before);
    }
}
