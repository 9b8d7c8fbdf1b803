use std::time::Duration;

use dioxus::prelude::{Key, Modifiers};
use lesson_core::model::{ExecutionResult, HintLevel, NewAchievement, ServerProgress};
use services::SaveProgressResponse;
use storage::Storage;

use crate::hints::HINT_TTL;
use crate::page::{Page, PageDocument};
use crate::styles::STYLESHEET;
use crate::test_harness::{
    OUTPUT, harness, harness_with_storage, lesson, lesson_page, printed, unescaped,
};

#[tokio::test]
async fn run_output_is_escaped_and_loading_hidden() {
    let h = harness(lesson_page());
    h.api.set_execution(printed("<b>x</b>"));

    let report = h.controller.run_code("void main() {}", OUTPUT).await;
    assert!(report.outcome.is_success());

    h.controller.with_page(|page| {
        let html = page.output(OUTPUT).unwrap();
        assert!(!html.contains("<b>"), "{html}");
        assert!(unescaped(html).contains("<b>x</b>"), "{html}");
        assert_eq!(page.loading_visible(), Some(false));
    });
}

#[tokio::test]
async fn connection_failure_is_rendered_not_raised() {
    let h = harness(lesson_page());
    h.api.set_execution_error("connection refused");

    h.controller.run_code("void main() {}", OUTPUT).await;

    h.controller.with_page(|page| {
        let html = page.output(OUTPUT).unwrap();
        assert!(html.contains("output-error"), "{html}");
        assert!(html.contains("connection refused"), "{html}");
        assert_eq!(page.loading_visible(), Some(false));
    });
}

#[tokio::test]
async fn missing_output_region_and_loading_are_tolerated() {
    let h = harness(PageDocument::new());
    h.api.set_execution(printed("ok"));
    let report = h.controller.run_code("void main() {}", "nowhere").await;
    assert!(report.outcome.is_success());
}

#[tokio::test]
async fn tracked_completion_marks_the_lesson() {
    let h = harness(lesson_page());
    let l1 = lesson("1");

    for completed in [false, false, true] {
        let tracked = h.controller.track_progress(&l1, completed).await;
        tracked.push.await.unwrap().unwrap();
    }
    let tracked = h.controller.track_progress(&l1, false).await;
    let record = tracked.record.unwrap();
    assert_eq!(record.attempts(), 4);
    assert!(record.is_completed());
    tracked.push.await.unwrap().unwrap();

    h.controller.with_page(|page| {
        assert!(page.is_marked_complete(&l1));
        assert!(!page.is_marked_complete(&lesson("2")));
    });
}

#[tokio::test]
async fn tracking_repaints_from_cache_without_loading_server_progress() {
    let h = harness(lesson_page());
    let l1 = lesson("1");

    let tracked = h.controller.track_progress(&l1, true).await;
    tracked.push.await.unwrap().unwrap();
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }

    assert_eq!(h.api.progress_queries(), 0);
    let local = h.controller.services().tracker().local_progress().await;
    assert!(local.get(&l1).is_some_and(|record| record.is_completed()));
    h.controller
        .with_page(|page| assert!(page.is_marked_complete(&l1)));
}

#[tokio::test]
async fn server_completion_marks_lesson_without_local_record() {
    let h = harness(lesson_page());
    let server = vec![ServerProgress::completed(lesson("2"))];

    let marked = h.controller.update_progress_elements(&server).await;
    assert_eq!(marked, 1);
    h.controller
        .with_page(|page| assert!(page.is_marked_complete(&lesson("2"))));
}

#[tokio::test]
async fn malformed_embedded_progress_falls_back_to_server() {
    let h = harness(lesson_page().with_embedded_progress("{not json"));
    h.api.set_progress(vec![ServerProgress::completed(lesson("3"))]);

    let refresh = h.controller.update_progress_ui().await;
    h.controller
        .with_page(|page| assert!(!page.is_marked_complete(&lesson("3"))));

    refresh.await.unwrap();
    h.controller
        .with_page(|page| assert!(page.is_marked_complete(&lesson("3"))));
}

#[tokio::test]
async fn embedded_snapshot_paints_before_server_answers() {
    let h = harness(
        lesson_page()
            .with_embedded_progress(r#"[{"lesson_id": 1, "completed_at": "2024-05-01T10:00:00"}]"#),
    );
    h.api.set_progress_error("offline");

    let refresh = h.controller.update_progress_ui().await;
    h.controller
        .with_page(|page| assert!(page.is_marked_complete(&lesson("1"))));
    refresh.await.unwrap();
    h.controller
        .with_page(|page| assert!(page.is_marked_complete(&lesson("1"))));
}

#[tokio::test(start_paused = true)]
async fn hints_disappear_after_five_seconds() {
    let h = harness(lesson_page());
    let id = h.controller.show_hint("Something broke", HintLevel::Error);

    h.controller.with_page(|page| {
        let hint = page.hints().iter().find(|hint| hint.id == id).unwrap();
        assert!(hint.html.contains("hint hint-error"));
    });

    tokio::time::sleep(HINT_TTL - Duration::from_millis(1)).await;
    h.controller
        .with_page(|page| assert_eq!(page.hints().len(), 1));

    tokio::time::sleep(Duration::from_millis(2)).await;
    h.controller.with_page(|page| assert!(page.hints().is_empty()));
}

#[tokio::test(start_paused = true)]
async fn hint_removed_early_is_not_an_error() {
    let h = harness(lesson_page());
    let id = h.controller.show_hint("bye", HintLevel::Info);
    assert!(h.controller.with_page(|page| page.remove_hint(id)));

    tokio::time::sleep(HINT_TTL + Duration::from_millis(1)).await;
    h.controller.with_page(|page| assert!(page.hints().is_empty()));
}

#[tokio::test]
async fn shortcuts_only_work_after_initialize() {
    let h = harness(lesson_page());
    let handled = h.controller.handle_key(&Key::Enter, Modifiers::CONTROL);
    assert!(!handled.prevent_default);
    assert_eq!(h.controller.with_page(|page| page.clicks("run-code")), 0);

    h.controller.initialize().await.unwrap().await.unwrap();

    let handled = h.controller.handle_key(&Key::Enter, Modifiers::CONTROL);
    assert!(handled.prevent_default);
    assert_eq!(handled.clicked, Some("run-code"));

    let handled = h
        .controller
        .handle_key(&Key::Character("r".into()), Modifiers::META);
    assert_eq!(handled.clicked, Some("reset-code"));

    h.controller.with_page(|page| {
        assert_eq!(page.clicks("run-code"), 1);
        assert_eq!(page.clicks("reset-code"), 1);
    });
}

#[tokio::test]
async fn run_shortcut_falls_back_to_demo_button() {
    let h = harness(PageDocument::new().with_control("run-demo"));
    h.controller.initialize().await.unwrap().await.unwrap();

    let handled = h.controller.handle_key(&Key::Enter, Modifiers::META);
    assert_eq!(handled.clicked, Some("run-demo"));

    let handled = h
        .controller
        .handle_key(&Key::Character("r".into()), Modifiers::CONTROL);
    assert!(handled.prevent_default);
    assert_eq!(handled.clicked, None);
}

#[tokio::test]
async fn initialize_runs_once() {
    let h = harness(lesson_page());
    assert!(h.controller.initialize().await.is_some());
    assert!(h.controller.initialize().await.is_none());
    assert!(h.controller.clone().initialize().await.is_none());

    h.controller.with_page(|page| {
        assert_eq!(page.styles().len(), 1);
        assert_eq!(page.styles()[0], STYLESHEET);
    });
}

#[tokio::test]
async fn correct_attempt_completes_the_lesson() {
    let h = harness(lesson_page());
    h.api.set_execution(printed("Hello,   Dart!\n"));
    let l2 = lesson("2");

    let attempt = h
        .controller
        .submit_attempt(&l2, "void main() { print('Hello, Dart!'); }", "Hello, Dart!", OUTPUT)
        .await;
    assert!(attempt.correct);
    attempt.progress.push.await.unwrap().unwrap();

    let saved = h.api.saved();
    assert_eq!(saved.len(), 1);
    assert!(saved[0].completed);
    assert_eq!(
        h.storage.drafts.load(&l2).await.unwrap().as_deref(),
        Some("void main() { print('Hello, Dart!'); }")
    );
    h.controller.with_page(|page| {
        assert!(page.is_marked_complete(&l2));
        assert!(page
            .hints()
            .iter()
            .any(|hint| hint.level == HintLevel::Success));
    });
}

#[tokio::test]
async fn failed_run_counts_as_incomplete_attempt() {
    let h = harness(lesson_page());
    h.api.set_execution(ExecutionResult {
        success: false,
        output: Some("partial".into()),
        error: Some("Undefined name 'x'".into()),
    });

    let attempt = h
        .controller
        .submit_attempt(&lesson("1"), "void main() { x; }", "", OUTPUT)
        .await;
    assert!(!attempt.correct);
    assert_eq!(attempt.progress.record.unwrap().attempts(), 1);
    attempt.progress.push.await.unwrap().unwrap();

    assert!(!h.api.saved()[0].completed);
    h.controller.with_page(|page| {
        let html = page.output(OUTPUT).unwrap();
        assert!(html.contains("Undefined name"), "{html}");
        assert!(!html.contains("partial"), "{html}");
        assert!(page.hints().iter().any(|hint| hint.level == HintLevel::Error));
    });
}

#[tokio::test]
async fn new_achievements_are_announced() {
    let h = harness(lesson_page());
    h.api.set_save_response(SaveProgressResponse {
        success: true,
        new_achievements: vec![NewAchievement {
            name: "First steps".into(),
            description: String::new(),
            icon: String::new(),
            points: 10,
        }],
        ..SaveProgressResponse::default()
    });

    let tracked = h.controller.track_progress(&lesson("1"), true).await;
    tracked.push.await.unwrap().unwrap();

    h.controller.with_page(|page| {
        assert!(page
            .hints()
            .iter()
            .any(|hint| hint.message == "Achievement unlocked: First steps (+10)"));
    });
}

#[tokio::test]
async fn disabled_storage_degrades_to_server_only() {
    let h = harness_with_storage(lesson_page(), Storage::disabled());
    h.api.set_progress(vec![ServerProgress::completed(lesson("1"))]);

    let tracked = h.controller.track_progress(&lesson("2"), true).await;
    assert!(tracked.record.is_none());
    tracked.push.await.unwrap().unwrap();
    assert_eq!(h.api.saved().len(), 1);

    h.controller.initialize().await.unwrap().await.unwrap();
    h.controller.with_page(|page| {
        assert!(page.is_marked_complete(&lesson("1")));
        assert!(!page.is_marked_complete(&lesson("2")));
    });
}

#[tokio::test]
async fn drafts_load_and_reset() {
    let h = harness(lesson_page());
    let l1 = lesson("1");
    assert_eq!(h.controller.load_code(&l1, "template").await, "template");

    h.storage.drafts.save(&l1, "draft").await.unwrap();
    assert_eq!(h.controller.load_code(&l1, "template").await, "draft");
    assert_eq!(h.controller.reset_code(&l1, "template").await, "template");
    assert_eq!(h.controller.load_code(&l1, "template").await, "template");
}
