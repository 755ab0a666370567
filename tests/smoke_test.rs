//! Smoke test - exercises the pipeline against the real external compiler
//!
//! Requires a `sass` binary on PATH, so it is tagged `#[ignore]`. Run with:
//!
//!     cargo test --test smoke_test -- --ignored

mod helpers;

use assetline::core::outcome::FailureMode;
use assetline::Pipeline;
use helpers::*;

#[tokio::test]
#[ignore] // Requires the sass CLI
async fn smoke_compile_with_real_compiler() {
    let project = Project::new();
    project.write_source(
        "main.scss",
        "$accent: #ff3366;\nbody {\n  color: $accent;\n  user-select: none;\n}\n",
    );

    let sink = RecordingSink::new();
    let pipeline =
        Pipeline::from_config(project.config("")).with_event_sink(sink.clone());

    let outcome = pipeline.compile().run(FailureMode::FailFast).await;
    assert!(outcome.is_success(), "failures: {:?}", outcome.failures);

    let css = std::fs::read_to_string(project.dest_file("main.css")).unwrap();
    assert!(css.contains("#ff3366") || css.contains("255, 51, 102"));
    // the prefixer ran over the compiled output
    assert!(css.contains("-webkit-user-select"));
    assert!(sink.has_event("compile.finished"));
}

#[tokio::test]
#[ignore] // Requires the sass CLI
async fn smoke_syntax_error_is_reported_not_panicked() {
    let project = Project::new();
    project.write_source("broken.scss", "body { color: ;\n");

    let notifier = RecordingNotifier::new();
    let pipeline =
        Pipeline::from_config(project.config("")).with_notifier(notifier.clone());

    let outcome = pipeline.compile().run(FailureMode::FailFast).await;
    assert!(!outcome.is_success());
    assert!(notifier.error_count() >= 1);
}
