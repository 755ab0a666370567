//! Docs operation scenarios: exclusions, activation, failure reporting

mod helpers;

use helpers::*;
use std::sync::atomic::Ordering;

#[tokio::test]
async fn docs_skips_when_disabled() {
    let project = Project::new();
    project.write_source("main.scss", "a { color: red; }\n");

    let docgen = RecordingDocGen::new();
    let rig = rig(&project, "");
    let pipeline = rig.pipeline.clone().with_doc_generator(docgen.clone());

    let outcome = pipeline.docs().run().await;

    assert!(outcome.is_success());
    assert_eq!(docgen.call_count(), 0);
    assert!(!rig.sink.has_event("docs.finished"));
}

#[tokio::test]
async fn docs_documents_sources_and_signals_completion() {
    let project = Project::new();
    project.write_source("main.scss", "a { color: red; }\n");
    project.write_source("_mixins.scss", "@mixin x {}\n");

    let docgen = RecordingDocGen::new();
    let rig = rig(&project, "docs: { enabled: true }");
    let pipeline = rig.pipeline.clone().with_doc_generator(docgen.clone());

    let outcome = pipeline.docs().run().await;

    assert!(outcome.is_success());
    assert_eq!(docgen.call_count(), 1);
    // partials are documented too
    assert_eq!(outcome.files, 2);
    assert!(rig.sink.has_event("docs.finished"));
}

#[tokio::test]
async fn docs_honors_exclusion_patterns() {
    let project = Project::new();
    project.write_source("main.scss", "a { color: red; }\n");
    project.write_source("vendor/normalize.scss", "html { margin: 0; }\n");

    let docgen = RecordingDocGen::new();
    let rig = rig(&project, "docs:\n  enabled: true\n  exclude: [\"vendor/**\"]");
    let pipeline = rig.pipeline.clone().with_doc_generator(docgen.clone());

    pipeline.docs().run().await;

    let documented = docgen.documented();
    assert_eq!(documented.len(), 1);
    assert!(documented[0].ends_with("main.scss"));
}

#[tokio::test]
async fn docs_failure_is_reported_not_fatal() {
    let project = Project::new();
    project.write_source("main.scss", "a { color: red; }\n");

    let docgen = RecordingDocGen::new();
    docgen.fail.store(true, Ordering::SeqCst);
    let rig = rig(&project, "docs: { enabled: true }");
    let pipeline = rig.pipeline.clone().with_doc_generator(docgen.clone());

    let outcome = pipeline.docs().run().await;

    assert!(!outcome.is_success());
    assert_eq!(rig.notifier.error_count(), 1);
    assert!(!rig.sink.has_event("docs.finished"));
}
