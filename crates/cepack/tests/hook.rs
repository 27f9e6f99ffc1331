//! Runtime behaviour of bound compile hooks.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use cepack::{
    BuildContext, CompileOnBuildHook, CompileRequest, Error, HookEvent, HookOutcome, HookState,
    NativeCompiler,
};
use parking_lot::Mutex;
use serde_json::{Map, Value, json};
use tokio::sync::Notify;

fn ctx(watch_mode: bool) -> BuildContext {
    BuildContext {
        output_path: PathBuf::from("/bundler/out"),
        watch_mode,
    }
}

#[derive(Default)]
struct Recorder {
    requests: Mutex<Vec<CompileRequest>>,
}

#[async_trait]
impl NativeCompiler for Recorder {
    async fn compile(&self, request: CompileRequest) -> anyhow::Result<()> {
        self.requests.lock().push(request);
        Ok(())
    }
}

struct Failing;

#[async_trait]
impl NativeCompiler for Failing {
    async fn compile(&self, _request: CompileRequest) -> anyhow::Result<()> {
        anyhow::bail!("manifest template missing")
    }
}

/// Blocks forever on its first call, completes every later call.
#[derive(Default)]
struct StallFirst {
    calls: AtomicUsize,
    started: Notify,
}

#[async_trait]
impl NativeCompiler for StallFirst {
    async fn compile(&self, _request: CompileRequest) -> anyhow::Result<()> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.started.notify_one();
        if call == 0 {
            std::future::pending::<()>().await;
        }
        Ok(())
    }
}

/// Counts only the compiles that run to the end.
#[derive(Default)]
struct Slow {
    finished: AtomicUsize,
}

#[async_trait]
impl NativeCompiler for Slow {
    async fn compile(&self, _request: CompileRequest) -> anyhow::Result<()> {
        tokio::time::sleep(Duration::from_millis(200)).await;
        self.finished.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn options(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

#[tokio::test]
async fn compile_event_invokes_compiler() {
    let recorder = Arc::new(Recorder::default());
    let bound = CompileOnBuildHook::new(options(json!({ "id": "com.example.panel" })))
        .bind(recorder.clone());

    let outcome = bound.fire(HookEvent::Compile, &ctx(true)).await.unwrap();
    assert_eq!(outcome, HookOutcome::Completed);
    assert_eq!(bound.state(), HookState::Idle);

    let requests = recorder.requests.lock();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].out, PathBuf::from("/bundler/out"));
    assert!(requests[0].is_dev);
    assert_eq!(requests[0].options["id"], json!("com.example.panel"));
}

#[tokio::test]
async fn explicit_is_dev_overrides_watch_mode() {
    let recorder = Arc::new(Recorder::default());
    let bound = CompileOnBuildHook::new(options(json!({ "isDev": false }))).bind(recorder.clone());

    bound.fire(HookEvent::Compile, &ctx(true)).await.unwrap();
    assert!(!recorder.requests.lock()[0].is_dev);
}

#[tokio::test]
async fn other_events_are_ignored() {
    let recorder = Arc::new(Recorder::default());
    let bound = CompileOnBuildHook::on_watch_run(Map::new()).bind(recorder.clone());

    let outcome = bound.fire(HookEvent::Compile, &ctx(false)).await.unwrap();
    assert_eq!(outcome, HookOutcome::Ignored);
    assert!(recorder.requests.lock().is_empty());

    let outcome = bound.fire(HookEvent::WatchRun, &ctx(true)).await.unwrap();
    assert_eq!(outcome, HookOutcome::Completed);
}

#[tokio::test]
async fn compiler_failure_propagates() {
    let bound = CompileOnBuildHook::new(Map::new()).bind(Arc::new(Failing));

    let err = bound.fire(HookEvent::Compile, &ctx(false)).await.unwrap_err();
    match err {
        Error::ExternalCompilerFailure { message } => {
            assert!(message.contains("manifest template missing"))
        }
        other => panic!("expected ExternalCompilerFailure, got {other:?}"),
    }
    assert_eq!(bound.state(), HookState::Idle);
}

#[tokio::test]
async fn newer_firing_supersedes_in_flight_compile() {
    let compiler = Arc::new(StallFirst::default());
    let bound = Arc::new(CompileOnBuildHook::new(Map::new()).bind(compiler.clone()));

    let first = tokio::spawn({
        let bound = Arc::clone(&bound);
        async move { bound.fire(HookEvent::Compile, &ctx(true)).await }
    });
    compiler.started.notified().await;
    assert_eq!(bound.state(), HookState::Invoking);

    let second = bound.fire(HookEvent::Compile, &ctx(true)).await.unwrap();
    assert_eq!(second, HookOutcome::Completed);

    let first = first.await.unwrap().unwrap();
    assert_eq!(first, HookOutcome::Superseded);
    assert_eq!(compiler.calls.load(Ordering::SeqCst), 2);
    assert_eq!(bound.state(), HookState::Idle);
}

#[tokio::test]
async fn cancel_aborts_in_flight_compile() {
    let compiler = Arc::new(StallFirst::default());
    let bound = Arc::new(CompileOnBuildHook::new(Map::new()).bind(compiler.clone()));

    let pending = tokio::spawn({
        let bound = Arc::clone(&bound);
        async move { bound.fire(HookEvent::Compile, &ctx(false)).await }
    });
    compiler.started.notified().await;

    bound.cancel();
    assert_eq!(pending.await.unwrap().unwrap(), HookOutcome::Superseded);
    assert_eq!(bound.state(), HookState::Idle);
}

#[tokio::test]
async fn dropping_fire_aborts_compile_and_returns_to_idle() {
    let compiler = Arc::new(Slow::default());
    let bound = CompileOnBuildHook::new(Map::new()).bind(compiler.clone());

    let timed_out = tokio::time::timeout(
        Duration::from_millis(20),
        bound.fire(HookEvent::Compile, &ctx(true)),
    )
    .await;
    assert!(timed_out.is_err());
    assert_eq!(bound.state(), HookState::Idle);

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(compiler.finished.load(Ordering::SeqCst), 0);
    assert_eq!(bound.state(), HookState::Idle);
}
