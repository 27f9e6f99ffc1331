//! Compile-on-build hook.
//!
//! [`CompileOnBuildHook`] is the declarative half: it lives in the
//! [`FinalConfig`](crate::FinalConfig) and records which bundler lifecycle
//! event to react to and the options to hand to the external compiler.
//! [`BoundCompileHook`] is the runtime half, created by binding the hook to a
//! [`NativeCompiler`].
//!
//! Each firing runs the compiler as a tokio task. Firing again while a
//! compile is still running aborts the older one (a rebuild supersedes it);
//! the superseded caller gets [`HookOutcome::Superseded`]. Compiler errors are
//! not retried and propagate to the caller.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::task::AbortHandle;
use tracing::{debug, warn};

use crate::{Error, Result};

/// Bundler lifecycle events a hook can react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HookEvent {
    /// Fires on every compilation, including incremental rebuilds
    #[default]
    Compile,
    /// Fires only when a watch-mode cycle starts
    WatchRun,
}

/// What the bundler knows at the time the event fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    /// The bundler's resolved output directory
    pub output_path: PathBuf,
    /// Whether the bundler is running in watch mode
    pub watch_mode: bool,
}

/// Arguments passed to the external compiler.
///
/// Serializes as `{ "out": ..., "isDev": ..., ...options }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileRequest {
    pub out: PathBuf,
    pub is_dev: bool,
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

/// External native-script compiler.
#[async_trait]
pub trait NativeCompiler: Send + Sync + 'static {
    async fn compile(&self, request: CompileRequest) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompileOnBuildHook {
    #[serde(default)]
    pub event: HookEvent,

    /// The caller's original options, forwarded as-is
    pub options: Map<String, Value>,
}

impl CompileOnBuildHook {
    /// Hook reacting to every compilation.
    pub fn new(options: Map<String, Value>) -> Self {
        Self {
            event: HookEvent::Compile,
            options,
        }
    }

    /// Hook reacting only to watch-mode cycles.
    pub fn on_watch_run(options: Map<String, Value>) -> Self {
        Self {
            event: HookEvent::WatchRun,
            options,
        }
    }

    /// `isDev` as carried in the hook's options, if it was supplied.
    pub fn explicit_is_dev(&self) -> Option<bool> {
        self.options.get("isDev").and_then(Value::as_bool)
    }

    /// Build the compiler request for a firing.
    ///
    /// Starts from `{ out: <bundler output>, isDev: <effective flag> }` and
    /// lays every carried option over it, so fields the hook carries
    /// explicitly take precedence.
    pub fn request(&self, ctx: &BuildContext) -> CompileRequest {
        let mut options = self.options.clone();
        let out = match options.remove("out") {
            Some(Value::String(out)) => PathBuf::from(out),
            _ => ctx.output_path.clone(),
        };
        let is_dev = match options.remove("isDev") {
            Some(Value::Bool(flag)) => flag,
            _ => ctx.watch_mode,
        };

        CompileRequest {
            out,
            is_dev,
            options,
        }
    }

    pub fn bind(self, compiler: Arc<dyn NativeCompiler>) -> BoundCompileHook {
        BoundCompileHook {
            hook: self,
            compiler,
            state: Mutex::new(InFlight::default()),
        }
    }
}

/// Result of handing an event to a bound hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    /// The event is not the one this hook observes
    Ignored,
    /// The compiler ran to completion
    Completed,
    /// A newer firing (or [`BoundCompileHook::cancel`]) aborted this one
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookState {
    Idle,
    Invoking,
}

#[derive(Debug, Default)]
struct InFlight {
    generation: u64,
    abort: Option<AbortHandle>,
}

/// Releases the in-flight slot when a firing ends, including when the `fire`
/// future is dropped before the compile finishes. The task is aborted only
/// if no newer firing has taken the slot.
struct InFlightGuard<'a> {
    state: &'a Mutex<InFlight>,
    generation: u64,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        if state.generation != self.generation {
            return;
        }
        if let Some(handle) = state.abort.take() {
            handle.abort();
        }
    }
}

pub struct BoundCompileHook {
    hook: CompileOnBuildHook,
    compiler: Arc<dyn NativeCompiler>,
    state: Mutex<InFlight>,
}

impl BoundCompileHook {
    pub fn hook(&self) -> &CompileOnBuildHook {
        &self.hook
    }

    pub fn state(&self) -> HookState {
        if self.state.lock().abort.is_some() {
            HookState::Invoking
        } else {
            HookState::Idle
        }
    }

    /// Handle a lifecycle event.
    ///
    /// Must be called from within a tokio runtime. Dropping the returned
    /// future aborts the compile it started.
    ///
    /// # Errors
    ///
    /// `Error::ExternalCompilerFailure` if the compiler fails or panics.
    pub async fn fire(&self, event: HookEvent, ctx: &BuildContext) -> Result<HookOutcome> {
        if event != self.hook.event {
            return Ok(HookOutcome::Ignored);
        }

        let request = self.hook.request(ctx);
        debug!(out = %request.out.display(), is_dev = request.is_dev, "invoking native compiler");

        let compiler = Arc::clone(&self.compiler);
        let task = tokio::spawn(async move { compiler.compile(request).await });

        let generation = {
            let mut state = self.state.lock();
            if let Some(previous) = state.abort.replace(task.abort_handle()) {
                debug!("superseding in-flight compile");
                previous.abort();
            }
            state.generation += 1;
            state.generation
        };
        let guard = InFlightGuard {
            state: &self.state,
            generation,
        };

        let result = task.await;
        drop(guard);

        match result {
            Ok(Ok(())) => Ok(HookOutcome::Completed),
            Ok(Err(err)) => Err(Error::ExternalCompilerFailure {
                message: format!("{err:#}"),
            }),
            Err(join) if join.is_cancelled() => Ok(HookOutcome::Superseded),
            Err(join) => {
                warn!("native compiler task panicked");
                Err(Error::ExternalCompilerFailure {
                    message: join.to_string(),
                })
            }
        }
    }

    /// Abort the in-flight compile, if any.
    pub fn cancel(&self) {
        if let Some(handle) = self.state.lock().abort.take() {
            debug!("cancelling in-flight compile");
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn ctx(watch_mode: bool) -> BuildContext {
        BuildContext {
            output_path: PathBuf::from("/bundler/out"),
            watch_mode,
        }
    }

    #[test]
    fn watch_mode_decides_when_is_dev_absent() {
        let hook = CompileOnBuildHook::new(Map::new());
        assert!(hook.request(&ctx(true)).is_dev);
        assert!(!hook.request(&ctx(false)).is_dev);
        assert_eq!(hook.request(&ctx(false)).out, PathBuf::from("/bundler/out"));
    }

    #[test]
    fn explicit_fields_beat_bundler_defaults() {
        let hook = CompileOnBuildHook::new(options(json!({
            "out": "/user/out",
            "isDev": false,
            "id": "com.example.panel"
        })));

        let request = hook.request(&ctx(true));
        assert_eq!(request.out, PathBuf::from("/user/out"));
        assert!(!request.is_dev);
        assert_eq!(request.options.get("id"), Some(&json!("com.example.panel")));
        assert!(!request.options.contains_key("out"));
    }

    #[test]
    fn request_serializes_flat() {
        let hook = CompileOnBuildHook::new(options(json!({ "type": "panel" })));
        let value = serde_json::to_value(hook.request(&ctx(true))).unwrap();
        assert_eq!(
            value,
            json!({ "out": "/bundler/out", "isDev": true, "type": "panel" })
        );
    }
}
