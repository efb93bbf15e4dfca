use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::Context as _;

use crate::compose::graph::{CompositionGraph, InputManifest};
use crate::foundation::error::{NarrataError, NarrataResult};

/// Shared flag used to abort an in-flight engine invocation.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create an un-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Return `true` once [`Self::cancel`] was called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Caller-supplied abort controls for a render.
#[derive(Clone, Debug, Default)]
pub struct RenderControl {
    /// Cooperative cancellation.
    pub cancel: CancelToken,
    /// Wall-clock limit for the engine invocation.
    pub timeout: Option<Duration>,
}

impl RenderControl {
    /// Controls with a wall-clock limit.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            cancel: CancelToken::new(),
            timeout: Some(timeout),
        }
    }
}

/// External media-composition capability.
///
/// Implementations execute `graph` over `manifest` and write one file at `out_path`. They must
/// only return after the underlying work has stopped.
pub trait MediaEngine: Send {
    /// Compose and encode; returns the written path.
    fn compose(
        &mut self,
        manifest: &InputManifest,
        graph: &CompositionGraph,
        out_path: &Path,
        control: &RenderControl,
    ) -> NarrataResult<PathBuf>;
}

/// One recorded [`MediaEngine::compose`] call.
#[derive(Clone, Debug)]
pub struct ComposeCall {
    /// Manifest passed in.
    pub manifest: InputManifest,
    /// Graph passed in.
    pub graph: CompositionGraph,
    /// Requested output path.
    pub out_path: PathBuf,
}

/// Engine that records calls instead of encoding.
///
/// On success it writes an empty placeholder at the output path. A scripted failure leaves a
/// truncated placeholder behind, like a real engine that died mid-write.
#[derive(Debug, Default)]
pub struct RecordingEngine {
    calls: Vec<ComposeCall>,
    failure: Option<(String, String)>,
}

impl RecordingEngine {
    /// Engine that always succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine that always fails with the given exit status and diagnostics.
    pub fn failing(status: impl Into<String>, diagnostics: impl Into<String>) -> Self {
        Self {
            calls: Vec::new(),
            failure: Some((status.into(), diagnostics.into())),
        }
    }

    /// Recorded calls in order.
    pub fn calls(&self) -> &[ComposeCall] {
        &self.calls
    }
}

impl MediaEngine for RecordingEngine {
    fn compose(
        &mut self,
        manifest: &InputManifest,
        graph: &CompositionGraph,
        out_path: &Path,
        control: &RenderControl,
    ) -> NarrataResult<PathBuf> {
        self.calls.push(ComposeCall {
            manifest: manifest.clone(),
            graph: graph.clone(),
            out_path: out_path.to_path_buf(),
        });
        if control.cancel.is_cancelled() {
            return Err(NarrataError::cancelled("cancelled by caller"));
        }

        if let Some((status, diagnostics)) = &self.failure {
            std::fs::write(out_path, b"partial")
                .with_context(|| format!("write partial '{}'", out_path.display()))?;
            return Err(NarrataError::render(status.clone(), diagnostics.clone()));
        }

        std::fs::write(out_path, b"")
            .with_context(|| format!("write placeholder '{}'", out_path.display()))?;
        Ok(out_path.to_path_buf())
    }
}
