//! The edit-session state machine.
//!
//! ```text
//! Empty ──load──▶ Decoding ──ok──▶ Editing ──apply──▶ Applying ──ok──▶ Applied
//!                    │               ▲                   │
//!                    └─err─▶ Failed  └───────err─────────┘
//! ```
//!
//! A [`CropEditor`] owns one raster and one [`CropSession`] at a time.
//! Separate editors share nothing and can be driven from different threads.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::config::{ConfigError, PipelineConfig};
use crate::decode::{decode, DecodeError, ImageSource, SourceFetcher};
use crate::encode::OutputArtifact;
use crate::error::{CropError, CropResult};
use crate::pipeline::CropPipeline;
use crate::raster::Raster;
use crate::session::{CropSession, SessionError};

/// Where an editor is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EditState {
    Empty,
    Decoding,
    Editing,
    Applying,
    Applied,
    Failed,
}

impl EditState {
    pub fn as_str(self) -> &'static str {
        match self {
            EditState::Empty => "empty",
            EditState::Decoding => "decoding",
            EditState::Editing => "editing",
            EditState::Applying => "applying",
            EditState::Applied => "applied",
            EditState::Failed => "failed",
        }
    }
}

impl fmt::Display for EditState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cancels the apply of the session that was current when it was taken.
///
/// The in-flight work still runs to completion; its result is discarded
/// and the editor returns to [`EditState::Empty`]. Loading a new source
/// detaches every handle taken before it.
#[derive(Debug, Clone)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug)]
pub struct CropEditor {
    pipeline: CropPipeline,
    state: EditState,
    raster: Option<Arc<Raster>>,
    session: Option<CropSession>,
    last_error: Option<CropError>,
    cancel: CancelHandle,
}

impl CropEditor {
    pub fn new(config: PipelineConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            pipeline: CropPipeline::new(config)?,
            state: EditState::Empty,
            raster: None,
            session: None,
            last_error: None,
            cancel: CancelHandle(Arc::new(AtomicBool::new(false))),
        })
    }

    pub fn avatar() -> Self {
        Self::with_pipeline(PipelineConfig::avatar())
    }

    pub fn showcase() -> Self {
        Self::with_pipeline(PipelineConfig::showcase())
    }

    // presets are always valid
    fn with_pipeline(config: PipelineConfig) -> Self {
        Self {
            pipeline: CropPipeline { config },
            state: EditState::Empty,
            raster: None,
            session: None,
            last_error: None,
            cancel: CancelHandle(Arc::new(AtomicBool::new(false))),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        self.pipeline.config()
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    /// The most recent decode or apply failure, cleared by the next success.
    pub fn last_error(&self) -> Option<&CropError> {
        self.last_error.as_ref()
    }

    pub fn raster(&self) -> Option<&Raster> {
        self.raster.as_deref()
    }

    pub fn session(&self) -> Option<&CropSession> {
        self.session.as_ref()
    }

    /// Mutable access to the session, only while editing.
    pub fn session_mut(&mut self) -> Result<&mut CropSession, SessionError> {
        let state = self.state;
        match (state, self.session.as_mut()) {
            (EditState::Editing, Some(session)) => Ok(session),
            _ => Err(SessionError::InvalidTransition {
                from: state,
                action: "edit the session",
            }),
        }
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Decode `source` and start a fresh session on it.
    ///
    /// A decode failure moves the editor to [`EditState::Failed`] and leaves
    /// any previously loaded raster in place until
    /// [`acknowledge_failure`](Self::acknowledge_failure).
    pub fn load(&mut self, source: &ImageSource, fetcher: &dyn SourceFetcher) -> CropResult<()> {
        self.begin_load()?;
        let result = decode(source, fetcher);
        self.finish_load(result)
    }

    /// [`load`](Self::load) with decoding moved onto the blocking thread pool.
    #[cfg(feature = "async")]
    pub async fn load_async<F>(&mut self, source: ImageSource, fetcher: F) -> CropResult<()>
    where
        F: SourceFetcher + Send + 'static,
    {
        self.begin_load()?;
        let result = blocking::unblock(move || decode(&source, &fetcher)).await;
        self.finish_load(result)
    }

    /// Leave [`EditState::Failed`], discarding the raster and session.
    pub fn acknowledge_failure(&mut self) -> CropResult<()> {
        self.require(&[EditState::Failed], "acknowledge a failure")?;
        self.teardown(EditState::Empty);
        Ok(())
    }

    /// Run the pipeline on the current session.
    ///
    /// Returns `Ok(None)` if the session was cancelled through a
    /// [`CancelHandle`]. On a stage error the editor goes back to
    /// [`EditState::Editing`] with zoom, rotation and pan untouched.
    pub fn apply(&mut self) -> CropResult<Option<OutputArtifact>> {
        let (raster, session) = self.begin_apply()?;
        let result = self.pipeline.run(&raster, &session);
        self.finish_apply(result)
    }

    /// [`apply`](Self::apply) with the pipeline moved onto the blocking
    /// thread pool. Take a [`CancelHandle`] before awaiting to cancel it.
    #[cfg(feature = "async")]
    pub async fn apply_async(&mut self) -> CropResult<Option<OutputArtifact>> {
        let (raster, session) = self.begin_apply()?;
        let pipeline = self.pipeline.clone();
        let result = blocking::unblock(move || pipeline.run(&raster, &session)).await;
        self.finish_apply(result)
    }

    /// Discard the current source and session.
    ///
    /// Also recovers an editor whose apply future was dropped mid-flight.
    pub fn cancel(&mut self) -> CropResult<()> {
        self.require(
            &[
                EditState::Editing,
                EditState::Applying,
                EditState::Applied,
                EditState::Failed,
            ],
            "cancel",
        )?;
        self.cancel.cancel();
        self.teardown(EditState::Empty);
        Ok(())
    }

    fn require(&self, allowed: &[EditState], action: &'static str) -> Result<(), SessionError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                from: self.state,
                action,
            })
        }
    }

    fn transition(&mut self, to: EditState) {
        tracing::info!(from = %self.state, %to, "edit state changed");
        self.state = to;
    }

    fn teardown(&mut self, to: EditState) {
        self.raster = None;
        self.session = None;
        self.last_error = None;
        self.transition(to);
    }

    fn begin_load(&mut self) -> Result<(), SessionError> {
        self.require(
            &[
                EditState::Empty,
                EditState::Editing,
                EditState::Applied,
                EditState::Failed,
            ],
            "load an image",
        )?;
        self.transition(EditState::Decoding);
        Ok(())
    }

    fn finish_load(&mut self, result: Result<Raster, DecodeError>) -> CropResult<()> {
        match result {
            Ok(raster) => {
                let session = CropSession::from_config(self.pipeline.config())?;
                self.raster = Some(Arc::new(raster));
                self.session = Some(session);
                self.last_error = None;
                self.cancel = CancelHandle(Arc::new(AtomicBool::new(false)));
                self.transition(EditState::Editing);
                Ok(())
            }
            Err(e) => {
                let err = CropError::from(e);
                self.last_error = Some(err.clone());
                self.transition(EditState::Failed);
                Err(err)
            }
        }
    }

    fn begin_apply(&mut self) -> CropResult<(Arc<Raster>, CropSession)> {
        self.require(&[EditState::Editing], "apply")?;
        let (Some(raster), Some(session)) = (&self.raster, &self.session) else {
            return Err(SessionError::InvalidTransition {
                from: self.state,
                action: "apply without an image",
            }
            .into());
        };
        let work = (Arc::clone(raster), session.clone());
        self.transition(EditState::Applying);
        Ok(work)
    }

    fn finish_apply(
        &mut self,
        result: CropResult<OutputArtifact>,
    ) -> CropResult<Option<OutputArtifact>> {
        if self.cancel.is_cancelled() {
            tracing::info!("discarding cancelled apply");
            self.teardown(EditState::Empty);
            return Ok(None);
        }
        match result {
            Ok(artifact) => {
                self.teardown(EditState::Applied);
                Ok(Some(artifact))
            }
            Err(e) => {
                self.last_error = Some(e.clone());
                self.transition(EditState::Editing);
                Err(e)
            }
        }
    }
}
