//! Workflow controller: the single-screen state machine.
//!
//! Each public action is a named transition that owns its side effects:
//! releasing the camera, replacing or clearing the preview, announcing the
//! new status. All state lives behind one mutex, which is never held across
//! camera acquisition or the analysis request. While a request is
//! outstanding, further analysis presses are ignored.
//!
//! The futures returned by [`WorkflowController::open_camera`] and
//! [`WorkflowController::run_analysis`] may be dropped mid-flight. A dropped
//! camera open falls back to `NoImage`; a dropped analysis frees the request
//! slot and resolves `loading` into `error`.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;
use tracing::{debug, info, warn};
use vizassist_core::{AnalysisPhase, AssistError, Catalog, ImageHandle, Mode, Operation, Status};
use vizassist_logging::{WorkflowEvent, WorkflowEventLogger};
use vizassist_media::{CaptureSession, ImageSource, MediaCapture, PreviewRegistry};
use vizassist_tts::SpeechFeedback;
use vizassist_understanding::AnalysisService;

use crate::snapshot::Snapshot;

enum Stage {
    NoImage,
    /// `session` is `None` while the device is still being acquired.
    CameraOpen {
        attempt: u64,
        session: Option<CaptureSession>,
    },
    ImageReady {
        phase: AnalysisPhase,
        /// Request whose response may resolve `phase`.
        request: Option<u64>,
    },
}

impl Stage {
    fn mode(&self) -> Mode {
        match self {
            Self::NoImage => Mode::NoImage,
            Self::CameraOpen { .. } => Mode::CameraOpen,
            Self::ImageReady { .. } => Mode::ImageReady,
        }
    }

    fn ready() -> Self {
        Self::ImageReady {
            phase: AnalysisPhase::Idle,
            request: None,
        }
    }

    fn awaits_camera(&self, attempt: u64) -> bool {
        matches!(
            self,
            Self::CameraOpen { attempt: current, session: None } if *current == attempt
        )
    }

    fn awaits_request(&self, request_id: u64) -> bool {
        matches!(
            self,
            Self::ImageReady { request: Some(current), .. } if *current == request_id
        )
    }
}

struct Inner {
    stage: Stage,
    images: ImageSource,
    status: Status,
    status_text: String,
    /// The single outstanding analysis request, if any.
    in_flight: Option<u64>,
    next_request: u64,
    camera_attempts: u64,
}

/// Settles a camera acquisition whose future was dropped before it finished.
struct PendingCamera<'a> {
    controller: &'a WorkflowController,
    attempt: u64,
    settled: bool,
}

impl Drop for PendingCamera<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.controller.abandon_camera(self.attempt);
        }
    }
}

/// Settles an analysis request whose future was dropped before the response.
struct PendingRequest<'a> {
    controller: &'a WorkflowController,
    request_id: u64,
    operation: Operation,
    settled: bool,
}

impl Drop for PendingRequest<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.controller
                .abandon_request(self.request_id, self.operation);
        }
    }
}

pub struct WorkflowController {
    inner: Mutex<Inner>,
    capture: MediaCapture,
    analysis: Arc<dyn AnalysisService>,
    speech: SpeechFeedback,
    catalog: Catalog,
    snapshots: watch::Sender<Snapshot>,
}

impl WorkflowController {
    /// Start in `NoImage` with the welcome prompt. The prompt is not spoken
    /// until [`repeat_status`](Self::repeat_status) is called.
    pub fn new(
        capture: MediaCapture,
        analysis: Arc<dyn AnalysisService>,
        speech: SpeechFeedback,
        catalog: Catalog,
        previews: Arc<PreviewRegistry>,
    ) -> Self {
        let status = Status::Welcome;
        let status_text = catalog.render(&status);
        let inner = Inner {
            stage: Stage::NoImage,
            images: ImageSource::new(previews),
            status,
            status_text,
            in_flight: None,
            next_request: 0,
            camera_attempts: 0,
        };
        let (snapshots, _) = watch::channel(snapshot_of(&inner));
        Self {
            inner: Mutex::new(inner),
            capture,
            analysis,
            speech,
            catalog,
            snapshots,
        }
    }

    fn state(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Receive a fresh [`Snapshot`] after every transition.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.subscribe()
    }

    pub async fn snapshot(&self) -> Snapshot {
        snapshot_of(&self.state())
    }

    /// Use a picked file. Valid from any mode; closes the camera if open.
    pub async fn select_file(&self, image: ImageHandle) {
        let mut inner = self.state();
        let name = image.name.clone();
        self.enter(&mut inner, "select_file", Stage::ready());
        inner.images.set(image);
        self.announce(&mut inner, Status::FileSelected { name });
    }

    /// Switch to the live camera. Returns whether a stream is now live.
    ///
    /// Acquisition failure falls back to `NoImage` with an error status; it
    /// is never retried automatically.
    pub async fn open_camera(&self) -> bool {
        let attempt = {
            let mut inner = self.state();
            if matches!(inner.stage, Stage::CameraOpen { .. }) {
                reject("open_camera", "camera already open");
                return false;
            }
            inner.images.clear();
            inner.camera_attempts += 1;
            let attempt = inner.camera_attempts;
            self.enter(
                &mut inner,
                "open_camera",
                Stage::CameraOpen {
                    attempt,
                    session: None,
                },
            );
            self.announce(&mut inner, Status::CameraOpening);
            attempt
        };

        let mut pending = PendingCamera {
            controller: self,
            attempt,
            settled: false,
        };
        let acquired = self.capture.acquire().await;
        pending.settled = true;

        let mut inner = self.state();
        let still_waiting = inner.stage.awaits_camera(attempt);
        match acquired {
            Ok(session) if still_waiting => {
                if let Stage::CameraOpen { session: slot, .. } = &mut inner.stage {
                    *slot = Some(session);
                }
                self.announce(&mut inner, Status::CameraReady);
                true
            }
            Ok(mut session) => {
                debug!(stream = %session.id(), "Camera acquired after the user left camera mode");
                self.capture.release(&mut session);
                false
            }
            Err(e) if still_waiting => {
                log_error("open_camera", &e);
                self.enter(&mut inner, "camera_failed", Stage::NoImage);
                self.announce(&mut inner, Status::CameraUnavailable);
                false
            }
            Err(e) => {
                debug!(error = %e, "Camera acquisition failed after the user left camera mode");
                false
            }
        }
    }

    /// Take a photo from the live camera. Only valid while a stream is live;
    /// otherwise nothing changes.
    pub async fn capture(&self) -> bool {
        let mut inner = self.state();
        let Stage::CameraOpen {
            session: Some(session),
            ..
        } = &inner.stage
        else {
            reject("capture", "camera is not live");
            return false;
        };

        match self.capture.grab_frame(session) {
            Ok(image) => {
                self.enter(&mut inner, "capture", Stage::ready());
                inner.images.set(image);
                self.announce(&mut inner, Status::PhotoCaptured);
                true
            }
            Err(e) => {
                log_error("capture", &e);
                self.announce(&mut inner, Status::CaptureFailed);
                false
            }
        }
    }

    /// Discard the current image and go back to `NoImage`.
    pub async fn retake(&self) -> bool {
        let mut inner = self.state();
        if !matches!(inner.stage, Stage::ImageReady { .. }) {
            reject("retake", "no image to discard");
            return false;
        }
        inner.images.clear();
        self.enter(&mut inner, "retake", Stage::NoImage);
        self.announce(&mut inner, Status::Cleared);
        true
    }

    /// Run one remote analysis on the current image.
    ///
    /// Returns `false` without contacting the service when no image is ready
    /// or another request is still pending. Otherwise exactly one request is
    /// sent and its outcome resolves the loading state, unless the user has
    /// since moved on, in which case the outcome is dropped.
    pub async fn run_analysis(&self, operation: Operation) -> bool {
        let (request_id, image) = {
            let mut inner = self.state();
            if inner.in_flight.is_some() {
                reject("run_analysis", "a request is already in flight");
                return false;
            }
            if !matches!(inner.stage, Stage::ImageReady { .. }) {
                reject("run_analysis", "no image ready");
                return false;
            }
            let Some(image) = inner.images.image().cloned() else {
                reject("run_analysis", "no image ready");
                return false;
            };
            inner.next_request += 1;
            let request_id = inner.next_request;
            inner.in_flight = Some(request_id);
            inner.stage = Stage::ImageReady {
                phase: AnalysisPhase::Loading { operation },
                request: Some(request_id),
            };
            WorkflowEventLogger::log(WorkflowEvent::RequestStarted {
                request_id,
                operation,
            });
            self.announce(&mut inner, Status::Analyzing { operation });
            (request_id, image)
        };

        let mut pending = PendingRequest {
            controller: self,
            request_id,
            operation,
            settled: false,
        };
        let outcome = self.analysis.analyze(operation, &image).await;
        pending.settled = true;

        let mut inner = self.state();
        inner.in_flight = None;
        let applies = inner.stage.awaits_request(request_id);
        WorkflowEventLogger::log(WorkflowEvent::RequestFinished {
            request_id,
            operation,
            ok: outcome.is_ok(),
            applied: applies,
        });
        if !applies {
            info!(request_id, operation = %operation, "Discarding analysis outcome for a replaced image");
            return true;
        }

        match outcome {
            Ok(text) => {
                inner.stage = Stage::ImageReady {
                    phase: AnalysisPhase::Result {
                        operation,
                        text: text.clone(),
                    },
                    request: None,
                };
                self.announce(&mut inner, Status::Result { text });
            }
            Err(e) => {
                log_error("run_analysis", &e);
                inner.stage = Stage::ImageReady {
                    phase: AnalysisPhase::Error { operation },
                    request: None,
                };
                self.announce(&mut inner, Status::AnalysisFailed);
            }
        }
        true
    }

    /// Speak the current status again.
    pub async fn repeat_status(&self) -> bool {
        let inner = self.state();
        let spoken = self.speech.speak(&inner.status_text);
        WorkflowEventLogger::log(WorkflowEvent::Status {
            message: inner.status_text.clone(),
            spoken,
        });
        spoken
    }

    /// Release the camera, drop the image and preview, and silence speech.
    pub async fn shutdown(&self) {
        let mut inner = self.state();
        inner.images.clear();
        self.enter(&mut inner, "shutdown", Stage::NoImage);
        self.speech.cancel();
        self.publish(&inner);
        info!("Workflow shut down");
    }

    fn abandon_camera(&self, attempt: u64) {
        let mut inner = self.state();
        if !inner.stage.awaits_camera(attempt) {
            return;
        }
        warn!(attempt, "Camera acquisition abandoned before it finished");
        self.enter(&mut inner, "camera_abandoned", Stage::NoImage);
        self.announce(&mut inner, Status::CameraUnavailable);
    }

    fn abandon_request(&self, request_id: u64, operation: Operation) {
        let mut inner = self.state();
        if inner.in_flight == Some(request_id) {
            inner.in_flight = None;
        }
        let applies = inner.stage.awaits_request(request_id);
        WorkflowEventLogger::log(WorkflowEvent::RequestFinished {
            request_id,
            operation,
            ok: false,
            applied: applies,
        });
        warn!(request_id, operation = %operation, "Analysis request abandoned before a response");
        if applies {
            inner.stage = Stage::ImageReady {
                phase: AnalysisPhase::Error { operation },
                request: None,
            };
            self.announce(&mut inner, Status::AnalysisFailed);
        }
    }

    /// Replace the stage, releasing any camera stream the old stage held.
    /// The caller publishes once the transition is complete.
    fn enter(&self, inner: &mut Inner, action: &'static str, stage: Stage) {
        let from = inner.stage.mode();
        let to = stage.mode();
        let previous = std::mem::replace(&mut inner.stage, stage);
        if let Stage::CameraOpen {
            session: Some(mut session),
            ..
        } = previous
        {
            self.capture.release(&mut session);
        }
        WorkflowEventLogger::log(WorkflowEvent::Transition { action, from, to });
    }

    /// Set the status, speak it, and publish. One speak call per status.
    fn announce(&self, inner: &mut Inner, status: Status) {
        let text = self.catalog.render(&status);
        inner.status = status;
        inner.status_text = text;
        let spoken = self.speech.speak(&inner.status_text);
        WorkflowEventLogger::log(WorkflowEvent::Status {
            message: inner.status_text.clone(),
            spoken,
        });
        self.publish(inner);
    }

    fn publish(&self, inner: &Inner) {
        self.snapshots.send_replace(snapshot_of(inner));
    }
}

fn snapshot_of(inner: &Inner) -> Snapshot {
    let (analysis, camera_live) = match &inner.stage {
        Stage::NoImage => (None, false),
        Stage::CameraOpen { session, .. } => (None, session.as_ref().is_some_and(CaptureSession::is_live)),
        Stage::ImageReady { phase, .. } => (Some(phase.clone()), false),
    };
    Snapshot {
        mode: inner.stage.mode(),
        analysis,
        status: inner.status_text.clone(),
        image_name: inner.images.image().map(|i| i.name.clone()),
        preview_url: inner.images.preview_url().map(str::to_string),
        camera_live,
    }
}

fn reject(action: &'static str, reason: &'static str) {
    debug!(action, reason, "Action ignored");
    WorkflowEventLogger::log(WorkflowEvent::Rejected { action, reason });
}

fn log_error(action: &'static str, error: &AssistError) {
    warn!(action, error = %error, "Workflow action failed");
    WorkflowEventLogger::log(WorkflowEvent::Error {
        action,
        error_msg: error.to_string(),
    });
}
