//! The capture pipeline: `upload → scanning → processing → review`.
//!
//! Scanning submits frames to the detection proxy on a fixed cadence and
//! auto-captures once a confident verdict arrives. Responses are applied
//! under a sequence-number guard so a slow response for an old frame can
//! never overwrite a newer verdict. Processing runs tagging and background
//! removal concurrently and absorbs their failures; the pipeline always
//! reaches review with at least the original photo.

use std::{future::Future, time::Duration};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use bytes::Bytes;
use tracing::{debug, warn};
use uuid::Uuid;

use garb_ai::{
  AiFunctions, dataurl,
  contract::{DetectReport, TagReport},
};
use garb_core::{item::ItemPatch, taxonomy::Category};

use crate::wardrobe::ReviewSubmission;

/// Cadence of the scan loop.
pub const SCAN_INTERVAL: Duration = Duration::from_millis(1500);
/// One faster probe before the regular cadence starts.
pub const FIRST_PROBE_DELAY: Duration = Duration::from_millis(500);
/// How long the captured frame stays on screen before processing begins.
pub const CAPTURE_DISPLAY_DELAY: Duration = Duration::from_millis(500);
/// Minimum detection confidence for auto-capture.
pub const AUTO_CAPTURE_CONFIDENCE: u8 = 80;

// ─── Captured image ──────────────────────────────────────────────────────────

/// A frame or uploaded file on its way into the pipeline.
#[derive(Debug, Clone)]
pub struct CapturedImage {
  pub bytes:        Bytes,
  /// File extension used when keying the stored original (`jpg`, `png`, ...).
  pub ext:          String,
  pub content_type: String,
}

impl CapturedImage {
  /// Build from a user-supplied file. Non-image content types are rejected
  /// here, before any upload or AI call sees the payload.
  pub fn from_upload(bytes: Bytes, content_type: &str) -> crate::Result<Self> {
    let subtype = content_type
      .strip_prefix("image/")
      .ok_or_else(|| crate::Error::UnsupportedFile {
        content_type: content_type.to_owned(),
      })?;
    let ext = match subtype {
      "jpeg" => "jpg",
      "svg+xml" => "svg",
      other => other,
    };
    Ok(Self {
      bytes,
      ext: ext.to_owned(),
      content_type: content_type.to_owned(),
    })
  }

  /// The inline form sent to the AI proxies.
  pub fn to_data_url(&self) -> String {
    format!(
      "data:{};base64,{}",
      self.content_type,
      B64.encode(&self.bytes)
    )
  }
}

// ─── Camera ──────────────────────────────────────────────────────────────────

/// Frame source driving the scan loop.
pub trait Camera: Send {
  type Error: std::error::Error + Send + Sync + 'static;

  fn grab_frame(
    &mut self,
  ) -> impl Future<Output = Result<CapturedImage, Self::Error>> + Send;
}

// ─── Scanner ─────────────────────────────────────────────────────────────────

/// Per-session scan state: the sequence guard and the capture lock.
#[derive(Debug, Default)]
pub struct Scanner {
  next_seq:    u64,
  applied_seq: u64,
  capturing:   bool,
  report:      Option<DetectReport>,
}

/// What applying a detection response did.
#[derive(Debug, PartialEq, Eq)]
pub enum ScanOutcome {
  /// A newer frame's verdict already landed; this one was discarded.
  Stale,
  Updated { auto_capture: bool },
}

impl Scanner {
  pub fn new() -> Self {
    Self::default()
  }

  /// Allocate the sequence number for a frame about to be submitted.
  pub fn begin_frame(&mut self) -> u64 {
    self.next_seq += 1;
    self.next_seq
  }

  /// Apply the verdict for frame `seq`. Verdicts older than the newest
  /// applied one are discarded. Auto-capture triggers at most once per
  /// session: a ready, confident verdict while no capture is in flight.
  pub fn apply(&mut self, seq: u64, report: DetectReport) -> ScanOutcome {
    if seq <= self.applied_seq {
      debug!(seq, newest = self.applied_seq, "discarding stale detection");
      return ScanOutcome::Stale;
    }
    self.applied_seq = seq;

    let auto_capture = report.ready
      && report.confidence >= AUTO_CAPTURE_CONFIDENCE
      && !self.capturing;
    if auto_capture {
      self.capturing = true;
    }
    self.report = Some(report);
    ScanOutcome::Updated { auto_capture }
  }

  /// The newest applied verdict, for the live overlay.
  pub fn report(&self) -> Option<&DetectReport> {
    self.report.as_ref()
  }

  pub fn is_capturing(&self) -> bool {
    self.capturing
  }

  /// Release the capture lock after a failed capture so scanning resumes.
  pub fn release(&mut self) {
    self.capturing = false;
  }
}

// ─── Pipeline ────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum CaptureState {
  /// Idle; accepts a file directly or a switch to scanning.
  Upload,
  Scanning(Scanner),
  Processing,
  Review(ReviewDraft),
  /// Camera permission or hardware failure. Terminal; manual exit only.
  CameraFailed { message: String },
}

pub struct CapturePipeline<A> {
  ai:     A,
  state:  CaptureState,
  /// Human-readable progress line. UI feedback only, never control flow.
  status: String,
}

impl<A: AiFunctions> CapturePipeline<A> {
  pub fn new(ai: A) -> Self {
    Self {
      ai,
      state: CaptureState::Upload,
      status: String::new(),
    }
  }

  pub fn state(&self) -> &CaptureState {
    &self.state
  }

  pub fn status(&self) -> &str {
    &self.status
  }

  pub fn start_scanning(&mut self) {
    self.status = "Scanning...".to_owned();
    self.state = CaptureState::Scanning(Scanner::new());
  }

  pub fn camera_failed(&mut self, message: impl Into<String>) {
    self.state = CaptureState::CameraFailed {
      message: message.into(),
    };
  }

  /// Leave the terminal camera-failure state back to upload.
  pub fn dismiss_camera_failure(&mut self) {
    if matches!(self.state, CaptureState::CameraFailed { .. }) {
      self.state = CaptureState::Upload;
      self.status = String::new();
    }
  }

  /// Submit one frame to detection and apply the verdict. Detection
  /// failures degrade to a not-ready verdict; scanning never aborts over
  /// them.
  pub async fn scan_frame(&mut self, frame: &CapturedImage) -> ScanOutcome {
    let CaptureState::Scanning(scanner) = &mut self.state else {
      return ScanOutcome::Stale;
    };
    let seq = scanner.begin_frame();
    let data_url = frame.to_data_url();

    let report = match self.ai.detect(&data_url).await {
      Ok(report) => report,
      Err(err) => {
        warn!(%err, "detection call failed");
        DetectReport::not_ready("Error scanning")
      }
    };

    let CaptureState::Scanning(scanner) = &mut self.state else {
      return ScanOutcome::Stale;
    };
    scanner.apply(seq, report)
  }

  /// Drive the scan loop against a camera until a frame auto-captures.
  ///
  /// Returns the high-intent capture frame, or `None` after a camera
  /// failure (the pipeline is then in [`CaptureState::CameraFailed`]).
  pub async fn run_scanner<C: Camera>(
    &mut self,
    camera: &mut C,
  ) -> Option<CapturedImage> {
    let mut delay = FIRST_PROBE_DELAY;
    loop {
      tokio::time::sleep(delay).await;
      delay = SCAN_INTERVAL;

      let frame = match camera.grab_frame().await {
        Ok(frame) => frame,
        Err(err) => {
          self.camera_failed(err.to_string());
          return None;
        }
      };

      if let ScanOutcome::Updated { auto_capture: true } =
        self.scan_frame(&frame).await
      {
        // One more, higher-intent frame; fall back to the scanned one if
        // the camera refuses.
        let capture = match camera.grab_frame().await {
          Ok(capture) => capture,
          Err(err) => {
            warn!(%err, "capture grab failed, using scan frame");
            frame
          }
        };
        tokio::time::sleep(CAPTURE_DISPLAY_DELAY).await;
        return Some(capture);
      }
    }
  }

  /// Accept a file (manual upload or auto-capture hand-off) and process it:
  /// tagging and background removal run concurrently, both best-effort.
  pub async fn accept_image(&mut self, image: CapturedImage) -> &ReviewDraft {
    self.state = CaptureState::Processing;
    self.status = "Analyzing item...".to_owned();

    let data_url = image.to_data_url();
    let (tags, cutout) =
      tokio::join!(self.ai.analyze(&data_url), self.ai.remove_background(&data_url));

    let tags = match tags {
      Ok(report) => report,
      Err(err) => {
        warn!(%err, "tagging failed, leaving defaults");
        TagReport::default()
      }
    };
    let cutout_png = match cutout {
      Ok(url) => match dataurl::decode(&url) {
        Ok((_, bytes)) => Some(Bytes::from(bytes)),
        Err(err) => {
          warn!(%err, "cutout data url unusable, keeping original");
          None
        }
      },
      Err(err) => {
        warn!(%err, "background removal failed, keeping original");
        None
      }
    };

    self.status = "Review your item".to_owned();
    self.state = CaptureState::Review(ReviewDraft::new(image, cutout_png, tags));
    match &self.state {
      CaptureState::Review(draft) => draft,
      _ => unreachable!(),
    }
  }

  pub fn review_mut(&mut self) -> Option<&mut ReviewDraft> {
    match &mut self.state {
      CaptureState::Review(draft) => Some(draft),
      _ => None,
    }
  }

  /// Take the draft out for submission. The pipeline stays on review until
  /// the save succeeds; put the draft back via [`CaptureState`] on failure.
  pub fn take_review(&mut self) -> Option<ReviewDraft> {
    if matches!(self.state, CaptureState::Review(_)) {
      match std::mem::replace(&mut self.state, CaptureState::Upload) {
        CaptureState::Review(draft) => Some(draft),
        _ => None,
      }
    } else {
      None
    }
  }

  pub fn restore_review(&mut self, draft: ReviewDraft) {
    self.state = CaptureState::Review(draft);
  }
}

// ─── Review draft ────────────────────────────────────────────────────────────

/// The editable form presented on review, seeded from the tag report.
#[derive(Debug)]
pub struct ReviewDraft {
  pub original:   CapturedImage,
  pub cutout_png: Option<Bytes>,
  pub tags:       ItemPatch,
}

impl ReviewDraft {
  fn new(
    original: CapturedImage,
    cutout_png: Option<Bytes>,
    report: TagReport,
  ) -> Self {
    let category = report.category.unwrap_or(Category::Tops);
    // A subtype outside the detected category's vocabulary is dropped
    // rather than carried into a failing save.
    let subtype = report
      .subtype
      .filter(|s| category.validates_subtype(s));

    Self {
      original,
      cutout_png,
      tags: ItemPatch {
        category,
        subtype,
        primary_color: report.primary_color,
        season: report.season.unwrap_or_default(),
        pattern: report.pattern.unwrap_or_default(),
        dress_level: report.dress_level.unwrap_or_default(),
        layer_role: report.layer_role.unwrap_or_default(),
        favorite: false,
        // Notes are user-entered on the review screen, never auto-tagged.
        notes: None,
      },
    }
  }

  /// Switching category resets the subtype; its vocabulary is
  /// category-scoped.
  pub fn set_category(&mut self, category: Category) {
    if self.tags.category != category {
      self.tags.category = category;
      self.tags.subtype = None;
    }
  }

  /// Finalise into a submission, allocating the item id.
  pub fn into_submission(self, user_id: Uuid) -> ReviewSubmission {
    ReviewSubmission {
      item_id: Uuid::new_v4(),
      user_id,
      original: self.original,
      cutout_png: self.cutout_png,
      tags: self.tags,
    }
  }
}
