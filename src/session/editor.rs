use std::sync::Arc;

use crate::assets::decode::{decode_frame_async, decode_image_async, looks_like_svg};
use crate::assets::store::{ImageCache, ImageKey, PreparedImage, read_asset};
use crate::assets::upload::{UploadCandidate, UploadPolicy};
use crate::config::EditorConfig;
use crate::export::png::{ExportArtifact, encode_png, export_file_name, unix_millis_now};
use crate::export::sink::ExportSink;
use crate::foundation::core::{Canvas, Point, Vec2};
use crate::foundation::error::{TwibbonError, TwibbonResult};
use crate::notice::{NoticeBus, NoticeVariant};
use crate::render::cpu::Compositor;
use crate::render::surface::Surface;
use crate::scene::controls::{Controls, DisplaySize, DragTracker};
use crate::scene::frame::FrameState;
use crate::scene::photo::{PhotoState, PhotoTransform};

/// A validated photo upload waiting to be decoded.
///
/// Decoding does not borrow the editor, so several uploads may be in flight; only the most recent
/// one is applied by [`Editor::finish_upload`].
#[derive(Debug, Clone)]
pub struct PendingPhoto {
    ticket: u64,
    mime: String,
    bytes: Arc<[u8]>,
}

impl PendingPhoto {
    /// Resolved MIME type.
    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Decode on the blocking pool.
    pub async fn decode(self) -> DecodedPhoto {
        let result = decode_image_async(self.bytes).await.map(Arc::new);
        DecodedPhoto {
            ticket: self.ticket,
            result,
        }
    }
}

/// Outcome of [`PendingPhoto::decode`].
#[derive(Debug)]
pub struct DecodedPhoto {
    ticket: u64,
    result: TwibbonResult<Arc<PreparedImage>>,
}

/// A frame overlay load: either served from the decode cache or still to decode.
#[derive(Debug)]
pub struct PendingFrame {
    inner: FrameSource,
}

#[derive(Debug)]
enum FrameSource {
    Cached(Arc<PreparedImage>),
    Decode {
        key: ImageKey,
        bytes: Arc<[u8]>,
        canvas: Canvas,
    },
}

/// Outcome of [`PendingFrame::resolve`].
#[derive(Debug)]
pub struct DecodedFrame {
    key: Option<ImageKey>,
    result: TwibbonResult<Arc<PreparedImage>>,
}

impl PendingFrame {
    /// Return `true` if no decode is needed.
    pub fn is_cached(&self) -> bool {
        matches!(self.inner, FrameSource::Cached(_))
    }

    /// Decode if needed.
    pub async fn resolve(self) -> DecodedFrame {
        match self.inner {
            FrameSource::Cached(image) => DecodedFrame {
                key: None,
                result: Ok(image),
            },
            FrameSource::Decode { key, bytes, canvas } => DecodedFrame {
                key: Some(key),
                result: decode_frame_async(bytes, canvas).await.map(Arc::new),
            },
        }
    }
}

/// Editing session: one photo, one frame, one canvas.
///
/// Preview and export both render through the same [`Compositor`] at the same canvas size. The
/// editor is single-owner, so a render triggered by a decode and one triggered by a drag never
/// interleave.
#[derive(Debug)]
pub struct Editor {
    config: EditorConfig,
    compositor: Compositor,
    controls: Controls,
    photo: PhotoState,
    frame: FrameState,
    notices: NoticeBus,
    frame_cache: ImageCache,
    drag: DragTracker,
    photo_ticket: u64,
    revision: u64,
    preview: Option<(u64, Surface)>,
    render_count: u64,
}

impl Editor {
    /// Create a session from `config`. No images are loaded yet.
    pub fn new(config: EditorConfig) -> TwibbonResult<Self> {
        config.validate()?;
        let canvas = config.canvas;
        let frame = FrameState::new(config.frame_info()?.clone());
        Ok(Self {
            compositor: Compositor::new(canvas)?,
            controls: Controls::new(canvas),
            photo: PhotoState::empty(),
            frame,
            notices: NoticeBus::new(config.notice_ttl()),
            frame_cache: ImageCache::default(),
            drag: DragTracker::default(),
            photo_ticket: 0,
            revision: 0,
            preview: None,
            render_count: 0,
            config,
        })
    }

    /// Shared preview/export canvas.
    pub fn canvas(&self) -> Canvas {
        self.config.canvas
    }

    /// Active configuration.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Current photo state.
    pub fn photo(&self) -> &PhotoState {
        &self.photo
    }

    /// Current frame state.
    pub fn frame(&self) -> &FrameState {
        &self.frame
    }

    /// Control bounds and input mapping.
    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    /// Notice bus; subscribe here to observe failures.
    pub fn notices(&self) -> &NoticeBus {
        &self.notices
    }

    /// Mutable notice bus, for dismissing and expiring notices.
    pub fn notices_mut(&mut self) -> &mut NoticeBus {
        &mut self.notices
    }

    /// Upload policy in effect.
    pub fn upload_policy(&self) -> &UploadPolicy {
        &self.config.upload
    }

    /// Total render passes executed (preview and export).
    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    /// Return `true` once both the photo and the frame have been decoded.
    pub fn is_ready(&self) -> bool {
        self.photo.has_image() && self.frame.is_loaded()
    }

    /// Frame cache statistics `(hits, misses)`.
    pub fn frame_cache_stats(&self) -> (u64, u64) {
        (self.frame_cache.hits(), self.frame_cache.misses())
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    fn fail<T>(&mut self, err: TwibbonError) -> TwibbonResult<T> {
        tracing::warn!(error = %err, "editor operation failed");
        self.notices.report_error(&err);
        Err(err)
    }

    // Upload

    /// Validate an upload and issue a decode ticket.
    ///
    /// Rejected uploads raise a notice and leave the photo untouched.
    pub fn begin_upload(&mut self, candidate: &UploadCandidate<'_>) -> TwibbonResult<PendingPhoto> {
        let mime = match self.config.upload.validate(candidate) {
            Ok(m) => m,
            Err(e) => return self.fail(e),
        };
        self.photo_ticket += 1;
        tracing::info!(ticket = self.photo_ticket, %mime, len = candidate.bytes.len(), "upload accepted");
        Ok(PendingPhoto {
            ticket: self.photo_ticket,
            mime,
            bytes: Arc::from(candidate.bytes),
        })
    }

    /// Apply a decoded photo.
    ///
    /// Returns `Ok(false)` when a newer upload has been issued since, in which case the result is
    /// discarded. A decode failure blanks the photo layer and raises a notice.
    pub fn finish_upload(&mut self, decoded: DecodedPhoto) -> TwibbonResult<bool> {
        if decoded.ticket != self.photo_ticket {
            tracing::debug!(
                ticket = decoded.ticket,
                latest = self.photo_ticket,
                "discarding superseded photo decode"
            );
            return Ok(false);
        }
        match decoded.result {
            Ok(image) => {
                self.photo.replace_image(image);
                self.drag.end();
                self.touch();
                self.notices
                    .push("Photo uploaded", None, NoticeVariant::Success);
                Ok(true)
            }
            Err(e) => {
                self.photo.clear_image();
                self.drag.end();
                self.touch();
                self.fail(e)
            }
        }
    }

    /// Validate, decode and apply a photo upload.
    pub async fn upload_photo(&mut self, candidate: &UploadCandidate<'_>) -> TwibbonResult<()> {
        let pending = self.begin_upload(candidate)?;
        let decoded = pending.decode().await;
        self.finish_upload(decoded).map(|_| ())
    }

    // Frame

    /// Prepare a frame load from encoded bytes, consulting the decode cache.
    pub fn begin_frame(&mut self, bytes: Arc<[u8]>) -> PendingFrame {
        let canvas = self.canvas();
        let raster = looks_like_svg(&bytes).then_some((canvas.width, canvas.height));
        let key = ImageKey::new(&bytes, raster);
        let inner = match self.frame_cache.get(&key) {
            Some(image) => {
                tracing::debug!("frame decode skipped: cache hit");
                FrameSource::Cached(image)
            }
            None => FrameSource::Decode { key, bytes, canvas },
        };
        PendingFrame { inner }
    }

    /// Apply a decoded frame.
    pub fn finish_frame(&mut self, decoded: DecodedFrame) -> TwibbonResult<()> {
        match decoded.result {
            Ok(image) => {
                if let Some(key) = decoded.key {
                    self.frame_cache.insert(key, Arc::clone(&image));
                }
                let unchanged = self
                    .frame
                    .image()
                    .is_some_and(|cur| Arc::ptr_eq(cur, &image));
                if !unchanged {
                    self.frame.image = Some(image);
                    self.touch();
                }
                Ok(())
            }
            Err(e) => {
                if self.frame.image.take().is_some() {
                    self.touch();
                }
                self.fail(e)
            }
        }
    }

    /// Decode and apply frame overlay bytes.
    pub async fn load_frame_bytes(&mut self, bytes: Arc<[u8]>) -> TwibbonResult<()> {
        let decoded = self.begin_frame(bytes).resolve().await;
        self.finish_frame(decoded)
    }

    /// Read the configured frame from the assets root.
    pub fn read_frame_asset(&mut self) -> TwibbonResult<Arc<[u8]>> {
        let source = self.frame.info.source.clone();
        match read_asset(&self.config.assets_root, &source) {
            Ok(bytes) => Ok(Arc::from(bytes)),
            Err(e) => self.fail(e),
        }
    }

    /// Load the configured frame overlay from disk.
    pub async fn load_frame(&mut self) -> TwibbonResult<()> {
        let bytes = self.read_frame_asset()?;
        self.load_frame_bytes(bytes).await
    }

    /// Validate a photo, then decode it and the frame overlay concurrently.
    ///
    /// Both results are applied before returning, so the next render is a complete composite.
    /// Each failure raises its own notice; the first one is returned.
    #[tracing::instrument(skip_all)]
    pub async fn load(
        &mut self,
        photo: &UploadCandidate<'_>,
        frame_bytes: Arc<[u8]>,
    ) -> TwibbonResult<()> {
        let pending_photo = self.begin_upload(photo)?;
        let pending_frame = self.begin_frame(frame_bytes);
        let (decoded_photo, decoded_frame) =
            tokio::join!(pending_photo.decode(), pending_frame.resolve());
        let frame_res = self.finish_frame(decoded_frame);
        let photo_res = self.finish_upload(decoded_photo).map(|_| ());
        photo_res.and(frame_res)
    }

    // Controls

    /// Zoom slider.
    pub fn set_scale(&mut self, v: f64) {
        if self.controls.set_scale(&mut self.photo.transform, v) {
            self.touch();
        }
    }

    /// Rotation slider, degrees.
    pub fn set_rotation(&mut self, v: f64) {
        if self.controls.set_rotation(&mut self.photo.transform, v) {
            self.touch();
        }
    }

    /// Horizontal position slider.
    pub fn set_offset_x(&mut self, v: f64) {
        if self.controls.set_offset_x(&mut self.photo.transform, v) {
            self.touch();
        }
    }

    /// Vertical position slider.
    pub fn set_offset_y(&mut self, v: f64) {
        if self.controls.set_offset_y(&mut self.photo.transform, v) {
            self.touch();
        }
    }

    /// Replace the whole transform, clamped to the control bounds.
    pub fn set_transform(&mut self, t: PhotoTransform) {
        let next = self.controls.bounds().clamp(t);
        if next != self.photo.transform {
            self.photo.transform = next;
            self.touch();
        }
    }

    /// Pointer or touch pressed at `pos` (displayed-canvas coordinates).
    ///
    /// Ignored until a photo is loaded.
    pub fn pointer_down(&mut self, pos: Point) {
        if self.photo.has_image() {
            self.drag.begin(pos);
        }
    }

    /// Pointer moved; pans the photo by the rescaled delta while dragging.
    pub fn pointer_move(&mut self, pos: Point, displayed: DisplaySize) -> bool {
        let Some(delta) = self.drag.update(pos) else {
            return false;
        };
        self.pan_by(delta, displayed)
    }

    /// Pointer released or left the canvas.
    pub fn pointer_up(&mut self) {
        self.drag.end();
    }

    /// Pan by a screen-space delta.
    pub fn pan_by(&mut self, screen_delta: Vec2, displayed: DisplaySize) -> bool {
        let changed = self
            .controls
            .apply_drag(&mut self.photo.transform, displayed, screen_delta);
        if changed {
            self.touch();
        }
        changed
    }

    // Rendering

    /// Current preview, re-rendered if anything changed since the last call.
    pub fn preview(&mut self) -> TwibbonResult<&Surface> {
        let fresh = matches!(&self.preview, Some((rev, _)) if *rev == self.revision);
        if !fresh {
            let surface = self.render_now()?;
            self.preview = Some((self.revision, surface));
        }
        match &self.preview {
            Some((_, s)) => Ok(s),
            None => Err(TwibbonError::validation("preview unavailable")),
        }
    }

    fn render_now(&mut self) -> TwibbonResult<Surface> {
        self.render_count += 1;
        self.compositor.render(&self.photo, &self.frame)
    }

    /// Render once at full resolution and hand the PNG to `sink`.
    pub fn export(&mut self, sink: &mut dyn ExportSink) -> TwibbonResult<ExportArtifact> {
        self.export_at(sink, unix_millis_now())
    }

    /// Like [`Self::export`] with an explicit timestamp for the file name.
    ///
    /// Always performs a fresh render pass; the cached preview is never reused.
    #[tracing::instrument(skip(self, sink))]
    pub fn export_at(
        &mut self,
        sink: &mut dyn ExportSink,
        unix_millis: u128,
    ) -> TwibbonResult<ExportArtifact> {
        match self.export_inner(sink, unix_millis) {
            Ok((artifact, location)) => {
                self.notices.push(
                    "Twibbon downloaded",
                    Some(location),
                    NoticeVariant::Success,
                );
                Ok(artifact)
            }
            Err(e) => {
                let e = match e {
                    TwibbonError::ExportFailed(_) => e,
                    other => TwibbonError::export_failed(other.to_string()),
                };
                self.fail(e)
            }
        }
    }

    fn export_inner(
        &mut self,
        sink: &mut dyn ExportSink,
        unix_millis: u128,
    ) -> TwibbonResult<(ExportArtifact, String)> {
        let surface = self.render_now()?;
        let bytes = encode_png(&surface)?;
        let artifact = ExportArtifact {
            file_name: export_file_name(&self.frame.info.id, unix_millis),
            bytes,
            width: surface.width,
            height: surface.height,
        };
        let location = sink.save(&artifact)?;
        Ok((artifact, location))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/editor.rs"]
mod tests;
