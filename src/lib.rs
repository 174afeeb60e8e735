#![forbid(unsafe_code)]

//! Photo frame ("twibbon") compositor.
//!
//! A user photo is positioned, scaled and rotated beneath a decorative frame overlay on a
//! fixed-size canvas. The same [`Compositor`] renders both the preview and the exported PNG, so
//! what is shown is exactly what is saved.
//!
//! Most callers drive an [`Editor`]: upload a photo, load the frame, adjust the transform through
//! slider/drag input, then [`Editor::export`] into an [`ExportSink`]. Failures are returned as
//! [`TwibbonError`] and also posted once to the editor's [`NoticeBus`].

pub(crate) mod assets;
pub(crate) mod config;
pub(crate) mod export;
pub(crate) mod foundation;
pub(crate) mod notice;
pub(crate) mod render;
pub(crate) mod scene;
pub(crate) mod session;

pub use assets::decode::{
    MAX_IMAGE_DIM, decode_frame, decode_frame_async, decode_image, decode_image_async,
    looks_like_svg, parse_svg,
};
pub use assets::store::PreparedImage;
pub use assets::upload::{
    DEFAULT_ALLOWED_TYPES, DEFAULT_MAX_UPLOAD_BYTES, UploadCandidate, UploadPolicy,
};
pub use config::EditorConfig;
pub use export::png::{ExportArtifact, encode_png, export_file_name, unix_millis_now};
pub use export::sink::{DirSink, ExportSink, InMemorySink};
pub use foundation::core::{Affine, Canvas, MAX_CANVAS_DIM, Point, Rect, Rgba8Premul, Vec2};
pub use foundation::error::{TwibbonError, TwibbonResult};
pub use notice::{
    DEFAULT_NOTICE_TTL, Notice, NoticeBus, NoticeId, NoticeSubscription, NoticeVariant,
};
pub use render::cpu::Compositor;
pub use render::placement::{CoverFit, PhotoPlacement, cover_fit, pivot_transform};
pub use render::surface::Surface;
pub use scene::controls::{
    Controls, DisplaySize, DragTracker, SliderRange, TransformBounds, screen_to_canvas_delta,
};
pub use scene::frame::{ALL_CATEGORIES, FrameCatalog, FrameInfo, FrameState};
pub use scene::photo::{PhotoState, PhotoTransform};
pub use session::editor::{DecodedFrame, DecodedPhoto, Editor, PendingFrame, PendingPhoto};
