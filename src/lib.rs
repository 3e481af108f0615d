//! Scrollreel drives a scroll-scrubbed frame sequence page headlessly.
//!
//! A page mounts on a [`Host`] (a single-threaded event loop with a virtual clock),
//! loads its `N` frames in parallel, holds a loader up until both the frames and a
//! minimum display time are in, and from then on maps scroll progress to a frame drawn
//! into a device-pixel-ratio aware canvas. A [`Compositor`] flattens the canvas and
//! the animated SVG overlays into one RGBA frame.
//!
//! - Describe the page with a [`PageConfig`]
//! - Mount a [`Session`] and feed it host events
//! - Compose the current instant with a [`Compositor`]
#![forbid(unsafe_code)]

pub mod animation;
pub mod assets;
pub mod foundation;
pub mod host;
pub mod overlay;
pub mod page;
pub mod playback;
pub mod render;

pub use crate::assets::decode::Frame;
pub use crate::assets::frames::{FramePattern, FrameSource, FrameStore};
pub use crate::assets::loader::{FrameLoader, LoadHandle};
pub use crate::foundation::core::{BackingSize, FrameIndex, Rgba8Premul, Viewport};
pub use crate::foundation::error::{ReelError, ReelResult};
pub use crate::host::event_loop::{Host, HostEvent};
pub use crate::page::compose::Compositor;
pub use crate::page::config::PageConfig;
pub use crate::page::session::{Session, StepReport};
pub use crate::playback::gate::{FailurePolicy, PlaybackState};
pub use crate::playback::mapper::frame_index;
pub use crate::playback::renderer::DrawOutcome;
pub use crate::render::surface::FrameRGBA;
