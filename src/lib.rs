//! badgeforge composites short text badges onto raster images.
//!
//! Pipeline, per label:
//!
//! 1. decode the source once ([`SourceImage`])
//! 2. plan the badge box with a [`LayoutPolicy`] ([`BadgeGeometry`])
//! 3. fit the label into the box ([`fit_text`])
//! 4. describe the badge as vectors ([`RenderedBadge`])
//! 5. rasterize and overlay it, encode PNG ([`Compositor`])
//! 6. persist under a fresh identifier ([`OutputWriter`], [`OutputStore`])
//!
//! [`BadgeGenerator`] drives the pipeline for one label or a batch of labels. Batches isolate
//! failures per label and always return one [`LabelOutcome`] per input, in input order.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;
mod layout;
mod output;
mod render;
mod session;

pub mod config;

pub use crate::foundation::core::{ImageSize, Position};
pub use crate::foundation::error::{BadgeError, BadgeResult, ErrorKind};

pub use crate::assets::color::Color;
pub use crate::assets::decode::{SourceImage, read_dimensions};
pub use crate::assets::fetch::{FsSourceFetcher, SourceFetcher};
pub use crate::config::{BadgeConfig, BatchConfig};
pub use crate::layout::fit::{ELLIPSIS, fit_text, max_chars};
pub use crate::layout::policy::{Anchor, AnchoredLayout, BadgeGeometry, LayoutPolicy};
pub use crate::output::gate::PublishGate;
pub use crate::output::store::{FsOutputStore, InMemoryOutputStore, OutputStore};
pub use crate::output::writer::{OutputWriter, StoredArtifact};
pub use crate::render::badge::{
    BACKGROUND_OPACITY, BadgeRect, BadgeStyle, BadgeText, RenderedBadge, render_badge,
};
pub use crate::render::composite::{Compositor, encode_png};
pub use crate::render::fonts::build_fontdb;
pub use crate::session::batch::{BatchOpts, BatchOutcome, LabelOutcome};
pub use crate::session::generator::{BadgeGenerator, GenerationFailure, GenerationResult};
