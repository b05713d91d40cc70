use std::sync::Arc;

use crate::assets::decode::SourceImage;
use crate::config::BadgeConfig;
use crate::foundation::error::{BadgeError, BadgeResult, ErrorKind};
use crate::layout::fit::fit_text;
use crate::layout::policy::{AnchoredLayout, LayoutPolicy};
use crate::output::gate::PublishGate;
use crate::output::store::{FsOutputStore, OutputStore};
use crate::output::writer::OutputWriter;
use crate::render::badge::{BadgeStyle, render_badge};
use crate::render::composite::Compositor;
use crate::render::fonts::build_fontdb;
use crate::session::batch::BatchOpts;

/// A successfully generated and persisted badge image.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GenerationResult {
    /// Unique 128-bit identifier (32 lowercase hex digits).
    pub identifier: String,
    /// Retrievable reference returned by the output store.
    pub locator: String,
    /// Output width in pixels (same as the source).
    pub width: u32,
    /// Output height in pixels (same as the source).
    pub height: u32,
}

/// A label that failed at some pipeline stage.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GenerationFailure {
    /// The label exactly as it was requested.
    pub label: String,
    /// Failing stage.
    pub kind: ErrorKind,
    /// Human-readable message, naming the label and the stage.
    pub error: String,
}

impl GenerationFailure {
    /// Record `err` for `label`. `err` is expected to already carry the label (see
    /// [`BadgeError::for_label`]).
    pub fn from_error(label: &str, err: &BadgeError) -> Self {
        Self {
            label: label.to_owned(),
            kind: err.kind(),
            error: format!("{err:#}"),
        }
    }
}

impl std::fmt::Display for GenerationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.error)
    }
}

/// Badge generation entry point.
///
/// Construct once per process (this ensures the output directory and loads fonts), then call
/// [`generate_badge`](Self::generate_badge) or
/// [`generate_badge_batch`](Self::generate_badge_batch) as often as needed. Cloning is cheap and
/// every clone shares the same layout policy, font database and output store.
#[derive(Clone, Debug)]
pub struct BadgeGenerator {
    pub(crate) style: Arc<BadgeStyle>,
    pub(crate) layout: Arc<dyn LayoutPolicy>,
    pub(crate) compositor: Compositor,
    pub(crate) writer: OutputWriter,
    pub(crate) batch: BatchOpts,
}

impl BadgeGenerator {
    /// Generator with default style, bottom-center layout and sequential batches.
    pub fn new(store: Arc<dyn OutputStore>, fontdb: Arc<usvg::fontdb::Database>) -> Self {
        Self {
            style: Arc::new(BadgeStyle::default()),
            layout: Arc::new(AnchoredLayout::bottom_center()),
            compositor: Compositor::new(fontdb),
            writer: OutputWriter::new(store),
            batch: BatchOpts::default(),
        }
    }

    /// Build a filesystem-backed generator from a validated configuration.
    pub fn from_config(cfg: &BadgeConfig) -> BadgeResult<Self> {
        cfg.validate()?;
        let store = FsOutputStore::open(&cfg.output_dir)?;
        let fontdb = build_fontdb(&cfg.font_dirs);
        tracing::info!(
            output_dir = %cfg.output_dir.display(),
            anchor = %cfg.anchor,
            "badge generator initialized"
        );

        Self::new(Arc::new(store), fontdb)
            .with_style(cfg.style.clone())
            .with_layout(Arc::new(AnchoredLayout::new(cfg.anchor)))
            .with_batch_opts(cfg.batch.to_opts())
    }

    /// Replace the default style used when a call passes no style.
    pub fn with_style(mut self, style: BadgeStyle) -> Self {
        self.style = Arc::new(style);
        self
    }

    /// Replace the layout policy.
    pub fn with_layout(mut self, layout: Arc<dyn LayoutPolicy>) -> Self {
        self.layout = layout;
        self
    }

    /// Replace the batch scheduling options.
    pub fn with_batch_opts(mut self, opts: BatchOpts) -> BadgeResult<Self> {
        opts.validate()?;
        self.batch = opts;
        Ok(self)
    }

    /// Default style.
    pub fn style(&self) -> &BadgeStyle {
        &self.style
    }

    /// Batch scheduling options.
    pub fn batch_opts(&self) -> &BatchOpts {
        &self.batch
    }

    /// Decode `image_bytes`, badge it with `label` and persist the result.
    ///
    /// Errors surface directly; they carry the label and the failing stage.
    #[tracing::instrument(skip(self, image_bytes, style), fields(bytes = image_bytes.len()))]
    pub fn generate_badge(
        &self,
        image_bytes: &[u8],
        label: &str,
        style: Option<&BadgeStyle>,
    ) -> BadgeResult<GenerationResult> {
        let source = SourceImage::decode(image_bytes).map_err(|e| e.for_label(label))?;
        let style = style.unwrap_or(self.style.as_ref());
        self.run_label(&source, label, style, &PublishGate::new())
    }

    /// Plan, fit, render, composite and persist one label against an already decoded source.
    ///
    /// Once `gate` is closed the label fails with a timeout and nothing is published, even when
    /// the store write is already under way.
    pub(crate) fn run_label(
        &self,
        source: &SourceImage,
        label: &str,
        style: &BadgeStyle,
        gate: &PublishGate,
    ) -> BadgeResult<GenerationResult> {
        let span = tracing::debug_span!("label", label);
        let _enter = span.enter();

        self.run_label_stages(source, label, style, gate)
            .map_err(|e| e.for_label(label))
    }

    fn run_label_stages(
        &self,
        source: &SourceImage,
        label: &str,
        style: &BadgeStyle,
        gate: &PublishGate,
    ) -> BadgeResult<GenerationResult> {
        let geometry = self.layout.plan(source.size());
        let fitted = fit_text(label, geometry.width, geometry.font_size);
        tracing::debug!(?geometry, fitted = %fitted, "planned badge");

        let badge = render_badge(&geometry, &fitted, style);
        let png = self
            .compositor
            .composite(source, &badge, geometry.position())?;
        tracing::debug!(bytes = png.len(), "composited badge");

        if gate.is_closed() {
            return Err(BadgeError::timeout(
                "batch deadline elapsed before the badge was persisted",
            ));
        }
        let stored = self.writer.persist_gated(&png, gate)?;

        Ok(GenerationResult {
            identifier: stored.identifier,
            locator: stored.locator,
            width: source.width(),
            height: source.height(),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/generator.rs"]
mod tests;
