use image::RgbaImage;

use crate::annotate::command::{replay, ClearCommand, DrawCommand};
use crate::annotate::composite::composite_overlay;
use crate::annotate::error::AnnotatorError;
use crate::annotate::export::{self, ExportFormat};
use crate::annotate::history::History;
use crate::annotate::input::{self, CanvasRect, ContactEvent, RawEvent};
use crate::annotate::loader;
use crate::annotate::model::{Color, FontSize, Point, ToolKind};
use crate::annotate::projection::Projection;
use crate::annotate::settings::{AnnotatorSettings, Style};
use crate::annotate::surface::{RasterSurface, Surface};
use crate::annotate::text_entry::TextEntry;
use crate::annotate::tools::{ToolContext, ToolState};

/// One annotation session over one bound image.
///
/// Owns the base image, the overlay it draws on, the command history and the
/// active tool. Until an image is bound, input and history operations are
/// logged and ignored.
#[derive(Debug, Clone)]
pub struct Annotator {
    settings: AnnotatorSettings,
    style: Style,
    base: Option<RgbaImage>,
    overlay: RasterSurface,
    projection: Projection,
    history: History,
    tool: ToolState,
    entry: TextEntry,
}

impl Default for Annotator {
    fn default() -> Self {
        Self::new(AnnotatorSettings::default())
    }
}

impl Annotator {
    pub fn new(settings: AnnotatorSettings) -> Self {
        let style = settings.style().unwrap_or_else(|err| {
            tracing::warn!("invalid annotator settings ({err}); using defaults");
            Style::default()
        });
        let entry = TextEntry::new(style.color, style.font.clone());
        Self {
            settings,
            style,
            base: None,
            overlay: RasterSurface::new(0, 0),
            projection: Projection::IDENTITY,
            history: History::default(),
            tool: ToolState::default(),
            entry,
        }
    }

    /// Decodes `source` (data URI or path) and binds the result.
    /// On failure the previously bound image, if any, stays in place.
    pub fn load_source(&mut self, source: &str) -> Result<(), AnnotatorError> {
        match loader::decode_source(source) {
            Ok(image) => {
                self.bind_image(image);
                Ok(())
            }
            Err(err) => {
                tracing::error!("failed to load image source: {err:#}");
                Err(AnnotatorError::ImageSource(format!("{err:#}")))
            }
        }
    }

    /// Binds a new base image, discarding history and any work in progress.
    pub fn bind_image(&mut self, image: RgbaImage) {
        let (width, height) = image.dimensions();
        self.projection = Projection::for_image((width, height), self.settings.display_width);
        self.overlay = RasterSurface::new(width, height);
        self.history.reset();
        self.tool = ToolState::new(self.tool.kind());
        self.entry.clear();
        self.entry.hide();
        self.base = Some(image);
        tracing::debug!(
            "bound {width}x{height} image (projection factor {})",
            self.projection.factor()
        );
    }

    pub fn set_tool(&mut self, name: &str) -> Result<(), AnnotatorError> {
        let kind = name.parse::<ToolKind>().map_err(|err| {
            tracing::warn!("{err}");
            err
        })?;
        self.set_tool_kind(kind);
        Ok(())
    }

    /// Finalizes the outgoing tool, then activates a fresh `kind`. No-op if already active.
    pub fn set_tool_kind(&mut self, kind: ToolKind) {
        if self.tool.kind() == kind {
            return;
        }
        self.with_tool(|tool, ctx| tool.clean_up(ctx));
        tracing::debug!("switching tool {} -> {}", self.tool.kind().name(), kind.name());
        self.tool = ToolState::new(kind);
    }

    /// Commits `command` to history. Does not repaint.
    pub fn add_command(&mut self, command: impl Into<DrawCommand>) {
        self.history.push(command.into());
    }

    /// Returns whether anything was undone.
    pub fn undo(&mut self) -> bool {
        if !self.ensure_bound("undo") || !self.history.undo() {
            return false;
        }
        self.repaint();
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.ensure_bound("redo") || !self.history.redo() {
            return false;
        }
        self.repaint();
        true
    }

    /// Commits a clear of the whole overlay and draws only that command.
    pub fn clear(&mut self) {
        if !self.ensure_bound("clear") {
            return;
        }
        let command = ClearCommand {
            width: self.overlay.width() as f32,
            height: self.overlay.height() as f32,
        };
        command.draw(&mut self.overlay);
        self.history.push(command.into());
        self.tool.redraw_in_progress(&mut self.overlay);
    }

    /// Redraws the overlay from scratch by replaying `done` in order, then
    /// any stroke still being drawn.
    pub fn repaint(&mut self) {
        self.overlay.clear();
        replay(self.history.done(), &mut self.overlay);
        self.tool.redraw_in_progress(&mut self.overlay);
    }

    /// The base image with the overlay flattened on top.
    pub fn annotated_raster(&self) -> Result<RgbaImage, AnnotatorError> {
        let Some(base) = self.base.as_ref() else {
            tracing::warn!("annotated image requested before an image was bound");
            return Err(AnnotatorError::NoImage);
        };
        Ok(composite_overlay(base, self.overlay.pixels()))
    }

    /// The flattened image as a data URI.
    pub fn annotated_image(&self, format: ExportFormat) -> Result<String, AnnotatorError> {
        let raster = self.annotated_raster()?;
        export::to_data_uri(&raster, format).map_err(|err| {
            tracing::error!("{err}");
            err
        })
    }

    /// Translates a raw host event and feeds it to the active tool.
    pub fn handle_event(
        &mut self,
        event: &RawEvent,
        canvas_rect: CanvasRect,
    ) -> Result<(), AnnotatorError> {
        let contact = input::translate(event, canvas_rect, self.projection)?;
        self.dispatch(contact);
        Ok(())
    }

    pub fn dispatch(&mut self, event: ContactEvent) {
        if !self.ensure_bound("contact event") {
            return;
        }
        self.with_tool(|tool, ctx| tool.handle(ctx, event));
    }

    pub fn contact_start(&mut self, point: Point) {
        self.dispatch(ContactEvent::new(input::ContactKind::Start, point));
    }

    pub fn contact_move(&mut self, point: Point) {
        self.dispatch(ContactEvent::new(input::ContactKind::Move, point));
    }

    pub fn contact_end(&mut self, point: Point) {
        self.dispatch(ContactEvent::new(input::ContactKind::End, point));
    }

    pub fn text_input(&mut self, text: &str) {
        if self.tool.accepts_text() {
            self.entry.insert_text(text);
        } else {
            tracing::debug!("ignoring text input with no open text entry");
        }
    }

    pub fn text_backspace(&mut self) {
        if self.tool.accepts_text() {
            self.entry.backspace();
        }
    }

    /// Replaces the entry's whole content, as reported by the host's text widget.
    pub fn text_changed(&mut self, text: &str) {
        if self.tool.accepts_text() {
            self.entry.set_text(text);
        } else {
            tracing::debug!("ignoring text change with no open text entry");
        }
    }

    /// The host's text widget lost focus.
    pub fn text_blur(&mut self) {
        if self.entry.blur() {
            self.with_tool(|tool, ctx| tool.text_blurred(ctx));
        }
    }

    /// Runs continuations deferred to this tick, such as focusing the text entry.
    pub fn run_deferred(&mut self) {
        self.entry.run_deferred();
    }

    pub fn set_color(&mut self, color: &str) -> Result<(), AnnotatorError> {
        let parsed = Color::from_hex(color).map_err(|err| {
            tracing::warn!("{err}");
            err
        })?;
        self.style.color = parsed;
        self.settings.color = color.to_string();
        Ok(())
    }

    pub fn set_font_family(&mut self, family: &str) {
        self.style.font.family = family.to_string();
        self.settings.font_family = family.to_string();
    }

    pub fn set_font_size(&mut self, size: &str) -> Result<(), AnnotatorError> {
        let parsed = size.parse::<FontSize>().map_err(|err| {
            tracing::warn!("{err}");
            err
        })?;
        self.style.font.size = parsed;
        self.settings.font_size = size.to_string();
        Ok(())
    }

    /// Takes effect the next time an image is bound.
    pub fn set_display_width(&mut self, width: Option<f32>) {
        self.settings.display_width = width;
        if self.is_bound() {
            tracing::debug!("display width {width:?} applies from the next image bind");
        }
    }

    pub fn settings(&self) -> &AnnotatorSettings {
        &self.settings
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn base_image(&self) -> Option<&RgbaImage> {
        self.base.as_ref()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn tool(&self) -> &ToolState {
        &self.tool
    }

    pub fn overlay(&self) -> &RasterSurface {
        &self.overlay
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn text_entry(&self) -> &TextEntry {
        &self.entry
    }

    pub fn is_bound(&self) -> bool {
        self.base.is_some()
    }

    pub fn can_undo(&self) -> bool {
        self.history.undo_len() > 0
    }

    pub fn can_redo(&self) -> bool {
        self.history.redo_len() > 0
    }

    fn ensure_bound(&self, operation: &str) -> bool {
        if self.base.is_none() {
            tracing::warn!("ignoring {operation}: no image bound");
            return false;
        }
        true
    }

    fn with_tool<R>(&mut self, f: impl FnOnce(&mut ToolState, &mut ToolContext<'_>) -> R) -> R {
        let mut ctx = ToolContext {
            overlay: &mut self.overlay,
            history: &mut self.history,
            entry: &mut self.entry,
            style: &self.style,
            projection: self.projection,
        };
        f(&mut self.tool, &mut ctx)
    }
}
