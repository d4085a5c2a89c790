use crate::annotate::command::{DrawCommand, PencilCommand, TextCommand};
use crate::annotate::history::History;
use crate::annotate::input::{ContactEvent, ContactKind};
use crate::annotate::model::{Color, FontSpec, Point, ToolKind};
use crate::annotate::projection::Projection;
use crate::annotate::settings::Style;
use crate::annotate::surface::Surface;
use crate::annotate::text_entry::TextEntry;

/// Everything a tool may touch while handling one call. Borrowed per call, never retained.
pub struct ToolContext<'a> {
    pub overlay: &'a mut dyn Surface,
    pub history: &'a mut History,
    pub entry: &'a mut TextEntry,
    pub style: &'a Style,
    pub projection: Projection,
}

impl ToolContext<'_> {
    fn commit(&mut self, command: DrawCommand) {
        tracing::debug!(
            "committing {} command ({} in history)",
            command_label(&command),
            self.history.undo_len() + 1
        );
        self.history.push(command);
    }
}

fn command_label(command: &DrawCommand) -> &'static str {
    match command {
        DrawCommand::Pencil(_) => "pencil",
        DrawCommand::Text(_) => "text",
        DrawCommand::Clear(_) => "clear",
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PencilTool {
    current: Option<PencilCommand>,
}

impl PencilTool {
    pub fn in_progress(&self) -> Option<&PencilCommand> {
        self.current.as_ref()
    }

    fn contact_start(&mut self, ctx: &mut ToolContext<'_>, point: Point) {
        // A second press without a release: keep what was already drawn.
        self.finish(ctx);
        let mut stroke = PencilCommand::new(ctx.style.color, ctx.style.line_width);
        stroke.add_point(point);
        self.current = Some(stroke);
    }

    fn contact_move(&mut self, ctx: &mut ToolContext<'_>, point: Point) {
        let Some(stroke) = self.current.as_mut() else {
            return;
        };
        stroke.add_point(point);
        stroke.draw_last_segment(ctx.overlay);
    }

    fn contact_end(&mut self, ctx: &mut ToolContext<'_>, point: Point) {
        let Some(stroke) = self.current.as_mut() else {
            return;
        };
        stroke.add_point(point);
        stroke.draw_last_segment(ctx.overlay);
        self.finish(ctx);
    }

    fn finish(&mut self, ctx: &mut ToolContext<'_>) {
        if let Some(stroke) = self.current.take() {
            if !stroke.is_empty() {
                ctx.commit(stroke.into());
            }
        }
    }
}

/// Where a text annotation will land, captured when its entry box opens.
#[derive(Debug, Clone, PartialEq)]
pub struct TextDraft {
    pub anchor: Point,
    pub color: Color,
    pub font: FontSpec,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextTool {
    pending: Option<TextDraft>,
    pressed: bool,
}

impl TextTool {
    pub fn pending(&self) -> Option<&TextDraft> {
        self.pending.as_ref()
    }

    fn contact_start(&mut self, ctx: &mut ToolContext<'_>, point: Point) {
        self.pressed = true;
        if self.pending.is_some() && !ctx.entry.is_empty() {
            self.finalize(ctx);
            return;
        }
        self.begin(ctx, point);
    }

    fn contact_move(&mut self, ctx: &mut ToolContext<'_>, point: Point) {
        if !self.pressed {
            return;
        }
        let Some(draft) = self.pending.as_mut() else {
            return;
        };
        draft.anchor = point;
        let display = ctx.projection.to_display(point);
        ctx.entry.set_position(display.x, display.y);
    }

    fn contact_end(&mut self, ctx: &mut ToolContext<'_>) {
        self.pressed = false;
        if self.pending.is_some() {
            ctx.entry.focus();
        }
    }

    fn blurred(&mut self, ctx: &mut ToolContext<'_>) {
        // The blur may arrive after a tap already committed this draft.
        if self.pending.is_some() && !ctx.entry.is_empty() {
            self.finalize(ctx);
        }
    }

    fn begin(&mut self, ctx: &mut ToolContext<'_>, point: Point) {
        let draft = TextDraft {
            anchor: point,
            color: ctx.style.color,
            font: ctx.style.font.clone(),
        };
        let display = ctx.projection.to_display(point);

        ctx.entry.clear();
        ctx.entry.set_color(draft.color);
        ctx.entry.set_font(draft.font.clone());
        ctx.entry.set_position(display.x, display.y);
        ctx.entry.show();
        ctx.entry.focus();
        ctx.entry.on_blur();
        self.pending = Some(draft);
    }

    /// Commits the pending draft if the entry holds text, then hides the entry.
    /// Taking the draft out first makes a second finalize a no-op.
    fn finalize(&mut self, ctx: &mut ToolContext<'_>) {
        let Some(draft) = self.pending.take() else {
            ctx.entry.hide();
            return;
        };

        if !ctx.entry.is_empty() {
            let factor = ctx.projection.factor();
            let command = TextCommand::from_block(
                draft.anchor,
                ctx.entry.text(),
                ctx.entry.line_height() * factor,
                draft.color,
                draft.font.scaled(factor),
            );
            if !command.is_empty() {
                command.draw(ctx.overlay);
                ctx.commit(command.into());
            }
        }
        ctx.entry.clear();
        ctx.entry.hide();
    }
}

/// The active tool. Switching builds a fresh state after cleaning up the old one.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolState {
    Pencil(PencilTool),
    Text(TextTool),
}

impl Default for ToolState {
    fn default() -> Self {
        Self::new(ToolKind::Pencil)
    }
}

impl ToolState {
    pub fn new(kind: ToolKind) -> Self {
        match kind {
            ToolKind::Pencil => ToolState::Pencil(PencilTool::default()),
            ToolKind::Text => ToolState::Text(TextTool::default()),
        }
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            ToolState::Pencil(_) => ToolKind::Pencil,
            ToolState::Text(_) => ToolKind::Text,
        }
    }

    pub fn handle(&mut self, ctx: &mut ToolContext<'_>, event: ContactEvent) {
        match event.kind {
            ContactKind::Start => self.contact_start(ctx, event.point),
            ContactKind::Move => self.contact_move(ctx, event.point),
            ContactKind::End => self.contact_end(ctx, event.point),
        }
    }

    pub fn contact_start(&mut self, ctx: &mut ToolContext<'_>, point: Point) {
        match self {
            ToolState::Pencil(tool) => tool.contact_start(ctx, point),
            ToolState::Text(tool) => tool.contact_start(ctx, point),
        }
    }

    pub fn contact_move(&mut self, ctx: &mut ToolContext<'_>, point: Point) {
        match self {
            ToolState::Pencil(tool) => tool.contact_move(ctx, point),
            ToolState::Text(tool) => tool.contact_move(ctx, point),
        }
    }

    pub fn contact_end(&mut self, ctx: &mut ToolContext<'_>, point: Point) {
        match self {
            ToolState::Pencil(tool) => tool.contact_end(ctx, point),
            ToolState::Text(tool) => tool.contact_end(ctx),
        }
    }

    /// The text entry lost focus with its blur subscription armed.
    pub fn text_blurred(&mut self, ctx: &mut ToolContext<'_>) {
        match self {
            ToolState::Pencil(_) => {}
            ToolState::Text(tool) => tool.blurred(ctx),
        }
    }

    /// Draws the uncommitted stroke in full, after the overlay was wiped under it.
    pub fn redraw_in_progress(&self, overlay: &mut dyn Surface) {
        if let ToolState::Pencil(tool) = self {
            if let Some(stroke) = tool.in_progress() {
                stroke.draw(overlay);
            }
        }
    }

    /// Whether typed text should reach the entry box right now.
    pub fn accepts_text(&self) -> bool {
        matches!(self, ToolState::Text(tool) if tool.pending.is_some())
    }

    /// Finalizes whatever the tool has in progress before it is replaced.
    pub fn clean_up(&mut self, ctx: &mut ToolContext<'_>) {
        match self {
            ToolState::Pencil(tool) => tool.finish(ctx),
            ToolState::Text(tool) => tool.finalize(ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::surface::RasterSurface;

    struct Fixture {
        overlay: RasterSurface,
        history: History,
        entry: TextEntry,
        style: Style,
        projection: Projection,
    }

    impl Fixture {
        fn new(projection: f32) -> Self {
            Self {
                overlay: RasterSurface::new(64, 64),
                history: History::default(),
                entry: TextEntry::default(),
                style: Style::default(),
                projection: Projection::new(projection),
            }
        }

        fn ctx(&mut self) -> ToolContext<'_> {
            ToolContext {
                overlay: &mut self.overlay,
                history: &mut self.history,
                entry: &mut self.entry,
                style: &self.style,
                projection: self.projection,
            }
        }
    }

    #[test]
    fn pencil_gesture_commits_one_stroke() {
        let mut fx = Fixture::new(1.0);
        let mut tool = ToolState::new(ToolKind::Pencil);

        tool.contact_start(&mut fx.ctx(), Point::new(2.0, 2.0));
        tool.contact_move(&mut fx.ctx(), Point::new(10.0, 10.0));
        assert!(!fx.overlay.is_blank(), "live segment drawn on move");
        tool.contact_end(&mut fx.ctx(), Point::new(20.0, 10.0));

        assert_eq!(fx.history.undo_len(), 1);
        let DrawCommand::Pencil(stroke) = &fx.history.done()[0] else {
            panic!("expected a pencil command");
        };
        assert_eq!(
            stroke.points,
            vec![
                Point::new(2.0, 2.0),
                Point::new(10.0, 10.0),
                Point::new(20.0, 10.0)
            ]
        );
        assert_eq!(stroke.color, fx.style.color);
    }

    #[test]
    fn pencil_ignores_move_and_end_without_start() {
        let mut fx = Fixture::new(1.0);
        let mut tool = ToolState::new(ToolKind::Pencil);
        tool.contact_move(&mut fx.ctx(), Point::new(3.0, 3.0));
        tool.contact_end(&mut fx.ctx(), Point::new(4.0, 4.0));
        assert_eq!(fx.history.undo_len(), 0);
        assert!(fx.overlay.is_blank());
    }

    #[test]
    fn pencil_clean_up_commits_stroke_in_progress() {
        let mut fx = Fixture::new(1.0);
        let mut tool = ToolState::new(ToolKind::Pencil);
        tool.contact_start(&mut fx.ctx(), Point::new(1.0, 1.0));
        tool.contact_move(&mut fx.ctx(), Point::new(5.0, 1.0));
        tool.clean_up(&mut fx.ctx());
        assert_eq!(fx.history.undo_len(), 1);
    }

    #[test]
    fn text_start_opens_entry_at_display_position() {
        let mut fx = Fixture::new(2.0);
        let mut tool = ToolState::new(ToolKind::Text);
        tool.contact_start(&mut fx.ctx(), Point::new(20.0, 40.0));

        assert!(fx.entry.is_visible());
        assert_eq!(fx.entry.position(), Point::new(10.0, 20.0));
        assert!(fx.entry.has_pending_tasks(), "focus is deferred");
        assert!(tool.accepts_text());
    }

    #[test]
    fn text_drag_repositions_anchor_and_entry() {
        let mut fx = Fixture::new(2.0);
        let mut tool = TextTool::default();
        tool.contact_start(&mut fx.ctx(), Point::new(20.0, 40.0));
        tool.contact_move(&mut fx.ctx(), Point::new(30.0, 50.0));
        tool.contact_end(&mut fx.ctx());

        assert_eq!(tool.pending().unwrap().anchor, Point::new(30.0, 50.0));
        assert_eq!(fx.entry.position(), Point::new(15.0, 25.0));

        tool.contact_move(&mut fx.ctx(), Point::new(60.0, 60.0));
        assert_eq!(tool.pending().unwrap().anchor, Point::new(30.0, 50.0));
    }

    #[test]
    fn second_tap_commits_non_empty_text() {
        let mut fx = Fixture::new(1.0);
        let mut tool = ToolState::new(ToolKind::Text);
        tool.contact_start(&mut fx.ctx(), Point::new(5.0, 5.0));
        tool.contact_end(&mut fx.ctx(), Point::new(5.0, 5.0));
        fx.entry.insert_text("hi");

        tool.contact_start(&mut fx.ctx(), Point::new(40.0, 40.0));
        assert_eq!(fx.history.undo_len(), 1);
        assert!(!fx.entry.is_visible());
        assert!(!tool.accepts_text());
    }

    #[test]
    fn second_tap_on_empty_entry_moves_it() {
        let mut fx = Fixture::new(1.0);
        let mut tool = ToolState::new(ToolKind::Text);
        tool.contact_start(&mut fx.ctx(), Point::new(5.0, 5.0));
        tool.contact_end(&mut fx.ctx(), Point::new(5.0, 5.0));
        tool.contact_start(&mut fx.ctx(), Point::new(40.0, 30.0));

        assert_eq!(fx.history.undo_len(), 0);
        assert!(fx.entry.is_visible());
        assert_eq!(fx.entry.position(), Point::new(40.0, 30.0));
    }

    #[test]
    fn blur_after_tap_commit_does_not_commit_twice() {
        let mut fx = Fixture::new(1.0);
        let mut tool = ToolState::new(ToolKind::Text);
        tool.contact_start(&mut fx.ctx(), Point::new(5.0, 5.0));
        fx.entry.insert_text("once");
        tool.contact_start(&mut fx.ctx(), Point::new(30.0, 30.0));

        if fx.entry.blur() {
            tool.text_blurred(&mut fx.ctx());
        }
        tool.text_blurred(&mut fx.ctx());
        assert_eq!(fx.history.undo_len(), 1);
    }

    #[test]
    fn clean_up_discards_empty_text() {
        let mut fx = Fixture::new(1.0);
        let mut tool = ToolState::new(ToolKind::Text);
        tool.contact_start(&mut fx.ctx(), Point::new(5.0, 5.0));
        fx.entry.insert_text("   ");
        tool.clean_up(&mut fx.ctx());
        assert_eq!(fx.history.undo_len(), 0);
        assert!(!fx.entry.is_visible());
    }
}
