use crate::annotate::font;
use crate::annotate::model::{Color, FontSpec, Point};
use crate::annotate::schedule::{OneShot, TaskQueue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryTask {
    Focus,
}

/// The floating multi-line text box shown while a text annotation is being typed.
///
/// Position, font and line height are in display space.
#[derive(Debug, Clone, PartialEq)]
pub struct TextEntry {
    position: Point,
    visible: bool,
    focused: bool,
    text: String,
    color: Color,
    font: FontSpec,
    blur: OneShot,
    tasks: TaskQueue<EntryTask>,
}

impl Default for TextEntry {
    fn default() -> Self {
        Self::new(Color::BLACK, FontSpec::default())
    }
}

impl TextEntry {
    pub fn new(color: Color, font: FontSpec) -> Self {
        Self {
            position: Point::ZERO,
            visible: false,
            focused: false,
            text: String::new(),
            color,
            font,
            blur: OneShot::default(),
            tasks: TaskQueue::default(),
        }
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.position = Point::new(x, y);
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_font(&mut self, font: FontSpec) {
        self.font = font;
    }

    pub fn font(&self) -> &FontSpec {
        &self.font
    }

    /// Makes the box visible and re-arms the blur subscription.
    pub fn show(&mut self) {
        self.visible = true;
        self.blur.arm();
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.focused = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Requests focus on the next tick, once the box has actually become visible.
    pub fn focus(&mut self) {
        self.tasks.defer(EntryTask::Focus);
    }

    pub fn has_pending_tasks(&self) -> bool {
        !self.tasks.is_empty()
    }

    /// Runs continuations scheduled before this tick.
    pub fn run_deferred(&mut self) {
        for task in self.tasks.take_due() {
            match task {
                EntryTask::Focus => {
                    if self.visible {
                        self.focused = true;
                    } else {
                        tracing::debug!("dropping deferred focus for hidden text entry");
                    }
                }
            }
        }
    }

    /// Subscribes to the next loss of focus.
    pub fn on_blur(&mut self) {
        self.blur.arm();
    }

    /// Whether the next `blur` will fire the subscription.
    pub fn blur_armed(&self) -> bool {
        self.blur.is_armed()
    }

    /// Records a loss of focus; returns whether the blur subscription fired.
    pub fn blur(&mut self) -> bool {
        self.focused = false;
        self.blur.fire()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn insert_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub fn backspace(&mut self) {
        self.text.pop();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// True when the box holds nothing but whitespace.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Rendered line height in display pixels.
    pub fn line_height(&self) -> f32 {
        font::line_height(&self.font.family, self.font.size.px())
    }
}
