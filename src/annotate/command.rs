use crate::annotate::model::{Color, FontSpec, Point};
use crate::annotate::surface::Surface;

/// Freehand stroke; consecutive points are joined by straight segments.
#[derive(Debug, Clone, PartialEq)]
pub struct PencilCommand {
    pub points: Vec<Point>,
    pub color: Color,
    pub line_width: f32,
}

impl PencilCommand {
    pub fn new(color: Color, line_width: f32) -> Self {
        Self {
            points: Vec::new(),
            color,
            line_width,
        }
    }

    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Draws only the newest segment, for live feedback while the stroke grows.
    pub fn draw_last_segment(&self, surface: &mut dyn Surface) {
        let [.., from, to] = self.points.as_slice() else {
            return;
        };
        surface.save();
        surface.set_stroke_color(self.color);
        surface.set_line_width(self.line_width);
        surface.stroke_segment(*from, *to);
        surface.restore();
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        if self.points.len() < 2 {
            return;
        }
        surface.save();
        surface.set_stroke_color(self.color);
        surface.set_line_width(self.line_width);
        for segment in self.points.windows(2) {
            surface.stroke_segment(segment[0], segment[1]);
        }
        surface.restore();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub position: Point,
    pub text: String,
}

/// A block of text, pre-split into one positioned entry per non-blank line.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCommand {
    pub lines: Vec<TextLine>,
    pub color: Color,
    pub font: FontSpec,
}

impl TextCommand {
    /// Splits `text` on newlines; line `i` sits `line_height * i` below `origin`.
    /// Blank lines keep their slot but produce no entry.
    pub fn from_block(
        origin: Point,
        text: &str,
        line_height: f32,
        color: Color,
        font: FontSpec,
    ) -> Self {
        let lines = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| TextLine {
                position: Point::new(origin.x, origin.y + line_height * index as f32),
                text: line.to_owned(),
            })
            .collect();
        Self { lines, color, font }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        surface.save();
        surface.set_fill_color(self.color);
        surface.set_font(&self.font);
        for line in &self.lines {
            surface.fill_text(&line.text, line.position);
        }
        surface.restore();
    }
}

/// Blanks a `width` x `height` region from the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearCommand {
    pub width: f32,
    pub height: f32,
}

impl ClearCommand {
    pub fn draw(&self, surface: &mut dyn Surface) {
        surface.clear_rect(0.0, 0.0, self.width, self.height);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Pencil(PencilCommand),
    Text(TextCommand),
    Clear(ClearCommand),
}

impl DrawCommand {
    pub fn draw(&self, surface: &mut dyn Surface) {
        match self {
            DrawCommand::Pencil(command) => command.draw(surface),
            DrawCommand::Text(command) => command.draw(surface),
            DrawCommand::Clear(command) => command.draw(surface),
        }
    }
}

impl From<PencilCommand> for DrawCommand {
    fn from(command: PencilCommand) -> Self {
        DrawCommand::Pencil(command)
    }
}

impl From<TextCommand> for DrawCommand {
    fn from(command: TextCommand) -> Self {
        DrawCommand::Text(command)
    }
}

impl From<ClearCommand> for DrawCommand {
    fn from(command: ClearCommand) -> Self {
        DrawCommand::Clear(command)
    }
}

/// Replays `commands` in order.
pub fn replay<'a>(commands: impl IntoIterator<Item = &'a DrawCommand>, surface: &mut dyn Surface) {
    for command in commands {
        command.draw(surface);
    }
}
