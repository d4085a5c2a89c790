pub mod command;
pub mod composite;
pub mod engine;
pub mod error;
pub mod export;
pub mod font;
pub mod history;
pub mod input;
pub mod loader;
pub mod model;
pub mod projection;
pub mod render;
pub mod schedule;
pub mod settings;
pub mod surface;
pub mod text_entry;
pub mod tools;

pub use command::{ClearCommand, DrawCommand, PencilCommand, TextCommand, TextLine};
pub use engine::Annotator;
pub use error::AnnotatorError;
pub use export::ExportFormat;
pub use input::{CanvasRect, ContactEvent, ContactKind, RawEvent, TouchPoint};
pub use model::{Color, FontSize, FontSpec, Point, ToolKind};
pub use projection::Projection;
pub use settings::{AnnotatorSettings, Style};
pub use surface::{RasterSurface, Surface};
