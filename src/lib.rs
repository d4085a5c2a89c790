//! Image annotation engine: freehand pencil strokes and text labels drawn on
//! an overlay above a bound image, with undo/redo, clear and export to a
//! flattened raster.

pub mod annotate;
pub mod logging;

pub use annotate::{Annotator, AnnotatorError, AnnotatorSettings, ExportFormat};
