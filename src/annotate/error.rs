use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotatorError {
    #[error("unknown tool '{0}' (expected 'pencil' or 'text')")]
    UnknownTool(String),

    #[error("unrecognized contact event: {0}")]
    UnrecognizedEvent(String),

    #[error("touch event carried no changed touch points")]
    NoContactPoint,

    #[error("no image is bound to the annotator")]
    NoImage,

    #[error("invalid color '{0}' (expected #RGB, #RRGGBB or #RRGGBBAA)")]
    InvalidColor(String),

    #[error("invalid font size '{0}'")]
    InvalidFontSize(String),

    #[error("could not load image source: {0}")]
    ImageSource(String),

    #[error("could not encode annotated image: {0}")]
    Encode(String),
}
