use crate::annotate::error::AnnotatorError;
use crate::annotate::model::Point;
use crate::annotate::projection::Projection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    Start,
    Move,
    End,
}

/// A press/drag/release notification in canvas space, independent of the input device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactEvent {
    pub kind: ContactKind,
    pub point: Point,
}

impl ContactEvent {
    pub fn new(kind: ContactKind, point: Point) -> Self {
        Self { kind, point }
    }
}

/// Bounding rectangle of the overlay in client (display) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CanvasRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl CanvasRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub identifier: i64,
    pub client: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputSource {
    Mouse { client: Point },
    Touch { changed_touches: Vec<TouchPoint> },
}

/// An input event as forwarded by the host, named by its DOM-style event type
/// (`mousedown`, `touchmove`, `pointerup`, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct RawEvent {
    pub kind: String,
    pub source: InputSource,
}

impl RawEvent {
    pub fn mouse(kind: impl Into<String>, client_x: f32, client_y: f32) -> Self {
        Self {
            kind: kind.into(),
            source: InputSource::Mouse {
                client: Point::new(client_x, client_y),
            },
        }
    }

    pub fn touch(kind: impl Into<String>, changed_touches: Vec<TouchPoint>) -> Self {
        Self {
            kind: kind.into(),
            source: InputSource::Touch { changed_touches },
        }
    }

    /// Client coordinates of the contact; multi-touch collapses to the first changed touch.
    fn client_point(&self) -> Option<Point> {
        match &self.source {
            InputSource::Mouse { client } => Some(*client),
            InputSource::Touch { changed_touches } => changed_touches.first().map(|t| t.client),
        }
    }
}

pub fn contact_kind(event_type: &str) -> Option<ContactKind> {
    match event_type {
        "mousedown" | "touchstart" | "pointerdown" => Some(ContactKind::Start),
        "mousemove" | "touchmove" | "pointermove" => Some(ContactKind::Move),
        "mouseup" | "touchend" | "touchcancel" | "pointerup" => Some(ContactKind::End),
        _ => None,
    }
}

/// Normalizes a mouse or touch event into a [`ContactEvent`] in canvas space.
pub fn translate(
    event: &RawEvent,
    canvas_rect: CanvasRect,
    projection: Projection,
) -> Result<ContactEvent, AnnotatorError> {
    let Some(kind) = contact_kind(&event.kind) else {
        tracing::warn!("unrecognized contact event: {}", event.kind);
        return Err(AnnotatorError::UnrecognizedEvent(event.kind.clone()));
    };
    let Some(client) = event.client_point() else {
        tracing::warn!("{} carried no changed touches", event.kind);
        return Err(AnnotatorError::NoContactPoint);
    };

    Ok(ContactEvent::new(
        kind,
        projection.to_canvas(client, canvas_rect.origin()),
    ))
}
