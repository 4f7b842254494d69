// Drag-to-scroll for the horizontal hotel list
// Mouse and touch families share one set of handlers

use tracing::trace;

// Pointer travel is amplified so the list moves faster than the finger
pub const AMPLIFICATION_FACTOR: f64 = 3.0;

// The horizontally scrolling element the controller drives
pub trait ScrollContainer {
    fn scroll_left(&self) -> f64;
    fn set_scroll_left(&mut self, value: f64);
    // Left edge of the container in page coordinates
    fn offset_left(&self) -> f64;
    fn max_scroll_left(&self) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub page_x: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SliderEvent {
    MouseDown { page_x: f64 },
    MouseMove { page_x: f64 },
    MouseUp,
    MouseLeave,
    TouchStart { changed_touches: Vec<TouchPoint> },
    TouchMove { changed_touches: Vec<TouchPoint> },
    TouchEnd,
    TouchCancel,
}

impl SliderEvent {
    // Touch events read the first changed touch point
    fn page_x(&self) -> Option<f64> {
        match self {
            SliderEvent::MouseDown { page_x } | SliderEvent::MouseMove { page_x } => Some(*page_x),
            SliderEvent::TouchStart { changed_touches }
            | SliderEvent::TouchMove { changed_touches } => {
                changed_touches.first().map(|touch| touch.page_x)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    Dragging { start_x: f64, scroll_at_start: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDisposition {
    Ignored,
    Handled { prevent_default: bool },
}

pub struct DragGestureController<C: ScrollContainer> {
    container: C,
    state: DragState,
}

impl<C: ScrollContainer> DragGestureController<C> {
    pub fn arm(container: C) -> Self {
        Self {
            container,
            state: DragState::Idle,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn container(&self) -> &C {
        &self.container
    }

    pub fn handle(&mut self, event: &SliderEvent) -> EventDisposition {
        match event {
            SliderEvent::MouseDown { .. } | SliderEvent::TouchStart { .. } => {
                self.begin(event.page_x())
            }
            SliderEvent::MouseMove { .. } | SliderEvent::TouchMove { .. } => {
                self.drag_to(event.page_x())
            }
            SliderEvent::MouseUp
            | SliderEvent::MouseLeave
            | SliderEvent::TouchEnd
            | SliderEvent::TouchCancel => self.end(),
        }
    }

    fn begin(&mut self, page_x: Option<f64>) -> EventDisposition {
        let Some(page_x) = page_x else {
            return EventDisposition::Ignored;
        };
        let start_x = page_x - self.container.offset_left();
        let scroll_at_start = self.container.scroll_left();
        trace!("Slider drag start at x={} scroll={}", start_x, scroll_at_start);
        self.state = DragState::Dragging {
            start_x,
            scroll_at_start,
        };
        EventDisposition::Handled {
            prevent_default: false,
        }
    }

    fn drag_to(&mut self, page_x: Option<f64>) -> EventDisposition {
        let DragState::Dragging {
            start_x,
            scroll_at_start,
        } = self.state
        else {
            return EventDisposition::Ignored;
        };
        let Some(page_x) = page_x else {
            return EventDisposition::Ignored;
        };

        let x = page_x - self.container.offset_left();
        let walk = (x - start_x) * AMPLIFICATION_FACTOR;
        let max = self.container.max_scroll_left().max(0.0);
        let target = (scroll_at_start - walk).clamp(0.0, max);
        self.container.set_scroll_left(target);

        EventDisposition::Handled {
            prevent_default: true,
        }
    }

    fn end(&mut self) -> EventDisposition {
        if self.state == DragState::Idle {
            return EventDisposition::Ignored;
        }
        self.state = DragState::Idle;
        EventDisposition::Handled {
            prevent_default: false,
        }
    }
}
