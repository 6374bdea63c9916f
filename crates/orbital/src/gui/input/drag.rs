use crate::gui::ring::Point;

/// Tracks a pointer drag: movement deltas and the total offset from where it began.
#[derive(Debug, Clone, Default, Copy)]
pub struct DragState {
    pub start_pos: Option<Point>,
    pub last_pos: Option<Point>,
}

impl DragState {
    pub fn start(&mut self, pos: Point) {
        self.start_pos = Some(pos);
        self.last_pos = Some(pos);
    }

    /// Movement since the previous update, or `None` when no drag is active.
    pub fn update(&mut self, pos: Point) -> Option<Point> {
        self.start_pos?;
        let delta = self.last_pos.map(|last| pos - last);
        self.last_pos = Some(pos);
        delta
    }

    pub fn total_offset(&self, current_pos: Point) -> Option<Point> {
        self.start_pos.map(|start| current_pos - start)
    }

    pub fn end(&mut self) {
        self.start_pos = None;
        self.last_pos = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.start_pos.is_some()
    }
}
