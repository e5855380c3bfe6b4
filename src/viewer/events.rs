//! Pointer event types routed into the viewer.

/// Mouse button identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    /// Left mouse button (drag to pan)
    Left,
    /// Right mouse button (cancel drag)
    Right,
    /// Middle mouse button (currently unused)
    Middle,
}

/// Direction of a scroll-wheel notch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    /// Away from the user: zoom in
    Up,
    /// Towards the user: zoom out
    Down,
}

impl ScrollDirection {
    /// Sign applied to the configured zoom step.
    pub fn zoom_sign(self) -> f64 {
        match self {
            ScrollDirection::Up => 1.0,
            ScrollDirection::Down => -1.0,
        }
    }
}
