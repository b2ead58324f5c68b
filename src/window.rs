use x11rb::protocol::xproto::Window;

/// A position plus extent, in root window pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }
}

/// Everything tfwm remembers about a managed window.
///
/// The geometry is whatever tfwm last asked the server for. It only becomes
/// meaningful after the first layout pass; until then it is the centered
/// placeholder handed out on map request.
#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    pub id: Window,
    pub geometry: Rect,
    pub border: u32,
    /// Geometry was chosen by the user with a pointer drag.
    pub is_floating: bool,
    pub is_fullscreen: bool,
    /// The client is gone but its slot has not been compacted yet.
    pub is_killed: bool,
    pub class: String,
}

impl Client {
    pub fn new(id: Window, geometry: Rect, border: u32, class: String) -> Self {
        Self {
            id,
            geometry,
            border,
            is_floating: false,
            is_fullscreen: false,
            is_killed: false,
            class,
        }
    }

    /// Record a placement made by a layout pass.
    pub fn place(&mut self, geometry: Rect) {
        self.geometry = geometry;
        self.is_floating = false;
        self.is_fullscreen = false;
    }
}
