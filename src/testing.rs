//! A fake X server that records requests, for driving the window manager
//! in unit tests.

use crate::error::Result;
use crate::launcher::Launcher;
use crate::layout::{Layout, Screen};
use crate::state::WindowManager;
use crate::window::Rect;
use crate::xconn::{PointerCursor, XConn};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use x11rb::protocol::xproto::{Keycode, Keysym, Window};

pub const ROOT: Window = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Req {
    Map(Window),
    Unmap(Window),
    Move(Window, i32, i32),
    Resize(Window, u32, u32),
    BorderWidth(Window, u32),
    BorderColor(Window, u32),
    Raise(Window),
    Focus(Window),
    Watch(Window),
    Kill(Window),
    GrabPointer(PointerCursor),
    UngrabPointer,
    Flush,
}

#[derive(Default)]
pub struct MockConn {
    requests: RefCell<Vec<Req>>,
    geometry: RefCell<HashMap<Window, Rect>>,
    pointer: Cell<Option<(i32, i32)>>,
    classes: HashMap<Window, String>,
    keysyms: HashMap<Keycode, Keysym>,
}

impl MockConn {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class(mut self, window: Window, class: &str) -> Self {
        self.classes.insert(window, class.to_string());
        self
    }

    pub fn with_keysym(mut self, keycode: Keycode, keysym: Keysym) -> Self {
        self.keysyms.insert(keycode, keysym);
        self
    }

    pub fn set_pointer(&self, x: i32, y: i32) {
        self.pointer.set(Some((x, y)));
    }

    pub fn geometry(&self, window: Window) -> Option<Rect> {
        self.geometry.borrow().get(&window).copied()
    }

    /// Everything recorded so far; the log is cleared.
    pub fn take_requests(&self) -> Vec<Req> {
        std::mem::take(&mut *self.requests.borrow_mut())
    }

    /// Recorded requests other than flushes; the log is cleared.
    pub fn take_effects(&self) -> Vec<Req> {
        self.take_requests()
            .into_iter()
            .filter(|r| *r != Req::Flush)
            .collect()
    }

    fn record(&self, req: Req) -> Result<()> {
        self.requests.borrow_mut().push(req);
        Ok(())
    }
}

impl XConn for MockConn {
    fn root(&self) -> Window {
        ROOT
    }

    fn map_window(&self, window: Window) -> Result<()> {
        self.record(Req::Map(window))
    }

    fn unmap_window(&self, window: Window) -> Result<()> {
        self.record(Req::Unmap(window))
    }

    fn move_window(&self, window: Window, x: i32, y: i32) -> Result<()> {
        let mut geometry = self.geometry.borrow_mut();
        let rect = geometry.entry(window).or_default();
        rect.x = x;
        rect.y = y;
        self.record(Req::Move(window, x, y))
    }

    fn resize_window(&self, window: Window, width: u32, height: u32) -> Result<()> {
        let mut geometry = self.geometry.borrow_mut();
        let rect = geometry.entry(window).or_default();
        rect.w = width as i32;
        rect.h = height as i32;
        self.record(Req::Resize(window, width, height))
    }

    fn set_border_width(&self, window: Window, width: u32) -> Result<()> {
        self.record(Req::BorderWidth(window, width))
    }

    fn set_border_color(&self, window: Window, color: u32) -> Result<()> {
        self.record(Req::BorderColor(window, color))
    }

    fn raise_window(&self, window: Window) -> Result<()> {
        self.record(Req::Raise(window))
    }

    fn focus_window(&self, window: Window) -> Result<()> {
        self.record(Req::Focus(window))
    }

    fn watch_window(&self, window: Window) -> Result<()> {
        self.record(Req::Watch(window))
    }

    fn kill_client(&self, window: Window) -> Result<()> {
        self.record(Req::Kill(window))
    }

    fn grab_pointer(&self, cursor: PointerCursor) -> Result<()> {
        self.record(Req::GrabPointer(cursor))
    }

    fn ungrab_pointer(&self) -> Result<()> {
        self.record(Req::UngrabPointer)
    }

    fn query_pointer(&self) -> Option<(i32, i32)> {
        self.pointer.get()
    }

    fn window_geometry(&self, window: Window) -> Option<Rect> {
        self.geometry(window)
    }

    fn window_class(&self, window: Window) -> Option<String> {
        self.classes.get(&window).cloned()
    }

    fn keysym(&self, keycode: Keycode) -> Keysym {
        self.keysyms.get(&keycode).copied().unwrap_or(0)
    }

    fn flush(&self) -> Result<()> {
        self.record(Req::Flush)
    }
}

/// Remembers every command line it was asked to start.
#[derive(Clone, Default)]
pub struct RecordingLauncher {
    pub spawned: Rc<RefCell<Vec<Vec<String>>>>,
}

impl Launcher for RecordingLauncher {
    fn spawn(&self, argv: &[&str]) -> Result<()> {
        self.spawned
            .borrow_mut()
            .push(argv.iter().map(|a| a.to_string()).collect());
        Ok(())
    }
}

/// 1920x1080 with a 15 pixel bar and 1 pixel borders.
pub fn screen() -> Screen {
    Screen {
        width: 1920,
        height: 1080,
        bar_height: 15,
        border: 1,
        master_ratio: 50.0,
    }
}

/// Three workspaces "1".."3" in `layout`, with a launcher you can inspect.
pub fn wm_with(layout: Layout) -> (WindowManager, RecordingLauncher) {
    let launcher = RecordingLauncher::default();
    let wm = WindowManager::new(
        screen(),
        &["1", "2", "3"],
        layout,
        Box::new(launcher.clone()),
    );
    (wm, launcher)
}

pub fn wm() -> WindowManager {
    wm_with(Layout::Tiling).0
}

/// Window ids in the current workspace, in list order.
pub fn ids(wm: &WindowManager) -> Vec<Window> {
    wm.current_workspace().windows.iter().map(|c| c.id).collect()
}
