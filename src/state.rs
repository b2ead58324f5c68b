use crate::command::{self, Action};
use crate::config;
use crate::error::Result;
use crate::launcher::Launcher;
use crate::layout::{self, Layout, Screen};
use crate::window::{Client, Rect};
use crate::workspace::Workspace;
use crate::xconn::{PointerCursor, XConn};
use x11rb::protocol::xproto::{Keycode, Window};

/// Whether the event loop keeps going after a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Move,
    Resize,
}

impl DragKind {
    pub fn cursor(self) -> PointerCursor {
        match self {
            DragKind::Move => PointerCursor::Move,
            DragKind::Resize => PointerCursor::Resize,
        }
    }
}

/// A pointer drag in progress. Only the last pointer sample is kept; each
/// motion event moves the window by the distance since that sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drag {
    pub kind: DragKind,
    pub window: Window,
    pub last: (i32, i32),
}

/// All session state. The X connection is handed in to every operation.
pub struct WindowManager {
    pub(crate) workspaces: Vec<Workspace>,
    pub(crate) current: usize,
    pub(crate) previous: usize,
    pub(crate) focused: Option<Window>,
    /// Index of `focused` in the current workspace. Dropped on every
    /// structural change and looked up again on demand.
    pub(crate) focused_idx: Option<usize>,
    pub(crate) drag: Option<Drag>,
    pub(crate) screen: Screen,
    bar_dirty: bool,
    launcher: Box<dyn Launcher>,
}

impl WindowManager {
    pub fn new(
        screen: Screen,
        names: &[&str],
        layout: Layout,
        launcher: Box<dyn Launcher>,
    ) -> Self {
        Self {
            workspaces: names.iter().map(|&name| Workspace::new(name, layout)).collect(),
            current: 0,
            previous: 0,
            focused: None,
            focused_idx: None,
            drag: None,
            screen,
            bar_dirty: true,
            launcher,
        }
    }

    // Read-only view for the bar.

    pub fn workspaces(&self) -> &[Workspace] {
        &self.workspaces
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_workspace(&self) -> &Workspace {
        &self.workspaces[self.current]
    }

    pub fn focused_window(&self) -> Option<Window> {
        self.focused
    }

    pub fn focused_index(&self) -> Option<usize> {
        let window = self.focused?;
        let ws = self.current_workspace();
        self.focused_idx
            .filter(|&i| ws.get(i).is_some_and(|c| c.id == window))
            .or_else(|| ws.find(window))
    }

    pub fn is_focused(&self, window: Window) -> bool {
        self.focused == Some(window)
    }

    pub fn request_bar_redraw(&mut self) {
        self.bar_dirty = true;
    }

    /// Whether the bar needs drawing; clears the flag.
    pub fn take_bar_dirty(&mut self) -> bool {
        std::mem::take(&mut self.bar_dirty)
    }

    fn workspace_by_name(&self, name: &str) -> Option<usize> {
        self.workspaces.iter().position(|ws| ws.name == name)
    }

    fn workspace_of(&self, window: Window) -> Option<usize> {
        self.workspaces.iter().position(|ws| ws.contains(window))
    }

    // Workspace store.

    pub fn switch_to<C: XConn>(&mut self, conn: &C, index: usize) -> Result<()> {
        if index == self.current || index >= self.workspaces.len() {
            return Ok(());
        }
        self.previous = self.current;
        self.current = index;
        self.remap(conn)
    }

    pub fn switch_by_name<C: XConn>(&mut self, conn: &C, name: &str) -> Result<()> {
        match self.workspace_by_name(name) {
            Some(index) => self.switch_to(conn, index),
            None => {
                log::warn!("no workspace named {}", name);
                Ok(())
            }
        }
    }

    pub fn workspace_next<C: XConn>(&mut self, conn: &C) -> Result<()> {
        let next = (self.current + 1) % self.workspaces.len();
        self.switch_to(conn, next)
    }

    pub fn workspace_prev<C: XConn>(&mut self, conn: &C) -> Result<()> {
        let len = self.workspaces.len();
        let prev = (self.current + len - 1) % len;
        self.switch_to(conn, prev)
    }

    /// Jump back to the workspace we came from.
    pub fn swap_with_previous<C: XConn>(&mut self, conn: &C) -> Result<()> {
        if self.previous == self.current {
            return Ok(());
        }
        std::mem::swap(&mut self.previous, &mut self.current);
        self.remap(conn)
    }

    pub fn set_layout<C: XConn>(&mut self, conn: &C, layout: Layout) -> Result<()> {
        let ws = &mut self.workspaces[self.current];
        if ws.layout == layout {
            return Ok(());
        }
        log::info!("workspace {} layout {:?} -> {:?}", ws.name, ws.layout, layout);
        ws.layout = layout;
        self.arrange(conn, self.current)?;
        self.request_bar_redraw();
        Ok(())
    }

    /// Send the focused window to another workspace and follow it there.
    pub fn move_focused_to<C: XConn>(&mut self, conn: &C, name: &str) -> Result<()> {
        let Some(target) = self.workspace_by_name(name) else {
            return Ok(());
        };
        if target == self.current {
            return Ok(());
        }
        let Some(index) = self.focused_index() else {
            return Ok(());
        };
        let Some(client) = self.workspaces[self.current].remove(index) else {
            return Ok(());
        };
        log::info!("moving {:#x} to workspace {}", client.id, name);
        self.workspaces[target].append(client);
        self.focused_idx = None;

        self.previous = self.current;
        self.current = target;
        self.remap(conn)
    }

    /// Hide the previous workspace and bring up the current one.
    fn remap<C: XConn>(&mut self, conn: &C) -> Result<()> {
        log::info!(
            "workspace {} -> {}",
            self.workspaces[self.previous].name,
            self.workspaces[self.current].name
        );
        let hidden: Vec<Window> = self.workspaces[self.previous]
            .windows
            .iter()
            .map(|c| c.id)
            .collect();
        for window in hidden {
            conn.unmap_window(window)?;
            self.focus_color(conn, window, false)?;
        }
        self.focused = None;
        self.focused_idx = None;

        self.arrange(conn, self.current)?;
        self.map_workspace(conn, self.current)
    }

    /// Map every window of a workspace and focus the last one.
    fn map_workspace<C: XConn>(&mut self, conn: &C, index: usize) -> Result<()> {
        let shown: Vec<Window> = self.workspaces[index].windows.iter().map(|c| c.id).collect();
        let Some((&last, rest)) = shown.split_last() else {
            return self.focus_root(conn);
        };
        for &window in rest {
            conn.map_window(window)?;
            self.focus_color(conn, window, false)?;
        }
        conn.map_window(last)?;
        self.focus(conn, last)
    }

    // Layout engine glue.

    /// Drop killed windows from a workspace, then place the rest according
    /// to its layout.
    pub fn arrange<C: XConn>(&mut self, conn: &C, index: usize) -> Result<()> {
        let ws = &mut self.workspaces[index];
        if ws.compact() > 0 {
            self.focused_idx = None;
        }
        let Some(rects) = layout::arrange(ws.layout, ws.len(), &self.screen) else {
            return Ok(());
        };
        log::debug!("arranging {} windows on workspace {}", rects.len(), ws.name);
        for (client, rect) in ws.windows.iter_mut().zip(rects) {
            client.place(rect);
            place_window(conn, client.id, rect)?;
        }
        Ok(())
    }

    // Event handlers.

    pub fn handle_map_request<C: XConn>(&mut self, conn: &C, window: Window) -> Result<()> {
        if let Some(ws) = self.workspace_of(window) {
            if ws == self.current {
                conn.map_window(window)?;
            }
            return Ok(());
        }

        let geometry = Rect::new(
            self.screen.width / 2 - config::WINDOW_WIDTH / 2,
            self.screen.height / 2 - config::WINDOW_HEIGHT / 2,
            config::WINDOW_WIDTH,
            config::WINDOW_HEIGHT,
        );
        let border = self.screen.border.unsigned_abs();
        conn.move_window(window, geometry.x, geometry.y)?;
        conn.resize_window(window, geometry.w.unsigned_abs(), geometry.h.unsigned_abs())?;
        conn.set_border_width(window, border)?;
        conn.watch_window(window)?;
        conn.map_window(window)?;
        conn.flush()?;

        let class = conn.window_class(window).unwrap_or_default();
        log::info!(
            "managing {:#x} ({}) on workspace {}",
            window,
            class,
            self.current_workspace().name
        );
        self.workspaces[self.current].append(Client::new(window, geometry, border, class));
        self.focused_idx = None;

        self.arrange(conn, self.current)?;
        self.map_workspace(conn, self.current)?;
        self.request_bar_redraw();
        Ok(())
    }

    /// A client went away on its own. Its slot is compacted by the layout
    /// pass that follows.
    pub fn handle_destroy_notify<C: XConn>(&mut self, conn: &C, window: Window) -> Result<()> {
        let Some(ws) = self.workspace_of(window) else {
            return Ok(());
        };
        log::info!("{:#x} destroyed", window);
        let index = self.workspaces[ws].find(window);
        self.workspaces[ws].mark_killed(window);
        self.arrange(conn, ws)?;

        if ws == self.current && self.is_focused(window) {
            if let Some(index) = index {
                self.refocus_after_removal(conn, index)?;
            }
        }
        self.request_bar_redraw();
        Ok(())
    }

    pub fn handle_key_press<C: XConn>(
        &mut self,
        conn: &C,
        keycode: Keycode,
        state: u16,
    ) -> Result<Flow> {
        let keysym = conn.keysym(keycode);
        let actions: Vec<Action> = command::lookup(config::KEYBINDS, state, keysym).collect();
        for action in actions {
            log::info!("executing {:?}", action);
            if self.run_action(conn, action)? == Flow::Quit {
                return Ok(Flow::Quit);
            }
            conn.flush()?;
        }
        Ok(Flow::Continue)
    }

    pub fn run_action<C: XConn>(&mut self, conn: &C, action: Action) -> Result<Flow> {
        match action {
            Action::Quit => return Ok(Flow::Quit),
            Action::Kill => self.kill(conn)?,
            Action::Spawn(argv) => {
                if let Err(e) = self.launcher.spawn(argv) {
                    log::error!("{}", e);
                }
            }
            Action::WindowNext => self.window_next(conn)?,
            Action::WindowPrev => self.window_prev(conn)?,
            Action::SwapLast => self.swap_last(conn)?,
            Action::ToggleFullscreen => self.toggle_fullscreen(conn)?,
            Action::WorkspaceSwapPrev => self.swap_with_previous(conn)?,
            Action::WorkspaceNext => self.workspace_next(conn)?,
            Action::WorkspacePrev => self.workspace_prev(conn)?,
            Action::Workspace(name) => self.switch_by_name(conn, name)?,
            Action::MoveToWorkspace(name) => self.move_focused_to(conn, name)?,
            Action::UseLayout(layout) => self.set_layout(conn, layout)?,
        }
        Ok(Flow::Continue)
    }
}

/// Move then resize. Sizes under the minimum are not sent at all.
pub(crate) fn place_window<C: XConn>(conn: &C, window: Window, rect: Rect) -> Result<()> {
    conn.move_window(window, rect.x, rect.y)?;
    resize_window(conn, window, rect.w, rect.h)
}

pub(crate) fn resize_window<C: XConn>(conn: &C, window: Window, w: i32, h: i32) -> Result<()> {
    if w < config::MIN_WINDOW_WIDTH || h < config::MIN_WINDOW_HEIGHT {
        return Ok(());
    }
    conn.resize_window(window, w.unsigned_abs(), h.unsigned_abs())
}
