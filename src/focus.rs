//! Focus tracking, window navigation and pointer drags.

use crate::config;
use crate::error::Result;
use crate::layout::Layout;
use crate::state::{place_window, resize_window, Drag, DragKind, WindowManager};
use crate::xconn::XConn;
use x11rb::protocol::xproto::{Button, Window};

impl WindowManager {
    /// Give `window` input focus and raise it. Ignores 0 and the root.
    pub fn focus<C: XConn>(&mut self, conn: &C, window: Window) -> Result<()> {
        if window == 0 || window == conn.root() {
            return Ok(());
        }
        conn.focus_window(window)?;
        if let Some(index) = self.current_workspace().find(window) {
            self.focused = Some(window);
            self.focused_idx = Some(index);
            conn.raise_window(window)?;
        }
        self.request_bar_redraw();
        Ok(())
    }

    /// Park focus on the root window, e.g. when a workspace is empty.
    pub fn focus_root<C: XConn>(&mut self, conn: &C) -> Result<()> {
        conn.focus_window(conn.root())?;
        self.focused = None;
        self.focused_idx = None;
        self.request_bar_redraw();
        Ok(())
    }

    pub fn focus_color<C: XConn>(&self, conn: &C, window: Window, focused: bool) -> Result<()> {
        if self.screen.border <= 0 || window == 0 || window == conn.root() {
            return Ok(());
        }
        let color = if focused {
            config::BORDER_ACTIVE
        } else {
            config::BORDER_INACTIVE
        };
        conn.set_border_color(window, color)
    }

    /// Pick a new focus after the window at `index` left the current
    /// workspace: the window that slid into its slot, or the new last one.
    pub(crate) fn refocus_after_removal<C: XConn>(&mut self, conn: &C, index: usize) -> Result<()> {
        let ws = self.current_workspace();
        let next = if ws.is_empty() {
            None
        } else if index + 1 >= ws.len() {
            ws.last().map(|c| c.id)
        } else {
            ws.get(index).map(|c| c.id)
        };
        match next {
            Some(window) => self.focus(conn, window),
            None => self.focus_root(conn),
        }
    }

    pub fn window_next<C: XConn>(&mut self, conn: &C) -> Result<()> {
        self.cycle_focus(conn, 1)
    }

    pub fn window_prev<C: XConn>(&mut self, conn: &C) -> Result<()> {
        let len = self.current_workspace().len();
        self.cycle_focus(conn, len.saturating_sub(1))
    }

    /// Move focus `step` places forward around the window ring.
    fn cycle_focus<C: XConn>(&mut self, conn: &C, step: usize) -> Result<()> {
        let ws = self.current_workspace();
        if ws.len() < 2 {
            return Ok(());
        }
        let Some(index) = self.focused_index() else {
            return Ok(());
        };
        let next = ws.windows[(index + step) % ws.len()].id;
        self.focus(conn, next)
    }

    /// Trade places between the focused window and the master slot.
    pub fn swap_last<C: XConn>(&mut self, conn: &C) -> Result<()> {
        let len = self.current_workspace().len();
        if len < 2 {
            return Ok(());
        }
        let (Some(window), Some(index)) = (self.focused, self.focused_index()) else {
            return Ok(());
        };
        if index == len - 1 {
            return Ok(());
        }
        self.workspaces[self.current].windows.swap(index, len - 1);
        self.focused_idx = None;
        self.arrange(conn, self.current)?;
        self.focus(conn, window)
    }

    /// Close the focused window and hand focus to a neighbour.
    pub fn kill<C: XConn>(&mut self, conn: &C) -> Result<()> {
        let (Some(window), Some(index)) = (self.focused, self.focused_index()) else {
            return Ok(());
        };
        log::info!("killing {:#x}", window);
        self.workspaces[self.current].remove(index);
        self.focused_idx = None;

        self.refocus_after_removal(conn, index)?;
        self.arrange(conn, self.current)?;
        conn.flush()?;
        conn.kill_client(window)
    }

    /// Cover the whole screen with the focused window, or put it back.
    pub fn toggle_fullscreen<C: XConn>(&mut self, conn: &C) -> Result<()> {
        let Some(index) = self.focused_index() else {
            return Ok(());
        };
        let full = self.screen.fullscreen();
        let client = &mut self.workspaces[self.current].windows[index];
        let rect = if client.is_fullscreen {
            client.geometry
        } else {
            full
        };
        client.is_fullscreen = !client.is_fullscreen;
        place_window(conn, client.id, rect)
    }

    // Pointer drags.

    pub fn handle_button_press<C: XConn>(
        &mut self,
        conn: &C,
        button: Button,
        child: Window,
        x: i32,
        y: i32,
    ) -> Result<()> {
        self.focus(conn, child)?;
        if !self.current_workspace().contains(child) {
            return Ok(());
        }
        let kind = match button {
            config::BUTTON_LEFT => DragKind::Move,
            config::BUTTON_RIGHT => DragKind::Resize,
            _ => return Ok(()),
        };
        log::debug!("{:?} drag of {:#x} from ({}, {})", kind, child, x, y);
        self.drag = Some(Drag {
            kind,
            window: child,
            last: (x, y),
        });
        conn.grab_pointer(kind.cursor())
    }

    /// Follow the pointer while a button is held. Only floating workspaces
    /// can be rearranged by hand.
    pub fn handle_motion<C: XConn>(&mut self, conn: &C) -> Result<()> {
        let Some(drag) = self.drag else {
            return Ok(());
        };
        if self.current_workspace().layout != Layout::Floating {
            return Ok(());
        }
        let Some((px, py)) = conn.query_pointer() else {
            return Ok(());
        };
        let Some(geo) = conn.window_geometry(drag.window) else {
            return Ok(());
        };
        let (lx, ly) = drag.last;

        match drag.kind {
            DragKind::Move => {
                if (px, py) == (lx, ly) {
                    return Ok(());
                }
                conn.move_window(drag.window, geo.x + px - lx, geo.y + py - ly)?;
            }
            DragKind::Resize => {
                if px <= geo.x || py <= geo.y {
                    return Ok(());
                }
                resize_window(conn, drag.window, geo.w + px - lx, geo.h + py - ly)?;
            }
        }
        self.drag = Some(Drag {
            last: (px, py),
            ..drag
        });
        Ok(())
    }

    /// End the drag and remember where the window ended up.
    pub fn handle_button_release<C: XConn>(&mut self, conn: &C) -> Result<()> {
        conn.ungrab_pointer()?;
        let Some(drag) = self.drag.take() else {
            return Ok(());
        };
        let Some(geo) = conn.window_geometry(drag.window) else {
            return Ok(());
        };
        let windows = &mut self.workspaces[self.current].windows;
        if let Some(client) = windows.iter_mut().find(|c| c.id == drag.window) {
            client.geometry = geo;
            client.is_floating = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::config;
    use crate::events::WmEvent;
    use crate::layout::{Layout, Screen};
    use crate::state::WindowManager;
    use crate::testing::{self, ids, wm, wm_with, MockConn, RecordingLauncher, Req, ROOT};
    use crate::window::Rect;
    use crate::xconn::PointerCursor;
    use x11rb::protocol::xproto::Window;

    fn managed(windows: &[Window], layout: Layout) -> (WindowManager, MockConn) {
        let conn = MockConn::new();
        let (mut wm, _) = wm_with(layout);
        for &window in windows {
            wm.handle_map_request(&conn, window).unwrap();
        }
        conn.take_requests();
        (wm, conn)
    }

    #[test]
    fn focus_ignores_root_and_none() {
        let conn = MockConn::new();
        let mut wm = wm();
        wm.focus(&conn, 0).unwrap();
        wm.focus(&conn, ROOT).unwrap();
        assert!(conn.take_requests().is_empty());
        assert_eq!(wm.focused_window(), None);
    }

    #[test]
    fn next_and_prev_wrap_around() {
        let (mut wm, conn) = managed(&[10, 11, 12], Layout::Tiling);
        assert_eq!(wm.focused_window(), Some(12));

        wm.window_next(&conn).unwrap();
        assert_eq!(wm.focused_window(), Some(10));
        wm.window_prev(&conn).unwrap();
        assert_eq!(wm.focused_window(), Some(12));
        wm.window_prev(&conn).unwrap();
        assert_eq!(wm.focused_window(), Some(11));
        assert_eq!(wm.focused_index(), Some(1));
    }

    #[test]
    fn single_window_navigation_is_a_no_op() {
        let (mut wm, conn) = managed(&[10], Layout::Tiling);
        wm.window_next(&conn).unwrap();
        wm.window_prev(&conn).unwrap();
        wm.swap_last(&conn).unwrap();
        assert!(conn.take_requests().is_empty());
        assert_eq!(wm.focused_window(), Some(10));
    }

    #[test]
    fn swap_last_promotes_the_focused_window() {
        let (mut wm, conn) = managed(&[10, 11, 12], Layout::Tiling);
        wm.focus(&conn, 10).unwrap();

        wm.swap_last(&conn).unwrap();

        assert_eq!(ids(&wm), vec![12, 11, 10]);
        assert_eq!(wm.focused_window(), Some(10));
        assert_eq!(wm.focused_index(), Some(2));
        assert_eq!(conn.geometry(10), Some(Rect::new(0, 15, 958, 1063)));
        assert_eq!(conn.geometry(12), Some(Rect::new(960, 547, 958, 530)));
    }

    #[test]
    fn fullscreen_toggles_back_to_the_tile() {
        let (mut wm, conn) = managed(&[10], Layout::Tiling);

        wm.toggle_fullscreen(&conn).unwrap();
        assert_eq!(conn.geometry(10), Some(Rect::new(-1, -1, 1920, 1080)));
        assert!(wm.current_workspace().windows[0].is_fullscreen);

        wm.toggle_fullscreen(&conn).unwrap();
        assert_eq!(conn.geometry(10), Some(Rect::new(0, 15, 1918, 1063)));
        assert!(!wm.current_workspace().windows[0].is_fullscreen);
    }

    #[test]
    fn refocusing_a_fullscreen_window_raises_it_again() {
        let (mut wm, conn) = managed(&[10, 11], Layout::Tiling);
        wm.toggle_fullscreen(&conn).unwrap();
        wm.focus(&conn, 10).unwrap();
        conn.take_requests();

        wm.focus(&conn, 11).unwrap();

        assert_eq!(conn.take_requests(), vec![Req::Focus(11), Req::Raise(11)]);
        assert_eq!(conn.geometry(11), Some(Rect::new(-1, -1, 1920, 1080)));
        assert!(wm.current_workspace().windows[1].is_fullscreen);
    }

    #[test]
    fn borderless_screens_never_recolor() {
        let conn = MockConn::new();
        let screen = Screen {
            border: 0,
            ..testing::screen()
        };
        let launcher = Box::new(RecordingLauncher::default());
        let wm = WindowManager::new(screen, &["1"], Layout::Tiling, launcher);

        wm.focus_color(&conn, 10, true).unwrap();
        wm.focus_color(&conn, 10, false).unwrap();
        assert!(conn.take_requests().is_empty());
    }

    #[test]
    fn focus_events_color_borders() {
        let (mut wm, conn) = managed(&[10], Layout::Tiling);
        wm.handle_event(&conn, WmEvent::FocusIn { window: 10 }).unwrap();
        wm.handle_event(&conn, WmEvent::FocusOut { window: 10 }).unwrap();
        wm.handle_event(&conn, WmEvent::FocusIn { window: ROOT }).unwrap();
        assert_eq!(
            conn.take_requests(),
            vec![
                Req::BorderColor(10, config::BORDER_ACTIVE),
                Req::BorderColor(10, config::BORDER_INACTIVE),
            ]
        );
    }

    #[test]
    fn move_drag_follows_the_pointer() {
        let (mut wm, conn) = managed(&[10], Layout::Floating);
        assert_eq!(conn.geometry(10), Some(Rect::new(660, 340, 600, 400)));

        wm.handle_button_press(&conn, config::BUTTON_LEFT, 10, 100, 100)
            .unwrap();
        assert!(conn.take_requests().contains(&Req::GrabPointer(PointerCursor::Move)));

        for (x, y) in [(110, 105), (110, 105), (130, 95)] {
            conn.set_pointer(x, y);
            wm.handle_motion(&conn).unwrap();
        }
        wm.handle_button_release(&conn).unwrap();

        let expected = Rect::new(690, 335, 600, 400);
        assert_eq!(conn.geometry(10), Some(expected));
        let client = &wm.current_workspace().windows[0];
        assert_eq!(client.geometry, expected);
        assert!(client.is_floating);
        assert!(conn.take_requests().contains(&Req::UngrabPointer));
    }

    #[test]
    fn resize_drag_grows_from_the_corner() {
        let (mut wm, conn) = managed(&[10], Layout::Floating);
        wm.handle_button_press(&conn, config::BUTTON_RIGHT, 10, 1260, 740)
            .unwrap();

        conn.set_pointer(1280, 760);
        wm.handle_motion(&conn).unwrap();
        assert_eq!(conn.geometry(10), Some(Rect::new(660, 340, 620, 420)));

        // Shrinking below the minimum is ignored.
        conn.set_pointer(700, 360);
        wm.handle_motion(&conn).unwrap();
        assert_eq!(conn.geometry(10), Some(Rect::new(660, 340, 620, 420)));

        wm.handle_button_release(&conn).unwrap();
        assert_eq!(
            wm.current_workspace().windows[0].geometry,
            Rect::new(660, 340, 620, 420)
        );
    }

    #[test]
    fn drags_only_move_windows_when_floating() {
        let (mut wm, conn) = managed(&[10], Layout::Tiling);
        wm.handle_button_press(&conn, config::BUTTON_LEFT, 10, 100, 100)
            .unwrap();
        conn.take_requests();

        conn.set_pointer(150, 150);
        wm.handle_motion(&conn).unwrap();
        assert!(conn.take_requests().is_empty());
        assert_eq!(conn.geometry(10), Some(Rect::new(0, 15, 1918, 1063)));
    }

    #[test]
    fn other_buttons_do_not_drag() {
        let (mut wm, conn) = managed(&[10], Layout::Floating);
        wm.handle_button_press(&conn, 2, 10, 100, 100).unwrap();
        assert!(!conn.take_requests().contains(&Req::GrabPointer(PointerCursor::Move)));

        conn.set_pointer(150, 150);
        wm.handle_motion(&conn).unwrap();
        assert!(conn.take_requests().is_empty());
    }
}
