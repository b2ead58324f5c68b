use crate::error::Result;
use crate::state::{Flow, WindowManager};
use crate::xconn::XConn;
use x11rb::protocol::xproto::{Button, Keycode, Window};

/// The X events tfwm reacts to, stripped to the fields it reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WmEvent {
    KeyPress { keycode: Keycode, state: u16 },
    MapRequest { window: Window },
    FocusIn { window: Window },
    FocusOut { window: Window },
    EnterNotify { window: Window },
    MotionNotify,
    DestroyNotify { window: Window },
    /// Coordinates are relative to the root window.
    ButtonPress { button: Button, child: Window, x: i32, y: i32 },
    ButtonRelease,
    Expose { window: Window },
}

impl WindowManager {
    /// Run the handler for one event to completion.
    pub fn handle_event<C: XConn>(&mut self, conn: &C, event: WmEvent) -> Result<Flow> {
        log::trace!("event {:?}", event);
        match event {
            WmEvent::KeyPress { keycode, state } => {
                return self.handle_key_press(conn, keycode, state);
            }
            WmEvent::MapRequest { window } => self.handle_map_request(conn, window)?,
            WmEvent::FocusIn { window } => self.focus_color(conn, window, true)?,
            WmEvent::FocusOut { window } => self.focus_color(conn, window, false)?,
            WmEvent::EnterNotify { window } => log::trace!("pointer entered {:#x}", window),
            WmEvent::MotionNotify => self.handle_motion(conn)?,
            WmEvent::DestroyNotify { window } => self.handle_destroy_notify(conn, window)?,
            WmEvent::ButtonPress {
                button,
                child,
                x,
                y,
            } => self.handle_button_press(conn, button, child, x, y)?,
            WmEvent::ButtonRelease => self.handle_button_release(conn)?,
            WmEvent::Expose { window } => {
                log::trace!("{:#x} exposed", window);
                self.request_bar_redraw();
            }
        }
        Ok(Flow::Continue)
    }
}
