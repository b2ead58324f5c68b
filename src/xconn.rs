use crate::command::Keybind;
use crate::config;
use crate::error::{Result, WmError};
use crate::events::WmEvent;
use crate::keys::{lock_variants, Keymap};
use crate::window::Rect;
use x11rb::connection::Connection;
use x11rb::errors::ReplyError;
use x11rb::protocol::xproto::{
    AtomEnum, ButtonIndex, ChangeWindowAttributesAux, ConfigureWindowAux, ConnectionExt,
    CreateWindowAux, Cursor, EventMask, GrabMode, InputFocus, Keycode, Keysym, ModMask,
    PropMode, Screen, StackMode, Window, WindowClass,
};
use x11rb::protocol::Event;
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as _;

x11rb::atom_manager! {
    pub Atoms: AtomsCookie {
        _NET_SUPPORTING_WM_CHECK,
        _NET_WM_NAME,
        UTF8_STRING,
    }
}

/// Which cursor the pointer shows while grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerCursor {
    Move,
    Resize,
}

/// The requests the window manager core makes of the X server.
///
/// Everything returning `Result<()>` is a one-way request that only fails
/// when the connection itself is broken. The queries return `None` when the
/// server has nothing useful to say, and callers skip what depended on them.
pub trait XConn {
    fn root(&self) -> Window;
    fn map_window(&self, window: Window) -> Result<()>;
    fn unmap_window(&self, window: Window) -> Result<()>;
    fn move_window(&self, window: Window, x: i32, y: i32) -> Result<()>;
    fn resize_window(&self, window: Window, width: u32, height: u32) -> Result<()>;
    fn set_border_width(&self, window: Window, width: u32) -> Result<()>;
    fn set_border_color(&self, window: Window, color: u32) -> Result<()>;
    fn raise_window(&self, window: Window) -> Result<()>;
    fn focus_window(&self, window: Window) -> Result<()>;
    /// Ask for enter and focus change events on a newly managed window.
    fn watch_window(&self, window: Window) -> Result<()>;
    fn kill_client(&self, window: Window) -> Result<()>;
    fn grab_pointer(&self, cursor: PointerCursor) -> Result<()>;
    fn ungrab_pointer(&self) -> Result<()>;
    fn query_pointer(&self) -> Option<(i32, i32)>;
    fn window_geometry(&self, window: Window) -> Option<Rect>;
    fn window_class(&self, window: Window) -> Option<String>;
    fn keysym(&self, keycode: Keycode) -> Keysym;
    fn flush(&self) -> Result<()>;
}

/// The real thing: a connection to the X server on `$DISPLAY`.
pub struct X11Conn {
    conn: RustConnection,
    screen_num: usize,
    atoms: Atoms,
    keymap: Keymap,
    cursor_default: Cursor,
    cursor_move: Cursor,
    cursor_resize: Cursor,
}

impl X11Conn {
    pub fn connect() -> std::result::Result<Self, Box<dyn std::error::Error>> {
        let (conn, screen_num) = x11rb::connect(None)?;
        let atoms = Atoms::new(&conn)?.reply()?;

        let setup = conn.setup();
        let min_keycode = setup.min_keycode;
        let mapping = conn
            .get_keyboard_mapping(min_keycode, setup.max_keycode - min_keycode + 1)?
            .reply()?;
        let keymap = Keymap::from_reply(min_keycode, mapping);

        let font = conn.generate_id()?;
        conn.open_font(font, b"cursor")?;
        let glyph = |source: u16| -> Result<Cursor> {
            let cursor = conn.generate_id()?;
            conn.create_glyph_cursor(
                cursor, font, font, source, source + 1, 0, 0, 0, 0xffff, 0xffff, 0xffff,
            )?;
            Ok(cursor)
        };
        let cursor_default = glyph(config::CURSOR_DEFAULT)?;
        let cursor_move = glyph(config::CURSOR_MOVE)?;
        let cursor_resize = glyph(config::CURSOR_RESIZE)?;
        conn.close_font(font)?;

        Ok(Self {
            conn,
            screen_num,
            atoms,
            keymap,
            cursor_default,
            cursor_move,
            cursor_resize,
        })
    }

    pub fn conn(&self) -> &RustConnection {
        &self.conn
    }

    pub fn screen(&self) -> &Screen {
        &self.conn.setup().roots[self.screen_num]
    }

    /// Select substructure redirection on the root. Only one client may
    /// hold it, so failure means another window manager is running.
    pub fn become_wm(&self) -> Result<()> {
        let change = ChangeWindowAttributesAux::new()
            .event_mask(
                EventMask::SUBSTRUCTURE_REDIRECT
                    | EventMask::STRUCTURE_NOTIFY
                    | EventMask::SUBSTRUCTURE_NOTIFY
                    | EventMask::PROPERTY_CHANGE,
            )
            .cursor(self.cursor_default);
        match self.conn.change_window_attributes(self.root(), &change)?.check() {
            Ok(()) => Ok(()),
            Err(ReplyError::X11Error(_)) => Err(WmError::AlreadyRunning),
            Err(e) => Err(e.into()),
        }
    }

    pub fn grab_keys(&self, table: &[Keybind]) -> Result<()> {
        for bind in table {
            let codes = self.keymap.keycodes(bind.keysym);
            if codes.is_empty() {
                log::warn!("no keycode for keysym {:#06x}", bind.keysym);
            }
            for code in codes {
                for mask in lock_variants(bind.modifiers) {
                    self.conn
                        .grab_key(
                            true,
                            self.root(),
                            ModMask::from(mask),
                            code,
                            GrabMode::ASYNC,
                            GrabMode::ASYNC,
                        )
                        .ok();
                }
            }
        }
        self.conn.flush()?;
        Ok(())
    }

    /// Mod+left drags, Mod+right resizes.
    pub fn grab_buttons(&self) -> Result<()> {
        for button in [ButtonIndex::M1, ButtonIndex::M3] {
            self.conn.grab_button(
                false,
                self.root(),
                EventMask::BUTTON_PRESS | EventMask::BUTTON_RELEASE,
                GrabMode::ASYNC,
                GrabMode::ASYNC,
                self.root(),
                x11rb::NONE,
                button,
                ModMask::from(config::MOD_KEY),
            )?;
        }
        self.conn.flush()?;
        Ok(())
    }

    /// Create the EWMH supporting window so clients can tell a window
    /// manager is present, and give it our name.
    pub fn announce(&self) -> Result<()> {
        let screen = self.screen();
        let check = self.conn.generate_id()?;
        self.conn.create_window(
            x11rb::COPY_DEPTH_FROM_PARENT,
            check,
            screen.root,
            0,
            0,
            1,
            1,
            0,
            WindowClass::INPUT_OUTPUT,
            screen.root_visual,
            &CreateWindowAux::new(),
        )?;
        for window in [screen.root, check] {
            self.conn.change_property32(
                PropMode::REPLACE,
                window,
                self.atoms._NET_SUPPORTING_WM_CHECK,
                AtomEnum::WINDOW,
                &[check],
            )?;
        }
        self.conn.change_property8(
            PropMode::REPLACE,
            check,
            self.atoms._NET_WM_NAME,
            self.atoms.UTF8_STRING,
            config::NAME.as_bytes(),
        )?;
        self.conn.flush()?;
        Ok(())
    }

    pub fn wait_for_event(&self) -> Result<Event> {
        Ok(self.conn.wait_for_event()?)
    }

    fn configure(&self, window: Window, aux: &ConfigureWindowAux) -> Result<()> {
        self.conn.configure_window(window, aux)?;
        Ok(())
    }
}

impl XConn for X11Conn {
    fn root(&self) -> Window {
        self.screen().root
    }

    fn map_window(&self, window: Window) -> Result<()> {
        self.conn.map_window(window)?;
        Ok(())
    }

    fn unmap_window(&self, window: Window) -> Result<()> {
        self.conn.unmap_window(window)?;
        Ok(())
    }

    fn move_window(&self, window: Window, x: i32, y: i32) -> Result<()> {
        self.configure(window, &ConfigureWindowAux::new().x(x).y(y))
    }

    fn resize_window(&self, window: Window, width: u32, height: u32) -> Result<()> {
        self.configure(window, &ConfigureWindowAux::new().width(width).height(height))
    }

    fn set_border_width(&self, window: Window, width: u32) -> Result<()> {
        self.configure(window, &ConfigureWindowAux::new().border_width(width))
    }

    fn set_border_color(&self, window: Window, color: u32) -> Result<()> {
        let change = ChangeWindowAttributesAux::new().border_pixel(color);
        self.conn.change_window_attributes(window, &change)?;
        Ok(())
    }

    fn raise_window(&self, window: Window) -> Result<()> {
        self.configure(window, &ConfigureWindowAux::new().stack_mode(StackMode::ABOVE))
    }

    fn focus_window(&self, window: Window) -> Result<()> {
        self.conn
            .set_input_focus(InputFocus::POINTER_ROOT, window, x11rb::CURRENT_TIME)?;
        Ok(())
    }

    fn watch_window(&self, window: Window) -> Result<()> {
        let change = ChangeWindowAttributesAux::new()
            .event_mask(EventMask::ENTER_WINDOW | EventMask::FOCUS_CHANGE);
        self.conn.change_window_attributes(window, &change)?;
        Ok(())
    }

    fn kill_client(&self, window: Window) -> Result<()> {
        self.conn.kill_client(window)?;
        Ok(())
    }

    fn grab_pointer(&self, cursor: PointerCursor) -> Result<()> {
        let cursor = match cursor {
            PointerCursor::Move => self.cursor_move,
            PointerCursor::Resize => self.cursor_resize,
        };
        // The reply only says whether the grab took; a failed grab just
        // means no motion events arrive.
        self.conn.grab_pointer(
            false,
            self.root(),
            EventMask::BUTTON_RELEASE | EventMask::BUTTON_MOTION | EventMask::POINTER_MOTION_HINT,
            GrabMode::ASYNC,
            GrabMode::ASYNC,
            self.root(),
            cursor,
            x11rb::CURRENT_TIME,
        )?;
        Ok(())
    }

    fn ungrab_pointer(&self) -> Result<()> {
        self.conn.ungrab_pointer(x11rb::CURRENT_TIME)?;
        Ok(())
    }

    fn query_pointer(&self) -> Option<(i32, i32)> {
        let reply = self.conn.query_pointer(self.root()).ok()?.reply().ok()?;
        Some((i32::from(reply.root_x), i32::from(reply.root_y)))
    }

    fn window_geometry(&self, window: Window) -> Option<Rect> {
        let geo = self.conn.get_geometry(window).ok()?.reply().ok()?;
        Some(Rect::new(
            i32::from(geo.x),
            i32::from(geo.y),
            i32::from(geo.width),
            i32::from(geo.height),
        ))
    }

    fn window_class(&self, window: Window) -> Option<String> {
        let reply = self
            .conn
            .get_property(false, window, AtomEnum::WM_CLASS, AtomEnum::STRING, 0, 250)
            .ok()?
            .reply()
            .ok()?;
        parse_wm_class(&reply.value)
    }

    fn keysym(&self, keycode: Keycode) -> Keysym {
        self.keymap.keysym(keycode)
    }

    fn flush(&self) -> Result<()> {
        self.conn.flush()?;
        Ok(())
    }
}

/// WM_CLASS holds `instance\0class\0`; the class is what gets shown.
fn parse_wm_class(value: &[u8]) -> Option<String> {
    let mut parts = value.split(|&b| b == 0);
    let instance = parts.next()?;
    let class = parts.next().filter(|c| !c.is_empty()).unwrap_or(instance);
    if class.is_empty() {
        return None;
    }
    Some(String::from_utf8_lossy(class).into_owned())
}

impl WmEvent {
    /// Narrow a raw X event to the ones the window manager reacts to.
    pub fn from_x11(event: Event) -> Option<Self> {
        let event = match event {
            Event::KeyPress(e) => WmEvent::KeyPress {
                keycode: e.detail,
                state: u16::from(e.state),
            },
            Event::MapRequest(e) => WmEvent::MapRequest { window: e.window },
            Event::FocusIn(e) => WmEvent::FocusIn { window: e.event },
            Event::FocusOut(e) => WmEvent::FocusOut { window: e.event },
            Event::EnterNotify(e) => WmEvent::EnterNotify { window: e.event },
            Event::MotionNotify(_) => WmEvent::MotionNotify,
            Event::DestroyNotify(e) => WmEvent::DestroyNotify { window: e.window },
            Event::ButtonPress(e) => WmEvent::ButtonPress {
                button: e.detail,
                child: e.child,
                x: i32::from(e.root_x),
                y: i32::from(e.root_y),
            },
            Event::ButtonRelease(_) => WmEvent::ButtonRelease,
            Event::Expose(e) if e.count == 0 => WmEvent::Expose { window: e.window },
            _ => return None,
        };
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wm_class_prefers_the_class_part() {
        assert_eq!(parse_wm_class(b"st-256color\0St\0"), Some("St".into()));
    }

    #[test]
    fn wm_class_falls_back_to_instance() {
        assert_eq!(parse_wm_class(b"xterm\0\0"), Some("xterm".into()));
        assert_eq!(parse_wm_class(b"xterm"), Some("xterm".into()));
    }

    #[test]
    fn empty_wm_class_is_absent() {
        assert_eq!(parse_wm_class(b""), None);
        assert_eq!(parse_wm_class(b"\0\0"), None);
    }
}
