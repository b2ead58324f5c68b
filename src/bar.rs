use crate::config;
use crate::error::Result;
use crate::state::WindowManager;
use crate::workspace::Workspace;
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{
    Char2b, ConfigureWindowAux, ConnectionExt, CreateGCAux, CreateWindowAux, EventMask, Font,
    Gcontext, Screen, StackMode, Window, WindowClass,
};

const MORE_LEFT: &str = "< ";
const MORE_RIGHT: &str = " >";

/// A strip along the top of the screen: workspaces and layout on the left,
/// name and version on the right, the current workspace's windows between.
pub struct Bar {
    window: Window,
    font: Font,
    active: Gcontext,
    inactive: Gcontext,
    width: u16,
    height: u16,
}

impl Bar {
    pub fn new<C: Connection>(conn: &C, screen: &Screen) -> Result<Self> {
        let window = conn.generate_id()?;
        let font = conn.generate_id()?;
        let active = conn.generate_id()?;
        let inactive = conn.generate_id()?;
        let width = screen.width_in_pixels;
        let height = config::BAR_HEIGHT;

        let win_aux = CreateWindowAux::new()
            .background_pixel(config::BAR_BACKGROUND)
            .override_redirect(1)
            .event_mask(EventMask::EXPOSURE);
        conn.create_window(
            screen.root_depth,
            window,
            screen.root,
            0,
            0,
            width,
            height,
            0,
            WindowClass::INPUT_OUTPUT,
            screen.root_visual,
            &win_aux,
        )?;

        conn.open_font(font, config::FONT.as_bytes())?;
        let gc_aux = |fg: u32, bg: u32| {
            CreateGCAux::new()
                .foreground(fg)
                .background(bg)
                .font(font)
                .graphics_exposures(0)
        };
        conn.create_gc(
            active,
            window,
            &gc_aux(config::BAR_FOREGROUND_ACTIVE, config::BAR_BACKGROUND_ACTIVE),
        )?;
        conn.create_gc(
            inactive,
            window,
            &gc_aux(config::BAR_FOREGROUND, config::BAR_BACKGROUND),
        )?;

        // Raised once; redraws never restack the bar.
        conn.map_window(window)?;
        let stack = ConfigureWindowAux::new().stack_mode(StackMode::ABOVE);
        conn.configure_window(window, &stack)?;
        conn.flush()?;

        Ok(Self {
            window,
            font,
            active,
            inactive,
            width,
            height,
        })
    }

    pub fn draw<C: Connection>(&self, conn: &C, wm: &WindowManager) -> Result<()> {
        conn.clear_area(false, self.window, 0, 0, self.width, self.height)?;

        let mut left = 0;
        for (i, ws) in wm.workspaces().iter().enumerate() {
            let gc = if i == wm.current_index() {
                self.active
            } else {
                self.inactive
            };
            left += self.text(conn, gc, left, &format!(" {} ", ws.name))?;
        }
        left += self.text(conn, self.inactive, left, config::BAR_SEPARATOR)?;
        left += self.text(conn, self.inactive, left, wm.current_workspace().layout.symbol())?;
        left += self.text(conn, self.inactive, left, config::BAR_SEPARATOR)?;

        let mut right = i32::from(self.width);
        let version = format!("{}-{}", config::NAME, config::VERSION);
        for label in [config::BAR_SEPARATOR, version.as_str()] {
            right -= self.text_width(conn, label);
            self.text(conn, self.inactive, right, label)?;
        }

        let (labels, focused) = tab_labels(wm.current_workspace(), wm.focused_window());
        let Some(focused) = focused else {
            conn.flush()?;
            return Ok(());
        };
        let widths: Vec<i32> = labels.iter().map(|l| self.text_width(conn, l)).collect();
        let more_left = self.text_width(conn, MORE_LEFT);
        let more_right = self.text_width(conn, MORE_RIGHT);
        let (start, end) = tab_range(&widths, focused, right - left - more_left - more_right);

        if start > 0 {
            left += self.text(conn, self.inactive, left, MORE_LEFT)?;
        }
        for (i, label) in labels.iter().enumerate().take(end).skip(start) {
            let gc = if i == focused {
                self.active
            } else {
                self.inactive
            };
            left += self.text(conn, gc, left, label)?;
        }
        if end < labels.len() {
            self.text(conn, self.inactive, left, MORE_RIGHT)?;
        }

        conn.flush()?;
        Ok(())
    }

    /// Width of `text` in the bar font, or 0 if the server won't say.
    fn text_width<C: Connection>(&self, conn: &C, text: &str) -> i32 {
        let chars: Vec<Char2b> = text
            .bytes()
            .map(|byte2| Char2b { byte1: 0, byte2 })
            .collect();
        conn.query_text_extents(self.font, &chars)
            .ok()
            .and_then(|cookie| cookie.reply().ok())
            .map_or(0, |reply| reply.overall_width)
    }

    /// Draw `text` with its left edge at `x` and return its width.
    fn text<C: Connection>(&self, conn: &C, gc: Gcontext, x: i32, text: &str) -> Result<i32> {
        let bytes = &text.as_bytes()[..text.len().min(255)];
        let x = i16::try_from(x).unwrap_or(i16::MAX);
        conn.image_text8(self.window, gc, x, config::FONT_HEIGHT, bytes)?;
        Ok(self.text_width(conn, text))
    }
}

/// One " class " label per live window, plus the position of the focused
/// one among them. No tabs are drawn without a focused window.
fn tab_labels(ws: &Workspace, focused: Option<Window>) -> (Vec<String>, Option<usize>) {
    let live: Vec<_> = ws.windows.iter().filter(|c| !c.is_killed).collect();
    let index = live.iter().position(|c| Some(c.id) == focused);
    let labels = live.iter().map(|c| format!(" {} ", c.class)).collect();
    (labels, index)
}

/// The half-open range of tabs to show: the focused tab, grown one tab at
/// a time to the right then the left for as long as the total fits `max`.
fn tab_range(widths: &[i32], focused: usize, max: i32) -> (usize, usize) {
    if focused >= widths.len() {
        return (0, 0);
    }
    let (mut start, mut end) = (focused, focused + 1);
    let mut total = widths[focused];
    loop {
        let mut grew = false;
        if end < widths.len() && total + widths[end] <= max {
            total += widths[end];
            end += 1;
            grew = true;
        }
        if start > 0 && total + widths[start - 1] <= max {
            start -= 1;
            total += widths[start];
            grew = true;
        }
        if !grew {
            return (start, end);
        }
    }
}
