use crate::window::Rect;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    /// Master on the left, everything else stacked on the right.
    Tiling,
    /// Windows keep whatever geometry the user dragged them to.
    Floating,
    /// Every window full screen; stacking order decides what is visible.
    Windowed,
}

impl Layout {
    /// Short tag shown in the bar.
    pub fn symbol(self) -> &'static str {
        match self {
            Layout::Tiling => "[T]",
            Layout::Floating => "[F]",
            Layout::Windowed => "[W]",
        }
    }
}

/// The screen as the layout engine sees it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Screen {
    pub width: i32,
    pub height: i32,
    pub bar_height: i32,
    pub border: i32,
    /// Master width as a percentage of the screen width.
    pub master_ratio: f64,
}

impl Screen {
    /// The usable area for one window: below the bar, borders taken off
    /// both edges of each axis.
    pub fn full(&self) -> Rect {
        Rect::new(
            0,
            self.bar_height,
            self.width - self.border * 2,
            self.height - self.bar_height - self.border * 2,
        )
    }

    /// Cover the whole screen, borders pushed just outside it.
    pub fn fullscreen(&self) -> Rect {
        Rect::new(-self.border, -self.border, self.width, self.height)
    }
}

/// Geometry for `count` windows, indexed like the workspace list.
///
/// `None` means the layout does not place windows at all.
pub fn arrange(layout: Layout, count: usize, screen: &Screen) -> Option<Vec<Rect>> {
    match layout {
        Layout::Tiling => Some(tiling(count, screen)),
        Layout::Windowed => Some(windowed(count, screen)),
        Layout::Floating => None,
    }
}

pub fn windowed(count: usize, screen: &Screen) -> Vec<Rect> {
    vec![screen.full(); count]
}

pub fn tiling(count: usize, screen: &Screen) -> Vec<Rect> {
    if count < 2 {
        return windowed(count, screen);
    }

    let b2 = screen.border * 2;
    let width = f64::from(screen.width);

    let master = Rect::new(
        0,
        screen.bar_height,
        (screen.master_ratio / 100.0 * width) as i32 - b2,
        screen.height - screen.bar_height - b2,
    );

    let stack_x = master.w + b2;
    let stack_w = ((100.0 - screen.master_ratio) / 100.0 * width) as i32 - b2;
    let stack_h = if count > 2 {
        (screen.height - screen.bar_height) / (count as i32 - 1) - b2
    } else {
        master.h
    };

    let mut rects = vec![Rect::default(); count];
    let last = count - 1;
    rects[last] = master;

    // Walk from the window just before the master down to the first one,
    // filling the stack top to bottom.
    let mut y = screen.bar_height;
    for rect in rects[..last].iter_mut().rev() {
        *rect = Rect::new(stack_x, y, stack_w, stack_h);
        y += stack_h + b2;
    }

    rects
}
