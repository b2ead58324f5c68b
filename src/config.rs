//! Compiled-in configuration. Edit and rebuild to change anything here.

use crate::command::{Action, Keybind};
use crate::keys::*;
use crate::layout::Layout;

pub const NAME: &str = "tfwm";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const COPYRIGHT: &str = "Copyright (c) 2024 Raihan Rahardyan, MIT License";

pub const MOD_KEY: u16 = MOD_SUPER;

pub const BUTTON_LEFT: u8 = 1;
pub const BUTTON_RIGHT: u8 = 3;

// Glyph indices into the X core "cursor" font.
pub const CURSOR_DEFAULT: u16 = 68; // left_ptr
pub const CURSOR_MOVE: u16 = 52; // fleur
pub const CURSOR_RESIZE: u16 = 14; // bottom_right_corner

const BLACK: u32 = 0x000000;
const GRAY: u32 = 0x696969;
const WHITE: u32 = 0xffffff;

pub const WINDOW_WIDTH: i32 = 600;
pub const WINDOW_HEIGHT: i32 = 400;
pub const MIN_WINDOW_WIDTH: i32 = 60;
pub const MIN_WINDOW_HEIGHT: i32 = 40;

pub const BORDER_WIDTH: u32 = 1;
pub const BORDER_ACTIVE: u32 = WHITE;
pub const BORDER_INACTIVE: u32 = GRAY;

/// Percentage of the screen width given to the tiling master.
pub const TILE_MASTER_RATIO: f64 = 50.0;

pub const FONT: &str = "fixed";
pub const FONT_HEIGHT: i16 = 13;

pub const BAR_HEIGHT: u16 = FONT_HEIGHT as u16 + 2;
pub const BAR_SEPARATOR: &str = " ";
pub const BAR_FOREGROUND: u32 = WHITE;
pub const BAR_BACKGROUND: u32 = BLACK;
pub const BAR_FOREGROUND_ACTIVE: u32 = BLACK;
pub const BAR_BACKGROUND_ACTIVE: u32 = WHITE;

pub const WORKSPACES: &[&str] = &["1", "2", "3", "4", "5", "6", "7", "8", "9"];
pub const DEFAULT_LAYOUT: Layout = Layout::Tiling;

/// Relative to the home directory.
pub const LOG_FILE: &str = ".local/share/tfwm.0.log";

const TERMINAL: &[&str] = &["st"];

pub const KEYBINDS: &[Keybind] = &[
    Keybind::new(MOD_KEY | MOD_SHIFT, XK_Q, Action::Quit),
    // Application
    Keybind::new(MOD_KEY, XK_Q, Action::Kill),
    Keybind::new(MOD_KEY, XK_RETURN, Action::Spawn(TERMINAL)),
    // Window navigation
    Keybind::new(MOD_KEY, XK_H, Action::WindowPrev),
    Keybind::new(MOD_KEY, XK_J, Action::WindowPrev),
    Keybind::new(MOD_KEY, XK_K, Action::WindowNext),
    Keybind::new(MOD_KEY, XK_L, Action::WindowNext),
    Keybind::new(MOD_KEY, XK_SPACE, Action::SwapLast),
    // Window manipulation
    Keybind::new(MOD_KEY, XK_M, Action::ToggleFullscreen),
    // Workspace navigation
    Keybind::new(MOD_KEY, XK_GRAVE, Action::WorkspaceSwapPrev),
    Keybind::new(MOD_KEY, XK_BRACKETRIGHT, Action::WorkspaceNext),
    Keybind::new(MOD_KEY, XK_BRACKETLEFT, Action::WorkspacePrev),
    Keybind::new(MOD_KEY, XK_1, Action::Workspace("1")),
    Keybind::new(MOD_KEY, XK_2, Action::Workspace("2")),
    Keybind::new(MOD_KEY, XK_3, Action::Workspace("3")),
    Keybind::new(MOD_KEY, XK_4, Action::Workspace("4")),
    Keybind::new(MOD_KEY, XK_5, Action::Workspace("5")),
    Keybind::new(MOD_KEY, XK_6, Action::Workspace("6")),
    Keybind::new(MOD_KEY, XK_7, Action::Workspace("7")),
    Keybind::new(MOD_KEY, XK_8, Action::Workspace("8")),
    Keybind::new(MOD_KEY, XK_9, Action::Workspace("9")),
    Keybind::new(MOD_KEY | MOD_SHIFT, XK_1, Action::MoveToWorkspace("1")),
    Keybind::new(MOD_KEY | MOD_SHIFT, XK_2, Action::MoveToWorkspace("2")),
    Keybind::new(MOD_KEY | MOD_SHIFT, XK_3, Action::MoveToWorkspace("3")),
    Keybind::new(MOD_KEY | MOD_SHIFT, XK_4, Action::MoveToWorkspace("4")),
    Keybind::new(MOD_KEY | MOD_SHIFT, XK_5, Action::MoveToWorkspace("5")),
    Keybind::new(MOD_KEY | MOD_SHIFT, XK_6, Action::MoveToWorkspace("6")),
    Keybind::new(MOD_KEY | MOD_SHIFT, XK_7, Action::MoveToWorkspace("7")),
    Keybind::new(MOD_KEY | MOD_SHIFT, XK_8, Action::MoveToWorkspace("8")),
    Keybind::new(MOD_KEY | MOD_SHIFT, XK_9, Action::MoveToWorkspace("9")),
    // Workspace layout
    Keybind::new(MOD_KEY, XK_T, Action::UseLayout(Layout::Tiling)),
    Keybind::new(MOD_KEY, XK_F, Action::UseLayout(Layout::Floating)),
    Keybind::new(MOD_KEY, XK_W, Action::UseLayout(Layout::Windowed)),
];
