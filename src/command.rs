use crate::keys::clean_mask;
use crate::layout::Layout;
use x11rb::protocol::xproto::Keysym;

/// What a key binding does. Arguments travel inside the variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Quit,
    Kill,
    Spawn(&'static [&'static str]),
    WindowNext,
    WindowPrev,
    SwapLast,
    ToggleFullscreen,
    WorkspaceSwapPrev,
    WorkspaceNext,
    WorkspacePrev,
    Workspace(&'static str),
    MoveToWorkspace(&'static str),
    UseLayout(Layout),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keybind {
    pub modifiers: u16,
    pub keysym: Keysym,
    pub action: Action,
}

impl Keybind {
    pub const fn new(modifiers: u16, keysym: Keysym, action: Action) -> Self {
        Self {
            modifiers,
            keysym,
            action,
        }
    }
}

/// Every action bound to `(state, keysym)`, in table order.
pub fn lookup(table: &[Keybind], state: u16, keysym: Keysym) -> impl Iterator<Item = Action> + '_ {
    let mask = clean_mask(state);
    table
        .iter()
        .filter(move |k| k.keysym == keysym && k.modifiers == mask)
        .map(|k| k.action)
}
