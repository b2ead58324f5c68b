use x11rb::protocol::xproto::{GetKeyboardMappingReply, Keycode, Keysym};

// Core protocol modifier bits, usable in const tables.
pub const MOD_SHIFT: u16 = 1 << 0;
pub const MOD_LOCK: u16 = 1 << 1;
pub const MOD_NUMLOCK: u16 = 1 << 4;
pub const MOD_SUPER: u16 = 1 << 6;

pub const XK_SPACE: Keysym = 0x0020;
pub const XK_1: Keysym = 0x0031;
pub const XK_2: Keysym = 0x0032;
pub const XK_3: Keysym = 0x0033;
pub const XK_4: Keysym = 0x0034;
pub const XK_5: Keysym = 0x0035;
pub const XK_6: Keysym = 0x0036;
pub const XK_7: Keysym = 0x0037;
pub const XK_8: Keysym = 0x0038;
pub const XK_9: Keysym = 0x0039;
pub const XK_BRACKETLEFT: Keysym = 0x005b;
pub const XK_BRACKETRIGHT: Keysym = 0x005d;
pub const XK_GRAVE: Keysym = 0x0060;
pub const XK_F: Keysym = 0x0066;
pub const XK_H: Keysym = 0x0068;
pub const XK_J: Keysym = 0x006a;
pub const XK_K: Keysym = 0x006b;
pub const XK_L: Keysym = 0x006c;
pub const XK_M: Keysym = 0x006d;
pub const XK_Q: Keysym = 0x0071;
pub const XK_T: Keysym = 0x0074;
pub const XK_W: Keysym = 0x0077;
pub const XK_RETURN: Keysym = 0xff0d;

/// Lock and NumLock never take part in binding lookups.
pub fn clean_mask(state: u16) -> u16 {
    state & !(MOD_NUMLOCK | MOD_LOCK)
}

/// Variants of a grab so bindings still fire with Lock or NumLock on.
pub fn lock_variants(mask: u16) -> [u16; 4] {
    [
        mask,
        mask | MOD_NUMLOCK,
        mask | MOD_LOCK,
        mask | MOD_NUMLOCK | MOD_LOCK,
    ]
}

/// Keycode to keysym translation, taken once from the server at startup.
#[derive(Debug, Clone, Default)]
pub struct Keymap {
    min_keycode: Keycode,
    per_keycode: usize,
    keysyms: Vec<Keysym>,
}

impl Keymap {
    pub fn new(min_keycode: Keycode, per_keycode: usize, keysyms: Vec<Keysym>) -> Self {
        Self {
            min_keycode,
            per_keycode,
            keysyms,
        }
    }

    pub fn from_reply(min_keycode: Keycode, reply: GetKeyboardMappingReply) -> Self {
        Self::new(
            min_keycode,
            usize::from(reply.keysyms_per_keycode),
            reply.keysyms,
        )
    }

    /// The unshifted keysym for `code`, or 0 when the code is unmapped.
    pub fn keysym(&self, code: Keycode) -> Keysym {
        if self.per_keycode == 0 || code < self.min_keycode {
            return 0;
        }
        let start = usize::from(code - self.min_keycode) * self.per_keycode;
        self.keysyms.get(start).copied().unwrap_or(0)
    }

    /// Every keycode that produces `sym` in any column.
    pub fn keycodes(&self, sym: Keysym) -> Vec<Keycode> {
        if sym == 0 || self.per_keycode == 0 {
            return Vec::new();
        }
        self.keysyms
            .chunks(self.per_keycode)
            .enumerate()
            .filter(|(_, syms)| syms.contains(&sym))
            .filter_map(|(i, _)| {
                u8::try_from(i)
                    .ok()
                    .and_then(|i| self.min_keycode.checked_add(i))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keymap() -> Keymap {
        // keycode 8: q Q, 9: Return, 10: 1 exclam
        Keymap::new(8, 2, vec![XK_Q, 0x0051, XK_RETURN, 0, XK_1, 0x0021])
    }

    #[test]
    fn keysym_uses_first_column() {
        let km = keymap();
        assert_eq!(km.keysym(8), XK_Q);
        assert_eq!(km.keysym(9), XK_RETURN);
        assert_eq!(km.keysym(10), XK_1);
    }

    #[test]
    fn unknown_keycodes_map_to_nothing() {
        let km = keymap();
        assert_eq!(km.keysym(7), 0);
        assert_eq!(km.keysym(11), 0);
        assert_eq!(Keymap::default().keysym(8), 0);
    }

    #[test]
    fn keycodes_search_every_column() {
        let km = keymap();
        assert_eq!(km.keycodes(XK_RETURN), vec![9]);
        assert_eq!(km.keycodes(0x0021), vec![10]);
        assert!(km.keycodes(XK_W).is_empty());
        assert!(km.keycodes(0).is_empty());
    }

    #[test]
    fn lock_bits_are_ignored() {
        let noisy = MOD_SUPER | MOD_SHIFT | MOD_NUMLOCK | MOD_LOCK;
        assert_eq!(clean_mask(noisy), MOD_SUPER | MOD_SHIFT);
        assert!(
            lock_variants(MOD_SUPER)
                .iter()
                .all(|&m| clean_mask(m) == MOD_SUPER)
        );
    }
}
