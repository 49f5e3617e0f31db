//! Keyboard mapping from Win32 virtual keys to engine key symbols.

use crate::os::native::NativeApi;
use bitflags::bitflags;

/// Engine-neutral key symbol. Printable keys use their character code, named keys use X11-style
/// keysym values (high byte set).
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[repr(transparent)]
pub struct KeySymbol(pub u32);

#[allow(missing_docs)]
impl KeySymbol {
    pub const NONE: Self = Self(0);
    pub const SPACE: Self = Self(0x20);

    pub const BACKSPACE: Self = Self(0xFF08);
    pub const TAB: Self = Self(0xFF09);
    pub const CLEAR: Self = Self(0xFF0B);
    pub const RETURN: Self = Self(0xFF0D);
    pub const PAUSE: Self = Self(0xFF13);
    pub const SCROLL_LOCK: Self = Self(0xFF14);
    pub const ESCAPE: Self = Self(0xFF1B);
    pub const DELETE: Self = Self(0xFFFF);

    pub const HOME: Self = Self(0xFF50);
    pub const LEFT: Self = Self(0xFF51);
    pub const UP: Self = Self(0xFF52);
    pub const RIGHT: Self = Self(0xFF53);
    pub const DOWN: Self = Self(0xFF54);
    pub const PAGE_UP: Self = Self(0xFF55);
    pub const PAGE_DOWN: Self = Self(0xFF56);
    pub const END: Self = Self(0xFF57);

    pub const PRINT: Self = Self(0xFF61);
    pub const INSERT: Self = Self(0xFF63);
    pub const MENU: Self = Self(0xFF67);
    pub const NUM_LOCK: Self = Self(0xFF7F);

    pub const KP_ENTER: Self = Self(0xFF8D);
    pub const KP_HOME: Self = Self(0xFF95);
    pub const KP_LEFT: Self = Self(0xFF96);
    pub const KP_UP: Self = Self(0xFF97);
    pub const KP_RIGHT: Self = Self(0xFF98);
    pub const KP_DOWN: Self = Self(0xFF99);
    pub const KP_PAGE_UP: Self = Self(0xFF9A);
    pub const KP_PAGE_DOWN: Self = Self(0xFF9B);
    pub const KP_END: Self = Self(0xFF9C);
    pub const KP_BEGIN: Self = Self(0xFF9D);
    pub const KP_INSERT: Self = Self(0xFF9E);
    pub const KP_DELETE: Self = Self(0xFF9F);
    pub const KP_MULTIPLY: Self = Self(0xFFAA);
    pub const KP_ADD: Self = Self(0xFFAB);
    pub const KP_SUBTRACT: Self = Self(0xFFAD);
    pub const KP_DIVIDE: Self = Self(0xFFAF);

    pub const F1: Self = Self(0xFFBE);
    pub const F2: Self = Self(0xFFBF);
    pub const F3: Self = Self(0xFFC0);
    pub const F4: Self = Self(0xFFC1);
    pub const F5: Self = Self(0xFFC2);
    pub const F6: Self = Self(0xFFC3);
    pub const F7: Self = Self(0xFFC4);
    pub const F8: Self = Self(0xFFC5);
    pub const F9: Self = Self(0xFFC6);
    pub const F10: Self = Self(0xFFC7);
    pub const F11: Self = Self(0xFFC8);
    pub const F12: Self = Self(0xFFC9);

    pub const SHIFT_L: Self = Self(0xFFE1);
    pub const SHIFT_R: Self = Self(0xFFE2);
    pub const CONTROL_L: Self = Self(0xFFE3);
    pub const CONTROL_R: Self = Self(0xFFE4);
    pub const CAPS_LOCK: Self = Self(0xFFE5);
    pub const ALT_L: Self = Self(0xFFE9);
    pub const ALT_R: Self = Self(0xFFEA);
    pub const SUPER_L: Self = Self(0xFFEB);
    pub const SUPER_R: Self = Self(0xFFEC);

    /// Named (non-printable) keys have bits set in the second byte.
    pub fn is_named(self) -> bool {
        self.0 & 0xFF00 != 0
    }
}

bitflags! {
    /// Modifier keys held or toggled while a key event was generated.
    #[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq)]
    pub struct ModKeyMask: u32 {
        const LEFT_SHIFT = 0x0001;
        const RIGHT_SHIFT = 0x0002;
        const LEFT_CTRL = 0x0004;
        const RIGHT_CTRL = 0x0008;
        const LEFT_ALT = 0x0010;
        const RIGHT_ALT = 0x0020;
        const LEFT_META = 0x0040;
        const RIGHT_META = 0x0080;
        const NUM_LOCK = 0x1000;
        const CAPS_LOCK = 0x2000;
    }
}

/// Win32 virtual-key codes used by the key map.
#[allow(missing_docs)]
pub mod vk {
    pub const BACK: u32 = 0x08;
    pub const TAB: u32 = 0x09;
    pub const CLEAR: u32 = 0x0C;
    pub const RETURN: u32 = 0x0D;
    pub const SHIFT: u32 = 0x10;
    pub const CONTROL: u32 = 0x11;
    pub const MENU: u32 = 0x12;
    pub const PAUSE: u32 = 0x13;
    pub const CAPITAL: u32 = 0x14;
    pub const ESCAPE: u32 = 0x1B;
    pub const SPACE: u32 = 0x20;
    pub const PRIOR: u32 = 0x21;
    pub const NEXT: u32 = 0x22;
    pub const END: u32 = 0x23;
    pub const HOME: u32 = 0x24;
    pub const LEFT: u32 = 0x25;
    pub const UP: u32 = 0x26;
    pub const RIGHT: u32 = 0x27;
    pub const DOWN: u32 = 0x28;
    pub const SNAPSHOT: u32 = 0x2C;
    pub const INSERT: u32 = 0x2D;
    pub const DELETE: u32 = 0x2E;
    pub const LWIN: u32 = 0x5B;
    pub const RWIN: u32 = 0x5C;
    pub const APPS: u32 = 0x5D;
    pub const NUMPAD0: u32 = 0x60;
    pub const NUMPAD1: u32 = 0x61;
    pub const NUMPAD2: u32 = 0x62;
    pub const NUMPAD3: u32 = 0x63;
    pub const NUMPAD4: u32 = 0x64;
    pub const NUMPAD5: u32 = 0x65;
    pub const NUMPAD6: u32 = 0x66;
    pub const NUMPAD7: u32 = 0x67;
    pub const NUMPAD8: u32 = 0x68;
    pub const NUMPAD9: u32 = 0x69;
    pub const MULTIPLY: u32 = 0x6A;
    pub const ADD: u32 = 0x6B;
    pub const SUBTRACT: u32 = 0x6D;
    pub const DECIMAL: u32 = 0x6E;
    pub const DIVIDE: u32 = 0x6F;
    pub const F1: u32 = 0x70;
    pub const NUMLOCK: u32 = 0x90;
    pub const SCROLL: u32 = 0x91;
    pub const LSHIFT: u32 = 0xA0;
    pub const RSHIFT: u32 = 0xA1;
    pub const LCONTROL: u32 = 0xA2;
    pub const RCONTROL: u32 = 0xA3;
    pub const LMENU: u32 = 0xA4;
    pub const RMENU: u32 = 0xA5;
    pub const OEM_1: u32 = 0xBA;
    pub const OEM_PLUS: u32 = 0xBB;
    pub const OEM_COMMA: u32 = 0xBC;
    pub const OEM_MINUS: u32 = 0xBD;
    pub const OEM_PERIOD: u32 = 0xBE;
    pub const OEM_2: u32 = 0xBF;
    pub const OEM_3: u32 = 0xC0;
    pub const OEM_4: u32 = 0xDB;
    pub const OEM_5: u32 = 0xDC;
    pub const OEM_6: u32 = 0xDD;
    pub const OEM_7: u32 = 0xDE;
}

/// Maps a virtual key to its key symbol. Keys absent from the table map to themselves.
pub fn remap_key(virtual_key: u32) -> KeySymbol {
    match virtual_key {
        vk::ESCAPE => KeySymbol::ESCAPE,
        f if (vk::F1..vk::F1 + 12).contains(&f) => KeySymbol(KeySymbol::F1.0 + (f - vk::F1)),
        vk::OEM_3 => KeySymbol('`' as u32),
        vk::OEM_MINUS => KeySymbol('-' as u32),
        vk::OEM_PLUS => KeySymbol('=' as u32),
        vk::BACK => KeySymbol::BACKSPACE,
        vk::TAB => KeySymbol::TAB,
        vk::OEM_4 => KeySymbol('[' as u32),
        vk::OEM_6 => KeySymbol(']' as u32),
        vk::OEM_5 => KeySymbol('\\' as u32),
        vk::CAPITAL => KeySymbol::CAPS_LOCK,
        vk::OEM_1 => KeySymbol(';' as u32),
        vk::OEM_7 => KeySymbol('\'' as u32),
        vk::RETURN => KeySymbol::RETURN,
        vk::LSHIFT => KeySymbol::SHIFT_L,
        vk::OEM_COMMA => KeySymbol(',' as u32),
        vk::OEM_PERIOD => KeySymbol('.' as u32),
        vk::OEM_2 => KeySymbol('/' as u32),
        vk::RSHIFT => KeySymbol::SHIFT_R,
        vk::LCONTROL => KeySymbol::CONTROL_L,
        vk::LWIN => KeySymbol::SUPER_L,
        vk::SPACE => KeySymbol::SPACE,
        vk::LMENU => KeySymbol::ALT_L,
        vk::RMENU => KeySymbol::ALT_R,
        vk::RWIN => KeySymbol::SUPER_R,
        vk::APPS => KeySymbol::MENU,
        vk::RCONTROL => KeySymbol::CONTROL_R,
        vk::SNAPSHOT => KeySymbol::PRINT,
        vk::SCROLL => KeySymbol::SCROLL_LOCK,
        vk::PAUSE => KeySymbol::PAUSE,
        vk::HOME => KeySymbol::HOME,
        vk::PRIOR => KeySymbol::PAGE_UP,
        vk::END => KeySymbol::END,
        vk::NEXT => KeySymbol::PAGE_DOWN,
        vk::DELETE => KeySymbol::DELETE,
        vk::INSERT => KeySymbol::INSERT,
        vk::LEFT => KeySymbol::LEFT,
        vk::UP => KeySymbol::UP,
        vk::RIGHT => KeySymbol::RIGHT,
        vk::DOWN => KeySymbol::DOWN,
        vk::NUMLOCK => KeySymbol::NUM_LOCK,
        vk::DIVIDE => KeySymbol::KP_DIVIDE,
        vk::MULTIPLY => KeySymbol::KP_MULTIPLY,
        vk::SUBTRACT => KeySymbol::KP_SUBTRACT,
        vk::ADD => KeySymbol::KP_ADD,
        vk::NUMPAD7 => KeySymbol::KP_HOME,
        vk::NUMPAD8 => KeySymbol::KP_UP,
        vk::NUMPAD9 => KeySymbol::KP_PAGE_UP,
        vk::NUMPAD4 => KeySymbol::KP_LEFT,
        vk::NUMPAD5 => KeySymbol::KP_BEGIN,
        vk::NUMPAD6 => KeySymbol::KP_RIGHT,
        vk::NUMPAD1 => KeySymbol::KP_END,
        vk::NUMPAD2 => KeySymbol::KP_DOWN,
        vk::NUMPAD3 => KeySymbol::KP_PAGE_DOWN,
        vk::NUMPAD0 => KeySymbol::KP_INSERT,
        vk::DECIMAL => KeySymbol::KP_DELETE,
        vk::CLEAR => KeySymbol::CLEAR,
        // digits, letters and everything unknown
        other => KeySymbol(other),
    }
}

const EXTENDED_KEY_BIT: isize = 0x0100_0000;

/// Turns the parameters of a key message into a key symbol and the modifier mask for that event.
///
/// `wparam` carries the virtual key, `lparam` the scan code (bits 16..24) and the extended-key
/// flag (bit 24), which distinguishes the right-hand control, alt and enter keys.
pub fn adapt_key(native: &dyn NativeApi, wparam: usize, lparam: isize) -> (KeySymbol, ModKeyMask) {
    let mut modifiers = ModKeyMask::empty();

    let right_side = lparam & EXTENDED_KEY_BIT != 0;
    let scan_code = ((lparam >> 16) & 0xFF) as u32;
    let mut virtual_key = native.scan_code_to_virtual_key(scan_code);

    let Some(keyboard_state) = native.keyboard_state().filter(|_| virtual_key != 0) else {
        return (KeySymbol::NONE, modifiers);
    };

    match virtual_key {
        vk::LSHIFT => modifiers |= ModKeyMask::LEFT_SHIFT,
        vk::RSHIFT => modifiers |= ModKeyMask::RIGHT_SHIFT,
        vk::CONTROL | vk::LCONTROL => {
            virtual_key = if right_side { vk::RCONTROL } else { vk::LCONTROL };
            modifiers |= if right_side {
                ModKeyMask::RIGHT_CTRL
            } else {
                ModKeyMask::LEFT_CTRL
            };
        }
        vk::MENU | vk::LMENU => {
            virtual_key = if right_side { vk::RMENU } else { vk::LMENU };
            modifiers |= if right_side {
                ModKeyMask::RIGHT_ALT
            } else {
                ModKeyMask::LEFT_ALT
            };
        }
        _ => virtual_key = wparam as u32,
    }

    if keyboard_state[vk::CAPITAL as usize] & 0x01 != 0 {
        modifiers |= ModKeyMask::CAPS_LOCK;
    }
    if keyboard_state[vk::NUMLOCK as usize] & 0x01 != 0 {
        modifiers |= ModKeyMask::NUM_LOCK;
    }

    let mut symbol = remap_key(virtual_key);

    if symbol == KeySymbol::RETURN && right_side {
        symbol = KeySymbol::KP_ENTER;
    } else if !symbol.is_named() {
        if let Some(ascii) = native.to_ascii(wparam as u32, scan_code, &keyboard_state) {
            symbol = KeySymbol(ascii as u32);
        }
    }

    (symbol, modifiers)
}
