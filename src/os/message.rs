//! Window message identifiers handled by graphics windows.

pub const WM_DESTROY: u32 = 0x0002;
pub const WM_MOVE: u32 = 0x0003;
pub const WM_SIZE: u32 = 0x0005;
pub const WM_PAINT: u32 = 0x000F;
pub const WM_CLOSE: u32 = 0x0010;
pub const WM_QUIT: u32 = 0x0012;
pub const WM_SETCURSOR: u32 = 0x0020;
pub const WM_KEYDOWN: u32 = 0x0100;
pub const WM_KEYUP: u32 = 0x0101;
pub const WM_SYSKEYDOWN: u32 = 0x0104;
pub const WM_SYSKEYUP: u32 = 0x0105;
pub const WM_MOUSEMOVE: u32 = 0x0200;
pub const WM_LBUTTONDOWN: u32 = 0x0201;
pub const WM_LBUTTONUP: u32 = 0x0202;
pub const WM_LBUTTONDBLCLK: u32 = 0x0203;
pub const WM_RBUTTONDOWN: u32 = 0x0204;
pub const WM_RBUTTONUP: u32 = 0x0205;
pub const WM_RBUTTONDBLCLK: u32 = 0x0206;
pub const WM_MBUTTONDOWN: u32 = 0x0207;
pub const WM_MBUTTONUP: u32 = 0x0208;
pub const WM_MBUTTONDBLCLK: u32 = 0x0209;
pub const WM_MOUSEWHEEL: u32 = 0x020A;
pub const WM_MOUSEHWHEEL: u32 = 0x020E;

/// Signed x coordinate packed in the low word of a mouse message's `lparam`.
#[inline]
pub fn x_lparam(lparam: isize) -> i32 {
    (lparam & 0xFFFF) as u16 as i16 as i32
}

/// Signed y coordinate packed in the high word of a mouse message's `lparam`.
#[inline]
pub fn y_lparam(lparam: isize) -> i32 {
    ((lparam >> 16) & 0xFFFF) as u16 as i16 as i32
}

/// Wheel delta packed in the high word of a wheel message's `wparam`.
#[inline]
pub fn wheel_delta(wparam: usize) -> i16 {
    ((wparam >> 16) & 0xFFFF) as u16 as i16
}

/// Packs client coordinates the way mouse messages carry them.
#[inline]
pub fn make_lparam(x: i32, y: i32) -> isize {
    ((((y as u16) as u32) << 16) | (x as u16) as u32) as isize
}
