//! The seam between the backend and the operating system.
//!
//! Every Win32, GDI and WGL call made by the windowing backend goes through [`NativeApi`]. The
//! real implementation lives in `os::windows` and is only compiled on Windows; the state machines
//! in `os::window`, `os::context` and `os::pixel_format` only ever see this trait.

use crate::error::NativeError;
use crate::os::display::{DisplayDevice, DisplayMode, DisplayModeChange};
use bitflags::bitflags;
use cgmath::Vector2;

/// Native window handle (`HWND`).
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
#[repr(transparent)]
pub struct Hwnd(pub isize);

/// Device context handle (`HDC`).
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
#[repr(transparent)]
pub struct Hdc(pub isize);

/// OpenGL rendering context handle (`HGLRC`).
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
#[repr(transparent)]
pub struct Hglrc(pub isize);

/// A window procedure that was installed on a window before it was subclassed.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
#[repr(transparent)]
pub struct WindowProcedure(pub isize);

/// Client or window rectangle in screen or client coordinates.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

bitflags! {
    /// Window styles, using the native `WS_*` bit values.
    #[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq)]
    pub struct WindowStyle: u32 {
        const POPUP = 0x8000_0000;
        const DISABLED = 0x0800_0000;
        const CLIP_SIBLINGS = 0x0400_0000;
        const CLIP_CHILDREN = 0x0200_0000;
        const CAPTION = 0x00C0_0000;
        const SYSMENU = 0x0008_0000;
        const SIZEBOX = 0x0004_0000;
        const MINIMIZEBOX = 0x0002_0000;
        const MAXIMIZEBOX = 0x0001_0000;
    }
}

bitflags! {
    /// Extended window styles, using the native `WS_EX_*` bit values.
    #[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq)]
    pub struct WindowExStyle: u32 {
        const APP_WINDOW = 0x0004_0000;
        const CLIENT_EDGE = 0x0000_0200;
        const WINDOW_EDGE = 0x0000_0100;
        const ACCEPT_FILES = 0x0000_0010;
        const OVERLAPPED_WINDOW = Self::WINDOW_EDGE.bits() | Self::CLIENT_EDGE.bits();
        // WS_EX_LTRREADING is the zero default
    }
}

/// The two window classes registered for graphics windows.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub enum WindowClass {
    WithCursor,
    WithoutCursor,
}

/// Everything needed for one `CreateWindowEx` call.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NativeWindowDesc {
    pub class: WindowClass,
    pub title: String,
    pub style: WindowStyle,
    pub ex_style: WindowExStyle,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Where `SetWindowPos` puts the window in the z-order.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ZOrder {
    Top,
    Unchanged,
}

/// Subset of the `SetWindowPos` flags the backend uses.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct WindowPosFlags {
    pub show_window: bool,
    pub frame_changed: bool,
}

/// Request for the legacy `ChoosePixelFormat` path (a `PIXELFORMATDESCRIPTOR`).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct LegacyPixelFormat {
    pub double_buffer: bool,
    pub color_bits: u8,
    pub red_bits: u8,
    pub green_bits: u8,
    pub blue_bits: u8,
    pub alpha_bits: u8,
    pub depth_bits: u8,
    pub stencil_bits: u8,
}

/// What `DescribePixelFormat` says about a chosen format.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct PixelFormatInfo {
    pub generic_format: bool,
    pub generic_accelerated: bool,
}

impl PixelFormatInfo {
    /// A generic format without generic acceleration is Microsoft's software renderer.
    pub fn is_software(&self) -> bool {
        self.generic_format && !self.generic_accelerated
    }
}

/// Raw `ChangeDisplaySettingsEx` result (`DISP_CHANGE_*`).
pub type DisplayChangeCode = i32;

/// Operating system services used by the windowing backend.
///
/// All methods are called from the single controller thread, except
/// [`make_current`](NativeApi::make_current) and friends which rendering threads may call for their
/// own contexts.
pub trait NativeApi {
    // window classes and windows

    fn register_window_class(&self, class: WindowClass) -> Result<(), NativeError>;
    fn unregister_window_class(&self, class: WindowClass);
    fn create_window(&self, desc: &NativeWindowDesc) -> Result<Hwnd, NativeError>;
    fn destroy_window(&self, hwnd: Hwnd) -> Result<(), NativeError>;
    fn adjust_window_rect(
        &self,
        rect: Rect,
        style: WindowStyle,
        ex_style: WindowExStyle,
    ) -> Result<Rect, NativeError>;
    #[allow(clippy::too_many_arguments)]
    fn set_window_pos(
        &self,
        hwnd: Hwnd,
        z_order: ZOrder,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        flags: WindowPosFlags,
    ) -> Result<(), NativeError>;
    fn set_window_style(
        &self,
        hwnd: Hwnd,
        style: WindowStyle,
        ex_style: WindowExStyle,
    ) -> Result<(), NativeError>;
    fn update_window(&self, hwnd: Hwnd) -> Result<(), NativeError>;
    /// Repaints the whole desktop (used after decorations are removed).
    fn invalidate_desktop(&self);
    fn client_to_screen(&self, hwnd: Hwnd, point: Vector2<i32>) -> Vector2<i32>;
    fn client_rect(&self, hwnd: Hwnd) -> Result<Rect, NativeError>;
    fn window_rect(&self, hwnd: Hwnd) -> Result<Rect, NativeError>;
    fn set_foreground_window(&self, hwnd: Hwnd) -> bool;

    // cursor and mouse

    fn cursor_pos(&self) -> Result<Vector2<i32>, NativeError>;
    fn set_cursor_pos(&self, x: i32, y: i32) -> Result<(), NativeError>;
    fn hide_cursor(&self);
    fn set_capture(&self, hwnd: Hwnd);
    fn release_capture(&self);

    // message handling

    /// Installs the backend's window procedure on a foreign window and returns the previous one.
    fn subclass_window(&self, hwnd: Hwnd) -> Result<Option<WindowProcedure>, NativeError>;
    fn restore_window_procedure(
        &self,
        hwnd: Hwnd,
        procedure: WindowProcedure,
    ) -> Result<(), NativeError>;
    fn default_window_proc(&self, hwnd: Hwnd, message: u32, wparam: usize, lparam: isize) -> isize;
    fn call_window_proc(
        &self,
        procedure: WindowProcedure,
        hwnd: Hwnd,
        message: u32,
        wparam: usize,
        lparam: isize,
    ) -> isize;
    /// Peeks, translates and dispatches every message queued for `hwnd`.
    fn pump_messages(&self, hwnd: Hwnd);
    /// Validates the update region (BeginPaint/EndPaint pair).
    fn validate_paint(&self, hwnd: Hwnd);
    fn post_quit_message(&self, exit_code: i32);

    // keyboard

    /// `MapVirtualKeyEx(scan_code, MAPVK_VSC_TO_VK_EX)` with the current keyboard layout.
    fn scan_code_to_virtual_key(&self, scan_code: u32) -> u32;
    fn keyboard_state(&self) -> Option<[u8; 256]>;
    fn to_ascii(&self, virtual_key: u32, scan_code: u32, keyboard_state: &[u8; 256]) -> Option<u8>;

    // device contexts, pixel formats and GL contexts

    fn get_dc(&self, hwnd: Hwnd) -> Result<Hdc, NativeError>;
    fn release_dc(&self, hwnd: Hwnd, hdc: Hdc) -> Result<(), NativeError>;
    /// Whether `wglChoosePixelFormatARB` can be resolved with the current context.
    fn has_choose_pixel_format_arb(&self) -> bool;
    /// Asks `wglChoosePixelFormatARB` for the single best match. `Ok(None)` means no match.
    fn choose_pixel_format_arb(&self, hdc: Hdc, attributes: &[i32]) -> Result<Option<i32>, NativeError>;
    fn choose_pixel_format(&self, hdc: Hdc, request: &LegacyPixelFormat) -> Result<i32, NativeError>;
    fn describe_pixel_format(&self, hdc: Hdc, index: i32) -> Result<PixelFormatInfo, NativeError>;
    /// The pixel format currently applied to `hdc`, if any.
    fn pixel_format(&self, hdc: Hdc) -> Option<i32>;
    fn set_pixel_format(
        &self,
        hdc: Hdc,
        index: i32,
        request: Option<&LegacyPixelFormat>,
    ) -> Result<(), NativeError>;
    fn create_context(&self, hdc: Hdc) -> Result<Hglrc, NativeError>;
    fn delete_context(&self, hglrc: Hglrc) -> Result<(), NativeError>;
    /// `wglMakeCurrent`; a `None` context releases the calling thread's binding.
    fn make_current(&self, hdc: Option<Hdc>, hglrc: Option<Hglrc>) -> Result<(), NativeError>;
    fn current_context(&self) -> Option<Hglrc>;
    fn share_lists(&self, source: Hglrc, destination: Hglrc) -> Result<(), NativeError>;
    fn swap_buffers(&self, hdc: Hdc) -> Result<(), NativeError>;

    // displays

    /// `GetSystemMetrics(SM_CMONITORS)`.
    fn monitor_count(&self) -> u32;
    /// The `index`-th display device, or `None` past the end of the enumeration.
    fn enum_display_device(&self, index: u32) -> Option<DisplayDevice>;
    fn current_display_mode(&self, device_name: &str) -> Result<DisplayMode, NativeError>;
    fn change_display_settings(
        &self,
        device_name: &str,
        change: &DisplayModeChange,
        test_only: bool,
    ) -> DisplayChangeCode;

    /// Last native error of the calling thread.
    fn last_error(&self) -> NativeError;
}
