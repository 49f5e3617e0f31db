#![cfg(windows)]

use crate::error::NativeError;
use crate::os::display::{DisplayDevice, DisplayDeviceState, DisplayMode, DisplayModeChange};
use crate::os::native::{
    DisplayChangeCode, Hdc, Hglrc, Hwnd, LegacyPixelFormat, NativeApi, NativeWindowDesc,
    PixelFormatInfo, Rect, WindowClass, WindowExStyle, WindowPosFlags, WindowProcedure,
    WindowStyle, ZOrder,
};
use crate::os::registry::route_message;
use cgmath::Vector2;
use log::{debug, warn};
use widestring::{U16CStr, U16CString};
use windows::Win32::Foundation::{
    BOOL, GetLastError, HINSTANCE, HWND, LPARAM, LRESULT, POINT, RECT, SetLastError, WIN32_ERROR,
    WPARAM,
};
use windows::Win32::Graphics::Gdi::{
    BeginPaint, CDS_TEST, CDS_TYPE, ChangeDisplaySettingsExW, ClientToScreen, DEVMODEW,
    DISPLAY_DEVICEW, DM_DISPLAYFREQUENCY, DM_PELSHEIGHT, DM_PELSWIDTH, ENUM_CURRENT_SETTINGS,
    EndPaint, EnumDisplayDevicesW, EnumDisplaySettingsW, GetDC, HDC, InvalidateRect,
    PAINTSTRUCT, ReleaseDC, UpdateWindow,
};
use windows::Win32::Graphics::OpenGL::{
    ChoosePixelFormat, DescribePixelFormat, GetPixelFormat, HGLRC, PFD_DOUBLEBUFFER,
    PFD_DRAW_TO_WINDOW, PFD_GENERIC_ACCELERATED, PFD_GENERIC_FORMAT, PFD_SUPPORT_OPENGL,
    PFD_TYPE_RGBA, PIXELFORMATDESCRIPTOR, SetPixelFormat, SwapBuffers, wglCreateContext,
    wglDeleteContext, wglGetCurrentContext, wglGetProcAddress, wglMakeCurrent, wglShareLists,
};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::System::Threading::GetCurrentProcessId;
use windows::Win32::UI::HiDpi::{
    DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2, SetProcessDpiAwarenessContext,
};
use windows::Win32::UI::Input::KeyboardAndMouse::{
    GetKeyboardLayout, GetKeyboardState, MAPVK_VSC_TO_VK_EX, MapVirtualKeyExW, ReleaseCapture,
    SetCapture, ToAscii,
};
use windows::Win32::UI::WindowsAndMessaging::{
    AdjustWindowRectEx, CS_DBLCLKS, CS_HREDRAW, CS_OWNDC, CS_VREDRAW, CallWindowProcW,
    CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, GWL_EXSTYLE, GWL_STYLE,
    GWLP_WNDPROC, GetClientRect, GetCursorPos, GetSystemMetrics, GetWindowRect, HCURSOR, HMENU,
    HWND_TOP, IDC_ARROW, LoadCursorW, MSG, PM_REMOVE, PeekMessageW, PostQuitMessage,
    RegisterClassExW, SET_WINDOW_POS_FLAGS, SM_CMONITORS, SWP_FRAMECHANGED, SWP_NOZORDER,
    SWP_SHOWWINDOW, SetCursor, SetCursorPos, SetForegroundWindow, SetWindowLongPtrW,
    SetWindowPos, TranslateMessage, UnregisterClassW, WINDOW_EX_STYLE, WINDOW_LONG_PTR_INDEX,
    WINDOW_STYLE, WNDCLASSEXW, WNDPROC,
};
use windows::core::{PCWSTR, s};

const DISPLAY_DEVICE_ATTACHED_TO_DESKTOP: u32 = 0x0000_0001;
const DISPLAY_DEVICE_PRIMARY_DEVICE: u32 = 0x0000_0004;
const DISPLAY_DEVICE_MIRRORING_DRIVER: u32 = 0x0000_0008;

type ChoosePixelFormatArb = unsafe extern "system" fn(
    hdc: HDC,
    int_attributes: *const i32,
    float_attributes: *const f32,
    max_formats: u32,
    formats: *mut i32,
    format_count: *mut u32,
) -> BOOL;

fn hwnd(hwnd: Hwnd) -> HWND {
    HWND(hwnd.0 as _)
}

fn hdc(hdc: Hdc) -> HDC {
    HDC(hdc.0 as _)
}

fn hglrc(hglrc: Hglrc) -> HGLRC {
    HGLRC(hglrc.0 as _)
}

fn to_rect(rect: RECT) -> Rect {
    Rect {
        left: rect.left,
        top: rect.top,
        right: rect.right,
        bottom: rect.bottom,
    }
}

impl From<windows::core::Error> for NativeError {
    fn from(error: windows::core::Error) -> Self {
        let code = WIN32_ERROR::from_error(&error).map_or(error.code().0 as u32, |e| e.0);
        NativeError::new(code, error.message())
    }
}

fn last_native_error() -> NativeError {
    let code = unsafe { GetLastError() };
    if code.0 == 0 {
        return NativeError::new(0, "");
    }
    windows::core::Error::from(code.to_hresult()).into()
}

fn check(success: BOOL) -> Result<(), NativeError> {
    if success.as_bool() {
        Ok(())
    } else {
        Err(last_native_error())
    }
}

/// `SetWindowLongPtrW` returns the previous value, which may legitimately be 0; only a last error
/// set by this call marks a failure.
fn set_window_long(
    window: Hwnd,
    index: WINDOW_LONG_PTR_INDEX,
    value: isize,
) -> Result<isize, NativeError> {
    unsafe {
        SetLastError(WIN32_ERROR(0));
        let previous = SetWindowLongPtrW(hwnd(window), index, value);
        if previous == 0 && GetLastError().0 != 0 {
            return Err(last_native_error());
        }
        Ok(previous)
    }
}

fn from_wide(buffer: &[u16]) -> String {
    U16CStr::from_slice_truncate(buffer)
        .map(|s| s.to_string_lossy())
        .unwrap_or_default()
}

unsafe extern "system" fn window_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match route_message(Hwnd(hwnd.0 as isize), msg, wparam.0, lparam.0) {
        Some(result) => LRESULT(result),
        None => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
    }
}

/// [`NativeApi`] on top of Win32, GDI and WGL.
pub struct Win32Native {
    hinstance: HINSTANCE,
    class_with_cursor: U16CString,
    class_without_cursor: U16CString,
}

impl Win32Native {
    pub fn new() -> anyhow::Result<Self> {
        let hinstance = HINSTANCE(unsafe { GetModuleHandleW(PCWSTR::null()) }?.0);

        unsafe {
            _ = SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2);
        }

        // several copies of the library can live in one process, each with its own classes
        let pid = unsafe { GetCurrentProcessId() };
        Ok(Self {
            hinstance,
            class_with_cursor: U16CString::from_str(format!("glwin32_window_{pid}"))?,
            class_without_cursor: U16CString::from_str(format!("glwin32_window_nocursor_{pid}"))?,
        })
    }

    fn class_name(&self, class: WindowClass) -> PCWSTR {
        match class {
            WindowClass::WithCursor => PCWSTR(self.class_with_cursor.as_ptr()),
            WindowClass::WithoutCursor => PCWSTR(self.class_without_cursor.as_ptr()),
        }
    }

    fn choose_pixel_format_arb_proc(&self) -> Option<ChoosePixelFormatArb> {
        let proc = unsafe { wglGetProcAddress(s!("wglChoosePixelFormatARB")) }?;
        Some(unsafe { std::mem::transmute::<unsafe extern "system" fn() -> isize, ChoosePixelFormatArb>(proc) })
    }

    fn display_settings(&self, device_name: &str) -> Result<DEVMODEW, NativeError> {
        let name = U16CString::from_str(device_name)
            .map_err(|_| NativeError::new(0, "device name contains a nul character"))?;

        let mut mode = DEVMODEW {
            dmSize: size_of::<DEVMODEW>() as u16,
            ..Default::default()
        };
        check(unsafe {
            EnumDisplaySettingsW(PCWSTR(name.as_ptr()), ENUM_CURRENT_SETTINGS, &mut mode)
        })?;
        Ok(mode)
    }
}

impl NativeApi for Win32Native {
    fn register_window_class(&self, class: WindowClass) -> Result<(), NativeError> {
        let cursor = match class {
            WindowClass::WithCursor => unsafe { LoadCursorW(None, IDC_ARROW) }?,
            WindowClass::WithoutCursor => HCURSOR::default(),
        };

        let wc = WNDCLASSEXW {
            cbSize: size_of::<WNDCLASSEXW>() as u32,
            style: CS_HREDRAW | CS_VREDRAW | CS_OWNDC | CS_DBLCLKS,
            lpfnWndProc: Some(window_proc),
            hInstance: self.hinstance,
            hCursor: cursor,
            lpszClassName: self.class_name(class),
            ..Default::default()
        };

        if unsafe { RegisterClassExW(&wc) } == 0 {
            return Err(last_native_error());
        }
        debug!("Registered window class {class:?}");
        Ok(())
    }

    fn unregister_window_class(&self, class: WindowClass) {
        if let Err(e) = unsafe { UnregisterClassW(self.class_name(class), self.hinstance) } {
            warn!("Unable to unregister window class {class:?}: {e}");
        }
    }

    fn create_window(&self, desc: &NativeWindowDesc) -> Result<Hwnd, NativeError> {
        let title = U16CString::from_str(&desc.title)
            .map_err(|_| NativeError::new(0, "window title contains a nul character"))?;

        let handle = unsafe {
            CreateWindowExW(
                WINDOW_EX_STYLE(desc.ex_style.bits()),
                self.class_name(desc.class),
                PCWSTR(title.as_ptr()),
                WINDOW_STYLE(desc.style.bits()),
                desc.x,
                desc.y,
                desc.width,
                desc.height,
                HWND::default(),
                HMENU::default(),
                self.hinstance,
                None,
            )
        }?;
        Ok(Hwnd(handle.0 as isize))
    }

    fn destroy_window(&self, window: Hwnd) -> Result<(), NativeError> {
        unsafe { DestroyWindow(hwnd(window)) }?;
        Ok(())
    }

    fn adjust_window_rect(
        &self,
        rect: Rect,
        style: WindowStyle,
        ex_style: WindowExStyle,
    ) -> Result<Rect, NativeError> {
        let mut native = RECT {
            left: rect.left,
            top: rect.top,
            right: rect.right,
            bottom: rect.bottom,
        };
        unsafe {
            AdjustWindowRectEx(
                &mut native,
                WINDOW_STYLE(style.bits()),
                BOOL::from(false),
                WINDOW_EX_STYLE(ex_style.bits()),
            )
        }?;
        Ok(to_rect(native))
    }

    fn set_window_pos(
        &self,
        window: Hwnd,
        z_order: ZOrder,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        flags: WindowPosFlags,
    ) -> Result<(), NativeError> {
        let mut native_flags = SET_WINDOW_POS_FLAGS(0);
        if z_order == ZOrder::Unchanged {
            native_flags |= SWP_NOZORDER;
        }
        if flags.show_window {
            native_flags |= SWP_SHOWWINDOW;
        }
        if flags.frame_changed {
            native_flags |= SWP_FRAMECHANGED;
        }

        unsafe { SetWindowPos(hwnd(window), HWND_TOP, x, y, width, height, native_flags) }?;
        Ok(())
    }

    fn set_window_style(
        &self,
        window: Hwnd,
        style: WindowStyle,
        ex_style: WindowExStyle,
    ) -> Result<(), NativeError> {
        set_window_long(window, GWL_STYLE, style.bits() as isize)?;
        set_window_long(window, GWL_EXSTYLE, ex_style.bits() as isize)?;
        Ok(())
    }

    fn update_window(&self, window: Hwnd) -> Result<(), NativeError> {
        check(unsafe { UpdateWindow(hwnd(window)) })
    }

    fn invalidate_desktop(&self) {
        unsafe {
            _ = InvalidateRect(HWND::default(), None, BOOL::from(true));
        }
    }

    fn client_to_screen(&self, window: Hwnd, point: Vector2<i32>) -> Vector2<i32> {
        let mut native = POINT {
            x: point.x,
            y: point.y,
        };
        unsafe {
            _ = ClientToScreen(hwnd(window), &mut native);
        }
        Vector2::new(native.x, native.y)
    }

    fn client_rect(&self, window: Hwnd) -> Result<Rect, NativeError> {
        let mut rect = RECT::default();
        unsafe { GetClientRect(hwnd(window), &mut rect) }?;
        Ok(to_rect(rect))
    }

    fn window_rect(&self, window: Hwnd) -> Result<Rect, NativeError> {
        let mut rect = RECT::default();
        unsafe { GetWindowRect(hwnd(window), &mut rect) }?;
        Ok(to_rect(rect))
    }

    fn set_foreground_window(&self, window: Hwnd) -> bool {
        unsafe { SetForegroundWindow(hwnd(window)) }.as_bool()
    }

    fn cursor_pos(&self) -> Result<Vector2<i32>, NativeError> {
        let mut point = POINT::default();
        unsafe { GetCursorPos(&mut point) }?;
        Ok(Vector2::new(point.x, point.y))
    }

    fn set_cursor_pos(&self, x: i32, y: i32) -> Result<(), NativeError> {
        unsafe { SetCursorPos(x, y) }?;
        Ok(())
    }

    fn hide_cursor(&self) {
        unsafe {
            _ = SetCursor(HCURSOR::default());
        }
    }

    fn set_capture(&self, window: Hwnd) {
        unsafe {
            _ = SetCapture(hwnd(window));
        }
    }

    fn release_capture(&self) {
        unsafe {
            _ = ReleaseCapture();
        }
    }

    fn subclass_window(&self, window: Hwnd) -> Result<Option<WindowProcedure>, NativeError> {
        let procedure = window_proc as usize as isize;
        let previous = set_window_long(window, GWLP_WNDPROC, procedure)?;
        Ok((previous != 0).then_some(WindowProcedure(previous)))
    }

    fn restore_window_procedure(
        &self,
        window: Hwnd,
        procedure: WindowProcedure,
    ) -> Result<(), NativeError> {
        set_window_long(window, GWLP_WNDPROC, procedure.0)?;
        Ok(())
    }

    fn default_window_proc(&self, window: Hwnd, message: u32, wparam: usize, lparam: isize) -> isize {
        unsafe { DefWindowProcW(hwnd(window), message, WPARAM(wparam), LPARAM(lparam)) }.0
    }

    fn call_window_proc(
        &self,
        procedure: WindowProcedure,
        window: Hwnd,
        message: u32,
        wparam: usize,
        lparam: isize,
    ) -> isize {
        let procedure = unsafe { std::mem::transmute::<isize, WNDPROC>(procedure.0) };
        unsafe {
            CallWindowProcW(
                procedure,
                hwnd(window),
                message,
                WPARAM(wparam),
                LPARAM(lparam),
            )
        }
        .0
    }

    fn pump_messages(&self, window: Hwnd) {
        let mut msg = MSG::default();
        unsafe {
            while PeekMessageW(&mut msg, hwnd(window), 0, 0, PM_REMOVE).as_bool() {
                _ = TranslateMessage(&msg);
                _ = DispatchMessageW(&msg);
            }
        }
    }

    fn validate_paint(&self, window: Hwnd) {
        let mut paint = PAINTSTRUCT::default();
        unsafe {
            _ = BeginPaint(hwnd(window), &mut paint);
            _ = EndPaint(hwnd(window), &paint);
        }
    }

    fn post_quit_message(&self, exit_code: i32) {
        unsafe { PostQuitMessage(exit_code) }
    }

    fn scan_code_to_virtual_key(&self, scan_code: u32) -> u32 {
        unsafe { MapVirtualKeyExW(scan_code, MAPVK_VSC_TO_VK_EX, GetKeyboardLayout(0)) }
    }

    fn keyboard_state(&self) -> Option<[u8; 256]> {
        let mut state = [0u8; 256];
        unsafe { GetKeyboardState(&mut state) }.ok()?;
        Some(state)
    }

    fn to_ascii(&self, virtual_key: u32, scan_code: u32, keyboard_state: &[u8; 256]) -> Option<u8> {
        let mut chars = [0u16; 2];
        let count = unsafe {
            ToAscii(
                virtual_key,
                scan_code,
                Some(keyboard_state),
                chars.as_mut_ptr(),
                0,
            )
        };
        (count == 1).then_some(chars[0] as u8)
    }

    fn get_dc(&self, window: Hwnd) -> Result<Hdc, NativeError> {
        let dc = unsafe { GetDC(hwnd(window)) };
        if dc.is_invalid() {
            return Err(last_native_error());
        }
        Ok(Hdc(dc.0 as isize))
    }

    fn release_dc(&self, window: Hwnd, dc: Hdc) -> Result<(), NativeError> {
        if unsafe { ReleaseDC(hwnd(window), hdc(dc)) } == 0 {
            return Err(last_native_error());
        }
        Ok(())
    }

    fn has_choose_pixel_format_arb(&self) -> bool {
        self.choose_pixel_format_arb_proc().is_some()
    }

    fn choose_pixel_format_arb(
        &self,
        dc: Hdc,
        attributes: &[i32],
    ) -> Result<Option<i32>, NativeError> {
        let Some(choose) = self.choose_pixel_format_arb_proc() else {
            return Err(NativeError::new(0, "wglChoosePixelFormatARB is not available"));
        };

        let float_attributes = [0.0f32, 0.0];
        let mut format = 0i32;
        let mut count = 0u32;
        let success = unsafe {
            choose(
                hdc(dc),
                attributes.as_ptr(),
                float_attributes.as_ptr(),
                1,
                &mut format,
                &mut count,
            )
        };

        if !success.as_bool() {
            return Err(last_native_error());
        }
        Ok((count > 0).then_some(format))
    }

    fn choose_pixel_format(&self, dc: Hdc, request: &LegacyPixelFormat) -> Result<i32, NativeError> {
        let descriptor = pixel_format_descriptor(request);
        let index = unsafe { ChoosePixelFormat(hdc(dc), &descriptor) };
        if index == 0 {
            return Err(last_native_error());
        }
        Ok(index)
    }

    fn describe_pixel_format(&self, dc: Hdc, index: i32) -> Result<PixelFormatInfo, NativeError> {
        let mut descriptor = PIXELFORMATDESCRIPTOR::default();
        let result = unsafe {
            DescribePixelFormat(
                hdc(dc),
                index,
                size_of::<PIXELFORMATDESCRIPTOR>() as u32,
                Some(&mut descriptor),
            )
        };
        if result == 0 {
            return Err(last_native_error());
        }

        Ok(PixelFormatInfo {
            generic_format: descriptor.dwFlags.contains(PFD_GENERIC_FORMAT),
            generic_accelerated: descriptor.dwFlags.contains(PFD_GENERIC_ACCELERATED),
        })
    }

    fn pixel_format(&self, dc: Hdc) -> Option<i32> {
        let index = unsafe { GetPixelFormat(hdc(dc)) };
        (index > 0).then_some(index)
    }

    fn set_pixel_format(
        &self,
        dc: Hdc,
        index: i32,
        request: Option<&LegacyPixelFormat>,
    ) -> Result<(), NativeError> {
        let descriptor = request.map_or_else(PIXELFORMATDESCRIPTOR::default, pixel_format_descriptor);
        unsafe { SetPixelFormat(hdc(dc), index, &descriptor) }?;
        Ok(())
    }

    fn create_context(&self, dc: Hdc) -> Result<Hglrc, NativeError> {
        let context = unsafe { wglCreateContext(hdc(dc)) }?;
        Ok(Hglrc(context.0 as isize))
    }

    fn delete_context(&self, context: Hglrc) -> Result<(), NativeError> {
        unsafe { wglDeleteContext(hglrc(context)) }?;
        Ok(())
    }

    fn make_current(&self, dc: Option<Hdc>, context: Option<Hglrc>) -> Result<(), NativeError> {
        unsafe {
            wglMakeCurrent(
                dc.map_or_else(HDC::default, hdc),
                context.map_or_else(HGLRC::default, hglrc),
            )
        }?;
        Ok(())
    }

    fn current_context(&self) -> Option<Hglrc> {
        let context = unsafe { wglGetCurrentContext() };
        (!context.is_invalid()).then(|| Hglrc(context.0 as isize))
    }

    fn share_lists(&self, source: Hglrc, destination: Hglrc) -> Result<(), NativeError> {
        unsafe { wglShareLists(hglrc(source), hglrc(destination)) }?;
        Ok(())
    }

    fn swap_buffers(&self, dc: Hdc) -> Result<(), NativeError> {
        unsafe { SwapBuffers(hdc(dc)) }?;
        Ok(())
    }

    fn monitor_count(&self) -> u32 {
        unsafe { GetSystemMetrics(SM_CMONITORS) }.max(0) as u32
    }

    fn enum_display_device(&self, index: u32) -> Option<DisplayDevice> {
        let mut device = DISPLAY_DEVICEW {
            cb: size_of::<DISPLAY_DEVICEW>() as u32,
            ..Default::default()
        };
        if !unsafe { EnumDisplayDevicesW(PCWSTR::null(), index, &mut device, 0) }.as_bool() {
            return None;
        }

        let mut state = DisplayDeviceState::empty();
        if device.StateFlags & DISPLAY_DEVICE_ATTACHED_TO_DESKTOP != 0 {
            state |= DisplayDeviceState::ATTACHED_TO_DESKTOP;
        }
        if device.StateFlags & DISPLAY_DEVICE_PRIMARY_DEVICE != 0 {
            state |= DisplayDeviceState::PRIMARY_DEVICE;
        }
        if device.StateFlags & DISPLAY_DEVICE_MIRRORING_DRIVER != 0 {
            state |= DisplayDeviceState::MIRRORING_DRIVER;
        }

        Some(DisplayDevice {
            name: from_wide(&device.DeviceName),
            description: from_wide(&device.DeviceString),
            state,
        })
    }

    fn current_display_mode(&self, device_name: &str) -> Result<DisplayMode, NativeError> {
        let mode = self.display_settings(device_name)?;
        let position = unsafe { mode.Anonymous1.Anonymous2.dmPosition };

        Ok(DisplayMode {
            width: mode.dmPelsWidth,
            height: mode.dmPelsHeight,
            bits_per_pixel: mode.dmBitsPerPel,
            refresh_rate: mode.dmDisplayFrequency,
            position_x: position.x,
            position_y: position.y,
        })
    }

    fn change_display_settings(
        &self,
        device_name: &str,
        change: &DisplayModeChange,
        test_only: bool,
    ) -> DisplayChangeCode {
        let Ok(name) = U16CString::from_str(device_name) else {
            return crate::os::display::DISP_CHANGE_FAILED;
        };

        let mut mode = DEVMODEW {
            dmSize: size_of::<DEVMODEW>() as u16,
            dmFields: DM_PELSWIDTH | DM_PELSHEIGHT,
            dmPelsWidth: change.width,
            dmPelsHeight: change.height,
            ..Default::default()
        };
        if let Some(refresh_rate) = change.refresh_rate {
            mode.dmFields |= DM_DISPLAYFREQUENCY;
            mode.dmDisplayFrequency = refresh_rate;
        }

        let flags = if test_only { CDS_TEST } else { CDS_TYPE(0) };
        unsafe {
            ChangeDisplaySettingsExW(
                PCWSTR(name.as_ptr()),
                Some(&mode),
                HWND::default(),
                flags,
                None,
            )
        }
        .0
    }

    fn last_error(&self) -> NativeError {
        last_native_error()
    }
}

fn pixel_format_descriptor(request: &LegacyPixelFormat) -> PIXELFORMATDESCRIPTOR {
    let mut flags = PFD_DRAW_TO_WINDOW | PFD_SUPPORT_OPENGL;
    if request.double_buffer {
        flags |= PFD_DOUBLEBUFFER;
    }

    PIXELFORMATDESCRIPTOR {
        nSize: size_of::<PIXELFORMATDESCRIPTOR>() as u16,
        nVersion: 1,
        dwFlags: flags,
        iPixelType: PFD_TYPE_RGBA,
        cColorBits: request.color_bits,
        cRedBits: request.red_bits,
        cGreenBits: request.green_bits,
        cBlueBits: request.blue_bits,
        cAlphaBits: request.alpha_bits,
        cDepthBits: request.depth_bits,
        cStencilBits: request.stencil_bits,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_previous_style_with_stale_error_is_not_a_failure() {
        let native = Win32Native::new().unwrap();
        native
            .register_window_class(WindowClass::WithoutCursor)
            .unwrap();
        let window = native
            .create_window(&NativeWindowDesc {
                class: WindowClass::WithoutCursor,
                title: "style".into(),
                style: WindowStyle::POPUP,
                ex_style: WindowExStyle::empty(),
                x: 0,
                y: 0,
                width: 16,
                height: 16,
            })
            .unwrap();

        // the first call leaves an extended style of 0 behind for the second one to return
        native
            .set_window_style(window, WindowStyle::POPUP, WindowExStyle::empty())
            .unwrap();
        unsafe { SetLastError(WIN32_ERROR(5)) };
        let result = native.set_window_style(window, WindowStyle::POPUP, WindowExStyle::empty());

        native.destroy_window(window).unwrap();
        native.unregister_window_class(WindowClass::WithoutCursor);
        assert_eq!(result, Ok(()));
    }
}
