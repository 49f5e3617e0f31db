//! A recording stand-in for the operating system, used by the unit tests.

use crate::error::NativeError;
use crate::os::display::{
    DISP_CHANGE_SUCCESSFUL, DisplayDevice, DisplayDeviceState, DisplayMode, DisplayModeChange,
};
use crate::os::message::{WM_DESTROY, WM_MOVE, WM_SIZE};
use crate::os::native::{
    DisplayChangeCode, Hdc, Hglrc, Hwnd, LegacyPixelFormat, NativeApi, NativeWindowDesc,
    PixelFormatInfo, Rect, WindowClass, WindowExStyle, WindowPosFlags, WindowProcedure,
    WindowStyle, ZOrder,
};
use crate::os::registry::route_message;
use cgmath::Vector2;
use hashbrown::{HashMap, HashSet};
use std::cell::{Ref, RefCell, RefMut};
use std::collections::VecDeque;
use std::rc::Rc;

/// Window procedure reported for windows created outside of the backend.
pub const FOREIGN_PROCEDURE: WindowProcedure = WindowProcedure(0x7A11);
pub const ARB_FORMAT: i32 = 3;
pub const LEGACY_FORMAT: i32 = 7;

/// Frame sizes added around the client area of captioned windows.
const FRAME_LEFT: i32 = 8;
const FRAME_TOP: i32 = 31;
const FRAME_RIGHT: i32 = 8;
const FRAME_BOTTOM: i32 = 8;

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    RegisterWindowClass(WindowClass),
    UnregisterWindowClass(WindowClass),
    CreateWindow(NativeWindowDesc),
    DestroyWindow(Hwnd),
    SetWindowPos {
        hwnd: Hwnd,
        z_order: ZOrder,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        flags: WindowPosFlags,
    },
    SetWindowStyle(Hwnd, WindowStyle, WindowExStyle),
    UpdateWindow(Hwnd),
    InvalidateDesktop,
    SetForegroundWindow(Hwnd),
    SetCursorPos(i32, i32),
    HideCursor,
    SetCapture(Hwnd),
    ReleaseCapture,
    SubclassWindow(Hwnd),
    RestoreWindowProcedure(Hwnd, WindowProcedure),
    DefaultWindowProc(Hwnd, u32),
    CallWindowProc(WindowProcedure, Hwnd, u32),
    ValidatePaint(Hwnd),
    PostQuitMessage(i32),
    GetDc(Hwnd),
    ReleaseDc(Hwnd, Hdc),
    ChoosePixelFormatArb(Vec<i32>),
    ChoosePixelFormat(LegacyPixelFormat),
    SetPixelFormat(Hdc, i32),
    CreateContext(Hdc),
    DeleteContext(Hglrc),
    MakeCurrent(Option<Hdc>, Option<Hglrc>),
    ShareLists(Hglrc, Hglrc),
    SwapBuffers(Hdc),
    ChangeDisplaySettings {
        width: u32,
        height: u32,
        refresh_rate: Option<u32>,
        test_only: bool,
    },
}

pub struct MockWindow {
    pub style: WindowStyle,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub client_override: Option<Rect>,
    pub pixel_format: Option<i32>,
}

impl MockWindow {
    fn has_frame(&self) -> bool {
        self.style.contains(WindowStyle::CAPTION)
    }

    fn client_origin(&self) -> Vector2<i32> {
        if self.has_frame() {
            Vector2::new(self.x + FRAME_LEFT, self.y + FRAME_TOP)
        } else {
            Vector2::new(self.x, self.y)
        }
    }

    fn client_rect(&self) -> Rect {
        if let Some(rect) = self.client_override {
            return rect;
        }

        let (mut width, mut height) = (self.width, self.height);
        if self.has_frame() {
            width -= FRAME_LEFT + FRAME_RIGHT;
            height -= FRAME_TOP + FRAME_BOTTOM;
        }
        Rect {
            left: 0,
            top: 0,
            right: width.max(0),
            bottom: height.max(0),
        }
    }
}

pub struct MockState {
    pub calls: Vec<Call>,
    pub fail: HashSet<&'static str>,

    pub windows: HashMap<Hwnd, MockWindow>,
    pub device_contexts: HashMap<Hdc, Hwnd>,
    pub contexts: HashSet<Hglrc>,
    pub current: Option<(Option<Hdc>, Hglrc)>,
    pub messages: VecDeque<(Hwnd, u32, usize, isize)>,
    next_handle: isize,

    pub arb_supported: bool,
    pub arb_accepts: Box<dyn Fn(&[i32]) -> bool>,
    pub legacy_format: PixelFormatInfo,

    pub scan_codes: HashMap<u32, u32>,
    pub ascii: HashMap<u32, u8>,
    pub keyboard_state: [u8; 256],

    pub cursor: Vector2<i32>,

    pub displays: Vec<(DisplayDevice, DisplayMode)>,
    pub display_change_code: DisplayChangeCode,
}

pub fn attached_display(name: &str, width: u32, height: u32, x: i32) -> (DisplayDevice, DisplayMode) {
    (
        DisplayDevice {
            name: name.to_string(),
            description: "Mock Display Adapter".to_string(),
            state: DisplayDeviceState::ATTACHED_TO_DESKTOP,
        },
        DisplayMode {
            width,
            height,
            bits_per_pixel: 32,
            refresh_rate: 60,
            position_x: x,
            position_y: 0,
        },
    )
}

pub struct MockNative {
    state: RefCell<MockState>,
}

impl MockNative {
    pub fn new() -> Rc<Self> {
        let _ = env_logger::builder().is_test(true).try_init();

        Rc::new(Self {
            state: RefCell::new(MockState {
                calls: Vec::new(),
                fail: HashSet::new(),
                windows: HashMap::new(),
                device_contexts: HashMap::new(),
                contexts: HashSet::new(),
                current: None,
                messages: VecDeque::new(),
                next_handle: 0x100,
                arb_supported: true,
                arb_accepts: Box::new(|_| true),
                legacy_format: PixelFormatInfo::default(),
                scan_codes: HashMap::new(),
                ascii: HashMap::new(),
                keyboard_state: [0; 256],
                cursor: Vector2::new(0, 0),
                displays: vec![attached_display("\\\\.\\DISPLAY1", 1920, 1080, 0)],
                display_change_code: DISP_CHANGE_SUCCESSFUL,
            }),
        })
    }

    pub fn state(&self) -> Ref<'_, MockState> {
        self.state.borrow()
    }

    pub fn state_mut(&self) -> RefMut<'_, MockState> {
        self.state.borrow_mut()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    /// Calls that change something, without the default window procedure traffic.
    pub fn significant_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::DefaultWindowProc(..)))
            .collect()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.state().calls.iter().filter(|c| predicate(c)).count()
    }

    pub fn clear_calls(&self) {
        self.state_mut().calls.clear();
    }

    pub fn fail(&self, operation: &'static str) {
        self.state_mut().fail.insert(operation);
    }

    pub fn map_scan_code(&self, scan_code: u32, virtual_key: u32) {
        self.state_mut().scan_codes.insert(scan_code, virtual_key);
    }

    pub fn accept_formats(&self, predicate: impl Fn(&[i32]) -> bool + 'static) {
        self.state_mut().arb_accepts = Box::new(predicate);
    }

    pub fn set_screen_depth(&self, bits_per_pixel: u32) {
        for (_, mode) in self.state_mut().displays.iter_mut() {
            mode.bits_per_pixel = bits_per_pixel;
        }
    }

    pub fn set_client_rect(&self, hwnd: Hwnd, width: i32, height: i32) {
        if let Some(window) = self.state_mut().windows.get_mut(&hwnd) {
            window.client_override = Some(Rect {
                left: 0,
                top: 0,
                right: width,
                bottom: height,
            });
        }
    }

    /// Queues a message for the next `pump_messages` of `hwnd`.
    pub fn post_message(&self, hwnd: Hwnd, message: u32, wparam: usize, lparam: isize) {
        self.state_mut()
            .messages
            .push_back((hwnd, message, wparam, lparam));
    }

    pub fn is_window(&self, hwnd: Hwnd) -> bool {
        self.state().windows.contains_key(&hwnd)
    }

    pub fn live_contexts(&self) -> usize {
        self.state().contexts.len()
    }

    fn record(&self, call: Call) {
        self.state_mut().calls.push(call);
    }

    fn check(&self, operation: &'static str) -> Result<(), NativeError> {
        if self.state().fail.contains(operation) {
            Err(NativeError::new(5, "Access is denied."))
        } else {
            Ok(())
        }
    }

    fn next_handle(&self) -> isize {
        let mut state = self.state_mut();
        state.next_handle += 1;
        state.next_handle
    }

    /// Delivers a message the way `SendMessage` does, without going through the queue.
    fn send(&self, hwnd: Hwnd, message: u32, wparam: usize, lparam: isize) {
        if route_message(hwnd, message, wparam, lparam).is_none() {
            self.default_window_proc(hwnd, message, wparam, lparam);
        }
    }
}

impl NativeApi for MockNative {
    fn register_window_class(&self, class: WindowClass) -> Result<(), NativeError> {
        self.record(Call::RegisterWindowClass(class));
        self.check("register_window_class")
    }

    fn unregister_window_class(&self, class: WindowClass) {
        self.record(Call::UnregisterWindowClass(class));
    }

    fn create_window(&self, desc: &NativeWindowDesc) -> Result<Hwnd, NativeError> {
        self.record(Call::CreateWindow(desc.clone()));
        self.check("create_window")?;

        let hwnd = Hwnd(self.next_handle());
        self.state_mut().windows.insert(
            hwnd,
            MockWindow {
                style: desc.style,
                x: desc.x,
                y: desc.y,
                width: desc.width,
                height: desc.height,
                client_override: None,
                pixel_format: None,
            },
        );
        Ok(hwnd)
    }

    fn destroy_window(&self, hwnd: Hwnd) -> Result<(), NativeError> {
        self.record(Call::DestroyWindow(hwnd));
        self.check("destroy_window")?;

        if self.state_mut().windows.remove(&hwnd).is_none() {
            return Err(NativeError::new(1400, "Invalid window handle."));
        }
        self.send(hwnd, WM_DESTROY, 0, 0);
        Ok(())
    }

    fn adjust_window_rect(
        &self,
        rect: Rect,
        style: WindowStyle,
        _ex_style: WindowExStyle,
    ) -> Result<Rect, NativeError> {
        if !style.contains(WindowStyle::CAPTION) {
            return Ok(rect);
        }
        Ok(Rect {
            left: rect.left - FRAME_LEFT,
            top: rect.top - FRAME_TOP,
            right: rect.right + FRAME_RIGHT,
            bottom: rect.bottom + FRAME_BOTTOM,
        })
    }

    fn set_window_pos(
        &self,
        hwnd: Hwnd,
        z_order: ZOrder,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        flags: WindowPosFlags,
    ) -> Result<(), NativeError> {
        self.record(Call::SetWindowPos {
            hwnd,
            z_order,
            x,
            y,
            width,
            height,
            flags,
        });
        self.check("set_window_pos")?;

        {
            let mut state = self.state_mut();
            let window = state
                .windows
                .get_mut(&hwnd)
                .ok_or_else(|| NativeError::new(1400, "Invalid window handle."))?;
            window.x = x;
            window.y = y;
            window.width = width;
            window.height = height;
        }

        // Windows sends these synchronously from inside SetWindowPos
        self.send(hwnd, WM_MOVE, 0, 0);
        self.send(hwnd, WM_SIZE, 0, 0);
        Ok(())
    }

    fn set_window_style(
        &self,
        hwnd: Hwnd,
        style: WindowStyle,
        ex_style: WindowExStyle,
    ) -> Result<(), NativeError> {
        self.record(Call::SetWindowStyle(hwnd, style, ex_style));
        self.check("set_window_style")?;
        if let Some(window) = self.state_mut().windows.get_mut(&hwnd) {
            window.style = style;
        }
        Ok(())
    }

    fn update_window(&self, hwnd: Hwnd) -> Result<(), NativeError> {
        self.record(Call::UpdateWindow(hwnd));
        self.check("update_window")
    }

    fn invalidate_desktop(&self) {
        self.record(Call::InvalidateDesktop);
    }

    fn client_to_screen(&self, hwnd: Hwnd, point: Vector2<i32>) -> Vector2<i32> {
        self.state()
            .windows
            .get(&hwnd)
            .map_or(point, |window| window.client_origin() + point)
    }

    fn client_rect(&self, hwnd: Hwnd) -> Result<Rect, NativeError> {
        self.state()
            .windows
            .get(&hwnd)
            .map(MockWindow::client_rect)
            .ok_or_else(|| NativeError::new(1400, "Invalid window handle."))
    }

    fn window_rect(&self, hwnd: Hwnd) -> Result<Rect, NativeError> {
        self.check("window_rect")?;
        self.state()
            .windows
            .get(&hwnd)
            .map(|window| Rect {
                left: window.x,
                top: window.y,
                right: window.x + window.width,
                bottom: window.y + window.height,
            })
            .ok_or_else(|| NativeError::new(1400, "Invalid window handle."))
    }

    fn set_foreground_window(&self, hwnd: Hwnd) -> bool {
        self.record(Call::SetForegroundWindow(hwnd));
        self.check("set_foreground_window").is_ok()
    }

    fn cursor_pos(&self) -> Result<Vector2<i32>, NativeError> {
        self.check("cursor_pos")?;
        Ok(self.state().cursor)
    }

    fn set_cursor_pos(&self, x: i32, y: i32) -> Result<(), NativeError> {
        self.record(Call::SetCursorPos(x, y));
        self.check("set_cursor_pos")?;
        self.state_mut().cursor = Vector2::new(x, y);
        Ok(())
    }

    fn hide_cursor(&self) {
        self.record(Call::HideCursor);
    }

    fn set_capture(&self, hwnd: Hwnd) {
        self.record(Call::SetCapture(hwnd));
    }

    fn release_capture(&self) {
        self.record(Call::ReleaseCapture);
    }

    fn subclass_window(&self, hwnd: Hwnd) -> Result<Option<WindowProcedure>, NativeError> {
        self.record(Call::SubclassWindow(hwnd));
        self.check("subclass_window")?;

        if !self.is_window(hwnd) {
            return Err(NativeError::new(1400, "Invalid window handle."));
        }
        Ok(Some(FOREIGN_PROCEDURE))
    }

    fn restore_window_procedure(
        &self,
        hwnd: Hwnd,
        procedure: WindowProcedure,
    ) -> Result<(), NativeError> {
        self.record(Call::RestoreWindowProcedure(hwnd, procedure));
        Ok(())
    }

    fn default_window_proc(&self, hwnd: Hwnd, message: u32, _wparam: usize, _lparam: isize) -> isize {
        self.record(Call::DefaultWindowProc(hwnd, message));
        0
    }

    fn call_window_proc(
        &self,
        procedure: WindowProcedure,
        hwnd: Hwnd,
        message: u32,
        _wparam: usize,
        _lparam: isize,
    ) -> isize {
        self.record(Call::CallWindowProc(procedure, hwnd, message));
        0
    }

    fn pump_messages(&self, hwnd: Hwnd) {
        loop {
            let next = {
                let mut state = self.state_mut();
                let position = state.messages.iter().position(|m| m.0 == hwnd);
                position.and_then(|p| state.messages.remove(p))
            };
            let Some((hwnd, message, wparam, lparam)) = next else {
                break;
            };
            self.send(hwnd, message, wparam, lparam);
        }
    }

    fn validate_paint(&self, hwnd: Hwnd) {
        self.record(Call::ValidatePaint(hwnd));
    }

    fn post_quit_message(&self, exit_code: i32) {
        self.record(Call::PostQuitMessage(exit_code));
    }

    fn scan_code_to_virtual_key(&self, scan_code: u32) -> u32 {
        self.state().scan_codes.get(&scan_code).copied().unwrap_or(0)
    }

    fn keyboard_state(&self) -> Option<[u8; 256]> {
        Some(self.state().keyboard_state)
    }

    fn to_ascii(&self, virtual_key: u32, _scan_code: u32, _keyboard_state: &[u8; 256]) -> Option<u8> {
        self.state().ascii.get(&virtual_key).copied()
    }

    fn get_dc(&self, hwnd: Hwnd) -> Result<Hdc, NativeError> {
        self.record(Call::GetDc(hwnd));
        self.check("get_dc")?;
        if !self.is_window(hwnd) {
            return Err(NativeError::new(1400, "Invalid window handle."));
        }

        let hdc = Hdc(self.next_handle());
        self.state_mut().device_contexts.insert(hdc, hwnd);
        Ok(hdc)
    }

    fn release_dc(&self, hwnd: Hwnd, hdc: Hdc) -> Result<(), NativeError> {
        self.record(Call::ReleaseDc(hwnd, hdc));
        match self.state_mut().device_contexts.remove(&hdc) {
            Some(owner) if owner == hwnd => Ok(()),
            _ => Err(NativeError::new(6, "The handle is invalid.")),
        }
    }

    fn has_choose_pixel_format_arb(&self) -> bool {
        self.state().arb_supported
    }

    fn choose_pixel_format_arb(&self, _hdc: Hdc, attributes: &[i32]) -> Result<Option<i32>, NativeError> {
        self.record(Call::ChoosePixelFormatArb(attributes.to_vec()));
        let state = self.state();
        Ok((state.arb_accepts)(attributes).then_some(ARB_FORMAT))
    }

    fn choose_pixel_format(&self, _hdc: Hdc, request: &LegacyPixelFormat) -> Result<i32, NativeError> {
        self.record(Call::ChoosePixelFormat(*request));
        self.check("choose_pixel_format")?;
        Ok(LEGACY_FORMAT)
    }

    fn describe_pixel_format(&self, _hdc: Hdc, _index: i32) -> Result<PixelFormatInfo, NativeError> {
        Ok(self.state().legacy_format)
    }

    fn pixel_format(&self, hdc: Hdc) -> Option<i32> {
        let state = self.state();
        let hwnd = state.device_contexts.get(&hdc)?;
        state.windows.get(hwnd)?.pixel_format
    }

    fn set_pixel_format(
        &self,
        hdc: Hdc,
        index: i32,
        _request: Option<&LegacyPixelFormat>,
    ) -> Result<(), NativeError> {
        self.record(Call::SetPixelFormat(hdc, index));
        self.check("set_pixel_format")?;

        let mut state = self.state_mut();
        let hwnd = *state
            .device_contexts
            .get(&hdc)
            .ok_or_else(|| NativeError::new(6, "The handle is invalid."))?;
        let window = state
            .windows
            .get_mut(&hwnd)
            .ok_or_else(|| NativeError::new(1400, "Invalid window handle."))?;
        window.pixel_format = Some(index);
        Ok(())
    }

    fn create_context(&self, hdc: Hdc) -> Result<Hglrc, NativeError> {
        self.record(Call::CreateContext(hdc));
        self.check("create_context")?;

        let hglrc = Hglrc(self.next_handle());
        self.state_mut().contexts.insert(hglrc);
        Ok(hglrc)
    }

    fn delete_context(&self, hglrc: Hglrc) -> Result<(), NativeError> {
        self.record(Call::DeleteContext(hglrc));
        if self.state_mut().contexts.remove(&hglrc) {
            Ok(())
        } else {
            Err(NativeError::new(6, "The handle is invalid."))
        }
    }

    fn make_current(&self, hdc: Option<Hdc>, hglrc: Option<Hglrc>) -> Result<(), NativeError> {
        self.record(Call::MakeCurrent(hdc, hglrc));
        self.check("make_current")?;

        let mut state = self.state_mut();
        match hglrc {
            Some(hglrc) if !state.contexts.contains(&hglrc) => {
                Err(NativeError::new(2000, "The pixel format is invalid."))
            }
            Some(hglrc) => {
                state.current = Some((hdc, hglrc));
                Ok(())
            }
            None => {
                state.current = None;
                Ok(())
            }
        }
    }

    fn current_context(&self) -> Option<Hglrc> {
        self.state().current.map(|(_, hglrc)| hglrc)
    }

    fn share_lists(&self, source: Hglrc, destination: Hglrc) -> Result<(), NativeError> {
        self.record(Call::ShareLists(source, destination));
        self.check("share_lists")
    }

    fn swap_buffers(&self, hdc: Hdc) -> Result<(), NativeError> {
        self.record(Call::SwapBuffers(hdc));
        self.check("swap_buffers")
    }

    fn monitor_count(&self) -> u32 {
        self.state()
            .displays
            .iter()
            .filter(|(device, _)| {
                device.state.contains(DisplayDeviceState::ATTACHED_TO_DESKTOP)
                    && !device.state.contains(DisplayDeviceState::MIRRORING_DRIVER)
            })
            .count() as u32
    }

    fn enum_display_device(&self, index: u32) -> Option<DisplayDevice> {
        self.state()
            .displays
            .get(index as usize)
            .map(|(device, _)| device.clone())
    }

    fn current_display_mode(&self, device_name: &str) -> Result<DisplayMode, NativeError> {
        self.state()
            .displays
            .iter()
            .find(|(device, _)| device.name == device_name)
            .map(|(_, mode)| *mode)
            .ok_or_else(|| NativeError::new(1610, "The configuration data for this product is corrupt."))
    }

    fn change_display_settings(
        &self,
        device_name: &str,
        change: &DisplayModeChange,
        test_only: bool,
    ) -> DisplayChangeCode {
        self.record(Call::ChangeDisplaySettings {
            width: change.width,
            height: change.height,
            refresh_rate: change.refresh_rate,
            test_only,
        });

        let mut state = self.state_mut();
        let code = state.display_change_code;
        if code == DISP_CHANGE_SUCCESSFUL && !test_only {
            if let Some((_, mode)) = state
                .displays
                .iter_mut()
                .find(|(device, _)| device.name == device_name)
            {
                mode.width = change.width;
                mode.height = change.height;
                if let Some(refresh_rate) = change.refresh_rate {
                    mode.refresh_rate = refresh_rate;
                }
            }
        }
        code
    }

    fn last_error(&self) -> NativeError {
        NativeError::new(0, "")
    }
}
