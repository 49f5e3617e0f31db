use crate::error::{WindowError, report};
use crate::os::context::GlContextHandle;
use crate::os::event::{EventQueue, MouseButton, ScrollMotion};
use crate::os::keymap::adapt_key;
use crate::os::message::*;
use crate::os::native::{
    Hdc, Hglrc, Hwnd, NativeApi, NativeWindowDesc, Rect, WindowClass, WindowExStyle,
    WindowPosFlags, WindowProcedure, WindowStyle, ZOrder,
};
use crate::os::pixel_format::{PixelFormatRequest, negotiate};
use crate::os::traits::Traits;
use crate::os::{GraphicsContext, WindowingSystem};
use cgmath::Vector2;
use log::{debug, error, info, warn};
use raw_window_handle::{
    HandleError, HasWindowHandle, RawWindowHandle, Win32WindowHandle, WindowHandle,
};
use std::cell::RefCell;
use std::num::NonZeroIsize;
use std::rc::{Rc, Weak};

pub type GraphicsWindowRef = Rc<RefCell<GraphicsWindow>>;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum WindowState {
    Uninitialized,
    /// Native window and rendering context exist, the window is not shown yet.
    Initialized,
    Realized,
    /// Rendering context and device context are gone; the native window still exists and the
    /// window can be realized again.
    Closed,
    /// Transient, while `destroy_window` runs.
    Destroying,
}

/// Style and outer rectangle of a window whose client area matches the traits.
#[derive(Copy, Clone, Debug)]
struct WindowPlacement {
    style: WindowStyle,
    ex_style: WindowExStyle,
    origin: Vector2<i32>,
    size: Vector2<i32>,
}

/// A native window with an OpenGL rendering context.
///
/// The window is either created by the backend or adopted from `Traits::inherited_window`, in which
/// case the backend subclasses its window procedure and never destroys it.
pub struct GraphicsWindow {
    system: Rc<WindowingSystem>,
    native: Rc<dyn NativeApi>,
    traits: Traits,
    state: WindowState,

    hwnd: Option<Hwnd>,
    hdc: Option<Hdc>,
    hglrc: Option<Hglrc>,
    owns_window: bool,
    previous_procedure: Option<WindowProcedure>,

    close_pending: bool,
    destroy_pending: bool,

    screen_origin: Vector2<i32>,
    placement_origin: Vector2<i32>,
    placement_size: Vector2<i32>,

    events: EventQueue,
    weak_self: Weak<RefCell<GraphicsWindow>>,
}

impl GraphicsWindow {
    pub fn new(system: Rc<WindowingSystem>, traits: Traits) -> GraphicsWindowRef {
        Rc::new_cyclic(|weak_self| {
            RefCell::new(Self {
                native: system.native().clone(),
                system,
                traits,
                state: WindowState::Uninitialized,
                hwnd: None,
                hdc: None,
                hglrc: None,
                owns_window: false,
                previous_procedure: None,
                close_pending: false,
                destroy_pending: false,
                screen_origin: Vector2::new(0, 0),
                placement_origin: Vector2::new(0, 0),
                placement_size: Vector2::new(0, 0),
                events: EventQueue::new(),
                weak_self: weak_self.clone(),
            })
        })
    }

    pub fn state(&self) -> WindowState {
        self.state
    }

    pub fn hwnd(&self) -> Option<Hwnd> {
        self.hwnd
    }

    pub fn hdc(&self) -> Option<Hdc> {
        self.hdc
    }

    /// The rendering context, for sharing with other windows through `Traits::shared_context`.
    pub fn hglrc(&self) -> Option<Hglrc> {
        self.hglrc
    }

    pub fn owns_window(&self) -> bool {
        self.owns_window
    }

    pub fn events(&self) -> &EventQueue {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventQueue {
        &mut self.events
    }

    fn screen(&self) -> u32 {
        self.traits.screen.screen_num
    }

    /// Creates (or adopts, or reopens) the native window and its rendering context.
    pub fn init(&mut self) -> Result<(), WindowError> {
        match self.state {
            WindowState::Initialized | WindowState::Realized => return Ok(()),
            WindowState::Destroying => {
                return Err(WindowError::invalid_state(
                    self.screen(),
                    "Window is being destroyed",
                ));
            }
            WindowState::Closed => self.reopen()?,
            WindowState::Uninitialized => match self.traits.inherited_window {
                Some(hwnd) => self.adopt(hwnd)?,
                None => self.create_native_window()?,
            },
        }

        if let Some(hwnd) = self.hwnd {
            self.system
                .registry()
                .register(hwnd, self.weak_self.clone());
        }
        self.state = WindowState::Initialized;
        debug!("[Screen #{}] Graphics window initialized", self.screen());
        Ok(())
    }

    fn create_native_window(&mut self) -> Result<(), WindowError> {
        let screen = self.screen();
        self.system.register_window_classes()?;

        let placement = self.window_position_and_style(self.traits.window_decoration)?;
        let desc = NativeWindowDesc {
            class: if self.traits.use_cursor {
                WindowClass::WithCursor
            } else {
                WindowClass::WithoutCursor
            },
            title: self.traits.window_name.clone(),
            style: placement.style,
            ex_style: placement.ex_style,
            x: placement.origin.x,
            y: placement.origin.y,
            width: placement.size.x,
            height: placement.size.y,
        };

        let hwnd = self
            .native
            .create_window(&desc)
            .map_err(|e| WindowError::native(screen, "Unable to create window", e))?;

        let mut guard = GlContextHandle::new(self.native.clone());
        guard.set(Some(hwnd), None, None);

        let hdc = self
            .native
            .get_dc(hwnd)
            .map_err(|e| WindowError::native(screen, "Unable to get window device context", e))?;
        guard.set(Some(hwnd), Some(hdc), None);

        self.apply_pixel_format(hdc)?;
        let hglrc = self.create_context(hdc)?;
        guard.set(Some(hwnd), Some(hdc), Some(hglrc));

        guard.disarm();
        self.hwnd = Some(hwnd);
        self.hdc = Some(hdc);
        self.hglrc = Some(hglrc);
        self.owns_window = true;
        self.placement_origin = placement.origin;
        self.placement_size = placement.size;
        Ok(())
    }

    fn adopt(&mut self, hwnd: Hwnd) -> Result<(), WindowError> {
        let screen = self.screen();
        let geometry = self.system.screen_position(&self.traits.screen);
        self.screen_origin = Vector2::new(geometry.x, geometry.y);

        let hdc = self
            .native
            .get_dc(hwnd)
            .map_err(|e| WindowError::native(screen, "Unable to get window device context", e))?;

        let mut guard = GlContextHandle::new(self.native.clone());
        guard.keep_window();
        guard.set(Some(hwnd), Some(hdc), None);

        if self.traits.set_inherited_window_pixel_format {
            self.apply_pixel_format(hdc)?;
        }
        let hglrc = self.create_context(hdc)?;
        guard.set(Some(hwnd), Some(hdc), Some(hglrc));

        let previous = self
            .native
            .subclass_window(hwnd)
            .map_err(|e| WindowError::native(screen, "Unable to subclass window procedure", e))?;

        guard.disarm();
        self.hwnd = Some(hwnd);
        self.hdc = Some(hdc);
        self.hglrc = Some(hglrc);
        self.owns_window = false;
        self.previous_procedure = previous;
        Ok(())
    }

    /// A closed window keeps its native window; it only needs a device context and a rendering
    /// context again. The pixel format of a window cannot change once set.
    fn reopen(&mut self) -> Result<(), WindowError> {
        let screen = self.screen();
        let hwnd = self
            .hwnd
            .ok_or_else(|| WindowError::invalid_state(screen, "Closed window has no native window"))?;

        let hdc = self
            .native
            .get_dc(hwnd)
            .map_err(|e| WindowError::native(screen, "Unable to get window device context", e))?;

        let mut guard = GlContextHandle::new(self.native.clone());
        guard.keep_window();
        guard.set(Some(hwnd), Some(hdc), None);

        if self.native.pixel_format(hdc).is_none() {
            self.apply_pixel_format(hdc)?;
        }
        let hglrc = self.create_context(hdc)?;

        guard.disarm();
        self.hdc = Some(hdc);
        self.hglrc = Some(hglrc);
        Ok(())
    }

    fn create_context(&self, hdc: Hdc) -> Result<Hglrc, WindowError> {
        self.native.create_context(hdc).map_err(|e| {
            WindowError::native(
                self.screen(),
                "Unable to create OpenGL rendering context",
                e,
            )
        })
    }

    /// Negotiates a pixel format through a sample context and applies it to `hdc`.
    ///
    /// Colour bits reduced during negotiation are written back to this window's traits.
    fn apply_pixel_format(&mut self, hdc: Hdc) -> Result<(), WindowError> {
        let screen = self.screen();
        let request = PixelFormatRequest::from(&self.traits);

        let choice = {
            let sample = self
                .system
                .sample_context(screen, Some(hdc), self.screen_origin)?;
            let sample_hdc = sample.hdc().unwrap_or(hdc);
            let depth = self.system.screen_color_depth(&self.traits.screen);
            negotiate(&*self.native, sample_hdc, screen, &request, depth)?
        };

        if choice.request != request {
            info!(
                "[Screen #{screen}] Using {}/{}/{} colour bits",
                choice.request.red, choice.request.green, choice.request.blue
            );
            self.traits.red = choice.request.red;
            self.traits.green = choice.request.green;
            self.traits.blue = choice.request.blue;
        }

        self.native
            .set_pixel_format(hdc, choice.index, choice.legacy.as_ref())
            .map_err(|e| WindowError::native(screen, "Unable to set pixel format", e))
    }

    fn window_position_and_style(&mut self, decorated: bool) -> Result<WindowPlacement, WindowError> {
        let screen = self.screen();
        let geometry = self.system.screen_position(&self.traits.screen);
        if geometry.width == 0 || geometry.height == 0 {
            return Err(WindowError::NoSuchScreen(screen));
        }
        self.screen_origin = Vector2::new(geometry.x, geometry.y);

        let mut origin = Vector2::new(self.traits.x + geometry.x, self.traits.y + geometry.y);
        let mut size = Vector2::new(self.traits.width as i32, self.traits.height as i32);

        let mut style = WindowStyle::POPUP | WindowStyle::CLIP_SIBLINGS | WindowStyle::CLIP_CHILDREN;
        let mut ex_style = WindowExStyle::empty();

        if decorated {
            style |= WindowStyle::CAPTION
                | WindowStyle::SYSMENU
                | WindowStyle::MINIMIZEBOX
                | WindowStyle::MAXIMIZEBOX;
            if self.traits.supports_resize {
                style |= WindowStyle::SIZEBOX;
            }
            ex_style = WindowExStyle::APP_WINDOW
                | WindowExStyle::OVERLAPPED_WINDOW
                | WindowExStyle::ACCEPT_FILES;

            let corners = Rect {
                left: origin.x,
                top: origin.y,
                right: origin.x + size.x - 1,
                bottom: origin.y + size.y - 1,
            };
            let corners = self
                .native
                .adjust_window_rect(corners, style, ex_style)
                .map_err(|e| WindowError::native(screen, "Unable to adjust window rectangle", e))?;

            origin = Vector2::new(corners.left, corners.top);
            size = Vector2::new(
                corners.right - corners.left + 1,
                corners.bottom - corners.top + 1,
            );
        }

        Ok(WindowPlacement {
            style,
            ex_style,
            origin,
            size,
        })
    }

    fn realize_implementation(&mut self) -> Result<(), WindowError> {
        if self.state == WindowState::Realized {
            return Ok(());
        }
        self.init()?;

        let screen = self.screen();
        if let Some(shared) = self.traits.shared_context {
            self.share_lists_with(shared)?;
        }

        if self.owns_window {
            let hwnd = self
                .hwnd
                .ok_or_else(|| WindowError::invalid_state(screen, "Window has no native window"))?;

            self.native
                .set_window_pos(
                    hwnd,
                    ZOrder::Top,
                    self.placement_origin.x,
                    self.placement_origin.y,
                    self.placement_size.x,
                    self.placement_size.y,
                    WindowPosFlags {
                        show_window: true,
                        frame_changed: false,
                    },
                )
                .map_err(|e| WindowError::native(screen, "Unable to show window", e))?;
            self.native
                .update_window(hwnd)
                .map_err(|e| WindowError::native(screen, "Unable to update window", e))?;
            self.sync_geometry(hwnd);
        }

        self.state = WindowState::Realized;
        debug!("[Screen #{screen}] Graphics window realized");
        Ok(())
    }

    fn share_lists_with(&self, shared: Hglrc) -> Result<(), WindowError> {
        let screen = self.screen();
        let (Some(hdc), Some(own)) = (self.hdc, self.hglrc) else {
            return Err(WindowError::invalid_state(
                screen,
                "Window has no OpenGL rendering context to share",
            ));
        };

        self.native
            .make_current(Some(hdc), Some(own))
            .map_err(|e| WindowError::native(screen, "Unable to set current OpenGL rendering context", e))?;
        let shared_result = self.native.share_lists(shared, own);
        if let Err(e) = self.native.make_current(None, None) {
            warn!("[Screen #{screen}] Unable to release OpenGL rendering context: {e}");
        }

        shared_result.map_err(|e| WindowError::native(screen, "Unable to share OpenGL context", e))
    }

    /// Releases the rendering context and the device context, keeping the native window.
    fn release_resources(&mut self) {
        let hdc = self.hdc.take();
        let hglrc = self.hglrc.take();
        if hdc.is_none() && hglrc.is_none() {
            return;
        }

        let mut handle = GlContextHandle::new(self.native.clone());
        handle.keep_window();
        handle.set(self.hwnd, hdc, hglrc);
    }

    /// Tears the window down. The native window is only destroyed when the backend created it and
    /// `delete_native_window` is set.
    pub fn destroy_window(&mut self, delete_native_window: bool) {
        if self.state == WindowState::Destroying {
            return;
        }
        self.state = WindowState::Destroying;

        self.release_resources();

        if let (Some(hwnd), Some(procedure)) = (self.hwnd, self.previous_procedure.take()) {
            if let Err(e) = self.native.restore_window_procedure(hwnd, procedure) {
                error!(
                    "[Screen #{}] Unable to restore the window procedure: {e}",
                    self.screen()
                );
            }
        }

        if let Some(hwnd) = self.hwnd.take() {
            self.system.registry().unregister(hwnd);
            if self.owns_window && delete_native_window {
                if let Err(e) = self.native.destroy_window(hwnd) {
                    error!("[Screen #{}] Unable to destroy window: {e}", self.screen());
                }
            }
        }

        self.close_pending = false;
        self.destroy_pending = false;
        self.state = WindowState::Uninitialized;
        debug!("[Screen #{}] Graphics window destroyed", self.screen());
    }

    /// Pumps the native messages of a realized window, then applies the close and destroy
    /// requests those messages raised.
    pub fn check_events(window: &GraphicsWindowRef) {
        let (native, hwnd) = {
            let Ok(window) = window.try_borrow() else {
                warn!("check_events called while the window is borrowed");
                return;
            };
            match (window.state, window.hwnd) {
                (WindowState::Realized, Some(hwnd)) => (window.native.clone(), hwnd),
                _ => return,
            }
        };

        native.pump_messages(hwnd);

        let Ok(mut window) = window.try_borrow_mut() else {
            return;
        };
        if window.close_pending {
            window.close_pending = false;
            window.close();
        }
        if window.destroy_pending {
            window.destroy_pending = false;
            window.destroy_window(false);
        }
    }

    fn transform_mouse_xy(&self, lparam: isize) -> (f32, f32) {
        let mut x = x_lparam(lparam) as f32;
        let mut y = y_lparam(lparam) as f32;

        if let Some(range) = self.events.fixed_input_range() {
            x = range.x_min + (range.x_max - range.x_min) * x / self.traits.width.max(1) as f32;
            y = range.y_min + (range.y_max - range.y_min) * y / self.traits.height.max(1) as f32;
        }
        (x, y)
    }

    /// `SetWindowPos` sends WM_MOVE and WM_SIZE while this window is borrowed, so those messages
    /// reach the default window procedure instead of `dispatch`.
    fn sync_geometry(&mut self, hwnd: Hwnd) {
        let time = self.events.time();
        self.handle_geometry_change(hwnd, time);
    }

    fn handle_geometry_change(&mut self, hwnd: Hwnd, time: f64) {
        let origin = self.native.client_to_screen(hwnd, Vector2::new(0, 0));
        let x = origin.x - self.screen_origin.x;
        let y = origin.y - self.screen_origin.y;

        let client = match self.native.client_rect(hwnd) {
            Ok(client) => client,
            Err(e) => {
                warn!("[Screen #{}] Unable to get client rectangle: {e}", self.screen());
                return;
            }
        };

        // minimized windows report an empty client area
        let (width, height) = if client.right == 0 && client.bottom == 0 {
            (1, 1)
        } else {
            (client.right.max(0) as u32, client.bottom.max(0) as u32)
        };

        if (x, y, width, height) != (self.traits.x, self.traits.y, self.traits.width, self.traits.height) {
            self.traits.x = x;
            self.traits.y = y;
            self.traits.width = width;
            self.traits.height = height;
            self.events.window_resize(x, y, width, height, time);
        }
    }

    /// Handles one native message for this window and returns the window procedure result.
    pub fn dispatch(&mut self, hwnd: Hwnd, message: u32, wparam: usize, lparam: isize) -> isize {
        let time = self.events.time();

        match message {
            WM_PAINT => {
                if self.owns_window {
                    self.native.validate_paint(hwnd);
                }
            }
            WM_MOUSEMOVE => {
                let (x, y) = self.transform_mouse_xy(lparam);
                self.events.mouse_motion(x, y, time);
            }
            WM_LBUTTONDOWN | WM_MBUTTONDOWN | WM_RBUTTONDOWN => {
                self.native.set_capture(hwnd);
                let (x, y) = self.transform_mouse_xy(lparam);
                self.events
                    .mouse_button_press(x, y, button_of(message), time);
            }
            WM_LBUTTONDBLCLK | WM_MBUTTONDBLCLK | WM_RBUTTONDBLCLK => {
                self.native.set_capture(hwnd);
                let (x, y) = self.transform_mouse_xy(lparam);
                self.events
                    .mouse_double_button_press(x, y, button_of(message), time);
            }
            WM_LBUTTONUP | WM_MBUTTONUP | WM_RBUTTONUP => {
                self.native.release_capture();
                let (x, y) = self.transform_mouse_xy(lparam);
                self.events
                    .mouse_button_release(x, y, button_of(message), time);
            }
            WM_MOUSEWHEEL => {
                let motion = if wheel_delta(wparam) < 0 {
                    ScrollMotion::Down
                } else {
                    ScrollMotion::Up
                };
                self.events.mouse_scroll(motion, time);
            }
            WM_MOUSEHWHEEL => {
                let motion = if wheel_delta(wparam) < 0 {
                    ScrollMotion::Left
                } else {
                    ScrollMotion::Right
                };
                self.events.mouse_scroll(motion, time);
            }
            WM_MOVE | WM_SIZE => self.handle_geometry_change(hwnd, time),
            WM_KEYDOWN | WM_SYSKEYDOWN => {
                let (key, modifiers) = adapt_key(&*self.native, wparam, lparam);
                self.events.set_mod_key_mask(modifiers);
                self.events.key_press(key, time);
            }
            WM_KEYUP | WM_SYSKEYUP => {
                let (key, modifiers) = adapt_key(&*self.native, wparam, lparam);
                self.events.set_mod_key_mask(modifiers);
                self.events.key_release(key, time);
            }
            WM_SETCURSOR => {
                if self.traits.use_cursor {
                    return self
                        .native
                        .default_window_proc(hwnd, message, wparam, lparam);
                }
                self.native.hide_cursor();
                return 1;
            }
            WM_CLOSE => self.events.close_window(time),
            WM_DESTROY => {
                self.destroy_pending = true;
                if self.owns_window {
                    self.native.post_quit_message(0);
                }
            }
            WM_QUIT => {
                self.close_pending = true;
                return wparam as isize;
            }
            _ => {
                if self.owns_window {
                    return self
                        .native
                        .default_window_proc(hwnd, message, wparam, lparam);
                }
            }
        }

        if self.owns_window {
            return 0;
        }

        match self.previous_procedure {
            Some(procedure) => self
                .native
                .call_window_proc(procedure, hwnd, message, wparam, lparam),
            None => self
                .native
                .default_window_proc(hwnd, message, wparam, lparam),
        }
    }

    /// Adds or removes the window frame, keeping the client area where it is.
    pub fn set_window_decoration(&mut self, decorated: bool) -> bool {
        let screen = self.screen();
        let Some(hwnd) = self.hwnd else {
            report(&WindowError::invalid_state(screen, "Window not initialized; cannot change its decoration"));
            return false;
        };

        let placement = match self.window_position_and_style(decorated) {
            Ok(placement) => placement,
            Err(e) => {
                report(&e);
                return false;
            }
        };

        if let Err(e) = self
            .native
            .set_window_style(hwnd, placement.style, placement.ex_style)
        {
            report(&WindowError::native(screen, "Unable to set window style", e));
            return false;
        }

        if let Err(e) = self.native.set_window_pos(
            hwnd,
            ZOrder::Unchanged,
            placement.origin.x,
            placement.origin.y,
            placement.size.x,
            placement.size.y,
            WindowPosFlags {
                show_window: true,
                frame_changed: true,
            },
        ) {
            report(&WindowError::native(
                screen,
                "Unable to set new window position and size",
                e,
            ));
            return false;
        }

        if !decorated {
            self.native.invalidate_desktop();
        }
        self.traits.window_decoration = decorated;
        self.sync_geometry(hwnd);
        true
    }

    /// Moves and resizes the outer window rectangle.
    pub fn set_window_rectangle(&mut self, x: i32, y: i32, width: i32, height: i32) -> bool {
        let Some(hwnd) = self.hwnd else {
            return false;
        };

        match self.native.set_window_pos(
            hwnd,
            ZOrder::Top,
            x,
            y,
            width,
            height,
            WindowPosFlags {
                show_window: true,
                frame_changed: true,
            },
        ) {
            Ok(()) => {
                self.sync_geometry(hwnd);
                true
            }
            Err(e) => {
                report(&WindowError::native(
                    self.screen(),
                    "Unable to set new window position and size",
                    e,
                ));
                false
            }
        }
    }

    pub fn grab_focus(&mut self) -> bool {
        let Some(hwnd) = self.hwnd else {
            return false;
        };

        if self.native.set_foreground_window(hwnd) {
            true
        } else {
            report(&WindowError::native(
                self.screen(),
                "Unable to set window as foreground",
                self.native.last_error(),
            ));
            false
        }
    }

    /// Grabs the focus only when the cursor is inside the window rectangle.
    pub fn grab_focus_if_pointer_in_window(&mut self) -> bool {
        let screen = self.screen();
        let Some(hwnd) = self.hwnd else {
            return false;
        };

        let cursor = match self.native.cursor_pos() {
            Ok(cursor) => cursor,
            Err(e) => {
                report(&WindowError::native(screen, "Unable to get cursor position", e));
                return false;
            }
        };
        let rect = match self.native.window_rect(hwnd) {
            Ok(rect) => rect,
            Err(e) => {
                report(&WindowError::native(screen, "Unable to get window position", e));
                return false;
            }
        };

        let inside = (rect.left..=rect.right).contains(&cursor.x)
            && (rect.top..=rect.bottom).contains(&cursor.y);
        inside && self.grab_focus()
    }

    /// Moves the cursor to `(x, y)` relative to the window rectangle.
    pub fn request_warp_pointer(&mut self, x: f32, y: f32) -> bool {
        let screen = self.screen();
        let (WindowState::Realized, Some(hwnd)) = (self.state, self.hwnd) else {
            report(&WindowError::invalid_state(
                screen,
                "Window not realized; cannot warp pointer",
            ));
            return false;
        };

        let rect = match self.native.window_rect(hwnd) {
            Ok(rect) => rect,
            Err(e) => {
                report(&WindowError::native(screen, "Unable to get window rectangle", e));
                return false;
            }
        };

        if let Err(e) = self
            .native
            .set_cursor_pos(rect.left + x as i32, rect.top + y as i32)
        {
            report(&WindowError::native(screen, "Unable to set cursor position", e));
            return false;
        }

        self.events.mouse_warped(x, y);
        true
    }

    /// Takes effect on the next `WM_SETCURSOR`.
    pub fn use_cursor(&mut self, cursor_on: bool) {
        self.traits.use_cursor = cursor_on;
    }
}

fn button_of(message: u32) -> MouseButton {
    match message {
        WM_LBUTTONDOWN | WM_LBUTTONUP | WM_LBUTTONDBLCLK => MouseButton::Left,
        WM_MBUTTONDOWN | WM_MBUTTONUP | WM_MBUTTONDBLCLK => MouseButton::Middle,
        _ => MouseButton::Right,
    }
}

impl GraphicsContext for GraphicsWindow {
    fn valid(&self) -> bool {
        matches!(self.state, WindowState::Initialized | WindowState::Realized)
    }

    fn realize(&mut self) -> bool {
        match self.realize_implementation() {
            Ok(()) => true,
            Err(e) => {
                report(&e);
                false
            }
        }
    }

    fn is_realized(&self) -> bool {
        self.state == WindowState::Realized
    }

    /// Releases the rendering and device contexts. The native window stays registered so the
    /// window can be realized again.
    fn close(&mut self) {
        if !matches!(self.state, WindowState::Initialized | WindowState::Realized) {
            return;
        }

        self.release_resources();
        self.state = WindowState::Closed;
        debug!("[Screen #{}] Graphics window closed", self.screen());
    }

    fn make_current(&mut self) -> bool {
        let screen = self.screen();
        let (WindowState::Realized, Some(hdc), Some(hglrc)) = (self.state, self.hdc, self.hglrc)
        else {
            report(&WindowError::invalid_state(
                screen,
                "Window not realized; cannot do makeCurrent",
            ));
            return false;
        };

        match self.native.make_current(Some(hdc), Some(hglrc)) {
            Ok(()) => true,
            Err(e) => {
                report(&WindowError::native(
                    screen,
                    "Unable to set current OpenGL rendering context",
                    e,
                ));
                false
            }
        }
    }

    fn release_context(&mut self) -> bool {
        let screen = self.screen();
        let (WindowState::Realized, Some(hdc)) = (self.state, self.hdc) else {
            report(&WindowError::invalid_state(
                screen,
                "Window not realized; cannot release context",
            ));
            return false;
        };

        match self.native.make_current(Some(hdc), None) {
            Ok(()) => true,
            Err(e) => {
                report(&WindowError::native(
                    screen,
                    "Unable to release current OpenGL rendering context",
                    e,
                ));
                false
            }
        }
    }

    fn swap_buffers(&mut self) {
        let (WindowState::Realized, Some(hdc)) = (self.state, self.hdc) else {
            return;
        };

        if let Err(e) = self.native.swap_buffers(hdc) {
            report(&WindowError::native(
                self.screen(),
                "Unable to swap display buffers",
                e,
            ));
        }
    }

    fn traits(&self) -> &Traits {
        &self.traits
    }
}

impl HasWindowHandle for GraphicsWindow {
    fn window_handle(&self) -> Result<WindowHandle<'_>, HandleError> {
        let hwnd = self
            .hwnd
            .and_then(|hwnd| NonZeroIsize::new(hwnd.0))
            .ok_or(HandleError::Unavailable)?;

        // the handle stays valid until destroy_window, which needs `&mut self`
        unsafe {
            Ok(WindowHandle::borrow_raw(RawWindowHandle::Win32(
                Win32WindowHandle::new(hwnd),
            )))
        }
    }
}

impl Drop for GraphicsWindow {
    fn drop(&mut self) {
        if self.hwnd.is_some() || self.hdc.is_some() || self.hglrc.is_some() {
            self.destroy_window(true);
        }
    }
}
