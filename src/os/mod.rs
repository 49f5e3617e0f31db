use crate::error::{WindowError, report};
use crate::os::context::GlContextHandle;
use crate::os::display::{DisplayDevices, ScreenGeometry};
use crate::os::native::{
    Hdc, LegacyPixelFormat, NativeApi, NativeWindowDesc, WindowClass, WindowExStyle, WindowStyle,
};
use crate::os::offscreen::OffscreenContext;
use crate::os::registry::WindowRegistry;
use crate::os::traits::Traits;
use crate::os::window::{GraphicsWindow, GraphicsWindowRef};
use cgmath::Vector2;
use log::{debug, error, warn};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub mod context;
pub mod display;
pub mod event;
pub mod keymap;
pub mod message;
pub mod native;
pub mod offscreen;
pub mod pixel_format;
pub mod registry;
pub mod traits;
pub mod window;

#[cfg(test)]
pub(crate) mod testing;

#[cfg(windows)]
pub mod windows;

/// Identifies a screen. Display numbers other than 0 do not exist on Windows.
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenIdentifier {
    pub display_num: u32,
    pub screen_num: u32,
}

impl ScreenIdentifier {
    pub fn new(display_num: u32, screen_num: u32) -> Self {
        Self {
            display_num,
            screen_num,
        }
    }
}

/// Operations every graphics context offers to the engine.
pub trait GraphicsContext {
    fn valid(&self) -> bool;
    fn realize(&mut self) -> bool;
    fn is_realized(&self) -> bool;
    fn close(&mut self);
    fn make_current(&mut self) -> bool;
    fn release_context(&mut self) -> bool;
    fn swap_buffers(&mut self);
    fn traits(&self) -> &Traits;
}

pub type GraphicsContextRef = Rc<RefCell<dyn GraphicsContext>>;

/// Entry point of the backend: owns the window registry, the display devices and the window
/// classes, and creates graphics contexts.
pub struct WindowingSystem {
    native: Rc<dyn NativeApi>,
    registry: Rc<WindowRegistry>,
    displays: DisplayDevices,
    classes_registered: Cell<bool>,
}

impl WindowingSystem {
    /// Creates the windowing system and installs its registry for native callbacks on the calling
    /// thread, which becomes the thread that creates windows and pumps their messages.
    pub fn new(native: Rc<dyn NativeApi>) -> Rc<Self> {
        let registry = WindowRegistry::new();
        registry.install_for_current_thread();

        Rc::new(Self {
            displays: DisplayDevices::new(native.clone()),
            native,
            registry,
            classes_registered: Cell::new(false),
        })
    }

    #[cfg(windows)]
    pub fn win32() -> anyhow::Result<Rc<Self>> {
        Ok(Self::new(Rc::new(windows::Win32Native::new()?)))
    }

    pub fn native(&self) -> &Rc<dyn NativeApi> {
        &self.native
    }

    pub fn registry(&self) -> &Rc<WindowRegistry> {
        &self.registry
    }

    pub fn displays(&self) -> &DisplayDevices {
        &self.displays
    }

    pub fn num_screens(&self, si: &ScreenIdentifier) -> u32 {
        self.displays.num_screens(si)
    }

    pub fn screen_resolution(&self, si: &ScreenIdentifier) -> (u32, u32) {
        self.displays.screen_resolution(si)
    }

    pub fn screen_color_depth(&self, si: &ScreenIdentifier) -> u32 {
        self.displays.screen_color_depth(si)
    }

    pub fn screen_position(&self, si: &ScreenIdentifier) -> ScreenGeometry {
        self.displays.screen_position(si)
    }

    pub fn set_screen_resolution(&self, si: &ScreenIdentifier, width: u32, height: u32) -> bool {
        self.displays.set_screen_resolution(si, width, height)
    }

    pub fn set_screen_refresh_rate(&self, si: &ScreenIdentifier, refresh_rate: f64) -> bool {
        self.displays.set_screen_refresh_rate(si, refresh_rate)
    }

    /// Registers the window classes with and without a cursor. Does nothing after the first
    /// successful call.
    pub fn register_window_classes(&self) -> Result<(), WindowError> {
        if self.classes_registered.get() {
            return Ok(());
        }

        for class in [WindowClass::WithCursor, WindowClass::WithoutCursor] {
            if let Err(e) = self.native.register_window_class(class) {
                if class == WindowClass::WithoutCursor {
                    self.native.unregister_window_class(WindowClass::WithCursor);
                }
                return Err(WindowError::native(0, "Unable to register window class", e));
            }
        }

        debug!("Registered graphics window classes");
        self.classes_registered.set(true);
        Ok(())
    }

    fn unregister_window_classes(&self) {
        if self.classes_registered.replace(false) {
            self.native.unregister_window_class(WindowClass::WithCursor);
            self.native.unregister_window_class(WindowClass::WithoutCursor);
        }
    }

    /// Creates an invisible 1x1 window at `origin` with a basic OpenGL context and makes that
    /// context current, so that pixel format extensions can be queried.
    ///
    /// Dropping the returned handle restores the context that was current before on `window_hdc`.
    pub fn sample_context(
        &self,
        screen: u32,
        window_hdc: Option<Hdc>,
        origin: Vector2<i32>,
    ) -> Result<GlContextHandle, WindowError> {
        self.register_window_classes()?;

        let mut context = GlContextHandle::new(self.native.clone());

        let hwnd = self
            .native
            .create_window(&NativeWindowDesc {
                class: WindowClass::WithoutCursor,
                title: String::new(),
                style: WindowStyle::CLIP_SIBLINGS
                    | WindowStyle::CLIP_CHILDREN
                    | WindowStyle::DISABLED,
                ex_style: WindowExStyle::OVERLAPPED_WINDOW,
                x: origin.x,
                y: origin.y,
                width: 1,
                height: 1,
            })
            .map_err(|e| WindowError::native(screen, "Unable to create sample window", e))?;
        context.set(Some(hwnd), None, None);

        let hdc = self.native.get_dc(hwnd).map_err(|e| {
            WindowError::native(screen, "Unable to get sample window device context", e)
        })?;
        context.set(Some(hwnd), Some(hdc), None);

        let basic_format = LegacyPixelFormat {
            color_bits: 24,
            depth_bits: 24,
            ..Default::default()
        };
        let index = self
            .native
            .choose_pixel_format(hdc, &basic_format)
            .map_err(|e| WindowError::native(screen, "Unable to choose sample pixel format", e))?;
        self.native
            .set_pixel_format(hdc, index, Some(&basic_format))
            .map_err(|e| WindowError::native(screen, "Unable to set sample pixel format", e))?;

        let hglrc = self.native.create_context(hdc).map_err(|e| {
            WindowError::native(screen, "Unable to create sample OpenGL rendering context", e)
        })?;
        context.set(Some(hwnd), Some(hdc), Some(hglrc));

        if !context.acquire_as_current(window_hdc, true) {
            return Err(WindowError::native(
                screen,
                "Unable to make sample OpenGL rendering context current",
                self.native.last_error(),
            ));
        }

        Ok(context)
    }

    /// Creates and initializes a graphics window.
    pub fn create_graphics_window(
        self: &Rc<Self>,
        traits: Traits,
    ) -> Result<GraphicsWindowRef, WindowError> {
        self.register_window_classes()?;

        let window = GraphicsWindow::new(self.clone(), traits);
        window.borrow_mut().init()?;
        Ok(window)
    }

    /// Creates the graphics context described by `traits`, or `None` when it cannot be created.
    pub fn create_graphics_context(self: &Rc<Self>, traits: Traits) -> Option<GraphicsContextRef> {
        if traits.pbuffer {
            let context = OffscreenContext::new(traits);
            if context.valid() {
                return Some(Rc::new(RefCell::new(context)));
            }
            warn!("Offscreen rendering contexts are not supported by this windowing system");
            return None;
        }

        match self.create_graphics_window(traits) {
            Ok(window) if window.borrow().valid() => Some(window),
            Ok(_) => None,
            Err(e) => {
                report(&e);
                None
            }
        }
    }
}

impl Drop for WindowingSystem {
    fn drop(&mut self) {
        if !self.registry.is_empty() {
            error!(
                "Windowing system dropped with {} registered windows",
                self.registry.len()
            );
        }
        self.unregister_window_classes();
    }
}
