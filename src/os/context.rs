use crate::os::native::{Hdc, Hglrc, Hwnd, NativeApi};
use log::{debug, error, warn};
use std::rc::Rc;

/// Owns a window, its device context and an OpenGL rendering context as one unit.
///
/// Dropping the handle tears the triple down in reverse order of creation: the previously current
/// context is restored (if one was captured), the own context is unbound if it is still current and
/// deleted, the device context is released and the window is destroyed. Missing pieces are
/// skipped, so a partially built handle can be dropped at any point of construction.
pub struct GlContextHandle {
    native: Rc<dyn NativeApi>,
    hwnd: Option<Hwnd>,
    hdc: Option<Hdc>,
    hglrc: Option<Hglrc>,
    destroy_window: bool,
    previous: Option<(Option<Hdc>, Hglrc)>,
}

impl GlContextHandle {
    pub fn new(native: Rc<dyn NativeApi>) -> Self {
        Self {
            native,
            hwnd: None,
            hdc: None,
            hglrc: None,
            destroy_window: true,
            previous: None,
        }
    }

    pub fn set(&mut self, hwnd: Option<Hwnd>, hdc: Option<Hdc>, hglrc: Option<Hglrc>) {
        self.hwnd = hwnd;
        self.hdc = hdc;
        self.hglrc = hglrc;
    }

    /// Keep the window alive on drop. Used for windows the handle did not create.
    pub fn keep_window(&mut self) {
        self.destroy_window = false;
    }

    pub fn hwnd(&self) -> Option<Hwnd> {
        self.hwnd
    }

    pub fn hdc(&self) -> Option<Hdc> {
        self.hdc
    }

    pub fn hglrc(&self) -> Option<Hglrc> {
        self.hglrc
    }

    /// Makes the rendering context current on the calling thread.
    ///
    /// With `restore_on_release`, the context current before this call is bound again on
    /// `restore_hdc` when the handle is dropped.
    pub fn acquire_as_current(&mut self, restore_hdc: Option<Hdc>, restore_on_release: bool) -> bool {
        let (Some(_), Some(hdc), Some(hglrc)) = (self.hwnd, self.hdc, self.hglrc) else {
            return false;
        };

        let current = self.native.current_context();
        if restore_on_release {
            self.previous = current.map(|previous| (restore_hdc, previous));
        }

        if current == Some(hglrc) {
            return true;
        }

        match self.native.make_current(Some(hdc), Some(hglrc)) {
            Ok(()) => true,
            Err(e) => {
                warn!("Unable to set current OpenGL rendering context: {e}");
                false
            }
        }
    }

    /// Gives up ownership of every resource without releasing anything.
    pub fn disarm(&mut self) -> (Option<Hwnd>, Option<Hdc>, Option<Hglrc>) {
        self.previous = None;
        (self.hwnd.take(), self.hdc.take(), self.hglrc.take())
    }
}

impl Drop for GlContextHandle {
    fn drop(&mut self) {
        if let Some((hdc, previous)) = self.previous.take() {
            if Some(previous) != self.hglrc {
                if let Err(e) = self.native.make_current(hdc, Some(previous)) {
                    error!("Unable to restore current OpenGL rendering context: {e}");
                }
            }
        }

        if let Some(hglrc) = self.hglrc.take() {
            if self.native.current_context() == Some(hglrc) {
                if let Err(e) = self.native.make_current(None, None) {
                    error!("Unable to release current OpenGL rendering context: {e}");
                }
            }

            if let Err(e) = self.native.delete_context(hglrc) {
                error!("Unable to delete OpenGL rendering context: {e}");
            }
        }

        if let Some(hdc) = self.hdc.take() {
            match self.hwnd {
                Some(hwnd) => {
                    if let Err(e) = self.native.release_dc(hwnd, hdc) {
                        error!("Unable to release window device context: {e}");
                    }
                }
                None => warn!("Device context without a window was not released"),
            }
        }

        if let Some(hwnd) = self.hwnd.take() {
            if self.destroy_window {
                if let Err(e) = self.native.destroy_window(hwnd) {
                    error!("Unable to destroy window: {e}");
                }
            }
        }

        debug!("OpenGL context handle released");
    }
}
