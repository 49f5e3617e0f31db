use crate::os::native::Hwnd;
use crate::os::window::GraphicsWindow;
use hashbrown::HashMap;
use log::debug;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

thread_local! {
    static THREAD_REGISTRY: RefCell<Weak<WindowRegistry>> = const { RefCell::new(Weak::new()) };
}

/// Maps native window handles to the graphics windows that own them.
///
/// The native window procedure only receives a handle; it finds the window to dispatch to through
/// the registry installed on the current thread.
#[derive(Default)]
pub struct WindowRegistry {
    windows: RefCell<HashMap<Hwnd, Weak<RefCell<GraphicsWindow>>>>,
}

impl WindowRegistry {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Makes this registry the one native callbacks on the calling thread dispatch through.
    pub fn install_for_current_thread(self: &Rc<Self>) {
        THREAD_REGISTRY.with(|registry| *registry.borrow_mut() = Rc::downgrade(self));
    }

    /// Registers `window` for `hwnd`, replacing any earlier registration.
    pub fn register(&self, hwnd: Hwnd, window: Weak<RefCell<GraphicsWindow>>) {
        debug!("Registering window {hwnd:?}");
        self.windows.borrow_mut().insert(hwnd, window);
    }

    pub fn unregister(&self, hwnd: Hwnd) {
        if self.windows.borrow_mut().remove(&hwnd).is_some() {
            debug!("Unregistered window {hwnd:?}");
        }
    }

    pub fn lookup(&self, hwnd: Hwnd) -> Option<Rc<RefCell<GraphicsWindow>>> {
        self.windows.borrow().get(&hwnd).and_then(Weak::upgrade)
    }

    pub fn len(&self) -> usize {
        self.windows.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.borrow().is_empty()
    }
}

/// Dispatches a native message to the window registered for `hwnd` on this thread.
///
/// Returns `None` when no window is registered, or when the window is already borrowed because the
/// message was sent from inside one of its own native calls. The caller then falls back to the
/// default window procedure.
pub fn route_message(hwnd: Hwnd, message: u32, wparam: usize, lparam: isize) -> Option<isize> {
    let registry = THREAD_REGISTRY.with(|registry| registry.borrow().upgrade())?;
    let window = registry.lookup(hwnd)?;

    let mut window = window.try_borrow_mut().ok()?;
    Some(window.dispatch(hwnd, message, wparam, lparam))
}
