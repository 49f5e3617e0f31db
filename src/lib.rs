//! # glwin32
//!
//! OpenGL windowing backend for Win32: native windows with WGL rendering contexts, pixel format
//! negotiation, display enumeration and translation of native messages into GUI events.

pub mod error;
pub mod os;

#[cfg(windows)]
pub extern crate windows;

pub use crate::error::{NativeError, WindowError};
pub use crate::os::traits::Traits;
pub use crate::os::window::{GraphicsWindow, GraphicsWindowRef, WindowState};
pub use crate::os::{GraphicsContext, GraphicsContextRef, ScreenIdentifier, WindowingSystem};
