use crate::os::ScreenIdentifier;
use crate::os::native::{Hglrc, Hwnd};
use serde::{Deserialize, Serialize};

/// Configuration for one graphics context.
///
/// The native handles cannot be written to a configuration file, so they are skipped when the
/// traits are (de)serialized and must be filled in by code.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Traits {
    pub screen: ScreenIdentifier,

    /// Client area origin, relative to the screen.
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,

    pub window_name: String,
    pub window_decoration: bool,
    pub supports_resize: bool,
    pub use_cursor: bool,

    pub red: u32,
    pub green: u32,
    pub blue: u32,
    pub alpha: u32,
    pub depth: u32,
    pub stencil: u32,
    pub sample_buffers: u32,
    pub samples: u32,
    pub double_buffer: bool,
    pub quad_buffer_stereo: bool,
    /// Ask for `WGL_SWAP_EXCHANGE_ARB` on double-buffered formats. Dropped again if no format
    /// supports it.
    pub swap_exchange: bool,

    /// Request an offscreen pixel buffer instead of a window.
    pub pbuffer: bool,

    /// Use an existing native window instead of creating one.
    #[serde(skip)]
    pub inherited_window: Option<Hwnd>,
    pub set_inherited_window_pixel_format: bool,

    /// Rendering context to share display lists and textures with.
    #[serde(skip)]
    pub shared_context: Option<Hglrc>,
}

impl Default for Traits {
    fn default() -> Self {
        Self {
            screen: ScreenIdentifier::default(),
            x: 0,
            y: 0,
            width: 640,
            height: 480,
            window_name: String::new(),
            window_decoration: true,
            supports_resize: true,
            use_cursor: true,
            red: 8,
            green: 8,
            blue: 8,
            alpha: 0,
            depth: 24,
            stencil: 0,
            sample_buffers: 0,
            samples: 0,
            double_buffer: true,
            quad_buffer_stereo: false,
            swap_exchange: true,
            pbuffer: false,
            inherited_window: None,
            set_inherited_window_pixel_format: false,
            shared_context: None,
        }
    }
}
