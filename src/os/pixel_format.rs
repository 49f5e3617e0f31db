//! Pixel format negotiation.
//!
//! A format is asked for through `wglChoosePixelFormatARB` when the driver exposes it, and through
//! GDI's `ChoosePixelFormat` otherwise. When nothing matches, the request is relaxed in two steps:
//! the colour channels are reduced to what a less than 32-bit screen can hold, then the
//! swap-exchange hint is dropped.

use crate::error::WindowError;
use crate::os::native::{Hdc, LegacyPixelFormat, NativeApi};
use crate::os::traits::Traits;
use log::{info, warn};

/// `WGL_ARB_pixel_format` attribute names and values.
#[allow(missing_docs)]
pub mod wgl {
    pub const DRAW_TO_WINDOW_ARB: i32 = 0x2001;
    pub const ACCELERATION_ARB: i32 = 0x2003;
    pub const SWAP_METHOD_ARB: i32 = 0x2007;
    pub const SUPPORT_OPENGL_ARB: i32 = 0x2010;
    pub const DOUBLE_BUFFER_ARB: i32 = 0x2011;
    pub const STEREO_ARB: i32 = 0x2012;
    pub const PIXEL_TYPE_ARB: i32 = 0x2013;
    pub const COLOR_BITS_ARB: i32 = 0x2014;
    pub const RED_BITS_ARB: i32 = 0x2015;
    pub const GREEN_BITS_ARB: i32 = 0x2017;
    pub const BLUE_BITS_ARB: i32 = 0x2019;
    pub const ALPHA_BITS_ARB: i32 = 0x201B;
    pub const DEPTH_BITS_ARB: i32 = 0x2022;
    pub const STENCIL_BITS_ARB: i32 = 0x2023;
    pub const FULL_ACCELERATION_ARB: i32 = 0x2027;
    pub const SWAP_EXCHANGE_ARB: i32 = 0x2028;
    pub const TYPE_RGBA_ARB: i32 = 0x202B;
    pub const SAMPLE_BUFFERS_ARB: i32 = 0x2041;
    pub const SAMPLES_ARB: i32 = 0x2042;
}

/// The framebuffer properties a window asks for.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct PixelFormatRequest {
    pub red: u32,
    pub green: u32,
    pub blue: u32,
    pub alpha: u32,
    pub depth: u32,
    pub stencil: u32,
    pub sample_buffers: u32,
    pub samples: u32,
    pub double_buffer: bool,
    pub stereo: bool,
    pub swap_exchange: bool,
}

impl From<&Traits> for PixelFormatRequest {
    fn from(traits: &Traits) -> Self {
        Self {
            red: traits.red,
            green: traits.green,
            blue: traits.blue,
            alpha: traits.alpha,
            depth: traits.depth,
            stencil: traits.stencil,
            sample_buffers: traits.sample_buffers,
            samples: traits.samples,
            double_buffer: traits.double_buffer,
            stereo: traits.quad_buffer_stereo,
            swap_exchange: traits.swap_exchange,
        }
    }
}

impl PixelFormatRequest {
    /// Zero-terminated attribute list for `wglChoosePixelFormatARB`.
    pub fn attributes(&self, allow_swap_exchange: bool) -> Vec<i32> {
        let mut attributes = vec![
            wgl::DRAW_TO_WINDOW_ARB,
            1,
            wgl::SUPPORT_OPENGL_ARB,
            1,
            wgl::ACCELERATION_ARB,
            wgl::FULL_ACCELERATION_ARB,
            wgl::PIXEL_TYPE_ARB,
            wgl::TYPE_RGBA_ARB,
            wgl::COLOR_BITS_ARB,
            (self.red + self.green + self.blue) as i32,
            wgl::RED_BITS_ARB,
            self.red as i32,
            wgl::GREEN_BITS_ARB,
            self.green as i32,
            wgl::BLUE_BITS_ARB,
            self.blue as i32,
            wgl::DEPTH_BITS_ARB,
            self.depth as i32,
        ];

        if self.double_buffer {
            attributes.extend([wgl::DOUBLE_BUFFER_ARB, 1]);
            if allow_swap_exchange {
                attributes.extend([wgl::SWAP_METHOD_ARB, wgl::SWAP_EXCHANGE_ARB]);
            }
        }

        if self.alpha > 0 {
            attributes.extend([wgl::ALPHA_BITS_ARB, self.alpha as i32]);
        }
        if self.stencil > 0 {
            attributes.extend([wgl::STENCIL_BITS_ARB, self.stencil as i32]);
        }
        if self.sample_buffers > 0 {
            attributes.extend([wgl::SAMPLE_BUFFERS_ARB, self.sample_buffers as i32]);
        }
        if self.samples > 0 {
            attributes.extend([wgl::SAMPLES_ARB, self.samples as i32]);
        }
        if self.stereo {
            attributes.extend([wgl::STEREO_ARB, 1]);
        }

        attributes.push(0);
        attributes
    }

    /// The same request as a GDI pixel format descriptor. Multisampling cannot be expressed here.
    pub fn legacy(&self) -> LegacyPixelFormat {
        LegacyPixelFormat {
            double_buffer: self.double_buffer,
            color_bits: clamp_bits(self.red + self.green + self.blue),
            red_bits: clamp_bits(self.red),
            green_bits: clamp_bits(self.green),
            blue_bits: clamp_bits(self.blue),
            alpha_bits: clamp_bits(self.alpha),
            depth_bits: clamp_bits(self.depth),
            stencil_bits: clamp_bits(self.stencil),
        }
    }
}

fn clamp_bits(bits: u32) -> u8 {
    bits.min(u8::MAX as u32) as u8
}

/// Result of a successful negotiation.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PixelFormatChoice {
    /// Index to pass to `SetPixelFormat`.
    pub index: i32,
    /// The request that matched. Its colour bits differ from the original request when the screen
    /// depth forced a reduction.
    pub request: PixelFormatRequest,
    /// Whether the swap-exchange hint was part of the matching request.
    pub swap_exchange: bool,
    /// The GDI descriptor when the legacy path picked the format.
    pub legacy: Option<LegacyPixelFormat>,
}

struct Negotiation<'a> {
    native: &'a dyn NativeApi,
    hdc: Hdc,
    screen: u32,
}

impl Negotiation<'_> {
    fn choose(
        &self,
        request: &PixelFormatRequest,
        swap_exchange: bool,
    ) -> Option<PixelFormatChoice> {
        if !self.native.has_choose_pixel_format_arb() {
            return self.choose_legacy(request);
        }

        let attributes = request.attributes(swap_exchange);
        match self.native.choose_pixel_format_arb(self.hdc, &attributes) {
            Ok(Some(index)) => Some(PixelFormatChoice {
                index,
                request: *request,
                swap_exchange: swap_exchange && request.double_buffer,
                legacy: None,
            }),
            Ok(None) => None,
            Err(e) => {
                warn!(
                    "[Screen #{}] Unable to choose the requested pixel format: {e}",
                    self.screen
                );
                None
            }
        }
    }

    fn choose_legacy(&self, request: &PixelFormatRequest) -> Option<PixelFormatChoice> {
        info!(
            "[Screen #{}] wglChoosePixelFormatARB extension not found, trying GDI",
            self.screen
        );

        let legacy = request.legacy();
        let index = match self.native.choose_pixel_format(self.hdc, &legacy) {
            Ok(index) => index,
            Err(e) => {
                warn!("[Screen #{}] GDI ChoosePixelFormat failed: {e}", self.screen);
                return None;
            }
        };

        match self.native.describe_pixel_format(self.hdc, index) {
            Ok(description) if description.is_software() => {
                warn!("Rendering in software: pixel format index {index}");
            }
            Ok(_) => {}
            Err(e) => warn!("Unable to describe pixel format {index}: {e}"),
        }

        Some(PixelFormatChoice {
            index,
            request: *request,
            swap_exchange: false,
            legacy: Some(legacy),
        })
    }
}

/// Finds a pixel format for `request` on `hdc`, which must belong to a window whose rendering
/// context is current so that the ARB entry point can be resolved.
///
/// `screen_depth` is the colour depth of the target screen in bits per pixel.
pub fn negotiate(
    native: &dyn NativeApi,
    hdc: Hdc,
    screen: u32,
    request: &PixelFormatRequest,
    screen_depth: u32,
) -> Result<PixelFormatChoice, WindowError> {
    let negotiation = Negotiation {
        native,
        hdc,
        screen,
    };

    if let Some(choice) = negotiation.choose(request, request.swap_exchange) {
        return Ok(choice);
    }

    let mut request = *request;
    if screen_depth < 32 {
        info!(
            "Display setting is not 32 bit colors, {screen_depth} bits per pixel on screen #{screen}"
        );

        let channel = screen_depth / 4;
        request.red = channel;
        request.green = channel;
        request.blue = channel;

        if let Some(choice) = negotiation.choose(&request, request.swap_exchange) {
            return Ok(choice);
        }
    }

    match negotiation.choose(&request, false) {
        Some(choice) => {
            info!(
                "Found a matching pixel format but without the WGL_SWAP_METHOD_ARB specification for screen #{screen}"
            );
            Ok(choice)
        }
        None => Err(WindowError::NoMatchingPixelFormat { screen }),
    }
}
