use crate::os::GraphicsContext;
use crate::os::traits::Traits;
use log::warn;

/// Pixel-buffer context requested through `Traits::pbuffer`.
///
/// Offscreen rendering is not available on this windowing system, so the context is never valid
/// and every operation fails.
pub struct OffscreenContext {
    traits: Traits,
}

impl OffscreenContext {
    pub fn new(traits: Traits) -> Self {
        Self { traits }
    }
}

impl GraphicsContext for OffscreenContext {
    fn valid(&self) -> bool {
        false
    }

    fn realize(&mut self) -> bool {
        warn!(
            "[Screen #{}] Offscreen contexts cannot be realized",
            self.traits.screen.screen_num
        );
        false
    }

    fn is_realized(&self) -> bool {
        false
    }

    fn close(&mut self) {}

    fn make_current(&mut self) -> bool {
        false
    }

    fn release_context(&mut self) -> bool {
        false
    }

    fn swap_buffers(&mut self) {}

    fn traits(&self) -> &Traits {
        &self.traits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offscreen_context_never_becomes_usable() {
        let mut context = OffscreenContext::new(Traits {
            pbuffer: true,
            ..Default::default()
        });

        assert!(!context.valid());
        assert!(!context.realize());
        assert!(!context.is_realized());
        assert!(!context.make_current());
        assert!(context.traits().pbuffer);
    }
}
