//! Engine-facing event queue fed by the native message handler.

use crate::os::keymap::{KeySymbol, ModKeyMask};
use std::collections::VecDeque;
use std::time::Instant;

#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub enum MouseButton {
    Left = 1,
    Middle = 2,
    Right = 3,
}

#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub enum ScrollMotion {
    Up,
    Down,
    Left,
    Right,
}

/// Range that mouse coordinates are mapped into when a fixed input range is in use.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct InputRange {
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GuiEvent {
    MouseMotion {
        x: f32,
        y: f32,
        time: f64,
    },
    MouseButtonPress {
        x: f32,
        y: f32,
        button: MouseButton,
        time: f64,
    },
    MouseDoubleButtonPress {
        x: f32,
        y: f32,
        button: MouseButton,
        time: f64,
    },
    MouseButtonRelease {
        x: f32,
        y: f32,
        button: MouseButton,
        time: f64,
    },
    Scroll {
        motion: ScrollMotion,
        time: f64,
    },
    KeyPress {
        key: KeySymbol,
        modifiers: ModKeyMask,
        time: f64,
    },
    KeyRelease {
        key: KeySymbol,
        modifiers: ModKeyMask,
        time: f64,
    },
    Resize {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        time: f64,
    },
    CloseWindow {
        time: f64,
    },
    MouseWarped {
        x: f32,
        y: f32,
    },
}

/// Queue of events for one window. The owner drains it once per frame.
pub struct EventQueue {
    events: VecDeque<GuiEvent>,
    start: Instant,
    mod_key_mask: ModKeyMask,
    fixed_input_range: Option<InputRange>,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            events: VecDeque::new(),
            start: Instant::now(),
            mod_key_mask: ModKeyMask::empty(),
            fixed_input_range: None,
        }
    }

    /// Seconds since the queue was created.
    pub fn time(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    pub fn fixed_input_range(&self) -> Option<InputRange> {
        self.fixed_input_range
    }

    /// Map mouse coordinates into `range` instead of reporting window pixels.
    pub fn set_fixed_input_range(&mut self, range: Option<InputRange>) {
        self.fixed_input_range = range;
    }

    pub fn mod_key_mask(&self) -> ModKeyMask {
        self.mod_key_mask
    }

    pub fn set_mod_key_mask(&mut self, mask: ModKeyMask) {
        self.mod_key_mask = mask;
    }

    pub fn mouse_motion(&mut self, x: f32, y: f32, time: f64) {
        self.events.push_back(GuiEvent::MouseMotion { x, y, time });
    }

    pub fn mouse_button_press(&mut self, x: f32, y: f32, button: MouseButton, time: f64) {
        self.events
            .push_back(GuiEvent::MouseButtonPress { x, y, button, time });
    }

    pub fn mouse_double_button_press(&mut self, x: f32, y: f32, button: MouseButton, time: f64) {
        self.events
            .push_back(GuiEvent::MouseDoubleButtonPress { x, y, button, time });
    }

    pub fn mouse_button_release(&mut self, x: f32, y: f32, button: MouseButton, time: f64) {
        self.events
            .push_back(GuiEvent::MouseButtonRelease { x, y, button, time });
    }

    pub fn mouse_scroll(&mut self, motion: ScrollMotion, time: f64) {
        self.events.push_back(GuiEvent::Scroll { motion, time });
    }

    pub fn key_press(&mut self, key: KeySymbol, time: f64) {
        let modifiers = self.mod_key_mask;
        self.events.push_back(GuiEvent::KeyPress {
            key,
            modifiers,
            time,
        });
    }

    pub fn key_release(&mut self, key: KeySymbol, time: f64) {
        let modifiers = self.mod_key_mask;
        self.events.push_back(GuiEvent::KeyRelease {
            key,
            modifiers,
            time,
        });
    }

    pub fn window_resize(&mut self, x: i32, y: i32, width: u32, height: u32, time: f64) {
        self.events.push_back(GuiEvent::Resize {
            x,
            y,
            width,
            height,
            time,
        });
    }

    pub fn close_window(&mut self, time: f64) {
        self.events.push_back(GuiEvent::CloseWindow { time });
    }

    pub fn mouse_warped(&mut self, x: f32, y: f32) {
        self.events.push_back(GuiEvent::MouseWarped { x, y });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Removes and returns every queued event, oldest first.
    pub fn take_events(&mut self) -> Vec<GuiEvent> {
        self.events.drain(..).collect()
    }
}
