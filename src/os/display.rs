//! Monitor enumeration and display-mode control.

use crate::error::{WindowError, report};
use crate::os::ScreenIdentifier;
use crate::os::native::NativeApi;
use bitflags::bitflags;
use log::warn;
use std::rc::Rc;

bitflags! {
    /// `DISPLAY_DEVICE_*` state flags.
    #[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq)]
    pub struct DisplayDeviceState: u32 {
        const ATTACHED_TO_DESKTOP = 0x0000_0001;
        const PRIMARY_DEVICE = 0x0000_0004;
        const MIRRORING_DRIVER = 0x0000_0008;
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DisplayDevice {
    /// Device name as passed to the display-settings calls (e.g. `\\.\DISPLAY1`).
    pub name: String,
    pub description: String,
    pub state: DisplayDeviceState,
}

/// Current settings of a display device.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct DisplayMode {
    pub width: u32,
    pub height: u32,
    pub bits_per_pixel: u32,
    pub refresh_rate: u32,
    pub position_x: i32,
    pub position_y: i32,
}

/// Fields to change on a display device. The refresh rate is left alone when `None`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DisplayModeChange {
    pub width: u32,
    pub height: u32,
    pub refresh_rate: Option<u32>,
}

/// Position and size of a screen on the virtual desktop.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ScreenGeometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

pub const DISP_CHANGE_SUCCESSFUL: i32 = 0;
pub const DISP_CHANGE_RESTART: i32 = 1;
pub const DISP_CHANGE_FAILED: i32 = -1;
pub const DISP_CHANGE_BADMODE: i32 = -2;

/// Enumerates the screens usable for windows and queries or changes their modes.
///
/// Screen numbers are positions in the filtered enumeration, so they are only stable as long as
/// no display is added or removed.
pub struct DisplayDevices {
    native: Rc<dyn NativeApi>,
}

impl DisplayDevices {
    pub fn new(native: Rc<dyn NativeApi>) -> Self {
        Self { native }
    }

    /// Attached, non-mirroring display devices in enumeration order.
    pub fn enumerate(&self) -> Vec<DisplayDevice> {
        (0..)
            .map_while(|index| self.native.enum_display_device(index))
            .filter(|device| !device.state.contains(DisplayDeviceState::MIRRORING_DRIVER))
            .filter(|device| device.state.contains(DisplayDeviceState::ATTACHED_TO_DESKTOP))
            .collect()
    }

    pub fn num_screens(&self, si: &ScreenIdentifier) -> u32 {
        if si.display_num == 0 {
            self.native.monitor_count()
        } else {
            0
        }
    }

    pub fn screen_information(
        &self,
        si: &ScreenIdentifier,
    ) -> Result<(DisplayDevice, DisplayMode), WindowError> {
        if si.display_num > 0 {
            return Err(WindowError::InvalidDisplay(si.display_num));
        }

        let device = self
            .enumerate()
            .into_iter()
            .nth(si.screen_num as usize)
            .ok_or(WindowError::NoSuchScreen(si.screen_num))?;

        let mode = self.native.current_display_mode(&device.name).map_err(|e| {
            WindowError::native(si.screen_num, "Unable to query information for screen", e)
        })?;

        Ok((device, mode))
    }

    fn current_mode(&self, si: &ScreenIdentifier) -> Option<DisplayMode> {
        match self.screen_information(si) {
            Ok((_, mode)) => Some(mode),
            Err(e) => {
                report(&e);
                None
            }
        }
    }

    /// `(0, 0)` when the screen is unknown.
    pub fn screen_resolution(&self, si: &ScreenIdentifier) -> (u32, u32) {
        self.current_mode(si)
            .map_or((0, 0), |mode| (mode.width, mode.height))
    }

    /// `0` when the screen is unknown.
    pub fn screen_color_depth(&self, si: &ScreenIdentifier) -> u32 {
        self.current_mode(si).map_or(0, |mode| mode.bits_per_pixel)
    }

    /// All zeros when the screen is unknown.
    pub fn screen_position(&self, si: &ScreenIdentifier) -> ScreenGeometry {
        self.current_mode(si)
            .map_or(ScreenGeometry::default(), |mode| ScreenGeometry {
                x: mode.position_x,
                y: mode.position_y,
                width: mode.width,
                height: mode.height,
            })
    }

    pub fn set_screen_resolution(&self, si: &ScreenIdentifier, width: u32, height: u32) -> bool {
        let Some((device, _)) = self.information_or_report(si) else {
            return false;
        };

        let change = DisplayModeChange {
            width,
            height,
            refresh_rate: None,
        };
        self.change_screen_settings(si, &device, &change)
    }

    /// Changes the refresh rate while keeping the current resolution.
    pub fn set_screen_refresh_rate(&self, si: &ScreenIdentifier, refresh_rate: f64) -> bool {
        let Some((device, mode)) = self.information_or_report(si) else {
            return false;
        };

        let change = DisplayModeChange {
            width: mode.width,
            height: mode.height,
            refresh_rate: Some(refresh_rate.round().max(0.0) as u32),
        };
        self.change_screen_settings(si, &device, &change)
    }

    fn information_or_report(&self, si: &ScreenIdentifier) -> Option<(DisplayDevice, DisplayMode)> {
        self.screen_information(si)
            .inspect_err(report)
            .ok()
    }

    /// Tests the change first and only applies it if the test passes.
    fn change_screen_settings(
        &self,
        si: &ScreenIdentifier,
        device: &DisplayDevice,
        change: &DisplayModeChange,
    ) -> bool {
        let mut code = self
            .native
            .change_display_settings(&device.name, change, true);
        if code == DISP_CHANGE_SUCCESSFUL {
            code = self
                .native
                .change_display_settings(&device.name, change, false);
            if code == DISP_CHANGE_SUCCESSFUL {
                return true;
            }
        }

        warn!(
            "Error: {}",
            WindowError::DisplayChange {
                screen: si.screen_num,
                code,
                reason: display_change_reason(code),
            }
        );
        false
    }
}

fn display_change_reason(code: i32) -> &'static str {
    match code {
        DISP_CHANGE_BADMODE => " The specified graphics mode is not supported.",
        DISP_CHANGE_FAILED => " The display driver failed the specified graphics mode.",
        DISP_CHANGE_RESTART => " The computer must be restarted for the graphics mode to work.",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::os::testing::{Call, MockNative, attached_display};

    fn screen(n: u32) -> ScreenIdentifier {
        ScreenIdentifier::new(0, n)
    }

    #[test]
    fn enumeration_skips_mirroring_and_detached_devices() {
        let native = MockNative::new();
        native.state_mut().displays = vec![
            attached_display("\\\\.\\DISPLAY1", 1920, 1080, 0),
            (
                DisplayDevice {
                    name: "RDPUDD".into(),
                    description: "mirror".into(),
                    state: DisplayDeviceState::ATTACHED_TO_DESKTOP
                        | DisplayDeviceState::MIRRORING_DRIVER,
                },
                DisplayMode::default(),
            ),
            (
                DisplayDevice {
                    name: "\\\\.\\DISPLAY3".into(),
                    description: "detached".into(),
                    state: DisplayDeviceState::empty(),
                },
                DisplayMode::default(),
            ),
            attached_display("\\\\.\\DISPLAY4", 1280, 1024, 1920),
        ];

        let displays = DisplayDevices::new(native.clone());
        let names: Vec<_> = displays.enumerate().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["\\\\.\\DISPLAY1", "\\\\.\\DISPLAY4"]);

        assert_eq!(displays.screen_resolution(&screen(1)), (1280, 1024));
        assert_eq!(
            displays.screen_position(&screen(1)),
            ScreenGeometry {
                x: 1920,
                y: 0,
                width: 1280,
                height: 1024
            }
        );
    }

    #[test]
    fn unknown_screens_report_zeroed_geometry() {
        let native = MockNative::new();
        let displays = DisplayDevices::new(native.clone());

        assert_eq!(displays.screen_resolution(&screen(3)), (0, 0));
        assert_eq!(displays.screen_color_depth(&screen(3)), 0);
        assert_eq!(displays.screen_position(&screen(3)), ScreenGeometry::default());
        assert_eq!(displays.screen_resolution(&ScreenIdentifier::new(1, 0)), (0, 0));
        assert_eq!(displays.num_screens(&ScreenIdentifier::new(1, 0)), 0);
        assert_eq!(displays.num_screens(&screen(0)), 1);
    }

    #[test]
    fn resolution_change_is_tested_before_it_is_applied() {
        let native = MockNative::new();
        let displays = DisplayDevices::new(native.clone());

        assert!(displays.set_screen_resolution(&screen(0), 1024, 768));

        let changes: Vec<_> = native
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::ChangeDisplaySettings { .. }))
            .collect();
        assert_eq!(
            changes,
            vec![
                Call::ChangeDisplaySettings {
                    width: 1024,
                    height: 768,
                    refresh_rate: None,
                    test_only: true
                },
                Call::ChangeDisplaySettings {
                    width: 1024,
                    height: 768,
                    refresh_rate: None,
                    test_only: false
                },
            ]
        );
    }

    #[test]
    fn failed_test_never_applies_the_change() {
        let native = MockNative::new();
        native.state_mut().display_change_code = DISP_CHANGE_BADMODE;
        let displays = DisplayDevices::new(native.clone());

        assert!(!displays.set_screen_refresh_rate(&screen(0), 144.0));

        let changes: Vec<_> = native
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::ChangeDisplaySettings { .. }))
            .collect();
        assert_eq!(
            changes,
            vec![Call::ChangeDisplaySettings {
                width: 1920,
                height: 1080,
                refresh_rate: Some(144),
                test_only: true
            }]
        );
        assert_eq!(
            display_change_reason(DISP_CHANGE_RESTART),
            " The computer must be restarted for the graphics mode to work."
        );
    }
}
