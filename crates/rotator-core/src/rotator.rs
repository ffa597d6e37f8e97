//! Per-step driver combining selections, offset and pause flag

use glam::Quat;
use tracing::info;

use crate::offset::{record_offset, Offset};
use crate::orient::{orient, Pose};
use crate::selection::Selections;
use crate::settings::Settings;

/// State of one rotator instance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rotator {
    selections: Selections,
    offset: Offset,
    paused: bool,
}

impl Rotator {
    pub fn new(host_object: impl Into<String>) -> Self {
        Self {
            selections: Selections::new(host_object),
            offset: Offset::ZERO,
            paused: false,
        }
    }

    /// Rebuild a rotator from saved settings
    pub fn from_settings(host_object: impl Into<String>, settings: &Settings) -> Self {
        Self {
            selections: Selections::restore(
                host_object,
                settings.local_controller.clone(),
                settings.remote_object.clone(),
                settings.remote_controller.clone(),
            ),
            offset: settings.offset(),
            paused: settings.paused,
        }
    }

    /// Snapshot of everything that should be persisted
    pub fn settings(&self) -> Settings {
        let mut settings = Settings {
            local_controller: self.selections.local_controller().map(str::to_owned),
            remote_object: self.selections.remote_object().map(str::to_owned),
            remote_controller: self.selections.remote_controller().map(str::to_owned),
            paused: self.paused,
            ..Default::default()
        };
        settings.set_offset(self.offset);
        settings
    }

    pub fn selections(&self) -> &Selections {
        &self.selections
    }

    pub fn selections_mut(&mut self) -> &mut Selections {
        &mut self.selections
    }

    pub fn offset(&self) -> Offset {
        self.offset
    }

    pub fn set_offset(&mut self, offset: Offset) {
        self.offset = offset.clamped();
    }

    pub fn reset_offset(&mut self) {
        info!(host = %self.selections.host_object(), "Offsets reset");
        self.offset = Offset::ZERO;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Rotation to give the local controller this step.
    ///
    /// `None` means leave it alone: the rotator is paused, a point is not
    /// resolved, or the two points coincide.
    pub fn step(&self, local: Option<&Pose>, remote: Option<&Pose>) -> Option<Quat> {
        if self.paused {
            return None;
        }
        orient(local?, remote?, self.offset)
    }

    /// Capture the local controller's current rotation as the new offset.
    ///
    /// Returns false, leaving the offset untouched, when the points cannot
    /// be resolved or coincide.
    pub fn record_offset(&mut self, local: Option<&Pose>, remote: Option<&Pose>) -> bool {
        let (Some(local), Some(remote)) = (local, remote) else {
            return false;
        };
        match record_offset(local, remote) {
            Some(offset) => {
                info!(
                    host = %self.selections.host_object(),
                    x = offset.x,
                    y = offset.y,
                    z = offset.z,
                    "Offset recorded"
                );
                self.offset = offset;
                true
            }
            None => false,
        }
    }
}
