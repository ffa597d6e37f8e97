//! Rotator Core - Orientation math, selections and settings
//!
//! This crate holds everything of the Rotator plugin that does not depend on
//! the scene host:
//! - Look-at rotation with a post-applied Euler offset (the Orienter)
//! - The inverse computation that bakes a posed rotation into an offset
//! - The selection state machine over an injected scene directory
//! - Plugin settings and their key/value serialization

pub mod offset;
pub mod orient;
pub mod rotator;
pub mod selection;
pub mod settings;

pub use glam;

pub use offset::{normalize_angle, record_offset, Offset};
pub use orient::{look_rotation, offset_rotation, orient, Pose, FORWARD, UP};
pub use rotator::Rotator;
pub use selection::{MemoryDirectory, SceneDirectory, SelectionChange, Selections};
pub use settings::{Settings, SettingsError};
