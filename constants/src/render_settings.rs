use std::time::Duration;

/// Edge length of a billboard quad in world units.
pub const BILLBOARD_SIZE: f32 = 1.0;

/// Scale of a hovered billboard relative to its resting size.
pub const HOVER_SCALE: f32 = 1.5;

pub const RESTING_OPACITY: f32 = 0.8;
pub const HOVER_OPACITY: f32 = 1.0;

/// Ambient brightness in cd/m², a soft fill behind the billboards.
pub const AMBIENT_LIGHT_BRIGHTNESS: f32 = 600.0;

/// Key light illuminance in lux.
pub const DIRECTIONAL_LIGHT_ILLUMINANCE: f32 = 3_000.0;

/// Message shown while chunks are still streaming.
pub const LOADING_MESSAGE: &str = "Art Work Map using Machine Learning";

/// Period of the animated dots after the loading message.
pub const LOADING_DOTS_PERIOD: Duration = Duration::from_millis(300);
