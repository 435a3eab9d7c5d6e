use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Grid-unit rectangle bounding the drawable world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaBounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Default for AreaBounds {
    fn default() -> Self {
        Self {
            left: 1,
            top: 1,
            right: 63,
            bottom: 35,
        }
    }
}

/// Fixed per-session track parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackConfig {
    /// World units per grid cell.
    pub cell_size: f64,
    /// Vertex density relative to the grid: 2 means vertices may be laid
    /// every half cell while live-dragging.
    pub resolution: f64,
    /// Drawable area, in grid units.
    pub area: AreaBounds,
    /// Width and height of one partition cell, in grid cells.
    pub partition_cell_span: u32,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            cell_size: 20.0,
            resolution: 2.0,
            area: AreaBounds::default(),
            partition_cell_span: 5,
        }
    }
}

impl TrackConfig {
    /// Checks sizes are positive and the area is non-empty.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first offending parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("cell_size", self.cell_size)?;
        positive("resolution", self.resolution)?;
        positive("partition_cell_span", f64::from(self.partition_cell_span))?;
        let a = self.area;
        if a.right <= a.left || a.bottom <= a.top {
            return Err(ConfigError::EmptyArea {
                left: a.left,
                top: a.top,
                right: a.right,
                bottom: a.bottom,
            });
        }
        Ok(())
    }
}

/// Fixed per-race game parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Logical seconds a player has before their move is auto-resolved.
    pub turn_time_limit: f64,
    /// Laps needed to win.
    pub target_laps: u32,
    /// Longest allowed arrow while on track (Chebyshev length).
    pub max_arrow_length: i32,
    /// Longest allowed arrow while off track.
    pub off_track_arrow_length: i32,
    /// Seed for random move substitution; `None` draws from entropy.
    pub rng_seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            turn_time_limit: 30.0,
            target_laps: 1,
            max_arrow_length: 6,
            off_track_arrow_length: 1,
            rng_seed: None,
        }
    }
}

impl GameConfig {
    /// Checks limits are positive.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first offending parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("turn_time_limit", self.turn_time_limit)?;
        positive("target_laps", f64::from(self.target_laps))?;
        positive("max_arrow_length", f64::from(self.max_arrow_length))?;
        positive("off_track_arrow_length", f64::from(self.off_track_arrow_length))?;
        Ok(())
    }
}

fn positive(parameter: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { parameter, value })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(TrackConfig::default().validate().is_ok());
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_payload_fills_defaults() {
        let cfg: GameConfig = serde_json::from_str(r#"{ "target_laps": 3, "rng_seed": 7 }"#).unwrap();
        assert_eq!(cfg.target_laps, 3);
        assert_eq!(cfg.rng_seed, Some(7));
        assert_eq!(cfg.max_arrow_length, 6);

        let track: TrackConfig = serde_json::from_str(
            r#"{ "cell_size": 10.0, "area": { "left": 0, "top": 0, "right": 8, "bottom": 8 } }"#,
        )
        .unwrap();
        assert_eq!(track.partition_cell_span, 5);
        assert_eq!(track.area.right, 8);
    }

    #[test]
    fn rejects_bad_values() {
        let cfg = GameConfig {
            target_laps: 0,
            ..GameConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::NotPositive {
                parameter: "target_laps",
                value: 0.0
            })
        );

        let track = TrackConfig {
            area: AreaBounds {
                left: 5,
                top: 0,
                right: 5,
                bottom: 3,
            },
            ..TrackConfig::default()
        };
        assert!(matches!(track.validate(), Err(ConfigError::EmptyArea { .. })));
    }
}
