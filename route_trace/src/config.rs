use anyhow::Result;
use serde::{Deserialize, Serialize};

use geom::Angle;

/// Tunable policy for capturing and measuring a trace. Every field has a default, so a config
/// file only needs to mention what it overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Junctions between strokes sharper than this get smoothed before measuring.
    pub min_junction_angle_degs: f64,
    /// Does measuring consume the raw trace, or leave it around to keep drawing?
    pub clear_trace_on_measure: bool,
    /// A fraction added on top of the measured distance when labeling it. 0.1 means 1.1x.
    pub distance_padding: f64,
    pub zoom: ZoomConfig,
    pub arrow: ArrowConfig,
    pub no_network: NoNetworkPolicy,
}

impl Default for TraceConfig {
    fn default() -> TraceConfig {
        TraceConfig {
            min_junction_angle_degs: 90.0,
            clear_trace_on_measure: false,
            distance_padding: 0.0,
            zoom: ZoomConfig::default(),
            arrow: ArrowConfig::default(),
            no_network: NoNetworkPolicy::RetryOrQuit,
        }
    }
}

impl TraceConfig {
    pub fn load(path: &str) -> Result<TraceConfig> {
        let config: TraceConfig = traceutil::read_json(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=180.0).contains(&self.min_junction_angle_degs) {
            bail!(
                "min_junction_angle_degs must be in [0, 180], not {}",
                self.min_junction_angle_degs
            );
        }
        if !self.distance_padding.is_finite() || self.distance_padding < 0.0 {
            bail!(
                "distance_padding must be a non-negative fraction, not {}",
                self.distance_padding
            );
        }
        self.zoom.validate()?;
        self.arrow.validate()?;
        Ok(())
    }

    pub fn min_junction_angle(&self) -> Angle {
        Angle::degrees(self.min_junction_angle_degs)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    pub default_zoom: i32,
    /// Exclusive
    pub min_zoom: i32,
    /// Exclusive
    pub max_zoom: i32,
}

impl Default for ZoomConfig {
    fn default() -> ZoomConfig {
        ZoomConfig {
            default_zoom: 11,
            min_zoom: 1,
            max_zoom: 18,
        }
    }
}

impl ZoomConfig {
    /// Only levels strictly between the bounds are accepted.
    pub fn allows(&self, zoom: i32) -> bool {
        zoom > self.min_zoom && zoom < self.max_zoom
    }

    fn validate(&self) -> Result<()> {
        if self.min_zoom >= self.max_zoom {
            bail!(
                "min_zoom {} must be below max_zoom {}",
                self.min_zoom,
                self.max_zoom
            );
        }
        if !self.allows(self.default_zoom) {
            bail!(
                "default_zoom {} isn't strictly between {} and {}",
                self.default_zoom,
                self.min_zoom,
                self.max_zoom
            );
        }
        Ok(())
    }
}

/// Sizes and the slope substitutions used when drawing arrowheads. The sentinels stand in for
/// slopes that would otherwise be infinite.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrowConfig {
    /// Distance in pixels from the tip back to the base of the arrowhead.
    pub size_px: i32,
    /// Replaces the slope of a perfectly vertical stroke. Keeps the stroke's sign.
    pub infinite_slope_sentinel: f64,
    /// Strokes with a slope inside (-threshold, threshold) are treated as flat...
    pub flat_slope_threshold: f64,
    /// ...and get this as the slope of the arrowhead's base.
    pub flat_slope_sentinel: f64,
}

impl Default for ArrowConfig {
    fn default() -> ArrowConfig {
        ArrowConfig {
            size_px: 25,
            infinite_slope_sentinel: 1e5,
            flat_slope_threshold: 0.1,
            flat_slope_sentinel: 1e6,
        }
    }
}

impl ArrowConfig {
    /// Arrowheads scale with the display area, one pixel per 100,000 square pixels.
    pub fn size_for_display(width: u32, height: u32) -> i32 {
        (u64::from(width) * u64::from(height) / 100_000) as i32
    }

    /// Uses `size_for_display` for the arrowhead size.
    pub fn for_display(width: u32, height: u32) -> ArrowConfig {
        ArrowConfig {
            size_px: ArrowConfig::size_for_display(width, height),
            ..Default::default()
        }
    }

    fn validate(&self) -> Result<()> {
        if self.size_px < 0 {
            bail!("arrow size_px can't be negative: {}", self.size_px);
        }
        for (name, value) in [
            ("infinite_slope_sentinel", self.infinite_slope_sentinel),
            ("flat_slope_threshold", self.flat_slope_threshold),
            ("flat_slope_sentinel", self.flat_slope_sentinel),
        ] {
            if !value.is_finite() || value <= 0.0 {
                bail!("arrow {} must be positive and finite, not {}", name, value);
            }
        }
        Ok(())
    }
}

/// What to offer the user when fetching nearby ways fails for lack of a network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoNetworkPolicy {
    RetryOnly,
    RetryOrQuit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoNetworkChoice {
    Retry,
    Quit,
}

impl NoNetworkPolicy {
    pub fn choices(self) -> Vec<NoNetworkChoice> {
        match self {
            NoNetworkPolicy::RetryOnly => vec![NoNetworkChoice::Retry],
            NoNetworkPolicy::RetryOrQuit => vec![NoNetworkChoice::Retry, NoNetworkChoice::Quit],
        }
    }
}
