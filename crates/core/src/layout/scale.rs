use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ScaleError {
    #[error("year bounds must be finite, got {start}..{end}")]
    NonFiniteBounds { start: f64, end: f64 },
    #[error("start year {start} must be before end year {end}")]
    EmptyRange { start: f64, end: f64 },
    #[error("container width must be positive and finite, got {0}")]
    InvalidWidth(f64),
    #[error("zoom must be positive and finite, got {0}")]
    InvalidZoom(f64),
    #[error("zoom limits must be positive, finite and ordered, got {min}..{max}")]
    InvalidZoomPolicy { min: f64, max: f64 },
}

/// Linear mapping from calendar year to horizontal pixel position.
///
/// At zoom 1 the range `start_year..=end_year` spans exactly
/// `container_width` pixels. Zoom multiplies the total width, and with it
/// every pixel distance. The year bounds and base width are fixed for the
/// life of the scale; zoom is the only thing that changes.
///
/// The scale itself never clamps zoom. Bounds on how far a user may zoom
/// are a front-end choice, see [`ZoomPolicy`].
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineScale {
    start_year: f64,
    end_year: f64,
    container_width: f64,
    zoom: f64,
}

impl TimelineScale {
    pub fn new(start_year: f64, end_year: f64, container_width: f64) -> Result<Self, ScaleError> {
        if !start_year.is_finite() || !end_year.is_finite() {
            return Err(ScaleError::NonFiniteBounds {
                start: start_year,
                end: end_year,
            });
        }
        if start_year >= end_year {
            return Err(ScaleError::EmptyRange {
                start: start_year,
                end: end_year,
            });
        }
        if !(container_width.is_finite() && container_width > 0.0) {
            return Err(ScaleError::InvalidWidth(container_width));
        }
        Ok(Self {
            start_year,
            end_year,
            container_width,
            zoom: 1.0,
        })
    }

    pub fn start_year(&self) -> f64 {
        self.start_year
    }

    pub fn end_year(&self) -> f64 {
        self.end_year
    }

    pub fn container_width(&self) -> f64 {
        self.container_width
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Width of the whole timeline at the current zoom.
    pub fn total_width(&self) -> f64 {
        self.container_width * self.zoom
    }

    pub fn pixels_per_year(&self) -> f64 {
        self.total_width() / (self.end_year - self.start_year)
    }

    pub fn year_to_pixel(&self, year: f64) -> f64 {
        (year - self.start_year) * self.pixels_per_year()
    }

    pub fn pixel_to_year(&self, px: f64) -> f64 {
        px / self.pixels_per_year() + self.start_year
    }

    /// Replace the zoom factor. Non-positive or non-finite values are
    /// rejected and the current zoom is kept.
    pub fn set_zoom(&mut self, zoom: f64) -> Result<(), ScaleError> {
        if !(zoom.is_finite() && zoom > 0.0) {
            return Err(ScaleError::InvalidZoom(zoom));
        }
        self.zoom = zoom;
        Ok(())
    }

    /// Replace the zoom factor with a function of the current one, e.g.
    /// `scale.update_zoom(|z| policy.clamp(z * 1.1))`.
    pub fn update_zoom(&mut self, update: impl FnOnce(f64) -> f64) -> Result<(), ScaleError> {
        self.set_zoom(update(self.zoom))
    }
}

/// Zoom limits a front end applies before handing a value to the scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomPolicy {
    pub min: f64,
    pub max: f64,
}

impl Default for ZoomPolicy {
    fn default() -> Self {
        Self { min: 0.5, max: 10.0 }
    }
}

impl ZoomPolicy {
    const WHEEL_IN: f64 = 1.1;
    const WHEEL_OUT: f64 = 0.9;

    /// Check the limits before use. A policy read from a config file may be
    /// inverted or hold non-finite values.
    pub fn validate(&self) -> Result<(), ScaleError> {
        let usable = |v: f64| v.is_finite() && v > 0.0;
        if usable(self.min) && usable(self.max) && self.min <= self.max {
            Ok(())
        } else {
            Err(ScaleError::InvalidZoomPolicy {
                min: self.min,
                max: self.max,
            })
        }
    }

    /// Bring `zoom` within the limits. Never panics: with inverted limits
    /// `max` wins, a NaN limit is ignored, and a NaN zoom lands on `min`.
    pub fn clamp(&self, zoom: f64) -> f64 {
        zoom.max(self.min).min(self.max)
    }

    /// Zoom after one wheel notch: scrolling down (`delta_y > 0`) zooms out
    /// by 10%, anything else zooms in by 10%.
    pub fn wheel_step(&self, zoom: f64, delta_y: f64) -> f64 {
        let factor = if delta_y > 0.0 {
            Self::WHEEL_OUT
        } else {
            Self::WHEEL_IN
        };
        self.clamp(zoom * factor)
    }
}
