//! Solver and scorer configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration shared by the packer, refiner and scorer.
///
/// All numeric tolerances are explicit here; no module relies on ambient
/// precision state.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PackConfig {
    /// Interior intersection area above which two placements count as
    /// overlapping. Boundary contact has zero area and is always legal.
    pub tolerance: f64,

    /// Amount by which the lattice interlock constants grow after a
    /// collision is detected during construction.
    pub widen_step: f64,

    /// Maximum number of spec-widening retries before a solve aborts.
    pub max_widen_retries: u32,

    /// Angular step of the coarse global-rotation sweep, in degrees.
    pub coarse_step_deg: f64,

    /// Angular step of the fine sweep around the best coarse angle.
    pub fine_step_deg: f64,

    /// Half-width of the fine sweep window, in degrees.
    pub fine_window_deg: f64,

    /// Rotation applied to a lone shape (N=1) to minimize its own bounding
    /// square. Calibrated for the unit tree shape.
    pub single_shape_angle_deg: f64,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-12,
            widen_step: 1e-3,
            max_widen_retries: 8,
            coarse_step_deg: 1.0,
            fine_step_deg: 0.1,
            fine_window_deg: 1.0,
            single_shape_angle_deg: 44.9,
        }
    }
}

impl PackConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the overlap area tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the spec-widening step.
    pub fn with_widen_step(mut self, step: f64) -> Self {
        self.widen_step = step;
        self
    }

    /// Sets the maximum number of spec-widening retries.
    pub fn with_max_widen_retries(mut self, retries: u32) -> Self {
        self.max_widen_retries = retries;
        self
    }

    /// Sets the coarse rotation sweep step in degrees.
    pub fn with_coarse_step_deg(mut self, step: f64) -> Self {
        self.coarse_step_deg = step;
        self
    }

    /// Sets the fine rotation sweep step in degrees.
    pub fn with_fine_step_deg(mut self, step: f64) -> Self {
        self.fine_step_deg = step;
        self
    }

    /// Sets the fine sweep half-window in degrees.
    pub fn with_fine_window_deg(mut self, window: f64) -> Self {
        self.fine_window_deg = window;
        self
    }

    /// Sets the calibrated single-shape rotation in degrees.
    pub fn with_single_shape_angle_deg(mut self, deg: f64) -> Self {
        self.single_shape_angle_deg = deg;
        self
    }
}
