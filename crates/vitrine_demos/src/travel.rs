//! Travel-time calculator
//!
//! `T(d, s, f) = (d / s) * f + b`, where `b` is a rest allowance that grows
//! with distance. Inputs come from three sliders and are always clamped and
//! snapped to their slider's step before use.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TravelTimeError {
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },
}

/// Range and granularity of one slider
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliderSpec {
    pub label: &'static str,
    pub unit: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
}

impl SliderSpec {
    pub const DISTANCE: SliderSpec = SliderSpec {
        label: "Distance (km)",
        unit: "km",
        min: 0.0,
        max: 3000.0,
        step: 10.0,
        default: 300.0,
    };

    pub const SPEED: SliderSpec = SliderSpec {
        label: "Speed (kph)",
        unit: "kph",
        min: 40.0,
        max: 120.0,
        step: 5.0,
        default: 60.0,
    };

    pub const TRAFFIC: SliderSpec = SliderSpec {
        label: "Traffic Factor",
        unit: "x",
        min: 1.0,
        max: 4.0,
        step: 0.1,
        default: 1.5,
    };

    /// Clamp into range and round to the nearest step
    pub fn snap(&self, value: f64) -> f64 {
        let clamped = value.clamp(self.min, self.max);
        let steps = ((clamped - self.min) / self.step).round();
        let snapped = (self.min + steps * self.step).min(self.max);
        // Keep 0.1 steps from accumulating binary noise (1.5000000000000002).
        (snapped * 1e6).round() / 1e6
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TravelInputs {
    pub distance_km: f64,
    pub speed_kph: f64,
    pub traffic_factor: f64,
}

impl Default for TravelInputs {
    fn default() -> Self {
        Self {
            distance_km: SliderSpec::DISTANCE.default,
            speed_kph: SliderSpec::SPEED.default,
            traffic_factor: SliderSpec::TRAFFIC.default,
        }
    }
}

impl TravelInputs {
    /// Build inputs from raw slider positions
    pub fn new(distance_km: f64, speed_kph: f64, traffic_factor: f64) -> Result<Self, TravelTimeError> {
        for (field, value) in [
            ("distance", distance_km),
            ("speed", speed_kph),
            ("traffic factor", traffic_factor),
        ] {
            if !value.is_finite() {
                return Err(TravelTimeError::NotFinite { field, value });
            }
        }

        Ok(Self {
            distance_km: SliderSpec::DISTANCE.snap(distance_km),
            speed_kph: SliderSpec::SPEED.snap(speed_kph),
            traffic_factor: SliderSpec::TRAFFIC.snap(traffic_factor),
        })
    }

    /// Rest allowance in hours
    pub fn break_hours(&self) -> f64 {
        let d = self.distance_km;
        if d < 150.0 {
            0.0
        } else if d <= 500.0 {
            0.25
        } else if d <= 1000.0 {
            0.5
        } else {
            d / 300.0
        }
    }

    pub fn total_hours(&self) -> f64 {
        (self.distance_km / self.speed_kph) * self.traffic_factor + self.break_hours()
    }

    pub fn travel_time(&self) -> TravelTime {
        TravelTime::from_hours(self.total_hours())
    }
}

/// Whole hours plus rounded minutes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelTime {
    pub hours: u32,
    pub minutes: u32,
}

impl TravelTime {
    pub fn from_hours(total: f64) -> Self {
        let total = total.max(0.0);
        let mut hours = total.floor() as u32;
        let mut minutes = ((total - total.floor()) * 60.0).round() as u32;
        if minutes == 60 {
            hours += 1;
            minutes = 0;
        }
        Self { hours, minutes }
    }
}

impl fmt::Display for TravelTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {:02}m", self.hours, self.minutes)
    }
}
