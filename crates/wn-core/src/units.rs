//! Flow-unit and headloss-formula tables.
//!
//! The solver's input format identifies the unit system and friction
//! formula by fixed tokens; everything downstream (roughness fallbacks,
//! report labels) keys off these two enums.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Flow-rate unit systems accepted by the solver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FlowUnits {
    /// Liters per second
    #[default]
    Lps,
    /// Liters per minute
    Lpm,
    /// US gallons per minute
    Gpm,
    /// Megaliters per day
    Mld,
    /// Million US gallons per day
    Mgd,
    /// Cubic feet per second
    Cfs,
    /// Cubic meters per hour
    Cmh,
    /// Cubic meters per day
    Cmd,
    /// Imperial million gallons per day
    Imgd,
    /// Acre-feet per day
    Afd,
}

impl FlowUnits {
    pub const ALL: [FlowUnits; 10] = [
        FlowUnits::Lps,
        FlowUnits::Lpm,
        FlowUnits::Gpm,
        FlowUnits::Mld,
        FlowUnits::Mgd,
        FlowUnits::Cfs,
        FlowUnits::Cmh,
        FlowUnits::Cmd,
        FlowUnits::Imgd,
        FlowUnits::Afd,
    ];

    /// Token expected by the solver's `[OPTIONS]` section.
    pub fn inp_token(self) -> &'static str {
        match self {
            FlowUnits::Lps => "LPS",
            FlowUnits::Lpm => "LPM",
            FlowUnits::Gpm => "GPM",
            FlowUnits::Mld => "MLD",
            FlowUnits::Mgd => "MGD",
            FlowUnits::Cfs => "CFS",
            FlowUnits::Cmh => "CMH",
            FlowUnits::Cmd => "CMD",
            FlowUnits::Imgd => "IMGD",
            FlowUnits::Afd => "AFD",
        }
    }

    /// Human-readable unit label for reports.
    pub fn label(self) -> &'static str {
        match self {
            FlowUnits::Lps => "L/s",
            FlowUnits::Lpm => "L/min",
            FlowUnits::Gpm => "gpm",
            FlowUnits::Mld => "ML/d",
            FlowUnits::Mgd => "mgd",
            FlowUnits::Cfs => "cfs",
            FlowUnits::Cmh => "m\u{b3}/h",
            FlowUnits::Cmd => "m\u{b3}/d",
            FlowUnits::Imgd => "Imgd",
            FlowUnits::Afd => "afd",
        }
    }

    /// Metric systems pair with mm diameters and meter heads; US systems
    /// with inches and feet.
    pub fn is_metric(self) -> bool {
        matches!(
            self,
            FlowUnits::Lps | FlowUnits::Lpm | FlowUnits::Mld | FlowUnits::Cmh | FlowUnits::Cmd
        )
    }
}

impl fmt::Display for FlowUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.inp_token())
    }
}

/// Friction headloss formula used by the solver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HeadlossFormula {
    #[default]
    HazenWilliams,
    DarcyWeisbach,
    ChezyManning,
}

impl HeadlossFormula {
    pub fn inp_token(self) -> &'static str {
        match self {
            HeadlossFormula::HazenWilliams => "H-W",
            HeadlossFormula::DarcyWeisbach => "D-W",
            HeadlossFormula::ChezyManning => "C-M",
        }
    }

    /// Roughness fallback when a pipe carries none. The coefficient is
    /// dimensionless for Hazen-Williams and Chezy-Manning, millimeters
    /// for Darcy-Weisbach.
    pub fn default_roughness(self) -> f64 {
        match self {
            HeadlossFormula::HazenWilliams => 100.0,
            HeadlossFormula::DarcyWeisbach => 0.1,
            HeadlossFormula::ChezyManning => 0.01,
        }
    }
}

impl fmt::Display for HeadlossFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.inp_token())
    }
}
