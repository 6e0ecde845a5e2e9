use uom::si::{
    area::square_meter,
    f64::{Area, Length},
    length::meter,
    ratio::ratio,
};

use crate::support::root::{RootConfig, find_root};

use super::error::{DuctError, check_positive};

/// Which side of the throat an area lookup should search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Convergent,
    Divergent,
}

/// A point on the wall outline: axial position and signed half-height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallPoint {
    pub x: Length,
    pub y: Length,
}

/// Closes an upper wall outline into a polygon.
///
/// The upper points come first in order, followed by their mirror images on
/// the lower wall in reverse order.
pub(super) fn closed_outline(upper: &[WallPoint]) -> Vec<WallPoint> {
    upper
        .iter()
        .copied()
        .chain(upper.iter().rev().map(|point| WallPoint {
            x: point.x,
            y: -point.y,
        }))
        .collect()
}

/// Plan-view geometry of one converging-diverging segment.
///
/// Area varies linearly from the inlet to the throat over the convergent
/// length, then linearly from the throat to the exit over the divergent
/// length. The duct is two-dimensional with a constant `span`, so the wall
/// half-height at any station is `A / span / 2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentGeometry {
    inlet_area: Area,
    throat_area: Area,
    exit_area: Area,
    convergent_length: Length,
    divergent_length: Length,
    span: Length,
}

impl SegmentGeometry {
    /// Creates a segment geometry.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError::InvalidParameter`] if any dimension is not
    /// strictly positive.
    pub fn new(
        inlet_area: Area,
        throat_area: Area,
        exit_area: Area,
        convergent_length: Length,
        divergent_length: Length,
        span: Length,
    ) -> Result<Self, DuctError> {
        Ok(Self {
            inlet_area: check_positive("inlet area", inlet_area)?,
            throat_area: check_positive("throat area", throat_area)?,
            exit_area: check_positive("exit area", exit_area)?,
            convergent_length: check_positive("convergent length", convergent_length)?,
            divergent_length: check_positive("divergent length", divergent_length)?,
            span: check_positive("span", span)?,
        })
    }

    #[must_use]
    pub fn inlet_area(&self) -> Area {
        self.inlet_area
    }

    #[must_use]
    pub fn throat_area(&self) -> Area {
        self.throat_area
    }

    #[must_use]
    pub fn exit_area(&self) -> Area {
        self.exit_area
    }

    #[must_use]
    pub fn convergent_length(&self) -> Length {
        self.convergent_length
    }

    #[must_use]
    pub fn divergent_length(&self) -> Length {
        self.divergent_length
    }

    #[must_use]
    pub fn span(&self) -> Length {
        self.span
    }

    /// Total axial length of the segment.
    #[must_use]
    pub fn length(&self) -> Length {
        self.convergent_length + self.divergent_length
    }

    /// Returns `true` if `x` lies upstream of the throat.
    #[must_use]
    pub fn is_convergent(&self, x: Length) -> bool {
        x < self.convergent_length
    }

    /// Cross-sectional area at `x`.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError::OutOfRange`] if `x` is outside `[0, length]`.
    pub fn area(&self, x: Length) -> Result<Area, DuctError> {
        let x = self.check_position(x)?;
        Ok(self.area_unchecked(x))
    }

    /// Wall half-height at `x`.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError::OutOfRange`] if `x` is outside `[0, length]`.
    pub fn half_height(&self, x: Length) -> Result<Length, DuctError> {
        Ok(self.half_height_of(self.area(x)?))
    }

    /// Largest cross-section of the segment.
    #[must_use]
    pub fn max_area(&self) -> Area {
        let ends = if self.inlet_area > self.exit_area {
            self.inlet_area
        } else {
            self.exit_area
        };
        if ends > self.throat_area {
            ends
        } else {
            self.throat_area
        }
    }

    /// Axial position on the given side of the throat where the area equals `area`.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError::RootFinding`] if the area does not occur on that side.
    pub fn position_from_area(
        &self,
        area: Area,
        side: Side,
        solver: &RootConfig,
    ) -> Result<Length, DuctError> {
        let throat = self.convergent_length.get::<meter>();
        let bracket = match side {
            Side::Convergent => [0.0, throat],
            Side::Divergent => [throat, self.length().get::<meter>()],
        };
        let target = area.get::<square_meter>();

        let x = find_root(
            |x| self.area_unchecked(Length::new::<meter>(x)).get::<square_meter>() - target,
            bracket,
            solver,
        )
        .map_err(|err| DuctError::RootFinding {
            context: "area lookup",
            source: err.into(),
        })?;

        Ok(Length::new::<meter>(x))
    }

    /// Upper wall points at the inlet, throat, and exit, in local coordinates.
    #[must_use]
    pub fn breakpoints(&self) -> [WallPoint; 3] {
        [
            WallPoint {
                x: Length::new::<meter>(0.0),
                y: self.half_height_of(self.inlet_area),
            },
            WallPoint {
                x: self.convergent_length,
                y: self.half_height_of(self.throat_area),
            },
            WallPoint {
                x: self.length(),
                y: self.half_height_of(self.exit_area),
            },
        ]
    }

    pub(super) fn half_height_of(&self, area: Area) -> Length {
        area / self.span / 2.0
    }

    pub(super) fn check_position(&self, x: Length) -> Result<Length, DuctError> {
        let length = self.length();
        if x.get::<meter>() >= 0.0 && x <= length {
            Ok(x)
        } else {
            Err(DuctError::OutOfRange {
                position: x,
                length,
            })
        }
    }

    fn area_unchecked(&self, x: Length) -> Area {
        if x <= self.convergent_length {
            let t = (x / self.convergent_length).get::<ratio>();
            self.inlet_area * (1.0 - t) + self.throat_area * t
        } else {
            let t = ((x - self.convergent_length) / self.divergent_length).get::<ratio>();
            self.throat_area * (1.0 - t) + self.exit_area * t
        }
    }
}
