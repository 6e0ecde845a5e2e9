//! # Twine Gas Dynamics
//!
//! Quasi-one-dimensional compressible flow through variable-area ducts, built
//! for supersonic wind-tunnel design and usable as
//! [Twine](https://github.com/isentropic-dev/twine) models.
//!
//! A wind tunnel is modeled as a converging-diverging nozzle, optionally
//! followed by a constant-area test section and a second-throat diffuser.
//! For a given geometry and set of boundary conditions the crate classifies
//! the operating regime (subsonic, choked, shock-containing, over-, fully-, or
//! under-expanded) and evaluates Mach number, pressure, temperature, and
//! density along the duct axis.
//!
//! ## Crate layout
//!
//! - [`models`]: Duct models and their [`twine_core::Model`] adapters.
//! - [`support`]: Gas relations, root finding, and supporting utilities.
//!
//! ## Assumptions
//!
//! Results are valid for a calorically perfect ideal gas in steady, inviscid,
//! one-dimensional flow that is isentropic everywhere except across discrete
//! normal shocks. Boundary layers, real-gas effects, and transients are
//! neither modeled nor detected.
//!
//! ## Example
//!
//! ```
//! use twine_gasdynamics::models::duct::{Nozzle, NozzleDesign, WorkingCondition};
//! use uom::si::{
//!     area::square_meter,
//!     f64::{Area, Length, Pressure, ThermodynamicTemperature},
//!     length::meter,
//!     pressure::pascal,
//!     thermodynamic_temperature::kelvin,
//! };
//!
//! let nozzle = Nozzle::new(NozzleDesign {
//!     design_mach: 2.4,
//!     test_section_area: Area::new::<square_meter>(0.24),
//!     total_pressure: Pressure::new::<pascal>(1.0e6),
//!     total_temperature: ThermodynamicTemperature::new::<kelvin>(300.0),
//!     inlet_area: Area::new::<square_meter>(10.0),
//!     convergent_length: Length::new::<meter>(5.0),
//!     divergent_length: Length::new::<meter>(5.0),
//!     span: Length::new::<meter>(1.0),
//!     back_pressure: Pressure::new::<pascal>(0.7e6),
//! })
//! .unwrap();
//!
//! assert_eq!(nozzle.working_condition().unwrap(), WorkingCondition::ShockInDivergent);
//! let exit_mach = nozzle.x_to_mach(Length::new::<meter>(10.0)).unwrap();
//! assert!(exit_mach < 1.0);
//! ```

pub mod models;
pub mod support;
