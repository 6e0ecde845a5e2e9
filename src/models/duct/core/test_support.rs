use uom::si::{
    area::square_meter,
    f64::{Area, Length, Pressure, ThermodynamicTemperature},
    length::meter,
    pressure::megapascal,
    thermodynamic_temperature::kelvin,
};

use super::nozzle::NozzleDesign;

pub(super) fn m(value: f64) -> Length {
    Length::new::<meter>(value)
}

pub(super) fn m2(value: f64) -> Area {
    Area::new::<square_meter>(value)
}

/// A Mach 2.4 tunnel nozzle with a 0.24 m² test section.
pub(super) fn design() -> NozzleDesign {
    NozzleDesign {
        design_mach: 2.4,
        test_section_area: m2(0.24),
        total_pressure: Pressure::new::<megapascal>(1.0),
        total_temperature: ThermodynamicTemperature::new::<kelvin>(300.0),
        inlet_area: m2(10.0),
        convergent_length: m(5.0),
        divergent_length: m(5.0),
        span: m(1.0),
        back_pressure: Pressure::new::<megapascal>(0.7),
    }
}
