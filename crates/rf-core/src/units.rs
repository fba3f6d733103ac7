// rf-core/src/units.rs

use uom::si::f64::{
    Area as UomArea, Mass as UomMass, MassDensity as UomMassDensity, MassRate as UomMassRate,
    Power as UomPower, Pressure as UomPressure,
    ThermodynamicTemperature as UomThermodynamicTemperature, Volume as UomVolume,
};

// Public canonical unit types (SI, f64)
pub type Area = UomArea;
pub type Density = UomMassDensity;
pub type Mass = UomMass;
pub type MassRate = UomMassRate;
pub type Power = UomPower;
pub type Pressure = UomPressure;
pub type Temperature = UomThermodynamicTemperature;
pub type Volume = UomVolume;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn mpa(v: f64) -> Pressure {
    use uom::si::pressure::megapascal;
    Pressure::new::<megapascal>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn kgps(v: f64) -> MassRate {
    use uom::si::mass_rate::kilogram_per_second;
    MassRate::new::<kilogram_per_second>(v)
}

#[inline]
pub fn kg(v: f64) -> Mass {
    use uom::si::mass::kilogram;
    Mass::new::<kilogram>(v)
}

#[inline]
pub fn m2(v: f64) -> Area {
    use uom::si::area::square_meter;
    Area::new::<square_meter>(v)
}

#[inline]
pub fn m3(v: f64) -> Volume {
    use uom::si::volume::cubic_meter;
    Volume::new::<cubic_meter>(v)
}

#[inline]
pub fn kgpm3(v: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}

#[inline]
pub fn watts(v: f64) -> Power {
    use uom::si::power::watt;
    Power::new::<watt>(v)
}

pub mod constants {
    /// Standard gravity (m/s²).
    pub const G0_MPS2: f64 = 9.806_65;

    /// Universal gas constant in J/(kmol·K), paired with molecular masses in kg/kmol.
    pub const UNIVERSAL_GAS_CONSTANT: f64 = 8_314.5;

    /// Sea-level standard atmosphere (Pa).
    pub const STANDARD_ATMOSPHERE_PA: f64 = 101_325.0;

    /// Specific gas constant R = Ru / M in J/(kg·K). `None` unless M is positive.
    #[inline]
    pub fn specific_gas_constant(molecular_mass: f64) -> Option<f64> {
        (molecular_mass > 0.0 && molecular_mass.is_finite())
            .then(|| UNIVERSAL_GAS_CONSTANT / molecular_mass)
    }
}
