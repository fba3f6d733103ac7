//! Reference engines.

use crate::assembly::PropulsionAssembly;
use crate::error::SystemResult;
use rf_components::{Chamber, Fuel, Injector, Nozzle, PropellantRole, Pump, Tank, Throat};
use rf_core::units::{k, kg, kgps, m2, m3, mpa, pa};

/// Pump-fed 25 kN LOX/LH2 engine, O/F 6 at 8.4 kg/s.
pub fn lox_lh2_25kn() -> SystemResult<PropulsionAssembly> {
    let oxidizer = Fuel::lox();
    let fuel = Fuel::lh2();
    let fuel_density = fuel.props.density;
    let oxidizer_density = oxidizer.props.density;

    let fuel_tank = Tank::new(fuel)
        .with_mass(kg(40.0))
        .with_volume(m3(0.4))
        .with_pressure(mpa(2.0));
    let oxidizer_tank = Tank::new(oxidizer)
        .with_mass(kg(60.0))
        .with_volume(m3(0.2))
        .with_pressure(mpa(2.0));

    let fuel_pump = Pump {
        fluid_density: fuel_density,
        ..Pump::new(PropellantRole::Fuel)
            .with_mass(kg(12.0))
            .with_pressure_gain(mpa(8.0))
            .with_efficiency(0.75)
            .with_mass_flow_rate(kgps(1.2))
    };
    let oxidizer_pump = Pump {
        fluid_density: oxidizer_density,
        ..Pump::new(PropellantRole::Oxidizer)
            .with_mass(kg(15.0))
            .with_pressure_gain(mpa(8.0))
            .with_efficiency(0.75)
            .with_mass_flow_rate(kgps(7.2))
    };

    let chamber = Chamber::new()
        .with_injector(
            Injector::new("coaxial")
                .with_efficiency(0.95)
                .with_pressure_loss(mpa(0.5)),
        )
        .with_throat(Throat::new(m2(0.007)))
        .with_pressure(mpa(10.0))
        .with_temperature(k(3400.0))
        .with_mass_flow_rate(kgps(8.4))
        .with_mass(kg(80.0));

    let nozzle = Nozzle::new()
        .with_expansion_ratio(25.0)
        .with_exit_pressure(pa(101_325.0))
        .with_throat_area(m2(0.007))
        .with_exit_area(m2(0.175))
        .with_mass(kg(60.0));

    let mut engine = PropulsionAssembly::new("lox_lh2_25kn");
    engine.add_component("fuel_tank", fuel_tank)?;
    engine.add_component("oxidizer_tank", oxidizer_tank)?;
    engine.add_component("fuel_pump", fuel_pump)?;
    engine.add_component("oxidizer_pump", oxidizer_pump)?;
    engine.add_component("chamber", chamber)?;
    engine.add_component("nozzle", nozzle)?;
    Ok(engine)
}
