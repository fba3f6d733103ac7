//! Component contributions against a live pool.

use proptest::prelude::*;
use rf_components::quantities::*;
use rf_components::{Chamber, Contributor, Fuel, Injector, Nozzle, PropellantRole, Pump, Tank, Throat};
use rf_core::units::{k, kg, kgpm3, kgps, m2, mpa, pa};
use rf_pool::{Pool, Resolution};
use rf_solver::NewtonSolver;

fn register(pool: &mut Pool, parts: &[&dyn Contributor]) {
    for part in parts {
        part.declare(pool);
    }
    for part in parts {
        part.evaluate(pool);
    }
}

#[test]
fn chamber_closed_form_at_10_mpa() {
    let chamber = Chamber::new()
        .with_pressure(pa(10e6))
        .with_temperature(k(3400.0))
        .with_mass_flow_rate(kgps(8.4));
    let mut pool = Pool::new();
    register(&mut pool, &[&chamber]);

    let r: f64 = 8314.5 / 18.0;
    let gamma: f64 = 1.2;
    let ve = (2.0 * gamma * r * 3400.0 / (gamma - 1.0)
        * (1.0 - (101_325.0_f64 / 10e6).powf((gamma - 1.0) / gamma)))
    .sqrt();

    assert!((pool.value(EXIT_VELOCITY).unwrap() - ve).abs() < 1e-9);
    assert!((pool.value(THRUST).unwrap() - 8.4 * ve).abs() < 1e-6);
    assert!((pool.value(SPECIFIC_IMPULSE).unwrap() - ve / 9.80665).abs() < 1e-9);
    assert!((ve - 3174.8).abs() < 1.0);

    // Relationships hold for the directly evaluated values
    assert_eq!(pool.solve(&NewtonSolver::default()), Resolution::AlreadyDetermined);
}

#[test]
fn nozzle_exit_pressure_feeds_chamber_evaluation() {
    let nozzle = Nozzle::new().with_exit_pressure(pa(40_000.0));
    let chamber = Chamber::new()
        .with_pressure(pa(10e6))
        .with_temperature(k(3400.0))
        .with_mass_flow_rate(kgps(8.4));

    let mut near_vacuum = Pool::new();
    register(&mut near_vacuum, &[&nozzle, &chamber]);
    let mut sea_level = Pool::new();
    register(&mut sea_level, &[&chamber]);

    assert!(near_vacuum.value(EXIT_VELOCITY).unwrap() > sea_level.value(EXIT_VELOCITY).unwrap());
}

#[test]
fn pressure_only_chamber_stays_incomplete() {
    let chamber = Chamber::new().with_pressure(pa(10e6));
    let mut pool = Pool::new();
    register(&mut pool, &[&chamber]);

    let r = pool.solve(&NewtonSolver::default());
    assert!(r.is_failure());
    for name in [EXIT_VELOCITY, THRUST, SPECIFIC_IMPULSE] {
        assert!(pool.value(name).is_none(), "{name} should stay unknown");
    }
    assert_eq!(pool.value(CHAMBER_PRESSURE), Some(10e6));
}

#[test]
fn feed_system_declares_shared_names() {
    let tank = Tank::new(Fuel::lh2()).with_pressure(mpa(2.0)).with_mass(kg(40.0));
    let fuel_pump = Pump::new(PropellantRole::Fuel)
        .with_pressure_gain(mpa(8.0))
        .with_mass_flow_rate(kgps(1.2))
        .with_efficiency(0.75)
        .with_fluid_density(kgpm3(70.8));
    let ox_pump = Pump::new(PropellantRole::Oxidizer)
        .with_pressure_gain(mpa(9.0))
        .with_mass_flow_rate(kgps(7.2));

    let mut pool = Pool::new();
    register(&mut pool, &[&tank, &fuel_pump, &ox_pump]);

    assert_eq!(pool.value(TANK_PRESSURE), Some(2e6));
    // Last pump wins on the shared names
    assert_eq!(pool.value(PUMP_PRESSURE_GAIN), Some(9e6));
    assert_eq!(pool.value(PUMP_MASS_FLOW_RATE), Some(7.2));
}

#[test]
fn chamber_throat_and_injector_are_validated() {
    let chamber = Chamber::new()
        .with_injector(Injector::new("coaxial").with_efficiency(2.0))
        .with_throat(Throat::new(m2(0.007)));
    assert!(chamber.validate().is_err());
}

proptest! {
    #[test]
    fn direct_evaluation_is_consistent_with_relationships(
        pc in 2e5f64..3e7,
        tc in 500.0f64..4000.0,
        mdot in 0.1f64..500.0,
    ) {
        let chamber = Chamber::new()
            .with_pressure(pa(pc))
            .with_temperature(k(tc))
            .with_mass_flow_rate(kgps(mdot));
        let mut pool = Pool::new();
        register(&mut pool, &[&chamber]);

        let ve = pool.value(EXIT_VELOCITY).unwrap();
        prop_assert!(ve > 0.0);
        let thrust = pool.value(THRUST).unwrap();
        prop_assert!((thrust - mdot * ve).abs() <= 1e-9 * thrust.abs());
        let isp = pool.value(SPECIFIC_IMPULSE).unwrap();
        prop_assert!((isp * 9.80665 - ve).abs() <= 1e-9 * ve);
    }
}
