//! Resolution procedure behaviour through the public pool API.

use proptest::prelude::*;
use rf_pool::{Pool, Resolution};
use rf_solver::{Equation, NewtonSolver};

fn backend() -> NewtonSolver {
    NewtonSolver::default()
}

#[test]
fn contradictory_relations_leave_known_values_intact() {
    let mut pool = Pool::new();
    pool.set("chamber_pressure", 10e6);
    pool.set("tank_pressure", 2e6);
    let x = pool.quantity("thrust");
    pool.relate(Equation::new(x.clone(), 25_000.0));
    pool.relate(Equation::new(x, 30_000.0));

    let before = pool.known().clone();
    let r = pool.solve(&backend());

    assert!(r.is_failure(), "{r:?}");
    assert_eq!(pool.known(), &before);
    assert_eq!(pool.value("thrust"), None);
}

#[test]
fn underdetermined_relations_leave_unknowns_absent() {
    let mut pool = Pool::new();
    pool.set("chamber_pressure", 10e6);
    let thrust = pool.quantity("thrust");
    let mdot = pool.quantity("total_mass_flow_rate");
    let ve = pool.quantity("exit_velocity");
    pool.relate(Equation::new(thrust, mdot * ve));

    let r = pool.solve(&backend());

    assert!(matches!(r, Resolution::Failed { .. }), "{r:?}");
    assert_eq!(pool.known().len(), 1);
}

#[test]
fn single_pass_does_not_chain_into_dependent_relations() {
    // b depends on a through one relation; both are free and solved jointly.
    let mut pool = Pool::new();
    let a = pool.quantity("a");
    let b = pool.quantity("b");
    pool.relate(Equation::new(a.clone(), 2.0));
    pool.relate(Equation::new(b, a * 3.0));

    let r = pool.solve(&backend());
    assert_eq!(
        r,
        Resolution::Solved {
            assigned: vec!["a".to_owned(), "b".to_owned()]
        }
    );
    assert!((pool.value("b").unwrap() - 6.0).abs() < 1e-12);
}

#[test]
fn unrelated_unknowns_stay_unknown() {
    let mut pool = Pool::new();
    pool.quantity("specific_impulse");
    pool.set("chamber_pressure", 10e6);

    assert_eq!(pool.solve(&backend()), Resolution::AlreadyDetermined);
    assert_eq!(pool.value("specific_impulse"), None);
    assert_eq!(pool.registry().unknown_names().collect::<Vec<_>>(), vec!["specific_impulse"]);
}

proptest! {
    #[test]
    fn last_declaration_wins(values in prop::collection::vec(-1.0e7_f64..1.0e7, 1..8)) {
        let mut pool = Pool::new();
        for v in &values {
            pool.set("pump_pressure_gain", *v);
        }
        prop_assert_eq!(pool.value("pump_pressure_gain"), values.last().copied());
        prop_assert_eq!(pool.registry().len(), 1);
    }

    #[test]
    fn duplicate_relations_do_not_change_the_solution(copies in 1_usize..5, target in 1.0_f64..1.0e5) {
        let mut pool = Pool::new();
        for _ in 0..copies {
            let ve = pool.quantity("exit_velocity");
            let isp = pool.quantity("specific_impulse");
            pool.relate(Equation::new(isp * 9.80665, ve));
        }
        pool.set("exit_velocity", target);
        pool.solve(&backend());
        let isp = pool.value("specific_impulse").unwrap();
        prop_assert!((isp - target / 9.80665).abs() <= 1e-9 * (1.0 + isp));
    }
}

