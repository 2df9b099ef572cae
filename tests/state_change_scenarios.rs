// End-to-end heating/cooling scenarios on the public API
// Each test narrates what it drives so a failing run reads like a lab log

use approx::assert_abs_diff_eq;
use more_asserts::{assert_ge, assert_le};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use state_change_sim::energy_resolver::{ClampMode, EnergyBounds, PhaseThresholds, Saturation};
use state_change_sim::sim::{SaturationPolicy, SimCommand, SimProps, Simulation};
use state_change_sim::{
    determine_state, energy_at_temperature, temperature_at_energy, Direction, Phase, SubstanceTable,
};

fn water_sim(tick_interval_ms: u64, heating_rate: f64) -> Simulation {
    let mut props = SimProps::new("water");
    props.config.tick_interval_ms = tick_interval_ms;
    props.heating_rate = heating_rate;
    Simulation::new(props).unwrap()
}

#[test]
fn test_ten_seconds_of_heating_water() {
    println!("🔥 Heating 100 g of water at 500 W in 1 s ticks");

    let mut sim = water_sim(1000, 500.0);
    assert_abs_diff_eq!(sim.state().energy(), 41715.0, epsilon = 1e-6);
    sim.apply(SimCommand::SetDirection(Direction::Heating)).unwrap();

    let first = sim.tick();
    println!("   tick 1: {:.3} °C, {}, {:.1} J", first.temperature, first.phase, first.energy);
    assert_abs_diff_eq!(first.energy, 42215.0, epsilon = 1e-6);
    assert_abs_diff_eq!(first.temperature, (42215.0 - 33355.0) / 418.0, epsilon = 1e-6);
    assert_eq!(first.phase, Phase::Liquid);

    for _ in 1..10 {
        sim.tick();
    }
    let last = sim.snapshot();
    println!("   tick 10: {:.3} °C, {}, {:.1} J", last.temperature, last.phase, last.energy);
    assert_abs_diff_eq!(last.energy, 41715.0 + 5000.0, epsilon = 1e-6);
    assert_abs_diff_eq!(last.temperature, 20.0 + 5000.0 / 418.0, epsilon = 1e-6);
}

#[test]
fn test_round_trip_outside_plateaus() {
    println!("🔁 Sampling temperatures on every sloped band of every substance");

    let mut rng = StdRng::seed_from_u64(7);
    for (key, props) in SubstanceTable::builtin().unwrap().iter() {
        let mp = props.melting_point;
        let bp = props.boiling_point;
        for _ in 0..200 {
            let mass = rng.random_range(0.5..500.0);
            let temp = match rng.random_range(0..3) {
                0 => rng.random_range(mp - 200.0..mp),
                1 => rng.random_range(mp + 1e-3..bp),
                _ => rng.random_range(bp + 1e-3..bp + 800.0),
            };
            let energy = energy_at_temperature(temp, mass, props);
            let back = temperature_at_energy(energy, mass, props);
            assert_abs_diff_eq!(back, temp, epsilon = 1e-6);
        }
        println!("   ✅ {}", key);
    }
}

#[test]
fn test_phase_is_monotonic_in_energy() {
    println!("📈 Phase never steps backwards as energy rises");

    for (key, props) in SubstanceTable::builtin().unwrap().iter() {
        let mass = 100.0;
        let bounds = EnergyBounds::new(mass, props, ClampMode::PhaseSpan);
        let steps = 5000;
        let mut previous = Phase::Solid;
        let mut seen = Vec::new();

        for i in 0..=steps {
            let energy = bounds.min_energy + (bounds.max_energy - bounds.min_energy) * i as f64 / steps as f64;
            let temp = temperature_at_energy(energy, mass, props);
            let phase = determine_state(temp, energy, mass, props);
            assert_ge!(phase, previous, "{} went {:?} -> {:?} at {} J", key, previous, phase, energy);
            if seen.last() != Some(&phase) {
                seen.push(phase);
            }
            previous = phase;
        }

        println!("   {}: {:?}", key, seen);
        assert_eq!(seen, vec![Phase::Solid, Phase::Melting, Phase::Liquid, Phase::Boiling, Phase::Gas]);
    }
}

#[test]
fn test_temperature_is_monotonic_in_energy() {
    let props = SubstanceTable::builtin().unwrap().get("ethanol").unwrap();
    let bounds = EnergyBounds::new(50.0, &props, ClampMode::PhaseSpan);
    let mut previous = f64::NEG_INFINITY;
    for i in 0..=2000 {
        let energy = bounds.min_energy + (bounds.max_energy - bounds.min_energy) * i as f64 / 2000.0;
        let temp = temperature_at_energy(energy, 50.0, &props);
        assert_ge!(temp, previous - 1e-9);
        previous = temp;
    }
}

#[test]
fn test_threshold_edges_for_every_substance() {
    for (key, props) in SubstanceTable::builtin().unwrap().iter() {
        let t = PhaseThresholds::new(100.0, props);
        let below = |e: f64| e - e.abs().max(1.0) * 1e-9;
        let edges = [
            (0.0, Phase::Solid, Phase::Melting),
            (t.melt_end(), Phase::Melting, Phase::Liquid),
            (t.boil_start(), Phase::Liquid, Phase::Boiling),
            (t.boil_end(), Phase::Boiling, Phase::Gas),
        ];
        for (edge, before, after) in edges {
            assert_eq!(t.phase_of(below(edge)), before, "{} just below {}", key, edge);
            assert_eq!(t.phase_of(edge), after, "{} at {}", key, edge);
        }
    }
}

#[test]
fn test_heating_saturates_and_never_exceeds_max() {
    println!("🧱 Driving water into the upper clamp");

    let mut sim = water_sim(1000, 10_000.0);
    sim.heat();
    let max = sim.state().bounds(ClampMode::Reference).max_energy;

    for _ in 0..1000 {
        let snap = sim.tick();
        assert_le!(snap.energy, max);
    }
    assert_eq!(sim.state().energy(), max);
    assert_eq!(sim.state().direction(), Direction::Heating);
    println!("   ✅ saturated at {:.0} J, still heating", max);
}

#[test]
fn test_full_vaporization_with_stop_policy() {
    println!("💨 Boiling water dry with the stop-at-bounds policy");

    let mut props = SimProps::new("water");
    props.heating_rate = 5000.0;
    props.config.tick_interval_ms = 1000;
    props.config.clamp_mode = ClampMode::PhaseSpan;
    props.config.saturation_policy = SaturationPolicy::StopAtBounds;
    let mut sim = Simulation::new(props).unwrap();
    sim.heat();

    sim.run(500);

    let end = sim.snapshot();
    println!("   final {:.1} °C {} after {} ticks", end.temperature, end.phase, end.tick);
    assert_eq!(end.phase, Phase::Gas);
    assert_eq!(end.direction, Direction::Idle);
    assert_abs_diff_eq!(end.temperature, 600.0, epsilon = 1e-6);
}

#[test]
fn test_cool_water_to_ice() {
    println!("🧊 Cooling water from 20 °C through freezing");

    let mut props = SimProps::new("water");
    props.heating_rate = 1000.0;
    props.config.tick_interval_ms = 1000;
    let mut sim = Simulation::new(props).unwrap();
    sim.cool();

    let mut phases = vec![sim.state().phase()];
    for _ in 0..60 {
        let snap = sim.tick();
        if phases.last() != Some(&snap.phase) {
            phases.push(snap.phase);
        }
    }
    assert_eq!(phases, vec![Phase::Liquid, Phase::Melting, Phase::Solid]);
    // 41715 - 60000 = -18285 J of solid sensible heat
    assert_abs_diff_eq!(sim.state().temperature(), -18285.0 / 209.0, epsilon = 1e-6);
}

#[test]
fn test_mass_change_mid_melt() {
    let mut sim = water_sim(1000, 1000.0);
    sim.cool();
    for _ in 0..25 {
        sim.tick();
    }
    // 41715 - 25000 = 16715 J, inside the 33355 J melting plateau
    assert_eq!(sim.state().phase(), Phase::Melting);

    sim.apply(SimCommand::SetMass(50.0)).unwrap();
    assert_eq!(sim.state().phase(), Phase::Melting);
    assert_abs_diff_eq!(sim.state().energy(), 16715.0 / 2.0, epsilon = 1e-6);
    assert_abs_diff_eq!(sim.state().temperature(), 0.0);
}

#[test]
fn test_substance_switch_while_heating() {
    let mut sim = water_sim(1000, 500.0);
    sim.heat();
    sim.run(5);

    sim.apply(SimCommand::SelectSubstance("Mercury".to_string())).unwrap();
    let snap = sim.snapshot();
    assert_eq!(snap.substance, "Mercury");
    assert_abs_diff_eq!(snap.temperature, 20.0, epsilon = 1e-9);
    assert_eq!(snap.phase, Phase::Liquid);

    let next = sim.tick();
    assert_abs_diff_eq!(next.energy, snap.energy + 500.0, epsilon = 1e-6);
}

#[test]
fn test_iron_reference_clamp_on_first_tick() {
    println!("🔩 Iron starts below its reference minimum, so the first tick clamps up");

    let iron = SubstanceTable::builtin().unwrap().get("iron").unwrap();
    let bounds = EnergyBounds::new(100.0, &iron, ClampMode::Reference);
    // 100 g * 0.449 J/(g·°C) * (1538 - 100) °C
    assert_abs_diff_eq!(bounds.min_energy, 64566.2, epsilon = 1e-6);

    let mut props = SimProps::new("iron");
    props.config.tick_interval_ms = 1000;
    let mut sim = Simulation::new(props).unwrap();
    assert_abs_diff_eq!(sim.state().temperature(), 20.0, epsilon = 1e-9);
    assert_eq!(sim.state().phase(), Phase::Solid);
    assert_eq!(sim.snapshot().saturation, Saturation::AtMinimum);

    sim.cool();
    let snap = sim.tick();
    println!("   tick 1: {:.2} °C, {}, {:.1} J", snap.temperature, snap.phase, snap.energy);
    assert_eq!(snap.energy, bounds.min_energy);
    assert_eq!(snap.phase, Phase::Liquid);
    assert_abs_diff_eq!(snap.temperature, 1538.0 + (64566.2 - 24710.0) / 82.0, epsilon = 1e-6);
    assert_eq!(snap.saturation, Saturation::AtMinimum);
    assert_eq!(snap.direction, Direction::Cooling);
}

#[test]
fn test_iron_reference_clamp_with_stop_policy() {
    let mut props = SimProps::new("iron");
    props.config.tick_interval_ms = 1000;
    props.config.saturation_policy = SaturationPolicy::StopAtBounds;

    let mut cooling = Simulation::new(props).unwrap();
    cooling.cool();
    let snap = cooling.tick();
    assert_eq!(snap.saturation, Saturation::AtMinimum);
    assert_eq!(snap.direction, Direction::Idle);
    assert_eq!(snap.phase, Phase::Liquid);

    // heating into the lower bound is not pushing into it, so it keeps going
    let mut props = SimProps::new("iron");
    props.config.tick_interval_ms = 1000;
    props.config.saturation_policy = SaturationPolicy::StopAtBounds;
    let mut heating = Simulation::new(props).unwrap();
    heating.heat();
    let first = heating.tick();
    assert_eq!(first.saturation, Saturation::AtMinimum);
    assert_eq!(first.direction, Direction::Heating);
    let second = heating.tick();
    assert_abs_diff_eq!(second.energy, first.energy + 500.0, epsilon = 1e-6);
    assert_eq!(second.saturation, Saturation::None);
}
