//! Heats a sample from the 20 °C baseline until it is fully vaporized and
//! prints the heating curve, one row per phase change plus regular samples.
//!
//! Usage: cargo run --example heating_curve -- [substance] [mass_g] [rate_w] [config.json]
//!
//! Set RUST_LOG=info (or debug) to see the simulation log.

use colored::Colorize;
use state_change_sim::energy_resolver::ClampMode;
use state_change_sim::sim::{SimConfig, SimProps, Simulation, ThermalSnapshot};
use state_change_sim::sim_op::{HeatingCurveOp, TemperatureReportingOp};
use state_change_sim::{Phase, SimError, SubstanceTable};
use tracing_subscriber::EnvFilter;

const MAX_TICKS: u64 = 200_000;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    if let Err(err) = run() {
        eprintln!("{} {}", "error:".red().bold(), err);
        std::process::exit(1);
    }
}

fn run() -> Result<(), SimError> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let substance = args.first().map(String::as_str).unwrap_or("water");
    let mass = parse_arg(args.get(1), "mass_g", 100.0)?;
    let rate = parse_arg(args.get(2), "rate_w", 2000.0)?;
    let config = match args.get(3) {
        Some(path) => SimConfig::from_file(path)?,
        None => SimConfig {
            tick_interval_ms: 1000,
            clamp_mode: ClampMode::PhaseSpan,
            ..SimConfig::default()
        },
    };

    let table = SubstanceTable::builtin()?;
    let props = table.get(substance)?;
    println!(
        "🌡️  {} ({}): {:.1} g at {:.0} W, tick {} ms",
        props.name.bold(),
        props.formula,
        mass,
        rate,
        config.tick_interval_ms
    );
    println!(
        "   melts at {:.2} °C, boils at {:.2} °C",
        props.melting_point, props.boiling_point
    );
    println!();

    let mut sim = Simulation::new(SimProps {
        substance: substance.to_string(),
        mass,
        heating_rate: rate,
        config,
        table: None,
        ops: vec![HeatingCurveOp::handle(25), TemperatureReportingOp::handle(10.0)],
    })?;
    sim.heat();
    let ticks = sim.run_until(MAX_TICKS, |s| s.phase == Phase::Gas || s.saturation.is_saturated());

    let curve = sim
        .find_op::<HeatingCurveOp>()
        .ok_or_else(|| SimError::InvalidConfig("heating curve op missing".to_string()))?;

    println!("{:>8} {:>10} {:>9} {:>14}", "tick", "temp(°C)", "phase", "energy(J)");
    println!("{:->8} {:->10} {:->9} {:->14}", "", "", "", "");
    for sample in curve.samples() {
        print_row(sample);
    }

    println!();
    println!("{}", "Phase transitions".bold());
    for t in curve.transitions() {
        println!(
            "   tick {:>6}: {} -> {} at {:.2} °C ({:.0} J)",
            t.tick,
            paint(t.from),
            paint(t.to),
            t.temperature,
            t.energy
        );
    }

    let last = sim.snapshot();
    println!();
    println!(
        "🏁 {} ticks, final {:.2} °C, {}, {:.0} J",
        ticks,
        last.temperature,
        paint(last.phase),
        last.energy
    );
    Ok(())
}

fn parse_arg(arg: Option<&String>, field: &'static str, default: f64) -> Result<f64, SimError> {
    match arg {
        None => Ok(default),
        Some(raw) => raw
            .parse::<f64>()
            .map_err(|_| SimError::InvalidConfig(format!("{} is not a number: '{}'", field, raw))),
    }
}

fn print_row(s: &ThermalSnapshot) {
    println!(
        "{:>8} {:>10.2} {:>9} {:>14.1}",
        s.tick,
        s.temperature,
        paint(s.phase),
        s.energy
    );
}

fn paint(phase: Phase) -> colored::ColoredString {
    let label = phase.label();
    match phase {
        Phase::Solid => label.blue(),
        Phase::Melting => label.cyan(),
        Phase::Liquid => label.green(),
        Phase::Boiling => label.yellow(),
        Phase::Gas => label.red(),
    }
}
