use clap::{Parser, Subcommand};
use rf_core::units::constants::{STANDARD_ATMOSPHERE_PA, specific_gas_constant};
use rf_system::reference::lox_lh2_25kn;
use rf_system::{
    ConfigError, ConfigResult, PropulsionAssembly, build_assembly, load_engine,
    required_chamber_pressure, required_pump_gain,
};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "rf-cli")]
#[command(about = "RocketFlow CLI - Liquid rocket engine performance calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve and summarise the built-in 25 kN LOX/LH2 engine
    Reference {
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Solve and summarise an engine definition
    Run {
        /// Path to the engine YAML file
        engine_path: PathBuf,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate an engine definition and run its acceptance checks
    Check {
        /// Path to the engine YAML file
        engine_path: PathBuf,
    },
    /// Chamber pressure (and optionally pump gain) needed for a target Isp
    Invert {
        /// Target specific impulse in seconds
        #[arg(long)]
        isp: f64,
        /// Nozzle exit pressure in Pa
        #[arg(long, default_value_t = STANDARD_ATMOSPHERE_PA)]
        exit_pressure: f64,
        /// Ratio of specific heats of the combustion products
        #[arg(long, default_value_t = 1.2)]
        gamma: f64,
        /// Product molecular mass in kg/kmol
        #[arg(long, default_value_t = 18.0)]
        molecular_mass: f64,
        /// Chamber temperature in K
        #[arg(long, default_value_t = 3400.0)]
        chamber_temperature: f64,
        /// Tank pressure in Pa; when given, also report the pump gain needed
        #[arg(long)]
        tank_pressure: Option<f64>,
        /// Feed and injector pressure losses in Pa
        #[arg(long, default_value_t = 0.0)]
        losses: f64,
    },
}

fn main() -> ConfigResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Reference { json } => {
            let mut engine = lox_lh2_25kn()?;
            print_summary(&mut engine, json)
        }
        Commands::Run { engine_path, json } => cmd_run(&engine_path, json),
        Commands::Check { engine_path } => cmd_check(&engine_path),
        Commands::Invert {
            isp,
            exit_pressure,
            gamma,
            molecular_mass,
            chamber_temperature,
            tank_pressure,
            losses,
        } => cmd_invert(
            isp,
            exit_pressure,
            gamma,
            molecular_mass,
            chamber_temperature,
            tank_pressure,
            losses,
        ),
    }
}

fn print_summary(engine: &mut PropulsionAssembly, json: bool) -> ConfigResult<()> {
    let summary = engine.summary();
    if json {
        println!("{}", summary.to_json()?);
    } else {
        print!("{summary}");
    }
    Ok(())
}

fn cmd_run(engine_path: &Path, json: bool) -> ConfigResult<()> {
    let def = load_engine(engine_path)?;
    info!(engine = %def.name, path = %engine_path.display(), "loaded engine definition");
    let mut engine = build_assembly(&def)?;
    print_summary(&mut engine, json)
}

fn cmd_check(engine_path: &Path) -> ConfigResult<()> {
    println!("Checking engine: {}", engine_path.display());
    let def = load_engine(engine_path)?;
    let mut engine = build_assembly(&def)?;
    println!("✓ Engine definition is valid ({} components)", engine.len());

    let report = engine.validate_constraints();
    println!("Constraints Passed: {}/{}", report.passed(), report.total());
    for result in report.iter() {
        let mark = if result.passed { "✓" } else { "✗" };
        println!("  {mark} {}", result.check);
    }
    Ok(())
}

fn cmd_invert(
    isp: f64,
    exit_pressure: f64,
    gamma: f64,
    molecular_mass: f64,
    chamber_temperature: f64,
    tank_pressure: Option<f64>,
    losses: f64,
) -> ConfigResult<()> {
    let gas_constant = specific_gas_constant(molecular_mass).ok_or_else(|| {
        ConfigError::InvalidValue {
            field: "molecular_mass".to_string(),
            value: molecular_mass,
            reason: "must be positive".to_string(),
        }
    })?;

    println!("Target Isp: {isp:.1} s");
    let pc =
        required_chamber_pressure(isp, exit_pressure, gamma, gas_constant, chamber_temperature)?;
    println!("Required chamber pressure: {:.2} MPa", pc / 1e6);

    if let Some(tank) = tank_pressure {
        let gain = required_pump_gain(pc, tank, losses);
        println!("Required pump gain: {:.2} MPa", gain / 1e6);
    }
    Ok(())
}
