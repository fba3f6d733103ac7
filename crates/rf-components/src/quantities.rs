//! Quantity names shared by components, the assembly and the validation pass.

pub const TANK_PRESSURE: &str = "tank_pressure";
pub const PUMP_PRESSURE_GAIN: &str = "pump_pressure_gain";
pub const PUMP_MASS_FLOW_RATE: &str = "pump_mass_flow_rate";
pub const CHAMBER_PRESSURE: &str = "chamber_pressure";
pub const CHAMBER_TEMPERATURE: &str = "chamber_temperature";
pub const THROAT_AREA: &str = "throat_area";
pub const TOTAL_MASS_FLOW_RATE: &str = "total_mass_flow_rate";
pub const GAMMA: &str = "gamma";
pub const MOLECULAR_MASS: &str = "molecular_mass";
pub const EXIT_PRESSURE: &str = "exit_pressure";
pub const EXIT_AREA: &str = "exit_area";
pub const EXPANSION_RATIO: &str = "expansion_ratio";
pub const EXIT_VELOCITY: &str = "exit_velocity";
pub const THRUST: &str = "thrust";
pub const SPECIFIC_IMPULSE: &str = "specific_impulse";

/// `{component}_mass`, registered for every component with a static mass.
pub fn mass_of(component: &str) -> String {
    format!("{component}_mass")
}
