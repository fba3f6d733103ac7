//! Engine definition files.
//!
//! An engine is a YAML document naming its components in registration order:
//!
//! ```yaml
//! name: lox_lh2_25kn
//! components:
//!   - name: fuel_tank
//!     kind:
//!       type: Tank
//!       propellant: lh2
//!       pressure_pa: 2.0e6
//!       mass_kg: 40.0
//!   - name: fuel_pump
//!     kind:
//!       type: Pump
//!       role: fuel
//!       pressure_gain_pa: 8.0e6
//! overrides:
//!   exit_pressure: 101325.0
//! ```

use crate::assembly::PropulsionAssembly;
use crate::error::{ConfigError, ConfigResult};
use crate::validation::AcceptanceCriteria;
use rf_components::{
    Chamber, CombustionProducts, Component, Fluid, Fuel, Injector, Nozzle, PhysicalProps,
    PropellantRole, Pump, Tank, Throat,
};
use rf_core::units::{k, kg, kgpm3, kgps, m2, m3, pa};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria: Option<AcceptanceCriteria>,
    pub components: Vec<ComponentDef>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub overrides: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentDef {
    pub name: String,
    pub kind: ComponentKindDef,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PropellantDef {
    Lox,
    Lh2,
    Methane,
}

impl PropellantDef {
    pub fn fuel(self) -> Fuel {
        match self {
            PropellantDef::Lox => Fuel::lox(),
            PropellantDef::Lh2 => Fuel::lh2(),
            PropellantDef::Methane => Fuel::methane(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoleDef {
    Fuel,
    Oxidizer,
}

impl From<RoleDef> for PropellantRole {
    fn from(role: RoleDef) -> Self {
        match role {
            RoleDef::Fuel => PropellantRole::Fuel,
            RoleDef::Oxidizer => PropellantRole::Oxidizer,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InjectorDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub efficiency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure_loss_pa: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ComponentKindDef {
    Propellant {
        preset: PropellantDef,
    },
    Fluid {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pressure_pa: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        temperature_k: Option<f64>,
    },
    Tank {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        propellant: Option<PropellantDef>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pressure_pa: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mass_kg: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        volume_m3: Option<f64>,
    },
    Pump {
        role: RoleDef,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pressure_gain_pa: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        efficiency: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mass_flow_kgps: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fluid_density_kgpm3: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mass_kg: Option<f64>,
    },
    Chamber {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pressure_pa: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        temperature_k: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mass_flow_kgps: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        throat_area_m2: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        injector: Option<InjectorDef>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        gamma: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        molecular_mass: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mass_kg: Option<f64>,
    },
    Nozzle {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        expansion_ratio: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        exit_pressure_pa: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        throat_area_m2: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        exit_area_m2: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mass_kg: Option<f64>,
    },
}

fn props(mass_kg: Option<f64>) -> PhysicalProps {
    PhysicalProps {
        mass: mass_kg.map(kg),
        ..Default::default()
    }
}

impl ComponentKindDef {
    /// Every numeric field with its name, for the finiteness check.
    fn numbers(&self) -> Vec<(&'static str, Option<f64>)> {
        match self {
            ComponentKindDef::Propellant { .. } => Vec::new(),
            ComponentKindDef::Fluid {
                pressure_pa,
                temperature_k,
            } => vec![("pressure_pa", *pressure_pa), ("temperature_k", *temperature_k)],
            ComponentKindDef::Tank {
                pressure_pa,
                mass_kg,
                volume_m3,
                ..
            } => vec![
                ("pressure_pa", *pressure_pa),
                ("mass_kg", *mass_kg),
                ("volume_m3", *volume_m3),
            ],
            ComponentKindDef::Pump {
                pressure_gain_pa,
                efficiency,
                mass_flow_kgps,
                fluid_density_kgpm3,
                mass_kg,
                ..
            } => vec![
                ("pressure_gain_pa", *pressure_gain_pa),
                ("efficiency", *efficiency),
                ("mass_flow_kgps", *mass_flow_kgps),
                ("fluid_density_kgpm3", *fluid_density_kgpm3),
                ("mass_kg", *mass_kg),
            ],
            ComponentKindDef::Chamber {
                pressure_pa,
                temperature_k,
                mass_flow_kgps,
                throat_area_m2,
                injector,
                gamma,
                molecular_mass,
                mass_kg,
            } => {
                let injector = injector.clone().unwrap_or_default();
                vec![
                    ("pressure_pa", *pressure_pa),
                    ("temperature_k", *temperature_k),
                    ("mass_flow_kgps", *mass_flow_kgps),
                    ("throat_area_m2", *throat_area_m2),
                    ("injector.efficiency", injector.efficiency),
                    ("injector.pressure_loss_pa", injector.pressure_loss_pa),
                    ("gamma", *gamma),
                    ("molecular_mass", *molecular_mass),
                    ("mass_kg", *mass_kg),
                ]
            }
            ComponentKindDef::Nozzle {
                expansion_ratio,
                exit_pressure_pa,
                throat_area_m2,
                exit_area_m2,
                mass_kg,
            } => vec![
                ("expansion_ratio", *expansion_ratio),
                ("exit_pressure_pa", *exit_pressure_pa),
                ("throat_area_m2", *throat_area_m2),
                ("exit_area_m2", *exit_area_m2),
                ("mass_kg", *mass_kg),
            ],
        }
    }

    /// Build the component. Physical checks happen when it joins an assembly.
    pub fn to_component(&self) -> Component {
        match self {
            ComponentKindDef::Propellant { preset } => preset.fuel().into(),
            ComponentKindDef::Fluid {
                pressure_pa,
                temperature_k,
            } => Fluid {
                props: PhysicalProps::default(),
                pressure: pressure_pa.map(pa),
                temperature: temperature_k.map(k),
            }
            .into(),
            ComponentKindDef::Tank {
                propellant,
                pressure_pa,
                mass_kg,
                volume_m3,
            } => Tank {
                props: PhysicalProps {
                    volume: volume_m3.map(m3),
                    ..props(*mass_kg)
                },
                fuel: propellant.map(PropellantDef::fuel),
                pressure: pressure_pa.map(pa),
            }
            .into(),
            ComponentKindDef::Pump {
                role,
                pressure_gain_pa,
                efficiency,
                mass_flow_kgps,
                fluid_density_kgpm3,
                mass_kg,
            } => Pump {
                props: props(*mass_kg),
                role: Some((*role).into()),
                pressure_gain: pressure_gain_pa.map(pa),
                efficiency: *efficiency,
                mass_flow_rate: mass_flow_kgps.map(kgps),
                fluid_density: fluid_density_kgpm3.map(kgpm3),
            }
            .into(),
            ComponentKindDef::Chamber {
                pressure_pa,
                temperature_k,
                mass_flow_kgps,
                throat_area_m2,
                injector,
                gamma,
                molecular_mass,
                mass_kg,
            } => {
                let products = (gamma.is_some() || molecular_mass.is_some()).then(|| {
                    let defaults = CombustionProducts::default();
                    CombustionProducts {
                        gamma: gamma.unwrap_or(defaults.gamma),
                        molecular_mass: molecular_mass.unwrap_or(defaults.molecular_mass),
                    }
                });
                Chamber {
                    props: props(*mass_kg),
                    injector: injector.as_ref().map(|def| Injector {
                        props: PhysicalProps::default(),
                        efficiency: def.efficiency,
                        pressure_loss: def.pressure_loss_pa.map(pa),
                        design_type: def.design_type.clone(),
                    }),
                    throat: throat_area_m2.map(|a| Throat::new(m2(a))),
                    pressure: pressure_pa.map(pa),
                    temperature: temperature_k.map(k),
                    mass_flow_rate: mass_flow_kgps.map(kgps),
                    products,
                }
                .into()
            }
            ComponentKindDef::Nozzle {
                expansion_ratio,
                exit_pressure_pa,
                throat_area_m2,
                exit_area_m2,
                mass_kg,
            } => Nozzle {
                props: props(*mass_kg),
                expansion_ratio: *expansion_ratio,
                exit_pressure: exit_pressure_pa.map(pa),
                throat_area: throat_area_m2.map(m2),
                exit_area: exit_area_m2.map(m2),
            }
            .into(),
        }
    }
}

/// Structural checks: at least one component, unique names, finite numbers.
pub fn validate_engine(def: &EngineDef) -> ConfigResult<()> {
    if def.components.is_empty() {
        return Err(ConfigError::Empty {
            name: def.name.clone(),
        });
    }

    let mut names = HashSet::new();
    for component in &def.components {
        if !names.insert(component.name.as_str()) {
            return Err(ConfigError::DuplicateName {
                name: component.name.clone(),
            });
        }
        for (field, value) in component.kind.numbers() {
            if let Some(v) = value.filter(|v| !v.is_finite()) {
                return Err(ConfigError::InvalidValue {
                    field: format!("{}.{field}", component.name),
                    value: v,
                    reason: "must be finite".to_owned(),
                });
            }
        }
    }

    for (name, &value) in &def.overrides {
        if !value.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: format!("overrides.{name}"),
                value,
                reason: "must be finite".to_owned(),
            });
        }
    }
    Ok(())
}

/// Build an assembly: components in file order, then overrides.
pub fn build_assembly(def: &EngineDef) -> ConfigResult<PropulsionAssembly> {
    validate_engine(def)?;

    let mut assembly = PropulsionAssembly::new(def.name.clone());
    if let Some(criteria) = &def.criteria {
        assembly.set_criteria(criteria.clone());
    }
    for component in &def.components {
        assembly.add_component(component.name.clone(), component.kind.to_component())?;
    }
    for (name, &value) in &def.overrides {
        assembly.set_known(name.clone(), value);
    }
    debug!(engine = %def.name, components = assembly.len(), "engine built");
    Ok(assembly)
}

pub fn from_yaml_str(content: &str) -> ConfigResult<EngineDef> {
    let def: EngineDef = serde_yaml::from_str(content)?;
    validate_engine(&def)?;
    Ok(def)
}

pub fn to_yaml_string(def: &EngineDef) -> ConfigResult<String> {
    validate_engine(def)?;
    Ok(serde_yaml::to_string(def)?)
}

/// Load and validate an engine definition file.
pub fn load_engine(path: &Path) -> ConfigResult<EngineDef> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    from_yaml_str(&content)
}
