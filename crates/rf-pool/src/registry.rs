//! Named quantities and their known values.

use rf_solver::Symbol;
use std::collections::BTreeMap;

/// Quantity name → current numeric value (SI).
pub type KnownValues = BTreeMap<String, f64>;

/// Registry of named quantities.
///
/// Symbols and values are tracked independently: every declared name has a
/// symbol, and only some of them have a value. Declaring never fails; a value
/// given for an existing name replaces the previous one.
#[derive(Clone, Debug, Default)]
pub struct QuantityRegistry {
    symbols: BTreeMap<String, Symbol>,
    known: KnownValues,
}

impl QuantityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the symbol for `name` if absent and, when `value` is given,
    /// overwrite its known value.
    pub fn declare(&mut self, name: &str, value: Option<f64>) -> Symbol {
        let symbol = self
            .symbols
            .entry(name.to_owned())
            .or_insert_with(|| Symbol::new(name))
            .clone();
        if let Some(v) = value {
            self.known.insert(name.to_owned(), v);
        }
        symbol
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn value(&self, name: &str) -> Option<f64> {
        self.known.get(name).copied()
    }

    pub fn is_known(&self, name: &str) -> bool {
        self.known.contains_key(name)
    }

    pub fn known(&self) -> &KnownValues {
        &self.known
    }

    /// Names that have a symbol but no value.
    pub fn unknown_names(&self) -> impl Iterator<Item = &str> {
        self.symbols
            .keys()
            .filter(|name| !self.known.contains_key(*name))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub(crate) fn known_mut(&mut self) -> &mut KnownValues {
        &mut self.known
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declare_is_idempotent_for_symbols() {
        let mut reg = QuantityRegistry::new();
        let a = reg.declare("thrust", None);
        let b = reg.declare("thrust", None);
        assert_eq!(a, b);
        assert_eq!(reg.len(), 1);
        assert!(!reg.is_known("thrust"));
    }

    #[test]
    fn later_value_overwrites() {
        let mut reg = QuantityRegistry::new();
        reg.declare("tank_pressure", Some(2e6));
        reg.declare("tank_pressure", Some(3e6));
        assert_eq!(reg.value("tank_pressure"), Some(3e6));
    }

    #[test]
    fn declaring_without_value_keeps_existing_value() {
        let mut reg = QuantityRegistry::new();
        reg.declare("exit_pressure", Some(101_325.0));
        reg.declare("exit_pressure", None);
        assert_eq!(reg.value("exit_pressure"), Some(101_325.0));
    }

    #[test]
    fn unknown_names_excludes_known() {
        let mut reg = QuantityRegistry::new();
        reg.declare("thrust", None);
        reg.declare("chamber_pressure", Some(10e6));
        let unknown: Vec<_> = reg.unknown_names().collect();
        assert_eq!(unknown, vec!["thrust"]);
    }
}
