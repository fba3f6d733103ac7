//! Algebraic expressions over named symbols.
//!
//! Expressions are small trees built with ordinary arithmetic operators:
//!
//! ```
//! use rf_solver::{Expr, Symbol};
//!
//! let mdot = Symbol::new("total_mass_flow_rate");
//! let ve = Symbol::new("exit_velocity");
//! let thrust = Expr::from(&mdot) * Expr::from(&ve);
//! assert_eq!(thrust.to_string(), "total_mass_flow_rate * exit_velocity");
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::Arc;

/// Opaque handle for a named unknown.
///
/// Two symbols created from the same name compare equal and hash identically,
/// so handles can be recreated freely.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(Arc<str>);

impl Symbol {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Expression tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Const(f64),
    Sym(Symbol),
    Neg(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    /// Natural logarithm
    Ln(Box<Expr>),
}

impl Expr {
    pub fn constant(value: f64) -> Self {
        Expr::Const(value)
    }

    pub fn symbol(name: impl AsRef<str>) -> Self {
        Expr::Sym(Symbol::new(name))
    }

    pub fn pow(self, exponent: impl Into<Expr>) -> Self {
        Expr::Pow(Box::new(self), Box::new(exponent.into()))
    }

    pub fn sqrt(self) -> Self {
        self.pow(0.5)
    }

    pub fn ln(self) -> Self {
        Expr::Ln(Box::new(self))
    }

    pub fn as_constant(&self) -> Option<f64> {
        match self {
            Expr::Const(v) => Some(*v),
            _ => None,
        }
    }

    /// Evaluate numerically. Returns `None` if any symbol has no value.
    pub fn eval_with<F>(&self, lookup: &F) -> Option<f64>
    where
        F: Fn(&Symbol) -> Option<f64>,
    {
        Some(match self {
            Expr::Const(v) => *v,
            Expr::Sym(s) => lookup(s)?,
            Expr::Neg(a) => -a.eval_with(lookup)?,
            Expr::Add(a, b) => a.eval_with(lookup)? + b.eval_with(lookup)?,
            Expr::Sub(a, b) => a.eval_with(lookup)? - b.eval_with(lookup)?,
            Expr::Mul(a, b) => a.eval_with(lookup)? * b.eval_with(lookup)?,
            Expr::Div(a, b) => a.eval_with(lookup)? / b.eval_with(lookup)?,
            Expr::Pow(a, b) => a.eval_with(lookup)?.powf(b.eval_with(lookup)?),
            Expr::Ln(a) => a.eval_with(lookup)?.ln(),
        })
    }

    /// Replace every symbol `lookup` knows with its value, folding constant subtrees.
    pub fn substitute<F>(&self, lookup: &F) -> Expr
    where
        F: Fn(&Symbol) -> Option<f64>,
    {
        match self {
            Expr::Const(v) => Expr::Const(*v),
            Expr::Sym(s) => match lookup(s) {
                Some(v) => Expr::Const(v),
                None => Expr::Sym(s.clone()),
            },
            Expr::Neg(a) => neg(a.substitute(lookup)),
            Expr::Add(a, b) => add(a.substitute(lookup), b.substitute(lookup)),
            Expr::Sub(a, b) => sub(a.substitute(lookup), b.substitute(lookup)),
            Expr::Mul(a, b) => mul(a.substitute(lookup), b.substitute(lookup)),
            Expr::Div(a, b) => div(a.substitute(lookup), b.substitute(lookup)),
            Expr::Pow(a, b) => pow(a.substitute(lookup), b.substitute(lookup)),
            Expr::Ln(a) => ln(a.substitute(lookup)),
        }
    }

    pub fn collect_symbols(&self, out: &mut BTreeSet<Symbol>) {
        match self {
            Expr::Const(_) => {}
            Expr::Sym(s) => {
                out.insert(s.clone());
            }
            Expr::Neg(a) | Expr::Ln(a) => a.collect_symbols(out),
            Expr::Add(a, b)
            | Expr::Sub(a, b)
            | Expr::Mul(a, b)
            | Expr::Div(a, b)
            | Expr::Pow(a, b) => {
                a.collect_symbols(out);
                b.collect_symbols(out);
            }
        }
    }

    pub fn free_symbols(&self) -> BTreeSet<Symbol> {
        let mut out = BTreeSet::new();
        self.collect_symbols(&mut out);
        out
    }

    pub fn depends_on(&self, symbol: &Symbol) -> bool {
        match self {
            Expr::Const(_) => false,
            Expr::Sym(s) => s == symbol,
            Expr::Neg(a) | Expr::Ln(a) => a.depends_on(symbol),
            Expr::Add(a, b)
            | Expr::Sub(a, b)
            | Expr::Mul(a, b)
            | Expr::Div(a, b)
            | Expr::Pow(a, b) => a.depends_on(symbol) || b.depends_on(symbol),
        }
    }

    /// Symbolic partial derivative with respect to `wrt`.
    pub fn diff(&self, wrt: &Symbol) -> Expr {
        match self {
            Expr::Const(_) => Expr::Const(0.0),
            Expr::Sym(s) => Expr::Const(if s == wrt { 1.0 } else { 0.0 }),
            Expr::Neg(a) => neg(a.diff(wrt)),
            Expr::Ln(a) => div(a.diff(wrt), (**a).clone()),
            Expr::Add(a, b) => add(a.diff(wrt), b.diff(wrt)),
            Expr::Sub(a, b) => sub(a.diff(wrt), b.diff(wrt)),
            Expr::Mul(a, b) => add(
                mul(a.diff(wrt), (**b).clone()),
                mul((**a).clone(), b.diff(wrt)),
            ),
            // (a/b)' = (a'b - ab') / b^2
            Expr::Div(a, b) => div(
                sub(
                    mul(a.diff(wrt), (**b).clone()),
                    mul((**a).clone(), b.diff(wrt)),
                ),
                pow((**b).clone(), Expr::Const(2.0)),
            ),
            Expr::Pow(a, b) => {
                let base = (**a).clone();
                let exponent = (**b).clone();
                // d(a^b) = b a^(b-1) a'  (+ a^b ln(a) b' when b varies)
                let power_rule = mul(
                    mul(
                        exponent.clone(),
                        pow(base.clone(), sub(exponent.clone(), Expr::Const(1.0))),
                    ),
                    a.diff(wrt),
                );
                if b.depends_on(wrt) {
                    add(power_rule, mul(mul(self.clone(), ln(base)), b.diff(wrt)))
                } else {
                    power_rule
                }
            }
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Const(v) if *v < 0.0 => 2,
            Expr::Const(_) | Expr::Sym(_) | Expr::Ln(_) => 4,
            Expr::Add(..) | Expr::Sub(..) => 1,
            Expr::Mul(..) | Expr::Div(..) | Expr::Neg(_) => 2,
            Expr::Pow(..) => 3,
        }
    }
}

fn ln(a: Expr) -> Expr {
    match a {
        Expr::Const(v) => Expr::Const(v.ln()),
        other => Expr::Ln(Box::new(other)),
    }
}

fn neg(a: Expr) -> Expr {
    match a {
        Expr::Const(v) => Expr::Const(-v),
        Expr::Neg(inner) => *inner,
        other => Expr::Neg(Box::new(other)),
    }
}

fn add(a: Expr, b: Expr) -> Expr {
    match (a.as_constant(), b.as_constant()) {
        (Some(x), Some(y)) => Expr::Const(x + y),
        (Some(x), None) if x == 0.0 => b,
        (None, Some(y)) if y == 0.0 => a,
        _ => Expr::Add(Box::new(a), Box::new(b)),
    }
}

fn sub(a: Expr, b: Expr) -> Expr {
    match (a.as_constant(), b.as_constant()) {
        (Some(x), Some(y)) => Expr::Const(x - y),
        (Some(x), None) if x == 0.0 => neg(b),
        (None, Some(y)) if y == 0.0 => a,
        _ => Expr::Sub(Box::new(a), Box::new(b)),
    }
}

fn mul(a: Expr, b: Expr) -> Expr {
    match (a.as_constant(), b.as_constant()) {
        (Some(x), Some(y)) => Expr::Const(x * y),
        (Some(x), _) | (_, Some(x)) if x == 0.0 => Expr::Const(0.0),
        (Some(x), None) if x == 1.0 => b,
        (None, Some(y)) if y == 1.0 => a,
        _ => Expr::Mul(Box::new(a), Box::new(b)),
    }
}

fn div(a: Expr, b: Expr) -> Expr {
    match (a.as_constant(), b.as_constant()) {
        (Some(x), Some(y)) => Expr::Const(x / y),
        (None, Some(y)) if y == 1.0 => a,
        _ => Expr::Div(Box::new(a), Box::new(b)),
    }
}

fn pow(a: Expr, b: Expr) -> Expr {
    match (a.as_constant(), b.as_constant()) {
        (Some(x), Some(y)) => Expr::Const(x.powf(y)),
        (_, Some(y)) if y == 1.0 => a,
        (_, Some(y)) if y == 0.0 => Expr::Const(1.0),
        _ => Expr::Pow(Box::new(a), Box::new(b)),
    }
}

impl From<f64> for Expr {
    fn from(v: f64) -> Self {
        Expr::Const(v)
    }
}

impl From<Symbol> for Expr {
    fn from(s: Symbol) -> Self {
        Expr::Sym(s)
    }
}

impl From<&Symbol> for Expr {
    fn from(s: &Symbol) -> Self {
        Expr::Sym(s.clone())
    }
}

impl Neg for Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr::Neg(Box::new(self))
    }
}

macro_rules! binary_op {
    ($trait:ident, $method:ident, $variant:ident) => {
        impl<R: Into<Expr>> $trait<R> for Expr {
            type Output = Expr;
            fn $method(self, rhs: R) -> Expr {
                Expr::$variant(Box::new(self), Box::new(rhs.into()))
            }
        }

        impl $trait<Expr> for f64 {
            type Output = Expr;
            fn $method(self, rhs: Expr) -> Expr {
                Expr::$variant(Box::new(Expr::Const(self)), Box::new(rhs))
            }
        }
    };
}

binary_op!(Add, add, Add);
binary_op!(Sub, sub, Sub);
binary_op!(Mul, mul, Mul);
binary_op!(Div, div, Div);

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let wrap = |f: &mut fmt::Formatter<'_>, e: &Expr, min: u8| -> fmt::Result {
            if e.precedence() < min {
                write!(f, "({e})")
            } else {
                write!(f, "{e}")
            }
        };
        match self {
            Expr::Const(v) => write!(f, "{v}"),
            Expr::Sym(s) => write!(f, "{s}"),
            Expr::Neg(a) => {
                f.write_str("-")?;
                wrap(f, a, 3)
            }
            Expr::Add(a, b) => {
                wrap(f, a, 1)?;
                f.write_str(" + ")?;
                wrap(f, b, 2)
            }
            Expr::Sub(a, b) => {
                wrap(f, a, 1)?;
                f.write_str(" - ")?;
                wrap(f, b, 2)
            }
            Expr::Mul(a, b) => {
                wrap(f, a, 2)?;
                f.write_str(" * ")?;
                wrap(f, b, 3)
            }
            Expr::Div(a, b) => {
                wrap(f, a, 2)?;
                f.write_str(" / ")?;
                wrap(f, b, 3)
            }
            Expr::Pow(a, b) => {
                wrap(f, a, 4)?;
                f.write_str("^")?;
                wrap(f, b, 4)
            }
            Expr::Ln(a) => write!(f, "ln({a})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn values(pairs: &[(&str, f64)]) -> BTreeMap<Symbol, f64> {
        pairs.iter().map(|(n, v)| (Symbol::new(n), *v)).collect()
    }

    #[test]
    fn symbols_with_same_name_are_interchangeable() {
        assert_eq!(Symbol::new("thrust"), Symbol::new(String::from("thrust")));
        assert_ne!(Symbol::new("thrust"), Symbol::new("exit_velocity"));
    }

    #[test]
    fn eval_requires_every_symbol() {
        let e = Expr::symbol("a") * 2.0 + Expr::symbol("b");
        let vals = values(&[("a", 3.0)]);
        assert_eq!(e.eval_with(&|s| vals.get(s).copied()), None);

        let vals = values(&[("a", 3.0), ("b", 1.0)]);
        assert_eq!(e.eval_with(&|s| vals.get(s).copied()), Some(7.0));
    }

    #[test]
    fn substitute_folds_known_subtrees() {
        let e = Expr::symbol("mdot") * Expr::symbol("ve") - Expr::symbol("thrust");
        let vals = values(&[("mdot", 3.0), ("ve", 9490.0)]);
        let s = e.substitute(&|s| vals.get(s).copied());
        assert_eq!(s, Expr::Const(28_470.0) - Expr::symbol("thrust"));
        assert_eq!(
            s.free_symbols().into_iter().collect::<Vec<_>>(),
            vec![Symbol::new("thrust")]
        );
    }

    #[test]
    fn derivative_of_product_and_quotient() {
        let x = Symbol::new("x");
        let e = Expr::from(&x) * Expr::from(&x) / (Expr::from(&x) + 1.0);
        let d = e.diff(&x);
        let at = |v: f64| d.eval_with(&|_| Some(v)).unwrap();
        // d/dx x^2/(x+1) = (x^2 + 2x)/(x+1)^2
        let expected = |v: f64| (v * v + 2.0 * v) / ((v + 1.0) * (v + 1.0));
        for v in [0.5, 2.0, 10.0] {
            assert!((at(v) - expected(v)).abs() < 1e-12);
        }
    }

    #[test]
    fn derivative_of_fractional_power() {
        let x = Symbol::new("x");
        let d = Expr::from(&x).sqrt().diff(&x);
        let v = d.eval_with(&|_| Some(4.0)).unwrap();
        assert!((v - 0.25).abs() < 1e-12);
    }

    #[test]
    fn display_respects_precedence() {
        let e = (Expr::symbol("a") + 1.0) * Expr::symbol("b");
        assert_eq!(e.to_string(), "(a + 1) * b");
        let e = Expr::symbol("isp") * 9.80665;
        assert_eq!(e.to_string(), "isp * 9.80665");
    }
}
