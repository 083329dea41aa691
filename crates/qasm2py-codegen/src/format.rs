//! Python literal formatting.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt::Display;

use qasm2py_ir::ParameterExpression;
use rustc_hash::FxHashSet;

/// Python keywords that cannot name a variable.
const PYTHON_KEYWORDS: [&str; 35] = [
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

/// Names every generated program may refer to besides its own variables.
const GENERATED_NAMES: [&str; 3] = ["QuantumCircuit", "Parameter", "float"];

/// Format a float the way Python's `repr(float)` does.
///
/// Digits are the shortest that round-trip. Decimal exponents below -4 or
/// from 16 up switch to scientific notation with a signed two-digit
/// exponent (`1e-05`, `1.5e+16`); integral values keep a trailing `.0`.
/// Non-finite values have no literal and are written as `float('inf')`,
/// `float('-inf')` and `float('nan')`.
pub fn python_float(value: f64) -> String {
    if value.is_nan() {
        return "float('nan')".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "float('inf')" } else { "float('-inf')" }.to_string();
    }

    // `{:e}` yields the shortest round-trip digits as `d.ddde<exp>`.
    let scientific = format!("{:e}", value.abs());
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let sign = if value.is_sign_negative() { "-" } else { "" };

    if !(-4..16).contains(&exponent) {
        let (first, rest) = digits.split_at(1);
        let fraction = if rest.is_empty() {
            String::new()
        } else {
            format!(".{rest}")
        };
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        return format!("{sign}{first}{fraction}e{exp_sign}{:02}", exponent.abs());
    }

    let body = if exponent < 0 {
        let zeros = "0".repeat(exponent.unsigned_abs() as usize - 1);
        format!("0.{zeros}{digits}")
    } else {
        let int_len = exponent as usize + 1;
        if digits.len() <= int_len {
            format!("{digits}{}.0", "0".repeat(int_len - digits.len()))
        } else {
            let (int_part, frac_part) = digits.split_at(int_len);
            format!("{int_part}.{frac_part}")
        }
    };
    format!("{sign}{body}")
}

/// Render a gate parameter as a Python expression.
///
/// Constants become float literals and free symbols refer to the
/// `Parameter` variables chosen for them in `names`.
pub fn python_expr(expr: &ParameterExpression, names: &SymbolNames) -> String {
    let sub = |e: &ParameterExpression| python_expr(e, names);
    match expr {
        ParameterExpression::Constant(v) => python_float(*v),
        ParameterExpression::Pi => python_float(std::f64::consts::PI),
        ParameterExpression::Symbol(name) => names.get(name).into_owned(),
        ParameterExpression::Neg(e) => format!("-({})", sub(e)),
        ParameterExpression::Add(a, b) => format!("({} + {})", sub(a), sub(b)),
        ParameterExpression::Sub(a, b) => format!("({} - {})", sub(a), sub(b)),
        ParameterExpression::Mul(a, b) => format!("({} * {})", sub(a), sub(b)),
        ParameterExpression::Div(a, b) => format!("({} / {})", sub(a), sub(b)),
    }
}

/// Python variables holding the `Parameter` objects of one program.
///
/// A symbol keeps its own name unless that name is a keyword, one of the
/// names the program binds itself (`QuantumCircuit`, `Parameter`, `float`)
/// or one of the reserved names given to [`SymbolNames::new`]. Those get
/// trailing underscores until the name is free, also avoiding the names
/// of the other symbols.
#[derive(Debug, Clone, Default)]
pub struct SymbolNames {
    names: BTreeMap<String, String>,
}

impl SymbolNames {
    /// Choose variables for `symbols`, none of which may be in `reserved`.
    pub fn new<'s>(
        symbols: impl IntoIterator<Item = &'s str>,
        reserved: impl IntoIterator<Item = String>,
    ) -> Self {
        let symbols: Vec<&str> = symbols.into_iter().collect();
        let originals: FxHashSet<&str> = symbols.iter().copied().collect();
        let mut taken: FxHashSet<String> = reserved.into_iter().collect();
        taken.extend(
            PYTHON_KEYWORDS
                .iter()
                .chain(&GENERATED_NAMES)
                .map(|name| (*name).to_string()),
        );

        let mut names = BTreeMap::new();
        for symbol in symbols {
            let mut name = symbol.to_string();
            if taken.contains(&name) {
                while taken.contains(&name) || originals.contains(name.as_str()) {
                    name.push('_');
                }
            }
            taken.insert(name.clone());
            names.insert(symbol.to_string(), name);
        }
        Self { names }
    }

    /// Variable for `symbol`. Symbols not given to [`SymbolNames::new`]
    /// only get the keyword rule of [`python_identifier`].
    pub fn get<'a>(&'a self, symbol: &'a str) -> Cow<'a, str> {
        match self.names.get(symbol) {
            Some(name) => Cow::Borrowed(name.as_str()),
            None => python_identifier(symbol),
        }
    }

    /// `(symbol, variable)` pairs, sorted by symbol.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.names
            .iter()
            .map(|(symbol, name)| (symbol.as_str(), name.as_str()))
    }

    /// Check if there are no symbols.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Python variable name for an OpenQASM identifier. Keywords get a trailing
/// underscore (`lambda` becomes `lambda_`).
pub fn python_identifier(name: &str) -> Cow<'_, str> {
    if PYTHON_KEYWORDS.contains(&name) {
        Cow::Owned(format!("{name}_"))
    } else {
        Cow::Borrowed(name)
    }
}

/// Single-quoted Python string literal.
pub(crate) fn python_str(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Python list literal, e.g. `[0, 1]`.
pub(crate) fn python_list<T: Display>(items: impl IntoIterator<Item = T>) -> String {
    let items: Vec<String> = items.into_iter().map(|item| item.to_string()).collect();
    format!("[{}]", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_python_float_fixed() {
        assert_eq!(python_float(0.0), "0.0");
        assert_eq!(python_float(-0.0), "-0.0");
        assert_eq!(python_float(1.0), "1.0");
        assert_eq!(python_float(0.5), "0.5");
        assert_eq!(python_float(-2.25), "-2.25");
        assert_eq!(python_float(100.0), "100.0");
        assert_eq!(python_float(0.1), "0.1");
        assert_eq!(python_float(0.0001), "0.0001");
        assert_eq!(python_float(std::f64::consts::PI), "3.141592653589793");
        assert_eq!(python_float(1e15), "1000000000000000.0");
        assert_eq!(python_float(123_456.789), "123456.789");
    }

    #[test]
    fn test_python_float_scientific() {
        assert_eq!(python_float(0.00001), "1e-05");
        assert_eq!(python_float(1.5e-7), "1.5e-07");
        assert_eq!(python_float(1e16), "1e+16");
        assert_eq!(python_float(-1.25e20), "-1.25e+20");
        assert_eq!(python_float(1e100), "1e+100");
        assert_eq!(python_float(5e-324), "5e-324");
    }

    #[test]
    fn test_python_float_special() {
        assert_eq!(python_float(f64::NAN), "float('nan')");
        assert_eq!(python_float(f64::INFINITY), "float('inf')");
        assert_eq!(python_float(f64::NEG_INFINITY), "float('-inf')");
    }

    #[test]
    fn test_python_float_round_trips() {
        for value in [0.1 + 0.2, 1.0 / 3.0, 2.0_f64.sqrt(), 6.02214076e23, 1e-300] {
            let text = python_float(value);
            assert_eq!(text.parse::<f64>().unwrap(), value, "{text}");
        }
    }

    #[test]
    fn test_python_expr() {
        let names = SymbolNames::default();
        let expr = ParameterExpression::symbol("theta") / ParameterExpression::constant(2.0);
        assert_eq!(python_expr(&expr, &names), "(theta / 2.0)");

        let expr = -(ParameterExpression::symbol("lambda") + ParameterExpression::Pi);
        assert_eq!(python_expr(&expr, &names), "-((lambda_ + 3.141592653589793))");

        let expr = ParameterExpression::constant(f64::INFINITY) * ParameterExpression::symbol("t");
        assert_eq!(python_expr(&expr, &names), "(float('inf') * t)");
    }

    #[test]
    fn test_symbol_names_avoid_reserved() {
        let names = SymbolNames::new(
            ["qc", "qc_", "g", "float", "lambda", "theta"],
            ["qc".to_string(), "g".to_string()],
        );
        let pairs: Vec<_> = names.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("float", "float_"),
                ("g", "g_"),
                ("lambda", "lambda_"),
                ("qc", "qc__"),
                ("qc_", "qc_"),
                ("theta", "theta"),
            ]
        );
        assert_eq!(names.get("qc"), "qc__");
        assert_eq!(names.get("unknown"), "unknown");
        assert!(SymbolNames::default().is_empty());
    }

    #[test]
    fn test_literals() {
        assert_eq!(python_str("bell"), "'bell'");
        assert_eq!(python_list([0, 1, 2]), "[0, 1, 2]");
        assert_eq!(python_list(Vec::<usize>::new()), "[]");
        assert_eq!(python_list([python_str("0.5")]), "['0.5']");
    }
}
