//! Mixed values: a flat number plus dice-expression text.
//!
//! Game bonuses mix flat integers ("+2") with dice expressions ("1d6").
//! `MixedValue` accumulates both channels so every downstream total can
//! treat them uniformly without losing the expression text the dice
//! evaluator needs.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::ops::AddAssign;

/// A single bonus entering an accumulator.
///
/// Raw document data is either a number or a string that may or may not be
/// numeric; it is classified once at the boundary by [`BonusTerm::from_value`]
/// or [`BonusTerm::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BonusTerm {
    /// Flat numeric value.
    Flat(i64),
    /// Dice expression kept verbatim, e.g. `"1d6"`.
    Expression(String),
}

impl BonusTerm {
    /// Classify a string.
    ///
    /// Returns `None` for empty strings and for a numeric zero, which carry
    /// no bonus.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bnbstat::BonusTerm;
    ///
    /// assert_eq!(BonusTerm::parse("3"), Some(BonusTerm::Flat(3)));
    /// assert_eq!(BonusTerm::parse("1d6"), Some(BonusTerm::Expression("1d6".into())));
    /// assert_eq!(BonusTerm::parse(""), None);
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        match trimmed.parse::<i64>() {
            Ok(0) => None,
            Ok(n) => Some(BonusTerm::Flat(n)),
            Err(_) => Some(BonusTerm::Expression(trimmed.to_string())),
        }
    }

    /// Classify a raw JSON value. Null, false, zero, empty strings and
    /// structured values yield `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Self::parse(s),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    (i != 0).then_some(BonusTerm::Flat(i))
                } else {
                    let f = n.as_f64()?;
                    if f == 0.0 || !f.is_finite() {
                        None
                    } else if f.fract() == 0.0 {
                        Some(BonusTerm::Flat(f as i64))
                    } else {
                        Some(BonusTerm::Expression(f.to_string()))
                    }
                }
            }
            _ => None,
        }
    }
}

// Written back in the raw shape the loader accepts.
impl Serialize for BonusTerm {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            BonusTerm::Flat(n) => serializer.serialize_i64(*n),
            BonusTerm::Expression(text) => serializer.serialize_str(text),
        }
    }
}

impl From<i64> for BonusTerm {
    fn from(n: i64) -> Self {
        BonusTerm::Flat(n)
    }
}

impl From<&str> for BonusTerm {
    fn from(s: &str) -> Self {
        Self::parse(s).unwrap_or(BonusTerm::Flat(0))
    }
}

/// Deserialize an optional bonus from any raw JSON shape.
///
/// Use with `#[serde(default, deserialize_with = "...")]` on document
/// fields typed `Option<BonusTerm>`.
pub fn deserialize_bonus<'de, D>(deserializer: D) -> Result<Option<BonusTerm>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(BonusTerm::from_value(&raw))
}

/// Where the numeric part is placed when rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberLocation {
    Start,
    #[default]
    End,
}

/// Numeric plus symbolic-text accumulator.
///
/// # Examples
///
/// ```rust
/// use bnbstat::{MixedValue, NumberLocation};
///
/// let mut mixed = MixedValue::default();
/// mixed.apply("1d6");
/// mixed.apply(5i64);
///
/// assert_eq!(mixed.to_formula(NumberLocation::End), "1d6 + 5");
/// assert_eq!(mixed.to_formula(NumberLocation::Start), "5 + 1d6");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixedValue {
    pub num: i64,
    pub texts: Vec<String>,
}

impl MixedValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flat(num: i64) -> Self {
        Self {
            num,
            texts: Vec::new(),
        }
    }

    pub fn expression(text: impl Into<String>) -> Self {
        Self {
            num: 0,
            texts: vec![text.into()],
        }
    }

    /// True when neither channel carries anything.
    pub fn is_empty(&self) -> bool {
        self.num == 0 && self.texts.is_empty()
    }

    /// Add one classified bonus.
    pub fn apply_term(&mut self, term: &BonusTerm) {
        match term {
            BonusTerm::Flat(n) => self.num += n,
            BonusTerm::Expression(text) => self.texts.push(text.clone()),
        }
    }

    /// Add a bonus that may be absent. `None` is a no-op.
    pub fn apply_opt(&mut self, term: Option<&BonusTerm>) {
        if let Some(term) = term {
            self.apply_term(term);
        }
    }

    /// Classify and add a raw bonus.
    pub fn apply(&mut self, bonus: impl Into<BonusTerm>) {
        self.apply_term(&bonus.into());
    }

    /// Merge another accumulator; text order is preserved (self first).
    pub fn merge(&mut self, other: &MixedValue) {
        self.num += other.num;
        self.texts.extend(other.texts.iter().cloned());
    }

    /// Render for a dice formula.
    ///
    /// The number is shown only when positive; zero and negative totals are
    /// dropped from the text.
    pub fn to_formula(&self, location: NumberLocation) -> String {
        let texts = self.texts.join(" + ");
        let number = (self.num > 0).then(|| self.num.to_string());
        match (number, texts.is_empty()) {
            (None, _) => texts,
            (Some(n), true) => n,
            (Some(n), false) => match location {
                NumberLocation::Start => format!("{} + {}", n, texts),
                NumberLocation::End => format!("{} + {}", texts, n),
            },
        }
    }
}

impl AddAssign<&MixedValue> for MixedValue {
    fn add_assign(&mut self, rhs: &MixedValue) {
        self.merge(rhs);
    }
}
