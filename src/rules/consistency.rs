//! First-observed-wins style inference shared by the style rules
//!
//! A style rule either enforces a configured literal (`"*"`, `"atx"`, ...)
//! or, with `"consistent"` (the default), adopts whatever style the first
//! real node in the document uses and reports every later deviation.

use crate::rule::LintError;

/// Sentinel option value asking a rule to infer its style
pub const CONSISTENT: &str = "consistent";

/// Configured preference of a style rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleOption<T> {
    Consistent,
    Fixed(T),
}

impl<T> StyleOption<T> {
    /// Resolve a rule option.
    ///
    /// Absent options and `"consistent"` mean inference. Strings accepted by
    /// `parse` become a fixed preference. Anything else is a configuration
    /// error whose message is produced by `on_invalid` from the offending
    /// value.
    pub fn from_option<P, E>(option: Option<&toml::Value>, parse: P, on_invalid: E) -> Result<Self, LintError>
    where
        P: Fn(&str) -> Option<T>,
        E: FnOnce(&str) -> String,
    {
        match option {
            None => Ok(StyleOption::Consistent),
            Some(toml::Value::String(s)) if s == CONSISTENT => Ok(StyleOption::Consistent),
            Some(toml::Value::String(s)) => parse(s)
                .map(StyleOption::Fixed)
                .ok_or_else(|| LintError::invalid_option(on_invalid(s))),
            Some(other) => Err(LintError::invalid_option(on_invalid(&other.to_string()))),
        }
    }
}

/// Standard message for an option outside a fixed set of literals:
/// ``Incorrect emphasis marker `@`: use either `'consistent'`, `'*'`, or `'_'` ``
pub fn expected_one_of(what: &str, value: &str, allowed: &[&str]) -> String {
    let mut choices: Vec<String> = std::iter::once(CONSISTENT)
        .chain(allowed.iter().copied())
        .map(|choice| format!("`'{choice}'`"))
        .collect();
    let last = choices.pop().unwrap_or_default();
    let listed = if choices.len() > 1 {
        format!("{}, or {last}", choices.join(", "))
    } else {
        format!("{} or {last}", choices.join(", "))
    };
    format!("Incorrect {what} `{value}`: use either {listed}")
}

/// Outcome of feeding one observed style to a tracker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation<T> {
    /// First observation; it becomes the preference and is never reported
    Baseline,
    Matches,
    Mismatch { expected: T },
}

/// Per-invocation state of a style rule
#[derive(Debug, Clone)]
pub struct ConsistencyTracker<T> {
    preferred: Option<T>,
}

impl<T: Clone + PartialEq> ConsistencyTracker<T> {
    pub fn new(option: StyleOption<T>) -> Self {
        let preferred = match option {
            StyleOption::Consistent => None,
            StyleOption::Fixed(value) => Some(value),
        };
        Self { preferred }
    }

    pub fn preferred(&self) -> Option<&T> {
        self.preferred.as_ref()
    }

    pub fn observe(&mut self, value: T) -> Observation<T> {
        match &self.preferred {
            None => {
                self.preferred = Some(value);
                Observation::Baseline
            }
            Some(preferred) if *preferred == value => Observation::Matches,
            Some(preferred) => Observation::Mismatch {
                expected: preferred.clone(),
            },
        }
    }
}
