//! Parser configuration: grammar feature flags and limits.
//!
//! A configuration can be built in code, read from JSON, or adjusted with
//! `.features` files where every line names one feature:
//!
//! ```text
//! # a leading + enables
//! +INFIX_MOD
//! # a leading - disables
//! -DOLLAR_PARAMETERS
//! # a bare name enables
//! DIV_OPERATOR
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SqlError};

/// An optional grammar production class.
///
/// Enabling a feature only makes more productions reachable; it never
/// changes the shape of the nodes those productions build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SqlFeature {
    /// `$1`, `$2`, ... placeholders.
    DollarParameters,
    /// Function application inside CREATE INDEX column lists.
    IndexFunctions,
    /// The `%` remainder operator.
    InfixMod,
    /// The `&`, `|`, `^`, `<<`, `>>` and `~` operators.
    InfixBitOperators,
    /// The `DIV` integer division operator.
    DivOperator,
}

impl SqlFeature {
    /// Every feature, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::DollarParameters,
        Self::IndexFunctions,
        Self::InfixMod,
        Self::InfixBitOperators,
        Self::DivOperator,
    ];

    /// Returns the configuration name of the feature.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::DollarParameters => "DOLLAR_PARAMETERS",
            Self::IndexFunctions => "INDEX_FUNCTIONS",
            Self::InfixMod => "INFIX_MOD",
            Self::InfixBitOperators => "INFIX_BIT_OPERATORS",
            Self::DivOperator => "DIV_OPERATOR",
        }
    }
}

impl fmt::Display for SqlFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SqlFeature {
    type Err = SqlError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|feature| feature.name() == wanted)
            .ok_or_else(|| SqlError::Config(format!("unknown feature '{}'", s.trim())))
    }
}

/// A set of enabled grammar features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Features(BTreeSet<SqlFeature>);

impl Default for Features {
    fn default() -> Self {
        Self::none()
            .with(SqlFeature::DollarParameters)
            .with(SqlFeature::IndexFunctions)
    }
}

impl Features {
    /// An empty feature set: only the core grammar is reachable.
    #[must_use]
    pub const fn none() -> Self {
        Self(BTreeSet::new())
    }

    /// Every feature enabled.
    #[must_use]
    pub fn all() -> Self {
        Self(SqlFeature::ALL.into_iter().collect())
    }

    /// Returns this set with `feature` enabled.
    #[must_use]
    pub fn with(mut self, feature: SqlFeature) -> Self {
        self.enable(feature);
        self
    }

    /// Returns this set with `feature` disabled.
    #[must_use]
    pub fn without(mut self, feature: SqlFeature) -> Self {
        self.disable(feature);
        self
    }

    /// Enables a feature.
    pub fn enable(&mut self, feature: SqlFeature) {
        self.0.insert(feature);
    }

    /// Disables a feature.
    pub fn disable(&mut self, feature: SqlFeature) {
        self.0.remove(&feature);
    }

    /// Returns true if `feature` is enabled.
    #[must_use]
    pub fn contains(&self, feature: SqlFeature) -> bool {
        self.0.contains(&feature)
    }

    /// Iterates over the enabled features in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = SqlFeature> + '_ {
        self.0.iter().copied()
    }

    /// Applies one `+NAME`, `-NAME` or `NAME` directive.
    ///
    /// # Errors
    ///
    /// Returns `SqlError::Config` for an unknown feature name.
    pub fn apply(&mut self, directive: &str) -> Result<()> {
        let directive = directive.trim();
        if let Some(name) = directive.strip_prefix('-') {
            self.disable(name.parse()?);
        } else {
            self.enable(directive.strip_prefix('+').unwrap_or(directive).parse()?);
        }
        Ok(())
    }

    /// Applies every directive in a `.features` text. Blank lines and
    /// lines starting with `#` are ignored.
    ///
    /// # Errors
    ///
    /// Returns `SqlError::Config` for an unknown feature name.
    pub fn apply_lines(&mut self, text: &str) -> Result<()> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .try_for_each(|line| self.apply(line))
    }
}

impl FromIterator<SqlFeature> for Features {
    fn from_iter<I: IntoIterator<Item = SqlFeature>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Default limit on identifier length, in characters.
pub const DEFAULT_MAX_IDENTIFIER_LENGTH: usize = 128;

/// Default limit on how deeply expressions, queries and joins may nest.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 32;

/// Parser configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserConfig {
    /// Enabled grammar features.
    pub features: Features,
    /// Longest identifier accepted, in characters.
    pub max_identifier_length: usize,
    /// Deepest nesting of expressions, queries and parenthesized joins.
    pub max_nesting_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            features: Features::default(),
            max_identifier_length: DEFAULT_MAX_IDENTIFIER_LENGTH,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl ParserConfig {
    /// Creates a configuration with the given features and default limits.
    #[must_use]
    pub fn with_features(features: Features) -> Self {
        Self {
            features,
            ..Self::default()
        }
    }

    /// Reads a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `SqlError::Config` if the JSON is malformed.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| SqlError::Config(e.to_string()))
    }
}
