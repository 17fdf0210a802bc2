//! Instantiation kinds carried on graph edges.
//!
//! The set is closed: these are the reasons a compiler front end records for
//! one template entity being instantiated on behalf of another.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Why the target of an edge was instantiated by its source.
///
/// Serializes as the PascalCase variant name, which is also the name printed
/// in traces and exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstantiationKind {
    TemplateInstantiation,
    DefaultTemplateArgumentInstantiation,
    DefaultFunctionArgumentInstantiation,
    ExplicitTemplateArgumentSubstitution,
    DeducedTemplateArgumentSubstitution,
    PriorTemplateArgumentSubstitution,
    DefaultTemplateArgumentChecking,
    ExceptionSpecInstantiation,
    Memoization,
}

impl InstantiationKind {
    /// Every kind, in declaration order.
    pub const ALL: [InstantiationKind; 9] = [
        InstantiationKind::TemplateInstantiation,
        InstantiationKind::DefaultTemplateArgumentInstantiation,
        InstantiationKind::DefaultFunctionArgumentInstantiation,
        InstantiationKind::ExplicitTemplateArgumentSubstitution,
        InstantiationKind::DeducedTemplateArgumentSubstitution,
        InstantiationKind::PriorTemplateArgumentSubstitution,
        InstantiationKind::DefaultTemplateArgumentChecking,
        InstantiationKind::ExceptionSpecInstantiation,
        InstantiationKind::Memoization,
    ];

    /// The fixed PascalCase name of this kind.
    pub fn name(self) -> &'static str {
        match self {
            InstantiationKind::TemplateInstantiation => "TemplateInstantiation",
            InstantiationKind::DefaultTemplateArgumentInstantiation => {
                "DefaultTemplateArgumentInstantiation"
            }
            InstantiationKind::DefaultFunctionArgumentInstantiation => {
                "DefaultFunctionArgumentInstantiation"
            }
            InstantiationKind::ExplicitTemplateArgumentSubstitution => {
                "ExplicitTemplateArgumentSubstitution"
            }
            InstantiationKind::DeducedTemplateArgumentSubstitution => {
                "DeducedTemplateArgumentSubstitution"
            }
            InstantiationKind::PriorTemplateArgumentSubstitution => {
                "PriorTemplateArgumentSubstitution"
            }
            InstantiationKind::DefaultTemplateArgumentChecking => "DefaultTemplateArgumentChecking",
            InstantiationKind::ExceptionSpecInstantiation => "ExceptionSpecInstantiation",
            InstantiationKind::Memoization => "Memoization",
        }
    }
}

impl fmt::Display for InstantiationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InstantiationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InstantiationKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("unknown instantiation kind '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_serde_name() {
        for kind in InstantiationKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind));
        }
    }

    #[test]
    fn from_str_accepts_every_name() {
        for kind in InstantiationKind::ALL {
            assert_eq!(kind.name().parse::<InstantiationKind>(), Ok(kind));
        }
    }

    #[test]
    fn from_str_rejects_unknown() {
        assert!("UnknownKind".parse::<InstantiationKind>().is_err());
        assert!("memoization".parse::<InstantiationKind>().is_err());
    }
}
