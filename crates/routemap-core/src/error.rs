//! Structural conflict errors raised while validating declaration sites.
//!
//! These are fatal build-time errors: registration of the offending
//! controller aborts, while unaffected controllers proceed. Messages name
//! the exact site and every conflicting marker type in discovery order, so
//! failures are diagnosable without a debugger.

use std::error::Error;
use std::fmt;

/// Identity of a declaration site: a controller class or one of its
/// handler methods.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Site {
    /// Class-level declarations of the named controller.
    Class(String),
    /// Method-level declarations of the named handler method.
    Method {
        /// The controller type name.
        controller: String,
        /// The method name.
        method: String,
    },
}

impl Site {
    /// Site for a controller class.
    #[must_use]
    pub fn class(controller: impl Into<String>) -> Self {
        Self::Class(controller.into())
    }

    /// Site for a handler method.
    #[must_use]
    pub fn method(controller: impl Into<String>, method: impl Into<String>) -> Self {
        Self::Method {
            controller: controller.into(),
            method: method.into(),
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(controller) => f.write_str(controller),
            Self::Method { controller, method } => write!(f, "{}::{}", controller, method),
        }
    }
}

/// A declaration site carries contradictory route markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuralConflictError {
    /// Markers of both declarative styles are present on one site.
    MixedStyles {
        /// The offending site.
        site: Site,
        /// Concrete marker type names, in discovery order.
        markers: Vec<String>,
    },
    /// More than one exchange-style marker is present on one site.
    MultipleExchange {
        /// The offending site.
        site: Site,
        /// Concrete marker type names, in discovery order.
        markers: Vec<String>,
    },
}

impl StructuralConflictError {
    /// The offending site.
    #[must_use]
    pub fn site(&self) -> &Site {
        match self {
            Self::MixedStyles { site, .. } | Self::MultipleExchange { site, .. } => site,
        }
    }

    /// The conflicting marker type names, in discovery order.
    #[must_use]
    pub fn marker_names(&self) -> &[String] {
        match self {
            Self::MixedStyles { markers, .. } | Self::MultipleExchange { markers, .. } => markers,
        }
    }
}

fn write_marker_list(f: &mut fmt::Formatter<'_>, markers: &[String]) -> fmt::Result {
    for (i, name) in markers.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "@{}", name)?;
    }
    Ok(())
}

impl fmt::Display for StructuralConflictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MixedStyles { site, markers } => {
                write!(
                    f,
                    "{} is annotated with @RequestMapping and @HttpExchange annotations, \
                     but only one is allowed: ",
                    site
                )?;
                write_marker_list(f, markers)
            }
            Self::MultipleExchange { site, markers } => {
                write!(f, "Multiple @HttpExchange annotations found on {}: ", site)?;
                write_marker_list(f, markers)
            }
        }
    }
}

impl Error for StructuralConflictError {}
