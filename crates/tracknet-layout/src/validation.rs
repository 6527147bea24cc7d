//! Structural validation of layout descriptions.
//!
//! Checks everything that can be decided from the description alone: names
//! are unique and resolvable, node ids fit a connector id, and every element
//! declares the right number of distinct nodes. Connectivity (dangling
//! ends) needs the built graph and is reported by the builder instead.
//!
//! # Example
//!
//! ```rust
//! use tracknet_layout::{TrackLayout, ValidationError, validate_layout};
//!
//! let layout = TrackLayout::from_json_str(r#"{
//!     "layout": { "name": "" },
//!     "modules": [{ "name": "m1", "trackplan": "missing" }]
//! }"#).unwrap();
//!
//! let err = validate_layout(&layout).unwrap_err();
//! assert!(matches!(err, ValidationError::Multiple(ref all) if all.len() == 2));
//! ```

use std::collections::HashSet;

use thiserror::Error;
use tracknet_core::{ElementKind, LocalNode, ModuleNo};

use crate::model::{TrackElement, TrackLayout};

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// The layout header has no name.
    #[error("layout name is empty")]
    EmptyName,

    /// Two modules share a name.
    #[error("duplicate module name '{0}'")]
    DuplicateModule(String),

    /// Two track plans share a name.
    #[error("duplicate trackplan name '{0}'")]
    DuplicateTrackplan(String),

    /// More modules than a node id can address.
    #[error("layout has {0} modules, at most {max} are supported", max = ModuleNo::MAX)]
    TooManyModules(usize),

    /// A module refers to a track plan that does not exist.
    #[error("module '{module}' references unknown trackplan '{trackplan}'")]
    UnknownTrackplan {
        /// Module name.
        module: String,
        /// Missing track plan name.
        trackplan: String,
    },

    /// A junction refers to a module that does not exist.
    #[error("junction {junction} references unknown module '{module}'")]
    UnknownModule {
        /// Position of the junction in the junction list.
        junction: usize,
        /// Missing module name.
        module: String,
    },

    /// A node id outside `0..=u32::MAX`.
    #[error("node id {value} in {location} is out of range")]
    NodeOutOfRange {
        /// Where the node id was found.
        location: String,
        /// The offending value.
        value: i64,
    },

    /// An element declares the wrong nodes.
    #[error("invalid {kind} in {location}: {reason}")]
    InvalidElement {
        /// Where the element was found.
        location: String,
        /// Element kind.
        kind: ElementKind,
        /// What is wrong with it.
        reason: String,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a whole layout, collecting every problem.
///
/// Returns the single error if there is exactly one, otherwise
/// [`ValidationError::Multiple`].
pub fn validate_layout(layout: &TrackLayout) -> ValidationResult<()> {
    let mut errors = Vec::new();

    if layout.layout.name.trim().is_empty() {
        errors.push(ValidationError::EmptyName);
    }
    if layout.modules.len() > usize::from(ModuleNo::MAX) {
        errors.push(ValidationError::TooManyModules(layout.modules.len()));
    }

    let mut names = HashSet::new();
    for module in &layout.modules {
        if !names.insert(module.name.as_str()) {
            errors.push(ValidationError::DuplicateModule(module.name.clone()));
        }
        if layout.trackplan(&module.trackplan).is_none() {
            errors.push(ValidationError::UnknownTrackplan {
                module: module.name.clone(),
                trackplan: module.trackplan.clone(),
            });
        }
    }

    let mut plans = HashSet::new();
    for plan in &layout.trackplans {
        if !plans.insert(plan.name.as_str()) {
            errors.push(ValidationError::DuplicateTrackplan(plan.name.clone()));
        }
        for section in &plan.tracksections {
            for (i, element) in section.trackelements.iter().enumerate() {
                let location = format!("{}/{}[{i}]", plan.name, section.name);
                validate_element(element, &location, &mut errors);
            }
        }
    }

    for (i, junction) in layout.junctions.iter().enumerate() {
        for end in [&junction.from, &junction.to] {
            if layout.module_number(&end.module).is_none() {
                errors.push(ValidationError::UnknownModule {
                    junction: i,
                    module: end.module.clone(),
                });
            }
            check_node(end.path, &format!("junction {i}"), &mut errors);
        }
        if junction.from.module == junction.to.module && junction.from.path == junction.to.path {
            errors.push(ValidationError::InvalidElement {
                location: format!("junction {i}"),
                kind: ElementKind::Junction,
                reason: "both ends at the same node".into(),
            });
        }
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

/// Validates one element's node list and length.
pub fn validate_element(
    element: &TrackElement,
    location: &str,
    errors: &mut Vec<ValidationError>,
) {
    let kind = element.kind();
    let mut invalid = |reason: String| {
        errors.push(ValidationError::InvalidElement {
            location: location.to_string(),
            kind,
            reason,
        });
    };

    if let Some(length) = element.length().filter(|&l| u32::try_from(l).is_err()) {
        invalid(format!("length {length} out of range"));
    }

    match element {
        TrackElement::Bumper(_) => {}
        TrackElement::Rail(rail) => {
            if rail.path.len() != 2 {
                invalid(format!("path needs 2 nodes, got {}", rail.path.len()));
            }
        }
        TrackElement::Turnout(turnout) => {
            if turnout.wide.len() < 2 {
                invalid(format!(
                    "needs at least 2 wide ends, got {}",
                    turnout.wide.len()
                ));
            }
        }
        TrackElement::Crossing(crossing) => {
            if crossing.path.len() != 4 {
                invalid(format!("path needs 4 nodes, got {}", crossing.path.len()));
            }
            if crossing.slip.len() % 2 != 0 {
                invalid(format!("slip list has odd length {}", crossing.slip.len()));
            }
            for s in &crossing.slip {
                if !crossing.path.contains(s) {
                    invalid(format!("slip node {s} is not part of the crossing"));
                }
            }
            for pair in crossing.slip.chunks_exact(2) {
                if pair[0] == pair[1] {
                    invalid(format!("slip from node {} to itself", pair[0]));
                }
            }
        }
    }

    let connectors = element.connectors();
    let mut seen = HashSet::new();
    for node in &connectors {
        if !seen.insert(*node) {
            invalid(format!("node {node} used twice"));
        }
    }

    for node in element.nodes() {
        check_node(node, location, errors);
    }
}

fn check_node(value: i64, location: &str, errors: &mut Vec<ValidationError>) {
    if LocalNode::try_from(value).is_err() {
        errors.push(ValidationError::NodeOutOfRange {
            location: location.to_string(),
            value,
        });
    }
}
