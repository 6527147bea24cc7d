//! Layout description tree.
//!
//! Mirrors the layout description format: a header, a list of modules each
//! naming its track plan, the track plans themselves (sections of typed track
//! elements), and the junctions that connect modules.
//!
//! Node ids are kept as written (`i64`) so that negative or oversized values
//! survive parsing and can be reported by validation instead of failing the
//! parse with a type error.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracknet_core::ElementKind;

use crate::error::LayoutError;
use crate::validation::validate_layout;

/// A complete layout description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackLayout {
    /// Header.
    pub layout: LayoutInfo,

    /// Modules in order; module numbers are 1-based positions in this list.
    #[serde(default)]
    pub modules: Vec<ModuleSpec>,

    /// Track plans modules refer to by name.
    #[serde(default)]
    pub trackplans: Vec<TrackPlan>,

    /// Connections between modules.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub junctions: Vec<JunctionSpec>,
}

/// Layout header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutInfo {
    /// Layout name.
    pub name: String,

    /// Free-form version string.
    #[serde(default)]
    pub version: String,

    /// Author.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One module of the layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleSpec {
    /// Module name, unique within the layout.
    pub name: String,

    /// Name of the track plan this module carries.
    pub trackplan: String,

    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A reusable track plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackPlan {
    /// Track plan name, unique within the layout.
    pub name: String,

    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Sections of track elements.
    #[serde(default)]
    pub tracksections: Vec<TrackSection>,
}

impl TrackPlan {
    /// All elements of all sections, in declaration order.
    pub fn elements(&self) -> impl Iterator<Item = &TrackElement> {
        self.tracksections
            .iter()
            .flat_map(|section| section.trackelements.iter())
    }
}

/// A named group of track elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSection {
    /// Section name.
    pub name: String,

    /// Elements of this section.
    #[serde(default)]
    pub trackelements: Vec<TrackElement>,
}

/// A typed track element.
///
/// Externally tagged: `{ "rail": { "length": 100, "path": [1, 2] } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackElement {
    /// Buffer stop at one node.
    Bumper(BumperSpec),
    /// Plain track between two nodes.
    Rail(RailSpec),
    /// One narrow end splitting into several wide ends.
    Turnout(TurnoutSpec),
    /// Two crossing routes, optionally with slips.
    Crossing(CrossingSpec),
}

/// Buffer stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BumperSpec {
    /// Node the buffer stop sits on.
    pub path: i64,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Plain rail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RailSpec {
    /// Length, opaque to routing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<i64>,
    /// The two end nodes.
    pub path: Vec<i64>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Turnout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnoutSpec {
    /// Length, opaque to routing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<i64>,
    /// Node of the narrow end.
    pub narrow: i64,
    /// Nodes of the wide ends.
    pub wide: Vec<i64>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Crossing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossingSpec {
    /// Length, opaque to routing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<i64>,
    /// `[a, b, c, d]`: straight routes `a-b` and `c-d`.
    pub path: Vec<i64>,
    /// Flat list of slip route node pairs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slip: Vec<i64>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TrackElement {
    /// Element kind.
    pub fn kind(&self) -> ElementKind {
        match self {
            TrackElement::Bumper(_) => ElementKind::Bumper,
            TrackElement::Rail(_) => ElementKind::Rail,
            TrackElement::Turnout(_) => ElementKind::Turnout,
            TrackElement::Crossing(_) => ElementKind::Crossing,
        }
    }

    /// Every node the element declares, including slip nodes.
    pub fn nodes(&self) -> Vec<i64> {
        match self {
            TrackElement::Bumper(b) => vec![b.path],
            TrackElement::Rail(r) => r.path.clone(),
            TrackElement::Turnout(t) => std::iter::once(t.narrow)
                .chain(t.wide.iter().copied())
                .collect(),
            TrackElement::Crossing(c) => c.path.iter().chain(&c.slip).copied().collect(),
        }
    }

    /// Nodes of the element's connection points (slip nodes excluded).
    pub fn connectors(&self) -> Vec<i64> {
        match self {
            TrackElement::Crossing(c) => c.path.clone(),
            other => other.nodes(),
        }
    }

    /// Length, if the element has one.
    pub fn length(&self) -> Option<i64> {
        match self {
            TrackElement::Bumper(_) => None,
            TrackElement::Rail(r) => r.length,
            TrackElement::Turnout(t) => t.length,
            TrackElement::Crossing(c) => c.length,
        }
    }

    /// Description, if any.
    pub fn description(&self) -> Option<&str> {
        match self {
            TrackElement::Bumper(b) => b.description.as_deref(),
            TrackElement::Rail(r) => r.description.as_deref(),
            TrackElement::Turnout(t) => t.description.as_deref(),
            TrackElement::Crossing(c) => c.description.as_deref(),
        }
    }
}

/// Connection between two modules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JunctionSpec {
    /// One side.
    pub from: JunctionEnd,
    /// The other side.
    pub to: JunctionEnd,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One side of a junction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JunctionEnd {
    /// Module name.
    pub module: String,
    /// Node within that module.
    pub path: i64,
}

/// Layout description file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutFormat {
    /// JSON.
    Json,
    /// TOML.
    Toml,
}

impl LayoutFormat {
    /// Picks the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self, LayoutError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        match ext.to_ascii_lowercase().as_str() {
            "json" => Ok(LayoutFormat::Json),
            "toml" => Ok(LayoutFormat::Toml),
            _ => Err(LayoutError::UnsupportedFormat(ext.to_string())),
        }
    }
}

impl TrackLayout {
    /// Reads, parses, and validates a layout file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LayoutError> {
        let layout = Self::read(path)?;
        validate_layout(&layout)?;
        tracing::info!(
            "layout '{}': {} modules, {} trackplans, {} junctions",
            layout.layout.name,
            layout.modules.len(),
            layout.trackplans.len(),
            layout.junctions.len()
        );
        Ok(layout)
    }

    /// Reads and parses a layout file without validating it.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, LayoutError> {
        let path = path.as_ref();
        let format = LayoutFormat::from_path(path)?;
        let content =
            std::fs::read_to_string(path).map_err(|e| LayoutError::read_file(path, e))?;
        tracing::debug!("parsing {} as {format:?}", path.display());
        match format {
            LayoutFormat::Json => Self::from_json_str(&content),
            LayoutFormat::Toml => Self::from_toml_str(&content),
        }
    }

    /// Parses a layout from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, LayoutError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses a layout from a TOML string.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, LayoutError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Looks up a track plan by name.
    pub fn trackplan(&self, name: &str) -> Option<&TrackPlan> {
        self.trackplans.iter().find(|plan| plan.name == name)
    }

    /// 1-based number of the module called `name`.
    pub fn module_number(&self, name: &str) -> Option<usize> {
        self.modules
            .iter()
            .position(|module| module.name == name)
            .map(|i| i + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON: &str = r#"{
        "layout": { "name": "Yard", "version": "1.0", "author": "me" },
        "modules": [{ "name": "m1", "trackplan": "plan" }],
        "trackplans": [{
            "name": "plan",
            "tracksections": [{
                "name": "main",
                "trackelements": [
                    { "bumper": { "path": 1 } },
                    { "rail": { "length": 120, "path": [1, 2] } },
                    { "turnout": { "narrow": 2, "wide": [3, 4], "description": "T1" } },
                    { "crossing": { "path": [5, 6, 7, 8], "slip": [5, 8] } }
                ]
            }]
        }]
    }"#;

    #[test]
    fn json_element_tags() {
        let layout = TrackLayout::from_json_str(JSON).unwrap();
        assert_eq!(layout.layout.name, "Yard");
        assert_eq!(layout.layout.author.as_deref(), Some("me"));
        assert!(layout.junctions.is_empty());

        let kinds: Vec<_> = layout.trackplans[0].elements().map(TrackElement::kind).collect();
        assert_eq!(
            kinds,
            vec![
                ElementKind::Bumper,
                ElementKind::Rail,
                ElementKind::Turnout,
                ElementKind::Crossing
            ]
        );
    }

    #[test]
    fn element_accessors() {
        let layout = TrackLayout::from_json_str(JSON).unwrap();
        let elements: Vec<_> = layout.trackplans[0].elements().collect();
        assert_eq!(elements[1].length(), Some(120));
        assert_eq!(elements[2].description(), Some("T1"));
        assert_eq!(elements[2].nodes(), vec![2, 3, 4]);
        assert_eq!(elements[3].nodes(), vec![5, 6, 7, 8, 5, 8]);
        assert_eq!(elements[3].connectors(), vec![5, 6, 7, 8]);
    }

    #[test]
    fn toml_layout() {
        let toml_str = r#"
            [layout]
            name = "Shelf"

            [[modules]]
            name = "left"
            trackplan = "straight"

            [[trackplans]]
            name = "straight"

            [[trackplans.tracksections]]
            name = "main"
            trackelements = [
                { bumper = { path = 1 } },
                { rail = { path = [1, 2] } },
                { bumper = { path = 2 } },
            ]
        "#;
        let layout = TrackLayout::from_toml_str(toml_str).unwrap();
        assert_eq!(layout.layout.version, "");
        assert_eq!(layout.trackplan("straight").unwrap().elements().count(), 3);
        assert_eq!(layout.module_number("left"), Some(1));
        assert_eq!(layout.module_number("right"), None);
    }

    #[test]
    fn unknown_element_tag_is_a_parse_error() {
        let json = r#"{
            "layout": { "name": "x" },
            "trackplans": [{ "name": "p", "tracksections": [{
                "name": "s", "trackelements": [{ "signal": { "path": 1 } }]
            }]}]
        }"#;
        assert!(matches!(
            TrackLayout::from_json_str(json),
            Err(LayoutError::JsonParse(_))
        ));
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(
            LayoutFormat::from_path(Path::new("a/layout.JSON")).unwrap(),
            LayoutFormat::Json
        );
        assert_eq!(
            LayoutFormat::from_path(Path::new("layout.toml")).unwrap(),
            LayoutFormat::Toml
        );
        assert!(matches!(
            LayoutFormat::from_path(Path::new("layout.yaml")),
            Err(LayoutError::UnsupportedFormat(ext)) if ext == "yaml"
        ));
    }
}
