//! Layout tree to topology graph.
//!
//! Walks modules in order (module `n` is the `n`-th entry, 1-based), looks up
//! each module's track plan by name, and feeds every element of every section
//! into a [`GraphBuilder`]. Junctions are added last. The same track plan may
//! back several modules; each module gets its own copy of the elements.

use std::collections::HashMap;
use std::time::Instant;

use tracknet_core::{
    BuildError, ElementAttrs, GraphBuilder, LocalNode, ModuleNo, TopologyGraph,
};

use crate::model::{JunctionEnd, TrackElement, TrackLayout};

/// Builds the topology graph of `layout`.
///
/// Does not require prior validation: anything the graph cannot represent
/// fails with a [`BuildError`].
pub fn build(layout: &TrackLayout) -> Result<TopologyGraph, BuildError> {
    let started = Instant::now();
    let mut builder = GraphBuilder::new(layout.modules.len())?;

    let mut numbers: HashMap<&str, ModuleNo> = HashMap::with_capacity(layout.modules.len());
    for (i, module) in layout.modules.iter().enumerate() {
        let number = ModuleNo::try_from(i + 1)
            .map_err(|_| BuildError::TooManyModules(layout.modules.len()))?;
        numbers.entry(module.name.as_str()).or_insert(number);

        let plan = layout
            .trackplan(&module.trackplan)
            .ok_or_else(|| BuildError::UnknownTrackplan {
                module: module.name.clone(),
                trackplan: module.trackplan.clone(),
            })?;

        let mut added = 0usize;
        for element in plan.elements() {
            add_element(&mut builder, number, &module.name, element)?;
            added += 1;
        }
        tracing::debug!(
            "module {number} '{}': {added} elements from trackplan '{}'",
            module.name,
            plan.name
        );
    }

    for junction in &layout.junctions {
        let from = junction_end(&numbers, &junction.from)?;
        let to = junction_end(&numbers, &junction.to)?;
        builder.add_junction(from, to, attrs(None, junction.description.as_deref()))?;
    }

    let graph = builder.finish()?;
    tracing::info!(
        "built '{}' in {:?}: {} elements, {} vertices",
        layout.layout.name,
        started.elapsed(),
        graph.element_count(),
        graph.vertex_count()
    );
    Ok(graph)
}

fn add_element(
    builder: &mut GraphBuilder,
    module: ModuleNo,
    module_name: &str,
    element: &TrackElement,
) -> Result<(), BuildError> {
    let node = |value: i64| local_node(module_name, value);
    let length = match element.length() {
        Some(value) => Some(u32::try_from(value).map_err(|_| BuildError::MalformedElement {
            module,
            kind: element.kind(),
            reason: format!("length {value} out of range"),
        })?),
        None => None,
    };
    let attrs = attrs(length, element.description());

    match element {
        TrackElement::Bumper(bumper) => {
            builder.add_bumper(module, node(bumper.path)?, attrs)?;
        }
        TrackElement::Rail(rail) => {
            let &[a, b] = rail.path.as_slice() else {
                return Err(BuildError::MalformedElement {
                    module,
                    kind: element.kind(),
                    reason: format!("path needs 2 nodes, got {}", rail.path.len()),
                });
            };
            builder.add_rail(module, node(a)?, node(b)?, attrs)?;
        }
        TrackElement::Turnout(turnout) => {
            let wide = turnout
                .wide
                .iter()
                .map(|&w| node(w))
                .collect::<Result<Vec<_>, _>>()?;
            builder.add_turnout(module, node(turnout.narrow)?, &wide, attrs)?;
        }
        TrackElement::Crossing(crossing) => {
            let path = crossing
                .path
                .iter()
                .map(|&p| node(p))
                .collect::<Result<Vec<_>, _>>()?;
            let slips = crossing
                .slip
                .iter()
                .map(|&s| node(s))
                .collect::<Result<Vec<_>, _>>()?;
            builder.add_crossing(module, &path, &slips, attrs)?;
        }
    }
    Ok(())
}

fn junction_end(
    numbers: &HashMap<&str, ModuleNo>,
    end: &JunctionEnd,
) -> Result<(ModuleNo, LocalNode), BuildError> {
    let module = numbers
        .get(end.module.as_str())
        .copied()
        .ok_or_else(|| BuildError::UnknownModule(end.module.clone()))?;
    Ok((module, local_node(&end.module, end.path)?))
}

fn local_node(module: &str, value: i64) -> Result<LocalNode, BuildError> {
    LocalNode::try_from(value).map_err(|_| BuildError::NodeOutOfRange {
        module: module.to_string(),
        value,
    })
}

fn attrs(length: Option<u32>, description: Option<&str>) -> ElementAttrs {
    ElementAttrs {
        length,
        description: description.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracknet_core::{ElementKind, NodeId};

    fn two_modules() -> TrackLayout {
        TrackLayout::from_json_str(
            r#"{
            "layout": { "name": "pair" },
            "modules": [
                { "name": "west", "trackplan": "end" },
                { "name": "east", "trackplan": "end" }
            ],
            "trackplans": [{
                "name": "end",
                "tracksections": [{
                    "name": "main",
                    "trackelements": [
                        { "bumper": { "path": 1 } },
                        { "rail": { "length": 300, "path": [1, 2] } }
                    ]
                }]
            }],
            "junctions": [
                { "from": { "module": "west", "path": 2 }, "to": { "module": "east", "path": 2 } }
            ]
        }"#,
        )
        .unwrap()
    }

    #[test]
    fn shared_trackplan_is_instantiated_per_module() {
        let graph = build(&two_modules()).unwrap();
        let summary = graph.summary();

        assert_eq!(summary.modules, 2);
        assert_eq!(summary.count(ElementKind::Rail), 2);
        assert_eq!(summary.count(ElementKind::Bumper), 2);
        assert_eq!(summary.count(ElementKind::Junction), 1);
        assert!(graph.contains_node(NodeId::encode(1, 2)));
        assert!(graph.contains_node(NodeId::encode(2, 2)));
    }

    #[test]
    fn element_attributes_are_carried() {
        let graph = build(&two_modules()).unwrap();
        let rail = graph
            .elements()
            .find(|e| e.kind() == ElementKind::Rail)
            .unwrap();
        assert_eq!(rail.attrs().length, Some(300));
        assert_eq!(rail.module(), 1);
    }

    #[test]
    fn unknown_junction_module_fails() {
        let mut layout = two_modules();
        layout.junctions[0].to.module = "north".into();
        assert_eq!(
            build(&layout).unwrap_err(),
            BuildError::UnknownModule("north".into())
        );
    }

    #[test]
    fn unknown_trackplan_fails() {
        let mut layout = two_modules();
        layout.modules[1].trackplan = "loop".into();
        assert!(matches!(
            build(&layout),
            Err(BuildError::UnknownTrackplan { ref module, .. }) if module == "east"
        ));
    }

    #[test]
    fn negative_node_fails() {
        let mut layout = two_modules();
        layout.junctions[0].from.path = -3;
        assert_eq!(
            build(&layout).unwrap_err(),
            BuildError::NodeOutOfRange {
                module: "west".into(),
                value: -3
            }
        );
    }

    #[test]
    fn negative_length_fails() {
        let mut layout = two_modules();
        let element = &mut layout.trackplans[0].tracksections[0].trackelements[1];
        let TrackElement::Rail(rail) = element else {
            panic!("second element is the rail");
        };
        rail.length = Some(-300);
        assert_eq!(
            build(&layout).unwrap_err(),
            BuildError::MalformedElement {
                module: 1,
                kind: ElementKind::Rail,
                reason: "length -300 out of range".into()
            }
        );
    }

    #[test]
    fn missing_junction_leaves_dangling_rail() {
        let mut layout = two_modules();
        layout.junctions.clear();
        assert!(matches!(
            build(&layout),
            Err(BuildError::DanglingNode {
                kind: ElementKind::Rail,
                ..
            })
        ));
    }
}
