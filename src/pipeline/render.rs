//! Mermaid flowchart rendering

use std::collections::HashSet;
use std::fmt;

use super::PipelineDef;

/// Render `def` as a Mermaid `graph LR` flowchart.
///
/// Zones become subgraphs in alphabetical order and un-zoned nodes are
/// listed after them. Without zones, nodes appear only through their edges.
pub fn render(def: &PipelineDef) -> String {
    Diagram(def).to_string()
}

struct Diagram<'a>(&'a PipelineDef);

impl fmt::Display for Diagram<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let def = self.0;
        writeln!(f, "graph LR")?;

        if !def.zones.is_empty() {
            let mut zoned = HashSet::new();
            for (name, zone) in &def.zones {
                writeln!(f, "    subgraph {} [{}]", sanitize_id(name), capitalize_first(name))?;
                for node in &zone.nodes {
                    writeln!(f, "        {}", sanitize_id(node))?;
                    zoned.insert(node.as_str());
                }
                writeln!(f, "    end")?;
            }

            for node in def.nodes.iter().filter(|n| !zoned.contains(n.name.as_str())) {
                writeln!(f, "    {}", sanitize_id(&node.name))?;
            }
        }

        for edge in &def.edges {
            let label = if edge.name.is_empty() { &edge.id } else { &edge.name };
            writeln!(
                f,
                "    {} -->|\"{}: {}\"| {}",
                sanitize_id(&edge.from),
                edge.id,
                label,
                sanitize_id(&edge.to)
            )?;
        }

        Ok(())
    }
}

/// Mermaid ids cannot contain `-`
fn sanitize_id(s: &str) -> String {
    s.replace('-', "_")
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{EdgeDef, NodeDef, ZoneDef};

    fn flat() -> PipelineDef {
        PipelineDef {
            name: "flat".into(),
            nodes: vec![NodeDef::new("a"), NodeDef::new("b-2")],
            edges: vec![
                EdgeDef::new("E1", "a", "b-2").with_name("next"),
                EdgeDef::new("E2", "b-2", "_done"),
            ],
            start: "a".into(),
            ..PipelineDef::default()
        }
    }

    #[test]
    fn test_render_flat() {
        let out = render(&flat());
        assert_eq!(
            out,
            "graph LR\n    a -->|\"E1: next\"| b_2\n    b_2 -->|\"E2: E2\"| _done\n"
        );
    }

    #[test]
    fn test_render_zones_sorted_with_unzoned_nodes() {
        let mut def = flat();
        def.nodes.push(NodeDef::new("c"));
        def.zones.insert(
            "paint".into(),
            ZoneDef {
                nodes: vec!["b-2".into()],
                ..ZoneDef::default()
            },
        );
        def.zones.insert(
            "back-court".into(),
            ZoneDef {
                nodes: vec!["a".into()],
                ..ZoneDef::default()
            },
        );

        let out = render(&def);
        let expected = "graph LR\n\
            \x20   subgraph back_court [Back-court]\n\
            \x20       a\n\
            \x20   end\n\
            \x20   subgraph paint [Paint]\n\
            \x20       b_2\n\
            \x20   end\n\
            \x20   c\n\
            \x20   a -->|\"E1: next\"| b_2\n\
            \x20   b_2 -->|\"E2: E2\"| _done\n";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("frontcourt"), "Frontcourt");
        assert_eq!(capitalize_first(""), "");
    }
}
