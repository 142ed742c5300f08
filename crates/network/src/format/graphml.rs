use indexmap::IndexMap;
use netbuilder_core::{Attributes, FieldValue};
use netbuilder_graph::Graph;

const HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<graphml xmlns="http://graphml.graphdrawing.org/xmlns" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="http://graphml.graphdrawing.org/xmlns http://graphml.graphdrawing.org/xmlns/1.0/graphml.xsd">
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrType {
    Boolean,
    Long,
    Double,
    String,
}

impl AttrType {
    fn of(value: &FieldValue) -> Self {
        match value {
            FieldValue::Boolean(_) => AttrType::Boolean,
            FieldValue::Integer(_) => AttrType::Long,
            FieldValue::Float(_) => AttrType::Double,
            FieldValue::Text(_) => AttrType::String,
        }
    }

    /// Widest type covering both; integers widen to doubles, anything else
    /// mixed falls back to strings.
    fn widen(self, other: Self) -> Self {
        match (self, other) {
            (a, b) if a == b => a,
            (AttrType::Long, AttrType::Double) | (AttrType::Double, AttrType::Long) => {
                AttrType::Double
            }
            _ => AttrType::String,
        }
    }

    fn name(self) -> &'static str {
        match self {
            AttrType::Boolean => "boolean",
            AttrType::Long => "long",
            AttrType::Double => "double",
            AttrType::String => "string",
        }
    }
}

/// Attribute keys for one domain (`node` or `edge`), with `d<n>` ids.
struct KeySet {
    domain: &'static str,
    offset: usize,
    types: IndexMap<String, AttrType>,
}

impl KeySet {
    fn collect<'a, I>(domain: &'static str, offset: usize, maps: I) -> Self
    where
        I: Iterator<Item = &'a Attributes>,
    {
        let mut types: IndexMap<String, AttrType> = IndexMap::new();
        for attrs in maps {
            for (key, value) in attrs {
                let ty = AttrType::of(value);
                types
                    .entry(key.clone())
                    .and_modify(|t| *t = t.widen(ty))
                    .or_insert(ty);
            }
        }
        Self {
            domain,
            offset,
            types,
        }
    }

    fn id_of(&self, key: &str) -> Option<String> {
        self.types
            .get_index_of(key)
            .map(|i| format!("d{}", self.offset + i))
    }

    fn write_keys(&self, out: &mut String) {
        for (i, (name, ty)) in self.types.iter().enumerate() {
            out.push_str(&format!(
                "  <key id=\"d{}\" for=\"{}\" attr.name=\"{}\" attr.type=\"{}\"/>\n",
                self.offset + i,
                self.domain,
                escape(name),
                ty.name()
            ));
        }
    }

    fn write_data(&self, out: &mut String, attrs: &Attributes) {
        for (key, value) in attrs {
            if let Some(id) = self.id_of(key) {
                out.push_str(&format!(
                    "      <data key=\"{}\">{}</data>\n",
                    id,
                    escape(&value.to_string())
                ));
            }
        }
    }
}

/// GraphML 1.0 document for `graph`. Graph-level metrics are not encoded.
pub fn to_graphml(graph: &Graph) -> String {
    let node_keys = KeySet::collect("node", 0, graph.nodes.values().map(|n| &n.attributes));
    let edge_keys = KeySet::collect(
        "edge",
        node_keys.types.len(),
        graph.edges.values().map(|e| &e.attributes),
    );

    let mut out = String::from(HEADER);
    node_keys.write_keys(&mut out);
    edge_keys.write_keys(&mut out);
    out.push_str("  <graph edgedefault=\"directed\">\n");

    for node in graph.nodes.values() {
        if node.attributes.is_empty() {
            out.push_str(&format!("    <node id=\"{}\"/>\n", escape(&node.id)));
            continue;
        }
        out.push_str(&format!("    <node id=\"{}\">\n", escape(&node.id)));
        node_keys.write_data(&mut out, &node.attributes);
        out.push_str("    </node>\n");
    }

    for edge in graph.edges.values() {
        let open = format!(
            "    <edge source=\"{}\" target=\"{}\"",
            escape(&edge.source),
            escape(&edge.target)
        );
        if edge.attributes.is_empty() {
            out.push_str(&open);
            out.push_str("/>\n");
            continue;
        }
        out.push_str(&open);
        out.push_str(">\n");
        edge_keys.write_data(&mut out, &edge.attributes);
        out.push_str("    </edge>\n");
    }

    out.push_str("  </graph>\n</graphml>\n");
    out
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_nodes_and_edges() {
        let mut g = Graph::new();
        let a = g.add_node("http://ex.org/a?x=1&y=2");
        a.attributes.insert("pagerank".into(), FieldValue::from(0.5));
        a.attributes.insert("degree".into(), FieldValue::from(1i64));
        let b = g.add_node("b");
        b.attributes.insert("degree".into(), FieldValue::from(1.5));
        g.add_edge("http://ex.org/a?x=1&y=2", "b")
            .attributes
            .insert("label".into(), FieldValue::from("knows"));

        let xml = to_graphml(&g);

        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains(r#"<key id="d0" for="node" attr.name="pagerank" attr.type="double"/>"#));
        assert!(xml.contains(r#"<key id="d1" for="node" attr.name="degree" attr.type="double"/>"#));
        assert!(xml.contains(r#"<key id="d2" for="edge" attr.name="label" attr.type="string"/>"#));
        assert!(xml.contains(r#"<graph edgedefault="directed">"#));
        assert!(xml.contains(r#"<node id="http://ex.org/a?x=1&amp;y=2">"#));
        assert!(xml.contains(r#"<data key="d2">knows</data>"#));
        assert!(xml.trim_end().ends_with("</graphml>"));
    }

    #[test]
    fn empty_graph_is_valid_document() {
        let xml = to_graphml(&Graph::new());
        assert!(!xml.contains("<key"));
        assert!(xml.contains("<graph edgedefault=\"directed\">\n  </graph>"));
    }
}
