use std::fmt::Display;

use crate::graph::DependencyGraph;

pub fn render_flat<T: Display>(graph: &DependencyGraph<T>) -> String {
    let mut out = String::new();
    for (id, payload) in graph.nodes() {
        out.push_str(&payload.to_string());
        out.push('\n');
        for &dep in graph.edges_of(id) {
            out.push_str("  -> ");
            out.push_str(&graph.payload(dep).to_string());
            out.push('\n');
        }
    }
    out
}

pub fn render_dot<T: Display>(graph: &DependencyGraph<T>) -> String {
    let mut out = String::from("digraph ordo {\n");
    for (_, payload) in graph.nodes() {
        out.push_str(&format!(
            "  \"{}\";\n",
            escape_dot_label(&payload.to_string())
        ));
    }
    for (id, payload) in graph.nodes() {
        for &dep in graph.edges_of(id) {
            out.push_str(&format!(
                "  \"{}\" -> \"{}\";\n",
                escape_dot_label(&payload.to_string()),
                escape_dot_label(&graph.payload(dep).to_string())
            ));
        }
    }
    out.push_str("}\n");
    out
}

fn escape_dot_label(label: &str) -> String {
    label.replace('"', "\\\"")
}
