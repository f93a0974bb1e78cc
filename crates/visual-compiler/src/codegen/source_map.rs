//! Source Map v3 output
//!
//! The "source" of generated code is the project document itself: each
//! node is treated as one line of `<project>.visual.json`, in project
//! order, and every generated line a node produced maps to that line.
//! `names` carries the node ids.

use std::collections::HashMap;

use serde::Serialize;
use visual_graph::VisualProject;

use crate::error::CodegenResult;

const BASE64: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SourceMapV3<'a> {
    version: u8,
    file: &'a str,
    sources: Vec<String>,
    names: Vec<&'a str>,
    mappings: String,
}

/// Append one base64 VLQ value
fn encode_vlq(value: i64, out: &mut String) {
    let zigzag = if value < 0 {
        ((-value) << 1) | 1
    } else {
        value << 1
    };
    let mut rest = zigzag as u64;

    loop {
        let mut digit = (rest & 0b1_1111) as usize;
        rest >>= 5;
        if rest > 0 {
            digit |= 0b10_0000;
        }
        out.push(BASE64[digit] as char);
        if rest == 0 {
            break;
        }
    }
}

/// Build the source map JSON for generated code
///
/// `line_nodes` maps 0-based generated lines to node ids; lines without
/// an entry have no mapping.
pub fn build_source_map(
    project: &VisualProject,
    file: &str,
    line_count: usize,
    line_nodes: &[(usize, String)],
) -> CodegenResult<String> {
    let node_lines: HashMap<&str, usize> = project
        .nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();
    let by_line: HashMap<usize, &str> = line_nodes
        .iter()
        .map(|(line, node)| (*line, node.as_str()))
        .collect();

    let mut names: Vec<&str> = Vec::new();
    let mut name_index: HashMap<&str, usize> = HashMap::new();
    let mut mappings = String::new();
    let (mut prev_source_line, mut prev_name) = (0i64, 0i64);

    for line in 0..line_count {
        if line > 0 {
            mappings.push(';');
        }
        let Some(node_id) = by_line.get(&line).copied() else {
            continue;
        };
        let Some(&source_line) = node_lines.get(node_id) else {
            continue;
        };
        let name = *name_index.entry(node_id).or_insert_with(|| {
            names.push(node_id);
            names.len() - 1
        });

        // generated column, source index, source line, source column, name
        encode_vlq(0, &mut mappings);
        encode_vlq(0, &mut mappings);
        encode_vlq(source_line as i64 - prev_source_line, &mut mappings);
        encode_vlq(0, &mut mappings);
        encode_vlq(name as i64 - prev_name, &mut mappings);
        prev_source_line = source_line as i64;
        prev_name = name as i64;
    }

    let map = SourceMapV3 {
        version: 3,
        file,
        sources: vec![format!("{}.visual.json", project.id)],
        names,
        mappings,
    };
    Ok(serde_json::to_string(&map)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use visual_graph::ProjectBuilder;

    fn vlq(value: i64) -> String {
        let mut out = String::new();
        encode_vlq(value, &mut out);
        out
    }

    #[test]
    fn test_vlq_encoding() {
        assert_eq!(vlq(0), "A");
        assert_eq!(vlq(1), "C");
        assert_eq!(vlq(-1), "D");
        assert_eq!(vlq(15), "e");
        assert_eq!(vlq(16), "gB");
        assert_eq!(vlq(-17), "jB");
    }

    #[test]
    fn test_source_map_document() {
        let project = ProjectBuilder::new("Map")
            .add_raw_node("a", "text", (0.0, 0.0))
            .add_raw_node("b", "text", (0.0, 0.0))
            .build();
        let lines = vec![
            (1, "b".to_string()),
            (2, "b".to_string()),
            (4, "a".to_string()),
        ];

        let json = build_source_map(&project, "Map.jsx", 5, &lines).unwrap();
        let map: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(map["version"], 3);
        assert_eq!(map["file"], "Map.jsx");
        assert_eq!(map["sources"][0], "project-map.visual.json");
        assert_eq!(map["names"], serde_json::json!(["b", "a"]));
        // line 1: b (source line 1, name 0); line 2: same; line 4: a (line 0, name 1)
        assert_eq!(map["mappings"], ";AACAA;AAAAA;;AADAC");
    }
}
