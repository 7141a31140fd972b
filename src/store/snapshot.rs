//! Node snapshot persistence - JSONL, one node per line
//!
//! The snapshot is rewritten in full on every mutation. Writes go through a
//! temp file renamed over the target so an interrupted write never leaves a
//! half-written snapshot behind.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use super::node::Node;

/// Load all nodes from a snapshot file, in file order
pub fn load(path: &Path) -> anyhow::Result<Vec<Node>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut nodes = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let node: Node = serde_json::from_str(&line)?;
        nodes.push(node);
    }

    Ok(nodes)
}

/// Write all nodes to a snapshot file, replacing any previous contents
pub fn save<'a>(path: &Path, nodes: impl Iterator<Item = &'a Node>) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = path.with_extension("jsonl.tmp");
    {
        let file = File::create(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        for node in nodes {
            let json = serde_json::to_string(node)?;
            writer.write_all(json.as_bytes())?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
    }
    std::fs::rename(&tmp_path, path)?;

    Ok(())
}
