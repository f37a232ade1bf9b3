//! Structured text reports of one export.
//!
//! Reports are plain text so a failing scenario can print what every root
//! node turned into.

use std::fmt;

use pov_export::document::roots;
use pov_export::names::{mesh_ident, sanitize};
use pov_export::ExportArtifacts;
use scene_types::SceneDocument;

use crate::helpers::node_section;
use crate::oracle::{self, OracleVerdict};

/// How a root node ended up in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    /// Native POV-Ray primitives and CSG.
    Analytic,
    /// A reference to a `mesh2` in the side file.
    Mesh,
    /// Nothing was emitted.
    Empty,
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Representation::Analytic => "analytic",
            Representation::Mesh => "mesh",
            Representation::Empty => "empty",
        })
    }
}

/// One root node's entry.
pub struct RootEntry {
    pub label: String,
    pub type_id: String,
    pub representation: Representation,
}

/// A complete export report.
pub struct ExportReport {
    pub roots: Vec<RootEntry>,
    pub scene_bytes: usize,
    pub mesh_declarations: usize,
    pub tessellate_calls: usize,
    pub oracle_results: Vec<OracleVerdict>,
}

impl ExportReport {
    pub fn build(doc: &SceneDocument, artifacts: &ExportArtifacts, tessellate_calls: usize) -> Self {
        let entries = roots(doc)
            .into_iter()
            .filter_map(|id| doc.get(id))
            .map(|node| RootEntry {
                label: node.label.clone(),
                type_id: node.kind.type_id().to_string(),
                representation: representation(&artifacts.scene, &node.label),
            })
            .collect();

        Self {
            roots: entries,
            scene_bytes: artifacts.scene.len(),
            mesh_declarations: artifacts.meshes.matches("#declare ").count(),
            tessellate_calls,
            oracle_results: oracle::check_all(artifacts),
        }
    }

    pub fn count(&self, representation: Representation) -> usize {
        self.roots
            .iter()
            .filter(|r| r.representation == representation)
            .count()
    }

    pub fn all_oracles_passed(&self) -> bool {
        self.oracle_results.iter().all(|v| v.passed)
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str("=== POV-Ray Export Report ===\n\n");
        out.push_str(&format!(
            "Roots ({} analytic, {} mesh, {} empty):\n",
            self.count(Representation::Analytic),
            self.count(Representation::Mesh),
            self.count(Representation::Empty),
        ));
        for (i, root) in self.roots.iter().enumerate() {
            out.push_str(&format!(
                "  [{}] {} ({}): {}\n",
                i, root.label, root.type_id, root.representation
            ));
        }

        out.push_str(&format!(
            "\nScene: {} bytes, {} mesh declarations, {} tessellation calls\n",
            self.scene_bytes, self.mesh_declarations, self.tessellate_calls
        ));

        out.push_str("\nOracles:\n");
        for verdict in &self.oracle_results {
            let status = if verdict.passed { "PASS" } else { "FAIL" };
            out.push_str(&format!(
                "  [{}] {}: {}\n",
                status, verdict.oracle_name, verdict.detail
            ));
        }
        out
    }
}

/// Classify the code emitted under the node's label marker.
fn representation(scene: &str, label: &str) -> Representation {
    let Some(section) = node_section(scene, &sanitize(label)) else {
        return Representation::Empty;
    };
    let body = section
        .split_once('\n')
        .map_or("", |(_, rest)| rest)
        .trim_start();
    if body.is_empty() {
        Representation::Empty
    } else if body.starts_with(&format!("object {{ {}", mesh_ident(label))) {
        Representation::Mesh
    } else {
        Representation::Analytic
    }
}

impl fmt::Display for ExportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}
