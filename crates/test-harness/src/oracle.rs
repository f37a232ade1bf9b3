//! Verification oracles: pure functions returning pass/fail verdicts.
//!
//! Each oracle returns an `OracleVerdict` with diagnostic detail instead of
//! panicking, so one pass collects every failure.

use pov_export::ExportArtifacts;

use crate::helpers::mesh_references;

/// The result of a single oracle check.
#[derive(Debug, Clone)]
pub struct OracleVerdict {
    pub oracle_name: String,
    pub passed: bool,
    pub detail: String,
}

impl OracleVerdict {
    fn pass(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: true,
            detail,
        }
    }

    fn fail(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: false,
            detail,
        }
    }
}

// ── Syntax Oracles ──────────────────────────────────────────────────────────

/// Every `{` is closed, and never before it was opened. Comments are skipped.
pub fn check_balanced_braces(text: &str) -> OracleVerdict {
    let mut depth: i64 = 0;
    for (line_no, line) in text.lines().enumerate() {
        let code = line.split("//").next().unwrap_or("");
        for c in code.chars() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth < 0 {
                        return OracleVerdict::fail(
                            "balanced_braces",
                            format!("unmatched '}}' on line {}", line_no + 1),
                        );
                    }
                }
                _ => {}
            }
        }
    }
    if depth == 0 {
        OracleVerdict::pass("balanced_braces", "all braces matched".into())
    } else {
        OracleVerdict::fail("balanced_braces", format!("{depth} unclosed '{{'"))
    }
}

/// `#while` loops and `#end` directives pair up.
pub fn check_loop_directives(text: &str) -> OracleVerdict {
    let loops = text.matches("#while").count();
    let ends = text.matches("#end").count();
    if loops == ends {
        OracleVerdict::pass("loop_directives", format!("{loops} loops closed"))
    } else {
        OracleVerdict::fail(
            "loop_directives",
            format!("{loops} #while against {ends} #end"),
        )
    }
}

/// No `NaN` or `inf` leaked into a number.
pub fn check_finite_numbers(text: &str) -> OracleVerdict {
    let bad: Vec<&str> = text
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '.' || c == '-'))
        .filter(|tok| matches!(*tok, "NaN" | "-NaN" | "inf" | "-inf"))
        .collect();
    if bad.is_empty() {
        OracleVerdict::pass("finite_numbers", "no non-finite values".into())
    } else {
        OracleVerdict::fail(
            "finite_numbers",
            format!("{} non-finite values, first {:?}", bad.len(), bad[0]),
        )
    }
}

// ── Mesh Oracles ────────────────────────────────────────────────────────────

/// Every mesh the scene references is declared in the side file, and the
/// side file is included exactly when it has content.
pub fn check_mesh_references(artifacts: &ExportArtifacts) -> OracleVerdict {
    let missing: Vec<&str> = mesh_references(&artifacts.scene)
        .into_iter()
        .filter(|ident| !artifacts.meshes.contains(&format!("#declare {ident} =")))
        .collect();
    if !missing.is_empty() {
        return OracleVerdict::fail(
            "mesh_references",
            format!("undeclared meshes: {}", missing.join(", ")),
        );
    }

    let included = artifacts.scene.contains("_mesh.inc\"");
    let has_meshes = !artifacts.meshes.is_empty();
    if included != has_meshes {
        return OracleVerdict::fail(
            "mesh_references",
            format!("mesh include present: {included}, meshes written: {has_meshes}"),
        );
    }
    OracleVerdict::pass("mesh_references", "every mesh reference resolved".into())
}

/// Each declaration in the side file appears once.
pub fn check_unique_mesh_declarations(meshes: &str) -> OracleVerdict {
    let mut seen: Vec<&str> = Vec::new();
    for line in meshes.lines() {
        let Some(rest) = line.strip_prefix("#declare ") else {
            continue;
        };
        let ident = rest.split_whitespace().next().unwrap_or("");
        if seen.contains(&ident) {
            return OracleVerdict::fail(
                "unique_mesh_declarations",
                format!("{ident} declared twice"),
            );
        }
        seen.push(ident);
    }
    OracleVerdict::pass(
        "unique_mesh_declarations",
        format!("{} declarations", seen.len()),
    )
}

/// Every oracle over one export.
pub fn check_all(artifacts: &ExportArtifacts) -> Vec<OracleVerdict> {
    vec![
        check_balanced_braces(&artifacts.scene),
        check_balanced_braces(&artifacts.meshes),
        check_loop_directives(&artifacts.scene),
        check_finite_numbers(&artifacts.scene),
        check_finite_numbers(&artifacts.meshes),
        check_mesh_references(artifacts),
        check_unique_mesh_declarations(&artifacts.meshes),
    ]
}
