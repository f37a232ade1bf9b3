//! Assertion helpers over generated POV-Ray text.
//!
//! Every failure names the check's context and shows the offending text, so a
//! scenario failure can be read without rerunning it.

use pov_export::names::mesh_ident;
use pov_export::ExportArtifacts;

use crate::helpers::{count_occurrences, HarnessError};

/// Longest excerpt of generated text quoted in a failure.
const EXCERPT: usize = 400;

fn excerpt(text: &str) -> &str {
    match text.char_indices().nth(EXCERPT) {
        Some((i, _)) => &text[..i],
        None => text,
    }
}

fn failed(ctx: &str, detail: String) -> HarnessError {
    HarnessError::AssertionFailed {
        detail: format!("[{ctx}] {detail}"),
    }
}

/// `needle` occurs in `text`.
pub fn assert_contains(text: &str, needle: &str, ctx: &str) -> Result<(), HarnessError> {
    if text.contains(needle) {
        Ok(())
    } else {
        Err(failed(
            ctx,
            format!("expected {needle:?} in:\n{}", excerpt(text)),
        ))
    }
}

/// `needle` does not occur in `text`.
pub fn assert_not_contains(text: &str, needle: &str, ctx: &str) -> Result<(), HarnessError> {
    match text.find(needle) {
        None => Ok(()),
        Some(at) => Err(failed(
            ctx,
            format!("unexpected {needle:?} at byte {at} in:\n{}", excerpt(&text[at..])),
        )),
    }
}

/// `needle` occurs exactly `expected` times.
pub fn assert_occurrences(
    text: &str,
    needle: &str,
    expected: usize,
    ctx: &str,
) -> Result<(), HarnessError> {
    let actual = count_occurrences(text, needle);
    if actual == expected {
        Ok(())
    } else {
        Err(failed(
            ctx,
            format!("expected {needle:?} {expected} times, found {actual}"),
        ))
    }
}

/// The needles appear in `text` in the given order.
pub fn assert_in_order(text: &str, needles: &[&str], ctx: &str) -> Result<(), HarnessError> {
    let mut from = 0;
    for needle in needles {
        match text[from..].find(needle) {
            Some(at) => from += at + needle.len(),
            None => {
                return Err(failed(
                    ctx,
                    format!("{needle:?} missing after byte {from}"),
                ))
            }
        }
    }
    Ok(())
}

/// The node labelled `label` was emitted as a mesh, and the mesh is declared.
pub fn assert_meshed(artifacts: &ExportArtifacts, label: &str, ctx: &str) -> Result<(), HarnessError> {
    let ident = mesh_ident(label);
    assert_contains(&artifacts.scene, &format!("object {{ {ident}"), ctx)?;
    assert_contains(&artifacts.meshes, &format!("#declare {ident} ="), ctx)
}

/// The node labelled `label` has no mesh anywhere.
pub fn assert_not_meshed(
    artifacts: &ExportArtifacts,
    label: &str,
    ctx: &str,
) -> Result<(), HarnessError> {
    let ident = mesh_ident(label);
    assert_not_contains(&artifacts.scene, &format!("object {{ {ident}"), ctx)?;
    assert_not_contains(&artifacts.meshes, &format!("#declare {ident} ="), ctx)
}

/// Nothing was tessellated: no side file content and no include for it.
pub fn assert_no_meshes(artifacts: &ExportArtifacts, ctx: &str) -> Result<(), HarnessError> {
    if !artifacts.meshes.is_empty() {
        return Err(failed(
            ctx,
            format!("expected no meshes, got:\n{}", excerpt(&artifacts.meshes)),
        ));
    }
    assert_not_contains(&artifacts.scene, "_mesh.inc\"", ctx)
}
