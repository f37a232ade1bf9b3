//! Test harness for end-to-end export scenarios.
//!
//! Scripts scene documents by name, compiles them through the real
//! assembler with a [`tessellator::MockTessellator`], and checks the
//! generated POV-Ray text.
//!
//! # Key Components
//!
//! - [`SceneBuilder`]: fluent API for building and exporting documents
//! - [`oracle`]: structural checks on generated text, returning verdicts
//! - [`report`]: plain-text summary of what each root became
//! - [`helpers`]: error type and sketch profile builders
//! - [`assertions`]: text assertions with diagnostics

pub mod assertions;
pub mod builder;
pub mod helpers;
pub mod oracle;
pub mod report;

pub use builder::SceneBuilder;
pub use helpers::HarnessError;
pub use oracle::OracleVerdict;
pub use report::ExportReport;
