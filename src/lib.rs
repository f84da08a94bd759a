//! A parser and semantic validator for `#pragma` annotation hints embedded in
//! shader source text.
//!
//! Shader authors attach type, range, default-value and binding-configuration
//! hints to uniforms, samplers and textures with annotation lines:
//!
//! ```text
//! #pragma label "Sun"
//! #pragma float sun.intensity : range(0.0..10.0) = 1.0
//! #pragma default uniform (calculate_size=true)
//! #pragma uniform scene_params (dynamic_offset=true)
//! #pragma sampler shadow_sampler (comparison=LessEqual)
//! #pragma texture atlas[4]
//! ```
//!
//! [`parse_unit`] scans one source unit for pragma lines, parses each into a
//! [`Directive`], validates the sequence (option legality, path uniqueness,
//! range/default consistency, ambient `default` scoping) and returns an
//! immutable [`Registry`], or a [`Diagnostics`] report carrying **every**
//! problem found in the unit. [`strip_pragmas`] yields the pragma-free source
//! for the downstream shader compiler.
//!
//! The input is treated as untrusted: malformed text is reported, never
//! panicked on. The pipeline is pure and synchronous; independent units can
//! be processed in parallel with no shared state.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod directive;
mod error;
mod parse;
mod registry;
mod scan;
mod schema;
mod validate;


use tracing::debug;

pub use crate::directive::{
    Bounds, Category, Declaration, DefaultScope, Directive, Kind, Label, Literal, OptionMap, Path,
};
pub use crate::error::{Diagnostics, ParseError, SemanticError};
pub use crate::parse::parse_directive;
pub use crate::registry::Registry;
pub use crate::scan::{pragma_lines, strip_pragmas, PragmaLines, PRAGMA_MARKER};

/// Parses and validates every pragma annotation in one shader source unit.
///
/// Parse errors do not hide later lines, and semantic validation runs over
/// whatever parsed cleanly, so a failing unit reports all of its problems in
/// one pass. A unit with any error yields no registry.
pub fn parse_unit(source: &str) -> Result<Registry, Diagnostics> {
    let mut parse_errors = Vec::new();
    let mut directives = Vec::new();
    for (line, text) in scan::pragma_lines(source) {
        match parse::parse_directive(line, text) {
            Ok(directive) => directives.push(directive),
            Err(err) => parse_errors.push(err),
        }
    }
    debug!(
        directives = directives.len(),
        parse_errors = parse_errors.len(),
        "scanned pragma annotations"
    );
    validate::validate_unit(directives, parse_errors)
}
