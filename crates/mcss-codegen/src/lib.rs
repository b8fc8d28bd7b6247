//! MCSS Code Generator
//!
//! Transforms the flat chunk sequence produced by `mcss-parser` into CSS
//! text. Every pass is a pure function over one owned `Vec<Chunk>`,
//! applied in a fixed order:
//!
//! ```text
//! chunks → at-rule extraction → guard filtering → selector resolution
//!        → shorthand expansion (model, place, quadruples)
//!        → transition/transform accumulation → structural fixups
//!        → keyframe distribution → serialization
//! ```

pub mod accumulate;
pub mod atrules;
pub mod fixups;
pub mod guards;
pub mod keyframes;
pub mod output;
pub mod selector;
pub mod shorthand;

use mcss_parser::Chunk;

/// Code generation error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Codegen error: {message}")]
pub struct CodegenError {
    pub message: String,
}

/// Compile a chunk sequence into CSS text.
pub fn compile(chunks: Vec<Chunk>) -> Result<String, CodegenError> {
    let chunks = atrules::extract(chunks);
    let chunks = guards::filter_valid(chunks);
    let chunks = selector::resolve(chunks);
    let chunks = shorthand::expand_model(chunks)?;
    let chunks = shorthand::expand_place(chunks)?;
    let chunks = shorthand::expand_quadruples(chunks);
    let chunks = accumulate::transitions(chunks);
    let chunks = accumulate::transforms(chunks);
    let chunks = fixups::apply(chunks);
    let chunks = keyframes::distribute(chunks);
    Ok(output::serialize(&chunks))
}
