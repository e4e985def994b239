//! Typed, fatal errors for a solve call.

/// All the ways a solve can fail.
///
/// Every variant is fatal to the invocation and carries enough context to
/// render a human-readable message. The solver never logs and never drops a
/// file or module silently; anything it cannot honor surfaces here.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    #[error("module '{module}' depends on unknown module '{dep}'")]
    UnknownDepModule { module: String, dep: String },

    #[error("module dependency cycle involving: {}", names.join(", "))]
    ModuleCycle { names: Vec<String> },

    #[error("module '{module}' transitively depends on multiple root modules: {}", roots.join(", "))]
    MultipleRoots { module: String, roots: Vec<String> },

    #[error("file '{path}' is declared with conflicting compile classes")]
    MixedCompileClass { path: String },

    #[error("inferred load-order cycle among files: {}", paths.join(", "))]
    InferredFileCycle { paths: Vec<String> },
}
