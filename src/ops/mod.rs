//! Pipeline operations
//!
//! One module per named operation. Each is constructed by the pipeline with
//! the collaborators it needs and returns a typed outcome; none of them
//! terminates the process.

pub mod clean;
pub mod compile;
pub mod docs;
pub mod validate;

pub use clean::CleanOperation;
pub use compile::CompileOperation;
pub use docs::DocsOperation;
pub use validate::ValidateOperation;

/// Catalog entry for external task-runner integration
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct OperationInfo {
    pub name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
}

pub const COMPILE: OperationInfo = OperationInfo {
    name: "compile",
    display_name: "Compile",
    description: "Compile sources and run them through the post-processing chain",
};

pub const CLEAN: OperationInfo = OperationInfo {
    name: "clean",
    display_name: "Clean",
    description: "Delete previously generated artifacts",
};

pub const VALIDATE: OperationInfo = OperationInfo {
    name: "validate",
    display_name: "Validate",
    description: "Lint sources changed since the last validation pass",
};

pub const DOCS: OperationInfo = OperationInfo {
    name: "docs",
    display_name: "Docs",
    description: "Generate style documentation",
};

pub const WATCH: OperationInfo = OperationInfo {
    name: "watch",
    display_name: "Watch",
    description: "Re-run bound operations on source changes",
};
