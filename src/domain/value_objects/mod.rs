//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod linking;
mod linting_issue;
mod node_id;
mod node_kind;
mod platform;
mod settings;
mod stage;

pub use linking::{BuildContext, EdgeCondition, LinkingKind};
pub use linting_issue::{
    render_issues, IssueSubject, LintRule, LintingIssue, LintingIssues, Severity,
};
pub use node_id::NodeId;
pub use node_kind::NodeKind;
pub use platform::Platform;
pub use settings::{Settings, SettingsMap};
pub use stage::GenerationStage;
