use crate::lint_context::LintContext;
use crate::mdast::Node;
use crate::position::Point;
use dyn_clone::DynClone;
use serde::Serialize;
use thiserror::Error;

/// A single lint message.
///
/// Rules create warnings without knowing the id they are registered under;
/// `rule_name` is filled in by the dispatcher. A line or column of 0 means
/// the position is unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintWarning {
    pub rule_name: Option<String>,
    pub message: String,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
    pub end_line: usize,
    pub end_column: usize,
    /// Fatal messages come from `fail`-style errors or rules configured at
    /// the `error` level
    pub fatal: bool,
}

impl LintWarning {
    /// Warning covering a node's span; generated nodes yield an unknown position
    pub fn at_node(node: &Node, message: impl Into<String>) -> Self {
        let start = node.position.start.point();
        let end = node.position.end.point().or(start);
        Self {
            rule_name: None,
            message: message.into(),
            line: start.map_or(0, |p| p.line),
            column: start.map_or(0, |p| p.column),
            end_line: end.map_or(0, |p| p.line),
            end_column: end.map_or(0, |p| p.column),
            fatal: false,
        }
    }

    /// Warning at a single point
    pub fn at_point(point: Point, message: impl Into<String>) -> Self {
        Self {
            rule_name: None,
            message: message.into(),
            line: point.line,
            column: point.column,
            end_line: point.line,
            end_column: point.column,
            fatal: false,
        }
    }

    /// Warning between two points
    pub fn between(start: Point, end: Point, message: impl Into<String>) -> Self {
        Self {
            end_line: end.line,
            end_column: end.column,
            ..Self::at_point(start, message)
        }
    }

    pub fn fatal(mut self) -> Self {
        self.fatal = true;
        self
    }

    pub fn with_rule_name(mut self, name: impl Into<String>) -> Self {
        self.rule_name = Some(name.into());
        self
    }
}

/// Failure that aborts one rule's run.
///
/// The dispatcher turns it into a single fatal warning for that rule and keeps
/// running the others.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LintError {
    /// The rule's option is outside the values it accepts
    #[error("{message}")]
    InvalidOption { message: String },

    /// Any other failure, optionally attributed to a source location
    #[error("{message}")]
    Fatal {
        message: String,
        line: usize,
        column: usize,
    },
}

impl LintError {
    pub fn invalid_option(message: impl Into<String>) -> Self {
        LintError::InvalidOption {
            message: message.into(),
        }
    }

    /// Fail at a node; generated nodes fall back to the document start
    pub fn at_node(node: &Node, message: impl Into<String>) -> Self {
        let start = node.position.start.point();
        LintError::Fatal {
            message: message.into(),
            line: start.map_or(1, |p| p.line),
            column: start.map_or(1, |p| p.column),
        }
    }

    /// The fatal warning reported in place of the rule's output
    pub fn into_warning(self) -> LintWarning {
        match self {
            LintError::InvalidOption { message } => LintWarning::at_point(Point::new(1, 1, 0), message).fatal(),
            LintError::Fatal { message, line, column } => LintWarning {
                rule_name: None,
                message,
                line,
                column,
                end_line: line,
                end_column: column,
                fatal: true,
            },
        }
    }
}

pub type LintResult = Result<Vec<LintWarning>, LintError>;

/// A pluggable check over a positioned tree.
///
/// `option` is the rule's configured value passed through verbatim; `None`
/// means "use the rule's default". Rules must skip generated nodes.
pub trait Rule: DynClone + Send + Sync {
    /// Registered id, e.g. `emphasis-marker`
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn check(&self, ctx: &LintContext, option: Option<&toml::Value>) -> LintResult;
}

dyn_clone::clone_trait_object!(Rule);
