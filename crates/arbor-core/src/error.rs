#![forbid(unsafe_code)]

//! Error taxonomy.
//!
//! Every failure is final for the current viewer session: nothing here is
//! retryable because nothing here performs I/O.

use std::fmt;

/// Why a hierarchy was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HierarchyFault {
    /// A node is reachable from one of its own descendants.
    Cycle,
    /// A node is listed as the child of more than one parent.
    SharedNode,
}

impl fmt::Display for HierarchyFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cycle => f.write_str("cycle"),
            Self::SharedNode => f.write_str("shared node"),
        }
    }
}

/// Arbor error type.
#[derive(Debug, Clone, PartialEq)]
pub enum ArborError {
    /// The input is not a finite tree.
    MalformedHierarchy {
        /// Label of the node that was revisited.
        node: String,
        /// What kind of revisit was detected.
        reason: HierarchyFault,
    },

    /// Layout produced no visible nodes. The root is always visible, so this
    /// is an invariant violation.
    EmptyLayout,

    /// The host did not supply a measurable container.
    MissingContainer {
        /// Width reported by the host, if any.
        width: Option<f64>,
        /// Height reported by the host, if any.
        height: Option<f64>,
    },

    /// Source data could not be parsed into a hierarchy.
    InvalidSource {
        /// 1-based line of the failure, 0 if unknown.
        line: usize,
        /// 1-based column of the failure, 0 if unknown.
        column: usize,
        /// Parser message.
        message: String,
    },

    /// A node id outside the tree was referenced.
    UnknownNode(usize),

    /// A configuration value is out of range.
    InvalidConfig {
        /// Name of the offending setting.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl fmt::Display for ArborError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedHierarchy { node, reason } => {
                write!(f, "malformed hierarchy: {reason} at node {node:?}")
            }
            Self::EmptyLayout => f.write_str("layout produced no visible nodes"),
            Self::MissingContainer { width, height } => match (width, height) {
                (Some(w), Some(h)) => write!(f, "container is not measurable ({w}x{h})"),
                _ => f.write_str("no container supplied"),
            },
            Self::InvalidSource {
                line,
                column,
                message,
            } => write!(f, "invalid source at {line}:{column}: {message}"),
            Self::UnknownNode(id) => write!(f, "unknown node id {id}"),
            Self::InvalidConfig { field, reason } => {
                write!(f, "invalid configuration for {field}: {reason}")
            }
        }
    }
}

impl std::error::Error for ArborError {}

/// Standard result type for arbor APIs.
pub type Result<T> = std::result::Result<T, ArborError>;
