// GraphQL wire framing and document rendering
//
// Requests are POSTed as `{"query": <document>}`; responses come back as
// `{"data": {...}}` and/or `{"errors": [...]}`. Documents are rendered from
// `Operation` values with inline argument literals, so the same operation
// always produces the same byte-for-byte document.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

// ── Wire envelope ───────────────────────────────────────────────────

/// Request body for a single GraphQL operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphQlRequest {
    pub query: String,
}

impl GraphQlRequest {
    pub fn new(operation: &Operation) -> Self {
        Self {
            query: operation.document(),
        }
    }
}

/// One entry of a GraphQL `errors` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlError {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub path: Vec<Value>,
}

/// Raw GraphQL response envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQlError>>,
}

impl GraphQlResponse {
    /// Unwrap the `data` tree, turning a non-empty `errors` array into an error.
    ///
    /// A response carrying both `data` and `errors` is still an error: partial
    /// results are never handed to the caller.
    pub fn into_data(self) -> Result<Value, Error> {
        if let Some(errors) = self.errors {
            if !errors.is_empty() {
                return Err(Error::GraphQl { errors });
            }
        }

        match self.data {
            Some(data) if !data.is_null() => Ok(data),
            _ => Err(Error::InvalidResponse {
                message: "response contains neither data nor errors".into(),
                body: String::new(),
            }),
        }
    }
}

// ── Selections ──────────────────────────────────────────────────────

/// Inline argument literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    Int(i64),
    Boolean(bool),
    String(String),
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Boolean(v) => write!(f, "{v}"),
            // JSON string escaping is a valid GraphQL string literal.
            Self::String(v) => write!(f, "{}", Value::String(v.clone())),
        }
    }
}

/// A field in a selection set, with optional arguments and sub-selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub name: &'static str,
    pub args: Vec<(&'static str, ArgValue)>,
    pub children: Vec<Selection>,
}

impl Selection {
    /// A leaf field with no arguments.
    pub fn leaf(name: &'static str) -> Self {
        Self {
            name,
            args: Vec::new(),
            children: Vec::new(),
        }
    }

    /// A field with a nested selection set.
    pub fn nested(name: &'static str, children: Vec<Selection>) -> Self {
        Self {
            name,
            args: Vec::new(),
            children,
        }
    }

    /// Look up an argument by name.
    pub fn arg(&self, name: &str) -> Option<&ArgValue> {
        self.args.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    fn render(&self, out: &mut String) {
        out.push_str(self.name);

        if !self.args.is_empty() {
            out.push('(');
            for (i, (name, value)) in self.args.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(name);
                out.push_str(": ");
                out.push_str(&value.to_string());
            }
            out.push(')');
        }

        if !self.children.is_empty() {
            out.push_str(" {");
            for child in &self.children {
                out.push(' ');
                child.render(out);
            }
            out.push_str(" }");
        }
    }
}

// ── Operations ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query => f.write_str("query"),
            Self::Mutation => f.write_str("mutation"),
        }
    }
}

/// A single top-level query or mutation, validated against the schema.
///
/// Construct through [`Schema::query`](crate::Schema::query) or
/// [`Schema::mutation`](crate::Schema::mutation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub(crate) kind: OperationKind,
    pub(crate) root: Selection,
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// The top-level field name, which is also the key of its result in `data`.
    pub fn name(&self) -> &'static str {
        self.root.name
    }

    pub fn root(&self) -> &Selection {
        &self.root
    }

    /// Render the operation as a GraphQL document.
    pub fn document(&self) -> String {
        let mut out = format!("{} {{ ", self.kind);
        self.root.render(&mut out);
        out.push_str(" }");
        out
    }
}
