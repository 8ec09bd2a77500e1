//! Query predicates

use std::fmt;

/// A single query predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Field equals value
    At { path: String, value: String },
}

impl Predicate {
    pub fn at(path: &str, value: &str) -> Self {
        Self::At {
            path: path.to_string(),
            value: value.to_string(),
        }
    }

    /// Documents of a custom type
    pub fn document_type(document_type: &str) -> Self {
        Self::at("document.type", document_type)
    }

    /// The document of a custom type with the given uid
    pub fn uid(document_type: &str, uid: &str) -> Self {
        Self::at(&format!("my.{}.uid", document_type), uid)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::At { path, value } => write!(f, "[at({},{})]", path, quote(value)),
        }
    }
}

/// Render a predicate list as the `q` query parameter
pub fn to_query(predicates: &[Predicate]) -> String {
    let inner: String = predicates.iter().map(|p| p.to_string()).collect();
    format!("[{}]", inner)
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
