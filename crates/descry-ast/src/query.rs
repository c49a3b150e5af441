//! Query expression tree nodes

use std::fmt;

use serde::{Deserialize, Serialize};

/// Leaf predicate kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparator {
    Equal,
    NotEqual,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    Between,
    NotBetween,
    In,
    NotIn,
    True,
    False,
    Exists,
    NotExists,
}

impl Comparator {
    pub const ALL: [Comparator; 14] = [
        Comparator::Equal,
        Comparator::NotEqual,
        Comparator::LessThan,
        Comparator::LessThanEqual,
        Comparator::GreaterThan,
        Comparator::GreaterThanEqual,
        Comparator::Between,
        Comparator::NotBetween,
        Comparator::In,
        Comparator::NotIn,
        Comparator::True,
        Comparator::False,
        Comparator::Exists,
        Comparator::NotExists,
    ];

    /// Number of method parameters the comparator binds
    pub fn arity(self) -> usize {
        match self {
            Comparator::True
            | Comparator::False
            | Comparator::Exists
            | Comparator::NotExists => 0,
            Comparator::Between | Comparator::NotBetween => 2,
            _ => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Comparator::Equal => "Equal",
            Comparator::NotEqual => "NotEqual",
            Comparator::LessThan => "LessThan",
            Comparator::LessThanEqual => "LessThanEqual",
            Comparator::GreaterThan => "GreaterThan",
            Comparator::GreaterThanEqual => "GreaterThanEqual",
            Comparator::Between => "Between",
            Comparator::NotBetween => "NotBetween",
            Comparator::In => "In",
            Comparator::NotIn => "NotIn",
            Comparator::True => "True",
            Comparator::False => "False",
            Comparator::Exists => "Exists",
            Comparator::NotExists => "NotExists",
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binary connective joining two sub-expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Connective {
    And,
    Or,
}

impl Connective {
    pub fn as_str(self) -> &'static str {
        match self {
            Connective::And => "And",
            Connective::Or => "Or",
        }
    }
}

/// A comparator applied to one field with its bound parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub comparator: Comparator,
    /// Dotted storage key path, e.g. `address.city`
    pub field: String,
    /// Names of the method parameters bound to the comparator, in order
    pub params: Vec<String>,
}

/// Predicate tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryExpr {
    Leaf(Condition),
    Node {
        connective: Connective,
        left: Box<QueryExpr>,
        right: Box<QueryExpr>,
    },
}

impl QueryExpr {
    pub fn leaf(comparator: Comparator, field: impl Into<String>, params: Vec<String>) -> Self {
        QueryExpr::Leaf(Condition {
            comparator,
            field: field.into(),
            params,
        })
    }

    pub fn node(connective: Connective, left: QueryExpr, right: QueryExpr) -> Self {
        QueryExpr::Node {
            connective,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Leaves in left-to-right order
    pub fn conditions(&self) -> Vec<&Condition> {
        let mut out = Vec::new();
        self.collect_conditions(&mut out);
        out
    }

    fn collect_conditions<'a>(&'a self, out: &mut Vec<&'a Condition>) {
        match self {
            QueryExpr::Leaf(condition) => out.push(condition),
            QueryExpr::Node { left, right, .. } => {
                left.collect_conditions(out);
                right.collect_conditions(out);
            }
        }
    }
}

impl fmt::Display for QueryExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryExpr::Leaf(c) => write!(f, "{} {}({})", c.field, c.comparator, c.params.join(", ")),
            QueryExpr::Node {
                connective,
                left,
                right,
            } => write!(f, "({} {} {})", left, connective.as_str(), right),
        }
    }
}

/// The predicate part of an operation: `All` or `By <expr>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Query {
    All,
    By(QueryExpr),
}

impl Query {
    pub fn expr(&self) -> Option<&QueryExpr> {
        match self {
            Query::All => None,
            Query::By(expr) => Some(expr),
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::All => f.write_str("All"),
            Query::By(expr) => write!(f, "By {}", expr),
        }
    }
}
