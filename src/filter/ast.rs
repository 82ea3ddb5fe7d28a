use std::fmt;

/// Comparison between a dimension's cursor and a literal position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Equal,
    NotEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

/// A compiled filter expression.
///
/// Dimension references are resolved to indexes when the filter is
/// compiled, so a tree is only meaningful against the dimension list it was
/// compiled for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterExpr {
    Comparison {
        dimension: usize,
        position: usize,
        op: ComparisonOp,
    },
    Logical {
        op: LogicalOp,
        left: Box<FilterExpr>,
        right: Box<FilterExpr>,
    },
}

impl FilterExpr {
    pub fn comparison(dimension: usize, op: ComparisonOp, position: usize) -> Self {
        FilterExpr::Comparison {
            dimension,
            position,
            op,
        }
    }

    pub fn logical(op: LogicalOp, left: FilterExpr, right: FilterExpr) -> Self {
        FilterExpr::Logical {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// Renders the tree fully parenthesized, with dimensions as `#index`.
impl fmt::Display for FilterExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterExpr::Comparison {
                dimension,
                position,
                op,
            } => {
                let op = match op {
                    ComparisonOp::Equal => "==",
                    ComparisonOp::NotEqual => "!=",
                };
                write!(f, "#{dimension}{op}{position}")
            }
            FilterExpr::Logical { op, left, right } => {
                let op = match op {
                    LogicalOp::And => "AND",
                    LogicalOp::Or => "OR",
                };
                write!(f, "({left} {op} {right})")
            }
        }
    }
}
