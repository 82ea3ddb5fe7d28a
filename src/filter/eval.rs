use crate::filter::ast::{ComparisonOp, FilterExpr, LogicalOp};

/// Evaluates a compiled filter against a cursor snapshot.
///
/// `cursor[i]` is the selected value index of dimension `i`. `AND` and `OR`
/// short-circuit, so the right operand is only visited when it can change
/// the result.
pub fn evaluate(expr: &FilterExpr, cursor: &[usize]) -> bool {
    match expr {
        FilterExpr::Comparison {
            dimension,
            position,
            op,
        } => {
            let is_equal = cursor[*dimension] == *position;
            match op {
                ComparisonOp::Equal => is_equal,
                ComparisonOp::NotEqual => !is_equal,
            }
        }
        FilterExpr::Logical { op, left, right } => match op {
            LogicalOp::And => evaluate(left, cursor) && evaluate(right, cursor),
            LogicalOp::Or => evaluate(left, cursor) || evaluate(right, cursor),
        },
    }
}

/// Evaluates an optional filter; an absent filter always accepts.
pub fn accepts(filter: Option<&FilterExpr>, cursor: &[usize]) -> bool {
    filter.map_or(true, |expr| evaluate(expr, cursor))
}
