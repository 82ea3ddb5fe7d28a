//! Filter compiler.
//!
//! Converts filter source such as `Size==0 AND (Color!=1 OR Font==2)` into a
//! [`FilterExpr`] tree in a single left-to-right scan. Pending nodes live on
//! an explicit stack; every completed comparison is merged into whatever
//! connective or group is waiting for it.
//!
//! `AND` and `OR` share one precedence level and bind in the order they
//! appear: `A==0 OR B==0 AND C==0` is `(A==0 OR B==0) AND C==0`.

use crate::diagnostics::{to_error_source, Span};
use crate::filter::ast::{ComparisonOp, FilterExpr, LogicalOp};
use crate::{err_ctx, CombinatoriaError};

// ============================================================================
// PUBLIC API
// ============================================================================

/// Compiles filters against a fixed list of dimension names.
///
/// A name's position in the list is the dimension index stored in the
/// compiled tree.
#[derive(Debug, Clone, Copy)]
pub struct FilterCompiler<'a> {
    names: &'a [&'a str],
}

impl<'a> FilterCompiler<'a> {
    pub fn new(names: &'a [&'a str]) -> Self {
        Self { names }
    }

    /// Compiles one filter. `origin` names the filter in diagnostics.
    ///
    /// Empty source compiles to `None`, which always accepts.
    pub fn compile(
        &self,
        origin: &str,
        source: &str,
    ) -> Result<Option<FilterExpr>, CombinatoriaError> {
        if source.is_empty() {
            return Ok(None);
        }
        FilterParser::new(origin, source, self.names).parse().map(Some)
    }

    fn resolve(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| *n == name)
    }
}

/// Compiles a single filter against `names`.
pub fn compile(source: &str, names: &[&str]) -> Result<Option<FilterExpr>, CombinatoriaError> {
    FilterCompiler::new(names).compile("filter", source)
}

// ============================================================================
// PARSER STATE
// ============================================================================

/// An entry on the pending-node stack.
#[derive(Debug)]
enum Pending {
    /// An opening parenthesis that has not been closed yet.
    Open(Span),
    /// A completed expression.
    Expr(FilterExpr, Span),
    /// A connective with its left operand, waiting for the right one.
    Connective {
        op: LogicalOp,
        left: FilterExpr,
        span: Span,
    },
}

struct FilterParser<'a> {
    origin: &'a str,
    source: &'a str,
    compiler: FilterCompiler<'a>,
    chars: Vec<(usize, char)>,
    pos: usize,
    stack: Vec<Pending>,
    symbol: String,
    symbol_span: Span,
    symbol_closed: bool,
}

type ParseResult<T> = Result<T, CombinatoriaError>;

impl<'a> FilterParser<'a> {
    fn new(origin: &'a str, source: &'a str, names: &'a [&'a str]) -> Self {
        Self {
            origin,
            source,
            compiler: FilterCompiler::new(names),
            chars: source.char_indices().collect(),
            pos: 0,
            stack: Vec::new(),
            symbol: String::new(),
            symbol_span: Span::default(),
            symbol_closed: false,
        }
    }

    fn parse(mut self) -> ParseResult<FilterExpr> {
        while let Some(&(offset, c)) = self.chars.get(self.pos) {
            let span = Span::at(offset, c);
            match c {
                '(' => {
                    self.expect_no_symbol(span)?;
                    self.stack.push(Pending::Open(span));
                    self.pos += 1;
                }
                ')' => {
                    self.expect_no_symbol(span)?;
                    self.close_group(span)?;
                    self.pos += 1;
                }
                '=' | '!' => {
                    let (node, node_span) = self.comparison()?;
                    self.merge(node, node_span)?;
                    self.symbol.clear();
                    self.symbol_closed = false;
                }
                ' ' => {
                    if !self.symbol.is_empty() {
                        self.symbol_closed = true;
                    }
                    self.pos += 1;
                }
                _ => {
                    if let Some((op, len)) = self.keyword_at(c) {
                        let end = self.offset_of(self.pos + len);
                        self.connective(op, Span { start: offset, end })?;
                        self.pos += len;
                    } else {
                        self.push_symbol_char(offset, c)?;
                        self.pos += 1;
                    }
                }
            }
        }
        self.finish()
    }

    fn finish(mut self) -> ParseResult<FilterExpr> {
        if !self.symbol.is_empty() {
            return Err(self.syntax_help(
                format!("trailing symbol '{}' is not part of a comparison", self.symbol),
                self.symbol_span,
                "compare the dimension with a position, e.g. `Size==0`",
            ));
        }
        if self.stack.len() > 1 {
            let open = self.stack.iter().find_map(|p| match p {
                Pending::Open(span) => Some(*span),
                _ => None,
            });
            return Err(match open {
                Some(span) => self.syntax("unclosed parenthesis", span),
                None => self.syntax(
                    "filter is prematurely terminated",
                    Span::point(self.source.len()),
                ),
            });
        }
        match self.stack.pop() {
            None => Err(self.syntax(
                "filter has no expressions",
                Span {
                    start: 0,
                    end: self.source.len(),
                },
            )),
            Some(Pending::Expr(root, _)) => Ok(root),
            Some(Pending::Open(span)) => Err(self.syntax("unclosed parenthesis", span)),
            Some(Pending::Connective { op, span, .. }) => Err(self.missing_operand(op, span)),
        }
    }

    // ========================================================================
    // LEXING
    // ========================================================================

    /// Recognizes `AND`/`OR` where a new symbol could start.
    fn keyword_at(&self, c: char) -> Option<(LogicalOp, usize)> {
        if !self.symbol.is_empty() {
            return None;
        }
        let next = |n: usize| self.chars.get(self.pos + n).map(|&(_, ch)| ch);
        match c {
            'A' if next(1) == Some('N') && next(2) == Some('D') => Some((LogicalOp::And, 3)),
            'O' if next(1) == Some('R') => Some((LogicalOp::Or, 2)),
            _ => None,
        }
    }

    fn push_symbol_char(&mut self, offset: usize, c: char) -> ParseResult<()> {
        if self.symbol_closed {
            return Err(self.syntax_help(
                format!("the symbol '{}' has already been closed", self.symbol),
                Span::at(offset, c),
                "dimension names cannot contain spaces; check for a missing operator",
            ));
        }
        if self.symbol.is_empty() {
            self.symbol_span = Span::at(offset, c);
        } else {
            self.symbol_span.end = offset + c.len_utf8();
        }
        self.symbol.push(c);
        Ok(())
    }

    fn expect_no_symbol(&self, span: Span) -> ParseResult<()> {
        if self.symbol.is_empty() {
            return Ok(());
        }
        Err(self.syntax(
            format!(
                "symbol '{}' is not followed by a comparison operator",
                self.symbol
            ),
            span,
        ))
    }

    /// Parses `==N` or `!=N` following the pending symbol.
    fn comparison(&mut self) -> ParseResult<(FilterExpr, Span)> {
        let (offset, c) = self.chars[self.pos];
        if self.symbol.is_empty() {
            return Err(self.syntax(
                format!("'{c}' without a preceding dimension name"),
                Span::at(offset, c),
            ));
        }
        let op = if c == '=' {
            ComparisonOp::Equal
        } else {
            ComparisonOp::NotEqual
        };
        self.pos += 1;
        match self.chars.get(self.pos) {
            Some(&(_, '=')) => {}
            Some(&(next_offset, next)) => {
                return Err(self.syntax(
                    format!("'{c}' should be followed by '='"),
                    Span::at(next_offset, next),
                ))
            }
            None => {
                return Err(self.syntax(
                    format!("'{c}' should be followed by '='"),
                    Span::point(self.source.len()),
                ))
            }
        }

        let dimension = self.compiler.resolve(&self.symbol).ok_or_else(|| {
            let src = to_error_source(self.origin, self.source);
            err_ctx!(
                UnknownDimension,
                format!("dimension '{}' not found", self.symbol),
                &src,
                self.symbol_span
            )
        })?;

        self.pos += 1;
        let digits_start = self.pos;
        while matches!(self.chars.get(self.pos), Some((_, ch)) if ch.is_ascii_digit()) {
            self.pos += 1;
        }
        let start = self.offset_of(digits_start);
        let end = self.offset_of(self.pos);
        let digits = &self.source[start..end];
        if digits.is_empty() {
            return Err(self.syntax_help(
                "comparison is missing a value position",
                Span::point(start),
                "positions are zero-based indexes into the dimension's values",
            ));
        }
        let position = digits.parse::<usize>().map_err(|_| {
            self.syntax(
                format!("value position {digits} is out of range"),
                Span { start, end },
            )
        })?;

        let span = Span {
            start: self.symbol_span.start,
            end,
        };
        Ok((FilterExpr::comparison(dimension, op, position), span))
    }

    fn offset_of(&self, index: usize) -> usize {
        self.chars
            .get(index)
            .map(|&(offset, _)| offset)
            .unwrap_or(self.source.len())
    }

    // ========================================================================
    // STACK MERGING
    // ========================================================================

    /// Merges a completed expression into the pending context.
    fn merge(&mut self, node: FilterExpr, span: Span) -> ParseResult<()> {
        match self.stack.pop() {
            None => self.stack.push(Pending::Expr(node, span)),
            Some(open @ Pending::Open(_)) => {
                self.stack.push(open);
                self.stack.push(Pending::Expr(node, span));
            }
            Some(Pending::Connective {
                op,
                left,
                span: left_span,
            }) => {
                let merged = Span {
                    start: left_span.start,
                    end: span.end,
                };
                return self.merge(FilterExpr::logical(op, left, node), merged);
            }
            Some(Pending::Expr(..)) => {
                return Err(self.syntax_help(
                    "consecutive expressions in filter",
                    span,
                    "join the expressions with AND or OR",
                ));
            }
        }
        Ok(())
    }

    fn connective(&mut self, op: LogicalOp, span: Span) -> ParseResult<()> {
        match self.stack.pop() {
            Some(Pending::Expr(left, left_span)) => {
                self.stack.push(Pending::Connective {
                    op,
                    left,
                    span: Span {
                        start: left_span.start,
                        end: span.end,
                    },
                });
                Ok(())
            }
            Some(Pending::Open(_)) => Err(self.syntax(
                format!("{} cannot follow an opening parenthesis", op_name(op)),
                span,
            )),
            Some(Pending::Connective { op: pending, .. }) => Err(self.syntax(
                format!(
                    "{} follows {} without a right-hand operand",
                    op_name(op),
                    op_name(pending)
                ),
                span,
            )),
            None => Err(self.syntax(
                format!("there is no left-hand expression for {}", op_name(op)),
                span,
            )),
        }
    }

    fn close_group(&mut self, span: Span) -> ParseResult<()> {
        match self.stack.pop() {
            Some(Pending::Expr(inner, _)) => match self.stack.pop() {
                Some(Pending::Open(open)) => self.merge(
                    inner,
                    Span {
                        start: open.start,
                        end: span.end,
                    },
                ),
                _ => Err(self.syntax("closing parenthesis does not match an opening one", span)),
            },
            Some(Pending::Open(_)) => Err(self.syntax("empty parentheses are not allowed", span)),
            Some(Pending::Connective { op, span: pending, .. }) => {
                Err(self.missing_operand(op, pending))
            }
            None => Err(self.syntax("closing parenthesis does not match an opening one", span)),
        }
    }

    // ========================================================================
    // ERRORS
    // ========================================================================

    fn syntax(&self, message: impl Into<String>, span: Span) -> CombinatoriaError {
        let message: String = message.into();
        let src = to_error_source(self.origin, self.source);
        err_ctx!(Syntax, message, &src, span)
    }

    fn syntax_help(
        &self,
        message: impl Into<String>,
        span: Span,
        help: &str,
    ) -> CombinatoriaError {
        let message: String = message.into();
        let src = to_error_source(self.origin, self.source);
        err_ctx!(Syntax, message, &src, span, help)
    }

    fn missing_operand(&self, op: LogicalOp, span: Span) -> CombinatoriaError {
        self.syntax(
            format!("{} is missing its right-hand operand", op_name(op)),
            Span::point(span.end),
        )
    }
}

fn op_name(op: LogicalOp) -> &'static str {
    match op {
        LogicalOp::And => "AND",
        LogicalOp::Or => "OR",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorType;

    const NAMES: &[&str] = &["A", "B", "C"];

    fn tree(source: &str) -> String {
        compile(source, NAMES).unwrap().unwrap().to_string()
    }

    fn error(source: &str) -> CombinatoriaError {
        compile(source, NAMES).unwrap_err()
    }

    #[test]
    fn test_single_comparison() {
        assert_eq!(tree("A==0"), "#0==0");
        assert_eq!(tree("C!=12"), "#2!=12");
        assert_eq!(tree("  B  ==3  "), "#1==3");
    }

    #[test]
    fn test_empty_source_is_absent() {
        assert_eq!(compile("", NAMES).unwrap(), None);
    }

    #[test]
    fn test_connectives_bind_left_to_right() {
        assert_eq!(tree("A==0 AND B==0 OR C==0"), "((#0==0 AND #1==0) OR #2==0)");
        assert_eq!(tree("A==0 OR B==0 AND C==0"), "((#0==0 OR #1==0) AND #2==0)");
    }

    #[test]
    fn test_groups_override_order() {
        assert_eq!(tree("A==0 OR (B==0 AND C==0)"), "(#0==0 OR (#1==0 AND #2==0))");
        assert_eq!(tree("((A==1))"), "#0==1");
        assert_eq!(tree("(A==0 OR B==1) AND (C!=0 OR A==2)"), "((#0==0 OR #1==1) AND (#2!=0 OR #0==2))");
    }

    #[test]
    fn test_keyword_directly_after_position() {
        assert_eq!(tree("A==0AND B==1"), "(#0==0 AND #1==1)");
    }

    #[test]
    fn test_malformed_filters_are_syntax_errors() {
        for source in [
            "A==",
            "(A==0",
            "A==0 B==0",
            "A=0",
            "A!0",
            "==0",
            "()",
            "A==0)",
            "AND A==0",
            "(OR A==0)",
            "A==0 AND",
            "A==0 AND OR B==1",
            "(A==0 AND)",
            "A B==0",
            "A==0 B",
            "   ",
            "A(B==0)",
        ] {
            let err = error(source);
            assert_eq!(err.error_type(), ErrorType::Syntax, "source: {source:?}");
        }
    }

    #[test]
    fn test_unknown_dimension_points_at_name() {
        let err = error("A==0 AND Shape==1");
        assert_eq!(err.error_type(), ErrorType::UnknownDimension);
        assert_eq!(err.span(), Some(Span { start: 9, end: 14 }));
    }

    #[test]
    fn test_closed_symbol_error_points_at_character() {
        let err = error("A B==0");
        assert!(err.to_string().contains("already been closed"));
        assert_eq!(err.span(), Some(Span { start: 2, end: 3 }));
    }

    #[test]
    fn test_unclosed_group_points_at_parenthesis() {
        let err = error("A==0 AND (B==1");
        assert!(err.to_string().contains("unclosed parenthesis"));
        assert_eq!(err.span(), Some(Span { start: 9, end: 10 }));
    }

    #[test]
    fn test_only_space_separates_symbols() {
        let err = error("A==0\tAND B==1");
        assert_eq!(err.error_type(), ErrorType::Syntax);
        assert!(err.to_string().contains("already been closed"));

        // The tab stays part of the name.
        let err = error("A\t==0");
        assert_eq!(err.error_type(), ErrorType::UnknownDimension);
        assert_eq!(err.span(), Some(Span { start: 0, end: 2 }));
    }

    #[test]
    fn test_keywords_are_reserved() {
        // `ORDER` starts with the OR keyword and cannot be a dimension name.
        let err = compile("ORDER==1", &["ORDER"]).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Syntax);
    }

    #[test]
    fn test_position_overflow() {
        let err = error("A==99999999999999999999999");
        assert!(err.to_string().contains("out of range"));
    }
}
