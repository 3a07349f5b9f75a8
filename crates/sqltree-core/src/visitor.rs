//! Tree traversal.
//!
//! A [`Visitor`] is offered every node of a tree. Traversal is pre-order by
//! default: a node is visited before its children, and children are visited
//! in the order they appear in the statement text. A visitor may rewrite the
//! node it is offered in place, skip the children of a node, ask for a node's
//! children first, or stop the walk altogether by returning
//! [`ControlFlow::Break`].
//!
//! When a visitor replaces a node, the walk continues into the children of
//! the replacement. Rewrites that wrap the visited node should either skip
//! the children of the wrapper or visit children first.

use std::fmt;
use std::ops::ControlFlow;

use tracing::{debug, trace};

use crate::ast::{ChildMut, Node, NodeList};
use crate::error::SqlError;

/// A tree walker.
pub trait Visitor {
    /// Error raised by the visitor.
    type Error;

    /// Visits one node. The visitor may replace `*node`.
    ///
    /// # Errors
    ///
    /// Any error aborts the traversal and is returned to the caller.
    fn visit(&mut self, node: &mut Node) -> Result<ControlFlow<()>, Self::Error>;

    /// Visits a list before its elements.
    ///
    /// # Errors
    ///
    /// Any error aborts the traversal and is returned to the caller.
    fn visit_list(&mut self, list: &mut NodeList) -> Result<ControlFlow<()>, Self::Error> {
        let _ = list;
        Ok(ControlFlow::Continue(()))
    }

    /// Returns true if the children of `node` should not be walked.
    fn skip_children(&self, node: &Node) -> bool {
        let _ = node;
        false
    }

    /// Returns true if the children of `node` should be walked before `node`
    /// itself is visited.
    fn visit_children_first(&self, node: &Node) -> bool {
        let _ = node;
        false
    }
}

impl Node {
    /// Walks this tree with `visitor`.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the visitor.
    pub fn accept<V: Visitor + ?Sized>(
        &mut self,
        visitor: &mut V,
    ) -> Result<ControlFlow<()>, V::Error> {
        if visitor.visit_children_first(self) {
            if !visitor.skip_children(self) && self.accept_children(visitor)?.is_break() {
                return Ok(ControlFlow::Break(()));
            }
            return visitor.visit(self);
        }

        if visitor.visit(self)?.is_break() {
            return Ok(ControlFlow::Break(()));
        }
        if visitor.skip_children(self) {
            return Ok(ControlFlow::Continue(()));
        }
        self.accept_children(visitor)
    }

    /// Walks this tree with `visitor` and returns the possibly replaced root.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the visitor.
    pub fn accept_owned<V: Visitor + ?Sized>(mut self, visitor: &mut V) -> Result<Self, V::Error> {
        // A break only ends the walk early; the root is returned either way.
        let _flow = self.accept(visitor)?;
        Ok(self)
    }

    fn accept_children<V: Visitor + ?Sized>(
        &mut self,
        visitor: &mut V,
    ) -> Result<ControlFlow<()>, V::Error> {
        for child in self.kind_mut().children_mut() {
            let flow = match child {
                ChildMut::Node(node) => node.accept(visitor)?,
                ChildMut::List(list) => list.accept(visitor)?,
            };
            if flow.is_break() {
                return Ok(ControlFlow::Break(()));
            }
        }
        Ok(ControlFlow::Continue(()))
    }
}

impl NodeList {
    /// Offers this list to `visitor`, then walks each element in order.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the visitor.
    pub fn accept<V: Visitor + ?Sized>(
        &mut self,
        visitor: &mut V,
    ) -> Result<ControlFlow<()>, V::Error> {
        if visitor.visit_list(self)?.is_break() {
            return Ok(ControlFlow::Break(()));
        }
        for node in self.iter_mut() {
            if node.accept(visitor)?.is_break() {
                return Ok(ControlFlow::Break(()));
            }
        }
        Ok(ControlFlow::Continue(()))
    }
}

/// Points in statement compilation at which a tree can be walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompilationPhase {
    AfterParse,
    AfterBind,
    AfterOptimize,
}

impl CompilationPhase {
    /// Returns the phase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AfterParse => "AFTER_PARSE",
            Self::AfterBind => "AFTER_BIND",
            Self::AfterOptimize => "AFTER_OPTIMIZE",
        }
    }
}

impl fmt::Display for CompilationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A visitor with a lifecycle around each walk.
///
/// The owner calls [`initialize`](Self::initialize) once, then
/// [`begin`](Self::begin) and [`end`](Self::end) around each walk of each
/// statement, and finally [`teardown`](Self::teardown).
pub trait PhaseVisitor: Visitor {
    /// Acquires whatever the visitor needs for its whole life.
    ///
    /// # Errors
    ///
    /// Returns an error if the visitor cannot be set up.
    fn initialize(&mut self) -> Result<(), Self::Error>;

    /// Called before a statement is walked in `phase`.
    ///
    /// # Errors
    ///
    /// An error prevents the walk.
    fn begin(&mut self, statement_text: &str, phase: CompilationPhase)
        -> Result<(), Self::Error>;

    /// Called after a statement was walked in `phase`.
    ///
    /// # Errors
    ///
    /// Returns an error if the walk cannot be completed.
    fn end(&mut self, phase: CompilationPhase) -> Result<(), Self::Error>;

    /// Releases what [`initialize`](Self::initialize) acquired.
    ///
    /// # Errors
    ///
    /// Returns an error if resources cannot be released.
    fn teardown(&mut self) -> Result<(), Self::Error>;
}

/// Walks `root` with a phase visitor, bracketing the walk with
/// [`PhaseVisitor::begin`] and [`PhaseVisitor::end`].
///
/// # Errors
///
/// Returns the first error raised by the visitor. `end` is not called when
/// the walk fails.
pub fn walk_phase<V: PhaseVisitor + ?Sized>(
    visitor: &mut V,
    statement_text: &str,
    phase: CompilationPhase,
    root: &mut Node,
) -> Result<ControlFlow<()>, V::Error> {
    visitor.begin(statement_text, phase)?;
    let flow = root.accept(visitor)?;
    visitor.end(phase)?;
    Ok(flow)
}

/// Runs a phase visitor over `root` for each of `phases` in turn.
///
/// The visitor is initialized first and torn down last, including when a
/// walk fails.
///
/// # Errors
///
/// Returns the first error raised by `initialize`, a walk, or `teardown`.
pub fn walk_phases<V: PhaseVisitor + ?Sized>(
    visitor: &mut V,
    statement_text: &str,
    phases: &[CompilationPhase],
    root: &mut Node,
) -> Result<(), V::Error> {
    visitor.initialize()?;
    let walked = phases.iter().try_for_each(|phase| {
        walk_phase(visitor, statement_text, *phase, root).map(|_| ())
    });
    let torn_down = visitor.teardown();
    walked.and(torn_down)
}

/// Emits a `tracing` event for every node it is offered.
///
/// Events are recorded inside a `sql_trace` span opened by
/// [`PhaseVisitor::initialize`] and closed by [`PhaseVisitor::teardown`].
#[derive(Debug, Default)]
pub struct TraceVisitor {
    span: Option<tracing::Span>,
    phase: Option<CompilationPhase>,
    nodes_visited: usize,
    walks_completed: usize,
}

impl TraceVisitor {
    /// Creates a visitor; call [`PhaseVisitor::initialize`] before use.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes visited so far.
    #[must_use]
    pub const fn nodes_visited(&self) -> usize {
        self.nodes_visited
    }

    /// Number of walks that reached [`PhaseVisitor::end`].
    #[must_use]
    pub const fn walks_completed(&self) -> usize {
        self.walks_completed
    }

    /// Returns true between `initialize` and `teardown`.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.span.is_some()
    }

    fn span(&self) -> Result<&tracing::Span, SqlError> {
        self.span
            .as_ref()
            .ok_or_else(|| SqlError::invalid("trace visitor is not initialized"))
    }
}

impl Visitor for TraceVisitor {
    type Error = SqlError;

    fn visit(&mut self, node: &mut Node) -> Result<ControlFlow<()>, SqlError> {
        let phase = self.phase.map(|p| p.as_str());
        self.span()?.in_scope(|| {
            trace!(
                phase,
                node = node.node_name(),
                begin = node.begin_offset(),
                end = node.end_offset(),
                "visit"
            );
        });
        self.nodes_visited += 1;
        Ok(ControlFlow::Continue(()))
    }
}

impl PhaseVisitor for TraceVisitor {
    fn initialize(&mut self) -> Result<(), SqlError> {
        self.span = Some(tracing::debug_span!("sql_trace"));
        Ok(())
    }

    fn begin(&mut self, statement_text: &str, phase: CompilationPhase) -> Result<(), SqlError> {
        self.span()?.in_scope(|| {
            debug!(phase = phase.as_str(), statement = statement_text, "begin walk");
        });
        self.phase = Some(phase);
        Ok(())
    }

    fn end(&mut self, phase: CompilationPhase) -> Result<(), SqlError> {
        let nodes = self.nodes_visited;
        self.span()?.in_scope(|| {
            debug!(phase = phase.as_str(), nodes, "end walk");
        });
        self.phase = None;
        self.walks_completed += 1;
        Ok(())
    }

    fn teardown(&mut self) -> Result<(), SqlError> {
        self.span = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ConstantNode, ConstantValue, NodeKind};
    use crate::NodeFactory;

    fn constant(value: i64) -> Node {
        NodeFactory::new()
            .construct(NodeKind::Constant(ConstantNode {
                value: ConstantValue::Integer(value),
            }))
            .unwrap()
    }

    #[test]
    fn test_trace_visitor_requires_initialize() {
        let mut visitor = TraceVisitor::new();
        let mut node = constant(1);
        assert!(node.accept(&mut visitor).is_err());
    }

    #[test]
    fn test_trace_visitor_lifecycle() {
        let mut visitor = TraceVisitor::new();
        visitor.initialize().unwrap();
        assert!(visitor.is_open());

        let mut node = constant(1);
        let flow = walk_phase(&mut visitor, "1", CompilationPhase::AfterParse, &mut node).unwrap();
        assert!(flow.is_continue());
        assert_eq!(visitor.nodes_visited(), 1);
        assert_eq!(visitor.walks_completed(), 1);

        visitor.teardown().unwrap();
        assert!(!visitor.is_open());
    }

    #[test]
    fn test_phase_names() {
        assert_eq!(CompilationPhase::AfterBind.to_string(), "AFTER_BIND");
    }
}
