//! Tests for tree traversal and rewriting.

mod common;
use common::*;

use std::ops::ControlFlow;

use sqltree_core::ast::{ConstantValue, ParameterNode};
use sqltree_core::{
    walk_phase, walk_phases, CompilationPhase, Node, NodeFactory, NodeKind, NodeList,
    PhaseVisitor, SqlError, TraceVisitor, Visitor,
};

/// Records the name of every node it is offered.
#[derive(Default)]
struct Recorder {
    names: Vec<&'static str>,
    lists: Vec<&'static str>,
    children_first: bool,
    skip_subqueries: bool,
}

impl Visitor for Recorder {
    type Error = SqlError;

    fn visit(&mut self, node: &mut Node) -> Result<ControlFlow<()>, SqlError> {
        self.names.push(node.node_name());
        Ok(ControlFlow::Continue(()))
    }

    fn visit_list(&mut self, list: &mut NodeList) -> Result<ControlFlow<()>, SqlError> {
        self.lists.push(list.kind().name());
        Ok(ControlFlow::Continue(()))
    }

    fn skip_children(&self, node: &Node) -> bool {
        self.skip_subqueries && matches!(node.kind(), NodeKind::Subquery(_))
    }

    fn visit_children_first(&self, _node: &Node) -> bool {
        self.children_first
    }
}

/// Replaces every literal with a fresh parameter.
#[derive(Default)]
struct Parameterize {
    replaced: usize,
}

impl Visitor for Parameterize {
    type Error = SqlError;

    fn visit(&mut self, node: &mut Node) -> Result<ControlFlow<()>, SqlError> {
        if matches!(node.kind(), NodeKind::Constant(_)) {
            *node = NodeFactory::new().construct(NodeKind::Parameter(ParameterNode {
                number: self.replaced,
            }))?;
            self.replaced += 1;
        }
        Ok(ControlFlow::Continue(()))
    }
}

#[test]
fn pre_order_is_default() {
    let mut node = parse("SELECT a FROM t");
    let mut recorder = Recorder::default();
    assert!(node.accept(&mut recorder).unwrap().is_continue());
    assert_eq!(
        recorder.names,
        vec![
            "CursorNode",
            "SelectNode",
            "ResultColumnNode",
            "ColumnReferenceNode",
            "FromBaseTableNode",
        ]
    );
    assert_eq!(recorder.lists, vec!["ResultColumnList", "FromList"]);
}

#[test]
fn children_first() {
    let mut node = parse("SELECT a FROM t");
    let mut recorder = Recorder {
        children_first: true,
        ..Recorder::default()
    };
    assert!(node.accept(&mut recorder).unwrap().is_continue());
    assert_eq!(
        recorder.names,
        vec![
            "ColumnReferenceNode",
            "ResultColumnNode",
            "FromBaseTableNode",
            "SelectNode",
            "CursorNode",
        ]
    );
}

#[test]
fn children_in_source_order() {
    let mut node = parse("SELECT a FROM t WHERE b = 1 GROUP BY c HAVING d > 2");
    let mut recorder = Recorder::default();
    assert!(node.accept(&mut recorder).unwrap().is_continue());
    let columns: Vec<_> = recorder
        .names
        .iter()
        .filter(|n| **n == "ColumnReferenceNode" || **n == "ConstantNode")
        .collect();
    assert_eq!(columns.len(), 6);
    assert_eq!(recorder.names.last(), Some(&"ConstantNode"));
}

#[test]
fn skip_children() {
    let sql = "SELECT a FROM t WHERE a IN (SELECT b FROM u)";
    let mut all = Recorder::default();
    assert!(parse(sql).accept(&mut all).unwrap().is_continue());
    let mut skipping = Recorder {
        skip_subqueries: true,
        ..Recorder::default()
    };
    assert!(parse(sql).accept(&mut skipping).unwrap().is_continue());

    let count = |names: &[&str], wanted: &str| names.iter().filter(|n| **n == wanted).count();
    assert_eq!(count(&all.names, "SelectNode"), 2);
    assert_eq!(count(&skipping.names, "SelectNode"), 1);
    assert!(skipping.names.contains(&"SubqueryNode"));
}

#[test]
fn rewrite_in_place() {
    let mut node = parse("SELECT a FROM t WHERE a = 1 AND b IN (2, 3)");
    let mut rewriter = Parameterize::default();
    assert!(node.accept(&mut rewriter).unwrap().is_continue());
    assert_eq!(rewriter.replaced, 3);

    let expected = parse("SELECT a FROM t WHERE a = ? AND b IN (?, ?)");
    assert!(node.is_equivalent(&expected));
}

#[test]
fn rewrite_root_with_accept_owned() {
    struct ReplaceRoot;

    impl Visitor for ReplaceRoot {
        type Error = SqlError;

        fn visit(&mut self, node: &mut Node) -> Result<ControlFlow<()>, SqlError> {
            *node = NodeFactory::new().construct(NodeKind::Constant(
                sqltree_core::ast::ConstantNode {
                    value: ConstantValue::Null,
                },
            ))?;
            Ok(ControlFlow::Break(()))
        }
    }

    let node = parse("SELECT a FROM t").accept_owned(&mut ReplaceRoot).unwrap();
    assert_eq!(node.constant_value(), Some(&ConstantValue::Null));
}

#[test]
fn break_stops_the_walk() {
    struct FirstColumn {
        visited: usize,
        found: Option<String>,
    }

    impl Visitor for FirstColumn {
        type Error = SqlError;

        fn visit(&mut self, node: &mut Node) -> Result<ControlFlow<()>, SqlError> {
            self.visited += 1;
            if let NodeKind::ColumnReference(c) = node.kind() {
                self.found = Some(c.column_name.clone());
                return Ok(ControlFlow::Break(()));
            }
            Ok(ControlFlow::Continue(()))
        }
    }

    let mut node = parse("SELECT x, y, z FROM t");
    let mut visitor = FirstColumn {
        visited: 0,
        found: None,
    };
    assert!(node.accept(&mut visitor).unwrap().is_break());
    assert_eq!(visitor.found.as_deref(), Some("x"));
    assert_eq!(visitor.visited, 4);
}

#[test]
fn errors_abort_the_walk() {
    struct RejectParameters {
        visited: usize,
    }

    impl Visitor for RejectParameters {
        type Error = String;

        fn visit(&mut self, node: &mut Node) -> Result<ControlFlow<()>, String> {
            self.visited += 1;
            match node.kind() {
                NodeKind::Parameter(p) => Err(format!("parameter {} not bound", p.number)),
                _ => Ok(ControlFlow::Continue(())),
            }
        }
    }

    let mut node = parse("SELECT a FROM t WHERE a = ? AND b = 2");
    let mut visitor = RejectParameters { visited: 0 };
    let err = node.accept(&mut visitor).unwrap_err();
    assert_eq!(err, "parameter 0 not bound");
    // Nothing after the parameter is visited
    assert_eq!(visitor.visited, 9);
}

#[test]
fn trace_visitor_phases() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();

    let sql = "SELECT a FROM t WHERE b = 1";
    let mut node = parse(sql);
    let mut tracer = TraceVisitor::new();
    tracer.initialize().unwrap();
    for phase in [
        CompilationPhase::AfterParse,
        CompilationPhase::AfterBind,
        CompilationPhase::AfterOptimize,
    ] {
        assert!(walk_phase(&mut tracer, sql, phase, &mut node).unwrap().is_continue());
    }
    tracer.teardown().unwrap();

    assert_eq!(tracer.walks_completed(), 3);
    assert_eq!(tracer.nodes_visited(), 3 * 8);
    assert!(!tracer.is_open());
}

/// Fails on the first parameter once the statement has been bound.
#[derive(Default)]
struct BindCheck {
    phase: Option<CompilationPhase>,
    open: bool,
    torn_down: usize,
    ended: Vec<CompilationPhase>,
}

impl Visitor for BindCheck {
    type Error = String;

    fn visit(&mut self, node: &mut Node) -> Result<ControlFlow<()>, String> {
        match (self.phase, node.kind()) {
            (Some(CompilationPhase::AfterBind), NodeKind::Parameter(p)) => {
                Err(format!("parameter {} not bound", p.number))
            }
            _ => Ok(ControlFlow::Continue(())),
        }
    }
}

impl PhaseVisitor for BindCheck {
    fn initialize(&mut self) -> Result<(), String> {
        self.open = true;
        Ok(())
    }

    fn begin(&mut self, _statement_text: &str, phase: CompilationPhase) -> Result<(), String> {
        self.phase = Some(phase);
        Ok(())
    }

    fn end(&mut self, phase: CompilationPhase) -> Result<(), String> {
        self.ended.push(phase);
        Ok(())
    }

    fn teardown(&mut self) -> Result<(), String> {
        self.open = false;
        self.torn_down += 1;
        Ok(())
    }
}

#[test]
fn failed_walk_still_tears_down() {
    let sql = "SELECT a FROM t WHERE a = ?";
    let mut node = parse(sql);
    let mut visitor = BindCheck::default();
    let err = walk_phases(
        &mut visitor,
        sql,
        &[
            CompilationPhase::AfterParse,
            CompilationPhase::AfterBind,
            CompilationPhase::AfterOptimize,
        ],
        &mut node,
    )
    .unwrap_err();

    assert_eq!(err, "parameter 0 not bound");
    assert_eq!(visitor.ended, vec![CompilationPhase::AfterParse]);
    assert_eq!(visitor.torn_down, 1);
    assert!(!visitor.open);
}

#[test]
fn walk_phases_runs_every_phase() {
    let sql = "SELECT a FROM t WHERE b = 1";
    let mut node = parse(sql);
    let mut tracer = TraceVisitor::new();
    walk_phases(
        &mut tracer,
        sql,
        &[CompilationPhase::AfterParse, CompilationPhase::AfterBind],
        &mut node,
    )
    .unwrap();
    assert_eq!(tracer.walks_completed(), 2);
    assert_eq!(tracer.nodes_visited(), 2 * 8);
    assert!(!tracer.is_open());
}
