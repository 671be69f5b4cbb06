//! Turns source text into trees.
//!
//! Operands and operators are read left to right. Each operand is attached
//! to the first free right-hand slot of the tree; each binary operator is
//! spliced into the right spine above every node that binds at least as
//! tightly, taking that node's place and adopting it as its left operand.
//! A bracketed group is compiled recursively and enters the tree as one
//! operand.

use crate::cache::Cache;
use crate::codegen::CompiledFn;
use crate::error::CompileError;
use crate::node::Node;
use crate::operators;
use crate::reader::{Marker, Reader};
use crate::types::{Operator, OperatorTable, Whitespace};
use crate::value::Value;
use std::sync::Arc;

/// Construction options for a [`Compiler`].
pub struct CompilerOptions<C: ?Sized = ()> {
    /// Binary operators, tightest first. With `builtins` they follow the
    /// built-in ones and bind more loosely.
    pub binary: Vec<Operator<C>>,
    pub unary: Vec<Operator<C>>,
    pub constants: Vec<Operator<C>>,
    pub whitespace: Whitespace,
    /// Prepend the built-in operators of [`crate::operators`].
    pub builtins: bool,
}

impl<C: ?Sized> Default for CompilerOptions<C> {
    fn default() -> Self {
        CompilerOptions {
            binary: Vec::new(),
            unary: Vec::new(),
            constants: Vec::new(),
            whitespace: Whitespace::default(),
            builtins: true,
        }
    }
}

/// Compiles expressions against a fixed set of operators, memoizing trees
/// and closures by source text.
///
/// A compiler can be shared between threads; cached trees are immutable.
pub struct Compiler<C: ?Sized = ()> {
    binary: OperatorTable<C>,
    unary: OperatorTable<C>,
    constants: OperatorTable<C>,
    whitespace: Whitespace,
    trees: Cache<Arc<Node<C>>>,
    functions: Cache<CompiledFn>,
}

impl<C: ?Sized + 'static> Default for Compiler<C> {
    fn default() -> Self {
        Compiler::new(CompilerOptions::default())
    }
}

impl<C: ?Sized + 'static> Compiler<C> {
    pub fn new(options: CompilerOptions<C>) -> Self {
        let CompilerOptions {
            binary,
            unary,
            constants,
            whitespace,
            builtins,
        } = options;
        let table = |defaults: fn() -> Vec<Operator<C>>, custom: Vec<Operator<C>>| {
            let mut ops = if builtins { defaults() } else { Vec::new() };
            ops.extend(custom);
            OperatorTable::new(ops)
        };
        Compiler {
            binary: table(operators::binary, binary),
            unary: table(operators::unary, unary),
            constants: table(operators::constants, constants),
            whitespace,
            trees: Cache::new(),
            functions: Cache::new(),
        }
    }

    /// Compiles `text`, returning the cached tree when there is one.
    pub fn compile(&self, text: &str) -> Result<Arc<Node<C>>, CompileError> {
        self.compile_with(text, 0, false)
    }

    /// Compiles `text` starting at byte `offset`.
    ///
    /// From a nonzero offset the compile stops at the first unmatched `)`,
    /// so an offset just past `(` yields that group's tree. Only whole-text
    /// compiles (`offset == 0`) read or fill the tree cache,
    /// and `skip_cache` bypasses it entirely. The returned tree is already
    /// collapsed.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn compile_with(
        &self,
        text: &str,
        offset: usize,
        skip_cache: bool,
    ) -> Result<Arc<Node<C>>, CompileError> {
        let cacheable = offset == 0 && !skip_cache;
        if cacheable {
            if let Some(tree) = self.trees.get(text) {
                tracing::trace!("tree cache hit");
                return Ok(tree);
            }
        }

        let (mut tree, _) = self.assemble(text, offset, None)?;
        tree.collapse();
        tracing::debug!(cacheable, expr = %tree.to_expr(), "compiled expression");

        let tree = Arc::new(tree);
        Ok(if cacheable {
            self.trees.publish(text, tree)
        } else {
            tree
        })
    }

    /// Compiles `text` into a closure, memoized by text.
    pub fn compile_to_function(&self, text: &str) -> Result<CompiledFn, CompileError> {
        if let Some(function) = self.functions.get(text) {
            tracing::trace!(text, "function cache hit");
            return Ok(function);
        }
        let function = self.compile_with(text, 0, true)?.to_function();
        tracing::trace!(text, "function cache populated");
        Ok(self.functions.publish(text, function))
    }

    pub fn cached_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn cached_functions(&self) -> usize {
        self.functions.len()
    }

    pub fn clear_cache(&self) {
        self.trees.clear();
        self.functions.clear();
    }

    fn reader(&self) -> Reader<'_, C> {
        Reader {
            binary: &self.binary,
            unary: &self.unary,
            constants: &self.constants,
            whitespace: self.whitespace,
        }
    }

    /// Builds the tree for `text` from `offset` up to the end of input, or
    /// up to the `)` closing the group opened at `open`. Returns the tree
    /// and the position after the last consumed character.
    fn assemble(
        &self,
        text: &str,
        offset: usize,
        open: Option<usize>,
    ) -> Result<(Node<C>, usize), CompileError> {
        let reader = self.reader();
        let mut root: Option<Box<Node<C>>> = None;
        let mut position = offset;
        let mut after_bracket = false;

        loop {
            let read = reader.read(text, position, after_bracket);
            position = read.position;

            if !read.operand.is_empty() && (after_bracket || read.marker == Marker::Open) {
                return Err(CompileError::DanglingOperand {
                    operand: read.operand.to_string(),
                    position: read.operand_at,
                });
            }
            if after_bracket && read.marker == Marker::Open {
                return Err(CompileError::DanglingOperand {
                    operand: "(".to_string(),
                    position: read.at,
                });
            }

            let operand = match read.marker {
                Marker::Open => {
                    let (inner, end) = self.assemble(text, position, Some(read.at))?;
                    position = end;
                    Some(Node::guard(inner))
                }
                Marker::Constant(index) => Some(Node::operator(&self.constants[index].op, 0, None)),
                _ if after_bracket => None,
                _ => Some(Node::literal(read.operand)),
            };
            if let Some(operand) = operand {
                let operand = read.unary.iter().rev().fold(operand, |inner, &index| {
                    Node::operator(&self.unary[index].op, 0, Some(inner))
                });
                attach(&mut root, operand);
            }
            after_bracket = matches!(read.marker, Marker::Open | Marker::Constant(_));

            match read.marker {
                Marker::Binary(index) => {
                    splice(&mut root, Node::operator(&self.binary[index].op, index + 1, None));
                }
                Marker::End => {
                    return match open {
                        Some(position) => Err(CompileError::UnclosedBracket { position }),
                        None => Ok((finish(root), position)),
                    };
                }
                // A compile started inside a group ends at the group's `)`.
                Marker::Close => {
                    return match open {
                        Some(_) => Ok((finish(root), position)),
                        None if offset > 0 => Ok((finish(root), position)),
                        None => Err(CompileError::UnexpectedCloseBracket { position: read.at }),
                    };
                }
                Marker::Open | Marker::Constant(_) => {}
            }
        }
    }
}

/// Puts `operand` into the first empty slot down the right spine.
fn attach<C: ?Sized>(slot: &mut Option<Box<Node<C>>>, operand: Node<C>) {
    match slot {
        Some(node) => attach(&mut node.rhs, operand),
        None => *slot = Some(Box::new(operand)),
    }
}

/// Inserts a binary operator below every spine node binding at least as
/// tightly; the node it displaces becomes its left operand.
fn splice<C: ?Sized>(slot: &mut Option<Box<Node<C>>>, mut op: Node<C>) {
    let descend = matches!(
        slot.as_deref(),
        Some(node) if node.is_binary() && node.priority >= op.priority
    );
    match slot {
        Some(node) if descend => splice(&mut node.rhs, op),
        _ => {
            op.lhs = slot.take();
            *slot = Some(Box::new(op));
        }
    }
}

fn finish<C: ?Sized>(root: Option<Box<Node<C>>>) -> Node<C> {
    root.map_or_else(|| Node::leaf(Value::String(String::new())), |node| *node)
}
