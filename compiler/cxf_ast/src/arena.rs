//! Flat AST arena.
//!
//! Nodes live in one contiguous vector and reference each other by
//! `NodeId(u32)` indices. Parent links make the ambiguity commit a single
//! child-slot rewrite: a node is either fully attached (correct parent and
//! slot-in-parent) or not attached at all.

use crate::node::{AmbiguityData, DeclSpecKind, DeclaratorKind, NameData, NameKind, NodeKind};
use crate::span::Span;
use std::fmt;

/// Index of a node in its arena.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Get raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Create from raw u32 value.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        NodeId(raw)
    }

    #[inline]
    const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// A single AST node.
#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    pub parent: Option<NodeId>,
}

/// Arena of AST nodes.
#[derive(Default)]
pub struct AstArena {
    nodes: Vec<Node>,
}

impl AstArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        AstArena { nodes: Vec::new() }
    }

    /// Number of nodes allocated.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if no nodes have been allocated.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a node. The node starts detached (no parent).
    pub fn alloc(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(Node {
            kind,
            span,
            parent: None,
        });
        id
    }

    /// Get a node.
    #[inline]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Get a node mutably.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Get a node's kind.
    #[inline]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    /// Name payload of a node, if it is a name.
    pub fn name(&self, id: NodeId) -> Option<&NameData> {
        match &self.get(id).kind {
            NodeKind::Name(data) => Some(data),
            _ => None,
        }
    }

    /// Mutable name payload of a node, if it is a name.
    pub fn name_mut(&mut self, id: NodeId) -> Option<&mut NameData> {
        match &mut self.get_mut(id).kind {
            NodeKind::Name(data) => Some(data),
            _ => None,
        }
    }

    /// Set the parent links of `node`'s direct children to `node`.
    ///
    /// Builders call this once after assembling a node from child ids.
    pub fn connect(&mut self, node: NodeId) {
        for child in self.children(node) {
            self.get_mut(child).parent = Some(node);
        }
    }

    /// Direct children of a node, in source order.
    ///
    /// For unresolved ambiguities this includes every alternative and the
    /// satellite fragment; for the angle-bracket ambiguity it includes the
    /// relational reading's operands and each variant's candidate
    /// expression. After a commit the losing subtrees are no longer
    /// children.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        match &self.get(id).kind {
            NodeKind::TranslationUnit { declarations } => out.extend(declarations),
            NodeKind::Name(NameData { kind, .. }) => {
                if let NameKind::TemplateId { arguments } = kind {
                    out.extend(arguments);
                }
            }
            NodeKind::IdExpr { name } => out.push(*name),
            NodeKind::Literal { .. } => {}
            NodeKind::Binary { lhs, rhs, .. } => {
                out.push(*lhs);
                out.push(*rhs);
            }
            NodeKind::Call { callee, arguments } => {
                out.push(*callee);
                out.extend(arguments);
            }
            NodeKind::SimpleDeclaration {
                decl_spec,
                declarators,
            } => {
                out.push(*decl_spec);
                out.extend(declarators);
            }
            NodeKind::DeclSpecifier(kind) => match kind {
                DeclSpecKind::Named { name } => out.push(*name),
                DeclSpecKind::Class { class } => out.push(*class),
                DeclSpecKind::Builtin(_) | DeclSpecKind::Unspecified => {}
            },
            NodeKind::Declarator(data) => {
                if let Some(name) = data.name {
                    out.push(name);
                }
                match &data.kind {
                    DeclaratorKind::Plain => {}
                    DeclaratorKind::Function(f) => out.extend(&f.parameters),
                    DeclaratorKind::Nested { inner } => out.push(*inner),
                }
                if let Some(init) = data.initializer {
                    out.push(init);
                }
            }
            NodeKind::ParameterDeclaration {
                decl_spec,
                declarator,
            } => {
                out.push(*decl_spec);
                out.push(*declarator);
            }
            NodeKind::TypeId {
                decl_spec,
                declarator,
            } => {
                out.push(*decl_spec);
                out.extend(declarator);
            }
            NodeKind::EqualsInitializer { expr } => out.push(*expr),
            NodeKind::ClassSpecifier { name, members } => {
                out.push(*name);
                out.extend(members);
            }
            NodeKind::DeclarationStatement { declaration } => out.push(*declaration),
            NodeKind::ExpressionStatement { expr } => out.push(*expr),
            NodeKind::CompoundStatement { statements } => out.extend(statements),
            NodeKind::Ambiguity(AmbiguityData {
                alternatives,
                satellite,
                ..
            }) => {
                out.extend(alternatives);
                out.extend(satellite);
            }
            NodeKind::TemplateIdAmbiguity(data) => {
                for entry in data.chain.entries() {
                    out.push(entry.expr);
                }
                out.push(data.last_expr);
                for point in &data.branch_points {
                    for variant in &point.variants {
                        out.push(variant.expression);
                    }
                }
            }
        }
        out
    }

    /// Rewrite the child slot holding `old` inside `parent` to `new`.
    ///
    /// The splice is atomic from the caller's perspective: on success `new`
    /// is attached with correct parent and slot, and `old` is detached.
    /// Returns false if `old` is not a direct child of `parent`.
    pub fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) -> bool {
        let replaced = self.replace_in_kind(parent, old, new);
        if replaced {
            self.get_mut(new).parent = Some(parent);
            if self.get(old).parent == Some(parent) {
                self.get_mut(old).parent = None;
            }
        }
        replaced
    }

    fn replace_in_kind(&mut self, parent: NodeId, old: NodeId, new: NodeId) -> bool {
        fn swap(slot: &mut NodeId, old: NodeId, new: NodeId) -> bool {
            if *slot == old {
                *slot = new;
                true
            } else {
                false
            }
        }
        fn swap_vec(slots: &mut [NodeId], old: NodeId, new: NodeId) -> bool {
            slots.iter_mut().any(|slot| swap(slot, old, new))
        }
        fn swap_opt(slot: &mut Option<NodeId>, old: NodeId, new: NodeId) -> bool {
            match slot {
                Some(id) if *id == old => {
                    *slot = Some(new);
                    true
                }
                _ => false,
            }
        }

        match &mut self.nodes[parent.index()].kind {
            NodeKind::TranslationUnit { declarations } => swap_vec(declarations, old, new),
            NodeKind::Name(NameData { kind, .. }) => match kind {
                NameKind::TemplateId { arguments } => swap_vec(arguments, old, new),
                _ => false,
            },
            NodeKind::IdExpr { name } => swap(name, old, new),
            NodeKind::Literal { .. } => false,
            NodeKind::Binary { lhs, rhs, .. } => {
                swap(lhs, old, new) || swap(rhs, old, new)
            }
            NodeKind::Call { callee, arguments } => {
                swap(callee, old, new) || swap_vec(arguments, old, new)
            }
            NodeKind::SimpleDeclaration {
                decl_spec,
                declarators,
            } => swap(decl_spec, old, new) || swap_vec(declarators, old, new),
            NodeKind::DeclSpecifier(kind) => match kind {
                DeclSpecKind::Named { name } => swap(name, old, new),
                DeclSpecKind::Class { class } => swap(class, old, new),
                DeclSpecKind::Builtin(_) | DeclSpecKind::Unspecified => false,
            },
            NodeKind::Declarator(data) => {
                swap_opt(&mut data.name, old, new)
                    || match &mut data.kind {
                        DeclaratorKind::Plain => false,
                        DeclaratorKind::Function(f) => swap_vec(&mut f.parameters, old, new),
                        DeclaratorKind::Nested { inner } => swap(inner, old, new),
                    }
                    || swap_opt(&mut data.initializer, old, new)
            }
            NodeKind::ParameterDeclaration {
                decl_spec,
                declarator,
            } => swap(decl_spec, old, new) || swap(declarator, old, new),
            NodeKind::TypeId {
                decl_spec,
                declarator,
            } => swap(decl_spec, old, new) || swap_opt(declarator, old, new),
            NodeKind::EqualsInitializer { expr } => swap(expr, old, new),
            NodeKind::ClassSpecifier { name, members } => {
                swap(name, old, new) || swap_vec(members, old, new)
            }
            NodeKind::DeclarationStatement { declaration } => swap(declaration, old, new),
            NodeKind::ExpressionStatement { expr } => swap(expr, old, new),
            NodeKind::CompoundStatement { statements } => swap_vec(statements, old, new),
            NodeKind::Ambiguity(AmbiguityData {
                alternatives,
                satellite,
                ..
            }) => swap_vec(alternatives, old, new) || swap_opt(satellite, old, new),
            NodeKind::TemplateIdAmbiguity(data) => {
                let mut done = false;
                for entry in data.chain.entries_mut() {
                    if swap(&mut entry.expr, old, new) {
                        done = true;
                        break;
                    }
                }
                done || swap(&mut data.last_expr, old, new)
            }
        }
    }
}
