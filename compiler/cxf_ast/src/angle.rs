//! Branch-point bookkeeping for ambiguous `<` tokens.
//!
//! A `<` that might open a template-argument list does not delimit a bounded
//! span: candidate right boundaries are discovered incrementally while the
//! surrounding binary expression is still being parsed. Each ambiguous name
//! opens a [`BranchPoint`] holding one [`Variant`] per candidate reading;
//! variants are closed against the operator chain as matching boundaries are
//! reached, pruned when no boundary ever matches, and finally resolved
//! semantically in `cxf_sema`.

use crate::arena::NodeId;

/// Where a variant splices into the operator chain when it wins.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ChainTarget {
    /// The chain entry at this index; its left operand is replaced.
    Op(usize),
    /// The operand following the last operator.
    End,
}

/// One candidate reading of an ambiguous name: an expression ending at a
/// specific right boundary, plus the names that must resolve to templates
/// for the reading to be valid.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Variant {
    /// Candidate expression (a template-id id-expression, possibly wrapped
    /// in a call).
    pub expression: NodeId,
    /// Names inside the candidate requiring template-like resolution.
    pub template_names: Vec<NodeId>,
    /// Offset of the first token after the candidate.
    pub right_offset: u32,
    /// Set once an operator (or the end of the expression) lands exactly on
    /// the right boundary. A variant that never closes is invalid.
    pub target: Option<ChainTarget>,
}

impl Variant {
    /// New open variant.
    pub fn new(expression: NodeId, template_names: Vec<NodeId>, right_offset: u32) -> Self {
        Variant {
            expression,
            template_names,
            right_offset,
            target: None,
        }
    }
}

/// One ambiguous `<`: the branch point's variants, ordered most-complete
/// (most embedded template names) first.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct BranchPoint {
    /// Source offset of the ambiguous name (left end of every variant).
    pub offset: u32,
    /// Chain length at the time the branch point opened; a winning variant
    /// replaces everything from here to its target.
    pub left_chain_len: usize,
    pub variants: Vec<Variant>,
}

/// State handed back by [`VariantSet::select_fallback`] so the parser can
/// resume from an alternative reading after the current one fails.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Fallback {
    pub left_chain_len: usize,
    pub expression: NodeId,
    pub right_offset: u32,
}

/// The set of open branch points for one binary expression.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct VariantSet {
    points: Vec<BranchPoint>,
}

impl VariantSet {
    /// Empty set.
    pub fn new() -> Self {
        VariantSet { points: Vec::new() }
    }

    /// Returns true if no branch point is tracked.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Open a branch point. Variants are reordered most-complete first.
    pub fn add_branch_point(
        &mut self,
        offset: u32,
        left_chain_len: usize,
        mut variants: Vec<Variant>,
    ) {
        variants.sort_by(|a, b| b.template_names.len().cmp(&a.template_names.len()));
        self.points.push(BranchPoint {
            offset,
            left_chain_len,
            variants,
        });
    }

    /// Returns true if any variant's right boundary equals `offset`.
    pub fn has_right_bound(&self, offset: u32) -> bool {
        self.points
            .iter()
            .flat_map(|p| &p.variants)
            .any(|v| v.right_offset == offset)
    }

    /// Bind every still-open variant whose right boundary equals `offset`
    /// to `target`.
    pub fn close_variants(&mut self, offset: u32, target: ChainTarget) {
        for point in &mut self.points {
            for variant in &mut point.variants {
                if variant.target.is_none() && variant.right_offset == offset {
                    variant.target = Some(target);
                }
            }
        }
    }

    /// Re-open variants whose target refers to a chain entry at or beyond
    /// `chain_len` (the chain was truncated by a fallback restore).
    pub fn invalidate_targets_at(&mut self, chain_len: usize) {
        for point in &mut self.points {
            for variant in &mut point.variants {
                if matches!(variant.target, Some(ChainTarget::Op(i)) if i >= chain_len)
                    || matches!(variant.target, Some(ChainTarget::End))
                {
                    variant.target = None;
                }
            }
        }
    }

    /// Drop variants that never closed, and branch points left empty.
    pub fn remove_invalid(&mut self) {
        for point in &mut self.points {
            point.variants.retain(|v| v.target.is_some());
        }
        self.points.retain(|p| !p.variants.is_empty());
    }

    /// Take one alternative reading to resume from after a parse failure,
    /// preferring the most recent branch point and its most complete
    /// variant. The variant is consumed: it becomes the mainline parse and
    /// is no longer an alternative.
    pub fn select_fallback(&mut self) -> Option<Fallback> {
        let point = self.points.last_mut()?;
        let variant = point.variants.remove(0);
        let fallback = Fallback {
            left_chain_len: point.left_chain_len,
            expression: variant.expression,
            right_offset: variant.right_offset,
        };
        if point.variants.is_empty() {
            self.points.pop();
        }
        Some(fallback)
    }

    /// Branch points ordered outer-to-inner (by source offset).
    pub fn into_ordered_branch_points(mut self) -> Vec<BranchPoint> {
        self.points.sort_by_key(|p| p.offset);
        self.points
    }
}
