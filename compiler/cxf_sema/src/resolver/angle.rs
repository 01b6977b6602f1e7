//! Semantic resolution of ambiguous `<` tokens.
//!
//! The parser leaves a `TemplateIdAmbiguity` node holding the relational
//! reading's operator chain and the branch points it discovered. Resolution
//! walks the branch points outer-to-inner: each closed variant's candidate
//! names are resolved first-phase and the variant with the most
//! template-like resolutions wins, as long as it has at least one and no
//! name resolved to a problem. The winner's expression is spliced over the
//! chain span the relational reading had assigned to those tokens. Branch
//! points inside a committed template-argument list are never revisited.
//! Whatever remains of the chain is rebuilt into the final expression tree.

use crate::error::ResolutionError;
use crate::resolver::Resolver;
use crate::scope::LookupScope;
use cxf_ast::{build_expression, ChainTarget, NodeId, NodeKind, Variant};

pub(crate) fn resolve<S: LookupScope>(
    r: &mut Resolver<'_, S>,
    node: NodeId,
) -> Result<NodeId, ResolutionError> {
    let parent = r
        .arena
        .get(node)
        .parent
        .ok_or(ResolutionError::DetachedAmbiguity { node })?;
    let data = match r.arena.kind(node) {
        NodeKind::TemplateIdAmbiguity(data) => data.clone(),
        _ => {
            return Err(ResolutionError::UnexpectedNode {
                node,
                expected: "template-id ambiguity",
            })
        }
    };

    let mut chain = data.chain;
    let mut last_expr = data.last_expr;
    let mut points = data.branch_points;
    points.sort_by_key(|p| p.offset);

    // Right boundary of the last committed template-id; branch points to
    // its left were consumed by that argument list.
    let mut min_offset = 0u32;

    for i in 0..points.len() {
        let point = points[i].clone();
        if point.offset < min_offset {
            continue;
        }
        let mut winner: Option<(usize, usize)> = None;
        for (idx, variant) in point.variants.iter().enumerate() {
            if variant.target.is_none() {
                continue;
            }
            r.begin_trial();
            let score = score_variant(r, variant);
            r.end_trial();
            match score? {
                Some(count) if count > 0 && winner.is_none_or(|(_, best)| count > best) => {
                    if let Some((prev, _)) = winner.replace((idx, count)) {
                        discard_variant(r, &point.variants[prev]);
                    }
                }
                _ => discard_variant(r, variant),
            }
        }
        let Some((idx, _)) = winner else {
            continue;
        };
        let variant = &point.variants[idx];
        let Some(target) = variant.target else {
            continue;
        };

        let (from, to) = match target {
            ChainTarget::Op(op) => (point.left_chain_len, op),
            ChainTarget::End => (point.left_chain_len, chain.len()),
        };
        chain.splice(from, to, variant.expression, &mut last_expr);
        let removed = to - from;
        for later in points.iter_mut().skip(i + 1) {
            if later.left_chain_len >= to {
                later.left_chain_len -= removed;
            }
            for v in &mut later.variants {
                if let Some(ChainTarget::Op(k)) = &mut v.target {
                    if *k >= to {
                        *k -= removed;
                    }
                }
            }
        }
        min_offset = variant.right_offset;
        tracing::trace!(offset = point.offset, expr = ?variant.expression, "template-id committed");
    }

    let expr = build_expression(r.arena, &chain, last_expr);
    if !r.arena.replace_child(parent, node, expr) {
        return Err(ResolutionError::UnexpectedNode {
            node: parent,
            expected: "parent owning the ambiguity",
        });
    }
    Ok(expr)
}

/// Counts how many of the variant's candidate names resolve to template-like
/// bindings. A name that resolves to something else still scores zero without
/// disqualifying the variant; a problem binding or a scope failure rejects it
/// outright.
fn score_variant<S: LookupScope>(
    r: &mut Resolver<'_, S>,
    variant: &Variant,
) -> Result<Option<usize>, ResolutionError> {
    let mut count = 0;
    for &name in &variant.template_names {
        let binding = match r.resolve_intermediate(name) {
            Ok(b) => b,
            Err(ResolutionError::Lookup(_)) => return Ok(None),
            Err(other) => return Err(other),
        };
        if binding.is_problem() {
            return Ok(None);
        }
        if binding.is_template_like() {
            count += 1;
        }
    }
    Ok(Some(count))
}

fn discard_variant<S: LookupScope>(r: &mut Resolver<'_, S>, variant: &Variant) {
    for &name in &variant.template_names {
        r.clear_binding(name);
    }
}
