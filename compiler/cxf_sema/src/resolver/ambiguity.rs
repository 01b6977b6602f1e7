//! Trial-and-commit resolution of ambiguity nodes.
//!
//! Each ambiguity kind carries its own trial order and commit policy over
//! the same skeleton: resolve the names under each alternative inside a
//! trial, pick the alternative with the fewest problem bindings (a clean
//! alternative ends the search), splice the winner into the parent's child
//! slot, and discard the losers' cached bindings.

use crate::binding::BindingKind;
use crate::error::ResolutionError;
use crate::resolver::{Resolver, TrialReport};
use crate::scope::LookupScope;
use cxf_ast::{
    collect_names, AmbiguityData, AmbiguityKind, DeclSpecKind, DeclaratorKind, NodeId, NodeKind,
};
use rustc_hash::FxHashSet;

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
        NodeKind::Ambiguity(data) => data.clone(),
        _ => {
            return Err(ResolutionError::UnexpectedNode {
                node,
                expected: "ambiguity",
            })
        }
    };

    if data.alternatives.is_empty() {
        return Err(ResolutionError::UnexpectedNode {
            node,
            expected: "ambiguity with at least one alternative",
        });
    }

    // Member caches must be warm before the first alternative runs; a trial
    // must not observe a scope that a later trial would see differently.
    r.scope.populate_member_cache();

    let order = trial_order(r, &data);

    r.begin_trial();
    let trial = run_trials(r, &data, &order);
    r.end_trial();
    let winner = trial?;

    commit_policy(r, parent, &data, winner)?;

    if !r.arena.replace_child(parent, node, winner) {
        return Err(ResolutionError::UnexpectedNode {
            node: parent,
            expected: "parent owning the ambiguity",
        });
    }

    let winner_names: FxHashSet<NodeId> = collect_names(r.arena, winner).into_iter().collect();
    for &alt in &data.alternatives {
        if alt != winner {
            r.discard_loser(alt, &winner_names);
        }
    }
    tracing::trace!(?node, ?winner, "ambiguity committed");
    Ok(winner)
}

/// Alternatives in the order they are tried.
fn trial_order<S: LookupScope>(r: &Resolver<'_, S>, data: &AmbiguityData) -> Vec<NodeId> {
    match data.kind {
        // The parenthesized-declarator reading added last is preferred.
        AmbiguityKind::Declarator => data.alternatives.iter().rev().copied().collect(),
        // A statement that can be a declaration is a declaration.
        AmbiguityKind::Statement => {
            let (decls, exprs): (Vec<NodeId>, Vec<NodeId>) =
                data.alternatives.iter().copied().partition(|&alt| {
                    matches!(r.arena.kind(alt), NodeKind::DeclarationStatement { .. })
                });
            decls.into_iter().chain(exprs).collect()
        }
        _ => data.alternatives.clone(),
    }
}

/// Run the alternatives in order and choose a winner.
///
/// A scope collaborator failure inside a trial fails that alternative and
/// the search moves on; if every alternative fails that way, the preferred
/// alternative is committed and its names degrade outside the trial.
fn run_trials<S: LookupScope>(
    r: &mut Resolver<'_, S>,
    data: &AmbiguityData,
    order: &[NodeId],
) -> Result<NodeId, ResolutionError> {
    if let AmbiguityKind::SimpleDeclaration {
        repair_decl_spec,
        repair_declarator,
    } = data.kind
    {
        return run_simple_declaration(r, data, repair_decl_spec, repair_declarator);
    }

    let mut tried: Vec<(NodeId, Option<TrialReport>)> = Vec::new();
    for &alt in order {
        if let AmbiguityKind::TemplateArgument { shared_names } = &data.kind {
            for &name in shared_names {
                r.clear_binding(name);
            }
        }
        match r.trial_walk(alt) {
            Ok(report) => {
                let clean = report.problems == 0;
                tried.push((alt, Some(report)));
                if clean {
                    break;
                }
            }
            Err(ResolutionError::Lookup(_)) => tried.push((alt, None)),
            Err(other) => return Err(other),
        }
    }

    let last_tried = tried.last().map(|(alt, _)| *alt);
    let winner = tried
        .iter()
        .filter_map(|(alt, report)| report.as_ref().map(|rep| (*alt, rep.problems)))
        .min_by_key(|&(_, problems)| problems)
        .map_or_else(|| order[0], |(alt, _)| alt);

    // The winner's cached bindings must reflect its own trial, not the last
    // one run over the physically shared names.
    if let AmbiguityKind::TemplateArgument { shared_names } = &data.kind {
        if last_tried != Some(winner) {
            for &name in shared_names {
                r.clear_binding(name);
            }
            match r.trial_walk(winner) {
                Ok(_) | Err(ResolutionError::Lookup(_)) => {}
                Err(other) => return Err(other),
            }
        }
    }
    Ok(winner)
}

/// Constructor-vs-field declarations have a single alternative that is
/// repaired in place when its primary reading does not resolve cleanly.
fn run_simple_declaration<S: LookupScope>(
    r: &mut Resolver<'_, S>,
    data: &AmbiguityData,
    repair_decl_spec: NodeId,
    repair_declarator: NodeId,
) -> Result<NodeId, ResolutionError> {
    let decl = data.alternatives[0];
    let clean = match r.trial_walk(decl) {
        Ok(report) => report.problems == 0,
        Err(ResolutionError::Lookup(_)) => false,
        Err(other) => return Err(other),
    };
    if clean {
        return Ok(decl);
    }

    let (old_spec, old_declarators) = match &mut r.arena.get_mut(decl).kind {
        NodeKind::SimpleDeclaration {
            decl_spec,
            declarators,
        } => {
            let old_spec = std::mem::replace(decl_spec, repair_decl_spec);
            let old_declarators = std::mem::replace(declarators, vec![repair_declarator]);
            (old_spec, old_declarators)
        }
        _ => {
            return Err(ResolutionError::UnexpectedNode {
                node: decl,
                expected: "simple declaration",
            })
        }
    };
    r.arena.connect(decl);
    r.arena.get_mut(old_spec).parent = None;
    for old in &old_declarators {
        r.arena.get_mut(*old).parent = None;
    }

    let repaired_names: FxHashSet<NodeId> = collect_names(r.arena, decl).into_iter().collect();
    for old in old_declarators.into_iter().chain([old_spec]) {
        r.discard_loser(old, &repaired_names);
    }

    match r.trial_walk(decl) {
        Ok(_) | Err(ResolutionError::Lookup(_)) => {}
        Err(other) => return Err(other),
    }
    Ok(decl)
}

/// Kind-specific commit work done after the winner is known but before the
/// splice.
fn commit_policy<S: LookupScope>(
    r: &mut Resolver<'_, S>,
    parent: NodeId,
    data: &AmbiguityData,
    winner: NodeId,
) -> Result<(), ResolutionError> {
    match data.kind {
        AmbiguityKind::Declarator => {
            if data.satellite.is_none() && data.satellite_pointer_ops.is_empty() {
                return Ok(());
            }
            match &mut r.arena.get_mut(winner).kind {
                NodeKind::Declarator(d) => {
                    d.pointer_ops.extend(data.satellite_pointer_ops.iter().copied());
                    if data.satellite.is_some() {
                        d.initializer = data.satellite;
                    }
                }
                _ => {
                    return Err(ResolutionError::UnexpectedNode {
                        node: winner,
                        expected: "declarator",
                    })
                }
            }
            if let Some(satellite) = data.satellite {
                r.arena.get_mut(satellite).parent = Some(winner);
            }
            Ok(())
        }
        AmbiguityKind::ParameterPack => commit_parameter_pack(r, parent, winner),
        AmbiguityKind::SimpleDeclaration { .. }
        | AmbiguityKind::TemplateArgument { .. }
        | AmbiguityKind::Statement => Ok(()),
    }
}

/// `T ...` in a parameter list declares a pack only when `T` names a
/// template parameter pack; otherwise the ellipsis is C-style varargs on
/// the enclosing function declarator.
fn commit_parameter_pack<S: LookupScope>(
    r: &mut Resolver<'_, S>,
    parent: NodeId,
    winner: NodeId,
) -> Result<(), ResolutionError> {
    let (decl_spec, declarator) = match r.arena.kind(winner) {
        NodeKind::ParameterDeclaration {
            decl_spec,
            declarator,
        } => (*decl_spec, *declarator),
        _ => {
            return Err(ResolutionError::UnexpectedNode {
                node: winner,
                expected: "parameter declaration",
            })
        }
    };
    let spec_name = match r.arena.kind(decl_spec) {
        NodeKind::DeclSpecifier(DeclSpecKind::Named { name }) => Some(*name),
        _ => None,
    };
    let is_pack = spec_name
        .and_then(|name| r.binding(name))
        .is_some_and(|b| matches!(b.kind(), BindingKind::TemplateParameter { pack: true }));

    match &mut r.arena.get_mut(declarator).kind {
        NodeKind::Declarator(d) => d.declares_pack = is_pack,
        _ => {
            return Err(ResolutionError::UnexpectedNode {
                node: declarator,
                expected: "declarator",
            })
        }
    }
    if !is_pack {
        if let NodeKind::Declarator(d) = &mut r.arena.get_mut(parent).kind {
            if let DeclaratorKind::Function(f) = &mut d.kind {
                f.takes_var_args = true;
            }
        }
    }
    Ok(())
}
