//! The resolution engine.
//!
//! [`Resolver`] drives everything this crate does: two-phase name
//! resolution with per-name memoization and a recursion bound, and the
//! trial-and-commit disambiguation of ambiguity nodes. It borrows the AST
//! arena mutably for the duration of a pass because committing an
//! ambiguity rewrites the tree.

mod ambiguity;
mod angle;

use crate::binding::{Binding, BindingKind, ProblemKind};
use crate::config::ResolverConfig;
use crate::error::ResolutionError;
use crate::instantiate::InstantiationContext;
use crate::scope::{LookupQuery, LookupScope, NameRole};
use crate::slot::BindingTable;
use cxf_ast::{AstArena, NameKind, NodeKind, NodeId};
use cxf_stack::ensure_sufficient_stack;
use rustc_hash::FxHashSet;

#[derive(Copy, Clone)]
enum WalkStep {
    Ambiguity,
    Angle,
    Name,
    Other,
}

/// Outcome of resolving every name under one alternative during a trial.
#[derive(Default, Debug)]
pub(crate) struct TrialReport {
    /// Names that resolved to problem bindings.
    pub problems: usize,
    /// Every name node resolved by the trial, in preorder.
    pub names: Vec<NodeId>,
}

/// Name and ambiguity resolver over one AST.
pub struct Resolver<'a, S: LookupScope> {
    pub(crate) arena: &'a mut AstArena,
    scope: &'a S,
    table: BindingTable,
    config: ResolverConfig,
    /// Nesting depth of alternative trials. While non-zero, scope failures
    /// propagate so the enclosing trial can fail the alternative; at zero
    /// they degrade to problem bindings.
    trial_depth: u32,
    /// Instantiation state handed opaquely to the scope when a binding is
    /// finalized. `None` outside of an instantiation.
    context: Option<InstantiationContext>,
}

impl<'a, S: LookupScope> Resolver<'a, S> {
    pub fn new(arena: &'a mut AstArena, scope: &'a S) -> Self {
        Resolver::with_config(arena, scope, ResolverConfig::default())
    }

    pub fn with_config(arena: &'a mut AstArena, scope: &'a S, config: ResolverConfig) -> Self {
        Resolver {
            arena,
            scope,
            table: BindingTable::new(),
            config,
            trial_depth: 0,
            context: None,
        }
    }

    /// Attaches the instantiation context threaded through to the scope's
    /// final phase.
    #[must_use]
    pub fn with_context(mut self, context: InstantiationContext) -> Self {
        self.context = Some(context);
        self
    }

    /// The per-name resolution cache.
    pub fn bindings(&self) -> &BindingTable {
        &self.table
    }

    /// Consume the resolver, releasing the arena borrow and keeping the
    /// resolved bindings.
    pub fn into_bindings(self) -> BindingTable {
        self.table
    }

    /// Cached binding for `name`, if any phase of resolution ran.
    pub fn binding(&self, name: NodeId) -> Option<&Binding> {
        self.table.binding(name)
    }

    /// Resolve the whole tree: commit every ambiguity, resolve every name,
    /// then freeze the names against external rebinding.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn resolve_tree(&mut self, root: NodeId) -> Result<(), ResolutionError> {
        self.walk(root)?;
        self.freeze(root);
        Ok(())
    }

    /// First-phase resolution of one name.
    pub fn resolve_intermediate(&mut self, name: NodeId) -> Result<Binding, ResolutionError> {
        let result = self.intermediate(name);
        self.degrade_outside_trial(name, result)
    }

    /// Full two-phase resolution of one name.
    pub fn resolve_final(&mut self, name: NodeId) -> Result<Binding, ResolutionError> {
        let result = self.final_phase(name);
        self.degrade_outside_trial(name, result)
    }

    /// The binding of `name`: the cached final binding if present,
    /// otherwise a full resolution.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn resolve_binding(&mut self, name: NodeId) -> Result<Binding, ResolutionError> {
        if let Some(slot) = self.table.slot(name) {
            if slot.resolution().is_final() {
                if let Some(binding) = slot.resolution().binding() {
                    return Ok(binding.clone());
                }
            }
        }
        self.resolve_final(name)
    }

    /// Externally install a final binding for `name`, resetting its
    /// recursion budget. Rejected once the name is frozen.
    pub fn set_binding(&mut self, name: NodeId, binding: Binding) -> Result<(), ResolutionError> {
        match self.arena.name(name) {
            Some(data) if data.frozen => Err(ResolutionError::FrozenName { node: name }),
            Some(_) => {
                self.table.slot_mut(name).set(binding);
                Ok(())
            }
            None => Err(ResolutionError::UnexpectedNode {
                node: name,
                expected: "name",
            }),
        }
    }

    /// Drop the cached resolution for `name`. The recursion budget is kept;
    /// only [`Resolver::set_binding`] replenishes it.
    pub fn clear_binding(&mut self, name: NodeId) {
        self.table.clear(name);
    }

    fn degrade_outside_trial(
        &mut self,
        name: NodeId,
        result: Result<Binding, ResolutionError>,
    ) -> Result<Binding, ResolutionError> {
        match result {
            Err(ResolutionError::Lookup(_)) if self.trial_depth == 0 => {
                let symbol = self
                    .arena
                    .name(name)
                    .map_or(cxf_ast::Symbol::EMPTY, |d| d.symbol);
                let problem = Binding::problem(symbol, ProblemKind::LookupFailure);
                let slot = self.table.slot_mut(name);
                slot.set_in_progress(false);
                slot.resolution_mut().seal(problem.clone());
                Ok(problem)
            }
            other => other,
        }
    }

    fn intermediate(&mut self, name: NodeId) -> Result<Binding, ResolutionError> {
        let data = self
            .arena
            .name(name)
            .ok_or(ResolutionError::UnexpectedNode {
                node: name,
                expected: "name",
            })?;
        let symbol = data.symbol;
        let is_template_id = matches!(data.kind, NameKind::TemplateId { .. });

        let slot = self.table.slot_mut(name);
        if let Some(binding) = slot.resolution().binding() {
            return Ok(binding.clone());
        }
        let overflow = slot.in_progress() || slot.bump_depth() > self.config.max_resolution_depth;
        if overflow {
            if self.config.strict_recursion {
                return Err(ResolutionError::RecursionOverflow { symbol });
            }
            let problem = Binding::problem(symbol, ProblemKind::RecursionOverflow);
            let slot = self.table.slot_mut(name);
            slot.set_in_progress(false);
            slot.resolution_mut().seal(problem.clone());
            return Ok(problem);
        }
        slot.set_in_progress(true);

        let role = if is_template_id {
            NameRole::TemplateName
        } else {
            self.role_of(name)
        };
        let looked_up = self
            .scope
            .create_intermediate_binding(LookupQuery { symbol, role });
        let slot = self.table.slot_mut(name);
        slot.set_in_progress(false);
        let base = looked_up?;

        let binding = if is_template_id {
            template_id_binding(symbol, base)
        } else {
            base
        };
        self.table
            .slot_mut(name)
            .resolution_mut()
            .set_intermediate(binding.clone());
        Ok(binding)
    }

    fn final_phase(&mut self, name: NodeId) -> Result<Binding, ResolutionError> {
        let intermediate = self.intermediate(name)?;
        if self
            .table
            .slot(name)
            .is_some_and(|s| s.resolution().is_final())
        {
            return Ok(intermediate);
        }
        let finalized = self
            .scope
            .finalize_binding(&intermediate, self.context.as_ref())?;
        if !finalized.is_problem() && finalized.kind_class() != intermediate.kind_class() {
            return Err(ResolutionError::KindMismatch {
                symbol: intermediate.symbol(),
                from: intermediate.kind_class(),
                to: finalized.kind_class(),
            });
        }
        self.table
            .slot_mut(name)
            .resolution_mut()
            .seal(finalized.clone());
        Ok(finalized)
    }

    /// Syntactic role of a name, from its parent node.
    fn role_of(&self, name: NodeId) -> NameRole {
        match self.arena.get(name).parent.map(|p| self.arena.kind(p)) {
            Some(NodeKind::DeclSpecifier(_)) | Some(NodeKind::TypeId { .. }) => NameRole::Type,
            Some(NodeKind::Declarator(_)) | Some(NodeKind::ClassSpecifier { .. }) => {
                NameRole::Declaration
            }
            _ => NameRole::Expression,
        }
    }

    fn step_of(&self, node: NodeId) -> WalkStep {
        match self.arena.kind(node) {
            NodeKind::Ambiguity(_) => WalkStep::Ambiguity,
            NodeKind::TemplateIdAmbiguity(_) => WalkStep::Angle,
            NodeKind::Name(_) => WalkStep::Name,
            _ => WalkStep::Other,
        }
    }

    fn walk(&mut self, node: NodeId) -> Result<(), ResolutionError> {
        ensure_sufficient_stack(|| match self.step_of(node) {
            WalkStep::Ambiguity => {
                let winner = ambiguity::resolve(self, node)?;
                self.walk(winner)
            }
            WalkStep::Angle => {
                let committed = angle::resolve(self, node)?;
                self.walk(committed)
            }
            WalkStep::Name => {
                for child in self.arena.children(node) {
                    self.walk(child)?;
                }
                self.resolve_binding(node)?;
                Ok(())
            }
            WalkStep::Other => {
                for child in self.arena.children(node) {
                    self.walk(child)?;
                }
                Ok(())
            }
        })
    }

    /// Resolve every name under `root` for an alternative trial, counting
    /// problem bindings. Nested ambiguities are committed along the way.
    pub(crate) fn trial_walk(&mut self, root: NodeId) -> Result<TrialReport, ResolutionError> {
        let mut report = TrialReport::default();
        self.trial_walk_into(root, &mut report)?;
        Ok(report)
    }

    fn trial_walk_into(
        &mut self,
        node: NodeId,
        report: &mut TrialReport,
    ) -> Result<(), ResolutionError> {
        ensure_sufficient_stack(|| match self.step_of(node) {
            WalkStep::Ambiguity => {
                let winner = ambiguity::resolve(self, node)?;
                self.trial_walk_into(winner, report)
            }
            WalkStep::Angle => {
                let committed = angle::resolve(self, node)?;
                self.trial_walk_into(committed, report)
            }
            WalkStep::Name => {
                for child in self.arena.children(node) {
                    self.trial_walk_into(child, report)?;
                }
                let binding = self.resolve_binding(node)?;
                if binding.is_problem() {
                    report.problems += 1;
                }
                report.names.push(node);
                Ok(())
            }
            WalkStep::Other => {
                for child in self.arena.children(node) {
                    self.trial_walk_into(child, report)?;
                }
                Ok(())
            }
        })
    }

    pub(crate) fn begin_trial(&mut self) {
        self.trial_depth += 1;
    }

    pub(crate) fn end_trial(&mut self) {
        debug_assert!(self.trial_depth > 0);
        self.trial_depth = self.trial_depth.saturating_sub(1);
    }

    /// Discard cached bindings of every name under a losing alternative,
    /// except names physically shared with the winner.
    pub(crate) fn discard_loser(&mut self, loser: NodeId, winner_names: &FxHashSet<NodeId>) {
        for name in cxf_ast::collect_names(self.arena, loser) {
            if !winner_names.contains(&name) {
                self.table.clear(name);
            }
        }
    }

    fn freeze(&mut self, root: NodeId) {
        for id in cxf_ast::preorder(self.arena, root) {
            if let Some(data) = self.arena.name_mut(id) {
                data.frozen = true;
            }
        }
    }
}

/// A template-id name resolves through its template name's binding: a class
/// template yields a deferred instance for the second phase; other
/// template-like bindings stand for the whole id; anything else is not a
/// template.
fn template_id_binding(symbol: cxf_ast::Symbol, base: Binding) -> Binding {
    match base.kind() {
        BindingKind::ClassTemplate => Binding::new(symbol, BindingKind::DeferredInstance),
        _ if base.is_template_like() || base.is_problem() => base,
        _ => Binding::problem(symbol, ProblemKind::NotATemplate),
    }
}
