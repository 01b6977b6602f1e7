//! Trial-and-commit resolution of the concrete ambiguity kinds.

use super::{id_expr, name, named_declarator, named_spec, spec_of, template_id};
use crate::{
    Binding, InstantiationContext, LookupError, LookupQuery, LookupScope, ProblemKind,
    ResolutionError, Resolver, SymbolTable,
};
use cxf_ast::{
    AmbiguityData, AmbiguityKind, AstArena, BinaryOpKind, BuiltinSpec, DeclSpecKind,
    DeclaratorData, DeclaratorKind, FunctionDeclaratorData, NodeId, NodeKind, PointerOp, Span,
    StringInterner,
};
use pretty_assertions::assert_eq;
use std::cell::Cell;

fn ambiguity(
    arena: &mut AstArena,
    kind: AmbiguityKind,
    alternatives: Vec<NodeId>,
    satellite: Option<NodeId>,
) -> NodeId {
    let node = arena.alloc(
        NodeKind::Ambiguity(AmbiguityData {
            kind,
            alternatives,
            satellite,
            satellite_pointer_ops: Vec::new(),
        }),
        Span::DUMMY,
    );
    arena.connect(node);
    node
}

/// Function declarator whose single parameter has the named type.
fn function_declarator_with_param_type(
    arena: &mut AstArena,
    interner: &StringInterner,
    fn_name: &str,
    param_type: &str,
) -> (NodeId, NodeId) {
    let (spec, type_name) = named_spec(arena, interner, param_type);
    let abstract_decl = arena.alloc(
        NodeKind::Declarator(DeclaratorData::abstract_declarator()),
        Span::DUMMY,
    );
    let param = arena.alloc(
        NodeKind::ParameterDeclaration {
            decl_spec: spec,
            declarator: abstract_decl,
        },
        Span::DUMMY,
    );
    arena.connect(param);
    let n = name(arena, interner, fn_name);
    let declarator = arena.alloc(
        NodeKind::Declarator(DeclaratorData {
            name: Some(n),
            pointer_ops: Vec::new(),
            kind: DeclaratorKind::Function(FunctionDeclaratorData {
                parameters: vec![param],
                takes_var_args: false,
            }),
            initializer: None,
            declares_pack: false,
        }),
        Span::DUMMY,
    );
    arena.connect(declarator);
    (declarator, type_name)
}

#[test]
fn test_declarator_ambiguity_prefers_last_alternative() {
    let interner = StringInterner::new();
    let mut arena = AstArena::new();
    let mut scope = SymbolTable::new();
    scope.declare_type(interner.intern("T"));

    // `int f(T)` reading, added first.
    let (func_decl, _) = function_declarator_with_param_type(&mut arena, &interner, "f", "T");
    // `int (f)` reading, added last.
    let (inner, _) = named_declarator(&mut arena, &interner, "f2");
    let nested = arena.alloc(
        NodeKind::Declarator(DeclaratorData {
            name: None,
            pointer_ops: Vec::new(),
            kind: DeclaratorKind::Nested { inner },
            initializer: None,
            declares_pack: false,
        }),
        Span::DUMMY,
    );
    arena.connect(nested);

    let init_expr = arena.alloc(NodeKind::Literal { value: 1 }, Span::DUMMY);
    let init = arena.alloc(NodeKind::EqualsInitializer { expr: init_expr }, Span::DUMMY);
    arena.connect(init);

    let ambig = ambiguity(
        &mut arena,
        AmbiguityKind::Declarator,
        vec![func_decl, nested],
        Some(init),
    );
    let spec = arena.alloc(
        NodeKind::DeclSpecifier(DeclSpecKind::Builtin(BuiltinSpec::Int)),
        Span::DUMMY,
    );
    let decl = arena.alloc(
        NodeKind::SimpleDeclaration {
            decl_spec: spec,
            declarators: vec![ambig],
        },
        Span::DUMMY,
    );
    arena.connect(decl);

    let mut resolver = Resolver::new(&mut arena, &scope);
    resolver.resolve_tree(decl).unwrap();

    match resolver.arena.kind(decl) {
        NodeKind::SimpleDeclaration { declarators, .. } => {
            assert_eq!(declarators, &vec![nested]);
        }
        other => panic!("expected simple declaration, got {other:?}"),
    }
    // The shared initializer belongs to the winner.
    match resolver.arena.kind(nested) {
        NodeKind::Declarator(d) => assert_eq!(d.initializer, Some(init)),
        other => panic!("expected declarator, got {other:?}"),
    }
    assert_eq!(resolver.arena.get(init).parent, Some(nested));
    assert_eq!(resolver.arena.get(nested).parent, Some(decl));
}

#[test]
fn test_declarator_ambiguity_falls_back_when_preferred_is_dirty() {
    let interner = StringInterner::new();
    let mut arena = AstArena::new();
    let scope = SymbolTable::new();

    // First alternative: plain declarator, resolves cleanly.
    let (plain, _) = named_declarator(&mut arena, &interner, "f");
    // Last alternative: function declarator whose parameter type does not
    // exist.
    let (func_decl, type_name) =
        function_declarator_with_param_type(&mut arena, &interner, "f2", "Missing");

    let ambig = ambiguity(
        &mut arena,
        AmbiguityKind::Declarator,
        vec![plain, func_decl],
        None,
    );
    let spec = arena.alloc(
        NodeKind::DeclSpecifier(DeclSpecKind::Builtin(BuiltinSpec::Int)),
        Span::DUMMY,
    );
    let decl = arena.alloc(
        NodeKind::SimpleDeclaration {
            decl_spec: spec,
            declarators: vec![ambig],
        },
        Span::DUMMY,
    );
    arena.connect(decl);

    let mut resolver = Resolver::new(&mut arena, &scope);
    resolver.resolve_tree(decl).unwrap();

    match resolver.arena.kind(decl) {
        NodeKind::SimpleDeclaration { declarators, .. } => {
            assert_eq!(declarators, &vec![plain]);
        }
        other => panic!("expected simple declaration, got {other:?}"),
    }
    // The loser's cached bindings were discarded.
    assert!(resolver.binding(type_name).is_none());
}

#[test]
fn test_simple_declaration_repairs_in_place_when_dirty() {
    let interner = StringInterner::new();
    let mut arena = AstArena::new();
    let scope = SymbolTable::new();

    // Primary reading: `Missing d0;` with an unknown type.
    let (primary_spec, primary_type) = named_spec(&mut arena, &interner, "Missing");
    let (primary_declarator, _) = named_declarator(&mut arena, &interner, "d0");
    let decl = arena.alloc(
        NodeKind::SimpleDeclaration {
            decl_spec: primary_spec,
            declarators: vec![primary_declarator],
        },
        Span::DUMMY,
    );
    arena.connect(decl);

    let repair_spec = arena.alloc(
        NodeKind::DeclSpecifier(DeclSpecKind::Builtin(BuiltinSpec::Int)),
        Span::DUMMY,
    );
    let (repair_declarator, repair_name) = named_declarator(&mut arena, &interner, "d");

    let ambig = ambiguity(
        &mut arena,
        AmbiguityKind::SimpleDeclaration {
            repair_decl_spec: repair_spec,
            repair_declarator,
        },
        vec![decl],
        None,
    );
    let unit = arena.alloc(
        NodeKind::TranslationUnit {
            declarations: vec![ambig],
        },
        Span::DUMMY,
    );
    arena.connect(unit);

    let mut resolver = Resolver::new(&mut arena, &scope);
    resolver.resolve_tree(unit).unwrap();

    match resolver.arena.kind(decl) {
        NodeKind::SimpleDeclaration {
            decl_spec,
            declarators,
        } => {
            assert_eq!(*decl_spec, repair_spec);
            assert_eq!(declarators, &vec![repair_declarator]);
        }
        other => panic!("expected simple declaration, got {other:?}"),
    }
    match resolver.arena.kind(unit) {
        NodeKind::TranslationUnit { declarations } => assert_eq!(declarations, &vec![decl]),
        other => panic!("expected translation unit, got {other:?}"),
    }
    assert_eq!(resolver.arena.get(primary_spec).parent, None);
    assert!(resolver.binding(primary_type).is_none());
    assert!(resolver.binding(repair_name).is_some());
}

#[test]
fn test_simple_declaration_kept_when_clean() {
    let interner = StringInterner::new();
    let mut arena = AstArena::new();
    let mut scope = SymbolTable::new();
    scope.declare_type(interner.intern("C"));

    let (primary_spec, _) = named_spec(&mut arena, &interner, "C");
    let (primary_declarator, _) = named_declarator(&mut arena, &interner, "d0");
    let decl = arena.alloc(
        NodeKind::SimpleDeclaration {
            decl_spec: primary_spec,
            declarators: vec![primary_declarator],
        },
        Span::DUMMY,
    );
    arena.connect(decl);

    let repair_spec = arena.alloc(
        NodeKind::DeclSpecifier(DeclSpecKind::Builtin(BuiltinSpec::Int)),
        Span::DUMMY,
    );
    let (repair_declarator, _) = named_declarator(&mut arena, &interner, "d");

    let ambig = ambiguity(
        &mut arena,
        AmbiguityKind::SimpleDeclaration {
            repair_decl_spec: repair_spec,
            repair_declarator,
        },
        vec![decl],
        None,
    );
    let unit = arena.alloc(
        NodeKind::TranslationUnit {
            declarations: vec![ambig],
        },
        Span::DUMMY,
    );
    arena.connect(unit);

    let mut resolver = Resolver::new(&mut arena, &scope);
    resolver.resolve_tree(unit).unwrap();

    match resolver.arena.kind(decl) {
        NodeKind::SimpleDeclaration { decl_spec, .. } => assert_eq!(*decl_spec, primary_spec),
        other => panic!("expected simple declaration, got {other:?}"),
    }
}

/// `T ...` in a parameter list is a pack declaration only when `T` is a
/// template parameter pack; otherwise the ellipsis becomes C-style varargs
/// on the enclosing function declarator.
fn parameter_pack_fixture(
    arena: &mut AstArena,
    interner: &StringInterner,
) -> (NodeId, NodeId, NodeId) {
    let (spec, _) = named_spec(arena, interner, "T");
    let param_declarator = arena.alloc(
        NodeKind::Declarator(DeclaratorData {
            name: None,
            pointer_ops: Vec::new(),
            kind: DeclaratorKind::Plain,
            initializer: None,
            declares_pack: true,
        }),
        Span::DUMMY,
    );
    let param = arena.alloc(
        NodeKind::ParameterDeclaration {
            decl_spec: spec,
            declarator: param_declarator,
        },
        Span::DUMMY,
    );
    arena.connect(param);

    let ambig = ambiguity(arena, AmbiguityKind::ParameterPack, vec![param], None);
    let fn_name = name(arena, interner, "f");
    let func = arena.alloc(
        NodeKind::Declarator(DeclaratorData {
            name: Some(fn_name),
            pointer_ops: Vec::new(),
            kind: DeclaratorKind::Function(FunctionDeclaratorData {
                parameters: vec![ambig],
                takes_var_args: false,
            }),
            initializer: None,
            declares_pack: false,
        }),
        Span::DUMMY,
    );
    arena.connect(func);
    (func, param, param_declarator)
}

#[test]
fn test_parameter_pack_declares_pack_for_pack_parameter() {
    let interner = StringInterner::new();
    let mut arena = AstArena::new();
    let mut scope = SymbolTable::new();
    scope.declare_template_parameter(interner.intern("T"), true);
    let (func, param, param_declarator) = parameter_pack_fixture(&mut arena, &interner);

    let mut resolver = Resolver::new(&mut arena, &scope);
    resolver.resolve_tree(func).unwrap();

    match resolver.arena.kind(param_declarator) {
        NodeKind::Declarator(d) => assert!(d.declares_pack),
        other => panic!("expected declarator, got {other:?}"),
    }
    match resolver.arena.kind(func) {
        NodeKind::Declarator(d) => match &d.kind {
            DeclaratorKind::Function(f) => {
                assert!(!f.takes_var_args);
                assert_eq!(f.parameters, vec![param]);
            }
            other => panic!("expected function declarator, got {other:?}"),
        },
        other => panic!("expected declarator, got {other:?}"),
    }
}

#[test]
fn test_parameter_pack_becomes_varargs_for_plain_type() {
    let interner = StringInterner::new();
    let mut arena = AstArena::new();
    let mut scope = SymbolTable::new();
    scope.declare_type(interner.intern("T"));
    let (func, _, param_declarator) = parameter_pack_fixture(&mut arena, &interner);

    let mut resolver = Resolver::new(&mut arena, &scope);
    resolver.resolve_tree(func).unwrap();

    match resolver.arena.kind(param_declarator) {
        NodeKind::Declarator(d) => assert!(!d.declares_pack),
        other => panic!("expected declarator, got {other:?}"),
    }
    match resolver.arena.kind(func) {
        NodeKind::Declarator(d) => match &d.kind {
            DeclaratorKind::Function(f) => assert!(f.takes_var_args),
            other => panic!("expected function declarator, got {other:?}"),
        },
        other => panic!("expected declarator, got {other:?}"),
    }
}

#[test]
fn test_template_argument_clears_shared_names_per_trial() {
    let interner = StringInterner::new();
    let mut arena = AstArena::new();
    let mut scope = SymbolTable::new();
    scope.declare_variable(interner.intern("s"));

    // The name `s` is physically shared between the alternatives.
    let shared = name(&mut arena, &interner, "s");

    // Type-id reading: one unresolvable extra name.
    let (u1_expr, u1) = id_expr(&mut arena, &interner, "u1");
    let shared_expr1 = arena.alloc(NodeKind::IdExpr { name: shared }, Span::DUMMY);
    arena.connect(shared_expr1);
    let alt1 = arena.alloc(
        NodeKind::Binary {
            op: BinaryOpKind::Plus,
            lhs: shared_expr1,
            rhs: u1_expr,
        },
        Span::DUMMY,
    );
    arena.connect(alt1);

    // Expression reading: two unresolvable extra names.
    let (u2_expr, u2) = id_expr(&mut arena, &interner, "u2");
    let (u3_expr, u3) = id_expr(&mut arena, &interner, "u3");
    let shared_expr2 = arena.alloc(NodeKind::IdExpr { name: shared }, Span::DUMMY);
    arena.connect(shared_expr2);
    let inner = arena.alloc(
        NodeKind::Binary {
            op: BinaryOpKind::Plus,
            lhs: shared_expr2,
            rhs: u2_expr,
        },
        Span::DUMMY,
    );
    arena.connect(inner);
    let alt2 = arena.alloc(
        NodeKind::Binary {
            op: BinaryOpKind::Plus,
            lhs: inner,
            rhs: u3_expr,
        },
        Span::DUMMY,
    );
    arena.connect(alt2);

    let ambig = ambiguity(
        &mut arena,
        AmbiguityKind::TemplateArgument {
            shared_names: vec![shared],
        },
        vec![alt1, alt2],
        None,
    );
    let t = template_id(&mut arena, &interner, "t", vec![ambig]);
    let expr = arena.alloc(NodeKind::IdExpr { name: t }, Span::DUMMY);
    arena.connect(expr);
    let stmt = arena.alloc(NodeKind::ExpressionStatement { expr }, Span::DUMMY);
    arena.connect(stmt);

    let mut resolver = Resolver::new(&mut arena, &scope);
    resolver.resolve_tree(stmt).unwrap();

    // First alternative has fewer problems and wins.
    match resolver.arena.kind(t) {
        NodeKind::Name(data) => match &data.kind {
            cxf_ast::NameKind::TemplateId { arguments } => assert_eq!(arguments, &vec![alt1]),
            other => panic!("expected template-id, got {other:?}"),
        },
        other => panic!("expected name, got {other:?}"),
    }
    // The shared name was cleared and re-resolved for each trial plus the
    // winner's re-trial.
    assert_eq!(resolver.bindings().slot(shared).unwrap().depth(), 3);
    assert!(resolver.binding(shared).is_some());
    // Winner's names stay cached; losers' are discarded.
    assert!(resolver.binding(u1).is_some());
    assert!(resolver.binding(u2).is_none());
    assert!(resolver.binding(u3).is_none());
}

/// `a < b > c;` scenario machinery shared by the statement tests.
fn statement_fixture(
    arena: &mut AstArena,
    interner: &StringInterner,
) -> (NodeId, NodeId, NodeId, NodeId) {
    // Declaration reading: `a<b> c;`
    let (b_spec, _) = named_spec(arena, interner, "b");
    let b_type_id = arena.alloc(
        NodeKind::TypeId {
            decl_spec: b_spec,
            declarator: None,
        },
        Span::DUMMY,
    );
    arena.connect(b_type_id);
    let a_template = template_id(arena, interner, "a", vec![b_type_id]);
    let decl_spec = spec_of(arena, a_template);
    let (c_declarator, _) = named_declarator(arena, interner, "c");
    let declaration = arena.alloc(
        NodeKind::SimpleDeclaration {
            decl_spec,
            declarators: vec![c_declarator],
        },
        Span::DUMMY,
    );
    arena.connect(declaration);
    let decl_stmt = arena.alloc(
        NodeKind::DeclarationStatement { declaration },
        Span::DUMMY,
    );
    arena.connect(decl_stmt);

    // Expression reading: `(a < b) > c`
    let (a_expr, _) = id_expr(arena, interner, "a");
    let (b_expr, _) = id_expr(arena, interner, "b");
    let (c_expr, _) = id_expr(arena, interner, "c");
    let less = arena.alloc(
        NodeKind::Binary {
            op: BinaryOpKind::LessThan,
            lhs: a_expr,
            rhs: b_expr,
        },
        Span::DUMMY,
    );
    arena.connect(less);
    let greater = arena.alloc(
        NodeKind::Binary {
            op: BinaryOpKind::GreaterThan,
            lhs: less,
            rhs: c_expr,
        },
        Span::DUMMY,
    );
    arena.connect(greater);
    let expr_stmt = arena.alloc(NodeKind::ExpressionStatement { expr: greater }, Span::DUMMY);
    arena.connect(expr_stmt);

    let ambig = ambiguity(
        arena,
        AmbiguityKind::Statement,
        vec![decl_stmt, expr_stmt],
        None,
    );
    let block = arena.alloc(
        NodeKind::CompoundStatement {
            statements: vec![ambig],
        },
        Span::DUMMY,
    );
    arena.connect(block);
    (block, decl_stmt, expr_stmt, a_template)
}

#[test]
fn test_statement_is_a_declaration_when_name_is_a_template() {
    let interner = StringInterner::new();
    let mut arena = AstArena::new();
    let mut scope = SymbolTable::new();
    scope.declare_class_template(interner.intern("a"));
    scope.declare_type(interner.intern("b"));
    let (block, decl_stmt, _, a_template) = statement_fixture(&mut arena, &interner);

    let mut resolver = Resolver::new(&mut arena, &scope);
    resolver.resolve_tree(block).unwrap();

    match resolver.arena.kind(block) {
        NodeKind::CompoundStatement { statements } => {
            assert_eq!(statements, &vec![decl_stmt]);
        }
        other => panic!("expected compound statement, got {other:?}"),
    }
    // The template-id went through both phases during the final walk.
    let binding = resolver.binding(a_template).unwrap();
    assert_eq!(*binding.kind(), crate::BindingKind::Specialization);
}

#[test]
fn test_statement_is_an_expression_when_name_is_a_variable() {
    let interner = StringInterner::new();
    let mut arena = AstArena::new();
    let mut scope = SymbolTable::new();
    scope.declare_variable(interner.intern("a"));
    scope.declare_variable(interner.intern("b"));
    scope.declare_variable(interner.intern("c"));
    let (block, _, expr_stmt, a_template) = statement_fixture(&mut arena, &interner);

    let mut resolver = Resolver::new(&mut arena, &scope);
    resolver.resolve_tree(block).unwrap();

    match resolver.arena.kind(block) {
        NodeKind::CompoundStatement { statements } => {
            assert_eq!(statements, &vec![expr_stmt]);
        }
        other => panic!("expected compound statement, got {other:?}"),
    }
    assert!(resolver.binding(a_template).is_none());
}

#[test]
fn test_scope_failure_fails_only_the_alternative() {
    let interner = StringInterner::new();
    let mut arena = AstArena::new();
    let mut scope = SymbolTable::new();
    scope.declare_variable(interner.intern("v"));
    // The declaration reading's lookup of `X` blows up in the scope
    // collaborator; the expression reading never mentions it.
    scope.fail_on(interner.intern("X"));

    let (spec, _) = named_spec(&mut arena, &interner, "X");
    let (declarator, _) = named_declarator(&mut arena, &interner, "d");
    let declaration = arena.alloc(
        NodeKind::SimpleDeclaration {
            decl_spec: spec,
            declarators: vec![declarator],
        },
        Span::DUMMY,
    );
    arena.connect(declaration);
    let decl_stmt = arena.alloc(
        NodeKind::DeclarationStatement { declaration },
        Span::DUMMY,
    );
    arena.connect(decl_stmt);

    let (v_expr, _) = id_expr(&mut arena, &interner, "v");
    let expr_stmt = arena.alloc(NodeKind::ExpressionStatement { expr: v_expr }, Span::DUMMY);
    arena.connect(expr_stmt);

    let ambig = ambiguity(
        &mut arena,
        AmbiguityKind::Statement,
        vec![decl_stmt, expr_stmt],
        None,
    );
    let block = arena.alloc(
        NodeKind::CompoundStatement {
            statements: vec![ambig],
        },
        Span::DUMMY,
    );
    arena.connect(block);

    let mut resolver = Resolver::new(&mut arena, &scope);
    // The failure is confined to the trial: resolution succeeds and commits
    // the clean alternative.
    resolver.resolve_tree(block).unwrap();
    match resolver.arena.kind(block) {
        NodeKind::CompoundStatement { statements } => {
            assert_eq!(statements, &vec![expr_stmt]);
        }
        other => panic!("expected compound statement, got {other:?}"),
    }
}

#[test]
fn test_detached_ambiguity_is_an_error() {
    let interner = StringInterner::new();
    let mut arena = AstArena::new();
    let scope = SymbolTable::new();
    let (stmt, _) = id_expr(&mut arena, &interner, "x");
    let expr_stmt = arena.alloc(NodeKind::ExpressionStatement { expr: stmt }, Span::DUMMY);
    arena.connect(expr_stmt);
    let ambig = ambiguity(&mut arena, AmbiguityKind::Statement, vec![expr_stmt], None);

    let mut resolver = Resolver::new(&mut arena, &scope);
    let err = resolver.resolve_tree(ambig).unwrap_err();
    assert_eq!(err, ResolutionError::DetachedAmbiguity { node: ambig });
}

#[test]
fn test_all_alternatives_dirty_picks_fewest_problems() {
    let interner = StringInterner::new();
    let mut arena = AstArena::new();
    let scope = SymbolTable::new();

    // Both readings have unresolvable names; the expression reading has
    // fewer of them but declarations are still tried first.
    let (decl_stmt, expr_stmt) = {
        let (spec, _) = named_spec(&mut arena, &interner, "NoSuchType");
        let (declarator, _) = named_declarator(&mut arena, &interner, "d");
        let declaration = arena.alloc(
            NodeKind::SimpleDeclaration {
                decl_spec: spec,
                declarators: vec![declarator],
            },
            Span::DUMMY,
        );
        arena.connect(declaration);
        let decl_stmt = arena.alloc(
            NodeKind::DeclarationStatement { declaration },
            Span::DUMMY,
        );
        arena.connect(decl_stmt);

        let (e, _) = id_expr(&mut arena, &interner, "no_such_value");
        let expr_stmt = arena.alloc(NodeKind::ExpressionStatement { expr: e }, Span::DUMMY);
        arena.connect(expr_stmt);
        (decl_stmt, expr_stmt)
    };

    let ambig = ambiguity(
        &mut arena,
        AmbiguityKind::Statement,
        vec![decl_stmt, expr_stmt],
        None,
    );
    let block = arena.alloc(
        NodeKind::CompoundStatement {
            statements: vec![ambig],
        },
        Span::DUMMY,
    );
    arena.connect(block);

    let mut resolver = Resolver::new(&mut arena, &scope);
    resolver.resolve_tree(block).unwrap();

    // Declaration: one problem (the type). Expression: one problem too, so
    // the earlier-tried declaration wins the tie.
    match resolver.arena.kind(block) {
        NodeKind::CompoundStatement { statements } => {
            assert_eq!(statements, &vec![decl_stmt]);
        }
        other => panic!("expected compound statement, got {other:?}"),
    }
    assert_eq!(
        resolver
            .binding(find_spec_name(resolver.arena, decl_stmt))
            .and_then(|b| b.problem_kind()),
        Some(ProblemKind::NotFound)
    );
}

fn find_spec_name(arena: &AstArena, root: NodeId) -> NodeId {
    cxf_ast::collect_names(arena, root)[0]
}

/// [`SymbolTable`] wrapper observing the cache-warming hook.
struct RecordingScope {
    inner: SymbolTable,
    cache_warm: Cell<bool>,
    looked_up_cold: Cell<bool>,
}

impl LookupScope for RecordingScope {
    fn create_intermediate_binding(&self, query: LookupQuery) -> Result<Binding, LookupError> {
        if !self.cache_warm.get() {
            self.looked_up_cold.set(true);
        }
        self.inner.create_intermediate_binding(query)
    }

    fn finalize_binding(
        &self,
        intermediate: &Binding,
        context: Option<&InstantiationContext>,
    ) -> Result<Binding, LookupError> {
        self.inner.finalize_binding(intermediate, context)
    }

    fn populate_member_cache(&self) {
        self.inner.populate_member_cache();
        self.cache_warm.set(true);
    }
}

#[test]
fn test_member_cache_is_warmed_before_the_first_trial() {
    let interner = StringInterner::new();
    let mut arena = AstArena::new();
    let mut inner = SymbolTable::new();
    inner.declare_class_template(interner.intern("a"));
    inner.declare_type(interner.intern("b"));
    let scope = RecordingScope {
        inner,
        cache_warm: Cell::new(false),
        looked_up_cold: Cell::new(false),
    };
    let (block, decl_stmt, _, _) = statement_fixture(&mut arena, &interner);

    let mut resolver = Resolver::new(&mut arena, &scope);
    resolver.resolve_tree(block).unwrap();

    // No trial may look a name up against a cold scope.
    assert!(scope.cache_warm.get());
    assert!(!scope.looked_up_cold.get());
    match resolver.arena.kind(block) {
        NodeKind::CompoundStatement { statements } => {
            assert_eq!(statements, &vec![decl_stmt]);
        }
        other => panic!("expected compound statement, got {other:?}"),
    }
}

#[test]
fn test_ambiguity_without_alternatives_is_an_error() {
    let mut arena = AstArena::new();
    let scope = SymbolTable::new();

    let ambig = ambiguity(&mut arena, AmbiguityKind::Statement, Vec::new(), None);
    let block = arena.alloc(
        NodeKind::CompoundStatement {
            statements: vec![ambig],
        },
        Span::DUMMY,
    );
    arena.connect(block);

    let mut resolver = Resolver::new(&mut arena, &scope);
    let err = resolver.resolve_tree(block).unwrap_err();
    assert!(matches!(err, ResolutionError::UnexpectedNode { node, .. } if node == ambig));
}

#[test]
fn test_declarator_ambiguity_hands_pointer_operators_to_the_winner() {
    let interner = StringInterner::new();
    let mut arena = AstArena::new();
    let mut scope = SymbolTable::new();
    scope.declare_type(interner.intern("T"));

    let (func_decl, _) = function_declarator_with_param_type(&mut arena, &interner, "f", "T");
    let (plain, _) = named_declarator(&mut arena, &interner, "f2");

    // `*` parsed once after the ambiguous span.
    let ambig = arena.alloc(
        NodeKind::Ambiguity(AmbiguityData {
            kind: AmbiguityKind::Declarator,
            alternatives: vec![func_decl, plain],
            satellite: None,
            satellite_pointer_ops: vec![PointerOp::Pointer],
        }),
        Span::DUMMY,
    );
    arena.connect(ambig);
    let spec = arena.alloc(
        NodeKind::DeclSpecifier(DeclSpecKind::Builtin(BuiltinSpec::Int)),
        Span::DUMMY,
    );
    let decl = arena.alloc(
        NodeKind::SimpleDeclaration {
            decl_spec: spec,
            declarators: vec![ambig],
        },
        Span::DUMMY,
    );
    arena.connect(decl);

    let mut resolver = Resolver::new(&mut arena, &scope);
    resolver.resolve_tree(decl).unwrap();

    match resolver.arena.kind(decl) {
        NodeKind::SimpleDeclaration { declarators, .. } => {
            assert_eq!(declarators, &vec![plain]);
        }
        other => panic!("expected simple declaration, got {other:?}"),
    }
    match resolver.arena.kind(plain) {
        NodeKind::Declarator(d) => assert_eq!(d.pointer_ops, vec![PointerOp::Pointer]),
        other => panic!("expected declarator, got {other:?}"),
    }
}
