//! Template parameter maps and instantiation contexts.

use crate::binding::Binding;
use crate::error::ResolutionError;
use cxf_ast::NodeId;
use rustc_hash::FxHashMap;
use std::rc::Rc;

/// Position of a template parameter: nesting level of its template
/// parameter list and index within that list. Two parameters with the same
/// key are the same parameter regardless of spelling.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct TemplateParameterKey {
    pub nesting: u16,
    pub position: u16,
}

impl TemplateParameterKey {
    pub fn new(nesting: u16, position: u16) -> Self {
        TemplateParameterKey { nesting, position }
    }
}

/// A single template argument.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum TemplateArgument {
    Type(Binding),
    NonType(i64),
}

/// Value bound to a template parameter: one argument, or the argument list
/// captured by a parameter pack.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ParameterValue {
    Single(TemplateArgument),
    Pack(Rc<[TemplateArgument]>),
}

impl ParameterValue {
    pub fn pack_len(&self) -> Option<usize> {
        match self {
            ParameterValue::Single(_) => None,
            ParameterValue::Pack(args) => Some(args.len()),
        }
    }
}

/// Mapping from template parameters to the arguments of an instantiation.
///
/// A pack's arity is fixed by its first binding; rebinding a pack with a
/// different number of arguments is a contract violation.
#[derive(Clone, Default, Debug)]
pub struct TemplateParameterMap {
    values: FxHashMap<TemplateParameterKey, ParameterValue>,
}

impl TemplateParameterMap {
    pub fn new() -> Self {
        TemplateParameterMap::default()
    }

    pub fn lookup(&self, key: TemplateParameterKey) -> Option<&ParameterValue> {
        self.values.get(&key)
    }

    pub fn bind_single(
        &mut self,
        key: TemplateParameterKey,
        arg: TemplateArgument,
    ) -> Result<(), ResolutionError> {
        self.bind(key, ParameterValue::Single(arg))
    }

    pub fn bind_pack(
        &mut self,
        key: TemplateParameterKey,
        args: Vec<TemplateArgument>,
    ) -> Result<(), ResolutionError> {
        self.bind(key, ParameterValue::Pack(args.into()))
    }

    fn bind(
        &mut self,
        key: TemplateParameterKey,
        value: ParameterValue,
    ) -> Result<(), ResolutionError> {
        if let (Some(fixed), Some(offered)) = (
            self.values.get(&key).and_then(ParameterValue::pack_len),
            value.pack_len(),
        ) {
            if fixed != offered {
                return Err(ResolutionError::PackArityChanged { fixed, offered });
            }
        }
        self.values.insert(key, value);
        Ok(())
    }
}

#[derive(Clone, Debug)]
struct ContextData {
    parameter_map: TemplateParameterMap,
    /// Index into packs while expanding a pack element; `None` outside an
    /// expansion.
    pack_offset: Option<usize>,
    /// When false, lookups bypass explicit specializations (used while
    /// matching partial specializations against themselves).
    expand_specializations: bool,
    /// Name node at which deferred lookups are performed.
    lookup_point: Option<NodeId>,
}

/// Immutable instantiation context. Cheap to clone; the `with_*`
/// constructors copy-on-write a new context sharing the parameter map.
#[derive(Clone, Debug)]
pub struct InstantiationContext(Rc<ContextData>);

impl InstantiationContext {
    pub fn new(parameter_map: TemplateParameterMap) -> Self {
        InstantiationContext(Rc::new(ContextData {
            parameter_map,
            pack_offset: None,
            expand_specializations: true,
            lookup_point: None,
        }))
    }

    pub fn parameter_map(&self) -> &TemplateParameterMap {
        &self.0.parameter_map
    }

    pub fn pack_offset(&self) -> Option<usize> {
        self.0.pack_offset
    }

    pub fn expands_specializations(&self) -> bool {
        self.0.expand_specializations
    }

    pub fn lookup_point(&self) -> Option<NodeId> {
        self.0.lookup_point
    }

    /// Argument for `key`, resolving pack elements through the current pack
    /// offset.
    pub fn argument(&self, key: TemplateParameterKey) -> Option<&TemplateArgument> {
        match self.0.parameter_map.lookup(key)? {
            ParameterValue::Single(arg) => Some(arg),
            ParameterValue::Pack(args) => args.get(self.0.pack_offset?),
        }
    }

    pub fn with_pack_offset(&self, offset: usize) -> Self {
        let mut data = (*self.0).clone();
        data.pack_offset = Some(offset);
        InstantiationContext(Rc::new(data))
    }

    pub fn without_specializations(&self) -> Self {
        let mut data = (*self.0).clone();
        data.expand_specializations = false;
        InstantiationContext(Rc::new(data))
    }

    pub fn with_lookup_point(&self, point: NodeId) -> Self {
        let mut data = (*self.0).clone();
        data.lookup_point = Some(point);
        InstantiationContext(Rc::new(data))
    }
}
