//! `Reflector`: resolution and cached invocation over one host.

use std::sync::Arc;

use ori_reflect::{
    DispatchHost, LookupCriteria, MemberDescriptor, MemberKind, ParamMatch, ParamType, Resolver,
    SharedHost, TypeId, Value, Visibility,
};

use crate::cache::InvokerCache;
use crate::compiler::compile;
use crate::errors::InvokeError;
use crate::invoker::Invoker;
use crate::shape::{Access, Binding, InvokerShape};

/// Lookup and invocation facade.
///
/// Cloning is cheap; clones share the host and the invoker cache.
#[derive(Clone)]
pub struct Reflector {
    host: SharedHost,
    cache: Arc<InvokerCache>,
    criteria: LookupCriteria,
}

impl Reflector {
    /// A reflector with its own empty cache and default criteria.
    pub fn new(host: SharedHost) -> Self {
        let cache = InvokerCache::new();
        // A fresh cache has no owner yet.
        let _ = cache.attach(&host);
        Reflector {
            host,
            cache: Arc::new(cache),
            criteria: LookupCriteria::default(),
        }
    }

    pub fn builder(host: SharedHost) -> ReflectorBuilder {
        ReflectorBuilder::new(host)
    }

    pub fn host(&self) -> &SharedHost {
        &self.host
    }

    pub fn cache(&self) -> &Arc<InvokerCache> {
        &self.cache
    }

    /// Criteria used by [`find`](Self::find) and [`members`](Self::members).
    pub fn criteria(&self) -> &LookupCriteria {
        &self.criteria
    }

    fn resolver(&self) -> Resolver<'_, dyn DispatchHost + Send + Sync> {
        Resolver::new(&*self.host)
    }

    pub fn resolve_one(
        &self,
        ty: TypeId,
        name: &str,
        params: Option<&[ParamType]>,
        criteria: &LookupCriteria,
    ) -> Option<MemberDescriptor> {
        self.resolver().resolve_one(ty, name, params, criteria)
    }

    pub fn resolve_many(
        &self,
        ty: TypeId,
        params: Option<&[ParamType]>,
        criteria: &LookupCriteria,
        names: &[&str],
    ) -> Vec<MemberDescriptor> {
        self.resolver().resolve_many(ty, params, criteria, names)
    }

    /// `name` on `ty` under the default criteria.
    pub fn find(&self, ty: TypeId, name: &str) -> Option<MemberDescriptor> {
        self.resolve_one(ty, name, None, &self.criteria)
    }

    /// Every member of `ty` under the default criteria.
    pub fn members(&self, ty: TypeId) -> Vec<MemberDescriptor> {
        self.resolve_many(ty, None, &self.criteria, &[])
    }

    /// The cached invoker for `shape`, compiling it on first use.
    pub fn invoker(&self, shape: &InvokerShape) -> Result<Invoker, InvokeError> {
        self.cache
            .get_or_build(shape, |shape| compile(&self.host, shape))
    }

    pub fn invoke(
        &self,
        shape: &InvokerShape,
        target: Option<&Value>,
        args: &[Value],
    ) -> Result<Option<Value>, InvokeError> {
        self.invoker(shape)?.invoke(target, args)
    }

    /// Call instance method `name` on `target`, chosen by the runtime types
    /// of the arguments.
    pub fn call_method(&self, target: &Value, name: &str, args: &[Value]) -> Result<Option<Value>, InvokeError> {
        if target.is_null() {
            return Err(InvokeError::NullTarget {
                member: name.to_owned(),
            });
        }
        let shape = self.shape_for_args(target.runtime_type(), name, Binding::Instance, args)?;
        self.invoke(&shape, Some(target), args)
    }

    /// Call static method `name` of `ty`.
    pub fn call_static(&self, ty: TypeId, name: &str, args: &[Value]) -> Result<Option<Value>, InvokeError> {
        let shape = self.shape_for_args(ty, name, Binding::Static, args)?;
        self.invoke(&shape, None, args)
    }

    /// Construct an instance of `ty` with the constructor accepting `args`.
    pub fn construct(&self, ty: TypeId, args: &[Value]) -> Result<Value, InvokeError> {
        let provided = arg_types(args);
        let criteria = call_criteria(Binding::Instance).declared_only();
        let ctor = self
            .resolve_many(ty, Some(&provided), &criteria, &[])
            .into_iter()
            .find(|m| m.kind() == MemberKind::Constructor)
            .ok_or_else(|| self.not_found(InvokerShape::constructor(ty).with_params(provided)))?;

        let shape = InvokerShape::for_member(&ctor, Access::Construct);
        let instance = self.invoke(&shape, None, args)?;
        Ok(instance.unwrap_or(Value::Null))
    }

    /// Read field or property `name` of `target`.
    pub fn get_member(&self, target: &Value, name: &str) -> Result<Value, InvokeError> {
        let shape = InvokerShape::getter(target.runtime_type(), name, Binding::Instance);
        Ok(self.invoke(&shape, Some(target), &[])?.unwrap_or(Value::Null))
    }

    /// Write field or property `name` of `target`.
    pub fn set_member(&self, target: &Value, name: &str, value: Value) -> Result<(), InvokeError> {
        let shape = InvokerShape::setter(target.runtime_type(), name, Binding::Instance);
        self.invoke(&shape, Some(target), &[value]).map(drop)
    }

    /// Read static field or property `name` of `ty`.
    pub fn get_static(&self, ty: TypeId, name: &str) -> Result<Value, InvokeError> {
        let shape = InvokerShape::getter(ty, name, Binding::Static);
        Ok(self.invoke(&shape, None, &[])?.unwrap_or(Value::Null))
    }

    /// Write static field or property `name` of `ty`.
    pub fn set_static(&self, ty: TypeId, name: &str, value: Value) -> Result<(), InvokeError> {
        let shape = InvokerShape::setter(ty, name, Binding::Static);
        self.invoke(&shape, None, &[value]).map(drop)
    }

    /// Resolve a method assignment-compatibly from argument values and
    /// return the exact shape binding it.
    fn shape_for_args(
        &self,
        ty: TypeId,
        name: &str,
        binding: Binding,
        args: &[Value],
    ) -> Result<InvokerShape, InvokeError> {
        let provided = arg_types(args);
        let criteria = call_criteria(binding);
        let method = self
            .resolve_many(ty, Some(&provided), &criteria, &[name])
            .into_iter()
            .find(|m| m.kind() == MemberKind::Method)
            .ok_or_else(|| {
                let shape = match binding {
                    Binding::Static => InvokerShape::static_method(ty, name),
                    Binding::Instance => InvokerShape::method(ty, name),
                };
                self.not_found(shape.with_params(provided.iter().copied()))
            })?;
        Ok(InvokerShape::for_member(&method, Access::Call))
    }

    fn not_found(&self, shape: InvokerShape) -> InvokeError {
        InvokeError::MemberNotFound {
            shape: shape.display(&*self.host).to_string(),
        }
    }
}

/// Runtime parameter types of `args`. Cells stand for by-ref arguments.
fn arg_types(args: &[Value]) -> Vec<ParamType> {
    args.iter().map(Value::param_type).collect()
}

/// Assignment-compatible, modifier-insensitive lookup over every access
/// level with the given binding.
fn call_criteria(binding: Binding) -> LookupCriteria {
    LookupCriteria::new()
        .visibility(Visibility::ACCESS | binding.visibility())
        .param_match(ParamMatch::IGNORE_MODIFIERS)
}

/// Builder for [`Reflector`].
#[must_use = "call `build()` to get a Reflector"]
pub struct ReflectorBuilder {
    host: SharedHost,
    cache: Option<Arc<InvokerCache>>,
    criteria: LookupCriteria,
}

impl ReflectorBuilder {
    pub fn new(host: SharedHost) -> Self {
        ReflectorBuilder {
            host,
            cache: None,
            criteria: LookupCriteria::default(),
        }
    }

    /// Share an existing cache instead of creating one. The cache must
    /// serve this builder's host only.
    pub fn cache(mut self, cache: Arc<InvokerCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Default criteria for `find` and `members`.
    pub fn criteria(mut self, criteria: LookupCriteria) -> Self {
        self.criteria = criteria;
        self
    }

    /// Fails with [`InvokeError::ForeignCache`] when the shared cache
    /// already serves another host.
    pub fn build(self) -> Result<Reflector, InvokeError> {
        let cache = self.cache.unwrap_or_default();
        cache.attach(&self.host)?;
        Ok(Reflector {
            host: self.host,
            cache,
            criteria: self.criteria,
        })
    }
}
