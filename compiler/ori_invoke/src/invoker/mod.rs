//! Compiled invokers.
//!
//! An `Invoker` is bound to one member. Invocation validates arity, the
//! target and every argument, converts arguments to the declared parameter
//! types, runs the bound operation and converts the result to the declared
//! value type. Invokers are immutable and cheap to clone.

use std::fmt;
use std::sync::Arc;

use ori_reflect::{
    CellRef, MemberDescriptor, NativeFn, ParamType, PassBy, SharedHost, Signature,
    TypeId, Value,
};

use crate::errors::InvokeError;

/// The call path an invoker runs.
pub(crate) enum Operation {
    /// Method body or property accessor.
    Native(NativeFn),
    /// Constructor body, run against a freshly allocated instance.
    Construct(NativeFn),
    FieldGet(Arc<str>),
    FieldSet(Arc<str>),
    StaticGet(CellRef),
    StaticSet(CellRef),
}

impl Operation {
    fn needs_target(&self, member: &MemberDescriptor) -> bool {
        match self {
            Operation::Native(_) | Operation::FieldGet(_) | Operation::FieldSet(_) => {
                !member.is_static()
            }
            Operation::Construct(_) | Operation::StaticGet(_) | Operation::StaticSet(_) => false,
        }
    }
}

struct InvokerInner {
    member: MemberDescriptor,
    label: String,
    params: Signature,
    returns: TypeId,
    needs_target: bool,
    op: Operation,
    host: SharedHost,
}

/// A callable bound to one resolved member.
#[derive(Clone)]
pub struct Invoker(Arc<InvokerInner>);

impl Invoker {
    /// Bind `op` to `member`. `params` and `returns` describe the call as
    /// seen by callers, which differs from the member for field access.
    pub(crate) fn new(
        host: SharedHost,
        member: MemberDescriptor,
        op: Operation,
        params: Signature,
        returns: TypeId,
    ) -> Self {
        let label = member.display(&*host).to_string();
        let needs_target = op.needs_target(&member);
        Invoker(Arc::new(InvokerInner {
            member,
            label,
            params,
            returns,
            needs_target,
            op,
            host,
        }))
    }

    pub fn member(&self) -> &MemberDescriptor {
        &self.0.member
    }

    /// `Type::Member(params)`, as used in errors.
    pub fn label(&self) -> &str {
        &self.0.label
    }

    /// Number of arguments `invoke` expects.
    pub fn arity(&self) -> usize {
        self.0.params.len()
    }

    pub fn params(&self) -> &[ParamType] {
        &self.0.params
    }

    pub fn requires_target(&self) -> bool {
        self.0.needs_target
    }

    /// Whether both handles share one compiled call path.
    pub fn ptr_eq(&self, other: &Invoker) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Run the member.
    ///
    /// `target` is ignored by static members and constructors. Returns
    /// `Ok(None)` for members without a value.
    pub fn invoke(&self, target: Option<&Value>, args: &[Value]) -> Result<Option<Value>, InvokeError> {
        let inner = &*self.0;
        if args.len() != inner.params.len() {
            return Err(InvokeError::ArityMismatch {
                member: inner.label.clone(),
                expected: inner.params.len(),
                got: args.len(),
            });
        }

        let target = if inner.needs_target {
            Some(self.check_target(target)?)
        } else {
            None
        };

        let args = inner
            .params
            .iter()
            .zip(args)
            .enumerate()
            .map(|(index, (param, arg))| self.convert_arg(index, *param, arg))
            .collect::<Result<Vec<_>, _>>()?;

        let result = self.run(target, &args)?;
        Ok(self.convert_return(result))
    }

    /// Invoke a static member or constructor.
    pub fn call(&self, args: &[Value]) -> Result<Option<Value>, InvokeError> {
        self.invoke(None, args)
    }

    fn run(&self, target: Option<&Value>, args: &[Value]) -> Result<Option<Value>, InvokeError> {
        let inner = &*self.0;
        let failed = |message: String| InvokeError::Invocation {
            member: inner.label.clone(),
            message,
        };

        match &inner.op {
            Operation::Native(body) => body(target, args).map_err(failed),
            Operation::Construct(body) => {
                let instance = Value::object(inner.member.declaring());
                body(Some(&instance), args).map_err(failed)?;
                Ok(Some(instance))
            }
            Operation::FieldGet(name) => {
                let object = self.target_object(target)?;
                Ok(object.get_field(name))
            }
            Operation::FieldSet(name) => {
                let object = self.target_object(target)?;
                object.set_field(name, first(args));
                Ok(None)
            }
            Operation::StaticGet(cell) => Ok(Some(cell.get())),
            Operation::StaticSet(cell) => {
                cell.set(first(args));
                Ok(None)
            }
        }
    }

    fn check_target<'v>(&self, target: Option<&'v Value>) -> Result<&'v Value, InvokeError> {
        let inner = &*self.0;
        let target = target
            .filter(|t| !t.is_null())
            .ok_or_else(|| InvokeError::NullTarget {
                member: inner.label.clone(),
            })?;

        let ty = target.runtime_type();
        if !inner.host.is_assignable(inner.member.declaring(), ty) {
            return Err(InvokeError::TargetMismatch {
                member: inner.label.clone(),
                got: self.type_name(ty),
            });
        }
        Ok(target)
    }

    fn target_object<'v>(&self, target: Option<&'v Value>) -> Result<&'v ori_reflect::ObjectRef, InvokeError> {
        let target = target.ok_or_else(|| InvokeError::NullTarget {
            member: self.0.label.clone(),
        })?;
        target.as_object().ok_or_else(|| InvokeError::TargetMismatch {
            member: self.0.label.clone(),
            got: self.type_name(target.runtime_type()),
        })
    }

    /// Convert one argument to its declared parameter type.
    #[expect(clippy::cast_precision_loss, reason = "int to float widening is lossy by definition")]
    fn convert_arg(&self, index: usize, param: ParamType, arg: &Value) -> Result<Value, InvokeError> {
        let host = &self.0.host;
        let mismatch = || InvokeError::ArgumentType {
            member: self.0.label.clone(),
            index,
            expected: self.param_name(param),
            got: self.arg_name(arg),
        };

        match (param.pass, arg) {
            (PassBy::Out, Value::Cell(_)) => Ok(arg.clone()),
            (PassBy::Ref, Value::Cell(cell)) => {
                let held = cell.get();
                if held.is_null() || host.is_assignable(param.ty, held.runtime_type()) {
                    Ok(arg.clone())
                } else {
                    Err(mismatch())
                }
            }
            (PassBy::Ref | PassBy::Out, _) | (PassBy::Value, Value::Cell(_)) => Err(mismatch()),
            (PassBy::Value, Value::Int(n)) if param.ty == TypeId::FLOAT => Ok(Value::Float(*n as f64)),
            (PassBy::Value, _) => {
                if host.is_assignable(param.ty, arg.runtime_type()) {
                    Ok(arg.clone())
                } else {
                    Err(mismatch())
                }
            }
        }
    }

    #[expect(clippy::cast_precision_loss, reason = "int to float widening is lossy by definition")]
    fn convert_return(&self, result: Option<Value>) -> Option<Value> {
        let returns = self.0.returns;
        if returns == TypeId::VOID {
            return None;
        }
        match result {
            None => Some(Value::default_for(returns)),
            Some(Value::Int(n)) if returns == TypeId::FLOAT => Some(Value::Float(n as f64)),
            Some(value) => Some(value),
        }
    }

    fn type_name(&self, ty: TypeId) -> String {
        match self.0.host.type_name(ty) {
            Some(name) => name.to_owned(),
            None => format!("{ty:?}"),
        }
    }

    fn param_name(&self, param: ParamType) -> String {
        let name = self.type_name(param.ty);
        match param.pass {
            PassBy::Value => name,
            PassBy::Ref => format!("ref {name}"),
            PassBy::Out => format!("out {name}"),
        }
    }

    fn arg_name(&self, arg: &Value) -> String {
        match arg {
            Value::Cell(cell) => format!("ref {}", self.type_name(cell.get().runtime_type())),
            _ => self.type_name(arg.runtime_type()),
        }
    }
}

fn first(args: &[Value]) -> Value {
    args.first().cloned().unwrap_or(Value::Null)
}

impl fmt::Debug for Invoker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invoker({})", self.0.label)
    }
}
