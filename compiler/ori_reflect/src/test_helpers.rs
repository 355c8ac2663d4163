//! Shared fixtures for unit tests.
#![allow(
    clippy::unwrap_used,
    reason = "fixtures panic on unexpected declaration failures"
)]

use crate::{TypeId, TypeTable, Value};

/// `Animal { Speak() }` and `Dog : Animal { Fetch(int) }`.
pub(crate) struct Animals {
    pub table: TypeTable,
    pub animal: TypeId,
    pub dog: TypeId,
}

pub(crate) fn animals() -> Animals {
    let mut table = TypeTable::new();
    let animal = table.declare_class("Animal", None).unwrap();
    let dog = table.declare_class("Dog", Some(animal)).unwrap();

    table
        .method(animal, "Speak")
        .returns(TypeId::STR)
        .body(|_, _| Ok(Some(Value::string("..."))))
        .declare()
        .unwrap();
    table
        .method(dog, "Fetch")
        .param(TypeId::INT)
        .returns(TypeId::STR)
        .body(|_, args| Ok(Some(Value::string(format!("fetched {:?}", args[0])))))
        .declare()
        .unwrap();

    Animals { table, animal, dog }
}

/// A richer hierarchy: `IGreeter`, `Animal`, `Dog : Animal, IGreeter`,
/// `Puppy : Dog`.
///
/// Declaration order (what unfiltered lookups return):
/// - `Animal`: `Speak()`, `Rest(int)` (non-public), property `Name`
///   (+ `<Name>k__BackingField`, `get_Name`, `set_Name`)
/// - `Dog`: `Fetch(int)`, `Fetch(str)`, `IGreeter.Greet()` (explicit),
///   static `TryParse(str, out int)`, static field `count`
/// - `Puppy`: `Speak()` (override), `GetValue()`, `TryGetValue(ref int)`,
///   `BudgetReport()`
pub(crate) struct Zoo {
    pub table: TypeTable,
    pub greeter: TypeId,
    pub animal: TypeId,
    pub dog: TypeId,
    pub puppy: TypeId,
}

pub(crate) fn zoo() -> Zoo {
    let mut table = TypeTable::new();
    let greeter = table.declare_interface("IGreeter").unwrap();
    let animal = table.declare_class("Animal", None).unwrap();
    let dog = table.declare_class("Dog", Some(animal)).unwrap();
    let puppy = table.declare_class("Puppy", Some(dog)).unwrap();
    table.implement(dog, greeter).unwrap();

    table
        .method(greeter, "Greet")
        .returns(TypeId::STR)
        .declare()
        .unwrap();

    table
        .method(animal, "Speak")
        .returns(TypeId::STR)
        .body(|_, _| Ok(Some(Value::string("..."))))
        .declare()
        .unwrap();
    table
        .method(animal, "Rest")
        .param(TypeId::INT)
        .non_public()
        .body(|_, _| Ok(None))
        .declare()
        .unwrap();
    table
        .property(animal, "Name", TypeId::STR)
        .declare()
        .unwrap();

    table
        .method(dog, "Fetch")
        .param(TypeId::INT)
        .returns(TypeId::STR)
        .body(|_, _| Ok(Some(Value::string("int"))))
        .declare()
        .unwrap();
    table
        .method(dog, "Fetch")
        .param(TypeId::STR)
        .returns(TypeId::STR)
        .body(|_, _| Ok(Some(Value::string("str"))))
        .declare()
        .unwrap();
    table
        .explicit_method(dog, greeter, "Greet")
        .returns(TypeId::STR)
        .body(|_, _| Ok(Some(Value::string("Woof"))))
        .declare()
        .unwrap();
    table
        .method(dog, "TryParse")
        .param(TypeId::STR)
        .param_out(TypeId::INT)
        .returns(TypeId::BOOL)
        .as_static()
        .body(|_, _| Ok(Some(Value::Bool(true))))
        .declare()
        .unwrap();
    table
        .field(dog, "count", TypeId::INT)
        .as_static()
        .declare()
        .unwrap();

    table
        .method(puppy, "Speak")
        .returns(TypeId::STR)
        .body(|_, _| Ok(Some(Value::string("Yip"))))
        .declare()
        .unwrap();
    table
        .method(puppy, "GetValue")
        .returns(TypeId::INT)
        .body(|_, _| Ok(Some(Value::Int(1))))
        .declare()
        .unwrap();
    table
        .method(puppy, "TryGetValue")
        .param_ref(TypeId::INT)
        .returns(TypeId::BOOL)
        .body(|_, _| Ok(Some(Value::Bool(true))))
        .declare()
        .unwrap();
    table
        .method(puppy, "BudgetReport")
        .body(|_, _| Ok(None))
        .declare()
        .unwrap();

    Zoo {
        table,
        greeter,
        animal,
        dog,
        puppy,
    }
}

/// Names of members, in order.
pub(crate) fn names(members: &[crate::MemberDescriptor]) -> Vec<&str> {
    members.iter().map(crate::MemberDescriptor::name).collect()
}
