//! Fixtures shared by the integration tests.
#![allow(
    clippy::unwrap_used,
    reason = "fixtures panic on unexpected declaration failures"
)]
#![allow(dead_code, reason = "not every test binary uses every fixture")]

use ori_reflect::{SharedTypeTable, TypeId, TypeTable, Value};

pub struct Animals {
    pub table: SharedTypeTable,
    pub animal: TypeId,
    pub dog: TypeId,
}

/// `Animal { Speak() }`, `Dog : Animal { Fetch(int), BudgetReport() }`.
pub fn animals() -> Animals {
    ori_invoke::init_tracing();

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
        .returns(TypeId::INT)
        .body(|_, args| {
            let n = args[0].as_int().ok_or("expected an int")?;
            Ok(Some(Value::Int(n * 2)))
        })
        .declare()
        .unwrap();

    Animals {
        table: SharedTypeTable::new(table),
        animal,
        dog,
    }
}

/// A wide class with `count` methods `M0(int)..`, each returning its
/// index plus the argument.
pub fn wide(count: usize) -> (SharedTypeTable, TypeId) {
    ori_invoke::init_tracing();

    let mut table = TypeTable::new();
    let ty = table.declare_class("Wide", None).unwrap();
    for index in 0..count {
        let offset = i64::try_from(index).unwrap();
        table
            .method(ty, &format!("M{index}"))
            .param(TypeId::INT)
            .returns(TypeId::INT)
            .body(move |_, args| Ok(Some(Value::Int(offset + args[0].as_int().unwrap_or(0)))))
            .declare()
            .unwrap();
    }
    (SharedTypeTable::new(table), ty)
}
