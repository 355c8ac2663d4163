//! Shared fixtures for unit tests.
#![allow(
    clippy::unwrap_used,
    reason = "fixtures panic on unexpected declaration failures"
)]

use ori_reflect::{SharedHost, SharedTypeTable, TypeId, TypeTable, Value};

/// `Animal { Speak(), Name, legs, Animal() }`, `Dog : Animal, IGreeter`,
/// `Cat : Animal`.
pub(crate) struct Farm {
    pub table: SharedTypeTable,
    pub animal: TypeId,
    pub dog: TypeId,
    pub cat: TypeId,
}

impl Farm {
    pub fn host(&self) -> SharedHost {
        self.table.host()
    }
}

pub(crate) fn farm() -> Farm {
    let mut table = TypeTable::new();
    let greeter = table.declare_interface("IGreeter").unwrap();
    let animal = table.declare_class("Animal", None).unwrap();
    let dog = table.declare_class("Dog", Some(animal)).unwrap();
    let cat = table.declare_class("Cat", Some(animal)).unwrap();
    table.implement(dog, greeter).unwrap();

    table.method(greeter, "Greet").returns(TypeId::STR).declare().unwrap();

    table
        .constructor(animal)
        .body(|this, _| {
            let this = this.and_then(Value::as_object).ok_or("no instance")?;
            this.set_field("legs", Value::Int(4));
            Ok(None)
        })
        .declare()
        .unwrap();
    table
        .method(animal, "Speak")
        .returns(TypeId::STR)
        .body(|_, _| Ok(Some(Value::string("..."))))
        .declare()
        .unwrap();
    table.property(animal, "Name", TypeId::STR).declare().unwrap();
    table.field(animal, "legs", TypeId::INT).declare().unwrap();

    table
        .constructor(dog)
        .param(TypeId::STR)
        .body(|this, args| {
            let this = this.and_then(Value::as_object).ok_or("no instance")?;
            this.set_field("<Name>k__BackingField", args[0].clone());
            this.set_field("legs", Value::Int(4));
            Ok(None)
        })
        .declare()
        .unwrap();
    table
        .method(dog, "Speak")
        .returns(TypeId::STR)
        .body(|_, _| Ok(Some(Value::string("Woof"))))
        .declare()
        .unwrap();
    table
        .method(dog, "Fetch")
        .param(TypeId::INT)
        .returns(TypeId::STR)
        .body(|_, args| {
            let n = args[0].as_int().ok_or("not an int")?;
            Ok(Some(Value::string(format!("fetched {n}"))))
        })
        .declare()
        .unwrap();
    table
        .method(dog, "Fetch")
        .param(TypeId::STR)
        .returns(TypeId::STR)
        .body(|_, args| {
            let what = args[0].as_str().unwrap_or("nothing");
            Ok(Some(Value::string(format!("fetched the {what}"))))
        })
        .declare()
        .unwrap();
    table
        .method(dog, "Scale")
        .param(TypeId::FLOAT)
        .returns(TypeId::FLOAT)
        .body(|_, args| {
            let x = args[0].as_float().ok_or("not a float")?;
            Ok(Some(Value::Float(x * 2.0)))
        })
        .declare()
        .unwrap();
    table
        .method(dog, "Describe")
        .param(TypeId::OBJECT)
        .returns(TypeId::STR)
        .body(|_, args| Ok(Some(Value::string(format!("{:?}", args[0])))))
        .declare()
        .unwrap();
    table
        .method(dog, "Increment")
        .param_ref(TypeId::INT)
        .body(|_, args| {
            let cell = args[0].as_cell().ok_or("not a cell")?;
            let n = cell.get().as_int().unwrap_or(0);
            cell.set(Value::Int(n + 1));
            Ok(None)
        })
        .declare()
        .unwrap();
    table
        .method(dog, "Count")
        .returns(TypeId::INT)
        .body(|_, _| Ok(None))
        .declare()
        .unwrap();
    table
        .method(dog, "Fail")
        .body(|_, _| Err("boom".to_owned()))
        .declare()
        .unwrap();
    table
        .explicit_method(dog, greeter, "Greet")
        .returns(TypeId::STR)
        .body(|_, _| Ok(Some(Value::string("Hello"))))
        .declare()
        .unwrap();
    table
        .method(dog, "TryParse")
        .param(TypeId::STR)
        .param_out(TypeId::INT)
        .returns(TypeId::BOOL)
        .as_static()
        .body(|_, args| {
            let out = args[1].as_cell().ok_or("not a cell")?;
            match args[0].as_str().and_then(|s| s.parse::<i64>().ok()) {
                Some(n) => {
                    out.set(Value::Int(n));
                    Ok(Some(Value::Bool(true)))
                }
                None => Ok(Some(Value::Bool(false))),
            }
        })
        .declare()
        .unwrap();
    table
        .field(dog, "count", TypeId::INT)
        .as_static()
        .declare()
        .unwrap();
    table
        .property(dog, "Level", TypeId::INT)
        .as_static()
        .declare()
        .unwrap();

    Farm {
        table: SharedTypeTable::new(table),
        animal,
        dog,
        cat,
    }
}
