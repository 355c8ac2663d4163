#![allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]

use super::*;
use crate::test_helpers::{names, zoo};
use pretty_assertions::assert_eq;

#[test]
fn builtins_are_predeclared() {
    let table = TypeTable::new();
    assert_eq!(table.lookup("object"), Some(TypeId::OBJECT));
    assert_eq!(table.lookup("int"), Some(TypeId::INT));
    assert_eq!(table.lookup("str"), Some(TypeId::STR));
    assert_eq!(table.type_name(TypeId::FLOAT), Some("float"));
    assert_eq!(table.category(TypeId::BOOL), Some(TypeCategory::Builtin));
    assert_eq!(table.base_of(TypeId::OBJECT), None);
    assert_eq!(table.base_of(TypeId::INT), Some(TypeId::OBJECT));
    assert!(table.is_root(TypeId::OBJECT));
}

#[test]
fn classes_default_to_root_base() {
    let mut table = TypeTable::new();
    let animal = table.declare_class("Animal", None).unwrap();
    let dog = table.declare_class("Dog", Some(animal)).unwrap();

    assert_eq!(animal.raw(), TypeId::FIRST_DECLARED);
    assert_eq!(table.base_of(animal), Some(TypeId::OBJECT));
    assert_eq!(table.base_of(dog), Some(animal));
    assert_eq!(table.category(dog), Some(TypeCategory::Class));
}

#[test]
fn declaration_errors() {
    let mut table = TypeTable::new();
    let animal = table.declare_class("Animal", None).unwrap();
    let greeter = table.declare_interface("IGreeter").unwrap();

    assert_eq!(
        table.declare_class("Animal", None),
        Err(DeclareError::DuplicateType("Animal".into()))
    );
    assert_eq!(
        table.declare_class("Ghost", Some(TypeId::from_raw(500))),
        Err(DeclareError::UnknownType(TypeId::from_raw(500)))
    );
    assert_eq!(
        table.declare_class("Robot", Some(greeter)),
        Err(DeclareError::InvalidBase("IGreeter".into()))
    );
    assert_eq!(
        table.implement(animal, animal),
        Err(DeclareError::NotAnInterface("Animal".into()))
    );
    assert_eq!(
        table.method(animal, "Speak").declare(),
        Err(DeclareError::MissingBody("Speak".into()))
    );

    table.method(animal, "Speak").body(|_, _| Ok(None)).declare().unwrap();
    assert_eq!(
        table.method(animal, "Speak").body(|_, _| Ok(None)).declare(),
        Err(DeclareError::DuplicateMember {
            type_name: "Animal".into(),
            member: "Speak".into(),
        })
    );
    // Overload with another signature is fine.
    table
        .method(animal, "Speak")
        .param(TypeId::INT)
        .body(|_, _| Ok(None))
        .declare()
        .unwrap();

    assert_eq!(
        table.method(TypeId::from_raw(500), "Speak").declare(),
        Err(DeclareError::UnknownType(TypeId::from_raw(500)))
    );
}

#[test]
fn interface_methods_need_no_body() {
    let mut table = TypeTable::new();
    let greeter = table.declare_interface("IGreeter").unwrap();
    let greet = table.method(greeter, "Greet").declare().unwrap();
    assert_eq!(table.bind(&greet).map(|_| ()), None);
}

#[test]
fn property_synthesizes_backing_members() {
    let zoo = zoo();
    let members = zoo.table.declared_members(zoo.animal, Visibility::all());
    assert_eq!(
        names(&members),
        vec!["Speak", "Rest", "Name", "<Name>k__BackingField", "get_Name", "set_Name"]
    );

    let name = &members[2];
    assert_eq!(name.kind(), MemberKind::Property);
    assert!(!name.is_backing());

    let field = &members[3];
    assert_eq!(field.kind(), MemberKind::Field);
    assert!(field.is_backing());
    assert_eq!(field.visibility(), Visibility::NON_PUBLIC | Visibility::INSTANCE);

    let setter = &members[5];
    assert!(setter.is_backing());
    assert_eq!(setter.params(), &[ParamType::of(TypeId::STR)]);
}

#[test]
fn property_accessors_use_backing_slot() {
    let zoo = zoo();
    let members = zoo.table.declared_members(zoo.animal, Visibility::all());
    let getter = zoo.table.bind(&members[4]).unwrap();
    let setter = zoo.table.bind(&members[5]).unwrap();

    let rex = Value::object(zoo.animal);
    assert_eq!(getter(Some(&rex), &[]), Ok(Some(Value::Null)));
    assert_eq!(setter(Some(&rex), &[Value::string("Rex")]), Ok(None));
    assert_eq!(getter(Some(&rex), &[]), Ok(Some(Value::string("Rex"))));
    assert_eq!(
        rex.as_object().unwrap().get_field("<Name>k__BackingField"),
        Some(Value::string("Rex"))
    );
    assert!(getter(None, &[]).is_err());
}

#[test]
fn static_property_and_field_slots() {
    let mut table = TypeTable::new();
    let config = table.declare_class("Config", None).unwrap();
    table
        .property(config, "Level", TypeId::INT)
        .as_static()
        .declare()
        .unwrap();
    table
        .field(config, "limit", TypeId::FLOAT)
        .as_static()
        .declare()
        .unwrap();

    let limit = table.static_slot(config, "limit").unwrap();
    assert_eq!(limit.get(), Value::Float(0.0));

    let members = table.declared_members(config, Visibility::all());
    let getter = table.bind(&members[2]).unwrap();
    let setter = table.bind(&members[3]).unwrap();
    assert_eq!(getter(None, &[]), Ok(Some(Value::Int(0))));
    setter(None, &[Value::Int(4)]).unwrap();
    assert_eq!(getter(None, &[]), Ok(Some(Value::Int(4))));
    assert_eq!(
        table
            .static_slot(config, "<Level>k__BackingField")
            .map(|cell| cell.get()),
        Some(Value::Int(4))
    );
    assert!(table.static_slot(config, "missing").is_none());
}

#[test]
fn explicit_interface_members_are_qualified() {
    let zoo = zoo();
    let members = zoo.table.declared_members(zoo.dog, Visibility::all());
    let greet = members
        .iter()
        .find(|m| m.is_explicit_interface())
        .unwrap();
    assert_eq!(greet.name(), "IGreeter.Greet");
    assert_eq!(greet.simple_name(), "Greet");
    assert_eq!(zoo.table.interfaces_of(zoo.dog), &[zoo.greeter]);
}

#[test]
fn explicit_method_requires_interface() {
    let mut table = TypeTable::new();
    let animal = table.declare_class("Animal", None).unwrap();
    let dog = table.declare_class("Dog", Some(animal)).unwrap();
    assert_eq!(
        table
            .explicit_method(dog, animal, "Speak")
            .body(|_, _| Ok(None))
            .declare(),
        Err(DeclareError::NotAnInterface("Animal".into()))
    );
}

#[test]
fn visibility_mask_filters_declared_members() {
    let zoo = zoo();
    let public_instance = zoo
        .table
        .declared_members(zoo.dog, Visibility::PUBLIC | Visibility::INSTANCE);
    assert_eq!(names(&public_instance), vec!["Fetch", "Fetch", "IGreeter.Greet"]);

    let statics = zoo
        .table
        .declared_members(zoo.dog, Visibility::ACCESS | Visibility::STATIC);
    assert_eq!(names(&statics), vec!["TryParse", "count"]);

    let non_public = zoo
        .table
        .declared_members(zoo.animal, Visibility::NON_PUBLIC | Visibility::BINDING);
    assert_eq!(names(&non_public), vec!["Rest", "<Name>k__BackingField"]);

    assert!(zoo
        .table
        .declared_members(TypeId::from_raw(999), Visibility::all())
        .is_empty());
}

#[test]
fn assignability() {
    let zoo = zoo();
    let t = &zoo.table;

    assert!(t.is_assignable(zoo.dog, zoo.dog));
    assert!(t.is_assignable(zoo.animal, zoo.puppy));
    assert!(!t.is_assignable(zoo.puppy, zoo.animal));
    assert!(t.is_assignable(zoo.greeter, zoo.dog));
    assert!(t.is_assignable(zoo.greeter, zoo.puppy));
    assert!(!t.is_assignable(zoo.greeter, zoo.animal));

    assert!(t.is_assignable(TypeId::OBJECT, TypeId::INT));
    assert!(t.is_assignable(TypeId::OBJECT, zoo.greeter));
    assert!(t.is_assignable(TypeId::FLOAT, TypeId::INT));
    assert!(!t.is_assignable(TypeId::INT, TypeId::FLOAT));
    assert!(!t.is_assignable(TypeId::STR, TypeId::INT));

    assert!(t.is_assignable(zoo.dog, TypeId::NULL));
    assert!(t.is_assignable(TypeId::STR, TypeId::NULL));
    assert!(!t.is_assignable(TypeId::INT, TypeId::NULL));
}

#[test]
fn bind_finds_exact_overload_body() {
    let zoo = zoo();
    let members = zoo.table.declared_members(zoo.dog, Visibility::all());
    let by_str = zoo.table.bind(&members[1]).unwrap();
    assert_eq!(by_str(None, &[]), Ok(Some(Value::string("str"))));

    let field = members.iter().find(|m| m.name() == "count").unwrap();
    assert!(zoo.table.bind(field).is_none());
}

#[test]
fn constructors_are_named_after_their_type() {
    let mut table = TypeTable::new();
    let point = table.declare_class("Point", None).unwrap();
    let ctor = table
        .constructor(point)
        .param(TypeId::INT)
        .body(|_, _| Ok(None))
        .declare()
        .unwrap();
    assert_eq!(ctor.name(), "Point");
    assert_eq!(ctor.kind(), MemberKind::Constructor);
    assert_eq!(ctor.value_type(), point);
}

#[test]
fn interface_extension_cycles_are_rejected() {
    let mut table = TypeTable::new();
    let readable = table.declare_interface("IReadable").unwrap();
    let stream = table.declare_interface("IStream").unwrap();
    let source = table.declare_interface("ISource").unwrap();

    assert_eq!(
        table.implement(readable, readable),
        Err(DeclareError::CyclicInterface {
            ty: "IReadable".into(),
            interface: "IReadable".into(),
        })
    );

    table.implement(stream, readable).unwrap();
    table.implement(source, stream).unwrap();
    assert_eq!(
        table.implement(readable, source),
        Err(DeclareError::CyclicInterface {
            ty: "IReadable".into(),
            interface: "ISource".into(),
        })
    );
    assert!(table.interfaces_of(readable).is_empty());
}

#[test]
fn failed_assignability_terminates_on_shared_interfaces() {
    let mut table = TypeTable::new();
    let base = table.declare_interface("IBase").unwrap();
    let left = table.declare_interface("ILeft").unwrap();
    let right = table.declare_interface("IRight").unwrap();
    let unrelated = table.declare_interface("IUnrelated").unwrap();
    let both = table.declare_class("Both", None).unwrap();
    table.implement(left, base).unwrap();
    table.implement(right, base).unwrap();
    table.implement(both, left).unwrap();
    table.implement(both, right).unwrap();

    assert!(table.is_assignable(base, both));
    assert!(!table.is_assignable(unrelated, both));
    assert!(!table.is_assignable(left, right));
}

#[test]
fn colliding_property_leaves_table_unchanged() {
    let mut table = TypeTable::new();
    let config = table.declare_class("Config", None).unwrap();
    table
        .method(config, "get_Name")
        .returns(TypeId::STR)
        .body(|_, _| Ok(None))
        .declare()
        .unwrap();

    assert_eq!(
        table.property(config, "Name", TypeId::STR).declare(),
        Err(DeclareError::DuplicateMember {
            type_name: "Config".into(),
            member: "get_Name".into(),
        })
    );
    let members = table.declared_members(config, Visibility::all());
    assert_eq!(names(&members), vec!["get_Name"]);
}

#[test]
fn colliding_static_property_keeps_existing_slot() {
    let mut table = TypeTable::new();
    let config = table.declare_class("Config", None).unwrap();
    table
        .property(config, "Level", TypeId::INT)
        .as_static()
        .declare()
        .unwrap();
    let slot = table.static_slot(config, "<Level>k__BackingField").unwrap();
    slot.set(Value::Int(7));

    assert!(matches!(
        table.property(config, "Level", TypeId::INT).as_static().declare(),
        Err(DeclareError::DuplicateMember { .. })
    ));
    assert_eq!(
        table
            .static_slot(config, "<Level>k__BackingField")
            .map(|cell| cell.get()),
        Some(Value::Int(7))
    );
    assert_eq!(table.declared_members(config, Visibility::all()).len(), 4);
}

#[cfg(target_pointer_width = "64")]
#[test]
fn type_ids_past_u32_are_reported() {
    assert_eq!(type_id_at(7), Ok(TypeId::from_raw(7)));
    assert_eq!(type_id_at(usize::MAX), Err(DeclareError::TooManyTypes));
}
