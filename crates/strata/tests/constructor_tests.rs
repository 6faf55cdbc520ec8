//! Constructor protocol tests
//!
//! Default constructors forward `(instance, args)` unchanged to the base;
//! overriding constructors chain to their base explicitly.

use std::sync::{Arc, Mutex};
use strata::{ClassFactory, Instance, ObjectError, Value};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

/// Root constructor storing its arguments as fields on the receiver
fn recording_ctor() -> Value {
    Value::function("ctor", |args| {
        let this = args[0].as_instance().expect("receiver is an instance");
        this.set("argc", Value::Int(args.len() as i64 - 1))?;
        for (i, arg) in args[1..].iter().enumerate() {
            this.set(&format!("arg{}", i), arg.clone())?;
        }
        Ok(Value::Nil)
    })
}

#[test]
fn test_three_level_default_chaining() {
    init_tracing();
    let factory = ClassFactory::new();
    let a = factory.create("A", None).unwrap();
    a.define([Value::map([("__ctor", recording_ctor())])]).unwrap();
    let b = factory.create("B", Some(&a)).unwrap();
    let c = factory.create("C", Some(&b)).unwrap();

    let inst = c.construct(&[Value::Int(1), Value::from("two")]).unwrap();

    // The root constructor saw the C instance itself, plus the original arguments
    assert_eq!(inst.class(), &c);
    assert_eq!(inst.get_own("argc"), Some(Value::Int(2)));
    assert_eq!(inst.get_own("arg0"), Some(Value::Int(1)));
    assert_eq!(inst.get_own("arg1"), Some(Value::from("two")));
}

#[test]
fn test_root_without_ctor_does_nothing() {
    let factory = ClassFactory::new();
    let a = factory.create("A", None).unwrap();
    let b = factory.create("B", Some(&a)).unwrap();

    let inst = b.construct(&[Value::Int(9)]).unwrap();
    assert!(inst.field_names().is_empty());
}

#[test]
fn test_override_must_chain_explicitly() {
    let factory = ClassFactory::new();
    let a = factory.create("A", None).unwrap();
    a.define([Value::map([(
        "__ctor",
        Value::function("ctor", |args| {
            args[0].as_instance().unwrap().set("from_a", Value::Bool(true))?;
            Ok(Value::Nil)
        }),
    )])])
    .unwrap();

    // B overrides without calling A
    let b = factory.create("B", Some(&a)).unwrap();
    b.define([Value::map([(
        "__ctor",
        Value::function("ctor", |args| {
            args[0].as_instance().unwrap().set("from_b", Value::Bool(true))?;
            Ok(Value::Nil)
        }),
    )])])
    .unwrap();

    let inst = b.construct(&[]).unwrap();
    assert_eq!(inst.get_own("from_b"), Some(Value::Bool(true)));
    assert_eq!(inst.get_own("from_a"), None);

    // C overrides and chains to B, which does not chain to A
    let c = factory.create("C", Some(&b)).unwrap();
    let base = b.clone();
    c.define([Value::map([(
        "__ctor",
        Value::function("ctor", move |args| {
            let this = args[0].as_instance().unwrap();
            base.ctor(this, &args[1..])?;
            this.set("from_c", Value::Bool(true))?;
            Ok(Value::Nil)
        }),
    )])])
    .unwrap();

    let inst = c.construct(&[]).unwrap();
    assert_eq!(inst.get_own("from_c"), Some(Value::Bool(true)));
    assert_eq!(inst.get_own("from_b"), Some(Value::Bool(true)));
    assert_eq!(inst.get_own("from_a"), None);
}

#[test]
fn test_constructor_runs_before_return_in_order() {
    let order: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let factory = ClassFactory::new();

    let a = factory.create("A", None).unwrap();
    let log = order.clone();
    a.define([Value::map([(
        "__ctor",
        Value::function("ctor", move |_| {
            log.lock().unwrap().push("A".to_string());
            Ok(Value::Nil)
        }),
    )])])
    .unwrap();

    let b = factory.create("B", Some(&a)).unwrap();
    let log = order.clone();
    let base = a.clone();
    b.define([Value::map([(
        "__ctor",
        Value::function("ctor", move |args| {
            log.lock().unwrap().push("B:before".to_string());
            let this: &Instance = args[0].as_instance().unwrap();
            base.ctor(this, &args[1..])?;
            log.lock().unwrap().push("B:after".to_string());
            Ok(Value::Nil)
        }),
    )])])
    .unwrap();

    b.construct(&[]).unwrap();
    assert_eq!(*order.lock().unwrap(), vec!["B:before", "A", "B:after"]);
}

#[test]
fn test_ctor_property_is_callable() {
    let factory = ClassFactory::new();
    let a = factory.create("A", None).unwrap();
    a.define([Value::map([("__ctor", recording_ctor())])]).unwrap();
    let b = factory.create("B", Some(&a)).unwrap();

    // B has no override, so its `ctor` property is the forwarding default
    let inst = b.construct(&[]).unwrap();
    let ctor = b.get("ctor").unwrap();
    ctor.call(&[Value::Instance(inst.clone()), Value::Int(5)]).unwrap();
    assert_eq!(inst.get_own("arg0"), Some(Value::Int(5)));

    assert!(matches!(
        ctor.call(&[Value::Int(5)]),
        Err(ObjectError::InvalidReceiver { .. })
    ));
}

#[test]
fn test_constructor_error_propagates() {
    let factory = ClassFactory::new();
    let a = factory.create("A", None).unwrap();
    a.define([Value::map([(
        "__ctor",
        Value::function("ctor", |args| match args.get(1) {
            Some(Value::Int(n)) if *n >= 0 => Ok(Value::Nil),
            _ => Err(ObjectError::Raised(Value::from("expected a non-negative int"))),
        }),
    )])])
    .unwrap();
    let b = factory.create("B", Some(&a)).unwrap();

    assert!(b.construct(&[Value::Int(3)]).is_ok());
    assert_eq!(
        b.construct(&[Value::Int(-1)]).unwrap_err(),
        ObjectError::Raised(Value::from("expected a non-negative int"))
    );
}

#[test]
fn test_constructor_may_define_members() {
    let factory = ClassFactory::new();
    let lazy = factory.create("Lazy", None).unwrap();
    let class = lazy.clone();
    lazy.define([Value::map([(
        "__ctor",
        Value::function("ctor", move |_| {
            if !class.members().contains("ready") {
                class.define([Value::map([("ready", true)])])?;
            }
            Ok(Value::Nil)
        }),
    )])])
    .unwrap();

    let inst = lazy.construct(&[]).unwrap();
    assert_eq!(inst.get("ready"), Some(Value::Bool(true)));
}
