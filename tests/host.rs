use std::{cell::RefCell, rc::Rc};

use seraph::{Engine, HostValue, NativeObject, NativeRecord, Value, unwrap, wrap_native};

#[test]
fn globals_round_trip_between_host_and_script() {
    let engine = Engine::new();
    engine.register_int("G_Base", 40);
    engine.register_global("G_Name", Value::from("core"));

    engine.load(r#"
        int combined = G_Base + 2;
        string tagged = G_Name + "!";
    "#)
          .unwrap();

    assert_eq!(engine.get_global("combined"), Some(Value::Int(42)));
    assert_eq!(engine.get_global("tagged"), Some(Value::from("core!")));

    engine.set_global("combined", Value::Int(7));
    assert_eq!(engine.get_global("combined"), Some(Value::Int(7)));
}

#[test]
fn set_global_is_visible_to_later_calls() {
    let engine = Engine::new();
    engine.register_int("G_Level", 1);
    engine.load("int read_level() { return G_Level; }").unwrap();

    assert_eq!(engine.call("read_level", &[]).unwrap(), Value::Int(1));
    engine.set_global("G_Level", Value::Int(9));
    assert_eq!(engine.call("read_level", &[]).unwrap(), Value::Int(9));
}

#[test]
fn native_print_receives_stringified_output() {
    let engine = Engine::new();
    let captured = Rc::new(RefCell::new(Vec::new()));
    let sink = captured.clone();
    engine.register_function("G_Print", move |args| {
        if let Some(HostValue::Str(s)) = args.first() {
            sink.borrow_mut().push(s.clone());
        }
        HostValue::Null
    });

    engine.load(r#"void say() { G_Print("x=" + 3); }"#).unwrap();
    engine.call("say", &[]).unwrap();

    assert_eq!(*captured.borrow(), vec!["x=3".to_owned()]);
}

#[test]
fn wrap_then_unwrap_preserves_value_types() {
    let samples = [HostValue::Null,
                   HostValue::Bool(true),
                   HostValue::Bool(false),
                   HostValue::Int(0),
                   HostValue::Int(-17),
                   HostValue::Float(2.25),
                   HostValue::Str("text".to_owned()),
                   HostValue::Array(vec![HostValue::Int(1),
                                         HostValue::Str("two".to_owned()),
                                         HostValue::Array(vec![HostValue::Bool(true)])])];
    for sample in samples {
        assert_eq!(unwrap(&wrap_native(sample.clone())), sample);
    }
}

#[test]
fn integers_wrap_to_32_bits_at_the_boundary() {
    assert_eq!(wrap_native(HostValue::Int(2_147_483_648)), Value::Int(-2_147_483_648));
    assert_eq!(unwrap(&Value::int(5)), HostValue::Int(5));
}

#[test]
fn function_values_unwrap_to_null() {
    let engine = Engine::new();
    engine.load("int f() { return 1; }").unwrap();
    let func = engine.get_global("f").unwrap();
    assert_eq!(unwrap(&func), HostValue::Null);
}

#[test]
fn registered_objects_expose_properties_and_methods() {
    let engine = Engine::new();
    let gadget = Rc::new(NativeRecord::new("Gadget")
        .with_property("level", HostValue::Int(3))
        .with_method("describe", |record, _args| match record.property("level") {
            Some(HostValue::Int(n)) => HostValue::Str(format!("level {n}")),
            _ => HostValue::Null,
        }));
    engine.register_object("gadget", gadget);

    engine.load(r"
        string probe() { return gadget.describe(); }
        int bump() { gadget.level = gadget.level + 1; return gadget.level; }
    ")
          .unwrap();

    assert_eq!(engine.call("probe", &[]).unwrap(), Value::from("level 3"));
    assert_eq!(engine.call("bump", &[]).unwrap(), Value::Int(4));
    assert_eq!(engine.call("probe", &[]).unwrap(), Value::from("level 4"));
}

#[test]
fn handles_can_point_at_natives() {
    let engine = Engine::new();
    let gadget = Rc::new(NativeRecord::new("Gadget")
        .with_property("level", HostValue::Int(2)));
    engine.register_object("gadget", gadget);

    engine.load(r"
        int through_handle() {
            Gadget@ g = @gadget;
            return g.level;
        }
    ")
          .unwrap();
    assert_eq!(engine.call("through_handle", &[]).unwrap(), Value::Int(2));
}

#[test]
fn registered_classes_produce_natives_from_script() {
    let engine = Engine::new();
    engine.register_class("Widget", |args| {
        let start = match args.first() {
            Some(HostValue::Int(n)) => *n,
            _ => 0,
        };
        Rc::new(NativeRecord::new("Widget").with_property("level", HostValue::Int(start)))
            as Rc<dyn NativeObject>
    });

    engine.load(r"
        int make() {
            Widget w = Widget(6);
            return w.level;
        }
    ")
          .unwrap();
    assert_eq!(engine.call("make", &[]).unwrap(), Value::Int(6));
}

#[test]
fn call_passes_arguments_and_returns_values() {
    let engine = Engine::new();
    engine.load(r"
        class TestClass {
            int v;
            TestClass(int initial) { v = initial; }
            void inc() { v++; }
        }
        int main(int start) {
            TestClass t = new TestClass(start);
            t.inc();
            t.inc();
            t.inc();
            return t.v;
        }
        void noisy() { }
    ")
          .unwrap();

    assert_eq!(engine.call("main", &[Value::Int(12)]).unwrap(), Value::Int(15));
    assert_eq!(engine.call("noisy", &[]).unwrap(), Value::Void);
    assert!(engine.call("absent", &[]).is_err());
}

#[test]
fn has_function_distinguishes_callables() {
    let engine = Engine::new();
    engine.register_int("G_Num", 1);
    engine.register_function("G_Fn", |_| HostValue::Null);
    engine.load("void scripted() { }").unwrap();

    assert!(engine.has_function("G_Fn"));
    assert!(engine.has_function("scripted"));
    assert!(!engine.has_function("G_Num"));
    assert!(!engine.has_function("missing"));
}

#[test]
fn engines_are_isolated_from_each_other() {
    let a = Engine::new();
    let b = Engine::new();
    a.load("int x = 1;").unwrap();
    b.load("int x = 2;").unwrap();
    assert_eq!(a.get_global("x"), Some(Value::Int(1)));
    assert_eq!(b.get_global("x"), Some(Value::Int(2)));
}
