use std::{cell::RefCell, fs, rc::Rc};

use seraph::{Engine, HostValue};
use walkdir::WalkDir;

/// Runs every demo script with a capturing `print` and checks that it
/// loads, runs its `main` and produces output.
#[test]
fn demo_scripts_run() {
    let mut count = 0;

    for entry in WalkDir::new("demos").into_iter()
                                      .filter_map(Result::ok)
                                      .filter(|e| {
                                          e.path().extension().is_some_and(|ext| ext == "srp")
                                      })
    {
        let path = entry.path();
        let source =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("failed to read {path:?}: {e}"));

        let output = Rc::new(RefCell::new(Vec::new()));
        let engine = Engine::new();
        let sink = output.clone();
        engine.register_function("print", move |args| {
            let line = match args.first() {
                Some(HostValue::Str(s)) => s.clone(),
                Some(HostValue::Int(n)) => n.to_string(),
                Some(HostValue::Float(x)) => x.to_string(),
                Some(HostValue::Bool(b)) => b.to_string(),
                _ => "null".to_owned(),
            };
            sink.borrow_mut().push(line);
            HostValue::Null
        });

        if let Err(e) = engine.load(&source) {
            panic!("demo {path:?} failed to load:\n{e}");
        }
        if let Err(e) = engine.call("main", &[]) {
            panic!("demo {path:?} failed:\n{e}");
        }
        assert!(!output.borrow().is_empty(), "demo {path:?} printed nothing");
        count += 1;
    }

    assert!(count > 0, "no demo scripts found in demos/");
}
