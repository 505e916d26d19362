use std::fs;

use clap::Parser;
use seraph::{Engine, HostValue};

/// seraph runs scripts written in a statically-typed, C-like language
/// with classes, handles, arrays and enums.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Treat the input as a file path instead of inline script text.
    #[arg(short, long)]
    file: bool,

    /// Call this function after the script has loaded. Without it, a
    /// `main` function is called when the script defines one.
    #[arg(short, long)]
    call: Option<String>,

    contents: String,
}

fn main() {
    let args = Args::parse();

    let script = if args.file {
        fs::read_to_string(&args.contents).unwrap_or_else(|_| {
            eprintln!("Failed to read the input file '{}'. Perhaps this file does not exist?",
                      &args.contents);
            std::process::exit(1);
        })
    } else {
        args.contents
    };

    let engine = Engine::new();
    engine.register_function("print", |args| {
        match args.first() {
            Some(HostValue::Str(s)) => println!("{s}"),
            Some(HostValue::Int(n)) => println!("{n}"),
            Some(HostValue::Float(x)) => println!("{x}"),
            Some(HostValue::Bool(b)) => println!("{b}"),
            Some(HostValue::Null) | None => println!("null"),
            Some(other) => println!("{other:?}"),
        }
        HostValue::Null
    });

    if let Err(e) = engine.load(&script) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    let entry = match &args.call {
        Some(name) => Some(name.clone()),
        None if engine.has_function("main") => Some("main".to_owned()),
        None => None,
    };
    if let Some(name) = entry
        && let Err(e) = engine.call(&name, &[])
    {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
