use seraph::{Engine, HostValue, Value};

/// Builds an engine with a script-visible `assert` native. Scripts under
/// test define a `void test()` that exercises the behaviour.
fn engine_with_assert() -> Engine {
    let engine = Engine::new();
    engine.register_function("assert", |args| match args.first() {
        Some(HostValue::Bool(true)) => HostValue::Null,
        other => panic!("script assertion failed: got {other:?}"),
    });
    engine
}

fn run(source: &str) -> Engine {
    let engine = engine_with_assert();
    engine.load(source)
          .unwrap_or_else(|e| panic!("script failed to load: {e}"));
    if engine.has_function("test") {
        engine.call("test", &[])
              .unwrap_or_else(|e| panic!("test() failed: {e}"));
    }
    engine
}

fn run_err(source: &str) {
    let engine = engine_with_assert();
    if engine.load(source).is_err() {
        return;
    }
    if engine.has_function("test") && engine.call("test", &[]).is_err() {
        return;
    }
    panic!("script succeeded but was expected to fail");
}

#[test]
fn arithmetic_follows_left_operand() {
    run(r"
        void test() {
            assert(1 + 2 * 3 == 7);
            assert(7 / 2 == 3);
            assert(7.0 / 2 == 3.5);
            assert(10 % 3 == 1);
            assert(2.5 + 1 == 3.5);
        }
    ");
}

#[test]
fn division_by_zero_yields_zero() {
    run(r"
        void test() {
            assert(5 / 0 == 0);
            assert(5.0 / 0.0 == 0.0);
            assert(5 % 0 == 0);
        }
    ");
}

#[test]
fn integer_arithmetic_wraps_to_32_bits() {
    run(r"
        int big = 2147483647;
        int wrapped = 2147483648;
        void test() {
            big = big + 1;
            assert(big == -2147483648);
            assert(wrapped == -2147483648);
        }
    ");
}

#[test]
fn string_concatenation_stringifies_either_side() {
    run(r#"
        void test() {
            assert(("x=" + 3) == "x=3");
            assert((1 + "x") == "1x");
            assert(("v" + true) == "vtrue");
        }
    "#);
}

#[test]
fn equality_is_reflexive_and_promoting() {
    run(r#"
        class Marker {}
        void test() {
            assert(2 == 2.0);
            assert("a" == "a");
            assert(true == true);
            assert(null == null);
            assert(1 != 2);
            Marker x;
            Marker y;
            assert(x == x);
            assert(!(x == y));
        }
    "#);
}

#[test]
fn short_circuit_skips_the_right_side() {
    let engine = run(r"
        int c = 0;
        bool side() { c++; return true; }
        bool r1 = false && side();
        bool r2 = true || side();
    ");
    assert_eq!(engine.get_global("c"), Some(Value::Int(0)));
    assert_eq!(engine.get_global("r1"), Some(Value::Bool(false)));
    assert_eq!(engine.get_global("r2"), Some(Value::Bool(true)));

    let engine = run(r"
        int c = 0;
        bool side() { c++; return true; }
        bool r3 = true && side();
    ");
    assert_eq!(engine.get_global("c"), Some(Value::Int(1)));
    assert_eq!(engine.get_global("r3"), Some(Value::Bool(true)));
}

#[test]
fn for_update_still_runs_on_continue() {
    run(r"
        void test() {
            int total = 0;
            int i;
            for (i = 0; i < 5; i++) {
                if (i == 2) { continue; }
                total += i;
            }
            assert(i == 5);
            assert(total == 8);
        }
    ");
}

#[test]
fn switch_falls_through_until_break() {
    let engine = run(r"
        int f(int x) {
            switch (x) {
                case 1:
                case 2:
                    return 20;
                case 3:
                    return 30;
                default:
                    return 0;
            }
        }
    ");
    assert_eq!(engine.call("f", &[Value::Int(1)]).unwrap(), Value::Int(20));
    assert_eq!(engine.call("f", &[Value::Int(2)]).unwrap(), Value::Int(20));
    assert_eq!(engine.call("f", &[Value::Int(3)]).unwrap(), Value::Int(30));
    assert_eq!(engine.call("f", &[Value::Int(9)]).unwrap(), Value::Int(0));
}

#[test]
fn switch_break_stops_fall_through() {
    let engine = run(r"
        int trace(int x) {
            int acc = 0;
            switch (x) {
                case 1:
                    acc += 1;
                case 2:
                    acc += 2;
                    break;
                case 3:
                    acc += 4;
            }
            return acc;
        }
    ");
    assert_eq!(engine.call("trace", &[Value::Int(1)]).unwrap(), Value::Int(3));
    assert_eq!(engine.call("trace", &[Value::Int(2)]).unwrap(), Value::Int(2));
    assert_eq!(engine.call("trace", &[Value::Int(3)]).unwrap(), Value::Int(4));
    assert_eq!(engine.call("trace", &[Value::Int(8)]).unwrap(), Value::Int(0));
}

#[test]
fn counter_class_counts() {
    let engine = run(r"
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
    ");
    assert_eq!(engine.call("main", &[Value::Int(12)]).unwrap(), Value::Int(15));
}

#[test]
fn default_construction_runs_the_constructor() {
    run(r#"
        class Prepared {
            int x;
            Prepared() { x = 41; }
        }
        class Bare {
            int x;
            string s;
            bool b;
        }
        void test() {
            Prepared p;
            assert(p.x == 41);
            Bare q;
            assert(q.x == 0);
            assert(q.s == "");
            assert(q.b == false);
        }
    "#);
}

#[test]
fn handles_alias_their_referent() {
    run(r"
        class Box { int n; }
        void test() {
            Box a = new Box();
            a.n = 5;
            Box@ h = @a;
            h.n = 9;
            assert(a.n == 9);

            Box@ h2 = @a;
            assert(h == h2);
            assert(h == a);
        }
    ");
}

#[test]
fn handle_assignment_rebinds() {
    run(r"
        class Box { int n; }
        void test() {
            Box a = new Box();
            a.n = 1;
            Box b = new Box();
            b.n = 2;

            Box@ h;
            assert(h == null);
            @h = @a;
            assert(h.n == 1);
            @h = @b;
            assert(h.n == 2);
            assert(a.n == 1);
        }
    ");
}

#[test]
fn null_handle_access_is_an_error() {
    run_err(r"
        class Box { int n; }
        void test() { Box@ h; int x = h.n; }
    ");
}

#[test]
fn array_operations() {
    run(r"
        void test() {
            int[] xs;
            xs.push(1);
            xs.push(2);
            xs.push(3);
            int s = xs.size();
            int idx = xs.find(2);
            xs.removeAt(0);
            assert(s == 3);
            assert(idx == 1);
            assert(xs.size() == 2);
            assert(xs[0] == 2);
            assert(xs.find(9) == -1);

            xs.insertAt(0, 7);
            assert(xs[0] == 7);
            xs.pop();
            assert(xs.length() == 2);
            xs.resize(4);
            assert(xs.size() == 4);
            assert(xs[3] == 0);
            xs.resize(1);
            assert(xs.size() == 1);
            xs.reserve(100);
            assert(xs.size() == 1);

            int[] empty;
            assert(empty.empty());
        }
    ");
}

#[test]
fn array_index_out_of_bounds_is_an_error() {
    run_err(r"
        void test() { int[] xs; xs.push(1); int y = xs[1]; }
    ");
    run_err(r"
        void test() { int[] xs; xs.push(1); int y = xs[-1]; }
    ");
}

#[test]
fn array_size_initializer_builds_a_filled_array() {
    run(r"
        int buf(4);
        void test() {
            assert(buf.size() == 4);
            assert(buf[0] == 0);
            buf[2] = 9;
            assert(buf[2] == 9);
        }
    ");
}

#[test]
fn template_array_declarations_parse() {
    run(r"
        void test() {
            array<int> xs;
            xs.push(5);
            assert(xs[0] == 5);
        }
    ");
}

#[test]
fn forward_references_work_through_two_pass_loading() {
    let engine = run(r"
        int first() { return second(); }
        int r = first();
        int second() { return 7; }
    ");
    assert_eq!(engine.get_global("r"), Some(Value::Int(7)));
}

#[test]
fn global_class_variables_construct_implicitly() {
    run(r"
        class Config { int level; }
        Config cfg;
        void test() {
            assert(cfg.level == 0);
            cfg.level = 3;
            assert(cfg.level == 3);
        }
    ");
}

#[test]
fn string_methods() {
    run(r#"
        void test() {
            string s = "Hello World";
            assert(s.length() == 11);
            assert(s.len() == 11);
            assert(!s.empty());
            assert("".empty());
            assert(s.toUpper() == "HELLO WORLD");
            assert(s.toLower() == "hello world");
            assert(s.substr(6) == "World");
            assert(s.substr(0, 5) == "Hello");
            assert(s.findFirst("World") == 6);
            assert(s.findFirst("zzz") == -1);
            assert(s.getToken(0) == "Hello");
            assert(s.getToken(1) == "World");
            assert("42".toInt() == 42);
            assert("2.5".toFloat() == 2.5);
        }
    "#);
}

#[test]
fn string_escapes_and_quotes() {
    run(r#"
        void test() {
            assert("a\tb".length() == 3);
            assert('it' + "s" == "its");
            assert("\q" == "q");
        }
    "#);
}

#[test]
fn ternary_and_casts() {
    run(r#"
        void test() {
            assert((5 > 3 ? 1 : 2) == 1);
            assert((5 < 3 ? 1 : 2) == 2);
            assert(int(3.9) == 3);
            assert(int("12") == 12);
            assert(float(3) == 3.0);
            assert(bool(0) == false);
            assert(bool(7) == true);
            assert(string(12) == "12");
            assert(string(true) == "true");
        }
    "#);
}

#[test]
fn bitwise_and_shift_operators() {
    run(r"
        void test() {
            assert((5 & 3) == 1);
            assert((5 | 3) == 7);
            assert((5 ^ 3) == 6);
            assert((1 << 4) == 16);
            assert((-8 >> 1) == -4);
            assert((~0) == -1);
            assert((6.9 & 3) == 2);
        }
    ");
}

#[test]
fn compound_assignment_defines_missing_names() {
    run(r"
        void test() {
            missing += 5;
            assert(missing == 5);
            missing *= 3;
            assert(missing == 15);
        }
    ");
}

#[test]
fn prefix_and_postfix_steps() {
    run(r"
        void test() {
            int a = 5;
            assert(a++ == 5);
            assert(a == 6);
            assert(++a == 7);
            assert(--a == 6);
            assert(a-- == 6);
            assert(a == 5);

            float x = 1.5;
            x++;
            assert(x == 2.5);
        }
    ");
}

#[test]
fn increments_reach_members_and_indices() {
    run(r"
        class Cell { int n; }
        void test() {
            Cell c;
            c.n++;
            c.n++;
            assert(c.n == 2);

            int[] xs;
            xs.push(4);
            xs[0]++;
            assert(xs[0] == 5);
        }
    ");
}

#[test]
fn enum_members_resolve_through_scope_access() {
    run(r"
        enum Color { Red, Green = 5, Blue }
        void test() {
            assert(Color::Red == 0);
            assert(Color::Green == 5);
            assert(Color::Blue == 6);
        }
    ");
}

#[test]
fn unknown_enum_member_is_an_error() {
    run_err(r"
        enum Color { Red }
        void test() { int x = Color::Purple; }
    ");
}

#[test]
fn while_and_do_while_loops() {
    run(r"
        void test() {
            int n = 0;
            do { n++; } while (n < 3);
            assert(n == 3);

            int i = 0;
            int hits = 0;
            while (true) {
                i++;
                if (i > 10) { break; }
                if (i % 2 == 0) { continue; }
                hits++;
            }
            assert(i == 11);
            assert(hits == 5);
        }
    ");
}

#[test]
fn missing_arguments_default_per_parameter_type() {
    run(r#"
        int pad(int a, int b) { return a * 10 + b; }
        string tag(string s) { return "<" + s + ">"; }
        void test() {
            assert(pad(5) == 50);
            assert(tag() == "<>");
        }
    "#);
}

#[test]
fn parameter_qualifiers_parse() {
    run(r"
        int add(int in a, int &in b, int &out c) { return a + b + c; }
        void test() { assert(add(1, 2, 3) == 6); }
    ");
}

#[test]
fn const_declarations() {
    run(r"
        const int limit = 10;
        void test() {
            const int local = limit + 1;
            assert(local == 11);
        }
    ");
}

#[test]
fn comments_do_not_disturb_parsing() {
    run(r"
        // leading comment
        /* a block comment
           spanning several lines */
        int x = 1; // trailing
        void test() { assert(x == 1); }
    ");
}

#[test]
fn methods_read_and_write_fields_as_bare_names() {
    run(r"
        class Accumulator {
            int total;
            int count;
            void add(int amount) {
                total += amount;
                count++;
            }
            float mean() {
                if (count == 0) { return 0.0; }
                return float(total) / count;
            }
        }
        void test() {
            Accumulator acc;
            acc.add(4);
            acc.add(8);
            assert(acc.total == 12);
            assert(acc.count == 2);
            assert(acc.mean() == 6.0);
        }
    ");
}

#[test]
fn destructors_parse_but_never_run() {
    let engine = run(r"
        int dtor_runs = 0;
        class Scoped {
            int n;
            Scoped() { n = 1; }
            ~Scoped() { dtor_runs++; }
        }
        void test() {
            Scoped s;
            assert(s.n == 1);
        }
    ");
    assert_eq!(engine.get_global("dtor_runs"), Some(Value::Int(0)));
}

#[test]
fn class_name_is_callable_as_a_constructor() {
    run(r"
        class Pair {
            int a;
            int b;
            Pair(int x, int y) { a = x; b = y; }
        }
        void test() {
            Pair p = Pair(3, 4);
            assert(p.a == 3);
            assert(p.b == 4);
        }
    ");
}

#[test]
fn unexpected_character_is_a_lex_error() {
    run_err("int $ = 1;");
}

#[test]
fn unterminated_string_is_a_lex_error() {
    run_err("string s = \"abc");
}

#[test]
fn malformed_declarations_are_parse_errors() {
    run_err("int x = @;");
    run_err("int f( { }");
    run_err("class { }");
}

#[test]
fn unknown_identifier_is_a_runtime_error() {
    run_err("int x = nowhere;");
}

#[test]
fn unknown_class_is_a_runtime_error() {
    run_err("void test() { Ghost g = new Ghost(); }");
}

#[test]
fn calling_a_non_function_is_an_error() {
    run_err("int x = 5; void test() { x(); }");
}
