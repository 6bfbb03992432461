use owl::{CollectStringPrint, Engine, Object};

#[test]
fn injected_globals_are_visible() {
    let mut engine = Engine::load("return \"Hello, \" + globalVar + \"!\"", "test.hoot").expect("parses");
    engine.insert_global("globalVar", Object::Str("world".to_owned()));

    let result = engine.run().expect("runs");
    assert_eq!(result, Object::Str("Hello, world!".to_owned()));
}

/// A loaded program can run repeatedly; each run is independent.
#[test]
fn repeat_runs() {
    let engine = Engine::load("return 1 + 2", "test.hoot").expect("parses");

    let result = engine.run().expect("runs");
    assert_eq!(result, Object::Int(3));

    let result = engine.run().expect("runs again");
    assert_eq!(result, Object::Int(3));
}

#[test]
fn runs_are_isolated() {
    let engine = Engine::load("x = [1] \n x.Add(2) \n return x.Len()", "test.hoot").expect("parses");
    assert_eq!(engine.run().expect("runs"), Object::Int(2));
    assert_eq!(engine.run().expect("runs again"), Object::Int(2));
}

#[test]
fn parse_errors_prevent_loading() {
    let errors = Engine::load("let = 5", "test.hoot").expect_err("does not parse");
    assert!(!errors.is_empty());
}

#[test]
fn result_defaults_to_null() {
    let engine = Engine::load("x = 1 + 1", "test.hoot").expect("parses");
    assert_eq!(engine.run().expect("runs"), Object::Null);
}

#[test]
fn structured_results_cross_the_boundary() {
    let engine = Engine::load("return { a: 1, b: [1, 2], c: 'x' }", "test.hoot").expect("parses");
    assert_eq!(
        engine.run().expect("runs"),
        Object::Map(vec![
            ("a".to_owned(), Object::Int(1)),
            ("b".to_owned(), Object::List(vec![Object::Int(1), Object::Int(2)])),
            ("c".to_owned(), Object::Str("x".to_owned())),
        ])
    );
}

#[test]
fn injected_structures_round_trip() {
    let mut engine = Engine::load("return config.retries + config.limits[0]", "test.hoot").expect("parses");
    engine.insert_global(
        "config",
        Object::Map(vec![
            ("retries".to_owned(), Object::Int(3)),
            ("limits".to_owned(), Object::List(vec![Object::Int(10)])),
        ]),
    );
    assert_eq!(engine.run().expect("runs"), Object::Int(13));
}

#[test]
fn print_goes_through_the_writer() {
    let engine = Engine::load("print 'captured'", "test.hoot").expect("parses");
    let mut collect = CollectStringPrint::new();
    engine.run_with(&mut collect).expect("runs");
    assert_eq!(collect.output(), "captured\n");
}

#[test]
fn run_errors_carry_the_file_name() {
    let engine = Engine::load("return nope", "program.hoot").expect("parses");
    let err = engine.run().expect_err("fails");
    assert_eq!(err.file, "program.hoot");
    assert_eq!(err.to_string(), "program.hoot:1:8: Unable to find variable 'nope'");
}
