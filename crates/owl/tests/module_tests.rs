use std::{fs, path::Path};

use owl::{Engine, NoPrint, Object};
use tempfile::TempDir;

fn write_module(dir: &Path, name: &str, contents: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create module directory");
    }
    fs::write(path, contents).expect("write module file");
}

fn run_in(dir: &TempDir, source: &str) -> Result<Object, owl::RunError> {
    let engine = Engine::load(source, dir.path().join("main.hoot"))
        .unwrap_or_else(|errors| panic!("parse errors: {errors:?}"));
    engine.run_with(&mut NoPrint)
}

#[test]
fn relative_import() {
    let dir = TempDir::new().expect("temp dir");
    write_module(dir.path(), "util.hoot", "let Double = (x) => x * 2");

    let result = run_in(&dir, "import './util' \n return util.Double(21)").expect("runs");
    assert_eq!(result, Object::Int(42));
}

#[test]
fn import_alias_is_the_file_stem() {
    let dir = TempDir::new().expect("temp dir");
    write_module(dir.path(), "nested/helper.hoot", "let Greet = (n) => 'hi ' + n");

    let result = run_in(&dir, "import './nested/helper' \n return helper.Greet('x')").expect("runs");
    assert_eq!(result, Object::Str("hi x".to_owned()));
}

#[test]
fn module_attributes_are_its_globals() {
    let dir = TempDir::new().expect("temp dir");
    write_module(dir.path(), "util.hoot", "let value = 7");

    let result = run_in(&dir, "import './util' \n return util.value").expect("runs");
    assert_eq!(result, Object::Int(7));
}

#[test]
fn module_renders_as_its_name() {
    let dir = TempDir::new().expect("temp dir");
    write_module(dir.path(), "util.hoot", "let value = 7");

    let result = run_in(&dir, "import './util' \n return 'mod: ' + util").expect("runs");
    assert_eq!(result, Object::Str("mod: util".to_owned()));
}

#[test]
fn absolute_import() {
    let dir = TempDir::new().expect("temp dir");
    write_module(dir.path(), "abslib.hoot", "let x = 5");

    let module_path = dir.path().join("abslib");
    let source = format!("import '{}' \n return abslib.x", module_path.display());
    let result = run_in(&dir, &source).expect("runs");
    assert_eq!(result, Object::Int(5));
}

#[test]
fn modules_import_relative_to_themselves() {
    let dir = TempDir::new().expect("temp dir");
    write_module(dir.path(), "sub/a.hoot", "import './b' \n let combined = b.val + 1");
    write_module(dir.path(), "sub/b.hoot", "let val = 1");

    let result = run_in(&dir, "import './sub/a' \n return a.combined").expect("runs");
    assert_eq!(result, Object::Int(2));
}

#[test]
fn module_globals_do_not_leak() {
    let dir = TempDir::new().expect("temp dir");
    write_module(dir.path(), "m.hoot", "let x = 99");

    let result = run_in(&dir, "let x = 1 \n import './m' \n return x").expect("runs");
    assert_eq!(result, Object::Int(1));
}

#[test]
fn missing_module_is_an_error() {
    let dir = TempDir::new().expect("temp dir");
    let err = run_in(&dir, "import './nope'").expect_err("fails");
    assert!(
        err.message.contains("Failed to load module './nope'"),
        "unexpected message: {}",
        err.message
    );
}

#[test]
fn module_parse_errors_surface() {
    let dir = TempDir::new().expect("temp dir");
    write_module(dir.path(), "bad.hoot", "let = 5");

    let err = run_in(&dir, "import './bad'").expect_err("fails");
    assert!(
        err.message.contains("Failed to load module './bad'"),
        "unexpected message: {}",
        err.message
    );
}

#[test]
fn builtin_json_module() {
    let dir = TempDir::new().expect("temp dir");

    let result = run_in(&dir, "import 'json' \n return json.ToObject('[123, 0, 456]')").expect("runs");
    assert_eq!(
        result,
        Object::List(vec![Object::Int(123), Object::Int(0), Object::Int(456)])
    );

    let result = run_in(&dir, "import 'json' \n return json.ToObject('{\"a\": 1}').a").expect("runs");
    assert_eq!(result, Object::Int(1));

    let result = run_in(&dir, "import 'json' \n return json.ToString([1, 'a'])").expect("runs");
    assert_eq!(result, Object::Str("[1,\"a\"]".to_owned()));
}

#[test]
fn builtin_fs_module() {
    let dir = TempDir::new().expect("temp dir");
    let data = dir.path().join("data.txt");
    fs::write(&data, "hello").expect("write data file");

    let source = format!("import 'fs' \n return fs.Read('{}')", data.display());
    let result = run_in(&dir, &source).expect("runs");
    assert_eq!(result, Object::Str("hello".to_owned()));
}

#[test]
fn builtin_os_module() {
    let dir = TempDir::new().expect("temp dir");
    let result = run_in(&dir, "import 'os' \n return os.Platform()").expect("runs");
    assert_eq!(result, Object::Str(std::env::consts::OS.to_owned()));
}
