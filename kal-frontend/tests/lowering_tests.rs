//! End-to-end lowering tests through the `Frontend` facade

use kal_common::CompilerError;
use kal_frontend::ir::{verify_function, Instruction, Module, Value};
use kal_frontend::{Frontend, ANON_EXPR_NAME};
use pretty_assertions::assert_eq;

const FIB: &str = r#"
# Recursive fibonacci
def fib(n)
  if n < 3 then
    1
  else
    fib(n - 1) + fib(n - 2)

fib(10)
"#;

fn compile(source: &str) -> Module {
    Frontend::compile_to_ir(source, "lowering").unwrap()
}

#[test]
fn test_fib_lowers_and_verifies() {
    let module = compile(FIB);

    let fib = module.get_function("fib").unwrap();
    assert_eq!(fib.arity(), 1);
    verify_function(&module, fib).unwrap();

    let calls: Vec<&str> = fib
        .blocks
        .iter()
        .flat_map(|b| &b.instructions)
        .filter_map(|i| match i {
            Instruction::Call { callee, .. } => Some(callee.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(calls, vec!["fib", "fib"]);

    let anon = module.get_function(ANON_EXPR_NAME).unwrap();
    assert_eq!(anon.arity(), 0);
}

#[test]
fn test_module_text_form() {
    let module = compile("extern sin(x)\ndef twice(x) x * 2");
    let text = module.to_string();

    assert!(text.starts_with("; ModuleID = 'lowering'"), "{text}");
    assert!(text.contains("declare double @sin(double %0)  ; x"), "{text}");
    assert!(text.contains("define double @twice(double %0) {  ; x"), "{text}");
    assert!(text.contains("L0:  ; entry"), "{text}");
    assert!(text.contains("fmul double"), "{text}");
}

#[test]
fn test_constant_top_level_expression_folds() {
    let module = compile("1 + 2 * 3 - 4");
    let anon = module.get_function(ANON_EXPR_NAME).unwrap();

    let instructions: Vec<&Instruction> = anon.blocks.iter().flat_map(|b| &b.instructions).collect();
    assert_eq!(instructions, vec![&Instruction::Return(Value::Constant(3.0))]);
}

#[test]
fn test_sequence_and_mutation_program() {
    let source = r#"
def count(n)
  var total = 0 in
    (for i = 0, i < n in
       total = total + i) :
    total

count(4)
"#;
    let module = compile(source);
    let count = module.get_function("count").unwrap();
    verify_function(&module, count).unwrap();

    let names: Vec<&str> = count.blocks.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["entry", "for.cond", "for.body", "for.end"]);
}

#[test]
fn test_ir_serializes_to_json() {
    let module = compile("def id(x) x");
    let json = serde_json::to_value(&module).unwrap();

    assert_eq!(json["name"], "lowering");
    assert_eq!(json["functions"][0]["name"], "id");
    assert_eq!(json["functions"][0]["parameters"][0][1], "x");
}

#[test]
fn test_errors_carry_locations() {
    match Frontend::compile_to_ir("def f(x)\n  x + y", "lowering") {
        Err(CompilerError::CodegenError { location, message }) => {
            assert_eq!(location.line, 2);
            assert!(message.contains('y'), "{message}");
        }
        other => panic!("Expected codegen error, got {other:?}"),
    }

    match Frontend::compile_to_ir("def f(x) (x + 1", "lowering") {
        Err(CompilerError::ParseError { message, .. }) => {
            assert!(message.contains("')'"), "{message}");
        }
        other => panic!("Expected parse error, got {other:?}"),
    }

    assert!(matches!(
        Frontend::compile_to_ir("def f(x) 1.2.3", "lowering"),
        Err(CompilerError::LexError { .. })
    ));
}
