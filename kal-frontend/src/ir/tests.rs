//! Unit tests for the IR module

use super::*;
use pretty_assertions::assert_eq;

fn params(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[test]
fn test_ir_values() {
    assert_eq!(format!("{}", Value::Temp(5)), "%5");
    assert_eq!(format!("{}", Value::Constant(42.0)), "42.0");
    assert_eq!(format!("{}", Value::Constant(0.5)), "0.5");
    assert_eq!(format!("{}", StackSlot(3)), "%3");
    assert_eq!(Value::Constant(1.0).as_constant(), Some(1.0));
    assert_eq!(Value::Temp(1).as_constant(), None);
}

#[test]
fn test_fcmp_predicates() {
    let nan = f64::NAN;
    assert!(FCmpPredicate::Ult.evaluate(1.0, 2.0));
    assert!(FCmpPredicate::Ult.evaluate(nan, 2.0));
    assert!(!FCmpPredicate::Olt.evaluate(nan, 2.0));
    assert!(FCmpPredicate::Ugt.evaluate(3.0, 2.0));
    assert!(!FCmpPredicate::Ugt.evaluate(2.0, 2.0));
    assert!(FCmpPredicate::One.evaluate(1.0, 0.0));
    assert!(!FCmpPredicate::One.evaluate(0.0, 0.0));
    assert!(!FCmpPredicate::One.evaluate(nan, 0.0));
    assert!(FCmpPredicate::Une.evaluate(nan, 0.0));
}

#[test]
fn test_basic_block() {
    let mut block = BasicBlock::new(0, "entry");
    assert!(block.is_empty());
    assert!(!block.has_terminator());

    block.add_instruction(Instruction::Store { value: Value::Constant(1.0), slot: StackSlot(0) });
    assert!(!block.is_empty());
    assert!(!block.has_terminator());

    block.add_instruction(Instruction::BranchCond {
        condition: Value::Temp(1),
        true_label: 1,
        false_label: 2,
    });
    assert!(block.has_terminator());
    assert_eq!(block.successors(), vec![1, 2]);
}

#[test]
fn test_function_declaration() {
    let function = Function::new("atan2", &params(&["y", "x"]));
    assert!(function.is_declaration());
    assert_eq!(function.arity(), 2);
    assert_eq!(function.parameters, vec![(0, "y".to_string()), (1, "x".to_string())]);
    assert_eq!(function.next_temp, 2);
    assert_eq!(function.to_string(), "declare double @atan2(double %0, double %1)  ; y, x\n");
}

#[test]
fn test_ir_builder_allocas_go_to_entry_start() {
    let mut builder = IrBuilder::new("test");
    builder.declare_function("add", &params(&["x", "y"])).unwrap();
    let entry = builder.begin_function("add").unwrap();

    let sum = builder.build_binary(IrBinaryOp::FAdd, Value::Temp(0), Value::Temp(1)).unwrap();
    let first = builder.build_alloca(Some("tmp")).unwrap();
    builder.build_store(sum, first).unwrap();
    let second = builder.build_alloca(None).unwrap();
    let loaded = builder.build_load(first).unwrap();
    builder.build_store(loaded, second).unwrap();
    builder.build_return(loaded).unwrap();
    assert!(builder.current_block_has_terminator());
    assert_eq!(builder.finish_function(), Some("add".to_string()));

    let function = builder.module().get_function("add").unwrap();
    let block = function.get_block(entry).unwrap();
    assert_eq!(block.instructions[0], Instruction::Alloca { result: first.id(), name: Some("tmp".to_string()) });
    assert_eq!(block.instructions[1], Instruction::Alloca { result: second.id(), name: None });
    assert!(matches!(block.instructions[2], Instruction::Binary { .. }));
    assert!(verify_function(builder.module(), function).is_ok());
}

#[test]
fn test_builder_rejects_instruction_after_terminator() {
    let mut builder = IrBuilder::new("test");
    builder.declare_function("f", &[]).unwrap();
    builder.begin_function("f").unwrap();
    builder.build_return(Value::Constant(0.0)).unwrap();
    assert!(builder.build_return(Value::Constant(1.0)).is_err());
}

#[test]
fn test_builder_requires_function() {
    let mut builder = IrBuilder::new("test");
    assert_eq!(builder.build_branch(0), Err("No current block".to_string()));
    assert!(builder.append_block("orphan").is_err());
    assert!(builder.begin_function("missing").is_err());
}

#[test]
fn test_declare_replaces_declaration_but_not_definition() {
    let mut builder = IrBuilder::new("test");
    builder.declare_function("f", &params(&["a"])).unwrap();
    let f = builder.declare_function("f", &params(&["a", "b"])).unwrap();
    assert_eq!(f.arity(), 2);
    assert_eq!(builder.module().functions.len(), 1);

    builder.begin_function("f").unwrap();
    builder.build_return(Value::Constant(0.0)).unwrap();
    builder.finish_function();
    assert!(builder.declare_function("f", &params(&["a"])).is_err());
}

#[test]
fn test_module_function_lookup() {
    let mut module = Module::new("test");
    module.add_function(Function::new("sin", &params(&["x"])));
    module.add_function(Function::new("cos", &params(&["x"])));

    assert!(module.get_function("sin").is_some());
    assert_eq!(module.definitions().count(), 0);
    assert!(module.remove_function("sin").is_some());
    assert!(module.get_function("sin").is_none());
    assert_eq!(module.functions.len(), 1);
}

fn single_block_function(instructions: Vec<Instruction>) -> Function {
    let mut function = Function::new("f", &params(&["x"]));
    let mut block = BasicBlock::new(0, "entry");
    for instr in instructions {
        block.add_instruction(instr);
    }
    function.add_block(block);
    function.next_temp = 10;
    function
}

#[test]
fn test_verify_rejects_missing_terminator() {
    let module = Module::new("test");
    let function = single_block_function(vec![Instruction::Binary {
        result: 1,
        op: IrBinaryOp::FAdd,
        lhs: Value::Temp(0),
        rhs: Value::Constant(1.0),
    }]);
    let err = verify_function(&module, &function).unwrap_err();
    assert!(err.contains("no terminator"), "{err}");
}

#[test]
fn test_verify_rejects_unknown_branch_target() {
    let module = Module::new("test");
    let function = single_block_function(vec![Instruction::Branch(7)]);
    let err = verify_function(&module, &function).unwrap_err();
    assert!(err.contains("unknown block L7"), "{err}");
}

#[test]
fn test_verify_rejects_undefined_temp_and_bad_call() {
    let mut module = Module::new("test");
    module.add_function(Function::new("g", &params(&["a", "b"])));

    let function = single_block_function(vec![Instruction::Return(Value::Temp(4))]);
    let err = verify_function(&module, &function).unwrap_err();
    assert!(err.contains("undefined value %4"), "{err}");

    let function = single_block_function(vec![
        Instruction::Call { result: 1, callee: "g".to_string(), args: vec![Value::Temp(0)] },
        Instruction::Return(Value::Temp(1)),
    ]);
    let err = verify_function(&module, &function).unwrap_err();
    assert!(err.contains("expected 2"), "{err}");

    let function = single_block_function(vec![
        Instruction::Call { result: 1, callee: "nope".to_string(), args: vec![] },
        Instruction::Return(Value::Temp(1)),
    ]);
    assert!(verify_function(&module, &function).is_err());
}

#[test]
fn test_verify_rejects_declaration() {
    let module = Module::new("test");
    let function = Function::new("f", &[]);
    assert!(verify_function(&module, &function).is_err());
}

#[test]
fn test_constant_folding_and_unreachable_removal() {
    let mut builder = IrBuilder::new("test");
    builder.declare_function("f", &[]).unwrap();
    let entry = builder.begin_function("f").unwrap();
    let then_block = builder.append_block("then").unwrap();
    let else_block = builder.append_block("else").unwrap();

    let sum = builder.build_binary(IrBinaryOp::FAdd, Value::Constant(1.0), Value::Constant(2.0)).unwrap();
    let cond = builder.build_fcmp(FCmpPredicate::Ult, sum, Value::Constant(5.0)).unwrap();
    builder.build_branch_cond(cond, then_block, else_block).unwrap();

    builder.position_at_end(then_block).unwrap();
    builder.build_return(sum).unwrap();
    builder.position_at_end(else_block).unwrap();
    builder.build_return(Value::Constant(0.0)).unwrap();
    builder.finish_function();

    let function = builder.module_mut().get_function_mut("f").unwrap();
    assert!(run_function_passes(function));

    assert_eq!(function.blocks.len(), 2);
    assert_eq!(function.get_block(entry).unwrap().instructions, vec![Instruction::Branch(then_block)]);
    assert_eq!(
        function.get_block(then_block).unwrap().instructions,
        vec![Instruction::Return(Value::Constant(3.0))]
    );
    assert!(function.get_block(else_block).is_none());

    // A second run has nothing left to do
    assert!(!run_function_passes(function));
}

#[test]
fn test_folding_leaves_memory_and_calls() {
    let mut function = single_block_function(vec![
        Instruction::Alloca { result: 1, name: None },
        Instruction::Store { value: Value::Constant(2.0), slot: StackSlot(1) },
        Instruction::Load { result: 2, slot: StackSlot(1) },
        Instruction::Call { result: 3, callee: "g".to_string(), args: vec![Value::Temp(2)] },
        Instruction::Return(Value::Temp(3)),
    ]);
    let before = function.clone();
    assert!(!ConstantFolding.run(&mut function));
    assert_eq!(function, before);
}
