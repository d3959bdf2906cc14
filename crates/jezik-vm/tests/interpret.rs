use std::thread;

use jezik_core::{helpers::validate_chunk, Chunk, ChunkResult, OpCode, Value};
use jezik_vm::{InterpretResult, Vm, VmConfig, VmError};
use proptest::prelude::*;

fn capture(config: VmConfig) -> Vm<Vec<u8>> { Vm::with_output(config, Vec::new()) }

fn binary_chunk(a: f64, b: f64, op: OpCode) -> ChunkResult<Chunk> {
    let mut chunk = Chunk::new();
    chunk.emit_constant(a, 1)?;
    chunk.emit_constant(b, 1)?;
    chunk.write_op(op, 1);
    chunk.write_op(OpCode::Return, 1);
    Ok(chunk)
}

#[test]
fn arithmetic_program() -> ChunkResult<()> {
    let mut chunk = Chunk::new();
    chunk.emit_constant(1.2, 123)?;
    chunk.emit_constant(3.4, 123)?;
    chunk.write_op(OpCode::Add, 123);
    chunk.emit_constant(5.6, 123)?;
    chunk.write_op(OpCode::Divide, 123);
    chunk.write_op(OpCode::Negate, 123);
    chunk.write_op(OpCode::Return, 123);

    let mut vm = capture(VmConfig::default());
    let value = vm.run(&chunk).expect("program returns");
    assert_eq!(value, Value(-((1.2 + 3.4) / 5.6)));
    assert!((value.as_f64() + 0.821_428_571_428_571_4).abs() < 1e-12);
    assert_eq!(String::from_utf8_lossy(vm.output()), format!("{value}\n"));
    assert_eq!(vm.interpret(&chunk), InterpretResult::Ok);
    Ok(())
}

#[test]
fn division_by_zero_is_not_an_error() -> ChunkResult<()> {
    let mut vm = capture(VmConfig::default());

    let inf = vm.run(&binary_chunk(1.0, 0.0, OpCode::Divide)?).expect("no trap");
    assert_eq!(inf.as_f64(), f64::INFINITY);

    let neg_inf = vm.run(&binary_chunk(-3.0, 0.0, OpCode::Divide)?).expect("no trap");
    assert_eq!(neg_inf.as_f64(), f64::NEG_INFINITY);

    let nan = vm.run(&binary_chunk(0.0, 0.0, OpCode::Divide)?).expect("no trap");
    assert!(nan.as_f64().is_nan());
    assert!(String::from_utf8_lossy(vm.output()).ends_with("NaN\n"));
    Ok(())
}

#[test]
fn validation_agrees_with_runtime_on_bad_bytes() {
    let mut chunk = Chunk::new();
    chunk.write(255, 1);

    assert!(validate_chunk(&chunk).is_err());
    let mut vm = capture(VmConfig::default());
    assert!(matches!(vm.run(&chunk), Err(VmError::UnknownOpcode { byte: 255, offset: 0 })));
    assert_eq!(vm.ip(), 1);
}

#[test]
fn independent_vms_on_separate_threads() -> ChunkResult<()> {
    let chunk = binary_chunk(6.0, 7.0, OpCode::Multiply)?;
    let results: Vec<Value> = thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| capture(VmConfig::default()).run(&chunk).expect("runs")))
            .collect();
        handles.into_iter().map(|h| h.join().expect("thread")).collect()
    });
    assert_eq!(results, vec![Value(42.0); 4]);
    Ok(())
}

fn op_strategy() -> impl Strategy<Value = OpCode> {
    prop_oneof![
        Just(OpCode::Add),
        Just(OpCode::Subtract),
        Just(OpCode::Multiply),
        Just(OpCode::Divide),
    ]
}

fn apply(op: OpCode, a: f64, b: f64) -> f64 {
    match op {
        OpCode::Add => a + b,
        OpCode::Subtract => a - b,
        OpCode::Multiply => a * b,
        OpCode::Divide => a / b,
        other => unreachable!("not a binary op: {other}"),
    }
}

proptest! {
    #[test]
    fn binary_ops_use_push_order(a in -1e6f64..1e6, b in -1e6f64..1e6, op in op_strategy()) {
        let chunk = binary_chunk(a, b, op).expect("two constants fit");
        let got = capture(VmConfig::default()).run(&chunk).expect("well-formed");
        prop_assert!(got.same_bits(Value(apply(op, a, b))));
    }

    #[test]
    fn trace_does_not_change_results(values in prop::collection::vec(-100f64..100.0, 1..16)) {
        let mut chunk = Chunk::new();
        chunk.emit_constant(values[0], 1).expect("pool has room");
        for v in &values[1..] {
            chunk.emit_constant(*v, 2).expect("pool has room");
            chunk.write_op(OpCode::Add, 2);
        }
        chunk.write_op(OpCode::Negate, 3);
        chunk.write_op(OpCode::Return, 3);

        let plain = capture(VmConfig::default()).run(&chunk).expect("runs");
        let traced = capture(VmConfig::default().with_trace(true)).run(&chunk).expect("runs");
        prop_assert!(plain.same_bits(traced));
    }
}
