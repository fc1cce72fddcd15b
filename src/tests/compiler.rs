use crate::chunk::op_codes::OpCode;
use crate::chunk::Chunk;
use crate::compiler::Compiler;
use crate::objects::Heap;

fn compile(src: &str) -> Result<Chunk, ()> {
    let mut heap = Heap::new();
    Compiler::compile(src, &mut heap)
}

fn compile_ok(src: &str) -> Chunk {
    match compile(src) {
        Ok(chunk) => chunk,
        Err(()) => panic!("Compiler Had Errors."),
    }
}

/// The number of operand bytes that follow an instruction.
fn operand_width(op: OpCode) -> usize {
    match op {
        OpCode::Constant
        | OpCode::DefineGlobal
        | OpCode::GetGlobal
        | OpCode::GetLocal
        | OpCode::SetGlobal
        | OpCode::SetLocal => 1,
        OpCode::Jump | OpCode::JumpIfFalse | OpCode::Loop => 2,
        _ => 0,
    }
}

/// Decodes a chunk back into its instruction sequence.
fn op_codes_of(chunk: &Chunk) -> Vec<OpCode> {
    let mut ops = vec![];
    let mut idx = 0;

    while idx < chunk.len() {
        let op = match chunk.get_op_code(idx) {
            Some(op) => op,
            None => panic!("Chunk contains an undecodable byte."),
        };

        ops.push(op);
        idx += 1 + operand_width(op);
    }

    ops
}

#[test]
fn empty_source_compiles_to_a_bare_return() {
    let chunk = compile_ok("");

    assert_eq!(chunk.len(), 1);
    assert_eq!(chunk.get_op_code(0), Some(OpCode::Return));
}

#[test]
fn compiled_chunks_end_with_return() {
    let chunk = compile_ok("print 1 + 2;");
    assert_eq!(chunk.get_op_code(chunk.len() - 1), Some(OpCode::Return));
}

#[test]
fn arithmetic_respects_precedence() {
    let chunk = compile_ok("1 + 2 * 3;");

    assert_eq!(
        op_codes_of(&chunk),
        vec![
            OpCode::Constant,
            OpCode::Constant,
            OpCode::Constant,
            OpCode::Multiply,
            OpCode::Add,
            OpCode::Pop,
            OpCode::Return,
        ]
    );
}

#[test]
fn relaxed_comparisons_compile_to_negated_strict_ones() {
    let chunk = compile_ok("1 <= 2;");
    assert_eq!(
        op_codes_of(&chunk),
        vec![
            OpCode::Constant,
            OpCode::Constant,
            OpCode::Greater,
            OpCode::Not,
            OpCode::Pop,
            OpCode::Return,
        ]
    );

    let chunk = compile_ok("1 >= 2;");
    assert_eq!(op_codes_of(&chunk)[2..4], [OpCode::Less, OpCode::Not]);

    let chunk = compile_ok("1 != 2;");
    assert_eq!(op_codes_of(&chunk)[2..4], [OpCode::Equal, OpCode::Not]);
}

#[test]
fn logic_operators_compile_to_jumps() {
    let chunk = compile_ok("true and false;");
    assert_eq!(
        op_codes_of(&chunk),
        vec![
            OpCode::True,
            OpCode::JumpIfFalse,
            OpCode::Pop,
            OpCode::False,
            OpCode::Pop,
            OpCode::Return,
        ]
    );

    let chunk = compile_ok("true or false;");
    assert_eq!(
        op_codes_of(&chunk),
        vec![
            OpCode::True,
            OpCode::JumpIfFalse,
            OpCode::Jump,
            OpCode::Pop,
            OpCode::False,
            OpCode::Pop,
            OpCode::Return,
        ]
    );
}

#[test]
fn if_else_branches_pop_the_condition() {
    let chunk = compile_ok("if (true) 1; else 2;");

    assert_eq!(
        op_codes_of(&chunk),
        vec![
            OpCode::True,
            OpCode::JumpIfFalse,
            OpCode::Pop,
            OpCode::Constant,
            OpCode::Pop,
            OpCode::Jump,
            OpCode::Pop,
            OpCode::Constant,
            OpCode::Pop,
            OpCode::Return,
        ]
    );
}

#[test]
fn jump_operands_resolve_to_offsets_inside_the_chunk() {
    let sources = [
        "if (1 < 2) print 1; else print 2;",
        "while (true) print 1;",
        "for (var i = 0; i < 3; i = i + 1) print i;",
        "var a = true and false or true;",
    ];

    for src in sources {
        let chunk = compile_ok(src);
        let mut idx = 0;

        while idx < chunk.len() {
            let op = chunk.get_op_code(idx).unwrap();

            match op {
                OpCode::Jump | OpCode::JumpIfFalse => {
                    let offset = chunk.get_short(idx + 1).unwrap() as usize;
                    let target = idx + 3 + offset;
                    assert!(target < chunk.len(), "forward jump escapes the chunk in {:?}", src);
                }
                OpCode::Loop => {
                    let offset = chunk.get_short(idx + 1).unwrap() as usize;
                    assert!(offset <= idx + 3, "loop jump escapes the chunk in {:?}", src);
                }
                _ => {}
            }

            idx += 1 + operand_width(op);
        }
    }
}

#[test]
fn test_const_pool_no_duplicate_items() {
    let src = "8.9;".repeat(500);
    let chunk = compile_ok(src.as_str());

    assert_eq!(chunk.get_pool_size(), 1);
}

#[test]
fn global_accesses_share_one_name_constant() {
    // The pool holds "a", 1, and 2 exactly once each.
    let chunk = compile_ok("var a = 1; a = 2; print a;");
    assert_eq!(chunk.get_pool_size(), 3);
}

#[test]
fn every_code_byte_carries_a_source_line() {
    let chunk = compile_ok("print 1;\nprint 2;");

    for idx in 0..chunk.len() {
        assert!(chunk.get_line(idx) >= 1);
    }

    assert_eq!(chunk.get_line(0), 1);
    assert_eq!(chunk.get_line(chunk.len() - 1), 2);
}

#[test]
fn shadowing_initializer_reads_the_enclosing_local() {
    let chunk = compile_ok("{ var x = 10; { var x = x + 1; } }");

    assert_eq!(
        op_codes_of(&chunk),
        vec![
            OpCode::Constant,
            OpCode::GetLocal,
            OpCode::Constant,
            OpCode::Add,
            OpCode::Pop,
            OpCode::Pop,
            OpCode::Return,
        ]
    );

    // The inner initializer reads the outer local's slot.
    assert_eq!(chunk.get_byte(3), Some(0));
}

#[test]
fn reading_a_local_in_its_own_initializer_fails_without_an_outer_binding() {
    assert!(compile("{ var a = a; }").is_err());
}

#[test]
fn redeclaring_a_local_in_the_same_scope_fails() {
    assert!(compile("{ var a = 1; var a = 2; }").is_err());

    // Re-declaring in an inner scope is shadowing, which is fine.
    assert!(compile("{ var a = 1; { var a = 2; } }").is_ok());
}

#[test]
fn assignment_needs_a_valid_target() {
    assert!(compile("a + b = 1;").is_err());
    assert!(compile("1 = 2;").is_err());
}

#[test]
fn statements_need_their_semicolons() {
    assert!(compile("print 1").is_err());
    assert!(compile("var a = 1").is_err());
    assert!(compile("1 + 2").is_err());
}

#[test]
fn missing_expressions_are_reported() {
    assert!(compile("print ;").is_err());
    assert!(compile("(").is_err());
}

#[test]
fn reserved_words_do_not_parse_as_expressions() {
    assert!(compile("class;").is_err());
    assert!(compile("return;").is_err());
}

#[test]
fn too_many_local_variables_fails() {
    let mut src = String::from("{ ");
    for i in 0..260 {
        src.push_str(&format!("var a{} = 0; ", i));
    }
    src.push('}');

    assert!(compile(&src).is_err());
}

#[test]
fn too_many_constants_fails() {
    let mut src = String::new();
    for i in 0..300 {
        src.push_str(&format!("{}; ", i));
    }

    assert!(compile(&src).is_err());
}

#[test]
fn errors_recover_at_statement_boundaries() {
    // The first statement is broken; the second would be fine. The
    // compile still fails, but it must not loop or panic.
    assert!(compile("print ; var a = 1;").is_err());
}
