use crate::chunk::op_codes::OpCode;
use crate::objects::{Object, Value};
use crate::virtual_machine::{RuntimeErrorType, RuntimeResult, VirtualMachine};

impl VirtualMachine {
    /// Executes the instructions in the loaded chunk until a `Return`
    /// instruction or a runtime error ends the run.
    pub(crate) fn run(&mut self) -> RuntimeResult {
        loop {
            let instruction = match self.get_next_op_code() {
                Some(instruction) => instruction,
                None => {
                    return RuntimeResult::Error {
                        error: RuntimeErrorType::Internal,
                        message: String::from("Unknown instruction."),
                    }
                }
            };

            #[cfg(feature = "debug-execution")]
            self.print_execution(instruction);

            let exec = match instruction {
                // Value loaders
                OpCode::Constant => self.op_constant(),
                OpCode::False => self.push_stack(Value::Bool(false)),
                OpCode::Nil => self.push_stack(Value::Nil),
                OpCode::True => self.push_stack(Value::Bool(true)),

                OpCode::Pop => {
                    self.pop_stack();
                    RuntimeResult::Continue
                }

                // Global declarations
                OpCode::DefineGlobal => self.op_define_global(),
                OpCode::GetGlobal => self.op_get_global(),
                OpCode::SetGlobal => self.op_set_global(),

                // Local declarations
                OpCode::GetLocal => self.op_get_local(),
                OpCode::SetLocal => self.op_set_local(),

                // Operators
                OpCode::Add => self.op_add(),
                OpCode::Equal => self.op_equal(),
                OpCode::Negate => self.op_negate(),
                OpCode::Not => self.op_not(),
                OpCode::Divide
                | OpCode::Greater
                | OpCode::Less
                | OpCode::Multiply
                | OpCode::Subtract => self.op_binary_numeric(instruction),

                // Jumps
                OpCode::Jump => self.op_jump(),
                OpCode::JumpIfFalse => self.op_jump_if_false(),
                OpCode::Loop => self.op_loop(),

                OpCode::Print => self.op_print(),

                OpCode::Return => RuntimeResult::Ok,
            };

            match exec {
                RuntimeResult::Continue => continue,
                _ => return exec,
            }
        }
    }

    /// Executes the instruction to load a constant onto the stack.
    fn op_constant(&mut self) -> RuntimeResult {
        let constant = self.read_constant();
        self.push_stack(constant)
    }

    /// Executes the instruction to define a global variable with the
    /// value on top of the stack.
    fn op_define_global(&mut self) -> RuntimeResult {
        let name = self.read_string();
        let value = self.peek_stack(0).clone();

        self.globals.set(name, value);
        self.pop_stack();

        RuntimeResult::Continue
    }

    /// Executes the instruction to load the value of a global variable.
    fn op_get_global(&mut self) -> RuntimeResult {
        let name = self.read_string();

        let value = match self.globals.get(&name) {
            Some(value) => value.clone(),
            None => {
                return RuntimeResult::Error {
                    error: RuntimeErrorType::ReferenceError,
                    message: format!("Undefined variable '{}'.", name),
                }
            }
        };

        self.push_stack(value)
    }

    /// Executes the instruction to reassign a global variable.
    /// Assignment never declares: when the insert reports a fresh key
    /// the entry is removed again and the reference is an error.
    fn op_set_global(&mut self) -> RuntimeResult {
        let name = self.read_string();
        let value = self.peek_stack(0).clone();

        if self.globals.set(name.clone(), value) {
            self.globals.delete(&name);

            return RuntimeResult::Error {
                error: RuntimeErrorType::ReferenceError,
                message: format!("Undefined variable '{}'.", name),
            };
        }

        // Assignment is an expression; the value stays on the stack.
        RuntimeResult::Continue
    }

    /// Executes the instruction to load a local variable from its stack
    /// slot.
    fn op_get_local(&mut self) -> RuntimeResult {
        let slot = self.get_next_byte() as usize;
        let value = self.stack[slot].clone();

        self.push_stack(value)
    }

    /// Executes the instruction to write the top of the stack into a
    /// local's slot. The value stays on the stack because assignment is
    /// an expression.
    fn op_set_local(&mut self) -> RuntimeResult {
        let slot = self.get_next_byte() as usize;
        self.stack[slot] = self.peek_stack(0).clone();

        RuntimeResult::Continue
    }

    /// Executes the instruction to add the two topmost values. Numbers
    /// add arithmetically; strings concatenate into a newly interned
    /// string.
    fn op_add(&mut self) -> RuntimeResult {
        if self.peek_stack(0).is_string() && self.peek_stack(1).is_string() {
            let b = self.pop_stack();
            let a = self.pop_stack();

            match (a, b) {
                (Value::Obj(Object::Str(a)), Value::Obj(Object::Str(b))) => {
                    let result = self.heap.intern(&format!("{}{}", a, b));
                    self.push_stack(Value::Obj(Object::Str(result)))
                }
                _ => panic!("Operands were checked to be strings!"),
            }
        } else if self.peek_stack(0).is_number() && self.peek_stack(1).is_number() {
            let b = self.pop_number();
            let a = self.pop_number();

            self.push_stack(Value::Number(a + b))
        } else {
            RuntimeResult::Error {
                error: RuntimeErrorType::TypeError,
                message: String::from("Operands must be two numbers or two strings."),
            }
        }
    }

    /// Executes a binary instruction that only accepts numeric operands.
    /// Division follows IEEE semantics, so dividing by zero yields an
    /// infinity rather than an error.
    fn op_binary_numeric(&mut self, instruction: OpCode) -> RuntimeResult {
        if !self.peek_stack(0).is_number() || !self.peek_stack(1).is_number() {
            return RuntimeResult::Error {
                error: RuntimeErrorType::TypeError,
                message: String::from("Operands must be numbers."),
            };
        }

        let b = self.pop_number();
        let a = self.pop_number();

        match instruction {
            OpCode::Divide => self.push_stack(Value::Number(a / b)),
            OpCode::Greater => self.push_stack(Value::Bool(a > b)),
            OpCode::Less => self.push_stack(Value::Bool(a < b)),
            OpCode::Multiply => self.push_stack(Value::Number(a * b)),
            OpCode::Subtract => self.push_stack(Value::Number(a - b)),
            _ => panic!("Instruction is not a numeric binary operator!"),
        }
    }

    /// Executes the instruction to compare the two topmost values for
    /// equality.
    fn op_equal(&mut self) -> RuntimeResult {
        let b = self.pop_stack();
        let a = self.pop_stack();

        self.push_stack(Value::Bool(a == b))
    }

    /// Executes the instruction to arithmetically negate the top of the
    /// stack.
    fn op_negate(&mut self) -> RuntimeResult {
        if !self.peek_stack(0).is_number() {
            return RuntimeResult::Error {
                error: RuntimeErrorType::TypeError,
                message: String::from("Operand must be a number."),
            };
        }

        let value = self.pop_number();
        self.push_stack(Value::Number(-value))
    }

    /// Executes the instruction to logically negate the top of the
    /// stack.
    fn op_not(&mut self) -> RuntimeResult {
        let value = self.pop_stack();
        self.push_stack(Value::Bool(value.is_falsey()))
    }

    /// Executes the instruction to jump forward by the given offset.
    fn op_jump(&mut self) -> RuntimeResult {
        let offset = self.get_next_short() as usize;
        self.ip += offset;

        RuntimeResult::Continue
    }

    /// Executes the instruction to jump forward by the given offset when
    /// the top of the stack is falsey. The condition value is left on
    /// the stack; the surrounding bytecode pops it on both paths.
    fn op_jump_if_false(&mut self) -> RuntimeResult {
        let offset = self.get_next_short() as usize;

        if self.peek_stack(0).is_falsey() {
            self.ip += offset;
        }

        RuntimeResult::Continue
    }

    /// Executes the instruction to jump (loop) back by the given offset.
    fn op_loop(&mut self) -> RuntimeResult {
        let offset = self.get_next_short() as usize;
        self.ip -= offset;

        RuntimeResult::Continue
    }

    /// Executes the instruction to print the top of the stack.
    fn op_print(&mut self) -> RuntimeResult {
        println!("{}", self.pop_stack());
        RuntimeResult::Continue
    }
}
