use crate::chunk::op_codes::OpCode;
use crate::chunk::Chunk;
use crate::compiler::Compiler;
use crate::objects::{Heap, Object, Value};
use crate::table::Table;
use std::rc::Rc;

// Submodules
mod run;

/// The number of value slots the stack starts out with. Every local
/// slot an instruction can address fits inside this bound.
pub const STACK_MAX: usize = 256;

/// The types of results the interpreter can return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpretResult {
    CompileError,
    Ok,
    RuntimeError,
}

/// The kinds of errors a program can raise while it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeErrorType {
    Internal,
    ReferenceError,
    TypeError,
}

/// The result of executing a single instruction, or of a whole run.
pub enum RuntimeResult {
    Continue,
    Error {
        error: RuntimeErrorType,
        message: String,
    },
    Ok,
}

/// Represents a virtual machine: the chunk being executed, the operand
/// stack, the globals table, and the heap shared with the compiler.
pub struct VirtualMachine {
    pub(crate) chunk: Chunk,
    pub(crate) ip: usize,
    pub(crate) stack: Vec<Value>,
    pub(crate) globals: Table,
    pub(crate) heap: Heap,
}

impl VirtualMachine {
    /// Creates a virtual machine with no program loaded.
    pub fn new() -> Self {
        Self {
            chunk: Chunk::new(),
            ip: 0,
            stack: Vec::with_capacity(STACK_MAX),
            globals: Table::new(),
            heap: Heap::new(),
        }
    }

    /// Compiles and runs a source string. Globals and interned strings
    /// survive between calls, so a REPL can feed one machine repeatedly.
    ///
    /// # Returns
    /// `InterpretResult` – The result of the source interpretation.
    pub fn interpret(&mut self, source: &str) -> InterpretResult {
        let chunk = match Compiler::compile(source, &mut self.heap) {
            Ok(chunk) => chunk,
            Err(()) => return InterpretResult::CompileError,
        };

        self.chunk = chunk;
        self.ip = 0;

        match self.run() {
            RuntimeResult::Ok => InterpretResult::Ok,
            RuntimeResult::Error { message, .. } => {
                self.report_runtime_error(&message);
                InterpretResult::RuntimeError
            }
            RuntimeResult::Continue => {
                unreachable!("The dispatch loop only returns a final result.")
            }
        }
    }

    /// Decodes the opcode at the instruction pointer and moves past it.
    fn get_next_op_code(&mut self) -> Option<OpCode> {
        let code = self.chunk.get_op_code(self.ip);
        self.ip += 1;
        code
    }

    /// Reads the one-byte operand at the instruction pointer.
    fn get_next_byte(&mut self) -> u8 {
        let byte = match self.chunk.get_byte(self.ip) {
            Some(byte) => byte,
            None => panic!("Chunk ended inside an instruction!"),
        };
        self.ip += 1;
        byte
    }

    /// Reads the two-byte operand at the instruction pointer.
    fn get_next_short(&mut self) -> u16 {
        let short = match self.chunk.get_short(self.ip) {
            Some(short) => short,
            None => panic!("Chunk ended inside an instruction!"),
        };
        self.ip += 2;
        short
    }

    /// Reads a one-byte constant-pool index and loads the constant.
    fn read_constant(&mut self) -> Value {
        let idx = self.get_next_byte() as usize;

        match self.chunk.get_constant(idx) {
            Some(value) => value.clone(),
            None => panic!("Constant index out of range!"),
        }
    }

    /// Reads a constant that the compiler guarantees to be a string,
    /// such as a variable name.
    fn read_string(&mut self) -> Rc<str> {
        match self.read_constant() {
            Value::Obj(Object::Str(string)) => string,
            _ => panic!("Expected a string constant!"),
        }
    }

    fn push_stack(&mut self, new_val: Value) -> RuntimeResult {
        self.stack.push(new_val);
        RuntimeResult::Continue
    }

    fn pop_stack(&mut self) -> Value {
        match self.stack.pop() {
            Some(val) => val,
            None => panic!("Stack is empty!"),
        }
    }

    /// Pops an operand the dispatch loop has already checked to be a
    /// number.
    fn pop_number(&mut self) -> f64 {
        match self.pop_stack() {
            Value::Number(num) => num,
            _ => panic!("Operand was checked to be a number!"),
        }
    }

    /// Looks at a value `distance` slots down from the top of the stack
    /// without popping it.
    fn peek_stack(&self, distance: usize) -> &Value {
        &self.stack[self.stack.len() - 1 - distance]
    }

    fn reset_stack(&mut self) {
        self.stack.clear();
    }

    /// Reports a runtime error to the console with the source line of
    /// the failing instruction, then resets the stack.
    fn report_runtime_error(&mut self, message: &str) {
        eprintln!("{}", message);

        let line = self.chunk.get_line(self.ip - 1);
        eprintln!("[line {}] in script", line);

        self.reset_stack();
    }

    /// Prints the execution trace for the program. Useful for debugging
    /// the VM.
    #[cfg(feature = "debug-execution")]
    fn print_execution(&self, instr: OpCode) {
        print!("stack\t[");
        for val in self.stack.iter() {
            print!(" {};", val);
        }
        println!(" ]");

        println!("OpCode:\t\x1b[36m{:?}\x1b[0m\tIP: {:>04}", instr, self.ip - 1);
    }
}
