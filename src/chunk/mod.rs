use crate::chunk::op_codes::OpCode;
use crate::objects::Value;
use num_traits::FromPrimitive;

// Submodules
pub mod op_codes;

/// The maximum number of constants a single chunk can hold. Bytecode
/// operands address the pool with a single byte.
pub const MAX_CONSTANTS: usize = 256;

/// Contains all the necessary information about the instructions to be
/// executed: the raw bytecode, the source line each byte came from, and
/// the constant pool the bytecode indexes into.
pub struct Chunk {
    code: Vec<u8>,
    lines: Vec<usize>,
    constants: Vec<Value>,
}

impl Chunk {
    /// Creates a new chunk.
    pub fn new() -> Self {
        Self {
            code: vec![],
            lines: Vec::new(),
            constants: Vec::new(),
        }
    }

    /// Adds a constant to this chunk's constants pool.
    ///
    /// Equal values share a single pool slot, so re-adding a value hands
    /// back the index it already has.
    ///
    /// # Returns
    /// `Result<u8, ()>` – The position of the value in the pool, or an
    /// error when the pool has no slot left for a new value.
    pub fn add_constant(&mut self, value: Value) -> Result<u8, ()> {
        if let Some(pos) = self.constants.iter().position(|x| *x == value) {
            return Ok(pos as u8);
        }

        if self.constants.len() >= MAX_CONSTANTS {
            return Err(());
        }

        self.constants.push(value);
        Ok((self.constants.len() - 1) as u8)
    }

    /// Retrieves a constant from this chunk's constants pool.
    pub fn get_constant(&self, idx: usize) -> Option<&Value> {
        self.constants.get(idx)
    }

    /// Returns the OpCode associated with a byte in the instructions list.
    pub fn get_op_code(&self, idx: usize) -> Option<OpCode> {
        match self.code.get(idx) {
            Some(byte) => FromPrimitive::from_u8(*byte),
            None => None,
        }
    }

    /// Adds a bytecode instruction from a given OpCode into the
    /// instructions list, recording the source line it came from.
    pub fn push_op_code(&mut self, val: OpCode, line: usize) {
        self.code.push(val as u8);
        self.lines.push(line);
    }

    /// Retrieves a raw byte from the instructions list.
    pub fn get_byte(&self, idx: usize) -> Option<u8> {
        self.code.get(idx).copied()
    }

    /// Adds a raw byte into the instructions list, recording the source
    /// line it came from.
    pub fn push_byte(&mut self, val: u8, line: usize) {
        self.code.push(val);
        self.lines.push(line);
    }

    /// Retrieves the byte at the given index and the byte after it as a
    /// 16-bit short.
    pub fn get_short(&self, idx: usize) -> Option<u16> {
        let b1 = match self.code.get(idx) {
            Some(byte) => *byte,
            None => return None,
        };

        let b2 = match self.code.get(idx + 1) {
            Some(byte) => *byte,
            None => return None,
        };

        Some(u16::from_be_bytes([b1, b2]))
    }

    /// Splits a 16-bit integer into two bytes, and adds each individual
    /// byte in sequence into the instructions list.
    pub fn push_short(&mut self, val: u16, line: usize) {
        let short = val.to_be_bytes();

        self.push_byte(short[0], line);
        self.push_byte(short[1], line);
    }

    /// Modifies the byte value at the specified chunk index. Used to
    /// back-patch the placeholder operands of forward jumps.
    pub fn modify_byte(&mut self, idx: usize, new_val: u8) {
        self.code[idx] = new_val;
    }

    /// The source line the byte at the given index was compiled from.
    pub fn get_line(&self, idx: usize) -> usize {
        self.lines[idx]
    }

    /// Gets the length of the instructions list.
    pub fn len(&self) -> usize {
        self.code.len()
    }

    /// Gets the number of values in the constants pool.
    pub fn get_pool_size(&self) -> usize {
        self.constants.len()
    }
}

#[cfg(any(feature = "debug-bytecode", feature = "debug-execution"))]
impl Chunk {
    /// Disassembles the chunk, printing each instruction and its
    /// related information.
    ///
    /// # Parameters
    /// - `name`: The name to print for the current chunk.
    pub fn disassemble(&self, name: &str) {
        println!("==== {} ====", name);

        let mut current_line = 0;
        let mut idx = 0;

        while idx < self.len() {
            idx = self.disassemble_instruction(idx, &mut current_line);
        }

        println!();
    }

    /// Prints a single instruction and returns the offset of the next one.
    /// Prints a line number, or a vertical bar when the instruction is on
    /// the same line as the previous one.
    pub fn disassemble_instruction(&self, idx: usize, current_line: &mut usize) -> usize {
        let line = self.get_line(idx);
        if line != *current_line {
            print!("{:>03}\t", line);
            *current_line = line;
        } else {
            print!(" |\t");
        }

        print!("{:>04} ", idx);

        let instr = match self.get_op_code(idx) {
            Some(instr) => instr,
            None => {
                println!("<unknown {:#04X}>", self.get_byte(idx).unwrap());
                return idx + 1;
            }
        };

        print!("\x1b[36m{:?}\x1b[0m", instr);

        match instr {
            // Prints the value associated with a constant-pool operand.
            OpCode::Constant | OpCode::DefineGlobal | OpCode::GetGlobal | OpCode::SetGlobal => {
                let pos = self.get_byte(idx + 1).unwrap() as usize;
                println!("\t{} ---> {}", pos, self.get_constant(pos).unwrap());
                idx + 2
            }

            OpCode::GetLocal | OpCode::SetLocal => {
                println!("\t{}", self.get_byte(idx + 1).unwrap());
                idx + 2
            }

            // Jump operands print as the target offset they resolve to.
            OpCode::Jump | OpCode::JumpIfFalse => {
                let offset = self.get_short(idx + 1).unwrap() as usize;
                println!("\t{}", idx + 3 + offset);
                idx + 3
            }

            OpCode::Loop => {
                let offset = self.get_short(idx + 1).unwrap() as usize;
                println!("\t{}", (idx + 3) - offset);
                idx + 3
            }

            _ => {
                println!();
                idx + 1
            }
        }
    }
}
