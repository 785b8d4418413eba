//! Interpreter for generated programs.

use crate::errors::{TapeError, TapeResult};

pub const TAPE_SIZE: usize = 30000;

pub struct Tape<'a> {
    cells: Vec<u8>,
    ptr: usize,
    code: Vec<char>,
    jumps: Vec<usize>,
    pc: usize,
    input: &'a [u8],
    output: Vec<u8>,
    max_steps: Option<u64>,
}

impl<'a> Tape<'a> {
    /// Loads a program. Brackets are matched up front.
    pub fn new(code: &str, input: &'a [u8]) -> TapeResult<Self> {
        let code: Vec<char> = code.chars().collect();
        let jumps = match_brackets(&code)?;
        Ok(Tape {
            cells: vec![0; TAPE_SIZE],
            ptr: 0,
            code,
            jumps,
            pc: 0,
            input,
            output: Vec::new(),
            max_steps: None,
        })
    }

    pub fn with_step_limit(mut self, max_steps: u64) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    pub fn cells(&self, n: usize) -> &[u8] {
        &self.cells[..n.min(self.cells.len())]
    }

    pub fn output(&self) -> &[u8] {
        &self.output
    }

    pub fn run(&mut self) -> TapeResult<()> {
        let mut steps: u64 = 0;
        while self.pc < self.code.len() {
            if let Some(max) = self.max_steps {
                if steps == max {
                    return Err(TapeError::StepLimitExceeded(max));
                }
            }
            self.step()?;
            self.pc += 1;
            steps += 1;
        }
        Ok(())
    }

    fn step(&mut self) -> TapeResult<()> {
        match self.code[self.pc] {
            '>' => {
                if self.ptr + 1 >= self.cells.len() {
                    return Err(TapeError::PointerOutOfBounds { pc: self.pc });
                }
                self.ptr += 1;
            }
            '<' => {
                if self.ptr == 0 {
                    return Err(TapeError::PointerOutOfBounds { pc: self.pc });
                }
                self.ptr -= 1;
            }
            '+' => self.cells[self.ptr] = self.cells[self.ptr].wrapping_add(1),
            '-' => self.cells[self.ptr] = self.cells[self.ptr].wrapping_sub(1),
            '.' => self.output.push(self.cells[self.ptr]),
            ',' => {
                self.cells[self.ptr] = match self.input.split_first() {
                    Some((&byte, rest)) => {
                        self.input = rest;
                        byte
                    }
                    None => 0, // EOF
                };
            }
            '[' if self.cells[self.ptr] == 0 => self.pc = self.jumps[self.pc],
            ']' if self.cells[self.ptr] != 0 => self.pc = self.jumps[self.pc],
            _ => {} // Ignore other characters
        }
        Ok(())
    }
}

// Partner index for every bracket
fn match_brackets(code: &[char]) -> TapeResult<Vec<usize>> {
    let mut jumps = vec![0; code.len()];
    let mut open = Vec::new();
    for (pc, &c) in code.iter().enumerate() {
        match c {
            '[' => open.push(pc),
            ']' => {
                let start = open
                    .pop()
                    .ok_or(TapeError::UnmatchedBracket { bracket: ']', pc })?;
                jumps[start] = pc;
                jumps[pc] = start;
            }
            _ => {}
        }
    }
    match open.pop() {
        Some(pc) => Err(TapeError::UnmatchedBracket { bracket: '[', pc }),
        None => Ok(jumps),
    }
}

/// Runs a program to completion and returns what it printed.
pub fn execute(code: &str, input: &[u8]) -> TapeResult<Vec<u8>> {
    let mut tape = Tape::new(code, input)?;
    tape.run()?;
    Ok(tape.output)
}
