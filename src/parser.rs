//! Line-oriented assembly parser.
//!
//! One instruction per line; `;` introduces a trailing comment. An
//! optional label, the mnemonic, an optional `.size` suffix, and 0-2
//! comma-separated operands follow in order. Parsing is entirely
//! single-pass and line-local — there is no symbol table, so an
//! identifier that isn't a register or number literal is treated as a
//! forward label reference and parses to the numeric value 0.

use crate::ea::{Ea, IndexField, IndexSize, Other};
use crate::error::Error;
use crate::instruction::Instruction;
use crate::opcodes::Opcode;
use crate::registers::Reg;

/// Strip a `;`-comment (if any) and trailing whitespace.
#[must_use]
pub fn remove_comment(line: &str) -> &str {
    let cut = line.find(';').unwrap_or(line.len());
    line[..cut].trim_end()
}

struct Cursor {
    chars: Vec<char>,
    pos: usize,
    line_no: usize,
}

impl Cursor {
    fn new(line: &str, line_no: usize) -> Self {
        Self {
            chars: line.chars().collect(),
            pos: 0,
            line_no,
        }
    }

    fn eof(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn skip_space(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn remaining(&self) -> String {
        self.chars[self.pos.min(self.chars.len())..].iter().collect()
    }

    fn err(&self, message: impl Into<String>) -> Error {
        Error::parse(self.line_no, self.pos, message.into(), self.remaining())
    }

    fn expect_not_eof(&self, context: &str) -> Result<(), Error> {
        if self.eof() {
            Err(self.err(format!("unexpected end of line while {context}")))
        } else {
            Ok(())
        }
    }

    fn expect_char(&mut self, ch: char) -> Result<(), Error> {
        if self.peek() == Some(ch) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.err(format!("expected '{ch}'")))
        }
    }

    fn take_while(&mut self, mut pred: impl FnMut(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if pred(c) {
                out.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        out
    }

    /// Register name: `d0`-`d7`, `a0`-`a7`, or `pc` (case-insensitive).
    /// Consumes on success; leaves position untouched on failure.
    fn try_parse_reg(&mut self) -> Option<Reg> {
        let start = self.pos;
        let first = self.peek()?.to_ascii_lowercase();
        if first == 'p' {
            let second = self.chars.get(self.pos + 1).copied()?.to_ascii_lowercase();
            if second == 'c' {
                self.pos += 2;
                return Some(Reg::pc());
            }
            self.pos = start;
            return None;
        }
        if first == 'd' || first == 'a' {
            let digit = self.chars.get(self.pos + 1).copied()?;
            if digit.is_ascii_digit() && digit <= '7' {
                self.pos += 2;
                return Some(if first == 'd' {
                    Reg::data(digit as u8 - b'0')
                } else {
                    Reg::addr(digit as u8 - b'0')
                });
            }
        }
        self.pos = start;
        None
    }

    /// Decimal, `$hex`, or `%binary` literal with optional leading `-`.
    /// An identifier that is none of those parses as 0 (forward label
    /// reference).
    fn parse_number(&mut self) -> Result<u32, Error> {
        self.expect_not_eof("parsing a number")?;
        let mut neg = false;
        if self.peek() == Some('-') {
            neg = true;
            self.pos += 1;
            self.expect_not_eof("parsing a number")?;
        }

        let radix = match self.peek() {
            Some('$') => {
                self.pos += 1;
                16
            }
            Some('%') => {
                self.pos += 1;
                2
            }
            Some(c) if c.is_ascii_digit() => 10,
            _ => {
                // Named constant: consume an identifier and treat it as 0.
                self.bump();
                self.take_while(|c| c.is_alphanumeric() || c == '_');
                return Ok(0);
            }
        };

        self.expect_not_eof("parsing a number")?;
        let mut value: u32 = 0;
        let mut any = false;
        while let Some(c) = self.peek() {
            let digit = match c {
                '0'..='9' => u32::from(c as u8 - b'0'),
                'a'..='f' => u32::from(c as u8 - b'a') + 10,
                'A'..='F' => u32::from(c as u8 - b'A') + 10,
                _ => break,
            };
            if digit >= radix {
                break;
            }
            value = value.wrapping_mul(radix).wrapping_add(digit);
            any = true;
            self.pos += 1;
        }
        if !any {
            return Err(self.err("expected digits"));
        }
        Ok(if neg { value.wrapping_neg() } else { value })
    }

    fn parse_ea(&mut self) -> Result<Ea, Error> {
        self.expect_not_eof("parsing an operand")?;
        if self.peek() == Some('#') {
            self.pos += 1;
            self.expect_not_eof("parsing an immediate")?;
            let value = self.parse_number()?;
            return Ok(Ea::Other(Other::Immediate(value)));
        }

        if let Some(reg) = self.try_parse_reg() {
            if reg.is_pc() {
                return Err(self.err("bare pc is not a valid operand"));
            }
            return Ok(if reg.is_areg() { Ea::An(reg) } else { Ea::Dn(reg) });
        }

        let mut dispval: Option<u32> = None;
        if self.peek() != Some('(') {
            dispval = Some(self.parse_number()?);
            if self.eof() || self.peek() == Some(',') {
                return Ok(Ea::Other(Other::AbsLong(dispval.unwrap())));
            }
        }

        self.expect_not_eof("parsing an indirect operand")?;
        if self.peek() != Some('(') {
            return Err(self.err("unhandled operand form"));
        }
        self.pos += 1;
        self.expect_not_eof("parsing a base register")?;
        let base = self.try_parse_reg().filter(|r| r.is_areg()).ok_or_else(|| self.err("invalid base register"))?;

        self.expect_not_eof("parsing an indirect operand")?;
        if self.peek() == Some(')') {
            self.pos += 1;
            if self.peek() == Some('+') {
                if dispval.is_some() {
                    return Err(self.err("displacement not allowed with post-increment"));
                }
                self.pos += 1;
                return Ok(Ea::IndPostInc(base));
            }
            if let Some(raw) = dispval.filter(|v| *v != 0) {
                let d = raw as i32;
                if !(-32768..=32767).contains(&d) {
                    return Err(self.err("displacement out of range"));
                }
                return Ok(Ea::IndDisp(base, d as i16));
            }
            return Ok(Ea::Ind(base));
        }

        self.expect_char(',')?;
        self.expect_not_eof("parsing an index register")?;
        let index = self.try_parse_reg().filter(|r| !r.is_pc()).ok_or_else(|| self.err("invalid index register"))?;

        let mut size = IndexSize::Word;
        self.expect_not_eof("parsing an indexed operand")?;
        if self.peek() == Some('.') {
            self.pos += 1;
            self.expect_not_eof("parsing an index size")?;
            match self.bump().map(|c| c.to_ascii_lowercase()) {
                Some('l') => size = IndexSize::Long,
                Some('w') => size = IndexSize::Word,
                _ => return Err(self.err("invalid index size")),
            }
        }

        self.expect_not_eof("parsing an indexed operand")?;
        let mut scale: u8 = 1;
        if self.peek() == Some('*') {
            self.pos += 1;
            self.expect_not_eof("parsing a scale factor")?;
            let digit = self.bump().ok_or_else(|| self.err("expected a scale factor"))?;
            scale = match digit {
                '1' | '2' | '4' | '8' => digit as u8 - b'0',
                _ => return Err(self.err("invalid scale factor")),
            };
        }
        self.expect_char(')')?;

        let disp = if let Some(raw) = dispval {
            let d = raw as i32;
            if !(-128..=127).contains(&d) {
                return Err(self.err("displacement out of range"));
            }
            d as i8
        } else {
            0
        };

        Ok(Ea::IndIndex(base, IndexField { index, size, scale, disp }))
    }
}

fn is_ident_char(c: char) -> bool {
    !c.is_whitespace() && c != ':' && c != '.'
}

fn do_parse(line: &str, line_no: usize) -> Result<Option<Instruction>, Error> {
    let mut cur = Cursor::new(line, line_no);
    cur.skip_space();
    if cur.eof() {
        return Ok(None);
    }

    let first_token = cur.take_while(is_ident_char);
    let mnemonic = if cur.peek() == Some(':') {
        cur.pos += 1;
        cur.skip_space();
        if cur.eof() {
            return Ok(None);
        }
        cur.take_while(is_ident_char)
    } else if Opcode::from_name(&first_token.to_ascii_lowercase()).is_some() {
        first_token
    } else {
        // Not a recognized opcode: treat as a bare label (no trailing colon).
        cur.skip_space();
        if cur.eof() {
            return Ok(None);
        }
        cur.take_while(is_ident_char)
    };

    let mnemonic_lower = mnemonic.to_ascii_lowercase();
    let opcode = Opcode::from_name(&mnemonic_lower).ok_or_else(|| cur.err(format!("unknown opcode \"{mnemonic}\"")))?;

    let mut size: Option<char> = None;
    if cur.peek() == Some('.') {
        cur.pos += 1;
        cur.expect_not_eof("parsing a size suffix")?;
        let ch = cur.bump().unwrap().to_ascii_lowercase();
        if !matches!(ch, 's' | 'b' | 'w' | 'l') {
            return Err(cur.err("unrecognized size suffix"));
        }
        size = Some(ch);
    }

    cur.skip_space();
    let mut ea1 = None;
    let mut ea2 = None;
    if !cur.eof() {
        ea1 = Some(cur.parse_ea()?);
        cur.skip_space();
        if cur.peek() == Some(',') {
            cur.pos += 1;
            cur.skip_space();
            ea2 = Some(cur.parse_ea()?);
            cur.skip_space();
        }
    }

    let got = u8::from(ea1.is_some()) + u8::from(ea2.is_some());
    if got != opcode.num_ea() {
        return Err(cur.err(format!(
            "wrong number of operands for {mnemonic_lower}: expected {}, got {got}",
            opcode.num_ea()
        )));
    }

    if !cur.eof() {
        return Err(cur.err("junk at end of line"));
    }

    let instr = match (ea1, ea2) {
        (Some(e1), Some(e2)) => Instruction::new2(opcode, size, e1, e2)?,
        (Some(e1), None) => Instruction::new1(opcode, size, e1)?,
        (None, None) => Instruction::new0(opcode, size)?,
        (None, Some(_)) => unreachable!("operand count already validated"),
    };
    Ok(Some(instr))
}

/// Parse one source line (after comment/whitespace stripping is applied
/// by the caller via [`remove_comment`], or pass raw text — comments are
/// stripped here too). Returns `None` for blank, comment-only, or
/// label-only lines.
pub fn parse_line(raw_line: &str, line_no: usize) -> Result<Option<Instruction>, Error> {
    tracing::debug!(line_no, text = raw_line, "parsing line");
    let line = remove_comment(raw_line);
    do_parse(line, line_no)
}

/// Parse an entire program, one instruction per non-blank line.
pub fn parse_program(text: &str) -> Result<Vec<Instruction>, Error> {
    let mut out = Vec::new();
    for (i, raw_line) in text.lines().enumerate() {
        if let Some(instr) = parse_line(raw_line, i + 1)? {
            out.push(instr);
        }
    }
    Ok(out)
}
