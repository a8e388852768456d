//! Instruction model: opcode, size suffix, and 0-2 effective addresses.

use crate::ea::{Ea, Other};
use crate::error::Error;
use crate::opcodes::{OepClass, Opcode};
use crate::registers::Reg;

/// Resource an instruction uses a register as, for 060 conflict checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// Integer execution read port (`Dn`/`An` operand).
    AB,
    /// Address-generation base register.
    Base,
    /// Address-generation index register.
    Index,
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resource::AB => write!(f, "A/B"),
            Resource::Base => write!(f, "Base"),
            Resource::Index => write!(f, "Index"),
        }
    }
}

/// 0, 1, or 2 effective-address operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operands {
    Zero,
    One(Ea),
    Two(Ea, Ea),
}

impl Operands {
    fn len(self) -> u8 {
        match self {
            Operands::Zero => 0,
            Operands::One(_) => 1,
            Operands::Two(..) => 2,
        }
    }
}

/// An immutable instruction value, built once by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    op: Opcode,
    size: Option<char>,
    operands: Operands,
}

fn valid_size(size: Option<char>) -> bool {
    matches!(size, None | Some('s' | 'b' | 'w' | 'l'))
}

impl Instruction {
    /// Build a zero-operand instruction.
    pub fn new0(op: Opcode, size: Option<char>) -> Result<Self, Error> {
        Self::build(op, size, Operands::Zero)
    }

    /// Build a one-operand instruction.
    pub fn new1(op: Opcode, size: Option<char>, ea: Ea) -> Result<Self, Error> {
        Self::build(op, size, Operands::One(ea))
    }

    /// Build a two-operand instruction, `(source, destination)`.
    pub fn new2(op: Opcode, size: Option<char>, src: Ea, dst: Ea) -> Result<Self, Error> {
        Self::build(op, size, Operands::Two(src, dst))
    }

    fn build(op: Opcode, size: Option<char>, operands: Operands) -> Result<Self, Error> {
        if !valid_size(size) {
            return Err(Error::invariant("invalid size suffix"));
        }
        if operands.len() != op.num_ea() {
            return Err(Error::invariant("operand count mismatch"));
        }
        Ok(Self { op, size, operands })
    }

    #[must_use]
    pub fn op(&self) -> Opcode {
        self.op
    }

    #[must_use]
    pub fn opsize(&self) -> Option<char> {
        self.size
    }

    /// First (or, for a two-operand instruction, source) operand.
    #[must_use]
    pub fn src(&self) -> Option<&Ea> {
        match &self.operands {
            Operands::Zero => None,
            Operands::One(e) | Operands::Two(e, _) => Some(e),
        }
    }

    /// Second (destination) operand, for two-operand instructions only.
    #[must_use]
    pub fn dst(&self) -> Option<&Ea> {
        match &self.operands {
            Operands::Two(_, e) => Some(e),
            _ => None,
        }
    }

    fn num_ea(&self) -> u8 {
        self.operands.len()
    }

    fn is_long(&self) -> bool {
        self.size == Some('l')
    }

    /// The destination register this instruction's result lands in, or
    /// `None` for memory destinations, branches, or `cmp`.
    #[must_use]
    pub fn execution_result_reg(&self) -> Option<Reg> {
        if self.op == Opcode::Cmp {
            return None;
        }
        match &self.operands {
            Operands::Zero => None,
            Operands::One(e) => e.direct_reg(),
            Operands::Two(_, dst) => dst.direct_reg(),
        }
    }

    /// 0, 1, or 2 — an RMW destination counts as two.
    #[must_use]
    pub fn memory_cycles(&self) -> u32 {
        let rmw_weight = if self.op.is_rmw() { 2 } else { 1 };
        match &self.operands {
            Operands::Zero => 0,
            Operands::One(e) => u32::from(e.is_memory()) * rmw_weight,
            Operands::Two(src, dst) => u32::from(src.is_memory()) + u32::from(dst.is_memory()) * rmw_weight,
        }
    }

    /// Base opcode-table cycles plus `max(0, memory_cycles - 1)`.
    #[must_use]
    pub fn cycles(&self) -> u32 {
        let mc = self.memory_cycles();
        self.op.base_cycles() + mc.saturating_sub(1)
    }

    /// What resource kind this instruction uses register `r` as, if
    /// any. Destination is checked before source, so a conflicting
    /// resource use on the destination wins.
    #[must_use]
    pub fn need_reg(&self, r: Reg) -> Option<Resource> {
        match &self.operands {
            Operands::Zero => None,
            Operands::One(e) => need_reg_for_ea(e, r),
            Operands::Two(src, dst) => need_reg_for_ea(dst, r).or_else(|| need_reg_for_ea(src, r)),
        }
    }

    /// Dual-pipe dispatch classification, including `move`'s dynamic
    /// override: a memory destination paired with a memory-or-immediate
    /// source reclassifies as `PoepUntilLast`.
    #[must_use]
    pub fn oep_classify(&self) -> OepClass {
        if self.op == Opcode::Move {
            if let Operands::Two(src, dst) = &self.operands {
                let src_mem_or_imm = src.is_memory() || matches!(src, Ea::Other(Other::Immediate(_)));
                if dst.is_memory() && src_mem_or_imm {
                    return OepClass::PoepUntilLast;
                }
            }
            return OepClass::PoepOrSoep;
        }
        self.op.static_oep_class()
    }

    /// Encoded instruction length in 16-bit words.
    #[must_use]
    pub fn num_words(&self) -> u32 {
        if self.op.is_branch() {
            return if self.size == Some('w') { 2 } else { 1 };
        }
        if self.op == Opcode::Dbra {
            return 2;
        }

        let mut words = 1;
        if self.num_ea() > 0 {
            let src = self.src().expect("num_ea > 0 implies a source operand");
            let src_is_immediate = matches!(src, Ea::Other(Other::Immediate(_)));
            if !(src_is_immediate && self.op.has_embedded_immediate()) {
                words += src.encoded_word_count(self.is_long());
            }
        }
        if self.num_ea() > 1 {
            let dst = self.dst().expect("num_ea > 1 implies a destination operand");
            words += dst.encoded_word_count(false);
        }
        words
    }
}

fn need_reg_for_ea(ea: &Ea, r: Reg) -> Option<Resource> {
    match ea {
        Ea::Dn(reg) | Ea::An(reg) => (*reg == r).then_some(Resource::AB),
        Ea::Ind(base) | Ea::IndPostInc(base) | Ea::IndPreDec(base) | Ea::IndDisp(base, _) => {
            (r.is_areg() && *base == r).then_some(Resource::Base)
        }
        Ea::IndIndex(base, field) => {
            if *base == r {
                Some(Resource::Base)
            } else if field.index == r {
                Some(Resource::Index)
            } else {
                None
            }
        }
        Ea::Other(_) => None,
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.op)?;
        if let Some(sz) = self.size {
            write!(f, ".{sz}")?;
        }
        match &self.operands {
            Operands::Zero => {}
            Operands::One(e) => write!(f, "\t{e}")?,
            Operands::Two(src, dst) => write!(f, "\t{src},{dst}")?,
        }
        Ok(())
    }
}
