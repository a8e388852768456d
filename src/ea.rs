//! Effective-address model.
//!
//! An EA is a sum type over the eight major addressing modes plus the
//! five `Other` sub-modes. Any variant that needs extra data (a
//! displacement, a brief extension word, an absolute address, an
//! immediate value) carries it directly as enum payload, so "has extra"
//! is a property of the type rather than a runtime-checked invariant.

use crate::registers::Reg;

/// Index register size within a brief extension word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexSize {
    Word,
    Long,
}

/// The index half of a brief extension word: index register, its size,
/// scale factor (1, 2, 4, or 8), and the signed 8-bit displacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexField {
    pub index: Reg,
    pub size: IndexSize,
    pub scale: u8,
    pub disp: i8,
}

/// The `Other` major mode's five sub-modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Other {
    /// `(xxx).W`
    AbsWord(i16),
    /// `(xxx).L`
    AbsLong(u32),
    /// `d16(pc)`
    PcDisp(i16),
    /// `d8(pc,Xn)` — base is implicitly `pc`, never stored explicitly.
    PcIndex(IndexField),
    /// `#<data>`
    Immediate(u32),
}

/// An effective address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ea {
    /// `Dn`
    Dn(Reg),
    /// `An`
    An(Reg),
    /// `(An)`
    Ind(Reg),
    /// `(An)+`
    IndPostInc(Reg),
    /// `-(An)`
    IndPreDec(Reg),
    /// `d16(An)`
    IndDisp(Reg, i16),
    /// `d8(An,Xn)`
    IndIndex(Reg, IndexField),
    /// One of the `Other` sub-modes.
    Other(Other),
}

impl Ea {
    /// True for every mode except `Dn`, `An`, and `immediate`.
    #[must_use]
    pub fn is_memory(&self) -> bool {
        !matches!(self, Ea::Dn(_) | Ea::An(_) | Ea::Other(Other::Immediate(_)))
    }

    /// True for any mode that carries a displacement, extension word,
    /// absolute address, or immediate payload.
    #[must_use]
    pub fn has_extra(&self) -> bool {
        matches!(self, Ea::IndDisp(..) | Ea::IndIndex(..) | Ea::Other(_))
    }

    /// Encoded extension-word count. `is_long_operand` only affects the
    /// `immediate` sub-mode, whose width follows the operand size rather
    /// than the addressing mode.
    #[must_use]
    pub fn encoded_word_count(&self, is_long_operand: bool) -> u32 {
        match self {
            Ea::Dn(_) | Ea::An(_) | Ea::Ind(_) | Ea::IndPostInc(_) | Ea::IndPreDec(_) => 0,
            Ea::IndDisp(..) | Ea::IndIndex(..) => 1,
            Ea::Other(Other::AbsWord(_) | Other::PcDisp(_) | Other::PcIndex(_)) => 1,
            Ea::Other(Other::AbsLong(_)) => 2,
            Ea::Other(Other::Immediate(_)) => {
                if is_long_operand {
                    2
                } else {
                    1
                }
            }
        }
    }

    /// The brief extension word of a `d8(An,Xn)` operand. `None` for
    /// every other mode, including `d8(pc,Xn)` (which has no base
    /// register to report).
    #[must_use]
    pub fn brief_extension_word(&self) -> Option<IndexField> {
        match self {
            Ea::IndIndex(_, field) => Some(*field),
            _ => None,
        }
    }

    /// The address register referenced by modes that use one as a base,
    /// for resource classification (`need_reg`).
    #[must_use]
    pub fn base_reg(&self) -> Option<Reg> {
        match self {
            Ea::Ind(r) | Ea::IndPostInc(r) | Ea::IndPreDec(r) | Ea::IndDisp(r, _) | Ea::IndIndex(r, _) => Some(*r),
            _ => None,
        }
    }

    /// The data/address register used as an index, if any.
    #[must_use]
    pub fn index_reg(&self) -> Option<Reg> {
        match self {
            Ea::IndIndex(_, field) | Ea::Other(Other::PcIndex(field)) => Some(field.index),
            _ => None,
        }
    }

    /// The plain register this EA names, for `Dn`/`An` forms only.
    #[must_use]
    pub fn direct_reg(&self) -> Option<Reg> {
        match self {
            Ea::Dn(r) | Ea::An(r) => Some(*r),
            _ => None,
        }
    }
}

impl std::fmt::Display for Ea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ea::Dn(r) | Ea::An(r) => write!(f, "{r}"),
            Ea::Ind(r) => write!(f, "({r})"),
            Ea::IndPostInc(r) => write!(f, "({r})+"),
            Ea::IndPreDec(r) => write!(f, "-({r})"),
            Ea::IndDisp(r, d) => write!(f, "{d}({r})"),
            Ea::IndIndex(r, field) => write!(f, "{}({r},{})", field.disp, render_index(field)),
            Ea::Other(Other::AbsWord(v)) => write!(f, "${v:x}.w"),
            Ea::Other(Other::AbsLong(v)) => write!(f, "${v:x}.l"),
            Ea::Other(Other::PcDisp(d)) => write!(f, "{d}(pc)"),
            Ea::Other(Other::PcIndex(field)) => write!(f, "{}(pc,{})", field.disp, render_index(field)),
            Ea::Other(Other::Immediate(v)) => write!(f, "#{v}"),
        }
    }
}

fn render_index(field: &IndexField) -> String {
    let size = match field.size {
        IndexSize::Word => "w",
        IndexSize::Long => "l",
    };
    if field.scale == 1 {
        format!("{}.{size}", field.index)
    } else {
        format!("{}.{size}*{}", field.index, field.scale)
    }
}
