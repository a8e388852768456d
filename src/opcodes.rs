//! Static opcode table.
//!
//! One macro-expanded table drives the `Opcode` enum, name parsing, and
//! every per-opcode accessor, so there is exactly one place that lists
//! an opcode's properties.

/// Dual-pipe dispatch classification. `PoepUntilLast` and
/// `PoepButAllowsSoep` are not assigned statically by any opcode in the
/// table below; `PoepUntilLast` is reached only via `move`'s dynamic
/// override (see `Instruction::oep_classify`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OepClass {
    PoepOrSoep,
    PoepOnly,
    PoepUntilLast,
    PoepButAllowsSoep,
}

macro_rules! opcode_table {
    ($($variant:ident, $text:literal, $rmw:literal, $nea:literal, $cycles:literal, $oep:ident;)*) => {
        /// A 68k-family opcode covered by the cost model.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Opcode {
            $($variant,)*
        }

        impl Opcode {
            /// Canonical lowercase mnemonic, as the parser and renderer use it.
            #[must_use]
            pub fn canonical_name(self) -> &'static str {
                match self {
                    $(Opcode::$variant => $text,)*
                }
            }

            /// Read-modify-write flag: true if a memory destination is both
            /// read and written, consuming two memory cycles.
            #[must_use]
            pub fn is_rmw(self) -> bool {
                match self {
                    $(Opcode::$variant => $rmw,)*
                }
            }

            /// Declared operand count (0, 1, or 2).
            #[must_use]
            pub fn num_ea(self) -> u8 {
                match self {
                    $(Opcode::$variant => $nea,)*
                }
            }

            /// Base cycle count before EA-fetch or memory surcharge.
            #[must_use]
            pub fn base_cycles(self) -> u32 {
                match self {
                    $(Opcode::$variant => $cycles,)*
                }
            }

            /// Static dispatch classification, before `move`'s dynamic override.
            #[must_use]
            pub fn static_oep_class(self) -> OepClass {
                match self {
                    $(Opcode::$variant => OepClass::$oep,)*
                }
            }

            fn from_canonical(name: &str) -> Option<Self> {
                match name {
                    $($text => Some(Opcode::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

opcode_table! {
    And,   "and",   true,  2, 1, PoepOrSoep;
    Add,   "add",   true,  2, 1, PoepOrSoep;
    Addq,  "addq",  true,  2, 1, PoepOrSoep;
    Addx,  "addx",  true,  2, 1, PoepOnly;
    Asl,   "asl",   true,  2, 1, PoepOrSoep;
    Asr,   "asr",   true,  2, 1, PoepOrSoep;
    Bra,   "bra",   false, 1, 1, PoepOnly;
    Bhi,   "bhi",   false, 1, 1, PoepOnly;
    Bls,   "bls",   false, 1, 1, PoepOnly;
    Bcc,   "bcc",   false, 1, 1, PoepOnly;
    Bcs,   "bcs",   false, 1, 1, PoepOnly;
    Bne,   "bne",   false, 1, 1, PoepOnly;
    Beq,   "beq",   false, 1, 1, PoepOnly;
    Bvc,   "bvc",   false, 1, 1, PoepOnly;
    Bvs,   "bvs",   false, 1, 1, PoepOnly;
    Bpl,   "bpl",   false, 1, 1, PoepOnly;
    Bmi,   "bmi",   false, 1, 1, PoepOnly;
    Bge,   "bge",   false, 1, 1, PoepOnly;
    Blt,   "blt",   false, 1, 1, PoepOnly;
    Bgt,   "bgt",   false, 1, 1, PoepOnly;
    Ble,   "ble",   false, 1, 1, PoepOnly;
    Cmp,   "cmp",   true,  2, 1, PoepOrSoep;
    Dbra,  "dbra",  false, 2, 1, PoepOnly;
    Divu,  "divu",  true,  2, 0, PoepOnly;
    Divs,  "divs",  true,  2, 0, PoepOnly;
    Eor,   "eor",   true,  2, 1, PoepOrSoep;
    Lsl,   "lsl",   true,  2, 1, PoepOrSoep;
    Lsr,   "lsr",   true,  2, 1, PoepOrSoep;
    Move,  "move",  false, 2, 1, PoepOrSoep;
    Moveq, "moveq", false, 2, 1, PoepOrSoep;
    Not,   "not",   true,  1, 1, PoepOrSoep;
    Neg,   "neg",   true,  1, 1, PoepOrSoep;
    Mulu,  "mulu",  true,  2, 2, PoepOnly;
    Muls,  "muls",  true,  2, 2, PoepOnly;
    Or,    "or",    true,  2, 1, PoepOrSoep;
    Rol,   "rol",   true,  2, 1, PoepOrSoep;
    Ror,   "ror",   true,  2, 1, PoepOrSoep;
    Rts,   "rts",   false, 0, 1, PoepOrSoep;
    Sub,   "sub",   true,  2, 1, PoepOrSoep;
    Subq,  "subq",  true,  2, 1, PoepOrSoep;
    Subx,  "subx",  true,  2, 1, PoepOnly;
    Swap,  "swap",  true,  1, 1, PoepOnly;
    Tst,   "tst",   false, 1, 1, PoepOrSoep;
}

impl Opcode {
    /// Parse a canonical name or a recognized alias. `adda`, `cmpa`, and
    /// `movea` collapse onto their word-sized counterparts since this
    /// model does not distinguish address-register destinations at the
    /// opcode level; `dbf` is a Motorola-assembler synonym for `dbra`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        if let Some(op) = Self::from_canonical(name) {
            return Some(op);
        }
        match name {
            "adda" => Some(Opcode::Add),
            "cmpa" => Some(Opcode::Cmp),
            "movea" => Some(Opcode::Move),
            "dbf" => Some(Opcode::Dbra),
            _ => None,
        }
    }

    /// True for any conditional or unconditional branch opcode.
    #[must_use]
    pub fn is_branch(self) -> bool {
        matches!(
            self,
            Opcode::Bra
                | Opcode::Bhi
                | Opcode::Bls
                | Opcode::Bcc
                | Opcode::Bcs
                | Opcode::Bne
                | Opcode::Beq
                | Opcode::Bvc
                | Opcode::Bvs
                | Opcode::Bpl
                | Opcode::Bmi
                | Opcode::Bge
                | Opcode::Blt
                | Opcode::Bgt
                | Opcode::Ble
        )
    }

    /// True for the shift/rotate family.
    #[must_use]
    pub fn is_shift_rot(self) -> bool {
        matches!(
            self,
            Opcode::Asl | Opcode::Asr | Opcode::Lsl | Opcode::Lsr | Opcode::Rol | Opcode::Ror
        )
    }

    /// Opcodes whose source operand, when immediate, is embedded in the
    /// opcode word itself rather than occupying a trailing extension
    /// word.
    #[must_use]
    pub fn has_embedded_immediate(self) -> bool {
        matches!(
            self,
            Opcode::Asr
                | Opcode::Addq
                | Opcode::Subq
                | Opcode::Moveq
                | Opcode::Lsl
                | Opcode::Lsr
                | Opcode::Rol
                | Opcode::Ror
        )
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.canonical_name())
    }
}
