//! Dual-issue superscalar scheduler ("model060").
//!
//! Models the 68060's two integer pipelines (pOEP, primary; sOEP,
//! secondary) as a sequence of dispatch tests plus a change/use stall
//! formula. Unlike `model020` this does simulate forward progress: the
//! instruction stream is replayed `unroll + 1` times and `cycle_` tracks
//! elapsed cycles, since stalls depend on how recently a register was
//! last written.

use crate::cpu_model::{with_width, CpuModel};
use crate::ea::{Ea, Other};
use crate::error::Error;
use crate::instruction::{Instruction, Resource};
use crate::opcodes::{OepClass, Opcode};
use crate::registers::Reg;

/// True for the EA modes the sOEP pipeline can dispatch at all.
/// PC-relative modes are excluded — the 68060 treats them as needing
/// the instruction-fetch unit rather than plain address generation.
fn soep_ea_ok(ea: &Ea) -> bool {
    !matches!(ea, Ea::Other(Other::PcDisp(_) | Other::PcIndex(_)))
}

#[derive(Debug, Clone, Copy)]
struct RegChange {
    cycle: i64,
    written: bool,
}

impl Default for RegChange {
    fn default() -> Self {
        Self { cycle: 0, written: false }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct ChangeUseStall {
    reg: Option<Reg>,
    cycles: i64,
}

impl ChangeUseStall {
    fn none() -> Self {
        Self::default()
    }
}

/// The dual-issue scheduler. `last_register_change` persists only for
/// the duration of a single `simulate` call, reset at entry.
#[derive(Debug, Default)]
pub struct Model060 {
    cycle: i64,
    last_register_change: [RegChange; 16],
}

impl Model060 {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn calc_stall(&self, reg: Reg, cycles: i64) -> ChangeUseStall {
        if reg.index() >= 16 {
            return ChangeUseStall::none();
        }
        let s = self.last_register_change[usize::from(reg.index())];
        if !s.written {
            return ChangeUseStall::none();
        }
        let ago = self.cycle - 1 - s.cycle;
        if cycles <= ago {
            return ChangeUseStall::none();
        }
        ChangeUseStall { reg: Some(reg), cycles: cycles - ago }
    }

    fn check_change_use_ea(&self, ea: &Ea) -> Result<ChangeUseStall, Error> {
        match ea {
            Ea::Dn(_) | Ea::An(_) => Ok(ChangeUseStall::none()),
            Ea::Ind(r) | Ea::IndPostInc(r) | Ea::IndPreDec(r) | Ea::IndDisp(r, _) => Ok(self.calc_stall(*r, 2)),
            Ea::IndIndex(base, field) => {
                let base_stall = self.calc_stall(*base, 2);
                if base_stall.cycles != 0 {
                    return Ok(base_stall);
                }
                let long_fast_scale = matches!(field.size, crate::ea::IndexSize::Long) && (field.scale == 1 || field.scale == 4);
                Ok(self.calc_stall(field.index, if long_fast_scale { 2 } else { 3 }))
            }
            Ea::Other(Other::AbsWord(_) | Other::AbsLong(_) | Other::PcDisp(_) | Other::Immediate(_)) => Ok(ChangeUseStall::none()),
            Ea::Other(Other::PcIndex(_)) => Err(Error::unsupported(format!("change/use stall for {ea} is not modeled"))),
        }
    }

    fn check_change_use(&self, ins: &Instruction) -> Result<ChangeUseStall, Error> {
        let Some(first) = ins.src() else {
            return Ok(ChangeUseStall::none());
        };
        let stall = self.check_change_use_ea(first)?;
        if stall.cycles != 0 {
            return Ok(stall);
        }
        match ins.dst() {
            Some(second) => self.check_change_use_ea(second),
            None => Ok(ChangeUseStall::none()),
        }
    }

    fn update_register_change(&mut self, ins: &Instruction) {
        // (An)+/-(An) writeback to the base register isn't modeled here.
        let Some(r) = ins.execution_result_reg() else {
            return;
        };
        self.last_register_change[usize::from(r.index())] = RegChange { cycle: self.cycle, written: true };
    }

    /// Dispatch tests 10.1.2 through 10.1.6: can `soep` issue alongside
    /// `poep` this cycle? `Ok(None)` means yes; `Ok(Some(reason))` names
    /// why not, for the annotated listing.
    fn soep_ok(&self, poep: &Instruction, soep: &Instruction) -> Result<Option<String>, Error> {
        let verdict = self.soep_ok_inner(poep, soep)?;
        match &verdict {
            None => tracing::trace!(%poep, %soep, "dispatch test suite: pair"),
            Some(reason) => tracing::trace!(%poep, %soep, reason, "dispatch test suite: no pair"),
        }
        Ok(verdict)
    }

    fn soep_ok_inner(&self, poep: &Instruction, soep: &Instruction) -> Result<Option<String>, Error> {
        if soep.oep_classify() != OepClass::PoepOrSoep {
            return Ok(Some(format!("{} is {:?}", soep.op(), soep.oep_classify())));
        }
        if poep.oep_classify() == OepClass::PoepOnly {
            return Ok(Some(format!("{} is {:?}", poep.op(), poep.oep_classify())));
        }

        for ea in [soep.src(), soep.dst()].into_iter().flatten() {
            if !soep_ea_ok(ea) {
                return Ok(Some(format!("{ea} is not an allowable EA")));
            }
        }

        if poep.memory_cycles() != 0 && soep.memory_cycles() != 0 {
            return Ok(Some(format!("{} also uses a memory cycle", soep.op())));
        }
        if soep.memory_cycles() > 1 {
            return Ok(Some(format!("{} uses more than one memory cycle", soep.op())));
        }

        if let Some(p_result) = poep.execution_result_reg() {
            if let Some(resource) = soep.need_reg(p_result) {
                let is_movel = (poep.op() == Opcode::Move && poep.opsize() == Some('l')) || poep.op() == Opcode::Moveq;
                if resource != Resource::AB || !is_movel {
                    return Ok(Some(format!("{soep} needs {p_result}")));
                }
            }
        }
        Ok(None)
    }
}

impl CpuModel for Model060 {
    fn simulate(&mut self, instructions: &[Instruction], unroll: u32, print: bool) -> Result<f64, Error> {
        const PRINT_WIDTH: usize = 40;
        self.cycle = 1;
        self.last_register_change = [RegChange::default(); 16];

        let total_slots = (u64::from(unroll) + 1) * instructions.len() as u64;
        let mut pos: u64 = 0;

        while pos < total_slots {
            let poep = &instructions[(pos % instructions.len() as u64) as usize];
            pos += 1;

            let mut stall_cycles: i64 = 0;
            let poep_stall = self.check_change_use(poep)?;
            if poep_stall.cycles != 0 {
                if print {
                    println!("\t; pOEP change/use stall for {} cycles waiting for {}", poep_stall.cycles, poep_stall.reg.expect("stall names a register"));
                }
                stall_cycles += poep_stall.cycles;
            }

            if poep.op().is_branch() {
                if print {
                    println!("\t; assuming correctly predicted (0 cycles)");
                    println!("\t{}", pad(&poep.to_string(), PRINT_WIDTH));
                }
                continue;
            }

            let soep = (pos < total_slots).then(|| &instructions[(pos % instructions.len() as u64) as usize]);
            let mut reason: Option<String> = None;
            if let Some(soep_ins) = soep {
                reason = self.soep_ok(poep, soep_ins)?;
                if reason.is_none() {
                    let soep_stall = self.check_change_use(soep_ins)?;
                    if soep_stall.cycles != 0 {
                        if print {
                            println!("\t; sOEP change/use stall for {} cycles waiting for {}", soep_stall.cycles, soep_stall.reg.expect("stall names a register"));
                        }
                        stall_cycles += soep_stall.cycles;
                    }
                }
            }

            let icycles = i64::from(poep.cycles());
            if icycles <= 0 {
                return Err(Error::invariant("instruction cost must be positive"));
            }
            if print {
                let tcycles = icycles + stall_cycles;
                if tcycles > 1 {
                    println!("\t; cycle {}-{}", self.cycle, self.cycle + tcycles - 1);
                } else {
                    println!("\t; cycle {}", self.cycle);
                }
                println!("\t{}; pOEP", pad(&poep.to_string(), PRINT_WIDTH));
            }

            self.cycle += stall_cycles;
            self.update_register_change(poep);

            if let Some(soep_ins) = soep {
                match &reason {
                    None => {
                        if print {
                            println!("\t{}; sOEP", pad(&soep_ins.to_string(), PRINT_WIDTH));
                        }
                        pos += 1;
                        self.update_register_change(soep_ins);
                    }
                    Some(why) => {
                        if print {
                            println!("\t; sOEP idle because {why}");
                        }
                    }
                }
            }
            self.cycle += icycles;
        }

        if print {
            println!();
            print!("{} cycles", self.cycle - 1);
            if unroll > 0 {
                print!(" {} per iteration", (self.cycle - 1) as f64 / f64::from(unroll + 1));
            }
            println!();
        }
        Ok((self.cycle - 1) as f64 / f64::from(unroll + 1))
    }
}

fn pad(text: &str, width: usize) -> String {
    let mut s = with_width(text, width);
    s.push('\t');
    s
}
