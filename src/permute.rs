//! Recursive argument permutation sweep.
//!
//! For one catalog row, walk the argument slots depth-first: slot `i` takes
//! each value from its tag's table while slots `0..i` keep the values chosen
//! higher up the recursion. At each leaf the full combination is hashed,
//! checked against the memo and, if new, issued as a raw syscall.

use rand::rngs::SmallRng;

use crate::catalog::{SyscallSpec, ARG_NONE, ARG_RND, MAX_ARGS};
use crate::context::SharedContext;
use crate::memo::{combo_hash, Outcome, OutcomeMemo, ARGS_LEN};
use crate::values::ValueTable;

/// Seam for issuing the call itself, so sweep logic can be exercised
/// without firing real syscalls.
pub trait Invoke {
    /// Returns the raw return value; `errno` is left as the call set it.
    fn invoke(&mut self, nr: u64, args: &[u64; ARGS_LEN]) -> i64;
}

impl<I: Invoke + ?Sized> Invoke for &mut I {
    fn invoke(&mut self, nr: u64, args: &[u64; ARGS_LEN]) -> i64 {
        (**self).invoke(nr, args)
    }
}

/// Issues the call through the kernel's generic 6-register convention.
/// Unused trailing slots are passed as zero, which every kernel entry
/// point ignores.
pub struct RawSyscall;

impl Invoke for RawSyscall {
    fn invoke(&mut self, nr: u64, args: &[u64; ARGS_LEN]) -> i64 {
        unsafe {
            libc::syscall(
                nr as libc::c_long,
                args[0],
                args[1],
                args[2],
                args[3],
                args[4],
                args[5],
            ) as i64
        }
    }
}

pub struct Permuter<'a, I> {
    values: &'a ValueTable,
    ctx: &'a SharedContext,
    invoker: I,
}

impl<'a, I: Invoke> Permuter<'a, I> {
    pub fn new(values: &'a ValueTable, ctx: &'a SharedContext, invoker: I) -> Self {
        Self {
            values,
            ctx,
            invoker,
        }
    }

    pub fn into_invoker(self) -> I {
        self.invoker
    }

    /// Sweep every argument combination of one catalog row. Returns early
    /// when a stop is requested through the shared context.
    pub fn sweep(
        &mut self,
        spec: &SyscallSpec,
        spec_idx: usize,
        memo: &mut OutcomeMemo,
        rng: &mut SmallRng,
    ) {
        let mut args = [0u64; MAX_ARGS];
        self.permute(spec, spec_idx, 0, &mut args, memo, rng);
    }

    fn permute(
        &mut self,
        spec: &SyscallSpec,
        spec_idx: usize,
        depth: usize,
        args: &mut [u64; MAX_ARGS],
        memo: &mut OutcomeMemo,
        rng: &mut SmallRng,
    ) {
        if self.ctx.stop_requested() {
            return;
        }
        if depth == spec.arg_count() {
            self.invoke_leaf(spec, spec_idx, args, memo);
            return;
        }

        let kind = spec.args()[depth];
        if kind == ARG_NONE {
            args[depth] = 0;
            self.permute(spec, spec_idx, depth + 1, args, memo, rng);
        } else if kind & ARG_RND == ARG_RND {
            for value in self.values.random_values(rng) {
                args[depth] = value;
                self.permute(spec, spec_idx, depth + 1, args, memo, rng);
            }
            // Sibling branches start from a clean slot.
            args[depth] = 0;
        } else if let Some(table) = self.values.resolve(kind) {
            for &value in table {
                args[depth] = value;
                self.permute(spec, spec_idx, depth + 1, args, memo, rng);
            }
            args[depth] = 0;
        } else {
            // No table covers this tag. Surface it and prune the subtree
            // rather than issue calls with a meaningless slot.
            warn!(
                "{}: no value table for argument {} (mask {:#x})",
                spec.name(),
                depth,
                kind
            );
            args[depth] = 0;
        }
    }

    fn invoke_leaf(
        &mut self,
        spec: &SyscallSpec,
        spec_idx: usize,
        args: &[u64; MAX_ARGS],
        memo: &mut OutcomeMemo,
    ) {
        let hash = combo_hash(spec.nr(), args);
        match memo.lookup(spec.nr(), args) {
            Some(Outcome::Crashed) => {
                self.ctx.inc_skipped_crash();
                return;
            }
            Some(Outcome::ErrnoZero) => {
                self.ctx.inc_skipped_errno_zero();
                return;
            }
            Some(Outcome::Fail) | None => {}
        }

        self.ctx.record_attempt(hash, spec.nr(), args, spec_idx);
        nix::errno::Errno::clear();
        let ret = self.invoker.invoke(spec.nr(), args);
        self.ctx.inc_completed();

        // The call returned, so the tentative crash classification set in
        // record_attempt no longer applies.
        let outcome = if ret == 0 && nix::errno::errno() == 0 {
            memo.insert(hash, spec.nr(), *args, Outcome::ErrnoZero);
            Outcome::ErrnoZero
        } else {
            Outcome::Fail
        };
        self.ctx.set_tentative(outcome);
    }
}
