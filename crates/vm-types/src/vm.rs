// Copyright 2021 Volta Foundation. All rights reserved.
// Volta is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use super::{
    context::ExecutionContext, kernel::KernelInterface,
    result::ExecutionResult,
};

/// The bytecode interpreter contract. The execution core treats `run` as a
/// deterministic function of its inputs, aside from the kernel side effects
/// it performs; it must come back with a structured result, never panic.
pub trait VirtualMachine {
    fn run(
        &mut self, code: &[u8], context: &ExecutionContext,
        kernel: &mut dyn KernelInterface,
    ) -> ExecutionResult;
}
