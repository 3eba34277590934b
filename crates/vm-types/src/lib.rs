// Copyright 2021 Volta Foundation. All rights reserved.
// Volta is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

//! Types shared between the transaction executor, the precompiled contract
//! framework and any pluggable bytecode interpreter.

/// Execution Context: caller's information and block information, as seen
/// by contract logic.
mod context;

/// Environment information of the enclosing block.
mod env;

/// Internal transactions: nested calls recorded for audit.
mod internal_transaction;

/// Kernel Interface: the state surface handed to contract logic.
mod kernel;

/// Result codes and the execution result produced by every dispatch.
mod result;

/// The bytecode interpreter contract.
mod vm;

pub use context::{CallKind, ExecutionContext};
pub use env::Env;
pub use internal_transaction::InternalTransaction;
pub use kernel::KernelInterface;
pub use result::{ExecutionResult, ResultCode};
pub use vm::VirtualMachine;
