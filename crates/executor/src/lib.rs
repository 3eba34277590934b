// Copyright 2021 Volta Foundation. All rights reserved.
// Volta is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

//! Volta Executor: the core logic of executing transactions on the Volta
//! blockchain. It encapsulates everything a consensus node needs during
//! execution: energy accounting, dispatch to the bytecode interpreter or a
//! precompiled contract, value transfer, result classification, repository
//! commit and receipt construction.

#[macro_use]
extern crate log;
#[macro_use]
extern crate lazy_static;

/// Precompiled Contracts: built-in contracts reachable at fixed addresses,
/// executing native logic instead of interpreted code. The token release
/// schedule (escrow) contract family lives here.
pub mod builtin;

/// Transaction Execution Entry: receives transactions, performs the
/// protocol pre-checks, dispatches contract logic and assembles the
/// execution summary.
pub mod executive;

/// Kernel Adapter: bridges the account repository to the state surface
/// contract logic is allowed to see.
pub mod kernel;

/// Transaction Execution Tracker: records consensus-relevant side effects
/// (logs, internal transactions, deletions) during execution.
pub mod substate;

pub use builtin::{resolve_builtin, BuiltinContract};
pub use executive::{ExecutionStatus, ExecutionSummary, TransactionExecutor};
pub use kernel::RepoKernel;
pub use substate::SideEffects;
