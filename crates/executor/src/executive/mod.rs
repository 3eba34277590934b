// Copyright 2021 Volta Foundation. All rights reserved.
// Volta is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

pub mod summary;
#[cfg(test)]
mod tests;

pub use summary::{ExecutionStatus, ExecutionSummary};

use self::summary::make_summary;
use crate::{
    builtin::resolve_builtin, kernel::RepoKernel, substate::SideEffects,
};
use keccak_hash::keccak;
use volta_parameters::energy::{
    TX_BASE_ENERGY, TX_CREATE_ENERGY, TX_DATA_NON_ZERO_ENERGY,
    TX_DATA_ZERO_ENERGY,
};
use volta_primitives::Transaction;
use volta_state::{Repository, Result, Tracked};
use volta_types::{address_util::AddressUtil, Address, Bytes, U256, U512};
use volta_vm_types::{
    CallKind, Env, ExecutionContext, ExecutionResult, KernelInterface,
    ResultCode, VirtualMachine,
};

/// The deterministic deployment address of a contract-creation
/// transaction: keccak(sender || nonce) under the account class prefix.
pub fn contract_address(sender: &Address, nonce: &U256) -> Address {
    let mut buffer = [0u8; 64];
    buffer[..32].copy_from_slice(sender.as_bytes());
    nonce.to_big_endian(&mut buffer[32..]);
    let mut address = keccak(&buffer[..]);
    address.set_user_account_type_bits();
    address
}

/// The base energy cost of a transaction: the flat call/create cost plus
/// the per-byte charge on the payload.
pub fn energy_required_for(tx: &Transaction) -> u64 {
    let init_energy = if tx.is_create() {
        TX_CREATE_ENERGY
    } else {
        TX_BASE_ENERGY
    };

    let byte_energy = |b: &u8| match *b {
        0 => TX_DATA_ZERO_ENERGY,
        _ => TX_DATA_NON_ZERO_ENERGY,
    };
    let data_energy: u64 = tx.data.iter().map(byte_energy).sum();

    init_energy + data_energy
}

/// Transaction executor: the middle man between the kernel state and the
/// contract logic. Runs exactly one transaction against one block context
/// and a given repository, and yields the execution summary.
///
/// Energy used must be accumulated per block by the caller; the executor
/// only enforces the ceiling it is given.
pub struct TransactionExecutor<'a> {
    repo: &'a mut dyn Repository,
    vm: &'a mut dyn VirtualMachine,
    tx: &'a Transaction,
    local_call: bool,
    block_energy_ceiling: u64,
    base_energy: u64,
    context: ExecutionContext,
}

impl<'a> TransactionExecutor<'a> {
    /// Creates an executor bounded by the block's own energy limit.
    pub fn new(
        repo: &'a mut dyn Repository, vm: &'a mut dyn VirtualMachine,
        env: &Env, tx: &'a Transaction, local_call: bool,
    ) -> TransactionExecutor<'a> {
        let ceiling = env.energy_limit;
        Self::new_with_ceiling(repo, vm, env, tx, local_call, ceiling)
    }

    /// Creates an executor with an explicit energy ceiling, typically the
    /// energy remaining in the block being assembled.
    pub fn new_with_ceiling(
        repo: &'a mut dyn Repository, vm: &'a mut dyn VirtualMachine,
        env: &Env, tx: &'a Transaction, local_call: bool,
        block_energy_ceiling: u64,
    ) -> TransactionExecutor<'a> {
        let base_energy = energy_required_for(tx);

        let address = match tx.destination() {
            Some(destination) => *destination,
            None => contract_address(&tx.sender, &tx.nonce),
        };
        // Deployer bytecode travels as the transaction payload; creations
        // run with empty call data.
        let call_data = if tx.is_create() {
            Bytes::new()
        } else {
            tx.data.clone()
        };

        let context = ExecutionContext {
            tx_hash: tx.hash(),
            address,
            origin: tx.sender,
            caller: tx.sender,
            energy_price: tx.energy_price,
            energy_limit: tx.energy_limit.saturating_sub(base_energy),
            call_value: tx.value,
            call_data,
            depth: 0,
            kind: if tx.is_create() {
                CallKind::Create
            } else {
                CallKind::Call
            },
            flags: 0,
            env: Env {
                difficulty: ExecutionContext::truncate_difficulty(
                    env.difficulty,
                ),
                ..env.clone()
            },
        };

        TransactionExecutor {
            repo,
            vm,
            tx,
            local_call,
            block_energy_ceiling,
            base_energy,
            context,
        }
    }

    pub fn context(&self) -> &ExecutionContext { &self.context }

    /// The sole entry point: pre-checks, dispatch, side-effect merging,
    /// repository commit and settlement.
    pub fn execute(self) -> Result<ExecutionSummary> {
        debug!("executing transaction: {:?}", self.tx);

        if !self.local_call {
            if let Some(code) = self.pre_check() {
                trace!("transaction refused before execution: {}", code);
                return Ok(self.rejected_summary(code));
            }
        }
        self.run()
    }

    /// Validations performed against the untouched repository. Any hit
    /// refuses the transaction with a rejection code and no state change.
    fn pre_check(&self) -> Option<ResultCode> {
        let tx = self.tx;
        if tx.energy_limit < self.base_energy
            || tx.energy_limit > self.block_energy_ceiling
        {
            return Some(ResultCode::RejectedInvalidEnergyLimit);
        }
        if self.repo.nonce(&tx.sender) != tx.nonce {
            return Some(ResultCode::RejectedInvalidNonce);
        }
        let energy_cost =
            match tx.energy_price.checked_mul(U256::from(tx.energy_limit)) {
                Some(cost) => cost,
                None => return Some(ResultCode::RejectedInsufficientBalance),
            };
        let required = U512::from(energy_cost) + U512::from(tx.value);
        if U512::from(self.repo.balance(&tx.sender)) < required {
            return Some(ResultCode::RejectedInsufficientBalance);
        }
        None
    }

    fn rejected_summary(self, code: ResultCode) -> ExecutionSummary {
        // Nothing ran, nothing was spent.
        let result = ExecutionResult::new(code, self.tx.energy_limit);
        make_summary(self.tx, &result, SideEffects::new())
    }

    fn run(self) -> Result<ExecutionSummary> {
        let TransactionExecutor {
            repo,
            vm,
            tx,
            local_call,
            context,
            ..
        } = self;

        let mut side_effects = SideEffects::new();
        let mut result = ExecutionResult::success(context.energy_limit);

        let mut track = Tracked::new(&mut *repo);
        if !local_call {
            track.increment_nonce(&tx.sender)?;
            // The full energy budget is withheld up front; the unused part
            // flows back during settlement.
            let withheld = tx.energy_price * U256::from(tx.energy_limit);
            track.sub_balance(&tx.sender, &withheld)?;
        }

        {
            let mut kernel = RepoKernel::new(
                &mut track,
                &mut side_effects,
                !local_call,
                local_call,
            );
            match context.kind {
                CallKind::Call => {
                    call(tx, &context, &mut kernel, vm, &mut result)
                }
                CallKind::Create => {
                    create(tx, &context, &mut kernel, vm, &mut result)
                }
            }
        }

        let mut root_effects = SideEffects::new();
        if result.code.is_success() {
            root_effects.merge(side_effects);
        } else {
            let (_, mut internals, _) = side_effects.into_parts();
            for nested in &mut internals {
                nested.mark_rejected();
            }
            root_effects.add_internal_transactions(internals);
        }

        let summary = make_summary(tx, &result, root_effects);

        if result.code.is_success() {
            track.flush()?;
        } else {
            track.rollback();
        }

        settle(
            repo,
            tx,
            &context.env.author,
            &result,
            &summary.deleted_accounts,
            local_call,
        )?;

        Ok(summary)
    }
}

/// Moves the transaction value from `from` to `to`. This runs after
/// contract logic whether it succeeded or not: the transfer belongs to the
/// transaction envelope, not to contract logic. It still shares the fate
/// of the dispatch layer, so a failed transaction discards it along with
/// every other effect.
fn transfer_value(
    kernel: &mut dyn KernelInterface, from: &Address, to: &Address,
    value: &U256,
) {
    if value.is_zero() {
        return;
    }
    if kernel.sub_balance(from, value) {
        kernel.add_balance(to, value);
    } else {
        debug!(
            "value transfer skipped, sender cannot cover it: from={:?}, \
             value={}",
            from, value
        );
    }
}

/// Prepares and runs a contract call. A resolved precompile fully handles
/// the dispatch; otherwise the destination's code, if any, goes through
/// the interpreter.
fn call(
    tx: &Transaction, context: &ExecutionContext,
    kernel: &mut RepoKernel, vm: &mut dyn VirtualMachine,
    result: &mut ExecutionResult,
) {
    if let Some(builtin) = resolve_builtin(&context.address) {
        *result =
            builtin.execute(context, kernel, &tx.data, context.energy_limit);
    } else {
        let code = kernel.code(&context.address);
        if !code.is_empty() {
            *result = vm.run(&code, context, kernel);
        }
    }

    transfer_value(kernel, &tx.sender, &context.address, &tx.value);
}

/// Prepares and runs a contract creation. Deploying over an existing
/// account is refused outright; on success the interpreter's output
/// becomes the new contract's code.
fn create(
    tx: &Transaction, context: &ExecutionContext,
    kernel: &mut RepoKernel, vm: &mut dyn VirtualMachine,
    result: &mut ExecutionResult,
) {
    if kernel.account_exists(&context.address) {
        *result = ExecutionResult::new(ResultCode::Failure, 0);
        return;
    }

    kernel.create_account(&context.address);

    if !tx.data.is_empty() {
        *result = vm.run(&tx.data, context, kernel);
        if result.code.is_success() {
            kernel.save_code(&context.address, result.output.clone());
        }
    }

    transfer_value(kernel, &tx.sender, &context.address, &tx.value);
}

/// Post-summary repository bookkeeping: energy refund, the coinbase fee,
/// and the deleted-account sweep, merged in as one layer. Local calls and
/// rejected transactions settle nothing.
fn settle(
    repo: &mut dyn Repository, tx: &Transaction, coinbase: &Address,
    result: &ExecutionResult, deletions: &[Address], local_call: bool,
) -> Result<()> {
    if local_call || result.code.is_rejected() {
        return Ok(());
    }

    let energy_used = result.energy_used(tx.energy_limit);
    let fee = tx.energy_price * U256::from(energy_used);

    let mut track = Tracked::new(repo);
    if result.code.is_success() {
        let refund = tx.energy_price * U256::from(result.energy_remaining);
        track.add_balance(&tx.sender, &refund)?;
        for address in deletions {
            track.delete_account(address)?;
        }
    } else {
        // The dispatch layer was discarded wholesale, taking the up-front
        // bookkeeping with it; the parts a failed transaction still owes
        // are re-applied here.
        track.increment_nonce(&tx.sender)?;
        track.sub_balance(&tx.sender, &fee)?;
    }
    track.add_balance(coinbase, &fee)?;
    track.flush()
}
