// Copyright 2021 Volta Foundation. All rights reserved.
// Volta is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use super::*;
use volta_parameters::{
    energy::TX_BASE_ENERGY, internal_contract_addresses::*,
};
use rustc_hex::FromHex;
use volta_primitives::{Action, LogEntry, Transaction, TransactionOutcome};
use volta_state::MemoryRepository;
use volta_vm_types::InternalTransaction;

fn addr(low: u64) -> Address {
    let mut address = Address::from_low_u64_be(low);
    address.set_user_account_type_bits();
    address
}

fn test_env() -> Env {
    Env {
        author: addr(0xc0ffee),
        number: 1,
        timestamp: 10,
        energy_limit: 10_000_000,
        difficulty: U256::from(1000),
    }
}

fn call_tx(
    sender: Address, destination: Address, value: u64, nonce: u64,
    energy_price: u64, energy_limit: u64,
) -> Transaction {
    Transaction {
        sender,
        action: Action::Call(destination),
        value: U256::from(value),
        data: vec![],
        nonce: U256::from(nonce),
        energy_price: U256::from(energy_price),
        energy_limit,
    }
}

/// Interpreter double producing a canned result.
struct MockVm(ExecutionResult);

impl VirtualMachine for MockVm {
    fn run(
        &mut self, _code: &[u8], _context: &ExecutionContext,
        _kernel: &mut dyn KernelInterface,
    ) -> ExecutionResult {
        self.0.clone()
    }
}

/// Interpreter double that deploys whatever code it was given: it echoes
/// the deployer bytecode back as its output.
struct EchoVm;

impl VirtualMachine for EchoVm {
    fn run(
        &mut self, code: &[u8], context: &ExecutionContext,
        _kernel: &mut dyn KernelInterface,
    ) -> ExecutionResult {
        ExecutionResult::with_output(
            ResultCode::Success,
            context.energy_limit,
            code.to_vec(),
        )
    }
}

/// Interpreter double driven by a closure, for tests that need kernel
/// access.
struct HookVm<F>(F);

impl<F> VirtualMachine for HookVm<F>
where F: FnMut(&ExecutionContext, &mut dyn KernelInterface) -> ExecutionResult
{
    fn run(
        &mut self, _code: &[u8], context: &ExecutionContext,
        kernel: &mut dyn KernelInterface,
    ) -> ExecutionResult {
        (self.0)(context, kernel)
    }
}

fn run_tx(
    repo: &mut MemoryRepository, vm: &mut dyn VirtualMachine,
    tx: &Transaction,
) -> ExecutionSummary {
    TransactionExecutor::new(repo, vm, &test_env(), tx, false)
        .execute()
        .unwrap()
}

#[test]
fn value_moves_to_account_without_code() {
    let (a, b) = (addr(1), addr(2));
    let mut repo = MemoryRepository::default();
    repo.add_balance(&a, &U256::from(100)).unwrap();

    let tx = call_tx(a, b, 1, 0, 0, TX_BASE_ENERGY);
    let mut vm = MockVm(ExecutionResult::failure());
    let summary = run_tx(&mut repo, &mut vm, &tx);

    assert_eq!(summary.status, ExecutionStatus::Completed);
    assert!(summary.receipt.is_successful());
    assert!(summary.receipt.error_message.is_empty());
    assert_eq!(summary.energy_used(), TX_BASE_ENERGY);
    assert_eq!(repo.balance(&a), U256::from(99));
    assert_eq!(repo.balance(&b), U256::from(1));
    assert_eq!(repo.nonce(&a), U256::one());
}

#[test]
fn fees_flow_to_the_coinbase() {
    let (a, b) = (addr(1), addr(2));
    let mut repo = MemoryRepository::default();
    repo.add_balance(&a, &U256::from(100_000)).unwrap();

    let tx = call_tx(a, b, 1, 0, 1, TX_BASE_ENERGY);
    let mut vm = MockVm(ExecutionResult::failure());
    let summary = run_tx(&mut repo, &mut vm, &tx);

    assert_eq!(summary.status, ExecutionStatus::Completed);
    let expected = U256::from(100_000 - 1 - TX_BASE_ENERGY);
    assert_eq!(repo.balance(&a), expected);
    assert_eq!(repo.balance(&test_env().author), U256::from(TX_BASE_ENERGY));
}

#[test]
fn create_persists_interpreter_output_as_code() {
    let a = addr(1);
    let deployer: Bytes = "6001600055".from_hex().unwrap();
    let mut repo = MemoryRepository::default();
    repo.add_balance(&a, &U256::from(10)).unwrap();

    let tx = Transaction {
        sender: a,
        action: Action::Create,
        value: U256::from(3),
        data: deployer.clone(),
        nonce: U256::zero(),
        energy_price: U256::zero(),
        energy_limit: 300_000,
    };
    let target = contract_address(&a, &tx.nonce);

    let mut vm = EchoVm;
    let summary = run_tx(&mut repo, &mut vm, &tx);

    assert_eq!(summary.status, ExecutionStatus::Completed);
    assert_eq!(summary.output, deployer);
    assert_eq!(repo.code(&target), deployer);
    assert_eq!(repo.balance(&target), U256::from(3));
    assert_eq!(repo.balance(&a), U256::from(7));
}

#[test]
fn failed_create_leaves_no_account_and_charges_energy() {
    let a = addr(1);
    let mut repo = MemoryRepository::default();
    repo.add_balance(&a, &U256::from(1_000_000)).unwrap();

    let tx = Transaction {
        sender: a,
        action: Action::Create,
        value: U256::zero(),
        data: vec![0xfe],
        nonce: U256::zero(),
        energy_price: U256::one(),
        energy_limit: 300_000,
    };
    let target = contract_address(&a, &tx.nonce);

    let mut vm = MockVm(ExecutionResult::failure());
    let summary = run_tx(&mut repo, &mut vm, &tx);

    assert_eq!(summary.status, ExecutionStatus::Failed);
    assert_eq!(
        summary.receipt.outcome_status,
        TransactionOutcome::Failure
    );
    assert!(!summary.receipt.error_message.is_empty());
    assert!(!repo.has_account(&target));
    assert_eq!(repo.code(&target), Bytes::new());
    // A failed execution still pays for all the energy it burned.
    assert_eq!(summary.energy_used(), 300_000);
    assert_eq!(repo.balance(&a), U256::from(1_000_000 - 300_000));
    assert_eq!(repo.nonce(&a), U256::one());
}

#[test]
fn create_over_existing_account_is_refused() {
    let a = addr(1);
    let mut repo = MemoryRepository::default();
    repo.add_balance(&a, &U256::from(1_000_000)).unwrap();

    let tx = Transaction {
        sender: a,
        action: Action::Create,
        value: U256::zero(),
        data: vec![0xfe],
        nonce: U256::zero(),
        energy_price: U256::zero(),
        energy_limit: 300_000,
    };
    let target = contract_address(&a, &tx.nonce);
    repo.create_account(&target).unwrap();

    let mut vm = EchoVm;
    let summary = run_tx(&mut repo, &mut vm, &tx);

    assert_eq!(summary.status, ExecutionStatus::Failed);
    // Refused with zero energy remaining: the whole limit is consumed.
    assert_eq!(summary.energy_used(), 300_000);
    assert_eq!(repo.code(&target), Bytes::new());
}

#[test]
fn stale_nonce_is_rejected_without_any_state_change() {
    let (a, b) = (addr(1), addr(2));
    let mut repo = MemoryRepository::default();
    repo.add_balance(&a, &U256::from(100_000)).unwrap();

    let tx = call_tx(a, b, 1, 5, 1, TX_BASE_ENERGY);
    let mut vm = MockVm(ExecutionResult::failure());
    let summary = run_tx(&mut repo, &mut vm, &tx);

    assert_eq!(summary.status, ExecutionStatus::Rejected);
    assert_eq!(
        summary.receipt.outcome_status,
        TransactionOutcome::Rejected
    );
    assert_eq!(summary.energy_used(), 0);
    assert_eq!(repo.balance(&a), U256::from(100_000));
    assert_eq!(repo.nonce(&a), U256::zero());
    assert_eq!(repo.balance(&b), U256::zero());
}

#[test]
fn energy_limit_outside_bounds_is_rejected() {
    let (a, b) = (addr(1), addr(2));
    let mut repo = MemoryRepository::default();
    repo.add_balance(&a, &U256::from(100_000_000)).unwrap();

    // Below the base transaction cost.
    let tx = call_tx(a, b, 0, 0, 1, TX_BASE_ENERGY - 1);
    let mut vm = MockVm(ExecutionResult::failure());
    let summary = run_tx(&mut repo, &mut vm, &tx);
    assert_eq!(summary.status, ExecutionStatus::Rejected);

    // Above the remaining energy of the block being assembled.
    let tx = call_tx(a, b, 0, 0, 1, 50_000);
    let summary =
        TransactionExecutor::new_with_ceiling(
            &mut repo,
            &mut vm,
            &test_env(),
            &tx,
            false,
            30_000,
        )
        .execute()
        .unwrap();
    assert_eq!(summary.status, ExecutionStatus::Rejected);
    assert_eq!(repo.nonce(&a), U256::zero());
}

#[test]
fn unpayable_transaction_is_rejected() {
    let (a, b) = (addr(1), addr(2));
    let mut repo = MemoryRepository::default();
    repo.add_balance(&a, &U256::from(10)).unwrap();

    let tx = call_tx(a, b, 1, 0, 1, TX_BASE_ENERGY);
    let mut vm = MockVm(ExecutionResult::failure());
    let summary = run_tx(&mut repo, &mut vm, &tx);

    assert_eq!(summary.status, ExecutionStatus::Rejected);
    assert_eq!(repo.balance(&a), U256::from(10));
}

#[test]
fn local_calls_skip_checks_and_settlement() {
    let (a, b) = (addr(1), addr(2));
    let mut repo = MemoryRepository::default();

    // Stale nonce, zero balance against a non-zero price: a sealed
    // transaction would be rejected three times over.
    let tx = call_tx(a, b, 0, 7, 1_000, TX_BASE_ENERGY);
    let mut vm = MockVm(ExecutionResult::failure());
    let summary =
        TransactionExecutor::new(&mut repo, &mut vm, &test_env(), &tx, true)
            .execute()
            .unwrap();

    assert_eq!(summary.status, ExecutionStatus::Completed);
    assert_eq!(repo.balance(&a), U256::zero());
    assert_eq!(repo.nonce(&a), U256::zero());
    assert_eq!(repo.balance(&test_env().author), U256::zero());
}

// The original engine moves the transaction value after contract logic
// regardless of its result code, but the dispatch layer holding that
// transfer is only flushed on success. Whether value should survive a
// failed call is an open question upstream; this pins the observed
// behavior: it does not.
#[test]
fn failed_call_discards_the_value_transfer() {
    let (a, b) = (addr(1), addr(2));
    let mut repo = MemoryRepository::default();
    repo.add_balance(&a, &U256::from(100_000)).unwrap();
    repo.save_code(&b, vec![0xfe]).unwrap();

    let tx = call_tx(a, b, 1, 0, 1, 50_000);
    let mut vm = MockVm(ExecutionResult::failure());
    let summary = run_tx(&mut repo, &mut vm, &tx);

    assert_eq!(summary.status, ExecutionStatus::Failed);
    assert_eq!(repo.balance(&b), U256::zero());
    // Sender still pays for the burned energy, and the nonce still moves.
    assert_eq!(repo.balance(&a), U256::from(100_000 - 50_000));
    assert_eq!(repo.nonce(&a), U256::one());
}

#[test]
fn revert_returns_remaining_energy() {
    let (a, b) = (addr(1), addr(2));
    let mut repo = MemoryRepository::default();
    repo.add_balance(&a, &U256::from(100_000)).unwrap();
    repo.save_code(&b, vec![0xfe]).unwrap();

    let tx = call_tx(a, b, 0, 0, 1, 50_000);
    let remaining = 20_000;
    let mut vm =
        MockVm(ExecutionResult::new(ResultCode::Revert, remaining));
    let summary = run_tx(&mut repo, &mut vm, &tx);

    assert_eq!(summary.status, ExecutionStatus::Failed);
    assert_eq!(summary.energy_used(), 50_000 - remaining);
    assert_eq!(
        repo.balance(&a),
        U256::from(100_000 - (50_000 - remaining))
    );
    assert_eq!(
        repo.balance(&test_env().author),
        U256::from(50_000 - remaining)
    );
}

#[test]
fn marked_accounts_are_swept_on_success() {
    let (a, b, doomed) = (addr(1), addr(2), addr(3));
    let mut repo = MemoryRepository::default();
    repo.add_balance(&a, &U256::from(100_000)).unwrap();
    repo.add_balance(&doomed, &U256::from(5)).unwrap();
    repo.save_code(&b, vec![0xfe]).unwrap();

    let tx = call_tx(a, b, 0, 0, 0, 50_000);
    let mut vm = HookVm(|context: &ExecutionContext,
                         kernel: &mut dyn KernelInterface| {
        kernel.mark_for_deletion(addr(3));
        ExecutionResult::success(context.energy_limit)
    });
    let summary = run_tx(&mut repo, &mut vm, &tx);

    assert_eq!(summary.status, ExecutionStatus::Completed);
    assert_eq!(summary.deleted_accounts, vec![doomed]);
    assert!(!repo.has_account(&doomed));
}

#[test]
fn side_effects_merge_fully_on_success_only() {
    let (a, b) = (addr(1), addr(2));
    let mut repo = MemoryRepository::default();
    repo.add_balance(&a, &U256::from(100_000)).unwrap();
    repo.save_code(&b, vec![0xfe]).unwrap();

    let effects = |result: ExecutionResult| {
        move |context: &ExecutionContext,
              kernel: &mut dyn KernelInterface| {
            kernel.log(LogEntry {
                address: context.address,
                topics: vec![],
                data: vec![0x01],
            });
            kernel.record_internal_transaction(InternalTransaction {
                kind: CallKind::Call,
                sender: context.address,
                destination: Some(addr(9)),
                value: U256::zero(),
                data: vec![],
                result: ExecutionResult::success(0),
                rejected: false,
            });
            result.clone()
        }
    };

    let tx = call_tx(a, b, 0, 0, 0, 50_000);
    let mut vm = HookVm(effects(ExecutionResult::success(0)));
    let summary = run_tx(&mut repo, &mut vm, &tx);
    assert_eq!(summary.logs.len(), 1);
    assert_eq!(summary.receipt.logs.len(), 1);
    assert_eq!(summary.internal_transactions.len(), 1);
    assert!(!summary.internal_transactions[0].rejected);

    let tx = call_tx(a, b, 0, 1, 0, 50_000);
    let mut vm = HookVm(effects(ExecutionResult::failure()));
    let summary = run_tx(&mut repo, &mut vm, &tx);
    // Logs are dropped with the reverted transaction; the audit trail of
    // nested calls survives, marked rejected.
    assert!(summary.logs.is_empty());
    assert!(summary.receipt.logs.is_empty());
    assert_eq!(summary.internal_transactions.len(), 1);
    assert!(summary.internal_transactions[0].rejected);
}

mod escrow_end_to_end {
    use super::*;
    use byteorder::{BigEndian, ByteOrder};

    fn create_input(
        is_test: bool, direct_deposit: bool, periods: u16, percent: u64,
        precision: u8,
    ) -> Bytes {
        let mut input = vec![0u8; 14];
        input[0] = 0x0;
        input[1] =
            (direct_deposit as u8) | ((is_test as u8) << 1);
        BigEndian::write_u16(&mut input[2..4], periods);
        let percent_word = U256::from(percent);
        let mut word = [0u8; 32];
        percent_word.to_big_endian(&mut word);
        input[4..13].copy_from_slice(&word[23..32]);
        input[13] = precision;
        input
    }

    fn addressed_input(op: u8, contract: &Address) -> Bytes {
        let mut input = vec![0u8; 33];
        input[0] = op;
        input[1..33].copy_from_slice(contract.as_bytes());
        input
    }

    fn deposit_input(contract: &Address, amount: u64) -> Bytes {
        let mut input = vec![0u8; 161];
        input[0] = 0x0;
        input[1..33].copy_from_slice(contract.as_bytes());
        let mut word = [0u8; 32];
        U256::from(amount).to_big_endian(&mut word);
        input[129..161].copy_from_slice(&word);
        input
    }

    fn escrow_tx(
        sender: Address, builtin: Address, data: Bytes, nonce: u64,
    ) -> Transaction {
        Transaction {
            sender,
            action: Action::Call(builtin),
            value: U256::zero(),
            data,
            nonce: U256::from(nonce),
            energy_price: U256::zero(),
            energy_limit: 100_000,
        }
    }

    #[test]
    fn lock_state_flips_through_the_full_transaction_path() {
        let owner = addr(0xaa);
        let mut repo = MemoryRepository::default();
        repo.add_balance(&owner, &U256::from(1_000_000)).unwrap();
        let mut vm = MockVm(ExecutionResult::failure());

        let tx = escrow_tx(
            owner,
            ESCROW_OWNER_CONTRACT_ADDRESS,
            create_input(true, true, 4, 0, 0),
            0,
        );
        let summary = run_tx(&mut repo, &mut vm, &tx);
        assert_eq!(summary.status, ExecutionStatus::Completed);
        assert_eq!(summary.output.len(), 32);
        let instance = Address::from_slice(&summary.output);

        let tx = escrow_tx(
            owner,
            ESCROW_QUERY_CONTRACT_ADDRESS,
            addressed_input(0x1, &instance),
            1,
        );
        let summary = run_tx(&mut repo, &mut vm, &tx);
        assert_eq!(summary.status, ExecutionStatus::Completed);
        assert_eq!(summary.output, vec![0x0]);

        let tx = escrow_tx(
            owner,
            ESCROW_USER_CONTRACT_ADDRESS,
            deposit_input(&instance, 10),
            2,
        );
        let summary = run_tx(&mut repo, &mut vm, &tx);
        assert_eq!(summary.status, ExecutionStatus::Completed);
        assert_eq!(repo.balance(&instance), U256::from(10));

        let tx = escrow_tx(
            owner,
            ESCROW_OWNER_CONTRACT_ADDRESS,
            addressed_input(0x1, &instance),
            3,
        );
        let summary = run_tx(&mut repo, &mut vm, &tx);
        assert_eq!(summary.status, ExecutionStatus::Completed);

        let tx = escrow_tx(
            owner,
            ESCROW_QUERY_CONTRACT_ADDRESS,
            addressed_input(0x1, &instance),
            4,
        );
        let summary = run_tx(&mut repo, &mut vm, &tx);
        assert_eq!(summary.output, vec![0x1]);
    }

    #[test]
    fn malformed_escrow_input_fails_the_transaction() {
        let owner = addr(0xaa);
        let mut repo = MemoryRepository::default();
        repo.add_balance(&owner, &U256::from(1_000_000)).unwrap();
        let mut vm = MockVm(ExecutionResult::failure());

        // One byte short of a valid create payload.
        let tx = escrow_tx(
            owner,
            ESCROW_OWNER_CONTRACT_ADDRESS,
            vec![0u8; 13],
            0,
        );
        let summary = run_tx(&mut repo, &mut vm, &tx);
        assert_eq!(summary.status, ExecutionStatus::Failed);
        assert_eq!(
            summary.receipt.outcome_status,
            TransactionOutcome::Failure
        );
    }
}
