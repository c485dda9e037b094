#![allow(dead_code)]

use op_host::ledger::{BalanceConfig, BankConfig};
use op_host::merkle::{ProofStep, WithdrawalLeaf, WithdrawalTree};
use op_host::{
    sha3_256, Amount, BatchInfo, BlockRange, BridgeConfig, BridgeGenesis, BridgeId, CallMessage,
    ChainType, Digest, Event, OpHost, OpHostConfig, OpHostError, OutputIndex, WithdrawalClaim,
};
use op_modules_api::{Address, Context, Module, ModuleError, WorkingSet};
use op_state::InMemoryStorage;
use tracing_subscriber::EnvFilter;

pub type Storage = InMemoryStorage;

pub const BRIDGE_ID: BridgeId = 1;
pub const DENOM: &str = "uinit";
pub const OTHER_DENOM: &str = "X";
pub const FINALIZATION_PERIOD: u64 = 100;
pub const INITIAL_BALANCE: u64 = 1_000;

pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn generate_address(key: &str) -> Address {
    Address::from(sha3_256(&[key.as_bytes()]).0)
}

pub struct Actors {
    pub authority: Address,
    pub proposer: Address,
    pub challenger: Address,
    pub submitter: Address,
    pub alice: Address,
    pub bob: Address,
}

pub fn actors() -> Actors {
    Actors {
        authority: generate_address("authority"),
        proposer: generate_address("proposer"),
        challenger: generate_address("challenger"),
        submitter: generate_address("submitter"),
        alice: generate_address("alice"),
        bob: generate_address("bob"),
    }
}

pub fn bridge_config(actors: &Actors) -> BridgeConfig {
    BridgeConfig {
        proposer: actors.proposer,
        challenger: actors.challenger,
        submission_interval: 10,
        finalization_period: FINALIZATION_PERIOD,
        batch_info: BatchInfo {
            chain_type: ChainType::Celestia,
            submitter: actors.submitter,
        },
        oracle_enabled: false,
        metadata: Vec::new(),
    }
}

/// One bridge supporting [`DENOM`] and [`OTHER_DENOM`], with alice funded in both.
pub fn create_op_host_config(actors: &Actors) -> OpHostConfig {
    let denoms = vec![DENOM.to_owned(), OTHER_DENOM.to_owned()];
    OpHostConfig {
        authority: actors.authority,
        bridges: vec![BridgeGenesis {
            config: bridge_config(actors),
            l1_denoms: denoms.clone(),
        }],
        ledger: BankConfig {
            balances: denoms
                .iter()
                .map(|denom| BalanceConfig {
                    address: actors.alice,
                    denom: denom.clone(),
                    amount: Amount::from(INITIAL_BALANCE),
                })
                .collect(),
            denoms,
        },
    }
}

/// A module after genesis, over a fresh storage.
pub fn setup() -> (OpHost, Actors, WorkingSet<Storage>) {
    init_logging();
    let actors = actors();
    let module = OpHost::default();
    let mut working_set = WorkingSet::new(Storage::new());
    module
        .genesis(&create_op_host_config(&actors), &mut working_set)
        .unwrap();
    (module, actors, working_set)
}

/// Context of a call signed by `sender` in the block at `time`.
pub fn context(sender: Address, time: u64) -> Context {
    Context::new(sender, time, time + 1)
}

pub fn root(byte: u8) -> Digest {
    Digest([byte; 32])
}

/// Extracts the typed error of a failed [`Module::call`].
pub fn host_error(err: ModuleError) -> OpHostError {
    let ModuleError::ModuleError(err) = err;
    err.downcast::<OpHostError>()
        .expect("error is not an OpHostError")
}

pub fn propose(
    module: &OpHost,
    actors: &Actors,
    range: (u64, u64),
    output_root: Digest,
    time: u64,
    working_set: &mut WorkingSet<Storage>,
) -> Result<OutputIndex, OpHostError> {
    let response = module.dispatch(
        CallMessage::ProposeOutput {
            bridge_id: BRIDGE_ID,
            output_root,
            block_range: BlockRange::new(range.0, range.1),
        },
        &context(actors.proposer, time),
        working_set,
    )?;
    match response.events.as_slice() {
        [Event::ProposeOutput { output_index, .. }] => Ok(*output_index),
        events => panic!("unexpected events {:?}", events),
    }
}

pub fn delete(
    module: &OpHost,
    actors: &Actors,
    output_index: OutputIndex,
    time: u64,
    working_set: &mut WorkingSet<Storage>,
) -> Result<Vec<Event>, OpHostError> {
    module
        .dispatch(
            CallMessage::DeleteOutput {
                bridge_id: BRIDGE_ID,
                output_index,
            },
            &context(actors.challenger, time),
            working_set,
        )
        .map(|response| response.events)
}

pub fn withdrawal(l2_sequence: u64, sender: Address, receiver: Address, amount: u64, denom: &str) -> WithdrawalLeaf {
    WithdrawalLeaf {
        bridge_id: BRIDGE_ID,
        l2_sequence,
        sender,
        receiver,
        amount: Amount::from(amount),
        denom: denom.to_owned(),
    }
}

pub fn claim(
    leaf: &WithdrawalLeaf,
    output_index: OutputIndex,
    proof: Vec<ProofStep>,
) -> WithdrawalClaim {
    WithdrawalClaim {
        bridge_id: leaf.bridge_id,
        output_index,
        l2_sequence: leaf.l2_sequence,
        sender: leaf.sender,
        receiver: leaf.receiver,
        amount: leaf.amount,
        denom: leaf.denom.clone(),
        proof,
    }
}

/// Proposes the root of `leaves` at `time` over `range` and lets it finalize.
/// Returns the output index and the tree.
pub fn finalized_withdrawals(
    module: &OpHost,
    actors: &Actors,
    leaves: &[WithdrawalLeaf],
    range: (u64, u64),
    time: u64,
    working_set: &mut WorkingSet<Storage>,
) -> (OutputIndex, WithdrawalTree) {
    let tree = WithdrawalTree::from_withdrawals(leaves).unwrap();
    let output_index = propose(module, actors, range, tree.root().unwrap(), time, working_set).unwrap();
    module.finalize_due(BRIDGE_ID, time + FINALIZATION_PERIOD + 1, working_set);
    (output_index, tree)
}
