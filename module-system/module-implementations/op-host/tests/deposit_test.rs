mod helpers;

use helpers::*;
use op_host::{l2_denom, Amount, CallMessage, DepositRecord, Event, OpHost, OpHostError};
use op_modules_api::{apply_call, Address, StateCheckpoint};

fn deposit_msg(receiver: Address, amount: u64, denom: &str, hook: Option<Vec<u8>>) -> CallMessage {
    CallMessage::InitiateDeposit {
        bridge_id: BRIDGE_ID,
        receiver,
        amount: Amount::from(amount),
        denom: denom.to_owned(),
        hook,
    }
}

#[test]
fn deposits_take_increasing_sequences() {
    let (module, actors, mut working_set) = setup();
    let alice = context(actors.alice, 10);

    let response = module
        .dispatch(deposit_msg(actors.bob, 100, DENOM, None), &alice, &mut working_set)
        .unwrap();
    assert_eq!(
        response.events,
        vec![Event::InitiateTokenDeposit {
            bridge_id: BRIDGE_ID,
            l1_sequence: 1,
            from: actors.alice,
            to: actors.bob,
            amount: Amount::from(100),
            l1_denom: DENOM.to_owned(),
            l2_denom: l2_denom(BRIDGE_ID, DENOM),
            data: vec![],
        }]
    );

    let response = module
        .dispatch(
            deposit_msg(actors.bob, 50, DENOM, Some(b"hook".to_vec())),
            &alice,
            &mut working_set,
        )
        .unwrap();
    match &response.events[..] {
        [Event::InitiateTokenDeposit {
            l1_sequence, data, ..
        }] => {
            assert_eq!(*l1_sequence, 2);
            assert_eq!(data, b"hook");
        }
        other => panic!("unexpected events {:?}", other),
    }

    assert_eq!(
        module.deposit(BRIDGE_ID, 2, &mut working_set),
        Some(DepositRecord {
            sender: actors.alice,
            receiver: actors.bob,
            amount: Amount::from(50),
            l1_denom: DENOM.to_owned(),
            l2_denom: l2_denom(BRIDGE_ID, DENOM),
            hook: Some(b"hook".to_vec()),
            block_height: 11,
        })
    );
    assert_eq!(module.next_l1_sequence(BRIDGE_ID, &mut working_set), 3);
    assert_eq!(
        module.balance(&actors.alice, DENOM, &mut working_set),
        Amount::from(INITIAL_BALANCE - 150)
    );
}

#[test]
fn deposit_input_is_validated() {
    let (module, actors, mut working_set) = setup();
    let alice = context(actors.alice, 0);

    let err = module
        .dispatch(deposit_msg(actors.bob, 0, DENOM, None), &alice, &mut working_set)
        .unwrap_err();
    assert_eq!(err, OpHostError::InvalidAmount);

    let err = module
        .dispatch(deposit_msg(actors.bob, 1, "uatom", None), &alice, &mut working_set)
        .unwrap_err();
    assert_eq!(
        err,
        OpHostError::UnsupportedDenom {
            bridge_id: BRIDGE_ID,
            denom: "uatom".to_owned(),
        }
    );

    let err = module
        .dispatch(
            CallMessage::InitiateDeposit {
                bridge_id: 5,
                receiver: actors.bob,
                amount: Amount::from(1),
                denom: DENOM.to_owned(),
                hook: None,
            },
            &alice,
            &mut working_set,
        )
        .unwrap_err();
    assert!(matches!(err, OpHostError::NotFound(_)));
    assert_eq!(module.next_l1_sequence(BRIDGE_ID, &mut working_set), 1);
}

#[test]
fn failed_debit_consumes_no_sequence() {
    let (module, actors, working_set) = setup();
    let checkpoint: StateCheckpoint<Storage> = working_set.checkpoint();

    let (result, checkpoint) = apply_call(
        &module,
        deposit_msg(actors.alice, INITIAL_BALANCE + 1, DENOM, None),
        &context(actors.bob, 0),
        checkpoint,
    );
    assert_eq!(
        host_error(result.unwrap_err()),
        OpHostError::InsufficientFunds {
            address: actors.bob,
            denom: DENOM.to_owned(),
            needed: Amount::from(INITIAL_BALANCE + 1),
        }
    );

    let (result, checkpoint) = apply_call(
        &module,
        deposit_msg(actors.bob, INITIAL_BALANCE, DENOM, None),
        &context(actors.alice, 1),
        checkpoint,
    );
    assert_eq!(result.unwrap().events[0].kind(), "initiate_token_deposit");

    let mut working_set = checkpoint.to_revertable();
    assert_eq!(module.next_l1_sequence(BRIDGE_ID, &mut working_set), 2);
    assert!(module.deposit(BRIDGE_ID, 1, &mut working_set).is_some());
    assert_eq!(
        module.balance(&actors.alice, DENOM, &mut working_set),
        Amount::ZERO
    );
}

#[test]
fn sequences_are_per_bridge_and_survive_commit() {
    let (module, actors, working_set) = setup();
    let storage = working_set.backing().clone();

    let mut working_set = working_set;
    module
        .dispatch(
            CallMessage::RegisterBridge {
                config: bridge_config(&actors),
                l1_denoms: vec![DENOM.to_owned()],
            },
            &context(actors.authority, 0),
            &mut working_set,
        )
        .unwrap();
    module
        .dispatch(deposit_msg(actors.bob, 1, DENOM, None), &context(actors.alice, 0), &mut working_set)
        .unwrap();
    working_set.checkpoint().commit().unwrap();

    let module = OpHost::default();
    let mut working_set = op_modules_api::WorkingSet::new(storage);
    let response = module
        .dispatch(
            CallMessage::InitiateDeposit {
                bridge_id: 2,
                receiver: actors.bob,
                amount: Amount::from(1),
                denom: DENOM.to_owned(),
                hook: None,
            },
            &context(actors.alice, 1),
            &mut working_set,
        )
        .unwrap();
    match &response.events[..] {
        [Event::InitiateTokenDeposit {
            bridge_id: 2,
            l1_sequence: 1,
            l2_denom: denom,
            ..
        }] => assert_eq!(denom, &l2_denom(2, DENOM)),
        other => panic!("unexpected events {:?}", other),
    }
    assert_eq!(module.next_l1_sequence(BRIDGE_ID, &mut working_set), 2);
}
