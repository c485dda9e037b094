mod helpers;

use helpers::*;
use op_host::{
    l2_denom, sha3_256, BatchInfo, CallMessage, ChainType, Event, OpHostError, Role,
};
use op_modules_api::Module;

#[test]
fn genesis_registers_bridge_and_token_pairs() {
    let (module, actors, mut working_set) = setup();

    assert_eq!(module.authority(&mut working_set), Some(actors.authority));
    let bridge = module.bridge(BRIDGE_ID, &mut working_set).unwrap();
    assert_eq!(bridge.config, bridge_config(&actors));
    assert_eq!(module.bridges(&mut working_set).len(), 1);

    assert_eq!(
        module.token_pair(BRIDGE_ID, DENOM, &mut working_set),
        Some(l2_denom(BRIDGE_ID, DENOM))
    );
    assert_eq!(module.token_pair(BRIDGE_ID, "uatom", &mut working_set), None);
    assert_eq!(module.next_output_index(BRIDGE_ID, &mut working_set), 1);
    assert_eq!(module.next_l1_sequence(BRIDGE_ID, &mut working_set), 1);
}

#[test]
fn genesis_twice_fails() {
    let (module, actors, mut working_set) = setup();
    assert!(module
        .genesis(&create_op_host_config(&actors), &mut working_set)
        .is_err());
}

#[test]
fn register_bridge_allocates_sequential_ids() {
    let (module, actors, mut working_set) = setup();
    let creator = generate_address("creator");

    let response = module
        .dispatch(
            CallMessage::RegisterBridge {
                config: bridge_config(&actors),
                l1_denoms: vec!["uusdc".to_owned()],
            },
            &context(creator, 0),
            &mut working_set,
        )
        .unwrap();

    let kinds: Vec<_> = response.events.iter().map(Event::kind).collect();
    assert_eq!(kinds, vec!["create_bridge", "register_token_pair"]);
    match &response.events[0] {
        Event::CreateBridge {
            bridge_id,
            creator: event_creator,
            ..
        } => {
            assert_eq!(*bridge_id, 2);
            assert_eq!(*event_creator, creator);
        }
        other => panic!("unexpected event {:?}", other),
    }
    assert_eq!(
        module.token_pair(2, "uusdc", &mut working_set),
        Some(l2_denom(2, "uusdc"))
    );
    // Token pairs are per bridge.
    assert_eq!(module.token_pair(2, DENOM, &mut working_set), None);
}

#[test]
fn register_bridge_rejects_invalid_config() {
    let (module, actors, mut working_set) = setup();
    let sender = context(actors.alice, 0);

    let mut zero_period = bridge_config(&actors);
    zero_period.finalization_period = 0;
    let mut zero_interval = bridge_config(&actors);
    zero_interval.submission_interval = 0;
    let mut same_roles = bridge_config(&actors);
    same_roles.challenger = same_roles.proposer;

    for config in [zero_period, zero_interval, same_roles] {
        let err = module
            .dispatch(
                CallMessage::RegisterBridge {
                    config,
                    l1_denoms: vec![],
                },
                &sender,
                &mut working_set,
            )
            .unwrap_err();
        assert!(matches!(err, OpHostError::InvalidConfig(_)), "{:?}", err);
    }
    assert!(module.bridge(2, &mut working_set).is_none());
}

#[test]
fn proposer_rotation_requires_proposer_or_authority() {
    let (module, actors, mut working_set) = setup();
    let next = generate_address("next_proposer");
    let rotate = |new_proposer| CallMessage::UpdateProposer {
        bridge_id: BRIDGE_ID,
        new_proposer,
    };

    let err = module
        .dispatch(rotate(next), &context(actors.challenger, 0), &mut working_set)
        .unwrap_err();
    assert_eq!(
        err,
        OpHostError::Unauthorized {
            bridge_id: BRIDGE_ID,
            sender: actors.challenger,
            role: Role::ProposerOrAuthority,
        }
    );

    let response = module
        .dispatch(rotate(next), &context(actors.proposer, 0), &mut working_set)
        .unwrap();
    assert_eq!(
        response.events,
        vec![Event::UpdateProposer {
            bridge_id: BRIDGE_ID,
            proposer: next
        }]
    );

    // The old proposer lost the role, the authority keeps it.
    assert!(module
        .dispatch(rotate(actors.proposer), &context(actors.proposer, 0), &mut working_set)
        .is_err());
    module
        .dispatch(rotate(actors.proposer), &context(actors.authority, 0), &mut working_set)
        .unwrap();
    assert_eq!(
        module.bridge(BRIDGE_ID, &mut working_set).unwrap().config.proposer,
        actors.proposer
    );
}

#[test]
fn rotation_cannot_merge_roles() {
    let (module, actors, mut working_set) = setup();
    let err = module
        .dispatch(
            CallMessage::UpdateChallenger {
                bridge_id: BRIDGE_ID,
                new_challenger: actors.proposer,
            },
            &context(actors.challenger, 0),
            &mut working_set,
        )
        .unwrap_err();
    assert!(matches!(err, OpHostError::InvalidConfig(_)));
}

#[test]
fn unknown_bridge_is_not_found() {
    let (module, actors, mut working_set) = setup();
    let err = module
        .dispatch(
            CallMessage::UpdateChallenger {
                bridge_id: 42,
                new_challenger: actors.bob,
            },
            &context(actors.authority, 0),
            &mut working_set,
        )
        .unwrap_err();
    assert_eq!(err.to_string(), "bridge 42 not found");
}

#[test]
fn metadata_is_updated_by_challenger() {
    let (module, actors, mut working_set) = setup();
    let update = CallMessage::UpdateMetadata {
        bridge_id: BRIDGE_ID,
        metadata: b"ipfs://bridge".to_vec(),
    };

    assert!(module
        .dispatch(update.clone(), &context(actors.proposer, 0), &mut working_set)
        .is_err());
    let response = module
        .dispatch(update, &context(actors.challenger, 0), &mut working_set)
        .unwrap();
    assert_eq!(response.events[0].kind(), "update_metadata");
    assert_eq!(
        module.bridge(BRIDGE_ID, &mut working_set).unwrap().config.metadata,
        b"ipfs://bridge".to_vec()
    );
}

#[test]
fn batch_info_update_moves_the_submitter() {
    let (module, actors, mut working_set) = setup();
    let batch_info = BatchInfo {
        chain_type: ChainType::Host,
        submitter: actors.bob,
    };
    let record = CallMessage::RecordBatch {
        bridge_id: BRIDGE_ID,
        batch: b"batch-1".to_vec(),
    };

    let response = module
        .dispatch(record.clone(), &context(actors.submitter, 5), &mut working_set)
        .unwrap();
    assert_eq!(
        response.events,
        vec![Event::RecordBatch {
            bridge_id: BRIDGE_ID,
            submitter: actors.submitter,
            batch_hash: sha3_256(&[&b"batch-1"[..]]),
            batch_len: 7,
        }]
    );

    assert!(module
        .dispatch(
            CallMessage::UpdateBatchInfo {
                bridge_id: BRIDGE_ID,
                batch_info: batch_info.clone(),
            },
            &context(actors.submitter, 5),
            &mut working_set,
        )
        .is_err());
    module
        .dispatch(
            CallMessage::UpdateBatchInfo {
                bridge_id: BRIDGE_ID,
                batch_info: batch_info.clone(),
            },
            &context(actors.proposer, 5),
            &mut working_set,
        )
        .unwrap();
    assert_eq!(
        module.bridge(BRIDGE_ID, &mut working_set).unwrap().config.batch_info,
        batch_info
    );

    let err = module
        .dispatch(record.clone(), &context(actors.submitter, 6), &mut working_set)
        .unwrap_err();
    assert!(matches!(
        err,
        OpHostError::Unauthorized {
            role: Role::BatchSubmitter,
            ..
        }
    ));
    module
        .dispatch(record, &context(actors.bob, 6), &mut working_set)
        .unwrap();
}

#[test]
fn oracle_flag_applies_to_later_outputs_only() {
    let (module, actors, mut working_set) = setup();
    let first = propose(&module, &actors, (1, 10), root(1), 0, &mut working_set).unwrap();

    let response = module
        .dispatch(
            CallMessage::SetOracleEnabled {
                bridge_id: BRIDGE_ID,
                enabled: true,
            },
            &context(actors.authority, 1),
            &mut working_set,
        )
        .unwrap();
    assert_eq!(
        response.events,
        vec![Event::UpdateOracle {
            bridge_id: BRIDGE_ID,
            oracle_enabled: true
        }]
    );

    let second = propose(&module, &actors, (11, 20), root(2), 2, &mut working_set).unwrap();
    assert!(!module.output(BRIDGE_ID, first, &mut working_set).unwrap().oracle_enabled);
    assert!(module.output(BRIDGE_ID, second, &mut working_set).unwrap().oracle_enabled);
}

#[test]
fn token_pair_registration() {
    let (module, actors, mut working_set) = setup();
    let register = |l1_denom: &str| CallMessage::RegisterTokenPair {
        bridge_id: BRIDGE_ID,
        l1_denom: l1_denom.to_owned(),
    };

    assert!(module
        .dispatch(register("uusdc"), &context(actors.alice, 0), &mut working_set)
        .is_err());
    let response = module
        .dispatch(register("uusdc"), &context(actors.proposer, 0), &mut working_set)
        .unwrap();
    assert_eq!(
        response.events,
        vec![Event::RegisterTokenPair {
            bridge_id: BRIDGE_ID,
            l1_denom: "uusdc".to_owned(),
            l2_denom: l2_denom(BRIDGE_ID, "uusdc"),
        }]
    );

    let err = module
        .dispatch(register(DENOM), &context(actors.proposer, 0), &mut working_set)
        .unwrap_err();
    assert!(matches!(err, OpHostError::InvalidConfig(_)));
}

#[test]
fn module_call_wraps_typed_errors() {
    let (module, actors, mut working_set) = setup();
    let err = module
        .call(
            CallMessage::SetOracleEnabled {
                bridge_id: 9,
                enabled: true,
            },
            &context(actors.authority, 0),
            &mut working_set,
        )
        .unwrap_err();
    assert_eq!(
        host_error(err),
        OpHostError::NotFound(op_host::Missing::Bridge(9))
    );
}
