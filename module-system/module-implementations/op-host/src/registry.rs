use op_modules_api::{Address, CallResponse, Context, Storage, WorkingSet};
use tracing::{debug, info};

use crate::crypto::l2_denom;
use crate::ledger::HostLedger;
use crate::{BridgeConfig, BridgeId, Event, OpHost, OpHostError, Role};

impl<L: HostLedger> OpHost<L> {
    pub(crate) fn register_bridge<S: Storage>(
        &self,
        config: BridgeConfig,
        l1_denoms: Vec<String>,
        context: &Context,
        working_set: &mut WorkingSet<S>,
    ) -> Result<CallResponse<Event>, OpHostError> {
        let events = self.create_bridge(*context.sender(), config, &l1_denoms, working_set)?;
        Ok(CallResponse::with_events(events))
    }

    /// Allocates the next bridge id and stores `config` with its token pairs.
    /// Shared by the registration call and genesis.
    pub(crate) fn create_bridge<S: Storage>(
        &self,
        creator: Address,
        config: BridgeConfig,
        l1_denoms: &[String],
        working_set: &mut WorkingSet<S>,
    ) -> Result<Vec<Event>, OpHostError> {
        validate_config(&config)?;

        let bridge_id = self.next_bridge_id.get(working_set).unwrap_or(1);
        self.bridges.set(&bridge_id, &config, working_set);
        self.next_bridge_id.set(&(bridge_id + 1), working_set);

        let mut events = vec![Event::CreateBridge {
            bridge_id,
            creator,
            proposer: config.proposer,
            challenger: config.challenger,
            batch_info: config.batch_info.clone(),
        }];
        for l1_denom in l1_denoms {
            events.push(self.add_token_pair(bridge_id, l1_denom.clone(), working_set)?);
        }

        info!(
            bridge_id,
            %creator,
            proposer = %config.proposer,
            challenger = %config.challenger,
            "Registered bridge"
        );
        Ok(events)
    }

    pub(crate) fn update_proposer<S: Storage>(
        &self,
        bridge_id: BridgeId,
        new_proposer: Address,
        context: &Context,
        working_set: &mut WorkingSet<S>,
    ) -> Result<CallResponse<Event>, OpHostError> {
        let mut bridge = self.bridge_or_err(bridge_id, working_set)?;
        self.ensure_role(bridge_id, &bridge, context.sender(), Role::ProposerOrAuthority, working_set)?;

        bridge.proposer = new_proposer;
        validate_config(&bridge)?;
        self.bridges.set(&bridge_id, &bridge, working_set);

        debug!(bridge_id, proposer = %new_proposer, "Updated proposer");
        Ok(Event::UpdateProposer {
            bridge_id,
            proposer: new_proposer,
        }
        .into())
    }

    pub(crate) fn update_challenger<S: Storage>(
        &self,
        bridge_id: BridgeId,
        new_challenger: Address,
        context: &Context,
        working_set: &mut WorkingSet<S>,
    ) -> Result<CallResponse<Event>, OpHostError> {
        let mut bridge = self.bridge_or_err(bridge_id, working_set)?;
        self.ensure_role(bridge_id, &bridge, context.sender(), Role::ChallengerOrAuthority, working_set)?;

        bridge.challenger = new_challenger;
        validate_config(&bridge)?;
        self.bridges.set(&bridge_id, &bridge, working_set);

        debug!(bridge_id, challenger = %new_challenger, "Updated challenger");
        Ok(Event::UpdateChallenger {
            bridge_id,
            challenger: new_challenger,
        }
        .into())
    }

    pub(crate) fn update_metadata<S: Storage>(
        &self,
        bridge_id: BridgeId,
        metadata: Vec<u8>,
        context: &Context,
        working_set: &mut WorkingSet<S>,
    ) -> Result<CallResponse<Event>, OpHostError> {
        let mut bridge = self.bridge_or_err(bridge_id, working_set)?;
        self.ensure_role(bridge_id, &bridge, context.sender(), Role::ChallengerOrAuthority, working_set)?;

        bridge.metadata = metadata.clone();
        self.bridges.set(&bridge_id, &bridge, working_set);

        debug!(bridge_id, len = metadata.len(), "Updated metadata");
        Ok(Event::UpdateMetadata {
            bridge_id,
            metadata,
        }
        .into())
    }

    pub(crate) fn register_token_pair<S: Storage>(
        &self,
        bridge_id: BridgeId,
        l1_denom: String,
        context: &Context,
        working_set: &mut WorkingSet<S>,
    ) -> Result<CallResponse<Event>, OpHostError> {
        let bridge = self.bridge_or_err(bridge_id, working_set)?;
        self.ensure_role(bridge_id, &bridge, context.sender(), Role::ProposerOrAuthority, working_set)?;

        Ok(self.add_token_pair(bridge_id, l1_denom, working_set)?.into())
    }

    fn add_token_pair<S: Storage>(
        &self,
        bridge_id: BridgeId,
        l1_denom: String,
        working_set: &mut WorkingSet<S>,
    ) -> Result<Event, OpHostError> {
        if l1_denom.is_empty() {
            return Err(OpHostError::InvalidConfig("empty denom".to_owned()));
        }
        let key = (bridge_id, l1_denom);
        if self.token_pairs.contains(&key, working_set) {
            return Err(OpHostError::InvalidConfig(format!(
                "denom {:?} is already registered on bridge {}",
                key.1, bridge_id
            )));
        }

        let l2_denom = l2_denom(bridge_id, &key.1);
        self.token_pairs.set(&key, &l2_denom, working_set);

        let (_, l1_denom) = key;
        debug!(bridge_id, %l1_denom, %l2_denom, "Registered token pair");
        Ok(Event::RegisterTokenPair {
            bridge_id,
            l1_denom,
            l2_denom,
        })
    }

    /// Child-chain denom paired with `l1_denom`, or `UnsupportedDenom`.
    pub(crate) fn l2_denom_or_err<S: Storage>(
        &self,
        bridge_id: BridgeId,
        l1_denom: &str,
        working_set: &mut WorkingSet<S>,
    ) -> Result<String, OpHostError> {
        self.token_pairs
            .get(&(bridge_id, l1_denom.to_owned()), working_set)
            .ok_or_else(|| OpHostError::UnsupportedDenom {
                bridge_id,
                denom: l1_denom.to_owned(),
            })
    }

    pub(crate) fn bridge_or_err<S: Storage>(
        &self,
        bridge_id: BridgeId,
        working_set: &mut WorkingSet<S>,
    ) -> Result<BridgeConfig, OpHostError> {
        self.bridges
            .get(&bridge_id, working_set)
            .ok_or_else(|| OpHostError::bridge_not_found(bridge_id))
    }

    pub(crate) fn is_authority<S: Storage>(
        &self,
        address: &Address,
        working_set: &mut WorkingSet<S>,
    ) -> bool {
        self.authority.get(working_set).as_ref() == Some(address)
    }

    /// Fails with `Unauthorized` unless `sender` holds `role` on the bridge.
    pub(crate) fn ensure_role<S: Storage>(
        &self,
        bridge_id: BridgeId,
        bridge: &BridgeConfig,
        sender: &Address,
        role: Role,
        working_set: &mut WorkingSet<S>,
    ) -> Result<(), OpHostError> {
        let allowed = match role {
            Role::Proposer => sender == &bridge.proposer,
            Role::Challenger => sender == &bridge.challenger,
            Role::BatchSubmitter => sender == &bridge.batch_info.submitter,
            Role::ProposerOrAuthority => {
                sender == &bridge.proposer || self.is_authority(sender, working_set)
            }
            Role::ChallengerOrAuthority => {
                sender == &bridge.challenger || self.is_authority(sender, working_set)
            }
        };
        if allowed {
            Ok(())
        } else {
            Err(OpHostError::Unauthorized {
                bridge_id,
                sender: *sender,
                role,
            })
        }
    }
}

fn validate_config(config: &BridgeConfig) -> Result<(), OpHostError> {
    if config.finalization_period == 0 {
        return Err(OpHostError::InvalidConfig(
            "finalization period must be positive".to_owned(),
        ));
    }
    if config.submission_interval == 0 {
        return Err(OpHostError::InvalidConfig(
            "submission interval must be positive".to_owned(),
        ));
    }
    if config.proposer == config.challenger {
        return Err(OpHostError::InvalidConfig(
            "proposer and challenger must differ".to_owned(),
        ));
    }
    Ok(())
}
