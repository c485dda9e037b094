use anyhow::{bail, Result};
use op_modules_api::{Address, Storage, WorkingSet};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ledger::{BankConfig, HostLedger};
use crate::{BridgeConfig, OpHost};

/// A bridge registered at genesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeGenesis {
    pub config: BridgeConfig,
    #[serde(default)]
    pub l1_denoms: Vec<String>,
}

/// Initial configuration for the op-host module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpHostConfig<LC = BankConfig> {
    /// Governance address allowed to rotate roles on every bridge.
    pub authority: Address,
    #[serde(default)]
    pub bridges: Vec<BridgeGenesis>,
    pub ledger: LC,
}

impl<L: HostLedger> OpHost<L> {
    pub(crate) fn init_module<S: Storage>(
        &self,
        config: &OpHostConfig<L::Config>,
        working_set: &mut WorkingSet<S>,
    ) -> Result<()> {
        if self.authority.get(working_set).is_some() {
            bail!("op-host module is already initialized");
        }
        self.authority.set(&config.authority, working_set);
        self.ledger.init(&config.ledger, working_set)?;

        for bridge in &config.bridges {
            self.create_bridge(
                config.authority,
                bridge.config.clone(),
                &bridge.l1_denoms,
                working_set,
            )?;
        }

        info!(
            authority = %config.authority,
            bridges = config.bridges.len(),
            "Initialized op-host module"
        );
        Ok(())
    }
}
