use op_modules_api::{CallResponse, Context, Storage, WorkingSet};
use tracing::debug;

use crate::ledger::HostLedger;
use crate::{BridgeId, Event, OpHost, OpHostError, Role};

impl<L: HostLedger> OpHost<L> {
    /// Toggles oracle data for outputs proposed from now on. Existing outputs
    /// keep the flag they were proposed with.
    pub(crate) fn set_oracle_enabled<S: Storage>(
        &self,
        bridge_id: BridgeId,
        enabled: bool,
        context: &Context,
        working_set: &mut WorkingSet<S>,
    ) -> Result<CallResponse<Event>, OpHostError> {
        let mut bridge = self.bridge_or_err(bridge_id, working_set)?;
        self.ensure_role(bridge_id, &bridge, context.sender(), Role::ProposerOrAuthority, working_set)?;

        bridge.oracle_enabled = enabled;
        self.bridges.set(&bridge_id, &bridge, working_set);

        debug!(bridge_id, enabled, "Updated oracle flag");
        Ok(Event::UpdateOracle {
            bridge_id,
            oracle_enabled: enabled,
        }
        .into())
    }
}
