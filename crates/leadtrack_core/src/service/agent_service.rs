//! Sales agent use-case service.

use crate::model::agent::{AgentDraft, SalesAgent};
use crate::model::now_epoch_ms;
use crate::repo::agent_repo::AgentRepository;
use crate::service::{ServiceError, ServiceResult};
use log::info;

/// Create/list entry points for sales agents.
pub struct AgentService<A: AgentRepository> {
    agents: A,
}

impl<A: AgentRepository> AgentService<A> {
    pub fn new(agents: A) -> Self {
        Self { agents }
    }

    /// Validates and stores a new agent.
    pub fn create_agent(&self, draft: AgentDraft) -> ServiceResult<SalesAgent> {
        let agent = SalesAgent::try_from_draft(draft, now_epoch_ms())?;
        let id = self.agents.create_agent(&agent)?;
        info!(
            "event=agent_create module=agent status=ok agent_id={id} attribute_count={}",
            agent.attributes.len()
        );
        self.agents
            .get_agent(id)?
            .ok_or(ServiceError::InconsistentState(
                "created agent not found in read-back",
            ))
    }

    /// Lists every agent in insertion order.
    pub fn list_agents(&self) -> ServiceResult<Vec<SalesAgent>> {
        Ok(self.agents.list_agents()?)
    }
}
