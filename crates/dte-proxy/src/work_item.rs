// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Durable Task Execution contributors

//! The tagged union sent outbound on the worker-bound stream (§6).

use dte_engine::executor::{ActivityRequest, OrchestratorRequest};
use serde::{Deserialize, Serialize};

/// One unit of dispatch sent to the attached worker.
///
/// A real transport frames this as whatever its wire format prefers; the
/// shape here is the "bit-exact at the semantic level" contract §6 asks
/// for: a tagged union of the two request kinds, nothing more.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum WorkItem {
    Orchestrator(OrchestratorRequest),
    Activity(ActivityRequest),
}

impl WorkItem {
    pub fn kind(&self) -> &'static str {
        match self {
            WorkItem::Orchestrator(_) => "orchestrator",
            WorkItem::Activity(_) => "activity",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dte_core::execution_id::ExecutionId;
    use dte_core::instance_id::InstanceId;

    #[test]
    fn kind_names_match_variant() {
        let item = WorkItem::Orchestrator(OrchestratorRequest {
            instance: InstanceId::new("i1"),
            execution_id: ExecutionId::new(),
            past_events: vec![],
            new_events: vec![],
        });
        assert_eq!(item.kind(), "orchestrator");

        let item = WorkItem::Activity(ActivityRequest {
            instance: InstanceId::new("i1"),
            execution_id: ExecutionId::new(),
            task_id: 1,
            name: "echo".into(),
            version: "".into(),
            input: None,
        });
        assert_eq!(item.kind(), "activity");
    }
}
