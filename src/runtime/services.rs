//! External services the runtime calls for round trips

use serde::Serialize;

use crate::model::{CellKey, GroupOrderEntry, RecordId, RelationDetail, ViewId};

/// Writes relation values on a record
pub trait DetailService {
    fn update_relation_values(
        &mut self,
        record_id: &RecordId,
        details: &[RelationDetail],
    ) -> Result<(), String>;
}

/// Persists group and cell orders against the store the view reloads from
pub trait OrderPersistence {
    fn persist_group_order(
        &mut self,
        view_id: &ViewId,
        groups: &[GroupOrderEntry],
    ) -> Result<(), String>;

    fn persist_cell_order(
        &mut self,
        view_id: &ViewId,
        cell: &CellKey,
        ids: &[RecordId],
    ) -> Result<(), String>;
}

/// One call made against the services
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum ServiceCall {
    UpdateRelationValues {
        record_id: RecordId,
        details: Vec<RelationDetail>,
        ok: bool,
    },
    PersistGroupOrder {
        view_id: ViewId,
        groups: Vec<GroupOrderEntry>,
        ok: bool,
    },
    PersistCellOrder {
        view_id: ViewId,
        cell: CellKey,
        ids: Vec<RecordId>,
        ok: bool,
    },
}

impl ServiceCall {
    pub fn is_order_persist(&self) -> bool {
        matches!(
            self,
            ServiceCall::PersistGroupOrder { .. } | ServiceCall::PersistCellOrder { .. }
        )
    }
}

/// Services that log every call and fail on demand
#[derive(Debug, Clone, Default)]
pub struct RecordingServices {
    pub calls: Vec<ServiceCall>,
    pub fail_details: bool,
    pub fail_orders: bool,
}

impl RecordingServices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_details() -> Self {
        Self {
            fail_details: true,
            ..Self::default()
        }
    }

    pub fn failing_orders() -> Self {
        Self {
            fail_orders: true,
            ..Self::default()
        }
    }

    pub fn order_calls(&self) -> impl Iterator<Item = &ServiceCall> {
        self.calls.iter().filter(|c| c.is_order_persist())
    }

    fn outcome(fail: bool, what: &str) -> Result<(), String> {
        if fail {
            Err(format!("{} rejected", what))
        } else {
            Ok(())
        }
    }
}

impl DetailService for RecordingServices {
    fn update_relation_values(
        &mut self,
        record_id: &RecordId,
        details: &[RelationDetail],
    ) -> Result<(), String> {
        let result = Self::outcome(self.fail_details, "detail update");
        self.calls.push(ServiceCall::UpdateRelationValues {
            record_id: record_id.clone(),
            details: details.to_vec(),
            ok: result.is_ok(),
        });
        result
    }
}

impl OrderPersistence for RecordingServices {
    fn persist_group_order(
        &mut self,
        view_id: &ViewId,
        groups: &[GroupOrderEntry],
    ) -> Result<(), String> {
        let result = Self::outcome(self.fail_orders, "group order");
        self.calls.push(ServiceCall::PersistGroupOrder {
            view_id: view_id.clone(),
            groups: groups.to_vec(),
            ok: result.is_ok(),
        });
        result
    }

    fn persist_cell_order(
        &mut self,
        view_id: &ViewId,
        cell: &CellKey,
        ids: &[RecordId],
    ) -> Result<(), String> {
        let result = Self::outcome(self.fail_orders, "cell order");
        self.calls.push(ServiceCall::PersistCellOrder {
            view_id: view_id.clone(),
            cell: cell.clone(),
            ids: ids.to_vec(),
            ok: result.is_ok(),
        });
        result
    }
}
