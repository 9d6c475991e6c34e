//! Board fixtures and scripted replay
//!
//! A fixture describes a view, its live groups and sub-groups, records and
//! cell listings. A script is a list of [`Msg`] values; each one is run
//! through the runtime as one host tick.

use serde::{Deserialize, Serialize};

use crate::config::BoardConfig;
use crate::model::{
    Board, BoardModel, CellKey, Group, GroupId, Record, RecordId, RecordStore, RelationValue,
    SubGroup, SubGroupId, ViewConfig,
};
use crate::messages::Msg;
use crate::runtime::{DetailService, OrderPersistence, Runtime, ServiceCall};
use crate::subgroup_order::SubGroupOrderStore;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellFixture {
    pub cell: CellKey,
    pub ids: Vec<RecordId>,
    /// Total when the listing is paged; defaults to the listed count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardFixture {
    pub view: ViewConfig,
    pub groups: Vec<Group>,
    #[serde(default)]
    pub sub_groups: Vec<SubGroup>,
    #[serde(default)]
    pub records: Vec<Record>,
    #[serde(default)]
    pub cells: Vec<CellFixture>,
    /// Metrics override; the user config applies when absent
    #[serde(default)]
    pub config: Option<BoardConfig>,
}

impl BoardFixture {
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    pub fn into_model(self, sub_group_order: SubGroupOrderStore, config: BoardConfig) -> BoardModel {
        let mut records = RecordStore::new();
        for record in self.records {
            records.upsert_record(record);
        }
        for cell in self.cells {
            let total = cell.total;
            records.set_sequence(&cell.cell, cell.ids);
            if let Some(total) = total {
                records.set_total(&cell.cell, total);
            }
        }

        BoardModel::new(
            self.view,
            Board::new(self.groups, self.sub_groups),
            records,
            sub_group_order,
            self.config.unwrap_or(config),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellReport {
    pub cell: CellKey,
    pub ids: Vec<RecordId>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordReport {
    pub id: RecordId,
    pub values: Vec<(String, RelationValue)>,
}

/// Final state after a replay
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    pub groups: Vec<GroupId>,
    pub lanes: Option<Vec<SubGroupId>>,
    pub hidden: Vec<SubGroupId>,
    pub cells: Vec<CellReport>,
    pub records: Vec<RecordReport>,
    pub calls: Vec<ServiceCall>,
    /// Moves still waiting on a round trip
    pub pending: usize,
}

/// Run `script` against `runtime`, one host tick per message
pub fn replay<S>(runtime: &mut Runtime<S>, script: Vec<Msg>)
where
    S: DetailService + OrderPersistence,
{
    for msg in script {
        runtime.step(msg);
    }
}

/// Snapshot the runtime's model and call log
pub fn report(model: &BoardModel, calls: &[ServiceCall]) -> ReplayReport {
    let mut cells: Vec<CellReport> = model
        .records
        .cell_keys()
        .map(|cell| CellReport {
            cell: cell.clone(),
            ids: model.records.sequence(cell).to_vec(),
            count: model.records.count(cell),
        })
        .collect();
    cells.sort_by(|a, b| a.cell.cmp(&b.cell));

    let mut records: Vec<RecordReport> = model
        .records
        .records()
        .map(|record| RecordReport {
            id: record.id.clone(),
            values: record
                .values
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        })
        .collect();
    records.sort_by(|a, b| a.id.cmp(&b.id));

    ReplayReport {
        groups: model.board.groups.iter().map(|g| g.id.clone()).collect(),
        lanes: model.lanes(),
        hidden: model
            .sub_group_order
            .get_hidden(&model.view.id)
            .into_iter()
            .collect(),
        cells,
        records,
        calls: calls.to_vec(),
        pending: model.ordering.pending_count(),
    }
}
