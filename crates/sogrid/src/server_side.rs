//! Server-side row model shapes.
//!
//! In server-side mode the grid does not sort, filter or paginate locally.
//! The host fetches one page at a time, described by a [`ServerSideRequest`],
//! and hands the result back as a [`ServerSideResponse`].

use serde::{Deserialize, Serialize};
use sogrid_table::PaginationState;

use crate::model::{FilterModel, SortModel, to_filter_model, to_sort_model};
use crate::state::GridState;

/// Parameters of one page fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerSideRequest {
    /// First row of the page, zero-based, inclusive.
    pub start_row: usize,
    /// End of the page, exclusive.
    pub end_row: usize,
    pub sort_model: Vec<SortModel>,
    pub filter_model: FilterModel,
}

impl ServerSideRequest {
    /// Describes the page the given state is positioned on.
    pub fn from_state(state: &GridState) -> Self {
        let change = PaginationChange::from(state.pagination);
        Self {
            start_row: change.start_row,
            end_row: change.end_row,
            sort_model: to_sort_model(&state.sorting),
            filter_model: to_filter_model(&state.column_filters),
        }
    }
}

/// Result of one page fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerSideResponse<R> {
    pub row_data: Vec<R>,
    /// Total number of rows on the server.
    pub total_rows: usize,
}

/// A host-implemented page source.
///
/// The grid never calls this on its own; hosts drive it with
/// [`GridApi::fetch_server_side`](crate::GridApi::fetch_server_side) or by
/// building the request themselves.
pub trait ServerSideDatasource<R> {
    fn get_rows(&self, request: &ServerSideRequest) -> ServerSideResponse<R>;
}

impl<R, F> ServerSideDatasource<R> for F
where
    F: Fn(&ServerSideRequest) -> ServerSideResponse<R>,
{
    fn get_rows(&self, request: &ServerSideRequest) -> ServerSideResponse<R> {
        self(request)
    }
}

/// Payload of the pagination-changed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationChange {
    /// Zero-based page index.
    pub page: usize,
    pub page_size: usize,
    pub start_row: usize,
    pub end_row: usize,
}

impl From<PaginationState> for PaginationChange {
    fn from(pagination: PaginationState) -> Self {
        let PaginationState {
            page_index,
            page_size,
        } = pagination;
        Self {
            page: page_index,
            page_size,
            start_row: page_index.saturating_mul(page_size),
            end_row: page_index.saturating_add(1).saturating_mul(page_size),
        }
    }
}
