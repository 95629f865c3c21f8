//! Server-side row model: manual paging, request shapes and loading state.

use serde_json::{Value, json};
use sogrid::{
    ColumnSpec, FilterCondition, FilterModel, FilterOperator, GridApi, GridConfig, GridOptions,
    ServerSideRequest, ServerSideResponse, SortModel, create_grid,
};

const TOTAL: usize = 5;

fn server_rows() -> Vec<Value> {
    (0..TOTAL)
        .map(|i| json!({"id": i, "name": format!("row {i}")}))
        .collect()
}

/// A host data source over an in-memory table.
fn fetch(request: &ServerSideRequest) -> ServerSideResponse<Value> {
    let rows = server_rows();
    let end = request.end_row.min(rows.len());
    ServerSideResponse {
        row_data: rows[request.start_row.min(end)..end].to_vec(),
        total_rows: rows.len(),
    }
}

fn server_grid() -> GridApi<Value> {
    let config = GridConfig {
        server_side: true,
        pagination: true,
        pagination_page_size: 2,
        total_rows: Some(TOTAL),
        ..GridConfig::default()
    };
    let first_page = server_rows()[..2].to_vec();
    create_grid(
        GridOptions::new(
            first_page,
            vec![ColumnSpec::field("id").sortable(true), ColumnSpec::field("name")],
        )
        .with_config(config)
        .with_loading(true),
    )
}

fn ids(api: &GridApi<Value>) -> Vec<i64> {
    api.table()
        .get_row_model()
        .iter()
        .map(|row| row.original()["id"].as_i64().unwrap_or(-1))
        .collect()
}

#[test]
fn test_page_count_from_total_rows() {
    let api = server_grid();
    assert!(api.is_loading());
    assert_eq!(api.get_total_pages(), 3);
    assert_eq!(ids(&api), [0, 1]);
    assert_eq!(api.pagination_info().to_string(), "1 - 2 of 5");
}

#[test]
fn test_request_follows_state() {
    let api = server_grid();
    let request = api.server_side_request();
    assert_eq!((request.start_row, request.end_row), (0, 2));
    assert!(request.sort_model.is_empty());

    api.set_page(1);
    api.set_sort_model(&[SortModel::desc("id")]);
    let mut model = FilterModel::new();
    model.insert("name".into(), FilterCondition::text(FilterOperator::Contains, "row"));
    api.set_filter_model(&model);

    // No automatic return to the first page on the server.
    let request = api.server_side_request();
    assert_eq!((request.start_row, request.end_row), (2, 4));
    assert_eq!(request.sort_model, vec![SortModel::desc("id")]);
    assert_eq!(request.filter_model, model);
}

#[test]
fn test_rows_are_not_processed_locally() {
    let api = server_grid();
    api.set_sort_model(&[SortModel::desc("id")]);
    api.set_quick_filter("no match");
    assert_eq!(ids(&api), [0, 1]);
}

#[test]
fn test_fetch_applies_response() {
    let api = server_grid();
    api.set_page(2);
    api.set_loading(true);
    api.fetch_server_side(&fetch);

    assert!(!api.is_loading());
    assert_eq!(ids(&api), [4]);
    assert_eq!(api.get_page(), 2);
    assert_eq!(api.pagination_info().to_string(), "5 - 5 of 5");
}

#[test]
fn test_page_index_clamped_to_page_count() {
    let api = server_grid();
    api.set_page(10);
    assert_eq!(api.get_page(), 2);
}

#[test]
fn test_page_size_change_recomputes_page_count() {
    let api = server_grid();
    api.set_page_size(3);
    assert_eq!(api.get_page_size(), 3);
    assert_eq!(api.get_total_pages(), 2);

    api.set_page(5);
    assert_eq!(api.get_page(), 1);
}

#[test]
fn test_total_rows_update() {
    let api = server_grid();
    api.apply_server_side_response(ServerSideResponse {
        row_data: server_rows()[..2].to_vec(),
        total_rows: 9,
    });
    assert_eq!(api.get_total_pages(), 5);
    assert_eq!(api.pagination_info().total_rows, 9);

    api.apply_server_side_response(ServerSideResponse {
        row_data: Vec::new(),
        total_rows: 0,
    });
    assert_eq!(api.pagination_info().to_string(), "0 rows");
}
