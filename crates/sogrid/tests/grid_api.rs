//! Grid facade behavior over sorting, selection, pagination and columns.

use serde_json::{Value, json};
use sogrid::{
    CellValue, ColumnSpec, ColumnState, FilterCondition, FilterModel, FilterOperator, GridApi,
    GridConfig, GridOptions, PinSide, RowSelection, SortDirection, SortModel, create_grid,
};

fn people() -> Vec<Value> {
    vec![
        json!({"id": 1, "name": "Bob", "age": 25}),
        json!({"id": 2, "name": "Alice", "age": 30}),
        json!({"id": 3, "name": "Carol", "age": 35}),
        json!({"id": 4, "name": "Dave", "age": 40}),
        json!({"id": 5, "name": "Eve", "age": 45}),
    ]
}

fn columns() -> Vec<ColumnSpec<Value>> {
    vec![
        ColumnSpec::field("id").with_header_name("ID"),
        ColumnSpec::field("name").with_header_name("Name").sortable(true),
        ColumnSpec::field("age").sortable(true).editable(true),
    ]
}

fn grid_with(config: GridConfig) -> GridApi<Value> {
    create_grid(GridOptions::new(people(), columns()).with_config(config))
}

fn grid() -> GridApi<Value> {
    grid_with(GridConfig::default())
}

fn names(rows: &[Value]) -> Vec<&str> {
    rows.iter().map(|row| row["name"].as_str().unwrap_or_default()).collect()
}

fn displayed_names(api: &GridApi<Value>) -> Vec<String> {
    api.table()
        .get_row_model()
        .iter()
        .map(|row| row.original()["name"].as_str().unwrap_or_default().to_string())
        .collect()
}

fn paged(page_size: usize) -> GridConfig {
    GridConfig {
        pagination: true,
        pagination_page_size: page_size,
        ..GridConfig::default()
    }
}

#[test]
fn test_sort_model_round_trip() {
    let api = grid();
    api.set_sort_model(&[SortModel::desc("age")]);
    assert_eq!(api.get_sort_model(), vec![SortModel::desc("age")]);
    assert_eq!(displayed_names(&api), ["Eve", "Dave", "Carol", "Alice", "Bob"]);

    api.set_sort_model(&[SortModel::asc("name"), SortModel::desc("age")]);
    assert_eq!(api.get_sort_model(), vec![SortModel::asc("name"), SortModel::desc("age")]);
    assert_eq!(displayed_names(&api)[0], "Alice");

    api.set_sort_model(&[]);
    assert!(api.get_sort_model().is_empty());
    assert_eq!(displayed_names(&api), ["Bob", "Alice", "Carol", "Dave", "Eve"]);
}

#[test]
fn test_default_sort_model_seeds_state() {
    let api = grid_with(GridConfig {
        default_sort_model: vec![SortModel::asc("name")],
        ..GridConfig::default()
    });
    assert_eq!(api.get_sort_model(), vec![SortModel::asc("name")]);
    assert_eq!(displayed_names(&api)[0], "Alice");
}

#[test]
fn test_select_row_uses_display_index() {
    let api = grid();
    api.set_sort_model(&[SortModel::desc("age")]);
    api.select_row(0);

    let selected = api.get_selected_rows();
    assert_eq!(names(&selected), ["Eve"]);
    assert!(api.is_row_selected(0));
    assert!(!api.is_row_selected(1));

    api.deselect_row(0);
    assert!(api.get_selected_rows().is_empty());
}

#[test]
fn test_select_row_on_later_page() {
    let api = grid_with(paged(2));
    api.set_page(1);
    api.select_row(1);
    assert_eq!(names(&api.get_selected_rows()), ["Dave"]);

    // Past the end of the page, not past the end of the data.
    api.select_row(2);
    assert_eq!(api.get_selected_rows().len(), 1);
}

#[test]
fn test_single_selection_replaces() {
    let api = grid_with(GridConfig {
        row_selection: RowSelection::Single,
        ..GridConfig::default()
    });
    api.select_row(0);
    api.select_row(3);
    assert_eq!(names(&api.get_selected_rows()), ["Dave"]);
}

#[test]
fn test_selection_disabled() {
    let api = grid_with(GridConfig {
        row_selection: RowSelection::None,
        ..GridConfig::default()
    });
    api.select_row(0);
    api.select_all();
    assert!(api.get_selected_rows().is_empty());
}

#[test]
fn test_select_all_respects_selectable() {
    let api = create_grid(
        GridOptions::new(people(), columns())
            .with_row_selectable(|row: &Value| row["age"].as_i64().unwrap_or_default() < 40),
    );
    api.select_all();
    assert_eq!(names(&api.get_selected_rows()), ["Bob", "Alice", "Carol"]);

    api.select_row(4);
    assert_eq!(api.get_selected_rows().len(), 3);

    api.deselect_all();
    assert!(api.get_selected_rows().is_empty());
}

#[test]
fn test_select_all_covers_filtered_rows_only() {
    let api = grid();
    api.set_quick_filter("e");
    api.select_all();
    // Alice, Dave and Eve.
    assert_eq!(names(&api.get_selected_rows()), ["Alice", "Dave", "Eve"]);
}

#[test]
fn test_selection_follows_custom_row_id() {
    let api = create_grid(
        GridOptions::new(people(), columns()).with_row_id(|row: &Value, _| row["id"].to_string()),
    );
    api.select_row(0);
    assert!(api.get_state().row_selection.contains("1"));

    // Reordered data keeps the selection on the same record.
    let mut rows = people();
    rows.reverse();
    api.set_row_data(rows);
    assert_eq!(names(&api.get_selected_rows()), ["Bob"]);
    assert!(api.is_row_selected(4));
}

#[test]
fn test_quick_filter_and_reset() {
    let api = grid();
    api.set_quick_filter("ca");
    assert_eq!(api.get_displayed_row_count(), 1);
    assert_eq!(api.get_quick_filter(), "ca");

    let mut model = FilterModel::new();
    model.insert("age".into(), FilterCondition::number(FilterOperator::GreaterThan, 30.0));
    api.set_quick_filter("");
    api.set_filter_model(&model);
    assert_eq!(displayed_names(&api), ["Carol", "Dave", "Eve"]);
    assert_eq!(api.get_filter_model(), model);

    api.set_quick_filter("d");
    assert_eq!(displayed_names(&api), ["Dave"]);

    api.reset_filters();
    assert_eq!(api.get_displayed_row_count(), 5);
    assert_eq!(api.get_quick_filter(), "");
    assert!(api.get_filter_model().is_empty());
}

#[test]
fn test_set_column_filter() {
    let api = grid();
    api.set_column_filter(
        "name",
        Some(FilterCondition::text(FilterOperator::StartsWith, "c")),
    );
    assert_eq!(displayed_names(&api), ["Carol"]);
    api.set_column_filter("name", None);
    assert_eq!(api.get_displayed_row_count(), 5);
}

#[test]
fn test_quick_filter_initial_text() {
    let api = grid_with(GridConfig {
        quick_filter_text: "bob".into(),
        ..GridConfig::default()
    });
    assert_eq!(displayed_names(&api), ["Bob"]);
}

#[test]
fn test_pagination() {
    let api = grid_with(paged(2));
    assert_eq!(api.get_page(), 0);
    assert_eq!(api.get_page_size(), 2);
    assert_eq!(api.get_total_pages(), 3);
    assert_eq!(displayed_names(&api), ["Bob", "Alice"]);
    assert_eq!(api.pagination_info().to_string(), "1 - 2 of 5");

    api.next_page();
    api.next_page();
    assert_eq!(api.get_page(), 2);
    assert_eq!(displayed_names(&api), ["Eve"]);
    assert_eq!(api.pagination_info().to_string(), "5 - 5 of 5");

    api.previous_page();
    assert_eq!(api.get_page(), 1);

    api.set_page(0);
    api.previous_page();
    assert_eq!(api.get_page(), 0);
}

#[test]
fn test_page_size_keeps_top_row() {
    let api = grid_with(paged(2));
    api.set_page(2);
    api.set_page_size(3);
    // Row 4 was on top; with three rows per page it sits on page 1.
    assert_eq!(api.get_page(), 1);
    assert_eq!(api.get_total_pages(), 2);
    assert_eq!(displayed_names(&api), ["Dave", "Eve"]);

    api.set_page_size(0);
    assert_eq!(api.get_page_size(), 1);
}

#[test]
fn test_zero_configured_page_size_uses_default() {
    let api = grid_with(paged(0));
    assert_eq!(api.get_page_size(), 10);
    assert_eq!(api.get_total_pages(), 1);
    assert_eq!(api.get_displayed_row_count(), 5);
}

#[test]
fn test_page_past_end_has_empty_range() {
    let api = grid_with(paged(2));
    api.set_page(99);
    assert!(displayed_names(&api).is_empty());

    let info = api.pagination_info();
    assert_eq!((info.start_row, info.end_row, info.total_rows), (0, 0, 5));
    assert!(info.start_row <= info.end_row);
}

#[test]
fn test_total_pages_follow_filters() {
    let api = grid_with(paged(2));
    api.set_quick_filter("a");
    // Alice, Carol and Dave.
    assert_eq!(api.get_total_pages(), 2);
    assert_eq!(api.pagination_info().total_rows, 3);
}

#[test]
fn test_sort_and_filter_reset_page() {
    let api = grid_with(paged(2));
    api.set_page(2);
    api.set_sort_model(&[SortModel::asc("name")]);
    assert_eq!(api.get_page(), 0);

    api.set_page(1);
    api.set_quick_filter("e");
    assert_eq!(api.get_page(), 0);

    api.set_page(1);
    api.reset_filters();
    assert_eq!(api.get_page(), 0);
}

#[test]
fn test_page_reset_can_be_disabled() {
    let api = grid_with(GridConfig {
        auto_reset_page_index: false,
        ..paged(2)
    });
    api.set_page(2);
    api.set_sort_model(&[SortModel::asc("name")]);
    assert_eq!(api.get_page(), 2);
}

#[test]
fn test_pagination_disabled_shows_all_rows() {
    let api = grid();
    assert_eq!(api.get_displayed_row_count(), 5);
    assert_eq!(api.get_total_pages(), 1);
}

#[test]
fn test_pin_is_idempotent() {
    let api = grid();
    api.set_column_pinned("age", Some(PinSide::Left));
    api.set_column_pinned("age", Some(PinSide::Left));
    assert_eq!(api.get_state().column_pinning.left, ["age"]);

    api.set_column_pinned("name", Some(PinSide::Left));
    assert_eq!(api.get_state().column_pinning.left, ["age", "name"]);

    api.set_column_pinned("age", Some(PinSide::Right));
    let pinning = api.get_state().column_pinning;
    assert_eq!(pinning.left, ["name"]);
    assert_eq!(pinning.right, ["age"]);

    api.set_column_pinned("age", None);
    assert!(api.get_state().column_pinning.right.is_empty());
}

#[test]
fn test_column_visibility() {
    let api = create_grid(GridOptions::new(
        people(),
        vec![
            ColumnSpec::field("id").lock_visible(true),
            ColumnSpec::field("name"),
            ColumnSpec::field("age").hide(true),
        ],
    ));
    let visibility = api.get_state().column_visibility;
    assert_eq!(visibility.len(), 1);
    assert_eq!(visibility.get("age"), Some(&false));

    api.set_column_visible("name", false);
    api.set_column_visible("age", true);
    api.set_column_visible("id", false);
    let visibility = api.get_state().column_visibility;
    assert_eq!(visibility.get("name"), Some(&false));
    assert_eq!(visibility.get("age"), Some(&true));
    assert_eq!(visibility.get("id"), None);

    let visible: Vec<String> = api
        .table()
        .get_visible_leaf_columns()
        .iter()
        .map(|column| column.id().to_string())
        .collect();
    assert_eq!(visible, ["id", "age"]);
}

#[test]
fn test_column_state_round_trip() {
    let api = grid();
    api.set_sort_model(&[SortModel::desc("age"), SortModel::asc("name")]);
    api.set_column_pinned("name", Some(PinSide::Left));
    api.set_column_visible("id", false);

    let state = api.get_column_state();
    assert_eq!(state.len(), 3);
    let age = state.iter().find(|c| c.col_id == "age").cloned();
    assert_eq!(
        age,
        Some(ColumnState {
            col_id: "age".into(),
            width: Some(150),
            hide: Some(false),
            pinned: None,
            sort: Some(SortDirection::Desc),
            sort_index: Some(0),
        })
    );

    let fresh = grid();
    fresh.set_column_state(&state);
    let restored = fresh.get_state();
    assert_eq!(restored.column_pinning.left, ["name"]);
    assert_eq!(restored.column_visibility.get("id"), Some(&false));
    // Restored in list order, which is column order.
    assert_eq!(
        fresh.get_sort_model(),
        vec![SortModel::asc("name"), SortModel::desc("age")]
    );
}

#[test]
fn test_set_column_state_does_not_restore_width() {
    let api = grid();
    let mut state = api.get_column_state();
    state[0].width = Some(400);
    api.set_column_state(&state);
    assert_eq!(api.get_column_state()[0].width, Some(150));
}

#[test]
fn test_set_row_data_preserves_state() {
    let api = grid();
    api.set_sort_model(&[SortModel::asc("name")]);
    api.set_quick_filter("a");
    api.set_row_data(vec![
        json!({"id": 7, "name": "Zara", "age": 20}),
        json!({"id": 8, "name": "Adam", "age": 21}),
        json!({"id": 9, "name": "Tom", "age": 22}),
    ]);
    assert_eq!(api.get_row_data().len(), 3);
    assert_eq!(displayed_names(&api), ["Adam", "Zara"]);
}

#[test]
fn test_set_column_defs_rebuilds() {
    let api = grid();
    api.set_column_defs(vec![ColumnSpec::field("name").with_header_name("Who")]);
    assert_eq!(api.get_column_defs().len(), 1);
    assert!(api.table().get_column("age").is_none());
    assert_eq!(api.render_header("name").map(|h| h.label).as_deref(), Some("Who"));

    api.set_default_col_def(Some(ColumnSpec::new().with_width(80)));
    assert_eq!(api.get_column_state()[0].width, Some(80));
}

#[test]
fn test_set_cell_value_writes_sorted_row() {
    let api = grid();
    api.set_sort_model(&[SortModel::desc("age")]);
    assert!(api.set_cell_value(0, "age", 50));

    let rows = api.get_row_data();
    assert_eq!(rows[4]["age"], 50);
    assert_eq!(api.table().get_value(&api.table().get_row_model().rows[0], "age"), CellValue::Int(50));

    assert!(!api.set_cell_value(0, "name", "Zed"));
    assert!(!api.set_cell_value(9, "age", 1));
    assert!(!api.set_cell_value(0, "missing", 1));
}

#[test]
fn test_misuse_is_silent() {
    let api = grid();
    api.select_row(99);
    api.deselect_row(99);
    api.set_page(99);
    api.toggle_column_sort("nope", false);
    api.set_column_visible("nope", false);
    api.set_column_pinned("nope", Some(PinSide::Left));
    api.set_column_state(&[ColumnState::new("nope")]);
    assert!(!api.dispatch_cell_clicked(0, "nope"));
    assert!(!api.dispatch_row_double_clicked(99));
    assert!(api.row_class(99).is_none());
    assert!(api.render_header("nope").is_none());
    assert!(api.get_selected_rows().is_empty());
}
