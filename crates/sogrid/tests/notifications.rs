//! Listener notification and grid events.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use serde_json::{Value, json};
use sogrid::{
    CellValue, ColumnSpec, FilterCondition, FilterModel, FilterOperator, GridApi, GridConfig,
    GridEvents, GridOptions, PaginationChange, PinSide, SortModel, Subscription, create_grid,
};

fn rows() -> Vec<Value> {
    vec![
        json!({"id": 1, "name": "Bob", "age": 25}),
        json!({"id": 2, "name": "Alice", "age": 30}),
        json!({"id": 3, "name": "Carol", "age": 35}),
    ]
}

fn columns() -> Vec<ColumnSpec<Value>> {
    vec![
        ColumnSpec::field("id"),
        ColumnSpec::field("name").sortable(true),
        ColumnSpec::field("age").sortable(true).editable(true),
    ]
}

fn grid_with_events(events: GridEvents<Value>) -> GridApi<Value> {
    create_grid(
        GridOptions::new(rows(), columns())
            .with_config(GridConfig {
                pagination: true,
                pagination_page_size: 2,
                ..GridConfig::default()
            })
            .with_events(events),
    )
}

fn counted(api: &GridApi<Value>) -> (Arc<AtomicUsize>, Subscription) {
    let count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&count);
    let subscription = api.subscribe(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    (count, subscription)
}

type Step = (&'static str, Box<dyn Fn(&GridApi<Value>)>);

fn step(name: &'static str, call: impl Fn(&GridApi<Value>) + 'static) -> Step {
    (name, Box::new(call))
}

#[test]
fn test_every_setter_notifies_once() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let api = grid_with_events(GridEvents::<Value>::new());
    let (count, _subscription) = counted(&api);

    let mut filter_model = FilterModel::new();
    filter_model.insert("age".into(), FilterCondition::number(FilterOperator::LessThan, 99.0));

    let calls = vec![
        step("set_sort_model", |api| api.set_sort_model(&[SortModel::desc("age")])),
        step("toggle_column_sort", |api| api.toggle_column_sort("name", true)),
        step("set_quick_filter", |api| api.set_quick_filter("o")),
        step("set_filter_model", move |api| api.set_filter_model(&filter_model)),
        step("set_column_filter", |api| api.set_column_filter("name", None)),
        step("reset_filters", |api| api.reset_filters()),
        step("set_page", |api| api.set_page(1)),
        step("next_page", |api| api.next_page()),
        step("previous_page", |api| api.previous_page()),
        step("set_page_size", |api| api.set_page_size(3)),
        step("select_row", |api| api.select_row(0)),
        step("deselect_row", |api| api.deselect_row(0)),
        step("select_all", |api| api.select_all()),
        step("deselect_all", |api| api.deselect_all()),
        step("set_column_visible", |api| api.set_column_visible("id", false)),
        step("set_column_pinned", |api| api.set_column_pinned("age", Some(PinSide::Left))),
        step("set_column_state", |api| api.set_column_state(&api.get_column_state())),
        step("set_row_data", |api| api.set_row_data(rows())),
        step("set_cell_value", |api| {
            assert!(api.set_cell_value(0, "age", 77));
        }),
        step("set_column_defs", |api| api.set_column_defs(columns())),
        step("set_default_col_def", |api| api.set_default_col_def(None)),
        step("refresh_cells", |api| api.refresh_cells()),
        step("size_columns_to_fit", |api| api.size_columns_to_fit()),
        step("set_loading", |api| api.set_loading(true)),
    ];

    for (name, call) in calls {
        let before = count.load(Ordering::SeqCst);
        call(&api);
        assert_eq!(count.load(Ordering::SeqCst), before + 1, "{name} notified a wrong number of times");
    }
}

#[test]
fn test_queries_do_not_notify() {
    let api = grid_with_events(GridEvents::<Value>::new());
    let (count, _subscription) = counted(&api);

    api.get_sort_model();
    api.get_selected_rows();
    api.get_total_pages();
    api.get_column_state();
    api.get_data_as_csv(&Default::default()).unwrap();
    api.render_cell(0, "name");
    api.render_header("name");
    api.pagination_info();
    api.server_side_request();
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[test]
fn test_multi_field_change_notifies_once() {
    let api = grid_with_events(GridEvents::<Value>::new());
    api.set_page(1);
    let (count, _subscription) = counted(&api);

    // Sorting and the page reset land in one cycle.
    api.set_sort_model(&[SortModel::asc("name")]);
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(api.get_page(), 0);
}

#[test]
fn test_listeners_see_new_state() {
    let api = grid_with_events(GridEvents::<Value>::new());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let reader = api.clone();
    let _subscription = api.subscribe(move || {
        sink.lock().push(reader.get_quick_filter());
    });

    api.set_quick_filter("al");
    api.reset_filters();
    assert_eq!(*seen.lock(), ["al", ""]);
}

#[test]
fn test_listener_panic_is_isolated() {
    let api = grid_with_events(GridEvents::<Value>::new());
    let order = Arc::new(Mutex::new(Vec::new()));

    let first = Arc::clone(&order);
    let _a = api.subscribe(move || first.lock().push("first"));
    let _b = api.subscribe(|| panic!("listener failure"));
    let third = Arc::clone(&order);
    let _c = api.subscribe(move || third.lock().push("third"));

    api.set_quick_filter("b");
    assert_eq!(*order.lock(), ["first", "third"]);
    assert_eq!(api.get_quick_filter(), "b");
}

#[test]
fn test_unsubscribe_stops_notifications() {
    let api = grid_with_events(GridEvents::<Value>::new());
    let (count, subscription) = counted(&api);
    api.refresh_cells();
    assert!(subscription.unsubscribe());
    api.refresh_cells();
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(api.state_store().listener_count(), 0);
}

#[test]
fn test_grid_ready_fires_once() {
    let ready = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&ready);
    let api = grid_with_events(GridEvents::<Value>::new().on_grid_ready(move |api: &GridApi<Value>| {
        assert_eq!(api.get_row_data().len(), 3);
        counter.fetch_add(1, Ordering::SeqCst);
    }));
    api.refresh_cells();
    assert_eq!(ready.load(Ordering::SeqCst), 1);
}

#[test]
fn test_state_events() {
    let log = Arc::new(Mutex::new(Vec::<String>::new()));

    let sort_log = Arc::clone(&log);
    let filter_log = Arc::clone(&log);
    let page_log = Arc::clone(&log);
    let selection_log = Arc::clone(&log);
    let events = GridEvents::<Value>::new()
        .on_sort_changed(move |model: &[SortModel]| {
            sort_log.lock().push(format!("sort {}", serde_json::to_string(model).unwrap()));
        })
        .on_filter_changed(move |model: &FilterModel| {
            filter_log.lock().push(format!("filter {}", model.len()));
        })
        .on_pagination_changed(move |change: &PaginationChange| {
            page_log.lock().push(format!("page {} {}..{}", change.page, change.start_row, change.end_row));
        })
        .on_selection_changed(move |rows: &[Value]| {
            selection_log.lock().push(format!("selection {}", rows.len()));
        });
    let api = grid_with_events(events);

    api.set_sort_model(&[SortModel::desc("age")]);
    api.set_page(1);
    // Filtering returns to the first page without a pagination event.
    api.set_quick_filter("o");
    api.select_row(0);
    api.reset_filters();

    assert_eq!(
        *log.lock(),
        [
            r#"sort [{"colId":"age","sort":"desc"}]"#,
            "page 1 2..4",
            "filter 0",
            "selection 1",
            "filter 0",
        ]
    );
}

#[test]
fn test_click_events_use_display_index() {
    let clicks = Arc::new(Mutex::new(Vec::<String>::new()));

    let rows_log = Arc::clone(&clicks);
    let double_log = Arc::clone(&clicks);
    let cells_log = Arc::clone(&clicks);
    let events = GridEvents::<Value>::new()
        .on_row_clicked(move |event| {
            rows_log.lock().push(format!("row {} {}", event.row_index, event.data["name"]));
        })
        .on_row_double_clicked(move |event| {
            double_log.lock().push(format!("double {}", event.data["name"]));
        })
        .on_cell_clicked(move |event| {
            cells_log.lock().push(format!("cell {}={}", event.col_id, event.value));
        });
    let api = grid_with_events(events);
    api.set_sort_model(&[SortModel::desc("age")]);

    assert!(api.dispatch_row_clicked(1));
    assert!(api.dispatch_row_double_clicked(0));
    assert!(api.dispatch_cell_clicked(0, "age"));
    assert!(!api.dispatch_row_clicked(2));

    assert_eq!(
        *clicks.lock(),
        [r#"row 1 "Alice""#, r#"double "Carol""#, "cell age=35"]
    );
}

#[test]
fn test_cell_value_changed_event() {
    let edits = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&edits);
    let api = grid_with_events(GridEvents::<Value>::new().on_cell_value_changed(move |event| {
        sink.lock().push((
            event.old_value.clone(),
            event.value.clone(),
            event.data["name"].clone(),
            event.row_index,
        ));
    }));
    api.set_sort_model(&[SortModel::desc("age")]);

    assert!(api.set_cell_value(1, "age", 31));
    assert_eq!(
        *edits.lock(),
        [(CellValue::Int(30), CellValue::Int(31), json!("Alice"), 1)]
    );
    assert_eq!(api.get_row_data()[1]["age"], 31);
}

#[test]
fn test_panicking_event_handler_does_not_break_grid() {
    let api = grid_with_events(
        GridEvents::<Value>::new().on_sort_changed(|_: &[SortModel]| panic!("handler failure")),
    );
    let (count, _subscription) = counted(&api);
    api.set_sort_model(&[SortModel::asc("name")]);
    assert_eq!(api.get_sort_model(), vec![SortModel::asc("name")]);
    assert_eq!(count.load(Ordering::SeqCst), 1);
}
