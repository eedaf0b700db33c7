//! Tests for the data table model.

use super::*;
use crate::Component;
use bubbletea_rs::{KeyMsg, Msg};
use crossterm::event::{KeyCode, KeyModifiers};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

fn rows(values: Value) -> Vec<JsonRow> {
    values
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_object().cloned().unwrap())
        .collect()
}

fn people(n: usize) -> Vec<JsonRow> {
    (1..=n)
        .map(|i| {
            json!({"id": i, "name": format!("Person {i}"), "status": if i % 2 == 0 { "active" } else { "pending" }})
                .as_object()
                .cloned()
                .unwrap()
        })
        .collect()
}

fn basic_columns() -> Vec<ColumnDef<JsonRow>> {
    vec![
        ColumnDef::accessor("id"),
        ColumnDef::accessor("name"),
        ColumnDef::accessor("status").filterable(FilterType::SelectMultiple),
    ]
}

fn key(code: KeyCode) -> Msg {
    Box::new(KeyMsg {
        key: code,
        modifiers: KeyModifiers::NONE,
    })
}

fn ctrl(c: char) -> Msg {
    Box::new(KeyMsg {
        key: KeyCode::Char(c),
        modifiers: KeyModifiers::CONTROL,
    })
}

fn tick() -> Msg {
    Box::new(())
}

fn strip(s: &str) -> String {
    lipgloss_extras::lipgloss::strip_ansi(s)
}

fn names(table: &Model<JsonRow>) -> Vec<String> {
    let model = table.row_model();
    let pos = model.headers.iter().position(|h| h.id == "name").unwrap();
    model.rows.iter().map(|r| r.cells[pos].clone()).collect()
}

#[test]
fn test_duplicate_manual_column_is_rejected() {
    let columns = vec![ColumnDef::accessor("id"), ColumnDef::accessor("id")];
    let err = Model::new(columns, people(1)).err().unwrap();
    assert_eq!(err, TableError::DuplicateColumnId("id".into()));
}

#[test]
fn test_sort_name_descending() {
    let data = rows(json!([{"id": 1, "name": "A"}, {"id": 2, "name": "B"}]));
    let columns = vec![ColumnDef::accessor("id"), ColumnDef::accessor("name")];
    let mut table = Model::new(columns, data).unwrap();
    table.set_sorting(vec![ColumnSort::desc("name")]);
    assert_eq!(names(&table), vec!["B", "A"]);
}

#[test]
fn test_columns_visible_by_default() {
    let table = Model::new(basic_columns(), people(3)).unwrap();
    for column in table.columns() {
        assert!(table.state().visibility().is_visible(&column.id));
    }
    assert_eq!(table.row_model().headers.len(), 3);
}

#[test]
fn test_exclude_columns_hides_id() {
    let table = Model::new(basic_columns(), people(3))
        .unwrap()
        .with_exclude_columns(vec!["id"]);
    let snapshot = table.snapshot();
    assert_eq!(snapshot.visibility.0.get("id"), Some(&false));
    assert_eq!(snapshot.visibility.0.len(), 1);

    let ids: Vec<_> = table.row_model().headers.into_iter().map(|h| h.id).collect();
    assert_eq!(ids, vec!["name", "status"]);
    let header = strip(table.view().lines().next().unwrap());
    assert!(!header.contains("id"));
    assert!(header.contains("name"));
}

#[test]
fn test_latest_pending_action_wins() {
    let confirmed = Arc::new(Mutex::new(Vec::new()));
    let c1 = Arc::clone(&confirmed);
    let c2 = Arc::clone(&confirmed);
    let mut columns = basic_columns();
    columns.push(ColumnDef::display("actions").with_actions(vec![
        RowAction::confirm("Archive", "Archive row", "Archive it?", move |_: &JsonRow| {
            c1.lock().unwrap().push("archive")
        }),
        RowAction::custom("Edit", "Edit row", |r: &JsonRow| format!("{:?}", r.get("name")), move |_: &JsonRow| {
            c2.lock().unwrap().push("edit")
        }),
    ]));
    let mut table = Model::new(columns, people(3)).unwrap();

    assert!(table.activate_action(0, "actions", 0));
    assert_eq!(table.dialog_state(), DialogState::ConfirmationOpen);
    assert!(table.activate_action(1, "actions", 1));
    assert_eq!(table.dialog_state(), DialogState::CustomOpen);
    assert_eq!(table.state().pending_action().unwrap().row_index, 1);

    assert!(table.confirm_dialog());
    assert_eq!(*confirmed.lock().unwrap(), vec!["edit"]);
    assert_eq!(table.dialog_state(), DialogState::Idle);
    assert!(!table.confirm_dialog());
}

#[test]
fn test_link_fires_once_and_clears() {
    let clicks = Arc::new(Mutex::new(Vec::new()));
    let c = Arc::clone(&clicks);
    let mut columns = basic_columns();
    columns.push(
        ColumnDef::display("actions").with_actions(vec![RowAction::link("Open", move |r: &JsonRow| {
            c.lock().unwrap().push(r.get("id").cloned().unwrap())
        })]),
    );
    let mut table = Model::new(columns, people(3)).unwrap();

    assert!(table.activate_action(2, "actions", 0));
    assert!(clicks.lock().unwrap().is_empty());
    assert_eq!(table.dialog_state(), DialogState::LinkPending);

    table.update(&tick());
    assert_eq!(*clicks.lock().unwrap(), vec![json!(3)]);
    assert_eq!(table.dialog_state(), DialogState::Idle);
    assert!(table.state().pending_action().is_none());

    table.update(&tick());
    assert_eq!(clicks.lock().unwrap().len(), 1);
}

#[test]
fn test_unknown_action_is_ignored() {
    let mut table = Model::new(basic_columns(), people(2)).unwrap();
    assert!(!table.activate_action(0, "actions", 0));
    assert!(!table.activate_action(9, "name", 0));
    assert_eq!(table.dialog_state(), DialogState::Idle);
}

#[test]
fn test_cancel_runs_only_on_cancel() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let (a, b) = (Arc::clone(&log), Arc::clone(&log));
    let mut columns = basic_columns();
    columns.push(ColumnDef::display("actions").with_actions(vec![RowAction::confirm(
        "Delete",
        "Delete row",
        "Sure?",
        move |_: &JsonRow| a.lock().unwrap().push("confirm"),
    )
    .with_on_cancel(move |_: &JsonRow| b.lock().unwrap().push("cancel"))]));
    let mut table = Model::new(columns, people(2)).unwrap();

    table.activate_action(0, "actions", 0);
    assert!(table.cancel_dialog());
    assert_eq!(*log.lock().unwrap(), vec!["cancel"]);
    assert!(!table.is_dialog_open());
}

#[test]
fn test_loading_shows_placeholders() {
    for size in [0, 2, 30] {
        let mut table = Model::new(basic_columns(), people(size))
            .unwrap()
            .with_row_selection(true)
            .with_loading(true);
        let model = table.row_model();
        assert_eq!(model.rows.len(), loading::PLACEHOLDER_ROWS);
        assert!(model
            .rows
            .iter()
            .all(|r| r.cells.iter().all(|c| c == loading::SKELETON)));
        assert_eq!(table.data().len(), size);

        assert!(!table.toggle_row_selected("0"));
        assert!(table.snapshot().selection.is_empty());

        table.set_loading(false);
        assert_eq!(table.row_model().rows.len(), size.min(10));
    }
}

#[test]
fn test_loading_placeholders_ignore_filters_and_selection() {
    let mut table = Model::new(basic_columns(), people(4))
        .unwrap()
        .with_row_selection(true)
        .with_sub_component(|r: &JsonRow| format!("details of {}", r.get("id").unwrap()));
    assert!(table.toggle_row_selected("1"));
    assert!(table.toggle_expanded("1"));
    let _ = table.set_column_filter("status", json!("active"));
    let _ = table.set_global_filter("Person");
    table.set_loading(true);

    let model = table.row_model();
    assert_eq!(model.rows.len(), loading::PLACEHOLDER_ROWS);
    assert!(model.rows.iter().all(|r| !r.selected && !r.expanded));
    assert!(model
        .rows
        .iter()
        .all(|r| r.cells.iter().all(|c| c == loading::SKELETON)));
    assert!(table
        .body_rows()
        .iter()
        .all(|r| matches!(r, BodyRow::Data(_))));
    let view = strip(&table.view());
    assert!(!view.contains("[x]"));
    assert!(!view.contains("details of"));

    table.set_loading(false);
    let model = table.row_model();
    assert_eq!(model.rows.len(), 2);
    assert!(model.rows[0].selected);
    assert!(model.rows[0].expanded);
}

#[test]
fn test_loading_disables_actions() {
    let mut columns = basic_columns();
    columns.push(
        ColumnDef::display("actions").with_actions(vec![RowAction::link("Open", |_: &JsonRow| {})]),
    );
    let mut table = Model::new(columns, people(2)).unwrap().with_loading(true);
    assert!(!table.activate_action(0, "actions", 0));
    let model = table.row_model();
    assert!(model.rows.iter().all(|r| r.cells[3] == loading::SKELETON));
}

#[test]
fn test_remove_row_clears_selection() {
    let updates = Arc::new(Mutex::new(Vec::new()));
    let u = Arc::clone(&updates);
    let mut table = Model::new(basic_columns(), people(5))
        .unwrap()
        .with_row_selection(true)
        .with_on_data_update(move |data: &[JsonRow]| u.lock().unwrap().push(data.len()));
    table.toggle_row_selected("0");
    table.toggle_row_selected("4");
    assert_eq!(table.selected_rows().len(), 2);

    let removed = table.remove_row(2).unwrap();
    assert_eq!(removed.get("id"), Some(&json!(3)));
    assert_eq!(table.data().len(), 4);
    assert!(table.snapshot().selection.is_empty());
    assert_eq!(*updates.lock().unwrap(), vec![4]);
}

#[test]
fn test_remove_row_out_of_bounds() {
    let mut table = Model::new(basic_columns(), people(2)).unwrap();
    assert_eq!(
        table.remove_row(5).unwrap_err(),
        TableError::RowOutOfBounds { index: 5, len: 2 }
    );
    assert_eq!(table.data().len(), 2);
}

#[test]
fn test_update_data_notifies() {
    let updates = Arc::new(Mutex::new(0));
    let u = Arc::clone(&updates);
    let mut table = Model::new(basic_columns(), people(2))
        .unwrap()
        .with_on_data_update(move |_: &[JsonRow]| *u.lock().unwrap() += 1);
    table.update_data(1, "name", json!("Grace")).unwrap();
    assert_eq!(table.data()[1].get("name"), Some(&json!("Grace")));
    assert_eq!(*updates.lock().unwrap(), 1);
    assert!(table.update_data(7, "name", json!("x")).is_err());
}

#[test]
fn test_renderer_mutations_are_deferred() {
    let columns = vec![
        ColumnDef::accessor("id"),
        ColumnDef::accessor("status").with_cell(|ctx: &CellContext<'_, JsonRow>| {
            if ctx.value == json!("new") {
                ctx.mutations.update_data(ctx.row_index, "status", json!("seen"));
            }
            types::display_value(&ctx.value)
        }),
    ];
    let data = rows(json!([{"id": 1, "status": "new"}]));
    let mut table = Model::new(columns, data).unwrap();

    let first = table.row_model();
    assert_eq!(first.rows[0].cells[1], "new");
    assert_eq!(table.data()[0].get("status"), Some(&json!("new")));

    table.update(&tick());
    assert_eq!(table.data()[0].get("status"), Some(&json!("seen")));
    assert_eq!(table.row_model().rows[0].cells[1], "seen");
}

#[test]
fn test_queued_remove_out_of_range_is_dropped() {
    let mut table = Model::new(basic_columns(), people(2)).unwrap();
    let mutations = table.mutations();
    mutations.remove_row(9);
    mutations.remove_row(0);
    table.update(&tick());
    assert_eq!(table.data().len(), 1);
    assert!(mutations.is_empty());
}

#[test]
fn test_no_results_declarative() {
    let table = Model::new(basic_columns(), Vec::new()).unwrap();
    assert_eq!(
        table.body_rows(),
        vec![BodyRow::NoResults {
            text: NO_DATA_TEXT.to_string(),
            col_span: 3
        }]
    );
    assert!(strip(&table.view()).contains("No data results"));
}

#[test]
fn test_no_results_auto_and_expandable() {
    let auto = AutoColumns::<JsonRow>::new(vec![
        FieldSpec::new("name", FieldKind::Text),
        FieldSpec::new("email", FieldKind::Text),
        FieldSpec::new("role", FieldKind::Enum),
    ]);
    let table = Model::new(auto, Vec::new())
        .unwrap()
        .with_sub_component(|_| String::new());
    assert_eq!(
        table.body_rows(),
        vec![BodyRow::NoResults {
            text: "No results.".to_string(),
            col_span: 4
        }]
    );
}

#[test]
fn test_auto_mode_pins_identity_and_actions() {
    let auto = AutoColumns::<JsonRow>::new(vec![
        FieldSpec::new("email", FieldKind::Text),
        FieldSpec::new("name", FieldKind::Text),
    ])
    .on_delete(|_| {});
    let data = rows(json!([{"name": "Ada", "email": "ada@example.com"}]));
    let table = Model::new(auto, data).unwrap();
    assert_eq!(table.pinning().left, vec!["email"]);
    assert_eq!(table.pinning().right, vec![ACTIONS_COLUMN_ID]);

    let model = table.row_model();
    assert_eq!(model.headers.first().unwrap().pinned, Some(Pin::Left));
    assert_eq!(model.headers.last().unwrap().id, ACTIONS_COLUMN_ID);
    assert_eq!(model.rows[0].cells.last().unwrap(), "[Delete]");
}

#[test]
fn test_detailed_filter_fetches_once_on_mount() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let c = Arc::clone(&calls);
    let mut table = Model::new(basic_columns(), people(10))
        .unwrap()
        .with_manual_pagination(Some(40))
        .with_detailed_filter(vec![
            FilterDescriptor::new("status", json!("active,pending"), FilterType::SelectMultiple),
            FilterDescriptor::new("name", json!(""), FilterType::Text),
        ])
        .with_fetch_request(move |page: usize, payload: &FilterPayload| {
            c.lock().unwrap().push((page, payload.clone()));
            None
        });

    assert!(table.state().filters().get("status").is_some());
    assert!(table.state().filters().get("name").is_none());
    assert!(calls.lock().unwrap().is_empty());

    table.mount();
    table.update(&tick());
    {
        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, 0);
        assert_eq!(calls[0].1 .0.len(), 1);
        assert_eq!(calls[0].1.get("status"), Some(&json!(["active", "pending"])));
    }

    table.next_page();
    assert_eq!(calls.lock().unwrap().last().unwrap().0, 1);

    table.set_column_filter("name", json!("ada"));
    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[2].0, 0);
    assert_eq!(calls[2].1.get("name"), Some(&json!("ada")));
}

#[test]
fn test_manual_mode_trusts_row_count() {
    let mut table = Model::new(basic_columns(), people(10))
        .unwrap()
        .with_manual_pagination(Some(95));
    assert_eq!(table.page_count(), 10);

    table.set_column_filter("status", json!("active"));
    // Rows come from the caller already filtered.
    assert_eq!(table.row_model().rows.len(), 10);

    table.set_row_count(Some(5));
    assert_eq!(table.page_count(), 1);
}

#[test]
fn test_client_pagination_and_filter_reset() {
    let mut table = Model::new(basic_columns(), people(25)).unwrap();
    assert_eq!(table.page_count(), 3);
    table.next_page();
    table.next_page();
    table.next_page();
    assert_eq!(table.page_index(), 2);
    assert_eq!(table.row_model().rows.len(), 5);

    table.set_column_filter("status", json!("active"));
    assert_eq!(table.page_index(), 0);
    assert_eq!(table.row_model().filtered_row_count, 12);
    assert_eq!(table.page_count(), 2);

    table.set_page_index(99);
    assert_eq!(table.page_index(), 1);
    assert_eq!(strip(&table.pagination_view()), "2/2");
}

#[test]
fn test_global_filter_fuzzy() {
    let data = rows(json!([
        {"id": 1, "name": "Alice Johnson"},
        {"id": 2, "name": "Bob Smith"},
        {"id": 3, "name": "Alicia Keys"}
    ]));
    let columns = vec![ColumnDef::accessor("id"), ColumnDef::accessor("name")];
    let mut table = Model::new(columns, data).unwrap();
    table.set_global_filter("alc");
    assert_eq!(names(&table), vec!["Alice Johnson", "Alicia Keys"]);
    table.set_global_filter("");
    assert_eq!(names(&table).len(), 3);
}

#[test]
fn test_set_data_prunes_selection() {
    let mut table = Model::new(basic_columns(), people(3))
        .unwrap()
        .with_row_selection(true)
        .with_row_id_field("id");
    assert!(table.toggle_row_selected("2"));
    assert!(table.toggle_row_selected("3"));

    table.set_data(people(5).into_iter().skip(2).collect());
    assert_eq!(table.snapshot().selection.len(), 1);
    assert!(table.state().selection().is_selected("3"));
    assert_eq!(table.selected_rows()[0].get("id"), Some(&json!(3)));
}

#[test]
fn test_selection_disabled_by_default() {
    let mut table = Model::new(basic_columns(), people(3)).unwrap();
    assert!(!table.toggle_row_selected("0"));
    assert!(!table.toggle_all_page_rows_selected());
}

#[test]
fn test_toggle_page_selection() {
    let mut table = Model::new(basic_columns(), people(12))
        .unwrap()
        .with_row_selection(true);
    assert!(table.toggle_all_page_rows_selected());
    assert_eq!(table.selected_rows().len(), 10);
    assert!(table.toggle_all_page_rows_selected());
    assert!(table.selected_rows().is_empty());
}

#[test]
fn test_expansion_requires_sub_component() {
    let mut plain = Model::new(basic_columns(), people(2)).unwrap();
    assert!(!plain.toggle_expanded("0"));

    let mut table = Model::new(basic_columns(), people(2))
        .unwrap()
        .with_sub_component(|r: &JsonRow| format!("details of {}", r.get("id").unwrap()));
    assert!(table.toggle_expanded("1"));
    assert!(table.row_model().rows[1].expanded);
    let view = strip(&table.view());
    assert!(view.contains("    details of 2"));
    assert!(!view.contains("details of 1"));
}

#[test]
fn test_keyboard_navigation_and_selection() {
    let mut table = Model::new(basic_columns(), people(3))
        .unwrap()
        .with_row_selection(true);
    table.update(&key(KeyCode::Char(' ')));
    assert!(table.snapshot().selection.is_empty());

    table.focus();
    table.update(&key(KeyCode::Down));
    assert_eq!(table.cursor(), 1);
    table.update(&key(KeyCode::Char(' ')));
    assert!(table.state().selection().is_selected("1"));

    table.update(&key(KeyCode::Down));
    table.update(&key(KeyCode::Down));
    assert_eq!(table.cursor(), 2);
    table.update(&key(KeyCode::Up));
    assert_eq!(table.cursor(), 1);
}

#[test]
fn test_keyboard_sorting_cycles() {
    let mut table = Model::new(basic_columns(), people(3)).unwrap();
    table.focus();
    table.update(&key(KeyCode::Right));
    table.update(&key(KeyCode::Char('s')));
    assert_eq!(table.state().sorting(), &vec![ColumnSort::asc("name")]);
    table.update(&key(KeyCode::Char('s')));
    assert_eq!(names(&table), vec!["Person 3", "Person 2", "Person 1"]);
    table.update(&key(KeyCode::Char('s')));
    assert!(table.state().sorting().is_empty());

    table.update(&key(KeyCode::Right));
    table.update(&key(KeyCode::Char('s')));
    table.update(&key(KeyCode::Left));
    table.update(&key(KeyCode::Char('S')));
    assert_eq!(
        table.state().sorting(),
        &vec![ColumnSort::asc("status"), ColumnSort::asc("name")]
    );
}

#[test]
fn test_keyboard_dialog_flow() {
    let confirmed = Arc::new(Mutex::new(Vec::new()));
    let c = Arc::clone(&confirmed);
    let mut columns = basic_columns();
    columns.push(ColumnDef::display("actions").with_actions(vec![RowAction::confirm(
        "Delete",
        "Delete row",
        "This cannot be undone.",
        move |r: &JsonRow| c.lock().unwrap().push(r.get("id").cloned().unwrap()),
    )]));
    let mut table = Model::new(columns, people(3)).unwrap();
    table.focus();

    table.update(&key(KeyCode::Down));
    table.update(&key(KeyCode::Enter));
    assert!(table.is_dialog_open());
    let view = strip(&table.view());
    assert!(view.contains("Delete row"));
    assert!(view.contains("This cannot be undone."));
    assert!(view.contains("[Confirm] [Cancel]"));

    // Navigation is blocked while the dialog is open.
    table.update(&key(KeyCode::Down));
    assert_eq!(table.cursor(), 1);

    table.update(&key(KeyCode::Char('y')));
    assert_eq!(*confirmed.lock().unwrap(), vec![json!(2)]);
    assert!(!table.is_dialog_open());

    table.update(&key(KeyCode::Enter));
    table.update(&key(KeyCode::Esc));
    assert_eq!(confirmed.lock().unwrap().len(), 1);
    assert!(!table.is_dialog_open());
}

#[test]
fn test_toolbar_default_action() {
    let clicks = Arc::new(Mutex::new(Vec::new()));
    let (a, b) = (Arc::clone(&clicks), Arc::clone(&clicks));
    let mut table = Model::new(basic_columns(), people(1))
        .unwrap()
        .with_toolbar_actions(vec![
            ToolbarAction::new("Add", move || a.lock().unwrap().push("add")),
            ToolbarAction::new("Import", move || b.lock().unwrap().push("import")),
        ]);
    assert_eq!(table.default_toolbar_action().unwrap().label, "Add");

    table.focus();
    table.update(&ctrl('n'));
    assert!(table.trigger_toolbar_action(1));
    assert!(!table.trigger_toolbar_action(2));
    assert_eq!(*clicks.lock().unwrap(), vec!["add", "import"]);
}

#[test]
fn test_view_renders_rows_and_sort_marker() {
    let mut table = Model::new(basic_columns(), people(2)).unwrap();
    table.toggle_sorting("id", false);
    let view = strip(&table.view());
    let lines: Vec<&str> = view.lines().collect();
    assert!(lines[0].contains("id ↑"));
    assert!(lines[1].starts_with('─'));
    assert!(lines[2].starts_with("> 1"));
    assert!(lines[2].contains("Person 1 │ pending"));
    assert!(lines[3].starts_with("  2"));
}

#[test]
fn test_options_from_json() {
    let options = TableOptions::from_json(
        r#"{"page_size": 2, "exclude_columns": ["status"], "enable_row_selection": true}"#,
    )
    .unwrap();
    let mut table = Model::new(basic_columns(), people(5))
        .unwrap()
        .with_options(options);
    assert_eq!(table.page_count(), 3);
    assert_eq!(table.row_model().headers.len(), 2);
    assert!(table.toggle_row_selected("1"));
}
