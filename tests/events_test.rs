use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rs_table_tracer::{
    dom, transform, DomTableTracer, Error, EventTiming, MarkupTableTracer, RawUnit, Structure,
    TraceState, Transformer,
};
use serde_json::Value;

const REPORT: &str = "<table><caption>Quarterly</caption>\
    <thead><tr><th>Quarter</th><th>Revenue</th></tr></thead>\
    <tbody><tr><td>Q1</td><td>10</td></tr><tr><td>Q2</td><td>n/a</td></tr></tbody>\
    </table>";

fn assert_names_row_start(err: &Error) {
    match err {
        Error::Usage { method, reason } => {
            assert_eq!(*method, "set_column_names");
            assert!(reason.contains("Row"), "reason: {reason}");
            assert!(reason.contains("Start"), "reason: {reason}");
        }
        other => panic!("expected Error::Usage, got {other:?}"),
    }
}

#[test]
fn row_start_stop_yields_no_rows_but_keeps_caption_and_head() {
    let ended = Rc::new(Cell::new(false));
    let doc = dom::parse(REPORT, false);
    let mut tracer = DomTableTracer::new();
    tracer
        .add_event_listener(Structure::Row, EventTiming::Start, |event| event.stop_tracing())
        .expect("listener registration failed");
    tracer
        .add_event_listener(Structure::Row, EventTiming::End, {
            let ended = Rc::clone(&ended);
            move |_| {
                ended.set(true);
                Ok(())
            }
        })
        .expect("listener registration failed");
    tracer
        .infer_table_from((&doc).into(), false)
        .expect("tracing failed");

    let id = tracer.table_ids()[0];
    assert_eq!(tracer.rows(id).count(), 0);
    assert!(ended.get());
    assert_eq!(tracer.table_caption(id), Some("Quarterly"));
    assert_eq!(tracer.table_head(id).map(<[String]>::len), Some(2));
}

#[test]
fn row_start_stop_in_markup_backend() {
    let mut tracer = MarkupTableTracer::new();
    tracer
        .add_event_listener(Structure::Row, EventTiming::Start, |event| event.stop_tracing())
        .expect("listener registration failed");
    tracer.infer_table_from(REPORT, false).expect("tracing failed");

    let data = tracer.table_data().expect("rows failed");
    assert!(data[0].is_empty());
    assert_eq!(tracer.table_caption(tracer.table_ids()[0]), Some("Quarterly"));
}

#[test]
fn stopping_outside_stoppable_start_fails() {
    let doc = dom::parse(REPORT, false);

    for (structure, timing) in [
        (Structure::TableBody, EventTiming::Start),
        (Structure::Caption, EventTiming::Start),
        (Structure::TableHead, EventTiming::End),
    ] {
        let mut tracer = DomTableTracer::new();
        tracer
            .add_event_listener(structure, timing, |event| event.stop_tracing())
            .expect("listener registration failed");

        match tracer.infer_table_from((&doc).into(), false) {
            Err(Error::Usage { method, .. }) => assert_eq!(method, "stop_tracing"),
            other => panic!("expected usage error for {structure}/{timing}, got {other:?}"),
        }
    }
}

#[test]
fn set_column_names_outside_row_start_fails_dom() {
    let doc = dom::parse(REPORT, false);
    let mut tracer = DomTableTracer::new();
    tracer
        .infer_table_from((&doc).into(), false)
        .expect("tracing failed");

    let id = tracer.table_ids()[0];
    let err = tracer.set_column_names(&["quarter"], id, &[]).unwrap_err();
    assert_names_row_start(&err);
    assert!(tracer.column_names(id).is_empty());
}

#[test]
fn set_column_names_outside_row_start_fails_markup() {
    let mut tracer = MarkupTableTracer::new();
    tracer.infer_table_from(REPORT, false).expect("tracing failed");

    let id = tracer.table_ids()[0];
    let err = tracer.set_column_names(&["quarter"], id, &[]).unwrap_err();
    assert_names_row_start(&err);
}

#[test]
fn set_column_names_from_other_listener_fails() {
    let mut tracer = MarkupTableTracer::new();
    tracer
        .add_event_listener(Structure::TableBody, EventTiming::Start, |event| {
            let id = event.table_id().unwrap_or_default();
            event.tracer_mut().set_column_names(&["quarter"], id, &[])
        })
        .expect("listener registration failed");

    let err = tracer.infer_table_from(REPORT, false).unwrap_err();
    assert_names_row_start(&err);
    assert!(!tracer.state().is_dispatching(Structure::TableBody, EventTiming::Start));
}

#[test]
fn listener_for_cell_structures_is_rejected() {
    let mut tracer = DomTableTracer::new();
    for structure in [Structure::HeadCell, Structure::Column] {
        let err = tracer
            .add_event_listener(structure, EventTiming::Start, |_| Ok(()))
            .err()
            .expect("registration should fail");
        assert!(err.to_string().contains("add_transformer"));
    }
}

#[test]
fn last_listener_registration_wins() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let mut tracer = MarkupTableTracer::new();
    for label in ["first", "second"] {
        let calls = Rc::clone(&calls);
        tracer
            .add_event_listener(Structure::Caption, EventTiming::Start, move |_| {
                calls.borrow_mut().push(label);
                Ok(())
            })
            .expect("listener registration failed");
    }
    tracer.infer_table_from(REPORT, false).expect("tracing failed");

    assert_eq!(*calls.borrow(), ["second"]);
}

#[test]
fn listener_targets_match_structure() {
    let tags = Rc::new(RefCell::new(Vec::new()));
    let doc = dom::parse(REPORT, false);
    let mut tracer = DomTableTracer::new();
    for structure in [Structure::TableBody, Structure::Caption, Structure::TableHead] {
        let tags = Rc::clone(&tags);
        tracer
            .add_event_listener(structure, EventTiming::Start, move |event| {
                tags.borrow_mut().push(event.target().tag_name().unwrap_or_default());
                Ok(())
            })
            .expect("listener registration failed");
    }
    tracer
        .infer_table_from((&doc).into(), false)
        .expect("tracing failed");

    assert_eq!(*tags.borrow(), ["tbody", "caption", "thead"]);
}

fn revenue(unit: &RawUnit<'_>, state: &TraceState) -> rs_table_tracer::Result<Value> {
    if state.current_column_name() != Some("revenue") {
        return Ok(Value::String(unit.text()));
    }
    unit.text()
        .parse::<u64>()
        .map(Value::from)
        .map_err(|_| Error::validation(format!("not a number: {}", unit.text()), state.error_context()))
}

#[test]
fn validation_errors_carry_their_position() {
    let mut tracer = MarkupTableTracer::new();
    tracer
        .add_event_listener(Structure::Row, EventTiming::Start, |event| {
            let id = event.table_id().unwrap_or_default();
            event.tracer_mut().set_column_names(&["quarter", "revenue"], id, &[])
        })
        .expect("listener registration failed");
    tracer.add_transformer(Transformer::column(revenue));
    tracer.infer_table_from(REPORT, false).expect("tracing failed");

    let id = tracer.table_ids()[0];
    let mut rows = tracer.rows(id);
    let first = rows.next().expect("first row").expect("first row is valid");
    assert_eq!(first[&rs_table_tracer::ColumnKey::from("revenue")], 10);

    match rows.next() {
        Some(Err(Error::Validation { message, context })) => {
            assert_eq!(message, "not a number: n/a");
            assert_eq!(context.table_id, Some(id));
            assert_eq!(context.row, Some(2));
            assert_eq!(context.column, Some(2));
            assert_eq!(context.column_name.as_deref(), Some("revenue"));
        }
        other => panic!("expected a validation error, got {other:?}"),
    }

    // The failed row leaves no column position behind.
    assert_eq!(tracer.current_column_name(), None);
    assert_eq!(tracer.current_iteration_count_of(Structure::Column, false), None);
    assert_eq!(tracer.state().error_context().column, None);
    assert_eq!(tracer.current_iteration_count_of(Structure::Row, false), Some(2));
}

#[test]
fn column_count_mismatch_is_opt_in() {
    let html = "<table><tr><td>a</td><td>b</td></tr><tr><td>c</td></tr></table>";
    let mut tracer = MarkupTableTracer::new();
    tracer.infer_table_from(html, false).expect("tracing failed");
    assert_eq!(tracer.table_data().expect("rows failed")[0].len(), 2);

    let mut strict = MarkupTableTracer::new();
    strict.add_transformer(transform::expect_column_count(2));
    strict.infer_table_from(html, false).expect("tracing failed");
    match strict.table_data() {
        Err(Error::ColumnCountMismatch { expected, actual, context }) => {
            assert_eq!((expected, actual), (2, 1));
            assert_eq!(context.row, Some(2));
        }
        other => panic!("expected a column count mismatch, got {other:?}"),
    }
}

#[test]
fn listener_errors_propagate_unchanged() {
    let doc = dom::parse(REPORT, false);
    let mut tracer = DomTableTracer::new();
    tracer
        .add_event_listener(Structure::Caption, EventTiming::End, |event| {
            Err(Error::validation("caption rejected", event.tracer().error_context()))
        })
        .expect("listener registration failed");

    match tracer.infer_table_from((&doc).into(), false) {
        Err(Error::Validation { message, context }) => {
            assert_eq!(message, "caption rejected");
            assert_eq!(context.row, None);
        }
        other => panic!("expected the listener's error, got {other:?}"),
    }
    assert!(!tracer.state().is_dispatching(Structure::Caption, EventTiming::End));
}

#[test]
fn head_cell_transformer_sees_head_cell_count() {
    let doc = dom::parse(REPORT, false);
    let mut tracer = DomTableTracer::new();
    tracer.add_transformer(Transformer::head_cell(|unit, state| {
        let position = state
            .current_iteration_count_of(Structure::HeadCell, false)
            .unwrap_or_default();
        Ok(format!("{position}:{}", unit.text().to_lowercase()))
    }));
    tracer
        .infer_table_from((&doc).into(), false)
        .expect("tracing failed");

    let id = tracer.table_ids()[0];
    assert_eq!(tracer.table_head(id).expect("head"), ["1:quarter", "2:revenue"]);
    assert_eq!(tracer.current_iteration_count_of(Structure::HeadCell, false), None);
}
