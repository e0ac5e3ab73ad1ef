use gaugeface::elements::{Circle, CircularGauge, Graph, Rectangle};
use gaugeface::{
    Angle, ElementKind, FrameContext, GaugeElement, GaugeFace, GaugeValue, LoadError, RecordingCanvas, ValueCatalog,
};
use insta::assert_snapshot;
use miette::Diagnostic;

fn catalog_with(name: &str, raw: f64) -> ValueCatalog {
    let mut values = ValueCatalog::builtin();
    if let Some(value) = values.get_mut(name) {
        value.set_value_raw(raw, 0.0);
    }
    values
}

// ==================== Value binding tests ====================

#[test]
fn speed_past_the_maximum_pins_the_needle() {
    let values = catalog_with("Speed", 300.0);
    let mut gauge = CircularGauge::default();
    gauge.gauge_value = GaugeValue::new("Speed");
    let context = gauge.context(&values).expect("Speed is a builtin value");
    assert_eq!(context.gauge.value_raw(), 160.0);
    assert_eq!(context.value_angle(), Angle(270.0));
}

#[test]
fn graph_samples_follow_the_frame_clock() {
    let mut values = ValueCatalog::builtin();
    let mut graph = Graph::default();
    graph.gauge_value = GaugeValue::new("Speed");
    let mut face = GaugeFace::new();
    face.add_element(graph.into(), &values);

    for (time, speed) in [(0.0, 10.0), (1000.0, 20.0), (2000.0, 30.0), (2500.0, 40.0), (3500.0, 50.0)] {
        if let Some(value) = values.get_mut("Speed") {
            value.set_value_raw(speed, time);
        }
        face.update(&FrameContext::new(&values, time));
    }

    let Some(GaugeElement::Graph(graph)) = face.elements().first() else {
        panic!("expected the graph");
    };
    let samples: Vec<(f64, f64)> = graph.memory().map(|s| (s.time, s.value)).collect();
    // The 0 ms sample is gone; 1000 ms survives as the one sample past the edge.
    assert_eq!(samples, vec![(3500.0, 50.0), (2500.0, 40.0), (2000.0, 30.0), (1000.0, 20.0)]);
}

// ==================== Document tests ====================

#[test]
fn circle_document_shape() {
    let document = serde_json::to_string_pretty(&GaugeElement::from(Circle::default())).unwrap();
    assert_snapshot!(document, @r###"
    {
      "type": "Circle",
      "x": 120.0,
      "y": 120.0,
      "radius": 50.0,
      "fillStroke": {
        "fill": {
          "type": "StaticColor",
          "color": "#000000"
        },
        "stroke": {
          "color": {
            "type": "StaticColor",
            "color": "#ffffff"
          },
          "thickness": 1.0
        }
      },
      "visible": true
    }
    "###);
}

#[test]
fn every_insertable_kind_survives_a_save() {
    let values = ValueCatalog::builtin();
    let mut face = GaugeFace::new();
    for kind in face.insert_options().into_iter().filter_map(|option| option.kind()) {
        face.add_element(kind.create(), &values);
    }
    assert_eq!(face.elements().len(), 7);

    let saved = face.to_json().unwrap();
    let loaded = gaugeface::load(&saved, &values).unwrap();
    assert_eq!(loaded, face);
    let kinds: Vec<ElementKind> = loaded.elements().iter().map(GaugeElement::kind).collect();
    assert_eq!(kinds[0], ElementKind::CircularGauge);
    assert_eq!(kinds[6], ElementKind::Rectangle);
}

#[test]
fn rejected_documents_carry_diagnostic_codes() {
    let values = ValueCatalog::builtin();
    let source = r#"{"type": "GaugeFace", "elements": [{"x": 1}]}"#;
    let err = GaugeFace::from_json_named("missing-tag.gauge", source, &values).unwrap_err();
    assert!(matches!(err, LoadError::Invalid { .. }), "{err:?}");
    assert_eq!(err.code().map(|c| c.to_string()).as_deref(), Some("gaugeface::load::invalid"));
    assert!(err.to_string().contains("missing its `type` tag"), "{err}");
}

// ==================== Drawing tests ====================

#[test]
fn rectangle_face_display_list() {
    let values = ValueCatalog::builtin();
    let mut face = GaugeFace::new();
    face.add_element(Rectangle::default().into(), &values);

    let mut canvas = RecordingCanvas::new(240.0, 240.0);
    face.draw(&mut canvas, &FrameContext::new(&values, 0.0));
    assert_snapshot!(canvas.display_list(), @r###"
    clear
    scale 1 1
    fill-rect 0,0 240x240 #000000
    fill #000000 R95,95 50x50 r0
    stroke #ffffff w1 R95,95 50x50 r0
    "###);
}

#[test]
fn redrawing_starts_from_a_clear_canvas() {
    let values = catalog_with("RPM", 4000.0);
    let mut face = GaugeFace::new();
    face.add_element(ElementKind::CircularGauge.create(), &values);

    let mut canvas = RecordingCanvas::new(240.0, 240.0);
    let frame = FrameContext::new(&values, 0.0);
    face.draw(&mut canvas, &frame);
    let first = canvas.commands.clone();
    face.draw(&mut canvas, &frame);
    assert_eq!(canvas.commands, first);
}
