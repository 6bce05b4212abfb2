use lifemap::error::MapError;
use lifemap::geometry::{Dimensions, Point, ShapeKind};
use lifemap::model::*;

const SAVED_FLOW: &str = r##"{
  "nodes": [
    {
      "id": "1",
      "type": "circle",
      "data": { "label": "Me", "color": "#00FF00" },
      "position": { "x": 400, "y": 200 },
      "style": { "width": 100, "height": 100 },
      "measured": { "width": 100, "height": 100 },
      "selected": false
    },
    {
      "id": "2",
      "type": "cloud",
      "data": { "label": "Travel", "color": "#FF00FF" },
      "position": { "x": 700, "y": 180 },
      "style": { "width": 150, "height": 80 }
    },
    {
      "id": "7",
      "type": "rectangle",
      "data": { "label": "Run a marathon" },
      "position": { "x": 380, "y": 450 }
    }
  ],
  "edges": [
    {
      "source": "1",
      "sourceHandle": "right",
      "target": "2",
      "targetHandle": "top",
      "animated": false,
      "style": { "stroke": "#FF00FF" },
      "id": "xy-edge__1right-2top"
    }
  ],
  "viewport": { "x": -120.5, "y": 30, "zoom": 1.25 }
}"##;

#[test]
fn loads_exported_flow_json() {
    let map = LifeMap::from_json_str(SAVED_FLOW).expect("parse flow");
    assert_eq!(map.nodes.len(), 3);
    assert_eq!(map.edges.len(), 1);
    assert_eq!(map.viewport.zoom, 1.25);

    let me = map.node("1").unwrap();
    assert_eq!(me.kind(), ShapeKind::Circle);
    assert_eq!(me.data.label, "Me");

    let goal = map.node("7").unwrap();
    assert_eq!(goal.kind(), ShapeKind::Rectangle);
    assert_eq!(goal.dimensions(), Dimensions::default());
    assert_eq!(goal.color(), "#00FF00");

    let edge = &map.edges[0];
    assert_eq!(edge.source_handle.as_deref(), Some("right"));
    assert_eq!(edge.stroke(), Some("#FF00FF"));
}

#[test]
fn json_round_trip_keeps_camel_case_keys() {
    let map = LifeMap::from_json_str(SAVED_FLOW).unwrap();
    let text = map.to_json_string().unwrap();
    assert!(text.contains("\"sourceHandle\""));
    assert!(text.contains("\"type\": \"cloud\""));
    assert_eq!(LifeMap::from_json_str(&text).unwrap(), map);
}

#[test]
fn missing_lists_default_to_empty() {
    let map = LifeMap::from_json_str("{}").unwrap();
    assert!(map.nodes.is_empty() && map.edges.is_empty());
    assert_eq!(map.viewport, Viewport::default());
    assert_eq!(map.next_node_id(), 1);
}

#[test]
fn starter_map_has_me_node() {
    let map = LifeMap::starter();
    assert_eq!(map.nodes.len(), 1);
    let me = &map.nodes[0];
    assert_eq!(me.id, "1");
    assert_eq!(me.data.label, "Me");
    assert_eq!(me.position, Point::new(400.0, 200.0));
    assert_eq!(me.kind(), ShapeKind::Circle);
    assert_eq!(map.next_node_id(), 2);
}

#[test]
fn next_id_follows_largest_numeric_id() {
    let mut map = LifeMap::from_json_str(SAVED_FLOW).unwrap();
    assert_eq!(map.next_node_id(), 8);
    map.nodes[0].id = "custom".into();
    assert_eq!(map.next_node_id(), 8);
}

#[test]
fn add_node_uses_kind_defaults() {
    let mut map = LifeMap::starter();
    let id = map
        .add_node(ShapeKind::Cloud, Point::new(10.0, 20.0), "#FFFF00")
        .id
        .clone();
    assert_eq!(id, "2");
    let node = map.node(&id).unwrap();
    assert_eq!(node.data.label, NEW_NODE_LABEL);
    assert_eq!(node.color(), "#FFFF00");
    assert_eq!(node.dimensions(), Dimensions { width: 150.0, height: 80.0 });

    let rect = map.add_node(ShapeKind::Rectangle, Point::default(), "#FF0000");
    assert_eq!(rect.id, "3");
    assert_eq!(rect.dimensions(), Dimensions { width: 150.0, height: 60.0 });
}

#[test]
fn add_node_at_view_center_converts_to_flow_space() {
    let mut map = LifeMap::default();
    let viewport = Viewport {
        x: 100.0,
        y: -50.0,
        zoom: 2.0,
    };
    let node = map.add_node_at_view_center(ShapeKind::Circle, viewport, 800.0, 600.0, "#00FF00");
    assert_eq!(node.position, Point::new(150.0, 175.0));
}

#[test]
fn connect_adds_styled_edge_once() {
    let mut map = LifeMap::from_json_str(SAVED_FLOW).unwrap();
    let conn = Connection::new("1", "7");
    let edge = map.connect(&conn, "#FFFF00").unwrap().expect("new edge").clone();
    assert_eq!(edge.id, "xy-edge__1-7");
    assert_eq!(edge.stroke(), Some("#FFFF00"));
    assert!(!edge.animated);
    assert_eq!(map.edges.len(), 2);

    assert!(map.connect(&conn, "#FF0000").unwrap().is_none());
    assert_eq!(map.edges.len(), 2);

    let with_handles = Connection {
        source_handle: Some("left".into()),
        ..Connection::new("1", "7")
    };
    let edge = map.connect(&with_handles, "#FF0000").unwrap().unwrap();
    assert_eq!(edge.id, "xy-edge__1left-7");
}

#[test]
fn connect_rejects_unknown_nodes() {
    let mut map = LifeMap::starter();
    let err = map.connect(&Connection::new("1", "42"), "#00FF00").unwrap_err();
    assert_eq!(err, MapError::UnknownNode { id: "42".into() });
    assert!(map.edges.is_empty());
}

#[test]
fn label_and_color_edits() {
    let mut map = LifeMap::starter();
    map.set_label("1", "Myself").unwrap();
    map.set_color("1", "#00FFFF").unwrap();
    assert_eq!(map.node("1").unwrap().data.label, "Myself");
    assert_eq!(map.node("1").unwrap().color(), "#00FFFF");
    assert!(matches!(
        map.set_label("9", "x"),
        Err(MapError::UnknownNode { .. })
    ));
}

#[test]
fn delete_selected_drops_dangling_edges() {
    let mut map = LifeMap::from_json_str(SAVED_FLOW).unwrap();
    map.connect(&Connection::new("2", "7"), "#00FF00").unwrap();
    map.connect(&Connection::new("1", "7"), "#00FF00").unwrap();
    assert_eq!(map.edges.len(), 3);

    map.set_selected("2", true).unwrap();
    map.set_edge_selected("xy-edge__1-7", true).unwrap();
    let removed = map.delete_selected();

    assert_eq!(removed, Removed { nodes: 1, edges: 3 });
    assert!(map.node("2").is_none());
    assert!(map.edges.is_empty());
    assert_eq!(map.edges_of("1").count(), 0);
}

#[test]
fn edges_of_lists_both_directions() {
    let mut map = LifeMap::from_json_str(SAVED_FLOW).unwrap();
    map.connect(&Connection::new("7", "1"), "#00FF00").unwrap();
    let ids: Vec<_> = map.edges_of("1").map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["xy-edge__1right-2top", "xy-edge__7-1"]);
}

#[test]
fn add_node_after_largest_possible_id_reuses_free_slot() {
    let mut map =
        LifeMap::from_json_str(r#"{"nodes":[{"id":"18446744073709551615","position":{"x":0,"y":0}}]}"#)
            .unwrap();
    assert_eq!(map.next_node_id(), 1);
    let id = map.add_node(ShapeKind::Circle, Point::default(), "#00FF00").id.clone();
    assert_eq!(id, "1");
    assert_eq!(map.next_node_id(), 2);
    assert_eq!(map.add_node(ShapeKind::Cloud, Point::default(), "#00FF00").id, "2");
    assert_eq!(map.nodes.len(), 3);
}
