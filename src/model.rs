use crate::error::MapError;
use crate::geometry::{Dimensions, Point, Shape, ShapeKind};
use crate::palette;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Label given to nodes created from the toolbar.
pub const NEW_NODE_LABEL: &str = "New Node";

const BINARY_MAGIC: &[u8; 7] = b"LIFEMAP";
const BINARY_VERSION: u32 = 1;

// ────────────────────────────────────────────────────────────────────────────
// MapDoc – binary serialization wrapper
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapDoc {
    pub map: LifeMap,
}

impl MapDoc {
    /// Encode as `LIFEMAP`, a little-endian format version, then the bincode
    /// body.
    pub fn write_to<W: Write>(&self, mut writer: W) -> anyhow::Result<()> {
        writer.write_all(BINARY_MAGIC)?;
        writer.write_all(&BINARY_VERSION.to_le_bytes())?;
        bincode::serde::encode_into_std_write(self, &mut writer, bincode::config::standard())
            .context("Failed to encode map snapshot")?;
        writer.flush()?;
        Ok(())
    }

    /// Decode what [`Self::write_to`] produced. Fails on a foreign header, a
    /// newer format version or a truncated body.
    pub fn read_from<R: Read>(mut reader: R) -> anyhow::Result<Self> {
        let mut header = [0u8; BINARY_MAGIC.len() + 4];
        reader
            .read_exact(&mut header)
            .context("Not a map snapshot: missing magic bytes")?;
        let (magic, version) = header.split_at(BINARY_MAGIC.len());
        if magic != BINARY_MAGIC {
            anyhow::bail!("Invalid magic bytes: expected 'LIFEMAP'");
        }
        let version = u32::from_le_bytes([version[0], version[1], version[2], version[3]]);
        if version != BINARY_VERSION {
            anyhow::bail!("Unsupported version: {}", version);
        }
        bincode::serde::decode_from_std_read(&mut reader, bincode::config::standard())
            .context("Truncated or corrupt map snapshot")
    }

    pub fn save_to_binary<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        self.write_to(BufWriter::new(file))
    }

    pub fn load_from_binary<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file =
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        Self::read_from(BufReader::new(file))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LifeMap
// ────────────────────────────────────────────────────────────────────────────

/// A whole diagram: nodes, edges and the last viewport.
///
/// The JSON layout matches what the canvas framework exports (`toObject()`),
/// so maps saved by the browser app load here unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LifeMap {
    #[serde(default)]
    pub nodes: Vec<MapNode>,
    #[serde(default)]
    pub edges: Vec<MapEdge>,
    #[serde(default)]
    pub viewport: Viewport,
}

/// Removal counts returned by [`LifeMap::delete_selected`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Removed {
    pub nodes: usize,
    pub edges: usize,
}

impl LifeMap {
    /// The map a new user starts with: a single green "Me" circle.
    pub fn starter() -> Self {
        Self {
            nodes: vec![MapNode {
                id: "1".into(),
                node_type: Some(ShapeKind::Circle.as_str().into()),
                position: Point::new(400.0, 200.0),
                data: NodeData {
                    label: "Me".into(),
                    color: Some(palette::DEFAULT_COLOR.into()),
                },
                style: Some(NodeStyle::from(ShapeKind::Circle.default_dimensions())),
                selected: false,
            }],
            edges: Vec::new(),
            viewport: Viewport::default(),
        }
    }

    pub fn from_json_str(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn node(&self, id: &str) -> Option<&MapNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn node_mut(&mut self, id: &str) -> Result<&mut MapNode, MapError> {
        self.nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| MapError::UnknownNode { id: id.to_string() })
    }

    pub fn edge(&self, id: &str) -> Option<&MapEdge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Edges that start or end at the given node.
    pub fn edges_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a MapEdge> + 'a {
        self.edges
            .iter()
            .filter(move |e| e.source == id || e.target == id)
    }

    /// One past the largest numeric node id. Non-numeric ids are ignored.
    ///
    /// When the largest id is `u64::MAX` the smallest unused positive id is
    /// returned instead.
    pub fn next_node_id(&self) -> u64 {
        let used: BTreeSet<u64> = self
            .nodes
            .iter()
            .filter_map(|n| n.id.parse::<u64>().ok())
            .collect();
        match used.last() {
            None => 1,
            Some(max) => max
                .checked_add(1)
                .unwrap_or_else(|| (1..).find(|id| !used.contains(id)).unwrap_or(0)),
        }
    }

    /// Append a node of the given kind with its default size.
    pub fn add_node(&mut self, kind: ShapeKind, position: Point, color: &str) -> &MapNode {
        let id = self.next_node_id().to_string();
        tracing::debug!(%id, kind = kind.as_str(), "add node");
        self.nodes.push(MapNode {
            id,
            node_type: Some(kind.as_str().into()),
            position,
            data: NodeData {
                label: NEW_NODE_LABEL.into(),
                color: Some(color.into()),
            },
            style: Some(NodeStyle::from(kind.default_dimensions())),
            selected: false,
        });
        &self.nodes[self.nodes.len() - 1]
    }

    /// Add a node at the flow-space point under the center of a canvas of
    /// `canvas_width x canvas_height` pixels showing `viewport`.
    pub fn add_node_at_view_center(
        &mut self,
        kind: ShapeKind,
        viewport: Viewport,
        canvas_width: f64,
        canvas_height: f64,
        color: &str,
    ) -> &MapNode {
        let position = viewport.canvas_center(canvas_width, canvas_height);
        self.add_node(kind, position, color)
    }

    /// Connect two nodes with an edge stroked in `color`.
    ///
    /// Returns `Ok(None)` and leaves the map untouched when the same
    /// connection (endpoints and handles) already exists.
    pub fn connect(
        &mut self,
        connection: &Connection,
        color: &str,
    ) -> Result<Option<&MapEdge>, MapError> {
        for id in [&connection.source, &connection.target] {
            if self.node(id).is_none() {
                return Err(MapError::UnknownNode { id: id.clone() });
            }
        }
        if self.edges.iter().any(|e| e.matches(connection)) {
            tracing::debug!(
                source = %connection.source,
                target = %connection.target,
                "connection already exists"
            );
            return Ok(None);
        }
        self.edges.push(MapEdge {
            id: connection.edge_id(),
            source: connection.source.clone(),
            target: connection.target.clone(),
            source_handle: connection.source_handle.clone(),
            target_handle: connection.target_handle.clone(),
            animated: false,
            style: Some(EdgeStyle {
                stroke: Some(color.into()),
            }),
            selected: false,
        });
        Ok(self.edges.last())
    }

    pub fn set_label(&mut self, id: &str, text: &str) -> Result<(), MapError> {
        self.node_mut(id)?.data.label = text.to_string();
        Ok(())
    }

    pub fn set_color(&mut self, id: &str, color: &str) -> Result<(), MapError> {
        self.node_mut(id)?.data.color = Some(color.to_string());
        Ok(())
    }

    pub fn set_selected(&mut self, id: &str, selected: bool) -> Result<(), MapError> {
        self.node_mut(id)?.selected = selected;
        Ok(())
    }

    pub fn set_edge_selected(&mut self, id: &str, selected: bool) -> Result<(), MapError> {
        let edge = self
            .edges
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| MapError::UnknownEdge { id: id.to_string() })?;
        edge.selected = selected;
        Ok(())
    }

    /// Remove selected nodes and edges, then any edge left without an endpoint.
    pub fn delete_selected(&mut self) -> Removed {
        let nodes_before = self.nodes.len();
        let edges_before = self.edges.len();
        self.nodes.retain(|n| !n.selected);
        let nodes = &self.nodes;
        self.edges.retain(|e| {
            !e.selected
                && nodes.iter().any(|n| n.id == e.source)
                && nodes.iter().any(|n| n.id == e.target)
        });
        let removed = Removed {
            nodes: nodes_before - self.nodes.len(),
            edges: edges_before - self.edges.len(),
        };
        tracing::debug!(nodes = removed.nodes, edges = removed.edges, "deleted selection");
        removed
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Nodes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapNode {
    pub id: String,
    /// Shape name (`circle`, `rectangle`, `cloud`); anything else is a rectangle.
    #[serde(rename = "type", default)]
    pub node_type: Option<String>,
    pub position: Point,
    #[serde(default)]
    pub data: NodeData,
    #[serde(default)]
    pub style: Option<NodeStyle>,
    #[serde(default)]
    pub selected: bool,
}

impl MapNode {
    pub fn kind(&self) -> ShapeKind {
        self.node_type
            .as_deref()
            .map_or(ShapeKind::Rectangle, ShapeKind::from_type_name)
    }

    /// Size with the 100x100 fallback applied.
    pub fn dimensions(&self) -> Dimensions {
        match &self.style {
            Some(s) => Dimensions::sanitized(s.width, s.height),
            None => Dimensions::default(),
        }
    }

    pub fn shape(&self) -> Shape {
        Shape::new(self.kind(), self.position, self.dimensions())
    }

    /// Node color, or the default legend color.
    pub fn color(&self) -> &str {
        self.data.color.as_deref().unwrap_or(palette::DEFAULT_COLOR)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    #[serde(default = "default_label")]
    pub label: String,
    #[serde(default)]
    pub color: Option<String>,
}

impl Default for NodeData {
    fn default() -> Self {
        Self {
            label: default_label(),
            color: None,
        }
    }
}

fn default_label() -> String {
    NEW_NODE_LABEL.to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeStyle {
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
}

impl From<Dimensions> for NodeStyle {
    fn from(d: Dimensions) -> Self {
        Self {
            width: Some(d.width),
            height: Some(d.height),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Edges
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub source_handle: Option<String>,
    #[serde(default)]
    pub target_handle: Option<String>,
    #[serde(default)]
    pub animated: bool,
    #[serde(default)]
    pub style: Option<EdgeStyle>,
    #[serde(default)]
    pub selected: bool,
}

impl MapEdge {
    pub fn stroke(&self) -> Option<&str> {
        self.style.as_ref().and_then(|s| s.stroke.as_deref())
    }

    fn matches(&self, c: &Connection) -> bool {
        self.source == c.source
            && self.target == c.target
            && self.source_handle == c.source_handle
            && self.target_handle == c.target_handle
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeStyle {
    #[serde(default)]
    pub stroke: Option<String>,
}

/// A connection drawn by the user between two node handles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub source: String,
    pub target: String,
    pub source_handle: Option<String>,
    pub target_handle: Option<String>,
}

impl Connection {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
        }
    }

    /// Edge id in the canvas framework's format.
    pub fn edge_id(&self) -> String {
        format!(
            "xy-edge__{}{}-{}{}",
            self.source,
            self.source_handle.as_deref().unwrap_or(""),
            self.target,
            self.target_handle.as_deref().unwrap_or("")
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Viewport
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    /// Flow-space point shown at the center of a canvas of the given pixel size.
    pub fn canvas_center(&self, canvas_width: f64, canvas_height: f64) -> Point {
        let zoom = if self.zoom.is_finite() && self.zoom > 0.0 {
            self.zoom
        } else {
            1.0
        };
        Point::new(
            (canvas_width / 2.0 - self.x) / zoom,
            (canvas_height / 2.0 - self.y) / zoom,
        )
    }
}
