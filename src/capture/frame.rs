//! Per-timestamp scene snapshots.
//!
//! A frame is either a complete snapshot of the captured volume (intra) or a
//! sparse list of changes since the previous frame (predictive). Both store
//! blocks as palette references so a mesh id referenced by thousands of
//! positions appears once per frame.

use std::collections::HashMap;

use crate::tree::{Compound, Value};
use crate::types::BlockPosition;

/// One occupied position, referencing the frame palette.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockInstance {
    /// World position.
    pub pos: BlockPosition,
    /// Index into the frame's palette.
    pub state: u32,
}

/// A complete snapshot of every occupied position at one timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct IntraFrame {
    /// Seconds since the beginning of the capture.
    pub time: f64,
    /// Mesh ids referenced by this frame, deduplicated.
    pub palette: Vec<String>,
    /// Every occupied position in the captured volume.
    pub blocks: Vec<BlockInstance>,
}

/// A sparse delta against the preceding frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictiveFrame {
    /// Seconds since the beginning of the capture.
    pub time: f64,
    /// Mesh ids referenced by this frame's changes, deduplicated.
    pub palette: Vec<String>,
    /// Only the positions whose state changed since the previous frame.
    /// Removed blocks reference the reserved empty mesh.
    pub blocks: Vec<BlockInstance>,
}

/// A captured frame. Immutable once appended to a session.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Intra(IntraFrame),
    Predictive(PredictiveFrame),
}

impl Frame {
    /// Timestamp in seconds since capture start.
    pub fn time(&self) -> f64 {
        match self {
            Frame::Intra(frame) => frame.time,
            Frame::Predictive(frame) => frame.time,
        }
    }

    pub fn is_intra(&self) -> bool {
        matches!(self, Frame::Intra(_))
    }

    /// Mesh ids this frame references.
    pub fn palette(&self) -> &[String] {
        match self {
            Frame::Intra(frame) => &frame.palette,
            Frame::Predictive(frame) => &frame.palette,
        }
    }

    /// Encode this frame as a document tree node.
    pub fn frame_data(&self) -> Compound {
        let (tag, time, palette, blocks) = match self {
            Frame::Intra(frame) => ("intra", frame.time, &frame.palette, &frame.blocks),
            Frame::Predictive(frame) => {
                ("predictive", frame.time, &frame.palette, &frame.blocks)
            }
        };

        let mut data = Compound::new();
        data.put("type", Value::Str(tag.to_string()));
        data.put("time", Value::Double(time));
        data.put(
            "palette",
            Value::List(palette.iter().map(|id| Value::Str(id.clone())).collect()),
        );
        data.put(
            "blocks",
            Value::List(
                blocks
                    .iter()
                    .map(|block| {
                        let mut entry = Compound::new();
                        entry.put(
                            "pos",
                            Value::IntArray(vec![block.pos.x, block.pos.y, block.pos.z]),
                        );
                        entry.put("state", Value::Int(block.state as i32));
                        entry.into()
                    })
                    .collect(),
            ),
        );
        data
    }
}

/// Interning builder for a frame palette.
#[derive(Debug, Default)]
pub(crate) struct Palette {
    ids: Vec<String>,
    index: HashMap<String, u32>,
}

impl Palette {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Return the palette index for an id, appending it on first sight.
    pub(crate) fn intern(&mut self, id: &str) -> u32 {
        if let Some(&index) = self.index.get(id) {
            return index;
        }
        let index = self.ids.len() as u32;
        self.ids.push(id.to_string());
        self.index.insert(id.to_string(), index);
        index
    }

    pub(crate) fn into_ids(self) -> Vec<String> {
        self.ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_intra() -> Frame {
        Frame::Intra(IntraFrame {
            time: 0.25,
            palette: vec!["stone".to_string(), "empty".to_string()],
            blocks: vec![
                BlockInstance {
                    pos: BlockPosition::new(0, 64, 0),
                    state: 0,
                },
                BlockInstance {
                    pos: BlockPosition::new(0, 65, 0),
                    state: 1,
                },
            ],
        })
    }

    #[test]
    fn test_palette_interning() {
        let mut palette = Palette::new();
        assert_eq!(palette.intern("stone"), 0);
        assert_eq!(palette.intern("dirt"), 1);
        assert_eq!(palette.intern("stone"), 0);
        assert_eq!(palette.into_ids(), vec!["stone", "dirt"]);
    }

    #[test]
    fn test_intra_frame_data() {
        let data = sample_intra().frame_data();

        assert_eq!(data.get("type"), Some(&Value::Str("intra".to_string())));
        assert_eq!(data.get("time"), Some(&Value::Double(0.25)));

        match data.get("palette") {
            Some(Value::List(items)) => assert_eq!(items.len(), 2),
            other => panic!("unexpected palette node: {:?}", other),
        }
        match data.get("blocks") {
            Some(Value::List(items)) => {
                assert_eq!(items.len(), 2);
                match &items[0] {
                    Value::Compound(entry) => {
                        assert_eq!(
                            entry.get("pos"),
                            Some(&Value::IntArray(vec![0, 64, 0]))
                        );
                        assert_eq!(entry.get("state"), Some(&Value::Int(0)));
                    }
                    other => panic!("unexpected block node: {:?}", other),
                }
            }
            other => panic!("unexpected blocks node: {:?}", other),
        }
    }

    #[test]
    fn test_predictive_tag() {
        let frame = Frame::Predictive(PredictiveFrame {
            time: 1.0,
            palette: vec!["empty".to_string()],
            blocks: vec![BlockInstance {
                pos: BlockPosition::new(3, 70, -2),
                state: 0,
            }],
        });

        assert!(!frame.is_intra());
        let data = frame.frame_data();
        assert_eq!(
            data.get("type"),
            Some(&Value::Str("predictive".to_string()))
        );
    }
}
