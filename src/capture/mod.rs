//! Scene capture: turning live world state into frames.
//!
//! An intra capture scans the configured volume in a fixed order, classifies
//! every occupied position, and resolves it into the export context: solid
//! shapes through the model dedup cache, fluids through per-domain meshes.
//! Scan order is deterministic so identical scenes produce identical ids.

pub mod context;
pub mod frame;

pub use context::{ExportContext, ModelKey};
pub use frame::{BlockInstance, Frame, IntraFrame, PredictiveFrame};

use std::collections::{HashMap, HashSet, VecDeque};

use crate::config::ExportConfig;
use crate::mesh::{FluidDomain, MeshSynthesizer, EMPTY_MESH};
use crate::types::{BlockPosition, BlockState, Direction, WorldSource};

use self::frame::Palette;

/// Capture a complete snapshot of the configured volume.
pub(crate) fn capture_intra<W: WorldSource + ?Sized>(
    world: &W,
    config: &ExportConfig,
    context: &mut ExportContext,
    synthesizer: &dyn MeshSynthesizer,
    time: f64,
) -> IntraFrame {
    // Snapshot pass: scan in x, y, z order so registration order (and with
    // it, generated ids) is a pure function of scene content.
    let mut scan: Vec<BlockPosition> = Vec::new();
    let mut occupied: HashMap<BlockPosition, BlockState> = HashMap::new();

    let (min_x, min_z) = config.min_chunk.block_min();
    let (max_x, max_z) = (
        (config.max_chunk.x + 1) * 16,
        (config.max_chunk.z + 1) * 16,
    );

    for x in min_x..max_x {
        for y in config.min_y..config.max_y {
            for z in min_z..max_z {
                let pos = BlockPosition::new(x, y, z);
                if let Some(state) = world.block_at(pos) {
                    if !state.is_air() {
                        scan.push(pos);
                        occupied.insert(pos, state);
                    }
                }
            }
        }
    }

    let mut palette = Palette::new();
    let mut blocks = Vec::with_capacity(scan.len());
    let mut fluid_refs: HashMap<BlockPosition, String> = HashMap::new();
    let mut fluid_seen: HashSet<BlockPosition> = HashSet::new();

    // Fluid pass: group connected same-kind cells into domains, one mesh
    // each. The domain origin carries the mesh; every other cell points at
    // the reserved empty mesh.
    for &pos in &scan {
        let kind = match occupied.get(&pos).and_then(fluid_kind) {
            Some(kind) => kind,
            None => continue,
        };
        if fluid_seen.contains(&pos) {
            continue;
        }

        let domain = flood_fill_fluid(pos, kind, &occupied, &mut fluid_seen);
        let id = context.gen_fluid_id(kind);
        let mesh = synthesizer.fluid_mesh(&domain);
        let origin = domain.origin();
        context.register_fluid(id.clone(), mesh);

        for cell in &domain.cells {
            let mesh_ref = if *cell == origin { id.clone() } else { EMPTY_MESH.to_string() };
            fluid_refs.insert(*cell, mesh_ref);
        }
    }

    // Resolution pass, in scan order.
    for &pos in &scan {
        let id = if let Some(mesh_ref) = fluid_refs.get(&pos) {
            mesh_ref.clone()
        } else {
            let state = &occupied[&pos];
            let key = model_key_at(state, pos, &occupied);
            context.register_model(key)
        };

        blocks.push(BlockInstance {
            pos,
            state: palette.intern(&id),
        });
    }

    log::debug!(
        "captured intra frame at t={}: {} blocks, {} distinct meshes",
        time,
        blocks.len(),
        context.model_count() + context.fluid_count()
    );

    IntraFrame {
        time,
        palette: palette.into_ids(),
        blocks,
    }
}

/// Capture a delta frame from an explicit list of changed blocks.
///
/// Removed blocks (a `None` or air state) reference the reserved empty mesh.
/// Neighbor visibility is read from the world at capture time.
pub(crate) fn capture_predictive<W: WorldSource + ?Sized>(
    world: &W,
    context: &mut ExportContext,
    synthesizer: &dyn MeshSynthesizer,
    changes: &[(BlockPosition, Option<BlockState>)],
    time: f64,
) -> PredictiveFrame {
    let mut palette = Palette::new();
    let mut blocks = Vec::with_capacity(changes.len());

    for (pos, state) in changes {
        let id = match state {
            None => EMPTY_MESH.to_string(),
            Some(state) if state.is_air() => EMPTY_MESH.to_string(),
            Some(state) => match fluid_kind(state) {
                Some(kind) => {
                    // A changed fluid cell becomes its own single-cell
                    // domain; neighboring fluid was already meshed by the
                    // frame that introduced it.
                    let domain = FluidDomain {
                        kind: kind.to_string(),
                        cells: vec![*pos],
                    };
                    let id = context.gen_fluid_id(kind);
                    context.register_fluid(id.clone(), synthesizer.fluid_mesh(&domain));
                    id
                }
                None => {
                    let key = model_key_from_world(state, *pos, world);
                    context.register_model(key)
                }
            },
        };

        blocks.push(BlockInstance {
            pos: *pos,
            state: palette.intern(&id),
        });
    }

    PredictiveFrame {
        time,
        palette: palette.into_ids(),
        blocks,
    }
}

/// Build a model key for a block using the snapshot for neighbor lookups.
fn model_key_at(
    state: &BlockState,
    pos: BlockPosition,
    occupied: &HashMap<BlockPosition, BlockState>,
) -> ModelKey {
    let visible = visible_faces(state, pos, |p| occupied.get(&p).cloned());
    ModelKey::new(state, visible, is_transparent(&state.name))
}

/// Build a model key for a block using live world reads for neighbors.
fn model_key_from_world<W: WorldSource + ?Sized>(
    state: &BlockState,
    pos: BlockPosition,
    world: &W,
) -> ModelKey {
    let visible = visible_faces(state, pos, |p| {
        world.block_at(p).filter(|s| !s.is_air())
    });
    ModelKey::new(state, visible, is_transparent(&state.name))
}

/// Compute the visible-face bitmask for a block given a neighbor lookup.
///
/// A face is hidden behind an opaque neighbor; transparent blocks also hide
/// faces against neighbors of the same block type. Fluids never hide solid
/// faces.
fn visible_faces<F>(state: &BlockState, pos: BlockPosition, neighbor_at: F) -> u8
where
    F: Fn(BlockPosition) -> Option<BlockState>,
{
    let mut visible = 0u8;
    for direction in Direction::ALL {
        let neighbor = neighbor_at(pos.neighbor(direction));
        let culled = match neighbor {
            Some(other) if fluid_kind(&other).is_some() => false,
            Some(other) => {
                if is_transparent(&other.name) {
                    is_transparent(&state.name) && other.name == state.name
                } else {
                    true
                }
            }
            None => false,
        };
        if !culled {
            visible |= direction.bit();
        }
    }
    visible
}

/// The fluid kind of a block, if it is one.
fn fluid_kind(state: &BlockState) -> Option<&'static str> {
    match state.block_id() {
        "water" => Some("water"),
        "lava" => Some("lava"),
        _ => None,
    }
}

/// Heuristic transparency classification by block name.
fn is_transparent(name: &str) -> bool {
    let id = name.split(':').nth(1).unwrap_or(name);
    id == "glass"
        || id.ends_with("_glass")
        || id.ends_with("_glass_pane")
        || id == "glass_pane"
        || id == "ice"
        || id == "frosted_ice"
        || id == "slime_block"
        || id == "honey_block"
        || id.ends_with("_leaves")
}

/// Collect the connected same-kind fluid domain containing `start`.
fn flood_fill_fluid(
    start: BlockPosition,
    kind: &str,
    occupied: &HashMap<BlockPosition, BlockState>,
    seen: &mut HashSet<BlockPosition>,
) -> FluidDomain {
    let mut cells = Vec::new();
    let mut queue = VecDeque::new();
    queue.push_back(start);
    seen.insert(start);

    while let Some(pos) = queue.pop_front() {
        cells.push(pos);
        for direction in Direction::ALL {
            let next = pos.neighbor(direction);
            if seen.contains(&next) {
                continue;
            }
            let same = occupied
                .get(&next)
                .and_then(fluid_kind)
                .map(|k| k == kind)
                .unwrap_or(false);
            if same {
                seen.insert(next);
                queue.push_back(next);
            }
        }
    }

    FluidDomain {
        kind: kind.to_string(),
        cells,
    }
}
