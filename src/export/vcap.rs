//! The Vcap exporter: capture orchestration and archive writing.
//!
//! Each instance represents one archive being exported. Frames accumulate
//! during the capture phase; `finalize` consumes the exporter and performs
//! the single serialization pass, so the dedup cache can never be mutated
//! while it is being read.

use std::io::{Seek, Write};
use std::thread;

use rand::RngCore;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::capture::{self, ExportContext, Frame};
use crate::config::ExportConfig;
use crate::error::{Result, VcapError};
use crate::material::Material;
use crate::mesh::{obj, Mesh, MeshInfo, MeshSynthesizer, EMPTY_MESH};
use crate::texture::{self, TextureProvider};
use crate::tree::{BinaryTreeWriter, Compound, TreeWriter, Value};
use crate::types::{BlockPosition, BlockState, WorldSource};

use super::meta::VcapMeta;

/// Captures an animated voxel scene and exports it as a Vcap archive.
pub struct VcapExporter<W: WorldSource> {
    world: W,
    config: ExportConfig,
    context: ExportContext,
    frames: Vec<Frame>,
    synthesizer: Box<dyn MeshSynthesizer + Send>,
    textures: Box<dyn TextureProvider + Send>,
    tree_writer: Box<dyn TreeWriter + Send>,
}

impl<W: WorldSource> VcapExporter<W> {
    /// Create a new export session over `world`, bounded by the configured
    /// chunk volume.
    pub fn new(
        world: W,
        config: ExportConfig,
        synthesizer: impl MeshSynthesizer + Send + 'static,
        textures: impl TextureProvider + Send + 'static,
    ) -> Self {
        Self {
            world,
            config,
            context: ExportContext::new(),
            frames: Vec::new(),
            synthesizer: Box::new(synthesizer),
            textures: Box::new(textures),
            tree_writer: Box::new(BinaryTreeWriter),
        }
    }

    /// Replace the document codec used for the frame document.
    pub fn with_tree_writer(mut self, writer: impl TreeWriter + Send + 'static) -> Self {
        self.tree_writer = Box::new(writer);
        self
    }

    /// The session's dedup cache. Other capture subsystems register their
    /// geometry through this.
    pub fn context(&self) -> &ExportContext {
        &self.context
    }

    /// Mutable access to the dedup cache for external registrations.
    pub fn context_mut(&mut self) -> &mut ExportContext {
        &mut self.context
    }

    /// Frames captured so far, in order.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Capture an intra frame and add it to the session.
    ///
    /// Depending on the size of the capture volume, this may take multiple
    /// seconds.
    ///
    /// `time` is the timestamp of the frame, in seconds since the beginning
    /// of the animation; it must not precede the previous frame's.
    pub fn capture_intra_frame(&mut self, time: f64) -> Result<&Frame> {
        self.check_order(time)?;
        let frame = capture::capture_intra(
            &self.world,
            &self.config,
            &mut self.context,
            self.synthesizer.as_ref(),
            time,
        );
        self.frames.push(Frame::Intra(frame));
        Ok(self.frames.last().unwrap())
    }

    /// Capture a predictive (delta) frame from an explicit list of changed
    /// blocks and add it to the session.
    ///
    /// The session must already contain an intra frame to delta against.
    pub fn capture_predictive_frame(
        &mut self,
        time: f64,
        changes: &[(BlockPosition, Option<BlockState>)],
    ) -> Result<&Frame> {
        if self.frames.is_empty() {
            return Err(VcapError::MissingKeyframe);
        }
        self.check_order(time)?;
        let frame = capture::capture_predictive(
            &self.world,
            &mut self.context,
            self.synthesizer.as_ref(),
            changes,
            time,
        );
        self.frames.push(Frame::Predictive(frame));
        Ok(self.frames.last().unwrap())
    }

    /// Save the session to `sink`, consuming the exporter.
    ///
    /// **Warning:** the texture atlas is read back from the GPU by the
    /// host's render loop, so this call blocks until the next frame
    /// renders. Do not call it from a thread whose blocking would stall
    /// rendering; use [`finalize_async`](Self::finalize_async) there.
    ///
    /// On error the sink may hold a partial archive; partial output is
    /// never valid and disposing of it is the caller's responsibility.
    pub fn finalize<S: Write + Seek>(self, sink: S) -> Result<()> {
        self.check_integrity()?;

        let mut zip = ZipWriter::new(sink);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

        // WORLD
        log::info!("Compiling frames...");
        let frames: Vec<Value> = self
            .frames
            .iter()
            .map(|frame| frame.frame_data().into())
            .collect();
        let mut world_data = Compound::new();
        world_data.put("frames", Value::List(frames));

        write_entry(&mut zip, options, "world.dat", |out| {
            Ok(self.tree_writer.write(&world_data, out)?)
        })?;

        // MODELS
        let mut rng = rand::thread_rng();
        let mut num_layers = 0u32;

        for (key, id) in self.context.models() {
            log::info!("Writing mesh: {}", id);
            let MeshInfo { mesh, num_layers: layers } =
                self.synthesizer.block_mesh(key, &mut rng as &mut dyn RngCore);
            write_mesh(&mut zip, options, &mesh, id)?;
            num_layers = num_layers.max(layers);
        }

        for (id, mesh) in self.context.fluids() {
            log::info!("Writing fluid mesh: {}", id);
            write_mesh(&mut zip, options, mesh, id)?;
        }

        // Fluid meshes assume the empty mesh is written.
        write_mesh(&mut zip, options, &Mesh::new(), EMPTY_MESH)?;

        // MATERIALS
        for (id, material) in Material::canonical() {
            let name = format!("mat/{}.json", id);
            write_entry(&mut zip, options, &name, |out| {
                out.write_all(material.to_json()?.as_bytes())?;
                Ok(())
            })?;
        }

        // TEXTURE ATLAS
        log::info!("Extracting world texture...");
        let atlas = self
            .textures
            .request_atlas()
            .wait(self.config.atlas_timeout)?;
        let png = texture::encode_png(&atlas)?;
        write_entry(&mut zip, options, "tex/world.png", |out| {
            out.write_all(&png)?;
            Ok(())
        })?;

        // META
        log::info!("Writing Vcap metadata.");
        let meta = VcapMeta { num_layers };
        write_entry(&mut zip, options, "meta.json", |out| {
            out.write_all(serde_json::to_string_pretty(&meta)?.as_bytes())?;
            Ok(())
        })?;

        zip.finish()?;
        log::info!("Finished writing Vcap.");
        Ok(())
    }

    /// Save the session on a spawned thread, consuming the exporter.
    ///
    /// **Warning:** the returned handle will not complete until the host
    /// renders its next frame (the texture readback). Do not join it from a
    /// thread that would stop that frame from rendering.
    pub fn finalize_async<S>(self, sink: S) -> thread::JoinHandle<Result<()>>
    where
        W: Send + 'static,
        S: Write + Seek + Send + 'static,
    {
        thread::spawn(move || self.finalize(sink))
    }

    /// Every mesh id referenced by any frame must be registered; failing
    /// fast here beats emitting an archive a reader cannot resolve.
    fn check_integrity(&self) -> Result<()> {
        for frame in &self.frames {
            for id in frame.palette() {
                if !self.context.contains_mesh(id) {
                    return Err(VcapError::MissingMesh(id.clone()));
                }
            }
        }
        Ok(())
    }

    fn check_order(&self, time: f64) -> Result<()> {
        if let Some(last) = self.frames.last() {
            if time < last.time() {
                return Err(VcapError::FrameOrder {
                    prev: last.time(),
                    next: time,
                });
            }
        }
        Ok(())
    }
}

/// Write one named entry, wrapping any failure with the entry name.
fn write_entry<S, F>(
    zip: &mut ZipWriter<S>,
    options: SimpleFileOptions,
    name: &str,
    write: F,
) -> Result<()>
where
    S: Write + Seek,
    F: FnOnce(&mut ZipWriter<S>) -> Result<()>,
{
    zip.start_file(name, options)
        .map_err(|e| VcapError::for_entry(name, e.into()))?;
    write(zip).map_err(|e| VcapError::for_entry(name, e))
}

fn write_mesh<S: Write + Seek>(
    zip: &mut ZipWriter<S>,
    options: SimpleFileOptions,
    mesh: &Mesh,
    id: &str,
) -> Result<()> {
    let name = format!("mesh/{}.obj", id);
    write_entry(zip, options, &name, |out| {
        out.write_all(obj::write_obj(mesh, id).as_bytes())?;
        Ok(())
    })
}
