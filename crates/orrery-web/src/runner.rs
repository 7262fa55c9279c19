use orrery_engine::{
    Game, GameConfig, EngineContext, RenderContext,
    InputEvent, InputQueue, RenderBuffer,
    FixedTimestep, ProtocolLayout, AssetManifest, TextureSlot,
    CameraUniform,
};
use orrery_engine::bridge::protocol::{
    HEADER_FLOATS, HEADER_FRAME_COUNTER, HEADER_INSTANCE_COUNT, HEADER_TRANSPARENT_SPLIT,
    HEADER_EVENT_COUNT, HEADER_LIGHT_COUNT, HEADER_POINT_COUNT, HEADER_POINTS_DIRTY,
    HEADER_AMBIENT_R, HEADER_AMBIENT_G, HEADER_AMBIENT_B,
};
use orrery_engine::systems::render::build_render_buffer;

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    render_buffer: RenderBuffer,
    timestep: FixedTimestep,
    config: GameConfig,
    layout: ProtocolLayout,
    header: [f32; HEADER_FLOATS],
    camera_uniform: CameraUniform,
    /// Point count already published; the host re-uploads when it changes.
    published_points: usize,
    initialized: bool,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let timestep = FixedTimestep::new(config.fixed_dt);
        let layout = ProtocolLayout::from_config(&config);
        let ctx = EngineContext::with_config(&config);
        let camera_uniform = ctx.camera.uniform();

        Self {
            game,
            ctx,
            input: InputQueue::new(),
            render_buffer: RenderBuffer::with_capacity(config.max_instances),
            timestep,
            header: layout.initial_header(),
            layout,
            config,
            camera_uniform,
            published_points: 0,
            initialized: false,
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        self.game.init(&mut self.ctx);
        self.initialized = true;
        self.publish();
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one frame tick: fixed updates, then rebuild the published buffers.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        self.ctx.clear_frame_data();

        // Input is only visible to the first fixed step of a frame.
        // With zero steps it stays queued for the next frame.
        let steps = self.timestep.accumulate(dt);
        for _ in 0..steps {
            self.game.update(&mut self.ctx, &self.input);
            if !self.input.is_empty() {
                self.input.drain();
            }
        }

        self.publish();
    }

    fn publish(&mut self) {
        build_render_buffer(self.ctx.scene.iter(), &self.ctx.textures, &mut self.render_buffer);

        {
            let mut render_ctx = RenderContext {
                render_buffer: &mut self.render_buffer,
                camera: &self.ctx.camera,
            };
            self.game.render(&mut render_ctx);
        }

        self.camera_uniform = self.ctx.camera.uniform();

        let point_count = self.point_count() as usize;
        let ambient = self.ctx.lights.ambient();
        self.header[HEADER_FRAME_COUNTER] += 1.0;
        self.header[HEADER_INSTANCE_COUNT] = self.instance_count() as f32;
        self.header[HEADER_TRANSPARENT_SPLIT] = self.transparent_split() as f32;
        self.header[HEADER_EVENT_COUNT] = self.game_events_len() as f32;
        self.header[HEADER_LIGHT_COUNT] = self.light_count() as f32;
        self.header[HEADER_POINT_COUNT] = point_count as f32;
        self.header[HEADER_POINTS_DIRTY] = if point_count != self.published_points { 1.0 } else { 0.0 };
        self.header[HEADER_AMBIENT_R] = ambient[0];
        self.header[HEADER_AMBIENT_G] = ambient[1];
        self.header[HEADER_AMBIENT_B] = ambient[2];
        self.published_points = point_count;
    }

    // ---- Game access (for game-specific exports) ----

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    /// Mutable game and engine context together.
    pub fn parts_mut(&mut self) -> (&mut G, &mut EngineContext) {
        (&mut self.game, &mut self.ctx)
    }

    // ---- Assets ----

    /// Register extra textures from a host-supplied manifest.
    pub fn load_manifest(&mut self, json: &str) {
        match AssetManifest::from_json(json) {
            Ok(manifest) => {
                let mut keys: Vec<&String> = manifest.textures.keys().collect();
                keys.sort();
                for key in keys {
                    self.ctx.textures.request(key, &manifest.textures[key].url);
                }
                log::info!("manifest loaded: {} textures", manifest.textures.len());
            }
            Err(e) => log::warn!("manifest rejected: {e}"),
        }
    }

    pub fn texture_loaded(&mut self, slot: u32) {
        if !self.ctx.textures.mark_ready(TextureSlot(slot)) {
            log::warn!("texture_loaded for unknown or settled slot {slot}");
        }
    }

    pub fn texture_failed(&mut self, slot: u32) {
        if !self.ctx.textures.mark_failed(TextureSlot(slot)) {
            log::warn!("texture_failed for unknown or settled slot {slot}");
        }
    }

    pub fn texture_requests_json(&self) -> String {
        self.ctx.textures.pending_requests_json()
    }

    // ---- Pointer accessors for SharedArrayBuffer reads ----

    pub fn header_ptr(&self) -> *const f32 {
        self.header.as_ptr()
    }

    pub fn instances_ptr(&self) -> *const f32 {
        self.render_buffer.instances_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.render_buffer.instance_count().min(self.layout.max_instances as u32)
    }

    pub fn transparent_split(&self) -> u32 {
        self.render_buffer.transparent_split.min(self.instance_count())
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        (self.ctx.events.len() as u32).min(self.layout.max_events as u32)
    }

    pub fn camera_ptr(&self) -> *const f32 {
        &self.camera_uniform as *const CameraUniform as *const f32
    }

    pub fn camera_floats(&self) -> &[f32] {
        orrery_engine::bytemuck::cast_slice(std::slice::from_ref(&self.camera_uniform))
    }

    pub fn lights_ptr(&self) -> *const f32 {
        self.ctx.lights.buffer_ptr()
    }

    pub fn light_count(&self) -> u32 {
        (self.ctx.lights.count() as u32).min(self.layout.max_lights as u32)
    }

    pub fn points_ptr(&self) -> *const f32 {
        self.ctx.points.as_ptr() as *const f32
    }

    pub fn point_count(&self) -> u32 {
        (self.ctx.points.len() as u32).min(self.layout.max_points as u32)
    }

    pub fn fixed_dt(&self) -> f32 {
        self.config.fixed_dt
    }

    // ---- Capacity accessors (read by TypeScript via wasm_bindgen exports) ----

    pub fn max_instances(&self) -> u32 {
        self.layout.max_instances as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn max_lights(&self) -> u32 {
        self.layout.max_lights as u32
    }

    pub fn max_points(&self) -> u32 {
        self.layout.max_points as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }
}
