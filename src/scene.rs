//! Engine state owned by the page: one instance shared by event handlers and
//! the frame loop through `Rc<RefCell<Scene>>`.

use bagua_core::{
    DragMove, DragPlane, ElasticDrag, HumEnvelope, InteractionController, InteractionEvent,
    ModelCatalogue, OrbitCamera, OrientationParallax, ParticleField, RingSystem, SceneConfig,
    TextTicker, UsageLimiter,
};
use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub struct Scene {
    pub config: SceneConfig,
    pub orbit: OrbitCamera,
    pub interaction: InteractionController,
    pub rings: RingSystem,
    pub particles: ParticleField,
    pub elastic: ElasticDrag,
    pub parallax: OrientationParallax,
    pub ticker: TextTicker,
    pub hum: HumEnvelope,
    pub catalogue: ModelCatalogue,
    pub limiter: UsageLimiter,
    pub rng: StdRng,
    /// Interaction events waiting for the next frame.
    pub events: Vec<InteractionEvent>,
    pub oracle_busy: bool,
    viewport: Vec2,
    time: f32,
    ring_scale: f32,
    drag_plane: Option<DragPlane>,
}

impl Scene {
    pub fn new(
        config: SceneConfig,
        viewport: Vec2,
        lines: Vec<String>,
        model_urls: Vec<String>,
        stored_usage: Option<&str>,
    ) -> Self {
        let mut rng = StdRng::from_entropy();
        let aspect = viewport.x / viewport.y.max(1.0);
        let particles = ParticleField::create(config.particle_count, &mut rng);
        let mut rings = RingSystem::build(config.rings.clone(), &mut rng);
        rings.resize(aspect);
        log::info!(
            "[scene] {} particles, {} rings, camera at {:.2}",
            particles.len(),
            rings.rings().len(),
            config.camera_distance
        );
        Self {
            orbit: OrbitCamera::new(config.camera_distance, aspect),
            interaction: InteractionController::new(config.interaction.clone(), viewport),
            ring_scale: rings.base_scale(),
            rings,
            particles,
            elastic: ElasticDrag::new(config.elastic.clone()),
            parallax: OrientationParallax::new(config.parallax.clone()),
            ticker: TextTicker::new(lines, config.ticker.clone()),
            hum: HumEnvelope::default(),
            catalogue: ModelCatalogue::new(model_urls),
            limiter: UsageLimiter::restore(config.oracle.daily_cap, stored_usage),
            rng,
            events: Vec::new(),
            oracle_busy: false,
            viewport,
            time: 0.0,
            drag_plane: None,
            config,
        }
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn ring_scale(&self) -> f32 {
        self.ring_scale
    }

    pub fn resize(&mut self, css_width: f32, css_height: f32) {
        if css_width <= 0.0 || css_height <= 0.0 {
            return;
        }
        self.viewport = Vec2::new(css_width, css_height);
        let aspect = css_width / css_height;
        self.orbit.aspect = aspect;
        self.interaction.set_viewport(self.viewport);
        self.rings.resize(aspect);
        self.interaction.resync_zoom(self.orbit.distance());
        self.parallax.reset_baseline();
    }

    /// Start an elastic drag on the camera-facing plane through the origin.
    pub fn begin_elastic_drag(&mut self, pos: Vec2) {
        let camera = self.orbit.camera();
        let plane = DragPlane::facing(&camera, Vec3::ZERO);
        if let Some(point) = plane.pick(&camera, pos, self.viewport) {
            self.elastic.drag_start(point);
            self.drag_plane = Some(plane);
        }
    }

    /// Follow the pointer on the plane fixed at drag start.
    pub fn move_elastic_drag(&mut self, pos: Vec2) -> Option<DragMove> {
        let plane = self.drag_plane?;
        if !self.elastic.is_dragging() {
            self.drag_plane = None;
            return None;
        }
        let point = plane.pick(&self.orbit.camera(), pos, self.viewport)?;
        let result = self.elastic.drag_move(point);
        if result == DragMove::Released {
            self.drag_plane = None;
        }
        Some(result)
    }

    pub fn end_elastic_drag(&mut self) {
        self.elastic.drag_end();
        self.drag_plane = None;
    }

    /// Advance every simulation component by `dt_sec`.
    pub fn step(&mut self, dt_sec: f32) {
        self.time += dt_sec;
        self.orbit.advance(dt_sec);
        self.ring_scale =
            self.interaction
                .update(dt_sec, self.time, &mut self.orbit, self.rings.base_scale());
        self.rings
            .update(self.interaction.drive_rotation(), self.time, dt_sec);
        self.particles
            .set_morph_factor(self.interaction.morph_factor());
        self.particles.advance(self.time);
        self.elastic.update(dt_sec);
        self.parallax.update(dt_sec);
        self.ticker.tick(dt_sec);
        let speed = self
            .rings
            .rings()
            .first()
            .map_or(0.0, |ring| ring.angular_speed());
        self.hum.update(speed, dt_sec);
    }

    pub fn take_events(&mut self) -> Vec<InteractionEvent> {
        std::mem::take(&mut self.events)
    }
}
