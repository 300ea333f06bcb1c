use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::canvas::{Canvas, LineCap, LineJoin};
use crate::color::{BACKGROUND, Rgba};
use crate::config::{FieldConfig, RenderStyle};
use crate::error::Result;
use crate::integrator::Rk4;
use crate::particle::{Particle, TrailMode};
use crate::projection::Viewpoint;

/// The whole simulation: a fixed set of independent particles under one
/// Lorenz system, seen through one rotating viewpoint.
pub struct ParticleField {
    integrator: Rk4,
    viewpoint: Viewpoint,
    particles: Vec<Particle>,
    mode: TrailMode,
    style: RenderStyle,
    depth_sorted: bool,
    width: f64,
    height: f64,
    pixel_ratio: f64,
    steps: u64,
}

impl ParticleField {
    /// Builds a field on a `width` x `height` logical surface, seeding the
    /// RNG from the config or from entropy.
    pub fn from_config(config: &FieldConfig, width: f64, height: f64, pixel_ratio: f64) -> Result<Self> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(config, width, height, pixel_ratio, &mut rng)
    }

    pub fn new<R: Rng>(
        config: &FieldConfig,
        width: f64,
        height: f64,
        pixel_ratio: f64,
        rng: &mut R,
    ) -> Result<Self> {
        config.validate()?;
        let integrator = Rk4::new(config.params, config.dt)?;
        let particles = (0..config.particle_count)
            .map(|i| Particle::spawn(i, rng, config.trail))
            .collect();

        let mut viewpoint = config.viewpoint();
        viewpoint.recenter(width, height);

        Ok(ParticleField {
            integrator,
            viewpoint,
            particles,
            mode: config.trail,
            style: config.style,
            depth_sorted: config.depth_sorted,
            width,
            height,
            pixel_ratio,
            steps: 0,
        })
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn viewpoint(&self) -> &Viewpoint {
        &self.viewpoint
    }

    pub fn integrator(&self) -> &Rk4 {
        &self.integrator
    }

    pub fn trail_mode(&self) -> TrailMode {
        self.mode
    }

    /// Logical surface size.
    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    pub fn steps_taken(&self) -> u64 {
        self.steps
    }

    /// Advance every particle by one integration step and record its new
    /// projection. The viewpoint turns once per tick, not once per particle.
    pub fn step(&mut self) {
        self.viewpoint.advance();
        for particle in &mut self.particles {
            particle.position = self.integrator.step(&particle.position);
            let projected = self.viewpoint.project(&particle.position);
            particle.record(projected);
        }
        self.steps += 1;
    }

    /// Track a new logical surface size. Returns false when nothing changed.
    pub fn resize(&mut self, width: f64, height: f64, pixel_ratio: f64) -> bool {
        if (width, height, pixel_ratio) == (self.width, self.height, self.pixel_ratio) {
            return false;
        }
        self.width = width;
        self.height = height;
        self.pixel_ratio = pixel_ratio;
        self.viewpoint.recenter(width, height);
        true
    }

    /// Size the backing framebuffer for the current logical size and pixel ratio.
    pub fn configure_surface<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        let pw = (self.width * self.pixel_ratio).round().max(0.0) as usize;
        let ph = (self.height * self.pixel_ratio).round().max(0.0) as usize;
        canvas.resize(pw, ph);
        canvas.set_pixel_ratio(self.pixel_ratio);
    }

    /// Particle indices in draw order.
    fn draw_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.particles.len()).collect();
        if self.depth_sorted {
            let depth = |i: &usize| self.particles[*i].latest().map_or(f64::NEG_INFINITY, |p| p.z);
            order.sort_by(|a, b| depth(b).total_cmp(&depth(a)));
        }
        order
    }

    pub fn render<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        let style = &self.style;
        let fade = match self.mode {
            TrailMode::Bounded { .. } => style.trail_fade,
            TrailMode::None => style.dot_fade,
        };
        canvas.set_fill(BACKGROUND.with_alpha(fade));
        canvas.fill_rect(0.0, 0.0, self.width, self.height);

        for i in self.draw_order() {
            let particle = &self.particles[i];
            match self.mode {
                TrailMode::Bounded { .. } => self.draw_trail(canvas, particle),
                TrailMode::None => self.draw_dot(canvas, particle),
            }
        }
    }

    fn draw_trail<C: Canvas + ?Sized>(&self, canvas: &mut C, particle: &Particle) {
        if particle.trail_len() < 2 {
            return;
        }
        let style = &self.style;

        canvas.begin_path();
        canvas.set_stroke(Rgba::hsla(
            particle.hue,
            style.trail_saturation,
            style.trail_lightness,
            style.trail_alpha,
        ));
        canvas.set_line_width(style.line_width);
        canvas.set_line_cap(LineCap::Round);
        canvas.set_line_join(LineJoin::Round);

        let mut points = particle.trail();
        if let Some(first) = points.next() {
            canvas.move_to(first.x, first.y);
        }
        for point in points {
            canvas.line_to(point.x, point.y);
        }
        canvas.stroke();

        if let Some(head) = particle.latest().filter(|p| p.within(self.width, self.height, 0.0)) {
            canvas.set_fill(Rgba::hsla(
                particle.hue,
                style.head_saturation,
                style.head_lightness,
                style.head_alpha,
            ));
            canvas.fill_circle(head.x, head.y, style.head_radius);
        }
    }

    fn draw_dot<C: Canvas + ?Sized>(&self, canvas: &mut C, particle: &Particle) {
        let style = &self.style;
        let Some(dot) = particle.latest() else {
            return;
        };
        if !dot.within(self.width, self.height, style.dot_margin) {
            return;
        }
        canvas.set_fill(Rgba::hsla(
            particle.hue,
            style.head_saturation,
            style.head_lightness,
            style.dot_alpha,
        ));
        canvas.fill_circle(dot.x, dot.y, style.dot_radius);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::recording::{Call, RecordingCanvas};
    use crate::math::{Projected, State};

    fn config(count: usize, trail: TrailMode) -> FieldConfig {
        FieldConfig {
            particle_count: count,
            trail,
            seed: Some(42),
            ..FieldConfig::default()
        }
    }

    fn field(count: usize, trail: TrailMode) -> ParticleField {
        ParticleField::from_config(&config(count, trail), 800.0, 600.0, 1.0).unwrap()
    }

    #[test]
    fn same_seed_same_start() {
        let a = field(20, TrailMode::default());
        let b = field(20, TrailMode::default());
        for (p, q) in a.particles().iter().zip(b.particles()) {
            assert_eq!(p.position, q.position);
        }
    }

    #[test]
    fn config_carries_through() {
        let f = field(4, TrailMode::None);
        assert_eq!(f.trail_mode(), TrailMode::None);
        assert_eq!(f.integrator().dt(), 0.01);
        assert_eq!(*f.integrator().params(), crate::lorenz::LorenzParams::default());
        assert_eq!(f.size(), (800.0, 600.0));
        assert_eq!(f.pixel_ratio(), 1.0);
    }

    #[test]
    fn enormous_trail_cap_still_steps() {
        let mut f = field(300, TrailMode::Bounded { max_len: 1 << 40 });
        for _ in 0..10 {
            f.step();
        }
        assert!(f.particles().iter().all(|p| p.trail_len() == 10));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let bad = FieldConfig { dt: -1.0, ..FieldConfig::default() };
        assert!(ParticleField::from_config(&bad, 10.0, 10.0, 1.0).is_err());
    }

    #[test]
    fn step_advances_viewpoint_once() {
        let mut f = field(50, TrailMode::default());
        f.step();
        f.step();
        assert!((f.viewpoint().angle_y - 0.002).abs() < 1e-15);
        assert_eq!(f.steps_taken(), 2);
    }

    #[test]
    fn particles_at_origin_never_move() {
        let mut f = field(3, TrailMode::Bounded { max_len: 4 });
        for p in &mut f.particles {
            p.position = State::ORIGIN;
        }
        for _ in 0..100 {
            f.step();
        }
        for p in f.particles() {
            assert!(p.position.norm() < 1e-12);
            assert_eq!(p.latest(), Some(&Projected::new(400.0, 300.0, 0.0)));
        }
    }

    #[test]
    fn dot_mode_tracks_latest_projection() {
        let mut f = field(10, TrailMode::None);
        for _ in 0..25 {
            f.step();
            for p in f.particles() {
                assert_eq!(p.trail_len(), 0);
                assert_eq!(p.latest(), Some(&f.viewpoint().project(&p.position)));
            }
        }
    }

    #[test]
    fn resize_recenters_without_touching_particles() {
        let mut f = field(10, TrailMode::default());
        for _ in 0..30 {
            f.step();
        }
        let before: Vec<(State, Vec<Projected>)> = f
            .particles()
            .iter()
            .map(|p| (p.position, p.trail().copied().collect()))
            .collect();

        assert!(f.resize(1024.0, 300.0, 2.0));
        assert!(!f.resize(1024.0, 300.0, 2.0));
        assert_eq!((f.viewpoint().center_x, f.viewpoint().center_y), (512.0, 150.0));

        for (p, (pos, trail)) in f.particles().iter().zip(before) {
            assert_eq!(p.position, pos);
            assert_eq!(p.trail().copied().collect::<Vec<_>>(), trail);
        }
    }

    #[test]
    fn configure_surface_uses_device_pixels() {
        let mut f = field(1, TrailMode::default());
        f.resize(400.0, 300.0, 2.0);
        let mut canvas = RecordingCanvas::new(1, 1);
        f.configure_surface(&mut canvas);
        f.configure_surface(&mut canvas);
        assert_eq!(canvas.size, (800, 600));
        assert_eq!(canvas.ratio, 2.0);
    }

    #[test]
    fn first_frame_draws_only_overlay() {
        let f = field(5, TrailMode::default());
        let mut canvas = RecordingCanvas::new(800, 600);
        f.render(&mut canvas);
        assert_eq!(canvas.calls, vec![Call::FillRect { color: BACKGROUND.with_alpha(0.05) }]);
    }

    #[test]
    fn first_dot_frame_draws_only_overlay() {
        let f = field(5, TrailMode::None);
        let mut canvas = RecordingCanvas::new(800, 600);
        f.render(&mut canvas);
        assert_eq!(canvas.calls, vec![Call::FillRect { color: BACKGROUND.with_alpha(0.15) }]);
    }

    #[test]
    fn one_point_trail_is_skipped() {
        let mut f = field(5, TrailMode::default());
        f.step();
        let mut canvas = RecordingCanvas::new(800, 600);
        f.render(&mut canvas);
        assert_eq!(canvas.calls.len(), 1);
    }

    #[test]
    fn trail_is_stroked_in_insertion_order() {
        let mut f = field(1, TrailMode::Bounded { max_len: 8 });
        // Near C+, so the head stays on screen.
        f.particles[0].position = State::new(8.0, 8.0, 27.0);
        for _ in 0..5 {
            f.step();
        }
        let mut canvas = RecordingCanvas::new(800, 600);
        f.render(&mut canvas);

        let particle = &f.particles()[0];
        let expected: Vec<(f64, f64)> = particle.trail().map(|p| (p.x, p.y)).collect();
        match &canvas.calls[1] {
            Call::Stroke { color, points, cap, join } => {
                assert_eq!(points, &expected);
                assert_eq!(*color, Rgba::hsla(particle.hue, 0.7, 0.6, 0.25));
                assert_eq!((*cap, *join), (LineCap::Round, LineJoin::Round));
            }
            other => panic!("expected stroke, got {:?}", other),
        }
        let head = particle.latest().unwrap();
        assert_eq!(
            canvas.calls[2],
            Call::Circle { color: Rgba::hsla(particle.hue, 0.8, 0.7, 0.5), x: head.x, y: head.y, radius: 2.5 }
        );
    }

    #[test]
    fn offscreen_head_is_not_drawn() {
        let mut f = field(1, TrailMode::default());
        f.step();
        f.step();
        // A 1x1 surface centred at (0.5, 0.5) puts the head well outside.
        f.resize(1.0, 1.0, 1.0);
        let mut canvas = RecordingCanvas::new(1, 1);
        f.render(&mut canvas);
        assert!(matches!(canvas.calls[1], Call::Stroke { .. }));
        assert_eq!(canvas.calls.len(), 2);
    }

    #[test]
    fn dot_mode_uses_margin_and_heavier_fade() {
        let mut f = field(1, TrailMode::None);
        f.particles[0].record(Projected::new(-5.0, 20.0, 0.0));
        let mut canvas = RecordingCanvas::new(800, 600);
        f.render(&mut canvas);
        assert_eq!(canvas.calls[0], Call::FillRect { color: BACKGROUND.with_alpha(0.15) });
        assert!(matches!(canvas.calls[1], Call::Circle { x, radius, .. } if x == -5.0 && radius == 1.5));

        f.particles[0].record(Projected::new(-50.0, 20.0, 0.0));
        let mut canvas = RecordingCanvas::new(800, 600);
        f.render(&mut canvas);
        assert_eq!(canvas.calls.len(), 1);
    }

    #[test]
    fn depth_sorted_draws_far_first() {
        let cfg = FieldConfig { depth_sorted: true, ..config(3, TrailMode::None) };
        let mut f = ParticleField::from_config(&cfg, 800.0, 600.0, 1.0).unwrap();
        for (i, z) in [(0, -10.0), (1, 30.0), (2, 5.0)] {
            f.particles[i].record(Projected::new(i as f64, 0.0, z));
        }
        let mut canvas = RecordingCanvas::new(800, 600);
        f.render(&mut canvas);
        let xs: Vec<f64> = canvas
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Circle { x, .. } => Some(*x),
                _ => None,
            })
            .collect();
        assert_eq!(xs, vec![1.0, 2.0, 0.0]);
    }
}
