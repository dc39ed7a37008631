//! Snapshot → triangles and text labels.

use glam::Vec2;

use crate::core::scale::{LevelParams, LevelRange};
use crate::core::snapshot::{Body, Snapshot};
use crate::renderer::palette::{css_or, sky};
use crate::systems::feedback::TapPulse;
use crate::systems::vector::{VectorColor, VectorState};

/// Distance kept free between the outermost ring and the canvas edge.
const BORDER_PX: f32 = 40.0;

const ORANGE: VectorColor = VectorColor::new(1.0, 165.0 / 255.0, 0.0, 1.0);
const YELLOW: VectorColor = VectorColor::new(1.0, 1.0, 0.0, 1.0);
const CYAN: VectorColor = VectorColor::new(0.0, 1.0, 1.0, 1.0);
const LIGHT_BLUE: VectorColor = VectorColor::new(173.0 / 255.0, 216.0 / 255.0, 230.0 / 255.0, 1.0);

/// A text label for the host to draw over the triangles.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub position: Vec2,
    pub size_px: f32,
    pub bold: bool,
    pub color: VectorColor,
    /// Clockwise rotation in radians around `position`.
    pub rotation: f32,
    /// Center the text on `position` instead of starting at it.
    pub centered: bool,
}

impl Label {
    fn new(text: impl Into<String>, position: Vec2, size_px: f32, color: VectorColor) -> Self {
        Self {
            text: text.into(),
            position,
            size_px,
            bold: false,
            color,
            rotation: 0.0,
            centered: false,
        }
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// Draws one frame of the sky into a `VectorState`.
pub struct SkyRenderer<'a> {
    vectors: &'a mut VectorState,
    labels: Vec<Label>,
    translation: Vec2,
    params: LevelParams,
    canvas_center: Vec2,
}

impl<'a> SkyRenderer<'a> {
    pub fn new(vectors: &'a mut VectorState, params: LevelParams, canvas_center: Vec2, translation: Vec2) -> Self {
        vectors.begin_frame(translation);
        vectors.set_clip(Vec2::ZERO, canvas_center * 2.0);
        Self {
            vectors,
            labels: Vec::new(),
            translation,
            params,
            canvas_center,
        }
    }

    /// Draw `snapshot` according to its level. Returns the labels.
    pub fn draw(mut self, snapshot: Option<&Snapshot>, pulse: Option<&TapPulse>) -> Vec<Label> {
        if let Some(snapshot) = snapshot {
            match snapshot.level {
                LevelRange::SolarSystem => self.solar_system(snapshot),
                LevelRange::MilkyWay => self.milky_way(snapshot),
                LevelRange::Galaxies => self.galaxies(snapshot),
            }
        }
        if let Some(pulse) = pulse.filter(|p| p.is_visible()) {
            // Screen space: the tap happened where the user touched.
            self.vectors.set_offset(Vec2::ZERO);
            self.vectors
                .stroke_circle(pulse.center, pulse.radius, 3.0, VectorColor::WHITE.with_alpha(pulse.opacity));
        }
        self.labels
    }

    fn label(&mut self, label: Label) {
        self.labels.push(Label {
            position: label.position + self.translation,
            ..label
        });
    }

    fn solar_system(&mut self, snap: &Snapshot) {
        let sun = snap.center.position();

        for ring in snap.orbits.iter().filter(|r| r.radius > 0.0) {
            self.vectors.dashed_circle(sun, ring.radius, (2.0, 4.0), 1.0, sky::orbit());
        }

        self.vectors.fill_circle(sun, snap.center.radius, css_or(&snap.center.color, YELLOW));
        let (outline, width) = if snap.center.selected { (VectorColor::WHITE, 3.0) } else { (ORANGE, 1.0) };
        self.vectors.stroke_circle(sun, snap.center.radius, width, outline);

        for planet in &snap.bodies {
            let at = planet.position();
            if planet.selected {
                self.vectors.stroke_segment(sun, at, 2.0, sky::spoke(true));
            } else {
                self.vectors.dashed_segment(sun, at, (1.0, 3.0), 1.0, sky::spoke(false));
            }
            let r = planet.hit_radius();
            self.vectors.fill_circle(at, r, css_or(&planet.color, VectorColor::WHITE));
            self.vectors
                .stroke_circle(at, r, if planet.selected { 2.0 } else { 0.5 }, VectorColor::WHITE);
        }

        let Some(zodiac) = snap.zodiac.as_ref().filter(|z| z.show && self.params.show_zodiac) else {
            return;
        };
        self.vectors.stroke_circle(sun, zodiac.radius, 2.0, sky::zodiac_ring());

        let on_ecliptic = |radius: f32, angle: f32| sun + Vec2::new(angle.cos(), -angle.sin()) * radius;
        for sign in &zodiac.signs {
            let angle = sign.degrees.to_radians();
            self.vectors.stroke_segment(
                on_ecliptic(zodiac.radius, angle),
                on_ecliptic(zodiac.radius + 8.0, angle),
                1.0,
                sky::zodiac_tick(),
            );
            let text_angle = angle + 15f32.to_radians();
            let mut label = Label::new(
                sign.name.clone(),
                on_ecliptic(zodiac.radius + 25.0, text_angle),
                10.0,
                sky::zodiac_label(),
            )
            .bold();
            label.rotation = std::f32::consts::PI - text_angle;
            label.centered = true;
            self.label(label);
        }

        for planet in &snap.bodies {
            let Some(longitude) = planet.longitude_rad else { continue };
            let projected = on_ecliptic(zodiac.radius, longitude);
            self.vectors.stroke_segment(
                planet.position(),
                projected,
                if planet.selected { 2.0 } else { 1.0 },
                sky::projection(planet.selected),
            );
            if let Some(initial) = planet.name.chars().next() {
                let size = if planet.selected { 14.0 } else { 12.0 };
                let color = css_or(&planet.color, VectorColor::WHITE);
                self.label(Label::new(initial.to_string(), projected + Vec2::new(8.0, 4.0), size, color).bold());
            }
        }
    }

    fn milky_way(&mut self, snap: &Snapshot) {
        let sun = snap.center.position();

        if let Some(info) = snap.zoom_info.filter(|_| self.params.show_spiral_arms) {
            let usable = self.canvas_center.x - BORDER_PX;
            for arm in &snap.spiral_arms {
                if info.max_distance_ly <= 0.0 {
                    break;
                }
                let radius = arm.distance_ly / info.max_distance_ly * usable;
                self.vectors.dashed_circle(sun, radius, (5.0, 15.0), 2.0, sky::spiral_arm());
                if self.params.show_spiral_arm_labels {
                    self.label(Label::new(
                        arm.name.clone(),
                        sun + Vec2::new(radius + 10.0, 0.0),
                        10.0,
                        sky::spiral_arm_label(),
                    ));
                }
            }
        }

        for star in &snap.bodies {
            self.disc(star, css_or(&star.color, VectorColor::WHITE), sky::star_outline(star.selected));
            if self.params.show_star_labels || star.selected {
                self.side_label(star, 10.0, VectorColor::WHITE);
            }
        }

        self.vectors.fill_circle(sun, snap.center.radius, css_or(&snap.center.color, YELLOW));
        let (outline, width) = if snap.center.selected { (CYAN, 3.0) } else { (ORANGE, 2.0) };
        self.vectors.stroke_circle(sun, snap.center.radius, width, outline);
        self.label(
            Label::new(
                snap.center_name().to_string(),
                sun + Vec2::new(snap.center.radius + 5.0, 0.0),
                12.0,
                YELLOW,
            )
            .bold(),
        );
    }

    fn galaxies(&mut self, snap: &Snapshot) {
        for galaxy in &snap.bodies {
            let outline = if galaxy.selected { CYAN } else { LIGHT_BLUE };
            self.disc(galaxy, sky::galaxy_fill(), outline);
            if self.params.show_galaxy_labels {
                self.side_label(galaxy, 9.0, VectorColor::WHITE);
            }
        }

        let home = snap.center.position();
        self.vectors.fill_circle(home, snap.center.radius, sky::home_galaxy_fill());
        let (outline, width) = if snap.center.selected { (CYAN, 3.0) } else { (YELLOW, 2.0) };
        self.vectors.stroke_circle(home, snap.center.radius, width, outline);
    }

    /// Filled body with a selection-aware outline.
    fn disc(&mut self, body: &Body, fill: VectorColor, outline: VectorColor) {
        self.vectors.fill_circle(body.position(), body.radius, fill);
        self.vectors
            .stroke_circle(body.position(), body.radius, if body.selected { 3.0 } else { 1.0 }, outline);
    }

    fn side_label(&mut self, body: &Body, size: f32, color: VectorColor) {
        self.label(Label::new(
            body.name.clone(),
            body.position() + Vec2::new(body.radius + 5.0, 0.0),
            size,
            color,
        ));
    }
}
