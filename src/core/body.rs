use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::{
    shape::{Polygon, Shape},
    types::Material,
};
use crate::{
    config::{Bounds, DEFAULT_LAYER},
    error::{PhysicsError, Result},
    utils::math::{rotation, Vector2, Vector2Ext},
};

/// Identifier handed out by [`BodyGroup`](super::group::BodyGroup) on insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u64);

impl BodyId {
    /// Placeholder carried by bodies that have not been added to a group yet.
    pub const UNASSIGNED: BodyId = BodyId(u64::MAX);

    pub fn is_assigned(&self) -> bool {
        *self != Self::UNASSIGNED
    }
}

impl Default for BodyId {
    fn default() -> Self {
        Self::UNASSIGNED
    }
}

/// Construction parameters shared by every shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyOptions {
    pub is_static: bool,
    pub material: Material,
    pub layer: i32,
}

impl Default for BodyOptions {
    fn default() -> Self {
        Self {
            is_static: false,
            material: Material::default(),
            layer: DEFAULT_LAYER,
        }
    }
}

impl BodyOptions {
    pub fn dynamic() -> Self {
        Self::default()
    }

    pub fn fixed() -> Self {
        Self {
            is_static: true,
            ..Self::default()
        }
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn on_layer(mut self, layer: i32) -> Self {
        self.layer = layer;
        self
    }
}

/// Rigid body: kinematic state, mass properties and material.
///
/// Kinematic state and friction are open for callers to edit. Identity,
/// shape, mass properties, layer and the static flag stay behind accessors
/// because the owning [`BodyGroup`](super::group::BodyGroup) and the solver
/// rely on them staying consistent; change them through
/// [`Body::set_static`], [`Body::set_material`] or the group's `set_layer`.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub(crate) id: BodyId,
    pub(crate) shape: Shape,

    pub position: Vector2,
    pub orientation: f64,
    pub velocity: Vector2,
    pub angular_velocity: f64,

    // Accumulators cleared at the end of every step.
    pub force: Vector2,
    pub torque: f64,

    pub(crate) mass: f64,
    pub(crate) inv_mass: f64,
    pub(crate) inertia: f64,
    pub(crate) inv_inertia: f64,

    pub(crate) material: Material,
    pub static_friction: f64,
    pub dynamic_friction: f64,
    pub(crate) layer: i32,
    pub(crate) is_static: bool,
}

impl Body {
    /// Circle centred on `position`.
    pub fn circle(position: Vector2, radius: f64, options: BodyOptions) -> Result<Self> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(PhysicsError::InvalidRadius(radius));
        }
        let mut body = Self::with_shape(position, Shape::Circle { radius }, options);
        body.static_friction = 0.1;
        body.dynamic_friction = 0.05;
        body.compute_mass()?;
        Ok(body)
    }

    /// Box centred on `position`.
    pub fn rect(position: Vector2, half_extents: Vector2, options: BodyOptions) -> Result<Self> {
        if !(half_extents.is_finite_vec() && half_extents.x > 0.0 && half_extents.y > 0.0) {
            return Err(PhysicsError::InvalidExtents(half_extents.x, half_extents.y));
        }
        let mut body = Self::with_shape(position, Shape::Box { half_extents }, options);
        body.compute_mass()?;
        Ok(body)
    }

    /// Convex polygon whose vertices are given relative to `position`.
    ///
    /// The body ends up at the polygon centroid and the stored vertices are
    /// re-expressed relative to it.
    pub fn polygon(
        position: Vector2,
        vertices: Vec<Vector2>,
        options: BodyOptions,
    ) -> Result<Self> {
        let polygon = Polygon::new(vertices)?;
        let mut body = Self::with_shape(position, Shape::Polygon(polygon), options);
        body.compute_mass()?;
        Ok(body)
    }

    fn with_shape(position: Vector2, shape: Shape, options: BodyOptions) -> Self {
        Self {
            id: BodyId::UNASSIGNED,
            shape,
            position,
            orientation: 0.0,
            velocity: Vector2::ZERO,
            angular_velocity: 0.0,
            force: Vector2::ZERO,
            torque: 0.0,
            mass: 0.0,
            inv_mass: 0.0,
            inertia: 0.0,
            inv_inertia: 0.0,
            material: options.material,
            static_friction: 0.5,
            dynamic_friction: 0.3,
            layer: options.layer,
            is_static: options.is_static,
        }
    }

    /// Recomputes mass and inertia from the shape and material density.
    ///
    /// Polygons are recentred: the centroid is added to `position` and
    /// subtracted from every vertex.
    pub fn compute_mass(&mut self) -> Result<()> {
        self.material.validate()?;
        let density = self.material.density;

        let (mass, inertia) = match &mut self.shape {
            Shape::Circle { radius } => {
                let r = *radius;
                if !(r.is_finite() && r > 0.0) {
                    return Err(PhysicsError::InvalidRadius(r));
                }
                let mass = PI * r * r * density;
                (mass, mass * r * r)
            }
            Shape::Box { half_extents } => {
                let (w, h) = (half_extents.x * 2.0, half_extents.y * 2.0);
                if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
                    return Err(PhysicsError::InvalidExtents(half_extents.x, half_extents.y));
                }
                let mass = density * w * h;
                (mass, mass * (w * w + h * h) / 12.0)
            }
            Shape::Polygon(polygon) => {
                let props = polygon
                    .mass_properties()
                    .ok_or(PhysicsError::DegeneratePolygon)?;
                self.position += rotation(self.orientation) * props.centroid;
                polygon.translate(-props.centroid);
                (density * props.area, density * props.unit_inertia)
            }
        };

        if self.is_static {
            self.mass = f64::INFINITY;
            self.inv_mass = 0.0;
            self.inertia = f64::INFINITY;
            self.inv_inertia = 0.0;
        } else {
            self.mass = mass;
            self.inv_mass = 1.0 / mass;
            self.inertia = inertia;
            self.inv_inertia = if inertia > 0.0 { 1.0 / inertia } else { 0.0 };
        }
        Ok(())
    }

    pub fn id(&self) -> BodyId {
        self.id
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn inv_mass(&self) -> f64 {
        self.inv_mass
    }

    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    pub fn inv_inertia(&self) -> f64 {
        self.inv_inertia
    }

    pub fn material(&self) -> Material {
        self.material
    }

    pub fn layer(&self) -> i32 {
        self.layer
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Swaps the material and recomputes mass from its density. On error the
    /// previous material is kept.
    pub fn set_material(&mut self, material: Material) -> Result<()> {
        material.validate()?;
        self.material = material;
        self.compute_mass()
    }

    /// Turns the body static or dynamic and refreshes its mass properties.
    pub fn set_static(&mut self, is_static: bool) -> Result<()> {
        self.is_static = is_static;
        self.compute_mass()?;
        if is_static {
            self.static_correction();
        }
        Ok(())
    }

    /// Accumulates an external force, consumed at the next velocity integration.
    pub fn apply_force(&mut self, force: Vector2) {
        self.force += force;
    }

    pub fn apply_torque(&mut self, torque: f64) {
        self.torque += torque;
    }

    /// Instantaneous velocity change; `contact_vector` runs from the centre of mass to the contact.
    pub fn apply_impulse(&mut self, impulse: Vector2, contact_vector: Vector2) {
        if self.is_static {
            return;
        }
        self.velocity += impulse * self.inv_mass;
        self.angular_velocity += self.inv_inertia * contact_vector.cross(impulse);
    }

    /// Half-step velocity update; called once before and once after the position update.
    pub fn integrate_velocity(&mut self, dt: f64, ambient: Vector2) {
        if self.is_static {
            return;
        }
        let half_dt = dt * 0.5;
        self.velocity += (self.force * self.inv_mass + ambient) * half_dt;
        self.angular_velocity += self.torque * self.inv_inertia * half_dt;
    }

    /// Full position update followed by the mirrored velocity half-step.
    pub fn integrate_position(&mut self, dt: f64, ambient: Vector2) {
        if !self.is_static {
            self.position += self.velocity * dt;
            self.orientation += self.angular_velocity * dt;
        }
        self.integrate_velocity(dt, ambient);
        self.static_correction();
    }

    /// Static bodies never carry velocity.
    pub fn static_correction(&mut self) {
        if self.is_static {
            self.velocity = Vector2::ZERO;
            self.angular_velocity = 0.0;
        }
    }

    pub fn clear_forces(&mut self) {
        self.force = Vector2::ZERO;
        self.torque = 0.0;
    }

    /// Screen-space pruning test: one full width/height past the left, right
    /// or bottom edge (and the top edge when `bounds.check_top` is set).
    pub fn is_out_of_bounds(&self, bounds: &Bounds) -> bool {
        let p = self.position;
        let above = p.y < -bounds.height;
        let below = p.y > bounds.height * 2.0;
        let left = p.x < -bounds.width;
        let right = p.x > bounds.width * 2.0;
        below || left || right || (bounds.check_top && above) || !p.is_finite_vec()
    }

    /// Drags the body toward `target`: damps its velocity by `damping`, then
    /// pushes with a force proportional to the offset, capped at `max_force`.
    pub fn steer_towards(&mut self, target: Vector2, max_force: f64, damping: f64) {
        if self.is_static {
            return;
        }
        self.velocity *= damping.clamp(0.0, 1.0);
        let pull = (target - self.position) * self.mass;
        self.apply_force(pull.clamp_length_max(max_force.max(0.0)));
    }

    /// Velocity of the material point at `contact_vector` from the centre of mass.
    pub fn point_velocity(&self, contact_vector: Vector2) -> Vector2 {
        self.velocity + Vector2::scalar_cross(self.angular_velocity, contact_vector)
    }

    /// Polygon or box vertices in world space; `None` for circles.
    pub fn world_vertices(&self) -> Option<Vec<Vector2>> {
        let polygon = self.shape.as_polygon()?;
        let rot = rotation(self.orientation);
        Some(
            polygon
                .vertices
                .iter()
                .map(|v| self.position + rot * *v)
                .collect(),
        )
    }

    pub fn momentum(&self) -> Vector2 {
        if self.is_static {
            Vector2::ZERO
        } else {
            self.velocity * self.mass
        }
    }
}
