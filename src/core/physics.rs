//=========================================================================
// Arcade Physics
//=========================================================================
//
// Axis-aligned boxes with velocity, gravity and world bounds.
//
// Step order per tick:
//   world.integrate(body, dt)        velocity += gravity·dt, centre += v·dt
//   world.collide_solid(body, solid) separate from static boxes
//
// Contact flags are reset by integrate() and set by the resolution
// that follows in the same tick.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec2;

//=== Constants ===========================================================

/// Rebounds slower than this (px/s) are zeroed so resting bodies settle.
const REST_SPEED: f32 = 20.0;

/// Slack when deciding which side a body came from.
const CONTACT_EPSILON: f32 = 0.01;

//=== Aabb ================================================================

/// Axis-aligned box stored as centre plus half extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self { center, half: size * 0.5 }
    }

    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self { center: (min + max) * 0.5, half: (max - min) * 0.5 }
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.half
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.half
    }

    pub fn size(&self) -> Vec2 {
        self.half * 2.0
    }

    /// Strict overlap; boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let d = (self.center - other.center).abs();
        let reach = self.half + other.half;
        d.x < reach.x && d.y < reach.y
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let min = self.min();
        let max = self.max();
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }

    pub fn translated(&self, offset: Vec2) -> Self {
        Self { center: self.center + offset, half: self.half }
    }
}

//=== Body ================================================================

/// Dynamic box moved by [`ArcadeWorld`].
#[derive(Debug, Clone)]
pub struct Body {
    pub aabb: Aabb,
    pub velocity: Vec2,
    pub allow_gravity: bool,
    /// Fraction of speed kept when rebounding off a surface.
    pub bounce: f32,
    pub collide_world_bounds: bool,

    //--- Contact Flags (this tick) ----------------------------------------
    pub touching_down: bool,
    pub blocked_left: bool,
    pub blocked_right: bool,
    pub blocked_up: bool,
    pub blocked_down: bool,

    prev_center: Vec2,
}

impl Body {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            aabb: Aabb::new(center, size),
            velocity: Vec2::ZERO,
            allow_gravity: true,
            bounce: 0.0,
            collide_world_bounds: false,
            touching_down: false,
            blocked_left: false,
            blocked_right: false,
            blocked_up: false,
            blocked_down: false,
            prev_center: center,
        }
    }

    pub fn with_bounce(mut self, bounce: f32) -> Self {
        self.bounce = bounce;
        self
    }

    pub fn with_world_bounds(mut self) -> Self {
        self.collide_world_bounds = true;
        self
    }

    pub fn without_gravity(mut self) -> Self {
        self.allow_gravity = false;
        self
    }

    pub fn center(&self) -> Vec2 {
        self.aabb.center
    }

    /// Moves the body without leaving a trail for contact resolution.
    pub fn teleport(&mut self, center: Vec2) {
        self.aabb.center = center;
        self.prev_center = center;
    }

    /// Standing on something this tick.
    pub fn on_floor(&self) -> bool {
        self.touching_down || self.blocked_down
    }

    fn reset_contacts(&mut self) {
        self.touching_down = false;
        self.blocked_left = false;
        self.blocked_right = false;
        self.blocked_up = false;
        self.blocked_down = false;
    }
}

fn rebound(speed: f32, bounce: f32) -> f32 {
    let v = -speed * bounce;
    if v.abs() < REST_SPEED {
        0.0
    } else {
        v
    }
}

//=== ArcadeWorld =========================================================

/// World rectangle plus gravity.
#[derive(Debug, Clone, Copy)]
pub struct ArcadeWorld {
    pub bounds: Aabb,
    pub gravity: Vec2,
}

impl ArcadeWorld {
    /// World spanning `(0, 0)` to `size`, gravity pointing down (+y).
    pub fn new(size: Vec2, gravity: f32) -> Self {
        Self {
            bounds: Aabb::from_min_max(Vec2::ZERO, size),
            gravity: Vec2::new(0.0, gravity),
        }
    }

    //--- Integration ------------------------------------------------------

    pub fn integrate(&self, body: &mut Body, dt: f32) {
        body.reset_contacts();
        body.prev_center = body.aabb.center;

        if body.allow_gravity {
            body.velocity += self.gravity * dt;
        }
        body.aabb.center += body.velocity * dt;

        if body.collide_world_bounds {
            self.clamp_to_bounds(body);
        }
    }

    fn clamp_to_bounds(&self, body: &mut Body) {
        let lo = self.bounds.min() + body.aabb.half;
        let hi = self.bounds.max() - body.aabb.half;
        let c = &mut body.aabb.center;

        if c.x < lo.x {
            c.x = lo.x;
            body.blocked_left = true;
            body.velocity.x = rebound(body.velocity.x, body.bounce);
        } else if c.x > hi.x {
            c.x = hi.x;
            body.blocked_right = true;
            body.velocity.x = rebound(body.velocity.x, body.bounce);
        }

        if c.y < lo.y {
            c.y = lo.y;
            body.blocked_up = true;
            body.velocity.y = rebound(body.velocity.y, body.bounce);
        } else if c.y > hi.y {
            c.y = hi.y;
            body.blocked_down = true;
            body.velocity.y = rebound(body.velocity.y, body.bounce);
        }
    }

    //--- Static Collision -------------------------------------------------

    /// Pushes `body` out of `solid` along the side it entered from.
    ///
    /// The entry side comes from last tick's position; if the body was
    /// already inside, the axis of least penetration wins. Returns `true`
    /// when a separation happened.
    pub fn collide_solid(&self, body: &mut Body, solid: &Aabb) -> bool {
        if !body.aabb.overlaps(solid) {
            return false;
        }

        let half = body.aabb.half;
        let prev_min = body.prev_center - half;
        let prev_max = body.prev_center + half;
        let s_min = solid.min();
        let s_max = solid.max();

        if prev_max.y <= s_min.y + CONTACT_EPSILON {
            self.land_on(body, s_min.y);
        } else if prev_min.y >= s_max.y - CONTACT_EPSILON {
            self.bump_head(body, s_max.y);
        } else if prev_max.x <= s_min.x + CONTACT_EPSILON {
            self.stop_right(body, s_min.x);
        } else if prev_min.x >= s_max.x - CONTACT_EPSILON {
            self.stop_left(body, s_max.x);
        } else {
            let b_min = body.aabb.min();
            let b_max = body.aabb.max();
            let overlap_x = b_max.x.min(s_max.x) - b_min.x.max(s_min.x);
            let overlap_y = b_max.y.min(s_max.y) - b_min.y.max(s_min.y);

            if overlap_y <= overlap_x {
                if body.aabb.center.y < solid.center.y {
                    self.land_on(body, s_min.y);
                } else {
                    self.bump_head(body, s_max.y);
                }
            } else if body.aabb.center.x < solid.center.x {
                self.stop_right(body, s_min.x);
            } else {
                self.stop_left(body, s_max.x);
            }
        }
        true
    }

    fn land_on(&self, body: &mut Body, top: f32) {
        body.aabb.center.y = top - body.aabb.half.y;
        body.touching_down = true;
        if body.velocity.y > 0.0 {
            body.velocity.y = rebound(body.velocity.y, body.bounce);
        }
    }

    fn bump_head(&self, body: &mut Body, bottom: f32) {
        body.aabb.center.y = bottom + body.aabb.half.y;
        body.blocked_up = true;
        if body.velocity.y < 0.0 {
            body.velocity.y = rebound(body.velocity.y, body.bounce);
        }
    }

    fn stop_right(&self, body: &mut Body, left: f32) {
        body.aabb.center.x = left - body.aabb.half.x;
        body.blocked_right = true;
        if body.velocity.x > 0.0 {
            body.velocity.x = rebound(body.velocity.x, body.bounce);
        }
    }

    fn stop_left(&self, body: &mut Body, right: f32) {
        body.aabb.center.x = right + body.aabb.half.x;
        body.blocked_left = true;
        if body.velocity.x < 0.0 {
            body.velocity.x = rebound(body.velocity.x, body.bounce);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn overlap_is_strict() {
        let a = Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let touching = Aabb::new(Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0));
        let inside = Aabb::new(Vec2::new(9.0, 0.0), Vec2::new(10.0, 10.0));

        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&inside));
    }

    #[test]
    fn min_max_round_trip() {
        let b = Aabb::from_min_max(Vec2::new(10.0, 20.0), Vec2::new(30.0, 60.0));
        assert_eq!(b.center, Vec2::new(20.0, 40.0));
        assert_eq!(b.size(), Vec2::new(20.0, 40.0));
        assert!(b.contains(Vec2::new(10.0, 60.0)));
        assert!(!b.contains(Vec2::new(31.0, 40.0)));
    }

    #[test]
    fn gravity_accelerates_body() {
        let world = ArcadeWorld::new(Vec2::new(800.0, 600.0), 1200.0);
        let mut body = Body::new(Vec2::new(100.0, 100.0), Vec2::splat(20.0));

        world.integrate(&mut body, DT);

        assert_relative_eq!(body.velocity.y, 20.0, epsilon = 1e-4);
        assert_relative_eq!(body.center().y, 100.0 + 20.0 * DT, epsilon = 1e-4);
    }

    #[test]
    fn gravity_can_be_disabled() {
        let world = ArcadeWorld::new(Vec2::new(800.0, 600.0), 1200.0);
        let mut body = Body::new(Vec2::new(100.0, 100.0), Vec2::splat(20.0)).without_gravity();
        world.integrate(&mut body, DT);
        assert_eq!(body.velocity, Vec2::ZERO);
    }

    #[test]
    fn world_bounds_clamp_and_flag() {
        let world = ArcadeWorld::new(Vec2::new(800.0, 600.0), 0.0);
        let mut body = Body::new(Vec2::new(15.0, 300.0), Vec2::splat(20.0)).with_world_bounds();
        body.velocity.x = -600.0;

        world.integrate(&mut body, DT);

        assert_eq!(body.center().x, 10.0);
        assert!(body.blocked_left);
        assert_eq!(body.velocity.x, 0.0);
    }

    #[test]
    fn bounce_reflects_fast_impacts() {
        let world = ArcadeWorld::new(Vec2::new(800.0, 600.0), 0.0);
        let mut body = Body::new(Vec2::new(400.0, 585.0), Vec2::splat(20.0))
            .with_world_bounds()
            .with_bounce(0.5);
        body.velocity.y = 600.0;

        world.integrate(&mut body, DT);

        assert!(body.blocked_down);
        assert!(body.on_floor());
        assert_relative_eq!(body.velocity.y, -300.0);
    }

    #[test]
    fn falling_body_lands_on_platform() {
        let world = ArcadeWorld::new(Vec2::new(800.0, 500.0), 900.0);
        let platform = Aabb::new(Vec2::new(400.0, 480.0), Vec2::new(100.0, 20.0));
        let mut body = Body::new(Vec2::new(400.0, 400.0), Vec2::splat(32.0));

        for _ in 0..120 {
            world.integrate(&mut body, DT);
            world.collide_solid(&mut body, &platform);
        }

        assert!(body.touching_down);
        assert_relative_eq!(body.aabb.max().y, platform.min().y, epsilon = 1e-3);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn walking_into_wall_blocks_side() {
        let world = ArcadeWorld::new(Vec2::new(800.0, 500.0), 0.0);
        let wall = Aabb::new(Vec2::new(200.0, 100.0), Vec2::new(20.0, 200.0));
        let mut body = Body::new(Vec2::new(170.0, 100.0), Vec2::splat(32.0)).without_gravity();
        body.velocity.x = 300.0;

        world.integrate(&mut body, DT);
        assert!(world.collide_solid(&mut body, &wall));

        assert!(body.blocked_right);
        assert_relative_eq!(body.aabb.max().x, wall.min().x);
        assert_eq!(body.velocity.x, 0.0);
    }

    #[test]
    fn jumping_into_ceiling_blocks_up() {
        let world = ArcadeWorld::new(Vec2::new(800.0, 500.0), 0.0);
        let ceiling = Aabb::new(Vec2::new(100.0, 100.0), Vec2::new(100.0, 20.0));
        let mut body = Body::new(Vec2::new(100.0, 128.0), Vec2::splat(32.0)).without_gravity();
        body.velocity.y = -500.0;

        world.integrate(&mut body, DT);
        world.collide_solid(&mut body, &ceiling);

        assert!(body.blocked_up);
        assert_relative_eq!(body.aabb.min().y, ceiling.max().y);
    }

    #[test]
    fn separated_bodies_are_untouched() {
        let world = ArcadeWorld::new(Vec2::new(800.0, 500.0), 0.0);
        let solid = Aabb::new(Vec2::new(500.0, 500.0), Vec2::splat(10.0));
        let mut body = Body::new(Vec2::new(100.0, 100.0), Vec2::splat(10.0));
        assert!(!world.collide_solid(&mut body, &solid));
        assert_eq!(body.center(), Vec2::new(100.0, 100.0));
    }
}
