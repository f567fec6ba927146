use crate::config::PhysicsConfig;
use crate::snapshot::PhysicsBody;

/// Pairwise inverse-square attraction.
///
/// Accelerations are accumulated over every unordered pair, clamped per body
/// to `max_acceleration`, then integrated into velocity (`v += a·dt`). Pairs
/// closer than `min_distance` are skipped.
pub fn apply_gravity(bodies: &mut [PhysicsBody], config: &PhysicsConfig, dt: f64) {
    let n = bodies.len();
    if n < 2 || config.gravity_constant == 0.0 {
        return;
    }
    let min_dist_sq = config.min_distance * config.min_distance;
    let mut accel = vec![(0.0f64, 0.0f64); n];

    for i in 0..n {
        for j in (i + 1)..n {
            let dx = bodies[j].x - bodies[i].x;
            let dy = bodies[j].y - bodies[i].y;
            let dist_sq = dx * dx + dy * dy;
            if dist_sq < min_dist_sq || !dist_sq.is_finite() {
                continue;
            }
            let dist = dist_sq.sqrt();
            let force = config.gravity_constant * bodies[i].mass * bodies[j].mass / dist_sq;
            let (ux, uy) = (dx / dist, dy / dist);

            let ai = force / bodies[i].mass;
            let aj = force / bodies[j].mass;
            accel[i].0 += ux * ai;
            accel[i].1 += uy * ai;
            accel[j].0 -= ux * aj;
            accel[j].1 -= uy * aj;
        }
    }

    for (body, (ax, ay)) in bodies.iter_mut().zip(accel) {
        let (ax, ay) = clamp_magnitude(ax, ay, config.max_acceleration);
        body.vx += ax * dt;
        body.vy += ay * dt;
    }
}

pub fn apply_damping(bodies: &mut [PhysicsBody], config: &PhysicsConfig) {
    for body in bodies {
        body.vx *= config.damping_factor;
        body.vy *= config.damping_factor;
    }
}

/// Clamps speed to the effective cap and advances positions.
///
/// The cap is `base_max_velocity × velocity_headroom × speed_multiplier`, and
/// the same multiplier scales the displacement.
pub fn integrate(bodies: &mut [PhysicsBody], config: &PhysicsConfig, dt: f64) {
    let base_cap = config.base_max_velocity * config.velocity_headroom;
    for body in bodies {
        let multiplier = body.speed_multiplier;
        let (vx, vy) = clamp_magnitude(body.vx, body.vy, base_cap * multiplier);
        body.vx = vx;
        body.vy = vy;
        body.x += vx * multiplier * dt;
        body.y += vy * multiplier * dt;
    }
}

/// Reflects particles that crossed an edge of the `width × height` area.
///
/// The position is clamped back inside `[radius, size - radius]` and the
/// velocity component perpendicular to the edge is negated and scaled by
/// `restitution`.
pub fn reflect_boundaries(bodies: &mut [PhysicsBody], width: f64, height: f64, restitution: f64) {
    for body in bodies {
        let r = body.radius;
        if body.x < r {
            body.x = r;
            body.vx = body.vx.abs() * restitution;
        } else if body.x > width - r {
            body.x = width - r;
            body.vx = -body.vx.abs() * restitution;
        }
        if body.y < r {
            body.y = r;
            body.vy = body.vy.abs() * restitution;
        } else if body.y > height - r {
            body.y = height - r;
            body.vy = -body.vy.abs() * restitution;
        }
    }
}

/// Position-only clamp used after collision separation.
pub fn contain(bodies: &mut [PhysicsBody], width: f64, height: f64) {
    for body in bodies {
        body.x = clamp_axis(body.x, body.radius, width);
        body.y = clamp_axis(body.y, body.radius, height);
    }
}

/// Clamps a coordinate into `[radius, extent - radius]`.
///
/// Non-finite input lands on the lower bound.
#[inline]
pub fn clamp_axis(value: f64, radius: f64, extent: f64) -> f64 {
    let upper = (extent - radius).max(radius);
    if value.is_finite() {
        value.clamp(radius, upper)
    } else {
        radius
    }
}

#[inline]
pub fn clamp_magnitude(x: f64, y: f64, max: f64) -> (f64, f64) {
    let mag_sq = x * x + y * y;
    if mag_sq > max * max && mag_sq > 0.0 {
        let scale = max / mag_sq.sqrt();
        (x * scale, y * scale)
    } else {
        (x, y)
    }
}
