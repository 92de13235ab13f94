//! Continuous collision by substepping
//!
//! A body that moves farther than its own extent in one frame can pass
//! straight through a thin obstacle when only the end-of-frame pose is tested.
//! The swept tests here re-run the static test at evenly spaced poses along the
//! previous -> current segment, or (for the mixed box pair) intersect that
//! segment with an expanded box.
//!
//! When a pair would need more than `max_substeps` samples the budget is spent
//! only on the part of the frame where the bodies' world bounds overlap, which
//! keeps fast movers from tunneling regardless of speed.

use super::primitives::{Aabb, Obb};
use super::sat::{aabb_vs_aabb, aabb_vs_obb, obb_vs_obb};
use super::shape::ColliderShape;
use crate::foundation::math::{utils::lerp_vec3, Vec3};

/// Settings shared by every swept test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepSettings {
    /// Largest advance between two substeps
    pub max_step_distance: f32,
    /// Upper bound on substeps for a single pair
    pub max_substeps: u32,
    /// Degenerate-axis threshold forwarded to the SAT tests
    pub axis_epsilon: f32,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            max_step_distance: 1.0,
            max_substeps: 64,
            axis_epsilon: super::sat::DEFAULT_AXIS_EPSILON,
        }
    }
}

/// A shape at its end-of-frame pose plus how far it travelled this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweptShape {
    /// End-of-frame shape
    pub shape: ColliderShape,
    /// Current center minus center at the start of the frame
    pub displacement: Vec3,
}

impl SweptShape {
    /// Wrap a shape with its per-frame displacement
    pub fn new(shape: ColliderShape, displacement: Vec3) -> Self {
        Self { shape, displacement }
    }

    /// A shape that did not move this frame
    pub fn stationary(shape: ColliderShape) -> Self {
        Self::new(shape, Vec3::zeros())
    }

    /// Center at parameter `t` in `[0, 1]` along this frame's motion
    pub fn center_at(&self, t: f32) -> Vec3 {
        let end = self.shape.center();
        lerp_vec3(end - self.displacement, end, t)
    }
}

/// Where each body was when a swept test first reported overlap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepHit {
    /// Fraction of the frame's motion at which overlap was found
    pub time: f32,
    /// Center of the first shape at that time
    pub position_a: Vec3,
    /// Center of the second shape at that time
    pub position_b: Vec3,
}

fn smallest_half_extent(shape: &ColliderShape) -> f32 {
    shape.half_size().min()
}

/// Substep plan for one pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Substeps {
    count: u32,
    /// The full-frame count would have exceeded the budget
    capped: bool,
}

/// Number of substeps needed so no sample skips over the overlap window
fn substep_count(a: &SweptShape, b: &SweptShape, settings: &SweepSettings) -> Substeps {
    let travel = (a.displacement - b.displacement).norm();
    if travel <= f32::EPSILON {
        return Substeps { count: 1, capped: false };
    }

    let overlap_window = smallest_half_extent(&a.shape) + smallest_half_extent(&b.shape);
    let step = if overlap_window > f32::EPSILON {
        settings.max_step_distance.min(overlap_window)
    } else {
        settings.max_step_distance
    };

    // Float-to-int cast saturates; the clamp keeps it within budget
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let wanted = (travel / step).ceil() as u32;
    let budget = settings.max_substeps.max(1);
    Substeps {
        count: wanted.clamp(1, budget),
        capped: wanted > budget,
    }
}

/// Part of the frame, as `[t_enter, t_exit]`, where the world bounds of the
/// two moving shapes overlap
fn bounds_window(a: &SweptShape, b: &SweptShape) -> Option<(f32, f32)> {
    let bounds_a = a.shape.to_obb().world_aabb();
    let bounds_b = b.shape.to_obb().world_aabb();
    let reach = Aabb::from_center_half_size(Vec3::zeros(), bounds_a.half_size() + bounds_b.half_size());

    let end = a.shape.center() - b.shape.center();
    let start = end - (a.displacement - b.displacement);
    segment_interval(start, end, &reach)
}

fn static_hit(a: &SweptShape, b: &SweptShape, epsilon: f32) -> Option<SweepHit> {
    a.shape.intersects(&b.shape, epsilon).then(|| SweepHit {
        time: 1.0,
        position_a: a.shape.center(),
        position_b: b.shape.center(),
    })
}

/// Substep test for two boxes of the same kind, interpolating both bodies
fn substep_same_kind<F>(a: &SweptShape, b: &SweptShape, settings: &SweepSettings, test: F) -> Option<SweepHit>
where
    F: Fn(Vec3, Vec3) -> bool,
{
    let plan = substep_count(a, b, settings);
    #[allow(clippy::cast_precision_loss)]
    let step_count = plan.count as f32;

    // Over budget: sample the middle of each slice of the bounds window instead of the whole frame
    let (t_start, t_span, offset) = if plan.capped {
        let (enter, exit) = bounds_window(a, b)?;
        log::warn!(
            "Sweep needs more than {} substeps for {:.2} units, sampling t in [{:.3}, {:.3}] only",
            plan.count,
            (a.displacement - b.displacement).norm(),
            enter,
            exit
        );
        (enter, exit - enter, 0.5)
    } else {
        (0.0, 1.0, 1.0)
    };

    (0..plan.count).find_map(|i| {
        #[allow(clippy::cast_precision_loss)]
        let t = t_start + t_span * (i as f32 + offset) / step_count;
        let center_a = a.center_at(t);
        let center_b = b.center_at(t);
        test(center_a, center_b).then_some(SweepHit {
            time: t,
            position_a: center_a,
            position_b: center_b,
        })
    })
}

/// Swept AABB vs AABB
pub fn sweep_aabb_aabb(a: &Aabb, a_motion: Vec3, b: &Aabb, b_motion: Vec3, settings: &SweepSettings) -> Option<SweepHit> {
    let swept_a = SweptShape::new(ColliderShape::Aabb(*a), a_motion);
    let swept_b = SweptShape::new(ColliderShape::Aabb(*b), b_motion);
    static_hit(&swept_a, &swept_b, settings.axis_epsilon).or_else(|| {
        substep_same_kind(&swept_a, &swept_b, settings, |center_a, center_b| {
            aabb_vs_aabb(&a.recentered(center_a), &b.recentered(center_b))
        })
    })
}

/// Swept OBB vs OBB (orientation held at the end-of-frame pose)
pub fn sweep_obb_obb(a: &Obb, a_motion: Vec3, b: &Obb, b_motion: Vec3, settings: &SweepSettings) -> Option<SweepHit> {
    let swept_a = SweptShape::new(ColliderShape::Obb(*a), a_motion);
    let swept_b = SweptShape::new(ColliderShape::Obb(*b), b_motion);
    static_hit(&swept_a, &swept_b, settings.axis_epsilon).or_else(|| {
        substep_same_kind(&swept_a, &swept_b, settings, |center_a, center_b| {
            obb_vs_obb(&a.recentered(center_a), &b.recentered(center_b), settings.axis_epsilon)
        })
    })
}

/// Swept AABB vs OBB
///
/// After the static check, the relative motion of the AABB (with the OBB
/// pinned at its end-of-frame pose) is intersected with the OBB's world
/// bounds grown by the AABB's half size. This answers hit/no-hit cheaply; the
/// reported time is the entry time into the grown bounds.
pub fn sweep_aabb_obb(a: &Aabb, a_motion: Vec3, b: &Obb, b_motion: Vec3, settings: &SweepSettings) -> Option<SweepHit> {
    if aabb_vs_obb(a, b, settings.axis_epsilon) {
        return Some(SweepHit {
            time: 1.0,
            position_a: a.center(),
            position_b: b.center,
        });
    }

    let relative_motion = a_motion - b_motion;
    if relative_motion.norm_squared() <= f32::EPSILON {
        return None;
    }

    let end = a.center();
    let start = end - relative_motion;
    let target = b.world_aabb().expanded(a.half_size());

    segment_vs_aabb(start, end, &target).map(|t| SweepHit {
        time: t,
        position_a: lerp_vec3(end - a_motion, end, t),
        position_b: lerp_vec3(b.center - b_motion, b.center, t),
    })
}

/// Slab test of the segment `start -> end` against a box
///
/// Returns the smallest parameter in `[0, 1]` at which the segment is inside.
pub fn segment_vs_aabb(start: Vec3, end: Vec3, aabb: &Aabb) -> Option<f32> {
    segment_interval(start, end, aabb).map(|(enter, _)| enter)
}

/// Slab test returning the `[enter, exit]` parameters of the segment inside the box
pub fn segment_interval(start: Vec3, end: Vec3, aabb: &Aabb) -> Option<(f32, f32)> {
    let direction = end - start;
    let mut t_min = 0.0_f32;
    let mut t_max = 1.0_f32;

    for i in 0..3 {
        if direction[i].abs() <= f32::EPSILON {
            if start[i] < aabb.min[i] || start[i] > aabb.max[i] {
                return None;
            }
            continue;
        }

        let inverse = 1.0 / direction[i];
        let t1 = (aabb.min[i] - start[i]) * inverse;
        let t2 = (aabb.max[i] - start[i]) * inverse;
        t_min = t_min.max(t1.min(t2));
        t_max = t_max.min(t1.max(t2));
        if t_min > t_max {
            return None;
        }
    }

    Some((t_min, t_max))
}

/// Dispatch a swept test by shape kinds, normalizing the mixed pair so the AABB goes first
pub fn sweep(a: &SweptShape, b: &SweptShape, settings: &SweepSettings) -> Option<SweepHit> {
    match (&a.shape, &b.shape) {
        (ColliderShape::Aabb(box_a), ColliderShape::Aabb(box_b)) => {
            sweep_aabb_aabb(box_a, a.displacement, box_b, b.displacement, settings)
        }
        (ColliderShape::Obb(box_a), ColliderShape::Obb(box_b)) => {
            sweep_obb_obb(box_a, a.displacement, box_b, b.displacement, settings)
        }
        (ColliderShape::Aabb(aabb), ColliderShape::Obb(obb)) => {
            sweep_aabb_obb(aabb, a.displacement, obb, b.displacement, settings)
        }
        (ColliderShape::Obb(obb), ColliderShape::Aabb(aabb)) => {
            sweep_aabb_obb(aabb, b.displacement, obb, a.displacement, settings).map(|hit| SweepHit {
                time: hit.time,
                position_a: hit.position_b,
                position_b: hit.position_a,
            })
        }
    }
}
