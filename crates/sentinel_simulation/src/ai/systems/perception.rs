//! Occlusion world — снимок препятствий на тик + OcclusionProbe поверх него

use bevy::prelude::*;

use crate::ai::{OcclusionProbe, ProbeHit};
use crate::components::{BodyPartOf, Occluder};

/// Одно препятствие в world координатах
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub entity: Entity,
    pub owner: Option<Entity>,
    pub min: Vec3,
    pub max: Vec3,
}

impl Obstacle {
    /// Параметр t ∈ [0, 1] первого пересечения отрезка с AABB (slab test)
    fn segment_entry(&self, from: Vec3, to: Vec3) -> Option<f32> {
        let delta = to - from;
        let mut t_min = 0.0_f32;
        let mut t_max = 1.0_f32;

        for axis in 0..3 {
            let origin = from[axis];
            let direction = delta[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if direction.abs() <= f32::EPSILON {
                // Параллельно slab — либо внутри, либо мимо
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / direction;
            let mut t0 = (lo - origin) * inv;
            let mut t1 = (hi - origin) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }

        Some(t_min)
    }

    fn is_part_of(&self, entity: Entity) -> bool {
        self.entity == entity || self.owner == Some(entity)
    }
}

/// Resource: все Occluder на текущий тик (пересобирается каждый FixedUpdate)
#[derive(Resource, Debug, Default, Clone)]
pub struct OcclusionWorld {
    obstacles: Vec<Obstacle>,
}

impl OcclusionWorld {
    pub fn insert(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    pub fn clear(&mut self) {
        self.obstacles.clear();
    }
}

impl OcclusionProbe for OcclusionWorld {
    fn linecast(&self, from: Vec3, to: Vec3, ignore: Option<Entity>) -> ProbeHit {
        if !from.is_finite() || !to.is_finite() {
            return ProbeHit::Inconclusive;
        }

        let nearest = self
            .obstacles
            .iter()
            .filter(|obstacle| ignore.is_none_or(|ignored| !obstacle.is_part_of(ignored)))
            .filter_map(|obstacle| obstacle.segment_entry(from, to).map(|t| (t, obstacle)))
            .min_by(|(a, _), (b, _)| a.total_cmp(b));

        match nearest {
            Some((_, obstacle)) => ProbeHit::Blocked {
                entity: obstacle.entity,
                owner: obstacle.owner,
            },
            None => ProbeHit::Clear,
        }
    }
}

/// Система: пересобрать OcclusionWorld из Occluder компонентов
pub fn rebuild_occlusion_world(
    mut occlusion: ResMut<OcclusionWorld>,
    occluders: Query<(Entity, &Transform, &Occluder, Option<&BodyPartOf>)>,
) {
    occlusion.clear();

    for (entity, transform, occluder, part_of) in occluders.iter() {
        let (min, max) = occluder.bounds(transform.translation);
        occlusion.insert(Obstacle {
            entity,
            owner: part_of.map(|part| part.0),
            min,
            max,
        });
    }
}
