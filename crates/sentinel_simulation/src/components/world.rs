//! World компоненты: Occluder, BodyPartOf

use bevy::prelude::*;

/// Препятствие для line-of-sight (AABB, центр = translation + offset)
///
/// Rotation игнорируется — стены/ящики arena выровнены по осям.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
#[require(Transform)]
pub struct Occluder {
    pub half_extents: Vec3,
    pub offset: Vec3,
}

impl Occluder {
    pub fn new(half_extents: Vec3) -> Self {
        Self {
            half_extents,
            offset: Vec3::ZERO,
        }
    }

    /// Тело актора 0.8 × 1.8 × 0.8, Transform стоит в ногах
    pub fn actor_body() -> Self {
        Self {
            half_extents: Vec3::new(0.4, 0.9, 0.4),
            offset: Vec3::new(0.0, 0.9, 0.0),
        }
    }

    /// (min, max) в world координатах
    pub fn bounds(&self, translation: Vec3) -> (Vec3, Vec3) {
        let center = translation + self.offset;
        (center - self.half_extents, center + self.half_extents)
    }
}

/// Явная связь "часть entity-владельца" (оружие, броня, хитбокс)
///
/// Occlusion probe, попавший в часть цели, считается попаданием в саму цель.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct BodyPartOf(pub Entity);
