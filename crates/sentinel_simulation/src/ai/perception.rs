//! Perception model — "видит ли агент цель прямо сейчас"
//!
//! Без состояния: чистая функция от снимка мира.
//! Порядок проверок — от дешёвых к дорогим:
//! 1. range (квадрат дистанции, без sqrt)
//! 2. FOV (угол между forward и направлением на цель)
//! 3. один occlusion probe от "глаз" агента до точки на цели

use bevy::prelude::*;

use super::brain::TargetSnapshot;
use super::config::AgentConfig;

/// Результат одного line probe
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProbeHit {
    /// Ничего на пути
    Clear,
    /// Первое препятствие на отрезке
    Blocked {
        entity: Entity,
        /// Владелец, если препятствие — часть другого entity (BodyPartOf)
        owner: Option<Entity>,
    },
    /// Probe не смог отработать (битые координаты, нет мира)
    Inconclusive,
}

impl ProbeHit {
    /// Препятствие — сама цель или её часть
    pub fn belongs_to(&self, target: Entity) -> bool {
        match self {
            ProbeHit::Blocked { entity, owner } => *entity == target || *owner == Some(target),
            _ => false,
        }
    }
}

/// Occlusion probe (physics/raycast живёт снаружи симуляции ядра)
pub trait OcclusionProbe {
    /// Отрезок `from → to`; `ignore` (и его части) не считаются препятствием
    fn linecast(&self, from: Vec3, to: Vec3, ignore: Option<Entity>) -> ProbeHit;
}

/// Probe без препятствий (открытое поле)
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenField;

impl OcclusionProbe for OpenField {
    fn linecast(&self, _from: Vec3, _to: Vec3, _ignore: Option<Entity>) -> ProbeHit {
        ProbeHit::Clear
    }
}

/// Параметры зрения (выжимка из AgentConfig)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SightParams {
    pub range: f32,
    /// Половина конуса (радианы)
    pub half_fov: f32,
    pub eye_height: f32,
    pub target_aim_height: f32,
}

impl From<&AgentConfig> for SightParams {
    fn from(config: &AgentConfig) -> Self {
        Self {
            range: config.sight_range,
            half_fov: config.half_fov_radians(),
            eye_height: config.eye_height,
            target_aim_height: config.target_aim_height,
        }
    }
}

/// Кто смотрит
#[derive(Debug, Clone, Copy)]
pub struct Observer {
    /// Entity наблюдателя (исключается из probe)
    pub entity: Option<Entity>,
    pub position: Vec3,
    pub forward: Vec3,
}

impl Observer {
    pub fn from_transform(entity: Option<Entity>, transform: &Transform) -> Self {
        Self {
            entity,
            position: transform.translation,
            forward: *transform.forward(),
        }
    }
}

/// Видна ли цель. Нет цели → false, probe Inconclusive → false.
pub fn is_visible(
    sight: &SightParams,
    observer: &Observer,
    target: Option<&TargetSnapshot>,
    probe: &dyn OcclusionProbe,
) -> bool {
    let Some(target) = target else {
        return false;
    };

    let to_target = target.position - observer.position;
    let distance_sq = to_target.length_squared();
    if !distance_sq.is_finite() || distance_sq > sight.range * sight.range {
        return false;
    }

    // Цель "внутри" агента — направление не определено, FOV пропускаем
    if distance_sq > f32::EPSILON {
        let angle = observer.forward.angle_between(to_target.normalize());
        if !(angle <= sight.half_fov) {
            return false;
        }
    }

    let eyes = observer.position + Vec3::Y * sight.eye_height;
    let aim = target.position + Vec3::Y * sight.target_aim_height;

    match probe.linecast(eyes, aim, observer.entity) {
        ProbeHit::Clear => true,
        hit @ ProbeHit::Blocked { .. } => hit.belongs_to(target.entity),
        ProbeHit::Inconclusive => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Probe который считает вызовы и возвращает заданный ответ
    struct CountingProbe {
        answer: ProbeHit,
        calls: Cell<u32>,
    }

    impl CountingProbe {
        fn new(answer: ProbeHit) -> Self {
            Self { answer, calls: Cell::new(0) }
        }
    }

    impl OcclusionProbe for CountingProbe {
        fn linecast(&self, _from: Vec3, _to: Vec3, _ignore: Option<Entity>) -> ProbeHit {
            self.calls.set(self.calls.get() + 1);
            self.answer
        }
    }

    fn sight() -> SightParams {
        SightParams::from(&AgentConfig::default())
    }

    fn observer() -> Observer {
        // Identity transform смотрит в -Z
        Observer::from_transform(None, &Transform::IDENTITY)
    }

    fn target_at(position: Vec3) -> TargetSnapshot {
        TargetSnapshot {
            entity: Entity::from_raw(7),
            position,
            damageable: true,
        }
    }

    #[test]
    fn test_target_ahead_in_range_is_visible() {
        let probe = CountingProbe::new(ProbeHit::Clear);
        let target = target_at(Vec3::new(0.0, 0.0, -5.0));
        assert!(is_visible(&sight(), &observer(), Some(&target), &probe));
        assert_eq!(probe.calls.get(), 1);
    }

    #[test]
    fn test_out_of_range_rejected_without_probe() {
        let probe = CountingProbe::new(ProbeHit::Clear);
        let target = target_at(Vec3::new(0.0, 0.0, -13.0));
        assert!(!is_visible(&sight(), &observer(), Some(&target), &probe));
        assert_eq!(probe.calls.get(), 0);
    }

    #[test]
    fn test_outside_fov_rejected_without_probe() {
        let probe = CountingProbe::new(ProbeHit::Clear);
        // 70° от forward (-Z) в сторону +X
        let angle = 70f32.to_radians();
        let target = target_at(Vec3::new(angle.sin() * 5.0, 0.0, -angle.cos() * 5.0));
        assert!(!is_visible(&sight(), &observer(), Some(&target), &probe));
        assert_eq!(probe.calls.get(), 0);

        // 50° — внутри 60° half-angle
        let angle = 50f32.to_radians();
        let target = target_at(Vec3::new(angle.sin() * 5.0, 0.0, -angle.cos() * 5.0));
        assert!(is_visible(&sight(), &observer(), Some(&target), &probe));
    }

    #[test]
    fn test_obstruction_blocks_unless_it_is_the_target() {
        let target = target_at(Vec3::new(0.0, 0.0, -5.0));
        let wall = Entity::from_raw(99);

        let blocked = CountingProbe::new(ProbeHit::Blocked { entity: wall, owner: None });
        assert!(!is_visible(&sight(), &observer(), Some(&target), &blocked));

        let self_hit = CountingProbe::new(ProbeHit::Blocked { entity: target.entity, owner: None });
        assert!(is_visible(&sight(), &observer(), Some(&target), &self_hit));

        // Броня/оружие цели — её часть
        let part_hit = CountingProbe::new(ProbeHit::Blocked {
            entity: Entity::from_raw(100),
            owner: Some(target.entity),
        });
        assert!(is_visible(&sight(), &observer(), Some(&target), &part_hit));
    }

    #[test]
    fn test_inconclusive_probe_is_not_visible() {
        let probe = CountingProbe::new(ProbeHit::Inconclusive);
        let target = target_at(Vec3::new(0.0, 0.0, -5.0));
        assert!(!is_visible(&sight(), &observer(), Some(&target), &probe));
    }

    #[test]
    fn test_no_target_is_not_visible() {
        assert!(!is_visible(&sight(), &observer(), None, &OpenField));
    }

    #[test]
    fn test_target_on_top_of_observer_skips_fov() {
        let target = target_at(Vec3::ZERO);
        assert!(is_visible(&sight(), &observer(), Some(&target), &OpenField));
    }
}
