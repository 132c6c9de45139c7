//! Damage application + death handling
//!
//! FSM решает *когда* атаковать (AttackIntent), здесь — *что* происходит с целью:
//! 1. AttackIntent → Health (saturating) → DamageDealt
//! 2. Health дошёл до 0 → EntityDied
//! 3. EntityDied → Dead marker, AI отключается, агент деспавнится через таймаут

use bevy::prelude::*;

use crate::ai::{AgentBrain, CombatExecutor};
use crate::components::{Health, NavAgent};

/// Сколько секунд труп агента лежит до деспавна
pub const CORPSE_LIFETIME: f64 = 2.0;

/// Событие: агент решил атаковать цель (fire-and-forget)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct AttackIntent {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: u32,
}

/// Событие: урон нанесен
///
/// Используется для UI, звуков, эффектов.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: u32,
    pub target_died: bool,
}

/// Событие: entity умер (health дошёл до 0)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Компонент-маркер: entity мертв (Health == 0)
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Dead;

/// Компонент-маркер: деспавн entity после указанного времени
#[derive(Component, Debug, Clone, Copy)]
pub struct DespawnAfter {
    /// Время деспавна (в секундах simulation clock)
    pub despawn_time: f64,
}

/// CombatExecutor поверх EventWriter: атака = AttackIntent событие
///
/// Урон применяется позже в `apply_attack_intents`, результат агент
/// видит только через Health цели.
pub struct IntentExecutor<'a, 'w> {
    pub attacker: Entity,
    pub intents: &'a mut EventWriter<'w, AttackIntent>,
}

impl CombatExecutor for IntentExecutor<'_, '_> {
    fn attack(&mut self, target: Entity, damage: u32) -> bool {
        self.intents.write(AttackIntent {
            attacker: self.attacker,
            target,
            damage,
        });
        true
    }
}

/// Система: AttackIntent → Health
pub fn apply_attack_intents(
    mut intents: EventReader<AttackIntent>,
    mut damage_dealt_events: EventWriter<DamageDealt>,
    mut entity_died_events: EventWriter<EntityDied>,
    mut targets: Query<&mut Health, Without<Dead>>,
) {
    for intent in intents.read() {
        let Ok(mut health) = targets.get_mut(intent.target) else {
            crate::logger::log_warning(&format!(
                "AttackIntent: target {:?} has no Health (or already dead)",
                intent.target
            ));
            continue;
        };

        let was_alive = health.is_alive();
        health.take_damage(intent.damage);
        let died = was_alive && !health.is_alive();

        damage_dealt_events.write(DamageDealt {
            attacker: intent.attacker,
            target: intent.target,
            damage: intent.damage,
            target_died: died,
        });

        if died {
            entity_died_events.write(EntityDied {
                entity: intent.target,
                killer: Some(intent.attacker),
            });
            crate::logger::log_info(&format!(
                "Entity {:?} killed by {:?}",
                intent.target, intent.attacker
            ));
        }
    }
}

/// Система: обработка смерти
///
/// Мёртвый агент теряет AgentBrain (FSM больше не тикает), NavAgent
/// останавливается, труп деспавнится через CORPSE_LIFETIME.
/// Мёртвая цель получает только Dead — агенты перестают её видеть.
pub fn handle_deaths(
    mut commands: Commands,
    mut death_events: EventReader<EntityDied>,
    mut agents: Query<&mut NavAgent, With<AgentBrain>>,
    time: Res<Time<Fixed>>,
) {
    for event in death_events.read() {
        let Ok(mut entity_commands) = commands.get_entity(event.entity) else {
            continue;
        };
        entity_commands.insert(Dead);

        if let Ok(mut nav) = agents.get_mut(event.entity) {
            nav.clear();
            entity_commands.remove::<AgentBrain>().insert(DespawnAfter {
                despawn_time: time.elapsed_secs_f64() + CORPSE_LIFETIME,
            });
            crate::logger::log_info(&format!("Disabled AI for dead agent {:?}", event.entity));
        }
    }
}

/// Система: деспавн по таймауту
pub fn despawn_after_timeout(
    mut commands: Commands,
    query: Query<(Entity, &DespawnAfter)>,
    time: Res<Time<Fixed>>,
) {
    let current_time = time.elapsed_secs_f64();

    for (entity, despawn_after) in query.iter() {
        if current_time >= despawn_after.despawn_time {
            crate::logger::log(&format!("Despawning entity {:?} (timeout)", entity));
            commands.entity(entity).despawn();
        }
    }
}
