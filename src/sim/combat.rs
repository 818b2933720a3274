//! Combat resolution
//!
//! Outcome rules for the two kinds of contact in the arena:
//! - projectile × enemy: the bullet is spent, the enemy loses health, a kill
//!   pays out its point value
//! - enemy × player: contact damage, gated per enemy by the attack cooldown
//!
//! Enemies never interact with each other, neither do projectiles.

use super::collision::{enemies_touching_player, projectile_enemy_contacts};
use super::entity::{DamageOutcome, Enemy, Player, Projectile};
use super::state::{GameEvent, RunState};

/// Apply one projectile to one enemy
///
/// Dead enemies cannot be hit, so the caller must not consume the
/// projectile when this returns `Ignored`.
pub fn projectile_hit(enemy: &mut Enemy, projectile: &Projectile) -> DamageOutcome {
    enemy.take_damage(projectile.damage)
}

/// Apply one enemy's contact to the player at sim time `now`
///
/// Returns `None` while the enemy's attack is still cooling down.
pub fn contact_hit(
    enemy: &mut Enemy,
    player: &mut Player,
    now: f32,
    cooldown: f32,
) -> Option<DamageOutcome> {
    if player.is_dead() || !enemy.attack_ready(now, cooldown) {
        return None;
    }
    enemy.last_attack_at = Some(now);
    Some(player.take_damage(enemy.contact_damage))
}

/// Resolve every projectile/enemy overlap this tick
///
/// Each enemy is settled atomically: once a hit kills it, later projectiles
/// in the same tick pass it by, so the kill and its score are awarded once.
/// Returns the number of kills.
pub fn resolve_projectile_hits(state: &mut RunState) -> u32 {
    let contacts = projectile_enemy_contacts(&state.projectiles, &state.enemies, &state.tuning);
    if contacts.is_empty() {
        return 0;
    }

    let mut spent = vec![false; state.projectiles.len()];
    let mut kills = Vec::new();

    for (p_idx, e_idx) in contacts {
        if spent[p_idx] {
            continue;
        }
        let enemy = &mut state.enemies[e_idx];
        match projectile_hit(enemy, &state.projectiles[p_idx]) {
            DamageOutcome::Ignored => continue,
            DamageOutcome::Hurt => {}
            DamageOutcome::Killed => kills.push((enemy.id, enemy.pos, enemy.point_value)),
        }
        spent[p_idx] = true;
    }

    let mut idx = 0;
    state.projectiles.retain(|_| {
        let keep = !spent[idx];
        idx += 1;
        keep
    });
    state.enemies.retain(|e| e.is_alive());

    for &(enemy_id, pos, points) in &kills {
        state.player.score = state.player.score.saturating_add(points);
        state.emit(GameEvent::EnemyKilled {
            enemy_id,
            pos,
            points,
        });
    }
    kills.len() as u32
}

/// Resolve every enemy/player overlap this tick
///
/// Emits `PlayerHurt` per landed hit and a single `RunOver` on the killing
/// blow. Returns true if the player died this tick.
pub fn resolve_contact_damage(state: &mut RunState) -> bool {
    let touching = enemies_touching_player(&state.player, &state.enemies, &state.tuning);
    let (now, cooldown) = (state.clock, state.tuning.attack_cooldown);
    let mut outcomes = Vec::new();

    for idx in touching {
        let enemy = &mut state.enemies[idx];
        if let Some(outcome) = contact_hit(enemy, &mut state.player, now, cooldown) {
            outcomes.push(outcome);
        }
    }

    let mut died = false;
    for outcome in outcomes {
        match outcome {
            DamageOutcome::Hurt => state.emit(GameEvent::PlayerHurt {
                health: state.player.health,
                max_health: state.player.max_health(),
            }),
            DamageOutcome::Killed => {
                state.emit(GameEvent::PlayerHurt {
                    health: 0,
                    max_health: state.player.max_health(),
                });
                log::info!(
                    "Player died on wave {} with score {}",
                    state.player.wave,
                    state.player.score
                );
                state.emit(GameEvent::RunOver {
                    score: state.player.score,
                    wave: state.player.wave,
                });
                died = true;
            }
            DamageOutcome::Ignored => {}
        }
    }
    died
}

/// Run both rules in order: bullets first, then contact damage
pub fn resolve(state: &mut RunState) {
    resolve_projectile_hits(state);
    resolve_contact_damage(state);
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::sim::entity::{EnemyStats, Upgrades};
    use crate::tuning::Tuning;

    fn state() -> RunState {
        RunState::new(1, 1, &Upgrades::default(), Tuning::default())
    }

    fn add_enemy(state: &mut RunState, pos: Vec2) -> u32 {
        let id = state.next_entity_id();
        let stats = EnemyStats::for_wave(1, 1, &state.tuning);
        state.enemies.push(Enemy::new(id, pos, stats));
        id
    }

    fn add_projectile(state: &mut RunState, pos: Vec2, damage: f32) -> u32 {
        let id = state.next_entity_id();
        let shot = Projectile::new(id, pos, Vec2::X, damage, &state.tuning);
        state.projectiles.push(shot);
        id
    }

    #[test]
    fn test_projectile_consumed_on_non_lethal_hit() {
        let mut state = state();
        add_enemy(&mut state, Vec2::new(100.0, 100.0));
        add_projectile(&mut state, Vec2::new(100.0, 100.0), 25.0);

        assert_eq!(resolve_projectile_hits(&mut state), 0);
        assert!(state.projectiles.is_empty());
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].health, 15.0);
        assert_eq!(state.player.score, 0);
    }

    #[test]
    fn test_kill_awards_points_once() {
        let mut state = state();
        let enemy_id = add_enemy(&mut state, Vec2::new(100.0, 100.0));
        // Three lethal bullets land on the same enemy in one tick
        for _ in 0..3 {
            add_projectile(&mut state, Vec2::new(100.0, 100.0), 50.0);
        }

        assert_eq!(resolve_projectile_hits(&mut state), 1);
        assert!(state.enemies.is_empty());
        assert_eq!(state.player.score, 10);
        // Only the killing bullet is spent
        assert_eq!(state.projectiles.len(), 2);

        let kills: Vec<_> = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::EnemyKilled { .. }))
            .collect();
        assert_eq!(kills.len(), 1);
        assert!(matches!(kills[0], GameEvent::EnemyKilled { enemy_id: id, points: 10, .. } if *id == enemy_id));
    }

    #[test]
    fn test_combined_hits_kill_exactly_once() {
        let mut state = state();
        add_enemy(&mut state, Vec2::new(100.0, 100.0));
        // 25 + 25 kills a 40 hp enemy; the third bullet flies on
        for _ in 0..3 {
            add_projectile(&mut state, Vec2::new(105.0, 95.0), 25.0);
        }
        assert_eq!(resolve_projectile_hits(&mut state), 1);
        assert_eq!(state.player.score, 10);
        assert_eq!(state.projectiles.len(), 1);
    }

    #[test]
    fn test_bullet_hits_only_one_enemy() {
        let mut state = state();
        add_enemy(&mut state, Vec2::new(100.0, 100.0));
        add_enemy(&mut state, Vec2::new(110.0, 100.0));
        add_projectile(&mut state, Vec2::new(105.0, 100.0), 100.0);

        assert_eq!(resolve_projectile_hits(&mut state), 1);
        assert_eq!(state.enemies.len(), 1);
    }

    #[test]
    fn test_contact_damage_respects_cooldown() {
        let mut state = state();
        let pos = state.player.pos;
        add_enemy(&mut state, pos);

        assert!(!resolve_contact_damage(&mut state));
        assert_eq!(state.player.health, 90);

        // Same instant: still cooling down
        resolve_contact_damage(&mut state);
        assert_eq!(state.player.health, 90);

        state.clock += state.tuning.attack_cooldown;
        resolve_contact_damage(&mut state);
        assert_eq!(state.player.health, 80);
    }

    #[test]
    fn test_contact_hit_scenario() {
        let mut state = state();
        let pos = state.player.pos;
        add_enemy(&mut state, pos);
        state.enemies[0].contact_damage = 12.0;

        resolve_contact_damage(&mut state);
        assert_eq!(state.player.health, 88);
        assert!(!state.events.iter().any(|e| matches!(e, GameEvent::RunOver { .. })));
    }

    #[test]
    fn test_lethal_contact_emits_single_run_over() {
        let mut state = state();
        let pos = state.player.pos;
        add_enemy(&mut state, pos);
        add_enemy(&mut state, pos + Vec2::new(5.0, 0.0));
        for enemy in &mut state.enemies {
            enemy.contact_damage = 12.0;
        }
        state.player.health = 5;

        assert!(resolve_contact_damage(&mut state));
        assert_eq!(state.player.health, 0);
        assert!(state.player.is_dead());

        state.clock += 1.0;
        assert!(!resolve_contact_damage(&mut state));

        let run_overs = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::RunOver { .. }))
            .count();
        assert_eq!(run_overs, 1);
    }

    #[test]
    fn test_far_enemy_deals_no_damage() {
        let mut state = state();
        add_enemy(&mut state, Vec2::new(0.0, 0.0));
        resolve(&mut state);
        assert_eq!(state.player.health, 100);
    }
}
