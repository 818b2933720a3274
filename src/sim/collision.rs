//! Overlap detection between tagged entities
//!
//! Every entity is an axis-aligned square hitbox centred on its position.
//! This module only answers "do these overlap"; what an overlap *means* is
//! decided in [`super::combat`].

use glam::Vec2;

use super::entity::{Enemy, Player, Projectile};
use crate::tuning::Tuning;

/// Axis-aligned box given by centre and half-extent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub center: Vec2,
    pub half_extent: f32,
}

impl Hitbox {
    pub fn new(center: Vec2, half_extent: f32) -> Self {
        Self {
            center,
            half_extent,
        }
    }

    /// Boxes that only touch along an edge do not count as overlapping
    #[inline]
    pub fn overlaps(&self, other: &Hitbox) -> bool {
        let reach = self.half_extent + other.half_extent;
        let delta = (self.center - other.center).abs();
        delta.x < reach && delta.y < reach
    }
}

pub fn player_hitbox(player: &Player, tuning: &Tuning) -> Hitbox {
    Hitbox::new(player.pos, tuning.player_half_extent)
}

pub fn enemy_hitbox(enemy: &Enemy, tuning: &Tuning) -> Hitbox {
    Hitbox::new(enemy.pos, tuning.enemy_half_extent)
}

pub fn projectile_hitbox(projectile: &Projectile, tuning: &Tuning) -> Hitbox {
    Hitbox::new(projectile.pos, tuning.projectile_half_extent)
}

/// All (projectile index, enemy index) pairs that overlap this tick, in
/// projectile order then enemy order
pub fn projectile_enemy_contacts(
    projectiles: &[Projectile],
    enemies: &[Enemy],
    tuning: &Tuning,
) -> Vec<(usize, usize)> {
    let mut contacts = Vec::new();
    for (p_idx, projectile) in projectiles.iter().enumerate() {
        let shot = projectile_hitbox(projectile, tuning);
        for (e_idx, enemy) in enemies.iter().enumerate() {
            if shot.overlaps(&enemy_hitbox(enemy, tuning)) {
                contacts.push((p_idx, e_idx));
            }
        }
    }
    contacts
}

/// Indices of enemies overlapping the player
pub fn enemies_touching_player(player: &Player, enemies: &[Enemy], tuning: &Tuning) -> Vec<usize> {
    let body = player_hitbox(player, tuning);
    enemies
        .iter()
        .enumerate()
        .filter(|(_, enemy)| body.overlaps(&enemy_hitbox(enemy, tuning)))
        .map(|(idx, _)| idx)
        .collect()
}
