//! One-way platform contact rules.
//!
//! Platforms are solid from above and passable from below.  Platform colliders
//! carry both `FILTER_CONTACT_PAIRS` and `MODIFY_SOLVER_CONTACTS`, and Rapier asks
//! [`OneWayPlatformHooks`] about every pair involving one:
//!
//! 1. `filter_contact_pair` drops the pair while the body is clearly rising
//!    ([`one_way_response_with_slack`]).  The slack absorbs the small upward
//!    velocity Rapier uses to push a resting body out of penetration.  CCD
//!    consults this filter too.
//! 2. `modify_solver_contacts` applies Rapier's one-way platform rule: only
//!    contacts whose normal leaves the platform's top face are kept, and a pair
//!    that started from below stays passable until it separates or the normal
//!    turns upward.

use crate::level::Platform;
use crate::player::state::Player;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use bevy_rapier2d::rapier::math::{Real, Vector};

/// Upward speed below which a contact is left to the top-face rule.
pub const ONE_WAY_RISE_SLACK: f32 = 60.0;

/// Angle (radians) a contact normal may deviate from the platform's up axis.
pub const ONE_WAY_ALLOWED_ANGLE: Real = 0.1;

/// What the filter knows about one side of a contact pair.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BodyView {
    pub is_player: bool,
    pub velocity: Option<Vec2>,
}

/// Outcome of the one-way predicate for a single pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactResponse {
    Collide,
    PassThrough,
}

/// Velocity of the moving body in a pair.
///
/// Identity wins: a body tagged as the player is used even when the other side
/// also has a velocity.  Without a tagged player, the first body exposing a
/// velocity is used.  `None` when neither side is resolvable.
pub fn resolve_player_velocity(a: BodyView, b: BodyView) -> Option<Vec2> {
    match (a.is_player, b.is_player) {
        (true, _) if a.velocity.is_some() => a.velocity,
        (_, true) if b.velocity.is_some() => b.velocity,
        _ => a.velocity.or(b.velocity),
    }
}

/// Rising bodies pass through; everything else collides.
pub fn one_way_response(a: BodyView, b: BodyView) -> ContactResponse {
    one_way_response_with_slack(a, b, 0.0)
}

/// [`one_way_response`] with rising speeds up to `slack` treated as resting.
pub fn one_way_response_with_slack(a: BodyView, b: BodyView, slack: f32) -> ContactResponse {
    match resolve_player_velocity(a, b) {
        Some(v) if v.y > slack => ContactResponse::PassThrough,
        _ => ContactResponse::Collide,
    }
}

/// Platform's outward up axis in collider 1's local frame, or `None` when
/// neither side is a platform.
pub fn allowed_local_normal(first_is_platform: bool, second_is_platform: bool) -> Option<Vec2> {
    if first_is_platform {
        Some(Vec2::Y)
    } else if second_is_platform {
        Some(Vec2::NEG_Y)
    } else {
        None
    }
}

/// Physics hook registered on `RapierPhysicsPlugin`.
#[derive(SystemParam)]
pub struct OneWayPlatformHooks<'w, 's> {
    players: Query<'w, 's, (), With<Player>>,
    platforms: Query<'w, 's, (), With<Platform>>,
    velocities: Query<'w, 's, &'static Velocity>,
}

impl OneWayPlatformHooks<'_, '_> {
    fn view(&self, entity: Entity) -> BodyView {
        BodyView {
            is_player: self.players.contains(entity),
            velocity: self.velocities.get(entity).ok().map(|v| v.linvel),
        }
    }
}

impl BevyPhysicsHooks for OneWayPlatformHooks<'_, '_> {
    fn filter_contact_pair(&self, context: PairFilterContextView) -> Option<SolverFlags> {
        let (e1, e2) = (context.collider1(), context.collider2());
        match one_way_response_with_slack(self.view(e1), self.view(e2), ONE_WAY_RISE_SLACK) {
            ContactResponse::PassThrough => None,
            ContactResponse::Collide => Some(SolverFlags::COMPUTE_IMPULSES),
        }
    }

    fn modify_solver_contacts(&self, mut context: ContactModificationContextView) {
        let (e1, e2) = (context.collider1(), context.collider2());
        let Some(up) =
            allowed_local_normal(self.platforms.contains(e1), self.platforms.contains(e2))
        else {
            return;
        };
        let allowed: Vector<Real> = Vector::new(up.x, up.y);
        context
            .raw
            .update_as_oneway_platform(&allowed, ONE_WAY_ALLOWED_ANGLE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(vy: f32) -> BodyView {
        BodyView {
            is_player: true,
            velocity: Some(Vec2::new(0.0, vy)),
        }
    }

    fn platform() -> BodyView {
        BodyView::default()
    }

    #[test]
    fn rising_player_passes_through_in_either_order() {
        assert_eq!(one_way_response(player(400.0), platform()), ContactResponse::PassThrough);
        assert_eq!(one_way_response(platform(), player(400.0)), ContactResponse::PassThrough);
    }

    #[test]
    fn falling_or_resting_player_collides_in_either_order() {
        for vy in [-300.0, 0.0] {
            assert_eq!(one_way_response(player(vy), platform()), ContactResponse::Collide);
            assert_eq!(one_way_response(platform(), player(vy)), ContactResponse::Collide);
        }
    }

    #[test]
    fn unresolved_pair_collides() {
        assert_eq!(one_way_response(platform(), platform()), ContactResponse::Collide);
    }

    #[test]
    fn tagged_player_wins_over_other_moving_body() {
        let other = BodyView {
            is_player: false,
            velocity: Some(Vec2::new(0.0, -100.0)),
        };
        assert_eq!(
            resolve_player_velocity(other, player(250.0)),
            Some(Vec2::new(0.0, 250.0))
        );
    }

    #[test]
    fn penetration_push_out_is_not_a_rise() {
        assert_eq!(
            one_way_response_with_slack(player(25.4), platform(), ONE_WAY_RISE_SLACK),
            ContactResponse::Collide
        );
        assert_eq!(
            one_way_response_with_slack(platform(), player(400.0), ONE_WAY_RISE_SLACK),
            ContactResponse::PassThrough
        );
    }

    #[test]
    fn allowed_normal_points_out_of_the_platform_top() {
        assert_eq!(allowed_local_normal(true, false), Some(Vec2::Y));
        assert_eq!(allowed_local_normal(false, true), Some(Vec2::NEG_Y));
        assert_eq!(allowed_local_normal(false, false), None);
    }

    #[test]
    fn falls_back_to_any_body_with_velocity() {
        let untagged = BodyView {
            is_player: false,
            velocity: Some(Vec2::new(0.0, 80.0)),
        };
        assert_eq!(one_way_response(platform(), untagged), ContactResponse::PassThrough);
    }
}
