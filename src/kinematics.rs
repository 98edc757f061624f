use glam::Vec3;

use crate::game::Player;

/// Semi-implicit Euler step: position advances with the current velocity,
/// then gravity is applied. Does nothing unless the player is airborne.
/// Position is never clamped; a missed jump simply keeps falling.
pub fn integrate(player: &mut Player, gravity: f32, dt: f32) {
    if !player.falling {
        return;
    }
    player.position += player.velocity * dt;
    player.velocity -= Vec3::Y * gravity * dt;
    log::trace!(
        "integrate: dt={} pos={:?} vel={:?}",
        dt,
        player.position,
        player.velocity
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Lane;
    use approx::assert_relative_eq;

    fn airborne(velocity: Vec3) -> Player {
        let mut p = Player::standing_at(Vec3::new(0.0, 1.0, 0.0), Lane::X);
        p.velocity = velocity;
        p.falling = true;
        p
    }

    #[test]
    fn position_uses_velocity_before_gravity() {
        let mut p = airborne(Vec3::new(1.0, 2.0, 0.0));
        integrate(&mut p, 1.0, 0.5);
        assert_relative_eq!(p.position.x, 0.5);
        assert_relative_eq!(p.position.y, 2.0);
        assert_relative_eq!(p.velocity.y, 1.5);
        assert_relative_eq!(p.velocity.x, 1.0);
    }

    #[test]
    fn vertical_velocity_strictly_decreases() {
        let mut p = airborne(Vec3::new(0.0, 4.0, -4.0));
        let mut last = p.velocity.y;
        for _ in 0..50 {
            integrate(&mut p, 0.8, 0.16);
            assert!(p.velocity.y < last);
            last = p.velocity.y;
        }
    }

    #[test]
    fn zero_delta_is_a_no_op() {
        let mut p = airborne(Vec3::new(1.0, 1.0, 0.0));
        let before = (p.position, p.velocity);
        integrate(&mut p, 0.8, 0.0);
        assert_eq!((p.position, p.velocity), before);
    }

    #[test]
    fn standing_player_does_not_move() {
        let mut p = Player::standing_at(Vec3::new(3.0, 1.0, 0.0), Lane::X);
        integrate(&mut p, 0.8, 1.0);
        assert_eq!(p.position, Vec3::new(3.0, 1.0, 0.0));
        assert_eq!(p.velocity, Vec3::ZERO);
    }
}
