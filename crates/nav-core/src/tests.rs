//! Unit tests for nav-core.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::{normalize_angle, LaneFollowDirection, LaneletId, Point2, Pose, Quaternion};

// ── Angles ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod angles {
    use super::*;

    #[test]
    fn already_normalized_unchanged() {
        assert_eq!(normalize_angle(0.0), 0.0);
        assert_eq!(normalize_angle(1.0), 1.0);
        assert_eq!(normalize_angle(-1.0), -1.0);
        assert_eq!(normalize_angle(PI), PI);
    }

    #[test]
    fn wraps_past_pi() {
        assert!((normalize_angle(PI + 0.5) - (-PI + 0.5)).abs() < 1e-12);
        assert!((normalize_angle(-PI - 0.5) - (PI - 0.5)).abs() < 1e-12);
        assert!((normalize_angle(3.0 * PI) - PI).abs() < 1e-12);
    }

    #[test]
    fn negative_pi_maps_to_positive_pi() {
        // Range is (-π, π]: exactly -π wraps to +π.
        assert!((normalize_angle(-PI) - PI).abs() < 1e-12);
    }
}

// ── Quaternion / yaw ──────────────────────────────────────────────────────────

#[cfg(test)]
mod quaternion {
    use super::*;

    #[test]
    fn identity_yaw_zero() {
        assert_eq!(Quaternion::IDENTITY.yaw(), 0.0);
        assert_eq!(Quaternion::default().yaw(), 0.0);
    }

    #[test]
    fn from_yaw_round_trip() {
        for &yaw in &[0.0, 0.3, FRAC_PI_2, -FRAC_PI_2, 3.0, -3.0] {
            let q = Quaternion::from_yaw(yaw);
            assert!((q.yaw() - yaw).abs() < 1e-12, "yaw {yaw} round-trip");
        }
    }

    #[test]
    fn quarter_turn_components() {
        let q = Quaternion::from_yaw(FRAC_PI_2);
        assert!((q.z - (FRAC_PI_2 / 2.0).sin()).abs() < 1e-12);
        assert!((q.w - (FRAC_PI_2 / 2.0).cos()).abs() < 1e-12);
        assert_eq!(q.x, 0.0);
        assert_eq!(q.y, 0.0);
    }
}

// ── Pose ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod pose {
    use super::*;

    #[test]
    fn planar_distance_ignores_z() {
        let a = Pose::new(0.0, 0.0, 5.0, Quaternion::IDENTITY);
        let b = Pose::new(3.0, 4.0, -2.0, Quaternion::IDENTITY);
        assert!((a.planar_distance(&b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn yaw_difference_normalized() {
        let a = Pose::planar(0.0, 0.0, 3.0);
        let b = Pose::planar(0.0, 0.0, -3.0);
        // -3.0 - 3.0 = -6.0 → wraps to ~0.283.
        let d = a.yaw_difference(&b);
        assert!((d - (2.0 * PI - 6.0)).abs() < 1e-12);
    }

    #[test]
    fn heading_frame_ahead_is_longitudinal() {
        let p = Pose::planar(1.0, 1.0, 0.0);
        let (lon, lat) = p.heading_frame_offset(Point2::new(5.0, 1.0));
        assert!((lon - 4.0).abs() < 1e-12);
        assert!(lat.abs() < 1e-12);
    }

    #[test]
    fn heading_frame_left_is_positive_lateral() {
        let p = Pose::planar(0.0, 0.0, 0.0);
        let (lon, lat) = p.heading_frame_offset(Point2::new(0.0, 2.0));
        assert!(lon.abs() < 1e-12);
        assert!((lat - 2.0).abs() < 1e-12);
    }

    #[test]
    fn heading_frame_rotates_with_yaw() {
        // Facing +y: a point ahead on +y is longitudinal, +x is to the right.
        let p = Pose::planar(0.0, 0.0, FRAC_PI_2);
        let (lon, lat) = p.heading_frame_offset(Point2::new(0.0, 3.0));
        assert!((lon - 3.0).abs() < 1e-12);
        assert!(lat.abs() < 1e-12);

        let (lon, lat) = p.heading_frame_offset(Point2::new(1.0, 0.0));
        assert!(lon.abs() < 1e-12);
        assert!((lat - (-1.0)).abs() < 1e-12);
    }
}

// ── Ids & direction codes ─────────────────────────────────────────────────────

#[cfg(test)]
mod ids_and_codes {
    use super::*;

    #[test]
    fn invalid_sentinel() {
        assert_eq!(LaneletId::default(), LaneletId::INVALID);
        assert_eq!(LaneletId::INVALID.0, u32::MAX);
        assert_eq!(LaneletId(7).index(), 7);
    }

    #[test]
    fn direction_codes_are_stable() {
        assert_eq!(LaneFollowDirection::Straight.code(), 0);
        assert_eq!(LaneFollowDirection::TurnLeft.code(), 1);
        assert_eq!(LaneFollowDirection::TurnRight.code(), 2);
        assert_eq!(LaneFollowDirection::default(), LaneFollowDirection::Straight);
    }

    #[test]
    fn direction_labels() {
        assert_eq!(LaneFollowDirection::TurnLeft.to_string(), "turn_left");
    }
}
