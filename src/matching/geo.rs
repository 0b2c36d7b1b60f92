use crate::entities::Coordinates;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometres (spherical law of cosines).
///
/// The cosine term is clamped to [-1, 1]: for identical or antipodal points
/// rounding can push it just outside the domain of `acos`, which would
/// otherwise yield NaN.
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    if a == b {
        return 0.0;
    }

    let (lat1, lng1) = (a.lat.to_radians(), a.lng.to_radians());
    let (lat2, lng2) = (b.lat.to_radians(), b.lng.to_radians());

    let cos_angle = lat1.cos() * lat2.cos() * (lng2 - lng1).cos() + lat1.sin() * lat2.sin();

    EARTH_RADIUS_KM * cos_angle.clamp(-1.0, 1.0).acos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn random_point(rng: &mut impl Rng) -> Coordinates {
        Coordinates::new(rng.gen_range(-90.0..=90.0), rng.gen_range(-180.0..=180.0))
    }

    #[test]
    fn identical_points_are_zero_apart() {
        let mut rng = rand::thread_rng();

        for _ in 0..1_000 {
            let p = random_point(&mut rng);
            assert_eq!(distance_km(p, p), 0.0, "{:?}", p);
        }
    }

    #[test]
    fn distance_is_symmetric() {
        let mut rng = rand::thread_rng();

        for _ in 0..1_000 {
            let a = random_point(&mut rng);
            let b = random_point(&mut rng);
            let (ab, ba) = (distance_km(a, b), distance_km(b, a));

            assert!((ab - ba).abs() < 1e-9, "{:?} {:?}: {} vs {}", a, b, ab, ba);
        }
    }

    #[test]
    fn antipodal_points_are_half_a_circumference_apart() {
        let d = distance_km(Coordinates::new(0.0, 0.0), Coordinates::new(0.0, 180.0));
        assert!(d.is_finite());
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);

        let d = distance_km(Coordinates::new(90.0, 0.0), Coordinates::new(-90.0, 0.0));
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn five_hundredths_of_a_degree_on_the_equator() {
        let d = distance_km(Coordinates::new(0.0, 0.0), Coordinates::new(0.0, 0.05));
        assert!((d - 5.56).abs() < 0.01, "{}", d);
    }
}
