use nalgebra::{Point3, Vector3};

/// The unweighted mean of `positions`, or the origin for an empty slice.
pub fn center_of_mass(positions: &[Point3<f64>]) -> Point3<f64> {
    if positions.is_empty() {
        return Point3::origin();
    }
    let n = positions.len() as f64;
    let sum: Vector3<f64> = positions.iter().map(|p| p.coords).sum();
    Point3::from(sum / n)
}

/// The distance of every position from `center`, in input order.
pub fn radii(positions: &[Point3<f64>], center: &Point3<f64>) -> Vec<f64> {
    positions.iter().map(|p| (p - center).norm()).collect()
}

/// Radius of gyration about the center of mass.
pub fn radius_of_gyration(positions: &[Point3<f64>]) -> Option<f64> {
    if positions.is_empty() {
        return None;
    }
    let com = center_of_mass(positions);
    let squared_sum: f64 = positions.iter().map(|p| (p - com).norm_squared()).sum();
    Some((squared_sum / positions.len() as f64).sqrt())
}
