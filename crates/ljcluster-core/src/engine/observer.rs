use nalgebra::Point3;

/// Receives every particle position written by the integrator.
///
/// This is the binding point for renderers and trajectory recorders; the physics
/// core never holds a reference to any display object.
pub trait PositionObserver {
    fn on_position_changed(&self, index: usize, position: &Point3<f64>);
}

/// An observer that ignores all updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl PositionObserver for NullObserver {
    #[inline]
    fn on_position_changed(&self, _index: usize, _position: &Point3<f64>) {}
}

/// Adapts a closure into a [`PositionObserver`].
pub struct FnObserver<F>(pub F);

impl<F> PositionObserver for FnObserver<F>
where
    F: Fn(usize, &Point3<f64>),
{
    #[inline]
    fn on_position_changed(&self, index: usize, position: &Point3<f64>) {
        (self.0)(index, position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn fn_observer_forwards_every_update() {
        let seen = RefCell::new(Vec::new());
        let observer = FnObserver(|index: usize, position: &Point3<f64>| {
            seen.borrow_mut().push((index, *position));
        });

        observer.on_position_changed(0, &Point3::new(1.0, 2.0, 3.0));
        observer.on_position_changed(4, &Point3::origin());

        assert_eq!(
            seen.into_inner(),
            vec![(0, Point3::new(1.0, 2.0, 3.0)), (4, Point3::origin())]
        );
    }

    #[test]
    fn null_observer_accepts_updates() {
        NullObserver.on_position_changed(0, &Point3::origin());
    }
}
