//!
//! This module defines a number of transformations that can be applied to geometrical objects like
//! meshes.
//!

pub trait Scale<T: Clone> {
    /// Scale the given object in 3D by a given vector of scale factors.
    /// `s = [1.0; 3]` corresponds to a noop.
    fn scale(&mut self, s: [T; 3]);
    /// Uniformly scale the given object by the given factor in all dimensions.
    fn uniform_scale(&mut self, s: T) {
        self.scale([s.clone(), s.clone(), s]);
    }
}

pub trait Translate<T> {
    /// Translate the object by the given translation vector (displacement) `t`.
    fn translate(&mut self, t: [T; 3]);
}

/*
 * Functional variants of the above traits and their blanket implementations.
 */

pub trait Scaled<T>
where
    Self: Sized,
{
    /// Return a scaled version of `self`.
    fn scaled(self, s: [T; 3]) -> Self;
    /// Return a uniformly scaled version of `self`.
    fn uniformly_scaled(self, s: T) -> Self;
}

pub trait Translated<T>
where
    Self: Sized,
{
    /// Return a version of `self` translated by the given translation vector `t`.
    fn translated(self, t: [T; 3]) -> Self;
}

impl<S, T: Copy> Scaled<T> for S
where
    S: Scale<T> + Sized,
{
    fn scaled(mut self, s: [T; 3]) -> Self {
        self.scale(s);
        self
    }
    fn uniformly_scaled(mut self, s: T) -> Self {
        self.uniform_scale(s);
        self
    }
}

impl<S, T> Translated<T> for S
where
    S: Translate<T> + Sized,
{
    fn translated(mut self, t: [T; 3]) -> Self {
        self.translate(t);
        self
    }
}
