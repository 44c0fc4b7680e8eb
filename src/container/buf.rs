use super::{Lenable, MaybeResizable};
use crate::expr::{impl_expr_ops, Term};
use num_traits::Float;

/// A 2-D, index-mapped view over a single contiguous storage.
///
/// `SY`/`SX` are the logical row/column counts, `ROW_MAJOR` selects the
/// major layout, and `PAD` is the minor-axis stride (`0` means "no
/// padding", otherwise it must be `>=` the corresponding logical extent).
/// The backing storage is a single `Vec<V>` of `underlying_rows *
/// underlying_cols` elements — not a fixed-size array, since the padded
/// extent is not itself expressible as a further const generic on stable
/// Rust (see `DESIGN.md`).
pub struct Buf<V, const SY: usize, const SX: usize, const ROW_MAJOR: bool, const PAD: usize> {
    data: Vec<V>,
}

impl<V, const SY: usize, const SX: usize, const ROW_MAJOR: bool, const PAD: usize>
    Buf<V, SY, SX, ROW_MAJOR, PAD>
{
    const fn underlying_cols() -> usize {
        if ROW_MAJOR {
            if PAD > SX {
                PAD
            } else {
                SX
            }
        } else {
            SX
        }
    }

    const fn underlying_rows() -> usize {
        if ROW_MAJOR {
            SY
        } else if PAD > SY {
            PAD
        } else {
            SY
        }
    }

    pub const fn size_y() -> usize {
        SY
    }

    pub const fn size_x() -> usize {
        SX
    }

    pub const fn flat_size() -> usize {
        SY * SX
    }

    pub const fn underlying_flat_size() -> usize {
        Self::underlying_rows() * Self::underlying_cols()
    }

    /// `(y, x) -> flat index` into the underlying storage.
    pub const fn flat_projection(y: usize, x: usize) -> usize {
        if ROW_MAJOR {
            y * Self::underlying_cols() + x
        } else {
            x * Self::underlying_rows() + y
        }
    }

    /// Remaps a logical flat index (row-major over `SY x SX`, padding or
    /// not) onto the underlying storage.
    const fn unproject(i: usize) -> usize {
        if PAD == 0 {
            i
        } else {
            Self::flat_projection(i / SX, i % SX)
        }
    }

    #[inline]
    fn assert_in_bounds_2d(y: usize, x: usize) {
        debug_assert!(y < SY && x < SX, "buffer index ({y}, {x}) out of bounds");
    }
}

impl<V: Copy + Default, const SY: usize, const SX: usize, const ROW_MAJOR: bool, const PAD: usize>
    Buf<V, SY, SX, ROW_MAJOR, PAD>
{
    pub fn new() -> Self {
        assert!(SY > 0 && SX > 0, "buffer extents must be non-zero");
        assert!(PAD == 0 || (if ROW_MAJOR { PAD >= SX } else { PAD >= SY }), "padding stride must be >= the corresponding extent");
        Self { data: vec![V::default(); Self::underlying_flat_size()] }
    }

    pub fn filled(value: V) -> Self {
        let mut b = Self::new();
        b.data.fill(value);
        b
    }
}

impl<V: Copy + Default, const SY: usize, const SX: usize, const ROW_MAJOR: bool, const PAD: usize>
    Default for Buf<V, SY, SX, ROW_MAJOR, PAD>
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Copy, const SY: usize, const SX: usize, const ROW_MAJOR: bool, const PAD: usize>
    core::ops::Index<(usize, usize)> for Buf<V, SY, SX, ROW_MAJOR, PAD>
{
    type Output = V;
    fn index(&self, (y, x): (usize, usize)) -> &V {
        Self::assert_in_bounds_2d(y, x);
        &self.data[Self::flat_projection(y, x)]
    }
}

impl<V: Copy, const SY: usize, const SX: usize, const ROW_MAJOR: bool, const PAD: usize>
    core::ops::IndexMut<(usize, usize)> for Buf<V, SY, SX, ROW_MAJOR, PAD>
{
    fn index_mut(&mut self, (y, x): (usize, usize)) -> &mut V {
        Self::assert_in_bounds_2d(y, x);
        &mut self.data[Self::flat_projection(y, x)]
    }
}

impl<V: Copy, const SY: usize, const SX: usize, const ROW_MAJOR: bool, const PAD: usize>
    core::ops::Index<usize> for Buf<V, SY, SX, ROW_MAJOR, PAD>
{
    type Output = V;
    fn index(&self, i: usize) -> &V {
        debug_assert!(i < SY * SX, "flat index {i} out of bounds");
        &self.data[Self::unproject(i)]
    }
}

impl<V: Copy, const SY: usize, const SX: usize, const ROW_MAJOR: bool, const PAD: usize>
    core::ops::IndexMut<usize> for Buf<V, SY, SX, ROW_MAJOR, PAD>
{
    fn index_mut(&mut self, i: usize) -> &mut V {
        debug_assert!(i < SY * SX, "flat index {i} out of bounds");
        &mut self.data[Self::unproject(i)]
    }
}

impl<V: Copy, const SY: usize, const SX: usize, const ROW_MAJOR: bool, const PAD: usize> Lenable
    for Buf<V, SY, SX, ROW_MAJOR, PAD>
{
    fn len(&self) -> usize {
        SY * SX
    }
}

impl<V: Copy, const SY: usize, const SX: usize, const ROW_MAJOR: bool, const PAD: usize>
    MaybeResizable for Buf<V, SY, SX, ROW_MAJOR, PAD>
{
}

impl<V: Copy, const SY: usize, const SX: usize, const ROW_MAJOR: bool, const PAD: usize> Term<V>
    for Buf<V, SY, SX, ROW_MAJOR, PAD>
{
    fn term_at(&self, i: usize) -> V {
        self[i]
    }

    fn term_len(&self) -> Option<usize> {
        Some(SY * SX)
    }
}

impl<V: Float, const SY: usize, const SX: usize, const ROW_MAJOR: bool, const PAD: usize>
    Buf<V, SY, SX, ROW_MAJOR, PAD>
{
    /// Writes `src[i]` into every logical flat position, in one pass over
    /// flat indices (mapped through the padding, if any).
    pub fn assign<T: Term<V>>(&mut self, src: T) {
        if let Some(n) = src.term_len() {
            debug_assert_eq!(n, SY * SX, "expression length does not match buffer size");
        }
        for i in 0..SY * SX {
            self.data[Self::unproject(i)] = src.term_at(i);
        }
    }

    fn in_place(&mut self, rhs: impl Term<V>, op: impl Fn(V, V) -> V) {
        if let Some(n) = rhs.term_len() {
            debug_assert_eq!(n, SY * SX, "operand length does not match buffer size");
        }
        for i in 0..SY * SX {
            let pos = Self::unproject(i);
            self.data[pos] = op(self.data[pos], rhs.term_at(i));
        }
    }
}

impl<V: Float, const SY: usize, const SX: usize, const ROW_MAJOR: bool, const PAD: usize, T: Term<V>>
    core::ops::AddAssign<T> for Buf<V, SY, SX, ROW_MAJOR, PAD>
{
    fn add_assign(&mut self, rhs: T) {
        self.in_place(rhs, |a, b| a + b);
    }
}

impl<V: Float, const SY: usize, const SX: usize, const ROW_MAJOR: bool, const PAD: usize, T: Term<V>>
    core::ops::SubAssign<T> for Buf<V, SY, SX, ROW_MAJOR, PAD>
{
    fn sub_assign(&mut self, rhs: T) {
        self.in_place(rhs, |a, b| a - b);
    }
}

impl_expr_ops!(
    Buf<V, SY, SX, ROW_MAJOR, PAD>,
    const SY: usize,
    const SX: usize,
    const ROW_MAJOR: bool,
    const PAD: usize
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_and_2d_accessors_agree() {
        let mut buf = Buf::<f64, 3, 4, true, 0>::new();
        for y in 0..3 {
            for x in 0..4 {
                buf[(y, x)] = (y * 10 + x) as f64;
            }
        }
        for i in 0..12 {
            let (y, x) = (i / 4, i % 4);
            assert_eq!(buf[i], buf[(y, x)]);
        }
    }

    #[test]
    fn padded_row_major_buffer_round_trips() {
        // Scenario from the design's test suite: Sy=7, Sx=5, row-major, stride 8.
        let mut buf = Buf::<f64, 7, 5, true, 8>::new();
        for y in 0..7 {
            for x in 0..5 {
                buf[(y, x)] = y as f64;
            }
        }
        for y in 0..7 {
            for x in 0..5 {
                assert_eq!(buf[(y, x)], y as f64);
            }
        }
        assert_eq!(Buf::<f64, 7, 5, true, 8>::flat_projection(3, 2), 3 * 8 + 2);
    }

    #[test]
    fn padding_never_aliases_two_distinct_cells() {
        let rows = 4;
        let cols = 3;
        let mut seen = std::collections::HashSet::new();
        for y in 0..rows {
            for x in 0..cols {
                let flat = Buf::<f64, 4, 3, true, 6>::flat_projection(y, x);
                assert!(seen.insert(flat), "padding aliased ({y}, {x}) onto an earlier cell");
            }
        }
    }

    #[test]
    fn assign_materializes_an_expression_over_flat_indices() {
        let mut a = Buf::<f64, 2, 2, true, 0>::filled(1.0);
        let b = Buf::<f64, 2, 2, true, 0>::filled(2.0);
        let mut target = Buf::<f64, 2, 2, true, 0>::new();
        target.assign(&a + &b);
        for i in 0..4 {
            assert_eq!(target[i], 3.0);
        }
        a[(0, 0)] = 9.0;
        assert_eq!(a[(0, 0)], 9.0);
    }
}
