#[inline]
pub(crate) fn squared_euclidean(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

#[inline]
pub(crate) fn euclidean(a: &[f32], b: &[f32]) -> f32 {
    squared_euclidean(a, b).sqrt()
}

#[inline]
pub(crate) fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Divide every component by the vector's L2 norm. Zero vectors are left as-is.
pub(crate) fn normalize_in_place(v: &mut [f32]) {
    let norm = l2_norm(v);
    if norm > 0.0 {
        for x in v {
            *x /= norm;
        }
    }
}

/// Element-wise mean of `rows`, accumulated in f64.
///
/// `rows` must yield at least one row of length `dim`.
pub(crate) fn mean_of<'a>(rows: impl Iterator<Item = &'a [f32]>, dim: usize) -> Vec<f32> {
    let mut sum = vec![0.0f64; dim];
    let mut n = 0usize;
    for row in rows {
        debug_assert_eq!(row.len(), dim);
        for (s, &x) in sum.iter_mut().zip(row) {
            *s += f64::from(x);
        }
        n += 1;
    }
    debug_assert!(n > 0);
    let n = n as f64;
    sum.into_iter().map(|s| (s / n) as f32).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn euclidean_3_4_5() {
        assert_eq!(euclidean(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
        assert_eq!(squared_euclidean(&[1.0, 1.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn normalize_leaves_zero_vector() {
        let mut z = vec![0.0, 0.0];
        normalize_in_place(&mut z);
        assert_eq!(z, vec![0.0, 0.0]);

        let mut v = vec![0.0, 2.0];
        normalize_in_place(&mut v);
        assert_eq!(v, vec![0.0, 1.0]);
    }

    #[test]
    fn mean_of_rows() {
        let rows: [&[f32]; 2] = [&[1.0, 4.0], &[3.0, 0.0]];
        assert_eq!(mean_of(rows.into_iter(), 2), vec![2.0, 2.0]);
    }
}
