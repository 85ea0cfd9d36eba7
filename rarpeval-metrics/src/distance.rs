//! Exact Euclidean distance transform
//!
//! Separable lower-envelope-of-parabolas algorithm (Felzenszwalb and
//! Huttenlocher): one pass over columns, one over rows, linear in the number
//! of pixels.

/// Squared Euclidean distance from every pixel to the nearest set pixel
///
/// `features` is a row-major `width * height` image. Pixels of an image without
/// any set pixel are at infinite distance.
pub fn squared_distance_to(features: &[bool], width: usize, height: usize) -> Vec<f64> {
    debug_assert_eq!(features.len(), width * height);

    let mut grid: Vec<f64> = features
        .iter()
        .map(|&set| if set { 0.0 } else { f64::INFINITY })
        .collect();

    let mut line = vec![0.0; width.max(height)];
    let mut out = vec![0.0; width.max(height)];

    for x in 0..width {
        for y in 0..height {
            line[y] = grid[y * width + x];
        }
        transform_line(&line[..height], &mut out[..height]);
        for y in 0..height {
            grid[y * width + x] = out[y];
        }
    }

    for y in 0..height {
        let row = &mut grid[y * width..(y + 1) * width];
        line[..width].copy_from_slice(row);
        transform_line(&line[..width], &mut out[..width]);
        row.copy_from_slice(&out[..width]);
    }

    grid
}

/// One-dimensional squared distance transform of the sampled function `f`
fn transform_line(f: &[f64], out: &mut [f64]) {
    // vertices[i] is the apex of the i-th envelope parabola, starts[i] where it takes over
    let mut vertices: Vec<usize> = Vec::with_capacity(f.len());
    let mut starts: Vec<f64> = Vec::with_capacity(f.len());

    for (q, &fq) in f.iter().enumerate() {
        if !fq.is_finite() {
            continue;
        }
        while let Some(&p) = vertices.last() {
            let s = intersection(f, p, q);
            if starts.last().is_some_and(|&start| s <= start) {
                vertices.pop();
                starts.pop();
            } else {
                vertices.push(q);
                starts.push(s);
                break;
            }
        }
        if vertices.is_empty() {
            vertices.push(q);
            starts.push(f64::NEG_INFINITY);
        }
    }

    if vertices.is_empty() {
        out.fill(f64::INFINITY);
        return;
    }

    let mut k = 0;
    for (q, slot) in out.iter_mut().enumerate() {
        while k + 1 < vertices.len() && starts[k + 1] < q as f64 {
            k += 1;
        }
        let p = vertices[k];
        let offset = q as f64 - p as f64;
        *slot = offset * offset + f[p];
    }
}

/// Abscissa where the parabolas rooted at `p` and `q` (p < q) intersect
fn intersection(f: &[f64], p: usize, q: usize) -> f64 {
    let (pf, qf) = (p as f64, q as f64);
    ((f[q] + qf * qf) - (f[p] + pf * pf)) / (2.0 * (qf - pf))
}
