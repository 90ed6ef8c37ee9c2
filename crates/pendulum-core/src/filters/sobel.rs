use ndarray::Array2;

/// 3x3 Sobel derivatives `(gx, gy)` with replicated borders.
/// `gx` grows to the right, `gy` grows downward.
pub fn sobel(data: &Array2<f32>) -> (Array2<f32>, Array2<f32>) {
    let (h, w) = data.dim();
    let mut gx = Array2::<f32>::zeros((h, w));
    let mut gy = Array2::<f32>::zeros((h, w));
    if h == 0 || w == 0 {
        return (gx, gy);
    }

    let at = |r: isize, c: isize| -> f32 {
        let r = r.clamp(0, h as isize - 1) as usize;
        let c = c.clamp(0, w as isize - 1) as usize;
        data[[r, c]]
    };

    for row in 0..h as isize {
        for col in 0..w as isize {
            let p00 = at(row - 1, col - 1);
            let p01 = at(row - 1, col);
            let p02 = at(row - 1, col + 1);
            let p10 = at(row, col - 1);
            let p12 = at(row, col + 1);
            let p20 = at(row + 1, col - 1);
            let p21 = at(row + 1, col);
            let p22 = at(row + 1, col + 1);

            gx[[row as usize, col as usize]] = -p00 + p02 - 2.0 * p10 + 2.0 * p12 - p20 + p22;
            gy[[row as usize, col as usize]] = -p00 - 2.0 * p01 - p02 + p20 + 2.0 * p21 + p22;
        }
    }

    (gx, gy)
}
