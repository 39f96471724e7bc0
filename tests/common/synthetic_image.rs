use ndarray::Array2;

/// Deterministic noise image from a linear congruential generator.
pub fn noise_u8(rows: usize, cols: usize, seed: u64) -> Array2<u8> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    Array2::from_shape_fn((rows, cols), |_| {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 56) as u8
    })
}

/// Smooth horizontal ramp with a little noise, so regions drift.
pub fn ramp_u8(rows: usize, cols: usize, step: u8) -> Array2<u8> {
    let noise = noise_u8(rows, cols, 7);
    Array2::from_shape_fn((rows, cols), |(r, c)| {
        let base = (c as u32 * step as u32) % 200;
        (base + (noise[[r, c]] % 4) as u32) as u8
    })
}

/// Checkerboard of `cell`-sized blocks with values 32 and 220.
pub fn checkerboard_u8(rows: usize, cols: usize, cell: usize) -> Array2<u8> {
    assert!(cell > 0, "cell size must be positive");
    Array2::from_shape_fn((rows, cols), |(r, c)| {
        if ((r / cell) + (c / cell)) % 2 == 0 {
            32
        } else {
            220
        }
    })
}
