#![no_main]
use libfuzzer_sys::fuzz_target;
use ndarray::Array3;
use regcost::{LocalSimilarity, Metric};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let voi_size = usize::from(data[0] % 4);
    let voxels = &data[1..];
    let n = voxels.len() / 2;
    let side = (n as f64).cbrt() as usize;
    if side == 0 {
        return;
    }
    let len = side * side * side;
    let to_volume = |bytes: &[u8]| {
        Array3::from_shape_fn((side, side, side), |(i, j, k)| {
            f64::from(bytes[(i * side + j) * side + k]) - 128.
        })
    };
    let reference = to_volume(&voxels[..len]);
    let moving = to_volume(&voxels[n..n + len]);
    for &metric in Metric::ALL.iter() {
        let _ = LocalSimilarity::new(metric, voi_size)
            .with_bins(usize::from(data[0]))
            .compute(reference.view(), moving.view());
    }
});
