#![no_main]
use libfuzzer_sys::fuzz_target;
use ndarray::Array3;
use regcost::global::global_score;
use regcost::Metric;

fuzz_target!(|data: &[u8]| {
    let values: Vec<f64> = data
        .chunks_exact(8)
        .map(|c| {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(c);
            f64::from_le_bytes(raw)
        })
        .collect();
    let half = values.len() / 2;
    if half == 0 {
        return;
    }
    let reference = Array3::from_shape_vec((1, 1, half), values[..half].to_vec()).unwrap();
    let moving = Array3::from_shape_vec((1, 1, half), values[half..2 * half].to_vec()).unwrap();
    for &metric in Metric::ALL.iter() {
        let _ = global_score(reference.view(), moving.view(), metric, 16);
    }
});
