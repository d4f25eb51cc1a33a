#![allow(dead_code)]

use segment_crossings::{intersections, Segment};

pub fn count_bo(segments: &[Segment<f64>]) -> usize {
    intersections(segments.iter().copied()).unwrap().len()
}

pub fn count_brute(segments: &[Segment<f64>]) -> usize {
    let mut count = 0;
    let n = segments.len();
    for i in 0..n {
        for j in i + 1..n {
            if segments[i].intersection_with(&segments[j]).is_some() {
                count += 1;
            }
        }
    }
    count
}
