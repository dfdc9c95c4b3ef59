//! Lifecycle and query-contract tests driving the engine hooks directly,
//! without the streaming driver.

mod util;

use std::thread;

use label_stats::{LabelStatisticsEngine, Phase, Region, StatsConfig};
use util::{assert_close, assert_slice_close};

const A: u32 = 1;
const B: u32 = 2;
const Z: u32 = 26;

#[test]
fn two_labels_single_partition() {
    let mut e = LabelStatisticsEngine::<f32, u32, 1>::default();
    e.begin(1);
    for (i, v) in [1.0f32, 2.0, 3.0].into_iter().enumerate() {
        e.process_element(0, A, v, &[i as i64]).unwrap();
    }
    e.process_element(0, B, 10.0, &[3]).unwrap();
    e.end();

    assert_eq!(e.count(&A), 3);
    assert_eq!(e.sum(&A), 6.0);
    assert_eq!(e.mean(&A), 2.0);
    assert_eq!(e.minimum(&A), 1.0);
    assert_eq!(e.maximum(&A), 3.0);
    assert_eq!(e.variance(&A), 1.0);
    assert_eq!(e.sigma(&A), 1.0);

    assert_eq!(e.count(&B), 1);
    assert_eq!(e.sum(&B), 10.0);
    assert_eq!(e.mean(&B), 10.0);
    assert_eq!(e.variance(&B), 0.0);
    assert_eq!(e.valid_labels(), &[A, B]);
}

#[test]
fn two_partitions_match_single_partition() {
    let mut single = LabelStatisticsEngine::<f32, u32, 1>::default();
    single.begin(1);
    let mut split = LabelStatisticsEngine::<f32, u32, 1>::default();
    split.begin(2);

    let data = [(A, 1.0f32, 0i64), (A, 2.0, 1), (A, 3.0, 2), (B, 10.0, 3)];
    for (i, &(label, v, p)) in data.iter().enumerate() {
        single.process_element(0, label, v, &[p]).unwrap();
        // {1, 2} on worker 0, {3} and B on worker 1
        let w = usize::from(i >= 2);
        split.process_element(w, label, v, &[p]).unwrap();
    }
    single.end();
    split.end();

    for label in [A, B] {
        assert_eq!(single.statistics(&label), split.statistics(&label));
    }
}

#[test]
fn passes_accumulate_without_reset() {
    let mut e = LabelStatisticsEngine::<u8, u32, 2>::default();
    e.begin(2);
    // pass 1
    e.process_element(0, A, 4, &[0, 0]).unwrap();
    e.process_element(1, A, 6, &[1, 0]).unwrap();
    // pass 2, same worker slots
    e.process_element(0, A, 8, &[0, 1]).unwrap();
    e.process_element(1, A, 2, &[1, 1]).unwrap();
    e.end();

    assert_eq!(e.count(&A), 4);
    assert_eq!(e.sum(&A), 20.0);
    assert_eq!(e.bounding_box(&A), vec![0, 1, 0, 1]);
    assert_eq!(e.region(&A), Region::new([0, 0], [2, 2]));
    assert_close(e.variance(&A), 20.0 / 3.0, 1e-12);
}

#[test]
fn unknown_label_reports_defaults() {
    let mut e = LabelStatisticsEngine::<u16, u32, 3>::new(StatsConfig::with_histogram(8, 0.0, 8.0).unwrap());
    e.begin(1);
    e.process_element(0, A, 3, &[1, 2, 3]).unwrap();
    e.end();

    assert_eq!(e.count(&Z), 0);
    assert_eq!(e.mean(&Z), 0.0);
    assert_eq!(e.minimum(&Z), u16::MAX as f64);
    assert_eq!(e.maximum(&Z), 0.0);
    assert!(e.bounding_box(&Z).is_empty());
    assert_eq!(e.region(&Z), Region::empty());
    assert!(e.histogram(&Z).is_none());
    assert_eq!(e.median(&Z), 0.0);
    assert!(e.statistics(&Z).is_none());
}

#[test]
fn median_is_midpoint_of_single_occupied_bin() {
    let mut e = LabelStatisticsEngine::<f64, u32, 1>::new(StatsConfig::with_histogram(10, -5.0, 5.0).unwrap());
    e.begin(3);
    for (i, v) in [2.1, 2.9, 2.5, 2.0, 2.75].into_iter().enumerate() {
        e.process_element(i % 3, A, v, &[i as i64]).unwrap();
    }
    e.end();
    assert_eq!(e.median(&A), 2.5);
}

#[test]
fn median_is_zero_without_histograms() {
    let mut e = LabelStatisticsEngine::<f64, u32, 1>::default();
    e.begin(1);
    e.process_element(0, A, 42.0, &[0]).unwrap();
    e.end();
    assert_eq!(e.median(&A), 0.0);
    assert!(e.histogram(&A).is_none());
}

#[test]
fn median_walks_cumulative_frequencies() {
    let mut e = LabelStatisticsEngine::<u8, u32, 1>::new(StatsConfig::with_histogram(4, 0.0, 40.0).unwrap());
    e.begin(1);
    // bins: [0,10) x2, [10,20) x1, [30,40) x3 -> cumulative 2, 3 (= 6/2), 3, 6
    for (i, v) in [1u8, 5, 15, 31, 35, 39].into_iter().enumerate() {
        e.process_element(0, A, v, &[i as i64]).unwrap();
    }
    e.end();
    assert_eq!(e.median(&A), 35.0);
    let h = e.histogram(&A).unwrap();
    let freqs: Vec<f64> = h.frequencies().iter().map(|&f| f as f64).collect();
    assert_slice_close(&freqs, &[2.0, 1.0, 0.0, 3.0], 0.0);
}

#[test]
fn scoped_threads_own_disjoint_tables() {
    let values: Vec<u32> = (0..4000).collect();
    let mut e = LabelStatisticsEngine::<u32, u32, 1>::default();
    e.begin(4);
    {
        let tables = e.worker_tables_mut();
        let chunk = values.len() / tables.len();
        thread::scope(|s| {
            for (w, table) in tables.iter_mut().enumerate() {
                let part = &values[w * chunk..(w + 1) * chunk];
                let base = w * chunk;
                s.spawn(move || {
                    for (i, &v) in part.iter().enumerate() {
                        table.update(v % 3, v as f64, &[(base + i) as i64]);
                    }
                });
            }
        });
    }
    e.end();

    assert_eq!(e.phase(), Phase::Finalized);
    assert_eq!(e.valid_labels(), &[0, 1, 2]);
    let total: u64 = e.valid_labels().iter().map(|l| e.count(l)).sum();
    assert_eq!(total, 4000);
    assert_eq!(e.minimum(&0), 0.0);
    assert_eq!(e.maximum(&0), 3999.0);
    assert_eq!(e.bounding_box(&2), vec![2, 3998]);
    assert_close(e.sum(&1), (0..4000u64).filter(|v| v % 3 == 1).sum::<u64>() as f64, 0.0);
}

#[test]
fn begin_discards_previous_run() {
    let mut e = LabelStatisticsEngine::<u8, u32, 1>::default();
    e.begin(2);
    e.process_element(1, A, 1, &[0]).unwrap();
    e.end();
    e.begin(1);
    e.process_element(0, B, 2, &[0]).unwrap();
    e.end();
    assert_eq!(e.valid_labels(), &[B]);
    assert_eq!(e.count(&A), 0);
    assert_eq!(e.number_of_labels(), 1);
}
