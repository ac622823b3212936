use sunburst_core::{aggregate, calibrate, import_outline, Chart, ItemId};

const EPSILON: f64 = 1e-12;

fn uneven_chart() -> Chart {
    let mut chart = import_outline(
        "A\n  A1\n    A1a\n    A1b\n    A1c\n  A2\nB\n  B1\n    B1a\nC\n",
    )
    .unwrap();
    for (id, weight) in [("1", 5.0), ("2", 0.5), ("1.1", 3.0), ("2.1.1", 8.0)] {
        chart.items.set_weight(&ItemId::from(id), weight).unwrap();
    }
    chart
}

fn values_at(chart: &Chart, level: usize) -> Vec<(String, f64)> {
    let buckets = aggregate(chart).unwrap();
    buckets[level]
        .items
        .iter()
        .map(|entry| (entry.id.to_string(), entry.value))
        .collect()
}

#[test]
fn target_level_sectors_become_equal() {
    let mut chart = uneven_chart();

    let equalized = calibrate(&mut chart, 1);

    // A1, A2, B1 and the placeholder below leaf C.
    assert_eq!(equalized, 4);
    let level1 = values_at(&chart, 1);
    assert_eq!(level1.len(), 4);
    for (id, value) in &level1 {
        assert!((value - 0.25).abs() < EPSILON, "{id} has {value}");
    }

    let level0 = values_at(&chart, 0);
    assert!((level0[0].1 - 0.5).abs() < EPSILON);
    assert!((level0[1].1 - 0.25).abs() < EPSILON);
    assert!((level0[2].1 - 0.25).abs() < EPSILON);
}

#[test]
fn deepest_level_calibration_counts_leaves() {
    let mut chart = uneven_chart();

    let equalized = calibrate(&mut chart, 2);

    // A1a, A1b, A1c, B1a, plus padding below A2 and C.
    assert_eq!(equalized, 6);
    for (id, value) in values_at(&chart, 2) {
        assert!((value - 1.0 / 6.0).abs() < EPSILON, "{id} has {value}");
    }
    assert_eq!(chart.items.item(&ItemId::from("1")).unwrap().weight, 4.0);
    assert_eq!(chart.items.item(&ItemId::from("1.1")).unwrap().weight, 3.0);
}

#[test]
fn recalibrating_rebuilds_from_new_baseline() {
    let mut chart = uneven_chart();

    calibrate(&mut chart, 2);
    calibrate(&mut chart, 0);

    for (id, value) in values_at(&chart, 0) {
        assert!((value - 1.0 / 3.0).abs() < EPSILON, "{id} has {value}");
    }
    // Level 1 and below keep the weights from the first pass.
    assert_eq!(chart.items.item(&ItemId::from("1.1")).unwrap().weight, 3.0);
    assert_eq!(chart.items.item(&ItemId::from("1.2")).unwrap().weight, 1.0);
}

#[test]
fn calibrating_twice_at_same_level_is_stable() {
    let mut chart = uneven_chart();

    calibrate(&mut chart, 1);
    let first = values_at(&chart, 1);
    calibrate(&mut chart, 1);

    assert_eq!(values_at(&chart, 1), first);
}
