use sunburst_core::{aggregate, Chart, ItemId, LevelBucket};

const EPSILON: f64 = 1e-12;

fn chart_with_child_counts(counts: &[usize]) -> Chart {
    let mut chart = Chart::new();
    for count in counts {
        let root = chart.add_item(None, None).unwrap();
        for _ in 0..*count {
            chart.add_item(Some(&root), None).unwrap();
        }
    }
    chart
}

fn ids(bucket: &LevelBucket<'_>) -> Vec<String> {
    bucket.items.iter().map(|entry| entry.id.to_string()).collect()
}

#[test]
fn groups_levels_in_breadth_first_queue_order() {
    let chart = chart_with_child_counts(&[2, 1, 3]);

    let buckets = aggregate(&chart).unwrap();

    assert_eq!(buckets.len(), 2);
    assert_eq!(ids(&buckets[0]), vec!["1", "2", "3"]);
    assert_eq!(
        ids(&buckets[1]),
        vec!["1.1", "1.2", "2.1", "3.1", "3.2", "3.3"]
    );
}

#[test]
fn three_roots_with_3_6_2_children_split_shares() {
    let chart = chart_with_child_counts(&[3, 6, 2]);

    let buckets = aggregate(&chart).unwrap();

    for entry in &buckets[0].items {
        assert!((entry.value - 1.0 / 3.0).abs() < EPSILON);
    }
    let expected: Vec<f64> = [3.0, 6.0, 2.0]
        .iter()
        .flat_map(|count: &f64| std::iter::repeat((1.0 / 3.0) / count).take(*count as usize))
        .collect();
    let actual: Vec<f64> = buckets[1].items.iter().map(|entry| entry.value).collect();
    assert_eq!(actual.len(), 11);
    for (value, want) in actual.iter().zip(expected.iter()) {
        assert!((value - want).abs() < EPSILON, "{value} != {want}");
    }
    assert_eq!(buckets[1].items[3].id, ItemId::from("2.1"));
    assert_eq!(buckets[1].items[9].id, ItemId::from("3.1"));
}

#[test]
fn children_shares_sum_to_parent_share() {
    let mut chart = chart_with_child_counts(&[3, 2]);
    let weights = [("1", 2.0), ("2", 5.0), ("1.1", 1.0), ("1.2", 3.0), ("1.3", 0.5), ("2.2", 4.0)];
    for (id, weight) in weights {
        chart.items.set_weight(&ItemId::from(id), weight).unwrap();
    }
    let branch = ItemId::from("1.2");
    chart.add_item(Some(&branch), None).unwrap();
    chart.add_item(Some(&branch), None).unwrap();

    let buckets = aggregate(&chart).unwrap();
    let all: Vec<_> = buckets.iter().flat_map(|bucket| bucket.items.iter()).collect();

    for parent in all.iter().filter(|entry| !entry.is_placeholder()) {
        let children: Vec<_> = all
            .iter()
            .filter(|entry| !entry.is_placeholder())
            .filter(|entry| entry.parent.as_ref() == Some(&parent.id))
            .collect();
        if children.is_empty() {
            continue;
        }
        let sum: f64 = children.iter().map(|entry| entry.value).sum();
        assert!(
            (sum - parent.value).abs() < EPSILON,
            "children of {} sum to {sum}, parent has {}",
            parent.id,
            parent.value
        );
    }

    let root_sum: f64 = buckets[0].items.iter().map(|entry| entry.value).sum();
    assert!((root_sum - 1.0).abs() < EPSILON);
}

#[test]
fn leaf_is_padded_once_per_missing_level() {
    let mut chart = Chart::new();
    let short = chart.add_item(None, None).unwrap();
    let deep = chart.add_item(None, None).unwrap();
    let mut cursor = deep.clone();
    for _ in 0..3 {
        cursor = chart.add_item(Some(&cursor), None).unwrap();
    }
    chart.items.set_weight(&short, 3.0).unwrap();

    let buckets = aggregate(&chart).unwrap();

    assert_eq!(buckets.len(), 4);
    let short_value = buckets[0].items[0].value;
    assert!((short_value - 0.75).abs() < EPSILON);
    for (depth, bucket) in buckets.iter().enumerate().skip(1) {
        let padding: Vec<_> = bucket
            .items
            .iter()
            .filter(|entry| entry.property_owner() == &short)
            .collect();
        assert_eq!(padding.len(), 1, "level {depth}");
        assert!(padding[0].is_placeholder());
        assert_eq!(padding[0].level, depth);
        assert!((padding[0].value - short_value).abs() < EPSILON);
    }
    assert_eq!(buckets[3].items[0].id, ItemId::from("1.0p.0p.0p"));
}

#[test]
fn equal_roots_are_normalized() {
    let chart = chart_with_child_counts(&[0, 0, 0]);

    let buckets = aggregate(&chart).unwrap();

    assert_eq!(buckets.len(), 1);
    for entry in &buckets[0].items {
        assert!((entry.value - 1.0 / 3.0).abs() < EPSILON);
    }
}

#[test]
fn all_zero_roots_degrade_to_empty_sectors() {
    let mut chart = chart_with_child_counts(&[1, 1]);
    chart.items.set_weight(&ItemId::from("1"), 0.0).unwrap();
    chart.items.set_weight(&ItemId::from("2"), 0.0).unwrap();

    let buckets = aggregate(&chart).unwrap();

    let values: Vec<f64> = buckets
        .iter()
        .flat_map(|bucket| bucket.items.iter().map(|entry| entry.value))
        .collect();
    assert_eq!(values, vec![0.0; 4]);
}
