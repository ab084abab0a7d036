// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{create_test_bid, reference_now};
use crate::{EffectiveThresholds, PipelineMetrics, PipelineStatus, compute_metrics};

#[test]
fn test_empty_metrics_are_zero_valued() {
    let metrics =
        compute_metrics(&[], reference_now(), &EffectiveThresholds::default()).unwrap();

    assert_eq!(metrics, PipelineMetrics::default());
    assert_eq!(metrics.total, 0);
    assert!(metrics.win_rate.abs() < f64::EPSILON);
    assert_eq!(metrics.avg_draft_age_days, None);
    assert_eq!(metrics.avg_deal_size, None);
    assert_eq!(metrics.follow_up_overdue_count, 0);
    assert_eq!(metrics.ghosted_suggested_count, 0);
    assert_eq!(metrics.by_status.len(), 8);
    assert!(metrics.by_status.values().all(|count| *count == 0));
}

#[test]
fn test_metrics_aggregate_counts_and_averages() {
    let mut won_big = create_test_bid(1, PipelineStatus::Won, 40);
    won_big.final_agreed_price = Some(6_000.0);
    let mut won_small = create_test_bid(2, PipelineStatus::Won, 40);
    won_small.final_agreed_price = Some(2_000.0);
    let won_unpriced = create_test_bid(3, PipelineStatus::Won, 40);

    let bids = vec![
        won_big,
        won_small,
        won_unpriced,
        create_test_bid(4, PipelineStatus::Lost, 40),
        create_test_bid(5, PipelineStatus::Draft, 4),
        create_test_bid(6, PipelineStatus::Draft, 2),
        create_test_bid(7, PipelineStatus::Submitted, 5),
        create_test_bid(8, PipelineStatus::Viewed, 20),
    ];

    let metrics =
        compute_metrics(&bids, reference_now(), &EffectiveThresholds::default()).unwrap();

    assert_eq!(metrics.total, 8);
    assert_eq!(metrics.by_status[&PipelineStatus::Won], 3);
    assert_eq!(metrics.by_status[&PipelineStatus::Draft], 2);
    assert_eq!(metrics.by_status[&PipelineStatus::Ghosted], 0);
    assert!((metrics.win_rate - 0.75).abs() < 1e-9);
    assert!((metrics.avg_draft_age_days.unwrap() - 3.0).abs() < 1e-9);
    assert!((metrics.avg_deal_size.unwrap() - 4_000.0).abs() < 1e-9);
    // Submitted 5 days ago is past the 3-day SLA; viewed bids never need follow-up.
    assert_eq!(metrics.follow_up_overdue_count, 1);
    // Only the viewed bid has been silent for 14 days.
    assert_eq!(metrics.ghosted_suggested_count, 1);
}

#[test]
fn test_metrics_serialize_camel_case() {
    let json = serde_json::to_value(PipelineMetrics::default()).unwrap();
    assert_eq!(json["winRate"], serde_json::json!(0.0));
    assert_eq!(json["avgDealSize"], serde_json::Value::Null);
    assert_eq!(json["byStatus"]["WITHDRAWN"], serde_json::json!(0));
}
