// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::backlog::BacklogKind;
use crate::error::DomainError;
use crate::status::PipelineStatus;
use crate::thresholds::EffectiveThresholds;
use crate::types::Bid;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::OffsetDateTime;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Pipeline-wide counters and averages for one visibility scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineMetrics {
    /// Count per status. Every status is present.
    pub by_status: BTreeMap<PipelineStatus, u64>,
    pub total: u64,
    /// `WON / (WON + LOST + GHOSTED + WITHDRAWN)`, or 0 with no closed bids.
    pub win_rate: f64,
    pub avg_draft_age_days: Option<f64>,
    pub avg_deal_size: Option<f64>,
    pub follow_up_overdue_count: u64,
    pub ghosted_suggested_count: u64,
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self {
            by_status: PipelineStatus::ALL.into_iter().map(|s| (s, 0)).collect(),
            total: 0,
            win_rate: 0.0,
            avg_draft_age_days: None,
            avg_deal_size: None,
            follow_up_overdue_count: 0,
            ghosted_suggested_count: 0,
        }
    }
}

/// Aggregates metrics over `bids` as of `now`.
///
/// # Errors
///
/// Returns `DomainError::AggregationOverflow` if a count cannot be
/// represented for averaging.
pub fn compute_metrics(
    bids: &[Bid],
    now: OffsetDateTime,
    thresholds: &EffectiveThresholds,
) -> Result<PipelineMetrics, DomainError> {
    let mut metrics = PipelineMetrics::default();

    for bid in bids {
        *metrics.by_status.entry(bid.current_status).or_insert(0) += 1;
    }
    metrics.total = to_u64(bids.len())?;

    let count = |status: PipelineStatus| metrics.by_status.get(&status).copied().unwrap_or(0);
    let won = count(PipelineStatus::Won);
    let closed = PipelineStatus::ALL
        .into_iter()
        .filter(PipelineStatus::is_terminal)
        .map(count)
        .sum::<u64>();
    metrics.win_rate = if closed == 0 {
        0.0
    } else {
        to_f64(won)? / to_f64(closed)?
    };

    let draft_ages: Vec<f64> = bids
        .iter()
        .filter(|b| b.current_status == PipelineStatus::Draft)
        .map(|b| (now - b.created_at).as_seconds_f64() / SECONDS_PER_DAY)
        .collect();
    metrics.avg_draft_age_days = mean(&draft_ages)?;

    let deal_sizes: Vec<f64> = bids
        .iter()
        .filter(|b| b.current_status == PipelineStatus::Won)
        .filter_map(|b| b.final_agreed_price)
        .collect();
    metrics.avg_deal_size = mean(&deal_sizes)?;

    let follow_up_cutoff = BacklogKind::FollowUp.cutoff(now, thresholds);
    metrics.follow_up_overdue_count = to_u64(
        bids.iter()
            .filter(|b| BacklogKind::FollowUp.matches(b, follow_up_cutoff))
            .count(),
    )?;

    let ghosted_cutoff = BacklogKind::GhostedSuggestion.cutoff(now, thresholds);
    metrics.ghosted_suggested_count = to_u64(
        bids.iter()
            .filter(|b| BacklogKind::GhostedSuggestion.matches(b, ghosted_cutoff))
            .count(),
    )?;

    Ok(metrics)
}

fn mean(values: &[f64]) -> Result<Option<f64>, DomainError> {
    if values.is_empty() {
        return Ok(None);
    }
    let sum: f64 = values.iter().sum();
    Ok(Some(sum / to_f64(to_u64(values.len())?)?))
}

fn to_u64(n: usize) -> Result<u64, DomainError> {
    u64::try_from(n).map_err(|_| DomainError::AggregationOverflow(n.to_string()))
}

fn to_f64(n: u64) -> Result<f64, DomainError> {
    u32::try_from(n)
        .map(f64::from)
        .map_err(|_| DomainError::AggregationOverflow(n.to_string()))
}
