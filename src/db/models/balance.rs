// src/db/models/balance.rs
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::overtime::RequestStatus;

/// Aggregate figures for a user's status page. All fields are non-negative;
/// a user with no ledger rows gets all zeros.
#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BalanceSummary {
    /// Σ(total_days - used_days) over approved/used grants.
    pub remaining_days: i64,
    /// Σ(used_days) over approved/used grants.
    pub used_days: i64,
    pub pending_offset_count: i64,
    pub pending_overtime_count: i64,
    pub total_offset_count: i64,
    /// Remaining balance expressed in hours, at 8 hours per day.
    pub overtime_hours: i64,
}

/// The slice of a grant row the balance needs.
#[derive(Debug, sqlx::FromRow)]
pub struct GrantBalanceRow {
    pub total_days: i32,
    pub used_days: Option<i32>,
    pub status: RequestStatus,
}

impl BalanceSummary {
    /// A fully consumed grant carries status `used` rather than `approved`,
    /// but it is still an approved grant for accounting purposes, so both
    /// statuses feed the sums.
    pub fn compute(grants: &[GrantBalanceRow], offset_statuses: &[RequestStatus]) -> Self {
        let mut summary = BalanceSummary::default();

        for grant in grants {
            match grant.status {
                RequestStatus::Approved | RequestStatus::Used => {
                    let used = i64::from(grant.used_days.unwrap_or(0));
                    summary.remaining_days += i64::from(grant.total_days) - used;
                    summary.used_days += used;
                }
                RequestStatus::Pending => summary.pending_overtime_count += 1,
                RequestStatus::Rejected => {}
            }
        }

        for status in offset_statuses {
            summary.total_offset_count += 1;
            if *status == RequestStatus::Pending {
                summary.pending_offset_count += 1;
            }
        }

        summary.overtime_hours = summary.remaining_days * 8;
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grant(total: i32, used: Option<i32>, status: RequestStatus) -> GrantBalanceRow {
        GrantBalanceRow {
            total_days: total,
            used_days: used,
            status,
        }
    }

    #[test]
    fn empty_ledger_is_all_zeros() {
        let summary = BalanceSummary::compute(&[], &[]);
        assert_eq!(summary, BalanceSummary::default());
    }

    #[test]
    fn sums_span_approved_and_used_grants() {
        let grants = vec![
            grant(2, Some(2), RequestStatus::Used),
            grant(3, Some(1), RequestStatus::Approved),
            grant(5, None, RequestStatus::Approved),
        ];
        let summary = BalanceSummary::compute(&grants, &[]);
        assert_eq!(summary.remaining_days, 7);
        assert_eq!(summary.used_days, 3);
        assert_eq!(summary.overtime_hours, 56);
    }

    #[test]
    fn pending_and_rejected_grants_do_not_feed_the_sums() {
        let grants = vec![
            grant(4, None, RequestStatus::Pending),
            grant(2, Some(1), RequestStatus::Rejected),
        ];
        let summary = BalanceSummary::compute(&grants, &[]);
        assert_eq!(summary.remaining_days, 0);
        assert_eq!(summary.used_days, 0);
        assert_eq!(summary.pending_overtime_count, 1);
    }

    #[test]
    fn offset_counts_by_status() {
        let offsets = vec![
            RequestStatus::Approved,
            RequestStatus::Pending,
            RequestStatus::Pending,
            RequestStatus::Rejected,
        ];
        let summary = BalanceSummary::compute(&[], &offsets);
        assert_eq!(summary.total_offset_count, 4);
        assert_eq!(summary.pending_offset_count, 2);
    }

    #[test]
    fn fully_consumed_scenario_reports_zero_remaining_two_used() {
        // Two-day grant, both days redeemed: the grant is `used`, remaining
        // is zero, and the two consumed days still show up as used.
        let grants = vec![grant(2, Some(2), RequestStatus::Used)];
        let offsets = vec![RequestStatus::Approved, RequestStatus::Approved];
        let summary = BalanceSummary::compute(&grants, &offsets);
        assert_eq!(summary.remaining_days, 0);
        assert_eq!(summary.used_days, 2);
        assert_eq!(summary.total_offset_count, 2);
        assert_eq!(summary.overtime_hours, 0);
    }
}
