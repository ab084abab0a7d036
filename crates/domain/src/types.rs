// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::status::PipelineStatus;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::{Date, OffsetDateTime};

/// Declares a closed enumeration with a canonical wire/storage string form.
///
/// Generates `as_str`, `FromStr`, and `Display`. Parsing is exact-match on
/// the canonical string; anything else produces the given error variant.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident => $err:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $text:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $name {
            /// Returns the canonical string representation.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(DomainError::$err(s.to_string())),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }
    };
}

string_enum! {
    /// Where the job was sourced.
    pub enum Platform => InvalidPlatform {
        /// Upwork marketplace
        Upwork => "UPWORK",
        /// Fiverr marketplace
        Fiverr => "FIVERR",
        /// Freelancer.com marketplace
        Freelancer => "FREELANCER",
        /// Toptal network
        Toptal => "TOPTAL",
        /// `LinkedIn` outreach
        LinkedIn => "LINKEDIN",
        /// Direct client contact
        Direct => "DIRECT",
        /// Referral from an existing client or partner
        Referral => "REFERRAL",
        /// Anything else
        Other => "OTHER",
    }
}

string_enum! {
    /// Why a bid was lost.
    pub enum LossReason => InvalidLossReason {
        PriceTooHigh => "PRICE_TOO_HIGH",
        ScopeMismatch => "SCOPE_MISMATCH",
        Timeline => "TIMELINE",
        CompetitorChosen => "COMPETITOR_CHOSEN",
        ClientUnresponsive => "CLIENT_UNRESPONSIVE",
        ProjectCancelled => "PROJECT_CANCELLED",
        /// Requires free-text detail in `loss_reason_other`.
        Other => "OTHER",
    }
}

string_enum! {
    /// Why we withdrew a bid.
    pub enum WithdrawalReason => InvalidWithdrawalReason {
        ScopeChanged => "SCOPE_CHANGED",
        CapacityUnavailable => "CAPACITY_UNAVAILABLE",
        ClientRedFlags => "CLIENT_RED_FLAGS",
        BudgetTooLow => "BUDGET_TOO_LOW",
        Other => "OTHER",
    }
}

string_enum! {
    /// How a client interview went.
    pub enum InterviewOutcome => InvalidInterviewOutcome {
        Positive => "POSITIVE",
        Neutral => "NEUTRAL",
        Negative => "NEGATIVE",
        NoShow => "NO_SHOW",
    }
}

/// A single entry in a bid's status history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusHistoryEntry {
    /// The status the bid entered.
    pub status: PipelineStatus,
    /// When the bid entered it.
    pub timestamp: OffsetDateTime,
    /// The user who caused the change.
    pub user_id: i64,
    /// At most one reason, chosen by precedence at record time.
    pub reason: Option<String>,
}

/// Append-only, ordered status history.
///
/// There is deliberately no way to remove, reorder, or mutate an entry
/// once it has been appended.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusHistory {
    entries: Vec<StatusHistoryEntry>,
}

impl StatusHistory {
    /// Creates an empty history.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Rebuilds a history from stored entries, preserving their order.
    #[must_use]
    pub const fn from_entries(entries: Vec<StatusHistoryEntry>) -> Self {
        Self { entries }
    }

    /// Appends an entry to the end of the history.
    pub fn append(&mut self, entry: StatusHistoryEntry) {
        self.entries.push(entry);
    }

    /// Returns all entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[StatusHistoryEntry] {
        &self.entries
    }

    /// Returns the most recently appended entry.
    #[must_use]
    pub fn last(&self) -> Option<&StatusHistoryEntry> {
        self.entries.last()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no entries have been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A bid record: one proposal tracked through the pipeline.
///
/// `bid_id` is `None` until the bid has been persisted. `version` is the
/// optimistic concurrency token assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Bid {
    pub bid_id: Option<i64>,
    pub organization_id: Option<i64>,
    pub owner_id: i64,

    pub platform: Platform,
    pub job_reference: Option<String>,
    pub client_name: Option<String>,
    pub title: String,
    pub client_budget: Option<String>,
    pub proposed_price: Option<f64>,
    pub currency: String,
    pub estimated_hours: Option<f64>,
    pub skills: Vec<String>,
    pub submission_date: Option<Date>,

    pub current_status: PipelineStatus,
    pub status_history: StatusHistory,
    pub last_status_at: Option<OffsetDateTime>,
    pub final_outcome_at: Option<OffsetDateTime>,

    pub probability: Option<f64>,
    pub competitor_notes: Option<String>,
    pub risk_flags: Vec<String>,
    pub internal_comments: Option<String>,
    pub interview_date: Option<Date>,
    pub interview_outcome: Option<InterviewOutcome>,
    pub loss_reason: Option<LossReason>,
    pub loss_reason_other: Option<String>,
    pub withdrawal_reason: Option<WithdrawalReason>,
    pub final_agreed_price: Option<f64>,
    pub expected_start_date: Option<Date>,
    pub final_scope_notes: Option<String>,

    pub version: i64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Bid {
    /// Returns true if the bid is in a terminal status.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.current_status.is_terminal()
    }

    /// The timestamp of the bid's most recent activity.
    ///
    /// This is the last status change, or creation if the bid has never
    /// transitioned.
    #[must_use]
    pub fn activity_at(&self) -> OffsetDateTime {
        self.last_status_at.unwrap_or(self.created_at)
    }

    /// Returns true if `user_id` authored this bid.
    #[must_use]
    pub const fn is_owned_by(&self, user_id: i64) -> bool {
        self.owner_id == user_id
    }
}

/// Descriptive fields supplied when creating a bid.
#[derive(Debug, Clone, PartialEq)]
pub struct BidDraft {
    pub platform: Platform,
    pub job_reference: Option<String>,
    pub client_name: Option<String>,
    pub title: String,
    pub client_budget: Option<String>,
    pub proposed_price: Option<f64>,
    pub currency: Option<String>,
    pub estimated_hours: Option<f64>,
    pub skills: Vec<String>,
    pub submission_date: Option<Date>,
    pub probability: Option<f64>,
    pub competitor_notes: Option<String>,
    pub risk_flags: Vec<String>,
    pub internal_comments: Option<String>,
    /// Defaults to `Draft` when absent.
    pub initial_status: Option<PipelineStatus>,
}

impl BidDraft {
    /// Creates a draft with only the required fields set.
    #[must_use]
    pub fn new(platform: Platform, title: &str) -> Self {
        Self {
            platform,
            job_reference: None,
            client_name: None,
            title: title.to_string(),
            client_budget: None,
            proposed_price: None,
            currency: None,
            estimated_hours: None,
            skills: Vec::new(),
            submission_date: None,
            probability: None,
            competitor_notes: None,
            risk_flags: Vec::new(),
            internal_comments: None,
            initial_status: None,
        }
    }
}

/// Field edits for an existing bid. `None` leaves a field unchanged.
///
/// `current_status` exists so that an edit carrying a status can be
/// detected and refused.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BidEdit {
    pub platform: Option<Platform>,
    pub job_reference: Option<String>,
    pub client_name: Option<String>,
    pub title: Option<String>,
    pub client_budget: Option<String>,
    pub proposed_price: Option<f64>,
    pub currency: Option<String>,
    pub estimated_hours: Option<f64>,
    pub skills: Option<Vec<String>>,
    pub submission_date: Option<Date>,
    pub probability: Option<f64>,
    pub competitor_notes: Option<String>,
    pub risk_flags: Option<Vec<String>>,
    pub internal_comments: Option<String>,
    pub interview_date: Option<Date>,
    pub interview_outcome: Option<InterviewOutcome>,
    pub current_status: Option<PipelineStatus>,
}

/// Extra fields supplied with a transition request.
///
/// Only the fields relevant to the target status are consulted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransitionContext {
    pub interview_date: Option<Date>,
    pub interview_outcome: Option<InterviewOutcome>,
    pub loss_reason: Option<LossReason>,
    pub loss_reason_other: Option<String>,
    pub withdrawal_reason: Option<WithdrawalReason>,
    pub final_agreed_price: Option<f64>,
    pub expected_start_date: Option<Date>,
    pub final_scope_notes: Option<String>,
}

/// Default currency code for bids created without one.
pub const DEFAULT_CURRENCY: &str = "USD";
