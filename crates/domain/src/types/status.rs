//! Workflow states for orders and phase records
//!
//! [`OrderStatus`] is the single coordination signal other modules branch
//! on. Classification goes through the helper methods here rather than
//! through label matching at call sites.

use serde::{Deserialize, Serialize};

use super::session::Module;
use crate::impl_domain_status_conversions;

/// Global workflow state of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    QuoteDraft,
    QuoteNegotiation,
    Rejected,
    Cancelled,
    OrderCreated,
    DesignPending,
    InDesign,
    AwaitingClientApproval,
    ChangesRequested,
    DesignApproved,
    /// Pass-to-press: pre-press is done and the press pull queue owns the order
    InPress,
    AssignedToPress,
    PressPrep,
    Printing,
    PostPressPending,
    InFinishing,
    QualityControl,
    Completed,
}

impl_domain_status_conversions!(OrderStatus {
    QuoteDraft => "quote_draft",
    QuoteNegotiation => "quote_negotiation",
    Rejected => "rejected",
    Cancelled => "cancelled",
    OrderCreated => "order_created",
    DesignPending => "design_pending",
    InDesign => "in_design",
    AwaitingClientApproval => "awaiting_client_approval",
    ChangesRequested => "changes_requested",
    DesignApproved => "design_approved",
    InPress => "in_press",
    AssignedToPress => "assigned_to_press",
    PressPrep => "press_prep",
    Printing => "printing",
    PostPressPending => "post_press_pending",
    InFinishing => "in_finishing",
    QualityControl => "quality_control",
    Completed => "completed",
});

impl OrderStatus {
    /// Still a quote (not yet converted into a production order)
    pub const fn is_quote(self) -> bool {
        matches!(self, Self::QuoteDraft | Self::QuoteNegotiation)
    }

    /// No further workflow events apply
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Rejected | Self::Cancelled | Self::Completed)
    }

    /// Converted and not yet finished
    pub const fn is_production(self) -> bool {
        !self.is_quote() && !self.is_closed()
    }

    /// Phase that currently owns the order, if any
    pub const fn phase(self) -> Option<Phase> {
        match self {
            Self::OrderCreated
            | Self::DesignPending
            | Self::InDesign
            | Self::AwaitingClientApproval
            | Self::ChangesRequested
            | Self::DesignApproved => Some(Phase::PrePress),
            Self::InPress | Self::AssignedToPress | Self::PressPrep | Self::Printing => {
                Some(Phase::Press)
            }
            Self::PostPressPending | Self::InFinishing | Self::QualityControl => {
                Some(Phase::PostPress)
            }
            Self::QuoteDraft
            | Self::QuoteNegotiation
            | Self::Rejected
            | Self::Cancelled
            | Self::Completed => None,
        }
    }

    /// Human-readable label for reports and timelines
    pub const fn title(self) -> &'static str {
        match self {
            Self::QuoteDraft => "Quote draft",
            Self::QuoteNegotiation => "Quote in negotiation",
            Self::Rejected => "Rejected",
            Self::Cancelled => "Cancelled",
            Self::OrderCreated => "Order created",
            Self::DesignPending => "Design pending",
            Self::InDesign => "In design",
            Self::AwaitingClientApproval => "Awaiting client approval",
            Self::ChangesRequested => "Changes requested",
            Self::DesignApproved => "Design approved",
            Self::InPress => "In press",
            Self::AssignedToPress => "Assigned to press",
            Self::PressPrep => "Press preparation",
            Self::Printing => "Printing",
            Self::PostPressPending => "Post-press pending",
            Self::InFinishing => "In finishing",
            Self::QualityControl => "Quality control",
            Self::Completed => "Completed",
        }
    }
}

/// Production phase with its own record, assignee and checklist
///
/// Quality control is the closing stage of the post-press record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    PrePress,
    Press,
    PostPress,
}

impl_domain_status_conversions!(Phase {
    PrePress => "pre_press",
    Press => "press",
    PostPress => "post_press",
});

impl Phase {
    /// Number of checklist steps
    pub const fn checklist_len(self) -> usize {
        match self {
            Self::PrePress => 4,
            Self::Press => 2,
            Self::PostPress => 3,
        }
    }

    /// Global status that places an order in this phase's pull queue
    pub const fn entry_status(self) -> OrderStatus {
        match self {
            Self::PrePress => OrderStatus::OrderCreated,
            Self::Press => OrderStatus::InPress,
            Self::PostPress => OrderStatus::PostPressPending,
        }
    }

    /// Global status written when an operator claims the order
    pub const fn claimed_status(self) -> OrderStatus {
        match self {
            Self::PrePress => OrderStatus::DesignPending,
            Self::Press => OrderStatus::AssignedToPress,
            Self::PostPress => OrderStatus::InFinishing,
        }
    }

    /// Phase-local status written when an operator claims the order
    pub const fn claimed_phase_status(self) -> PhaseStatus {
        match self {
            Self::PrePress => PhaseStatus::DesignPending,
            Self::Press => PhaseStatus::AssignedToPress,
            Self::PostPress => PhaseStatus::Pending,
        }
    }

    pub const fn next(self) -> Option<Self> {
        match self {
            Self::PrePress => Some(Self::Press),
            Self::Press => Some(Self::PostPress),
            Self::PostPress => None,
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::PrePress => "Pre-press",
            Self::Press => "Press",
            Self::PostPress => "Post-press",
        }
    }

    /// Module route where operators work this phase
    pub const fn module(self) -> Module {
        match self {
            Self::PrePress => Module::Prepress,
            Self::Press => Module::Press,
            Self::PostPress => Module::Postpress,
        }
    }
}

/// Phase-local status stored on a phase record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    Pending,
    DesignPending,
    InDesign,
    AwaitingClientApproval,
    ChangesRequested,
    DesignApproved,
    AssignedToPress,
    PressPrep,
    Printing,
    InFinishing,
    QualityControl,
    Completed,
}

impl_domain_status_conversions!(PhaseStatus {
    Pending => "pending",
    DesignPending => "design_pending",
    InDesign => "in_design",
    AwaitingClientApproval => "awaiting_client_approval",
    ChangesRequested => "changes_requested",
    DesignApproved => "design_approved",
    AssignedToPress => "assigned_to_press",
    PressPrep => "press_prep",
    Printing => "printing",
    InFinishing => "in_finishing",
    QualityControl => "quality_control",
    Completed => "completed",
});

impl PhaseStatus {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }
}
