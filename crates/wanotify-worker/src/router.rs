// SPDX-FileCopyrightText: 2026 Wanotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message routing: turns one notification row into zero or more outbound
//! sends and computes the row's terminal status.
//!
//! A row's `phone_number` field is a comma-separated list of `target[:STATE]`
//! pairs. Each target is gated on the row's SLA state, classified (qualified
//! chat ID, bare phone number, or display name), resolved against the live
//! roster where needed, and sent independently: one target's failure never
//! aborts its siblings.

use std::collections::HashSet;

use tracing::{debug, warn};
use wanotify_core::{MessagingClient, QueueStatus, WanotifyError};
use wanotify_storage::NotificationRequest;

/// Suffix of an already-qualified direct-chat identifier.
pub const DIRECT_CHAT_SUFFIX: &str = "@c.us";

/// Suffix of an already-qualified group-chat identifier.
pub const GROUP_CHAT_SUFFIX: &str = "@g.us";

/// One parsed `target[:STATE]` pair from a targeting expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTarget {
    pub name: String,
    /// Uppercased state label this target requires, if any.
    pub required_state: Option<String>,
}

/// Classification of a target name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetKind {
    /// Already-qualified chat identifier, used as-is.
    ChatId(String),
    /// Bare phone number, digits only after stripping `+` and whitespace.
    PhoneNumber(String),
    /// Display name requiring an exact, case-sensitive roster lookup.
    DisplayName(String),
}

/// Per-row dispatch counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub total: usize,
    pub sent: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl DispatchOutcome {
    /// Compute the row's terminal status.
    ///
    /// A row is `SENT` when at least one send succeeded, or when every
    /// target was skipped by its state gate; a skipped-only batch counts
    /// as processed, not failed. Everything else (including an empty
    /// target list) is `FAILED`.
    pub fn terminal_status(&self) -> QueueStatus {
        if self.sent > 0 || (self.total > 0 && self.skipped == self.total) {
            QueueStatus::Sent
        } else {
            QueueStatus::Failed
        }
    }
}

/// Parse a raw targeting expression into an ordered target list.
///
/// Splits on commas, trims, and discards empty tokens. A token containing
/// `:` splits on the first colon into name and required state; the state
/// label is trimmed and uppercased.
pub fn parse_targets(expr: &str) -> Vec<RawTarget> {
    expr.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| match token.split_once(':') {
            Some((name, state)) => RawTarget {
                name: name.trim().to_string(),
                required_state: Some(state.trim().to_ascii_uppercase()),
            },
            None => RawTarget {
                name: token.to_string(),
                required_state: None,
            },
        })
        .collect()
}

/// Classify a target name into exactly one resolution strategy.
///
/// A string containing any letter is never a phone number, even if it also
/// contains digits; it falls through to the display-name branch.
pub fn classify(name: &str) -> TargetKind {
    if name.ends_with(DIRECT_CHAT_SUFFIX) || name.ends_with(GROUP_CHAT_SUFFIX) {
        return TargetKind::ChatId(name.to_string());
    }

    let compact: String = name.chars().filter(|c| !c.is_whitespace()).collect();
    let digits = compact.strip_prefix('+').unwrap_or(&compact);
    if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
        return TargetKind::PhoneNumber(digits.to_string());
    }

    TargetKind::DisplayName(name.to_string())
}

/// Evaluate the conditional gate for one target.
///
/// The gate only applies when both a required state and a row SLA state are
/// present; otherwise the target passes. The SLA state is a comma-separated
/// membership set, compared uppercased.
pub fn state_gate_passes(required_state: Option<&str>, sla_state: Option<&str>) -> bool {
    let (Some(required), Some(sla)) = (required_state, sla_state) else {
        return true;
    };
    let members: HashSet<String> = sla
        .split(',')
        .map(|s| s.trim().to_ascii_uppercase())
        .filter(|s| !s.is_empty())
        .collect();
    members.contains(required)
}

/// Dispatch one notification row to all of its targets.
///
/// Never returns an error: per-target failures are logged and counted, and
/// the caller derives the terminal status from the returned counters.
pub async fn dispatch(
    client: &dyn MessagingClient,
    request: &NotificationRequest,
) -> DispatchOutcome {
    let targets = parse_targets(&request.phone_number);
    let mut outcome = DispatchOutcome {
        total: targets.len(),
        ..Default::default()
    };

    if targets.is_empty() {
        warn!(
            id = request.id,
            ticket_id = %request.ticket_id,
            "notification has no usable targets"
        );
        return outcome;
    }

    for target in targets {
        if !state_gate_passes(target.required_state.as_deref(), request.sla_state.as_deref()) {
            debug!(
                id = request.id,
                target = %target.name,
                required = target.required_state.as_deref().unwrap_or(""),
                sla_state = request.sla_state.as_deref().unwrap_or(""),
                "target skipped: state condition unmet"
            );
            outcome.skipped += 1;
            metrics::counter!("wanotify_targets_skipped_total").increment(1);
            continue;
        }

        let chat_id = match resolve(client, &target.name).await {
            Ok(chat_id) => chat_id,
            Err(e) => {
                warn!(id = request.id, target = %target.name, error = %e, "target resolution failed");
                outcome.failed += 1;
                metrics::counter!("wanotify_targets_failed_total").increment(1);
                continue;
            }
        };

        match client.send_message(&chat_id, &request.message).await {
            Ok(()) => {
                debug!(id = request.id, chat_id = %chat_id, "message sent");
                outcome.sent += 1;
                metrics::counter!("wanotify_targets_sent_total").increment(1);
            }
            Err(e) => {
                warn!(id = request.id, chat_id = %chat_id, error = %e, "send failed");
                outcome.failed += 1;
                metrics::counter!("wanotify_targets_failed_total").increment(1);
            }
        }
    }

    outcome
}

/// Resolve a target name to a qualified chat identifier.
async fn resolve(client: &dyn MessagingClient, name: &str) -> Result<String, WanotifyError> {
    match classify(name) {
        TargetKind::ChatId(chat_id) => Ok(chat_id),
        TargetKind::PhoneNumber(digits) => Ok(format!("{digits}{DIRECT_CHAT_SUFFIX}")),
        TargetKind::DisplayName(display) => {
            let chats = client.get_chats().await?;
            chats
                .into_iter()
                .find(|c| c.name == display)
                .map(|c| c.id)
                .ok_or_else(|| {
                    WanotifyError::channel(format!("no chat named `{display}` in roster"))
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_trims_and_drops_empty_tokens() {
        let targets = parse_targets("AST-Line1:WARNING, +91 98765 43210, GroupX");
        assert_eq!(targets.len(), 3);
        assert_eq!(targets[0].name, "AST-Line1");
        assert_eq!(targets[0].required_state.as_deref(), Some("WARNING"));
        assert_eq!(targets[1].name, "+91 98765 43210");
        assert_eq!(targets[1].required_state, None);
        assert_eq!(targets[2].name, "GroupX");
        assert_eq!(targets[2].required_state, None);
    }

    #[test]
    fn parse_empty_and_whitespace_expressions_yield_no_targets() {
        assert!(parse_targets("").is_empty());
        assert!(parse_targets(",  ,").is_empty());
    }

    #[test]
    fn parse_splits_on_first_colon_only() {
        let targets = parse_targets("Ops:Escalation:BREACHED");
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].name, "Ops");
        assert_eq!(targets[0].required_state.as_deref(), Some("ESCALATION:BREACHED"));
    }

    #[test]
    fn parse_uppercases_required_state() {
        let targets = parse_targets("Ops:breached");
        assert_eq!(targets[0].required_state.as_deref(), Some("BREACHED"));
    }

    #[test]
    fn classify_qualified_chat_ids_pass_through() {
        assert_eq!(
            classify("919876543210@c.us"),
            TargetKind::ChatId("919876543210@c.us".to_string())
        );
        assert_eq!(
            classify("1234-5678@g.us"),
            TargetKind::ChatId("1234-5678@g.us".to_string())
        );
    }

    #[test]
    fn classify_strips_plus_and_whitespace_from_phone_numbers() {
        assert_eq!(
            classify("+91 98765 43210"),
            TargetKind::PhoneNumber("919876543210".to_string())
        );
        assert_eq!(
            classify("919876543210"),
            TargetKind::PhoneNumber("919876543210".to_string())
        );
    }

    #[test]
    fn classify_never_treats_letters_as_phone_number() {
        assert_eq!(
            classify("Line1-Ops"),
            TargetKind::DisplayName("Line1-Ops".to_string())
        );
        // Digits mixed with letters are still a display name.
        assert_eq!(
            classify("Team42"),
            TargetKind::DisplayName("Team42".to_string())
        );
        // A lone plus sign is not a phone number.
        assert_eq!(classify("+"), TargetKind::DisplayName("+".to_string()));
    }

    #[test]
    fn gate_passes_when_state_is_member() {
        assert!(state_gate_passes(Some("WARNING"), Some("OK,WARNING")));
        assert!(state_gate_passes(Some("OK"), Some(" ok , breached ")));
    }

    #[test]
    fn gate_blocks_when_state_is_not_member() {
        assert!(!state_gate_passes(Some("BREACHED"), Some("OK")));
    }

    #[test]
    fn gate_passes_when_either_side_is_absent() {
        assert!(state_gate_passes(None, Some("OK")));
        assert!(state_gate_passes(Some("BREACHED"), None));
        assert!(state_gate_passes(None, None));
    }

    #[test]
    fn terminal_status_sent_dominates_failures() {
        let outcome = DispatchOutcome {
            total: 2,
            sent: 1,
            failed: 1,
            skipped: 0,
        };
        assert_eq!(outcome.terminal_status(), QueueStatus::Sent);
    }

    #[test]
    fn terminal_status_skipped_only_batch_counts_as_processed() {
        // A batch where every target's condition was unmet is SENT with
        // zero deliveries.
        let outcome = DispatchOutcome {
            total: 3,
            sent: 0,
            failed: 0,
            skipped: 3,
        };
        assert_eq!(outcome.terminal_status(), QueueStatus::Sent);
    }

    #[test]
    fn terminal_status_failed_when_no_success_and_any_failure() {
        let outcome = DispatchOutcome {
            total: 2,
            sent: 0,
            failed: 1,
            skipped: 1,
        };
        assert_eq!(outcome.terminal_status(), QueueStatus::Failed);
    }

    #[test]
    fn terminal_status_failed_for_empty_target_list() {
        let outcome = DispatchOutcome::default();
        assert_eq!(outcome.terminal_status(), QueueStatus::Failed);
    }
}
