// ── Lookup and assignment gate ──
//
// `QrResolver` tracks which candidate is currently selected and the last
// lookup applied to it. A lookup marks its candidate as selected and takes a
// fresh generation number *before* the request goes out; the response is
// applied only if no later lookup has started since. A slower response is
// discarded even when a newer lookup re-selected the same code, so the newest
// request always wins.
//
// The lock is never held across an await.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use qrgate_api::GraphqlClient;
use qrgate_api::types::AssignQrCodeInput;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::model::{QrAssignment, QrCandidate, QrLookupResult, QrStatus, VerifiedBusiness};

const EMPTY_CODE: &str = "Please enter a QR code";
const NOTHING_SELECTED: &str = "Please select a QR code to assign";
const NOT_LOOKED_UP: &str = "Look up the QR code before assigning it";

#[derive(Debug, Default)]
struct SelectionState {
    selected: Option<QrCandidate>,
    /// Bumped by every lookup; a response carries the value it started with.
    generation: u64,
    /// Last applied lookup and the candidate it was issued for.
    applied: Option<(QrCandidate, QrLookupResult)>,
}

impl SelectionState {
    fn current_lookup(&self) -> Option<&QrLookupResult> {
        match (&self.selected, &self.applied) {
            (Some(selected), Some((candidate, result))) if selected == candidate => Some(result),
            _ => None,
        }
    }
}

/// Snapshot of the current selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub candidate: Option<QrCandidate>,
    /// Lookup result for `candidate`, once one has been applied.
    pub lookup: Option<QrLookupResult>,
}

impl Selection {
    /// The candidate, if its lookup says it can be assigned.
    pub fn assignable(&self) -> Option<&QrCandidate> {
        match (&self.candidate, &self.lookup) {
            (Some(candidate), Some(lookup)) if lookup.is_assignable() => Some(candidate),
            _ => None,
        }
    }
}

/// Lookup/assign front end with a stale-response guard.
#[derive(Clone)]
pub struct QrResolver {
    client: GraphqlClient,
    state: Arc<Mutex<SelectionState>>,
}

impl QrResolver {
    pub fn new(client: GraphqlClient) -> Self {
        Self {
            client,
            state: Arc::new(Mutex::new(SelectionState::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SelectionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Validate `candidate` against the backend.
    ///
    /// Returns `Ok(None)` when the response arrived after another candidate
    /// was selected; the stale result is discarded without touching state.
    /// An empty candidate is rejected locally.
    pub async fn lookup(&self, candidate: &QrCandidate) -> Result<Option<QrLookupResult>, CoreError> {
        if candidate.is_empty() {
            return Err(CoreError::validation(EMPTY_CODE));
        }

        let generation = {
            let mut state = self.lock();
            state.generation += 1;
            state.selected = Some(candidate.clone());
            state.generation
        };
        debug!(code = %candidate, generation, "looking up QR code");

        let response = self.client.qr_code_lookup(candidate.as_str()).await;

        let mut state = self.lock();
        if state.generation != generation || state.selected.as_ref() != Some(candidate) {
            warn!(
                code = %candidate,
                generation,
                current = state.generation,
                selected = ?state.selected.as_ref().map(QrCandidate::as_str),
                "discarding stale lookup response"
            );
            return Ok(None);
        }

        match response {
            Ok(Some(raw)) => {
                let result = QrLookupResult::from(raw);
                debug!(code = %candidate, status = %result.status, "lookup applied");
                state.applied = Some((candidate.clone(), result.clone()));
                Ok(Some(result))
            }
            Ok(None) => {
                state.applied = None;
                Err(CoreError::QrNotFound {
                    code: candidate.to_string(),
                })
            }
            Err(e) => {
                state.applied = None;
                Err(e.into())
            }
        }
    }

    /// Current selection and its lookup, if applied.
    pub fn selection(&self) -> Selection {
        let state = self.lock();
        Selection {
            candidate: state.selected.clone(),
            lookup: state.current_lookup().cloned(),
        }
    }

    /// Forget the selection (e.g. after a successful assignment).
    ///
    /// Lookups still in flight are discarded when they complete.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.generation += 1;
        state.selected = None;
        state.applied = None;
    }

    /// Re-derive the assignment gate from current state.
    ///
    /// Requires a selection, an applied lookup for exactly that selection,
    /// and `Unassigned` status.
    pub fn assignable_code(&self) -> Result<QrCandidate, CoreError> {
        let state = self.lock();
        let Some(selected) = state.selected.clone() else {
            return Err(CoreError::validation(NOTHING_SELECTED));
        };
        let Some(lookup) = state.current_lookup() else {
            return Err(CoreError::NotAssignable {
                message: NOT_LOOKED_UP.to_owned(),
            });
        };
        match lookup.gate_message() {
            None => Ok(selected),
            Some(message) => Err(CoreError::NotAssignable { message }),
        }
    }

    /// Bind the selected code to a verified business.
    ///
    /// Not retried on failure. On success the selection is marked assigned,
    /// so a second call is gated.
    pub async fn assign(&self, business: &VerifiedBusiness) -> Result<QrAssignment, CoreError> {
        let code = self.assignable_code()?;
        if business.business_id().trim().is_empty() {
            return Err(CoreError::validation("Business id is required"));
        }

        let input = AssignQrCodeInput {
            code: code.as_str().to_owned(),
            business_id: business.business_id().to_owned(),
        };
        let assignment = QrAssignment::from(self.client.assign_qr_code(&input).await?);
        info!(
            code = %assignment.code,
            business_id = business.business_id(),
            "QR code assigned"
        );

        let mut state = self.lock();
        if let Some((candidate, result)) = state.applied.as_mut() {
            if *candidate == code {
                result.status = QrStatus::Assigned;
            }
        }
        Ok(assignment)
    }
}
