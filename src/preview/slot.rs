//! Stale-resolution guard for a preview card
//!
//! A card can swap its section while a resolution is still in flight. Each
//! request bumps a generation counter; a result is only applied if its ticket
//! still carries the current generation.

use std::fmt;
use std::sync::Arc;

use super::{ResolveError, SectionRenderer};

/// Handle for one in-flight resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionTicket {
    generation: u64,
    component_type: String,
}

impl ResolutionTicket {
    pub fn component_type(&self) -> &str {
        &self.component_type
    }
}

/// What a preview card currently shows
#[derive(Clone, Default)]
pub enum SlotState {
    #[default]
    Idle,
    Loading { component_type: String },
    Ready { component_type: String, renderer: Arc<dyn SectionRenderer> },
    NotFound { component_type: String },
    Failed { component_type: String, reason: String },
}

impl SlotState {
    pub fn component_type(&self) -> Option<&str> {
        match self {
            SlotState::Idle => None,
            SlotState::Loading { component_type }
            | SlotState::Ready { component_type, .. }
            | SlotState::NotFound { component_type }
            | SlotState::Failed { component_type, .. } => Some(component_type),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            SlotState::Idle => "Idle",
            SlotState::Loading { .. } => "Loading",
            SlotState::Ready { .. } => "Ready",
            SlotState::NotFound { .. } => "NotFound",
            SlotState::Failed { .. } => "Failed",
        }
    }
}

impl fmt::Debug for SlotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.name());
        if let Some(component_type) = self.component_type() {
            s.field("component_type", &component_type);
        }
        if let SlotState::Failed { reason, .. } = self {
            s.field("reason", reason);
        }
        s.finish()
    }
}

#[derive(Debug, Default)]
pub struct PreviewSlot {
    generation: u64,
    state: SlotState,
}

impl PreviewSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SlotState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, SlotState::Loading { .. })
    }

    /// Start resolving `component_type`; any earlier ticket becomes stale
    pub fn request(&mut self, component_type: &str) -> ResolutionTicket {
        self.generation += 1;
        self.state = SlotState::Loading {
            component_type: component_type.to_string(),
        };
        ResolutionTicket {
            generation: self.generation,
            component_type: component_type.to_string(),
        }
    }

    /// Apply a finished resolution. Returns `false` and leaves the slot
    /// untouched when the ticket is stale.
    pub fn complete(
        &mut self,
        ticket: ResolutionTicket,
        result: Result<Option<Arc<dyn SectionRenderer>>, ResolveError>,
    ) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                component_type = %ticket.component_type,
                "Discarding stale renderer resolution"
            );
            return false;
        }

        let component_type = ticket.component_type;
        self.state = match result {
            Ok(Some(renderer)) => SlotState::Ready { component_type, renderer },
            Ok(None) => SlotState::NotFound { component_type },
            Err(e) => SlotState::Failed {
                component_type,
                reason: e.to_string(),
            },
        };
        true
    }

    /// Forget the current request, e.g. when the card is closed
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.state = SlotState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn renderer() -> Arc<dyn SectionRenderer> {
        Arc::new(|_: &Value| -> anyhow::Result<String> { Ok(String::new()) })
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let mut slot = PreviewSlot::new();
        let first = slot.request("HeroSection");
        let second = slot.request("CtaSection");

        assert!(!slot.complete(first, Ok(Some(renderer()))));
        assert!(slot.is_loading());
        assert_eq!(slot.state().component_type(), Some("CtaSection"));

        assert!(slot.complete(second, Ok(Some(renderer()))));
        assert!(matches!(slot.state(), SlotState::Ready { component_type, .. } if component_type == "CtaSection"));
    }

    #[test]
    fn test_failure_is_distinct_from_loading() {
        let mut slot = PreviewSlot::new();
        let ticket = slot.request("HeroSection");
        let error = ResolveError::Load {
            component_type: "HeroSection".to_string(),
            reason: "offline".to_string(),
        };
        assert!(slot.complete(ticket, Err(error)));
        assert!(!slot.is_loading());
        assert!(matches!(slot.state(), SlotState::Failed { reason, .. } if reason.contains("offline")));
    }

    #[test]
    fn test_cancel_discards_in_flight_request() {
        let mut slot = PreviewSlot::new();
        let ticket = slot.request("HeroSection");
        slot.cancel();
        assert!(!slot.complete(ticket, Ok(None)));
        assert!(matches!(slot.state(), SlotState::Idle));
    }
}
