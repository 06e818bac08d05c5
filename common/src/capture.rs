//! Admin capture flow: pick a spot on the map, fill in the form, submit.
//!
//! ```text
//!            open()                 click               click
//!   Idle ──────────────▶ AwaitingLocation ──────▶ Ready ◀──────┐
//!    ▲                                             │  └─────────┘
//!    │        finish_submit(Ok) / cancel()         │
//!    └─────────────────────────────────────────────┘
//! ```
//!
//! Submitting is split like a directory refresh: [`AdminCaptureFlow::begin_submit`]
//! validates and hands out the record plus a ticket, the caller runs the insert,
//! and [`AdminCaptureFlow::finish_submit`] applies the outcome. A failed insert
//! leaves the flow in `Ready` with the form intact so the admin can retry.
//!
//! The admin flag is an input taken from the page URL at load. It only hides
//! the affordance; it is not an access control.

use crate::model::{BusinessRecord, Coordinates, NewBusinessRecord, PowerType};
use crate::store::{RecordStore, StoreError, StoreResult};
use log::{info, warn};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapturePhase {
    #[default]
    Idle,
    AwaitingLocation,
    Ready,
}

/// Editable fields of the admin form.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CaptureForm {
    pub name: String,
    pub category: String,
    pub power_type: PowerType,
    pub accepts_card_payment: bool,
    pub photo_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("admin mode is not enabled")]
    NotAdmin,
    #[error("the admin panel is not open")]
    NotOpen,
    #[error("a business name is required")]
    EmptyName,
    #[error("pick a location on the map first")]
    NoLocation,
    #[error("a save is already in progress")]
    Busy,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Identifies one in-flight insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitTicket(u64);

#[derive(Debug, Default)]
pub struct AdminCaptureFlow {
    admin: bool,
    phase: CapturePhase,
    picked: Option<Coordinates>,
    form: CaptureForm,
    last_error: Option<String>,
    issued: u64,
    in_flight: Option<u64>,
}

impl AdminCaptureFlow {
    pub fn new(admin: bool) -> Self {
        Self {
            admin,
            ..Self::default()
        }
    }

    pub fn is_admin(&self) -> bool {
        self.admin
    }

    pub fn phase(&self) -> CapturePhase {
        self.phase
    }

    pub fn picked(&self) -> Option<Coordinates> {
        self.picked
    }

    pub fn form(&self) -> &CaptureForm {
        &self.form
    }

    /// Mutable form access; edits are only taken while the panel is open.
    pub fn form_mut(&mut self) -> Option<&mut CaptureForm> {
        match self.phase {
            CapturePhase::Idle => None,
            CapturePhase::AwaitingLocation | CapturePhase::Ready => Some(&mut self.form),
        }
    }

    /// Error text of the last failed save, verbatim.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Opens the admin panel. Reopening an open panel keeps its contents.
    pub fn open(&mut self) -> Result<(), CaptureError> {
        if !self.admin {
            return Err(CaptureError::NotAdmin);
        }
        if self.phase == CapturePhase::Idle {
            self.phase = CapturePhase::AwaitingLocation;
        }
        Ok(())
    }

    /// Records a map click. Ignored unless the panel is open.
    pub fn pick(&mut self, at: Coordinates) -> bool {
        match self.phase {
            CapturePhase::Idle => false,
            CapturePhase::AwaitingLocation | CapturePhase::Ready => {
                self.picked = Some(at);
                self.phase = CapturePhase::Ready;
                true
            }
        }
    }

    pub fn can_submit(&self) -> bool {
        self.phase == CapturePhase::Ready
            && self.in_flight.is_none()
            && self.picked.is_some()
            && !self.form.name.trim().is_empty()
    }

    /// Validates the form and marks an insert as in flight.
    pub fn begin_submit(&mut self) -> Result<(SubmitTicket, NewBusinessRecord), CaptureError> {
        if self.phase == CapturePhase::Idle {
            return Err(CaptureError::NotOpen);
        }
        if self.in_flight.is_some() {
            return Err(CaptureError::Busy);
        }
        if self.form.name.trim().is_empty() {
            return Err(CaptureError::EmptyName);
        }
        let Some(position) = self.picked else {
            return Err(CaptureError::NoLocation);
        };

        let record = NewBusinessRecord::new(&self.form.name, &self.form.category, position)
            .with_power_type(self.form.power_type)
            .with_card_payment(self.form.accepts_card_payment)
            .with_photo_url(Some(self.form.photo_url.as_str()));

        self.issued += 1;
        self.in_flight = Some(self.issued);
        self.last_error = None;
        Ok((SubmitTicket(self.issued), record))
    }

    /// Applies the outcome of the insert started with `ticket`.
    ///
    /// Returns `true` when the directory should be refreshed, which is the
    /// case for every successful insert, even one whose panel was cancelled
    /// in the meantime.
    pub fn finish_submit(
        &mut self,
        ticket: SubmitTicket,
        result: &StoreResult<BusinessRecord>,
    ) -> bool {
        let current = self.in_flight == Some(ticket.0);
        if current {
            self.in_flight = None;
        }

        match result {
            Ok(record) => {
                info!("business {} saved as {}", record.name, record.id);
                if current {
                    self.reset();
                }
                true
            }
            Err(err) => {
                warn!("saving business failed: {err}");
                if current {
                    self.last_error = Some(err.to_string());
                }
                false
            }
        }
    }

    /// Closes the panel from any state, discarding the pick and the form.
    /// An insert already sent is not recalled.
    pub fn cancel(&mut self) {
        self.in_flight = None;
        self.reset();
    }

    /// Runs a complete save against `store`.
    pub async fn save<S: RecordStore + ?Sized>(
        &mut self,
        store: &S,
    ) -> Result<BusinessRecord, CaptureError> {
        let (ticket, record) = self.begin_submit()?;
        let result = store.insert(record).await;
        self.finish_submit(ticket, &result);
        Ok(result?)
    }

    fn reset(&mut self) {
        self.phase = CapturePhase::Idle;
        self.picked = None;
        self.form = CaptureForm::default();
        self.last_error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::DirectoryState;
    use crate::model::RecordId;
    use crate::store::memory::MemoryStore;

    fn freetown() -> Coordinates {
        Coordinates::new(-13.2, 8.5)
    }

    fn ready_flow(name: &str) -> AdminCaptureFlow {
        let mut flow = AdminCaptureFlow::new(true);
        flow.open().unwrap();
        flow.pick(freetown());
        flow.form_mut().unwrap().name = name.to_string();
        flow
    }

    #[test]
    fn non_admin_cannot_open() {
        let mut flow = AdminCaptureFlow::new(false);
        assert_eq!(flow.open(), Err(CaptureError::NotAdmin));
        assert_eq!(flow.phase(), CapturePhase::Idle);
    }

    #[test]
    fn clicks_are_ignored_while_idle() {
        let mut flow = AdminCaptureFlow::new(true);
        assert!(!flow.pick(freetown()));
        assert_eq!(flow.picked(), None);
        assert!(flow.form_mut().is_none());
    }

    #[test]
    fn open_then_click_reaches_ready_and_click_again_moves_pick() {
        let mut flow = AdminCaptureFlow::new(true);
        flow.open().unwrap();
        assert_eq!(flow.phase(), CapturePhase::AwaitingLocation);

        assert!(flow.pick(freetown()));
        assert_eq!(flow.phase(), CapturePhase::Ready);
        assert_eq!(flow.picked(), Some(freetown()));

        flow.pick(Coordinates::new(-13.1, 8.4));
        assert_eq!(flow.phase(), CapturePhase::Ready);
        assert_eq!(flow.picked(), Some(Coordinates::new(-13.1, 8.4)));
    }

    #[tokio::test]
    async fn save_with_empty_name_stays_ready_without_insert() {
        let store = MemoryStore::new();
        let mut flow = ready_flow("   ");
        assert!(!flow.can_submit());

        let err = flow.save(&store).await.unwrap_err();
        assert_eq!(err, CaptureError::EmptyName);
        assert_eq!(flow.phase(), CapturePhase::Ready);
        assert_eq!(flow.picked(), Some(freetown()));
        assert_eq!(store.insert_calls(), 0);
    }

    #[tokio::test]
    async fn save_without_location_is_rejected() {
        let store = MemoryStore::new();
        let mut flow = AdminCaptureFlow::new(true);
        flow.open().unwrap();
        flow.form_mut().unwrap().name = "Kiosk".to_string();
        assert!(!flow.can_submit());

        assert_eq!(flow.save(&store).await.unwrap_err(), CaptureError::NoLocation);
        assert_eq!(flow.phase(), CapturePhase::AwaitingLocation);
        assert_eq!(store.insert_calls(), 0);
    }

    #[tokio::test]
    async fn failed_insert_keeps_form_and_surfaces_message() {
        let store = MemoryStore::new();
        store.fail_with(Some(StoreError::unavailable("connection refused")));
        let mut flow = ready_flow("Ana's Shop");
        flow.form_mut().unwrap().category = "Market".to_string();

        let err = flow.save(&store).await.unwrap_err();
        assert_eq!(
            err,
            CaptureError::Store(StoreError::unavailable("connection refused"))
        );
        assert_eq!(flow.phase(), CapturePhase::Ready);
        assert_eq!(flow.last_error(), Some("store unavailable: connection refused"));
        assert_eq!(flow.form().name, "Ana's Shop");
        assert_eq!(flow.form().category, "Market");
        assert_eq!(flow.picked(), Some(freetown()));
        assert!(flow.can_submit());

        store.fail_with(None);
        let saved = flow.save(&store).await.unwrap();
        assert_eq!(saved.name, "Ana's Shop");
        assert_eq!(flow.last_error(), None);
    }

    #[tokio::test]
    async fn successful_save_resets_and_refresh_lists_the_record() {
        let store = MemoryStore::new();
        let mut flow = ready_flow("Joe Bar");
        {
            let form = flow.form_mut().unwrap();
            form.category = "Restaurant".to_string();
            form.power_type = PowerType::Generator;
            form.photo_url = "https://img.example/joe.jpg".to_string();
        }

        let saved = flow.save(&store).await.unwrap();
        assert_eq!(flow.phase(), CapturePhase::Idle);
        assert_eq!(flow.picked(), None);
        assert_eq!(flow.form(), &CaptureForm::default());

        let mut directory = DirectoryState::new();
        directory.refresh(&store).await;
        let listed = directory.get(&saved.id).unwrap();
        assert_eq!(listed.category, "Restaurant");
        assert_eq!(listed.power_type, PowerType::Generator);
        assert_eq!(listed.position, freetown());
        assert_eq!(listed.photo_url.as_deref(), Some("https://img.example/joe.jpg"));
    }

    #[test]
    fn second_submit_while_in_flight_is_busy() {
        let mut flow = ready_flow("Kiosk");
        let (ticket, record) = flow.begin_submit().unwrap();
        assert_eq!(record.category, "General");
        assert!(flow.is_submitting());
        assert_eq!(flow.begin_submit().unwrap_err(), CaptureError::Busy);

        let stored = record.into_record(RecordId::new("9"));
        assert!(flow.finish_submit(ticket, &Ok(stored)));
        assert!(!flow.is_submitting());
        assert_eq!(flow.phase(), CapturePhase::Idle);
    }

    #[test]
    fn cancel_discards_everything_from_any_state() {
        let mut flow = ready_flow("Kiosk");
        flow.cancel();
        assert_eq!(flow.phase(), CapturePhase::Idle);
        assert_eq!(flow.picked(), None);
        assert_eq!(flow.form(), &CaptureForm::default());

        flow.open().unwrap();
        flow.cancel();
        assert_eq!(flow.phase(), CapturePhase::Idle);
    }

    #[test]
    fn late_completion_after_cancel_leaves_new_session_alone() {
        let mut flow = ready_flow("Kiosk");
        let (ticket, record) = flow.begin_submit().unwrap();
        flow.cancel();

        flow.open().unwrap();
        flow.form_mut().unwrap().name = "Next".to_string();

        let refresh = flow.finish_submit(ticket, &Ok(record.into_record(RecordId::new("1"))));
        assert!(refresh);
        assert_eq!(flow.phase(), CapturePhase::AwaitingLocation);
        assert_eq!(flow.form().name, "Next");

        let (ticket, _) = {
            flow.pick(freetown());
            flow.begin_submit().unwrap()
        };
        let stale_failure = flow.finish_submit(
            SubmitTicket(ticket.0 - 1),
            &Err(StoreError::unavailable("late")),
        );
        assert!(!stale_failure);
        assert_eq!(flow.last_error(), None);
        assert!(flow.is_submitting());
    }
}
