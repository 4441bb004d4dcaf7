//! Attendance view model: the single owner of a user's attendance state.
//!
//! State changes go through [`AttendanceViewModel::reduce`], a pure
//! function that proposes the next state. Local events (location refresh,
//! ticks) are applied at once with [`AttendanceViewModel::dispatch`]; user
//! actions that must reach the system of record go through
//! [`AttendanceViewModel::submit`] and are committed only after the store
//! accepted them.

use crate::core::calculator::break_ledger::{BreakLedger, DEFAULT_BREAK_BUDGET_MINUTES};
use crate::core::calculator::proximity::verification_status;
use crate::core::calculator::session_timer::{
    self, DEFAULT_EXPECTED_MINUTES, elapsed_minutes, progress_fraction, window_end,
};
use crate::core::location::LocationError;
use crate::core::store::{AttendanceStore, DayRecord};
use crate::errors::{AppError, AppResult};
use crate::models::break_record::BreakType;
use crate::models::geo::{LocationReading, OfficeSite};
use crate::models::session::AttendanceSession;
use crate::models::status::{AttendanceStatus, ProximityResult};
use crate::models::work_mode::WorkMode;
use crate::utils::formatting::format_duration;
use chrono::NaiveDateTime;

/// Tunables taken from the configuration file.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSettings {
    pub expected_minutes: i64,
    pub break_budget_minutes: i64,
    pub default_mode: WorkMode,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            expected_minutes: DEFAULT_EXPECTED_MINUTES,
            break_budget_minutes: DEFAULT_BREAK_BUDGET_MINUTES,
            default_mode: WorkMode::Office,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttendanceState {
    pub session: Option<AttendanceSession>,
    pub ledger: BreakLedger,
    pub location: Option<LocationReading>,
    /// Set when the latest refresh failed; the prior reading is kept but
    /// no longer counts for verification.
    pub location_error: Option<LocationError>,
    pub last_tick: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    CheckIn { mode: WorkMode },
    CheckOut,
    StartBreak { kind: BreakType },
    EndBreak,
    LocationRefreshed(LocationReading),
    LocationFailed(LocationError),
    Tick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    CheckIn,
    CheckOut,
    StartBreak,
    EndBreak,
    LocationRefresh,
    Tick,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::CheckIn => "check-in",
            ActionKind::CheckOut => "check-out",
            ActionKind::StartBreak => "break start",
            ActionKind::EndBreak => "break end",
            ActionKind::LocationRefresh => "location refresh",
            ActionKind::Tick => "tick",
        }
    }

    /// Actions the system of record must accept before they take effect.
    pub fn is_persisted(&self) -> bool {
        matches!(
            self,
            ActionKind::CheckIn | ActionKind::CheckOut | ActionKind::StartBreak | ActionKind::EndBreak
        )
    }
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::CheckIn { .. } => ActionKind::CheckIn,
            Action::CheckOut => ActionKind::CheckOut,
            Action::StartBreak { .. } => ActionKind::StartBreak,
            Action::EndBreak => ActionKind::EndBreak,
            Action::LocationRefreshed(_) | Action::LocationFailed(_) => {
                ActionKind::LocationRefresh
            }
            Action::Tick => ActionKind::Tick,
        }
    }
}

/// What an accepted transition has to save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    CheckedIn,
    /// `closed_break` is the id of a break auto-closed by the check-out.
    CheckedOut { closed_break: Option<i64> },
    BreakStarted,
    BreakEnded { break_id: i64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub kind: ActionKind,
    pub effect: Effect,
    pub next: AttendanceState,
}

/// Rejects overlapping persisted submissions.
#[derive(Debug, Default)]
pub struct SubmitGuard {
    in_flight: Option<ActionKind>,
}

impl SubmitGuard {
    pub fn begin(&mut self, kind: ActionKind) -> AppResult<()> {
        if let Some(current) = self.in_flight {
            return Err(AppError::SubmitInFlight(current.as_str().to_string()));
        }
        self.in_flight = Some(kind);
        Ok(())
    }

    pub fn finish(&mut self, kind: ActionKind) {
        if self.in_flight == Some(kind) {
            self.in_flight = None;
        }
    }

    pub fn in_flight(&self) -> Option<ActionKind> {
        self.in_flight
    }
}

/// A transition accepted locally and waiting for the store.
#[derive(Debug)]
pub struct PendingSubmit {
    transition: Transition,
}

impl PendingSubmit {
    pub fn kind(&self) -> ActionKind {
        self.transition.kind
    }

    pub fn effect(&self) -> Effect {
        self.transition.effect
    }

    pub fn proposed(&self) -> &AttendanceState {
        &self.transition.next
    }

    /// Save the transition, recording ids assigned by the store.
    pub fn persist(&mut self, store: &mut dyn AttendanceStore) -> AppResult<()> {
        let next = &mut self.transition.next;

        match self.transition.effect {
            Effect::None => Ok(()),

            Effect::CheckedIn => {
                let session = next.session.as_mut().ok_or_else(missing_session)?;
                session.id = store.save_check_in(session)?;
                Ok(())
            }

            Effect::CheckedOut { closed_break } => {
                let record = match closed_break {
                    Some(id) => Some(
                        next.ledger
                            .records()
                            .iter()
                            .find(|r| r.id == id)
                            .ok_or_else(|| AppError::Other(format!("break {id} not in ledger")))?,
                    ),
                    None => None,
                };
                let session = next.session.as_ref().ok_or_else(missing_session)?;
                store.save_check_out(session, record)
            }

            Effect::BreakStarted => {
                let session_id = next.session.as_ref().ok_or_else(missing_session)?.id;
                let record = next.ledger.open_record_mut().ok_or_else(|| {
                    AppError::Other("started break missing from ledger".into())
                })?;
                record.id = store.save_break_start(session_id, record)?;
                Ok(())
            }

            Effect::BreakEnded { break_id } => {
                let record = next
                    .ledger
                    .records()
                    .iter()
                    .find(|r| r.id == break_id)
                    .ok_or_else(|| AppError::Other(format!("break {break_id} not in ledger")))?;
                store.save_break_end(record)
            }
        }
    }
}

fn missing_session() -> AppError {
    AppError::Other("transition has no session".into())
}

fn not_checked_in() -> AppError {
    AppError::InvalidTransition("not checked in.".into())
}

#[derive(Debug)]
pub struct AttendanceViewModel {
    employee_id: String,
    offices: Vec<OfficeSite>,
    settings: ViewSettings,
    state: AttendanceState,
    guard: SubmitGuard,
}

impl AttendanceViewModel {
    pub fn new(employee_id: &str, offices: Vec<OfficeSite>, settings: ViewSettings) -> Self {
        Self {
            employee_id: employee_id.to_string(),
            offices,
            settings,
            state: AttendanceState::default(),
            guard: SubmitGuard::default(),
        }
    }

    /// Restore from a stored day, if any.
    pub fn from_day(
        employee_id: &str,
        offices: Vec<OfficeSite>,
        settings: ViewSettings,
        day: Option<DayRecord>,
    ) -> Self {
        let mut vm = Self::new(employee_id, offices, settings);
        if let Some(day) = day {
            let ledger = BreakLedger::from_records(day.breaks);
            let mut session = day.session;
            session.is_on_break = !session.is_closed() && ledger.is_on_break();
            vm.state.session = Some(session);
            vm.state.ledger = ledger;
        }
        vm
    }

    pub fn employee_id(&self) -> &str {
        &self.employee_id
    }

    pub fn offices(&self) -> &[OfficeSite] {
        &self.offices
    }

    pub fn settings(&self) -> &ViewSettings {
        &self.settings
    }

    pub fn state(&self) -> &AttendanceState {
        &self.state
    }

    pub fn session(&self) -> Option<&AttendanceSession> {
        self.state.session.as_ref()
    }

    pub fn ledger(&self) -> &BreakLedger {
        &self.state.ledger
    }

    pub fn submitting(&self) -> Option<ActionKind> {
        self.guard.in_flight()
    }

    /// Reading that counts for verification: none after a failed refresh.
    fn usable_reading(state: &AttendanceState) -> Option<&LocationReading> {
        if state.location_error.is_some() {
            None
        } else {
            state.location.as_ref()
        }
    }

    /// Propose the state after `action` at `now` without changing anything.
    pub fn reduce(&self, action: &Action, now: NaiveDateTime) -> AppResult<Transition> {
        let mut next = self.state.clone();

        let effect = match action {
            Action::CheckIn { mode } => {
                if let Some(s) = &next.session {
                    return Err(AppError::InvalidTransition(if s.is_closed() {
                        format!("already checked out for {}; one session per day.", s.date_str())
                    } else if s.date != now.date() {
                        format!(
                            "the session of {} is still open since {}; check out first.",
                            s.date_str(),
                            s.check_in_str()
                        )
                    } else {
                        format!("already checked in since {}.", s.check_in_str())
                    }));
                }

                let mut session = session_timer::start(&self.employee_id, *mode, now);
                let proximity =
                    verification_status(*mode, Self::usable_reading(&next), &self.offices);
                session.verification = proximity.status;
                session.site_id = proximity.site.map(|s| s.id);

                next.session = Some(session);
                next.ledger = BreakLedger::new();
                Effect::CheckedIn
            }

            Action::CheckOut => {
                let session = next.session.as_mut().ok_or_else(not_checked_in)?;
                if !session.is_checked_in || session.is_closed() {
                    return Err(not_checked_in());
                }
                if let Some(check_in) = session.check_in_time
                    && now < check_in
                {
                    return Err(AppError::InvalidTransition(format!(
                        "check-out cannot precede check-in ({}).",
                        session.check_in_str()
                    )));
                }

                let closed_break = if next.ledger.is_on_break() {
                    Some(next.ledger.close_open(now)?.id)
                } else {
                    None
                };

                session.check_out_time = Some(now);
                session.is_checked_in = false;
                session.is_on_break = false;
                Effect::CheckedOut { closed_break }
            }

            Action::StartBreak { kind } => {
                let session = next.session.as_mut().ok_or_else(not_checked_in)?;
                let record = crate::core::calculator::break_ledger::start_break(session, *kind, now)?;
                next.ledger.push(record)?;
                session.is_on_break = true;
                Effect::BreakStarted
            }

            Action::EndBreak => {
                let session = next.session.as_mut().ok_or_else(not_checked_in)?;
                if !session.is_on_break {
                    return Err(AppError::InvalidTransition(
                        "no break in progress to end.".into(),
                    ));
                }
                let closed = next.ledger.close_open(now)?;
                session.is_on_break = false;
                Effect::BreakEnded {
                    break_id: closed.id,
                }
            }

            Action::LocationRefreshed(reading) => {
                next.location = Some(reading.clone());
                next.location_error = None;
                Effect::None
            }

            Action::LocationFailed(err) => {
                next.location_error = Some(err.clone());
                Effect::None
            }

            Action::Tick => {
                next.last_tick = Some(now);
                Effect::None
            }
        };

        Ok(Transition {
            kind: action.kind(),
            effect,
            next,
        })
    }

    /// Apply a local-only event (location refresh, tick) immediately.
    pub fn dispatch(&mut self, action: Action, now: NaiveDateTime) -> AppResult<()> {
        let kind = action.kind();
        if kind.is_persisted() {
            return Err(AppError::InvalidTransition(format!(
                "{} must be submitted to the store.",
                kind.as_str()
            )));
        }
        self.state = self.reduce(&action, now)?.next;
        Ok(())
    }

    /// Start a persisted action. Fails while another submission is pending
    /// or when the transition is not allowed; state is untouched either way.
    pub fn begin_submit(&mut self, action: &Action, now: NaiveDateTime) -> AppResult<PendingSubmit> {
        let kind = action.kind();
        if !kind.is_persisted() {
            return Err(AppError::InvalidTransition(format!(
                "{} is applied locally, not submitted.",
                kind.as_str()
            )));
        }

        self.guard.begin(kind)?;
        match self.reduce(action, now) {
            Ok(transition) => Ok(PendingSubmit { transition }),
            Err(e) => {
                self.guard.finish(kind);
                Err(e)
            }
        }
    }

    /// Finish a submission with the outcome of its save. Only a successful
    /// save changes the session and the break ledger.
    pub fn complete_submit(
        &mut self,
        pending: PendingSubmit,
        outcome: AppResult<()>,
    ) -> AppResult<Effect> {
        let kind = pending.transition.kind;
        self.guard.finish(kind);

        match outcome {
            Ok(()) => Ok(self.commit(pending.transition)),
            Err(e) => Err(AppError::Persistence(format!("{}: {}", kind.as_str(), e))),
        }
    }

    /// Install a persisted transition. Only the session and the break
    /// ledger are taken from it; location and tick state stay current.
    pub fn commit(&mut self, transition: Transition) -> Effect {
        self.state.session = transition.next.session;
        self.state.ledger = transition.next.ledger;
        transition.effect
    }

    /// Guard, reduce, persist and commit in one step. Local events are
    /// dispatched directly and never reach the store.
    pub fn submit(
        &mut self,
        action: Action,
        now: NaiveDateTime,
        store: &mut dyn AttendanceStore,
    ) -> AppResult<Effect> {
        if !action.kind().is_persisted() {
            self.dispatch(action, now)?;
            return Ok(Effect::None);
        }

        let mut pending = self.begin_submit(&action, now)?;
        let outcome = pending.persist(store);
        self.complete_submit(pending, outcome)
    }

    /// Proximity of the current reading for the session's (or default) mode.
    pub fn proximity(&self) -> ProximityResult {
        let mode = self
            .session()
            .map(|s| s.work_mode)
            .unwrap_or(self.settings.default_mode);
        verification_status(mode, Self::usable_reading(&self.state), &self.offices)
    }

    /// UI-facing status at `now`. Cheap to recompute on every change or tick.
    pub fn snapshot(&self, now: NaiveDateTime) -> AttendanceStatus {
        let session = self.session();
        let records = self.state.ledger.records();

        let worked = session
            .map(|s| elapsed_minutes(s, records, now))
            .unwrap_or(0);
        let current = match session {
            Some(s) if s.is_checked_in && !s.is_closed() => worked,
            _ => 0,
        };

        let break_end = session.map(|s| window_end(s, now)).unwrap_or(now);
        let break_budget = self
            .state
            .ledger
            .budget(break_end, self.settings.break_budget_minutes);

        AttendanceStatus {
            is_checked_in: session.is_some_and(|s| s.is_checked_in && !s.is_closed()),
            is_on_break: session.is_some_and(|s| s.is_on_break),
            work_mode: session
                .map(|s| s.work_mode)
                .unwrap_or(self.settings.default_mode),
            check_in_time: session.and_then(|s| s.check_in_time),
            check_out_time: session.and_then(|s| s.check_out_time),
            current_session_duration: format_duration(current),
            current_session_minutes: current,
            total_work_today: format_duration(worked),
            total_work_minutes: worked,
            break_time: format_duration(break_budget.used_minutes),
            break_minutes: break_budget.used_minutes,
            progress: progress_fraction(worked, self.settings.expected_minutes),
            break_budget,
            location: self.state.location.clone(),
            proximity: self.proximity(),
        }
    }
}
