//! Pull lifecycle: `ready -> pulling -> reveal -> ready`.
//!
//! [`GachaSession`] owns the ticket ledger, pity counter and draw engine. A pull
//! is accepted only from `ready` and only after a ticket was actually spent, so
//! repeated requests before the result is acknowledged can never debit twice.
//! The session never waits on timers: it reaches `reveal` as soon as the draw
//! is done and reports each step to its listeners, leaving animation timing to
//! the presentation layer.
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::mpsc::Sender;

use crate::config::GachaConfig;
use crate::engine::{DrawEngine, DrawResult};
use crate::error::ConfigError;
use crate::ledger::{TicketBalance, TicketLedger};
use crate::pity::PityCounter;
use crate::rng::RandomSource;
use crate::store::Store;
use crate::tier::{Item, Tier, TierTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Ready,
    Pulling,
    Reveal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullRejection {
    InsufficientTickets,
    /// A pull is already in flight or awaiting acknowledgement.
    Busy(Phase),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullOutcome {
    Accepted,
    Rejected(PullRejection),
}

impl PullOutcome {
    pub fn accepted(&self) -> bool {
        matches!(self, PullOutcome::Accepted)
    }
}

/// Lifecycle hooks for the presentation layer. All methods default to no-ops.
pub trait SessionListener {
    fn phase_changed(&mut self, _phase: Phase) {}
    fn result_ready(&mut self, _result: &DrawResult) {}
    fn result_dismissed(&mut self, _result: &DrawResult) {}
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    PhaseChanged(Phase),
    ResultReady(DrawResult),
    ResultDismissed(DrawResult),
}

impl SessionListener for Sender<SessionEvent> {
    fn phase_changed(&mut self, phase: Phase) {
        let _ = self.send(SessionEvent::PhaseChanged(phase));
    }

    fn result_ready(&mut self, result: &DrawResult) {
        let _ = self.send(SessionEvent::ResultReady(result.clone()));
    }

    fn result_dismissed(&mut self, result: &DrawResult) {
        let _ = self.send(SessionEvent::ResultDismissed(result.clone()));
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub current_result: Option<DrawResult>,
    pub tickets: TicketBalance,
    pub pity_count: u32,
    pub draws_until_guarantee: u32,
}

pub struct GachaSession<R> {
    engine: DrawEngine<R>,
    ledger: TicketLedger,
    pity: PityCounter,
    store: Box<dyn Store>,
    listeners: Vec<Box<dyn SessionListener>>,
    phase: Phase,
    current: Option<DrawResult>,
    history: VecDeque<DrawResult>,
    history_limit: usize,
    reset_amount: u32,
}

impl<R: RandomSource> GachaSession<R> {
    /// Build a session, restoring pity and tickets from `store`. Unreadable
    /// saved state is logged and replaced by a fresh start.
    pub fn new(
        config: &GachaConfig,
        table: TierTable,
        rng: R,
        store: impl Store + 'static,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut store: Box<dyn Store> = Box::new(store);

        let pity_count = store.load_pity_count().unwrap_or_else(|e| {
            log::warn!("failed to load pity count, starting at 0: {e}");
            None
        });
        let ledger = store.load_ledger().unwrap_or_else(|e| {
            log::warn!("failed to load tickets, starting fresh: {e}");
            None
        });

        let pity = PityCounter::with_count(config.pity_threshold, pity_count.unwrap_or(0))?;
        let ledger = ledger.unwrap_or_else(|| TicketLedger::new(config.starting_tickets));
        log::info!(
            "session ready: {} tickets, pity {}/{}",
            ledger.available(),
            pity.consecutive_draws(),
            pity.threshold()
        );

        Ok(Self {
            engine: DrawEngine::new(table, rng),
            ledger,
            pity,
            store,
            listeners: Vec::new(),
            phase: Phase::Ready,
            current: None,
            history: VecDeque::new(),
            history_limit: config.history_limit,
            reset_amount: config.starting_tickets,
        })
    }

    pub fn add_listener(&mut self, listener: impl SessionListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Try `ready -> pulling -> reveal`. The ticket is spent before the engine
    /// runs; a refused pull changes nothing and never touches the engine.
    pub fn request_pull(&mut self) -> PullOutcome {
        if self.phase != Phase::Ready {
            log::debug!("pull refused, session is {:?}", self.phase);
            return PullOutcome::Rejected(PullRejection::Busy(self.phase));
        }
        if !self.ledger.try_spend() {
            log::debug!("pull refused, no tickets");
            return PullOutcome::Rejected(PullRejection::InsufficientTickets);
        }
        self.persist_ledger();
        self.set_phase(Phase::Pulling);

        let result = self.engine.draw(&mut self.pity);
        self.persist_pity();
        log::info!(
            "{} -> {} ({}){}",
            result.id,
            result.item.name,
            result.tier,
            if result.pity_triggered { " [pity]" } else { "" }
        );

        self.history.push_back(result.clone());
        while self.history.len() > self.history_limit {
            self.history.pop_front();
        }
        self.current = Some(result);
        self.set_phase(Phase::Reveal);
        if let Some(result) = &self.current {
            for listener in &mut self.listeners {
                listener.result_ready(result);
            }
        }
        PullOutcome::Accepted
    }

    /// `reveal -> ready` once the presentation layer has shown the result.
    /// Returns false outside `reveal`.
    pub fn acknowledge_result(&mut self) -> bool {
        if self.phase != Phase::Reveal {
            return false;
        }
        let dismissed = self.current.take();
        self.set_phase(Phase::Ready);
        if let Some(result) = &dismissed {
            for listener in &mut self.listeners {
                listener.result_dismissed(result);
            }
        }
        true
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_result(&self) -> Option<&DrawResult> {
        self.current.as_ref()
    }

    pub fn add_tickets(&mut self, amount: u32) {
        if amount == 0 {
            return;
        }
        self.ledger.add(amount);
        log::info!("added {amount} tickets, {} available", self.ledger.available());
        self.persist_ledger();
    }

    /// Set the balance to `amount`, or to the configured starting balance.
    pub fn reset_tickets(&mut self, amount: Option<u32>) {
        let amount = amount.unwrap_or(self.reset_amount);
        self.ledger.reset(amount);
        log::info!("tickets reset to {amount}");
        self.persist_ledger();
    }

    pub fn set_tickets(&mut self, amount: i64) {
        self.ledger.set(amount);
        self.persist_ledger();
    }

    pub fn ticket_balance(&self) -> TicketBalance {
        self.ledger.balance()
    }

    pub fn pity(&self) -> &PityCounter {
        &self.pity
    }

    pub fn engine(&self) -> &DrawEngine<R> {
        &self.engine
    }

    /// Recent results, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &DrawResult> {
        self.history.iter()
    }

    /// Swap one tier's items without restarting. See [`TierTable::replace_items`].
    pub fn replace_items(&mut self, tier: Tier, items: Vec<Item>) -> Result<(), ConfigError> {
        self.engine.replace_items(tier, items)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            current_result: self.current.clone(),
            tickets: self.ledger.balance(),
            pity_count: self.pity.consecutive_draws(),
            draws_until_guarantee: self.pity.draws_until_guarantee(),
        }
    }

    fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
        for listener in &mut self.listeners {
            listener.phase_changed(phase);
        }
    }

    fn persist_ledger(&mut self) {
        if let Err(e) = self.store.save_ledger(&self.ledger) {
            log::warn!("failed to save tickets: {e}");
        }
    }

    fn persist_pity(&mut self) {
        if let Err(e) = self.store.save_pity_count(self.pity.consecutive_draws()) {
            log::warn!("failed to save pity count: {e}");
        }
    }
}
