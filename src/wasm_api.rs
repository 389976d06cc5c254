use rand::rngs::SmallRng;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::store::SaveData;
use crate::{
    GachaConfig, GachaSession, MemoryStore, PullOutcome, PullRejection, TicketLedger, TierTable, rng,
};

#[derive(Serialize)]
struct PullResponse {
    accepted: bool,
    reason: Option<&'static str>,
}

impl From<PullOutcome> for PullResponse {
    fn from(o: PullOutcome) -> Self {
        let reason = match o {
            PullOutcome::Accepted => None,
            PullOutcome::Rejected(PullRejection::InsufficientTickets) => Some("insufficient_tickets"),
            PullOutcome::Rejected(PullRejection::Busy(_)) => Some("busy"),
        };
        Self { accepted: o.accepted(), reason }
    }
}

fn to_js<T: Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

#[wasm_bindgen]
pub struct Gacha {
    session: GachaSession<SmallRng>,
}

#[wasm_bindgen]
impl Gacha {
    /// Fresh session over the built-in catalog.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u32, starting_tickets: u32) -> Result<Gacha, JsValue> {
        Self::build(seed, starting_tickets, MemoryStore::new())
    }

    /// Rebuild a session from values the page saved out of `get_state`.
    pub fn restore(
        seed: u32,
        starting_tickets: u32,
        available: u32,
        total_spent: u32,
        pity_count: u32,
    ) -> Result<Gacha, JsValue> {
        let store = MemoryStore::with_data(SaveData {
            version: 1,
            pity_count: Some(pity_count),
            tickets: Some(TicketLedger::from_parts(available, total_spent.into())),
        });
        Self::build(seed, starting_tickets, store)
    }

    fn build(seed: u32, starting_tickets: u32, store: MemoryStore) -> Result<Gacha, JsValue> {
        let config = GachaConfig { starting_tickets, ..GachaConfig::default() };
        let table = TierTable::builtin().map_err(|e| JsValue::from_str(&e.to_string()))?;
        let session = GachaSession::new(&config, table, rng::seeded(seed as u64), store)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Gacha { session })
    }

    /// `{ accepted, reason }`; reason is `insufficient_tickets` or `busy` when refused.
    pub fn request_pull(&mut self) -> JsValue {
        to_js(&PullResponse::from(self.session.request_pull()))
    }

    pub fn phase(&self) -> JsValue {
        to_js(&self.session.phase())
    }

    /// The pending result, or `null`.
    pub fn current_result(&self) -> JsValue {
        to_js(&self.session.current_result())
    }

    pub fn acknowledge_result(&mut self) -> bool {
        self.session.acknowledge_result()
    }

    pub fn add_tickets(&mut self, amount: u32) {
        self.session.add_tickets(amount);
    }

    pub fn ticket_balance(&self) -> JsValue {
        to_js(&self.session.ticket_balance())
    }

    pub fn reset_tickets(&mut self, amount: Option<u32>) {
        self.session.reset_tickets(amount);
    }

    pub fn get_state(&self) -> JsValue {
        to_js(&self.session.snapshot())
    }
}
