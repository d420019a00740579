use napi::Result as NapiResult;
use napi_derive::napi;

use mortgage_core::amortization::calculator::{self, MortgageInput};
use mortgage_core::amortization::schedule::{self, AmortizationInput};
use mortgage_core::history::{HistoryStore, JsonFileHistoryStore, NewHistoryEntry};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_monthly_payment(principal: f64, annual_rate_percent: f64, term_years: u32) -> f64 {
    mortgage_core::amortization::compute_monthly_payment(principal, annual_rate_percent, term_years)
}

#[napi]
pub fn generate_schedule(input_json: String) -> NapiResult<String> {
    let input: AmortizationInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = schedule::build_amortization(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_mortgage(input_json: String) -> NapiResult<String> {
    let input: MortgageInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = calculator::calculate_mortgage(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// History
//
// Each call opens a fresh store on `path`, so the store's lock only covers
// that one call. These functions are synchronous and run on the JS thread,
// which keeps calls from one addon instance in order; other processes or
// worker threads writing the same file are not serialized against them.
// ---------------------------------------------------------------------------

/// Saved entries as a JSON array, newest first.
#[napi]
pub fn history_list(path: String) -> NapiResult<String> {
    let store = JsonFileHistoryStore::open(path).map_err(to_napi_error)?;
    let entries = store.list().map_err(to_napi_error)?;
    serde_json::to_string(&entries).map_err(to_napi_error)
}

/// Saves `{ inputs, results, label? }` and returns the stored entry as JSON.
/// Opens the store for this call only; see the note above.
#[napi]
pub fn history_add(path: String, entry_json: String) -> NapiResult<String> {
    let entry: NewHistoryEntry = serde_json::from_str(&entry_json).map_err(to_napi_error)?;
    let store = JsonFileHistoryStore::open(path).map_err(to_napi_error)?;
    let saved = store.add(entry).map_err(to_napi_error)?;
    serde_json::to_string(&saved).map_err(to_napi_error)
}

/// `false` when no entry has `id`.
#[napi]
pub fn history_remove(path: String, id: String) -> NapiResult<bool> {
    let store = JsonFileHistoryStore::open(path).map_err(to_napi_error)?;
    store.remove(&id).map_err(to_napi_error)
}
