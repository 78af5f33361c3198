//! # State Persistence
//!
//! Ledger state is stored as a single pretty-printed JSON document. Saves go
//! through a sibling temp file and a rename so a crash never leaves a
//! half-written state behind.

use crate::{error::Result, ledger::LedgerState};
use std::path::Path;
use tracing::debug;

/// Write `state` to `path`, replacing any previous file.
pub fn save_state(path: impl AsRef<Path>, state: &LedgerState) -> Result<()> {
    let path = path.as_ref();
    let body = serde_json::to_string_pretty(state)?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    std::fs::write(&tmp, body)?;
    std::fs::rename(&tmp, path)?;

    debug!(
        path = %path.display(),
        markets = state.markets.len(),
        events = state.events.len(),
        "ledger state saved"
    );
    Ok(())
}

/// Read a state previously written by [`save_state`].
pub fn load_state(path: impl AsRef<Path>) -> Result<LedgerState> {
    let path = path.as_ref();
    let body = std::fs::read_to_string(path)?;
    let state: LedgerState = serde_json::from_str(&body)?;
    debug!(path = %path.display(), market_count = state.market_count, "ledger state loaded");
    Ok(state)
}
