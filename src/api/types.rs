use serde::Deserialize;

// ── Request types ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct BacktestQuery {
    pub days: Option<u32>,
}
