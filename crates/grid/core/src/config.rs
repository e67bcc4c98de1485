/// Tunable constants shared by the systems.
#[derive(Clone, Copy, Debug, Default)]
pub struct GridConfig;

impl GridConfig {
    /// Chance, in percent, that the windy movement adds a drift step.
    pub const WIND_DRIFT_PERCENT: u32 = 30;

    /// Upper bound on cells explored by one path search.
    pub const MAX_PATH_SEARCH_NODES: usize = 1 << 16;

    /// Seed used when a snapshot carries none.
    pub const DEFAULT_SEED: u64 = 0;

    /// RNG stream selector for wind drift.
    pub const RNG_CONTEXT_WIND: u32 = 1;
}
