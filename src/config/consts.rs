/// Decimal digits per token (B = 10^9)
pub const DEFAULT_TOKEN_WIDTH: usize = 9;
/// Widest token whose doubled value plus a carry still fits in a `u32` limb
pub const MAX_TOKEN_WIDTH: usize = 9;
/// Default number of worker ranks (N-1)
pub const DEFAULT_WORKERS: usize = 2;
/// Default tracing level when neither config nor RUST_LOG name one
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Rank of the coordinator in every process group
pub const COORDINATOR_RANK: usize = 0;
