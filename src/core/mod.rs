//! Core modules for speedlog

pub mod codec;
pub mod facelets;
pub mod scramble;
pub mod log;
pub mod stats;
pub mod store;
pub mod oracle;
pub mod solve;
pub mod api;

pub use codec::CubeStateCodec;
pub use facelets::{verify_reachable, CubieCube};
pub use scramble::{format_moves, parse_moves, ScrambleGenerator};
pub use log::{Appended, SolveLog};
pub use stats::{mean, rolling_average, StatisticsEngine};
pub use store::SolveStore;
pub use oracle::{CommandOracle, OfflineOracle, SolvingOracle};
pub use solve::{solve, SolveOutcome, SolveRequest};
pub use api::{create_router, create_router_with_oracle, run_server, ServerConfig};
