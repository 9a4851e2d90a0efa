//! # Session-Keys Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/
//! │   └── session_benchmarks.rs   # Signing and hashing throughput
//! └── src/integration/
//!     ├── ethereum_flow.rs        # Wallet → session → action on an EVM chain
//!     └── cross_family.rs         # Every family, persistence, verification
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p sk-tests
//! cargo bench -p sk-tests
//! ```

pub mod integration;
