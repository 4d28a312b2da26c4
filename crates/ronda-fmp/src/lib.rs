//! Financial Modeling Prep (FMP) provider for ronda.
//!
//! This crate provides a client for fetching quarterly earnings, consensus
//! analyst estimates and quotes from the
//! [Financial Modeling Prep](https://financialmodelingprep.com/) API, and
//! implements ronda's [`EarningsDataProvider`](ronda_traits::EarningsDataProvider)
//! and [`PriceProvider`](ronda_traits::PriceProvider) on top of it.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ronda_fmp::FmpClient;
//! use ronda_traits::{EarningsDataProvider, PriceProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FmpClient::from_env()?;
//!
//!     // Quarterly surprises and forward estimates
//!     let snapshot = client.fetch_earnings("AAPL").await?;
//!
//!     // Last price
//!     let price = client.fetch_price("AAPL").await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Environment Variables
//!
//! Set `FMP_API_KEY` in your environment or `.env` file:
//!
//! ```bash
//! FMP_API_KEY=your_api_key_here
//! ```

mod client;
mod error;
mod provider;
mod types;

pub use client::FmpClient;
pub use error::FmpError;
pub use provider::forward_estimates;
pub use types::*;

/// Result type for FMP operations.
pub type Result<T> = std::result::Result<T, FmpError>;
