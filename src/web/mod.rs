//! Web server for browser-based signature analysis.
//!
//! This module provides an upload form and a JSON API using Axum.
//!
//! ## Starting the Server
//!
//! ```text
//! # Start on default port 8000
//! isignify serve
//!
//! # Custom port and auto-open browser
//! isignify serve --port 3000 --open
//!
//! # Bind to all interfaces
//! isignify serve --address 0.0.0.0
//! ```
//!
//! ## API Endpoints
//!
//! - `GET /` - Upload form
//! - `GET /api/v1/` - Welcome message
//! - `POST /api/v1/analyze/` - Run an analysis (multipart form with
//!   `kmer_size`, `run_preprocessor`, `target_genome` and one or more
//!   `background_genomes`)

pub mod server;
