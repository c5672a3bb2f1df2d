//! assemblyai-tool - command-line client for the AssemblyAI transcription service
//!
//! Uploads media files, runs transcription jobs and renders the results as
//! text, paragraphs, speaker utterances, subtitles or raw JSON. Whole
//! directories are transcribed through a two-stage pipeline with separate
//! caps on concurrent uploads and concurrently processing jobs.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Value objects, formatting, batch bookkeeping and errors
//! - **Application**: Use cases and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (AssemblyAI HTTP client, credentials, config file)
//! - **CLI**: Command-line interface, progress displays and logging

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
