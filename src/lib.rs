// Library root
// -----------
// This crate exposes a small library surface for the batch client. The
// binary (`main.rs`) uses these modules to implement the CLI.
//
// Module responsibilities:
// - `config`: Command-line surface and the immutable run configuration,
//   including the analysis metadata sent with every upload.
// - `api`: Encapsulates HTTP interactions with the analyzer server
//   (multipart upload of one audio file plus metadata).
// - `batch`: Directory scanning, result persistence and the sequential
//   run loop tying the other two together.
//
// Keeping this separation makes it easier to test the API and batch
// logic against a mock server without going through the binary.
pub mod api;
pub mod batch;
pub mod config;
