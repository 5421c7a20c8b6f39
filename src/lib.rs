//! Discomfort index service.
//!
//! Resolves a client IP to coordinates, fetches current weather there, and
//! scores perceived comfort on the Thom discomfort index, exposed over a
//! single HTTP endpoint.

pub mod pipeline;
pub mod server;
