//! Network collaborators: RDAP registration data, certificate
//! transparency logs, live TLS handshakes and the optional advisory
//! context analyzer. Every call is bounded by a timeout and failures
//! degrade to each detector's documented default.

pub mod context;
pub mod ctlog;
pub mod rdap;
pub mod tls;
