//! Core logic for a `BitTorrent` UDP tracker frontend ([BEP 15]).
//!
//! In the UDP tracker protocol, clients initiate communication by obtaining
//! a connection ID from the server. The connection ID safeguards against IP
//! spoofing: follow-up announce and scrape packets must echo it, proving the
//! client receives traffic at its claimed source address.
//!
//! To keep the server stateless, the connection ID is derived from the
//! client address and the time of issuance with a keyed MAC instead of being
//! remembered per client. See [`connection_id`] for the construction and
//! [`pool`] for reusing generator instances across request handlers.
//!
//! [BEP 15]: https://www.bittorrent.org/beps/bep_0015.html
pub mod connection_id;
pub mod error;
pub mod pool;
