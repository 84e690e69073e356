//! Port implementations backed by the wallet store.

mod wallet_store;
