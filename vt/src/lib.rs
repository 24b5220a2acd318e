//! Library crate backing the `vtsend` and `vtrecv` binaries: the send and
//! receive control loops around the wire pipeline.

pub mod receiver;
pub mod sender;
