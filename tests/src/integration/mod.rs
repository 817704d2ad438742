//! Cross-subsystem flows, driven through `portal-runtime` the way the
//! client portal and the admin console drive them.

pub mod concurrency;
pub mod flows;
pub mod legacy;
