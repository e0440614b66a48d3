//! Lifecycle tests driving fake dnsmasq and termination executables.

pub(crate) mod support;

mod lifecycle;
