//! Maps a validated [`Configuration`] onto dnsmasq command-line tokens.

use dnsmasq_config::Configuration;

/// Builds the dnsmasq argument list for `config`.
///
/// Token order is fixed: interface, listen address, DHCP range, port,
/// authoritative flag, domain, pid file, then one `--dhcp-host` pair per
/// static binding in input order. Optional tokens are omitted rather than
/// emitted empty.
#[must_use]
pub fn build_arguments(config: &Configuration) -> Vec<String> {
    let mut arguments = vec![
        String::from("--interface"),
        config.interface().to_owned(),
        String::from("--listen-address"),
        config.listen_address().to_string(),
        format!(
            "--dhcp-range={},{},{},{}",
            config.begin_ip(),
            config.end_ip(),
            config.netmask(),
            config.lease_length()
        ),
        format!("--port={}", config.port()),
    ];
    if config.authoritative() {
        arguments.push(String::from("--dhcp-authoritative"));
    }
    if let Some(domain) = config.domain() {
        arguments.push(String::from("--domain"));
        arguments.push(domain.to_owned());
    }
    arguments.push(format!("--pid-file={}", config.pid_file().display()));
    for host in config.hosts() {
        arguments.push(String::from("--dhcp-host"));
        arguments.push(format!("{},{}", host.mac_addr(), host.ip()));
    }
    arguments
}
