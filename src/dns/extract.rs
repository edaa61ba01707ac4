//! Address extraction from resolver output.

use std::net::IpAddr;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::ResolvedAddress;

/// `PING example.com (93.184.216.34) 56(84) bytes of data.`
static PING_BANNER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^PING6?\s+\S+\s+\(([0-9A-Fa-f:.]+)\)")
        .expect("ping banner regex is valid")
});

/// Extracts the answer address from `nslookup` output.
///
/// Every line carrying an `Address` marker is a candidate, except the one
/// identifying the queried server (the `Address` line that follows a
/// `Server:` line). The last remaining candidate wins.
pub fn extract_nslookup_address(output: &str) -> ResolvedAddress {
    let mut in_server_block = false;
    let mut last = None;

    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() {
            in_server_block = false;
            continue;
        }
        if line.starts_with("Server:") {
            in_server_block = true;
            continue;
        }
        if !line.contains("Address") {
            continue;
        }
        if in_server_block {
            in_server_block = false;
            continue;
        }
        if let Some(ip) = address_value(line) {
            last = Some(ip);
        }
    }

    match last {
        Some(ip) => ResolvedAddress::Found(ip),
        None => ResolvedAddress::NotFound,
    }
}

/// Parses the value of an `Address:` / `Address 1:` line.
///
/// Splits at the first colon only so IPv6 values survive, drops a `#port`
/// suffix and any trailing host name.
fn address_value(line: &str) -> Option<String> {
    let (_, value) = line.split_once(':')?;
    let token = value.split_whitespace().next()?;
    let token = token.split('#').next().unwrap_or(token);
    token.parse::<IpAddr>().ok().map(|ip| ip.to_string())
}

/// Extracts the resolved address from the banner line of `ping` output.
pub fn extract_ping_address(output: &str) -> ResolvedAddress {
    PING_BANNER
        .captures(output)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<IpAddr>().ok())
        .map(|ip| ResolvedAddress::Found(ip.to_string()))
        .unwrap_or(ResolvedAddress::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NSLOOKUP_OK: &str = "Server:\t\t127.0.0.53\n\
Address:\t127.0.0.53#53\n\
\n\
Non-authoritative answer:\n\
Name:\texample.com\n\
Address: 93.184.216.34\n";

    #[test]
    fn test_nslookup_skips_server_address() {
        assert_eq!(
            extract_nslookup_address(NSLOOKUP_OK),
            ResolvedAddress::Found("93.184.216.34".into())
        );
    }

    #[test]
    fn test_nslookup_last_answer_wins() {
        let output = format!(
            "{}Name:\texample.com\nAddress: 2606:2800:220:1:248:1893:25c3:1946\n",
            NSLOOKUP_OK
        );
        assert_eq!(
            extract_nslookup_address(&output),
            ResolvedAddress::Found("2606:2800:220:1:248:1893:25c3:1946".into())
        );
    }

    #[test]
    fn test_nslookup_nxdomain_is_not_found() {
        let output = "Server:\t\t127.0.0.53\n\
Address:\t127.0.0.53#53\n\
\n\
** server can't find nosuchdomain.invalid: NXDOMAIN\n";
        assert_eq!(extract_nslookup_address(output), ResolvedAddress::NotFound);
    }

    #[test]
    fn test_nslookup_server_only_on_first_lines() {
        // Server block without a blank separator still excludes its own address
        let output = "Server: 10.0.0.1\nAddress: 10.0.0.1#53\nName: a.example\nAddress: 10.1.2.3\n";
        assert_eq!(
            extract_nslookup_address(output),
            ResolvedAddress::Found("10.1.2.3".into())
        );
    }

    #[test]
    fn test_nslookup_busybox_format() {
        let output = "Server:    10.0.0.1\n\
Address 1: 10.0.0.1 resolver.local\n\
\n\
Name:      example.com\n\
Address 1: 93.184.216.34 example.com\n";
        assert_eq!(
            extract_nslookup_address(output),
            ResolvedAddress::Found("93.184.216.34".into())
        );
    }

    #[test]
    fn test_nslookup_ignores_garbage_values() {
        assert_eq!(
            extract_nslookup_address("Address: not-an-ip\n"),
            ResolvedAddress::NotFound
        );
        assert_eq!(extract_nslookup_address(""), ResolvedAddress::NotFound);
    }

    #[test]
    fn test_ping_banner() {
        let output = "PING example.com (93.184.216.34) 56(84) bytes of data.\n\
64 bytes from 93.184.216.34: icmp_seq=1 ttl=56 time=11.2 ms\n";
        assert_eq!(
            extract_ping_address(output),
            ResolvedAddress::Found("93.184.216.34".into())
        );
    }

    #[test]
    fn test_ping_without_banner() {
        assert_eq!(
            extract_ping_address("ping: nosuchhost.invalid: Name or service not known"),
            ResolvedAddress::NotFound
        );
    }
}
