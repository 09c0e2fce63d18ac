//! Utility functions and helpers

/// Split a `host:port` pair.
///
/// IPv6 hosts must be bracketed (`[::1]:5677`); the brackets are stripped from the
/// returned host. Returns `None` for an empty host or a port outside `1..=65535`.
pub fn split_host_port(value: &str) -> Option<(&str, u16)> {
    let (host, port) = value.trim().rsplit_once(':')?;
    let host = host.strip_prefix('[').and_then(|h| h.strip_suffix(']')).unwrap_or(host);
    if host.is_empty() || (host.contains(':') && !value.trim().starts_with('[')) {
        return None;
    }
    let port = port.parse::<u16>().ok().filter(|p| *p != 0)?;
    Some((host, port))
}

/// Serde adapter storing a [`std::time::Duration`] as (fractional) seconds.
///
/// ```rust,ignore
/// #[serde(with = "crate::utils::duration_secs")]
/// pub interval: Duration,
/// ```
pub mod duration_secs {
    use std::time::Duration;

    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let seconds = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(seconds).map_err(de::Error::custom)
    }
}

/// Convert a [`std::time::Duration`] into its protobuf representation.
///
/// Seconds beyond `i64::MAX` saturate.
pub fn proto_duration(value: std::time::Duration) -> envoy_types::pb::google::protobuf::Duration {
    envoy_types::pb::google::protobuf::Duration {
        seconds: i64::try_from(value.as_secs()).unwrap_or(i64::MAX),
        nanos: value.subsec_nanos() as i32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_split_host_port() {
        assert_eq!(split_host_port("control-plane:5677"), Some(("control-plane", 5677)));
        assert_eq!(split_host_port("127.0.0.1:9090"), Some(("127.0.0.1", 9090)));
        assert_eq!(split_host_port("[::1]:9090"), Some(("::1", 9090)));
    }

    #[test]
    fn test_split_host_port_rejects_malformed() {
        assert_eq!(split_host_port("no-port"), None);
        assert_eq!(split_host_port(":9090"), None);
        assert_eq!(split_host_port("host:0"), None);
        assert_eq!(split_host_port("host:99999"), None);
        assert_eq!(split_host_port("::1:9090"), None);
    }

    #[test]
    fn test_proto_duration_keeps_sub_second_precision() {
        let proto = proto_duration(Duration::from_millis(1500));
        assert_eq!(proto.seconds, 1);
        assert_eq!(proto.nanos, 500_000_000);
    }

    #[test]
    fn test_proto_duration_saturates_huge_values() {
        let proto = proto_duration(Duration::from_secs(u64::MAX));
        assert_eq!(proto.seconds, i64::MAX);

        let timed: Timed = serde_yaml::from_str("interval: 1.0e19").unwrap();
        assert_eq!(proto_duration(timed.interval).seconds, i64::MAX);
    }

    #[derive(serde::Deserialize)]
    struct Timed {
        #[serde(with = "duration_secs")]
        interval: Duration,
    }

    #[test]
    fn test_duration_secs_accepts_fractions() {
        let timed: Timed = serde_yaml::from_str("interval: 0.25").unwrap();
        assert_eq!(timed.interval, Duration::from_millis(250));

        assert!(serde_yaml::from_str::<Timed>("interval: -1").is_err());
    }
}
