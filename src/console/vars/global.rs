//! Global-scope variables.

use crate::console::variable::{
    VarType, Variable, format_bool, join_lines, parse_bool, parse_int,
};
use crate::state::{
    AVAILABLE_SSL_PROTOCOLS, DEFAULT_ANON_IP_LIMIT, DEFAULT_CONNECT_DELAY,
    DEFAULT_MAX_BUFFER_SIZE, DEFAULT_SERVER_THROTTLE, DEFAULT_SSL_CERT_FILE,
    DEFAULT_STATUS_PREFIX, Global,
};

type V = Variable<Global>;

pub fn variables() -> Vec<V> {
    vec![
        V {
            name: "AnonIPLimit",
            ty: VarType::Integer,
            permissions: &[],
            description: "Maximum number of unidentified connections per IP.",
            get: |g, _| g.anon_ip_limit.to_string(),
            set: |g, value, _| {
                g.anon_ip_limit = parse_int(value)?;
                Ok(())
            },
            reset: Some(|g, _| {
                g.anon_ip_limit = DEFAULT_ANON_IP_LIMIT;
                Ok(())
            }),
        },
        V {
            name: "ConnectDelay",
            ty: VarType::Integer,
            permissions: &[],
            description: "Seconds every IRC connection attempt is delayed.",
            get: |g, _| g.connect_delay.to_string(),
            set: |g, value, _| {
                g.connect_delay = parse_int(value)?;
                Ok(())
            },
            reset: Some(|g, _| {
                g.connect_delay = DEFAULT_CONNECT_DELAY;
                Ok(())
            }),
        },
        V {
            name: "HideVersion",
            ty: VarType::Boolean,
            permissions: &[],
            description: "Hide the version number from CTCP VERSION replies and the web interface.",
            get: |g, _| format_bool(g.hide_version),
            set: |g, value, _| {
                g.hide_version = parse_bool(value);
                Ok(())
            },
            reset: Some(|g, _| {
                g.hide_version = false;
                Ok(())
            }),
        },
        V {
            name: "MaxBufferSize",
            ty: VarType::Integer,
            permissions: &[],
            description: "Maximum playback buffer size. Only admins may exceed it.",
            get: |g, _| g.max_buffer_size.to_string(),
            set: |g, value, _| {
                g.max_buffer_size = parse_int(value)?;
                Ok(())
            },
            reset: Some(|g, _| {
                g.max_buffer_size = DEFAULT_MAX_BUFFER_SIZE;
                Ok(())
            }),
        },
        V {
            name: "Motd",
            ty: VarType::List,
            permissions: &[],
            description: "Message of the day lines sent to clients on connect.",
            get: |g, _| join_lines(&g.motd),
            set: |g, value, _| {
                g.add_motd(value);
                Ok(())
            },
            reset: Some(|g, _| {
                g.motd.clear();
                Ok(())
            }),
        },
        V {
            name: "ProtectWebSessions",
            ty: VarType::Boolean,
            permissions: &[],
            description: "Disallow IP changes during a web session.",
            get: |g, _| format_bool(g.protect_web_sessions),
            set: |g, value, _| {
                g.protect_web_sessions = parse_bool(value);
                Ok(())
            },
            reset: Some(|g, _| {
                g.protect_web_sessions = true;
                Ok(())
            }),
        },
        V {
            name: "ServerThrottle",
            ty: VarType::Integer,
            permissions: &[],
            description: "Seconds between connection attempts to the same host.",
            get: |g, _| g.server_throttle.to_string(),
            set: |g, value, _| {
                g.server_throttle = parse_int(value)?;
                Ok(())
            },
            reset: Some(|g, _| {
                g.server_throttle = DEFAULT_SERVER_THROTTLE;
                Ok(())
            }),
        },
        V {
            name: "Skin",
            ty: VarType::String,
            permissions: &[],
            description: "Default web interface skin.",
            get: |g, _| g.skin.clone(),
            set: |g, value, _| {
                g.skin = value.to_string();
                Ok(())
            },
            reset: Some(|g, _| {
                g.skin.clear();
                Ok(())
            }),
        },
        V {
            name: "SSLCertFile",
            ty: VarType::String,
            permissions: &[],
            description: "File the server certificate is read from.",
            get: |g, _| g.ssl_cert_file.clone(),
            set: |g, value, _| {
                g.ssl_cert_file = value.to_string();
                Ok(())
            },
            reset: Some(|g, _| {
                g.ssl_cert_file = DEFAULT_SSL_CERT_FILE.to_string();
                Ok(())
            }),
        },
        V {
            name: "SSLCiphers",
            ty: VarType::String,
            permissions: &[],
            description: "Allowed TLS ciphers; empty for the built-in default.",
            get: |g, _| g.ssl_ciphers.clone(),
            set: |g, value, _| {
                g.ssl_ciphers = value.to_string();
                Ok(())
            },
            reset: Some(|g, _| {
                g.ssl_ciphers.clear();
                Ok(())
            }),
        },
        V {
            name: "SSLProtocols",
            ty: VarType::String,
            permissions: &[],
            description: "Accepted TLS protocols, as [+|-]<protocol> ...",
            get: |g, _| g.ssl_protocols.clone(),
            set: |g, value, _| {
                if g.set_ssl_protocols(value) {
                    Ok(())
                } else {
                    Err(format!(
                        "invalid value (available protocols: {})",
                        AVAILABLE_SSL_PROTOCOLS.join(", ")
                    ))
                }
            },
            reset: Some(|g, _| {
                g.ssl_protocols.clear();
                Ok(())
            }),
        },
        V {
            name: "StatusPrefix",
            ty: VarType::String,
            permissions: &[],
            description: "Default prefix of status and module queries for new users.",
            get: |g, _| g.status_prefix.clone(),
            set: |g, value, _| {
                if value.is_empty() || value.contains(char::is_whitespace) {
                    return Err("invalid status prefix".to_string());
                }
                g.status_prefix = value.to_string();
                Ok(())
            },
            reset: Some(|g, _| {
                g.status_prefix = DEFAULT_STATUS_PREFIX.to_string();
                Ok(())
            }),
        },
        V {
            name: "TrustedProxy",
            ty: VarType::List,
            permissions: &[],
            description: "Trusted proxies; separate several with spaces.",
            get: |g, _| join_lines(&g.trusted_proxies),
            set: |g, value, _| {
                for proxy in value.split_whitespace() {
                    g.add_trusted_proxy(proxy);
                }
                Ok(())
            },
            reset: Some(|g, _| {
                g.trusted_proxies.clear();
                Ok(())
            }),
        },
    ]
}
