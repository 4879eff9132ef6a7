//! Network-scope variables.

use crate::console::permission::Permission;
use crate::console::variable::{
    VarType, Variable, format_double, join_lines, parse_double, parse_int,
};
use crate::state::{DEFAULT_FLOOD_BURST, DEFAULT_FLOOD_RATE, Network};

type V = Variable<Network>;

pub fn variables() -> Vec<V> {
    vec![
        V {
            name: "AltNick",
            ty: VarType::String,
            permissions: &[],
            description: "Alternate nick on this network.",
            get: |n, _| n.alt_nick.clone(),
            set: |n, value, _| {
                n.alt_nick = value.to_string();
                Ok(())
            },
            reset: Some(|n, _| {
                n.alt_nick.clear();
                Ok(())
            }),
        },
        V {
            name: "BindHost",
            ty: VarType::String,
            permissions: &[Permission::RequiresBindHostPolicy],
            description: "Bind host on this network.",
            get: |n, _| n.bind_host.clone(),
            set: |n, value, _| {
                n.bind_host = value.to_string();
                Ok(())
            },
            reset: Some(|n, _| {
                n.bind_host.clear();
                Ok(())
            }),
        },
        V {
            name: "Encoding",
            ty: VarType::String,
            permissions: &[],
            description: "Encoding of the upstream connection.",
            get: |n, _| n.encoding.clone(),
            set: |n, value, _| {
                n.encoding = value.to_string();
                Ok(())
            },
            reset: Some(|n, _| {
                n.encoding.clear();
                Ok(())
            }),
        },
        V {
            name: "FloodBurst",
            ty: VarType::Integer,
            permissions: &[],
            description: "Lines sent at once before flood protection starts.",
            get: |n, _| n.flood_burst.to_string(),
            set: |n, value, _| {
                n.flood_burst = parse_int(value)?;
                Ok(())
            },
            reset: Some(|n, _| {
                n.flood_burst = DEFAULT_FLOOD_BURST;
                Ok(())
            }),
        },
        V {
            name: "FloodRate",
            ty: VarType::Double,
            permissions: &[],
            description: "Seconds per line once flood protection is active.",
            get: |n, _| format_double(n.flood_rate),
            set: |n, value, _| {
                n.flood_rate = parse_double(value)?;
                Ok(())
            },
            reset: Some(|n, _| {
                n.flood_rate = DEFAULT_FLOOD_RATE;
                Ok(())
            }),
        },
        V {
            name: "Ident",
            ty: VarType::String,
            permissions: &[],
            description: "Ident on this network.",
            get: |n, _| n.ident.clone(),
            set: |n, value, _| {
                n.ident = value.to_string();
                Ok(())
            },
            reset: Some(|n, _| {
                n.ident.clear();
                Ok(())
            }),
        },
        V {
            name: "JoinDelay",
            ty: VarType::Integer,
            permissions: &[],
            description: "Seconds to wait after connecting before joining channels.",
            get: |n, _| n.join_delay.to_string(),
            set: |n, value, _| {
                n.join_delay = parse_int(value)?;
                Ok(())
            },
            reset: Some(|n, _| {
                n.join_delay = 0;
                Ok(())
            }),
        },
        V {
            name: "Nick",
            ty: VarType::String,
            permissions: &[],
            description: "Nick on this network.",
            get: |n, _| n.nick.clone(),
            set: |n, value, _| {
                n.nick = value.to_string();
                Ok(())
            },
            reset: Some(|n, _| {
                n.nick.clear();
                Ok(())
            }),
        },
        V {
            name: "QuitMsg",
            ty: VarType::String,
            permissions: &[],
            description: "Quit message on this network.",
            get: |n, _| n.quit_msg.clone(),
            set: |n, value, _| {
                n.quit_msg = value.to_string();
                Ok(())
            },
            reset: Some(|n, _| {
                n.quit_msg.clear();
                Ok(())
            }),
        },
        V {
            name: "RealName",
            ty: VarType::String,
            permissions: &[],
            description: "Real name on this network.",
            get: |n, _| n.real_name.clone(),
            set: |n, value, _| {
                n.real_name = value.to_string();
                Ok(())
            },
            reset: Some(|n, _| {
                n.real_name.clear();
                Ok(())
            }),
        },
        V {
            name: "TrustedServerFingerprint",
            ty: VarType::List,
            permissions: &[],
            description: "Certificate fingerprints trusted for this network's servers.",
            get: |n, _| join_lines(&n.trusted_fingerprints),
            set: |n, value, _| {
                let fingerprint = value.trim();
                if fingerprint.is_empty() {
                    return Err("empty fingerprint".to_string());
                }
                n.add_trusted_fingerprint(fingerprint);
                Ok(())
            },
            reset: Some(|n, _| {
                n.trusted_fingerprints.clear();
                Ok(())
            }),
        },
    ]
}
