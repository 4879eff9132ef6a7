//! User-scope variables.

use crate::console::command::next_token;
use crate::console::permission::Permission;
use crate::console::store::{load_infix, save_infix};
use crate::console::variable::{
    VarType, Variable, format_bool, join_lines, parse_bool, parse_int,
};
use crate::state::{
    DEFAULT_BUFFER_SIZE, DEFAULT_JOIN_TRIES, DEFAULT_MAX_NETWORKS, DEFAULT_MAX_QUERY_BUFFERS,
    DEFAULT_STATUS_PREFIX, DEFAULT_TIMESTAMP_FORMAT, User, hash_password,
};
use chrono::format::{Item, StrftimeItems};

type V = Variable<User>;

const ADMIN: &[Permission] = &[Permission::RequiresAdmin];
const BIND_HOST: &[Permission] = &[Permission::RequiresBindHostPolicy];

/// Shown instead of the password hash.
const PASSWORD_MASK: &str = "********";

fn is_valid_timestamp_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

pub fn variables() -> Vec<V> {
    vec![
        V {
            name: "Admin",
            ty: VarType::Boolean,
            permissions: ADMIN,
            description: "Whether the user has admin rights.",
            get: |u, _| format_bool(u.admin),
            set: |u, value, _| {
                u.admin = parse_bool(value);
                Ok(())
            },
            reset: Some(|u, _| {
                u.admin = false;
                Ok(())
            }),
        },
        V {
            name: "AdminInfix",
            ty: VarType::String,
            permissions: &[],
            description: "Infix after the status prefix that addresses console queries.",
            get: |u, ctx| load_infix(&*ctx.store, u),
            set: |u, value, ctx| {
                if value.contains(char::is_whitespace) {
                    return Err("the infix must not contain spaces".to_string());
                }
                save_infix(ctx.store, &u.name, value).map_err(|e| e.to_string())
            },
            reset: Some(|u, ctx| save_infix(ctx.store, &u.name, "").map_err(|e| e.to_string())),
        },
        V {
            name: "Allow",
            ty: VarType::List,
            permissions: &[],
            description: "Hosts the user may connect from; wildcards (*) are supported.",
            get: |u, _| join_lines(&u.allow),
            set: |u, value, _| {
                for host in value.split_whitespace() {
                    u.add_allowed_host(host);
                }
                Ok(())
            },
            reset: Some(|u, _| {
                u.allow.clear();
                Ok(())
            }),
        },
        V {
            name: "AltNick",
            ty: VarType::String,
            permissions: &[],
            description: "The default alternate nick.",
            get: |u, _| u.alt_nick.clone(),
            set: |u, value, _| {
                u.alt_nick = value.to_string();
                Ok(())
            },
            reset: Some(|u, _| {
                u.alt_nick.clear();
                Ok(())
            }),
        },
        V {
            name: "AppendTimestamp",
            ty: VarType::Boolean,
            permissions: &[],
            description: "Append timestamps to playback lines.",
            get: |u, _| format_bool(u.append_timestamp),
            set: |u, value, _| {
                u.append_timestamp = parse_bool(value);
                Ok(())
            },
            reset: Some(|u, _| {
                u.append_timestamp = false;
                Ok(())
            }),
        },
        V {
            name: "AutoClearChanBuffer",
            ty: VarType::Boolean,
            permissions: &[],
            description: "Clear channel buffers after playback.",
            get: |u, _| format_bool(u.auto_clear_chan_buffer),
            set: |u, value, _| {
                u.auto_clear_chan_buffer = parse_bool(value);
                Ok(())
            },
            reset: Some(|u, _| {
                u.auto_clear_chan_buffer = true;
                Ok(())
            }),
        },
        V {
            name: "AutoClearQueryBuffer",
            ty: VarType::Boolean,
            permissions: &[],
            description: "Clear query buffers after playback.",
            get: |u, _| format_bool(u.auto_clear_query_buffer),
            set: |u, value, _| {
                u.auto_clear_query_buffer = parse_bool(value);
                Ok(())
            },
            reset: Some(|u, _| {
                u.auto_clear_query_buffer = true;
                Ok(())
            }),
        },
        V {
            name: "BindHost",
            ty: VarType::String,
            permissions: BIND_HOST,
            description: "The default bind host.",
            get: |u, _| u.bind_host.clone(),
            set: |u, value, _| {
                u.bind_host = value.to_string();
                Ok(())
            },
            reset: Some(|u, _| {
                u.bind_host.clear();
                Ok(())
            }),
        },
        V {
            name: "ChanBufferSize",
            ty: VarType::Integer,
            permissions: &[],
            description: "Lines kept in each channel playback buffer.",
            get: |u, _| u.chan_buffer_size.to_string(),
            set: |u, value, ctx| {
                let size = parse_int(value)?;
                ctx.check_buffer_limit(size)?;
                u.chan_buffer_size = size;
                Ok(())
            },
            reset: Some(|u, _| {
                u.chan_buffer_size = DEFAULT_BUFFER_SIZE;
                Ok(())
            }),
        },
        V {
            name: "ChanModes",
            ty: VarType::String,
            permissions: &[],
            description: "Modes set on newly created channels.",
            get: |u, _| u.chan_modes.clone(),
            set: |u, value, _| {
                u.chan_modes = value.to_string();
                Ok(())
            },
            reset: Some(|u, _| {
                u.chan_modes.clear();
                Ok(())
            }),
        },
        V {
            name: "ClientEncoding",
            ty: VarType::String,
            permissions: &[],
            description: "Encoding used towards clients.",
            get: |u, _| u.client_encoding.clone(),
            set: |u, value, _| {
                u.client_encoding = value.to_string();
                Ok(())
            },
            reset: Some(|u, _| {
                u.client_encoding.clear();
                Ok(())
            }),
        },
        V {
            name: "CTCPReply",
            ty: VarType::List,
            permissions: &[],
            description: "CTCP replies as <request> <reply>; a bare <request> removes one.",
            get: |u, _| {
                u.ctcp_replies
                    .iter()
                    .map(|(request, reply)| format!("{} {}", request, reply))
                    .collect::<Vec<_>>()
                    .join("\n")
            },
            set: |u, value, _| {
                let (request, reply) = next_token(value);
                if reply.is_empty() {
                    if !u.del_ctcp_reply(request) {
                        return Err("unable to remove".to_string());
                    }
                } else if !u.add_ctcp_reply(request, reply) {
                    return Err("unable to add".to_string());
                }
                Ok(())
            },
            reset: Some(|u, _| {
                u.ctcp_replies.clear();
                Ok(())
            }),
        },
        V {
            name: "DCCBindHost",
            ty: VarType::String,
            permissions: BIND_HOST,
            description: "Bind host used for DCC transfers.",
            get: |u, _| u.dcc_bind_host.clone(),
            set: |u, value, _| {
                u.dcc_bind_host = value.to_string();
                Ok(())
            },
            reset: Some(|u, _| {
                u.dcc_bind_host.clear();
                Ok(())
            }),
        },
        V {
            name: "DenyLoadMod",
            ty: VarType::Boolean,
            permissions: ADMIN,
            description: "Whether the user is denied loading modules.",
            get: |u, _| format_bool(u.deny_load_mod),
            set: |u, value, _| {
                u.deny_load_mod = parse_bool(value);
                Ok(())
            },
            reset: Some(|u, _| {
                u.deny_load_mod = false;
                Ok(())
            }),
        },
        V {
            name: "DenySetBindHost",
            ty: VarType::Boolean,
            permissions: ADMIN,
            description: "Whether the user is denied changing bind hosts.",
            get: |u, _| format_bool(u.deny_set_bind_host),
            set: |u, value, _| {
                u.deny_set_bind_host = parse_bool(value);
                Ok(())
            },
            reset: Some(|u, _| {
                u.deny_set_bind_host = false;
                Ok(())
            }),
        },
        V {
            name: "Ident",
            ty: VarType::String,
            permissions: &[],
            description: "The default ident.",
            get: |u, _| u.ident.clone(),
            set: |u, value, _| {
                u.ident = value.to_string();
                Ok(())
            },
            reset: None,
        },
        V {
            name: "JoinTries",
            ty: VarType::Integer,
            permissions: &[],
            description: "Join attempts per channel before giving up.",
            get: |u, _| u.join_tries.to_string(),
            set: |u, value, _| {
                u.join_tries = parse_int(value)?;
                Ok(())
            },
            reset: Some(|u, _| {
                u.join_tries = DEFAULT_JOIN_TRIES;
                Ok(())
            }),
        },
        V {
            name: "MaxJoins",
            ty: VarType::Integer,
            permissions: &[],
            description: "Channels joined per burst; 0 for no limit.",
            get: |u, _| u.max_joins.to_string(),
            set: |u, value, _| {
                u.max_joins = parse_int(value)?;
                Ok(())
            },
            reset: Some(|u, _| {
                u.max_joins = 0;
                Ok(())
            }),
        },
        V {
            name: "MaxNetworks",
            ty: VarType::Integer,
            permissions: ADMIN,
            description: "Maximum number of networks the user may have.",
            get: |u, _| u.max_networks.to_string(),
            set: |u, value, _| {
                u.max_networks = parse_int(value)?;
                Ok(())
            },
            reset: Some(|u, _| {
                u.max_networks = DEFAULT_MAX_NETWORKS;
                Ok(())
            }),
        },
        V {
            name: "MaxQueryBuffers",
            ty: VarType::Integer,
            permissions: &[],
            description: "Maximum number of query buffers; 0 for no limit.",
            get: |u, _| u.max_query_buffers.to_string(),
            set: |u, value, _| {
                u.max_query_buffers = parse_int(value)?;
                Ok(())
            },
            reset: Some(|u, _| {
                u.max_query_buffers = DEFAULT_MAX_QUERY_BUFFERS;
                Ok(())
            }),
        },
        V {
            name: "MultiClients",
            ty: VarType::Boolean,
            permissions: &[],
            description: "Allow several clients to be connected at once.",
            get: |u, _| format_bool(u.multi_clients),
            set: |u, value, _| {
                u.multi_clients = parse_bool(value);
                Ok(())
            },
            reset: Some(|u, _| {
                u.multi_clients = true;
                Ok(())
            }),
        },
        V {
            name: "Nick",
            ty: VarType::String,
            permissions: &[],
            description: "The default nick.",
            get: |u, _| u.nick.clone(),
            set: |u, value, _| {
                u.nick = value.to_string();
                Ok(())
            },
            reset: Some(|u, _| {
                u.nick.clear();
                Ok(())
            }),
        },
        V {
            name: "Password",
            ty: VarType::String,
            permissions: &[],
            description: "Login password; only a hash is stored.",
            get: |u, _| {
                if u.password.is_empty() {
                    String::new()
                } else {
                    PASSWORD_MASK.to_string()
                }
            },
            set: |u, value, _| {
                u.password =
                    hash_password(value).map_err(|e| format!("unable to hash password: {}", e))?;
                Ok(())
            },
            reset: None,
        },
        V {
            name: "PrependTimestamp",
            ty: VarType::Boolean,
            permissions: &[],
            description: "Prepend timestamps to playback lines.",
            get: |u, _| format_bool(u.prepend_timestamp),
            set: |u, value, _| {
                u.prepend_timestamp = parse_bool(value);
                Ok(())
            },
            reset: Some(|u, _| {
                u.prepend_timestamp = true;
                Ok(())
            }),
        },
        V {
            name: "QueryBufferSize",
            ty: VarType::Integer,
            permissions: &[],
            description: "Lines kept in each query playback buffer.",
            get: |u, _| u.query_buffer_size.to_string(),
            set: |u, value, ctx| {
                let size = parse_int(value)?;
                ctx.check_buffer_limit(size)?;
                u.query_buffer_size = size;
                Ok(())
            },
            reset: Some(|u, _| {
                u.query_buffer_size = DEFAULT_BUFFER_SIZE;
                Ok(())
            }),
        },
        V {
            name: "QuitMsg",
            ty: VarType::String,
            permissions: &[],
            description: "The default quit message.",
            get: |u, _| u.quit_msg.clone(),
            set: |u, value, _| {
                u.quit_msg = value.to_string();
                Ok(())
            },
            reset: Some(|u, _| {
                u.quit_msg.clear();
                Ok(())
            }),
        },
        V {
            name: "RealName",
            ty: VarType::String,
            permissions: &[],
            description: "The default real name.",
            get: |u, _| u.real_name.clone(),
            set: |u, value, _| {
                u.real_name = value.to_string();
                Ok(())
            },
            reset: Some(|u, _| {
                u.real_name.clear();
                Ok(())
            }),
        },
        V {
            name: "Skin",
            ty: VarType::String,
            permissions: &[],
            description: "Web interface skin of the user.",
            get: |u, _| u.skin.clone(),
            set: |u, value, _| {
                u.skin = value.to_string();
                Ok(())
            },
            reset: Some(|u, _| {
                u.skin.clear();
                Ok(())
            }),
        },
        V {
            name: "StatusPrefix",
            ty: VarType::String,
            permissions: &[],
            description: "Prefix of status and module queries.",
            get: |u, _| u.status_prefix.clone(),
            set: |u, value, _| {
                if value.is_empty() || value.contains(char::is_whitespace) {
                    return Err("invalid status prefix".to_string());
                }
                u.status_prefix = value.to_string();
                Ok(())
            },
            reset: Some(|u, _| {
                u.status_prefix = DEFAULT_STATUS_PREFIX.to_string();
                Ok(())
            }),
        },
        V {
            name: "TimestampFormat",
            ty: VarType::String,
            permissions: &[],
            description: "strftime format of playback timestamps.",
            get: |u, _| u.timestamp_format.clone(),
            set: |u, value, _| {
                if !is_valid_timestamp_format(value) {
                    return Err(format!("invalid timestamp format '{}'", value));
                }
                u.timestamp_format = value.to_string();
                Ok(())
            },
            reset: Some(|u, _| {
                u.timestamp_format = DEFAULT_TIMESTAMP_FORMAT.to_string();
                Ok(())
            }),
        },
        V {
            name: "Timezone",
            ty: VarType::String,
            permissions: &[],
            description: "Timezone of playback timestamps.",
            get: |u, _| u.timezone.clone(),
            set: |u, value, _| {
                u.timezone = value.to_string();
                Ok(())
            },
            reset: Some(|u, _| {
                u.timezone.clear();
                Ok(())
            }),
        },
    ]
}
