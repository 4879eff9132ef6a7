//! Channel-scope variables.
//!
//! `AutoClearChanBuffer` and `Buffer` inherit the owning user's setting until
//! set on the channel; inherited values are shown with a ` (default)` suffix.

use crate::console::variable::{VarType, Variable, format_bool, parse_bool, parse_int};
use crate::state::Channel;

type V = Variable<Channel>;

const DEFAULT_SUFFIX: &str = " (default)";

fn with_default_marker(value: String, inherited: bool) -> String {
    if inherited {
        value + DEFAULT_SUFFIX
    } else {
        value
    }
}

pub fn variables() -> Vec<V> {
    vec![
        V {
            name: "AutoClearChanBuffer",
            ty: VarType::Boolean,
            permissions: &[],
            description: "Clear the channel buffer after playback.",
            get: |c, ctx| {
                let value = c
                    .auto_clear_chan_buffer
                    .unwrap_or(ctx.inherited.auto_clear_chan_buffer);
                with_default_marker(format_bool(value), c.auto_clear_chan_buffer.is_none())
            },
            set: |c, value, _| {
                c.auto_clear_chan_buffer = Some(parse_bool(value));
                Ok(())
            },
            reset: Some(|c, _| {
                c.auto_clear_chan_buffer = None;
                Ok(())
            }),
        },
        V {
            name: "Buffer",
            ty: VarType::Integer,
            permissions: &[],
            description: "Lines kept in this channel's playback buffer.",
            get: |c, ctx| {
                let value = c.buffer.unwrap_or(ctx.inherited.chan_buffer_size);
                with_default_marker(value.to_string(), c.buffer.is_none())
            },
            set: |c, value, ctx| {
                let size = parse_int(value)?;
                ctx.check_buffer_limit(size)?;
                c.buffer = Some(size);
                Ok(())
            },
            reset: Some(|c, _| {
                c.buffer = None;
                Ok(())
            }),
        },
        V {
            name: "Detached",
            ty: VarType::Boolean,
            permissions: &[],
            description: "Whether the channel is detached.",
            get: |c, _| format_bool(c.detached),
            set: |c, value, _| {
                if parse_bool(value) {
                    c.detach();
                } else {
                    c.attach();
                }
                Ok(())
            },
            reset: Some(|c, _| {
                c.attach();
                Ok(())
            }),
        },
        V {
            name: "Disabled",
            ty: VarType::Boolean,
            permissions: &[],
            description: "Whether the channel is disabled.",
            get: |c, _| format_bool(c.disabled),
            set: |c, value, _| {
                if parse_bool(value) {
                    c.disable();
                } else {
                    c.enable();
                }
                Ok(())
            },
            reset: Some(|c, _| {
                c.enable();
                Ok(())
            }),
        },
        V {
            name: "InConfig",
            ty: VarType::Boolean,
            permissions: &[],
            description: "Whether the channel is saved to the config file.",
            get: |c, _| format_bool(c.in_config),
            set: |c, value, _| {
                c.in_config = parse_bool(value);
                Ok(())
            },
            reset: None,
        },
        V {
            name: "Key",
            ty: VarType::String,
            permissions: &[],
            description: "Channel key used when joining.",
            get: |c, _| c.key.clone(),
            set: |c, value, _| {
                c.key = value.to_string();
                Ok(())
            },
            reset: Some(|c, _| {
                c.key.clear();
                Ok(())
            }),
        },
        V {
            name: "Modes",
            ty: VarType::String,
            permissions: &[],
            description: "Modes set when joining an empty channel.",
            get: |c, _| c.modes.clone(),
            set: |c, value, _| {
                c.modes = value.to_string();
                Ok(())
            },
            reset: Some(|c, _| {
                c.modes.clear();
                Ok(())
            }),
        },
    ]
}
