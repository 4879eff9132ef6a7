//! List/Get/Set/Reset over the variable tables.

mod common;
use common::{TestConsole, user_scope};
use slbnc_admin::console::scope::ScopeHandle;
use slbnc_admin::console::variable::VarType;
use slbnc_admin::console::vars;
use slbnc_admin::state::{DEFAULT_MAX_BUFFER_SIZE, verify_password};

/// Data rows of a rendered table (header and rulers stripped).
fn table_rows(lines: &[String]) -> Vec<&String> {
    lines.iter().skip(3).take(lines.len().saturating_sub(4)).collect()
}

#[test]
fn set_then_get_round_trips_through_canonical_form() {
    let mut t = TestConsole::new();
    let alice = user_scope("alice");
    let cases = [
        ("Nick", "alice_", "alice_"),
        ("AppendTimestamp", "yes", "true"),
        ("MultiClients", "off", "false"),
        ("JoinTries", "7", "7"),
        ("QuitMsg", "gone fishing", "gone fishing"),
    ];
    for (name, input, canonical) in cases {
        let expected = vec![format!("{} = {}", name, canonical)];
        assert_eq!(t.run("alice", &alice, &format!("Set {} {}", name, input)), expected);
        assert_eq!(t.run("alice", &alice, &format!("Get {}", name)), expected);
    }

    let freenode = ScopeHandle::network("alice", "freenode");
    assert_eq!(t.run("alice", &freenode, "Set FloodRate 1.5"), vec!["FloodRate = 1.50"]);
    assert_eq!(t.run("alice", &freenode, "Get FloodRate"), vec!["FloodRate = 1.50"]);

    let znc = ScopeHandle::channel("alice", "freenode", "#znc");
    assert_eq!(t.run("alice", &znc, "Set Detached 1"), vec!["Detached = true"]);
    assert_eq!(t.run("alice", &znc, "Get Detached"), vec!["Detached = true"]);
}

#[test]
fn list_values_accumulate_in_call_order() {
    let mut t = TestConsole::new();
    let global = ScopeHandle::Global;
    t.run("root", &global, "Set Motd first line");
    t.run("root", &global, "Set Motd second line");
    assert_eq!(
        t.run("root", &global, "Get Motd"),
        vec!["Motd = first line", "Motd = second line"]
    );

    assert_eq!(t.run("root", &global, "Reset Motd"), vec!["Motd = "]);
    assert_eq!(t.run("root", &global, "Get Motd"), vec!["Motd = "]);
}

#[test]
fn allow_list_takes_several_hosts() {
    let mut t = TestConsole::new();
    let alice = user_scope("alice");
    assert_eq!(
        t.run("alice", &alice, "Set Allow 10.0.0.* 192.168.1.1"),
        vec!["Allow = 10.0.0.*", "Allow = 192.168.1.1"]
    );
}

#[test]
fn allow_keeps_call_order() {
    let mut t = TestConsole::new();
    let alice = user_scope("alice");
    t.run("alice", &alice, "Set Allow 192.168.1.1");
    t.run("alice", &alice, "Set Allow 10.0.0.1");
    t.run("alice", &alice, "Set Allow 192.168.1.1");
    assert_eq!(
        t.run("alice", &alice, "Get Allow"),
        vec!["Allow = 192.168.1.1", "Allow = 10.0.0.1"]
    );
}

#[test]
fn trusted_fingerprints_keep_call_order() {
    let mut t = TestConsole::new();
    let freenode = ScopeHandle::network("alice", "freenode");
    t.run("alice", &freenode, "Set TrustedServerFingerprint zz");
    t.run("alice", &freenode, "Set TrustedServerFingerprint aa");
    assert_eq!(
        t.run("alice", &freenode, "Get TrustedServerFingerprint"),
        vec![
            "TrustedServerFingerprint = zz",
            "TrustedServerFingerprint = aa",
        ]
    );
}

#[test]
fn ctcp_replies_keep_call_order_and_replace_in_place() {
    let mut t = TestConsole::new();
    let alice = user_scope("alice");
    t.run("alice", &alice, "Set CTCPReply VERSION slbnc");
    t.run("alice", &alice, "Set CTCPReply ping pong");
    assert_eq!(
        t.run("alice", &alice, "Get CTCPReply"),
        vec!["CTCPReply = VERSION slbnc", "CTCPReply = PING pong"]
    );

    t.run("alice", &alice, "Set CTCPReply version slbnc 2");
    assert_eq!(
        t.run("alice", &alice, "Get CTCPReply"),
        vec!["CTCPReply = VERSION slbnc 2", "CTCPReply = PING pong"]
    );

    t.run("alice", &alice, "Set CTCPReply VERSION");
    assert_eq!(t.run("alice", &alice, "Get CTCPReply"), vec!["CTCPReply = PING pong"]);
}

#[test]
fn admin_flag_requires_admin() {
    let mut t = TestConsole::new();
    let alice = user_scope("alice");
    assert_eq!(t.run("alice", &alice, "Set Admin true"), vec!["Error: access denied"]);
    assert!(!t.host.user("alice").unwrap().admin);

    assert_eq!(t.run("root", &alice, "Set Admin true"), vec!["Admin = true"]);
    assert!(t.host.user("alice").unwrap().admin);
}

#[test]
fn list_filters_by_type_name() {
    let mut t = TestConsole::new();
    let lines = t.run("alice", &user_scope("alice"), "List Integer");
    let rows = table_rows(&lines);

    let expected = vars::user::variables()
        .iter()
        .filter(|v| v.ty == VarType::Integer)
        .count();
    assert!(expected > 0);
    assert_eq!(rows.len(), expected);
    assert!(rows.iter().all(|row| row.contains("(Integer)")));
}

#[test]
fn list_filters_by_name_prefix() {
    let mut t = TestConsole::new();
    let lines = t.run("alice", &user_scope("alice"), "List chan*");
    let rows = table_rows(&lines);
    assert_eq!(rows.len(), 2);
    assert!(rows[0].contains("ChanBufferSize (Integer)"));
    assert!(rows[1].contains("ChanModes (String)"));
}

#[test]
fn list_without_matches_says_so() {
    let mut t = TestConsole::new();
    assert_eq!(
        t.run("alice", &user_scope("alice"), "List Zz*"),
        vec!["No matches for 'Zz*'"]
    );
}

#[test]
fn buffer_limit_rejects_and_keeps_value() {
    let mut t = TestConsole::new();
    let alice = user_scope("alice");
    let before = t.run("alice", &alice, "Get ChanBufferSize");
    assert_eq!(before, vec!["ChanBufferSize = 50"]);

    assert_eq!(
        t.run("alice", &alice, "Set ChanBufferSize 999999"),
        vec![format!("Error: exceeded limit {}", DEFAULT_MAX_BUFFER_SIZE)]
    );
    assert_eq!(t.run("alice", &alice, "Get ChanBufferSize"), before);

    // Admins are not limited.
    assert_eq!(
        t.run("root", &alice, "Set ChanBufferSize 999999"),
        vec!["ChanBufferSize = 999999"]
    );
}

#[test]
fn fan_out_applies_each_match_independently() {
    let mut t = TestConsole::new();
    let alice = user_scope("alice");
    assert_eq!(
        t.run("alice", &alice, "Set Max* 5"),
        vec![
            "MaxJoins = 5",
            "Error: access denied",
            "MaxQueryBuffers = 5",
        ]
    );
    let user = t.host.user("alice").unwrap();
    assert_eq!(user.max_joins, 5);
    assert_eq!(user.max_query_buffers, 5);
    assert_eq!(user.max_networks, 1);
}

#[test]
fn reset_without_default_is_reported() {
    let mut t = TestConsole::new();
    let alice = user_scope("alice");
    t.run("alice", &alice, "Set Ident al");
    t.run("alice", &alice, "Set Nick al");
    assert_eq!(t.run("alice", &alice, "Reset Ident"), vec!["Error: reset not supported"]);
    assert_eq!(t.run("alice", &alice, "Get Ident"), vec!["Ident = al"]);
    assert_eq!(t.run("alice", &alice, "Reset Nick"), vec!["Nick = "]);
}

#[test]
fn missing_arguments_print_usage() {
    let mut t = TestConsole::new();
    let alice = user_scope("alice");
    assert_eq!(t.run("alice", &alice, "Get"), vec!["Usage: Get <variable>"]);
    assert_eq!(t.run("alice", &alice, "Set Nick"), vec!["Usage: Set <variable> <value>"]);
    assert_eq!(t.run("alice", &alice, "Reset"), vec!["Usage: Reset <variable>"]);
    assert_eq!(t.run("alice", &alice, "Get Bogus"), vec!["Error: unknown variable"]);
}

#[test]
fn invalid_values_are_validation_errors() {
    let mut t = TestConsole::new();
    let alice = user_scope("alice");
    assert_eq!(
        t.run("alice", &alice, "Set JoinTries lots"),
        vec!["Error: invalid integer 'lots'"]
    );
    assert_eq!(t.run("alice", &alice, "Get JoinTries"), vec!["JoinTries = 10"]);
}

#[test]
fn bind_host_policy_follows_target_owner() {
    let mut t = TestConsole::new();
    t.host.user_mut("alice").unwrap().deny_set_bind_host = true;
    let alice = user_scope("alice");
    let freenode = ScopeHandle::network("alice", "freenode");

    assert_eq!(t.run("alice", &alice, "Set BindHost 10.0.0.1"), vec!["Error: access denied"]);
    assert_eq!(t.run("alice", &freenode, "Set BindHost 10.0.0.1"), vec!["Error: access denied"]);

    // Admins bypass the target's policy.
    assert_eq!(t.run("root", &alice, "Set BindHost 10.0.0.1"), vec!["BindHost = 10.0.0.1"]);
    assert_eq!(
        t.run("root", &freenode, "Set BindHost 10.0.0.2"),
        vec!["BindHost = 10.0.0.2"]
    );

    // Without the flag the owner may change it.
    t.host.user_mut("alice").unwrap().deny_set_bind_host = false;
    assert_eq!(t.run("alice", &freenode, "Set BindHost ::1"), vec!["BindHost = ::1"]);
}

#[test]
fn channel_settings_inherit_until_set() {
    let mut t = TestConsole::new();
    let znc = ScopeHandle::channel("alice", "freenode", "#znc");
    assert_eq!(t.run("alice", &znc, "Get Buffer"), vec!["Buffer = 50 (default)"]);

    t.run("alice", &user_scope("alice"), "Set ChanBufferSize 75");
    assert_eq!(t.run("alice", &znc, "Get Buffer"), vec!["Buffer = 75 (default)"]);

    assert_eq!(t.run("alice", &znc, "Set Buffer 20"), vec!["Buffer = 20"]);
    assert_eq!(t.run("alice", &znc, "Reset Buffer"), vec!["Buffer = 75 (default)"]);
}

#[test]
fn global_scope_is_read_only_for_users() {
    let mut t = TestConsole::new();
    let global = ScopeHandle::Global;
    assert_eq!(t.run("alice", &global, "Get StatusPrefix"), vec!["StatusPrefix = *"]);
    assert_eq!(t.run("alice", &global, "Set Motd hi"), vec!["Error: access denied"]);
    assert!(t.host.global.motd.is_empty());
}

#[test]
fn password_is_hashed_and_masked() {
    let mut t = TestConsole::new();
    let alice = user_scope("alice");
    assert_eq!(t.run("alice", &alice, "Get Password"), vec!["Password = "]);
    assert_eq!(t.run("alice", &alice, "Set Password hunter2"), vec!["Password = ********"]);
    let stored = &t.host.user("alice").unwrap().password;
    assert_ne!(stored, "hunter2");
    assert!(verify_password("hunter2", stored));
}

#[test]
fn admin_infix_changes_query_prefix() {
    let mut t = TestConsole::new();
    assert_eq!(
        t.run("alice", &user_scope("alice"), "Get AdminInfix"),
        vec!["AdminInfix = *"]
    );
    assert_eq!(
        t.run("alice", &user_scope("alice"), "Set AdminInfix !"),
        vec!["AdminInfix = !"]
    );

    assert_eq!(
        t.query_texts("alice", None, "*!freenode", "Get Nick"),
        vec!["Nick = "]
    );
    assert!(t.query("alice", None, "**freenode", "Get Nick").is_none());
}
