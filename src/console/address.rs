//! Composite address resolution.
//!
//! A token such as `alice/freenode/#znc` names a scope. Interpretations are
//! tried in a fixed order and the first match wins:
//!
//! 1. the self keywords `user` and `network`
//! 2. a user name
//! 3. a network of the caller
//! 4. a channel on the caller's current network
//! 5. `user/network`, `user/#channel`, `network/#channel`, `user/network/#channel`
//!
//! A token that matches none of these is not addressed to the console at all.

use super::scope::ScopeHandle;
use crate::error::AddressError;
use crate::state::{Host, Network, User};

/// Keyword addressing the caller's own user.
pub const SELF_USER: &str = "user";
/// Keyword addressing the caller's current network.
pub const SELF_NETWORK: &str = "network";

/// Who is asking, and from which network.
#[derive(Debug, Clone, Copy)]
pub struct Caller<'a> {
    pub user: &'a str,
    pub network: Option<&'a str>,
}

/// Resolve `token` to a scope.
///
/// `Ok(None)` means the token is not routable; errors are definite failures
/// the caller should report.
pub fn resolve(
    host: &Host,
    token: &str,
    caller: &Caller<'_>,
) -> Result<Option<ScopeHandle>, AddressError> {
    if token.is_empty() {
        return Ok(None);
    }
    let Some(own) = host.user(caller.user) else {
        return Ok(None);
    };

    if token.eq_ignore_ascii_case(SELF_USER) {
        return Ok(Some(ScopeHandle::User(own.name.clone())));
    }
    if token.eq_ignore_ascii_case(SELF_NETWORK)
        && let Some(network) = current_network(own, caller)
    {
        return Ok(Some(ScopeHandle::network(&own.name, &network.name)));
    }

    if let Some(user) = host.user(token) {
        return Ok(Some(ScopeHandle::User(user.name.clone())));
    }
    if let Some(network) = own.find_network(token) {
        return Ok(Some(ScopeHandle::network(&own.name, &network.name)));
    }
    if let Some(network) = default_network(own, caller)
        && let Some(channel) = network.find_channel(token)
    {
        return Ok(Some(ScopeHandle::channel(
            &own.name,
            &network.name,
            &channel.name,
        )));
    }

    let segments: Vec<&str> = token.split('/').filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        [first, second] => resolve_pair(host, own, caller, token, first, second).map(Some),
        [user, network, channel] => {
            let user = host
                .user(user)
                .ok_or_else(|| AddressError::UnknownTarget(token.to_string()))?;
            let network = user
                .find_network(network)
                .ok_or(AddressError::UnknownNetwork)?;
            let channel = network
                .find_channel(channel)
                .ok_or(AddressError::UnknownChannel)?;
            Ok(Some(ScopeHandle::channel(
                &user.name,
                &network.name,
                &channel.name,
            )))
        }
        [single]
            if !token.contains('/')
                && looks_like_channel(single)
                && caller.network.is_none()
                && own.networks.len() > 1 =>
        {
            // No current network and several to pick from.
            Err(AddressError::Ambiguous)
        }
        _ => Ok(None),
    }
}

fn resolve_pair(
    host: &Host,
    own: &User,
    caller: &Caller<'_>,
    token: &str,
    first: &str,
    second: &str,
) -> Result<ScopeHandle, AddressError> {
    if let Some(user) = host.user(first) {
        if let Some(network) = user.find_network(second) {
            return Ok(ScopeHandle::network(&user.name, &network.name));
        }
        if user.name == own.name
            && let Some(network) = current_network(own, caller)
            && let Some(channel) = network.find_channel(second)
        {
            return Ok(ScopeHandle::channel(
                &user.name,
                &network.name,
                &channel.name,
            ));
        }
        if let [network] = user.networks.as_slice()
            && let Some(channel) = network.find_channel(second)
        {
            return Ok(ScopeHandle::channel(
                &user.name,
                &network.name,
                &channel.name,
            ));
        }
        return Err(AddressError::Ambiguous);
    }

    if let Some(network) = own.find_network(first) {
        return match network.find_channel(second) {
            Some(channel) => Ok(ScopeHandle::channel(
                &own.name,
                &network.name,
                &channel.name,
            )),
            None => Err(AddressError::UnknownChannel),
        };
    }

    Err(AddressError::UnknownTarget(token.to_string()))
}

/// The network the caller is connected through, if it still exists.
fn current_network<'h>(own: &'h User, caller: &Caller<'_>) -> Option<&'h Network> {
    caller.network.and_then(|name| own.find_network(name))
}

/// The network bare channel names are searched on: the current one, or the
/// caller's only network when there is no current one.
fn default_network<'h>(own: &'h User, caller: &Caller<'_>) -> Option<&'h Network> {
    match caller.network {
        Some(_) => current_network(own, caller),
        None => match own.networks.as_slice() {
            [only] => Some(only),
            _ => None,
        },
    }
}

fn looks_like_channel(name: &str) -> bool {
    name.starts_with(['#', '&', '!', '+'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Channel, Global};

    fn host() -> Host {
        let mut host = Host::new(Global::default());

        let mut alice = User::new("alice");
        let mut freenode = Network::new("freenode");
        freenode.channels.push(Channel::new("#znc"));
        alice.networks.push(freenode);
        host.add_user(alice).unwrap();

        let mut bob = User::new("bob");
        let mut libera = Network::new("libera");
        libera.channels.push(Channel::new("#rust"));
        bob.networks.push(libera);
        let mut oftc = Network::new("oftc");
        oftc.channels.push(Channel::new("#debian"));
        bob.networks.push(oftc);
        host.add_user(bob).unwrap();

        host
    }

    const ALICE: Caller<'static> = Caller {
        user: "alice",
        network: None,
    };

    #[test]
    fn self_keywords_resolve_without_lookup() {
        let host = host();
        assert_eq!(
            resolve(&host, "user", &ALICE),
            Ok(Some(ScopeHandle::User("alice".into())))
        );
        let on_freenode = Caller {
            user: "alice",
            network: Some("freenode"),
        };
        assert_eq!(
            resolve(&host, "network", &on_freenode),
            Ok(Some(ScopeHandle::network("alice", "freenode")))
        );
        // No current network: the keyword is just an unknown name.
        assert_eq!(resolve(&host, "network", &ALICE), Ok(None));
    }

    #[test]
    fn user_names_win_over_networks() {
        let mut host = host();
        host.user_mut("alice")
            .unwrap()
            .networks
            .push(Network::new("bob"));
        assert_eq!(
            resolve(&host, "bob", &ALICE),
            Ok(Some(ScopeHandle::User("bob".into())))
        );
    }

    #[test]
    fn own_network_by_bare_name() {
        let host = host();
        assert_eq!(
            resolve(&host, "FreeNode", &ALICE),
            Ok(Some(ScopeHandle::network("alice", "freenode")))
        );
    }

    #[test]
    fn bare_channel_resolves_only_with_a_single_network() {
        let mut host = host();
        assert_eq!(
            resolve(&host, "#znc", &ALICE),
            Ok(Some(ScopeHandle::channel("alice", "freenode", "#znc")))
        );

        host.user_mut("alice")
            .unwrap()
            .networks
            .push(Network::new("oftc"));
        assert_eq!(
            resolve(&host, "#znc", &ALICE),
            Err(AddressError::Ambiguous)
        );
    }

    #[test]
    fn unknown_bare_channel_is_not_routable_when_a_network_is_known() {
        let mut host = host();
        assert_eq!(resolve(&host, "#nope", &ALICE), Ok(None));

        host.user_mut("alice")
            .unwrap()
            .networks
            .push(Network::new("oftc"));
        let on_freenode = Caller {
            user: "alice",
            network: Some("freenode"),
        };
        assert_eq!(resolve(&host, "#nope", &on_freenode), Ok(None));
        assert_eq!(resolve(&host, "#nope", &ALICE), Err(AddressError::Ambiguous));
    }

    #[test]
    fn current_network_is_searched_for_bare_channels() {
        let mut host = host();
        host.user_mut("alice")
            .unwrap()
            .networks
            .push(Network::new("oftc"));
        let on_freenode = Caller {
            user: "alice",
            network: Some("freenode"),
        };
        assert_eq!(
            resolve(&host, "#znc", &on_freenode),
            Ok(Some(ScopeHandle::channel("alice", "freenode", "#znc")))
        );
    }

    #[test]
    fn user_slash_network() {
        let host = host();
        assert_eq!(
            resolve(&host, "bob/oftc", &ALICE),
            Ok(Some(ScopeHandle::network("bob", "oftc")))
        );
    }

    #[test]
    fn user_slash_channel_needs_a_single_network() {
        let host = host();
        assert_eq!(
            resolve(&host, "alice/#znc", &ALICE),
            Ok(Some(ScopeHandle::channel("alice", "freenode", "#znc")))
        );
        assert_eq!(
            resolve(&host, "bob/#rust", &ALICE),
            Err(AddressError::Ambiguous)
        );
    }

    #[test]
    fn network_slash_channel_on_own_networks() {
        let host = host();
        assert_eq!(
            resolve(&host, "freenode/#znc", &ALICE),
            Ok(Some(ScopeHandle::channel("alice", "freenode", "#znc")))
        );
        assert_eq!(
            resolve(&host, "freenode/#nope", &ALICE),
            Err(AddressError::UnknownChannel)
        );
        assert_eq!(
            resolve(&host, "nowhere/#znc", &ALICE),
            Err(AddressError::UnknownTarget("nowhere/#znc".into()))
        );
    }

    #[test]
    fn three_segments_name_the_missing_link() {
        let host = host();
        assert_eq!(
            resolve(&host, "bob/libera/#rust", &ALICE),
            Ok(Some(ScopeHandle::channel("bob", "libera", "#rust")))
        );
        assert_eq!(
            resolve(&host, "carol/libera/#rust", &ALICE),
            Err(AddressError::UnknownTarget("carol/libera/#rust".into()))
        );
        assert_eq!(
            resolve(&host, "bob/efnet/#rust", &ALICE),
            Err(AddressError::UnknownNetwork)
        );
        assert_eq!(
            resolve(&host, "bob/libera/#go", &ALICE),
            Err(AddressError::UnknownChannel)
        );
    }

    #[test]
    fn unknown_names_are_not_routable() {
        let host = host();
        assert_eq!(resolve(&host, "status", &ALICE), Ok(None));
        assert_eq!(resolve(&host, "", &ALICE), Ok(None));
        assert_eq!(resolve(&host, "a/b/c/d", &ALICE), Ok(None));
    }
}
