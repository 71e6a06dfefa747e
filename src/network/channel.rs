//! Listener channels and destination routing

use std::fmt;

use serde_json::json;

use crate::account::Address;

/// A kind of event stream pushed by the node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
    Errors,
    Blocks,
    Account,
    OwnedNamespaces,
    OwnedMosaics,
    OwnedMosaicDefinitions,
    RecentTransactions,
    UnconfirmedTransactions,
    ConfirmedTransactions,
}

impl Channel {
    pub const ALL: [Channel; 9] = [
        Channel::Errors,
        Channel::Blocks,
        Channel::Account,
        Channel::OwnedNamespaces,
        Channel::OwnedMosaics,
        Channel::OwnedMosaicDefinitions,
        Channel::RecentTransactions,
        Channel::UnconfirmedTransactions,
        Channel::ConfirmedTransactions,
    ];

    /// Destination prefix; per-account channels append the plain address
    pub fn path(self) -> &'static str {
        match self {
            Channel::Errors => "/errors",
            Channel::Blocks => "/blocks/new",
            Channel::Account => "/account/",
            Channel::OwnedNamespaces => "/account/namespace/owned/",
            Channel::OwnedMosaics => "/account/mosaic/owned/",
            Channel::OwnedMosaicDefinitions => "/account/mosaic/owned/definition/",
            Channel::RecentTransactions => "/recenttransactions/",
            Channel::UnconfirmedTransactions => "/unconfirmed/",
            Channel::ConfirmedTransactions => "/transactions/",
        }
    }

    /// Where to ask the node to push the current state of a snapshot channel
    pub fn request_path(self) -> Option<&'static str> {
        match self {
            Channel::Account => Some("/w/api/account/get"),
            Channel::OwnedNamespaces => Some("/w/api/account/namespace/owned"),
            Channel::OwnedMosaics => Some("/w/api/account/mosaic/owned"),
            Channel::OwnedMosaicDefinitions => Some("/w/api/account/mosaic/owned/definition"),
            _ => None,
        }
    }

    pub fn is_per_account(self) -> bool {
        !matches!(self, Channel::Errors | Channel::Blocks)
    }

    /// Full destination for a subscription
    pub fn destination(self, address: Option<&Address>) -> String {
        match address {
            Some(address) if self.is_per_account() => format!("{}{}", self.path(), address.plain()),
            _ => self.path().to_string(),
        }
    }

    /// The channel whose prefix is the longest match for `destination`
    pub fn route(destination: &str) -> Option<Channel> {
        Self::ALL
            .into_iter()
            .filter(|channel| destination.starts_with(channel.path()))
            .max_by_key(|channel| channel.path().len())
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Body of the SEND frame requesting a snapshot for an account
pub fn snapshot_request_body(address: &Address) -> String {
    json!({ "account": address.plain() }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: &str = "TCTUIF557ZCQOQPW2M6GH4TCDPM2ZYBBL54KGNHR";

    #[test]
    fn test_longest_prefix_wins() {
        let cases = [
            ("/errors", Channel::Errors),
            ("/blocks/new", Channel::Blocks),
            ("/account/TCTU", Channel::Account),
            ("/account/namespace/owned/TCTU", Channel::OwnedNamespaces),
            ("/account/mosaic/owned/TCTU", Channel::OwnedMosaics),
            (
                "/account/mosaic/owned/definition/TCTU",
                Channel::OwnedMosaicDefinitions,
            ),
            ("/recenttransactions/TCTU", Channel::RecentTransactions),
            ("/unconfirmed/TCTU", Channel::UnconfirmedTransactions),
            ("/transactions/TCTU", Channel::ConfirmedTransactions),
        ];
        for (destination, expected) in cases {
            assert_eq!(Channel::route(destination), Some(expected), "{}", destination);
        }
    }

    #[test]
    fn test_unknown_destination() {
        assert_eq!(Channel::route("/node/info"), None);
        assert_eq!(Channel::route(""), None);
    }

    #[test]
    fn test_destination_and_request_path() {
        let address = Address::from_text(PLAIN).unwrap();
        assert_eq!(
            Channel::OwnedMosaics.destination(Some(&address)),
            format!("/account/mosaic/owned/{}", PLAIN)
        );
        assert_eq!(Channel::Blocks.destination(Some(&address)), "/blocks/new");
        assert_eq!(Channel::UnconfirmedTransactions.request_path(), None);
        assert_eq!(
            Channel::OwnedMosaicDefinitions.request_path(),
            Some("/w/api/account/mosaic/owned/definition")
        );
        assert!(!Channel::Errors.is_per_account());
        assert!(Channel::ConfirmedTransactions.is_per_account());
    }

    #[test]
    fn test_snapshot_request_body() {
        let address = Address::from_text(PLAIN).unwrap();
        assert_eq!(
            snapshot_request_body(&address),
            format!("{{\"account\":\"{}\"}}", PLAIN)
        );
    }
}
