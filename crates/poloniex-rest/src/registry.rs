//! Closed registry of Poloniex API methods
//!
//! Routing is decided by this table alone: a method is public (unsigned GET
//! against the public endpoint) or private (signed POST against the trading
//! endpoint). Adding a method is a one-line change to [`METHODS`].

use std::fmt;

/// Which surface of the API a method lives on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    /// No credentials, no signature, sent as GET
    Public,
    /// Requires credentials, a nonce and a signature, sent as POST
    Private,
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::Private => write!(f, "private"),
        }
    }
}

/// A registered remote method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodSpec {
    /// Remote command name, sent as `command=<name>`
    pub name: &'static str,
    /// Surface the method is routed to
    pub kind: MethodKind,
}

impl MethodSpec {
    const fn public(name: &'static str) -> Self {
        Self { name, kind: MethodKind::Public }
    }

    const fn private(name: &'static str) -> Self {
        Self { name, kind: MethodKind::Private }
    }

    /// Whether calls to this method must be signed
    pub fn is_private(&self) -> bool {
        self.kind == MethodKind::Private
    }
}

/// Every method the client knows how to route
pub const METHODS: &[MethodSpec] = &[
    // Public
    MethodSpec::public("returnTicker"),
    MethodSpec::public("return24hVolume"),
    MethodSpec::public("returnOrderBook"),
    MethodSpec::public("returnTradeHistory"),
    MethodSpec::public("returnChartData"),
    MethodSpec::public("returnCurrencies"),
    MethodSpec::public("returnLoanOrders"),
    // Private
    MethodSpec::private("returnBalances"),
    MethodSpec::private("returnCompleteBalances"),
    MethodSpec::private("returnDepositAddresses"),
    MethodSpec::private("generateNewAddress"),
    MethodSpec::private("returnDepositsWithdrawals"),
    MethodSpec::private("returnOpenOrders"),
    MethodSpec::private("returnTradeHistory"),
    MethodSpec::private("returnOrderTrades"),
    MethodSpec::private("buy"),
    MethodSpec::private("sell"),
    MethodSpec::private("cancelOrder"),
    MethodSpec::private("moveOrder"),
    MethodSpec::private("withdraw"),
    MethodSpec::private("returnFeeInfo"),
    MethodSpec::private("returnAvailableAccountBalances"),
    MethodSpec::private("returnTradableBalances"),
    MethodSpec::private("transferBalance"),
];

/// Look up a method on a specific surface
pub fn lookup(name: &str, kind: MethodKind) -> Option<&'static MethodSpec> {
    METHODS.iter().find(|spec| spec.name == name && spec.kind == kind)
}

/// Resolve a method by name alone
///
/// `returnTradeHistory` exists on both surfaces; the public entry wins here.
pub fn resolve(name: &str) -> Option<&'static MethodSpec> {
    lookup(name, MethodKind::Public).or_else(|| lookup(name, MethodKind::Private))
}

/// Iterate over the methods of one surface
pub fn methods(kind: MethodKind) -> impl Iterator<Item = &'static MethodSpec> {
    METHODS.iter().filter(move |spec| spec.kind == kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_resolve_public_and_private() {
        assert_eq!(resolve("returnTicker").map(|s| s.kind), Some(MethodKind::Public));
        assert_eq!(resolve("returnBalances").map(|s| s.kind), Some(MethodKind::Private));
    }

    #[test]
    fn test_unknown_method() {
        assert!(resolve("notAMethod").is_none());
        assert!(resolve("").is_none());
        // Names are case-sensitive on the wire
        assert!(resolve("returnticker").is_none());
    }

    #[test]
    fn test_trade_history_on_both_surfaces() {
        assert!(lookup("returnTradeHistory", MethodKind::Public).is_some());
        assert!(lookup("returnTradeHistory", MethodKind::Private).is_some());
        assert_eq!(
            resolve("returnTradeHistory").map(|s| s.kind),
            Some(MethodKind::Public)
        );
    }

    #[test]
    fn test_no_duplicate_entries() {
        let unique: HashSet<_> = METHODS.iter().collect();
        assert_eq!(unique.len(), METHODS.len());
    }

    #[test]
    fn test_surface_partition() {
        let public = methods(MethodKind::Public).count();
        let private = methods(MethodKind::Private).count();
        assert_eq!(public + private, METHODS.len());
        assert!(methods(MethodKind::Private).all(MethodSpec::is_private));
    }
}
