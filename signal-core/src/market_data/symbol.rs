//! Symbol normalization for exchange lookups
//!
//! The vision model reports pairs in whatever form the chart shows them
//! ("BTC/USDT", "btc usdt", sometimes a bare "ETHUSD"). Exchange endpoints
//! want the compact upper-case form, and bare USD pairs are corrected to the
//! USDT perp/spot listing.

/// Normalize a detected symbol to exchange form. Idempotent.
pub fn normalize(symbol: &str) -> String {
    let mut normalized: String = symbol
        .chars()
        .filter(|c| *c != '/' && !c.is_whitespace())
        .collect();
    normalized.make_ascii_uppercase();

    // ETHUSD -> ETHUSDT; USDT and USDC listings stay as they are
    if normalized.ends_with("USD") && !normalized.ends_with("USDT") && !normalized.ends_with("USDC")
    {
        normalized.push('T');
    }

    normalized
}

/// Base asset of a normalized symbol, e.g. "BTCUSDT" -> "BTC".
///
/// Used by the intelligent pipeline to check that the detected pair belongs
/// to the same asset family the market data was prefetched for.
pub fn base_asset(normalized: &str) -> &str {
    for quote in ["USDT", "USDC", "USD"] {
        if let Some(base) = normalized.strip_suffix(quote) {
            if !base.is_empty() {
                return base;
            }
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_slashes_whitespace_and_uppercases() {
        assert_eq!(normalize("btc/usdt"), "BTCUSDT");
        assert_eq!(normalize("BTC USDT"), "BTCUSDT");
        assert_eq!(normalize("BTCUSDT"), "BTCUSDT");
    }

    #[test]
    fn corrects_bare_usd_suffix() {
        assert_eq!(normalize("ETHUSD"), "ETHUSDT");
        assert_eq!(normalize("ETHUSDT"), "ETHUSDT");
        assert_eq!(normalize("ETHUSDC"), "ETHUSDC");
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in ["btc/usdt", "ETH USD", "SOLUSDC", "dogeusdt"] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn base_asset_strips_known_quotes() {
        assert_eq!(base_asset("BTCUSDT"), "BTC");
        assert_eq!(base_asset("ETHUSDC"), "ETH");
        assert_eq!(base_asset("SOLUSD"), "SOL");
        assert_eq!(base_asset("ETHBTC"), "ETHBTC");
    }
}
