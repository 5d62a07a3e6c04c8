use crate::config::ConfigStore;
use crate::error::Error;
use crate::events::{ListedEvent, TradedEvent, UnlistedEvent};
use crate::funds::FundsLedger;
use crate::pricing;
use crate::registry::Registry;
use crate::storage::{Config, Listing, MAX_PAGE_SIZE, MAX_SCAN_BUCKETS, SALE_BUCKET_BITS};
use core::ops::Range;
use soroban_sdk::{Address, Env, Symbol, Vec};

pub struct Marketplace;

impl Marketplace {
    /// List an owned certificate at `price`, replacing any earlier listing
    pub fn put_on_sale(env: &Env, seller: &Address, id: u64, price: i128) -> Result<(), Error> {
        seller.require_auth();
        Self::check_trading(env)?;

        let certificate = Registry::certificate(env, id)?;
        if certificate.owner != *seller {
            return Err(Error::NotOwner);
        }

        if price < 0 {
            return Err(Error::InvalidValue);
        }

        Registry::list(env, certificate, price);

        env.events().publish(
            (Symbol::new(env, "listed"), id),
            ListedEvent {
                id,
                seller: seller.clone(),
                price,
            },
        );

        Ok(())
    }

    pub fn remove_from_sale(env: &Env, seller: &Address, id: u64) -> Result<(), Error> {
        seller.require_auth();
        Self::check_trading(env)?;

        let certificate = Registry::certificate(env, id)?;
        if certificate.owner != *seller {
            return Err(Error::NotOwner);
        }

        if !certificate.listing.on_sale {
            return Err(Error::NotListed);
        }

        Registry::unlist(env, certificate);

        env.events().publish(
            (Symbol::new(env, "unlisted"), id),
            UnlistedEvent {
                id,
                seller: seller.clone(),
            },
        );

        Ok(())
    }

    /// Buy a listed certificate at its asking price
    ///
    /// The seller receives the price and the fees pool receives the trade
    /// fee on top. The certificate keeps its original invested value.
    pub fn trade(env: &Env, buyer: &Address, id: u64) -> Result<(), Error> {
        buyer.require_auth();
        let config = Self::check_trading(env)?;

        let certificate = Registry::certificate(env, id)?;
        let seller = certificate.owner.clone();
        if seller == *buyer {
            return Err(Error::SelfTrade);
        }

        if !certificate.listing.on_sale {
            return Err(Error::NotListed);
        }

        let price = certificate.listing.price;
        let charge = pricing::price_with_fee(price, config.trade_fee_bps)?;

        let fees_collector = config.fees_collector()?;
        let ledger = FundsLedger::new(env, &config.funds_token()?);

        ledger.ensure_can_pull(buyer, charge.total()?)?;
        ledger.pull(buyer, &seller, charge.principal);
        ledger.pull(buyer, &fees_collector, charge.fee);

        Registry::transfer(env, certificate, buyer)?;

        env.events().publish(
            (Symbol::new(env, "traded"), id),
            TradedEvent {
                id,
                seller,
                buyer: buyer.clone(),
                price,
                fee: charge.fee,
            },
        );

        Ok(())
    }

    pub fn listing(env: &Env, id: u64) -> Result<Listing, Error> {
        Ok(Registry::certificate(env, id)?.listing)
    }

    /// One page of listed ids, ascending, starting at id `offset`
    ///
    /// A call reads at most 32 index buckets of 128 ids, starting with the
    /// bucket holding `offset`. A full page resumes from its last id plus
    /// one; a short page has covered every id below
    /// `min(token_count, (offset / 128 + 32) * 128)`, which is where the
    /// next query starts.
    pub fn list_tokens_on_sale(env: &Env, offset: u64, limit: u32) -> Vec<u64> {
        let limit = limit.min(MAX_PAGE_SIZE);
        let end = Registry::totals(env).token_count;

        let mut page = Vec::new(env);
        if limit == 0 {
            return page;
        }

        for bucket in scan_buckets(offset, end) {
            let base = bucket * SALE_BUCKET_BITS;
            let mut bits = Registry::sale_bucket(env, bucket);
            if offset > base {
                bits &= u128::MAX << (offset - base);
            }

            while bits != 0 {
                page.push_back(base + bits.trailing_zeros() as u64);
                if page.len() >= limit {
                    return page;
                }
                bits &= bits - 1; // drop lowest set bit
            }
        }
        page
    }

    fn check_trading(env: &Env) -> Result<Config, Error> {
        let config = ConfigStore::load(env)?;
        if !config.can_trade || !config.pricing.supports_trading() {
            return Err(Error::NotAllowed);
        }
        Ok(config)
    }
}

/// Sale index buckets holding ids in `offset..end`, at most `MAX_SCAN_BUCKETS`
pub fn scan_buckets(offset: u64, end: u64) -> Range<u64> {
    let first = offset / SALE_BUCKET_BITS;
    if offset >= end {
        return first..first;
    }

    let last = (end - 1) / SALE_BUCKET_BITS + 1;
    first..last.min(first.saturating_add(MAX_SCAN_BUCKETS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_starts_at_offset_bucket() {
        // ids 0..=127 live in bucket 0 and are never read
        assert_eq!(scan_buckets(200, 300), 1..3);
        assert_eq!(scan_buckets(256, 257), 2..3);
    }

    #[test]
    fn test_scan_past_last_id_is_empty() {
        assert!(scan_buckets(5, 5).is_empty());
        assert!(scan_buckets(1_000, 10).is_empty());
        assert!(scan_buckets(0, 0).is_empty());
    }

    #[test]
    fn test_scan_window_is_capped() {
        assert_eq!(scan_buckets(0, 1_000_000), 0..MAX_SCAN_BUCKETS);
        assert_eq!(scan_buckets(4_096, 1_000_000), 32..64);
    }
}
