use soroban_sdk::{contracttype, Address};

// Constants
#[cfg(test)]
pub const UNIT: i128 = 1_000_000_000_000_000_000; // 18 decimals
pub const BASIS_POINTS: u32 = 10_000; // 100% = 10,000 basis points
pub const MAX_PAGE_SIZE: u32 = 100;
pub const SALE_BUCKET_BITS: u64 = 128; // ids per sale index entry
pub const MAX_SCAN_BUCKETS: u64 = 32; // 4,096 ids per page query

/// Tiered pricing: buyers pick a price from the valid value set,
/// aggregate outstanding principal is capped.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TieredPricing {
    pub max_value_to_raise: i128,
}

/// Fixed pricing: every unit costs `unit_value`, each address may
/// mint at most `max_mint_per_user` units over its lifetime.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FixedPricing {
    pub unit_value: i128,
    pub max_mint_per_user: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PricingPolicy {
    Tiered(TieredPricing),
    Fixed(FixedPricing),
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// Value ledger every payment is settled in
    pub funds_token: Option<Address>,
    /// Receives principal, pays out redemptions
    pub funds_collector: Option<Address>,
    /// Receives buy and trade fees
    pub fees_collector: Option<Address>,
    /// Redemption premium (5000 = +50% of principal)
    pub profit_to_pay_bps: u32,
    pub buy_fee_bps: u32,
    pub trade_fee_bps: u32,
    pub can_buy: bool,
    pub can_trade: bool,
    pub can_claim: bool,
    /// Upper bound on certificates per buy and per claim
    pub max_batch_count: u32,
    pub pricing: PricingPolicy,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Listing {
    pub on_sale: bool,
    pub price: i128,
    /// Listing generation the offer was made in; offers from an
    /// earlier generation have lapsed
    pub generation: u32,
}

impl Listing {
    pub fn none() -> Self {
        Listing {
            on_sale: false,
            price: 0,
            generation: 0,
        }
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CertificateStatus {
    /// Certificate is held and redeemable
    Live = 0,
    /// Certificate was redeemed; the id is never reused
    Burned = 1,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Certificate {
    pub id: u64,
    pub owner: Address,
    /// Price paid at admission, frozen for redemption
    pub invested_value: i128,
    pub listing: Listing,
    pub status: CertificateStatus,
}

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Totals {
    /// Live certificate count
    pub total_supply: u64,
    /// Lifetime minted count, next id to assign
    pub token_count: u64,
    /// Sum of invested_value over live certificates
    pub total_value_outstanding: i128,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Owner,
    Config,
    Totals,
    ValidValue(i128),
    Certificate(u64),
    Balance(Address),
    MintedCount(Address),
    ListingGeneration,
    SaleBucket(u32, u64), // (generation, id / 128) → bitmask of listed ids
}
