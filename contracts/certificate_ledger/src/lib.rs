#![no_std]

mod admission;
mod config;
mod error;
mod events;
mod funds;
mod market;
mod pricing;
mod redemption;
mod registry;
mod storage;

pub use error::Error;
pub use storage::{
    Certificate, CertificateStatus, Config, FixedPricing, Listing, PricingPolicy, TieredPricing,
};

use admission::Admission;
use config::ConfigStore;
use events::{AssetRecoveredEvent, OwnershipTransferredEvent, PricingChangedEvent};
use funds::FundsLedger;
use market::Marketplace;
use pricing::check_bps;
use redemption::Redemption;
use registry::Registry;

use soroban_sdk::{contract, contractimpl, log, Address, Env, Symbol, Vec};

#[contract]
pub struct CertificateLedger;

#[contractimpl]
impl CertificateLedger {
    // ============================================
    // INITIALIZATION & OWNERSHIP
    // ============================================

    /// Initialize the ledger with its privileged owner
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    pub fn initialize(env: Env, owner: Address) -> Result<(), Error> {
        ConfigStore::initialize(&env, &owner)
    }

    /// Hand the privileged role to `new_owner`
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `Unauthorized`: Caller is not the owner
    pub fn transfer_ownership(env: Env, caller: Address, new_owner: Address) -> Result<(), Error> {
        ConfigStore::require_owner(&env, &caller)?;
        ConfigStore::set_owner(&env, &new_owner);

        env.events().publish(
            (Symbol::new(&env, "owner"),),
            OwnershipTransferredEvent {
                previous_owner: caller,
                new_owner,
            },
        );

        Ok(())
    }

    pub fn owner(env: Env) -> Result<Address, Error> {
        ConfigStore::owner(&env)
    }

    // ============================================
    // ADMIN: CONFIGURATION
    // ============================================

    pub fn set_funds_token(env: Env, caller: Address, token: Address) -> Result<(), Error> {
        ConfigStore::update(&env, &caller, |config| {
            config.funds_token = Some(token);
            Ok(())
        })?;
        Ok(())
    }

    pub fn set_funds_collector(env: Env, caller: Address, collector: Address) -> Result<(), Error> {
        ConfigStore::update(&env, &caller, |config| {
            config.funds_collector = Some(collector);
            Ok(())
        })?;
        Ok(())
    }

    pub fn set_fees_collector(env: Env, caller: Address, collector: Address) -> Result<(), Error> {
        ConfigStore::update(&env, &caller, |config| {
            config.fees_collector = Some(collector);
            Ok(())
        })?;
        Ok(())
    }

    /// Set the redemption premium in basis points (5000 = +50%)
    ///
    /// # Errors
    /// - `InvalidBasisPoints`: bps above 10000
    pub fn set_profit_to_pay(env: Env, caller: Address, bps: u32) -> Result<(), Error> {
        ConfigStore::update(&env, &caller, |config| {
            config.profit_to_pay_bps = check_bps(bps)?;
            Ok(())
        })?;
        Ok(())
    }

    pub fn set_can_buy(env: Env, caller: Address, enabled: bool) -> Result<(), Error> {
        ConfigStore::update(&env, &caller, |config| {
            config.can_buy = enabled;
            Ok(())
        })?;
        Ok(())
    }

    pub fn set_can_trade(env: Env, caller: Address, enabled: bool) -> Result<(), Error> {
        ConfigStore::update(&env, &caller, |config| {
            config.can_trade = enabled;
            Ok(())
        })?;
        Ok(())
    }

    pub fn set_can_claim(env: Env, caller: Address, enabled: bool) -> Result<(), Error> {
        ConfigStore::update(&env, &caller, |config| {
            config.can_claim = enabled;
            Ok(())
        })?;
        Ok(())
    }

    /// Cap on aggregate outstanding principal (tiered pricing)
    ///
    /// # Errors
    /// - `PricingModeMismatch`: Fixed pricing is active
    /// - `InvalidValue`: Amount is negative
    pub fn set_max_value_to_raise(env: Env, caller: Address, amount: i128) -> Result<(), Error> {
        ConfigStore::update(&env, &caller, |config| {
            if amount < 0 {
                return Err(Error::InvalidValue);
            }
            config.pricing.tiered_mut()?.max_value_to_raise = amount;
            Ok(())
        })?;
        Ok(())
    }

    /// Accept `amount` as a unit price tier
    ///
    /// # Errors
    /// - `InvalidValue`: Amount must be positive
    pub fn add_valid_values(env: Env, caller: Address, amount: i128) -> Result<(), Error> {
        ConfigStore::add_valid_value(&env, &caller, amount)
    }

    pub fn delete_valid_values(env: Env, caller: Address, amount: i128) -> Result<(), Error> {
        ConfigStore::delete_valid_value(&env, &caller, amount)
    }

    pub fn set_max_batch_count(env: Env, caller: Address, count: u32) -> Result<(), Error> {
        ConfigStore::update(&env, &caller, |config| {
            config.max_batch_count = count;
            Ok(())
        })?;
        Ok(())
    }

    pub fn set_buy_fee(env: Env, caller: Address, bps: u32) -> Result<(), Error> {
        ConfigStore::update(&env, &caller, |config| {
            config.buy_fee_bps = check_bps(bps)?;
            Ok(())
        })?;
        Ok(())
    }

    pub fn set_trade_fee(env: Env, caller: Address, bps: u32) -> Result<(), Error> {
        ConfigStore::update(&env, &caller, |config| {
            config.trade_fee_bps = check_bps(bps)?;
            Ok(())
        })?;
        Ok(())
    }

    /// Price of one unit (fixed pricing)
    ///
    /// # Errors
    /// - `PricingModeMismatch`: Tiered pricing is active
    /// - `InvalidValue`: Amount must be positive
    pub fn set_unit_value(env: Env, caller: Address, amount: i128) -> Result<(), Error> {
        ConfigStore::update(&env, &caller, |config| {
            if amount <= 0 {
                return Err(Error::InvalidValue);
            }
            config.pricing.fixed_mut()?.unit_value = amount;
            Ok(())
        })?;
        Ok(())
    }

    /// Lifetime per-address mint cap (fixed pricing)
    ///
    /// # Errors
    /// - `PricingModeMismatch`: Tiered pricing is active
    pub fn set_max_mint_per_user(env: Env, caller: Address, count: u32) -> Result<(), Error> {
        ConfigStore::update(&env, &caller, |config| {
            config.pricing.fixed_mut()?.max_mint_per_user = count;
            Ok(())
        })?;
        Ok(())
    }

    /// Switch to tiered pricing (value tiers, raise cap, secondary market)
    pub fn use_tiered_pricing(
        env: Env,
        caller: Address,
        max_value_to_raise: i128,
    ) -> Result<(), Error> {
        if max_value_to_raise < 0 {
            return Err(Error::InvalidValue);
        }
        Self::set_pricing(
            &env,
            &caller,
            PricingPolicy::Tiered(TieredPricing { max_value_to_raise }),
        )
    }

    /// Switch to fixed pricing (single unit value, per-user mint cap)
    ///
    /// Every open listing lapses and stays lapsed if tiered pricing is
    /// restored later. `max_batch_count` still bounds `claim` in this mode,
    /// so claims fail with `InvalidBatch` while it is 0.
    pub fn use_fixed_pricing(
        env: Env,
        caller: Address,
        unit_value: i128,
        max_mint_per_user: u32,
    ) -> Result<(), Error> {
        if unit_value <= 0 {
            return Err(Error::InvalidValue);
        }
        Self::set_pricing(
            &env,
            &caller,
            PricingPolicy::Fixed(FixedPricing {
                unit_value,
                max_mint_per_user,
            }),
        )
    }

    // ============================================
    // ADMIN: ISSUANCE & HOUSEKEEPING
    // ============================================

    /// Issue `count` certificates to `to` without payment
    ///
    /// # Errors
    /// - `Unauthorized`: Caller is not the owner
    /// - `InvalidRecipient`: `to` is this contract
    /// - `InvalidBatch`: count is zero
    /// - `PricingModeMismatch`: Tiered pricing is active
    pub fn mint(env: Env, caller: Address, to: Address, count: u32) -> Result<Vec<u64>, Error> {
        Admission::mint(&env, &caller, &to, count)
    }

    /// Sweep this contract's whole balance of `token` to the owner
    pub fn recover_stray_asset(env: Env, caller: Address, token: Address) -> Result<i128, Error> {
        ConfigStore::require_owner(&env, &caller)?;

        let amount = FundsLedger::new(&env, &token).sweep(&caller);

        env.events().publish(
            (Symbol::new(&env, "recovered"), token.clone()),
            AssetRecoveredEvent {
                token,
                to: caller,
                amount,
            },
        );

        Ok(amount)
    }

    // ============================================
    // ADMISSION
    // ============================================

    /// Buy `count` certificates priced at tier `value`
    ///
    /// Pulls `value × count` to the funds collector and the buy fee to the
    /// fees collector, then mints. Returns the new ids.
    ///
    /// # Errors
    /// - `NotAllowed`: Buying is disabled
    /// - `PricingModeMismatch`: Fixed pricing is active
    /// - `InvalidBatch`: count is zero or above max_batch_count
    /// - `InvalidValue`: value is not a valid tier
    /// - `RaiseCapExceeded`: Would exceed max_value_to_raise
    /// - `InsufficientAllowance` / `InsufficientBalance`: Payment cannot be pulled
    pub fn buy(env: Env, buyer: Address, value: i128, count: u32) -> Result<Vec<u64>, Error> {
        Admission::buy(&env, &buyer, value, count)
    }

    /// Buy `count` units at the fixed unit value
    ///
    /// # Errors
    /// - `NotAllowed`: Buying is disabled
    /// - `PricingModeMismatch`: Tiered pricing is active
    /// - `InvalidBatch`: count is zero
    /// - `MintCapExceeded`: Would exceed max_mint_per_user
    /// - `InsufficientAllowance` / `InsufficientBalance`: Payment cannot be pulled
    pub fn buy_units(env: Env, buyer: Address, count: u32) -> Result<Vec<u64>, Error> {
        Admission::buy_units(&env, &buyer, count)
    }

    // ============================================
    // SECONDARY MARKET
    // ============================================

    /// # Errors
    /// - `NotAllowed`: Trading is disabled
    /// - `NoSuchToken`: Certificate does not exist
    /// - `NotOwner`: Caller does not own the certificate
    /// - `InvalidValue`: price is negative
    pub fn put_on_sale(env: Env, seller: Address, id: u64, price: i128) -> Result<(), Error> {
        Marketplace::put_on_sale(&env, &seller, id, price)
    }

    /// # Errors
    /// - `NotAllowed`: Trading is disabled
    /// - `NoSuchToken`: Certificate does not exist
    /// - `NotOwner`: Caller does not own the certificate
    /// - `NotListed`: Certificate is not on sale
    pub fn remove_from_sale(env: Env, seller: Address, id: u64) -> Result<(), Error> {
        Marketplace::remove_from_sale(&env, &seller, id)
    }

    /// # Errors
    /// - `NotAllowed`: Trading is disabled
    /// - `NoSuchToken`: Certificate does not exist
    /// - `SelfTrade`: Caller already owns the certificate
    /// - `NotListed`: Certificate is not on sale
    /// - `InsufficientAllowance` / `InsufficientBalance`: Payment cannot be pulled
    pub fn trade(env: Env, buyer: Address, id: u64) -> Result<(), Error> {
        Marketplace::trade(&env, &buyer, id)
    }

    /// Certificates only change hands through `trade`
    pub fn transfer(env: Env, from: Address, to: Address, id: u64) -> Result<(), Error> {
        from.require_auth();
        log!(&env, "direct transfer rejected: {} -> {} ({})", from, to, id);
        Err(Error::NotAllowed)
    }

    pub fn transfer_from(
        env: Env,
        spender: Address,
        from: Address,
        to: Address,
        id: u64,
    ) -> Result<(), Error> {
        spender.require_auth();
        log!(&env, "direct transfer rejected: {} -> {} ({})", from, to, id);
        Err(Error::NotAllowed)
    }

    // ============================================
    // REDEMPTION
    // ============================================

    /// Burn `ids` for principal plus the profit premium
    ///
    /// # Errors
    /// - `NotAllowed`: Claiming is disabled
    /// - `InvalidBatch`: ids is empty or longer than max_batch_count
    /// - `NoSuchToken`: An id does not exist or repeats
    /// - `NotOwner`: Caller does not own every id
    /// - `InsufficientAllowance` / `InsufficientBalance`: Funds pool cannot pay
    pub fn claim(env: Env, claimant: Address, ids: Vec<u64>) -> Result<i128, Error> {
        Redemption::claim(&env, &claimant, &ids)
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    pub fn config(env: Env) -> Result<Config, Error> {
        ConfigStore::load(&env)
    }

    pub fn funds_token(env: Env) -> Result<Option<Address>, Error> {
        Ok(ConfigStore::load(&env)?.funds_token)
    }

    pub fn funds_collector(env: Env) -> Result<Option<Address>, Error> {
        Ok(ConfigStore::load(&env)?.funds_collector)
    }

    pub fn fees_collector(env: Env) -> Result<Option<Address>, Error> {
        Ok(ConfigStore::load(&env)?.fees_collector)
    }

    pub fn profit_to_pay(env: Env) -> Result<u32, Error> {
        Ok(ConfigStore::load(&env)?.profit_to_pay_bps)
    }

    pub fn can_buy(env: Env) -> Result<bool, Error> {
        Ok(ConfigStore::load(&env)?.can_buy)
    }

    pub fn can_trade(env: Env) -> Result<bool, Error> {
        Ok(ConfigStore::load(&env)?.can_trade)
    }

    pub fn can_claim(env: Env) -> Result<bool, Error> {
        Ok(ConfigStore::load(&env)?.can_claim)
    }

    pub fn max_value_to_raise(env: Env) -> Result<i128, Error> {
        Ok(ConfigStore::load(&env)?.pricing.tiered()?.max_value_to_raise)
    }

    pub fn valid_values(env: Env, amount: i128) -> bool {
        ConfigStore::is_valid_value(&env, amount)
    }

    pub fn max_batch_count(env: Env) -> Result<u32, Error> {
        Ok(ConfigStore::load(&env)?.max_batch_count)
    }

    pub fn buy_fee(env: Env) -> Result<u32, Error> {
        Ok(ConfigStore::load(&env)?.buy_fee_bps)
    }

    pub fn trade_fee(env: Env) -> Result<u32, Error> {
        Ok(ConfigStore::load(&env)?.trade_fee_bps)
    }

    pub fn unit_value(env: Env) -> Result<i128, Error> {
        Ok(ConfigStore::load(&env)?.pricing.fixed()?.unit_value)
    }

    pub fn max_mint_per_user(env: Env) -> Result<u32, Error> {
        Ok(ConfigStore::load(&env)?.pricing.fixed()?.max_mint_per_user)
    }

    pub fn pricing_policy(env: Env) -> Result<PricingPolicy, Error> {
        Ok(ConfigStore::load(&env)?.pricing)
    }

    pub fn total_supply(env: Env) -> u64 {
        Registry::totals(&env).total_supply
    }

    pub fn token_count(env: Env) -> u64 {
        Registry::totals(&env).token_count
    }

    pub fn total_value_outstanding(env: Env) -> i128 {
        Registry::totals(&env).total_value_outstanding
    }

    pub fn balance_of(env: Env, owner: Address) -> u64 {
        Registry::balance_of(&env, &owner)
    }

    /// Lifetime count of certificates minted to `account`
    pub fn minted_count(env: Env, account: Address) -> u32 {
        Registry::minted_count(&env, &account)
    }

    /// # Errors
    /// - `NoSuchToken`: Certificate does not exist or was redeemed
    pub fn owner_of(env: Env, id: u64) -> Result<Address, Error> {
        Registry::owner_of(&env, id)
    }

    pub fn certificate(env: Env, id: u64) -> Result<Certificate, Error> {
        Registry::certificate(&env, id)
    }

    pub fn listing(env: Env, id: u64) -> Result<Listing, Error> {
        Marketplace::listing(&env, id)
    }

    /// Listed ids `>= offset`, ascending, at most `limit` (capped at 100)
    ///
    /// One call covers at most 4,096 ids from the 128-id bucket holding
    /// `offset`; see `Marketplace::list_tokens_on_sale` for resuming.
    pub fn list_tokens_on_sale(env: Env, offset: u64, limit: u32) -> Vec<u64> {
        Marketplace::list_tokens_on_sale(&env, offset, limit)
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn set_pricing(env: &Env, caller: &Address, policy: PricingPolicy) -> Result<(), Error> {
        ConfigStore::update(env, caller, |config| {
            config.pricing = policy.clone();
            Ok(())
        })?;

        if !policy.supports_trading() {
            Registry::reset_listings(env)?;
        }

        env.events()
            .publish((Symbol::new(env, "pricing"),), PricingChangedEvent { policy });

        Ok(())
    }
}
