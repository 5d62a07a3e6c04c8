use crate::config::ConfigStore;
use crate::error::Error;
use crate::events::{BoughtEvent, MintedEvent};
use crate::funds::FundsLedger;
use crate::pricing::{self, Charge};
use crate::registry::Registry;
use crate::storage::Config;
use soroban_sdk::{Address, Env, Symbol, Vec};

pub struct Admission;

impl Admission {
    /// Buy `count` certificates at tier `value` (tiered pricing)
    ///
    /// Checks run in order: gate, batch size, value tier, raise cap,
    /// allowance, balance.
    pub fn buy(env: &Env, buyer: &Address, value: i128, count: u32) -> Result<Vec<u64>, Error> {
        buyer.require_auth();

        let config = ConfigStore::load(env)?;
        if !config.can_buy {
            return Err(Error::NotAllowed);
        }

        let tiered = config.pricing.tiered()?;

        if count == 0 || count > config.max_batch_count {
            return Err(Error::InvalidBatch);
        }

        if !ConfigStore::is_valid_value(env, value) {
            return Err(Error::InvalidValue);
        }

        let charge = pricing::charge(value, count, config.buy_fee_bps)?;

        let raised = Registry::totals(env)
            .total_value_outstanding
            .checked_add(charge.principal)
            .ok_or(Error::ArithmeticOverflow)?;
        if raised > tiered.max_value_to_raise {
            return Err(Error::RaiseCapExceeded);
        }

        Self::settle(env, buyer, value, count, &config, &charge)
    }

    /// Buy `count` units at the fixed unit value (fixed pricing)
    pub fn buy_units(env: &Env, buyer: &Address, count: u32) -> Result<Vec<u64>, Error> {
        buyer.require_auth();

        let config = ConfigStore::load(env)?;
        if !config.can_buy {
            return Err(Error::NotAllowed);
        }

        let fixed = config.pricing.fixed()?;

        if count == 0 {
            return Err(Error::InvalidBatch);
        }

        if fixed.unit_value <= 0 {
            return Err(Error::NotConfigured);
        }

        let minted = Registry::minted_count(env, buyer)
            .checked_add(count)
            .ok_or(Error::ArithmeticOverflow)?;
        if minted > fixed.max_mint_per_user {
            return Err(Error::MintCapExceeded);
        }

        let charge = pricing::charge(fixed.unit_value, count, config.buy_fee_bps)?;
        Self::settle(env, buyer, fixed.unit_value, count, &config, &charge)
    }

    /// Issue certificates without payment (owner only, fixed pricing)
    ///
    /// The certificates are valued at `unit_value` and count toward the
    /// recipient's minted total, but the per-user cap is not enforced.
    pub fn mint(env: &Env, caller: &Address, to: &Address, count: u32) -> Result<Vec<u64>, Error> {
        ConfigStore::require_owner(env, caller)?;

        if *to == env.current_contract_address() {
            return Err(Error::InvalidRecipient);
        }

        if count == 0 {
            return Err(Error::InvalidBatch);
        }

        let config = ConfigStore::load(env)?;
        let fixed = config.pricing.fixed()?;
        if fixed.unit_value <= 0 {
            return Err(Error::NotConfigured);
        }

        let ids = Registry::mint(env, to, fixed.unit_value, count)?;

        env.events().publish(
            (Symbol::new(env, "minted"), to.clone()),
            MintedEvent {
                to: to.clone(),
                ids: ids.clone(),
                unit_price: fixed.unit_value,
            },
        );

        Ok(ids)
    }

    /// Pull principal to the funds pool and the fee to the fees pool, then mint
    fn settle(
        env: &Env,
        buyer: &Address,
        unit_price: i128,
        count: u32,
        config: &Config,
        charge: &Charge,
    ) -> Result<Vec<u64>, Error> {
        let funds_collector = config.funds_collector()?;
        let fees_collector = config.fees_collector()?;
        let ledger = FundsLedger::new(env, &config.funds_token()?);

        ledger.ensure_can_pull(buyer, charge.total()?)?;
        ledger.pull(buyer, &funds_collector, charge.principal);
        ledger.pull(buyer, &fees_collector, charge.fee);

        let ids = Registry::mint(env, buyer, unit_price, count)?;

        env.events().publish(
            (Symbol::new(env, "bought"), buyer.clone()),
            BoughtEvent {
                buyer: buyer.clone(),
                ids: ids.clone(),
                unit_price,
                principal: charge.principal,
                fee: charge.fee,
            },
        );

        Ok(ids)
    }
}
