use crate::error::Error;
use crate::storage::{Config, DataKey, PricingPolicy, TieredPricing};
use soroban_sdk::{Address, Env};

pub struct ConfigStore;

impl ConfigStore {
    /// Store the owner and the default configuration
    ///
    /// Every gate starts closed and the raise cap starts at zero,
    /// so nothing can be bought until the owner configures the ledger.
    pub fn initialize(env: &Env, owner: &Address) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Owner) {
            return Err(Error::AlreadyInitialized);
        }

        owner.require_auth();

        let config = Config {
            funds_token: None,
            funds_collector: None,
            fees_collector: None,
            profit_to_pay_bps: 0,
            buy_fee_bps: 0,
            trade_fee_bps: 0,
            can_buy: false,
            can_trade: false,
            can_claim: false,
            max_batch_count: 0,
            pricing: PricingPolicy::Tiered(TieredPricing {
                max_value_to_raise: 0,
            }),
        };

        env.storage().instance().set(&DataKey::Owner, owner);
        Self::save(env, &config);
        Ok(())
    }

    pub fn owner(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Owner)
            .ok_or(Error::NotInitialized)
    }

    pub fn set_owner(env: &Env, owner: &Address) {
        env.storage().instance().set(&DataKey::Owner, owner);
    }

    /// Caller must authorize and be the stored owner
    pub fn require_owner(env: &Env, caller: &Address) -> Result<(), Error> {
        caller.require_auth();

        let owner = Self::owner(env)?;
        if *caller != owner {
            return Err(Error::Unauthorized);
        }
        Ok(())
    }

    pub fn load(env: &Env) -> Result<Config, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Config)
            .ok_or(Error::NotInitialized)
    }

    pub fn save(env: &Env, config: &Config) {
        env.storage().instance().set(&DataKey::Config, config);
    }

    /// Owner-gated read-modify-write of the configuration
    ///
    /// Nothing is written when `apply` fails.
    pub fn update<F>(env: &Env, caller: &Address, apply: F) -> Result<Config, Error>
    where
        F: FnOnce(&mut Config) -> Result<(), Error>,
    {
        Self::require_owner(env, caller)?;

        let mut config = Self::load(env)?;
        apply(&mut config)?;
        Self::save(env, &config);
        Ok(config)
    }

    // Valid value set (tiered pricing)
    pub fn is_valid_value(env: &Env, amount: i128) -> bool {
        env.storage()
            .persistent()
            .get(&DataKey::ValidValue(amount))
            .unwrap_or(false)
    }

    pub fn add_valid_value(env: &Env, caller: &Address, amount: i128) -> Result<(), Error> {
        Self::require_owner(env, caller)?;

        if amount <= 0 {
            return Err(Error::InvalidValue);
        }

        env.storage()
            .persistent()
            .set(&DataKey::ValidValue(amount), &true);
        Ok(())
    }

    pub fn delete_valid_value(env: &Env, caller: &Address, amount: i128) -> Result<(), Error> {
        Self::require_owner(env, caller)?;

        env.storage()
            .persistent()
            .remove(&DataKey::ValidValue(amount));
        Ok(())
    }
}

impl Config {
    pub fn funds_token(&self) -> Result<Address, Error> {
        self.funds_token.clone().ok_or(Error::NotConfigured)
    }

    pub fn funds_collector(&self) -> Result<Address, Error> {
        self.funds_collector.clone().ok_or(Error::NotConfigured)
    }

    pub fn fees_collector(&self) -> Result<Address, Error> {
        self.fees_collector.clone().ok_or(Error::NotConfigured)
    }
}
