use crate::config::ConfigStore;
use crate::error::Error;
use crate::events::ClaimedEvent;
use crate::funds::FundsLedger;
use crate::pricing;
use crate::registry::Registry;
use soroban_sdk::{Address, Env, Map, Symbol, Vec};

pub struct Redemption;

impl Redemption {
    /// Burn `ids` and pay principal plus premium from the funds pool
    ///
    /// Every id is checked before anything moves. An id repeated within
    /// the batch fails as `NoSuchToken` on its second occurrence, since
    /// the first occurrence already redeems it.
    pub fn claim(env: &Env, claimant: &Address, ids: &Vec<u64>) -> Result<i128, Error> {
        claimant.require_auth();

        let config = ConfigStore::load(env)?;
        if !config.can_claim {
            return Err(Error::NotAllowed);
        }

        if ids.is_empty() || ids.len() > config.max_batch_count {
            return Err(Error::InvalidBatch);
        }

        let mut seen: Map<u64, bool> = Map::new(env);
        let mut certificates = Vec::new(env);
        let mut principal: i128 = 0;

        for id in ids.iter() {
            if seen.contains_key(id) {
                return Err(Error::NoSuchToken);
            }

            let certificate = Registry::certificate(env, id)?;
            if certificate.owner != *claimant {
                return Err(Error::NotOwner);
            }

            principal = principal
                .checked_add(certificate.invested_value)
                .ok_or(Error::ArithmeticOverflow)?;
            seen.set(id, true);
            certificates.push_back(certificate);
        }

        let payout = pricing::redemption_payout(principal, config.profit_to_pay_bps)?;

        let funds_collector = config.funds_collector()?;
        let ledger = FundsLedger::new(env, &config.funds_token()?);

        ledger.ensure_can_pull(&funds_collector, payout)?;
        ledger.pull(&funds_collector, claimant, payout);

        for certificate in certificates.iter() {
            Registry::burn(env, certificate)?;
        }

        env.events().publish(
            (Symbol::new(env, "claimed"), claimant.clone()),
            ClaimedEvent {
                claimant: claimant.clone(),
                ids: ids.clone(),
                principal,
                payout,
            },
        );

        Ok(payout)
    }
}
