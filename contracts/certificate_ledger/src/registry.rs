use crate::error::Error;
use crate::storage::{Certificate, CertificateStatus, DataKey, Listing, Totals, SALE_BUCKET_BITS};
use soroban_sdk::{Address, Env, Vec};

/// Authoritative certificate table and its aggregate counters
///
/// Redeemed certificates stay in the table as `Burned` tombstones so
/// their ids are never reassigned and keep failing lookups with
/// `NoSuchToken`.
pub struct Registry;

impl Registry {
    // Totals
    pub fn totals(env: &Env) -> Totals {
        env.storage()
            .instance()
            .get(&DataKey::Totals)
            .unwrap_or_default()
    }

    fn set_totals(env: &Env, totals: &Totals) {
        env.storage().instance().set(&DataKey::Totals, totals);
    }

    // Certificates
    pub fn certificate(env: &Env, id: u64) -> Result<Certificate, Error> {
        let mut certificate: Certificate = env
            .storage()
            .persistent()
            .get(&DataKey::Certificate(id))
            .ok_or(Error::NoSuchToken)?;

        if certificate.status != CertificateStatus::Live {
            return Err(Error::NoSuchToken);
        }

        if certificate.listing.on_sale
            && certificate.listing.generation != Self::listing_generation(env)
        {
            certificate.listing = Listing::none();
        }
        Ok(certificate)
    }

    pub fn owner_of(env: &Env, id: u64) -> Result<Address, Error> {
        Ok(Self::certificate(env, id)?.owner)
    }

    fn store(env: &Env, certificate: &Certificate) {
        env.storage()
            .persistent()
            .set(&DataKey::Certificate(certificate.id), certificate);
    }

    // Per-account counters
    pub fn balance_of(env: &Env, owner: &Address) -> u64 {
        env.storage()
            .persistent()
            .get(&DataKey::Balance(owner.clone()))
            .unwrap_or(0)
    }

    fn set_balance(env: &Env, owner: &Address, balance: u64) {
        let key = DataKey::Balance(owner.clone());
        if balance == 0 {
            env.storage().persistent().remove(&key);
        } else {
            env.storage().persistent().set(&key, &balance);
        }
    }

    pub fn minted_count(env: &Env, account: &Address) -> u32 {
        env.storage()
            .persistent()
            .get(&DataKey::MintedCount(account.clone()))
            .unwrap_or(0)
    }

    /// Create `count` certificates for `to`, each frozen at `invested_value`
    ///
    /// Ids continue from `token_count`; the mint also counts toward the
    /// recipient's lifetime minted count.
    pub fn mint(
        env: &Env,
        to: &Address,
        invested_value: i128,
        count: u32,
    ) -> Result<Vec<u64>, Error> {
        let mut totals = Self::totals(env);
        let principal = invested_value
            .checked_mul(count as i128)
            .ok_or(Error::ArithmeticOverflow)?;

        let mut ids = Vec::new(env);
        for _ in 0..count {
            let id = totals.token_count;
            Self::store(
                env,
                &Certificate {
                    id,
                    owner: to.clone(),
                    invested_value,
                    listing: Listing::none(),
                    status: CertificateStatus::Live,
                },
            );
            ids.push_back(id);
            totals.token_count = id.checked_add(1).ok_or(Error::ArithmeticOverflow)?;
        }

        totals.total_supply = totals
            .total_supply
            .checked_add(count as u64)
            .ok_or(Error::ArithmeticOverflow)?;
        totals.total_value_outstanding = totals
            .total_value_outstanding
            .checked_add(principal)
            .ok_or(Error::ArithmeticOverflow)?;
        Self::set_totals(env, &totals);

        let balance = Self::balance_of(env, to)
            .checked_add(count as u64)
            .ok_or(Error::ArithmeticOverflow)?;
        Self::set_balance(env, to, balance);

        let minted = Self::minted_count(env, to)
            .checked_add(count)
            .ok_or(Error::ArithmeticOverflow)?;
        env.storage()
            .persistent()
            .set(&DataKey::MintedCount(to.clone()), &minted);

        Ok(ids)
    }

    /// Move a live certificate to `to`; any listing is cleared
    pub fn transfer(env: &Env, mut certificate: Certificate, to: &Address) -> Result<(), Error> {
        let from = certificate.owner.clone();

        Self::clear_listing(env, &mut certificate);
        certificate.owner = to.clone();
        Self::store(env, &certificate);

        Self::set_balance(env, &from, Self::balance_of(env, &from).saturating_sub(1));
        let to_balance = Self::balance_of(env, to)
            .checked_add(1)
            .ok_or(Error::ArithmeticOverflow)?;
        Self::set_balance(env, to, to_balance);
        Ok(())
    }

    /// Tombstone a live certificate and release its principal
    pub fn burn(env: &Env, mut certificate: Certificate) -> Result<(), Error> {
        Self::clear_listing(env, &mut certificate);
        certificate.status = CertificateStatus::Burned;
        Self::store(env, &certificate);

        let owner = certificate.owner.clone();
        Self::set_balance(env, &owner, Self::balance_of(env, &owner).saturating_sub(1));

        let mut totals = Self::totals(env);
        totals.total_supply = totals
            .total_supply
            .checked_sub(1)
            .ok_or(Error::ArithmeticOverflow)?;
        totals.total_value_outstanding = totals
            .total_value_outstanding
            .checked_sub(certificate.invested_value)
            .ok_or(Error::ArithmeticOverflow)?;
        Self::set_totals(env, &totals);
        Ok(())
    }

    // Listings
    //
    // The sale index is a bitmap split into 128-id buckets, one persistent
    // entry per bucket. Listing or unlisting touches a single bucket.

    pub fn listing_generation(env: &Env) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::ListingGeneration)
            .unwrap_or(0)
    }

    /// Lapse every open listing at once
    ///
    /// Certificates keep their stale listing record until they are next
    /// written; reads treat it as unlisted. Old buckets are never read again.
    pub fn reset_listings(env: &Env) -> Result<(), Error> {
        let generation = Self::listing_generation(env)
            .checked_add(1)
            .ok_or(Error::ArithmeticOverflow)?;
        env.storage()
            .instance()
            .set(&DataKey::ListingGeneration, &generation);
        Ok(())
    }

    /// Bitmask of listed ids in `bucket`, bit `n` being id `bucket * 128 + n`
    pub fn sale_bucket(env: &Env, bucket: u64) -> u128 {
        let key = DataKey::SaleBucket(Self::listing_generation(env), bucket);
        env.storage().persistent().get(&key).unwrap_or(0)
    }

    fn mark_on_sale(env: &Env, id: u64, on_sale: bool) {
        let bucket = id / SALE_BUCKET_BITS;
        let bit = 1u128 << (id % SALE_BUCKET_BITS);

        let mut bits = Self::sale_bucket(env, bucket);
        if on_sale {
            bits |= bit;
        } else {
            bits &= !bit;
        }

        let key = DataKey::SaleBucket(Self::listing_generation(env), bucket);
        if bits == 0 {
            env.storage().persistent().remove(&key);
        } else {
            env.storage().persistent().set(&key, &bits);
        }
    }

    /// List a certificate, replacing any earlier listing
    pub fn list(env: &Env, mut certificate: Certificate, price: i128) {
        certificate.listing = Listing {
            on_sale: true,
            price,
            generation: Self::listing_generation(env),
        };
        Self::store(env, &certificate);
        Self::mark_on_sale(env, certificate.id, true);
    }

    pub fn unlist(env: &Env, mut certificate: Certificate) {
        Self::clear_listing(env, &mut certificate);
        Self::store(env, &certificate);
    }

    fn clear_listing(env: &Env, certificate: &mut Certificate) {
        if !certificate.listing.on_sale {
            return;
        }

        certificate.listing = Listing::none();
        Self::mark_on_sale(env, certificate.id, false);
    }
}
