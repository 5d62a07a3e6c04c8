use soroban_sdk::{contracttype, Address, Vec};

use crate::storage::PricingPolicy;

#[contracttype]
#[derive(Clone, Debug)]
pub struct BoughtEvent {
    pub buyer: Address,
    pub ids: Vec<u64>,
    pub unit_price: i128,
    pub principal: i128,
    pub fee: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct MintedEvent {
    pub to: Address,
    pub ids: Vec<u64>,
    pub unit_price: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct ListedEvent {
    pub id: u64,
    pub seller: Address,
    pub price: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct UnlistedEvent {
    pub id: u64,
    pub seller: Address,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct TradedEvent {
    pub id: u64,
    pub seller: Address,
    pub buyer: Address,
    pub price: i128,
    pub fee: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct ClaimedEvent {
    pub claimant: Address,
    pub ids: Vec<u64>,
    pub principal: i128,
    pub payout: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct PricingChangedEvent {
    pub policy: PricingPolicy,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct AssetRecoveredEvent {
    pub token: Address,
    pub to: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct OwnershipTransferredEvent {
    pub previous_owner: Address,
    pub new_owner: Address,
}
