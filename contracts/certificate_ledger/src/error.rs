use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // ============================================
    // INITIALIZATION ERRORS (1-5)
    // ============================================
    /// Contract already initialized
    AlreadyInitialized = 1,
    /// Contract not initialized
    NotInitialized = 2,
    /// Funds token, a collector or the unit value has not been set
    NotConfigured = 3,

    // ============================================
    // AUTHORIZATION ERRORS (10-15)
    // ============================================
    /// Caller is not the contract owner
    Unauthorized = 10,
    /// Caller does not own the certificate
    NotOwner = 11,

    // ============================================
    // GATE ERRORS (20-29)
    // ============================================
    /// Feature gate is off, or the transfer path is disallowed
    NotAllowed = 20,
    /// Operation belongs to the pricing mode that is not active
    PricingModeMismatch = 21,

    // ============================================
    // INPUT ERRORS (30-39)
    // ============================================
    /// Value is not an accepted price tier, or an amount is out of range
    InvalidValue = 30,
    /// Batch size is zero or above max_batch_count
    InvalidBatch = 31,
    /// Certificates cannot be minted to this address
    InvalidRecipient = 32,
    /// Basis points must be within [0, 10000]
    InvalidBasisPoints = 33,

    // ============================================
    // POLICY LIMIT ERRORS (40-49)
    // ============================================
    /// Buy would push outstanding principal above max_value_to_raise
    RaiseCapExceeded = 40,
    /// Buy would push the caller above max_mint_per_user
    MintCapExceeded = 41,

    // ============================================
    // CERTIFICATE ERRORS (50-59)
    // ============================================
    /// Certificate was never minted or has been redeemed
    NoSuchToken = 50,
    /// Certificate is not listed for sale
    NotListed = 51,
    /// Buyer already owns the certificate
    SelfTrade = 52,

    // ============================================
    // FUNDS ERRORS (60-69)
    // ============================================
    /// Payer has not approved enough of the funds token
    InsufficientAllowance = 60,
    /// Payer does not hold enough of the funds token
    InsufficientBalance = 61,
    /// Amount arithmetic overflowed
    ArithmeticOverflow = 62,
}
