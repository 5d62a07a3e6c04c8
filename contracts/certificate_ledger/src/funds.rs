use crate::error::Error;
use soroban_sdk::{log, token, Address, Env};

/// Call-through to the external value ledger
///
/// Payments are pulled with `transfer_from`, so every payer must have
/// approved this contract beforehand. `ensure_can_pull` checks the full
/// amount of a call before the first transfer; a call never moves part
/// of a payment.
pub struct FundsLedger<'a> {
    env: &'a Env,
    client: token::Client<'a>,
}

impl<'a> FundsLedger<'a> {
    pub fn new(env: &'a Env, token: &Address) -> Self {
        FundsLedger {
            env,
            client: token::Client::new(env, token),
        }
    }

    /// Allowance first, then balance, matching the token's own check order
    pub fn ensure_can_pull(&self, from: &Address, amount: i128) -> Result<(), Error> {
        let spender = self.env.current_contract_address();

        let allowance = self.client.allowance(from, &spender);
        if allowance < amount {
            log!(self.env, "insufficient allowance: {} < {}", allowance, amount);
            return Err(Error::InsufficientAllowance);
        }

        let balance = self.client.balance(from);
        if balance < amount {
            log!(self.env, "insufficient balance: {} < {}", balance, amount);
            return Err(Error::InsufficientBalance);
        }

        Ok(())
    }

    pub fn pull(&self, from: &Address, to: &Address, amount: i128) {
        if amount == 0 {
            return;
        }

        let spender = self.env.current_contract_address();
        self.client.transfer_from(&spender, from, to, &amount);
    }

    /// Send the contract's whole balance of this token to `to`
    pub fn sweep(&self, to: &Address) -> i128 {
        let contract = self.env.current_contract_address();
        let amount = self.client.balance(&contract);

        if amount > 0 {
            self.client.transfer(&contract, to, &amount);
        }
        amount
    }
}
