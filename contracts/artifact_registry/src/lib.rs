#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, token, Address, Env, String, Symbol, Vec,
};

/// Hard cap on the number of artifacts this registry will ever mint.
const MAX_ARTIFACTS: u32 = 42;

// ============ Storage Keys ============

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Owner,
    PaymentToken,
    Fee,
    WorkCount,
    Balance,
    Uri(u32),
    Holder(u32),
    Approved(u32),
    HolderCount(Address),
    TokenPrints(u32),
    HolderPrints(Address),
}

// ============ Data Types ============

/// One print request against a specific artifact, in insertion order.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PrintRecord {
    pub requester: Address,
    pub ts: u64,
}

/// One print request as seen from the requester's side.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HolderPrintRecord {
    pub artifact_id: u32,
    pub ts: u64,
}

// ============ Events ============

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PublishedEvent {
    pub id: u32,
    pub uri: String,
    pub holder: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ApprovedEvent {
    pub id: u32,
    pub spender: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransferredEvent {
    pub id: u32,
    pub from: Address,
    pub to: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PrintRequestedEvent {
    pub id: u32,
    pub requester: Address,
    pub payment: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeeUpdatedEvent {
    pub fee: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub to: Address,
    pub amount: i128,
}

// ============ Errors ============

#[contracterror]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum RegistryError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    NotOwner = 3,
    NotHolder = 4,
    NotAuthorized = 5,
    CapacityExceeded = 6,
    InvalidFee = 7,
    InsufficientFee = 8,
    UnknownArtifact = 9,
    NoFundsToWithdraw = 10,
}

// ============ Contract ============

#[contract]
pub struct ArtifactRegistryContract;

impl ArtifactRegistryContract {
    fn read_owner(env: &Env) -> Result<Address, RegistryError> {
        env.storage()
            .instance()
            .get(&DataKey::Owner)
            .ok_or(RegistryError::NotInitialized)
    }

    fn read_payment_token(env: &Env) -> Result<Address, RegistryError> {
        env.storage()
            .instance()
            .get(&DataKey::PaymentToken)
            .ok_or(RegistryError::NotInitialized)
    }

    fn read_fee(env: &Env) -> Result<i128, RegistryError> {
        env.storage()
            .instance()
            .get(&DataKey::Fee)
            .ok_or(RegistryError::NotInitialized)
    }

    fn read_work_count(env: &Env) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::WorkCount)
            .unwrap_or(0)
    }

    fn read_balance(env: &Env) -> i128 {
        env.storage().instance().get(&DataKey::Balance).unwrap_or(0)
    }

    /// Check the caller is the registry owner after its own auth passed.
    fn require_owner(env: &Env, caller: &Address) -> Result<(), RegistryError> {
        let owner = Self::read_owner(env)?;
        if *caller != owner {
            return Err(RegistryError::NotOwner);
        }
        Ok(())
    }

    /// Ids are 1-based and sequential; anything outside [1, work_count]
    /// does not exist.
    fn check_artifact(env: &Env, id: u32) -> Result<(), RegistryError> {
        if id == 0 || id > Self::read_work_count(env) {
            return Err(RegistryError::UnknownArtifact);
        }
        Ok(())
    }

    fn read_holder(env: &Env, id: u32) -> Result<Address, RegistryError> {
        env.storage()
            .persistent()
            .get(&DataKey::Holder(id))
            .ok_or(RegistryError::UnknownArtifact)
    }

    fn write_holder(env: &Env, id: u32, holder: &Address) {
        let key = DataKey::Holder(id);
        env.storage().persistent().set(&key, holder);
        env.storage().persistent().extend_ttl(&key, 100, 100);
    }

    fn read_holder_count(env: &Env, addr: &Address) -> u32 {
        env.storage()
            .persistent()
            .get(&DataKey::HolderCount(addr.clone()))
            .unwrap_or(0)
    }

    fn write_holder_count(env: &Env, addr: &Address, count: u32) {
        let key = DataKey::HolderCount(addr.clone());
        env.storage().persistent().set(&key, &count);
        env.storage().persistent().extend_ttl(&key, 100, 100);
    }

    /// Append one print event to both history indexes. The two containers
    /// always grow together; callers must have validated everything first.
    fn record_print(env: &Env, id: u32, requester: &Address, ts: u64) {
        let token_key = DataKey::TokenPrints(id);
        let mut by_token: Vec<PrintRecord> = env
            .storage()
            .persistent()
            .get(&token_key)
            .unwrap_or(Vec::new(env));
        by_token.push_back(PrintRecord {
            requester: requester.clone(),
            ts,
        });
        env.storage().persistent().set(&token_key, &by_token);
        env.storage().persistent().extend_ttl(&token_key, 100, 100);

        let holder_key = DataKey::HolderPrints(requester.clone());
        let mut by_holder: Vec<HolderPrintRecord> = env
            .storage()
            .persistent()
            .get(&holder_key)
            .unwrap_or(Vec::new(env));
        by_holder.push_back(HolderPrintRecord {
            artifact_id: id,
            ts,
        });
        env.storage().persistent().set(&holder_key, &by_holder);
        env.storage().persistent().extend_ttl(&holder_key, 100, 100);
    }
}

#[contractimpl]
impl ArtifactRegistryContract {
    /// Initialize the registry with its curator, the payment token used for
    /// print fees, and the initial fee. Callable exactly once.
    pub fn init(
        env: Env,
        owner: Address,
        payment_token: Address,
        fee: i128,
    ) -> Result<(), RegistryError> {
        if env.storage().instance().has(&DataKey::Owner) {
            return Err(RegistryError::AlreadyInitialized);
        }
        if fee <= 0 {
            return Err(RegistryError::InvalidFee);
        }

        env.storage().instance().set(&DataKey::Owner, &owner);
        env.storage()
            .instance()
            .set(&DataKey::PaymentToken, &payment_token);
        env.storage().instance().set(&DataKey::Fee, &fee);
        env.storage().instance().set(&DataKey::WorkCount, &0u32);
        env.storage().instance().set(&DataKey::Balance, &0i128);
        env.storage().instance().extend_ttl(100, 100);

        Ok(())
    }

    /// Mint the next artifact (owner only). The uri is an opaque reference
    /// string, immutable after mint. Returns the new 1-based id.
    ///
    /// Off-chain metadata indexers are expected to watch the `Published`
    /// event; the contract never calls out to them.
    pub fn publish(env: Env, caller: Address, uri: String) -> Result<u32, RegistryError> {
        caller.require_auth();
        Self::require_owner(&env, &caller)?;

        let count = Self::read_work_count(&env);
        if count >= MAX_ARTIFACTS {
            return Err(RegistryError::CapacityExceeded);
        }

        let id = count + 1;
        let uri_key = DataKey::Uri(id);
        env.storage().persistent().set(&uri_key, &uri);
        env.storage().persistent().extend_ttl(&uri_key, 100, 100);
        Self::write_holder(&env, id, &caller);
        Self::write_holder_count(&env, &caller, Self::read_holder_count(&env, &caller) + 1);
        env.storage().instance().set(&DataKey::WorkCount, &id);

        env.events().publish(
            (Symbol::new(&env, "Published"),),
            PublishedEvent {
                id,
                uri,
                holder: caller,
            },
        );

        Ok(id)
    }

    /// Record a single pre-authorized spender for one artifact. Only the
    /// current holder may approve; an approved spender cannot re-delegate.
    pub fn approve(
        env: Env,
        caller: Address,
        spender: Address,
        id: u32,
    ) -> Result<(), RegistryError> {
        caller.require_auth();
        Self::check_artifact(&env, id)?;

        let holder = Self::read_holder(&env, id)?;
        if caller != holder {
            return Err(RegistryError::NotAuthorized);
        }

        let key = DataKey::Approved(id);
        env.storage().persistent().set(&key, &spender);
        env.storage().persistent().extend_ttl(&key, 100, 100);

        env.events().publish(
            (Symbol::new(&env, "Approved"),),
            ApprovedEvent { id, spender },
        );

        Ok(())
    }

    /// Move an artifact from its current holder to `to`. The caller must be
    /// `from` itself or the approved spender for this id, and `from` must be
    /// the current holder. Any outstanding approval is cleared.
    pub fn transfer_from(
        env: Env,
        caller: Address,
        from: Address,
        to: Address,
        id: u32,
    ) -> Result<(), RegistryError> {
        caller.require_auth();
        Self::check_artifact(&env, id)?;

        let holder = Self::read_holder(&env, id)?;
        if from != holder {
            return Err(RegistryError::NotAuthorized);
        }
        let approved: Option<Address> = env.storage().persistent().get(&DataKey::Approved(id));
        if caller != from && Some(caller.clone()) != approved {
            return Err(RegistryError::NotAuthorized);
        }

        Self::write_holder(&env, id, &to);
        env.storage().persistent().remove(&DataKey::Approved(id));

        let from_count = Self::read_holder_count(&env, &from);
        Self::write_holder_count(&env, &from, from_count.saturating_sub(1));
        Self::write_holder_count(&env, &to, Self::read_holder_count(&env, &to) + 1);

        env.events().publish(
            (Symbol::new(&env, "Transferred"),),
            TransferredEvent { id, from, to },
        );

        Ok(())
    }

    /// Request a physical print of an artifact. Only the current holder may
    /// request, and the payment must cover the fee. The full payment is
    /// pulled into the contract and the request is appended to both history
    /// indexes. Ownership does not change; repeat requests are unbounded.
    pub fn request_print(
        env: Env,
        caller: Address,
        id: u32,
        payment: i128,
    ) -> Result<(), RegistryError> {
        caller.require_auth();
        Self::check_artifact(&env, id)?;

        let holder = Self::read_holder(&env, id)?;
        if caller != holder {
            return Err(RegistryError::NotHolder);
        }
        let fee = Self::read_fee(&env)?;
        if payment < fee {
            return Err(RegistryError::InsufficientFee);
        }

        let ts = env.ledger().timestamp();
        Self::record_print(&env, id, &caller, ts);

        let balance = Self::read_balance(&env);
        env.storage()
            .instance()
            .set(&DataKey::Balance, &(balance + payment));

        // Token movement last (checks-effects-interactions).
        let payment_token = Self::read_payment_token(&env)?;
        let token_client = token::Client::new(&env, &payment_token);
        token_client.transfer(&caller, &env.current_contract_address(), &payment);

        env.events().publish(
            (Symbol::new(&env, "PrintRequested"),),
            PrintRequestedEvent {
                id,
                requester: caller,
                payment,
            },
        );

        Ok(())
    }

    /// Replace the print fee (owner only). Zero is not a valid fee.
    pub fn update_fee(env: Env, caller: Address, new_fee: i128) -> Result<(), RegistryError> {
        caller.require_auth();
        Self::require_owner(&env, &caller)?;

        if new_fee <= 0 {
            return Err(RegistryError::InvalidFee);
        }
        env.storage().instance().set(&DataKey::Fee, &new_fee);

        env.events().publish(
            (Symbol::new(&env, "FeeUpdated"),),
            FeeUpdatedEvent { fee: new_fee },
        );

        Ok(())
    }

    /// Drain the accumulated print fees to the owner. Returns the amount
    /// transferred.
    pub fn withdraw(env: Env, caller: Address) -> Result<i128, RegistryError> {
        caller.require_auth();
        Self::require_owner(&env, &caller)?;

        let balance = Self::read_balance(&env);
        if balance <= 0 {
            return Err(RegistryError::NoFundsToWithdraw);
        }

        env.storage().instance().set(&DataKey::Balance, &0i128);

        let payment_token = Self::read_payment_token(&env)?;
        let token_client = token::Client::new(&env, &payment_token);
        token_client.transfer(&env.current_contract_address(), &caller, &balance);

        env.events().publish(
            (Symbol::new(&env, "Withdrawn"),),
            WithdrawnEvent {
                to: caller,
                amount: balance,
            },
        );

        Ok(balance)
    }

    // ============ Queries ============

    /// Read the curator address.
    pub fn owner(env: Env) -> Result<Address, RegistryError> {
        Self::read_owner(&env)
    }

    /// Read the payment token contract address.
    pub fn payment_token(env: Env) -> Result<Address, RegistryError> {
        Self::read_payment_token(&env)
    }

    /// Current holder of an artifact.
    pub fn owner_of(env: Env, id: u32) -> Result<Address, RegistryError> {
        Self::check_artifact(&env, id)?;
        Self::read_holder(&env, id)
    }

    /// Reference string recorded at mint time.
    pub fn token_uri(env: Env, id: u32) -> Result<String, RegistryError> {
        Self::check_artifact(&env, id)?;
        env.storage()
            .persistent()
            .get(&DataKey::Uri(id))
            .ok_or(RegistryError::UnknownArtifact)
    }

    /// Number of artifacts currently held by an address.
    pub fn balance_of_holder(env: Env, addr: Address) -> u32 {
        Self::read_holder_count(&env, &addr)
    }

    /// Total artifacts minted so far.
    pub fn current_works_count(env: Env) -> u32 {
        Self::read_work_count(&env)
    }

    /// Fixed mint capacity of this registry.
    pub fn max_artifacts_count() -> u32 {
        MAX_ARTIFACTS
    }

    /// Current print fee.
    pub fn fee(env: Env) -> Result<i128, RegistryError> {
        Self::read_fee(&env)
    }

    /// Accumulated, not-yet-withdrawn print fees.
    pub fn balance_of_contract(env: Env) -> i128 {
        Self::read_balance(&env)
    }

    /// Full print history of one artifact, oldest first. Empty if the
    /// artifact exists but was never printed.
    pub fn get_print_histories_by_token_id(
        env: Env,
        id: u32,
    ) -> Result<Vec<PrintRecord>, RegistryError> {
        Self::check_artifact(&env, id)?;
        Ok(env
            .storage()
            .persistent()
            .get(&DataKey::TokenPrints(id))
            .unwrap_or(Vec::new(&env)))
    }

    /// Full print history of one requester across all artifacts, oldest
    /// first. Always succeeds; unknown addresses get an empty list.
    pub fn get_print_histories_by_holder_address(
        env: Env,
        addr: Address,
    ) -> Vec<HolderPrintRecord> {
        env.storage()
            .persistent()
            .get(&DataKey::HolderPrints(addr))
            .unwrap_or(Vec::new(&env))
    }
}

#[cfg(test)]
extern crate std;
