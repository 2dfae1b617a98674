//! Storage helpers for initialization and admin bookkeeping

use soroban_sdk::{Address, Env, Symbol};

/// Storage key constants
pub mod keys {
    use soroban_sdk::{symbol_short, Symbol};

    pub const ADMIN: Symbol = symbol_short!("ADMIN");
    pub const INITIALIZED: Symbol = symbol_short!("INIT");
}

/// Storage helper functions
pub struct Storage;

impl Storage {
    /// Check whether the contract has completed its `initialize` call
    pub fn is_initialized(e: &Env) -> bool {
        e.storage().instance().has(&keys::INITIALIZED)
    }

    /// Mark the contract as initialized. Callers must ensure this happens
    /// at most once.
    pub fn set_initialized(e: &Env) {
        e.storage().instance().set(&keys::INITIALIZED, &true);
    }

    /// Get the admin address, if one has been set
    pub fn get_admin(e: &Env) -> Option<Address> {
        e.storage().instance().get(&keys::ADMIN)
    }

    /// Set the admin address
    pub fn set_admin(e: &Env, admin: &Address) {
        e.storage().instance().set(&keys::ADMIN, admin);
    }

    /// Generic instance storage getter
    pub fn get<T>(e: &Env, key: &Symbol) -> Option<T>
    where
        T: soroban_sdk::TryFromVal<Env, soroban_sdk::Val>,
    {
        e.storage().instance().get::<_, T>(key)
    }

    /// Generic instance storage setter
    pub fn set<T>(e: &Env, key: &Symbol, value: &T)
    where
        T: soroban_sdk::IntoVal<Env, soroban_sdk::Val>,
    {
        e.storage().instance().set(key, value);
    }

    /// Check if a key exists in instance storage
    pub fn has(e: &Env, key: &Symbol) -> bool {
        e.storage().instance().has(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::{contract, contractimpl};

    // Dummy contract used to provide a valid contract context for storage access
    #[contract]
    pub struct TestContract;

    #[contractimpl]
    impl TestContract {
        pub fn stub() {}
    }

    #[test]
    fn test_initialization() {
        let env = Env::default();
        let contract_id = env.register(TestContract, ());

        env.as_contract(&contract_id, || {
            assert!(!Storage::is_initialized(&env));

            Storage::set_initialized(&env);
            assert!(Storage::is_initialized(&env));
        });
    }

    #[test]
    fn test_admin_storage() {
        let env = Env::default();
        let admin = <soroban_sdk::Address as soroban_sdk::testutils::Address>::generate(&env);

        let contract_id = env.register(TestContract, ());

        env.as_contract(&contract_id, || {
            assert_eq!(Storage::get_admin(&env), None);

            Storage::set_admin(&env, &admin);
            assert_eq!(Storage::get_admin(&env), Some(admin));
        });
    }

    #[test]
    fn test_generic_get_set() {
        let env = Env::default();
        let contract_id = env.register(TestContract, ());

        env.as_contract(&contract_id, || {
            let key = soroban_sdk::symbol_short!("COUNT");
            assert!(!Storage::has(&env, &key));

            Storage::set(&env, &key, &42u64);
            assert!(Storage::has(&env, &key));
            assert_eq!(Storage::get::<u64>(&env, &key), Some(42));
        });
    }
}
