//! Access control patterns

use super::storage::Storage;
use soroban_sdk::{Address, Env};

/// Access control helper functions
///
/// These are pure checks; callers surface their own error codes so that
/// authorization failures stay caller-visible and distinguishable.
pub struct AccessControl;

impl AccessControl {
    /// Check if an address is the stored admin
    pub fn is_admin(e: &Env, address: &Address) -> bool {
        match Storage::get_admin(e) {
            Some(admin) => *address == admin,
            None => false,
        }
    }

    /// Check if a caller matches an entry's owner
    pub fn is_owner(caller: &Address, owner: &Address) -> bool {
        *caller == *owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::testutils::Address as TestAddress;
    use soroban_sdk::{contract, contractimpl};

    // Dummy contract used to provide a valid contract context
    #[contract]
    pub struct TestContract;

    #[contractimpl]
    impl TestContract {
        pub fn stub() {}
    }

    #[test]
    fn test_is_admin() {
        let env = Env::default();
        let admin = <soroban_sdk::Address as TestAddress>::generate(&env);

        let contract_id = env.register(TestContract, ());

        env.as_contract(&contract_id, || {
            // No admin stored yet
            assert!(!AccessControl::is_admin(&env, &admin));

            Storage::set_admin(&env, &admin);
            assert!(AccessControl::is_admin(&env, &admin));

            let other = <soroban_sdk::Address as TestAddress>::generate(&env);
            assert!(!AccessControl::is_admin(&env, &other));
        });
    }

    #[test]
    fn test_is_owner() {
        let env = Env::default();
        let owner = <soroban_sdk::Address as TestAddress>::generate(&env);
        let other = <soroban_sdk::Address as TestAddress>::generate(&env);

        assert!(AccessControl::is_owner(&owner, &owner));
        assert!(!AccessControl::is_owner(&other, &owner));
    }
}
